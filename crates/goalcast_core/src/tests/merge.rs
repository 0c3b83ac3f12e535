//! Tests for actual-vs-projected merging.

use jiff::civil::date;
use rustc_hash::FxHashMap;

use super::reference_goal;
use crate::merge::actual_vs_projected;
use crate::model::{MonteCarloConfig, TradeAction, Transaction};
use crate::monte_carlo::simulate;
use crate::projection::generate;

fn tx(
    year: i16,
    month: i8,
    day: i8,
    action: TradeAction,
    shares: f64,
    price: f64,
    currency: &str,
) -> Transaction {
    Transaction {
        date: date(year, month, day),
        action,
        shares,
        price,
        currency: currency.to_string(),
    }
}

fn ledger() -> Vec<Transaction> {
    vec![
        tx(2024, 2, 5, TradeAction::Buy, 10.0, 100.0, "USD"),
        tx(2024, 3, 10, TradeAction::Buy, 5.0, 100.0, "USD"),
        tx(2024, 3, 20, TradeAction::Sell, 2.0, 50.0, "USD"),
    ]
}

#[test]
fn test_cumulative_actuals_attach_up_to_as_of() {
    let projection = generate(&reference_goal(), 0.0);
    let merged = actual_vs_projected(
        &projection,
        &ledger(),
        &FxHashMap::default(),
        5_000.0,
        date(2024, 4, 15),
        None,
    );

    assert_eq!(merged.len(), projection.len());
    // January predates the first recorded transaction.
    assert_eq!(merged[0].point.date, "2024-01");
    assert!(merged[0].actual_contributions.is_none());
    // February: buy 10 x 100.
    assert_eq!(merged[1].actual_contributions, Some(1_000.0));
    // March: buy 500, sell 100.
    assert_eq!(merged[2].actual_contributions, Some(1_400.0));
    // April has no transactions but still carries the running total.
    assert_eq!(merged[3].actual_contributions, Some(1_400.0));
    // Nothing attaches beyond the as-of month.
    for extended in &merged[4..] {
        assert!(extended.actual_contributions.is_none());
        assert!(extended.actual_value.is_none());
        assert!(extended.actual_returns.is_none());
    }
}

#[test]
fn test_actual_value_and_returns_only_at_as_of() {
    let projection = generate(&reference_goal(), 0.0);
    let merged = actual_vs_projected(
        &projection,
        &ledger(),
        &FxHashMap::default(),
        5_000.0,
        date(2024, 4, 15),
        None,
    );

    for (i, extended) in merged.iter().enumerate() {
        if i == 3 {
            assert_eq!(extended.actual_value, Some(5_000.0));
            assert_eq!(extended.actual_returns, Some(5_000.0 - 1_400.0));
        } else {
            assert!(extended.actual_value.is_none());
            assert!(extended.actual_returns.is_none());
        }
    }
}

#[test]
fn test_fx_conversion_and_unknown_currency() {
    let projection = generate(&reference_goal(), 0.0);
    let transactions = vec![
        tx(2024, 1, 5, TradeAction::Buy, 10.0, 100.0, "EUR"),
        tx(2024, 1, 6, TradeAction::Buy, 1.0, 100.0, "XXX"),
    ];
    let mut fx_rates = FxHashMap::default();
    fx_rates.insert("EUR".to_string(), 1.1);

    let merged = actual_vs_projected(
        &projection,
        &transactions,
        &fx_rates,
        2_000.0,
        date(2024, 1, 31),
        None,
    );

    // EUR converts at 1.1; the unknown currency falls back to 1.0.
    assert_eq!(merged[0].actual_contributions, Some(1_000.0 * 1.1 + 100.0));
}

#[test]
fn test_pre_span_transactions_fold_into_opening_total() {
    let projection = generate(&reference_goal(), 0.0);
    let transactions = vec![
        tx(2023, 12, 15, TradeAction::Buy, 10.0, 100.0, "USD"),
        tx(2024, 2, 5, TradeAction::Buy, 5.0, 100.0, "USD"),
    ];
    let merged = actual_vs_projected(
        &projection,
        &transactions,
        &FxHashMap::default(),
        2_000.0,
        date(2024, 2, 20),
        None,
    );

    // December 2023 predates the projection but still counts.
    assert_eq!(merged[0].actual_contributions, Some(1_000.0));
    assert_eq!(merged[1].actual_contributions, Some(1_500.0));
    assert!(merged[2].actual_contributions.is_none());
}

#[test]
fn test_as_of_before_projection_leaves_everything_unannotated() {
    let projection = generate(&reference_goal(), 0.0);
    let merged = actual_vs_projected(
        &projection,
        &ledger(),
        &FxHashMap::default(),
        5_000.0,
        date(2020, 1, 1),
        None,
    );

    for extended in &merged {
        assert!(extended.actual_contributions.is_none());
        assert!(extended.actual_value.is_none());
    }
}

#[test]
fn test_empty_projection_merges_to_empty() {
    let merged = actual_vs_projected(
        &[],
        &ledger(),
        &FxHashMap::default(),
        5_000.0,
        date(2024, 4, 15),
        None,
    );
    assert!(merged.is_empty());
}

#[test]
fn test_extended_points_serialize_flat() {
    let projection = generate(&reference_goal(), 0.0);
    let merged = actual_vs_projected(
        &projection,
        &ledger(),
        &FxHashMap::default(),
        5_000.0,
        date(2024, 4, 15),
        None,
    );

    // The inner point flattens into the same JSON object as the annotations.
    let json = serde_json::to_value(&merged[1]).unwrap();
    assert_eq!(json["date"], "2024-02");
    assert_eq!(json["actual_contributions"], 1_000.0);
    assert!(json["p50"].is_null());
}

#[test]
fn test_simulation_bands_attach_index_for_index() {
    let goal = reference_goal();
    let projection = generate(&goal, 0.0);
    let config = MonteCarloConfig {
        iterations: 100,
        seed: Some(11),
        ..MonteCarloConfig::default()
    };
    let simulation = simulate(&goal, 0.0, &config);

    let merged = actual_vs_projected(
        &projection,
        &[],
        &FxHashMap::default(),
        0.0,
        date(2024, 1, 1),
        Some(&simulation),
    );

    let p50 = simulation.percentile(0.50).unwrap();
    for (idx, extended) in merged.iter().enumerate() {
        assert!(extended.p10.is_some());
        assert_eq!(extended.p50, Some(p50[idx].value));
        assert!(extended.p90.is_some());
        assert!(extended.p10 <= extended.p50 && extended.p50 <= extended.p90);
    }
}
