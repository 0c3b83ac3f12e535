//! Annotate a projection with actual transaction history and simulation
//! bands.
//!
//! The caller supplies the transaction ledger, an FX rate map into the
//! canonical currency and the reference month (`as_of`), so the merge stays a
//! pure function of its inputs.

use jiff::civil::Date;
use rustc_hash::FxHashMap;

use crate::date_math::{month_cell, month_index};
use crate::model::{ExtendedProjectionPoint, ProjectionPoint, SimulationResult, Transaction};

/// Merge actual transaction history into a projection.
///
/// Per month, transaction amounts (`shares * price`, FX-converted; buys add,
/// sells subtract) are bucketed and accumulated. Transactions dated before
/// the projection's first month fold into the opening total. Every point up
/// to `as_of` carries the cumulative actual contribution at its date; the
/// `as_of` point additionally carries the caller's current net worth and
/// derived actual returns. When a simulation result is supplied, its
/// p10/p50/p90 values are attached index-for-index.
#[must_use]
pub fn actual_vs_projected(
    projection: &[ProjectionPoint],
    transactions: &[Transaction],
    fx_rates: &FxHashMap<String, f64>,
    current_net_worth: f64,
    as_of: Date,
    simulation: Option<&SimulationResult>,
) -> Vec<ExtendedProjectionPoint> {
    let monthly = monthly_contributions(transactions, fx_rates);
    let first_data_month = monthly.keys().copied().min();
    let as_of_month = {
        let (year, month) = month_cell(as_of);
        month_index(year, month)
    };

    let p10 = simulation.and_then(|s| s.percentile(0.10));
    let p50 = simulation.and_then(|s| s.percentile(0.50));
    let p90 = simulation.and_then(|s| s.percentile(0.90));
    let band = |series: Option<&[ProjectionPoint]>, idx: usize| -> Option<f64> {
        series.and_then(|s| s.get(idx)).map(|p| p.value)
    };

    let mut cumulative = 0.0;
    if let Some(first_point) = projection.first() {
        let first_month = month_index(first_point.year, first_point.month);
        cumulative += monthly
            .iter()
            .filter(|&(&month, _)| month < first_month && month <= as_of_month)
            .map(|(_, amount)| amount)
            .sum::<f64>();
    }

    let mut merged = Vec::with_capacity(projection.len());
    for (idx, point) in projection.iter().enumerate() {
        let point_month = month_index(point.year, point.month);
        let mut extended = ExtendedProjectionPoint::from(point.clone());

        if point_month <= as_of_month {
            if let Some(amount) = monthly.get(&point_month) {
                cumulative += amount;
            }
            // Months before any recorded transaction stay unannotated.
            if first_data_month.is_some_and(|first| point_month >= first) {
                extended.actual_contributions = Some(cumulative);
            }
            if point_month == as_of_month {
                extended.actual_value = Some(current_net_worth);
                extended.actual_returns = Some(current_net_worth - cumulative);
            }
        }

        extended.p10 = band(p10, idx);
        extended.p50 = band(p50, idx);
        extended.p90 = band(p90, idx);
        merged.push(extended);
    }

    merged
}

/// Bucket signed transaction amounts by calendar month (flat month index).
/// An unknown currency converts at 1.0 so the merge stays total.
fn monthly_contributions(
    transactions: &[Transaction],
    fx_rates: &FxHashMap<String, f64>,
) -> FxHashMap<i32, f64> {
    let mut monthly = FxHashMap::default();
    for tx in transactions {
        let rate = fx_rates.get(&tx.currency).copied().unwrap_or(1.0);
        let (year, month) = month_cell(tx.date);
        *monthly.entry(month_index(year, month)).or_insert(0.0) += tx.signed_amount(rate);
    }
    monthly
}
