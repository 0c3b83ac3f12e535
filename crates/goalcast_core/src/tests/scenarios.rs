//! Tests for named return-adjustment scenario runs.

use super::reference_goal;
use crate::model::Scenario;
use crate::projection::generate;
use crate::scenario::run_scenarios;

#[test]
fn test_default_scenario_set() {
    let results = run_scenarios(&reference_goal(), 10_000.0, None);

    assert_eq!(results.len(), 3);
    for id in ["base", "optimistic", "pessimistic"] {
        assert!(results.contains_key(id), "missing scenario {id}");
    }

    let final_value = |id: &str| results[id].last().unwrap().value;
    assert!(final_value("optimistic") > final_value("base"));
    assert!(final_value("base") > final_value("pessimistic"));
}

#[test]
fn test_zero_adjustment_matches_plain_generate() {
    let goal = reference_goal();
    let results = run_scenarios(&goal, 10_000.0, None);
    assert_eq!(results["base"], generate(&goal, 10_000.0));
}

#[test]
fn test_inactive_scenarios_skipped() {
    let scenarios = vec![
        Scenario::new("crash", "Crash", -0.05),
        Scenario {
            active: false,
            ..Scenario::new("ignored", "Ignored", 0.10)
        },
    ];
    let results = run_scenarios(&reference_goal(), 0.0, Some(&scenarios));

    assert_eq!(results.len(), 1);
    assert!(results.contains_key("crash"));
    assert!(!results.contains_key("ignored"));
}

#[test]
fn test_runs_are_independent_of_order() {
    let forward = vec![
        Scenario::new("a", "A", 0.01),
        Scenario::new("b", "B", -0.01),
    ];
    let reversed: Vec<Scenario> = forward.iter().rev().cloned().collect();

    let first = run_scenarios(&reference_goal(), 5_000.0, Some(&forward));
    let second = run_scenarios(&reference_goal(), 5_000.0, Some(&reversed));
    assert_eq!(first["a"], second["a"]);
    assert_eq!(first["b"], second["b"]);
}
