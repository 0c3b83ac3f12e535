//! Named return-adjustment variants of a projection.
//!
//! Each scenario derives a goal with a shifted annual return and delegates to
//! the deterministic generator. Runs are independent and order-insensitive;
//! there is no cross-scenario state.

use rustc_hash::FxHashMap;

use crate::model::{Goal, ProjectionPoint, Scenario, default_scenarios};
use crate::projection;

/// Run every active scenario and return its projection keyed by scenario id.
///
/// With no scenario list supplied, the default base/optimistic/pessimistic
/// set is used.
#[must_use]
pub fn run_scenarios(
    goal: &Goal,
    current_net_worth: f64,
    scenarios: Option<&[Scenario]>,
) -> FxHashMap<String, Vec<ProjectionPoint>> {
    let default_set;
    let scenarios = match scenarios {
        Some(list) => list,
        None => {
            default_set = default_scenarios();
            &default_set
        }
    };

    let mut results = FxHashMap::default();
    for scenario in scenarios.iter().filter(|s| s.active) {
        let derived = goal.with_return_adjustment(scenario.return_adjustment);
        results.insert(
            scenario.id.clone(),
            projection::generate(&derived, current_net_worth),
        );
    }
    results
}
