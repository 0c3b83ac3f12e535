//! Integration tests for the projection engine
//!
//! Tests are organized by topic:
//! - `projection` - Deterministic generator and years-to-goal
//! - `scenarios` - Named return-adjustment variants
//! - `monte_carlo` - Stochastic paths and percentile bands
//! - `risk` - Risk metrics, drawdowns, VaR
//! - `time_series` - Seasonal/YoY/heatmap analytics
//! - `sampling` - Downsampling strategies
//! - `merge` - Actual-vs-projected merging
//! - `worker` - Dispatch and inline fallback

mod merge;
mod sampling;
mod scenarios;

use crate::date_math::add_months;
use crate::model::{Goal, ProjectionPoint};

/// A pure-investment series starting January 2024: no contributions, so
/// `investment_value == value` at every point.
pub(crate) fn investment_series(values: &[f64]) -> Vec<ProjectionPoint> {
    values
        .iter()
        .enumerate()
        .map(|(i, &value)| {
            let (year, month) = add_months(2024, 1, i as i32);
            ProjectionPoint::new(year, month, value, 0.0, 0.0, 0.0, 0.0, value, 0.0)
        })
        .collect()
}

/// The reference goal used across tests: $750k by end of 2050, 7% return,
/// $1,500/month escalating 2% per year, starting January 2024.
pub(crate) fn reference_goal() -> Goal {
    Goal {
        target_amount: 750_000.0,
        retirement_year: 2050,
        annual_return: 0.07,
        monthly_deposit: 1_500.0,
        deposit_increase: 0.02,
        start_date: Some(jiff::civil::date(2024, 1, 1)),
    }
}
