//! Per-month projection records.

use serde::{Deserialize, Serialize};

use crate::date_math::month_key;

/// One month of a deterministic or simulated forecast.
///
/// All currency fields are rounded to the nearest whole unit when the point
/// is constructed; they are never re-derived afterwards, so repeated calls
/// cannot drift.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: i16,
    pub month: i8,
    /// Canonical `"YYYY-MM"` key.
    pub date: String,
    /// Projected total value at the end of this month.
    pub value: f64,
    pub goal_amount: f64,
    /// This month's deposit.
    pub contribution: f64,
    pub cumulative_contributions: f64,
    /// This month's investment return amount.
    pub return_amount: f64,
    pub cumulative_returns: f64,
    /// Starting net worth plus cumulative contributions.
    pub principal: f64,
}

impl ProjectionPoint {
    /// Build a point for a month cell, rounding every currency field once.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn new(
        year: i16,
        month: i8,
        value: f64,
        goal_amount: f64,
        contribution: f64,
        cumulative_contributions: f64,
        return_amount: f64,
        cumulative_returns: f64,
        principal: f64,
    ) -> Self {
        Self {
            year,
            month,
            date: month_key(year, month),
            value: value.round(),
            goal_amount: goal_amount.round(),
            contribution: contribution.round(),
            cumulative_contributions: cumulative_contributions.round(),
            return_amount: return_amount.round(),
            cumulative_returns: cumulative_returns.round(),
            principal: principal.round(),
        }
    }

    /// Investment-only value: total value minus cumulative contributions.
    /// This is the quantity the risk and seasonal analytics measure returns
    /// on, so contribution cash-flows don't masquerade as performance.
    #[must_use]
    pub fn investment_value(&self) -> f64 {
        self.value - self.cumulative_contributions
    }
}

/// A [`ProjectionPoint`] annotated with actual history and simulation bands.
///
/// Only the actual-vs-projected merger and Monte Carlo consumers populate the
/// optional fields; everything else leaves them `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtendedProjectionPoint {
    #[serde(flatten)]
    pub point: ProjectionPoint,
    pub actual_contributions: Option<f64>,
    pub actual_value: Option<f64>,
    pub actual_returns: Option<f64>,
    pub p10: Option<f64>,
    pub p50: Option<f64>,
    pub p90: Option<f64>,
}

impl From<ProjectionPoint> for ExtendedProjectionPoint {
    fn from(point: ProjectionPoint) -> Self {
        Self {
            point,
            actual_contributions: None,
            actual_value: None,
            actual_returns: None,
            p10: None,
            p50: None,
            p90: None,
        }
    }
}
