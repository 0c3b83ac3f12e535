//! Output types of the simulators and analyzers.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use super::point::ProjectionPoint;

/// Tolerance for matching requested percentile levels.
pub const PERCENTILE_TOLERANCE: f64 = 0.001;

/// Parameters for a Monte Carlo run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonteCarloConfig {
    /// Number of stochastic paths. Clamped to [`MonteCarloConfig::MAX_ITERATIONS`].
    pub iterations: usize,
    /// Annualized volatility of the monthly return process.
    pub volatility: f64,
    /// Percentile levels to extract, each in (0, 1).
    pub confidence_levels: Vec<f64>,
    /// Seed for reproducible runs; `None` draws one from process entropy.
    pub seed: Option<u64>,
}

impl MonteCarloConfig {
    /// Worst-case cost bound: cost is O(iterations x months), so the path
    /// count is capped rather than rejected.
    pub const MAX_ITERATIONS: usize = 2_000;
}

impl Default for MonteCarloConfig {
    fn default() -> Self {
        Self {
            iterations: 1_000,
            volatility: 0.15,
            confidence_levels: vec![0.10, 0.50, 0.90],
            seed: None,
        }
    }
}

/// Results of a Monte Carlo run: the deterministic base projection, every
/// simulated path, and the requested percentile series. All three are aligned
/// index-for-index.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    pub base: Vec<ProjectionPoint>,
    pub paths: Vec<Vec<ProjectionPoint>>,
    /// (level, series) pairs in the order the levels were requested.
    pub percentiles: Vec<(f64, Vec<ProjectionPoint>)>,
}

impl SimulationResult {
    /// Look up a percentile series by level (tolerance comparison).
    #[must_use]
    pub fn percentile(&self, level: f64) -> Option<&[ProjectionPoint]> {
        find_percentile_series(&self.percentiles, level)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }
}

/// Find a percentile series from (level, series) pairs using
/// [`PERCENTILE_TOLERANCE`] for the floating-point comparison.
#[inline]
#[must_use]
pub fn find_percentile_series(
    series: &[(f64, Vec<ProjectionPoint>)],
    target: f64,
) -> Option<&[ProjectionPoint]> {
    series
        .iter()
        .find(|(level, _)| (level - target).abs() < PERCENTILE_TOLERANCE)
        .map(|(_, points)| points.as_slice())
}

/// Qualitative risk rating derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskRating {
    Low,
    Medium,
    High,
    VeryHigh,
}

impl RiskRating {
    /// Map a composite score to a rating. Thresholds at 30/60/80.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score < 30.0 {
            Self::Low
        } else if score < 60.0 {
            Self::Medium
        } else if score < 80.0 {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Stable growth with modest fluctuations",
            Self::Medium => "Moderate swings; drawdowns recover within the plan horizon",
            Self::High => "Large swings; meaningful drawdown risk along the way",
            Self::VeryHigh => "Highly volatile; outcomes depend strongly on timing",
        }
    }
}

/// Rolling investment-only returns keyed by `"YYYY-MM"` window-end date.
/// Three- and five-year windows are annualized.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RollingReturns {
    pub one_year: FxHashMap<String, f64>,
    pub three_year: FxHashMap<String, f64>,
    pub five_year: FxHashMap<String, f64>,
}

/// Statistical risk measures of a projection series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// Peak-to-trough decline as a fraction of the peak.
    pub max_drawdown: f64,
    /// Standard deviation of monthly investment-only returns.
    pub volatility: f64,
    pub rolling_returns: RollingReturns,
    /// Historical Value-at-Risk scaled by the latest portfolio value
    /// (negative = potential loss).
    pub value_at_risk: f64,
    /// Average loss at or beyond the VaR threshold, similarly scaled.
    pub conditional_var: f64,
    pub composite_score: f64,
    pub rating: RiskRating,
}

/// One drawdown episode. An episode closes once the series recovers to
/// within 1% of the prior peak; open episodes carry no recovery date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DrawdownPeriod {
    pub start: String,
    pub trough: String,
    pub recovery: Option<String>,
    /// Depth at the trough as a fraction of the peak.
    pub depth: f64,
}

/// Full output of the risk analyzer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAnalysisResult {
    pub metrics: RiskMetrics,
    /// The input projection with a one-sigma haircut applied to the
    /// investment component.
    pub risk_adjusted_projection: Vec<ProjectionPoint>,
    pub drawdown_periods: Vec<DrawdownPeriod>,
}

/// Average behavior of returns for one calendar month across years.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalPattern {
    /// Calendar month 1-12.
    pub month: i8,
    pub average_return: f64,
    pub best_year: i16,
    pub worst_year: i16,
    /// Pattern-strength score in [0, 1].
    pub strength: f64,
}

/// Year-over-year comparison between the first and last point of a year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YoYComparison {
    pub year: i16,
    pub start_value: f64,
    pub end_value: f64,
    /// Investment-only return over the year.
    pub annual_return: f64,
    pub annual_contributions: f64,
    pub annual_growth: f64,
}

/// Full output of the time-series analyzer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeBasedAnalysisResult {
    pub seasonal_patterns: Vec<SeasonalPattern>,
    pub year_over_year: Vec<YoYComparison>,
    /// Top 3 calendar months by average return.
    pub best_months: Vec<SeasonalPattern>,
    /// Bottom 3 calendar months by average return.
    pub worst_months: Vec<SeasonalPattern>,
    /// Investment-only monthly return in percent, keyed by `"YYYY-MM"`.
    pub heatmap: FxHashMap<String, f64>,
}

/// Horizon estimate for reaching a goal amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearsToGoal {
    pub base_years: u32,
    /// (optimistic, pessimistic) bounds in years.
    pub confidence_interval: (u32, u32),
}
