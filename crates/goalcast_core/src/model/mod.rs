mod goal;
mod point;
mod results;

pub use goal::{Goal, Scenario, TradeAction, Transaction, default_scenarios};
pub use point::{ExtendedProjectionPoint, ProjectionPoint};
pub use results::{
    DrawdownPeriod, MonteCarloConfig, RiskAnalysisResult, RiskMetrics, RiskRating, RollingReturns,
    SeasonalPattern, SimulationResult, TimeBasedAnalysisResult, YearsToGoal, YoYComparison,
    find_percentile_series,
};
