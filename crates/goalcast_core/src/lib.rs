//! Financial projection and simulation engine
//!
//! This crate provides the pure numerical core behind a personal-finance
//! dashboard. It supports:
//! - Deterministic month-by-month goal projections under compounding
//! - Monte Carlo simulation with percentile confidence bands
//! - Named scenario variants (return-rate perturbations)
//! - Risk statistics (Sharpe, Sortino, drawdowns, VaR/CVaR)
//! - Seasonal and year-over-year analytics
//! - Display-budget downsampling (LTTB, extrema-aware, volatility-weighted)
//! - Actual-vs-projected merging of external transaction history
//!
//! Every routine is side-effect free and total: invalid inputs resolve to
//! empty sequences or zeros rather than errors. Rendering, persistence and
//! price fetching are external collaborators and live outside this crate.
//!
//! ```ignore
//! use goalcast_core::model::Goal;
//! use goalcast_core::projection;
//!
//! let goal = Goal {
//!     target_amount: 750_000.0,
//!     retirement_year: 2050,
//!     annual_return: 0.07,
//!     monthly_deposit: 1_500.0,
//!     deposit_increase: 0.02,
//!     start_date: Some(jiff::civil::date(2024, 1, 1)),
//! };
//! let points = projection::generate(&goal, 25_000.0);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod date_math;
pub mod error;
pub mod merge;
pub mod monte_carlo;
pub mod projection;
pub mod risk;
pub mod sampling;
pub mod scenario;
pub mod time_series;
pub mod worker;

// ============================================================================
// Type definition modules
// ============================================================================

pub mod model;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use model::{
    Goal, MonteCarloConfig, ProjectionPoint, RiskAnalysisResult, Scenario, SimulationResult,
    TimeBasedAnalysisResult,
};
pub use worker::{EngineRequest, EngineResponse, EngineWorker};
