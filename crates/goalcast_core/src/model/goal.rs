//! Caller-owned input types: the savings goal, scenario perturbations and
//! the external transaction record.

use jiff::civil::Date;
use serde::{Deserialize, Serialize};

/// A savings/investment target and the contribution and return assumptions
/// used to reach it by the end of `retirement_year`.
///
/// Immutable input to every generator; the engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Goal {
    /// Target net worth in whole currency units.
    pub target_amount: f64,
    /// Projections run through December of this year inclusive.
    pub retirement_year: i16,
    /// Annual return assumption, e.g. 0.07 for 7%.
    pub annual_return: f64,
    /// Base monthly deposit at the start of the plan.
    pub monthly_deposit: f64,
    /// Fraction by which the monthly deposit grows once per elapsed year,
    /// e.g. 0.02 for 2%.
    pub deposit_increase: f64,
    /// First month of the plan. `None` yields an empty projection.
    pub start_date: Option<Date>,
}

impl Goal {
    /// Copy of this goal with the annual return shifted by `delta`.
    #[must_use]
    pub fn with_return_adjustment(&self, delta: f64) -> Self {
        Self {
            annual_return: self.annual_return + delta,
            ..self.clone()
        }
    }
}

/// A named, parameterized perturbation of a [`Goal`]'s return assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    /// Signed delta applied to the goal's annual return.
    pub return_adjustment: f64,
    /// Inactive scenarios are skipped by the scenario engine.
    pub active: bool,
}

impl Scenario {
    pub fn new(id: impl Into<String>, name: impl Into<String>, return_adjustment: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            return_adjustment,
            active: true,
        }
    }
}

/// The default scenario set: base, optimistic (+2%), pessimistic (-2%).
#[must_use]
pub fn default_scenarios() -> Vec<Scenario> {
    vec![
        Scenario::new("base", "Base", 0.0),
        Scenario::new("optimistic", "Optimistic", 0.02),
        Scenario::new("pessimistic", "Pessimistic", -0.02),
    ]
}

/// Buy/sell direction of an external transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeAction {
    Buy,
    Sell,
}

/// External collaborator type: one holding transaction from the caller's
/// ledger. Consumed only to derive actual monthly contribution amounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub date: Date,
    pub action: TradeAction,
    pub shares: f64,
    pub price: f64,
    /// ISO currency code; converted to the canonical currency via the
    /// caller-supplied rate map.
    pub currency: String,
}

impl Transaction {
    /// Signed contribution in the canonical currency: buys add, sells
    /// subtract. An unknown currency converts at 1.0.
    #[must_use]
    pub fn signed_amount(&self, fx_rate: f64) -> f64 {
        let amount = self.shares * self.price * fx_rate;
        match self.action {
            TradeAction::Buy => amount,
            TradeAction::Sell => -amount,
        }
    }
}
