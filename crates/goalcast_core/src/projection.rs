//! Deterministic month-by-month compounding forecast.
//!
//! The generator is a total function: a missing start date or a non-positive
//! horizon yields an empty sequence rather than an error. For fixed inputs
//! the output is fully deterministic.

use crate::date_math::add_months;
use crate::model::{Goal, ProjectionPoint, YearsToGoal};

/// Horizon cap for [`years_to_goal`] searches.
const MAX_HORIZON_YEARS: u32 = 100;

/// Convert an annual return to the canonical monthly rate.
///
/// Geometric compounding: twelve monthly steps reproduce the annual rate
/// exactly. This single conversion is shared by the deterministic generator,
/// the scenario engine and the Monte Carlo drift term.
#[must_use]
#[inline]
pub fn monthly_rate(annual_return: f64) -> f64 {
    (1.0 + annual_return).powf(1.0 / 12.0) - 1.0
}

/// Number of whole months from the goal's start date through December of the
/// retirement year. `None` when the goal has no start date or the horizon is
/// non-positive.
#[must_use]
pub fn total_months(goal: &Goal) -> Option<i32> {
    let start = goal.start_date?;
    let months = (i32::from(goal.retirement_year) - i32::from(start.year())) * 12
        + (12 - i32::from(start.month()));
    (months > 0).then_some(months)
}

/// Project a goal forward month by month under compounding assumptions.
///
/// Produces exactly `total_months + 1` points in strictly increasing date
/// order, one per calendar month from the start date through the end of the
/// retirement year. Each month applies the return to the running balance
/// first, then adds the deposit; the deposit escalates once per elapsed year.
#[must_use]
pub fn generate(goal: &Goal, current_net_worth: f64) -> Vec<ProjectionPoint> {
    let (Some(months), Some(start)) = (total_months(goal), goal.start_date) else {
        return Vec::new();
    };

    let rate = monthly_rate(goal.annual_return);
    let mut balance = current_net_worth;
    let mut deposit = goal.monthly_deposit;
    let mut cumulative_contributions = 0.0;
    let mut cumulative_returns = 0.0;

    let mut points = Vec::with_capacity((months + 1) as usize);
    for i in 0..=months {
        let (year, month) = add_months(start.year(), start.month(), i);

        // Deposit escalation fires on each anniversary of the start month.
        if i > 0 && i % 12 == 0 {
            deposit *= 1.0 + goal.deposit_increase;
        }

        let return_amount = balance * rate;
        balance += return_amount + deposit;
        cumulative_contributions += deposit;
        cumulative_returns += return_amount;

        points.push(ProjectionPoint::new(
            year,
            month,
            balance,
            goal.target_amount,
            deposit,
            cumulative_contributions,
            return_amount,
            cumulative_returns,
            current_net_worth + cumulative_contributions,
        ));
    }

    points
}

/// Months of compounding and deposits needed to reach `target` starting from
/// `net_worth` at the given annual return. Capped at [`MAX_HORIZON_YEARS`].
fn months_to_reach(goal: &Goal, net_worth: f64, annual_return: f64) -> u32 {
    let rate = monthly_rate(annual_return);
    let cap = MAX_HORIZON_YEARS * 12;
    let mut balance = net_worth;
    let mut deposit = goal.monthly_deposit;

    for i in 1..=cap {
        if i > 1 && (i - 1) % 12 == 0 {
            deposit *= 1.0 + goal.deposit_increase;
        }
        balance += balance * rate + deposit;
        if balance >= goal.target_amount {
            return i;
        }
    }
    cap
}

/// Estimate how many years it takes to reach the goal amount, with a
/// confidence interval from a +/-2% perturbation of the annual return.
///
/// Already at or past the target resolves to zero years with a `(0, 0)`
/// interval.
#[must_use]
pub fn years_to_goal(goal: &Goal, current_net_worth: f64) -> YearsToGoal {
    if current_net_worth >= goal.target_amount {
        return YearsToGoal {
            base_years: 0,
            confidence_interval: (0, 0),
        };
    }

    let to_years = |months: u32| months.div_ceil(12);
    let base_years = to_years(months_to_reach(goal, current_net_worth, goal.annual_return));
    let optimistic = to_years(months_to_reach(
        goal,
        current_net_worth,
        goal.annual_return + 0.02,
    ));
    let pessimistic = to_years(months_to_reach(
        goal,
        current_net_worth,
        goal.annual_return - 0.02,
    ));

    YearsToGoal {
        base_years,
        confidence_interval: (optimistic, pessimistic),
    }
}
