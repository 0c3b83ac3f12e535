//! Stochastic Monte Carlo variant of the projection generator.
//!
//! Paths follow the same accumulation loop as the deterministic generator,
//! substituting a GBM monthly return for the fixed rate. Paths are generated
//! in seeded batches fanned out over rayon; percentile bands are extracted by
//! sorting path values per time index.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::StandardNormal;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::date_math::add_months;
use crate::model::{Goal, MonteCarloConfig, ProjectionPoint, SimulationResult};
use crate::projection;

const MONTHS_PER_YEAR: f64 = 12.0;

/// Batch size for parallel path generation. Each batch owns a seeded RNG so
/// results are reproducible for a fixed seed regardless of thread schedule.
const BATCH_SIZE: usize = 100;

/// Run a Monte Carlo simulation of the goal.
///
/// Returns the deterministic base projection, `iterations` stochastic paths
/// (capped at [`MonteCarloConfig::MAX_ITERATIONS`]) and one percentile series
/// per requested confidence level, all aligned index-for-index. An empty base
/// projection yields an empty result.
#[must_use]
pub fn simulate(goal: &Goal, current_net_worth: f64, config: &MonteCarloConfig) -> SimulationResult {
    let base = projection::generate(goal, current_net_worth);
    if base.is_empty() {
        return SimulationResult::default();
    }

    let iterations = config.iterations.min(MonteCarloConfig::MAX_ITERATIONS);
    let base_seed = config.seed.unwrap_or_else(|| rand::rng().random());

    let num_batches = iterations.div_ceil(BATCH_SIZE);
    let paths: Vec<Vec<ProjectionPoint>> = (0..num_batches)
        .into_par_iter()
        .flat_map(|batch| {
            let mut rng = SmallRng::seed_from_u64(base_seed.wrapping_add(batch as u64));

            let batch_size = if batch == num_batches - 1 {
                iterations - batch * BATCH_SIZE
            } else {
                BATCH_SIZE
            };

            (0..batch_size)
                .map(|_| {
                    let mut path_rng = SmallRng::seed_from_u64(rng.next_u64());
                    simulate_path(goal, current_net_worth, config.volatility, &mut path_rng)
                })
                .collect::<Vec<_>>()
        })
        .collect();

    let percentiles = extract_percentiles(&base, &paths, &config.confidence_levels);

    SimulationResult {
        base,
        paths,
        percentiles,
    }
}

/// Generate a single stochastic path.
///
/// The RNG is injected so tests can seed it and assert deterministic output.
/// Each month draws a standard-normal sample and applies
/// `drift + diffusion` where `drift = (annual - 0.5 * sigma^2) * dt` and
/// `diffusion = sigma * sqrt(dt) * z`, with `dt = 1/12`. Deposit escalation
/// matches the deterministic generator exactly.
#[must_use]
pub fn simulate_path<R: Rng + ?Sized>(
    goal: &Goal,
    current_net_worth: f64,
    volatility: f64,
    rng: &mut R,
) -> Vec<ProjectionPoint> {
    let (Some(months), Some(start)) = (projection::total_months(goal), goal.start_date) else {
        return Vec::new();
    };

    let dt = 1.0 / MONTHS_PER_YEAR;
    let drift = (goal.annual_return - 0.5 * volatility * volatility) * dt;
    let diffusion_scale = volatility * dt.sqrt();

    let mut balance = current_net_worth;
    let mut deposit = goal.monthly_deposit;
    let mut cumulative_contributions = 0.0;
    let mut cumulative_returns = 0.0;

    let mut points = Vec::with_capacity((months + 1) as usize);
    for i in 0..=months {
        let (year, month) = add_months(start.year(), start.month(), i);

        if i > 0 && i % 12 == 0 {
            deposit *= 1.0 + goal.deposit_increase;
        }

        let z: f64 = rng.sample(StandardNormal);
        let monthly_return = drift + diffusion_scale * z;
        let return_amount = balance * monthly_return;
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

/// For each time index, sort the path values and select the entry at
/// `floor(level * n)` for every requested level. Percentile points reuse the
/// base point's calendar and contribution fields at that index.
fn extract_percentiles(
    base: &[ProjectionPoint],
    paths: &[Vec<ProjectionPoint>],
    levels: &[f64],
) -> Vec<(f64, Vec<ProjectionPoint>)> {
    if paths.is_empty() {
        return levels.iter().map(|&level| (level, Vec::new())).collect();
    }

    let mut series: Vec<(f64, Vec<ProjectionPoint>)> = levels
        .iter()
        .map(|&level| (level, Vec::with_capacity(base.len())))
        .collect();

    let mut values = Vec::with_capacity(paths.len());
    for (idx, base_point) in base.iter().enumerate() {
        values.clear();
        values.extend(paths.iter().map(|path| path[idx].value));
        values.sort_by(f64::total_cmp);

        for (level, points) in &mut series {
            let pick = ((*level * values.len() as f64).floor() as usize).min(values.len() - 1);
            let mut point = base_point.clone();
            point.value = values[pick];
            point.cumulative_returns = point.value - point.principal;
            points.push(point);
        }
    }

    series
}
