//! Seasonal, year-over-year and heatmap analytics over a projection series.
//!
//! Like the risk analyzer, everything here measures investment-only returns;
//! a non-positive starting investment value contributes a 0 return.

use rustc_hash::FxHashMap;

use crate::model::{ProjectionPoint, SeasonalPattern, TimeBasedAnalysisResult, YoYComparison};

/// Weight of sign consistency in the pattern-strength score.
const STRENGTH_CONSISTENCY_WEIGHT: f64 = 0.7;
/// Weight of (inverse) dispersion in the pattern-strength score.
const STRENGTH_DISPERSION_WEIGHT: f64 = 0.3;

/// Derive seasonal patterns, year-over-year comparisons and the monthly
/// return heatmap from a projection series.
#[must_use]
pub fn analyze(projection: &[ProjectionPoint]) -> TimeBasedAnalysisResult {
    let seasonal_patterns = seasonal_patterns(projection);

    let mut ranked = seasonal_patterns.clone();
    ranked.sort_by(|a, b| b.average_return.total_cmp(&a.average_return));
    let best_months = ranked.iter().take(3).cloned().collect();
    let worst_months = ranked.iter().rev().take(3).cloned().collect();

    TimeBasedAnalysisResult {
        seasonal_patterns,
        year_over_year: year_over_year(projection),
        best_months,
        worst_months,
        heatmap: heatmap(projection),
    }
}

fn investment_return(from: &ProjectionPoint, to: &ProjectionPoint) -> f64 {
    let start = from.investment_value();
    if start <= 0.0 {
        0.0
    } else {
        (to.investment_value() - start) / start
    }
}

/// Pair points twelve months apart (same calendar month) and aggregate the
/// resulting year-on-year returns per calendar month.
fn seasonal_patterns(projection: &[ProjectionPoint]) -> Vec<SeasonalPattern> {
    // (return, contributing year) samples per calendar month 1-12
    let mut samples: [Vec<(f64, i16)>; 12] = Default::default();
    for i in 12..projection.len() {
        let (from, to) = (&projection[i - 12], &projection[i]);
        samples[(to.month - 1) as usize].push((investment_return(from, to), to.year));
    }

    let mut patterns = Vec::new();
    for (month_idx, month_samples) in samples.iter().enumerate() {
        if month_samples.is_empty() {
            continue;
        }
        let n = month_samples.len() as f64;
        let average = month_samples.iter().map(|(r, _)| r).sum::<f64>() / n;
        let variance = month_samples
            .iter()
            .map(|(r, _)| (r - average).powi(2))
            .sum::<f64>()
            / n;
        let std_dev = variance.sqrt();

        let positives = month_samples.iter().filter(|(r, _)| *r >= 0.0).count();
        let consistency = positives.max(month_samples.len() - positives) as f64 / n;

        let strength = (STRENGTH_CONSISTENCY_WEIGHT * consistency
            + STRENGTH_DISPERSION_WEIGHT * (1.0 - (std_dev * 10.0).min(1.0)))
        .clamp(0.0, 1.0);

        let best_year = month_samples
            .iter()
            .max_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(0, |(_, y)| *y);
        let worst_year = month_samples
            .iter()
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(0, |(_, y)| *y);

        patterns.push(SeasonalPattern {
            month: (month_idx + 1) as i8,
            average_return: average,
            best_year,
            worst_year,
            strength,
        });
    }
    patterns
}

/// Compare the first and last point of every year present in the series.
fn year_over_year(projection: &[ProjectionPoint]) -> Vec<YoYComparison> {
    let mut comparisons = Vec::new();
    let mut i = 0;
    while i < projection.len() {
        let year = projection[i].year;
        let mut last = i;
        while last + 1 < projection.len() && projection[last + 1].year == year {
            last += 1;
        }
        let (first_point, last_point) = (&projection[i], &projection[last]);
        comparisons.push(YoYComparison {
            year,
            start_value: first_point.value,
            end_value: last_point.value,
            annual_return: investment_return(first_point, last_point),
            annual_contributions: last_point.cumulative_contributions
                - first_point.cumulative_contributions,
            annual_growth: last_point.value - first_point.value,
        });
        i = last + 1;
    }
    comparisons
}

/// Investment-only monthly return in percent for every consecutive point
/// pair, keyed by the later point's `"YYYY-MM"` date.
fn heatmap(projection: &[ProjectionPoint]) -> FxHashMap<String, f64> {
    let mut map = FxHashMap::default();
    for pair in projection.windows(2) {
        map.insert(
            pair[1].date.clone(),
            investment_return(&pair[0], &pair[1]) * 100.0,
        );
    }
    map
}
