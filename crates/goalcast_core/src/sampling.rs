//! Display-budget downsampling for (date, value) series.
//!
//! Independent of the projection pipeline: anything exposing a numeric time
//! axis and a value can be sampled. Selection works on indices so the caller
//! gets back original points, never interpolations.

use rustc_hash::FxHashSet;

use crate::date_math::month_index;
use crate::model::{ExtendedProjectionPoint, ProjectionPoint};

/// Default point budget for chart handoff.
pub const DEFAULT_TARGET_POINTS: usize = 300;
/// Point budget used for high-volatility series under auto selection.
const HIGH_VOLATILITY_TARGET: usize = 400;
/// Series at or below this length are handed over unsampled.
const NO_SAMPLING_THRESHOLD: usize = 300;
/// Above this length auto selection prefers LTTB.
const LTTB_THRESHOLD: usize = 1_000;
/// Mean absolute monthly return above which auto selection goes adaptive.
const VOLATILITY_THRESHOLD: f64 = 0.10;
/// Indices skipped after a detected local extremum.
const EXTREMA_SKIP: usize = 2;
/// Half-width of the local-volatility window for adaptive sampling.
const VOLATILITY_WINDOW: usize = 5;

/// Anything with a numeric time axis and a value; the sampler works on these
/// two coordinates only.
pub trait SamplePoint {
    fn sample_time(&self) -> f64;
    fn sample_value(&self) -> f64;
}

impl SamplePoint for ProjectionPoint {
    fn sample_time(&self) -> f64 {
        f64::from(month_index(self.year, self.month))
    }
    fn sample_value(&self) -> f64 {
        self.value
    }
}

impl SamplePoint for ExtendedProjectionPoint {
    fn sample_time(&self) -> f64 {
        self.point.sample_time()
    }
    fn sample_value(&self) -> f64 {
        self.point.sample_value()
    }
}

impl SamplePoint for (jiff::civil::Date, f64) {
    fn sample_time(&self) -> f64 {
        f64::from((self.0 - jiff::civil::date(1970, 1, 1)).get_days())
    }
    fn sample_value(&self) -> f64 {
        self.1
    }
}

/// Downsampling strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleStrategy {
    /// Largest-triangle-three-buckets: shape-preserving, good default for
    /// long smooth series.
    Lttb,
    /// Local extrema plus evenly spaced fill.
    Smart,
    /// Volatility-weighted index selection.
    Adaptive,
    /// Restrict to a visible index range, then Smart with a zoom-scaled
    /// budget.
    Zoom { visible: (usize, usize) },
}

/// Sampler parameters shared by all strategies.
#[derive(Debug, Clone, Copy)]
pub struct SamplerConfig {
    pub target_points: usize,
    /// Lower bound below which no sampling happens.
    pub min_points: usize,
    /// Keep the exact first and last input points.
    pub preserve_start_end: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            target_points: DEFAULT_TARGET_POINTS,
            min_points: 2,
            preserve_start_end: true,
        }
    }
}

/// Downsample a series to at most `max(target_points, min_points)` points.
/// A series already within budget is returned unchanged.
#[must_use]
pub fn sample<T: SamplePoint + Clone>(
    points: &[T],
    config: &SamplerConfig,
    strategy: SampleStrategy,
) -> Vec<T> {
    let budget = config.target_points.max(config.min_points);
    if points.len() <= budget {
        return points.to_vec();
    }

    let indices = match strategy {
        SampleStrategy::Lttb => lttb_indices(points, budget),
        SampleStrategy::Smart => smart_indices(points, budget, config.preserve_start_end),
        SampleStrategy::Adaptive => adaptive_indices(points, budget, config.preserve_start_end),
        SampleStrategy::Zoom { visible } => {
            return zoom_sample(points, config, visible);
        }
    };

    indices.into_iter().map(|i| points[i].clone()).collect()
}

/// Strategy auto-selection: small series pass through, a visible range picks
/// zoom sampling, volatile series get adaptive, very long series LTTB, and
/// everything else Smart.
#[must_use]
pub fn auto_sample<T: SamplePoint + Clone>(
    points: &[T],
    visible: Option<(usize, usize)>,
) -> Vec<T> {
    if points.len() <= NO_SAMPLING_THRESHOLD {
        return points.to_vec();
    }
    let config = SamplerConfig::default();

    if let Some(visible) = visible {
        return sample(points, &config, SampleStrategy::Zoom { visible });
    }

    if mean_abs_return(points) > VOLATILITY_THRESHOLD {
        let config = SamplerConfig {
            target_points: HIGH_VOLATILITY_TARGET,
            ..config
        };
        return sample(points, &config, SampleStrategy::Adaptive);
    }

    if points.len() > LTTB_THRESHOLD {
        sample(points, &config, SampleStrategy::Lttb)
    } else {
        sample(points, &config, SampleStrategy::Smart)
    }
}

fn mean_abs_return<T: SamplePoint>(points: &[T]) -> f64 {
    let mut sum = 0.0;
    let mut count = 0usize;
    for pair in points.windows(2) {
        let prev = pair[0].sample_value();
        if prev.abs() > f64::EPSILON {
            sum += (pair[1].sample_value() / prev - 1.0).abs();
            count += 1;
        }
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Triangle area via the shoelace formula.
#[inline]
fn triangle_area(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    ((ax - cx) * (by - ay) - (ax - bx) * (cy - ay)).abs() / 2.0
}

/// Largest-triangle-three-buckets index selection. Always keeps the first
/// and last point; the interior is divided into `target - 2` buckets and the
/// point with the largest triangle area against the previously selected
/// point and the next bucket's average is kept from each.
fn lttb_indices<T: SamplePoint>(points: &[T], target: usize) -> Vec<usize> {
    let len = points.len();
    if target >= len {
        return (0..len).collect();
    }
    if target < 3 {
        return vec![0, len - 1];
    }

    let bucket_count = target - 2;
    let every = (len - 2) as f64 / bucket_count as f64;

    let mut selected = Vec::with_capacity(target);
    selected.push(0);
    let mut anchor = 0usize;

    for bucket in 0..bucket_count {
        let range_start = (bucket as f64 * every).floor() as usize + 1;
        let range_end = (((bucket + 1) as f64 * every).floor() as usize + 1).min(len - 1);

        // Average of the following bucket is the third triangle vertex; the
        // final bucket uses the last point itself.
        let next_start = range_end;
        let next_end = (((bucket + 2) as f64 * every).floor() as usize + 1).min(len);
        let (avg_x, avg_y) = if next_start < next_end {
            let n = (next_end - next_start) as f64;
            let sum_x: f64 = (next_start..next_end).map(|i| points[i].sample_time()).sum();
            let sum_y: f64 = (next_start..next_end)
                .map(|i| points[i].sample_value())
                .sum();
            (sum_x / n, sum_y / n)
        } else {
            (
                points[len - 1].sample_time(),
                points[len - 1].sample_value(),
            )
        };

        let (ax, ay) = (points[anchor].sample_time(), points[anchor].sample_value());
        let mut best_idx = range_start;
        let mut best_area = -1.0;
        for i in range_start..range_end {
            let area = triangle_area(
                ax,
                ay,
                points[i].sample_time(),
                points[i].sample_value(),
                avg_x,
                avg_y,
            );
            if area > best_area {
                best_area = area;
                best_idx = i;
            }
        }

        selected.push(best_idx);
        anchor = best_idx;
    }

    selected.push(len - 1);
    selected
}

/// Detect strict local extrema, skipping [`EXTREMA_SKIP`] indices after each
/// hit to avoid adjacent duplicates.
fn local_extrema<T: SamplePoint>(points: &[T]) -> Vec<usize> {
    let mut extrema = Vec::new();
    let mut i = 1usize;
    while i + 1 < points.len() {
        let (prev, here, next) = (
            points[i - 1].sample_value(),
            points[i].sample_value(),
            points[i + 1].sample_value(),
        );
        if (here > prev && here > next) || (here < prev && here < next) {
            extrema.push(i);
            i += EXTREMA_SKIP + 1;
        } else {
            i += 1;
        }
    }
    extrema
}

/// Keep first/last and local extrema, then fill the remaining budget with
/// evenly spaced interior points, skipping any time already included.
fn smart_indices<T: SamplePoint>(points: &[T], target: usize, preserve_start_end: bool) -> Vec<usize> {
    let len = points.len();
    let mut selected: Vec<usize> = Vec::with_capacity(target);
    let mut seen: FxHashSet<u64> = FxHashSet::default();
    let push = |idx: usize, selected: &mut Vec<usize>, seen: &mut FxHashSet<u64>| {
        if seen.insert(points[idx].sample_time().to_bits()) {
            selected.push(idx);
        }
    };

    if preserve_start_end {
        push(0, &mut selected, &mut seen);
        push(len - 1, &mut selected, &mut seen);
    }

    let mut extrema = local_extrema(points);
    // An extrema surplus is thinned evenly so the budget still holds.
    let room = target.saturating_sub(selected.len());
    if extrema.len() > room && room > 0 {
        let step = extrema.len() as f64 / room as f64;
        extrema = (0..room)
            .map(|k| extrema[(k as f64 * step).floor() as usize])
            .collect();
    }
    for idx in extrema {
        if selected.len() >= target {
            break;
        }
        push(idx, &mut selected, &mut seen);
    }

    let remaining = target.saturating_sub(selected.len());
    if remaining > 0 {
        let step = len as f64 / (remaining + 1) as f64;
        for k in 1..=remaining {
            let idx = ((k as f64 * step) as usize).min(len - 1);
            push(idx, &mut selected, &mut seen);
        }
    }

    selected.sort_unstable();
    selected
}

/// Volatility-weighted selection: each index gets a weight of
/// `sqrt(normalized local stddev)` and an evenly spaced cumulative-weight
/// walk picks the indices.
fn adaptive_indices<T: SamplePoint>(
    points: &[T],
    target: usize,
    preserve_start_end: bool,
) -> Vec<usize> {
    let len = points.len();

    let mut weights = Vec::with_capacity(len);
    let mut max_sd = 0.0f64;
    for i in 0..len {
        let lo = i.saturating_sub(VOLATILITY_WINDOW);
        let hi = (i + VOLATILITY_WINDOW + 1).min(len);
        let n = (hi - lo) as f64;
        let mean = (lo..hi).map(|j| points[j].sample_value()).sum::<f64>() / n;
        let variance = (lo..hi)
            .map(|j| (points[j].sample_value() - mean).powi(2))
            .sum::<f64>()
            / n;
        let sd = variance.sqrt();
        max_sd = max_sd.max(sd);
        weights.push(sd);
    }
    for w in &mut weights {
        *w = if max_sd > 0.0 {
            (*w / max_sd).sqrt()
        } else {
            1.0
        };
    }

    let mut cumulative = Vec::with_capacity(len);
    let mut total = 0.0;
    for w in &weights {
        total += w;
        cumulative.push(total);
    }

    let mut selected = Vec::with_capacity(target);
    let mut seen: FxHashSet<u64> = FxHashSet::default();
    if preserve_start_end {
        seen.insert(points[0].sample_time().to_bits());
        selected.push(0);
        seen.insert(points[len - 1].sample_time().to_bits());
        selected.push(len - 1);
    }

    let walk = target.saturating_sub(selected.len());
    let mut cursor = 0usize;
    for k in 0..walk {
        let threshold = (k as f64 + 0.5) / walk as f64 * total;
        while cursor + 1 < len && cumulative[cursor] < threshold {
            cursor += 1;
        }
        if seen.insert(points[cursor].sample_time().to_bits()) {
            selected.push(cursor);
        }
    }

    selected.sort_unstable();
    selected
}

/// Restrict to the visible index range and run Smart sampling with a budget
/// that grows as the visible window shrinks relative to the whole series.
fn zoom_sample<T: SamplePoint + Clone>(
    points: &[T],
    config: &SamplerConfig,
    visible: (usize, usize),
) -> Vec<T> {
    let len = points.len();
    let start = visible.0.min(len - 1);
    let end = visible.1.min(len - 1).max(start);
    let slice = &points[start..=end];

    let zoom_factor = len as f64 / slice.len() as f64;
    let budget = ((config.target_points as f64 * zoom_factor.sqrt()) as usize)
        .min(slice.len())
        .max(config.min_points);

    if slice.len() <= budget {
        return slice.to_vec();
    }

    smart_indices(slice, budget, config.preserve_start_end)
        .into_iter()
        .map(|i| slice[i].clone())
        .collect()
}
