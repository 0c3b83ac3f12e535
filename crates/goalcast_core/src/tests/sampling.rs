//! Tests for the downsampling strategies and auto-selection.

use super::investment_series;
use crate::model::ProjectionPoint;
use crate::sampling::{
    DEFAULT_TARGET_POINTS, SamplePoint, SampleStrategy, SamplerConfig, auto_sample, sample,
};

fn ramp(len: usize) -> Vec<ProjectionPoint> {
    let values: Vec<f64> = (0..len).map(|i| 1_000.0 + i as f64).collect();
    investment_series(&values)
}

/// Linear ramp with one dominant spike.
fn ramp_with_spike(len: usize, spike_at: usize) -> Vec<ProjectionPoint> {
    let values: Vec<f64> = (0..len)
        .map(|i| {
            if i == spike_at {
                100_000.0
            } else {
                1_000.0 + i as f64
            }
        })
        .collect();
    investment_series(&values)
}

fn times(points: &[ProjectionPoint]) -> Vec<f64> {
    points.iter().map(SamplePoint::sample_time).collect()
}

#[test]
fn test_series_within_budget_passes_through() {
    let points = ramp(100);
    let sampled = sample(&points, &SamplerConfig::default(), SampleStrategy::Lttb);
    assert_eq!(sampled, points);
}

#[test]
fn test_lttb_hits_target_and_keeps_endpoints() {
    let points = ramp(1_000);
    let sampled = sample(&points, &SamplerConfig::default(), SampleStrategy::Lttb);

    assert_eq!(sampled.len(), DEFAULT_TARGET_POINTS);
    assert_eq!(sampled.first(), points.first());
    assert_eq!(sampled.last(), points.last());
}

#[test]
fn test_lttb_keeps_dominant_spike() {
    let points = ramp_with_spike(500, 250);
    let sampled = sample(&points, &SamplerConfig::default(), SampleStrategy::Lttb);
    assert!(sampled.iter().any(|p| p.value == 100_000.0));
}

#[test]
fn test_lttb_degenerate_target_keeps_endpoints_only() {
    let points = ramp(50);
    let config = SamplerConfig {
        target_points: 2,
        min_points: 2,
        ..SamplerConfig::default()
    };
    let sampled = sample(&points, &config, SampleStrategy::Lttb);
    assert_eq!(sampled.len(), 2);
    assert_eq!(sampled[0], points[0]);
    assert_eq!(sampled[1], points[points.len() - 1]);
}

#[test]
fn test_smart_within_budget_sorted_unique() {
    let points = ramp(1_000);
    let sampled = sample(&points, &SamplerConfig::default(), SampleStrategy::Smart);

    assert!(sampled.len() <= DEFAULT_TARGET_POINTS);
    assert_eq!(sampled.first(), points.first());
    assert_eq!(sampled.last(), points.last());
    let ts = times(&sampled);
    for pair in ts.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_smart_keeps_local_extremum() {
    let points = ramp_with_spike(400, 200);
    let config = SamplerConfig {
        target_points: 50,
        ..SamplerConfig::default()
    };
    let sampled = sample(&points, &config, SampleStrategy::Smart);
    assert!(sampled.len() <= 50);
    assert!(sampled.iter().any(|p| p.value == 100_000.0));
}

#[test]
fn test_adaptive_flat_series_spreads_evenly() {
    let points = investment_series(&vec![1_000.0; 400]);
    let config = SamplerConfig {
        target_points: 100,
        ..SamplerConfig::default()
    };
    let sampled = sample(&points, &config, SampleStrategy::Adaptive);

    assert!(sampled.len() <= 100);
    assert!(sampled.len() >= 2);
    let ts = times(&sampled);
    for pair in ts.windows(2) {
        assert!(pair[0] < pair[1]);
    }
}

#[test]
fn test_adaptive_concentrates_on_volatile_region() {
    // Flat first half, zigzag second half.
    let values: Vec<f64> = (0..400)
        .map(|i| {
            if i < 200 {
                1_000.0
            } else if i % 2 == 0 {
                1_500.0
            } else {
                500.0
            }
        })
        .collect();
    let points = investment_series(&values);
    let config = SamplerConfig {
        target_points: 100,
        ..SamplerConfig::default()
    };
    let sampled = sample(&points, &config, SampleStrategy::Adaptive);

    let pivot = points[200].sample_time();
    let volatile = sampled.iter().filter(|p| p.sample_time() >= pivot).count();
    let flat = sampled.len() - volatile;
    assert!(volatile > flat, "volatile {volatile} <= flat {flat}");
}

#[test]
fn test_zoom_wide_budget_returns_visible_slice() {
    let points = ramp(1_000);
    let sampled = sample(
        &points,
        &SamplerConfig::default(),
        SampleStrategy::Zoom {
            visible: (100, 300),
        },
    );
    assert_eq!(sampled, points[100..=300].to_vec());
}

#[test]
fn test_zoom_tight_budget_samples_visible_slice() {
    let points = ramp(1_000);
    let config = SamplerConfig {
        target_points: 50,
        ..SamplerConfig::default()
    };
    let sampled = sample(
        &points,
        &config,
        SampleStrategy::Zoom {
            visible: (100, 300),
        },
    );

    // Budget scales with sqrt(1000 / 201), so about 111 points.
    assert!(sampled.len() < 201);
    assert_eq!(sampled.first(), Some(&points[100]));
    assert_eq!(sampled.last(), Some(&points[300]));
}

#[test]
fn test_zoom_range_clamped_to_series() {
    let points = ramp(500);
    let sampled = sample(
        &points,
        &SamplerConfig::default(),
        SampleStrategy::Zoom {
            visible: (450, 9_999),
        },
    );
    assert_eq!(sampled, points[450..].to_vec());
}

#[test]
fn test_auto_sample_short_series_untouched() {
    let points = ramp(300);
    assert_eq!(auto_sample(&points, None), points);
}

#[test]
fn test_auto_sample_long_series_uses_budget() {
    let points = ramp(1_500);
    let sampled = auto_sample(&points, None);
    assert_eq!(sampled.len(), DEFAULT_TARGET_POINTS);
}

#[test]
fn test_auto_sample_calm_mid_length_series() {
    // Above the pass-through threshold but below the long-series cutoff, with
    // per-month moves well under the volatility threshold.
    let points = ramp(600);
    let sampled = auto_sample(&points, None);

    assert!(sampled.len() <= DEFAULT_TARGET_POINTS);
    assert_eq!(sampled.first(), points.first());
    assert_eq!(sampled.last(), points.last());
}

#[test]
fn test_auto_sample_visible_range_zooms() {
    let points = ramp(1_500);
    let sampled = auto_sample(&points, Some((0, 99)));
    assert_eq!(sampled.first(), points.first());
    assert_eq!(sampled.last(), Some(&points[99]));
}

#[test]
fn test_auto_sample_volatile_series_goes_adaptive() {
    let values: Vec<f64> = (0..600)
        .map(|i| if i % 2 == 0 { 1_500.0 } else { 500.0 })
        .collect();
    let points = investment_series(&values);
    let sampled = auto_sample(&points, None);

    assert!(!sampled.is_empty());
    assert!(sampled.len() <= 400);
    assert_eq!(sampled.first(), points.first());
    assert_eq!(sampled.last(), points.last());
}

#[test]
fn test_date_tuple_points_sample() {
    let start = jiff::civil::date(2024, 1, 1);
    let points: Vec<(jiff::civil::Date, f64)> = (0..500)
        .map(|i| (start + jiff::Span::new().days(i), 1_000.0 + f64::from(i)))
        .collect();

    assert_eq!(points[1].sample_time() - points[0].sample_time(), 1.0);

    let config = SamplerConfig {
        target_points: 100,
        ..SamplerConfig::default()
    };
    let sampled = sample(&points, &config, SampleStrategy::Lttb);
    assert_eq!(sampled.len(), 100);
    assert_eq!(sampled[0], points[0]);
    assert_eq!(sampled[99], points[499]);
}
