//! Statistical risk measures over a projection series.
//!
//! All measures work on investment-only monthly returns: the contribution
//! stream is subtracted out before returns are computed, so deposits don't
//! masquerade as performance. Every routine is total; degenerate inputs
//! (short series, zero variance, non-positive denominators) resolve to 0.

use rustc_hash::FxHashMap;

use crate::model::{
    DrawdownPeriod, ProjectionPoint, RiskAnalysisResult, RiskMetrics, RiskRating, RollingReturns,
};

/// Default annual risk-free rate for Sharpe/Sortino.
pub const DEFAULT_RISK_FREE_RATE: f64 = 0.02;

/// Default confidence level for Value-at-Risk.
pub const DEFAULT_VAR_CONFIDENCE: f64 = 0.95;

/// A drawdown episode closes once the series recovers to within this
/// fraction of the prior peak.
const RECOVERY_BAND: f64 = 0.01;

/// Analyze a projection series with the default VaR confidence level.
#[must_use]
pub fn analyze(projection: &[ProjectionPoint], risk_free_rate: f64) -> RiskAnalysisResult {
    analyze_with_confidence(projection, risk_free_rate, DEFAULT_VAR_CONFIDENCE)
}

/// Analyze a projection series: risk metrics, drawdown episodes and a
/// risk-adjusted variant of the projection.
#[must_use]
pub fn analyze_with_confidence(
    projection: &[ProjectionPoint],
    risk_free_rate: f64,
    var_confidence: f64,
) -> RiskAnalysisResult {
    let returns = monthly_returns(projection);
    let volatility = std_dev(&returns);
    let sharpe = sharpe_ratio(&returns, risk_free_rate);
    let sortino = sortino_ratio(&returns, risk_free_rate);
    let (max_drawdown, drawdown_periods) = drawdowns(projection);
    let latest_value = projection.last().map_or(0.0, |p| p.value);
    let (value_at_risk, conditional_var) = value_at_risk(&returns, var_confidence, latest_value);

    let composite_score = composite_score(volatility, max_drawdown, sharpe);
    let metrics = RiskMetrics {
        sharpe_ratio: sharpe,
        sortino_ratio: sortino,
        max_drawdown,
        volatility,
        rolling_returns: rolling_returns(projection),
        value_at_risk,
        conditional_var,
        composite_score,
        rating: RiskRating::from_score(composite_score),
    };

    RiskAnalysisResult {
        metrics,
        risk_adjusted_projection: risk_adjusted(projection, volatility),
        drawdown_periods,
    }
}

/// Investment-only monthly returns between adjacent points. A non-positive
/// starting investment value yields a 0 return for that month.
#[must_use]
pub fn monthly_returns(projection: &[ProjectionPoint]) -> Vec<f64> {
    projection
        .windows(2)
        .map(|pair| {
            let prev = pair[0].investment_value();
            let next = pair[1].investment_value();
            if prev <= 0.0 { 0.0 } else { (next - prev) / prev }
        })
        .collect()
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Sharpe ratio over monthly returns; exactly 0 when the return series has
/// no variance.
#[must_use]
pub fn sharpe_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let sd = std_dev(returns);
    if sd == 0.0 {
        0.0
    } else {
        (mean(returns) - risk_free_rate / 12.0) / sd
    }
}

/// Sortino ratio: Sharpe numerator over the downside deviation (root mean
/// square of the negative returns). 0 when there are no negative returns.
#[must_use]
pub fn sortino_ratio(returns: &[f64], risk_free_rate: f64) -> f64 {
    let downside: Vec<f64> = returns.iter().copied().filter(|r| *r < 0.0).collect();
    if downside.is_empty() {
        return 0.0;
    }
    let downside_deviation =
        (downside.iter().map(|r| r * r).sum::<f64>() / downside.len() as f64).sqrt();
    if downside_deviation == 0.0 {
        0.0
    } else {
        (mean(returns) - risk_free_rate / 12.0) / downside_deviation
    }
}

/// Max drawdown and the list of drawdown episodes.
///
/// Any decline below the running peak counts toward the max drawdown; the
/// [`RECOVERY_BAND`] governs episodes only. An episode closes once the value
/// recovers to within the band of the prior peak, after which peak tracking
/// restarts. An episode still open at the end of the series is reported
/// without a recovery date.
fn drawdowns(projection: &[ProjectionPoint]) -> (f64, Vec<DrawdownPeriod>) {
    let Some(first) = projection.first() else {
        return (0.0, Vec::new());
    };

    let mut peak = first.value;
    let mut max_drawdown = 0.0;
    let mut periods = Vec::new();
    let mut open: Option<DrawdownPeriod> = None;

    for point in &projection[1..] {
        if peak > 0.0 && point.value < peak {
            let depth = (peak - point.value) / peak;
            if depth > max_drawdown {
                max_drawdown = depth;
            }
        }
        if peak > 0.0 && point.value < peak * (1.0 - RECOVERY_BAND) {
            let depth = (peak - point.value) / peak;
            match &mut open {
                None => {
                    open = Some(DrawdownPeriod {
                        start: point.date.clone(),
                        trough: point.date.clone(),
                        recovery: None,
                        depth,
                    });
                }
                Some(episode) if depth > episode.depth => {
                    episode.trough = point.date.clone();
                    episode.depth = depth;
                }
                Some(_) => {}
            }
        } else {
            // Recovered to within the band of the prior peak.
            if let Some(mut episode) = open.take() {
                episode.recovery = Some(point.date.clone());
                periods.push(episode);
            }
            if point.value > peak {
                peak = point.value;
            }
        }
    }

    if let Some(episode) = open {
        periods.push(episode);
    }

    (max_drawdown, periods)
}

/// Rolling 1/3/5-year investment-only returns keyed by window-end date.
/// Multi-year windows are annualized via `(1 + total)^(1/years) - 1`.
fn rolling_returns(projection: &[ProjectionPoint]) -> RollingReturns {
    let window_return = |window_months: usize, years: f64| -> FxHashMap<String, f64> {
        let mut out = FxHashMap::default();
        if projection.len() <= window_months {
            return out;
        }
        for i in window_months..projection.len() {
            let start = projection[i - window_months].investment_value();
            let end = projection[i].investment_value();
            if start <= 0.0 {
                continue;
            }
            let total = end / start - 1.0;
            let annualized = if years > 1.0 {
                (1.0 + total).powf(1.0 / years) - 1.0
            } else {
                total
            };
            out.insert(projection[i].date.clone(), annualized);
        }
        out
    };

    RollingReturns {
        one_year: window_return(12, 1.0),
        three_year: window_return(36, 3.0),
        five_year: window_return(60, 5.0),
    }
}

/// Historical VaR and CVaR at the given confidence level, scaled by the
/// latest portfolio value. Both are 0 for an empty return series.
#[must_use]
pub fn value_at_risk(returns: &[f64], confidence: f64, latest_value: f64) -> (f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0);
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);

    let idx = ((sorted.len() as f64 * (1.0 - confidence)).floor() as usize).min(sorted.len() - 1);
    let var = sorted[idx] * latest_value;
    let tail = &sorted[..=idx];
    let cvar = tail.iter().sum::<f64>() / tail.len() as f64 * latest_value;
    (var, cvar)
}

/// Composite risk score: volatility and drawdown in percent, plus a penalty
/// for a weak Sharpe ratio.
fn composite_score(volatility: f64, max_drawdown: f64, sharpe: f64) -> f64 {
    0.4 * (volatility * 100.0) + 0.4 * (max_drawdown * 100.0) + 20.0 * (5.0 - sharpe.min(5.0))
}

/// One-sigma haircut of the investment component: uncertainty grows with the
/// square root of elapsed months, mirroring the GBM model the simulator uses.
/// The contribution principal is left untouched.
fn risk_adjusted(projection: &[ProjectionPoint], volatility: f64) -> Vec<ProjectionPoint> {
    projection
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let factor = (1.0 - volatility * (i as f64).sqrt()).max(0.0);
            let adjusted = point.cumulative_contributions + point.investment_value() * factor;
            let mut out = point.clone();
            out.value = adjusted.round();
            out.cumulative_returns = out.value - out.principal;
            out
        })
        .collect()
}
