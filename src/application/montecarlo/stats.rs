//! Order-independent statistics over the feasible-scenario set.

use std::cmp::Ordering;

use crate::domain::limits::SENSITIVITY_TOP;
use crate::domain::{Distribution, Sensitivity, Signal};

/// Share of the distribution treated as the loss tail for CVaR.
pub const TAIL_FRACTION: f64 = 0.05;

/// Guards the percentile rank against `p * n` landing a hair above an integer.
const RANK_EPSILON: f64 = 1e-9;

#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation.
#[must_use]
pub fn stddev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Value at index `ceil(p * n) - 1` of an ascending slice, clamped to range.
///
/// Returns `0.0` for an empty slice.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return 0.0;
    };
    let rank = (p * sorted.len() as f64 - RANK_EPSILON).ceil();
    // Negative ranks saturate to 0 in the cast.
    let index = (rank as usize).saturating_sub(1).min(last);
    sorted[index]
}

/// Sort a copy of `values` ascending.
#[must_use]
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Summary statistics of `values`. All zero when `values` is empty.
#[must_use]
pub fn summarize(values: &[f64]) -> Distribution {
    let sorted = sorted(values);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Distribution::default();
    };
    Distribution {
        mean: mean(values),
        stddev: stddev(values),
        p5: percentile(&sorted, 0.05),
        p25: percentile(&sorted, 0.25),
        p50: percentile(&sorted, 0.50),
        p75: percentile(&sorted, 0.75),
        p95: percentile(&sorted, 0.95),
        min,
        max,
    }
}

/// Mean of the lowest `ceil(fraction * n)` values of an ascending slice.
#[must_use]
pub fn tail_mean(sorted: &[f64], fraction: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let count = ((fraction * sorted.len() as f64 - RANK_EPSILON).ceil() as usize)
        .clamp(1, sorted.len());
    mean(&sorted[..count])
}

/// Pearson correlation coefficient of two equal-length series.
///
/// `None` when either series is constant or the result is not finite.
#[must_use]
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 || is_constant(xs) || is_constant(ys) {
        return None;
    }
    let mx = mean(xs);
    let my = mean(ys);
    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mx;
        let dy = y - my;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }
    let r = sxy / (sxx * syy).sqrt();
    r.is_finite().then(|| r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Rank input variables by |correlation| with `metrics`, strongest first.
///
/// `samples[s]` is the variable vector of scenario `s`, parallel to
/// `metrics`. Variables without variance are left out. Ties keep variable
/// order.
#[must_use]
pub fn rank_sensitivities(
    samples: &[Vec<f64>],
    metrics: &[f64],
    n_vars: usize,
) -> Vec<Sensitivity> {
    let mut column = Vec::with_capacity(samples.len());
    let mut ranked: Vec<Sensitivity> = (0..n_vars)
        .filter_map(|var| {
            column.clear();
            column.extend(samples.iter().map(|sample| sample[var]));
            pearson(&column, metrics).map(|correlation| Sensitivity {
                var: var as u8,
                correlation,
            })
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.correlation
            .abs()
            .partial_cmp(&a.correlation.abs())
            .unwrap_or(Ordering::Equal)
    });
    ranked.truncate(SENSITIVITY_TOP);
    ranked
}

/// Desk decision signal from the profit distribution.
#[must_use]
pub fn classify(profit: &Distribution, n_feasible: u32, n_infeasible: u32) -> Signal {
    if n_feasible == 0 || n_infeasible > n_feasible {
        return Signal::NoGo;
    }
    if profit.p5 > 0.0 {
        Signal::StrongGo
    } else if profit.p25 > 0.0 {
        Signal::Go
    } else if profit.p50 > 0.0 {
        if profit.p50 >= 0.25 * profit.stddev {
            Signal::Cautious
        } else {
            Signal::Weak
        }
    } else {
        Signal::NoGo
    }
}
