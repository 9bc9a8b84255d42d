//! Statistics kernel shared by the analytics engines.
//!
//! All functions are total: empty input yields 0.0 (or `None` where the
//! quantity has no meaningful default) rather than NaN or a panic.
//! Variances are population variances (divide by `n`, not `n - 1`).

use serde::{Deserialize, Serialize};

/// Trading days per year used to annualize daily figures
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Deviations at or below this magnitude are treated as zero.
///
/// A constant series rarely has a bit-exact floating-point mean, so its
/// computed deviation is a tiny positive number instead of 0.0.
pub const ZERO_TOLERANCE: f64 = 1e-12;

#[inline]
#[must_use]
pub fn is_effectively_zero(value: f64) -> bool {
    value.abs() <= ZERO_TOLERANCE
}

/// Arithmetic mean, 0.0 for an empty slice
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[must_use]
pub fn population_variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64
}

#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    population_variance(values).sqrt()
}

/// Population covariance of two aligned series.
///
/// Only the common prefix is used; callers validate equal length first.
#[must_use]
pub fn covariance(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let (a, b) = (&a[..n], &b[..n]);
    let mean_a = mean(a);
    let mean_b = mean(b);
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - mean_a) * (y - mean_b))
        .sum::<f64>()
        / n as f64
}

/// Root mean square of the negative returns, taken over the downside count.
///
/// Returns `None` when there are no negative observations.
#[must_use]
pub fn downside_deviation(values: &[f64]) -> Option<f64> {
    let (sum_sq, count) = values
        .iter()
        .filter(|r| **r < 0.0)
        .fold((0.0, 0usize), |(sum, n), r| (sum + r * r, n + 1));
    if count == 0 {
        None
    } else {
        Some((sum_sq / count as f64).sqrt())
    }
}

/// Root mean square of the period-by-period active return `a_i - b_i`
#[must_use]
pub fn tracking_error(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }
    let sum_sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (sum_sq / n as f64).sqrt()
}

/// Compounded value path starting from 1.0: `v_i = prod_{j <= i} (1 + r_j)`
#[must_use]
pub fn compound_path(returns: &[f64]) -> Vec<f64> {
    returns
        .iter()
        .scan(1.0, |value, r| {
            *value *= 1.0 + r;
            Some(*value)
        })
        .collect()
}

/// Largest peak-to-trough decline of the compounded path, as a fraction.
///
/// The path starts at 1.0 and that starting value counts as the first peak,
/// so a first-period loss is a drawdown. Always >= 0.
#[must_use]
pub fn max_drawdown(returns: &[f64]) -> f64 {
    let mut peak = 1.0_f64;
    let mut max_drawdown = 0.0_f64;

    for value in compound_path(returns) {
        if value > peak {
            peak = value;
        }
        if peak > 0.0 {
            let drawdown = (peak - value) / peak;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
        }
    }

    max_drawdown
}

/// Index of percentile `p` (0..=1) in a sorted sample of length `len`:
/// `floor(len * p)`, clamped to the last element
#[inline]
#[must_use]
pub fn percentile_index(len: usize, p: f64) -> usize {
    if len == 0 {
        return 0;
    }
    let idx = (len as f64 * p.clamp(0.0, 1.0)).floor() as usize;
    idx.min(len - 1)
}

/// Percentile by sorted index. `sorted` must be in ascending order.
#[must_use]
pub fn percentile(sorted: &[f64], p: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    Some(sorted[percentile_index(sorted.len(), p)])
}

/// Round to `decimals` places, ties away from zero (`f64::round`).
///
/// Negative ties therefore move down: -0.125 becomes -0.13, not the -0.12
/// a round-half-up rule would give.
#[inline]
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[inline]
#[must_use]
pub fn round2(value: f64) -> f64 {
    round_to(value, 2)
}

/// Descriptive statistics of a return series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReturnSummary {
    pub arithmetic_mean: f64,
    /// `(prod(1 + r))^(1/n) - 1`
    pub geometric_mean: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
}

impl ReturnSummary {
    /// Summarize a return series, `None` when it is empty
    #[must_use]
    pub fn from_returns(returns: &[f64]) -> Option<Self> {
        if returns.is_empty() {
            return None;
        }
        let n = returns.len() as f64;
        let growth: f64 = returns.iter().map(|r| 1.0 + r).product();

        Some(Self {
            arithmetic_mean: mean(returns),
            geometric_mean: growth.powf(1.0 / n) - 1.0,
            std_dev: std_dev(returns),
            min: returns.iter().copied().fold(f64::INFINITY, f64::min),
            max: returns.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            count: returns.len(),
        })
    }
}
