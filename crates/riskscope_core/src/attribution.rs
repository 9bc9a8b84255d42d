//! Risk-adjusted performance attribution of a portfolio against a benchmark.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ValidationError;
use crate::stats::{
    TRADING_DAYS_PER_YEAR, covariance, downside_deviation, is_effectively_zero, max_drawdown,
    mean, population_variance, round2, std_dev, tracking_error,
};

/// Risk-adjusted metrics bundle.
///
/// `alpha`, `max_drawdown`, `volatility` and `returns` are percentages
/// (fraction x 100); the ratios and `beta` are raw values. Every field is
/// rounded to 2 decimals. `Default` is the all-zero result reported for an
/// empty series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributionResult {
    pub sharpe_ratio: f64,
    pub sortino_ratio: f64,
    /// Per-period Jensen's alpha, percent
    pub alpha: f64,
    pub beta: f64,
    pub information_ratio: f64,
    /// Largest peak-to-trough decline, percent (>= 0)
    pub max_drawdown: f64,
    pub calmar_ratio: f64,
    /// Per-period population standard deviation, percent
    pub volatility: f64,
    /// Annualized arithmetic return (mean x 252), percent
    pub returns: f64,
}

/// Convert an annual risk-free rate in percent to a per-trading-day fraction
#[inline]
#[must_use]
pub fn daily_risk_free_rate(annual_pct: f64) -> f64 {
    annual_pct / 100.0 / TRADING_DAYS_PER_YEAR
}

/// Compute the attribution bundle for aligned portfolio and benchmark returns.
///
/// Both series must have the same length; a mismatch is rejected instead of
/// silently truncating to the shorter series. Degenerate inputs (empty
/// series, zero variance, no losing periods) map to documented defaults:
/// all-zero result for empty input, ratio 0 when its denominator is 0, and
/// beta 1 when the benchmark has no variance.
pub fn compute_attribution(
    portfolio: &[f64],
    benchmark: &[f64],
    risk_free_rate_annual_pct: f64,
) -> Result<AttributionResult, ValidationError> {
    if portfolio.len() != benchmark.len() {
        return Err(ValidationError::LengthMismatch {
            portfolio: portfolio.len(),
            benchmark: benchmark.len(),
        });
    }
    if portfolio.is_empty() {
        return Ok(AttributionResult::default());
    }

    let daily_rf = daily_risk_free_rate(risk_free_rate_annual_pct);
    let mean_portfolio = mean(portfolio);
    let mean_benchmark = mean(benchmark);
    let excess_return = mean_portfolio - daily_rf;

    let volatility = std_dev(portfolio);
    let sharpe_ratio = ratio_or_zero(excess_return, volatility);

    let sortino_ratio = downside_deviation(portfolio)
        .map_or(0.0, |deviation| ratio_or_zero(excess_return, deviation));

    let beta = beta(portfolio, benchmark);
    let alpha = mean_portfolio - (daily_rf + beta * (mean_benchmark - daily_rf));

    let information_ratio = ratio_or_zero(
        mean_portfolio - mean_benchmark,
        tracking_error(portfolio, benchmark),
    );

    let drawdown = max_drawdown(portfolio);
    let annualized_return = mean_portfolio * TRADING_DAYS_PER_YEAR;
    let calmar_ratio = ratio_or_zero(annualized_return, drawdown);

    let result = AttributionResult {
        sharpe_ratio: round2(sharpe_ratio),
        sortino_ratio: round2(sortino_ratio),
        alpha: round2(alpha * 100.0),
        beta: round2(beta),
        information_ratio: round2(information_ratio),
        max_drawdown: round2(drawdown * 100.0),
        calmar_ratio: round2(calmar_ratio),
        volatility: round2(volatility * 100.0),
        returns: round2(annualized_return * 100.0),
    };

    debug!(periods = portfolio.len(), ?result, "computed attribution");
    Ok(result)
}

/// `cov(p, b) / var(b)`, falling back to 1.0 when the benchmark is flat
fn beta(portfolio: &[f64], benchmark: &[f64]) -> f64 {
    let benchmark_variance = population_variance(benchmark);
    if is_effectively_zero(benchmark_variance.sqrt()) {
        1.0
    } else {
        covariance(portfolio, benchmark) / benchmark_variance
    }
}

#[inline]
fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if is_effectively_zero(denominator) {
        0.0
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_daily_risk_free_rate() {
        assert!((daily_risk_free_rate(25.2) - 0.001).abs() < 1e-15);
        assert_eq!(daily_risk_free_rate(0.0), 0.0);
    }

    #[test]
    fn test_ratio_or_zero() {
        assert_eq!(ratio_or_zero(1.0, 0.0), 0.0);
        assert_eq!(ratio_or_zero(1.0, 1e-14), 0.0);
        assert_eq!(ratio_or_zero(1.0, 4.0), 0.25);
    }

    #[test]
    fn test_beta_of_identical_series_is_one() {
        let series = [0.01, -0.02, 0.015, 0.003];
        assert!((beta(&series, &series) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_beta_of_scaled_series() {
        let benchmark = [0.01, -0.02, 0.015, 0.003];
        let portfolio: Vec<f64> = benchmark.iter().map(|r| r * 2.0).collect();
        assert!((beta(&portfolio, &benchmark) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let err = compute_attribution(&[0.01, 0.02], &[0.01], 5.0).unwrap_err();
        assert_eq!(
            err,
            ValidationError::LengthMismatch {
                portfolio: 2,
                benchmark: 1
            }
        );
    }
}
