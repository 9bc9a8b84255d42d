//! Tests for the attribution engine
//!
//! These tests verify that:
//! - Degenerate inputs (empty, constant, no losses) map to documented defaults
//! - Each ratio matches a hand-computed value
//! - The risk-free rate is de-annualized over 252 trading days
//! - Mismatched series are rejected instead of truncated

use crate::attribution::{AttributionResult, compute_attribution};
use crate::error::ValidationError;

/// Portfolio with two losing periods and a benchmark moving exactly half as much
fn half_beta_pair() -> (Vec<f64>, Vec<f64>) {
    let portfolio = vec![0.02, -0.01, 0.03, -0.02];
    let benchmark = portfolio.iter().map(|r| r * 0.5).collect();
    (portfolio, benchmark)
}

#[test]
fn test_empty_series_is_all_zero() {
    let result = compute_attribution(&[], &[], 6.5).unwrap();
    assert_eq!(result, AttributionResult::default());
    assert_eq!(result.beta, 0.0);
    assert_eq!(result.sharpe_ratio, 0.0);
}

#[test]
fn test_constant_returns_zero_ratios() {
    let portfolio = [0.01, 0.01, 0.01, 0.01];
    let benchmark = [0.005, 0.01, -0.002, 0.003];
    let result = compute_attribution(&portfolio, &benchmark, 5.0).unwrap();

    assert_eq!(result.sharpe_ratio, 0.0);
    // no losing periods
    assert_eq!(result.sortino_ratio, 0.0);
    assert_eq!(result.volatility, 0.0);
    assert_eq!(result.max_drawdown, 0.0);
    assert_eq!(result.calmar_ratio, 0.0);
}

#[test]
fn test_constant_benchmark_beta_is_one() {
    let portfolio = [0.02, -0.01, 0.015, 0.0];
    let benchmark = [0.01, 0.01, 0.01, 0.01];
    let result = compute_attribution(&portfolio, &benchmark, 0.0).unwrap();
    assert_eq!(result.beta, 1.0);
}

#[test]
fn test_hand_computed_ratios() {
    let (portfolio, benchmark) = half_beta_pair();
    let result = compute_attribution(&portfolio, &benchmark, 0.0).unwrap();

    // mean 0.005, population stdev sqrt(0.000425) = 0.020616
    assert_eq!(result.volatility, 2.06);
    assert_eq!(result.sharpe_ratio, 0.24);
    // downside deviation sqrt((0.0001 + 0.0004) / 2) = 0.015811
    assert_eq!(result.sortino_ratio, 0.32);
    assert_eq!(result.beta, 2.0);
    // portfolio return fully explained by 2x benchmark
    assert_eq!(result.alpha, 0.0);
    // active return 0.0025 over tracking error sqrt(0.0001125)
    assert_eq!(result.information_ratio, 0.24);
    // peak 1.040094 -> 1.019292
    assert_eq!(result.max_drawdown, 2.0);
    // 0.005 * 252
    assert_eq!(result.returns, 126.0);
    assert_eq!(result.calmar_ratio, 63.0);
}

#[test]
fn test_risk_free_rate_reduces_excess_return() {
    let (portfolio, benchmark) = half_beta_pair();
    // 25.2% annual = 0.1% per trading day
    let result = compute_attribution(&portfolio, &benchmark, 25.2).unwrap();

    // (0.005 - 0.001) / 0.020616
    assert_eq!(result.sharpe_ratio, 0.19);
    // (0.005 - 0.001) / 0.015811
    assert_eq!(result.sortino_ratio, 0.25);
    // alpha = 0.005 - (0.001 + 2 * (0.0025 - 0.001)) = 0.001
    assert_eq!(result.alpha, 0.1);
    // unaffected by the risk-free rate
    assert_eq!(result.information_ratio, 0.24);
    assert_eq!(result.beta, 2.0);
}

#[test]
fn test_outperformance_gives_positive_alpha() {
    let benchmark = vec![0.01, -0.02, 0.015, -0.005, 0.02];
    let portfolio: Vec<f64> = benchmark.iter().map(|r| r + 0.001).collect();
    let result = compute_attribution(&portfolio, &benchmark, 0.0).unwrap();

    assert_eq!(result.beta, 1.0);
    assert_eq!(result.alpha, 0.1);
    // constant active return: tracking error equals the active return
    assert_eq!(result.information_ratio, 1.0);
}

#[test]
fn test_mismatched_lengths_fail_fast() {
    let err = compute_attribution(&[0.01, 0.02, 0.03], &[0.01, 0.02], 4.0).unwrap_err();
    assert_eq!(
        err,
        ValidationError::LengthMismatch {
            portfolio: 3,
            benchmark: 2
        }
    );

    assert!(compute_attribution(&[], &[0.01], 4.0).is_err());
}
