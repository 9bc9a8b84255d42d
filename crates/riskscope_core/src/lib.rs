//! Portfolio risk and scenario analytics library
//!
//! This crate provides four independent, pure engines:
//! - Risk-adjusted performance attribution (Sharpe, Sortino, alpha, beta,
//!   information ratio, max drawdown, Calmar) from aligned return series
//! - Monte Carlo projection of terminal portfolio value with percentile bands
//!   and labeled narrative scenarios
//! - Allocation-weighted stress testing against named market shocks
//! - Factor attribution (currently a fixed illustrative split)
//!
//! Engines do not fetch data, persist results or call each other.
//!
//! ```ignore
//! use riskscope_core::simulation::{SimulationConfig, run_monte_carlo_seeded};
//!
//! let config = SimulationConfig {
//!     current_value: 1_000_000.0,
//!     expected_return: 0.12,
//!     volatility: 0.18,
//!     time_horizon: 10,
//!     ..Default::default()
//! };
//! let outcome = run_monte_carlo_seeded(&config, 42)?;
//! println!("median: {:.0}", outcome.confidence_intervals.p50);
//! ```

#![warn(clippy::all)]

// ============================================================================
// Engines
// ============================================================================

pub mod attribution;
pub mod factors;
pub mod simulation;
pub mod stress;

// ============================================================================
// Shared building blocks
// ============================================================================

pub mod error;
pub mod progress;
pub mod sampler;
pub mod stats;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use attribution::{AttributionResult, compute_attribution};
pub use error::{SimulationError, ValidationError};
pub use factors::{FactorAttribution, FactorReturns, decompose_factors};
pub use progress::SimulationProgress;
pub use sampler::GaussianMethod;
pub use simulation::{
    ConfidenceIntervals, ScenarioResult, SimulationConfig, SimulationOutcome, SimulationStats,
    run_monte_carlo, run_monte_carlo_seeded, run_monte_carlo_with_progress,
    run_monte_carlo_with_rng, run_monte_carlo_with_rng_and_progress,
};
pub use stress::{
    AllocationWeights, AssetClass, ShockVector, StressTestResult, default_shock_library,
    run_stress_tests,
};
