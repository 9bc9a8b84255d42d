//! Integration tests for the analytics engines
//!
//! Tests are organized by engine:
//! - `attribution` - Risk-adjusted ratios from return series
//! - `simulation` - Monte Carlo projection, seeding, cancellation
//! - `stress` - Allocation-weighted shock scenarios
//! - `properties` - Randomized invariants (drawdown bounds, percentile order)

mod attribution;
mod properties;
