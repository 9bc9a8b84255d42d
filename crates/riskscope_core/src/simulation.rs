//! Monte Carlo projection of a portfolio's terminal value.
//!
//! Each trial compounds `time_horizon` yearly Gaussian returns starting from
//! the current value. Trials are independent: the seeded entry points split
//! them into fixed-size batches, draw every batch seed up front from one
//! master generator, and (with the `parallel` feature) run large jobs on the
//! rayon pool. The same seed therefore gives the same outcome regardless of
//! thread count. Terminal values are merged and sorted once at the end.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{SimulationError, ValidationError};
use crate::progress::SimulationProgress;
use crate::sampler::GaussianMethod;
use crate::stats::{mean, percentile, round2};

pub const DEFAULT_SIMULATION_COUNT: usize = 10_000;

/// Runs at or above this many trials are spread across worker threads
pub const PARALLEL_THRESHOLD: usize = 10_000;

const MAX_BATCH_SIZE: usize = 500;

/// Forward-looking assumptions for a simulation run.
///
/// Only `simulation_count` and `gaussian` may be omitted when deserializing;
/// the market inputs must be given explicitly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Starting portfolio value, must be > 0
    pub current_value: f64,
    /// Expected annual return as a decimal (0.12 = 12%)
    pub expected_return: f64,
    /// Annual standard deviation of returns as a decimal, >= 0
    pub volatility: f64,
    /// Horizon in whole years
    pub time_horizon: u32,
    /// Number of independent trials, > 0
    #[serde(default = "default_simulation_count")]
    pub simulation_count: usize,
    #[serde(default)]
    pub gaussian: GaussianMethod,
}

fn default_simulation_count() -> usize {
    DEFAULT_SIMULATION_COUNT
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            current_value: 100_000.0,
            expected_return: 0.07,
            volatility: 0.15,
            time_horizon: 10,
            simulation_count: DEFAULT_SIMULATION_COUNT,
            gaussian: GaussianMethod::BoxMuller,
        }
    }
}

impl SimulationConfig {
    /// Check the preconditions every simulation entry point relies on
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.current_value.is_finite() || self.current_value <= 0.0 {
            return Err(ValidationError::InvalidParameter {
                name: "current_value",
                value: self.current_value,
                reason: "must be a finite value greater than zero",
            });
        }
        if !self.expected_return.is_finite() {
            return Err(ValidationError::InvalidParameter {
                name: "expected_return",
                value: self.expected_return,
                reason: "must be finite",
            });
        }
        if !self.volatility.is_finite() || self.volatility < 0.0 {
            return Err(ValidationError::InvalidParameter {
                name: "volatility",
                value: self.volatility,
                reason: "must be a finite non-negative value",
            });
        }
        if self.simulation_count == 0 {
            return Err(ValidationError::InvalidParameter {
                name: "simulation_count",
                value: 0.0,
                reason: "at least one trial is required",
            });
        }
        Ok(())
    }
}

/// Percentile bands of the terminal value distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceIntervals {
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
}

impl ConfidenceIntervals {
    /// Extract the bands from an ascending sample
    #[must_use]
    pub fn from_sorted(sorted: &[f64]) -> Self {
        let at = |p: f64| percentile(sorted, p).unwrap_or(0.0);
        Self {
            p5: at(0.05),
            p25: at(0.25),
            p50: at(0.50),
            p75: at(0.75),
            p95: at(0.95),
        }
    }

    /// Look up a band by its percentile (0.05, 0.25, ...)
    #[must_use]
    pub fn get(&self, p: f64) -> Option<f64> {
        [
            (0.05, self.p5),
            (0.25, self.p25),
            (0.50, self.p50),
            (0.75, self.p75),
            (0.95, self.p95),
        ]
        .into_iter()
        .find(|(anchor, _)| (anchor - p).abs() < 1e-3)
        .map(|(_, value)| value)
    }
}

/// Summary statistics of the terminal value distribution
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Fraction of trials ending below the starting value
    pub probability_of_loss: f64,
}

/// One labeled narrative scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub description: String,
    /// Fixed narrative weight in percent. This is a label attached to the
    /// percentile anchor, not the tail mass measured from the sample.
    pub probability: f64,
    /// Percentile anchor (0.05 = P5)
    pub percentile: f64,
    /// Terminal value at the anchor
    pub value: f64,
    /// Total return from the starting value, percent
    pub return_pct: f64,
    /// Minimum of the whole distribution (same on every row)
    pub worst_case: f64,
    /// Maximum of the whole distribution (same on every row)
    pub best_case: f64,
}

struct ScenarioAnchor {
    name: &'static str,
    description: &'static str,
    percentile: f64,
    probability: f64,
}

const SCENARIO_ANCHORS: [ScenarioAnchor; 5] = [
    ScenarioAnchor {
        name: "Severe Downturn",
        description: "Prolonged bear market with deep losses",
        percentile: 0.05,
        probability: 5.0,
    },
    ScenarioAnchor {
        name: "Below Average",
        description: "Weak markets and returns under expectations",
        percentile: 0.25,
        probability: 15.0,
    },
    ScenarioAnchor {
        name: "Base Case",
        description: "Returns in line with expectations",
        percentile: 0.50,
        probability: 60.0,
    },
    ScenarioAnchor {
        name: "Above Average",
        description: "Favorable markets and returns above expectations",
        percentile: 0.75,
        probability: 15.0,
    },
    ScenarioAnchor {
        name: "Strong Growth",
        description: "Sustained bull market",
        percentile: 0.95,
        probability: 5.0,
    },
];

/// Result of a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Five scenarios in anchor order P5, P25, P50, P75, P95
    pub scenarios: Vec<ScenarioResult>,
    /// Terminal values sorted ascending, one per trial
    pub distribution: Vec<f64>,
    pub confidence_intervals: ConfidenceIntervals,
    pub stats: SimulationStats,
}

impl SimulationOutcome {
    /// Build the outcome from unsorted terminal values
    #[must_use]
    pub fn from_terminal_values(config: &SimulationConfig, mut distribution: Vec<f64>) -> Self {
        distribution.sort_by(f64::total_cmp);

        let confidence_intervals = ConfidenceIntervals::from_sorted(&distribution);
        let min = distribution.first().copied().unwrap_or(0.0);
        let max = distribution.last().copied().unwrap_or(0.0);
        let losses = distribution
            .iter()
            .filter(|v| **v < config.current_value)
            .count();
        let stats = SimulationStats {
            mean: mean(&distribution),
            min,
            max,
            probability_of_loss: if distribution.is_empty() {
                0.0
            } else {
                losses as f64 / distribution.len() as f64
            },
        };

        let scenarios = SCENARIO_ANCHORS
            .iter()
            .map(|anchor| {
                let value = percentile(&distribution, anchor.percentile).unwrap_or(0.0);
                ScenarioResult {
                    name: anchor.name.to_string(),
                    description: anchor.description.to_string(),
                    probability: anchor.probability,
                    percentile: anchor.percentile,
                    value,
                    return_pct: round2((value / config.current_value - 1.0) * 100.0),
                    worst_case: min,
                    best_case: max,
                }
            })
            .collect();

        Self {
            scenarios,
            distribution,
            confidence_intervals,
            stats,
        }
    }

    #[must_use]
    pub fn scenario(&self, name: &str) -> Option<&ScenarioResult> {
        self.scenarios.iter().find(|s| s.name == name)
    }
}

/// Run one trial and return its terminal value
pub fn simulate_trial<R: Rng + ?Sized>(config: &SimulationConfig, rng: &mut R) -> f64 {
    let mut value = config.current_value;
    for _ in 0..config.time_horizon {
        let r = config
            .gaussian
            .sample(rng, config.expected_return, config.volatility);
        value *= 1.0 + r;
    }
    value
}

/// Run a simulation seeded from system entropy
pub fn run_monte_carlo(config: &SimulationConfig) -> Result<SimulationOutcome, SimulationError> {
    run_monte_carlo_seeded(config, rand::random())
}

/// Run a reproducible simulation
pub fn run_monte_carlo_seeded(
    config: &SimulationConfig,
    seed: u64,
) -> Result<SimulationOutcome, SimulationError> {
    run_monte_carlo_with_progress(config, seed, &SimulationProgress::new())
}

/// Run a reproducible simulation, reporting progress and honoring
/// cancellation between trial batches
pub fn run_monte_carlo_with_progress(
    config: &SimulationConfig,
    seed: u64,
    progress: &SimulationProgress,
) -> Result<SimulationOutcome, SimulationError> {
    config.validate()?;

    let num_iterations = config.simulation_count;
    let num_batches = num_iterations.div_ceil(MAX_BATCH_SIZE);
    progress.reset(num_iterations);

    info!(
        trials = num_iterations,
        horizon = config.time_horizon,
        batches = num_batches,
        "starting monte carlo simulation"
    );

    let mut master = SmallRng::seed_from_u64(seed);
    let batch_seeds: Vec<u64> = (0..num_batches).map(|_| master.next_u64()).collect();

    let run_batch = |(i, batch_seed): (usize, u64)| -> Result<Vec<f64>, SimulationError> {
        let batch_size = batch_len(num_iterations, i);
        let mut rng = SmallRng::seed_from_u64(batch_seed);
        run_batch_trials(config, &mut rng, batch_size, progress)
    };

    #[cfg(feature = "parallel")]
    let batches: Vec<Vec<f64>> = if num_iterations >= PARALLEL_THRESHOLD {
        batch_seeds
            .into_par_iter()
            .enumerate()
            .map(&run_batch)
            .collect::<Result<_, _>>()?
    } else {
        batch_seeds
            .into_iter()
            .enumerate()
            .map(&run_batch)
            .collect::<Result<_, _>>()?
    };

    #[cfg(not(feature = "parallel"))]
    let batches: Vec<Vec<f64>> = batch_seeds
        .into_iter()
        .enumerate()
        .map(&run_batch)
        .collect::<Result<_, _>>()?;

    let outcome =
        SimulationOutcome::from_terminal_values(config, batches.into_iter().flatten().collect());

    debug!(
        p5 = outcome.confidence_intervals.p5,
        p50 = outcome.confidence_intervals.p50,
        p95 = outcome.confidence_intervals.p95,
        "monte carlo simulation finished"
    );
    Ok(outcome)
}

/// Run every trial on the calling thread, drawing from the caller's generator
pub fn run_monte_carlo_with_rng<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<SimulationOutcome, SimulationError> {
    run_monte_carlo_with_rng_and_progress(config, rng, &SimulationProgress::new())
}

/// Run every trial on the calling thread from the caller's generator,
/// reporting progress and honoring cancellation between trial batches
pub fn run_monte_carlo_with_rng_and_progress<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
    progress: &SimulationProgress,
) -> Result<SimulationOutcome, SimulationError> {
    config.validate()?;

    let num_iterations = config.simulation_count;
    progress.reset(num_iterations);

    let mut distribution = Vec::with_capacity(num_iterations);
    for i in 0..num_iterations.div_ceil(MAX_BATCH_SIZE) {
        let batch = run_batch_trials(config, rng, batch_len(num_iterations, i), progress)?;
        distribution.extend(batch);
    }
    Ok(SimulationOutcome::from_terminal_values(config, distribution))
}

/// Trials in batch `index` of a run of `num_iterations`
fn batch_len(num_iterations: usize, index: usize) -> usize {
    (num_iterations - index * MAX_BATCH_SIZE).min(MAX_BATCH_SIZE)
}

fn run_batch_trials<R: Rng + ?Sized>(
    config: &SimulationConfig,
    rng: &mut R,
    batch_size: usize,
    progress: &SimulationProgress,
) -> Result<Vec<f64>, SimulationError> {
    if progress.is_cancelled() {
        return Err(SimulationError::Cancelled);
    }
    let values = (0..batch_size).map(|_| simulate_trial(config, rng)).collect();
    progress.add_completed(batch_size);
    Ok(values)
}
