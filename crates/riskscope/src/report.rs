//! Runs the engines selected on the command line against a request and
//! collects their output into one serializable report.

use clap::Subcommand;
use color_eyre::eyre::{WrapErr, bail, eyre};
use riskscope_core::stats::ReturnSummary;
use riskscope_core::{
    AttributionResult, ConfidenceIntervals, FactorAttribution, ScenarioResult, SimulationConfig,
    SimulationStats, StressTestResult, compute_attribution, decompose_factors, run_monte_carlo,
    run_monte_carlo_seeded, run_stress_tests,
};
use serde::Serialize;
use tracing::info;

use crate::config::{AnalysisRequest, FactorsInput, ReturnsInput, StressInput};

/// Engine to run
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Risk-adjusted performance of the `returns` section
    Attribution,
    /// Monte Carlo projection of the `simulation` section
    Simulate,
    /// Stress scenarios against the `stress` allocation
    Stress,
    /// Factor decomposition (illustrative split)
    Factors,
    /// Every engine whose section is present
    All,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Fixed seed for reproducible simulations
    pub seed: Option<u64>,
    /// Include every simulated terminal value in the report
    pub full_distribution: bool,
}

/// Printed simulation output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub config: SimulationConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub scenarios: Vec<ScenarioResult>,
    pub confidence_intervals: ConfidenceIntervals,
    pub stats: SimulationStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distribution: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribution: Option<AttributionResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_summary: Option<ReturnSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub simulation: Option<SimulationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_tests: Option<Vec<StressTestResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factors: Option<Vec<FactorAttribution>>,
}

pub fn run_analysis(
    request: &AnalysisRequest,
    command: Command,
    options: &RunOptions,
) -> color_eyre::Result<AnalysisReport> {
    let mut report = AnalysisReport::default();

    match command {
        Command::Attribution => {
            let returns = required(&request.returns, "returns", command)?;
            run_attribution(returns, &mut report)?;
        }
        Command::Simulate => {
            let config = required(&request.simulation, "simulation", command)?;
            report.simulation = Some(run_simulation(config, options)?);
        }
        Command::Stress => {
            let stress = required(&request.stress, "stress", command)?;
            report.stress_tests = Some(run_stress(stress)?);
        }
        Command::Factors => {
            let factors = required(&request.factors, "factors", command)?;
            report.factors = Some(run_factors(factors, request.returns.as_ref()));
        }
        Command::All => {
            if request.is_empty() {
                bail!("request has no sections to analyze");
            }
            if let Some(returns) = &request.returns {
                run_attribution(returns, &mut report)?;
            }
            if let Some(config) = &request.simulation {
                report.simulation = Some(run_simulation(config, options)?);
            }
            if let Some(stress) = &request.stress {
                report.stress_tests = Some(run_stress(stress)?);
            }
            if let Some(factors) = &request.factors {
                report.factors = Some(run_factors(factors, request.returns.as_ref()));
            }
        }
    }

    Ok(report)
}

fn required<'a, T>(
    section: &'a Option<T>,
    name: &str,
    command: Command,
) -> color_eyre::Result<&'a T> {
    section
        .as_ref()
        .ok_or_else(|| eyre!("request has no `{name}` section required by {command:?}"))
}

fn run_attribution(returns: &ReturnsInput, report: &mut AnalysisReport) -> color_eyre::Result<()> {
    let attribution = compute_attribution(
        &returns.portfolio,
        &returns.benchmark,
        returns.risk_free_rate,
    )
    .wrap_err("attribution failed")?;
    info!(
        periods = returns.portfolio.len(),
        sharpe = attribution.sharpe_ratio,
        "attribution complete"
    );
    report.attribution = Some(attribution);
    report.return_summary = ReturnSummary::from_returns(&returns.portfolio);
    Ok(())
}

fn run_simulation(
    config: &SimulationConfig,
    options: &RunOptions,
) -> color_eyre::Result<SimulationReport> {
    let outcome = match options.seed {
        Some(seed) => run_monte_carlo_seeded(config, seed),
        None => run_monte_carlo(config),
    }
    .wrap_err("simulation failed")?;

    Ok(SimulationReport {
        config: config.clone(),
        seed: options.seed,
        scenarios: outcome.scenarios,
        confidence_intervals: outcome.confidence_intervals,
        stats: outcome.stats,
        distribution: options.full_distribution.then_some(outcome.distribution),
    })
}

fn run_stress(stress: &StressInput) -> color_eyre::Result<Vec<StressTestResult>> {
    let library = stress.shock_library();
    info!(scenarios = library.len(), "running stress tests");
    run_stress_tests(stress.current_value, &stress.allocation, &library)
        .wrap_err("stress test failed")
}

fn run_factors(factors: &FactorsInput, returns: Option<&ReturnsInput>) -> Vec<FactorAttribution> {
    let portfolio = match returns {
        Some(returns) if factors.portfolio.is_empty() => &returns.portfolio,
        _ => &factors.portfolio,
    };
    decompose_factors(portfolio, &factors.factor_returns())
}
