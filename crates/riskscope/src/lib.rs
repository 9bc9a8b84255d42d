//! Command-line driver for the riskscope analytics engines
//!
//! Loads a YAML analysis request, runs the engines selected on the command
//! line and renders a JSON report.

pub mod config;
pub mod logging;
pub mod report;

pub use config::{AnalysisRequest, FactorsInput, ReturnsInput, StressInput};
pub use logging::init_logging;
pub use report::{AnalysisReport, Command, RunOptions, SimulationReport, run_analysis};
