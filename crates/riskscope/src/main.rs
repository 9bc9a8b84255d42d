use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use riskscope::{AnalysisRequest, Command, RunOptions, init_logging, run_analysis};

#[derive(Parser, Debug)]
#[command(name = "riskscope")]
#[command(about = "Portfolio risk attribution, Monte Carlo projection and stress testing")]
struct Args {
    /// Path to the YAML analysis request
    #[arg(short, long)]
    config: PathBuf,

    /// Seed for a reproducible simulation (default: system entropy)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Include every simulated terminal value in the output
    #[arg(long)]
    full_distribution: bool,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(args.log_file.as_deref(), &args.log_level)?;

    let request = AnalysisRequest::load(&args.config)?;
    let options = RunOptions {
        seed: args.seed,
        full_distribution: args.full_distribution,
    };
    let report = run_analysis(&request, args.command, &options)?;

    let json = serde_json::to_string_pretty(&report).wrap_err("failed to serialize report")?;
    println!("{json}");

    tracing::info!(command = ?args.command, "analysis complete");
    Ok(())
}
