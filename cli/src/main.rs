//! `covenant-guard` - local driver for the portfolio risk engine
//!
//! Reads loan records from a JSON file (or uses the built-in demo set), then
//! summarizes, simulates or answers a query.

mod output;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use covenant_guard_core::{Orchestrator, OrchestratorConfig};
use std::path::{Path, PathBuf};
use std::process;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Covenant risk monitoring for a loan portfolio
#[derive(Parser)]
#[command(
    name = "covenant-guard",
    version,
    about = "Covenant risk monitoring for a loan portfolio",
    long_about = "Classifies loan covenants, ranks the portfolio by risk, runs \
                  simulated market events and answers simple portfolio questions."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format (logs go to stderr)
    #[arg(long, default_value = "text", global = true)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the risk-sorted portfolio and summary statistics
    Summary(InputArgs),
    /// Run market-event ticks and print the event log and final state
    Simulate(SimulateArgs),
    /// Ask the portfolio assistant a question
    Ask(AskArgs),
}

#[derive(Args)]
struct InputArgs {
    /// JSON file with loan records; the demo portfolio is used when omitted
    #[arg(long)]
    input: Option<PathBuf>,
}

#[derive(Args)]
struct SimulateArgs {
    #[command(flatten)]
    source: InputArgs,

    /// JSON engine configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// RNG seed (overrides the config file)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of ticks to run
    #[arg(long, default_value_t = 10)]
    ticks: usize,
}

#[derive(Args)]
struct AskArgs {
    /// Free-text question, e.g. "show critical loans"
    query: String,

    #[command(flatten)]
    source: InputArgs,

    /// Answer as if the simulation were running
    #[arg(long)]
    simulating: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init(),
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_format);

    let result = match cli.command {
        Commands::Summary(args) => run_summary(args),
        Commands::Simulate(args) => run_simulate(args),
        Commands::Ask(args) => run_ask(args),
    };

    if let Err(e) = result {
        eprintln!("error: {:#}", e);
        process::exit(1);
    }
}

// ============================================================================
// Commands
// ============================================================================

fn run_summary(args: InputArgs) -> Result<()> {
    let orchestrator = load_session(OrchestratorConfig::default(), &args)?;

    output::print_table(&orchestrator.sorted_loans());
    output::print_stats(&orchestrator.stats());
    Ok(())
}

fn run_simulate(args: SimulateArgs) -> Result<()> {
    let mut config = match &args.config {
        Some(path) => OrchestratorConfig::from_json_str(&read_file(path)?)
            .with_context(|| format!("invalid config in {}", path.display()))?,
        None => OrchestratorConfig::default(),
    };
    if args.seed.is_some() {
        config.rng_seed = args.seed;
    }

    let mut orchestrator = load_session(config, &args.source)?;
    orchestrator.start_simulation();

    for _ in 0..args.ticks {
        match orchestrator.tick()? {
            Some(outcome) => output::print_tick(orchestrator.current_tick(), &outcome),
            None => {
                warn!("portfolio is empty; nothing to simulate");
                break;
            }
        }
    }
    orchestrator.stop_simulation();
    info!(ticks = orchestrator.current_tick(), "simulation finished");

    println!();
    output::print_table(&orchestrator.sorted_loans());
    output::print_stats(&orchestrator.stats());
    Ok(())
}

fn run_ask(args: AskArgs) -> Result<()> {
    let mut orchestrator = load_session(OrchestratorConfig::default(), &args.source)?;
    if args.simulating {
        orchestrator.start_simulation();
    }

    println!("{}", orchestrator.respond(&args.query));
    Ok(())
}

// ============================================================================
// Helpers
// ============================================================================

fn load_session(config: OrchestratorConfig, args: &InputArgs) -> Result<Orchestrator> {
    let mut orchestrator = Orchestrator::new(config)?;

    match &args.input {
        Some(path) => {
            let raw: serde_json::Value = serde_json::from_str(&read_file(path)?)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;
            let count = orchestrator.load_raw(&raw)?;
            if count == 0 {
                warn!(path = %path.display(), "no loan records found");
            }
        }
        None => {
            orchestrator.load_fallback()?;
        }
    }

    Ok(orchestrator)
}

fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
