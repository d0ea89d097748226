//! tdcontrol CLI - Tabular TD control experiments
//!
//! This CLI provides:
//! - Running one algorithm on the grid world with trace and table export
//! - Comparing algorithms over repeated seeded runs

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tdcontrol")]
#[command(version, about = "Tabular temporal-difference control experiments", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG takes precedence
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one algorithm on the grid world
    Run(tdcontrol::cli::commands::run::RunArgs),

    /// Compare algorithms over repeated runs
    Compare(tdcontrol::cli::commands::compare::CompareArgs),
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run(args) => tdcontrol::cli::commands::run::execute(args),
        Commands::Compare(args) => tdcontrol::cli::commands::compare::execute(args),
    }
}
