//! Compare command - Repeated runs of several algorithms side-by-side

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use crate::{
    adapters::GridWorld,
    app::{AgentConfig, Algorithm},
    cli::output::{print_comparison_table, print_section},
    export::write_comparison_csv,
    pipeline::{ComparisonConfig, Experiment, compare},
};

#[derive(Parser, Debug)]
#[command(about = "Compare TD control algorithms over repeated runs")]
pub struct CompareArgs {
    /// Algorithms to compare (default: all four)
    #[arg(long, short = 'a', value_delimiter = ',')]
    pub algorithms: Vec<Algorithm>,

    /// Number of environment steps per run
    #[arg(long, short = 'n', default_value_t = 10_000)]
    pub steps: usize,

    /// Number of runs per algorithm
    #[arg(long, short = 'r', default_value_t = 10)]
    pub runs: usize,

    /// Samples per weight estimate of Weighted Q-Learning
    #[arg(long, default_value_t = crate::td::DEFAULT_PRECISION)]
    pub precision: usize,

    /// Export comparison results to CSV
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,
}

pub fn execute(args: CompareArgs) -> Result<()> {
    if args.runs == 0 {
        return Err(anyhow!("Need at least 1 run per algorithm"));
    }
    let algorithms = if args.algorithms.is_empty() {
        Algorithm::ALL.to_vec()
    } else {
        args.algorithms.clone()
    };

    println!("Comparing {} algorithms:", algorithms.len());
    for (i, algorithm) in algorithms.iter().enumerate() {
        println!("  {}: {}", i + 1, algorithm);
    }
    println!("\nRuns: {}, steps per run: {}", args.runs, args.steps);

    let config = ComparisonConfig {
        algorithms,
        runs: args.runs,
        experiment: Experiment::new(args.steps),
        agent: AgentConfig::default().with_precision(args.precision),
        seed: args.seed,
    };
    let rows = compare::<usize, _, _>(&config, GridWorld::three_by_three)
        .context("Comparison failed")?;

    print_section("Comparison Results");
    print_comparison_table(&rows);

    if let Some(path) = &args.output {
        write_comparison_csv(path, &rows)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("\nResults exported to {}", path.display());
    }

    Ok(())
}
