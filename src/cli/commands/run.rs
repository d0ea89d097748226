//! Run command - Train one algorithm online on the grid world

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    adapters::GridWorld,
    app::{Algorithm, ExperimentConfig, build_agent},
    callbacks::CollectMaxQ,
    cli::output::{ProgressObserver, print_kv, print_section},
    export::write_max_q_trace,
    pipeline::Experiment,
    ports::{Environment, Observer},
    serialization::{SavedTable, TableMetadata},
};

#[derive(Parser, Debug)]
#[command(about = "Run one TD control algorithm on the 3x3 grid world")]
pub struct RunArgs {
    /// Algorithm: q-learning, double-q-learning, weighted-q-learning or sarsa
    #[arg(long, short = 'a')]
    pub algorithm: Option<Algorithm>,

    /// Number of environment steps
    #[arg(long, short = 'n')]
    pub steps: Option<usize>,

    /// Maximum episode length
    #[arg(long)]
    pub horizon: Option<usize>,

    /// Exploration rate of the ε-greedy policy
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// JSON experiment configuration; flags override its values
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write the max Q trace of the start state to CSV
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Save the learned action values as JSON
    #[arg(long)]
    pub save_table: Option<PathBuf>,

    /// Disable the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Merge the configuration file (if any) with the command-line overrides.
    pub fn resolve_config(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.config {
            Some(path) => ExperimentConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => ExperimentConfig::default(),
        };
        if let Some(algorithm) = self.algorithm {
            config.algorithm = algorithm;
        }
        if let Some(steps) = self.steps {
            config.n_steps = steps;
        }
        if self.horizon.is_some() {
            config.horizon = self.horizon;
        }
        if let Some(epsilon) = self.epsilon {
            config.agent.epsilon = epsilon;
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        Ok(config)
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let config = args.resolve_config()?;

    let mut env = GridWorld::three_by_three(config.seed)?;
    let mdp_info = env.mdp_info().clone();
    let mut agent = build_agent::<usize>(config.algorithm, &config.agent, mdp_info.clone())
        .with_context(|| format!("Failed to build {} agent", config.algorithm))?;

    let mut max_q = CollectMaxQ::new(env.start(), mdp_info.action_space.clone());
    let mut progress = ProgressObserver::new();
    let mut observers: Vec<&mut dyn Observer<usize>> = vec![&mut max_q];
    if !args.no_progress {
        observers.push(&mut progress);
    }

    let experiment = Experiment::new(config.n_steps).with_horizon(config.horizon);
    let summary = experiment
        .run(agent.as_mut(), &mut env, &mut observers)
        .context("Experiment failed")?;

    print_section(&format!("{} on 3x3 grid world", summary.algorithm));
    print_kv("Steps", &summary.steps.to_string());
    print_kv("Episodes", &summary.episodes.to_string());
    print_kv("Total reward", &format!("{:.2}", summary.total_reward));
    print_kv("Mean reward", &format!("{:.4}", summary.mean_reward));
    print_kv("Start max Q", &format!("{:.4}", summary.initial_state_max_q));

    if let Some(path) = &args.output {
        write_max_q_trace(path, max_q.values())
            .with_context(|| format!("Failed to write trace {}", path.display()))?;
        println!("\nMax Q trace written to {}", path.display());
    }

    if let Some(path) = &args.save_table {
        let metadata = TableMetadata {
            steps: summary.steps,
            episodes: summary.episodes,
            seed: config.seed,
        };
        let table = SavedTable::capture(
            agent.as_ref(),
            &env.states(),
            &mdp_info.action_space,
            metadata,
        );
        table
            .save(path)
            .with_context(|| format!("Failed to save table {}", path.display()))?;
        println!("Action values saved to {}", path.display());
    }

    Ok(())
}
