//! Repeated runs of several algorithms on the same environment

use std::hash::Hash;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;
use tracing::info;

use crate::{
    Result,
    app::{AgentConfig, Algorithm, build_agent},
    pipeline::experiment::{Experiment, ExperimentSummary},
    ports::Environment,
};

/// Aggregate over the runs of one algorithm
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub algorithm: String,
    pub runs: usize,
    pub max_q_mean: f64,
    pub max_q_std: f64,
    pub reward_mean: f64,
    pub reward_std: f64,
}

/// Configuration of a comparison
#[derive(Debug, Clone)]
pub struct ComparisonConfig {
    pub algorithms: Vec<Algorithm>,
    pub runs: usize,
    pub experiment: Experiment,
    pub agent: AgentConfig,
    /// Base seed; run `r` uses `seed + r` for both agent and environment
    pub seed: Option<u64>,
}

/// Run every algorithm `runs` times on environments built by `make_env`.
///
/// `make_env` receives the per-run seed.
///
/// # Errors
///
/// Propagates agent construction, environment and experiment errors.
pub fn compare<S, E, F>(config: &ComparisonConfig, mut make_env: F) -> Result<Vec<ComparisonRow>>
where
    S: Clone + Eq + Hash + 'static,
    E: Environment<S>,
    F: FnMut(Option<u64>) -> Result<E>,
{
    let mut rows = Vec::with_capacity(config.algorithms.len());

    for &algorithm in &config.algorithms {
        let mut summaries: Vec<ExperimentSummary> = Vec::with_capacity(config.runs);
        for run in 0..config.runs {
            let seed = config.seed.map(|seed| seed.wrapping_add(run as u64));
            let mut env = make_env(seed)?;
            let mut agent_config = config.agent.clone();
            agent_config.seed = seed;
            let mut agent = build_agent::<S>(algorithm, &agent_config, env.mdp_info().clone())?;
            summaries.push(config.experiment.run(agent.as_mut(), &mut env, &mut [])?);
        }

        let max_qs: Vec<f64> = summaries.iter().map(|s| s.initial_state_max_q).collect();
        let rewards: Vec<f64> = summaries.iter().map(|s| s.mean_reward).collect();
        let (max_q_mean, max_q_std) = mean_std(&max_qs);
        let (reward_mean, reward_std) = mean_std(&rewards);

        info!(%algorithm, max_q_mean, reward_mean, "algorithm compared");
        rows.push(ComparisonRow {
            algorithm: algorithm.to_string(),
            runs: config.runs,
            max_q_mean,
            max_q_std,
            reward_mean,
            reward_std,
        });
    }

    Ok(rows)
}

/// Sample mean and standard deviation; the deviation of fewer than two values is 0.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let mean = values.iter().mean();
    let std = if values.len() < 2 {
        0.0
    } else {
        values.iter().std_dev()
    };
    (mean, std)
}
