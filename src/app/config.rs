//! Configuration types for agent and experiment creation.

use std::{fmt, fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, adapters::LearningRateConfig, td::DEFAULT_PRECISION};

/// TD control algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    QLearning,
    DoubleQLearning,
    WeightedQLearning,
    Sarsa,
}

impl Algorithm {
    pub const ALL: [Algorithm; 4] = [
        Algorithm::QLearning,
        Algorithm::DoubleQLearning,
        Algorithm::WeightedQLearning,
        Algorithm::Sarsa,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::QLearning => "q-learning",
            Algorithm::DoubleQLearning => "double-q-learning",
            Algorithm::WeightedQLearning => "weighted-q-learning",
            Algorithm::Sarsa => "sarsa",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "q-learning" | "qlearning" | "q" => Ok(Algorithm::QLearning),
            "double-q-learning" | "double-q" | "double" => Ok(Algorithm::DoubleQLearning),
            "weighted-q-learning" | "weighted-q" | "weighted" => Ok(Algorithm::WeightedQLearning),
            "sarsa" => Ok(Algorithm::Sarsa),
            _ => Err(Error::ParseAlgorithm {
                input: s.to_string(),
                expected: "q-learning, double-q-learning, weighted-q-learning, sarsa".to_string(),
            }),
        }
    }
}

/// Configuration for creating an agent.
///
/// # Examples
///
/// ```
/// use tdcontrol::app::AgentConfig;
/// use tdcontrol::adapters::LearningRateConfig;
///
/// let config = AgentConfig::default()
///     .with_seed(42)
///     .with_epsilon(0.2)
///     .with_learning_rate(LearningRateConfig::Constant { alpha: 0.1 });
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Step-size schedule shared (or cloned) by the agent's models
    pub learning_rate: LearningRateConfig,
    /// Exploration rate of the ε-greedy policy
    pub epsilon: f64,
    /// Initial value of every table entry
    pub q_init: f64,
    /// Weighted Q-Learning: estimate weights by sampling
    pub sampling: bool,
    /// Weighted Q-Learning: samples per weight estimate
    pub precision: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            learning_rate: LearningRateConfig::default(),
            epsilon: 0.1,
            q_init: 0.0,
            sampling: true,
            precision: DEFAULT_PRECISION,
            seed: None,
        }
    }
}

impl AgentConfig {
    pub fn with_learning_rate(mut self, learning_rate: LearningRateConfig) -> Self {
        self.learning_rate = learning_rate;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_q_init(mut self, q_init: f64) -> Self {
        self.q_init = q_init;
        self
    }

    pub fn with_sampling(mut self, sampling: bool) -> Self {
        self.sampling = sampling;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Seed for the `n`-th random source of the agent.
    pub(crate) fn derived_seed(&self, n: u64) -> Option<u64> {
        self.seed.map(|seed| seed.wrapping_add(n))
    }
}

/// Configuration for an online experiment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub algorithm: Algorithm,
    /// Number of environment steps (and agent updates)
    pub n_steps: usize,
    /// Maximum episode length; episodes otherwise end on absorbing states
    pub horizon: Option<usize>,
    /// Seed of the environment
    pub seed: Option<u64>,
    pub agent: AgentConfig,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            algorithm: Algorithm::QLearning,
            n_steps: 10_000,
            horizon: None,
            seed: None,
            agent: AgentConfig::default(),
        }
    }
}

impl ExperimentConfig {
    /// Load a configuration from a JSON file; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            operation: format!("read config {}", path.display()),
            source,
        })?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Seed the experiment and its agent from one value.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self.agent.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_round_trips_through_strings() {
        for algorithm in Algorithm::ALL {
            assert_eq!(algorithm.to_string().parse::<Algorithm>().unwrap(), algorithm);
        }
        assert_eq!("Weighted".parse::<Algorithm>().unwrap(), Algorithm::WeightedQLearning);
        assert!(matches!(
            "td-lambda".parse::<Algorithm>(),
            Err(Error::ParseAlgorithm { .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ExperimentConfig = serde_json::from_str(
            r#"{
                "algorithm": "double-q-learning",
                "n_steps": 500,
                "agent": { "epsilon": 0.3, "learning_rate": { "kind": "constant", "alpha": 0.2 } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.algorithm, Algorithm::DoubleQLearning);
        assert_eq!(config.n_steps, 500);
        assert_eq!(config.horizon, None);
        assert_eq!(config.agent.epsilon, 0.3);
        assert_eq!(config.agent.precision, DEFAULT_PRECISION);
        assert_eq!(
            config.agent.learning_rate,
            LearningRateConfig::Constant { alpha: 0.2 }
        );
    }

    #[test]
    fn test_derived_seeds_differ() {
        let config = AgentConfig::default().with_seed(u64::MAX);
        assert_eq!(config.derived_seed(0), Some(u64::MAX));
        assert_eq!(config.derived_seed(1), Some(0));
        assert_eq!(AgentConfig::default().derived_seed(1), None);
    }
}
