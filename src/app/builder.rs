//! Agent construction from configuration

use std::hash::Hash;

use tracing::info;

use crate::{
    Error, Result,
    adapters::{Ensemble, EpsilonGreedy, Schedule, Table},
    app::config::{AgentConfig, Algorithm},
    ports::Agent,
    td::{DoubleQLearning, QLearning, Sarsa, Td, UniformSelector, WeightedNextValue},
    types::MdpInfo,
};

/// Build a tabular agent for `algorithm`.
///
/// Every random source gets its own seed derived from `config.seed`: the
/// policy uses the seed itself, the Weighted Q-Learning sampler `seed + 1`
/// and the Double Q-Learning model selector `seed + 2`.
///
/// # Errors
///
/// Returns an error for invalid schedule, exploration or precision settings.
pub fn build_agent<S>(
    algorithm: Algorithm,
    config: &AgentConfig,
    mdp_info: MdpInfo,
) -> Result<Box<dyn Agent<S>>>
where
    S: Clone + Eq + Hash + 'static,
{
    let policy = EpsilonGreedy::new(config.epsilon, config.seed)?;
    let schedule = Schedule::<S>::from_config(&config.learning_rate)?;
    let table = || Table::<S>::new(config.q_init);

    let agent: Box<dyn Agent<S>> = match algorithm {
        Algorithm::QLearning => Box::new(QLearning::<S, _, _, _>::q_learning(
            table(),
            policy,
            schedule,
            mdp_info,
        )),
        Algorithm::Sarsa => Box::new(Sarsa::<S, _, _, _>::sarsa(
            table(),
            policy,
            schedule,
            mdp_info,
        )),
        Algorithm::WeightedQLearning => {
            if config.precision == 0 {
                return Err(Error::InvalidParameter {
                    name: "precision",
                    value: 0.0,
                    reason: "at least one sample is required",
                });
            }
            let resolver = WeightedNextValue::<S>::new(config.derived_seed(1))
                .with_sampling(config.sampling)
                .with_precision(config.precision);
            Box::new(Td::<S, _, _, _, _>::new(
                table(),
                policy,
                schedule,
                mdp_info,
                resolver,
            ))
        }
        Algorithm::DoubleQLearning => Box::new(DoubleQLearning::<S, _, _, _, _>::new(
            Ensemble::from_fn(2, table)?,
            policy,
            schedule,
            mdp_info,
            UniformSelector::new(config.derived_seed(2)),
        )?),
    };

    info!(algorithm = %algorithm, seed = ?config.seed, "agent built");
    Ok(agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ActionSpace, Transition};

    fn mdp() -> MdpInfo {
        MdpInfo::new(0.9, ActionSpace::discrete(2).unwrap()).unwrap()
    }

    #[test]
    fn test_builds_every_algorithm() {
        let config = AgentConfig::default().with_seed(3);
        for algorithm in Algorithm::ALL {
            let mut agent = build_agent::<usize>(algorithm, &config, mdp()).unwrap();
            agent
                .fit(&[Transition::new(0, 0, 1.0, 1, false)], 1)
                .unwrap();
            let action = agent.draw_action(&0).unwrap();
            assert!(action < 2);
        }
    }

    #[test]
    fn test_agent_names() {
        let config = AgentConfig::default();
        let names: Vec<String> = Algorithm::ALL
            .iter()
            .map(|&algorithm| {
                build_agent::<usize>(algorithm, &config, mdp())
                    .unwrap()
                    .name()
                    .to_string()
            })
            .collect();
        assert_eq!(
            names,
            vec!["QLearning", "DoubleQLearning", "WeightedQLearning", "SARSA"]
        );
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let bad_epsilon = AgentConfig::default().with_epsilon(2.0);
        assert!(build_agent::<usize>(Algorithm::QLearning, &bad_epsilon, mdp()).is_err());

        let no_samples = AgentConfig::default().with_precision(0);
        assert!(build_agent::<usize>(Algorithm::WeightedQLearning, &no_samples, mdp()).is_err());
        assert!(build_agent::<usize>(Algorithm::QLearning, &no_samples, mdp()).is_ok());
    }
}
