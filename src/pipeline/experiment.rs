//! Online experiment loop: act, observe, fit, notify

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::{
    Result,
    ports::{Agent, Environment, Observer},
    types::Transition,
};

/// Outcome of one experiment run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentSummary {
    pub algorithm: String,
    pub steps: usize,
    /// Episodes that terminated (absorbing state or horizon)
    pub episodes: usize,
    pub total_reward: f64,
    pub mean_reward: f64,
    /// `max_a Q(s0, a)` at the end of the run, `s0` the first initial state
    pub initial_state_max_q: f64,
}

/// Runs an agent online in an environment for a fixed number of steps.
///
/// Every step draws an action, applies it and fits the agent on a
/// one-transition dataset holding that step. Agents only learn from the last
/// transition, so no history is kept. Episodes end on absorbing transitions
/// or when the horizon is reached.
#[derive(Debug, Clone)]
pub struct Experiment {
    n_steps: usize,
    horizon: Option<usize>,
}

impl Experiment {
    pub fn new(n_steps: usize) -> Self {
        Self {
            n_steps,
            horizon: None,
        }
    }

    pub fn with_horizon(mut self, horizon: Option<usize>) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn n_steps(&self) -> usize {
        self.n_steps
    }

    /// # Errors
    ///
    /// Stops at the first failing agent update, environment step or observer.
    pub fn run<S: Clone>(
        &self,
        agent: &mut dyn Agent<S>,
        env: &mut dyn Environment<S>,
        observers: &mut [&mut dyn Observer<S>],
    ) -> Result<ExperimentSummary> {
        info!(
            algorithm = agent.name(),
            n_steps = self.n_steps,
            horizon = ?self.horizon,
            "experiment started"
        );
        for observer in observers.iter_mut() {
            observer.on_experiment_start(self.n_steps)?;
        }

        let initial_state = env.reset();
        agent.start_episode();
        let mut state = initial_state.clone();
        let mut episode_steps = 0;
        let mut episodes = 0;
        let mut total_reward = 0.0;

        for step in 0..self.n_steps {
            let action = agent.draw_action(&state)?;
            let outcome = env.step(action)?;
            total_reward += outcome.reward;
            episode_steps += 1;

            let transition = Transition::new(
                state,
                action,
                outcome.reward,
                outcome.next_state.clone(),
                outcome.absorbing,
            );
            agent.fit(std::slice::from_ref(&transition), 1)?;

            for observer in observers.iter_mut() {
                observer.on_step(step, &transition, &*agent)?;
            }

            let horizon_reached = self.horizon.is_some_and(|h| episode_steps >= h);
            if outcome.absorbing || horizon_reached {
                episodes += 1;
                debug!(episode = episodes, length = episode_steps, "episode finished");
                for observer in observers.iter_mut() {
                    observer.on_episode_end(episodes)?;
                }
                state = env.reset();
                agent.start_episode();
                episode_steps = 0;
            } else {
                state = outcome.next_state;
            }
        }

        for observer in observers.iter_mut() {
            observer.on_experiment_end()?;
        }

        let initial_state_max_q = env
            .mdp_info()
            .action_space
            .values()
            .iter()
            .map(|&action| agent.predict(&initial_state, action))
            .fold(f64::NEG_INFINITY, f64::max);
        let mean_reward = if self.n_steps > 0 {
            total_reward / self.n_steps as f64
        } else {
            0.0
        };

        let summary = ExperimentSummary {
            algorithm: agent.name().to_string(),
            steps: self.n_steps,
            episodes,
            total_reward,
            mean_reward,
            initial_state_max_q,
        };
        info!(
            episodes = summary.episodes,
            mean_reward = summary.mean_reward,
            initial_state_max_q = summary.initial_state_max_q,
            "experiment finished"
        );
        Ok(summary)
    }
}
