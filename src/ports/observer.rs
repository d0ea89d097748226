//! Observer port - monitoring hooks for experiments
//!
//! The methods are called in the following order:
//! 1. `on_experiment_start(n_steps)` once
//! 2. `on_step(...)` after every agent update
//! 3. `on_episode_end(episode)` whenever an episode terminates
//! 4. `on_experiment_end()` once
//!
//! All methods default to no-ops.

use crate::{Result, ports::Agent, types::Transition};

pub trait Observer<S> {
    fn on_experiment_start(&mut self, _n_steps: usize) -> Result<()> {
        Ok(())
    }

    /// Called after the agent was fitted on `transition`.
    fn on_step(
        &mut self,
        _step: usize,
        _transition: &Transition<S>,
        _agent: &dyn Agent<S>,
    ) -> Result<()> {
        Ok(())
    }

    fn on_episode_end(&mut self, _episode: usize) -> Result<()> {
        Ok(())
    }

    fn on_experiment_end(&mut self) -> Result<()> {
        Ok(())
    }
}
