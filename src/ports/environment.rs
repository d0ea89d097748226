//! Environment port

use crate::{Result, types::MdpInfo};

/// Result of one environment step.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome<S> {
    pub next_state: S,
    pub reward: f64,
    pub absorbing: bool,
}

/// Episodic environment driven by an experiment.
pub trait Environment<S> {
    fn mdp_info(&self) -> &MdpInfo;

    /// Start a new episode and return its initial state.
    fn reset(&mut self) -> S;

    /// Apply `action` in the current state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidAction`] for actions outside the action space.
    fn step(&mut self, action: usize) -> Result<StepOutcome<S>>;
}
