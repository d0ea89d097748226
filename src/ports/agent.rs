//! Agent port - unified interface over every TD algorithm
//!
//! Experiments, observers and the CLI only see `dyn Agent<S>`, so Q-Learning,
//! SARSA, Weighted Q-Learning and Double Q-Learning are interchangeable.

use crate::{Result, types::Transition};

/// Online TD control agent.
pub trait Agent<S> {
    /// Single update from the last transition of `dataset`.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::UnsupportedFitIterations`] if `n_fit_iterations != 1`
    /// - [`crate::Error::EmptyDataset`] if `dataset` is empty
    /// - any error raised while resolving the next-state value
    fn fit(&mut self, dataset: &[Transition<S>], n_fit_iterations: usize) -> Result<()>;

    /// Select the action to play in `state`.
    ///
    /// # Errors
    ///
    /// Propagates policy failures.
    fn draw_action(&mut self, state: &S) -> Result<usize>;

    /// Current action-value estimate.
    ///
    /// Agents with several models report their mean.
    fn predict(&self, state: &S, action: usize) -> f64;

    /// Algorithm name used in logs and reports.
    fn name(&self) -> &str;

    /// Called when a new episode begins.
    ///
    /// The default implementation does nothing.
    fn start_episode(&mut self) {}
}
