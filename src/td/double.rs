//! Double Q-Learning
//!
//! Two estimators are trained on disjoint halves of the experience. The model
//! being updated picks the greedy next action, the other model evaluates it,
//! which removes the single-estimator maximization bias.
//!
//! "Double Q-learning", van Hasselt, 2010.

use std::marker::PhantomData;

use rand::{Rng, rngs::StdRng};

use crate::{
    Error, Result,
    adapters::Ensemble,
    ports::{Agent, Approximator, FitParams, LearningRate, Policy},
    td::update::{TdStep, last_transition, td_update},
    types::{MdpInfo, Transition},
    utils::{build_rng, max_action},
};

/// Picks which of the two models is updated by the next fit.
pub trait ModelSelector {
    /// `0` or `1`.
    fn select(&mut self) -> usize;
}

/// Fair coin over a seedable generator.
#[derive(Debug, Clone)]
pub struct UniformSelector {
    rng: StdRng,
}

impl UniformSelector {
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            rng: build_rng(seed),
        }
    }
}

impl ModelSelector for UniformSelector {
    fn select(&mut self) -> usize {
        if self.rng.random::<f64>() < 0.5 { 0 } else { 1 }
    }
}

/// Double Q-Learning agent over a pair of models
#[derive(Debug, Clone)]
pub struct DoubleQLearning<S, M, L, P, C = UniformSelector> {
    models: [M; 2],
    learning_rates: [L; 2],
    policy: P,
    selector: C,
    mdp_info: MdpInfo,
    fit_params: FitParams,
    _state: PhantomData<fn(&S)>,
}

impl<S, M, L: Clone, P, C: ModelSelector> DoubleQLearning<S, M, L, P, C> {
    /// Build the agent from an ensemble of exactly two models.
    ///
    /// Each model gets its own copy of `learning_rate`, so visits routed to
    /// one model never advance the schedule of the other.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EnsembleSize`] unless the ensemble has two models.
    pub fn new(
        ensemble: Ensemble<M>,
        policy: P,
        learning_rate: L,
        mdp_info: MdpInfo,
        selector: C,
    ) -> Result<Self> {
        let models: [M; 2] = ensemble.try_into()?;
        Ok(Self {
            models,
            learning_rates: [learning_rate.clone(), learning_rate],
            policy,
            selector,
            mdp_info,
            fit_params: FitParams::default(),
            _state: PhantomData,
        })
    }
}

impl<S, M, L, P, C> DoubleQLearning<S, M, L, P, C> {
    pub fn with_fit_params(mut self, fit_params: FitParams) -> Self {
        self.fit_params = fit_params;
        self
    }

    pub fn models(&self) -> &[M; 2] {
        &self.models
    }

    pub fn learning_rates(&self) -> &[L; 2] {
        &self.learning_rates
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn mdp_info(&self) -> &MdpInfo {
        &self.mdp_info
    }
}

impl<S, M, L, P, C> DoubleQLearning<S, M, L, P, C>
where
    M: Approximator<S>,
    L: LearningRate<S>,
    C: ModelSelector,
{
    /// Update one randomly selected model and report which one.
    ///
    /// # Errors
    ///
    /// See [`Agent::fit`]; also [`Error::InvalidModelIndex`] if the selector
    /// returns anything but 0 or 1.
    pub fn update(
        &mut self,
        dataset: &[Transition<S>],
        n_fit_iterations: usize,
    ) -> Result<(usize, TdStep)> {
        let transition = last_transition(dataset, n_fit_iterations)?;

        let idx = self.selector.select();
        let [first, second] = &mut self.models;
        let (selected, other) = match idx {
            0 => (first, &*second),
            1 => (second, &*first),
            index => return Err(Error::InvalidModelIndex { index }),
        };

        let action_space = &self.mdp_info.action_space;
        let step = td_update(
            selected,
            &mut self.learning_rates[idx],
            &self.mdp_info,
            &self.fit_params,
            transition,
            |selected, next_state| {
                let (_, best_action) = max_action(selected, next_state, action_space);
                Ok(other.predict(next_state, best_action))
            },
        )?;

        Ok((idx, step))
    }
}

impl<S, M, L, P, C> Agent<S> for DoubleQLearning<S, M, L, P, C>
where
    M: Approximator<S>,
    L: LearningRate<S>,
    P: Policy<S>,
    C: ModelSelector,
{
    fn fit(&mut self, dataset: &[Transition<S>], n_fit_iterations: usize) -> Result<()> {
        self.update(dataset, n_fit_iterations).map(|_| ())
    }

    fn draw_action(&mut self, state: &S) -> Result<usize> {
        let q_values: Vec<f64> = self
            .mdp_info
            .action_space
            .values()
            .iter()
            .map(|&action| self.predict(state, action))
            .collect();
        self.policy
            .draw_action(state, &q_values, &self.mdp_info.action_space)
    }

    fn predict(&self, state: &S, action: usize) -> f64 {
        let [first, second] = &self.models;
        0.5 * (first.predict(state, action) + second.predict(state, action))
    }

    fn name(&self) -> &str {
        "DoubleQLearning"
    }
}
