//! TD agents built from the shared update and a next-value resolver

use std::{hash::Hash, marker::PhantomData};

use crate::{
    Result,
    ports::{Agent, Approximator, FitParams, LearningRate, Policy},
    td::{
        resolvers::{MaxNextValue, NextValue, OnPolicyNextValue, ResolveContext},
        update::{TdStep, last_transition, td_update},
        weighted::WeightedNextValue,
    },
    types::{MdpInfo, Transition},
    utils::action_values,
};

/// Single-approximator TD control agent
///
/// The update arithmetic is fixed; the resolver `R` decides how the
/// next-state value is bootstrapped.
#[derive(Debug, Clone)]
pub struct Td<S, A, L, P, R> {
    approximator: A,
    learning_rate: L,
    policy: P,
    resolver: R,
    mdp_info: MdpInfo,
    fit_params: FitParams,
    _state: PhantomData<fn(&S)>,
}

/// Off-policy TD control (Watkins, 1989)
pub type QLearning<S, A, L, P> = Td<S, A, L, P, MaxNextValue>;

/// On-policy TD control
pub type Sarsa<S, A, L, P> = Td<S, A, L, P, OnPolicyNextValue<S>>;

/// Weighted Q-Learning (D'Eramo et al., 2016)
pub type WeightedQLearning<S, A, L, P> = Td<S, A, L, P, WeightedNextValue<S>>;

impl<S, A, L, P, R> Td<S, A, L, P, R> {
    pub fn new(approximator: A, policy: P, learning_rate: L, mdp_info: MdpInfo, resolver: R) -> Self {
        Self {
            approximator,
            learning_rate,
            policy,
            resolver,
            mdp_info,
            fit_params: FitParams::default(),
            _state: PhantomData,
        }
    }

    /// Options forwarded to every approximator fit.
    pub fn with_fit_params(mut self, fit_params: FitParams) -> Self {
        self.fit_params = fit_params;
        self
    }

    pub fn approximator(&self) -> &A {
        &self.approximator
    }

    pub fn approximator_mut(&mut self) -> &mut A {
        &mut self.approximator
    }

    pub fn learning_rate(&self) -> &L {
        &self.learning_rate
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn mdp_info(&self) -> &MdpInfo {
        &self.mdp_info
    }
}

impl<S, A, L, P> QLearning<S, A, L, P> {
    pub fn q_learning(approximator: A, policy: P, learning_rate: L, mdp_info: MdpInfo) -> Self {
        Self::new(approximator, policy, learning_rate, mdp_info, MaxNextValue)
    }
}

impl<S, A, L, P> Sarsa<S, A, L, P> {
    pub fn sarsa(approximator: A, policy: P, learning_rate: L, mdp_info: MdpInfo) -> Self {
        Self::new(
            approximator,
            policy,
            learning_rate,
            mdp_info,
            OnPolicyNextValue::default(),
        )
    }
}

impl<S: Clone + Eq + Hash, A, L, P> WeightedQLearning<S, A, L, P> {
    /// Weighted Q-Learning with a sampling resolver seeded by `seed`.
    pub fn weighted(
        approximator: A,
        policy: P,
        learning_rate: L,
        mdp_info: MdpInfo,
        seed: Option<u64>,
    ) -> Self {
        Self::new(
            approximator,
            policy,
            learning_rate,
            mdp_info,
            WeightedNextValue::new(seed),
        )
    }
}

impl<S, A, L, P, R> Td<S, A, L, P, R>
where
    A: Approximator<S>,
    L: LearningRate<S>,
    R: NextValue<S, A, P>,
{
    /// Update from the last transition of `dataset` and report the step.
    ///
    /// # Errors
    ///
    /// See [`Agent::fit`].
    pub fn update(&mut self, dataset: &[Transition<S>], n_fit_iterations: usize) -> Result<TdStep> {
        let transition = last_transition(dataset, n_fit_iterations)?;

        let resolver = &mut self.resolver;
        let policy = &mut self.policy;
        let mdp_info = &self.mdp_info;
        let step = td_update(
            &mut self.approximator,
            &mut self.learning_rate,
            mdp_info,
            &self.fit_params,
            transition,
            |approximator, next_state| {
                resolver.next_q(
                    ResolveContext {
                        approximator,
                        policy,
                        mdp_info,
                    },
                    next_state,
                )
            },
        )?;

        self.resolver
            .after_fit(&transition.state, transition.action, &step);
        Ok(step)
    }
}

impl<S, A, L, P, R> Agent<S> for Td<S, A, L, P, R>
where
    A: Approximator<S>,
    L: LearningRate<S>,
    P: Policy<S>,
    R: NextValue<S, A, P>,
{
    fn fit(&mut self, dataset: &[Transition<S>], n_fit_iterations: usize) -> Result<()> {
        self.update(dataset, n_fit_iterations).map(|_| ())
    }

    fn draw_action(&mut self, state: &S) -> Result<usize> {
        if let Some(action) = self.resolver.take_pending_action(state) {
            return Ok(action);
        }
        let q_values = action_values(&self.approximator, state, &self.mdp_info.action_space);
        self.policy
            .draw_action(state, &q_values, &self.mdp_info.action_space)
    }

    fn predict(&self, state: &S, action: usize) -> f64 {
        self.approximator.predict(state, action)
    }

    fn name(&self) -> &str {
        self.resolver.name()
    }

    fn start_episode(&mut self) {
        self.resolver.start_episode();
    }
}
