//! Next-state value resolvers
//!
//! A resolver decides what `q_next` in `r + γ q_next` means. Everything else
//! about an update is shared (see [`crate::td::update::td_update`]).

use crate::{
    Result,
    ports::{Approximator, Policy},
    td::update::TdStep,
    types::MdpInfo,
    utils::{action_values, max_action},
};

/// Collaborators a resolver may consult while resolving `q_next`.
pub struct ResolveContext<'a, A: ?Sized, P: ?Sized> {
    /// The approximator being updated, before the update.
    pub approximator: &'a A,
    pub policy: &'a mut P,
    pub mdp_info: &'a MdpInfo,
}

/// Strategy resolving the bootstrap value of the next state.
pub trait NextValue<S, A: ?Sized, P: ?Sized> {
    /// Algorithm name reported by the agent.
    fn name(&self) -> &'static str;

    /// Value of `next_state` used in the TD target.
    ///
    /// Only called for non-absorbing transitions.
    fn next_q(&mut self, ctx: ResolveContext<'_, A, P>, next_state: &S) -> Result<f64>;

    /// Called after the approximator was fitted on `(state, action)`.
    fn after_fit(&mut self, _state: &S, _action: usize, _step: &TdStep) {}

    /// Action already committed to for `state`, if any.
    fn take_pending_action(&mut self, _state: &S) -> Option<usize> {
        None
    }

    fn start_episode(&mut self) {}
}

/// Q-Learning: greedy bootstrap `max_a Q(s', a)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxNextValue;

impl<S, A, P> NextValue<S, A, P> for MaxNextValue
where
    A: Approximator<S> + ?Sized,
    P: ?Sized,
{
    fn name(&self) -> &'static str {
        "QLearning"
    }

    fn next_q(&mut self, ctx: ResolveContext<'_, A, P>, next_state: &S) -> Result<f64> {
        let (max_q, _) = max_action(ctx.approximator, next_state, &ctx.mdp_info.action_space);
        Ok(max_q)
    }
}

/// SARSA: bootstrap on the action the policy actually picks in `s'`.
///
/// The drawn action is kept together with `s'` and returned by the agent's
/// next `draw_action` for that same state, so behaviour follows the action
/// that was bootstrapped on. A request for any other state discards it.
#[derive(Debug, Clone)]
pub struct OnPolicyNextValue<S> {
    next_action: Option<(S, usize)>,
}

impl<S> Default for OnPolicyNextValue<S> {
    fn default() -> Self {
        Self { next_action: None }
    }
}

impl<S> OnPolicyNextValue<S> {
    pub fn pending_action(&self) -> Option<usize> {
        self.next_action.as_ref().map(|(_, action)| *action)
    }

    /// State the pending action was drawn for.
    pub fn pending_state(&self) -> Option<&S> {
        self.next_action.as_ref().map(|(state, _)| state)
    }
}

impl<S, A, P> NextValue<S, A, P> for OnPolicyNextValue<S>
where
    S: Clone + PartialEq,
    A: Approximator<S> + ?Sized,
    P: Policy<S> + ?Sized,
{
    fn name(&self) -> &'static str {
        "SARSA"
    }

    fn next_q(&mut self, ctx: ResolveContext<'_, A, P>, next_state: &S) -> Result<f64> {
        let action_space = &ctx.mdp_info.action_space;
        let q_values = action_values(ctx.approximator, next_state, action_space);
        let next_action = ctx.policy.draw_action(next_state, &q_values, action_space)?;
        self.next_action = Some((next_state.clone(), next_action));
        Ok(ctx.approximator.predict(next_state, next_action))
    }

    fn take_pending_action(&mut self, state: &S) -> Option<usize> {
        match self.next_action.take() {
            Some((pending_state, action)) if pending_state == *state => Some(action),
            _ => None,
        }
    }

    fn start_episode(&mut self) {
        self.next_action = None;
    }
}
