//! The single-step TD update shared by every algorithm
//!
//! Q(s,a) ← Q(s,a) + α[r + γ q_next - Q(s,a)]
//!
//! Algorithms differ only in how `q_next` is resolved, which is supplied as a
//! closure by the caller.

use tracing::debug;

use crate::{
    Error, Result,
    ports::{Approximator, FitParams, LearningRate},
    types::{MdpInfo, Transition},
};

/// Every quantity computed by one update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TdStep {
    pub q_current: f64,
    pub q_next: f64,
    /// `reward + gamma * q_next`
    pub target: f64,
    pub alpha: f64,
    /// Value passed to `fit`.
    pub q_new: f64,
}

/// Check the fit preconditions and return the transition to learn from.
///
/// Only the last element of `dataset` is used.
///
/// # Errors
///
/// - [`Error::UnsupportedFitIterations`] if `n_fit_iterations != 1`
/// - [`Error::EmptyDataset`] if `dataset` is empty
pub fn last_transition<S>(
    dataset: &[Transition<S>],
    n_fit_iterations: usize,
) -> Result<&Transition<S>> {
    if n_fit_iterations != 1 {
        return Err(Error::UnsupportedFitIterations {
            requested: n_fit_iterations,
        });
    }
    dataset.last().ok_or(Error::EmptyDataset)
}

/// Apply one TD update for `transition` and fit `approximator` on the result.
///
/// `next_q` is only called for non-absorbing transitions and receives the
/// approximator before the update. The learning rate is drawn after `q_next`
/// has been resolved, so a failing resolver leaves the schedule untouched.
///
/// # Errors
///
/// Propagates errors from `next_q` and from the approximator's `fit`.
pub fn td_update<S, A, L, F>(
    approximator: &mut A,
    learning_rate: &mut L,
    mdp_info: &MdpInfo,
    fit_params: &FitParams,
    transition: &Transition<S>,
    next_q: F,
) -> Result<TdStep>
where
    A: Approximator<S> + ?Sized,
    L: LearningRate<S> + ?Sized,
    F: FnOnce(&A, &S) -> Result<f64>,
{
    let Transition {
        state,
        action,
        reward,
        next_state,
        absorbing,
        ..
    } = transition;

    let q_current = approximator.predict(state, *action);
    let q_next = if *absorbing {
        0.0
    } else {
        next_q(&*approximator, next_state)?
    };

    let target = reward + mdp_info.gamma * q_next;
    let alpha = learning_rate.rate(state, *action);
    let q_new = q_current + alpha * (target - q_current);

    approximator.fit(state, *action, q_new, fit_params)?;

    debug!(
        action = *action,
        reward = *reward,
        absorbing = *absorbing,
        q_current,
        q_next,
        target,
        alpha,
        q_new,
        "td update"
    );

    Ok(TdStep {
        q_current,
        q_next,
        target,
        alpha,
        q_new,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        adapters::{ConstantRate, Table},
        types::ActionSpace,
    };

    fn mdp() -> MdpInfo {
        MdpInfo::new(0.9, ActionSpace::discrete(2).unwrap()).unwrap()
    }

    #[test]
    fn test_absorbing_update_ignores_next_value() {
        let mut table = Table::new(0.0);
        let mut lr = ConstantRate::new(0.1).unwrap();
        let t = Transition::new(0usize, 1, 5.0, 0, true);

        let step = td_update(&mut table, &mut lr, &mdp(), &FitParams::default(), &t, |_, _| {
            panic!("absorbing transitions must not bootstrap")
        })
        .unwrap();

        assert_eq!(step.q_next, 0.0);
        assert_eq!(step.target, 5.0);
        assert!((step.q_new - 0.5).abs() < 1e-12);
        assert!((table.get(&0, 1) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_bootstrap_update() {
        let mut table = Table::new(0.0);
        table.set(0usize, 0, 1.0);
        let mut lr = ConstantRate::new(0.5).unwrap();
        let t = Transition::new(0usize, 0, 1.0, 1, false);

        let step = td_update(&mut table, &mut lr, &mdp(), &FitParams::default(), &t, |_, s| {
            assert_eq!(*s, 1);
            Ok(2.0)
        })
        .unwrap();

        // target = 1 + 0.9 * 2 = 2.8; q_new = 1 + 0.5 * (2.8 - 1) = 1.9
        assert!((step.target - 2.8).abs() < 1e-12);
        assert!((step.q_new - 1.9).abs() < 1e-12);
        assert!((table.get(&0, 0) - 1.9).abs() < 1e-12);
    }

    #[test]
    fn test_resolver_error_leaves_table_untouched() {
        let mut table = Table::new(0.0);
        let mut lr = ConstantRate::new(0.5).unwrap();
        let t = Transition::new(0usize, 0, 1.0, 1, false);

        let result = td_update(&mut table, &mut lr, &mdp(), &FitParams::default(), &t, |_, _| {
            Err(Error::ClosedFormWeightsUnsupported)
        });

        assert!(result.is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_last_transition_preconditions() {
        let dataset = vec![
            Transition::new(0usize, 0, 1.0, 1, false),
            Transition::new(1usize, 1, 2.0, 2, true),
        ];
        assert_eq!(last_transition(&dataset, 1).unwrap().state, 1);
        assert!(matches!(
            last_transition(&dataset, 2),
            Err(Error::UnsupportedFitIterations { requested: 2 })
        ));
        let empty: Vec<Transition<usize>> = Vec::new();
        assert!(matches!(
            last_transition(&empty, 1),
            Err(Error::EmptyDataset)
        ));
    }
}
