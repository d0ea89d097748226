//! Core data types shared by every TD algorithm
//!
//! - [`Transition`]: one observed `(s, a, r, s', absorbing, info)` record
//! - [`StateAction`]: key used by tables, schedules and statistics
//! - [`ActionSpace`] and [`MdpInfo`]: read-only problem description

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Key indexing approximators and per-key statistics.
pub type StateAction<S> = (S, usize);

/// Free-form diagnostic values attached to a transition by the environment.
pub type TransitionInfo = BTreeMap<String, f64>;

/// One observed environment step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transition<S> {
    pub state: S,
    pub action: usize,
    pub reward: f64,
    pub next_state: S,
    /// Terminal flag: no value is bootstrapped from `next_state` when set.
    pub absorbing: bool,
    #[serde(default)]
    pub info: TransitionInfo,
}

impl<S> Transition<S> {
    pub fn new(state: S, action: usize, reward: f64, next_state: S, absorbing: bool) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            absorbing,
            info: TransitionInfo::new(),
        }
    }

    /// Attach a diagnostic value.
    pub fn with_info(mut self, key: impl Into<String>, value: f64) -> Self {
        self.info.insert(key.into(), value);
        self
    }
}

/// Enumerable set of legal actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionSpace {
    values: Vec<usize>,
}

impl ActionSpace {
    /// Actions `0..n`.
    pub fn discrete(n: usize) -> Result<Self> {
        Self::from_values((0..n).collect())
    }

    pub fn from_values(values: Vec<usize>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::EmptyActionSpace);
        }
        Ok(Self { values })
    }

    pub fn values(&self) -> &[usize] {
        &self.values
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn contains(&self, action: usize) -> bool {
        self.values.contains(&action)
    }
}

/// MDP description shared by all resolvers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MdpInfo {
    pub gamma: f64,
    pub action_space: ActionSpace,
}

impl MdpInfo {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `gamma` lies outside `[0, 1]`.
    pub fn new(gamma: f64, action_space: ActionSpace) -> Result<Self> {
        if !(0.0..=1.0).contains(&gamma) {
            return Err(Error::InvalidParameter {
                name: "gamma",
                value: gamma,
                reason: "discount factor must lie in [0, 1]",
            });
        }
        Ok(Self {
            gamma,
            action_space,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discrete_action_space() {
        let space = ActionSpace::discrete(4).unwrap();
        assert_eq!(space.values(), &[0, 1, 2, 3]);
        assert_eq!(space.size(), 4);
        assert!(space.contains(3));
        assert!(!space.contains(4));
    }

    #[test]
    fn test_empty_action_space_rejected() {
        assert!(matches!(
            ActionSpace::discrete(0),
            Err(Error::EmptyActionSpace)
        ));
    }

    #[test]
    fn test_gamma_out_of_range_rejected() {
        let space = ActionSpace::discrete(2).unwrap();
        assert!(MdpInfo::new(1.5, space.clone()).is_err());
        assert!(MdpInfo::new(-0.1, space.clone()).is_err());
        assert!(MdpInfo::new(1.0, space).is_ok());
    }

    #[test]
    fn test_transition_info() {
        let t = Transition::new(0usize, 1, 5.0, 3, false).with_info("noise", 10.0);
        assert_eq!(t.info.get("noise"), Some(&10.0));
    }
}
