//! Action-selection policies

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{
    Error, Result,
    ports::Policy,
    types::ActionSpace,
    utils::{argmax, build_rng},
};

/// Always plays the highest-valued action (first one on ties).
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl<S> Policy<S> for Greedy {
    fn draw_action(
        &mut self,
        _state: &S,
        q_values: &[f64],
        action_space: &ActionSpace,
    ) -> Result<usize> {
        check_len(q_values, action_space)?;
        Ok(action_space.values()[argmax(q_values)])
    }
}

/// ε-greedy action selection
///
/// Explores uniformly with probability ε, otherwise acts greedily.
#[derive(Debug, Clone)]
pub struct EpsilonGreedy {
    epsilon: f64,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl EpsilonGreedy {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `epsilon` lies in `[0, 1]`.
    pub fn new(epsilon: f64, seed: Option<u64>) -> Result<Self> {
        let mut policy = Self {
            epsilon: 0.0,
            rng: build_rng(seed),
            rng_seed: seed,
        };
        policy.set_epsilon(epsilon)?;
        Ok(policy)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidParameter {
                name: "epsilon",
                value: epsilon,
                reason: "must lie in [0, 1]",
            });
        }
        self.epsilon = epsilon;
        Ok(())
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self.rng_seed = Some(seed);
        self
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }
}

impl<S> Policy<S> for EpsilonGreedy {
    fn draw_action(
        &mut self,
        _state: &S,
        q_values: &[f64],
        action_space: &ActionSpace,
    ) -> Result<usize> {
        check_len(q_values, action_space)?;
        let idx = if self.rng.random::<f64>() < self.epsilon {
            // Explore: random action
            self.rng.random_range(0..action_space.size())
        } else {
            argmax(q_values)
        };
        Ok(action_space.values()[idx])
    }
}

fn check_len(q_values: &[f64], action_space: &ActionSpace) -> Result<()> {
    if q_values.len() != action_space.size() {
        return Err(Error::InvalidConfiguration {
            message: format!(
                "policy received {} action values for {} actions",
                q_values.len(),
                action_space.size()
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greedy_picks_best_action_value() {
        let space = ActionSpace::from_values(vec![5, 6, 7]).unwrap();
        let action = Policy::<usize>::draw_action(&mut Greedy, &0, &[0.1, 0.9, 0.9], &space);
        assert_eq!(action.unwrap(), 6);
    }

    #[test]
    fn test_zero_epsilon_is_greedy() {
        let space = ActionSpace::discrete(3).unwrap();
        let mut policy = EpsilonGreedy::new(0.0, Some(1)).unwrap();
        for _ in 0..20 {
            assert_eq!(policy.draw_action(&0usize, &[0.0, 0.0, 1.0], &space).unwrap(), 2);
        }
    }

    #[test]
    fn test_full_exploration_covers_all_actions() {
        let space = ActionSpace::discrete(3).unwrap();
        let mut policy = EpsilonGreedy::new(1.0, Some(7)).unwrap();
        let mut seen = [false; 3];
        for _ in 0..200 {
            seen[policy.draw_action(&0usize, &[0.0, 0.0, 1.0], &space).unwrap()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_seeded_policies_agree() {
        let space = ActionSpace::discrete(4).unwrap();
        let mut a = EpsilonGreedy::new(0.5, Some(42)).unwrap();
        let mut b = EpsilonGreedy::new(0.5, None).unwrap().with_seed(42);
        for _ in 0..50 {
            let q = [0.3, 0.1, 0.0, 0.2];
            assert_eq!(
                a.draw_action(&0usize, &q, &space).unwrap(),
                b.draw_action(&0usize, &q, &space).unwrap()
            );
        }
    }

    #[test]
    fn test_mismatched_values_rejected() {
        let space = ActionSpace::discrete(2).unwrap();
        assert!(Policy::<usize>::draw_action(&mut Greedy, &0, &[1.0], &space).is_err());
        assert!(EpsilonGreedy::new(1.2, None).is_err());
    }
}
