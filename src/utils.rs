//! Helpers shared by resolvers, policies and observers

use rand::{SeedableRng, rngs::StdRng};

use crate::{ports::Approximator, types::ActionSpace};

/// Seeded generator, or one seeded from the thread RNG when `seed` is `None`.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Index of the largest value, first index on ties.
///
/// NaN entries never win. Returns 0 for an empty slice.
pub fn argmax(values: &[f64]) -> usize {
    let mut best_idx = 0;
    let mut best = f64::NEG_INFINITY;
    for (idx, &value) in values.iter().enumerate() {
        if value > best {
            best = value;
            best_idx = idx;
        }
    }
    best_idx
}

/// Predictions for every action of `action_space` in `state`, in action-space order.
pub fn action_values<S, A>(approximator: &A, state: &S, action_space: &ActionSpace) -> Vec<f64>
where
    A: Approximator<S> + ?Sized,
{
    action_space
        .values()
        .iter()
        .map(|&action| approximator.predict(state, action))
        .collect()
}

/// Maximum action value in `state` and the action attaining it.
pub fn max_action<S, A>(approximator: &A, state: &S, action_space: &ActionSpace) -> (f64, usize)
where
    A: Approximator<S> + ?Sized,
{
    let values = action_values(approximator, state, action_space);
    let idx = argmax(&values);
    (values[idx], action_space.values()[idx])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Table;

    #[test]
    fn test_argmax_first_on_ties() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0, 2.0]), 1);
        assert_eq!(argmax(&[-5.0, -1.0]), 1);
    }

    #[test]
    fn test_argmax_skips_nan() {
        assert_eq!(argmax(&[f64::NAN, 0.5, 0.2]), 1);
    }

    #[test]
    fn test_max_action_maps_to_action_values() {
        let mut table = Table::new(0.0);
        table.set(7usize, 4, 2.0);
        table.set(7usize, 9, 1.0);
        let space = ActionSpace::from_values(vec![9, 4]).unwrap();
        assert_eq!(max_action(&table, &7, &space), (2.0, 4));
    }
}
