//! Policy port - action selection from action values

use crate::{Result, types::ActionSpace};

/// Chooses an action given the action values of a state.
pub trait Policy<S> {
    /// Draw an action for `state`.
    ///
    /// `q_values[i]` is the value of `action_space.values()[i]`; the returned
    /// action is an element of `action_space.values()`.
    ///
    /// # Errors
    ///
    /// Returns an error if `q_values` does not match the action space.
    fn draw_action(
        &mut self,
        state: &S,
        q_values: &[f64],
        action_space: &ActionSpace,
    ) -> Result<usize>;
}
