//! Learning-rate port

/// Step-size schedule keyed by state-action pair.
///
/// Schedules are stateful: calling [`LearningRate::rate`] counts as a visit
/// and may decay subsequent values. Implementations must be `Clone` where an
/// agent needs independent copies (Double Q-Learning keeps one per model).
pub trait LearningRate<S> {
    /// Step size for this visit of `(state, action)`.
    fn rate(&mut self, state: &S, action: usize) -> f64;
}
