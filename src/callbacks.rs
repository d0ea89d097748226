//! Convergence monitoring callbacks

use crate::{
    Result,
    ports::{Agent, Approximator, Observer},
    types::{ActionSpace, Transition},
};

/// Records `max_a Q(state, a)` for a fixed state every time it is invoked.
///
/// Typically attached to an experiment to watch the estimate of the start
/// state converge (or overshoot).
#[derive(Debug, Clone)]
pub struct CollectMaxQ<S> {
    state: S,
    action_space: ActionSpace,
    max_qs: Vec<f64>,
}

impl<S> CollectMaxQ<S> {
    pub fn new(state: S, action_space: ActionSpace) -> Self {
        Self {
            state,
            action_space,
            max_qs: Vec::new(),
        }
    }

    /// Query `approximator` and append the maximum action value.
    pub fn collect<A>(&mut self, approximator: &A)
    where
        A: Approximator<S> + ?Sized,
    {
        self.record(|state, action| approximator.predict(state, action));
    }

    fn record(&mut self, predict: impl Fn(&S, usize) -> f64) {
        let max_q = self
            .action_space
            .values()
            .iter()
            .map(|&action| predict(&self.state, action))
            .fold(f64::NEG_INFINITY, f64::max);
        self.max_qs.push(max_q);
    }

    /// Every value recorded so far, oldest first.
    pub fn values(&self) -> &[f64] {
        &self.max_qs
    }

    pub fn state(&self) -> &S {
        &self.state
    }

    pub fn into_values(self) -> Vec<f64> {
        self.max_qs
    }
}

impl<S> Observer<S> for CollectMaxQ<S> {
    fn on_step(
        &mut self,
        _step: usize,
        _transition: &Transition<S>,
        agent: &dyn Agent<S>,
    ) -> Result<()> {
        self.record(|state, action| agent.predict(state, action));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::Table;

    #[test]
    fn test_collects_max_over_actions() {
        let space = ActionSpace::discrete(3).unwrap();
        let mut collector = CollectMaxQ::new(4usize, space);
        let mut table = Table::new(0.0);

        collector.collect(&table);
        table.set(4usize, 2, 1.5);
        table.set(4usize, 0, -3.0);
        collector.collect(&table);
        table.set(5usize, 1, 99.0);
        collector.collect(&table);

        assert_eq!(collector.values(), &[0.0, 1.5, 1.5]);
    }
}
