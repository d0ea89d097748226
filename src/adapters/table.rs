//! Tabular approximator

use std::{collections::HashMap, hash::Hash};

use crate::{
    Result,
    ports::{Approximator, FitParams},
};

/// Table mapping (state, action) pairs to values
///
/// Unseen pairs read as `init`.
#[derive(Debug, Clone, PartialEq)]
pub struct Table<S: Eq + Hash> {
    values: HashMap<(S, usize), f64>,
    init: f64,
}

impl<S: Clone + Eq + Hash> Table<S> {
    /// Create an empty table returning `init` for unseen pairs
    pub fn new(init: f64) -> Self {
        Self {
            values: HashMap::new(),
            init,
        }
    }

    /// Get the value for a state-action pair
    pub fn get(&self, state: &S, action: usize) -> f64 {
        // Tuple keys cannot be borrowed piecewise, so the lookup key is owned.
        *self
            .values
            .get(&(state.clone(), action))
            .unwrap_or(&self.init)
    }

    /// Set the value for a state-action pair
    pub fn set(&mut self, state: S, action: usize, value: f64) {
        self.values.insert((state, action), value);
    }

    /// Value returned for pairs that were never written
    pub fn init(&self) -> f64 {
        self.init
    }

    /// Number of pairs written so far
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate over written entries in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = (&S, usize, f64)> {
        self.values
            .iter()
            .map(|((state, action), value)| (state, *action, *value))
    }

    /// Forget every written value
    pub fn reset(&mut self) {
        self.values.clear();
    }
}

impl<S: Clone + Eq + Hash> Approximator<S> for Table<S> {
    fn predict(&self, state: &S, action: usize) -> f64 {
        self.get(state, action)
    }

    fn fit(&mut self, state: &S, action: usize, target: f64, params: &FitParams) -> Result<()> {
        params.validate()?;
        let current = self.get(state, action);
        self.set(
            state.clone(),
            action,
            current + params.weight * (target - current),
        );
        Ok(())
    }
}
