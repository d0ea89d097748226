//! Ensemble of independently trained approximators

use crate::{
    Error, Result,
    ports::{Approximator, FitParams},
};

/// Fixed collection of models.
///
/// As an [`Approximator`] it predicts the mean of its members and fits every
/// member on the same target. Double Q-Learning instead addresses the members
/// individually through `TryFrom<Ensemble<M>> for [M; 2]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensemble<M> {
    models: Vec<M>,
}

impl<M> Ensemble<M> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfiguration`] for an empty model list.
    pub fn new(models: Vec<M>) -> Result<Self> {
        if models.is_empty() {
            return Err(Error::InvalidConfiguration {
                message: "ensemble needs at least one model".to_string(),
            });
        }
        Ok(Self { models })
    }

    /// `n` models produced by `make`.
    pub fn from_fn(n: usize, make: impl FnMut() -> M) -> Result<Self> {
        Self::new(std::iter::repeat_with(make).take(n).collect())
    }

    pub fn n_models(&self) -> usize {
        self.models.len()
    }

    pub fn model(&self, idx: usize) -> Option<&M> {
        self.models.get(idx)
    }

    pub fn model_mut(&mut self, idx: usize) -> Option<&mut M> {
        self.models.get_mut(idx)
    }

    pub fn models(&self) -> &[M] {
        &self.models
    }

    pub fn into_models(self) -> Vec<M> {
        self.models
    }
}

impl<S, M: Approximator<S>> Approximator<S> for Ensemble<M> {
    fn predict(&self, state: &S, action: usize) -> f64 {
        let total: f64 = self
            .models
            .iter()
            .map(|model| model.predict(state, action))
            .sum();
        total / self.models.len() as f64
    }

    /// Fits every member in order.
    ///
    /// `params` is validated once up front, so invalid options leave all
    /// members untouched. A member failing for another reason stops the loop;
    /// members before it keep their update.
    fn fit(&mut self, state: &S, action: usize, target: f64, params: &FitParams) -> Result<()> {
        params.validate()?;
        for model in &mut self.models {
            model.fit(state, action, target, params)?;
        }
        Ok(())
    }
}

impl<M> TryFrom<Ensemble<M>> for [M; 2] {
    type Error = Error;

    fn try_from(ensemble: Ensemble<M>) -> Result<Self> {
        let actual = ensemble.n_models();
        ensemble
            .into_models()
            .try_into()
            .map_err(|_| Error::EnsembleSize {
                expected: 2,
                actual,
            })
    }
}
