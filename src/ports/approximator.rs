//! Approximator port - the action-value function being learned
//!
//! The TD core only ever calls [`Approximator::predict`] and
//! [`Approximator::fit`]; how values are stored is up to the adapter
//! (see [`crate::adapters::Table`] and [`crate::adapters::Ensemble`]).

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Options forwarded unchanged to [`Approximator::fit`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitParams {
    /// Fraction of the distance to the target applied by the fit.
    ///
    /// `1.0` replaces the stored value with the target.
    pub weight: f64,
}

impl FitParams {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `weight` lies in `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if !(self.weight > 0.0 && self.weight <= 1.0) {
            return Err(Error::InvalidParameter {
                name: "fit weight",
                value: self.weight,
                reason: "must lie in (0, 1]",
            });
        }
        Ok(())
    }
}

impl Default for FitParams {
    fn default() -> Self {
        Self { weight: 1.0 }
    }
}

/// Mapping from state-action pairs to values, trainable one sample at a time.
pub trait Approximator<S> {
    /// Current estimate for `(state, action)`.
    fn predict(&self, state: &S, action: usize) -> f64;

    /// Move the estimate for `(state, action)` toward `target`.
    ///
    /// # Errors
    ///
    /// Adapters may reject invalid fit options.
    fn fit(&mut self, state: &S, action: usize, target: f64, params: &FitParams) -> Result<()>;
}
