//! Weighted Q-Learning: uncertainty-weighted bootstrap
//!
//! `max_a Q(s', a)` overestimates the maximum expected value whenever the
//! estimates are noisy, since `E[max X_a] >= max E[X_a]`. Instead, each action
//! value is weighted by the probability that the action is the true maximiser
//! under a Gaussian model of estimator uncertainty:
//!
//! `q_next = Σ_a w_a Q(s', a)`, `w_a = P(a = argmax_b X_b)`, `X_b ~ N(Q(s', b), σ_b)`
//!
//! The weights are estimated by Monte-Carlo sampling. `σ` is tracked online
//! per state-action pair from the TD targets seen so far (see
//! [`KeyStatistics::update`]).
//!
//! "Estimating the Maximum Expected Value through Gaussian Approximation",
//! D'Eramo, Restelli and Nuara, 2016.

use std::{collections::HashMap, hash::Hash};

use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    Error, Result,
    ports::Approximator,
    td::{
        resolvers::{NextValue, ResolveContext},
        update::TdStep,
    },
    utils::{action_values, build_rng},
};

/// Standard deviation assumed before a pair has two observations.
pub const INITIAL_SIGMA: f64 = 1e10;

/// Default number of Monte-Carlo samples per weight estimate.
pub const DEFAULT_PRECISION: usize = 1000;

/// Online estimator statistics for one state-action pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeyStatistics {
    /// Number of fits of this pair.
    pub n_updates: u64,
    /// Estimated standard deviation of the value estimator.
    pub sigma: f64,
    /// Exponentially weighted second moment of the TD target.
    pub q2: f64,
    /// Variance of the implicit averaging weights.
    pub weights_var: f64,
}

impl Default for KeyStatistics {
    fn default() -> Self {
        Self {
            n_updates: 0,
            sigma: INITIAL_SIGMA,
            q2: 0.0,
            weights_var: 0.0,
        }
    }
}

impl KeyStatistics {
    /// Record one fit made with step size `alpha` toward `target`, producing `q_new`.
    ///
    /// `sigma` is only re-estimated from the second observation on.
    pub fn update(&mut self, alpha: f64, target: f64, q_new: f64) {
        self.n_updates += 1;
        self.q2 = self.q2 + alpha * target.powi(2) - alpha * self.q2;

        if self.n_updates > 1 {
            self.weights_var = (1.0 - alpha).powi(2) * self.weights_var + alpha.powi(2);
            let n_eff = 1.0 / self.weights_var;
            let raw = self.q2 - q_new.powi(2);
            if raw < 0.0 {
                debug!(raw, "negative variance estimate clamped to zero");
            }
            let diff = raw.clamp(0.0, f64::INFINITY);
            self.sigma = (diff / n_eff).sqrt();
        }
    }
}

/// Weighted Q-Learning resolver and its per-pair statistics.
#[derive(Debug, Clone)]
pub struct WeightedNextValue<S: Eq + Hash> {
    statistics: HashMap<(S, usize), KeyStatistics>,
    sampling: bool,
    precision: usize,
    rng: StdRng,
    rng_seed: Option<u64>,
}

impl<S: Clone + Eq + Hash> WeightedNextValue<S> {
    /// Sampling resolver with [`DEFAULT_PRECISION`] samples.
    pub fn new(seed: Option<u64>) -> Self {
        Self {
            statistics: HashMap::new(),
            sampling: true,
            precision: DEFAULT_PRECISION,
            rng: build_rng(seed),
            rng_seed: seed,
        }
    }

    /// Toggle Monte-Carlo estimation of the weights.
    ///
    /// There is no closed-form alternative: with sampling disabled every
    /// bootstrap fails with [`Error::ClosedFormWeightsUnsupported`].
    pub fn with_sampling(mut self, sampling: bool) -> Self {
        self.sampling = sampling;
        self
    }

    /// Samples drawn per weight estimate.
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn sampling(&self) -> bool {
        self.sampling
    }

    pub fn precision(&self) -> usize {
        self.precision
    }

    pub fn rng_seed(&self) -> Option<u64> {
        self.rng_seed
    }

    /// Statistics of `(state, action)`; defaults for pairs never fitted.
    pub fn statistics(&self, state: &S, action: usize) -> KeyStatistics {
        self.statistics
            .get(&(state.clone(), action))
            .copied()
            .unwrap_or_default()
    }

    /// Number of pairs with at least one recorded fit.
    pub fn tracked_pairs(&self) -> usize {
        self.statistics.len()
    }

    /// Probability of each action being the maximiser under
    /// `X_a ~ N(means[a], sigmas[a])`.
    ///
    /// Ties within a sample go to the first action.
    ///
    /// # Errors
    ///
    /// - [`Error::ClosedFormWeightsUnsupported`] when sampling is disabled
    /// - [`Error::InvalidParameter`] when precision is zero
    /// - [`Error::InvalidDistribution`] for a non-finite mean or invalid sigma
    pub fn weights(&mut self, means: &[f64], sigmas: &[f64]) -> Result<Vec<f64>> {
        if !self.sampling {
            return Err(Error::ClosedFormWeightsUnsupported);
        }
        if self.precision == 0 {
            return Err(Error::InvalidParameter {
                name: "precision",
                value: 0.0,
                reason: "at least one sample is required",
            });
        }

        let normals = means
            .iter()
            .zip(sigmas)
            .map(|(&mean, &sigma)| {
                if !mean.is_finite() || !(sigma >= 0.0 && sigma.is_finite()) {
                    return Err(Error::InvalidDistribution {
                        message: format!(
                            "N({mean}, {sigma}): mean must be finite and sigma finite and non-negative"
                        ),
                    });
                }
                Normal::new(mean, sigma).map_err(|err| Error::InvalidDistribution {
                    message: format!("N({mean}, {sigma}): {err}"),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut counts = vec![0usize; normals.len()];
        for _ in 0..self.precision {
            let mut best_idx = 0;
            let mut best = f64::NEG_INFINITY;
            for (idx, normal) in normals.iter().enumerate() {
                let sample = normal.sample(&mut self.rng);
                if sample > best {
                    best = sample;
                    best_idx = idx;
                }
            }
            counts[best_idx] += 1;
        }

        let precision = self.precision as f64;
        Ok(counts
            .into_iter()
            .map(|count| count as f64 / precision)
            .collect())
    }
}

impl<S, A, P> NextValue<S, A, P> for WeightedNextValue<S>
where
    S: Clone + Eq + Hash,
    A: Approximator<S> + ?Sized,
    P: ?Sized,
{
    fn name(&self) -> &'static str {
        "WeightedQLearning"
    }

    fn next_q(&mut self, ctx: ResolveContext<'_, A, P>, next_state: &S) -> Result<f64> {
        let action_space = &ctx.mdp_info.action_space;
        let means = action_values(ctx.approximator, next_state, action_space);
        let sigmas: Vec<f64> = action_space
            .values()
            .iter()
            .map(|&action| self.statistics(next_state, action).sigma)
            .collect();

        let weights = self.weights(&means, &sigmas)?;
        trace!(?means, ?sigmas, ?weights, "weighted next value");

        Ok(weights.iter().zip(&means).map(|(w, q)| w * q).sum())
    }

    fn after_fit(&mut self, state: &S, action: usize, step: &TdStep) {
        self.statistics
            .entry((state.clone(), action))
            .or_default()
            .update(step.alpha, step.target, step.q_new);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_default_to_infinite_uncertainty() {
        let resolver = WeightedNextValue::<usize>::new(Some(0));
        let stats = resolver.statistics(&3, 1);
        assert_eq!(stats.n_updates, 0);
        assert_eq!(stats.sigma, INITIAL_SIGMA);
        assert_eq!(stats.q2, 0.0);
        assert_eq!(stats.weights_var, 0.0);
    }

    #[test]
    fn test_first_update_keeps_initial_sigma() {
        let mut stats = KeyStatistics::default();
        stats.update(0.1, 5.0, 0.5);
        assert_eq!(stats.n_updates, 1);
        assert!((stats.q2 - 2.5).abs() < 1e-12);
        assert_eq!(stats.weights_var, 0.0);
        assert_eq!(stats.sigma, INITIAL_SIGMA);
    }

    #[test]
    fn test_second_update_recurrence() {
        let mut stats = KeyStatistics::default();
        stats.update(0.1, 5.0, 0.5);
        stats.update(0.1, 5.0, 0.95);

        // q2 = 2.5 + 0.1 * 25 - 0.1 * 2.5 = 4.75
        assert!((stats.q2 - 4.75).abs() < 1e-12);
        // weights_var = 0.9^2 * 0 + 0.1^2
        assert!((stats.weights_var - 0.01).abs() < 1e-12);
        // sigma = sqrt((4.75 - 0.95^2) * 0.01)
        let expected = ((4.75 - 0.95f64.powi(2)) * 0.01).sqrt();
        assert!((stats.sigma - expected).abs() < 1e-12);
    }

    #[test]
    fn test_negative_variance_clamped() {
        let mut stats = KeyStatistics::default();
        stats.update(0.5, 0.0, 0.0);
        // q_new^2 exceeds q2 here
        stats.update(0.5, 0.0, 3.0);
        assert_eq!(stats.sigma, 0.0);
    }

    #[test]
    fn test_weights_follow_clear_maximum() {
        let mut resolver = WeightedNextValue::<usize>::new(Some(5));
        let weights = resolver.weights(&[0.0, 10.0, 1.0], &[1e-6, 1e-6, 1e-6]).unwrap();
        assert_eq!(weights, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_weights_uniform_under_large_sigma() {
        let mut resolver = WeightedNextValue::<usize>::new(Some(9));
        let weights = resolver
            .weights(&[0.0, 1.0], &[INITIAL_SIGMA, INITIAL_SIGMA])
            .unwrap();
        assert!((weights.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(weights.iter().all(|&w| (0.4..0.6).contains(&w)));
    }

    #[test]
    fn test_weights_respect_precision() {
        let mut resolver = WeightedNextValue::<usize>::new(Some(1)).with_precision(10);
        let weights = resolver.weights(&[0.0, 0.0], &[1.0, 1.0]).unwrap();
        for w in weights {
            // Multiples of 1/10
            assert!(((w * 10.0).round() - w * 10.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_sampling_disabled_fails() {
        let mut resolver = WeightedNextValue::<usize>::new(Some(1)).with_sampling(false);
        assert!(matches!(
            resolver.weights(&[0.0], &[1.0]),
            Err(Error::ClosedFormWeightsUnsupported)
        ));
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut resolver = WeightedNextValue::<usize>::new(Some(1)).with_precision(0);
        assert!(resolver.weights(&[0.0], &[1.0]).is_err());

        let mut resolver = WeightedNextValue::<usize>::new(Some(1));
        assert!(matches!(
            resolver.weights(&[0.0], &[-1.0]),
            Err(Error::InvalidDistribution { .. })
        ));
        assert!(matches!(
            resolver.weights(&[0.0, 1.0], &[1.0, f64::NAN]),
            Err(Error::InvalidDistribution { .. })
        ));
        assert!(matches!(
            resolver.weights(&[f64::INFINITY], &[1.0]),
            Err(Error::InvalidDistribution { .. })
        ));
        assert!(matches!(
            resolver.weights(&[f64::NAN], &[1.0]),
            Err(Error::InvalidDistribution { .. })
        ));
        // A zero sigma is a point mass, not an error
        assert_eq!(resolver.weights(&[0.0, 2.0], &[0.0, 0.0]).unwrap(), vec![0.0, 1.0]);
    }
}
