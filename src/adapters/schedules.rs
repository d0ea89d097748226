//! Learning-rate schedules

use std::{collections::HashMap, hash::Hash};

use serde::{Deserialize, Serialize};

use crate::{Error, Result, ports::LearningRate};

/// Same step size on every visit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantRate {
    alpha: f64,
}

impl ConstantRate {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] unless `alpha` lies in `(0, 1]`.
    pub fn new(alpha: f64) -> Result<Self> {
        check_unit_interval("alpha", alpha)?;
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }
}

impl<S> LearningRate<S> for ConstantRate {
    fn rate(&mut self, _state: &S, _action: usize) -> f64 {
        self.alpha
    }
}

/// Step size decaying with the visit count of each state-action pair:
/// `alpha = max(initial / n(s, a)^decay_exp, min)`.
///
/// With `initial = 1` and `decay_exp = 0.8` this is the polynomial schedule
/// commonly paired with Double and Weighted Q-Learning.
#[derive(Debug, Clone, PartialEq)]
pub struct VisitDecayRate<S: Eq + Hash> {
    initial: f64,
    decay_exp: f64,
    min: f64,
    visits: HashMap<(S, usize), u64>,
}

impl<S: Clone + Eq + Hash> VisitDecayRate<S> {
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `initial` is outside `(0, 1]`,
    /// `decay_exp` is negative, or `min` is outside `[0, initial]`.
    pub fn new(initial: f64, decay_exp: f64, min: f64) -> Result<Self> {
        check_unit_interval("initial", initial)?;
        if !(decay_exp >= 0.0 && decay_exp.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "decay_exp",
                value: decay_exp,
                reason: "must be finite and non-negative",
            });
        }
        if !(0.0..=initial).contains(&min) {
            return Err(Error::InvalidParameter {
                name: "min",
                value: min,
                reason: "must lie in [0, initial]",
            });
        }
        Ok(Self {
            initial,
            decay_exp,
            min,
            visits: HashMap::new(),
        })
    }

    /// Number of times `rate` was called for `(state, action)`.
    pub fn visits(&self, state: &S, action: usize) -> u64 {
        self.visits
            .get(&(state.clone(), action))
            .copied()
            .unwrap_or(0)
    }
}

impl<S: Clone + Eq + Hash> LearningRate<S> for VisitDecayRate<S> {
    fn rate(&mut self, state: &S, action: usize) -> f64 {
        let n = self.visits.entry((state.clone(), action)).or_insert(0);
        *n += 1;
        (self.initial / (*n as f64).powf(self.decay_exp)).max(self.min)
    }
}

/// Serializable description of a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LearningRateConfig {
    Constant { alpha: f64 },
    VisitDecay { initial: f64, decay_exp: f64, min: f64 },
}

impl Default for LearningRateConfig {
    fn default() -> Self {
        LearningRateConfig::VisitDecay {
            initial: 1.0,
            decay_exp: 0.8,
            min: 0.0,
        }
    }
}

/// Schedule selected at runtime from a [`LearningRateConfig`].
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule<S: Eq + Hash> {
    Constant(ConstantRate),
    VisitDecay(VisitDecayRate<S>),
}

impl<S: Clone + Eq + Hash> Schedule<S> {
    pub fn from_config(config: &LearningRateConfig) -> Result<Self> {
        match *config {
            LearningRateConfig::Constant { alpha } => {
                Ok(Schedule::Constant(ConstantRate::new(alpha)?))
            }
            LearningRateConfig::VisitDecay {
                initial,
                decay_exp,
                min,
            } => Ok(Schedule::VisitDecay(VisitDecayRate::new(
                initial, decay_exp, min,
            )?)),
        }
    }
}

impl<S: Clone + Eq + Hash> LearningRate<S> for Schedule<S> {
    fn rate(&mut self, state: &S, action: usize) -> f64 {
        match self {
            Schedule::Constant(schedule) => LearningRate::<S>::rate(schedule, state, action),
            Schedule::VisitDecay(schedule) => schedule.rate(state, action),
        }
    }
}

fn check_unit_interval(name: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name,
            value,
            reason: "must lie in (0, 1]",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_rate() {
        let mut schedule = ConstantRate::new(0.1).unwrap();
        assert_eq!(LearningRate::<usize>::rate(&mut schedule, &0, 0), 0.1);
        assert_eq!(LearningRate::<usize>::rate(&mut schedule, &0, 0), 0.1);
        assert!(ConstantRate::new(0.0).is_err());
        assert!(ConstantRate::new(1.5).is_err());
    }

    #[test]
    fn test_visit_decay_per_key() {
        let mut schedule = VisitDecayRate::<usize>::new(1.0, 1.0, 0.0).unwrap();
        assert_eq!(schedule.rate(&0usize, 0), 1.0);
        assert_eq!(schedule.rate(&0usize, 0), 0.5);
        // A different pair has its own counter
        assert_eq!(schedule.rate(&0usize, 1), 1.0);
        assert_eq!(schedule.visits(&0, 0), 2);
        assert_eq!(schedule.visits(&3, 0), 0);
    }

    #[test]
    fn test_visit_decay_floor() {
        let mut schedule = VisitDecayRate::<usize>::new(1.0, 1.0, 0.3).unwrap();
        for _ in 0..10 {
            schedule.rate(&1usize, 1);
        }
        assert_eq!(schedule.rate(&1usize, 1), 0.3);
    }

    #[test]
    fn test_clone_has_independent_counters() {
        let mut original = VisitDecayRate::<usize>::new(1.0, 0.8, 0.0).unwrap();
        original.rate(&0usize, 0);
        let mut copy = original.clone();
        copy.rate(&0usize, 0);
        copy.rate(&0usize, 0);
        assert_eq!(original.visits(&0, 0), 1);
        assert_eq!(copy.visits(&0, 0), 3);
    }

    #[test]
    fn test_schedule_from_config() {
        let config: LearningRateConfig =
            serde_json::from_str(r#"{"kind": "constant", "alpha": 0.2}"#).unwrap();
        let mut schedule = Schedule::<usize>::from_config(&config).unwrap();
        assert_eq!(schedule.rate(&0, 0), 0.2);

        let mut decay = Schedule::<usize>::from_config(&LearningRateConfig::default()).unwrap();
        assert_eq!(decay.rate(&0, 0), 1.0);
        assert!((decay.rate(&0, 0) - 2f64.powf(-0.8)).abs() < 1e-12);
    }
}
