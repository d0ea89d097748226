//! Common test doubles for the tdcontrol test suite.
//!
//! Scripted collaborators make the random parts of the algorithms
//! deterministic so that exact values can be asserted.

#![allow(dead_code)]

use std::collections::VecDeque;

use tdcontrol::{
    ActionSpace, MdpInfo, Result,
    ports::{LearningRate, Policy},
    td::ModelSelector,
};

/// Two actions, `gamma = 0.9`.
pub fn mdp() -> MdpInfo {
    MdpInfo::new(0.9, ActionSpace::discrete(2).unwrap()).unwrap()
}

/// Model selector replaying a fixed sequence of indices.
pub struct ScriptedSelector {
    script: VecDeque<usize>,
}

impl ScriptedSelector {
    pub fn new(script: &[usize]) -> Self {
        Self {
            script: script.iter().copied().collect(),
        }
    }
}

impl ModelSelector for ScriptedSelector {
    fn select(&mut self) -> usize {
        self.script.pop_front().expect("selector script exhausted")
    }
}

/// Constant step size that counts how often it was queried.
#[derive(Debug, Clone)]
pub struct CountingRate {
    pub alpha: f64,
    pub calls: usize,
}

impl CountingRate {
    pub fn new(alpha: f64) -> Self {
        Self { alpha, calls: 0 }
    }
}

impl<S> LearningRate<S> for CountingRate {
    fn rate(&mut self, _state: &S, _action: usize) -> f64 {
        self.calls += 1;
        self.alpha
    }
}

/// Always picks the same action, whatever the values; counts its calls.
#[derive(Debug, Clone)]
pub struct FixedActionPolicy {
    pub action: usize,
    pub calls: usize,
}

impl FixedActionPolicy {
    pub fn new(action: usize) -> Self {
        Self { action, calls: 0 }
    }
}

impl<S> Policy<S> for FixedActionPolicy {
    fn draw_action(
        &mut self,
        _state: &S,
        _q_values: &[f64],
        _action_space: &ActionSpace,
    ) -> Result<usize> {
        self.calls += 1;
        Ok(self.action)
    }
}
