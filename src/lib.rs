//! Tabular temporal-difference control
//!
//! This crate provides:
//! - One TD update shared by Q-Learning, SARSA, Double Q-Learning and Weighted Q-Learning
//! - Per-pair variance statistics and Monte-Carlo weights for Weighted Q-Learning
//! - Tabular approximators, step-size schedules and ε-greedy exploration
//! - A grid-world environment, an online experiment loop and algorithm comparison
//! - CSV traces, JSON table snapshots and the `tdcontrol` command line

pub mod adapters;
pub mod app;
pub mod callbacks;
pub mod cli;
pub mod error;
pub mod export;
pub mod pipeline;
pub mod ports;
pub mod serialization;
pub mod td;
pub mod types;
pub mod utils;

pub use app::{AgentConfig, Algorithm, ExperimentConfig, build_agent};
pub use callbacks::CollectMaxQ;
pub use error::{Error, Result};
pub use td::{DoubleQLearning, QLearning, Sarsa, WeightedQLearning};
pub use types::{ActionSpace, MdpInfo, Transition};
