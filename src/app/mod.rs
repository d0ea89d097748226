//! Application layer: configuration and agent construction.

pub mod builder;
pub mod config;

pub use builder::build_agent;
pub use config::{AgentConfig, Algorithm, ExperimentConfig};
