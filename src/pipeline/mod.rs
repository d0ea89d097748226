//! Experiment pipeline
//!
//! - [`Experiment`]: online loop driving one agent in one environment
//! - [`compare`]: repeated runs of several algorithms with summary statistics

pub mod comparison;
pub mod experiment;

pub use comparison::{ComparisonConfig, ComparisonRow, compare};
pub use experiment::{Experiment, ExperimentSummary};
