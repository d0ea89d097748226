//! Ports (trait boundaries) for the collaborators of the TD core.
//!
//! The core owns these traits; tables, schedules, policies and environments
//! in [`crate::adapters`] implement them.

pub mod agent;
pub mod approximator;
pub mod environment;
pub mod learning_rate;
pub mod observer;
pub mod policy;

pub use agent::Agent;
pub use approximator::{Approximator, FitParams};
pub use environment::{Environment, StepOutcome};
pub use learning_rate::LearningRate;
pub use observer::Observer;
pub use policy::Policy;
