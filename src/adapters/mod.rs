//! Adapters implementing the ports: approximators, schedules, policies and
//! environments.

pub mod ensemble;
pub mod grid_world;
pub mod policies;
pub mod schedules;
pub mod table;

pub use ensemble::Ensemble;
pub use grid_world::GridWorld;
pub use policies::{EpsilonGreedy, Greedy};
pub use schedules::{ConstantRate, LearningRateConfig, Schedule, VisitDecayRate};
pub use table::Table;
