//! Temporal-difference control algorithms
//!
//! All four algorithms share one update ([`update::td_update`]):
//!
//! Q(s,a) ← Q(s,a) + α[r + γ q_next - Q(s,a)]
//!
//! and differ only in how `q_next` is resolved:
//!
//! | Algorithm | `q_next` |
//! |-----------|----------|
//! | Q-Learning | `max_a Q(s',a)` |
//! | SARSA | `Q(s',a')`, `a'` drawn from the policy |
//! | Double Q-Learning | `Q_B(s', argmax_a Q_A(s',a))` |
//! | Weighted Q-Learning | `Σ_a w_a Q(s',a)`, `w_a` = P(a is the maximiser) |
//!
//! ## Usage Example
//!
//! ```
//! use tdcontrol::{
//!     adapters::{ConstantRate, Greedy, Table},
//!     ports::Agent,
//!     td::QLearning,
//!     types::{ActionSpace, MdpInfo, Transition},
//! };
//!
//! let mdp = MdpInfo::new(0.9, ActionSpace::discrete(2)?)?;
//! let mut agent = QLearning::<usize, _, _, _>::q_learning(
//!     Table::new(0.0),
//!     Greedy,
//!     ConstantRate::new(0.1)?,
//!     mdp,
//! );
//!
//! agent.fit(&[Transition::new(0, 1, 5.0, 0, true)], 1)?;
//! assert!((agent.predict(&0, 1) - 0.5).abs() < 1e-12);
//! # Ok::<(), tdcontrol::Error>(())
//! ```

pub mod agent;
pub mod double;
pub mod resolvers;
pub mod update;
pub mod weighted;

pub use agent::{QLearning, Sarsa, Td, WeightedQLearning};
pub use double::{DoubleQLearning, ModelSelector, UniformSelector};
pub use resolvers::{MaxNextValue, NextValue, OnPolicyNextValue, ResolveContext};
pub use update::{TdStep, last_transition, td_update};
pub use weighted::{DEFAULT_PRECISION, INITIAL_SIGMA, KeyStatistics, WeightedNextValue};
