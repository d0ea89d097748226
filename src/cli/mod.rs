//! CLI infrastructure for tdcontrol
//!
//! Commands run the four TD control algorithms on the grid world, export
//! traces and learned tables, and compare algorithms over repeated runs.

pub mod commands;
pub mod output;
