//! Subcommands of the `tdcontrol` binary

pub mod compare;
pub mod run;
