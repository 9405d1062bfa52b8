// src/exec/mod.rs

//! Process execution for flows defined in a flow file.
//!
//! - [`command`] provides [`CommandExecutor`], a [`crate::task::TaskExecutor`]
//!   that runs a shell command with `tokio::process::Command` and uses its
//!   stdout as the task output.

pub mod command;

pub use command::{CommandExecutor, CommandOutput, output_env_var};
