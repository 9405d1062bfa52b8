// src/engine/mod.rs

//! Orchestration engine.
//!
//! - [`flow`] holds the task registry and the public `run` entry points.
//! - [`scheduler`] dispatches one run: one tokio task per flow task, gated
//!   on its dependencies' completion signals.
//! - [`signal`] contains the per-run arena of completion signals.
//! - [`report`] aggregates per-task outcomes into the run result.

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

pub mod flow;
pub mod report;
pub mod scheduler;
pub mod signal;

pub use flow::Flow;
pub use report::{RunReport, TaskReport};
pub use scheduler::Scheduler;
pub use signal::{Signal, SignalArena};
