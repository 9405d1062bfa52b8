// src/errors.rs

//! Crate-wide error types.
//!
//! - [`FlowError`] is what the public API returns: structural problems with
//!   the task graph (raised before anything runs), the aggregate failure of a
//!   run, and the config/IO errors of the binary surface.
//! - [`TaskFailure`] is the per-task reason recorded by the scheduler.
//! - [`ContextError`] is raised by the context store on a rejected write.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::engine::TaskName;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("task name must not be empty")]
    EmptyTaskName,

    #[error("task '{0}' is already registered")]
    DuplicateTaskName(TaskName),

    #[error("task '{task}' has unknown dependency '{dependency}'")]
    UnknownDependency {
        task: TaskName,
        dependency: TaskName,
    },

    #[error("circular dependency involving task '{task}': {}", .path.join(" -> "))]
    CircularDependency {
        task: TaskName,
        /// Cycle as discovered, first and last element are the same task.
        path: Vec<TaskName>,
    },

    #[error(transparent)]
    Aggregate(#[from] AggregateFlowFailure),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl FlowError {
    /// Whether the error was raised by graph validation, i.e. before any
    /// executor was invoked.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            FlowError::EmptyTaskName
                | FlowError::DuplicateTaskName(_)
                | FlowError::UnknownDependency { .. }
                | FlowError::CircularDependency { .. }
        )
    }

    /// The aggregate failure, if this error is one.
    pub fn as_aggregate(&self) -> Option<&AggregateFlowFailure> {
        match self {
            FlowError::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }
}

/// Why a single task did not succeed.
#[derive(Error, Debug)]
pub enum TaskFailure {
    #[error("timed out after {}ms", .after.as_millis())]
    Timeout { after: Duration },

    #[error("execution failed: {0:#}")]
    Execution(anyhow::Error),

    #[error("skipped: dependency '{dependency}' failed")]
    Skipped { dependency: TaskName },
}

impl TaskFailure {
    pub fn is_timeout(&self) -> bool {
        matches!(self, TaskFailure::Timeout { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, TaskFailure::Skipped { .. })
    }

    pub fn is_execution(&self) -> bool {
        matches!(self, TaskFailure::Execution(_))
    }
}

/// One failed task inside an [`AggregateFlowFailure`].
#[derive(Debug)]
pub struct FailedTask {
    pub task: TaskName,
    pub reason: TaskFailure,
}

/// Every task of a run that failed, timed out or was skipped.
///
/// Entries are in task registration order.
#[derive(Debug)]
pub struct AggregateFlowFailure {
    pub flow: String,
    pub failures: Vec<FailedTask>,
}

impl AggregateFlowFailure {
    pub fn failure_for(&self, task: &str) -> Option<&TaskFailure> {
        self.failures
            .iter()
            .find(|f| f.task == task)
            .map(|f| &f.reason)
    }

    pub fn failed_tasks(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.task.as_str())
    }
}

impl fmt::Display for AggregateFlowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "flow '{}' failed: {} task(s) failed",
            self.flow,
            self.failures.len()
        )?;
        for (i, failed) in self.failures.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{}: {}", failed.task, failed.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for AggregateFlowFailure {}

/// Errors raised by the context store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("context entry '{0}' is already written and cannot be replaced")]
    AlreadyWritten(TaskName),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, FlowError>;
