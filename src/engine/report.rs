// src/engine/report.rs

//! Result aggregation for a finished run.

use std::time::Duration;

use crate::context::Context;
use crate::engine::TaskName;
use crate::errors::{AggregateFlowFailure, FailedTask, FlowError, TaskFailure};

/// Outcome of one task in a run.
#[derive(Debug)]
pub struct TaskReport {
    pub task: TaskName,
    /// `Ok(())` if the task's context entry was written.
    pub outcome: Result<(), TaskFailure>,
    /// Wall-clock time from dispatch until the task settled.
    pub elapsed: Duration,
}

impl TaskReport {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn failure(&self) -> Option<&TaskFailure> {
        self.outcome.as_ref().err()
    }
}

/// Everything a run produced: the context (complete or partial) and one
/// report per task, in registration order.
#[derive(Debug)]
pub struct RunReport<T> {
    flow: String,
    context: Context<T>,
    tasks: Vec<TaskReport>,
}

impl<T> RunReport<T> {
    pub(crate) fn new(flow: String, context: Context<T>, tasks: Vec<TaskReport>) -> Self {
        Self {
            flow,
            context,
            tasks,
        }
    }

    pub fn flow(&self) -> &str {
        &self.flow
    }

    /// Context as left by the run. On failure this holds the outputs of the
    /// tasks that did succeed (plus any seed entries).
    pub fn context(&self) -> &Context<T> {
        &self.context
    }

    pub fn tasks(&self) -> &[TaskReport] {
        &self.tasks
    }

    pub fn report_for(&self, task: &str) -> Option<&TaskReport> {
        self.tasks.iter().find(|r| r.task == task)
    }

    pub fn is_success(&self) -> bool {
        self.tasks.iter().all(TaskReport::succeeded)
    }

    /// Names of tasks that succeeded.
    pub fn succeeded(&self) -> impl Iterator<Item = &str> {
        self.tasks
            .iter()
            .filter(|r| r.succeeded())
            .map(|r| r.task.as_str())
    }

    /// Failed, timed-out and skipped tasks with their reasons.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &TaskFailure)> {
        self.tasks
            .iter()
            .filter_map(|r| r.failure().map(|f| (r.task.as_str(), f)))
    }

    /// The final context if every task succeeded, otherwise an aggregate
    /// error listing every failed task.
    pub fn into_result(self) -> Result<Context<T>, FlowError> {
        let failures: Vec<FailedTask> = self
            .tasks
            .into_iter()
            .filter_map(|r| match r.outcome {
                Ok(()) => None,
                Err(reason) => Some(FailedTask {
                    task: r.task,
                    reason,
                }),
            })
            .collect();

        if failures.is_empty() {
            Ok(self.context)
        } else {
            Err(FlowError::Aggregate(AggregateFlowFailure {
                flow: self.flow,
                failures,
            }))
        }
    }
}
