// src/engine/flow.rs

use tracing::{info, warn};

use crate::context::Context;
use crate::dag::{DagGraph, validate_graph};
use crate::engine::TaskName;
use crate::engine::report::RunReport;
use crate::engine::scheduler::Scheduler;
use crate::errors::{FlowError, Result};
use crate::task::{Task, TaskExecutor};
use crate::types::FlowOptions;

/// An ordered set of tasks plus execution options, run as one unit.
///
/// Tasks are added through `&mut self`; running only needs `&self`. Each run
/// gets its own context and completion signals, so a flow can be run again
/// afterwards. Overlapping runs of one flow share no run state, but any
/// state the executors keep themselves is shared.
#[derive(Debug)]
pub struct Flow<T> {
    name: String,
    tasks: Vec<Task<T>>,
    options: FlowOptions,
}

impl<T> Flow<T>
where
    T: Send + Sync + 'static,
{
    /// Empty flow with default options (30 s timeout, no debug output).
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, FlowOptions::default())
    }

    /// Empty flow with the given timeout and debug setting.
    pub fn with_options(name: impl Into<String>, options: FlowOptions) -> Self {
        Self {
            name: name.into(),
            tasks: Vec::new(),
            options,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &FlowOptions {
        &self.options
    }

    /// Registered tasks, in registration order.
    pub fn tasks(&self) -> &[Task<T>] {
        &self.tasks
    }

    pub fn task(&self, name: &str) -> Option<&Task<T>> {
        self.tasks.iter().find(|t| t.name() == name)
    }

    /// Register a constructed task.
    ///
    /// Fails on an empty name or a name that is already registered.
    /// Dependencies are only checked when the flow runs, so tasks may be
    /// added in any order.
    pub fn add_task(&mut self, task: Task<T>) -> Result<&mut Self> {
        if task.name().is_empty() {
            return Err(FlowError::EmptyTaskName);
        }
        if self.task(task.name()).is_some() {
            return Err(FlowError::DuplicateTaskName(task.name().to_string()));
        }
        self.tasks.push(task);
        Ok(self)
    }

    /// Register a task from its parts.
    pub fn add<I, S>(
        &mut self,
        name: impl Into<TaskName>,
        deps: I,
        executor: impl TaskExecutor<T> + 'static,
    ) -> Result<&mut Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        self.add_task(Task::new(name, executor).depends_on(deps))
    }

    /// Dependency graph of the currently registered tasks.
    pub fn graph(&self) -> DagGraph {
        DagGraph::from_tasks(&self.tasks)
    }

    /// Check for unknown dependencies and cycles without running anything.
    pub fn validate(&self) -> Result<DagGraph> {
        let graph = self.graph();
        validate_graph(&graph)?;
        Ok(graph)
    }

    /// Run every task with an empty initial context.
    pub async fn run(&self) -> Result<Context<T>> {
        self.run_with(Context::new()).await
    }

    /// Run every task, starting from `seed`.
    ///
    /// Returns the final context if all tasks succeed. If any task fails,
    /// times out or is skipped, the error is [`FlowError::Aggregate`] and
    /// lists all of them. Structural errors are returned before any task
    /// runs.
    pub async fn run_with(&self, seed: Context<T>) -> Result<Context<T>> {
        self.run_report(seed).await?.into_result()
    }

    /// Like [`run_with`](Self::run_with), but keeps the per-task reports and
    /// the partial context of a failed run.
    pub async fn run_report(&self, seed: Context<T>) -> Result<RunReport<T>> {
        self.validate()?;

        info!(
            flow = %self.name,
            tasks = self.tasks.len(),
            timeout_ms = self.options.timeout.as_millis() as u64,
            "starting flow run"
        );

        let report = Scheduler::new(&self.name, &self.tasks, self.options)
            .run(seed)
            .await;

        if report.is_success() {
            info!(flow = %self.name, "flow run succeeded");
        } else {
            let failed: Vec<&str> = report.failures().map(|(name, _)| name).collect();
            warn!(flow = %self.name, ?failed, "flow run failed");
        }

        Ok(report)
    }
}
