// src/engine/scheduler.rs

//! Concurrent dispatch of one run.
//!
//! The scheduler spawns one tokio task ("unit") per flow task in a single
//! pass. A unit:
//! 1. waits for the completion signals of all its dependencies,
//! 2. skips itself if any of them failed,
//! 3. otherwise starts the executor with a read-only context view,
//! 4. races it against the run deadline,
//! 5. on success writes its own context entry, then resolves its signal.
//!
//! The deadline is shared by the whole run (`dispatch + timeout`), so it
//! bounds dependency waiting as well as execution. A unit whose deadline
//! passes while it is still waiting is skipped, naming the pending
//! dependency; only a unit whose executor was invoked reports a timeout.
//!
//! Cancellation is best-effort: the executor future runs as its own spawned
//! task, and a timed-out unit only detaches it. Anything the executor is
//! still doing keeps running in the background and its result is dropped.

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use futures::future::try_join_all;
use tokio::time::{Instant, timeout_at};
use tracing::{debug, warn};

use crate::context::{Context, ContextStore, ContextView};
use crate::engine::TaskName;
use crate::engine::report::{RunReport, TaskReport};
use crate::engine::signal::{Signal, SignalArena, SignalReceiver, SignalSender};
use crate::errors::TaskFailure;
use crate::logging::diag;
use crate::task::{Task, TaskExecutor};
use crate::types::FlowOptions;

/// Far-future stand-in for deadlines that do not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// `start + timeout`, saturating to [`FAR_FUTURE`] on overflow.
fn deadline_after(start: Instant, timeout: Duration) -> Instant {
    start
        .checked_add(timeout)
        .unwrap_or_else(|| start + FAR_FUTURE)
}

/// Per-run scheduler. Owns nothing that outlives the run.
#[derive(Debug)]
pub struct Scheduler<'a, T> {
    flow: &'a str,
    tasks: &'a [Task<T>],
    options: FlowOptions,
}

impl<'a, T> Scheduler<'a, T>
where
    T: Send + Sync + 'static,
{
    /// The task list must already be validated (unique names, known
    /// dependencies, no cycles).
    pub fn new(flow: &'a str, tasks: &'a [Task<T>], options: FlowOptions) -> Self {
        Self {
            flow,
            tasks,
            options,
        }
    }

    /// Dispatch every task and wait until all of them have settled.
    pub async fn run(self, seed: Context<T>) -> RunReport<T> {
        let store = Arc::new(ContextStore::seeded(seed));
        let mut arena = SignalArena::new(self.tasks.iter().map(|t| t.name()));

        let started = Instant::now();
        let deadline = deadline_after(started, self.options.timeout);
        let debug = self.options.debug;

        let mut handles = Vec::with_capacity(self.tasks.len());

        for task in self.tasks {
            let name = task.name().to_string();

            let (Some(signal), Some(deps)) = (
                arena.take_sender(&name),
                arena.receivers_for(task.dependencies()),
            ) else {
                // Not reachable with a validated task list.
                warn!(flow = %self.flow, task = %name, "no completion signal for task; not dispatching");
                handles.push((name, None));
                continue;
            };

            let unit = TaskUnit {
                name: name.clone(),
                deps,
                executor: task.executor(),
                store: Arc::clone(&store),
                signal,
                started,
                deadline,
                timeout: self.options.timeout,
                debug,
            };

            diag!(debug, flow = %self.flow, task = %name, "dispatching task");
            handles.push((name, Some(tokio::spawn(unit.run()))));
        }

        let mut reports = Vec::with_capacity(handles.len());
        for (name, handle) in handles {
            let report = match handle {
                Some(handle) => match handle.await {
                    Ok(report) => report,
                    Err(join_err) => {
                        warn!(flow = %self.flow, task = %name, error = %join_err, "task unit panicked");
                        TaskReport {
                            task: name,
                            outcome: Err(TaskFailure::Execution(anyhow!(
                                "task panicked: {join_err}"
                            ))),
                            elapsed: started.elapsed(),
                        }
                    }
                },
                None => TaskReport {
                    task: name,
                    outcome: Err(TaskFailure::Execution(anyhow!(
                        "task was not dispatched"
                    ))),
                    elapsed: Duration::ZERO,
                },
            };
            reports.push(report);
        }

        RunReport::new(self.flow.to_string(), store.snapshot(), reports)
    }
}

/// One task's unit of concurrent work.
struct TaskUnit<T> {
    name: TaskName,
    deps: Vec<SignalReceiver>,
    executor: Arc<dyn TaskExecutor<T>>,
    store: Arc<ContextStore<T>>,
    signal: SignalSender,
    started: Instant,
    deadline: Instant,
    timeout: Duration,
    debug: bool,
}

impl<T> TaskUnit<T>
where
    T: Send + Sync + 'static,
{
    async fn run(self) -> TaskReport {
        let TaskUnit {
            name,
            deps,
            executor,
            store,
            signal,
            started,
            deadline,
            timeout,
            debug,
        } = self;

        let outcome = match Self::await_dependencies(&name, deps, deadline, timeout, debug).await {
            Err(failure) => Err(failure),
            Ok(()) => {
                let work = Self::execute(&name, executor, Arc::clone(&store), debug);
                match timeout_at(deadline, work).await {
                    Ok(Ok(value)) => store
                        .insert(&name, value)
                        .map_err(|e| TaskFailure::Execution(anyhow!(e))),
                    Ok(Err(failure)) => Err(failure),
                    Err(_elapsed) => Err(TaskFailure::Timeout { after: timeout }),
                }
            }
        };

        // The context write above happens before dependents can observe
        // the signal.
        match &outcome {
            Ok(()) => {
                diag!(debug, task = %name, "task succeeded; context entry written");
                signal.resolve(Signal::Succeeded);
            }
            Err(failure) => {
                if failure.is_skipped() {
                    debug!(task = %name, reason = %failure, "task skipped");
                } else {
                    warn!(task = %name, reason = %failure, "task failed");
                }
                signal.resolve(Signal::Failed);
            }
        }

        TaskReport {
            task: name,
            outcome,
            elapsed: started.elapsed(),
        }
    }

    /// Wait until every dependency succeeded.
    ///
    /// A failed dependency skips the task. So does reaching the deadline
    /// while a dependency is still pending: that dependency shares the
    /// deadline and is timing out itself.
    async fn await_dependencies(
        name: &str,
        deps: Vec<SignalReceiver>,
        deadline: Instant,
        timeout: Duration,
        debug: bool,
    ) -> Result<(), TaskFailure> {
        if deps.is_empty() {
            return Ok(());
        }
        diag!(debug, task = %name, deps = deps.len(), "waiting on dependencies");

        let pending = deps.clone();
        // Resolves early on the first failed dependency.
        let all_settled = try_join_all(deps.into_iter().map(|mut dep| async move {
            match dep.settled().await {
                Signal::Succeeded => Ok(()),
                Signal::Failed => Err(TaskFailure::Skipped {
                    dependency: dep.task().to_string(),
                }),
            }
        }));

        match timeout_at(deadline, all_settled).await {
            Ok(result) => {
                result?;
                diag!(debug, task = %name, "dependencies resolved");
                Ok(())
            }
            Err(_elapsed) => match pending.iter().find(|d| d.current() != Some(Signal::Succeeded)) {
                Some(dep) => Err(TaskFailure::Skipped {
                    dependency: dep.task().to_string(),
                }),
                // Every dependency succeeded just as the deadline passed;
                // no time is left to run this task.
                None => Err(TaskFailure::Timeout { after: timeout }),
            },
        }
    }

    async fn execute(
        name: &str,
        executor: Arc<dyn TaskExecutor<T>>,
        store: Arc<ContextStore<T>>,
        debug: bool,
    ) -> Result<T, TaskFailure> {
        diag!(debug, task = %name, "invoking executor");
        let fut = executor.execute(ContextView::new(store));

        match tokio::spawn(fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(err)) => Err(TaskFailure::Execution(err)),
            Err(join_err) => Err(TaskFailure::Execution(anyhow!(
                "executor panicked: {join_err}"
            ))),
        }
    }
}
