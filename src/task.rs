// src/task.rs

//! Task abstraction: a name, dependency names and an executor.
//!
//! The flow talks to a [`TaskExecutor`] instead of a raw closure. This keeps
//! the scheduler independent of whether a task body is synchronous or
//! asynchronous, and lets callers plug in their own executor types (see
//! [`crate::exec::CommandExecutor`] for the shell-command one used by the
//! binary).

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::ContextView;
use crate::engine::TaskName;

/// Boxed future returned by [`TaskExecutor::execute`].
pub type TaskFuture<T> = Pin<Box<dyn Future<Output = anyhow::Result<T>> + Send + 'static>>;

/// Trait abstracting how a task produces its output.
pub trait TaskExecutor<T>: Send + Sync {
    /// Start the task body.
    ///
    /// `ctx` exposes the outputs of every task that has completed so far;
    /// all of this task's dependencies are guaranteed to be present.
    fn execute(&self, ctx: ContextView<T>) -> TaskFuture<T>;
}

/// Executor wrapping an async closure.
pub struct AsyncFn<F>(F);

impl<T, F, Fut> TaskExecutor<T> for AsyncFn<F>
where
    F: Fn(ContextView<T>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    fn execute(&self, ctx: ContextView<T>) -> TaskFuture<T> {
        Box::pin((self.0)(ctx))
    }
}

/// Executor wrapping a synchronous closure.
///
/// The closure runs on the task's tokio worker when the task is started; it
/// should not block for long.
pub struct SyncFn<F>(F);

impl<T, F> TaskExecutor<T> for SyncFn<F>
where
    T: Send + 'static,
    F: Fn(&ContextView<T>) -> anyhow::Result<T> + Send + Sync,
{
    fn execute(&self, ctx: ContextView<T>) -> TaskFuture<T> {
        let result = (self.0)(&ctx);
        Box::pin(async move { result })
    }
}

/// A named unit of work.
pub struct Task<T> {
    name: TaskName,
    deps: Vec<TaskName>,
    executor: Arc<dyn TaskExecutor<T>>,
}

impl<T> Clone for Task<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            deps: self.deps.clone(),
            executor: Arc::clone(&self.executor),
        }
    }
}

impl<T> fmt::Debug for Task<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("name", &self.name)
            .field("deps", &self.deps)
            .finish_non_exhaustive()
    }
}

impl<T: 'static> Task<T> {
    /// Task named `name` with no dependencies, backed by `executor`.
    pub fn new(name: impl Into<TaskName>, executor: impl TaskExecutor<T> + 'static) -> Self {
        Self {
            name: name.into(),
            deps: Vec::new(),
            executor: Arc::new(executor),
        }
    }

    /// Task backed by an async closure.
    pub fn from_async<F, Fut>(name: impl Into<TaskName>, f: F) -> Self
    where
        F: Fn(ContextView<T>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        Self::new(name, AsyncFn(f))
    }

    /// Task backed by a synchronous closure.
    pub fn from_fn<F>(name: impl Into<TaskName>, f: F) -> Self
    where
        T: Send,
        F: Fn(&ContextView<T>) -> anyhow::Result<T> + Send + Sync + 'static,
    {
        Self::new(name, SyncFn(f))
    }
}

impl<T> Task<T> {
    /// Declare dependencies. Repeated names are kept once, first occurrence
    /// wins the position.
    pub fn depends_on<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TaskName>,
    {
        for dep in deps {
            let dep = dep.into();
            if !self.deps.contains(&dep) {
                self.deps.push(dep);
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Direct dependencies, in declaration order.
    pub fn dependencies(&self) -> &[TaskName] {
        &self.deps
    }

    pub(crate) fn executor(&self) -> Arc<dyn TaskExecutor<T>> {
        Arc::clone(&self.executor)
    }
}
