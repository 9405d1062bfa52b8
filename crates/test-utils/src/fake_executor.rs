use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use flowdag::{ContextView, Task, TaskExecutor, TaskFuture};

/// What a [`FakeExecutor`] does when invoked.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Return this output immediately.
    Succeed(String),
    /// Sleep, then return this output.
    SleepThen(Duration, String),
    /// Fail with this message.
    Fail(String),
    /// Panic inside the executor future.
    Panic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Started,
    Finished,
}

/// One recorded executor event.
#[derive(Debug, Clone)]
pub struct Event {
    pub task: String,
    pub kind: EventKind,
    pub at: Instant,
    /// Context keys visible to the executor when it started (sorted).
    /// Empty for `Finished` events.
    pub visible: Vec<String>,
}

/// Shared log of executor invocations, in the order they happened.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    events: Arc<Mutex<Vec<Event>>>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, task: &str, kind: EventKind, visible: Vec<String>) {
        self.events.lock().unwrap().push(Event {
            task: task.to_string(),
            kind,
            at: Instant::now(),
            visible,
        });
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Task names in the order their executors were invoked.
    pub fn started(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.kind == EventKind::Started)
            .map(|e| e.task)
            .collect()
    }

    /// How many times the executor of `task` was invoked.
    pub fn invocations(&self, task: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| e.kind == EventKind::Started && e.task == task)
            .count()
    }

    pub fn was_invoked(&self, task: &str) -> bool {
        self.invocations(task) > 0
    }

    /// Context keys the executor of `task` could see when it started.
    pub fn visible_to(&self, task: &str) -> Option<Vec<String>> {
        self.events()
            .into_iter()
            .find(|e| e.kind == EventKind::Started && e.task == task)
            .map(|e| e.visible)
    }

    pub fn started_at(&self, task: &str) -> Option<Instant> {
        self.find(task, EventKind::Started)
    }

    pub fn finished_at(&self, task: &str) -> Option<Instant> {
        self.find(task, EventKind::Finished)
    }

    fn find(&self, task: &str, kind: EventKind) -> Option<Instant> {
        self.events()
            .iter()
            .find(|e| e.kind == kind && e.task == task)
            .map(|e| e.at)
    }
}

/// A fake executor that:
/// - records when it was invoked and which context entries it could see
/// - then behaves as configured (succeed, sleep, fail, panic).
pub struct FakeExecutor {
    name: String,
    behaviour: Behaviour,
    log: ExecutionLog,
}

impl FakeExecutor {
    pub fn new(name: &str, behaviour: Behaviour, log: &ExecutionLog) -> Self {
        Self {
            name: name.to_string(),
            behaviour,
            log: log.clone(),
        }
    }
}

impl TaskExecutor<String> for FakeExecutor {
    fn execute(&self, ctx: ContextView<String>) -> TaskFuture<String> {
        self.log.push(&self.name, EventKind::Started, ctx.keys());

        let name = self.name.clone();
        let behaviour = self.behaviour.clone();
        let log = self.log.clone();

        Box::pin(async move {
            let result = match behaviour {
                Behaviour::Succeed(out) => Ok(out),
                Behaviour::SleepThen(d, out) => {
                    tokio::time::sleep(d).await;
                    Ok(out)
                }
                Behaviour::Fail(msg) => Err(anyhow::anyhow!(msg)),
                Behaviour::Panic => panic!("fake executor for '{name}' panicked"),
            };
            log.push(&name, EventKind::Finished, Vec::new());
            result
        })
    }
}

/// Build a task backed by a [`FakeExecutor`].
pub fn fake_task(name: &str, deps: &[&str], behaviour: Behaviour, log: &ExecutionLog) -> Task<String> {
    Task::new(name, FakeExecutor::new(name, behaviour, log)).depends_on(deps.iter().copied())
}

/// Task that immediately outputs `"<name>-out"`.
pub fn ok_task(name: &str, deps: &[&str], log: &ExecutionLog) -> Task<String> {
    fake_task(name, deps, Behaviour::Succeed(format!("{name}-out")), log)
}
