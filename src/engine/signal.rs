// src/engine/signal.rs

//! Per-task completion signals.
//!
//! Every task of a run gets one `watch` channel, created before any task body
//! starts. The sender is moved into the task's own unit of work; receivers are
//! handed to its dependents. A signal is set exactly once.

use std::collections::HashMap;

use tokio::sync::watch;

use crate::engine::TaskName;

/// Settled state of a task, as seen by its dependents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// The task's context entry is written.
    Succeeded,
    /// The task failed, timed out or was skipped. No context entry exists.
    Failed,
}

/// Writing half of a completion signal, owned by the task's unit of work.
#[derive(Debug)]
pub struct SignalSender {
    tx: watch::Sender<Option<Signal>>,
}

impl SignalSender {
    /// Resolve the signal. Consumes the sender so it can only happen once.
    pub fn resolve(self, signal: Signal) {
        // send_replace never fails, even if no dependent is listening.
        self.tx.send_replace(Some(signal));
    }
}

/// Reading half of a completion signal.
#[derive(Debug, Clone)]
pub struct SignalReceiver {
    task: TaskName,
    rx: watch::Receiver<Option<Signal>>,
}

impl SignalReceiver {
    pub fn task(&self) -> &str {
        &self.task
    }

    /// Current state without waiting; `None` while the task is pending.
    pub fn current(&self) -> Option<Signal> {
        *self.rx.borrow()
    }

    /// Wait until the task settles.
    ///
    /// If the owning unit went away without resolving (e.g. it panicked),
    /// the task counts as failed.
    pub async fn settled(&mut self) -> Signal {
        match self.rx.wait_for(|s| s.is_some()).await {
            Ok(state) => (*state).unwrap_or(Signal::Failed),
            Err(_closed) => Signal::Failed,
        }
    }
}

/// All completion signals of one run, keyed by task name.
///
/// Built in full before dispatch, so a dependent can look up any signal no
/// matter the registration order. Read-only once dispatch starts.
#[derive(Debug, Default)]
pub struct SignalArena {
    senders: HashMap<TaskName, SignalSender>,
    receivers: HashMap<TaskName, SignalReceiver>,
}

impl SignalArena {
    pub fn new<'a>(tasks: impl IntoIterator<Item = &'a str>) -> Self {
        let mut arena = Self::default();
        for name in tasks {
            let (tx, rx) = watch::channel(None);
            arena
                .senders
                .insert(name.to_string(), SignalSender { tx });
            arena.receivers.insert(
                name.to_string(),
                SignalReceiver {
                    task: name.to_string(),
                    rx,
                },
            );
        }
        arena
    }

    /// Take the sender of `task`. Each sender can be taken once.
    pub fn take_sender(&mut self, task: &str) -> Option<SignalSender> {
        self.senders.remove(task)
    }

    /// Receivers for the given dependency names, in the same order.
    ///
    /// Returns `None` if any name has no signal in this arena.
    pub fn receivers_for(&self, deps: &[TaskName]) -> Option<Vec<SignalReceiver>> {
        deps.iter()
            .map(|d| self.receivers.get(d).cloned())
            .collect()
    }
}
