// src/context.rs

//! Result context shared between the tasks of a run.
//!
//! - [`ContextStore`] is the per-run, write-once map that the scheduler owns.
//!   Every key is written at most once; a second write is rejected.
//! - [`ContextView`] is the read-only handle executors receive. It has no
//!   mutating methods and hands values out behind `Arc`.
//! - [`Context`] is the owned map returned to the caller at the end of a run
//!   (and the seed a caller may pass in).

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::warn;

use crate::engine::TaskName;
use crate::errors::ContextError;

/// Write-once store of task outputs for a single run.
#[derive(Debug)]
pub struct ContextStore<T> {
    entries: RwLock<HashMap<TaskName, Arc<T>>>,
}

impl<T> ContextStore<T> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Build a store pre-populated with the caller's seed entries.
    pub fn seeded(seed: Context<T>) -> Self {
        Self {
            entries: RwLock::new(seed.entries),
        }
    }

    /// Write the entry for `name`.
    ///
    /// Check-and-set under the write lock: if the key already exists the
    /// stored value is left untouched and `AlreadyWritten` is returned.
    pub fn insert(&self, name: &str, value: T) -> Result<(), ContextError> {
        let mut entries = self.write_guard();
        match entries.entry(name.to_string()) {
            Entry::Occupied(_) => {
                warn!(task = %name, "rejected second write of context entry");
                Err(ContextError::AlreadyWritten(name.to_string()))
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(value));
                Ok(())
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.read_guard().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read_guard().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.read_guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_guard().is_empty()
    }

    /// Copy of the current entries. Values are shared, not cloned.
    pub fn snapshot(&self) -> Context<T> {
        Context {
            entries: self.read_guard().clone(),
        }
    }

    // Poisoning is ignored: `insert` never leaves the map half-written.
    fn read_guard(&self) -> RwLockReadGuard<'_, HashMap<TaskName, Arc<T>>> {
        self.entries.read().unwrap_or_else(|p| p.into_inner())
    }

    fn write_guard(&self) -> RwLockWriteGuard<'_, HashMap<TaskName, Arc<T>>> {
        self.entries.write().unwrap_or_else(|p| p.into_inner())
    }
}

impl<T> Default for ContextStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only view over a run's context, handed to executors.
#[derive(Debug)]
pub struct ContextView<T> {
    store: Arc<ContextStore<T>>,
}

impl<T> Clone for ContextView<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T> ContextView<T> {
    pub fn new(store: Arc<ContextStore<T>>) -> Self {
        Self { store }
    }

    /// Output of the named task, if it has been written.
    pub fn get(&self, name: &str) -> Option<Arc<T>> {
        self.store.get(name)
    }

    /// Like [`get`](Self::get) but returns an owned copy the caller may
    /// modify freely without affecting the stored entry.
    pub fn get_cloned(&self, name: &str) -> Option<T>
    where
        T: Clone,
    {
        self.store.get(name).map(|v| v.as_ref().clone())
    }

    /// Output of a dependency, failing if it is missing.
    ///
    /// Convenient inside executors, where a missing dependency entry means
    /// the task was wired up wrongly.
    pub fn require(&self, name: &str) -> anyhow::Result<Arc<T>> {
        self.store
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("no context entry for '{name}'"))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.store.contains(name)
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Names of all entries written so far, sorted.
    pub fn keys(&self) -> Vec<TaskName> {
        let mut keys: Vec<_> = self.store.read_guard().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn snapshot(&self) -> Context<T> {
        self.store.snapshot()
    }
}

/// Owned task-name → output map.
///
/// Returned by a successful run, and accepted as the initial seed of a run.
#[derive(Debug)]
pub struct Context<T> {
    entries: HashMap<TaskName, Arc<T>>,
}

impl<T> Clone for Context<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> Default for Context<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Context<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add a seed entry. Returns `false` (and keeps the old value) if the
    /// key is already present.
    pub fn insert(&mut self, name: impl Into<TaskName>, value: T) -> bool {
        match self.entries.entry(name.into()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(value));
                true
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name).map(|v| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Sorted entry names.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<_> = self.entries.keys().map(|k| k.as_str()).collect();
        keys.sort();
        keys
    }

    pub fn into_inner(self) -> HashMap<TaskName, Arc<T>> {
        self.entries
    }
}

impl<T, K: Into<TaskName>> FromIterator<(K, T)> for Context<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        let mut ctx = Context::new();
        for (k, v) in iter {
            ctx.insert(k, v);
        }
        ctx
    }
}
