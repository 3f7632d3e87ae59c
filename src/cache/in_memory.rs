use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use super::{cache_key, CacheError, DatasetCache};

/// A cache operation observed by [`InMemoryDatasetCache`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheOp {
    Fetch(String),
    Refresh(String),
    Remove(String),
}

#[derive(Default)]
struct State {
    /// Upstream datasets and their current revision.
    upstream: HashMap<String, u64>,
    /// Cached datasets and the revision they were fetched at.
    cached: HashMap<String, u64>,
    /// Injected failures, returned by every fetch/refresh/remove of the name.
    failures: HashMap<String, CacheError>,
    ops: Vec<CacheOp>,
}

/// In-process dataset cache with an in-process "upstream".
///
/// Useful for tests and development: datasets are published upstream with
/// [`publish`](Self::publish), failures can be injected per name, and every
/// operation is recorded in order. Clone-friendly via `Arc`.
#[derive(Clone, Default)]
pub struct InMemoryDatasetCache {
    state: Arc<Mutex<State>>,
    delay: Option<Duration>,
}

impl InMemoryDatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sleep this long inside every fetch/refresh/remove.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // State holds plain maps; a panic mid-update cannot break them.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Make `name` available upstream, bumping its revision.
    pub fn publish(&self, name: &str) -> u64 {
        let mut state = self.state();
        let revision = state.upstream.entry(name.to_string()).or_insert(0);
        *revision += 1;
        *revision
    }

    /// Remove `name` from upstream. Cached copies are unaffected.
    pub fn unpublish(&self, name: &str) {
        self.state().upstream.remove(name);
    }

    /// Fail every operation on `name` with `error` until cleared.
    pub fn fail_with(&self, name: &str, error: CacheError) {
        self.state().failures.insert(name.to_string(), error);
    }

    pub fn clear_failure(&self, name: &str) {
        self.state().failures.remove(name);
    }

    /// Revision of the cached copy of `name`, if cached.
    pub fn cached_revision(&self, name: &str) -> Option<u64> {
        self.state().cached.get(name).copied()
    }

    /// Every operation performed so far, in order.
    pub fn operations(&self) -> Vec<CacheOp> {
        self.state().ops.clone()
    }

    fn begin(&self, op: CacheOp) -> Result<(), CacheError> {
        let name = match &op {
            CacheOp::Fetch(n) | CacheOp::Refresh(n) | CacheOp::Remove(n) => n.clone(),
        };
        cache_key(&name)?;
        self.state().ops.push(op);
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        match self.state().failures.get(&name) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn download(&self, name: &str) -> Result<(), CacheError> {
        let mut state = self.state();
        let revision = *state
            .upstream
            .get(name)
            .ok_or_else(|| CacheError::NotFoundOnSource(name.to_string()))?;
        state.cached.insert(name.to_string(), revision);
        Ok(())
    }
}

impl DatasetCache for InMemoryDatasetCache {
    fn exists(&self, name: &str) -> bool {
        self.state().cached.contains_key(name)
    }

    fn fetch(&self, name: &str) -> Result<(), CacheError> {
        self.begin(CacheOp::Fetch(name.to_string()))?;
        if self.exists(name) {
            return Ok(());
        }
        self.download(name)
    }

    fn refresh(&self, name: &str) -> Result<(), CacheError> {
        self.begin(CacheOp::Refresh(name.to_string()))?;
        self.download(name)
    }

    fn remove(&self, name: &str) -> Result<(), CacheError> {
        self.begin(CacheOp::Remove(name.to_string()))?;
        self.state().cached.remove(name);
        Ok(())
    }
}
