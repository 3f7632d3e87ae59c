use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::LockError;

/// Lazily created `Mutex` per key.
///
/// Repeated lookups for the same key return the same `Arc`, so holders of the
/// guard exclude each other while other keys proceed in parallel. An entry is
/// dropped once [`with_lock`](Self::with_lock) releases it and no other handle
/// remains, so the map only holds names currently in use.
#[derive(Default)]
pub struct NameLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl NameLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock for `name`.
    pub fn get_lock(&self, name: &str) -> Result<Arc<Mutex<()>>, LockError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| LockError::Poisoned("name lock map".into()))?;
        Ok(locks
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone())
    }

    /// Run `f` while holding the lock for `name`.
    pub fn with_lock<T>(&self, name: &str, f: impl FnOnce() -> T) -> Result<T, LockError> {
        let lock = self.get_lock(name)?;
        let result = {
            let _guard = lock
                .lock()
                .map_err(|_| LockError::Poisoned(name.to_string()))?;
            f()
        };
        self.release(name, &lock);
        Ok(result)
    }

    /// Number of names with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop the entry for `name` when the map and `lock` are its only handles.
    fn release(&self, name: &str, lock: &Arc<Mutex<()>>) {
        let Ok(mut locks) = self.locks.lock() else {
            return;
        };
        // Checked under the map lock, so no new handle can appear meanwhile.
        if Arc::strong_count(lock) == 2 {
            locks.remove(name);
        }
    }
}
