use serde::Serialize;

use crate::cache::{CacheError, DatasetCache};

/// What a deferred task does to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    /// Download if absent.
    Fetch,
    /// Download again and swap in.
    Refresh,
    /// Drop the cached copy.
    Remove,
}

/// One deferred cache operation for one dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncTask {
    pub name: String,
    pub action: SyncAction,
}

impl SyncTask {
    pub fn fetch(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: SyncAction::Fetch,
        }
    }

    pub fn refresh(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: SyncAction::Refresh,
        }
    }

    pub fn remove(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            action: SyncAction::Remove,
        }
    }

    pub(crate) fn run(&self, cache: &dyn DatasetCache) -> Result<(), CacheError> {
        match self.action {
            SyncAction::Fetch => cache.fetch(&self.name),
            SyncAction::Refresh => cache.refresh(&self.name),
            SyncAction::Remove => cache.remove(&self.name),
        }
    }
}
