use serde::Serialize;

/// Externally observable lifecycle state of a dataset name.
///
/// Derived on demand from the metadata store, the sync queue and the cache;
/// nothing persists it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DatasetState {
    /// No metadata record.
    Unregistered,
    /// Registered, with a cache task queued or running.
    PendingSync,
    /// Registered and cached.
    Synced,
    /// Registered but not cached. `error` is the last recorded sync failure,
    /// or `None` if the copy is simply missing.
    SyncFailed { error: Option<String> },
}

impl DatasetState {
    pub fn is_registered(&self) -> bool {
        !matches!(self, DatasetState::Unregistered)
    }
}
