use super::SourceError;

/// Errors from a [`DatasetCache`](super::DatasetCache).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// The dataset repository has no dataset by this name.
    #[error("dataset not found on source: {0}")]
    NotFoundOnSource(String),
    /// The download failed in a way that may succeed on a later attempt.
    #[error("transient fetch failure for {name}: {reason}")]
    Transient { name: String, reason: String },
    /// The cached copy could not be removed.
    #[error("failed to remove cached dataset {name}: {reason}")]
    Remove { name: String, reason: String },
    /// The name cannot be used as a cache key.
    #[error("invalid cache key: {0}")]
    InvalidKey(String),
}

impl CacheError {
    /// Whether retrying the same operation later might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, CacheError::Transient { .. } | CacheError::Remove { .. })
    }

    pub(crate) fn transient(name: &str, reason: impl ToString) -> Self {
        CacheError::Transient {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn from_source(name: &str, err: SourceError) -> Self {
        match err {
            SourceError::NotFound => CacheError::NotFoundOnSource(name.to_string()),
            SourceError::Transient(reason) => CacheError::transient(name, reason),
        }
    }
}
