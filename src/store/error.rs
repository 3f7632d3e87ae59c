use crate::lock::LockError;

/// Errors from a [`MetadataStore`](super::MetadataStore).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("dataset not found: {0}")]
    NotFound(String),
    #[error("dataset already exists: {0}")]
    AlreadyExists(String),
    /// The name is not a valid dataset name and cannot be used as a key.
    #[error("invalid store key: {0}")]
    InvalidKey(String),
    #[error("store lock poisoned during {0}")]
    LockPoisoned(&'static str),
    #[error("store backend error: {0}")]
    Backend(String),
    #[error("store serialization error: {0}")]
    Serde(String),
}

impl From<LockError> for StoreError {
    fn from(err: LockError) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
