//! Error types for command handlers.

use crate::lifecycle::LifecycleError;

/// Error type for command handler operations.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// No handler registered for this command name.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    /// Payload decode / deserialization failed.
    #[error("decode failed: {0}")]
    DecodeFailed(String),
    /// Guard rejected the command (required input missing).
    #[error("guard rejected command: {0}")]
    GuardRejected(String),
    /// The caller is not on the allow-list.
    #[error("{0}")]
    Forbidden(String),
    /// Dataset or resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// The command conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// The payload was decoded but is not acceptable.
    #[error("rejected: {0}")]
    Rejected(String),
    /// The metadata store failed.
    #[error("store error: {0}")]
    Store(String),
}

impl From<serde_json::Error> for HandlerError {
    fn from(err: serde_json::Error) -> Self {
        HandlerError::DecodeFailed(err.to_string())
    }
}

impl From<LifecycleError> for HandlerError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::Forbidden(e) => HandlerError::Forbidden(e.to_string()),
            LifecycleError::NotFound(name) => HandlerError::NotFound(name),
            LifecycleError::AlreadyExists(name) => {
                HandlerError::Conflict(format!("dataset already exists: {}", name))
            }
            LifecycleError::Store(e) => HandlerError::Store(e.to_string()),
            other => HandlerError::Rejected(other.to_string()),
        }
    }
}

impl HandlerError {
    /// Map this error to an HTTP-style status code.
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::UnknownCommand(_) => 404,
            HandlerError::DecodeFailed(_) => 400,
            HandlerError::GuardRejected(_) => 400,
            HandlerError::Forbidden(_) => 403,
            HandlerError::NotFound(_) => 404,
            HandlerError::Conflict(_) => 409,
            HandlerError::Rejected(_) => 422,
            HandlerError::Store(_) => 500,
        }
    }
}
