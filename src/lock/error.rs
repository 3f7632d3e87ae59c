/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    /// A thread panicked while holding the lock.
    #[error("lock poisoned: {0}")]
    Poisoned(String),
}
