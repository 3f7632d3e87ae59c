//! Per-name locks.
//!
//! Operations on the same dataset name take the same lock; operations on
//! different names never contend beyond the brief map lookup.

mod error;
mod in_memory;

pub use error::LockError;
pub use in_memory::NameLocks;
