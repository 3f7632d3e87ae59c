//! Deferred cache synchronization.
//!
//! Metadata mutations schedule a [`SyncTask`] on a [`SyncQueue`] and return
//! without waiting for it. The queue runs tasks on its own worker threads:
//! tasks for the same dataset name run one at a time in the order they were
//! scheduled, tasks for different names run in parallel. Each task is attempted
//! once; its outcome is recorded in the [`SyncLedger`] and logged, never
//! reported back to the request that scheduled it.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use std::time::Duration;
//! use dataset_registry::cache::{DatasetCache, InMemoryDatasetCache};
//! use dataset_registry::sync::{SyncQueue, SyncTask};
//!
//! let cache = InMemoryDatasetCache::new();
//! cache.publish("quoref");
//!
//! let queue = SyncQueue::spawn(Arc::new(cache.clone()), 2);
//! queue.schedule(SyncTask::fetch("quoref")).unwrap();
//! assert!(queue.wait_idle(Duration::from_secs(5)));
//! assert!(cache.exists("quoref"));
//! ```

mod ledger;
mod queue;
mod task;

pub use ledger::{SyncLedger, SyncOutcome, SyncRecord};
pub use queue::{SyncError, SyncQueue, SyncStats};
pub use task::{SyncAction, SyncTask};
