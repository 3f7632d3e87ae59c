use std::collections::hash_map::Entry;
use std::collections::{HashMap, VecDeque};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, warn};

use super::{SyncAction, SyncLedger, SyncOutcome, SyncTask};
use crate::cache::{CacheError, DatasetCache};

/// Errors from [`SyncQueue::schedule`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("sync queue is shut down")]
    QueueClosed,
}

/// Counters from the sync workers.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub scheduled: usize,
    pub fetched: usize,
    pub refreshed: usize,
    pub removed: usize,
    pub failed: usize,
}

#[derive(Default)]
struct Counters {
    scheduled: AtomicUsize,
    fetched: AtomicUsize,
    refreshed: AtomicUsize,
    removed: AtomicUsize,
    failed: AtomicUsize,
}

struct Shared {
    /// Names with queued or running tasks. A name stays present (possibly with
    /// an empty queue) while one of its tasks runs, which is what keeps a
    /// second worker from picking it up.
    pending: Mutex<HashMap<String, VecDeque<SyncTask>>>,
    idle: Condvar,
    ledger: SyncLedger,
    counters: Counters,
}

impl Shared {
    fn pending(&self) -> MutexGuard<'_, HashMap<String, VecDeque<SyncTask>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run the queued tasks for `name` until its queue is empty.
    fn drain(&self, cache: &dyn DatasetCache, name: &str) {
        loop {
            let task = {
                let mut pending = self.pending();
                match pending.get_mut(name).and_then(|queue| queue.pop_front()) {
                    Some(task) => task,
                    None => {
                        pending.remove(name);
                        if pending.is_empty() {
                            self.idle.notify_all();
                        }
                        return;
                    }
                }
            };
            self.execute(cache, &task);
        }
    }

    fn execute(&self, cache: &dyn DatasetCache, task: &SyncTask) {
        let result = panic::catch_unwind(AssertUnwindSafe(|| task.run(cache))).unwrap_or_else(
            |_| Err(CacheError::transient(&task.name, "cache operation panicked")),
        );

        match result {
            Ok(()) => {
                let counter = match task.action {
                    SyncAction::Fetch => &self.counters.fetched,
                    SyncAction::Refresh => &self.counters.refreshed,
                    SyncAction::Remove => &self.counters.removed,
                };
                counter.fetch_add(1, Ordering::Relaxed);
                debug!(dataset = %task.name, action = ?task.action, "cache sync succeeded");
                self.ledger
                    .record(&task.name, task.action, SyncOutcome::Succeeded);
            }
            Err(err) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(
                    dataset = %task.name,
                    action = ?task.action,
                    transient = err.is_transient(),
                    error = %err,
                    "cache sync failed; metadata kept"
                );
                self.ledger.record(
                    &task.name,
                    task.action,
                    SyncOutcome::Failed {
                        error: err.to_string(),
                    },
                );
            }
        }
    }
}

/// Worker pool running deferred cache tasks with per-name ordering.
///
/// Dropping the queue (or calling [`shutdown`](Self::shutdown)) stops accepting
/// new tasks, lets the workers finish everything already scheduled, and joins
/// them.
pub struct SyncQueue {
    shared: Arc<Shared>,
    ready: Mutex<Option<Sender<String>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl SyncQueue {
    /// Spawn `workers` threads (at least one) running tasks against `cache`.
    pub fn spawn(cache: Arc<dyn DatasetCache>, workers: usize) -> Self {
        let shared = Arc::new(Shared {
            pending: Mutex::new(HashMap::new()),
            idle: Condvar::new(),
            ledger: SyncLedger::new(),
            counters: Counters::default(),
        });
        let (ready_tx, ready_rx) = channel::<String>();
        let ready_rx = Arc::new(Mutex::new(ready_rx));

        let handles = (0..workers.max(1))
            .map(|id| {
                let shared = Arc::clone(&shared);
                let cache = Arc::clone(&cache);
                let ready_rx = Arc::clone(&ready_rx);
                thread::spawn(move || worker_loop(id, &shared, cache.as_ref(), &ready_rx))
            })
            .collect();

        Self {
            shared,
            ready: Mutex::new(Some(ready_tx)),
            workers: Mutex::new(handles),
        }
    }

    /// Queue `task` behind any earlier tasks for the same name.
    pub fn schedule(&self, task: SyncTask) -> Result<(), SyncError> {
        let ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = ready.as_ref().ok_or(SyncError::QueueClosed)?;

        let mut pending = self.shared.pending();
        let name = task.name.clone();
        let action = task.action;
        match pending.entry(name.clone()) {
            Entry::Occupied(mut queue) => queue.get_mut().push_back(task),
            Entry::Vacant(slot) => {
                slot.insert(VecDeque::from([task]));
                if sender.send(name.clone()).is_err() {
                    pending.remove(&name);
                    return Err(SyncError::QueueClosed);
                }
            }
        }
        self.shared.counters.scheduled.fetch_add(1, Ordering::Relaxed);
        debug!(dataset = %name, action = ?action, "cache sync scheduled");
        Ok(())
    }

    /// Whether `name` has a queued or running task.
    pub fn is_pending(&self, name: &str) -> bool {
        self.shared.pending().contains_key(name)
    }

    /// Block until no task is queued or running, or `timeout` elapses.
    /// Returns `true` if the queue went idle.
    pub fn wait_idle(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.shared.pending();
        while !pending.is_empty() {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            pending = match self.shared.idle.wait_timeout(pending, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
        true
    }

    pub fn ledger(&self) -> &SyncLedger {
        &self.shared.ledger
    }

    pub fn stats(&self) -> SyncStats {
        let c = &self.shared.counters;
        SyncStats {
            scheduled: c.scheduled.load(Ordering::Relaxed),
            fetched: c.fetched.load(Ordering::Relaxed),
            refreshed: c.refreshed.load(Ordering::Relaxed),
            removed: c.removed.load(Ordering::Relaxed),
            failed: c.failed.load(Ordering::Relaxed),
        }
    }

    /// Stop accepting tasks, finish the scheduled ones, and join the workers.
    pub fn shutdown(&self) {
        drop(
            self.ready
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .take(),
        );
        let handles: Vec<_> = self
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect();
        for handle in handles {
            let _ = handle.join();
        }
    }
}

impl Drop for SyncQueue {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn worker_loop(
    id: usize,
    shared: &Shared,
    cache: &dyn DatasetCache,
    ready: &Mutex<Receiver<String>>,
) {
    debug!(worker = id, "sync worker started");
    loop {
        let next = ready
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();
        match next {
            Ok(name) => shared.drain(cache, &name),
            Err(_) => break,
        }
    }
    debug!(worker = id, "sync worker stopped");
}
