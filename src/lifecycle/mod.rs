//! Lifecycle orchestrator: validated mutations with deferred cache sync.
//!
//! [`DatasetLifecycle`] owns a [`MetadataStore`] and a [`DatasetCache`] and
//! sequences every mutation the same way:
//!
//! 1. access gate
//! 2. name, metric and mapping validation
//! 3. existence check
//! 4. store mutation
//! 5. deferred cache task (`Fetch` on create, `Refresh` on update, `Remove` on
//!    delete)
//!
//! Anything that fails in steps 1 to 3 leaves the store untouched. Step 5 runs
//! on the [`SyncQueue`] after the call returns; its failures are logged and
//! recorded but never roll back the metadata, which stays authoritative.
//!
//! ## Example
//!
//! ```
//! use std::time::Duration;
//! use dataset_registry::access::AccessGate;
//! use dataset_registry::cache::InMemoryDatasetCache;
//! use dataset_registry::lifecycle::{DatasetLifecycle, DatasetState, LifecycleOptions};
//! use dataset_registry::store::InMemoryMetadataStore;
//! use dataset_registry::DatasetMetadata;
//! use serde_json::json;
//!
//! let cache = InMemoryDatasetCache::new();
//! cache.publish("quoref");
//!
//! let lifecycle = DatasetLifecycle::new(
//!     InMemoryMetadataStore::new(),
//!     cache,
//!     LifecycleOptions {
//!         gate: AccessGate::new(["alice"]),
//!         ..LifecycleOptions::default()
//!     },
//! );
//!
//! let record = DatasetMetadata::new(
//!     "quoref",
//!     "extractive-qa",
//!     "squad",
//!     json!({
//!         "id_column": "id",
//!         "question_column": "question",
//!         "context_column": "context",
//!         "answers_column": "answers.text"
//!     }),
//! );
//! lifecycle.create(record, Some("alice")).unwrap();
//! assert!(lifecycle.wait_for_sync(Duration::from_secs(5)));
//! assert_eq!(lifecycle.sync_status("quoref").unwrap(), DatasetState::Synced);
//! ```

mod error;
mod state;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::access::AccessGate;
use crate::cache::DatasetCache;
use crate::config::RegistryConfig;
use crate::dataset::{validate_dataset_name, DatasetMetadata};
use crate::lock::NameLocks;
use crate::metric::MetricCatalog;
use crate::schema::SchemaRegistry;
use crate::store::{MetadataStore, StoreError};
use crate::sync::{SyncAction, SyncOutcome, SyncQueue, SyncRecord, SyncStats, SyncTask};

pub use error::LifecycleError;
pub use state::DatasetState;

/// Collaborators and settings for a [`DatasetLifecycle`].
#[derive(Debug, Clone)]
pub struct LifecycleOptions {
    pub registry: SchemaRegistry,
    pub gate: AccessGate,
    pub metrics: MetricCatalog,
    /// Deferred sync worker threads (at least one is started).
    pub sync_workers: usize,
}

impl Default for LifecycleOptions {
    fn default() -> Self {
        Self {
            registry: SchemaRegistry::default(),
            gate: AccessGate::default(),
            metrics: MetricCatalog::open(),
            sync_workers: 2,
        }
    }
}

impl LifecycleOptions {
    /// Built-in skill types, with gate, metrics and workers from `config`.
    pub fn from_config(config: &RegistryConfig) -> Self {
        Self {
            registry: SchemaRegistry::default(),
            gate: AccessGate::new(config.allowed_identities.iter().cloned()),
            metrics: MetricCatalog::closed(config.metrics.iter().cloned()),
            sync_workers: config.sync.workers,
        }
    }
}

/// Create / update / delete / read dataset metadata with deferred cache sync.
pub struct DatasetLifecycle<S, C> {
    store: S,
    cache: Arc<C>,
    registry: SchemaRegistry,
    gate: AccessGate,
    metrics: MetricCatalog,
    /// Held across "store mutation + schedule" so deferred tasks for a name are
    /// queued in the order their mutations committed.
    commit_locks: NameLocks,
    sync: SyncQueue,
}

impl<S, C> DatasetLifecycle<S, C>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    pub fn new(store: S, cache: C, options: LifecycleOptions) -> Self {
        let cache = Arc::new(cache);
        let sync = SyncQueue::spawn(cache.clone(), options.sync_workers);
        Self {
            store,
            cache,
            registry: options.registry,
            gate: options.gate,
            metrics: options.metrics,
            commit_locks: NameLocks::new(),
            sync,
        }
    }

    /// Register a new dataset and schedule its download.
    ///
    /// Returns the record id, which is the dataset name.
    pub fn create(
        &self,
        record: DatasetMetadata,
        identity: Option<&str>,
    ) -> Result<String, LifecycleError> {
        self.gate.authorize(identity)?;
        self.validate(&record)?;
        if self.store.get(&record.name)?.is_some() {
            return Err(LifecycleError::AlreadyExists(record.name));
        }

        self.commit(&record.name, || self.store.create(&record), SyncAction::Fetch)?;
        info!(dataset = %record.name, skill_type = %record.skill_type, "dataset created");
        Ok(record.name)
    }

    /// Replace an existing record wholesale and schedule a cache refresh.
    pub fn update(
        &self,
        record: DatasetMetadata,
        identity: Option<&str>,
    ) -> Result<(), LifecycleError> {
        self.gate.authorize(identity)?;
        self.validate(&record)?;
        if self.store.get(&record.name)?.is_none() {
            return Err(LifecycleError::NotFound(record.name));
        }

        self.commit(
            &record.name,
            || self.store.replace(&record.name, &record),
            SyncAction::Refresh,
        )?;
        info!(dataset = %record.name, skill_type = %record.skill_type, "dataset updated");
        Ok(())
    }

    /// Delete a record and schedule removal of its cached copy.
    pub fn delete(&self, name: &str, identity: Option<&str>) -> Result<(), LifecycleError> {
        self.gate.authorize(identity)?;
        check_name(name)?;
        self.commit(name, || self.store.delete(name), SyncAction::Remove)?;
        info!(dataset = %name, "dataset deleted");
        Ok(())
    }

    /// Fetch a record. A name that could never be registered is `NotFound`.
    pub fn get(&self, name: &str) -> Result<DatasetMetadata, LifecycleError> {
        if check_name(name).is_err() {
            return Err(LifecycleError::NotFound(name.to_string()));
        }
        self.store
            .get(name)?
            .ok_or_else(|| LifecycleError::NotFound(name.to_string()))
    }

    /// Registered dataset names, sorted.
    pub fn list(&self) -> Result<Vec<String>, LifecycleError> {
        let mut names = self.store.list()?;
        names.sort();
        Ok(names)
    }

    pub fn sync_status(&self, name: &str) -> Result<DatasetState, LifecycleError> {
        if check_name(name).is_err() || self.store.get(name)?.is_none() {
            return Ok(DatasetState::Unregistered);
        }
        if self.sync.is_pending(name) {
            return Ok(DatasetState::PendingSync);
        }
        let last_failure = self
            .sync
            .ledger()
            .last(name)
            .and_then(|record| record.error().map(str::to_string));
        if let Some(error) = last_failure {
            return Ok(DatasetState::SyncFailed { error: Some(error) });
        }
        if self.cache.exists(name) {
            Ok(DatasetState::Synced)
        } else {
            Ok(DatasetState::SyncFailed { error: None })
        }
    }

    /// Schedule a fresh download for a registered dataset.
    ///
    /// Always a `Refresh`, so a stale copy kept after a failed refresh is
    /// replaced rather than accepted as cached.
    pub fn resync(&self, name: &str, identity: Option<&str>) -> Result<(), LifecycleError> {
        self.gate.authorize(identity)?;
        check_name(name)?;
        if self.store.get(name)?.is_none() {
            return Err(LifecycleError::NotFound(name.to_string()));
        }
        self.schedule(SyncTask::refresh(name));
        info!(dataset = %name, "resync scheduled");
        Ok(())
    }

    /// Schedule a refresh for every registered dataset whose cache has
    /// diverged. Returns the names scheduled, sorted.
    pub fn reconcile(&self, identity: Option<&str>) -> Result<Vec<String>, LifecycleError> {
        self.gate.authorize(identity)?;
        let mut scheduled = Vec::new();
        for name in self.list()? {
            if let DatasetState::SyncFailed { .. } = self.sync_status(&name)? {
                self.schedule(SyncTask::refresh(name.as_str()));
                scheduled.push(name);
            }
        }
        info!(count = scheduled.len(), "reconcile scheduled");
        Ok(scheduled)
    }

    /// Check `identity` against the access gate without mutating anything.
    pub fn authorize(&self, identity: Option<&str>) -> Result<(), LifecycleError> {
        self.gate.authorize(identity)?;
        Ok(())
    }

    /// Datasets whose last deferred task failed.
    pub fn sync_failures(&self) -> Vec<(String, SyncRecord)> {
        self.sync.ledger().failures()
    }

    pub fn skill_types(&self) -> Vec<&str> {
        self.registry.skill_types()
    }

    /// Block until every scheduled cache task has finished or `timeout`
    /// elapses. Returns `true` if the queue drained.
    pub fn wait_for_sync(&self, timeout: Duration) -> bool {
        self.sync.wait_idle(timeout)
    }

    pub fn sync_stats(&self) -> SyncStats {
        self.sync.stats()
    }

    /// Finish scheduled cache tasks and stop the sync workers. Later
    /// mutations still succeed; their cache tasks are recorded as failed.
    pub fn shutdown_sync(&self) {
        self.sync.shutdown();
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    fn validate(&self, record: &DatasetMetadata) -> Result<(), LifecycleError> {
        check_name(&record.name)?;
        if !self.metrics.accepts(&record.metric) {
            return Err(LifecycleError::UnknownMetric(record.metric.clone()));
        }
        self.registry.validate(&record.skill_type, &record.mapping)?;
        Ok(())
    }

    /// Apply a store mutation and, if it succeeded, queue the cache task.
    fn commit(
        &self,
        name: &str,
        mutate: impl FnOnce() -> Result<(), StoreError>,
        action: SyncAction,
    ) -> Result<(), LifecycleError> {
        self.commit_locks
            .with_lock(name, || -> Result<(), LifecycleError> {
                mutate()?;
                self.schedule(SyncTask {
                    name: name.to_string(),
                    action,
                });
                Ok(())
            })
            .map_err(|e| LifecycleError::Store(e.into()))?
    }

    fn schedule(&self, task: SyncTask) {
        if let Err(err) = self.sync.schedule(task.clone()) {
            warn!(
                dataset = %task.name,
                action = ?task.action,
                error = %err,
                "cache sync not scheduled"
            );
            self.sync.ledger().record(
                &task.name,
                task.action,
                SyncOutcome::Failed {
                    error: err.to_string(),
                },
            );
        }
    }
}

fn check_name(name: &str) -> Result<(), LifecycleError> {
    validate_dataset_name(name).map_err(|reason| LifecycleError::invalid_name(name, reason))
}
