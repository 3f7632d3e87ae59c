//! Evaluation dataset registry for question-answering skills.
//!
//! Dataset metadata records bind a dataset name to a skill type, a scoring
//! metric and a column mapping. [`DatasetLifecycle`] validates mutations
//! against the [`SchemaRegistry`], persists them in a [`MetadataStore`], and
//! keeps a local [`DatasetCache`] in sync on background workers with per-name
//! ordering.

pub mod access;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod handlers;
pub mod lifecycle;
pub mod lock;
pub mod metric;
pub mod microsvc;
pub mod schema;
pub mod store;
pub mod sync;

pub use access::{AccessError, AccessGate};
pub use cache::{CacheError, DatasetCache, FsDatasetCache, InMemoryDatasetCache};
pub use config::{ConfigError, RegistryConfig};
pub use dataset::{validate_dataset_name, DatasetMetadata, InvalidName};
pub use handlers::dataset_service;
pub use lifecycle::{DatasetLifecycle, DatasetState, LifecycleError, LifecycleOptions};
pub use metric::MetricCatalog;
pub use schema::{SchemaError, SchemaRegistry, SkillMapping};
pub use store::{FileMetadataStore, InMemoryMetadataStore, MetadataStore, StoreError};
pub use sync::{SyncLedger, SyncQueue, SyncStats, SyncTask};
