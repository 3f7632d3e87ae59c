//! Metadata store: the system of record for dataset metadata.
//!
//! Stores are plain single-document CRUD keyed by dataset name. They do not
//! validate mappings; the lifecycle orchestrator does that before calling in.
//! Every operation on a name is atomic with respect to other operations on the
//! same name.

mod error;
mod file;
mod in_memory;

use std::sync::Arc;

use crate::dataset::DatasetMetadata;

pub use error::StoreError;
pub use file::FileMetadataStore;
pub use in_memory::InMemoryMetadataStore;

/// CRUD over persisted dataset metadata records.
pub trait MetadataStore: Send + Sync {
    /// Get a record by name. Returns `Ok(None)` if it does not exist.
    fn get(&self, name: &str) -> Result<Option<DatasetMetadata>, StoreError>;

    /// Names of all stored records. Order is not significant.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Insert a new record. Fails with `AlreadyExists` if the name is taken.
    fn create(&self, record: &DatasetMetadata) -> Result<(), StoreError>;

    /// Replace the whole record stored under `name`. Fails with `NotFound` if
    /// there is none.
    fn replace(&self, name: &str, record: &DatasetMetadata) -> Result<(), StoreError>;

    /// Delete the record stored under `name`. Fails with `NotFound` if there is
    /// none.
    fn delete(&self, name: &str) -> Result<(), StoreError>;
}

impl<T: MetadataStore + ?Sized> MetadataStore for Arc<T> {
    fn get(&self, name: &str) -> Result<Option<DatasetMetadata>, StoreError> {
        (**self).get(name)
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        (**self).list()
    }

    fn create(&self, record: &DatasetMetadata) -> Result<(), StoreError> {
        (**self).create(record)
    }

    fn replace(&self, name: &str, record: &DatasetMetadata) -> Result<(), StoreError> {
        (**self).replace(name, record)
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        (**self).delete(name)
    }
}
