use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::{MetadataStore, StoreError};
use crate::dataset::DatasetMetadata;

/// `HashMap`-backed metadata store for tests and single-process deployments.
///
/// Clone-friendly via `Arc`: clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemoryMetadataStore {
    storage: Arc<RwLock<HashMap<String, DatasetMetadata>>>,
}

impl InMemoryMetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.storage.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl MetadataStore for InMemoryMetadataStore {
    fn get(&self, name: &str) -> Result<Option<DatasetMetadata>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.get(name).cloned())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let storage = self
            .storage
            .read()
            .map_err(|_| StoreError::LockPoisoned("read"))?;
        Ok(storage.keys().cloned().collect())
    }

    fn create(&self, record: &DatasetMetadata) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        match storage.entry(record.name.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(record.name.clone())),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(())
            }
        }
    }

    fn replace(&self, name: &str, record: &DatasetMetadata) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        match storage.get_mut(name) {
            Some(existing) => {
                *existing = record.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(name.to_string())),
        }
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        let mut storage = self
            .storage
            .write()
            .map_err(|_| StoreError::LockPoisoned("write"))?;
        storage
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(name.to_string()))
    }
}
