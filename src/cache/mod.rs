//! Dataset cache: the local materialized copy of each dataset.
//!
//! A cache entry is either fully present or absent. It is derived from the
//! external dataset repository and can always be rebuilt, so the cache is never
//! the source of truth for metadata.

mod error;
mod fs;
mod in_memory;
mod source;

use std::sync::Arc;

pub use error::CacheError;
pub use fs::FsDatasetCache;
pub use in_memory::{CacheOp, InMemoryDatasetCache};
pub use source::{DatasetSource, DirectorySource, SourceError};

/// Fetch / exists / remove capability over locally cached datasets.
pub trait DatasetCache: Send + Sync {
    /// Whether a complete copy of `name` is cached.
    fn exists(&self, name: &str) -> bool;

    /// Download `name` if it is not cached yet. A no-op when it already is.
    ///
    /// On failure the cache is left as it was: no partial entry becomes
    /// visible.
    fn fetch(&self, name: &str) -> Result<(), CacheError>;

    /// Download `name` again and swap it in, replacing any cached copy.
    ///
    /// If the download fails the previous complete copy (or absence) is kept.
    fn refresh(&self, name: &str) -> Result<(), CacheError>;

    /// Remove the cached copy of `name`. Removing an absent entry succeeds.
    fn remove(&self, name: &str) -> Result<(), CacheError>;
}

impl<T: DatasetCache + ?Sized> DatasetCache for Arc<T> {
    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }

    fn fetch(&self, name: &str) -> Result<(), CacheError> {
        (**self).fetch(name)
    }

    fn refresh(&self, name: &str) -> Result<(), CacheError> {
        (**self).refresh(name)
    }

    fn remove(&self, name: &str) -> Result<(), CacheError> {
        (**self).remove(name)
    }
}

/// Directory key for a dataset name: `allenai/quoref` → `allenai--quoref`.
pub fn cache_key(name: &str) -> Result<String, CacheError> {
    crate::dataset::validate_dataset_name(name)
        .map_err(|e| CacheError::InvalidKey(format!("{}: {}", name, e)))?;
    Ok(name.replace('/', "--"))
}
