use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use super::{MetadataStore, StoreError};
use crate::dataset::{validate_dataset_name, DatasetMetadata};
use crate::lock::NameLocks;

const EXTENSION: &str = "json";

/// Directory-backed metadata store: one JSON document per dataset.
///
/// Documents are never written in place. `create` links a fully written
/// temporary file into place (failing if the document exists) and `replace`
/// renames one over the existing document, so readers only ever see complete
/// documents. Operations on the same name are serialized through [`NameLocks`].
///
/// Only valid dataset names are accepted as keys, which keeps the `/` to `%2F`
/// file name encoding one-to-one.
pub struct FileMetadataStore {
    dir: PathBuf,
    locks: NameLocks,
    tmp_seq: AtomicU64,
}

impl FileMetadataStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            locks: NameLocks::new(),
            tmp_seq: AtomicU64::new(0),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn document_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_dataset_name(name).map_err(|_| StoreError::InvalidKey(name.to_string()))?;
        Ok(self
            .dir
            .join(format!("{}.{}", name.replace('/', "%2F"), EXTENSION)))
    }

    /// Write `record` to a fresh temporary file in the store directory.
    fn write_temp(&self, record: &DatasetMetadata) -> Result<PathBuf, StoreError> {
        let bytes = serde_json::to_vec_pretty(record)?;
        let tmp = self.dir.join(format!(
            ".{}.tmp.{}.{}",
            record.name.replace('/', "%2F"),
            std::process::id(),
            self.tmp_seq.fetch_add(1, Ordering::Relaxed)
        ));
        let mut file = fs::File::create(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        Ok(tmp)
    }
}

impl MetadataStore for FileMetadataStore {
    fn get(&self, name: &str) -> Result<Option<DatasetMetadata>, StoreError> {
        let Ok(path) = self.document_path(name) else {
            return Ok(None);
        };
        match fs::read(path) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            names.push(stem.replace("%2F", "/"));
        }
        Ok(names)
    }

    fn create(&self, record: &DatasetMetadata) -> Result<(), StoreError> {
        let path = self.document_path(&record.name)?;
        self.locks.with_lock(&record.name, || {
            let tmp = self.write_temp(record)?;
            let linked = fs::hard_link(&tmp, &path);
            let _ = fs::remove_file(&tmp);
            match linked {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    Err(StoreError::AlreadyExists(record.name.clone()))
                }
                Err(e) => Err(e.into()),
            }
        })?
    }

    fn replace(&self, name: &str, record: &DatasetMetadata) -> Result<(), StoreError> {
        let path = self.document_path(name)?;
        self.locks.with_lock(name, || {
            if !path.exists() {
                return Err(StoreError::NotFound(name.to_string()));
            }
            let tmp = self.write_temp(record)?;
            if let Err(e) = fs::rename(&tmp, &path) {
                let _ = fs::remove_file(&tmp);
                return Err(e.into());
            }
            Ok(())
        })?
    }

    fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.document_path(name)?;
        self.locks.with_lock(name, || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StoreError::NotFound(name.to_string()))
            }
            Err(e) => Err(e.into()),
        })?
    }
}
