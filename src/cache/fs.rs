use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::debug;

use super::{cache_key, CacheError, DatasetCache, DatasetSource};

const STAGING_DIR: &str = ".staging";

/// Filesystem dataset cache.
///
/// Each dataset lives in `<root>/<key>/`. Downloads land in
/// `<root>/.staging/` first and are published with a single `rename`, so an
/// entry directory is either absent or complete. Removal renames the entry into
/// staging before deleting it for the same reason.
pub struct FsDatasetCache<S> {
    root: PathBuf,
    source: S,
    seq: AtomicU64,
}

impl<S: DatasetSource> FsDatasetCache<S> {
    /// Open a cache rooted at `root`, discarding staging leftovers from an
    /// earlier process.
    pub fn open(root: impl Into<PathBuf>, source: S) -> std::io::Result<Self> {
        let root = root.into();
        let staging = root.join(STAGING_DIR);
        match fs::remove_dir_all(&staging) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e),
        }
        fs::create_dir_all(&staging)?;
        Ok(Self {
            root,
            source,
            seq: AtomicU64::new(0),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding the cached copy of `name`, if it is cached.
    pub fn entry_dir(&self, name: &str) -> Option<PathBuf> {
        let path = self.root.join(cache_key(name).ok()?);
        path.is_dir().then_some(path)
    }

    fn scratch_path(&self, key: &str, purpose: &str) -> PathBuf {
        self.root.join(STAGING_DIR).join(format!(
            "{}.{}.{}.{}",
            key,
            purpose,
            std::process::id(),
            self.seq.fetch_add(1, Ordering::Relaxed)
        ))
    }

    /// Download `name` into a fresh staging directory.
    fn stage(&self, name: &str, key: &str) -> Result<PathBuf, CacheError> {
        let stage = self.scratch_path(key, "download");
        fs::create_dir_all(&stage).map_err(|e| CacheError::transient(name, e))?;
        if let Err(e) = self.source.download(name, &stage) {
            let _ = fs::remove_dir_all(&stage);
            return Err(CacheError::from_source(name, e));
        }
        Ok(stage)
    }
}

impl<S: DatasetSource> DatasetCache for FsDatasetCache<S> {
    fn exists(&self, name: &str) -> bool {
        self.entry_dir(name).is_some()
    }

    fn fetch(&self, name: &str) -> Result<(), CacheError> {
        let key = cache_key(name)?;
        let entry = self.root.join(&key);
        if entry.is_dir() {
            debug!(dataset = name, "already cached");
            return Ok(());
        }

        let stage = self.stage(name, &key)?;
        match fs::rename(&stage, &entry) {
            Ok(()) => {
                debug!(dataset = name, "cached");
                Ok(())
            }
            // A concurrent fetch published first.
            Err(_) if entry.is_dir() => {
                let _ = fs::remove_dir_all(&stage);
                Ok(())
            }
            Err(e) => {
                let _ = fs::remove_dir_all(&stage);
                Err(CacheError::transient(name, e))
            }
        }
    }

    fn refresh(&self, name: &str) -> Result<(), CacheError> {
        let key = cache_key(name)?;
        let entry = self.root.join(&key);
        let stage = self.stage(name, &key)?;

        let trash = self.scratch_path(&key, "replaced");
        let had_entry = match fs::rename(&entry, &trash) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(e) => {
                let _ = fs::remove_dir_all(&stage);
                return Err(CacheError::transient(name, e));
            }
        };

        if let Err(e) = fs::rename(&stage, &entry) {
            let _ = fs::remove_dir_all(&stage);
            if had_entry {
                let _ = fs::rename(&trash, &entry);
            }
            return Err(CacheError::transient(name, e));
        }
        if had_entry {
            let _ = fs::remove_dir_all(&trash);
        }
        debug!(dataset = name, replaced = had_entry, "refreshed");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), CacheError> {
        let key = cache_key(name)?;
        let entry = self.root.join(&key);
        let trash = self.scratch_path(&key, "removed");
        match fs::rename(&entry, &trash) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(()),
            Err(e) => {
                return Err(CacheError::Remove {
                    name: name.to_string(),
                    reason: e.to_string(),
                })
            }
        }
        fs::remove_dir_all(&trash).map_err(|e| CacheError::Remove {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        debug!(dataset = name, "removed from cache");
        Ok(())
    }
}
