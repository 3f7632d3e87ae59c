use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Errors reported by a [`DatasetSource`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    #[error("dataset not found upstream")]
    NotFound,
    #[error("{0}")]
    Transient(String),
}

/// The external dataset repository.
///
/// `download` materializes the dataset named `name` into `dest`, an empty
/// directory owned by the caller. It may leave partial content in `dest` on
/// failure; the cache discards it.
pub trait DatasetSource: Send + Sync {
    fn download(&self, name: &str, dest: &Path) -> Result<(), SourceError>;
}

/// A dataset repository mirrored on a local directory.
///
/// The dataset `allenai/quoref` is read from `<root>/allenai--quoref/`.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DatasetSource for DirectorySource {
    fn download(&self, name: &str, dest: &Path) -> Result<(), SourceError> {
        let src = self.root.join(name.replace('/', "--"));
        match fs::metadata(&src) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(SourceError::NotFound),
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(SourceError::NotFound),
            Err(e) => return Err(SourceError::Transient(e.to_string())),
        }
        copy_dir(&src, dest).map_err(|e| SourceError::Transient(e.to_string()))
    }
}

fn copy_dir(src: &Path, dest: &Path) -> std::io::Result<()> {
    fs::create_dir_all(dest)?;
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let target = dest.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}
