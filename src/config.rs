//! Registry configuration, loaded from TOML.
//!
//! ```toml
//! bind = "0.0.0.0:8080"
//! allowed_identities = ["alice", "ops-bot"]
//! metrics = ["squad", "accuracy"]
//!
//! [store]
//! dir = "/var/lib/dataset-registry/metadata"
//!
//! [cache]
//! dir = "/var/cache/dataset-registry"
//! source_dir = "/mnt/datasets"
//!
//! [sync]
//! workers = 4
//! ```

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "DATASET_REGISTRY_CONFIG";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default = "default_bind")]
    pub bind: SocketAddr,
    #[serde(default)]
    pub allowed_identities: Vec<String>,
    #[serde(default)]
    pub metrics: Vec<String>,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    /// Directory of JSON documents. In-memory store when absent.
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    /// Local cache root. In-memory cache when absent.
    pub dir: Option<PathBuf>,
    /// Directory mirror of the dataset repository.
    pub source_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_bind() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8080))
}

fn default_workers() -> usize {
    2
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            allowed_identities: Vec::new(),
            metrics: Vec::new(),
            store: StoreConfig::default(),
            cache: CacheConfig::default(),
            sync: SyncConfig::default(),
        }
    }
}

impl RegistryConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RegistryConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load the file named by `DATASET_REGISTRY_CONFIG`, or defaults if unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sync.workers == 0 {
            return Err(ConfigError::Invalid("sync.workers must be at least 1".into()));
        }
        if self.cache.dir.is_some() != self.cache.source_dir.is_some() {
            return Err(ConfigError::Invalid(
                "cache.dir and cache.source_dir must be set together".into(),
            ));
        }
        if let Some(id) = self.allowed_identities.iter().find(|id| id.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "blank identity in allowed_identities: {:?}",
                id
            )));
        }
        Ok(())
    }
}
