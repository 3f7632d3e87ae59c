use std::env;
use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use dataset_registry::cache::{DirectorySource, FsDatasetCache};
use dataset_registry::{
    dataset_service, microsvc, DatasetCache, DatasetLifecycle, FileMetadataStore,
    InMemoryDatasetCache, InMemoryMetadataStore, LifecycleOptions, MetadataStore, RegistryConfig,
};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if env_bool("DATASET_REGISTRY_LOG_JSON", false) {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn open_store(config: &RegistryConfig) -> Result<Arc<dyn MetadataStore>, String> {
    match &config.store.dir {
        Some(dir) => {
            let store = FileMetadataStore::open(dir)
                .map_err(|e| format!("metadata store {}: {}", dir.display(), e))?;
            info!(dir = %dir.display(), "file metadata store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("no [store] dir configured; metadata is kept in memory only");
            Ok(Arc::new(InMemoryMetadataStore::new()))
        }
    }
}

fn open_cache(config: &RegistryConfig) -> Result<Arc<dyn DatasetCache>, String> {
    match (&config.cache.dir, &config.cache.source_dir) {
        (Some(dir), Some(source)) => {
            let cache = FsDatasetCache::open(dir, DirectorySource::new(source))
                .map_err(|e| format!("dataset cache {}: {}", dir.display(), e))?;
            info!(dir = %dir.display(), source = %source.display(), "filesystem dataset cache");
            Ok(Arc::new(cache))
        }
        _ => {
            warn!("no [cache] configured; datasets cannot be downloaded");
            Ok(Arc::new(InMemoryDatasetCache::new()))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}

#[tokio::main]
async fn main() -> Result<(), String> {
    init_tracing();

    let config = RegistryConfig::from_env().map_err(|e| e.to_string())?;
    if config.allowed_identities.is_empty() {
        warn!("allowed_identities is empty; every mutation will be rejected");
    }

    let store = open_store(&config)?;
    let cache = open_cache(&config)?;
    let lifecycle = DatasetLifecycle::new(store, cache, LifecycleOptions::from_config(&config));
    let service = Arc::new(dataset_service(lifecycle));

    microsvc::serve(service.clone(), config.bind, shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    service.lifecycle().shutdown_sync();
    info!(stats = ?service.lifecycle().sync_stats(), "stopped");
    Ok(())
}
