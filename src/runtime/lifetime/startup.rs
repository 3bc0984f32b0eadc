use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

/// Create the cache instance configured for this deployment
async fn create_cache() -> Result<Arc<dyn ObjectCache>, Box<dyn std::error::Error>> {
    let config = AppConfig::get();
    let cache_type = &config.cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if let Some(constructor) = get_object_cache_plugin(cache_type) {
        match constructor().await {
            Ok(cache) => {
                warn!("Successfully created {} cache backend", cache_type);
                return Ok(Arc::from(cache));
            }
            Err(e) => {
                warn!("Failed to create {} cache: {}", cache_type, e);
            }
        }
    } else {
        warn!("Cache backend '{}' not found in registry", cache_type);
    }

    // Fall back to the in-memory cache when the configured backend is
    // unavailable
    if cache_type != "moka"
        && let Some(fallback_constructor) = get_object_cache_plugin("moka")
    {
        match fallback_constructor().await {
            Ok(cache) => {
                warn!("Successfully created fallback Moka (in-memory) cache backend");
                return Ok(Arc::from(cache));
            }
            Err(fallback_e) => {
                warn!("Failed to create fallback Moka cache: {}", fallback_e);
            }
        }
    }

    Err(format!("No cache backend available (tried: {cache_type})").into())
}

/// Ensure the image upload directory exists before the first request
fn prepare_upload_dir() {
    let config = AppConfig::get();
    if let Err(e) = std::fs::create_dir_all(&config.upload.dir) {
        warn!(
            "Failed to create upload directory '{}': {}",
            config.upload.dir, e
        );
    }
}

/// Prepare everything the server needs before binding:
/// storage (with migrations), cache, and the upload directory.
pub async fn prepare_server_startup() -> StartupContext {
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage()
        .await
        .expect("Failed to create storage backend");
    warn!("Storage backend initialized and migrations completed");

    prepare_upload_dir();

    let cache = create_cache().await.expect("Failed to create cache");
    warn!("Cache backend initialized");

    StartupContext { storage, cache }
}
