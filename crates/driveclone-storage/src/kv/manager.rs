//! Key-value manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use driveclone_core::config::StorageConfig;
use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_core::traits::KeyValueStore;

/// Key-value manager that wraps the configured provider.
#[derive(Debug, Clone)]
pub struct KvManager {
    /// The inner provider.
    inner: Arc<dyn KeyValueStore>,
}

impl KvManager {
    /// Create a new manager from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn KeyValueStore> = match config.kv_provider.as_str() {
            #[cfg(feature = "local")]
            "file" => {
                let root = config.kv_dir();
                info!(root = %root, "Initializing file key-value store");
                Arc::new(super::file::FileKeyValueStore::new(&root).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing in-memory key-value store");
                Arc::new(super::memory::MemoryKeyValueStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown key-value provider: '{other}'. Supported: file, memory"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Get a shared handle to the inner provider.
    pub fn provider(&self) -> Arc<dyn KeyValueStore> {
        Arc::clone(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driveclone_core::error::ErrorKind;

    #[tokio::test]
    async fn test_memory_provider_selected() {
        let config = StorageConfig {
            kv_provider: "memory".to_string(),
            ..StorageConfig::default()
        };
        let manager = KvManager::new(&config).await.unwrap();
        assert_eq!(manager.provider().provider_type(), "memory");
    }

    #[tokio::test]
    async fn test_file_provider_uses_data_root() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            data_root: dir.path().to_str().unwrap().to_string(),
            ..StorageConfig::default()
        };
        let manager = KvManager::new(&config).await.unwrap();
        assert_eq!(manager.provider().provider_type(), "file");
        manager.provider().set("k", "v").await.unwrap();
        assert!(dir.path().join("kv").join("k.json").exists());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = StorageConfig {
            kv_provider: "redis".to_string(),
            ..StorageConfig::default()
        };
        let err = KvManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
