//! Blob manager that dispatches to the configured provider.

use std::sync::Arc;

use tracing::info;

use driveclone_core::config::StorageConfig;
use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_core::traits::BlobStore;

/// Blob manager that wraps the configured provider.
#[derive(Debug, Clone)]
pub struct BlobManager {
    /// The inner provider.
    inner: Arc<dyn BlobStore>,
}

impl BlobManager {
    /// Create a new manager from configuration.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let inner: Arc<dyn BlobStore> = match config.blob_provider.as_str() {
            #[cfg(feature = "local")]
            "local" => {
                let root = config.blob_dir();
                info!(root = %root, "Initializing content-addressed blob store");
                Arc::new(super::local::LocalBlobStore::new(&root).await?)
            }
            #[cfg(feature = "memory")]
            "memory" => {
                info!("Initializing transient blob store");
                Arc::new(super::memory::MemoryBlobStore::new())
            }
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown blob provider: '{other}'. Supported: local, memory"
                )));
            }
        };

        Ok(Self { inner })
    }

    /// Get a shared handle to the inner provider.
    pub fn provider(&self) -> Arc<dyn BlobStore> {
        Arc::clone(&self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use driveclone_core::error::ErrorKind;

    #[tokio::test]
    async fn test_memory_provider_selected() {
        let config = StorageConfig {
            blob_provider: "memory".to_string(),
            ..StorageConfig::default()
        };
        let manager = BlobManager::new(&config).await.unwrap();
        assert_eq!(manager.provider().provider_type(), "memory");
        let content = manager.provider().put(Bytes::from_static(b"x")).await.unwrap();
        assert!(content.is_transient());
    }

    #[tokio::test]
    async fn test_unknown_provider_rejected() {
        let config = StorageConfig {
            blob_provider: "s3".to_string(),
            ..StorageConfig::default()
        };
        let err = BlobManager::new(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }
}
