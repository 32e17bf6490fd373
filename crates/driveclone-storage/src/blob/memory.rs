//! Transient in-process blob store.
//!
//! Handles issued here are valid only for the lifetime of the process, so
//! files uploaded through this provider download as placeholders after a
//! restart.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use driveclone_core::result::AppResult;
use driveclone_core::traits::{BlobStore, ContentRef};

/// Blob store issuing transient handles over in-memory buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    /// Live buffers by handle.
    blobs: Arc<DashMap<String, Bytes>>,
}

impl MemoryBlobStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live handles.
    pub fn live_handles(&self) -> usize {
        self.blobs.len()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    fn provider_type(&self) -> &str {
        "memory"
    }

    async fn put(&self, data: Bytes) -> AppResult<ContentRef> {
        let handle = Uuid::new_v4().to_string();
        debug!(handle = %handle, bytes = data.len(), "Allocated transient handle");
        self.blobs.insert(handle.clone(), data);
        Ok(ContentRef::Transient(handle))
    }

    async fn get(&self, content: &ContentRef) -> AppResult<Option<Bytes>> {
        match content {
            ContentRef::Transient(handle) => {
                Ok(self.blobs.get(handle).map(|entry| entry.value().clone()))
            }
            _ => Ok(None),
        }
    }

    async fn release(&self, content: &ContentRef) -> AppResult<()> {
        if let ContentRef::Transient(handle) = content {
            if self.blobs.remove(handle).is_some() {
                debug!(handle = %handle, "Released transient handle");
            }
        }
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_release() {
        let store = MemoryBlobStore::new();
        let content = store.put(Bytes::from_static(b"hello")).await.unwrap();
        assert!(content.is_transient());
        assert_eq!(
            store.get(&content).await.unwrap(),
            Some(Bytes::from_static(b"hello"))
        );

        store.release(&content).await.unwrap();
        assert_eq!(store.get(&content).await.unwrap(), None);
        assert_eq!(store.live_handles(), 0);
    }

    #[tokio::test]
    async fn test_handles_do_not_survive_a_new_store() {
        let content = MemoryBlobStore::new()
            .put(Bytes::from_static(b"gone"))
            .await
            .unwrap();
        let fresh = MemoryBlobStore::new();
        assert_eq!(fresh.get(&content).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_other_refs_are_not_live() {
        let store = MemoryBlobStore::new();
        assert_eq!(store.get(&ContentRef::Detached).await.unwrap(), None);
        assert_eq!(store.get(&ContentRef::Placeholder).await.unwrap(), None);
        store.release(&ContentRef::Detached).await.unwrap();
    }
}
