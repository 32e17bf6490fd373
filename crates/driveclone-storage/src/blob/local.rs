//! Content-addressed blob store on the local filesystem.
//!
//! Each blob is stored once under `root/<aa>/<rest-of-sha256>`; identical
//! uploads share the same object.

use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use sha2::{Digest, Sha256};
use tokio::fs;
use tracing::{debug, warn};

use driveclone_core::error::{AppError, ErrorKind};
use driveclone_core::result::AppResult;
use driveclone_core::traits::{BlobStore, ContentRef};

/// Durable blob store keyed by SHA-256 digest.
#[derive(Debug, Clone)]
pub struct LocalBlobStore {
    /// Root directory for all objects.
    root: PathBuf,
}

impl LocalBlobStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create blob root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// Path of the object for `digest`, or `None` if the digest is malformed.
    fn resolve(&self, digest: &str) -> Option<PathBuf> {
        let valid = digest.len() == 64 && digest.bytes().all(|b| b.is_ascii_hexdigit());
        if !valid {
            warn!(digest, "Ignoring malformed content digest");
            return None;
        }
        Some(self.root.join(&digest[..2]).join(&digest[2..]))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn put(&self, data: Bytes) -> AppResult<ContentRef> {
        let digest = format!("{:x}", Sha256::digest(&data));
        let path = self
            .resolve(&digest)
            .ok_or_else(|| AppError::internal("Computed digest is not valid hex"))?;

        if fs::try_exists(&path).await? {
            debug!(digest = %digest, "Blob already stored");
            return Ok(ContentRef::Stored(digest));
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let tmp = path.with_extension("tmp");
        fs::write(&tmp, &data).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write blob {digest}"), e)
        })?;
        fs::rename(&tmp, &path).await?;

        debug!(digest = %digest, bytes = data.len(), "Stored blob");
        Ok(ContentRef::Stored(digest))
    }

    async fn get(&self, content: &ContentRef) -> AppResult<Option<Bytes>> {
        let ContentRef::Stored(digest) = content else {
            return Ok(None);
        };
        let Some(path) = self.resolve(digest) else {
            return Ok(None);
        };
        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read blob {digest}"),
                e,
            )),
        }
    }

    async fn release(&self, content: &ContentRef) -> AppResult<()> {
        let ContentRef::Stored(digest) = content else {
            return Ok(());
        };
        let Some(path) = self.resolve(digest) else {
            return Ok(());
        };
        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(digest = %digest, "Released blob");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete blob {digest}"),
                e,
            )),
        }
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_store() -> (tempfile::TempDir, LocalBlobStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalBlobStore::new(dir.path().join("blobs").to_str().unwrap())
            .await
            .unwrap();
        (dir, store)
    }

    #[tokio::test]
    async fn test_put_is_content_addressed() {
        let (_dir, store) = make_store().await;
        let first = store.put(Bytes::from_static(b"abc")).await.unwrap();
        let second = store.put(Bytes::from_static(b"abc")).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first,
            ContentRef::Stored(
                "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_content_survives_reopen() {
        let (dir, store) = make_store().await;
        let content = store.put(Bytes::from_static(b"durable")).await.unwrap();

        let reopened = LocalBlobStore::new(dir.path().join("blobs").to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(
            reopened.get(&content).await.unwrap(),
            Some(Bytes::from_static(b"durable"))
        );
    }

    #[tokio::test]
    async fn test_release_removes_object() {
        let (_dir, store) = make_store().await;
        let content = store.put(Bytes::from_static(b"bye")).await.unwrap();
        store.release(&content).await.unwrap();
        assert_eq!(store.get(&content).await.unwrap(), None);
        store.release(&content).await.unwrap();
    }

    #[tokio::test]
    async fn test_malformed_digest_is_not_live() {
        let (_dir, store) = make_store().await;
        let bogus = ContentRef::Stored("../../etc/passwd".to_string());
        assert_eq!(store.get(&bogus).await.unwrap(), None);
        store.release(&bogus).await.unwrap();
    }
}
