//! Local filesystem key-value store: one JSON document per key.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tracing::debug;

use driveclone_core::error::{AppError, ErrorKind};
use driveclone_core::result::AppResult;
use driveclone_core::traits::KeyValueStore;

/// Extension of every stored document.
const EXTENSION: &str = "json";

/// Key-value store persisting each key as a file under a root directory.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    /// Directory holding the documents.
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `root_path`, creating the directory if needed.
    pub async fn new(root_path: &str) -> AppResult<Self> {
        let root = PathBuf::from(root_path);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create key-value root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self { root })
    }

    /// The directory holding the documents.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a key to its document path.
    fn resolve(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.{EXTENSION}", encode_key(key)))
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    fn provider_type(&self) -> &str {
        "file"
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        match fs::read_to_string(self.resolve(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to read key: {key}"),
                e,
            )),
        }
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let path = self.resolve(key);
        let tmp = path.with_extension("tmp");

        fs::write(&tmp, value).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to write key: {key}"), e)
        })?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            AppError::with_source(ErrorKind::Storage, format!("Failed to commit key: {key}"), e)
        })?;

        debug!(key, bytes = value.len(), "Wrote key");
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        match fs::remove_file(self.resolve(key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to delete key: {key}"),
                e,
            )),
        }
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        Ok(fs::try_exists(self.resolve(key)).await?)
    }

    async fn keys(&self, prefix: &str) -> AppResult<Vec<String>> {
        let mut entries = fs::read_dir(&self.root).await?;
        let mut keys = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let key = decode_key(stem);
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.is_dir())
    }
}

/// Percent-encode every byte outside `[A-Za-z0-9_.-]` so keys map to safe file names.
fn encode_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    for byte in key.bytes() {
        if byte.is_ascii_alphanumeric() || matches!(byte, b'_' | b'-' | b'.') {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}

/// Inverse of [`encode_key`].
fn decode_key(name: &str) -> String {
    let bytes = name.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi << 4 | lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn make_store() -> (tempfile::TempDir, FileKeyValueStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("kv");
        let store = FileKeyValueStore::new(root.to_str().expect("utf8 path"))
            .await
            .expect("store");
        (dir, store)
    }

    #[test]
    fn test_key_encoding_roundtrip() {
        for key in ["driveclone_token", "a b/c@d%e", "ключ"] {
            assert_eq!(decode_key(&encode_key(key)), key);
        }
        assert_eq!(encode_key("a/b"), "a%2Fb");
    }

    #[tokio::test]
    async fn test_set_get_survives_reopen() {
        let (_dir, store) = make_store().await;
        store.set("driveclone_token", "mock_token_user_1").await.unwrap();

        let reopened = FileKeyValueStore::new(store.root().to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(
            reopened.get("driveclone_token").await.unwrap(),
            Some("mock_token_user_1".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_key_is_none() {
        let (_dir, store) = make_store().await;
        assert_eq!(store.get("absent").await.unwrap(), None);
        assert!(!store.exists("absent").await.unwrap());
        store.delete("absent").await.unwrap();
    }

    #[tokio::test]
    async fn test_keys_lists_prefix_only() {
        let (_dir, store) = make_store().await;
        store.set("driveclone_files_user_1", "[]").await.unwrap();
        store.set("driveclone_folders_user_1", "[]").await.unwrap();
        store.set("odd key/1", "x").await.unwrap();

        assert_eq!(
            store.keys("driveclone_files_").await.unwrap(),
            vec!["driveclone_files_user_1"]
        );
        assert_eq!(store.keys("odd").await.unwrap(), vec!["odd key/1"]);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let (_dir, store) = make_store().await;
        store.set("k", "1").await.unwrap();
        store.set("k", "2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("2".to_string()));
        assert!(store.health_check().await.unwrap());
    }
}
