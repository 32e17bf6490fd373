//! Key-value store trait for durable entity and session records.

use async_trait::async_trait;

use crate::result::AppResult;

/// Trait for durable key-value backends (local files, in-memory).
///
/// Values are JSON strings. The store is a durable mirror of the in-memory
/// collections; it is never consulted during an active session except at
/// load time.
#[async_trait]
pub trait KeyValueStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "file", "memory").
    fn provider_type(&self) -> &str;

    /// Get a value by key. Returns `None` if the key does not exist.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Set a value, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Delete a key. Deleting a missing key is not an error.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether a key exists.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// List all keys starting with `prefix`, sorted.
    async fn keys(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

impl dyn KeyValueStore {
    /// Get a typed value by deserializing from JSON.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value by serializing to JSON.
    pub async fn set_json<T: serde::Serialize + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        let json = serde_json::to_string(value)?;
        self.set(key, &json).await
    }
}
