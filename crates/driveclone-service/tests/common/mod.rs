//! Shared fixtures for the store integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use driveclone_core::config::{AuthConfig, StorageConfig};
use driveclone_core::result::AppResult;
use driveclone_core::traits::{ConfirmationPrompt, KeyValueStore};
use driveclone_service::{EntityStore, IdentityStore, StoreBackends};
use driveclone_storage::blob::memory::MemoryBlobStore;
use driveclone_storage::kv::memory::MemoryKeyValueStore;

pub const MB: u64 = 1024 * 1024;

/// In-memory key-value store that counts writes.
#[derive(Debug, Default, Clone)]
pub struct CountingKv {
    pub inner: MemoryKeyValueStore,
    pub sets: Arc<AtomicUsize>,
}

impl CountingKv {
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for CountingKv {
    fn provider_type(&self) -> &str {
        "counting"
    }

    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        self.inner.delete(key).await
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        self.inner.exists(key).await
    }

    async fn keys(&self, prefix: &str) -> AppResult<Vec<String>> {
        self.inner.keys(prefix).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

/// Confirmation prompt that records every message and gives a fixed answer.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    pub answer: bool,
    pub messages: Mutex<Vec<String>>,
}

impl RecordingPrompt {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            answer: true,
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn declining() -> Arc<Self> {
        Arc::new(Self {
            answer: false,
            messages: Mutex::new(Vec::new()),
        })
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationPrompt for RecordingPrompt {
    async fn confirm(&self, message: &str) -> AppResult<bool> {
        self.messages.lock().unwrap().push(message.to_string());
        Ok(self.answer)
    }
}

/// In-memory providers, no seeding.
pub fn storage_config() -> StorageConfig {
    StorageConfig {
        kv_provider: "memory".to_string(),
        blob_provider: "memory".to_string(),
        seed_samples: false,
        ..StorageConfig::default()
    }
}

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        simulated_latency_ms: 0,
        ..AuthConfig::default()
    }
}

/// A shared environment that outlives individual stores, like a disk would.
#[derive(Debug, Clone)]
pub struct Harness {
    pub kv: CountingKv,
    pub blobs: MemoryBlobStore,
    pub config: StorageConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(storage_config())
    }

    pub fn with_config(config: StorageConfig) -> Self {
        Self {
            kv: CountingKv::default(),
            blobs: MemoryBlobStore::new(),
            config,
        }
    }

    pub fn backends(&self, confirm: Arc<dyn ConfirmationPrompt>) -> StoreBackends {
        StoreBackends {
            kv: Arc::new(self.kv.clone()),
            blobs: Arc::new(self.blobs.clone()),
            confirm,
        }
    }

    pub fn identity_store(&self) -> IdentityStore {
        IdentityStore::new(Arc::new(self.kv.clone()), auth_config())
    }

    /// Log in as `email` and open that identity's entity store.
    pub async fn open_as(
        &self,
        email: &str,
        confirm: Arc<dyn ConfirmationPrompt>,
    ) -> (IdentityStore, EntityStore) {
        let mut identities = self.identity_store();
        identities.login(email, "password").await.unwrap();
        let store = EntityStore::open(
            identities.context().unwrap(),
            self.backends(confirm),
            &self.config,
        )
        .await
        .unwrap();
        (identities, store)
    }
}
