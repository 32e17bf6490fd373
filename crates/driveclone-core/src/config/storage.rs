//! Storage provider configuration.

use serde::{Deserialize, Serialize};

/// Key-value store, blob store, and entity store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root directory for all runtime data.
    #[serde(default = "default_data_root")]
    pub data_root: String,
    /// Key-value provider: `"file"` or `"memory"`.
    #[serde(default = "default_kv_provider")]
    pub kv_provider: String,
    /// Blob provider: `"local"` (content-addressed, durable) or `"memory"` (transient).
    #[serde(default = "default_blob_provider")]
    pub blob_provider: String,
    /// Maximum upload size in bytes (default 100 MiB).
    #[serde(default = "default_max_upload")]
    pub max_upload_size_bytes: u64,
    /// Quiet window before a scheduled write reaches the key-value store.
    #[serde(default = "default_debounce")]
    pub persist_debounce_ms: u64,
    /// Seed demo files and folders for identities with no stored data.
    #[serde(default = "default_true")]
    pub seed_samples: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: default_data_root(),
            kv_provider: default_kv_provider(),
            blob_provider: default_blob_provider(),
            max_upload_size_bytes: default_max_upload(),
            persist_debounce_ms: default_debounce(),
            seed_samples: true,
        }
    }
}

impl StorageConfig {
    /// Directory holding one JSON document per key.
    pub fn kv_dir(&self) -> String {
        format!("{}/kv", self.data_root.trim_end_matches('/'))
    }

    /// Directory holding content-addressed blobs.
    pub fn blob_dir(&self) -> String {
        format!("{}/blobs", self.data_root.trim_end_matches('/'))
    }
}

fn default_data_root() -> String {
    "./data".to_string()
}

fn default_kv_provider() -> String {
    "file".to_string()
}

fn default_blob_provider() -> String {
    "local".to_string()
}

fn default_max_upload() -> u64 {
    104_857_600 // 100 MiB
}

fn default_debounce() -> u64 {
    500
}

fn default_true() -> bool {
    true
}
