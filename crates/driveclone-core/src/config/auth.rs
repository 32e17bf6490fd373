//! Identity store configuration.

use serde::{Deserialize, Serialize};

/// Identity and account-stub configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Artificial delay applied by the password-reset and activation stubs.
    #[serde(default = "default_latency")]
    pub simulated_latency_ms: u64,
    /// Storage quota recorded on every identity, in bytes (default 1 GiB).
    #[serde(default = "default_storage_limit")]
    pub storage_limit_bytes: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: default_latency(),
            storage_limit_bytes: default_storage_limit(),
        }
    }
}

fn default_latency() -> u64 {
    1000
}

fn default_storage_limit() -> u64 {
    1_073_741_824
}
