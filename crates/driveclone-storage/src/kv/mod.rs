//! Key-value store providers.

#[cfg(feature = "local")]
pub mod file;
pub mod manager;
#[cfg(feature = "memory")]
pub mod memory;

pub use manager::KvManager;
