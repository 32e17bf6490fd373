//! Blob store providers for uploaded file content.

#[cfg(feature = "local")]
pub mod local;
pub mod manager;
#[cfg(feature = "memory")]
pub mod memory;

pub use manager::BlobManager;
