//! # driveclone-storage
//!
//! Storage provider implementations for DriveClone:
//!
//! - **kv**: durable key-value stores holding session and entity records
//!   (one JSON file per key, or in-memory)
//! - **blob**: upload content, either content-addressed on local disk or as
//!   transient in-process handles
//!
//! Providers are selected at runtime from [`StorageConfig`](driveclone_core::config::StorageConfig).

pub mod blob;
pub mod keys;
pub mod kv;

pub use blob::BlobManager;
pub use kv::KvManager;
