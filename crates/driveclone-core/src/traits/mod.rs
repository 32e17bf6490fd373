//! Core traits defined in `driveclone-core` and implemented by other crates.

pub mod blob;
pub mod confirm;
pub mod kv;

pub use blob::{BlobStore, ContentRef};
pub use confirm::{AutoConfirm, ConfirmationPrompt};
pub use kv::KeyValueStore;
