//! # driveclone-service
//!
//! The stores behind every DriveClone front end. [`IdentityStore`] owns the
//! logged-in identity; [`EntityStore`] owns one identity's files and folders
//! and mirrors them into the key-value store through a debounced writer.
//!
//! Stores take their backends by constructor injection as `Arc` trait
//! objects, so tests can swap in in-memory providers.

pub mod context;
pub mod entity;
pub mod persistence;
pub mod seed;
pub mod session;

pub use context::SessionContext;
pub use entity::{EntityStore, FolderRemoval, StoreBackends};
pub use persistence::{DebouncedWriter, Snapshot};
pub use session::IdentityStore;
