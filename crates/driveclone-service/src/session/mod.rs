//! Identity store: login, registration, logout, and session restore.

pub mod service;

pub use service::IdentityStore;
