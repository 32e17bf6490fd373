//! Core type definitions used across the DriveClone workspace.

pub mod id;

pub use id::*;
