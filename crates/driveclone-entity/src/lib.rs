//! # driveclone-entity
//!
//! Domain entity models for DriveClone. Every struct in this crate is a
//! record persisted as JSON in the key-value store. Field names on disk use
//! the camelCase layout shared by all DriveClone front ends.

pub mod file;
pub mod folder;
pub mod identity;
