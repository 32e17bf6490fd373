//! File domain entities.

pub mod model;

pub use model::{DEFAULT_MIME_TYPE, Download, FileEntity, FileUpload};
