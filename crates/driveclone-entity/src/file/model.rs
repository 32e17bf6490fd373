//! File entity model.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use driveclone_core::traits::ContentRef;
use driveclone_core::types::{FileId, FolderId, UserId};

/// MIME type recorded when an upload does not declare one.
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// A file owned by one identity.
///
/// Records are immutable once created; they are only ever removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntity {
    /// Unique file identifier.
    #[serde(rename = "_id")]
    pub id: FileId,
    /// The file name (including extension).
    pub name: String,
    /// File size in bytes.
    pub size: u64,
    /// MIME type of the file.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// When the file was uploaded.
    pub created_at: DateTime<Utc>,
    /// Where the bytes live.
    #[serde(rename = "url")]
    pub content: ContentRef,
    /// The containing folder, `None` for root.
    #[serde(default)]
    pub parent_folder: Option<FolderId>,
    /// The owning identity.
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    /// Seed data rather than a user upload.
    #[serde(default)]
    pub is_sample: bool,
}

impl FileEntity {
    /// Whether this file sits directly in `folder` (`None` = root).
    pub fn is_in(&self, folder: Option<&FolderId>) -> bool {
        self.parent_folder.as_ref() == folder
    }

    /// The record as written to durable storage.
    pub fn persisted(&self) -> Self {
        Self {
            content: self.content.persisted(),
            ..self.clone()
        }
    }
}

/// Bytes handed to the store for upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    /// File name.
    pub name: String,
    /// Declared MIME type.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

impl FileUpload {
    /// Create an upload from a name and content.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: None,
            data: data.into(),
        }
    }

    /// Set the declared MIME type.
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Size of the content in bytes.
    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// Content produced by a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    /// Name to save the content under.
    pub file_name: String,
    /// MIME type of `data`.
    pub mime_type: String,
    /// The bytes to save.
    pub data: Bytes,
    /// `true` when `data` describes the file instead of holding its bytes.
    pub is_placeholder: bool,
}
