//! Blob store trait and content references for uploaded bytes.

use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// Sentinel written in place of a transient handle when files are persisted.
pub const DETACHED_SENTINEL: &str = "#blob";

/// Reference from a file record to its content.
///
/// Serialized as the file's `url` string:
///
/// | variant       | on disk            |
/// |---------------|--------------------|
/// | `Transient`   | `blob:<handle>`    |
/// | `Stored`      | `cas:<sha256>`     |
/// | `Placeholder` | `#`                |
/// | `Detached`    | `#blob`            |
///
/// Unrecognised strings load as `Placeholder`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(into = "String", from = "String")]
pub enum ContentRef {
    /// In-process handle; the bytes do not survive a restart.
    Transient(String),
    /// Content-addressed object identified by its SHA-256 hex digest.
    Stored(String),
    /// No content (seed data).
    Placeholder,
    /// A transient handle that was lost when the record was persisted.
    Detached,
}

impl ContentRef {
    /// Whether the bytes live only in this process.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }

    /// The form written to durable storage: transient handles become the sentinel.
    pub fn persisted(&self) -> Self {
        match self {
            Self::Transient(_) => Self::Detached,
            other => other.clone(),
        }
    }
}

impl fmt::Display for ContentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transient(handle) => write!(f, "blob:{handle}"),
            Self::Stored(digest) => write!(f, "cas:{digest}"),
            Self::Placeholder => f.write_str("#"),
            Self::Detached => f.write_str(DETACHED_SENTINEL),
        }
    }
}

impl From<ContentRef> for String {
    fn from(value: ContentRef) -> Self {
        value.to_string()
    }
}

impl From<String> for ContentRef {
    fn from(value: String) -> Self {
        if let Some(handle) = value.strip_prefix("blob:") {
            Self::Transient(handle.to_string())
        } else if let Some(digest) = value.strip_prefix("cas:") {
            Self::Stored(digest.to_string())
        } else if value == DETACHED_SENTINEL {
            Self::Detached
        } else {
            Self::Placeholder
        }
    }
}

/// Trait for content backends holding uploaded file bytes.
#[async_trait]
pub trait BlobStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "memory").
    fn provider_type(&self) -> &str;

    /// Store bytes and return the reference to record on the file.
    async fn put(&self, data: Bytes) -> AppResult<ContentRef>;

    /// Fetch the bytes behind a reference. `None` if the content is not live
    /// (released, lost with its process, or a reference this provider does not own).
    async fn get(&self, content: &ContentRef) -> AppResult<Option<Bytes>>;

    /// Release the content. Releasing unknown content is not an error.
    async fn release(&self, content: &ContentRef) -> AppResult<()>;

    /// Check that the backend is usable.
    async fn health_check(&self) -> AppResult<bool>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_ref_string_forms() {
        assert_eq!(ContentRef::from("blob:abc".to_string()), ContentRef::Transient("abc".into()));
        assert_eq!(ContentRef::from("cas:ff00".to_string()), ContentRef::Stored("ff00".into()));
        assert_eq!(ContentRef::from("#blob".to_string()), ContentRef::Detached);
        assert_eq!(ContentRef::from("#".to_string()), ContentRef::Placeholder);
        assert_eq!(ContentRef::from("https://x".to_string()), ContentRef::Placeholder);
    }

    #[test]
    fn test_persisted_detaches_transient_only() {
        assert_eq!(ContentRef::Transient("h".into()).persisted(), ContentRef::Detached);
        assert_eq!(
            ContentRef::Stored("d".into()).persisted(),
            ContentRef::Stored("d".into())
        );
        assert_eq!(ContentRef::Placeholder.persisted(), ContentRef::Placeholder);
    }

    #[test]
    fn test_serializes_as_url_string() {
        let json = serde_json::to_string(&ContentRef::Detached).unwrap();
        assert_eq!(json, "\"#blob\"");
    }
}
