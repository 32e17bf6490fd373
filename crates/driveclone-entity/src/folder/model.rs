//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use driveclone_core::types::{FolderId, UserId};

/// A folder in one identity's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FolderEntity {
    /// Unique folder identifier.
    #[serde(rename = "_id")]
    pub id: FolderId,
    /// Folder name.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// Full materialized path (e.g., `/Documents/Reports`).
    pub path: String,
    /// Parent folder ID (`None` for root-level folders).
    #[serde(default)]
    pub parent_folder: Option<FolderId>,
    /// The owning identity.
    #[serde(rename = "userId")]
    pub owner_id: UserId,
    /// Seed data rather than a user-created folder.
    #[serde(default)]
    pub is_sample: bool,
}

impl FolderEntity {
    /// Check if this is a root-level folder (no parent).
    pub fn is_root(&self) -> bool {
        self.parent_folder.is_none()
    }

    /// Whether this folder sits directly in `parent` (`None` = root).
    pub fn is_in(&self, parent: Option<&FolderId>) -> bool {
        self.parent_folder.as_ref() == parent
    }

    /// Case-insensitive name comparison used for sibling uniqueness.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Materialized path of a child named `name` under `parent`.
    pub fn child_path(parent: Option<&FolderEntity>, name: &str) -> String {
        match parent {
            Some(parent) => format!("{}/{}", parent.path.trim_end_matches('/'), name),
            None => format!("/{name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(name: &str, path: &str) -> FolderEntity {
        FolderEntity {
            id: FolderId::from("folder_1"),
            name: name.to_string(),
            created_at: Utc::now(),
            path: path.to_string(),
            parent_folder: None,
            owner_id: UserId::from("user_1"),
            is_sample: false,
        }
    }

    #[test]
    fn test_child_path() {
        let docs = folder("Docs", "/Docs");
        assert_eq!(FolderEntity::child_path(Some(&docs), "Tax"), "/Docs/Tax");
        assert_eq!(FolderEntity::child_path(None, "Docs"), "/Docs");
    }

    #[test]
    fn test_has_name_ignores_case_and_padding() {
        let notes = folder("Notes", "/Notes");
        assert!(notes.has_name("notes"));
        assert!(notes.has_name("  NOTES "));
        assert!(!notes.has_name("Notes2"));
    }

    #[test]
    fn test_storage_layout_field_names() {
        let value = serde_json::to_value(folder("Docs", "/Docs")).unwrap();
        for key in ["_id", "name", "createdAt", "path", "parentFolder", "userId", "isSample"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }
}
