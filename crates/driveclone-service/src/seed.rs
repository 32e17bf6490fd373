//! Sample entities seeded for identities with no stored data.

use chrono::{DateTime, Duration, Utc};

use driveclone_core::traits::ContentRef;
use driveclone_core::types::{FileId, FolderId, UserId};
use driveclone_entity::file::FileEntity;
use driveclone_entity::folder::FolderEntity;

const MIB: u64 = 1024 * 1024;

/// Sample files, newest first.
pub fn sample_files(owner: &UserId, now: DateTime<Utc>) -> Vec<FileEntity> {
    vec![
        sample_file(owner, 1, "Welcome to DriveClone.pdf", MIB * 12 / 10, "application/pdf", now),
        sample_file(
            owner,
            2,
            "Getting Started.jpg",
            MIB * 5 / 2,
            "image/jpeg",
            now - Duration::hours(2),
        ),
    ]
}

/// Sample folders at root, newest first.
pub fn sample_folders(owner: &UserId, now: DateTime<Utc>) -> Vec<FolderEntity> {
    vec![
        sample_folder(owner, 1, "My Documents", now),
        sample_folder(owner, 2, "Personal", now - Duration::days(1)),
    ]
}

fn sample_file(
    owner: &UserId,
    n: usize,
    name: &str,
    size: u64,
    mime_type: &str,
    created_at: DateTime<Utc>,
) -> FileEntity {
    FileEntity {
        id: FileId::sample(owner, n),
        name: name.to_string(),
        size,
        mime_type: mime_type.to_string(),
        created_at,
        content: ContentRef::Placeholder,
        parent_folder: None,
        owner_id: owner.clone(),
        is_sample: true,
    }
}

fn sample_folder(owner: &UserId, n: usize, name: &str, created_at: DateTime<Utc>) -> FolderEntity {
    FolderEntity {
        id: FolderId::sample(owner, n),
        name: name.to_string(),
        created_at,
        path: FolderEntity::child_path(None, name),
        parent_folder: None,
        owner_id: owner.clone(),
        is_sample: true,
    }
}
