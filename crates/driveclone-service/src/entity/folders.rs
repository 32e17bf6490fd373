//! Folder operations: create and delete.

use chrono::Utc;
use tracing::{info, warn};

use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_core::types::FolderId;
use driveclone_entity::file::FileEntity;
use driveclone_entity::folder::FolderEntity;

use super::EntityStore;

/// What a folder deletion removed.
#[derive(Debug, Clone)]
pub struct FolderRemoval {
    /// The deleted folder.
    pub folder: FolderEntity,
    /// Files that sat directly in the folder.
    pub files: Vec<FileEntity>,
    /// Subfolders left behind with a dangling parent.
    pub orphaned_folders: usize,
}

impl EntityStore {
    /// Create a folder named `name` under `parent` (`None` = root).
    pub async fn create_folder(
        &mut self,
        name: &str,
        parent: Option<&FolderId>,
    ) -> AppResult<FolderEntity> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }

        let parent_folder = match parent {
            Some(parent_id) => Some(self.ensure_owned_folder(parent_id)?),
            None => None,
        };

        let exists = self
            .folders
            .iter()
            .any(|f| !f.is_sample && f.is_in(parent) && f.has_name(name));
        if exists {
            return Err(AppError::validation(format!(
                "Folder \"{name}\" already exists here"
            )));
        }

        let owner_id = self.context.user_id().clone();
        let folder = FolderEntity {
            id: FolderId::generate(&owner_id),
            name: name.to_string(),
            created_at: Utc::now(),
            path: FolderEntity::child_path(parent_folder, name),
            parent_folder: parent.cloned(),
            owner_id,
            is_sample: false,
        };

        self.folders.insert(0, folder.clone());
        self.schedule_persist()?;

        info!(folder_id = %folder.id, path = %folder.path, "Folder created");
        Ok(folder)
    }

    /// Delete a folder and the files directly inside it, after confirmation.
    ///
    /// Subfolders are not removed.
    pub async fn delete_folder(&mut self, id: &FolderId) -> AppResult<FolderRemoval> {
        let index = self
            .folders
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        let folder = &self.folders[index];
        if &folder.owner_id != self.context.user_id() {
            return Err(AppError::not_owned("Cannot delete other user's folders"));
        }
        if folder.is_sample {
            return Err(AppError::validation("Cannot delete sample folders"));
        }

        let contained = self.files.iter().filter(|f| f.is_in(Some(id))).count();
        let mut message = format!("Are you sure you want to delete folder \"{}\"?", folder.name);
        if contained > 0 {
            message.push_str(&format!(
                "\nThis folder contains {contained} file(s) that will also be deleted."
            ));
        }
        self.confirm(&message).await?;

        let folder = self.folders.remove(index);
        let (files, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.is_in(Some(id)));
        self.files = kept;

        self.release_contents(files.iter().map(|f| f.content.clone()).collect())
            .await;
        self.schedule_persist()?;

        let orphaned_folders = self.folders.iter().filter(|f| f.is_in(Some(id))).count();
        if orphaned_folders > 0 {
            warn!(
                folder_id = %folder.id,
                orphaned = orphaned_folders,
                "Deleted folder still has subfolders; they are now unreachable"
            );
        }

        info!(folder_id = %folder.id, files = files.len(), "Folder deleted");
        Ok(FolderRemoval {
            folder,
            files,
            orphaned_folders,
        })
    }
}
