//! File operations: upload, delete, download.

use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};

use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_core::types::{FileId, FolderId};
use driveclone_entity::file::{DEFAULT_MIME_TYPE, Download, FileEntity, FileUpload};

use super::EntityStore;

const MIB: u64 = 1024 * 1024;

impl EntityStore {
    /// Upload a file into `folder` (`None` = root).
    pub async fn upload_file(
        &mut self,
        upload: FileUpload,
        folder: Option<&FolderId>,
    ) -> AppResult<FileEntity> {
        if upload.size() > self.max_upload_size {
            return Err(AppError::validation(format!(
                "File too large (max {}MB)",
                self.max_upload_size / MIB
            )));
        }
        if upload.name.trim().is_empty() {
            return Err(AppError::validation("File name cannot be empty"));
        }
        if let Some(folder_id) = folder {
            self.ensure_owned_folder(folder_id)?;
        }

        let size = upload.size();
        let content = self.backends.blobs.put(upload.data).await?;
        let owner_id = self.context.user_id().clone();

        let file = FileEntity {
            id: FileId::generate(&owner_id),
            name: upload.name,
            size,
            mime_type: upload
                .mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
            created_at: Utc::now(),
            content,
            parent_folder: folder.cloned(),
            owner_id,
            is_sample: false,
        };

        self.files.insert(0, file.clone());
        self.schedule_persist()?;

        info!(
            file_id = %file.id,
            name = %file.name,
            size = file.size,
            "File uploaded"
        );
        Ok(file)
    }

    /// Delete a file. Uploaded files require confirmation; samples do not.
    pub async fn delete_file(&mut self, id: &FileId) -> AppResult<FileEntity> {
        let index = self
            .files
            .iter()
            .position(|f| &f.id == id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        let file = &self.files[index];
        if &file.owner_id != self.context.user_id() {
            return Err(AppError::not_owned("Cannot delete other user's files"));
        }

        if !file.is_sample {
            let message = format!("Are you sure you want to delete \"{}\"?", file.name);
            self.confirm(&message).await?;
        }

        let file = self.files.remove(index);
        self.release_contents(vec![file.content.clone()]).await;
        self.schedule_persist()?;

        info!(file_id = %file.id, name = %file.name, "File deleted");
        Ok(file)
    }

    /// Fetch a file's bytes, or a text placeholder when the bytes are not live.
    pub async fn download_file(&self, id: &FileId) -> AppResult<Download> {
        let file = self
            .get_file(id)
            .ok_or_else(|| AppError::not_found("File not found"))?;
        if &file.owner_id != self.context.user_id() {
            return Err(AppError::not_owned("Cannot download other user's files"));
        }

        if let Some(data) = self.backends.blobs.get(&file.content).await? {
            debug!(file_id = %file.id, bytes = data.len(), "Serving stored content");
            return Ok(Download {
                file_name: file.name.clone(),
                mime_type: file.mime_type.clone(),
                data,
                is_placeholder: false,
            });
        }

        debug!(file_id = %file.id, content = %file.content, "Content not live, serving placeholder");
        Ok(placeholder(file))
    }
}

fn placeholder(file: &FileEntity) -> Download {
    let created = file.created_at.to_rfc3339_opts(SecondsFormat::Millis, true);
    let (text, file_name) = if file.is_sample {
        (
            format!(
                "Sample file: {}\nCreated: {}\nSize: {} bytes",
                file.name, created, file.size
            ),
            format!("{}_sample.txt", file.name),
        )
    } else {
        (
            format!(
                "Your file: {}\nUploaded: {}\nSize: {} bytes",
                file.name, created, file.size
            ),
            format!("{}.txt", file.name),
        )
    };

    Download {
        file_name,
        mime_type: "text/plain".to_string(),
        data: Bytes::from(text),
        is_placeholder: true,
    }
}
