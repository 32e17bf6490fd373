//! The entity store: one identity's files and folders.
//!
//! The in-memory collections are authoritative for the session; the
//! key-value store is a durable mirror kept current by the
//! [`DebouncedWriter`]. Collections are ordered newest first.

mod files;
mod folders;

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use driveclone_core::config::StorageConfig;
use driveclone_core::error::{AppError, ErrorKind};
use driveclone_core::result::AppResult;
use driveclone_core::traits::{BlobStore, ConfirmationPrompt, ContentRef, KeyValueStore};
use driveclone_core::types::{FileId, FolderId};
use driveclone_entity::file::FileEntity;
use driveclone_entity::folder::FolderEntity;
use driveclone_entity::identity::StorageUsage;
use driveclone_storage::{BlobManager, KvManager, keys};

use crate::context::SessionContext;
use crate::persistence::{DebouncedWriter, Snapshot};
use crate::seed;

pub use folders::FolderRemoval;

/// Backends injected into the entity store.
#[derive(Debug, Clone)]
pub struct StoreBackends {
    /// Durable mirror of the collections.
    pub kv: Arc<dyn KeyValueStore>,
    /// Holder of uploaded bytes.
    pub blobs: Arc<dyn BlobStore>,
    /// Approves destructive operations.
    pub confirm: Arc<dyn ConfirmationPrompt>,
}

impl StoreBackends {
    /// Build the configured key-value and blob providers.
    pub async fn from_config(
        config: &StorageConfig,
        confirm: Arc<dyn ConfirmationPrompt>,
    ) -> AppResult<Self> {
        let kv = KvManager::new(config).await?;
        let blobs = BlobManager::new(config).await?;
        Ok(Self {
            kv: kv.provider(),
            blobs: blobs.provider(),
            confirm,
        })
    }
}

/// Files and folders of the identity in a [`SessionContext`].
#[derive(Debug)]
pub struct EntityStore {
    /// The identity every operation is scoped to.
    context: SessionContext,
    /// Injected backends.
    backends: StoreBackends,
    /// Largest accepted upload in bytes.
    max_upload_size: u64,
    /// Files, newest first.
    files: Vec<FileEntity>,
    /// Folders, newest first.
    folders: Vec<FolderEntity>,
    /// Background persistence task.
    writer: DebouncedWriter,
}

impl EntityStore {
    /// Load the collections of the identity in `context`.
    ///
    /// Corrupt stored JSON is logged and treated as empty. When neither
    /// collection holds any entity and seeding is enabled, sample entities
    /// are created and written immediately.
    pub async fn open(
        context: SessionContext,
        backends: StoreBackends,
        config: &StorageConfig,
    ) -> AppResult<Self> {
        let user_id = context.user_id().clone();
        let files: Loaded<FileEntity> =
            load_collection(backends.kv.as_ref(), &keys::user_files(&user_id)).await?;
        let folders: Loaded<FolderEntity> =
            load_collection(backends.kv.as_ref(), &keys::user_folders(&user_id)).await?;

        let should_seed = config.seed_samples
            && !files.corrupt
            && !folders.corrupt
            && files.items.is_empty()
            && folders.items.is_empty();

        let writer = DebouncedWriter::spawn(
            Arc::clone(&backends.kv),
            Duration::from_millis(config.persist_debounce_ms),
        );

        let mut store = Self {
            context,
            backends,
            max_upload_size: config.max_upload_size_bytes,
            files: files.items,
            folders: folders.items,
            writer,
        };

        if should_seed {
            let now = Utc::now();
            store.files = seed::sample_files(&user_id, now);
            store.folders = seed::sample_folders(&user_id, now);
            store.persist_now().await?;
            info!(user_id = %user_id, "Seeded sample entities");
        }

        info!(
            user_id = %user_id,
            files = store.files.len(),
            folders = store.folders.len(),
            "Opened entity store"
        );
        Ok(store)
    }

    /// The session this store is scoped to.
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Files directly in `folder` (`None` = root), newest first.
    pub fn list_files(&self, folder: Option<&FolderId>) -> Vec<&FileEntity> {
        self.files.iter().filter(|f| f.is_in(folder)).collect()
    }

    /// Folders directly in `parent` (`None` = root), newest first.
    pub fn list_folders(&self, parent: Option<&FolderId>) -> Vec<&FolderEntity> {
        self.folders.iter().filter(|f| f.is_in(parent)).collect()
    }

    /// Every file of the identity.
    pub fn all_files(&self) -> &[FileEntity] {
        &self.files
    }

    /// Every folder of the identity.
    pub fn all_folders(&self) -> &[FolderEntity] {
        &self.folders
    }

    /// Look up a file by id.
    pub fn get_file(&self, id: &FileId) -> Option<&FileEntity> {
        self.files.iter().find(|f| &f.id == id)
    }

    /// Look up a folder by id.
    pub fn get_folder(&self, id: &FolderId) -> Option<&FolderEntity> {
        self.folders.iter().find(|f| &f.id == id)
    }

    /// Bytes used by uploaded (non-sample) files against the identity's quota.
    pub fn storage_usage(&self) -> StorageUsage {
        StorageUsage {
            used_bytes: self
                .files
                .iter()
                .filter(|f| !f.is_sample)
                .map(|f| f.size)
                .sum(),
            limit_bytes: self.context.storage_limit(),
        }
    }

    /// Remove every non-sample file and folder, after confirmation.
    ///
    /// The result is written immediately rather than debounced.
    pub async fn clear_user_data(&mut self) -> AppResult<()> {
        self.confirm("Delete ALL your files and folders? This cannot be undone.")
            .await?;

        let (kept, removed): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.files).into_iter().partition(|f| f.is_sample);
        self.files = kept;
        self.folders.retain(|f| f.is_sample);

        let removed_count = removed.len();
        self.release_contents(removed.into_iter().map(|f| f.content).collect())
            .await;
        self.persist_now().await?;

        info!(
            user_id = %self.context.user_id(),
            removed_files = removed_count,
            "Cleared user data"
        );
        Ok(())
    }

    /// Write any pending changes now.
    pub async fn flush(&self) -> AppResult<()> {
        self.writer.flush().await
    }

    /// Flush pending changes and stop the background writer.
    pub async fn close(self) -> AppResult<()> {
        self.writer.close().await
    }

    /// Ask for confirmation, mapping a refusal to `Cancelled`.
    async fn confirm(&self, message: &str) -> AppResult<()> {
        if self.backends.confirm.confirm(message).await? {
            Ok(())
        } else {
            debug!(message, "Confirmation declined");
            Err(AppError::cancelled("Operation cancelled"))
        }
    }

    /// Queue the current collections for a debounced write.
    fn schedule_persist(&self) -> AppResult<()> {
        self.writer.schedule(self.snapshot())
    }

    /// Write the current collections immediately.
    async fn persist_now(&self) -> AppResult<()> {
        self.writer.schedule(self.snapshot())?;
        self.writer.flush().await
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.context.user_id(), &self.files, &self.folders)
    }

    fn ensure_owned_folder(&self, id: &FolderId) -> AppResult<&FolderEntity> {
        let folder = self
            .get_folder(id)
            .ok_or_else(|| AppError::not_found("Folder not found"))?;
        if &folder.owner_id != self.context.user_id() {
            return Err(AppError::not_owned("Folder belongs to another user"));
        }
        Ok(folder)
    }

    /// Release content no longer referenced by any remaining file.
    ///
    /// Failures are logged; the records are already gone.
    async fn release_contents(&self, contents: Vec<ContentRef>) {
        for content in contents {
            if matches!(content, ContentRef::Placeholder | ContentRef::Detached) {
                continue;
            }
            if self.files.iter().any(|f| f.content == content) {
                debug!(content = %content, "Content still referenced, keeping");
                continue;
            }
            if matches!(content, ContentRef::Stored(_)) {
                match self.referenced_by_other_identity(&content).await {
                    Ok(false) => {}
                    Ok(true) => {
                        debug!(content = %content, "Content shared with another identity, keeping");
                        continue;
                    }
                    Err(e) => {
                        warn!(content = %content, error = %e, "Could not check shared content, keeping");
                        continue;
                    }
                }
            }
            if let Err(e) = self.backends.blobs.release(&content).await {
                warn!(content = %content, error = %e, "Failed to release content");
            }
        }
    }

    async fn referenced_by_other_identity(&self, content: &ContentRef) -> AppResult<bool> {
        let own_key = keys::user_files(self.context.user_id());
        for key in self.backends.kv.keys(&keys::user_files_prefix()).await? {
            if key == own_key {
                continue;
            }
            let files = match self.backends.kv.get_json::<Vec<FileEntity>>(&key).await {
                Ok(files) => files.unwrap_or_default(),
                Err(e) if e.kind == ErrorKind::Serialization => continue,
                Err(e) => return Err(e),
            };
            if files.iter().any(|f| &f.content == content) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

struct Loaded<T> {
    items: Vec<T>,
    corrupt: bool,
}

async fn load_collection<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> AppResult<Loaded<T>> {
    match kv.get_json::<Vec<T>>(key).await {
        Ok(items) => Ok(Loaded {
            items: items.unwrap_or_default(),
            corrupt: false,
        }),
        Err(e) if e.kind == ErrorKind::Serialization => {
            warn!(key, error = %e, "Stored collection is corrupt, treating as empty");
            Ok(Loaded {
                items: Vec::new(),
                corrupt: true,
            })
        }
        Err(e) => Err(e),
    }
}
