//! Debounced persistence of an identity's collections.
//!
//! Every mutation hands the writer a full [`Snapshot`]. The writer keeps only
//! the latest one and writes it once no new snapshot has arrived for the
//! debounce window (trailing edge). A flush writes the pending snapshot
//! immediately; dropping the writer's sender flushes and stops the task.
//! A snapshot whose write fails stays pending until a later write succeeds,
//! so the next flush retries it and reports the error if it fails again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error};

use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_core::traits::KeyValueStore;
use driveclone_core::types::UserId;
use driveclone_entity::file::FileEntity;
use driveclone_entity::folder::FolderEntity;
use driveclone_storage::keys;

/// Both collections of one identity, in their durable form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Owner of the collections.
    pub owner: UserId,
    /// Files with transient handles replaced by the sentinel.
    pub files: Vec<FileEntity>,
    /// Folders.
    pub folders: Vec<FolderEntity>,
}

impl Snapshot {
    /// Capture the durable form of the given collections.
    pub fn capture(owner: &UserId, files: &[FileEntity], folders: &[FolderEntity]) -> Self {
        Self {
            owner: owner.clone(),
            files: files.iter().map(FileEntity::persisted).collect(),
            folders: folders.to_vec(),
        }
    }

    async fn write(&self, kv: &dyn KeyValueStore) -> AppResult<()> {
        kv.set_json(&keys::user_files(&self.owner), &self.files)
            .await?;
        kv.set_json(&keys::user_folders(&self.owner), &self.folders)
            .await?;
        debug!(
            user_id = %self.owner,
            files = self.files.len(),
            folders = self.folders.len(),
            "Persisted collections"
        );
        Ok(())
    }
}

enum Command {
    Schedule(Snapshot),
    Flush(oneshot::Sender<AppResult<()>>),
}

/// Handle to the background writer task.
#[derive(Debug)]
pub struct DebouncedWriter {
    tx: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<()>,
}

impl DebouncedWriter {
    /// Spawn the writer task on the current tokio runtime.
    pub fn spawn(kv: Arc<dyn KeyValueStore>, window: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(kv, window, rx));
        Self { tx, handle }
    }

    /// Replace the pending snapshot and restart the debounce window.
    pub fn schedule(&self, snapshot: Snapshot) -> AppResult<()> {
        self.tx
            .send(Command::Schedule(snapshot))
            .map_err(|_| AppError::internal("Persistence writer has stopped"))
    }

    /// Write the pending snapshot now, if there is one.
    pub async fn flush(&self) -> AppResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(reply_tx))
            .map_err(|_| AppError::internal("Persistence writer has stopped"))?;
        reply_rx
            .await
            .map_err(|_| AppError::internal("Persistence writer dropped a flush"))?
    }

    /// Flush, then stop the writer task and wait for it to exit.
    pub async fn close(self) -> AppResult<()> {
        let result = self.flush().await;
        let Self { tx, handle } = self;
        drop(tx);
        handle
            .await
            .map_err(|e| AppError::internal(format!("Persistence writer panicked: {e}")))?;
        result
    }
}

async fn run(
    kv: Arc<dyn KeyValueStore>,
    window: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    let mut pending: Option<Snapshot> = None;
    let mut deadline = Instant::now();

    loop {
        let command = if pending.is_some() {
            tokio::select! {
                command = rx.recv() => command,
                () = tokio::time::sleep_until(deadline) => {
                    // A failed write stays pending and is retried after another window.
                    if let Err(e) = write_pending(kv.as_ref(), &mut pending).await {
                        error!(error = %e, "Debounced write failed, will retry");
                        deadline = Instant::now() + window;
                    }
                    continue;
                }
            }
        } else {
            rx.recv().await
        };

        match command {
            Some(Command::Schedule(snapshot)) => {
                pending = Some(snapshot);
                deadline = Instant::now() + window;
            }
            Some(Command::Flush(reply)) => {
                let result = write_pending(kv.as_ref(), &mut pending).await;
                let _ = reply.send(result);
            }
            None => {
                if let Err(e) = write_pending(kv.as_ref(), &mut pending).await {
                    error!(error = %e, "Final write failed, changes were not persisted");
                }
                debug!("Persistence writer stopped");
                break;
            }
        }
    }
}

/// Write the pending snapshot, keeping it pending if the write fails.
async fn write_pending(kv: &dyn KeyValueStore, pending: &mut Option<Snapshot>) -> AppResult<()> {
    let Some(snapshot) = pending.take() else {
        return Ok(());
    };
    match snapshot.write(kv).await {
        Ok(()) => Ok(()),
        Err(e) => {
            *pending = Some(snapshot);
            Err(e)
        }
    }
}
