//! File commands: listing, upload, delete, download, clear, and usage.

use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use tabled::Tabled;

use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_core::types::{FileId, FolderId};
use driveclone_entity::file::{FileEntity, FileUpload};
use driveclone_entity::folder::FolderEntity;

use super::CommandContext;
use crate::output::{self, OutputFormat};

/// Arguments for `ls`
#[derive(Debug, Args)]
pub struct LsArgs {
    /// Folder ID to list (omit for root)
    #[arg(long)]
    pub folder: Option<String>,
}

/// Arguments for `upload`
#[derive(Debug, Args)]
pub struct UploadArgs {
    /// Path to the file to upload
    pub path: PathBuf,
    /// Target folder ID (omit for root)
    #[arg(long)]
    pub folder: Option<String>,
    /// Override file name
    #[arg(short, long)]
    pub name: Option<String>,
}

/// Arguments for `rm`
#[derive(Debug, Args)]
pub struct RmArgs {
    /// File ID
    pub id: String,
}

/// Arguments for `download`
#[derive(Debug, Args)]
pub struct DownloadArgs {
    /// File ID
    pub id: String,
    /// Destination path (defaults to the file name in the current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

/// Listing row
#[derive(Debug, Serialize, Tabled)]
struct EntryRow {
    /// Folder or file
    #[tabled(rename = "Kind")]
    kind: &'static str,
    /// Entity ID
    #[tabled(rename = "ID")]
    id: String,
    /// Name
    #[tabled(rename = "Name")]
    name: String,
    /// Human-readable size (files only)
    #[tabled(rename = "Size")]
    size: String,
    /// Created at
    #[tabled(rename = "Created")]
    created_at: String,
}

impl EntryRow {
    fn folder(folder: &FolderEntity) -> Self {
        Self {
            kind: "folder",
            id: folder.id.to_string(),
            name: folder.name.clone(),
            size: String::new(),
            created_at: folder.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }

    fn file(file: &FileEntity) -> Self {
        let name = if file.is_sample {
            format!("{} (sample)", file.name)
        } else {
            file.name.clone()
        };
        Self {
            kind: "file",
            id: file.id.to_string(),
            name,
            size: output::format_size(file.size),
            created_at: file.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Listing<'a> {
    folder: Option<&'a FolderEntity>,
    folders: Vec<&'a FolderEntity>,
    files: Vec<&'a FileEntity>,
}

/// Execute `ls`
pub async fn list(args: &LsArgs, ctx: &CommandContext) -> AppResult<()> {
    let store = ctx.open_store().await?;
    let folder_id = args.folder.as_deref().map(FolderId::from);

    let folder = match &folder_id {
        Some(id) => Some(
            store
                .get_folder(id)
                .ok_or_else(|| AppError::not_found("Folder not found"))?,
        ),
        None => None,
    };
    let folders = store.list_folders(folder_id.as_ref());
    let files = store.list_files(folder_id.as_ref());

    match ctx.format {
        OutputFormat::Json => {
            let listing = Listing {
                folder,
                folders,
                files,
            };
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Table => {
            println!("{}", folder.map_or("/", |f| f.path.as_str()));
            let rows: Vec<EntryRow> = folders
                .into_iter()
                .map(EntryRow::folder)
                .chain(files.into_iter().map(EntryRow::file))
                .collect();
            output::print_list(&rows, ctx.format);
        }
    }

    store.close().await
}

/// Execute `upload`
pub async fn upload(args: &UploadArgs, ctx: &CommandContext) -> AppResult<()> {
    let unreadable =
        |e: std::io::Error| AppError::not_found(format!("Cannot read {}: {e}", args.path.display()));
    let max = ctx.config.storage.max_upload_size_bytes;
    let len = tokio::fs::metadata(&args.path).await.map_err(unreadable)?.len();
    if len > max {
        return Err(AppError::validation(format!(
            "File too large (max {}MB)",
            max / (1024 * 1024)
        )));
    }
    let data = tokio::fs::read(&args.path).await.map_err(unreadable)?;

    let name = match &args.name {
        Some(name) => name.clone(),
        None => args
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string(),
    };
    let mut upload = FileUpload::new(name.clone(), data);
    if let Some(mime) = mime_guess::from_path(&name).first() {
        upload = upload.with_mime_type(mime.to_string());
    }

    let folder_id = args.folder.as_deref().map(FolderId::from);
    let mut store = ctx.open_store().await?;
    let result = store.upload_file(upload, folder_id.as_ref()).await;
    store.close().await?;
    let file = result?;

    output::print_success(&format!(
        "\"{}\" uploaded ({})",
        file.name,
        output::format_size(file.size)
    ));
    output::print_item(
        &file,
        &[("ID", file.id.to_string()), ("Type", file.mime_type.clone())],
        ctx.format,
    );
    Ok(())
}

/// Execute `rm`
pub async fn remove(args: &RmArgs, ctx: &CommandContext) -> AppResult<()> {
    let mut store = ctx.open_store().await?;
    let result = store.delete_file(&FileId::from(args.id.as_str())).await;
    store.close().await?;
    let file = result?;

    output::print_success(&format!("\"{}\" has been deleted", file.name));
    Ok(())
}

/// Execute `download`
pub async fn download(args: &DownloadArgs, ctx: &CommandContext) -> AppResult<()> {
    let store = ctx.open_store().await?;
    let result = store.download_file(&FileId::from(args.id.as_str())).await;
    store.close().await?;
    let download = result?;

    let out = args
        .out
        .clone()
        .unwrap_or_else(|| default_download_path(&download.file_name));
    tokio::fs::write(&out, &download.data).await?;

    if download.is_placeholder {
        output::print_warning("Original content is not available; saved a text placeholder.");
    }
    output::print_success(&format!(
        "Saved {} ({})",
        out.display(),
        output::format_size(download.data.len() as u64)
    ));
    Ok(())
}

/// Bare file name of `stored_name`, so a default download lands in the current directory.
fn default_download_path(stored_name: &str) -> PathBuf {
    Path::new(stored_name)
        .file_name()
        .map_or_else(|| PathBuf::from("download"), PathBuf::from)
}

/// Execute `clear`
pub async fn clear(ctx: &CommandContext) -> AppResult<()> {
    let mut store = ctx.open_store().await?;
    let result = store.clear_user_data().await;
    store.close().await?;
    result?;

    output::print_success("All your uploaded files and folders have been cleared");
    Ok(())
}

/// Execute `usage`
pub async fn usage(ctx: &CommandContext) -> AppResult<()> {
    let store = ctx.open_store().await?;
    let usage = store.storage_usage();
    store.close().await?;

    output::print_item(
        &usage,
        &[
            ("Used", output::format_size(usage.used_bytes)),
            ("Limit", output::format_size(usage.limit_bytes)),
            ("Percent", format!("{:.1}%", usage.fraction() * 100.0)),
        ],
        ctx.format,
    );
    Ok(())
}
