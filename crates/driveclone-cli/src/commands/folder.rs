//! Folder commands.

use clap::Args;

use driveclone_core::result::AppResult;
use driveclone_core::types::FolderId;

use super::CommandContext;
use crate::output;

/// Arguments for `mkdir`
#[derive(Debug, Args)]
pub struct MkdirArgs {
    /// Folder name
    pub name: String,
    /// Parent folder ID (omit for root)
    #[arg(short, long)]
    pub parent: Option<String>,
}

/// Arguments for `rmdir`
#[derive(Debug, Args)]
pub struct RmdirArgs {
    /// Folder ID
    pub id: String,
}

/// Execute `mkdir`
pub async fn create(args: &MkdirArgs, ctx: &CommandContext) -> AppResult<()> {
    let parent = args.parent.as_deref().map(FolderId::from);
    let mut store = ctx.open_store().await?;
    let result = store.create_folder(&args.name, parent.as_ref()).await;
    store.close().await?;
    let folder = result?;

    output::print_success(&format!("Folder \"{}\" created successfully", folder.name));
    output::print_item(
        &folder,
        &[("ID", folder.id.to_string()), ("Path", folder.path.clone())],
        ctx.format,
    );
    Ok(())
}

/// Execute `rmdir`
pub async fn remove(args: &RmdirArgs, ctx: &CommandContext) -> AppResult<()> {
    let mut store = ctx.open_store().await?;
    let result = store.delete_folder(&FolderId::from(args.id.as_str())).await;
    store.close().await?;
    let removal = result?;

    output::print_success(&format!(
        "Folder \"{}\" has been deleted",
        removal.folder.name
    ));
    if removal.orphaned_folders > 0 {
        output::print_warning(&format!(
            "{} subfolder(s) were left without a parent",
            removal.orphaned_folders
        ));
    }
    Ok(())
}
