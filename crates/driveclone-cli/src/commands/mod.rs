//! CLI command definitions and dispatch.

pub mod account;
pub mod file;
pub mod folder;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use driveclone_core::config::AppConfig;
use driveclone_core::error::{AppError, ErrorKind};
use driveclone_core::result::AppResult;
use driveclone_core::traits::{AutoConfirm, ConfirmationPrompt};
use driveclone_service::{EntityStore, IdentityStore, StoreBackends};

use crate::confirm::DialoguerPrompt;
use crate::output::OutputFormat;

/// DriveClone: a personal file manager backed by local storage
#[derive(Debug, Parser)]
#[command(name = "driveclone", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Log in with an email address
    Login(account::LoginArgs),
    /// Create an account and log in
    Register(account::RegisterArgs),
    /// Log out; files and folders are kept
    Logout,
    /// Show the logged-in identity
    Whoami,
    /// Request a password reset email
    ForgotPassword(account::ForgotPasswordArgs),
    /// Reset a password with a reset token
    ResetPassword(account::ResetPasswordArgs),
    /// Activate an account with an activation token
    Activate(account::ActivateArgs),
    /// List folders and files
    Ls(file::LsArgs),
    /// Upload a local file
    Upload(file::UploadArgs),
    /// Create a folder
    Mkdir(folder::MkdirArgs),
    /// Delete a file
    Rm(file::RmArgs),
    /// Delete a folder and the files directly inside it
    Rmdir(folder::RmdirArgs),
    /// Download a file
    Download(file::DownloadArgs),
    /// Delete all uploaded files and folders
    Clear,
    /// Show storage usage
    Usage,
}

/// State shared by every command.
#[derive(Debug)]
pub struct CommandContext {
    /// Loaded configuration.
    pub config: AppConfig,
    /// Output format.
    pub format: OutputFormat,
    /// Skip confirmation prompts.
    pub assume_yes: bool,
}

impl CommandContext {
    fn prompt(&self) -> Arc<dyn ConfirmationPrompt> {
        if self.assume_yes {
            Arc::new(AutoConfirm)
        } else {
            Arc::new(DialoguerPrompt)
        }
    }

    /// Build the storage backends and restore the previous session.
    pub async fn open_identities(&self) -> AppResult<(StoreBackends, IdentityStore)> {
        let backends = StoreBackends::from_config(&self.config.storage, self.prompt()).await?;
        let mut identities = IdentityStore::new(backends.kv.clone(), self.config.auth.clone());
        identities.restore().await?;
        Ok((backends, identities))
    }

    /// Open the entity store of the logged-in identity.
    pub async fn open_store(&self) -> AppResult<EntityStore> {
        let (backends, identities) = self.open_identities().await?;
        let context = identities.context().map_err(|_| {
            AppError::unauthenticated("Not logged in. Run `driveclone login <email>` first")
        })?;
        EntityStore::open(context, backends, &self.config.storage).await
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: AppConfig) -> Result<(), AppError> {
        let ctx = CommandContext {
            config,
            format: self.format,
            assume_yes: self.yes,
        };

        let result = match &self.command {
            Commands::Login(args) => account::login(args, &ctx).await,
            Commands::Register(args) => account::register(args, &ctx).await,
            Commands::Logout => account::logout(&ctx).await,
            Commands::Whoami => account::whoami(&ctx).await,
            Commands::ForgotPassword(args) => account::forgot_password(args, &ctx).await,
            Commands::ResetPassword(args) => account::reset_password(args, &ctx).await,
            Commands::Activate(args) => account::activate(args, &ctx).await,
            Commands::Ls(args) => file::list(args, &ctx).await,
            Commands::Upload(args) => file::upload(args, &ctx).await,
            Commands::Mkdir(args) => folder::create(args, &ctx).await,
            Commands::Rm(args) => file::remove(args, &ctx).await,
            Commands::Rmdir(args) => folder::remove(args, &ctx).await,
            Commands::Download(args) => file::download(args, &ctx).await,
            Commands::Clear => file::clear(&ctx).await,
            Commands::Usage => file::usage(&ctx).await,
        };

        match result {
            Err(e) if e.kind == ErrorKind::Cancelled => {
                println!("Cancelled.");
                Ok(())
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["driveclone", "rm", "file_1", "--yes", "--format", "json"])
            .unwrap();
        assert!(cli.yes);
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Commands::Rm(_)));
    }

    #[test]
    fn test_upload_takes_optional_folder() {
        let cli =
            Cli::try_parse_from(["driveclone", "upload", "notes.txt", "--folder", "folder_x"])
                .unwrap();
        let Commands::Upload(args) = cli.command else {
            panic!("expected upload");
        };
        assert_eq!(args.folder.as_deref(), Some("folder_x"));
    }
}
