//! Account commands: login, registration, logout, and the account stubs.

use clap::Args;

use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_entity::identity::{Identity, RegisterProfile};

use super::CommandContext;
use crate::output;

/// Arguments for `login`
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Email address
    pub email: String,
    /// Password (accepted as-is)
    #[arg(short, long, default_value = "")]
    pub password: String,
}

/// Arguments for `register`
#[derive(Debug, Args)]
pub struct RegisterArgs {
    /// Email address
    pub email: String,
    /// Given name (prompted when omitted)
    #[arg(long)]
    pub first_name: Option<String>,
    /// Family name (prompted when omitted)
    #[arg(long)]
    pub last_name: Option<String>,
    /// Password (accepted as-is)
    #[arg(short, long, default_value = "")]
    pub password: String,
}

/// Arguments for `forgot-password`
#[derive(Debug, Args)]
pub struct ForgotPasswordArgs {
    /// Email address
    pub email: String,
}

/// Arguments for `reset-password`
#[derive(Debug, Args)]
pub struct ResetPasswordArgs {
    /// Reset token from the email
    pub token: String,
    /// New password
    #[arg(short, long)]
    pub password: String,
}

/// Arguments for `activate`
#[derive(Debug, Args)]
pub struct ActivateArgs {
    /// Activation token from the email
    pub token: String,
}

/// Execute `login`
pub async fn login(args: &LoginArgs, ctx: &CommandContext) -> AppResult<()> {
    let (_, mut identities) = ctx.open_identities().await?;
    let identity = identities.login(&args.email, &args.password).await?;
    output::print_success(&format!("Welcome back, {}!", identity.first_name));
    print_identity(&identity, ctx);
    Ok(())
}

/// Execute `register`
pub async fn register(args: &RegisterArgs, ctx: &CommandContext) -> AppResult<()> {
    let first_name = match &args.first_name {
        Some(name) => name.clone(),
        None => prompt_text("First name")?,
    };
    let last_name = match &args.last_name {
        Some(name) => name.clone(),
        None => prompt_text("Last name")?,
    };

    let (_, mut identities) = ctx.open_identities().await?;
    let identity = identities
        .register(RegisterProfile {
            email: args.email.clone(),
            password: args.password.clone(),
            first_name,
            last_name,
        })
        .await?;

    output::print_success(&format!("Account created for {}", identity.display_name()));
    print_identity(&identity, ctx);
    Ok(())
}

/// Execute `logout`
pub async fn logout(ctx: &CommandContext) -> AppResult<()> {
    let (_, mut identities) = ctx.open_identities().await?;
    if !identities.is_authenticated() {
        output::print_warning("Not logged in.");
        return Ok(());
    }
    identities.logout().await?;
    output::print_success("Logged out. Your files stay saved for your next login.");
    Ok(())
}

/// Execute `whoami`
pub async fn whoami(ctx: &CommandContext) -> AppResult<()> {
    let (_, identities) = ctx.open_identities().await?;
    match identities.current() {
        Some(identity) => print_identity(identity, ctx),
        None => output::print_warning("Not logged in."),
    }
    Ok(())
}

/// Execute `forgot-password`
pub async fn forgot_password(args: &ForgotPasswordArgs, ctx: &CommandContext) -> AppResult<()> {
    let (_, identities) = ctx.open_identities().await?;
    identities.forgot_password(&args.email).await?;
    output::print_success(&format!("Password reset instructions sent to {}", args.email));
    Ok(())
}

/// Execute `reset-password`
pub async fn reset_password(args: &ResetPasswordArgs, ctx: &CommandContext) -> AppResult<()> {
    let (_, identities) = ctx.open_identities().await?;
    identities.reset_password(&args.token, &args.password).await?;
    output::print_success("Password has been reset. You can now log in.");
    Ok(())
}

/// Execute `activate`
pub async fn activate(args: &ActivateArgs, ctx: &CommandContext) -> AppResult<()> {
    let (_, identities) = ctx.open_identities().await?;
    identities.activate_account(&args.token).await?;
    output::print_success("Account activated.");
    Ok(())
}

fn print_identity(identity: &Identity, ctx: &CommandContext) {
    output::print_item(
        identity,
        &[
            ("ID", identity.id.to_string()),
            ("Name", identity.display_name()),
            ("Email", identity.email.clone()),
            ("Storage limit", output::format_size(identity.storage_limit)),
        ],
        ctx.format,
    );
}

fn prompt_text(label: &str) -> AppResult<String> {
    dialoguer::Input::<String>::new()
        .with_prompt(label)
        .interact_text()
        .map_err(|e| AppError::internal(format!("Input error: {e}")))
}
