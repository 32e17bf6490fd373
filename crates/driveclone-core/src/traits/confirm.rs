//! Confirmation prompts for destructive operations.

use async_trait::async_trait;

use crate::result::AppResult;

/// Asks the user to approve a destructive operation.
///
/// The entity store calls this before deleting user content. Front ends
/// decide how to ask (terminal prompt, dialog, flag).
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync + std::fmt::Debug {
    /// Return `true` to proceed with the operation described by `message`.
    async fn confirm(&self, message: &str) -> AppResult<bool>;
}

/// Approves every prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

#[async_trait]
impl ConfirmationPrompt for AutoConfirm {
    async fn confirm(&self, _message: &str) -> AppResult<bool> {
        Ok(true)
    }
}
