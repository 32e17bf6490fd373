//! Terminal confirmation prompt.

use async_trait::async_trait;

use driveclone_core::error::{AppError, ErrorKind};
use driveclone_core::result::AppResult;
use driveclone_core::traits::ConfirmationPrompt;

/// Asks on the terminal with a yes/no prompt defaulting to no.
#[derive(Debug, Clone, Copy, Default)]
pub struct DialoguerPrompt;

#[async_trait]
impl ConfirmationPrompt for DialoguerPrompt {
    async fn confirm(&self, message: &str) -> AppResult<bool> {
        let message = message.to_string();
        tokio::task::spawn_blocking(move || {
            dialoguer::Confirm::new()
                .with_prompt(message)
                .default(false)
                .interact()
                .map_err(|e| AppError::with_source(ErrorKind::Internal, "Input error", e))
        })
        .await
        .map_err(|e| AppError::internal(format!("Prompt task failed: {e}")))?
    }
}
