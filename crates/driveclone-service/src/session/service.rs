//! The identity store.
//!
//! Credentials are never checked: any non-empty email logs in, and the
//! identity id is derived from the email so the same address always maps to
//! the same file and folder collections.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use driveclone_core::config::AuthConfig;
use driveclone_core::error::AppError;
use driveclone_core::result::AppResult;
use driveclone_core::traits::KeyValueStore;
use driveclone_entity::identity::{Identity, RegisterProfile};
use driveclone_storage::keys;

use crate::context::SessionContext;

/// Holds the single logged-in identity and mirrors it into the key-value store.
#[derive(Debug)]
pub struct IdentityStore {
    /// Durable backend for the identity record and session marker.
    kv: Arc<dyn KeyValueStore>,
    /// Latency and quota settings.
    config: AuthConfig,
    /// The published identity.
    current: Option<Identity>,
}

impl IdentityStore {
    /// Creates a logged-out identity store. Call [`restore`](Self::restore)
    /// to pick up a previous session.
    pub fn new(kv: Arc<dyn KeyValueStore>, config: AuthConfig) -> Self {
        Self {
            kv,
            config,
            current: None,
        }
    }

    /// Restore the session persisted by a previous run.
    ///
    /// Malformed identity data clears both records. A session marker with no
    /// identity record is removed.
    pub async fn restore(&mut self) -> AppResult<Option<Identity>> {
        let stored = self.kv.get(&keys::current_user()).await?;
        let token = self.kv.get(&keys::session_token()).await?;

        self.current = match (stored, token) {
            (Some(raw), Some(_)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => {
                    info!(user_id = %identity.id, "Restored session");
                    Some(identity)
                }
                Err(e) => {
                    warn!(error = %e, "Stored identity is malformed, clearing session");
                    self.clear_records().await?;
                    None
                }
            },
            (None, Some(_)) => {
                warn!("Removing orphaned session marker");
                self.kv.delete(&keys::session_token()).await?;
                None
            }
            (Some(_), None) => {
                debug!("Identity record without session marker, staying logged out");
                None
            }
            (None, None) => None,
        };

        Ok(self.current.clone())
    }

    /// Log in with an email. The password is accepted as-is.
    pub async fn login(&mut self, email: &str, _password: &str) -> AppResult<Identity> {
        let email = require_email(email)?;
        let identity = Identity::for_login(email, self.config.storage_limit_bytes);
        self.publish(identity).await
    }

    /// Register a new identity from a profile.
    pub async fn register(&mut self, profile: RegisterProfile) -> AppResult<Identity> {
        let email = require_email(&profile.email)?;
        let profile = RegisterProfile {
            email: email.to_string(),
            ..profile
        };
        let identity = Identity::for_profile(&profile, self.config.storage_limit_bytes);
        self.publish(identity).await
    }

    /// Log out. Files and folders stay under their identity-scoped keys.
    pub async fn logout(&mut self) -> AppResult<()> {
        self.clear_records().await?;
        if let Some(identity) = self.current.take() {
            info!(user_id = %identity.id, "Logged out");
        }
        Ok(())
    }

    /// Request a password reset email. Always succeeds after the simulated delay.
    pub async fn forgot_password(&self, email: &str) -> AppResult<()> {
        self.simulate_latency().await;
        info!(email, "Password reset requested");
        Ok(())
    }

    /// Reset a password with a token. Nothing is validated or consumed.
    pub async fn reset_password(&self, token: &str, _password: &str) -> AppResult<()> {
        self.simulate_latency().await;
        info!(token, "Password reset");
        Ok(())
    }

    /// Activate an account with a token. Nothing is validated or consumed.
    pub async fn activate_account(&self, token: &str) -> AppResult<()> {
        self.simulate_latency().await;
        info!(token, "Account activated");
        Ok(())
    }

    /// The published identity, if any.
    pub fn current(&self) -> Option<&Identity> {
        self.current.as_ref()
    }

    /// Whether an identity is published.
    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    /// Issue a session context for the published identity.
    pub fn context(&self) -> AppResult<SessionContext> {
        self.current
            .clone()
            .map(SessionContext::new)
            .ok_or_else(|| AppError::unauthenticated("Not logged in"))
    }

    async fn publish(&mut self, identity: Identity) -> AppResult<Identity> {
        self.kv
            .set_json(&keys::current_user(), &identity)
            .await?;
        self.kv
            .set(
                &keys::session_token(),
                &keys::session_token_value(&identity.id),
            )
            .await?;

        info!(user_id = %identity.id, email = %identity.email, "Logged in");
        self.current = Some(identity.clone());
        Ok(identity)
    }

    async fn clear_records(&self) -> AppResult<()> {
        self.kv.delete(&keys::current_user()).await?;
        self.kv.delete(&keys::session_token()).await
    }

    async fn simulate_latency(&self) {
        if self.config.simulated_latency_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.config.simulated_latency_ms)).await;
        }
    }
}

fn require_email(email: &str) -> AppResult<&str> {
    let email = email.trim();
    if email.is_empty() {
        return Err(AppError::validation("Email cannot be empty"));
    }
    Ok(email)
}
