//! Session context carrying the active identity into the entity store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use driveclone_core::types::UserId;
use driveclone_entity::identity::Identity;

/// Context for the logged-in identity.
///
/// Issued by [`IdentityStore::context`](crate::IdentityStore::context) and
/// handed to every store that scopes data to an identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionContext {
    /// The active identity.
    pub identity: Identity,
    /// When the context was issued.
    pub issued_at: DateTime<Utc>,
}

impl SessionContext {
    /// Creates a new session context.
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            issued_at: Utc::now(),
        }
    }

    /// The active identity's id.
    pub fn user_id(&self) -> &UserId {
        &self.identity.id
    }

    /// Storage quota of the active identity, in bytes.
    pub fn storage_limit(&self) -> u64 {
        self.identity.storage_limit
    }
}
