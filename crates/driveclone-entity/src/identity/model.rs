//! Identity entity model.

use serde::{Deserialize, Serialize};

use driveclone_core::types::UserId;

/// The logged-in user context scoping all entity operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Identifier derived from the email.
    pub id: UserId,
    /// Email address used to log in.
    pub email: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Bytes used at the time the record was written.
    #[serde(default)]
    pub storage_used: u64,
    /// Quota in bytes.
    pub storage_limit: u64,
}

impl Identity {
    /// Build the identity for a plain email login.
    ///
    /// The first name is the local part of the email; the last name is fixed.
    pub fn for_login(email: &str, storage_limit: u64) -> Self {
        let first_name = email.split('@').next().unwrap_or(email).to_string();
        Self {
            id: UserId::from_email(email),
            email: email.to_string(),
            first_name,
            last_name: "User".to_string(),
            storage_used: 0,
            storage_limit,
        }
    }

    /// Build the identity for a registration.
    pub fn for_profile(profile: &RegisterProfile, storage_limit: u64) -> Self {
        Self {
            id: UserId::from_email(&profile.email),
            email: profile.email.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            storage_used: 0,
            storage_limit,
        }
    }

    /// `First Last`.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

/// Data submitted on registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterProfile {
    /// Email address.
    pub email: String,
    /// Chosen password (never validated or stored).
    #[serde(skip_serializing, default)]
    pub password: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
}

/// Bytes used versus quota for one identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageUsage {
    /// Sum of uploaded file sizes.
    pub used_bytes: u64,
    /// Quota in bytes.
    pub limit_bytes: u64,
}

impl StorageUsage {
    /// Fraction of the quota in use, clamped to `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.limit_bytes == 0 {
            return 1.0;
        }
        (self.used_bytes as f64 / self.limit_bytes as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_identity_fields() {
        let identity = Identity::for_login("jane@example.com", 1024);
        assert_eq!(identity.first_name, "jane");
        assert_eq!(identity.last_name, "User");
        assert_eq!(identity.id, UserId::from_email("jane@example.com"));
        assert_eq!(identity.storage_used, 0);
    }

    #[test]
    fn test_storage_layout_field_names() {
        let value = serde_json::to_value(Identity::for_login("a@x.com", 10)).unwrap();
        for key in ["id", "email", "firstName", "lastName", "storageUsed", "storageLimit"] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_profile_password_not_serialized() {
        let profile = RegisterProfile {
            email: "a@x.com".into(),
            password: "hunter2".into(),
            first_name: "A".into(),
            last_name: "X".into(),
        };
        let json = serde_json::to_string(&profile).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn test_usage_fraction() {
        let usage = StorageUsage {
            used_bytes: 5,
            limit_bytes: 10,
        };
        assert!((usage.fraction() - 0.5).abs() < f64::EPSILON);
    }
}
