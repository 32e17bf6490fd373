//! Newtype wrappers around the string identifiers stored in DriveClone.
//!
//! Identifiers are plain strings on disk (`user_1a2b`, `file_user_1a2b_...`),
//! but distinct types prevent accidentally passing a `FolderId` where a
//! `FileId` is expected.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to define a newtype ID wrapper around `String`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Return the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::convert::Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Identifier of an identity, derived from its email address.
    UserId
);

define_id!(
    /// Unique identifier for a file.
    FileId
);

define_id!(
    /// Unique identifier for a folder.
    FolderId
);

impl UserId {
    /// Derive the stable identifier for an email address.
    ///
    /// Applies the 32-bit rolling hash `h = (h << 5) - h + c` over the UTF-16
    /// code units of `email` and renders `abs(h)` in lowercase hex. The hash is
    /// not cryptographic and collides easily; it only keeps a stable key per
    /// email on one machine.
    pub fn from_email(email: &str) -> Self {
        let hash = email.encode_utf16().fold(0i32, |h, unit| {
            h.wrapping_shl(5).wrapping_sub(h).wrapping_add(i32::from(unit))
        });
        Self(format!("user_{:x}", i64::from(hash).abs()))
    }
}

impl FileId {
    /// Generate an identifier for a freshly uploaded file.
    pub fn generate(owner: &UserId) -> Self {
        Self(format!(
            "file_{owner}_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            random_suffix()
        ))
    }

    /// Identifier of the `n`th seeded sample file.
    pub fn sample(owner: &UserId, n: usize) -> Self {
        Self(format!("file_{owner}_sample_{n}"))
    }
}

impl FolderId {
    /// Generate an identifier for a freshly created folder.
    pub fn generate(owner: &UserId) -> Self {
        Self(format!(
            "folder_{owner}_{}_{}",
            chrono::Utc::now().timestamp_millis(),
            random_suffix()
        ))
    }

    /// Identifier of the `n`th seeded sample folder.
    pub fn sample(owner: &UserId, n: usize) -> Self {
        Self(format!("folder_{owner}_sample_{n}"))
    }
}

/// Nine random lowercase hex characters.
fn random_suffix() -> String {
    let mut simple = Uuid::new_v4().simple().to_string();
    simple.truncate(9);
    simple
}
