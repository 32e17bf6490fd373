//! Key builders for every record DriveClone persists.
//!
//! Centralising key construction prevents typos and makes it easy
//! to find every key the application uses.

use driveclone_core::types::UserId;

/// Prefix applied to all DriveClone keys.
const PREFIX: &str = "driveclone";

/// Key of the logged-in identity record.
pub fn current_user() -> String {
    format!("{PREFIX}_current_user")
}

/// Key of the session marker.
pub fn session_token() -> String {
    format!("{PREFIX}_token")
}

/// Session marker value for an identity.
pub fn session_token_value(user_id: &UserId) -> String {
    format!("mock_token_{user_id}")
}

/// Key of an identity's file collection.
pub fn user_files(user_id: &UserId) -> String {
    format!("{PREFIX}_files_{user_id}")
}

/// Prefix shared by every identity's file collection key.
pub fn user_files_prefix() -> String {
    format!("{PREFIX}_files_")
}

/// Key of an identity's folder collection.
pub fn user_folders(user_id: &UserId) -> String {
    format!("{PREFIX}_folders_{user_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_keys() {
        assert_eq!(current_user(), "driveclone_current_user");
        assert_eq!(session_token(), "driveclone_token");
    }

    #[test]
    fn test_user_scoped_keys() {
        let id = UserId::from("user_61");
        assert_eq!(user_files(&id), "driveclone_files_user_61");
        assert_eq!(user_folders(&id), "driveclone_folders_user_61");
        assert_eq!(session_token_value(&id), "mock_token_user_61");
        assert!(user_files(&id).starts_with(&user_files_prefix()));
    }
}
