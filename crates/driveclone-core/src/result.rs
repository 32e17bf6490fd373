//! Convenience result type alias for DriveClone.

use crate::error::AppError;

/// A specialized `Result` type for DriveClone operations.
pub type AppResult<T> = Result<T, AppError>;
