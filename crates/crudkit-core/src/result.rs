//! Convenience result type alias for CrudKit.

use crate::error::AppError;

/// A specialized `Result` type for CrudKit operations.
pub type AppResult<T> = Result<T, AppError>;
