//! Storage error types.

use thiserror::Error;

/// Errors that can occur during storage lookups.
///
/// "Not found" is not an error for lookups; they return `Ok(None)`.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Stored data could not be interpreted.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// Backend connection error.
    #[error("Storage connection error: {0}")]
    Connection(String),

    /// Backend did not answer in time.
    #[error("Storage operation timed out")]
    Timeout,

    /// Internal error.
    #[error("Internal storage error: {0}")]
    Internal(String),
}

impl StorageError {
    /// Checks if retrying the operation may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Timeout)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;
