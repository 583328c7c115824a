//! Cache error types.

use thiserror::Error;

/// Cache operation errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// Connection to cache backend failed.
    #[error("cache connection error: {0}")]
    Connection(String),
    /// Cache operation timed out.
    #[error("cache operation timed out")]
    Timeout,
    /// Internal cache error.
    #[error("internal cache error: {0}")]
    Internal(String),
}

/// Result type for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;
