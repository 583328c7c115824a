//! Error handling for the provider core.
//!
//! Error messages are informative for operators but never echo secrets.

use thiserror::Error;

/// Result type alias using the core error type.
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors raised while assembling the provider core.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// An environment variable held a value that could not be parsed.
    #[error("invalid value for {name}: {value}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Raw value found in the environment.
        value: String,
    },
}

impl CoreError {
    /// Returns whether this error was caused by operator configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidEnv { .. })
    }
}
