//! OIDC protocol error types.
//!
//! Implements OAuth 2.0, `OpenID` Connect and CIBA error responses as defined in:
//! - RFC 6749 (OAuth 2.0)
//! - RFC 8707 (Resource Indicators)
//! - `OpenID` Connect Client-Initiated Backchannel Authentication Core 1.0

use op_cache::CacheError;
use op_storage::StorageError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// OIDC protocol errors.
///
/// Each variant is one error code; the payload is the human-readable
/// description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OidcError {
    /// Invalid request parameters.
    #[error("invalid_request: {0}")]
    InvalidRequest(String),

    /// Client authentication failed.
    #[error("invalid_client: {0}")]
    InvalidClient(String),

    /// Invalid or expired authorization grant.
    #[error("invalid_grant: {0}")]
    InvalidGrant(String),

    /// Client is not authorized for this grant type.
    #[error("unauthorized_client: {0}")]
    UnauthorizedClient(String),

    /// Unsupported grant type.
    #[error("unsupported_grant_type: {0}")]
    UnsupportedGrantType(String),

    /// Invalid scope.
    #[error("invalid_scope: {0}")]
    InvalidScope(String),

    /// Invalid resource indicator (RFC 8707).
    #[error("invalid_target: {0}")]
    InvalidTarget(String),

    /// Access denied by resource owner.
    #[error("access_denied: {0}")]
    AccessDenied(String),

    /// Required `user_code` missing (CIBA).
    #[error("missing_user_code: {0}")]
    MissingUserCode(String),

    /// `user_code` did not match (CIBA).
    #[error("invalid_user_code: {0}")]
    InvalidUserCode(String),

    /// `login_hint_token` has expired (CIBA).
    #[error("expired_login_hint_token: {0}")]
    ExpiredLoginHintToken(String),

    /// End-user could not be identified from the hint (CIBA).
    #[error("unknown_user_id: {0}")]
    UnknownUserId(String),

    /// Server error.
    #[error("server_error: {0}")]
    ServerError(String),
}

impl OidcError {
    /// Returns the OAuth 2.0 error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest(_) => "invalid_request",
            Self::InvalidClient(_) => "invalid_client",
            Self::InvalidGrant(_) => "invalid_grant",
            Self::UnauthorizedClient(_) => "unauthorized_client",
            Self::UnsupportedGrantType(_) => "unsupported_grant_type",
            Self::InvalidScope(_) => "invalid_scope",
            Self::InvalidTarget(_) => "invalid_target",
            Self::AccessDenied(_) => "access_denied",
            Self::MissingUserCode(_) => "missing_user_code",
            Self::InvalidUserCode(_) => "invalid_user_code",
            Self::ExpiredLoginHintToken(_) => "expired_login_hint_token",
            Self::UnknownUserId(_) => "unknown_user_id",
            Self::ServerError(_) => "server_error",
        }
    }

    /// Returns the human-readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            Self::InvalidRequest(d)
            | Self::InvalidClient(d)
            | Self::InvalidGrant(d)
            | Self::UnauthorizedClient(d)
            | Self::UnsupportedGrantType(d)
            | Self::InvalidScope(d)
            | Self::InvalidTarget(d)
            | Self::AccessDenied(d)
            | Self::MissingUserCode(d)
            | Self::InvalidUserCode(d)
            | Self::ExpiredLoginHintToken(d)
            | Self::UnknownUserId(d)
            | Self::ServerError(d) => d,
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidClient(_) => 401,
            Self::AccessDenied(_) => 403,
            Self::ServerError(_) => 500,
            Self::InvalidRequest(_)
            | Self::InvalidGrant(_)
            | Self::UnauthorizedClient(_)
            | Self::UnsupportedGrantType(_)
            | Self::InvalidScope(_)
            | Self::InvalidTarget(_)
            | Self::MissingUserCode(_)
            | Self::InvalidUserCode(_)
            | Self::ExpiredLoginHintToken(_)
            | Self::UnknownUserId(_) => 400,
        }
    }

    /// Creates an error response for OAuth 2.0/OIDC.
    #[must_use]
    pub fn to_error_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.error_code().to_string(),
            error_description: Some(self.description().to_string()),
            error_uri: None,
        }
    }
}

impl From<StorageError> for OidcError {
    fn from(err: StorageError) -> Self {
        Self::ServerError(format!("storage lookup failed: {err}"))
    }
}

impl From<CacheError> for OidcError {
    fn from(err: CacheError) -> Self {
        Self::ServerError(format!("token registry failed: {err}"))
    }
}

/// OAuth 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code.
    pub error: String,

    /// Human-readable error description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_description: Option<String>,

    /// URI with more information about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_uri: Option<String>,
}

/// Result type for OIDC operations.
pub type OidcResult<T> = Result<T, OidcError>;
