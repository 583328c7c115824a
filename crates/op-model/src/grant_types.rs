//! OAuth 2.0 grant type identifiers as registered on clients.
//!
//! Grant types are compared as exact, case-sensitive strings.

/// Authorization code grant (RFC 6749 Section 4.1).
pub const AUTHORIZATION_CODE: &str = "authorization_code";

/// Client credentials grant (RFC 6749 Section 4.4).
pub const CLIENT_CREDENTIALS: &str = "client_credentials";

/// Refresh token grant (RFC 6749 Section 6).
pub const REFRESH_TOKEN: &str = "refresh_token";

/// Device authorization grant (RFC 8628).
pub const DEVICE_CODE: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Client-Initiated Backchannel Authentication grant.
pub const CIBA: &str = "urn:openid:params:grant-type:ciba";
