//! Backchannel authentication request parameters (CIBA Section 7.1).

use std::time::Duration;

/// A parsed backchannel authentication request.
///
/// Client credentials travel separately in a
/// [`ClientRequest`](crate::client_auth::ClientRequest).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackChannelAuthenticationRequest {
    /// Requested scopes.
    pub scope: Vec<String>,
    /// Bearer token for ping and push notifications.
    pub client_notification_token: Option<String>,
    /// Requested authentication context classes.
    pub acr_values: Vec<String>,
    /// Token identifying the end user.
    pub login_hint_token: Option<String>,
    /// Previously issued ID token identifying the end user.
    pub id_token_hint: Option<String>,
    /// Free-form end-user identifier.
    pub login_hint: Option<String>,
    /// Message shown on both devices.
    pub binding_message: Option<String>,
    /// Secret code the user must enter on the authentication device.
    pub user_code: Option<String>,
    /// Requested lifetime of the `auth_req_id`.
    pub requested_expiry: Option<Duration>,
    /// Resource indicators (RFC 8707).
    pub resources: Vec<String>,
}

impl BackChannelAuthenticationRequest {
    /// Creates an empty request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets scopes from a space-delimited `scope` parameter.
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scope = scope.split_whitespace().map(str::to_string).collect();
        self
    }

    /// Sets the client notification token.
    #[must_use]
    pub fn with_client_notification_token(mut self, token: impl Into<String>) -> Self {
        self.client_notification_token = Some(token.into());
        self
    }

    /// Sets `acr_values` from a space-delimited parameter.
    #[must_use]
    pub fn with_acr_values(mut self, acr_values: &str) -> Self {
        self.acr_values = acr_values.split_whitespace().map(str::to_string).collect();
        self
    }

    /// Sets the login hint token.
    #[must_use]
    pub fn with_login_hint_token(mut self, token: impl Into<String>) -> Self {
        self.login_hint_token = Some(token.into());
        self
    }

    /// Sets the ID token hint.
    #[must_use]
    pub fn with_id_token_hint(mut self, token: impl Into<String>) -> Self {
        self.id_token_hint = Some(token.into());
        self
    }

    /// Sets the login hint.
    #[must_use]
    pub fn with_login_hint(mut self, hint: impl Into<String>) -> Self {
        self.login_hint = Some(hint.into());
        self
    }

    /// Sets the binding message.
    #[must_use]
    pub fn with_binding_message(mut self, message: impl Into<String>) -> Self {
        self.binding_message = Some(message.into());
        self
    }

    /// Sets the user code.
    #[must_use]
    pub fn with_user_code(mut self, code: impl Into<String>) -> Self {
        self.user_code = Some(code.into());
        self
    }

    /// Sets the requested expiry.
    #[must_use]
    pub const fn with_requested_expiry(mut self, expiry: Duration) -> Self {
        self.requested_expiry = Some(expiry);
        self
    }

    /// Adds a resource indicator.
    #[must_use]
    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    /// Checks whether `scope` was requested.
    #[must_use]
    pub fn requests_scope(&self, scope: &str) -> bool {
        self.scope.iter().any(|s| s == scope)
    }
}
