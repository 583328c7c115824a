//! State threaded through the backchannel request validators.

use std::time::Duration;

use op_model::{ClientInfo, ResourceDefinition, ScopeDefinition};

use super::request::BackChannelAuthenticationRequest;
use crate::claims::JwtClaims;
use crate::client_auth::ClientRequest;
use crate::error::{OidcError, OidcResult};

/// A `login_hint_token` accepted by validation.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginHintToken {
    /// Signed by the client and verified.
    Jwt(JwtClaims),
    /// Accepted as presented.
    Opaque(String),
}

/// Accumulates what the validators resolve for one request.
///
/// Validators fill the public fields in order and write only once their
/// own checks have passed. Later validators read what earlier ones wrote.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    request: BackChannelAuthenticationRequest,
    client_request: ClientRequest,
    /// Authenticated client.
    pub client_info: Option<ClientInfo>,
    /// Resolved scopes, in request order.
    pub scopes: Vec<ScopeDefinition>,
    /// Resolved resources with scopes narrowed to the requested ones.
    pub resources: Vec<ResourceDefinition>,
    /// Lifetime granted to the request.
    pub expires_in: Option<Duration>,
    /// Validated `login_hint_token`.
    pub login_hint_token: Option<LoginHintToken>,
    /// Claims of a validated `id_token_hint`.
    pub id_token: Option<JwtClaims>,
}

impl ValidationContext {
    /// Creates an empty context for a request.
    #[must_use]
    pub const fn new(request: BackChannelAuthenticationRequest, client_request: ClientRequest) -> Self {
        Self {
            request,
            client_request,
            client_info: None,
            scopes: Vec::new(),
            resources: Vec::new(),
            expires_in: None,
            login_hint_token: None,
            id_token: None,
        }
    }

    /// The backchannel request.
    #[must_use]
    pub const fn request(&self) -> &BackChannelAuthenticationRequest {
        &self.request
    }

    /// The client credentials sent with the request.
    #[must_use]
    pub const fn client_request(&self) -> &ClientRequest {
        &self.client_request
    }

    /// The authenticated client.
    ///
    /// # Errors
    ///
    /// Returns `ServerError` if no validator has authenticated the client
    /// yet, which means the validators are misordered.
    pub fn client(&self) -> OidcResult<&ClientInfo> {
        self.client_info
            .as_ref()
            .ok_or_else(|| OidcError::ServerError("client not authenticated before use".to_string()))
    }
}
