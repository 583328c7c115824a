//! Client authentication at the token and backchannel endpoints.
//!
//! Implements the OAuth 2.0 client authentication methods:
//! - `client_secret_basic` - HTTP Basic authentication
//! - `client_secret_post` - Credentials in request body
//! - `client_secret_jwt` - JWT assertion signed with the client secret (RFC 7523)
//! - `private_key_jwt` - JWT assertion signed with a registered key (RFC 7523)
//! - `self_signed_tls_client_auth` - mutual TLS, self-signed certificate (RFC 8705)
//! - `tls_client_auth` - mutual TLS, PKI certificate (RFC 8705)
//! - `none` - public clients
//!
//! Every method is a [`ClientAuthenticator`]. An authenticator returns
//! `Ok(None)` both when the request does not use its method and when the
//! credential is wrong; `Err` is reserved for collaborator faults.
//! [`CompositeClientAuthenticator`] tries them in order.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use op_protocol_oidc::client_auth::{ClientRequest, CompositeClientAuthenticator};
//!
//! let authenticator = CompositeClientAuthenticator::with_defaults(&services);
//! let request = ClientRequest::new().with_basic_auth("my-client", "secret");
//! match authenticator.try_authenticate(&request).await? {
//!     Some(client) => println!("authenticated {}", client.client_id),
//!     None => return Err(OidcError::InvalidClient("unauthenticated".into())),
//! }
//! ```

pub mod assertion;
pub mod basic;
mod certificate;
pub mod keys;
pub mod none;
pub mod post;
pub mod request;
mod secret;
pub mod self_signed_tls;
pub mod tls;

use std::sync::Arc;

use async_trait::async_trait;
use op_core::{EventBuilder, EventType};
use op_model::{ClientAuthMethod, ClientInfo};

use crate::error::OidcResult;
use crate::services::ProviderServices;

pub use assertion::{
    CLIENT_ASSERTION_TYPE_JWT, ClientSecretJwtAuthenticator, JwtAssertionAuthenticator,
    PrivateKeyJwtAuthenticator,
};
pub use basic::ClientSecretBasicAuthenticator;
pub use keys::{ClientJwksResolver, ClientSecretKeyResolver, SigningKeyResolver};
pub use none::NoneAuthenticator;
pub use post::ClientSecretPostAuthenticator;
pub use request::ClientRequest;
pub use self_signed_tls::SelfSignedTlsClientAuthenticator;
pub use tls::TlsClientAuthenticator;

/// One client authentication method.
#[async_trait]
pub trait ClientAuthenticator: Send + Sync {
    /// Methods this authenticator implements.
    fn authentication_methods(&self) -> Vec<ClientAuthMethod>;

    /// Authenticates the request.
    ///
    /// Returns `Ok(None)` if the request does not use this method or the
    /// credential does not verify.
    ///
    /// # Errors
    ///
    /// Returns `OidcError::ServerError` if a collaborator fails.
    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>>;
}

/// Tries authenticators in order and returns the first success.
pub struct CompositeClientAuthenticator {
    authenticators: Vec<Arc<dyn ClientAuthenticator>>,
}

impl CompositeClientAuthenticator {
    /// Creates a composite over the given authenticators, tried in order.
    #[must_use]
    pub fn new(authenticators: Vec<Arc<dyn ClientAuthenticator>>) -> Self {
        Self { authenticators }
    }

    /// Creates the default chain: `client_secret_basic`,
    /// `client_secret_post`, `client_secret_jwt`, `private_key_jwt`,
    /// `self_signed_tls_client_auth`, `tls_client_auth`, `none`.
    #[must_use]
    pub fn with_defaults(services: &ProviderServices) -> Self {
        let jwt_validator = Arc::new(services.jwt_validator());
        Self::new(vec![
            Arc::new(ClientSecretBasicAuthenticator::new(services.clone())),
            Arc::new(ClientSecretPostAuthenticator::new(services.clone())),
            Arc::new(ClientSecretJwtAuthenticator::new(
                services.clone(),
                jwt_validator.clone(),
                ClientSecretKeyResolver::new(services.clock.clone()),
            )),
            Arc::new(PrivateKeyJwtAuthenticator::new(
                services.clone(),
                jwt_validator,
                ClientJwksResolver::new(services.client_keys.clone()),
            )),
            Arc::new(SelfSignedTlsClientAuthenticator::new(services.clone())),
            Arc::new(TlsClientAuthenticator::new(services.clone())),
            Arc::new(NoneAuthenticator::new(services.clone())),
        ])
    }

    /// Number of authenticators in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.authenticators.len()
    }

    /// Checks whether the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.authenticators.is_empty()
    }
}

#[async_trait]
impl ClientAuthenticator for CompositeClientAuthenticator {
    fn authentication_methods(&self) -> Vec<ClientAuthMethod> {
        let mut methods = Vec::new();
        for method in self
            .authenticators
            .iter()
            .flat_map(|a| a.authentication_methods())
        {
            if !methods.contains(&method) {
                methods.push(method);
            }
        }
        methods
    }

    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>> {
        for authenticator in &self.authenticators {
            match authenticator.try_authenticate(request).await {
                Ok(Some(client)) => {
                    EventBuilder::new(EventType::ClientLogin)
                        .client(client.client_id.clone())
                        .detail("method", client.token_endpoint_auth_method.as_str())
                        .emit();
                    return Ok(Some(client));
                }
                Ok(None) => {}
                Err(e) => {
                    EventBuilder::new(EventType::ClientLoginError)
                        .maybe_client(request.client_id())
                        .failure(e.error_code())
                        .emit();
                    return Err(e);
                }
            }
        }

        tracing::debug!(client_id = ?request.client_id(), "no authenticator accepted the request");
        EventBuilder::new(EventType::ClientLoginError)
            .maybe_client(request.client_id())
            .failure("unauthenticated")
            .emit();
        Ok(None)
    }
}

impl std::fmt::Debug for CompositeClientAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeClientAuthenticator")
            .field("methods", &self.authentication_methods())
            .finish()
    }
}
