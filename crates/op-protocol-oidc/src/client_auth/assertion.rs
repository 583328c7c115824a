//! JWT bearer client assertions (RFC 7523 Section 2.2).
//!
//! `client_secret_jwt` and `private_key_jwt` share one flow and differ
//! only in where the verification keys come from, see
//! [`SigningKeyResolver`].

use std::sync::Arc;

use async_trait::async_trait;
use op_cache::JsonWebTokenStatus;
use op_model::{ClientAuthMethod, ClientInfo};

use super::ClientAuthenticator;
use super::keys::{ClientJwksResolver, ClientSecretKeyResolver, SigningKeyResolver};
use super::request::ClientRequest;
use crate::error::{OidcError, OidcResult};
use crate::jwt::{JwtError, JwtExpectations, JwtValidator, ValidatedJwt};
use crate::services::ProviderServices;

/// JWT assertion type for `client_secret_jwt` and `private_key_jwt`.
pub const CLIENT_ASSERTION_TYPE_JWT: &str =
    "urn:ietf:params:oauth:client-assertion-type:jwt-bearer";

/// `private_key_jwt` authenticator.
pub type PrivateKeyJwtAuthenticator = JwtAssertionAuthenticator<ClientJwksResolver>;

/// `client_secret_jwt` authenticator.
pub type ClientSecretJwtAuthenticator = JwtAssertionAuthenticator<ClientSecretKeyResolver>;

/// Authenticates clients by a self-issued JWT assertion.
pub struct JwtAssertionAuthenticator<K> {
    services: ProviderServices,
    jwt_validator: Arc<JwtValidator>,
    keys: K,
}

impl<K: SigningKeyResolver> JwtAssertionAuthenticator<K> {
    /// Creates an authenticator verifying assertions with keys from `keys`.
    #[must_use]
    pub fn new(services: ProviderServices, jwt_validator: Arc<JwtValidator>, keys: K) -> Self {
        Self {
            services,
            jwt_validator,
            keys,
        }
    }

    /// Resolves the issuing client and verifies the assertion with its keys.
    async fn validate_assertion(
        &self,
        request: &ClientRequest,
        assertion: &str,
    ) -> OidcResult<Option<(ClientInfo, ValidatedJwt)>> {
        let method = self.keys.method();

        let issuer = match JwtValidator::peek(assertion) {
            Ok(claims) => claims.iss,
            Err(e) => {
                tracing::debug!(%method, error = %e, "unreadable client assertion");
                return Ok(None);
            }
        };
        let Some(issuer) = issuer else {
            tracing::debug!(%method, "client assertion has no issuer");
            return Ok(None);
        };

        if let Some(client_id) = request.client_id()
            && client_id != issuer
        {
            tracing::debug!(client_id, %method, "client_id differs from assertion issuer");
            return Ok(None);
        }

        let Some(client) = self.services.clients.find_client(&issuer).await? else {
            tracing::debug!(client_id = %issuer, %method, "unknown client");
            return Ok(None);
        };

        if client.token_endpoint_auth_method != method {
            tracing::warn!(
                client_id = %issuer,
                %method,
                registered = %client.token_endpoint_auth_method,
                "authentication method not registered for client"
            );
            return Ok(None);
        }

        let expectations = JwtExpectations::new().audience(&self.services.config.token_endpoint);
        let keys = self.keys.signing_keys(&client);
        let result = self.jwt_validator.verify(assertion, keys, &expectations).await;
        match result {
            Ok(validated) => Ok(Some((client, validated))),
            Err(e) if e.is_fault() => Err(OidcError::ServerError(e.to_string())),
            Err(e) => {
                log_rejection(&issuer, method, &e);
                Ok(None)
            }
        }
    }
}

fn log_rejection(client_id: &str, method: ClientAuthMethod, error: &JwtError) {
    tracing::debug!(client_id, %method, reason = %error, "client assertion rejected");
}

#[async_trait]
impl<K: SigningKeyResolver> ClientAuthenticator for JwtAssertionAuthenticator<K> {
    fn authentication_methods(&self) -> Vec<ClientAuthMethod> {
        vec![self.keys.method()]
    }

    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>> {
        if request.client_assertion_type.as_deref() != Some(CLIENT_ASSERTION_TYPE_JWT) {
            return Ok(None);
        }
        let Some(assertion) = request.client_assertion() else {
            return Ok(None);
        };

        let Some((client, validated)) = self.validate_assertion(request, assertion).await? else {
            return Ok(None);
        };

        if !self
            .authentication_methods()
            .contains(&client.token_endpoint_auth_method)
        {
            return Ok(None);
        }

        let claims = &validated.claims;
        let Some(subject) = claims.sub.as_deref() else {
            tracing::debug!(client_id = %client.client_id, "client assertion has no subject");
            return Ok(None);
        };
        if claims.iss.as_deref() != Some(subject) {
            tracing::debug!(client_id = %client.client_id, "client assertion issuer differs from subject");
            return Ok(None);
        }

        if let (Some(jti), Some(expires_at)) = (claims.jti.as_deref(), claims.expires_at()) {
            self.services
                .token_registry
                .set_status(jti, JsonWebTokenStatus::Used, expires_at)
                .await?;
        }

        Ok(Some(client))
    }
}

impl<K> std::fmt::Debug for JwtAssertionAuthenticator<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtAssertionAuthenticator").finish_non_exhaustive()
    }
}
