//! `self_signed_tls_client_auth` (RFC 8705 Section 2.2).
//!
//! The client registers the public key of its self-signed certificate in
//! its JWKS. A presented certificate authenticates the client when its
//! public key equals one of the registered keys.

use async_trait::async_trait;
use futures::TryStreamExt;
use op_model::{ClientAuthMethod, ClientInfo};

use super::ClientAuthenticator;
use super::certificate::{CertificateKey, parse_certificate};
use super::request::ClientRequest;
use crate::error::OidcResult;
use crate::services::ProviderServices;

const METHOD: ClientAuthMethod = ClientAuthMethod::SelfSignedTlsClientAuth;

/// Authenticates clients by a self-signed certificate bound to their JWKS.
#[derive(Debug, Clone)]
pub struct SelfSignedTlsClientAuthenticator {
    services: ProviderServices,
}

impl SelfSignedTlsClientAuthenticator {
    /// Creates the authenticator.
    #[must_use]
    pub fn new(services: ProviderServices) -> Self {
        Self { services }
    }

    async fn key_is_registered(&self, client: &ClientInfo, key: &CertificateKey) -> OidcResult<bool> {
        let mut keys = self.services.client_keys.signing_keys(client);
        while let Some(jwk) = keys.try_next().await? {
            if key.matches(&jwk) {
                tracing::debug!(client_id = %client.client_id, kid = ?jwk.key_id(), "certificate key matches registered key");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[async_trait]
impl ClientAuthenticator for SelfSignedTlsClientAuthenticator {
    fn authentication_methods(&self) -> Vec<ClientAuthMethod> {
        vec![METHOD]
    }

    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>> {
        let (Some(der), Some(client_id)) = (request.client_certificate.as_deref(), request.client_id())
        else {
            return Ok(None);
        };

        let Some(client) = self.services.clients.find_client(client_id).await? else {
            tracing::debug!(client_id, method = %METHOD, "unknown client");
            return Ok(None);
        };
        if client.token_endpoint_auth_method != METHOD {
            return Ok(None);
        }

        let Some(certificate) = parse_certificate(der) else {
            return Ok(None);
        };
        if certificate.public_key == CertificateKey::Unsupported {
            tracing::debug!(client_id, method = %METHOD, "unsupported certificate key type");
            return Ok(None);
        }

        if self.key_is_registered(&client, &certificate.public_key).await? {
            Ok(Some(client))
        } else {
            tracing::debug!(client_id, method = %METHOD, "certificate key not registered");
            Ok(None)
        }
    }
}
