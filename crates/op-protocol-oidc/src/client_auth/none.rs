//! `none`: public clients identified by `client_id` alone.

use async_trait::async_trait;
use op_model::{ClientAuthMethod, ClientInfo};

use super::ClientAuthenticator;
use super::request::ClientRequest;
use crate::error::OidcResult;
use crate::services::ProviderServices;

/// Accepts public clients that present no credential.
#[derive(Debug, Clone)]
pub struct NoneAuthenticator {
    services: ProviderServices,
}

impl NoneAuthenticator {
    /// Creates the authenticator.
    #[must_use]
    pub fn new(services: ProviderServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl ClientAuthenticator for NoneAuthenticator {
    fn authentication_methods(&self) -> Vec<ClientAuthMethod> {
        vec![ClientAuthMethod::None]
    }

    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>> {
        if request.has_credentials() {
            return Ok(None);
        }
        let Some(client_id) = request.client_id() else {
            return Ok(None);
        };

        let Some(client) = self.services.clients.find_client(client_id).await? else {
            tracing::debug!(client_id, method = "none", "unknown client");
            return Ok(None);
        };
        if client.token_endpoint_auth_method != ClientAuthMethod::None {
            tracing::debug!(client_id, registered = %client.token_endpoint_auth_method, "confidential client sent no credential");
            return Ok(None);
        }

        Ok(Some(client))
    }
}
