//! Authenticates the requesting client and checks it may use CIBA.

use std::sync::Arc;

use async_trait::async_trait;
use op_model::grant_types;

use super::BackChannelRequestValidator;
use super::context::ValidationContext;
use crate::client_auth::ClientAuthenticator;
use crate::error::{OidcError, OidcResult};

/// Authenticates the client and requires the CIBA grant type.
pub struct ClientValidator {
    authenticator: Arc<dyn ClientAuthenticator>,
}

impl ClientValidator {
    /// Creates a validator authenticating through `authenticator`.
    #[must_use]
    pub fn new(authenticator: Arc<dyn ClientAuthenticator>) -> Self {
        Self { authenticator }
    }
}

#[async_trait]
impl BackChannelRequestValidator for ClientValidator {
    fn id(&self) -> &'static str {
        "client"
    }

    async fn validate(&self, context: &mut ValidationContext) -> OidcResult<()> {
        let Some(client) = self
            .authenticator
            .try_authenticate(context.client_request())
            .await?
        else {
            return Err(OidcError::UnauthorizedClient(
                "client authentication failed".to_string(),
            ));
        };

        if !client.allows_grant_type(grant_types::CIBA) {
            tracing::debug!(client_id = %client.client_id, "client not allowed the CIBA grant");
            return Err(OidcError::UnauthorizedClient(
                "client is not allowed to use the CIBA grant".to_string(),
            ));
        }

        context.client_info = Some(client);
        Ok(())
    }
}

impl std::fmt::Debug for ClientValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientValidator").finish_non_exhaustive()
    }
}
