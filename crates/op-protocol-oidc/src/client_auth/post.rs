//! `client_secret_post`: credentials in the request body.

use async_trait::async_trait;
use op_model::{ClientAuthMethod, ClientInfo};

use super::request::ClientRequest;
use super::secret::authenticate_with_secret;
use super::ClientAuthenticator;
use crate::error::OidcResult;
use crate::services::ProviderServices;

/// Authenticates `client_secret_post` clients.
#[derive(Debug, Clone)]
pub struct ClientSecretPostAuthenticator {
    services: ProviderServices,
}

impl ClientSecretPostAuthenticator {
    /// Creates the authenticator.
    #[must_use]
    pub fn new(services: ProviderServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl ClientAuthenticator for ClientSecretPostAuthenticator {
    fn authentication_methods(&self) -> Vec<ClientAuthMethod> {
        vec![ClientAuthMethod::ClientSecretPost]
    }

    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>> {
        if request.client_secret.is_none() {
            return Ok(None);
        }

        authenticate_with_secret(
            &self.services,
            ClientAuthMethod::ClientSecretPost,
            request.client_id(),
            request.client_secret.as_deref(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use op_model::ClientSecret;

    use crate::testing::services_with;

    fn post_client(secrets: Vec<ClientSecret>) -> ClientInfo {
        secrets.into_iter().fold(
            ClientInfo::new("app").with_auth_method(ClientAuthMethod::ClientSecretPost),
            ClientInfo::with_secret,
        )
    }

    async fn authenticate(
        services: &ProviderServices,
        client_id: &str,
        secret: &str,
    ) -> Option<ClientInfo> {
        let request = ClientRequest::new()
            .with_client_id(client_id)
            .with_client_secret(secret);
        ClientSecretPostAuthenticator::new(services.clone())
            .try_authenticate(&request)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn authenticates_registered_secret() {
        let (_, services) = services_with(vec![post_client(vec![ClientSecret::new("pw")])]);

        assert!(authenticate(&services, "app", "pw").await.is_some());
        assert!(authenticate(&services, "app", "wrong").await.is_none());
    }

    #[tokio::test]
    async fn unknown_client_is_rejected() {
        let (_, services) = services_with(vec![]);

        assert!(authenticate(&services, "app", "pw").await.is_none());
    }

    #[tokio::test]
    async fn client_without_secrets_is_rejected() {
        let (_, services) = services_with(vec![post_client(vec![])]);

        assert!(authenticate(&services, "app", "pw").await.is_none());
    }

    #[tokio::test]
    async fn empty_secret_is_rejected() {
        let (_, services) = services_with(vec![post_client(vec![ClientSecret::new("")])]);

        assert!(authenticate(&services, "app", "").await.is_none());
    }

    #[tokio::test]
    async fn expired_secret_is_rejected() {
        let issued = Utc::now();
        let (clock, services) = services_with(vec![post_client(vec![
            ClientSecret::new("pw").with_expiry(issued + Duration::hours(1)),
        ])]);

        clock.set(issued + Duration::hours(1));
        assert!(authenticate(&services, "app", "pw").await.is_some());

        clock.advance(Duration::seconds(1));
        assert!(authenticate(&services, "app", "pw").await.is_none());
    }
}
