//! `client_secret_basic`: credentials in the HTTP Basic `Authorization` header.

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::STANDARD};
use op_model::{ClientAuthMethod, ClientInfo};

use super::request::ClientRequest;
use super::secret::authenticate_with_secret;
use super::ClientAuthenticator;
use crate::error::OidcResult;
use crate::services::ProviderServices;

/// Authenticates `client_secret_basic` clients.
#[derive(Debug, Clone)]
pub struct ClientSecretBasicAuthenticator {
    services: ProviderServices,
}

impl ClientSecretBasicAuthenticator {
    /// Creates the authenticator.
    #[must_use]
    pub fn new(services: ProviderServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl ClientAuthenticator for ClientSecretBasicAuthenticator {
    fn authentication_methods(&self) -> Vec<ClientAuthMethod> {
        vec![ClientAuthMethod::ClientSecretBasic]
    }

    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>> {
        let Some(header) = request.authorization_header.as_deref() else {
            return Ok(None);
        };
        let Some((client_id, secret)) = parse_basic_credentials(header) else {
            return Ok(None);
        };

        authenticate_with_secret(
            &self.services,
            ClientAuthMethod::ClientSecretBasic,
            Some(&client_id),
            Some(&secret),
        )
        .await
    }
}

/// Decodes `Basic base64(urlencode(id) ":" urlencode(secret))`.
///
/// Splits on the first colon only; later colons belong to the secret.
pub(crate) fn parse_basic_credentials(header: &str) -> Option<(String, String)> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("Basic") {
        return None;
    }

    let Ok(decoded) = STANDARD.decode(encoded.trim()) else {
        tracing::debug!("invalid basic auth encoding");
        return None;
    };
    let credentials = String::from_utf8(decoded).ok()?;
    let (client_id, secret) = credentials.split_once(':')?;

    let client_id = urlencoding::decode(client_id).ok()?.into_owned();
    let secret = urlencoding::decode(secret).ok()?.into_owned();
    Some((client_id, secret))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use op_model::ClientSecret;

    use crate::testing::services_with;

    fn basic_client(secrets: Vec<ClientSecret>) -> ClientInfo {
        secrets.into_iter().fold(
            ClientInfo::new("app").with_auth_method(ClientAuthMethod::ClientSecretBasic),
            ClientInfo::with_secret,
        )
    }

    async fn authenticate(
        services: &ProviderServices,
        client_id: &str,
        secret: &str,
    ) -> Option<ClientInfo> {
        ClientSecretBasicAuthenticator::new(services.clone())
            .try_authenticate(&ClientRequest::new().with_basic_auth(client_id, secret))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn authenticates_registered_secret() {
        let (_, services) = services_with(vec![basic_client(vec![ClientSecret::new("pw")])]);

        let client = authenticate(&services, "app", "pw").await;
        assert_eq!(client.map(|c| c.client_id).as_deref(), Some("app"));
    }

    #[tokio::test]
    async fn unknown_client_is_rejected() {
        let (_, services) = services_with(vec![basic_client(vec![ClientSecret::new("pw")])]);

        assert!(authenticate(&services, "someone-else", "pw").await.is_none());
    }

    #[tokio::test]
    async fn client_without_secrets_is_rejected() {
        let (_, services) = services_with(vec![basic_client(vec![])]);

        assert!(authenticate(&services, "app", "pw").await.is_none());
    }

    #[tokio::test]
    async fn empty_secret_is_rejected() {
        let (_, services) = services_with(vec![basic_client(vec![ClientSecret::new("")])]);

        assert!(authenticate(&services, "app", "").await.is_none());
    }

    #[tokio::test]
    async fn latest_matching_secret_decides_expiry() {
        let issued = Utc::now();
        let (clock, services) = services_with(vec![basic_client(vec![
            ClientSecret::new("pw").with_expiry(issued + Duration::hours(1)),
            ClientSecret::new("pw").with_expiry(issued + Duration::hours(2)),
        ])]);

        clock.set(issued + Duration::minutes(90));
        assert!(authenticate(&services, "app", "pw").await.is_some());

        clock.set(issued + Duration::hours(2));
        assert!(authenticate(&services, "app", "pw").await.is_some());

        clock.set(issued + Duration::hours(2) + Duration::seconds(1));
        assert!(authenticate(&services, "app", "pw").await.is_none());
    }

    #[test]
    fn parses_credentials() {
        // "client_id:client_secret" base64 encoded
        let parsed = parse_basic_credentials("Basic Y2xpZW50X2lkOmNsaWVudF9zZWNyZXQ=");
        assert_eq!(
            parsed,
            Some(("client_id".to_string(), "client_secret".to_string()))
        );
    }

    #[test]
    fn url_decodes_both_parts() {
        // "my%20client:my%20secret" base64 encoded
        let parsed = parse_basic_credentials("Basic bXklMjBjbGllbnQ6bXklMjBzZWNyZXQ=");
        assert_eq!(
            parsed,
            Some(("my client".to_string(), "my secret".to_string()))
        );
    }

    #[test]
    fn secret_keeps_later_colons() {
        let header = format!("Basic {}", STANDARD.encode("app:pa:ss:word"));
        let (client_id, secret) = parse_basic_credentials(&header).unwrap();

        assert_eq!(client_id, "app");
        assert_eq!(secret, "pa:ss:word");
    }

    #[test]
    fn rejects_other_schemes_and_garbage() {
        assert!(parse_basic_credentials("Bearer abc.def.ghi").is_none());
        assert!(parse_basic_credentials("Basic !!!invalid!!!").is_none());
        // "nocredentials" base64 encoded (no colon separator)
        assert!(parse_basic_credentials("Basic bm9jcmVkZW50aWFscw==").is_none());
    }
}
