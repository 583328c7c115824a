//! Shared logic of `client_secret_basic` and `client_secret_post`.

use std::cell::OnceCell;

use chrono::{DateTime, Utc};
use op_crypto::HashAlgorithm;
use op_model::{ClientAuthMethod, ClientInfo, ClientSecret};

use crate::error::OidcResult;
use crate::services::ProviderServices;

/// A presented secret, hashed at most once per algorithm and only when a
/// stored secret needs that algorithm.
struct PresentedSecret<'a> {
    value: &'a str,
    sha256: OnceCell<Vec<u8>>,
    sha512: OnceCell<Vec<u8>>,
}

impl<'a> PresentedSecret<'a> {
    const fn new(value: &'a str) -> Self {
        Self {
            value,
            sha256: OnceCell::new(),
            sha512: OnceCell::new(),
        }
    }

    fn digest(&self, algorithm: HashAlgorithm) -> &[u8] {
        let cell = match algorithm {
            HashAlgorithm::Sha256 => &self.sha256,
            HashAlgorithm::Sha512 => &self.sha512,
        };
        cell.get_or_init(|| op_crypto::hash(algorithm, self.value.as_bytes()))
    }

    fn matches(&self, stored: &ClientSecret) -> bool {
        [HashAlgorithm::Sha256, HashAlgorithm::Sha512]
            .into_iter()
            .any(|algorithm| {
                stored
                    .hash_for(algorithm)
                    .is_some_and(|hash| op_crypto::bytes_equal(hash, self.digest(algorithm)))
            })
    }
}

/// Picks the matching secret with the latest expiry. A secret without
/// expiry ranks above any dated one.
pub(super) fn select_secret<'s>(
    secrets: &'s [ClientSecret],
    presented: &str,
) -> Option<&'s ClientSecret> {
    let presented = PresentedSecret::new(presented);
    secrets
        .iter()
        .filter(|stored| presented.matches(stored))
        .max_by_key(|stored| expiry_rank(stored.expires_at))
}

const fn expiry_rank(expires_at: Option<DateTime<Utc>>) -> (bool, Option<DateTime<Utc>>) {
    (expires_at.is_none(), expires_at)
}

/// Authenticates a `client_id` / `client_secret` pair for `method`.
pub(super) async fn authenticate_with_secret(
    services: &ProviderServices,
    method: ClientAuthMethod,
    client_id: Option<&str>,
    secret: Option<&str>,
) -> OidcResult<Option<ClientInfo>> {
    let Some(client_id) = client_id.filter(|id| !id.is_empty()) else {
        tracing::debug!(%method, "client_id missing");
        return Ok(None);
    };

    let Some(client) = services.clients.find_client(client_id).await? else {
        tracing::debug!(client_id, %method, "unknown client");
        return Ok(None);
    };

    let Some(secret) = secret.filter(|s| !s.is_empty()) else {
        tracing::debug!(client_id, %method, "empty client secret");
        return Ok(None);
    };
    if client.client_secrets.is_empty() {
        tracing::debug!(client_id, %method, "client has no secrets");
        return Ok(None);
    }

    if client.token_endpoint_auth_method != method {
        tracing::warn!(
            client_id,
            %method,
            registered = %client.token_endpoint_auth_method,
            "authentication method not registered for client"
        );
        return Ok(None);
    }

    let Some(selected) = select_secret(&client.client_secrets, secret) else {
        tracing::debug!(client_id, %method, "client secret mismatch");
        return Ok(None);
    };

    if selected.is_expired(services.clock.now()) {
        tracing::debug!(client_id, %method, expires_at = ?selected.expires_at, "client secret expired");
        return Ok(None);
    }

    Ok(Some(client))
}
