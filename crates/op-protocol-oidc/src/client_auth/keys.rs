//! Verification keys for client assertions.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use op_core::Clock;
use op_crypto::{HmacAlgorithm, JsonWebKey};
use op_model::{ClientAuthMethod, ClientInfo};
use op_storage::{ClientKeysProvider, KeyStream};

/// Resolves the candidate keys an assertion may be signed with.
pub trait SigningKeyResolver: Send + Sync {
    /// Authentication method whose assertions these keys verify.
    fn method(&self) -> ClientAuthMethod;

    /// Streams candidate keys for a client.
    fn signing_keys<'a>(&'a self, client: &'a ClientInfo) -> KeyStream<'a>;
}

/// `private_key_jwt`: the client's registered public keys.
pub struct ClientJwksResolver {
    client_keys: Arc<dyn ClientKeysProvider>,
}

impl ClientJwksResolver {
    /// Creates a resolver over a client key provider.
    #[must_use]
    pub fn new(client_keys: Arc<dyn ClientKeysProvider>) -> Self {
        Self { client_keys }
    }
}

impl SigningKeyResolver for ClientJwksResolver {
    fn method(&self) -> ClientAuthMethod {
        ClientAuthMethod::PrivateKeyJwt
    }

    fn signing_keys<'a>(&'a self, client: &'a ClientInfo) -> KeyStream<'a> {
        self.client_keys.signing_keys(client)
    }
}

/// `client_secret_jwt`: HMAC keys derived from the client's secrets.
///
/// Every unexpired secret that keeps its raw value yields one key per
/// HMAC strength. Keys are derived as the stream is pulled.
pub struct ClientSecretKeyResolver {
    clock: Arc<dyn Clock>,
}

impl ClientSecretKeyResolver {
    /// Creates a resolver that skips secrets expired at `clock.now()`.
    #[must_use]
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }
}

impl SigningKeyResolver for ClientSecretKeyResolver {
    fn method(&self) -> ClientAuthMethod {
        ClientAuthMethod::ClientSecretJwt
    }

    fn signing_keys<'a>(&'a self, client: &'a ClientInfo) -> KeyStream<'a> {
        let now = self.clock.now();
        let keys = client
            .client_secrets
            .iter()
            .filter(move |secret| !secret.is_expired(now))
            .filter_map(|secret| secret.value.as_deref())
            .flat_map(|value| {
                HmacAlgorithm::ALL
                    .into_iter()
                    .map(move |alg| Ok(JsonWebKey::symmetric(alg, value.as_bytes())))
            });
        stream::iter(keys).boxed()
    }
}

impl std::fmt::Debug for ClientJwksResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientJwksResolver").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ClientSecretKeyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSecretKeyResolver").finish_non_exhaustive()
    }
}
