//! Verification key enumeration.
//!
//! Keys are produced as lazy streams so a verifier can stop pulling at
//! the first key that checks out.

use futures::stream::{self, BoxStream, StreamExt};
use op_crypto::{JsonWebKey, JsonWebKeySet};
use op_model::ClientInfo;

use crate::error::StorageResult;

/// Lazy sequence of candidate verification keys.
pub type KeyStream<'a> = BoxStream<'a, StorageResult<JsonWebKey>>;

/// Enumerates the verification keys registered for a client.
pub trait ClientKeysProvider: Send + Sync {
    /// Streams every key the client registered, whatever its `use`.
    fn signing_keys<'a>(&'a self, client: &'a ClientInfo) -> KeyStream<'a>;
}

/// Reads keys from [`ClientInfo::jwks`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredClientKeysProvider;

impl ClientKeysProvider for RegisteredClientKeysProvider {
    fn signing_keys<'a>(&'a self, client: &'a ClientInfo) -> KeyStream<'a> {
        let keys = client
            .registered_keys()
            .into_iter()
            .flat_map(|jwks| jwks.keys.iter())
            .cloned()
            .map(Ok);
        stream::iter(keys).boxed()
    }
}

/// Enumerates the provider's own verification keys (for `id_token_hint`).
pub trait ServiceKeysProvider: Send + Sync {
    /// Streams the provider's signing keys.
    fn signing_keys(&self) -> KeyStream<'_>;
}

/// A fixed provider key set.
#[derive(Debug, Clone, Default)]
pub struct StaticServiceKeys {
    jwks: JsonWebKeySet,
}

impl StaticServiceKeys {
    /// Creates a provider over a key set.
    #[must_use]
    pub const fn new(jwks: JsonWebKeySet) -> Self {
        Self { jwks }
    }
}

impl ServiceKeysProvider for StaticServiceKeys {
    fn signing_keys(&self) -> KeyStream<'_> {
        stream::iter(self.jwks.signing_keys().cloned().map(Ok)).boxed()
    }
}
