//! Client domain model.
//!
//! A [`ClientInfo`] is a registered OAuth 2.0 / OIDC client as loaded from
//! the client store. It is read-only for the duration of an authentication
//! attempt.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use op_crypto::{HashAlgorithm, JsonWebKeySet};
use serde::{Deserialize, Serialize};
use url::Url;

/// Token endpoint authentication methods (RFC 7591 / RFC 8705).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientAuthMethod {
    /// Secret in the HTTP Basic `Authorization` header.
    #[default]
    ClientSecretBasic,
    /// Secret in the request body.
    ClientSecretPost,
    /// JWT assertion signed with the client secret (HMAC).
    ClientSecretJwt,
    /// JWT assertion signed with a registered private key.
    PrivateKeyJwt,
    /// Mutual TLS with a self-signed certificate bound to the client JWKS.
    SelfSignedTlsClientAuth,
    /// Mutual TLS with a PKI certificate bound by subject DN or SAN.
    TlsClientAuth,
    /// Public client, no authentication.
    None,
}

impl ClientAuthMethod {
    /// Returns the registered metadata value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ClientSecretBasic => "client_secret_basic",
            Self::ClientSecretPost => "client_secret_post",
            Self::ClientSecretJwt => "client_secret_jwt",
            Self::PrivateKeyJwt => "private_key_jwt",
            Self::SelfSignedTlsClientAuth => "self_signed_tls_client_auth",
            Self::TlsClientAuth => "tls_client_auth",
            Self::None => "none",
        }
    }
}

impl fmt::Display for ClientAuthMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientAuthMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client_secret_basic" => Ok(Self::ClientSecretBasic),
            "client_secret_post" => Ok(Self::ClientSecretPost),
            "client_secret_jwt" => Ok(Self::ClientSecretJwt),
            "private_key_jwt" => Ok(Self::PrivateKeyJwt),
            "self_signed_tls_client_auth" => Ok(Self::SelfSignedTlsClientAuth),
            "tls_client_auth" => Ok(Self::TlsClientAuth),
            "none" => Ok(Self::None),
            _ => Err(format!("unknown client authentication method: {s}")),
        }
    }
}

/// CIBA token delivery modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackchannelTokenDeliveryMode {
    /// Client polls the token endpoint.
    Poll,
    /// Provider pings the client notification endpoint, client then polls.
    Ping,
    /// Provider pushes the tokens to the client notification endpoint.
    Push,
}

/// A stored client secret.
///
/// At least one of the hashes is present. The raw value is kept only when
/// the client signs assertions with it (`client_secret_jwt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientSecret {
    /// SHA-256 hash of the secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha256_hash: Option<Vec<u8>>,

    /// SHA-512 hash of the secret.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha512_hash: Option<Vec<u8>>,

    /// Raw secret value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// When the secret stops being accepted. `None` never expires.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl ClientSecret {
    /// Creates a secret stored under both hashes, keeping the raw value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            sha256_hash: Some(op_crypto::sha256(value.as_bytes())),
            sha512_hash: Some(op_crypto::sha512(value.as_bytes())),
            value: Some(value),
            expires_at: None,
        }
    }

    /// Creates a secret stored only as a hash under one algorithm.
    #[must_use]
    pub fn hashed(algorithm: HashAlgorithm, value: &str) -> Self {
        let digest = op_crypto::hash(algorithm, value.as_bytes());
        let (sha256_hash, sha512_hash) = match algorithm {
            HashAlgorithm::Sha256 => (Some(digest), None),
            HashAlgorithm::Sha512 => (None, Some(digest)),
        };
        Self {
            sha256_hash,
            sha512_hash,
            value: None,
            expires_at: None,
        }
    }

    /// Sets the expiry.
    #[must_use]
    pub const fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Drops the raw value, keeping only the hashes.
    #[must_use]
    pub fn without_value(mut self) -> Self {
        self.value = None;
        self
    }

    /// Returns the stored hash for an algorithm.
    #[must_use]
    pub fn hash_for(&self, algorithm: HashAlgorithm) -> Option<&[u8]> {
        match algorithm {
            HashAlgorithm::Sha256 => self.sha256_hash.as_deref(),
            HashAlgorithm::Sha512 => self.sha512_hash.as_deref(),
        }
    }

    /// Checks if the secret expired strictly before `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at < now)
    }
}

/// Certificate binding for `tls_client_auth` (RFC 8705 Section 2.1.2).
///
/// Exactly one of the fields is expected to be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsClientAuthSettings {
    /// Expected subject distinguished name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_dn: Option<String>,
    /// Expected `dNSName` SAN entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub san_dns: Option<String>,
    /// Expected `uniformResourceIdentifier` SAN entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub san_uri: Option<String>,
    /// Expected `iPAddress` SAN entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub san_ip: Option<String>,
    /// Expected `rfc822Name` SAN entry.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub san_email: Option<String>,
}

/// A registered client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct ClientInfo {
    // === Identity ===
    /// Unique client identifier (OAuth `client_id`).
    pub client_id: String,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,

    // === Authentication ===
    /// Stored secrets. More than one during rotation.
    #[serde(default)]
    pub client_secrets: Vec<ClientSecret>,
    /// Registered token endpoint authentication method.
    #[serde(default)]
    pub token_endpoint_auth_method: ClientAuthMethod,
    /// Registered public keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jwks: Option<JsonWebKeySet>,
    /// Certificate binding for `tls_client_auth`.
    #[serde(default)]
    pub tls_client_auth: TlsClientAuthSettings,

    // === Grants ===
    /// Grant types the client may use.
    #[serde(default)]
    pub allowed_grant_types: Vec<String>,
    /// Whether the client may request `offline_access`.
    #[serde(default)]
    pub offline_access_allowed: bool,

    // === CIBA ===
    /// Token delivery mode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backchannel_token_delivery_mode: Option<BackchannelTokenDeliveryMode>,
    /// Notification endpoint for ping and push modes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backchannel_client_notification_endpoint: Option<Url>,
    /// Whether `login_hint_token` is a JWT issued by the client.
    #[serde(default)]
    pub parse_login_hint_token_as_jwt: bool,
    /// Whether the client requires a `user_code`.
    #[serde(default)]
    pub backchannel_user_code_parameter: bool,
}

impl ClientInfo {
    /// Creates a client with the given client ID and no credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_name: None,
            client_secrets: Vec::new(),
            token_endpoint_auth_method: ClientAuthMethod::default(),
            jwks: None,
            tls_client_auth: TlsClientAuthSettings::default(),
            allowed_grant_types: Vec::new(),
            offline_access_allowed: false,
            backchannel_token_delivery_mode: None,
            backchannel_client_notification_endpoint: None,
            parse_login_hint_token_as_jwt: false,
            backchannel_user_code_parameter: false,
        }
    }

    /// Creates a public client (`none` authentication).
    #[must_use]
    pub fn new_public(client_id: impl Into<String>) -> Self {
        Self::new(client_id).with_auth_method(ClientAuthMethod::None)
    }

    /// Creates a confidential client with one secret.
    #[must_use]
    pub fn new_confidential(
        client_id: impl Into<String>,
        method: ClientAuthMethod,
        secret: impl Into<String>,
    ) -> Self {
        Self::new(client_id)
            .with_auth_method(method)
            .with_secret(ClientSecret::new(secret))
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.client_name = Some(name.into());
        self
    }

    /// Sets the token endpoint authentication method.
    #[must_use]
    pub const fn with_auth_method(mut self, method: ClientAuthMethod) -> Self {
        self.token_endpoint_auth_method = method;
        self
    }

    /// Adds a stored secret.
    #[must_use]
    pub fn with_secret(mut self, secret: ClientSecret) -> Self {
        self.client_secrets.push(secret);
        self
    }

    /// Sets the registered key set.
    #[must_use]
    pub fn with_jwks(mut self, jwks: JsonWebKeySet) -> Self {
        self.jwks = Some(jwks);
        self
    }

    /// Sets the `tls_client_auth` certificate binding.
    #[must_use]
    pub fn with_tls_client_auth(mut self, settings: TlsClientAuthSettings) -> Self {
        self.tls_client_auth = settings;
        self
    }

    /// Adds an allowed grant type.
    #[must_use]
    pub fn with_grant_type(mut self, grant_type: impl Into<String>) -> Self {
        self.allowed_grant_types.push(grant_type.into());
        self
    }

    /// Allows `offline_access`.
    #[must_use]
    pub const fn with_offline_access(mut self) -> Self {
        self.offline_access_allowed = true;
        self
    }

    /// Sets the CIBA delivery mode and notification endpoint.
    #[must_use]
    pub fn with_backchannel_delivery(
        mut self,
        mode: BackchannelTokenDeliveryMode,
        notification_endpoint: Option<Url>,
    ) -> Self {
        self.backchannel_token_delivery_mode = Some(mode);
        self.backchannel_client_notification_endpoint = notification_endpoint;
        self
    }

    /// Requires `login_hint_token` to be a JWT signed by this client.
    #[must_use]
    pub const fn with_login_hint_token_jwt(mut self) -> Self {
        self.parse_login_hint_token_as_jwt = true;
        self
    }

    /// Requires `user_code` on backchannel requests.
    #[must_use]
    pub const fn with_user_code_required(mut self) -> Self {
        self.backchannel_user_code_parameter = true;
        self
    }

    /// Checks if the client may use a grant type (exact match).
    #[must_use]
    pub fn allows_grant_type(&self, grant_type: &str) -> bool {
        self.allowed_grant_types.iter().any(|g| g == grant_type)
    }

    /// Returns the registered key set, if any.
    #[must_use]
    pub const fn registered_keys(&self) -> Option<&JsonWebKeySet> {
        self.jwks.as_ref()
    }
}
