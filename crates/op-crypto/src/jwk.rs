//! JSON Web Key (JWK) and JSON Web Key Set (JWKS) types.
//!
//! Implements the key representations defined in:
//! - [RFC 7517](https://tools.ietf.org/html/rfc7517) (JSON Web Key)
//! - [RFC 7518](https://tools.ietf.org/html/rfc7518) (JSON Web Algorithms)
//! - [RFC 8037](https://tools.ietf.org/html/rfc8037) (OKP keys)

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::algorithm::HmacAlgorithm;

/// Errors raised while reading key material out of a JWK.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JwkError {
    /// A parameter required for the key type is absent.
    #[error("JWK is missing the '{0}' parameter")]
    MissingParameter(&'static str),

    /// A parameter is not valid base64url.
    #[error("JWK parameter '{0}' is not valid base64url")]
    InvalidEncoding(&'static str),

    /// The key type does not carry the requested material.
    #[error("JWK of type {0:?} does not carry this material")]
    WrongKeyType(KeyType),
}

/// JSON Web Key Set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKeySet {
    /// Array of JSON Web Keys.
    pub keys: Vec<JsonWebKey>,
}

impl JsonWebKeySet {
    /// Creates a new empty JWKS.
    #[must_use]
    pub const fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Creates a JWKS with the given keys.
    #[must_use]
    pub const fn with_keys(keys: Vec<JsonWebKey>) -> Self {
        Self { keys }
    }

    /// Adds a key to the set.
    pub fn add_key(&mut self, key: JsonWebKey) {
        self.keys.push(key);
    }

    /// Finds a key by its ID.
    #[must_use]
    pub fn find_key(&self, kid: &str) -> Option<&JsonWebKey> {
        self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
    }

    /// Iterates over keys usable for signature verification.
    pub fn signing_keys(&self) -> impl Iterator<Item = &JsonWebKey> {
        self.keys.iter().filter(|k| k.is_signing_key())
    }
}

/// JSON Web Key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsonWebKey {
    /// Key type (e.g., "RSA", "EC").
    pub kty: KeyType,

    /// Public key use ("sig" for signature, "enc" for encryption).
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,

    /// Key operations (sign, verify, encrypt, decrypt, etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,

    /// Algorithm intended for use with the key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,

    /// Key ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,

    /// X.509 certificate chain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,

    // === RSA Key Parameters ===
    /// RSA modulus (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,

    /// RSA exponent (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,

    // === EC / OKP Key Parameters ===
    /// Curve name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<EcCurve>,

    /// EC x coordinate, or the OKP public key (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,

    /// EC y coordinate (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,

    // === Symmetric Key Parameters ===
    /// Symmetric key value (base64url encoded).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
}

impl JsonWebKey {
    const fn empty(kty: KeyType) -> Self {
        Self {
            kty,
            key_use: None,
            key_ops: None,
            alg: None,
            kid: None,
            x5c: None,
            n: None,
            e: None,
            crv: None,
            x: None,
            y: None,
            k: None,
        }
    }

    /// Creates an RSA public key.
    #[must_use]
    pub fn rsa_public(kid: impl Into<String>, modulus: &[u8], exponent: &[u8]) -> Self {
        Self {
            key_use: Some("sig".to_string()),
            kid: Some(kid.into()),
            n: Some(URL_SAFE_NO_PAD.encode(modulus)),
            e: Some(URL_SAFE_NO_PAD.encode(exponent)),
            ..Self::empty(KeyType::Rsa)
        }
    }

    /// Creates an EC public key.
    #[must_use]
    pub fn ec_public(kid: impl Into<String>, curve: EcCurve, x: &[u8], y: &[u8]) -> Self {
        Self {
            key_use: Some("sig".to_string()),
            kid: Some(kid.into()),
            crv: Some(curve),
            x: Some(URL_SAFE_NO_PAD.encode(x)),
            y: Some(URL_SAFE_NO_PAD.encode(y)),
            ..Self::empty(KeyType::Ec)
        }
    }

    /// Creates a symmetric signing key bound to one HMAC algorithm.
    #[must_use]
    pub fn symmetric(algorithm: HmacAlgorithm, secret: &[u8]) -> Self {
        Self {
            key_use: Some("sig".to_string()),
            alg: Some(algorithm.jwa_name().to_string()),
            k: Some(URL_SAFE_NO_PAD.encode(secret)),
            ..Self::empty(KeyType::Oct)
        }
    }

    /// Sets the intended algorithm.
    #[must_use]
    pub fn with_alg(mut self, alg: impl Into<String>) -> Self {
        self.alg = Some(alg.into());
        self
    }

    /// Checks if this is an RSA key.
    #[must_use]
    pub const fn is_rsa(&self) -> bool {
        matches!(self.kty, KeyType::Rsa)
    }

    /// Checks if this is an EC key.
    #[must_use]
    pub const fn is_ec(&self) -> bool {
        matches!(self.kty, KeyType::Ec)
    }

    /// Checks if this key is for signing.
    #[must_use]
    pub fn is_signing_key(&self) -> bool {
        self.key_use.as_deref() == Some("sig") || self.key_use.is_none()
    }

    /// Returns the key ID if present.
    #[must_use]
    pub fn key_id(&self) -> Option<&str> {
        self.kid.as_deref()
    }

    /// Returns the algorithm if present.
    #[must_use]
    pub fn algorithm(&self) -> Option<&str> {
        self.alg.as_deref()
    }

    /// Returns the decoded RSA modulus and exponent.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not an RSA key or a component is missing
    /// or malformed.
    pub fn rsa_components(&self) -> Result<(Vec<u8>, Vec<u8>), JwkError> {
        if !self.is_rsa() {
            return Err(JwkError::WrongKeyType(self.kty));
        }
        let n = decode_param(self.n.as_deref(), "n")?;
        let e = decode_param(self.e.as_deref(), "e")?;
        Ok((n, e))
    }

    /// Returns the curve and decoded coordinates of an EC key.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not an EC key or a component is missing
    /// or malformed.
    pub fn ec_coordinates(&self) -> Result<(EcCurve, Vec<u8>, Vec<u8>), JwkError> {
        if !self.is_ec() {
            return Err(JwkError::WrongKeyType(self.kty));
        }
        let crv = self.crv.ok_or(JwkError::MissingParameter("crv"))?;
        let x = decode_param(self.x.as_deref(), "x")?;
        let y = decode_param(self.y.as_deref(), "y")?;
        Ok((crv, x, y))
    }

    /// Returns the decoded symmetric key value.
    ///
    /// # Errors
    ///
    /// Returns an error if this is not an `oct` key or `k` is missing or
    /// malformed.
    pub fn symmetric_key(&self) -> Result<Vec<u8>, JwkError> {
        if self.kty != KeyType::Oct {
            return Err(JwkError::WrongKeyType(self.kty));
        }
        decode_param(self.k.as_deref(), "k")
    }
}

fn decode_param(value: Option<&str>, name: &'static str) -> Result<Vec<u8>, JwkError> {
    let value = value.ok_or(JwkError::MissingParameter(name))?;
    URL_SAFE_NO_PAD
        .decode(value.trim_end_matches('='))
        .map_err(|_| JwkError::InvalidEncoding(name))
}

/// Key type for JWK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    /// RSA key.
    #[serde(rename = "RSA")]
    Rsa,

    /// Elliptic Curve key.
    #[serde(rename = "EC")]
    Ec,

    /// Octet sequence (symmetric key).
    #[serde(rename = "oct")]
    Oct,

    /// Octet Key Pair (Ed25519, X25519).
    #[serde(rename = "OKP")]
    Okp,
}

/// Curve names for EC and OKP keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-256 curve.
    #[serde(rename = "P-256")]
    P256,

    /// NIST P-384 curve.
    #[serde(rename = "P-384")]
    P384,

    /// NIST P-521 curve.
    #[serde(rename = "P-521")]
    P521,

    /// Edwards curve 25519 (OKP keys only).
    #[serde(rename = "Ed25519")]
    Ed25519,
}

impl EcCurve {
    /// Returns the curve name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
            Self::Ed25519 => "Ed25519",
        }
    }

    /// Returns the expected coordinate length in bytes.
    #[must_use]
    pub const fn coordinate_length(&self) -> usize {
        match self {
            Self::P256 | Self::Ed25519 => 32,
            Self::P384 => 48,
            Self::P521 => 66,
        }
    }
}
