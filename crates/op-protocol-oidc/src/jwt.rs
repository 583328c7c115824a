//! JWT validation against lazily resolved verification keys.
//!
//! Signature verification is delegated to `jsonwebtoken`; lifetime,
//! issuer and audience are checked here against the injected clock so
//! tests can move time.

use std::sync::Arc;

use chrono::Duration;
use futures::TryStreamExt;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, Header, Validation};
use op_cache::{CacheError, JsonWebTokenStatus, TokenRegistry};
use op_core::Clock;
use op_crypto::{EcCurve, JsonWebKey, KeyType};
use op_storage::{KeyStream, StorageError};
use thiserror::Error;

use crate::claims::JwtClaims;

/// JWT validation failures.
#[derive(Debug, Error)]
pub enum JwtError {
    /// The token is not a well-formed JWT.
    #[error("malformed token: {0}")]
    Malformed(String),

    /// No candidate key verified the signature.
    #[error("no key verified the token signature")]
    NoMatchingKey,

    /// A required claim is absent.
    #[error("missing '{0}' claim")]
    MissingClaim(&'static str),

    /// `iss` differs from the expected issuer.
    #[error("unexpected issuer")]
    InvalidIssuer,

    /// `aud` does not contain the expected audience.
    #[error("audience does not contain '{0}'")]
    InvalidAudience(String),

    /// `exp` is in the past.
    #[error("token has expired")]
    Expired,

    /// `nbf` is in the future.
    #[error("token is not yet valid")]
    NotYetValid,

    /// `jti` was already used.
    #[error("token has already been used")]
    Replayed,

    /// Key enumeration failed.
    #[error("key lookup failed: {0}")]
    Keys(#[from] StorageError),

    /// Replay registry failed.
    #[error("token registry failed: {0}")]
    Registry(#[from] CacheError),
}

impl JwtError {
    /// Checks if the failure is a collaborator fault rather than a bad token.
    #[must_use]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Keys(_) | Self::Registry(_))
    }
}

/// What a token must satisfy beyond its signature.
#[derive(Debug, Clone)]
pub struct JwtExpectations {
    /// Required `iss` value.
    pub issuer: Option<String>,
    /// Value `aud` must contain.
    pub audience: Option<String>,
    /// Whether `exp` is required and `exp`/`nbf` are checked.
    pub validate_lifetime: bool,
}

impl JwtExpectations {
    /// Expects a signed, unexpired token and nothing else.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            issuer: None,
            audience: None,
            validate_lifetime: true,
        }
    }

    /// Requires an issuer.
    #[must_use]
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Requires an audience.
    #[must_use]
    pub fn audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Skips the lifetime checks.
    #[must_use]
    pub const fn without_lifetime(mut self) -> Self {
        self.validate_lifetime = false;
        self
    }
}

impl Default for JwtExpectations {
    fn default() -> Self {
        Self::new()
    }
}

/// A token whose signature and claims passed validation.
#[derive(Debug, Clone)]
pub struct ValidatedJwt {
    /// Token header.
    pub header: Header,
    /// Token claims.
    pub claims: JwtClaims,
    /// `kid` of the key that verified the signature.
    pub key_id: Option<String>,
}

/// Validates JWTs presented by clients.
pub struct JwtValidator {
    clock: Arc<dyn Clock>,
    token_registry: Arc<dyn TokenRegistry>,
    clock_skew: Duration,
}

impl JwtValidator {
    /// Creates a validator.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock>,
        token_registry: Arc<dyn TokenRegistry>,
        clock_skew: std::time::Duration,
    ) -> Self {
        Self {
            clock,
            token_registry,
            clock_skew: Duration::from_std(clock_skew).unwrap_or(Duration::zero()),
        }
    }

    /// Decodes the claims without verifying the signature.
    ///
    /// Only for learning who claims to have signed the token.
    ///
    /// # Errors
    ///
    /// Returns [`JwtError::Malformed`] if the token cannot be decoded.
    pub fn peek(token: &str) -> Result<JwtClaims, JwtError> {
        let header =
            jsonwebtoken::decode_header(token).map_err(|e| JwtError::Malformed(e.to_string()))?;
        let mut validation = relaxed_validation(header.alg);
        validation.insecure_disable_signature_validation();
        jsonwebtoken::decode::<JwtClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|e| JwtError::Malformed(e.to_string()))
    }

    /// Verifies a token against candidate keys and checks its claims.
    ///
    /// Keys are pulled one at a time; keys whose declared `alg` or type
    /// cannot produce the header's algorithm are skipped, and pulling
    /// stops at the first key that verifies the signature.
    ///
    /// # Errors
    ///
    /// Returns a [`JwtError`] describing the first failed check.
    pub async fn verify(
        &self,
        token: &str,
        mut keys: KeyStream<'_>,
        expectations: &JwtExpectations,
    ) -> Result<ValidatedJwt, JwtError> {
        let header =
            jsonwebtoken::decode_header(token).map_err(|e| JwtError::Malformed(e.to_string()))?;
        let validation = relaxed_validation(header.alg);

        let mut verified = None;
        while let Some(jwk) = keys.try_next().await? {
            if !key_supports(&jwk, header.alg) {
                continue;
            }
            let Some(decoding_key) = decoding_key(&jwk) else {
                tracing::debug!(kid = ?jwk.kid, "skipping unusable key");
                continue;
            };
            match jsonwebtoken::decode::<JwtClaims>(token, &decoding_key, &validation) {
                Ok(data) => {
                    verified = Some((data.claims, jwk.kid));
                    break;
                }
                Err(e) if is_key_mismatch(e.kind()) => {}
                Err(e) => return Err(JwtError::Malformed(e.to_string())),
            }
        }
        let Some((claims, key_id)) = verified else {
            return Err(JwtError::NoMatchingKey);
        };

        self.check_claims(&claims, expectations).await?;

        Ok(ValidatedJwt {
            header,
            claims,
            key_id,
        })
    }

    async fn check_claims(
        &self,
        claims: &JwtClaims,
        expectations: &JwtExpectations,
    ) -> Result<(), JwtError> {
        if let Some(issuer) = &expectations.issuer
            && claims.iss.as_ref() != Some(issuer)
        {
            return Err(JwtError::InvalidIssuer);
        }

        if let Some(audience) = &expectations.audience
            && !claims.has_audience(audience)
        {
            return Err(JwtError::InvalidAudience(audience.clone()));
        }

        if expectations.validate_lifetime {
            let now = self.clock.now();
            let expires_at = claims.expires_at().ok_or(JwtError::MissingClaim("exp"))?;
            // Past the representable range counts as never expiring.
            if expires_at
                .checked_add_signed(self.clock_skew)
                .is_some_and(|deadline| now >= deadline)
            {
                return Err(JwtError::Expired);
            }
            if let Some(not_before) = claims.not_before()
                && now
                    .checked_add_signed(self.clock_skew)
                    .is_some_and(|skewed| skewed < not_before)
            {
                return Err(JwtError::NotYetValid);
            }
        }

        if let Some(jti) = &claims.jti
            && self.token_registry.get_status(jti).await? == Some(JsonWebTokenStatus::Used)
        {
            return Err(JwtError::Replayed);
        }

        Ok(())
    }
}

impl std::fmt::Debug for JwtValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtValidator")
            .field("clock_skew", &self.clock_skew)
            .finish_non_exhaustive()
    }
}

/// Signature-only validation; registered claims are checked by the caller.
fn relaxed_validation(alg: Algorithm) -> Validation {
    let mut validation = Validation::new(alg);
    validation.validate_exp = false;
    validation.validate_nbf = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();
    validation
}

fn is_key_mismatch(kind: &ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidKeyFormat
            | ErrorKind::InvalidRsaKey(_)
            | ErrorKind::InvalidEcdsaKey
    )
}

/// Checks whether a key can verify signatures of `alg`.
fn key_supports(jwk: &JsonWebKey, alg: Algorithm) -> bool {
    if let Some(declared) = jwk.algorithm()
        && declared != algorithm_name(alg)
    {
        return false;
    }
    match alg {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => jwk.kty == KeyType::Oct,
        Algorithm::RS256
        | Algorithm::RS384
        | Algorithm::RS512
        | Algorithm::PS256
        | Algorithm::PS384
        | Algorithm::PS512 => jwk.kty == KeyType::Rsa,
        Algorithm::ES256 => jwk.kty == KeyType::Ec && jwk.crv == Some(EcCurve::P256),
        Algorithm::ES384 => jwk.kty == KeyType::Ec && jwk.crv == Some(EcCurve::P384),
        Algorithm::EdDSA => jwk.kty == KeyType::Okp && jwk.crv == Some(EcCurve::Ed25519),
    }
}

/// Builds a `jsonwebtoken` key from a JWK.
fn decoding_key(jwk: &JsonWebKey) -> Option<DecodingKey> {
    match jwk.kty {
        KeyType::Rsa => {
            DecodingKey::from_rsa_components(jwk.n.as_deref()?, jwk.e.as_deref()?).ok()
        }
        KeyType::Ec => DecodingKey::from_ec_components(jwk.x.as_deref()?, jwk.y.as_deref()?).ok(),
        KeyType::Okp => DecodingKey::from_ed_components(jwk.x.as_deref()?).ok(),
        KeyType::Oct => jwk
            .symmetric_key()
            .ok()
            .map(|secret| DecodingKey::from_secret(&secret)),
    }
}

/// Returns the JWA name of an algorithm.
#[must_use]
pub const fn algorithm_name(alg: Algorithm) -> &'static str {
    match alg {
        Algorithm::HS256 => "HS256",
        Algorithm::HS384 => "HS384",
        Algorithm::HS512 => "HS512",
        Algorithm::RS256 => "RS256",
        Algorithm::RS384 => "RS384",
        Algorithm::RS512 => "RS512",
        Algorithm::PS256 => "PS256",
        Algorithm::PS384 => "PS384",
        Algorithm::PS512 => "PS512",
        Algorithm::ES256 => "ES256",
        Algorithm::ES384 => "ES384",
        Algorithm::EdDSA => "EdDSA",
    }
}
