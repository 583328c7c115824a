//! Common test utilities and fixtures.

use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use op_core::{FixedClock, ProviderConfig};
use op_crypto::JsonWebKey;
use op_model::ClientInfo;
use op_protocol_oidc::{JwtClaims, ProviderServices};
use op_storage::InMemoryClientStore;

pub const ISSUER: &str = "https://op.example.com";

pub const RSA_KEY: &[u8] = include_bytes!("../fixtures/rsa_key.pem");
pub const EC_KEY: &[u8] = include_bytes!("../fixtures/ec_key.pem");
pub const ED_KEY: &[u8] = include_bytes!("../fixtures/ed_key.pem");

pub const RSA_CERT: &[u8] = include_bytes!("../fixtures/rsa_cert.pem");
pub const EC_CERT: &[u8] = include_bytes!("../fixtures/ec_cert.pem");
pub const ED_CERT: &[u8] = include_bytes!("../fixtures/ed_cert.pem");

/// Initializes tracing once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "op_protocol_oidc=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

fn jwk(json: &str) -> anyhow::Result<JsonWebKey> {
    Ok(serde_json::from_str(json)?)
}

/// Public half of `rsa_key.pem` and `rsa_cert.pem`.
pub fn rsa_jwk() -> anyhow::Result<JsonWebKey> {
    jwk(include_str!("../fixtures/rsa_jwk.json"))
}

/// An unrelated RSA key.
pub fn rsa_other_jwk() -> anyhow::Result<JsonWebKey> {
    jwk(include_str!("../fixtures/rsa_other_jwk.json"))
}

/// Public half of `ec_key.pem` and `ec_cert.pem` (P-256).
pub fn ec_jwk() -> anyhow::Result<JsonWebKey> {
    jwk(include_str!("../fixtures/ec_jwk.json"))
}

/// Public half of `ed_key.pem` and `ed_cert.pem`.
pub fn ed_jwk() -> anyhow::Result<JsonWebKey> {
    jwk(include_str!("../fixtures/ed_jwk.json"))
}

/// DER body of a PEM certificate.
pub fn cert_der(pem: &[u8]) -> anyhow::Result<Vec<u8>> {
    let (_, pem) = x509_parser::pem::parse_x509_pem(pem)
        .map_err(|e| anyhow::anyhow!("invalid PEM: {e:?}"))?;
    Ok(pem.contents)
}

/// Services over an in-memory client store, with a frozen clock.
pub fn services(clients: Vec<ClientInfo>) -> (Arc<FixedClock>, ProviderServices) {
    init_tracing();
    let store = clients
        .into_iter()
        .fold(InMemoryClientStore::new(), InMemoryClientStore::with_client);
    let clock = Arc::new(FixedClock::new(Utc::now()));
    let services = ProviderServices::new(ProviderConfig::new(ISSUER), Arc::new(store))
        .with_clock(clock.clone());
    (clock, services)
}

/// Claims of a client assertion for `client_id`, valid for one minute.
pub fn assertion_claims(services: &ProviderServices, client_id: &str, jti: &str) -> JwtClaims {
    JwtClaims::new()
        .with_issuer(client_id)
        .with_subject(client_id)
        .with_audience(services.config.token_endpoint.as_str())
        .with_issued_at(services.clock.now())
        .with_expiry(services.clock.now() + Duration::minutes(1))
        .with_jwt_id(jti)
}

/// Signs claims with a PKCS#8 private key.
pub fn sign(claims: &JwtClaims, alg: Algorithm, pem: &[u8]) -> anyhow::Result<String> {
    let key = match alg {
        Algorithm::ES256 | Algorithm::ES384 => EncodingKey::from_ec_pem(pem)?,
        Algorithm::EdDSA => EncodingKey::from_ed_pem(pem)?,
        _ => EncodingKey::from_rsa_pem(pem)?,
    };
    Ok(jsonwebtoken::encode(&Header::new(alg), claims, &key)?)
}
