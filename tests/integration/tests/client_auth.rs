//! Client authentication through the default composite.

use anyhow::Result;
use jsonwebtoken::Algorithm;
use op_crypto::JsonWebKeySet;
use op_model::{ClientAuthMethod, ClientInfo, TlsClientAuthSettings};
use op_protocol_oidc::client_auth::ClientAuthenticator;
use op_protocol_oidc::{ClientRequest, CompositeClientAuthenticator};

use crate::common::{
    EC_CERT, EC_KEY, ED_CERT, ED_KEY, RSA_CERT, RSA_KEY, assertion_claims, cert_der, ec_jwk,
    ed_jwk, rsa_jwk, rsa_other_jwk, services, sign,
};

fn keyed_client(id: &str, method: ClientAuthMethod, keys: JsonWebKeySet) -> ClientInfo {
    ClientInfo::new(id).with_auth_method(method).with_jwks(keys)
}

// ============================================================================
// private_key_jwt
// ============================================================================

#[tokio::test]
async fn private_key_jwt_rsa_skips_unrelated_keys() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![rsa_other_jwk()?, rsa_jwk()?]);
    let (_, services) = services(vec![keyed_client("rsa-app", ClientAuthMethod::PrivateKeyJwt, keys)]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let token = sign(&assertion_claims(&services, "rsa-app", "a-1"), Algorithm::RS256, RSA_KEY)?;
    let client = composite
        .try_authenticate(&ClientRequest::new().with_jwt_assertion(token))
        .await?;

    assert_eq!(client.map(|c| c.client_id).as_deref(), Some("rsa-app"));
    Ok(())
}

#[tokio::test]
async fn private_key_jwt_ec() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![ec_jwk()?]);
    let (_, services) = services(vec![keyed_client("ec-app", ClientAuthMethod::PrivateKeyJwt, keys)]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let token = sign(&assertion_claims(&services, "ec-app", "a-1"), Algorithm::ES256, EC_KEY)?;
    let request = ClientRequest::new()
        .with_client_id("ec-app")
        .with_jwt_assertion(token);

    assert!(composite.try_authenticate(&request).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn private_key_jwt_accepts_key_registered_for_encryption() -> Result<()> {
    let mut key = rsa_jwk()?;
    key.key_use = Some("enc".to_string());
    let keys = JsonWebKeySet::with_keys(vec![key]);
    let (_, services) = services(vec![keyed_client("rsa-app", ClientAuthMethod::PrivateKeyJwt, keys)]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let token = sign(&assertion_claims(&services, "rsa-app", "a-1"), Algorithm::RS256, RSA_KEY)?;
    let request = ClientRequest::new().with_jwt_assertion(token);

    assert!(composite.try_authenticate(&request).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn private_key_jwt_replay_is_rejected() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![rsa_jwk()?]);
    let (_, services) = services(vec![keyed_client("rsa-app", ClientAuthMethod::PrivateKeyJwt, keys)]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let token = sign(&assertion_claims(&services, "rsa-app", "once"), Algorithm::RS256, RSA_KEY)?;
    let request = ClientRequest::new().with_jwt_assertion(token);

    assert!(composite.try_authenticate(&request).await?.is_some());
    assert!(composite.try_authenticate(&request).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn private_key_jwt_signed_with_unregistered_key_is_rejected() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![rsa_other_jwk()?]);
    let (_, services) = services(vec![keyed_client("rsa-app", ClientAuthMethod::PrivateKeyJwt, keys)]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let token = sign(&assertion_claims(&services, "rsa-app", "a-1"), Algorithm::RS256, RSA_KEY)?;
    let request = ClientRequest::new().with_jwt_assertion(token);

    assert!(composite.try_authenticate(&request).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn expired_assertion_is_rejected() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![rsa_jwk()?]);
    let (clock, services) = services(vec![keyed_client("rsa-app", ClientAuthMethod::PrivateKeyJwt, keys)]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let token = sign(&assertion_claims(&services, "rsa-app", "a-1"), Algorithm::RS256, RSA_KEY)?;
    clock.advance(chrono::Duration::minutes(2));

    let request = ClientRequest::new().with_jwt_assertion(token);
    assert!(composite.try_authenticate(&request).await?.is_none());
    Ok(())
}

// ============================================================================
// Client secrets and public clients
// ============================================================================

#[tokio::test]
async fn secret_methods_are_not_interchangeable() -> Result<()> {
    let basic = ClientInfo::new_confidential("basic-app", ClientAuthMethod::ClientSecretBasic, "pw");
    let (_, services) = services(vec![basic]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let header = ClientRequest::new().with_basic_auth("basic-app", "pw");
    let body = ClientRequest::new()
        .with_client_id("basic-app")
        .with_client_secret("pw");

    assert!(composite.try_authenticate(&header).await?.is_some());
    assert!(composite.try_authenticate(&body).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn public_client_authenticates_by_id() -> Result<()> {
    let (_, services) = services(vec![ClientInfo::new_public("spa")]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let client = composite
        .try_authenticate(&ClientRequest::new().with_client_id("spa"))
        .await?;

    assert_eq!(client.map(|c| c.token_endpoint_auth_method), Some(ClientAuthMethod::None));
    Ok(())
}

// ============================================================================
// self_signed_tls_client_auth
// ============================================================================

async fn self_signed(client_keys: JsonWebKeySet, cert: &[u8]) -> Result<Option<ClientInfo>> {
    let client = keyed_client("mtls-app", ClientAuthMethod::SelfSignedTlsClientAuth, client_keys);
    let (_, services) = services(vec![client]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let request = ClientRequest::new()
        .with_client_id("mtls-app")
        .with_client_certificate(cert_der(cert)?);
    Ok(composite.try_authenticate(&request).await?)
}

#[tokio::test]
async fn self_signed_rsa_certificate_matches_registered_key() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![rsa_other_jwk()?, rsa_jwk()?]);
    assert!(self_signed(keys, RSA_CERT).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn self_signed_ec_certificate_matches_registered_key() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![rsa_jwk()?, ec_jwk()?]);
    assert!(self_signed(keys, EC_CERT).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn self_signed_certificate_matches_key_registered_for_encryption() -> Result<()> {
    let mut key = ec_jwk()?;
    key.key_use = Some("enc".to_string());
    assert!(self_signed(JsonWebKeySet::with_keys(vec![key]), EC_CERT).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn self_signed_certificate_with_unregistered_key_is_rejected() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![rsa_other_jwk()?, ec_jwk()?]);
    assert!(self_signed(keys, RSA_CERT).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn self_signed_ed25519_certificate_never_matches() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![ed_jwk()?]);
    assert!(self_signed(keys, ED_CERT).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn ed25519_assertion_verifies_with_okp_key() -> Result<()> {
    let keys = JsonWebKeySet::with_keys(vec![ed_jwk()?]);
    let (_, services) = services(vec![keyed_client("ed-app", ClientAuthMethod::PrivateKeyJwt, keys)]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let token = sign(&assertion_claims(&services, "ed-app", "a-1"), Algorithm::EdDSA, ED_KEY)?;
    let request = ClientRequest::new().with_jwt_assertion(token);

    assert!(composite.try_authenticate(&request).await?.is_some());
    Ok(())
}

// ============================================================================
// tls_client_auth
// ============================================================================

async fn pki(settings: TlsClientAuthSettings, cert: &[u8]) -> Result<Option<ClientInfo>> {
    let client = ClientInfo::new("pki-app")
        .with_auth_method(ClientAuthMethod::TlsClientAuth)
        .with_tls_client_auth(settings);
    let (_, services) = services(vec![client]);
    let composite = CompositeClientAuthenticator::with_defaults(&services);

    let request = ClientRequest::new()
        .with_client_id("pki-app")
        .with_client_certificate(cert_der(cert)?);
    Ok(composite.try_authenticate(&request).await?)
}

#[tokio::test]
async fn tls_client_auth_by_subject_dn() -> Result<()> {
    let matching = TlsClientAuthSettings {
        subject_dn: Some("O=Example, CN=rsa-client".to_string()),
        ..Default::default()
    };
    let other = TlsClientAuthSettings {
        subject_dn: Some("CN=ec-client, O=Example".to_string()),
        ..Default::default()
    };

    assert!(pki(matching, RSA_CERT).await?.is_some());
    assert!(pki(other, RSA_CERT).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn tls_client_auth_by_subject_alternative_name() -> Result<()> {
    let dns = TlsClientAuthSettings {
        san_dns: Some("ec-client.example.com".to_string()),
        ..Default::default()
    };
    let uri = TlsClientAuthSettings {
        san_uri: Some("https://ec-client.example.com/id".to_string()),
        ..Default::default()
    };
    let wrong_dns = TlsClientAuthSettings {
        san_dns: Some("other.example.com".to_string()),
        ..Default::default()
    };

    assert!(pki(dns, EC_CERT).await?.is_some());
    assert!(pki(uri, EC_CERT).await?.is_some());
    assert!(pki(wrong_dns, EC_CERT).await?.is_none());
    Ok(())
}
