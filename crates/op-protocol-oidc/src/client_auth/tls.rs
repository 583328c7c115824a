//! `tls_client_auth` (RFC 8705 Section 2.1).
//!
//! The certificate chain was validated by the TLS terminator. The client is
//! bound to the certificate by its subject DN or one subject alternative
//! name registered in [`TlsClientAuthSettings`].

use std::net::IpAddr;

use async_trait::async_trait;
use op_model::{ClientAuthMethod, ClientInfo, TlsClientAuthSettings};

use super::ClientAuthenticator;
use super::certificate::{PresentedCertificate, SubjectAltName, parse_certificate};
use super::request::ClientRequest;
use crate::error::OidcResult;
use crate::services::ProviderServices;

const METHOD: ClientAuthMethod = ClientAuthMethod::TlsClientAuth;

/// Authenticates clients by a PKI certificate bound by subject or SAN.
#[derive(Debug, Clone)]
pub struct TlsClientAuthenticator {
    services: ProviderServices,
}

impl TlsClientAuthenticator {
    /// Creates the authenticator.
    #[must_use]
    pub fn new(services: ProviderServices) -> Self {
        Self { services }
    }
}

#[async_trait]
impl ClientAuthenticator for TlsClientAuthenticator {
    fn authentication_methods(&self) -> Vec<ClientAuthMethod> {
        vec![METHOD]
    }

    async fn try_authenticate(&self, request: &ClientRequest) -> OidcResult<Option<ClientInfo>> {
        let (Some(der), Some(client_id)) = (request.client_certificate.as_deref(), request.client_id())
        else {
            return Ok(None);
        };

        let Some(client) = self.services.clients.find_client(client_id).await? else {
            tracing::debug!(client_id, method = %METHOD, "unknown client");
            return Ok(None);
        };
        if client.token_endpoint_auth_method != METHOD {
            return Ok(None);
        }

        let Some(certificate) = parse_certificate(der) else {
            return Ok(None);
        };

        if certificate_is_bound(&certificate, &client.tls_client_auth) {
            Ok(Some(client))
        } else {
            tracing::debug!(
                client_id,
                method = %METHOD,
                subject = %certificate.subject_dn,
                "certificate does not match registered subject or SAN"
            );
            Ok(None)
        }
    }
}

fn certificate_is_bound(certificate: &PresentedCertificate, settings: &TlsClientAuthSettings) -> bool {
    if let Some(expected) = settings.subject_dn.as_deref()
        && normalize_dn(expected) == normalize_dn(&certificate.subject_dn)
    {
        return true;
    }

    let registered_ip = settings
        .san_ip
        .as_deref()
        .and_then(|ip| ip.trim().parse::<IpAddr>().ok());

    certificate.subject_alt_names.iter().any(|san| match san {
        SubjectAltName::Dns(dns) => settings.san_dns.as_deref() == Some(dns.as_str()),
        SubjectAltName::Uri(uri) => settings.san_uri.as_deref() == Some(uri.as_str()),
        SubjectAltName::Email(email) => settings.san_email.as_deref() == Some(email.as_str()),
        SubjectAltName::Ip(ip) => registered_ip == Some(*ip),
    })
}

/// Canonical form of a distinguished name: attribute types uppercased,
/// whitespace around separators dropped, RDNs sorted.
fn normalize_dn(dn: &str) -> Vec<String> {
    let mut rdns: Vec<String> = dn
        .split(',')
        .map(str::trim)
        .filter(|rdn| !rdn.is_empty())
        .map(|rdn| match rdn.split_once('=') {
            Some((kind, value)) => format!("{}={}", kind.trim().to_ascii_uppercase(), value.trim()),
            None => rdn.to_string(),
        })
        .collect();
    rdns.sort();
    rdns
}
