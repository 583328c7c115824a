//! Reading the parts of a client certificate that bind it to a client.
//!
//! The TLS layer has already verified possession of the private key;
//! nothing here validates the chain.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use op_crypto::{EcCurve, JsonWebKey, KeyType};
use x509_parser::prelude::*;

const OID_P256: &str = "1.2.840.10045.3.1.7";
const OID_P384: &str = "1.3.132.0.34";
const OID_P521: &str = "1.3.132.0.35";

/// Public key of a client certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum CertificateKey {
    Rsa { modulus: Vec<u8>, exponent: Vec<u8> },
    Ec { curve: EcCurve, x: Vec<u8>, y: Vec<u8> },
    Unsupported,
}

impl CertificateKey {
    /// Checks whether a JWK holds the same public key.
    pub(super) fn matches(&self, jwk: &JsonWebKey) -> bool {
        match (self, jwk.kty) {
            (Self::Rsa { modulus, exponent }, KeyType::Rsa) => {
                jwk.rsa_components().is_ok_and(|(n, e)| {
                    strip_leading_zeros(modulus) == strip_leading_zeros(&n)
                        && strip_leading_zeros(exponent) == strip_leading_zeros(&e)
                })
            }
            (Self::Ec { curve, x, y }, KeyType::Ec) => jwk
                .ec_coordinates()
                .is_ok_and(|(crv, jx, jy)| crv == *curve && jx == *x && jy == *y),
            _ => false,
        }
    }
}

/// Subject alternative name entries of interest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum SubjectAltName {
    Dns(String),
    Uri(String),
    Email(String),
    Ip(IpAddr),
}

/// A parsed client certificate.
#[derive(Debug, Clone)]
pub(super) struct PresentedCertificate {
    pub(super) subject_dn: String,
    pub(super) subject_alt_names: Vec<SubjectAltName>,
    pub(super) public_key: CertificateKey,
}

/// Parses a DER certificate. Returns `None` if it is not X.509.
pub(super) fn parse_certificate(der: &[u8]) -> Option<PresentedCertificate> {
    let (_, cert) = match X509Certificate::from_der(der) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = ?e, "failed to parse client certificate");
            return None;
        }
    };

    let mut subject_alt_names = Vec::new();
    if let Ok(Some(san_ext)) = cert.subject_alternative_name() {
        for name in &san_ext.value.general_names {
            match name {
                GeneralName::DNSName(dns) => subject_alt_names.push(SubjectAltName::Dns((*dns).to_string())),
                GeneralName::URI(uri) => subject_alt_names.push(SubjectAltName::Uri((*uri).to_string())),
                GeneralName::RFC822Name(email) => {
                    subject_alt_names.push(SubjectAltName::Email((*email).to_string()));
                }
                GeneralName::IPAddress(bytes) => {
                    if let Some(ip) = ip_from_bytes(bytes) {
                        subject_alt_names.push(SubjectAltName::Ip(ip));
                    }
                }
                _ => {}
            }
        }
    }

    Some(PresentedCertificate {
        subject_dn: cert.subject().to_string(),
        subject_alt_names,
        public_key: certificate_key(cert.public_key()),
    })
}

fn certificate_key(spki: &SubjectPublicKeyInfo<'_>) -> CertificateKey {
    match spki.parsed() {
        Ok(x509_parser::public_key::PublicKey::RSA(rsa)) => CertificateKey::Rsa {
            modulus: rsa.modulus.to_vec(),
            exponent: rsa.exponent.to_vec(),
        },
        Ok(x509_parser::public_key::PublicKey::EC(point)) => {
            let Some(curve) = spki
                .algorithm
                .parameters
                .as_ref()
                .and_then(|params| params.as_oid().ok())
                .and_then(|oid| curve_from_oid(&oid.to_id_string()))
            else {
                return CertificateKey::Unsupported;
            };
            split_uncompressed_point(point.data(), curve)
                .map_or(CertificateKey::Unsupported, |(x, y)| CertificateKey::Ec {
                    curve,
                    x,
                    y,
                })
        }
        _ => CertificateKey::Unsupported,
    }
}

fn curve_from_oid(oid: &str) -> Option<EcCurve> {
    match oid {
        OID_P256 => Some(EcCurve::P256),
        OID_P384 => Some(EcCurve::P384),
        OID_P521 => Some(EcCurve::P521),
        _ => None,
    }
}

/// Splits `04 || X || Y` into coordinates.
fn split_uncompressed_point(data: &[u8], curve: EcCurve) -> Option<(Vec<u8>, Vec<u8>)> {
    let len = curve.coordinate_length();
    match data.split_first() {
        Some((0x04, rest)) if rest.len() == 2 * len => {
            let (x, y) = rest.split_at(len);
            Some((x.to_vec(), y.to_vec()))
        }
        _ => None,
    }
}

fn ip_from_bytes(bytes: &[u8]) -> Option<IpAddr> {
    match bytes.len() {
        4 => <[u8; 4]>::try_from(bytes).ok().map(|b| IpAddr::V4(Ipv4Addr::from(b))),
        16 => <[u8; 16]>::try_from(bytes).ok().map(|b| IpAddr::V6(Ipv6Addr::from(b))),
        _ => None,
    }
}

fn strip_leading_zeros(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|&b| b != 0).unwrap_or(bytes.len());
    &bytes[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rsa_comparison_ignores_der_sign_byte() {
        let key = CertificateKey::Rsa {
            modulus: vec![0x00, 0xc3, 0x01],
            exponent: vec![0x01, 0x00, 0x01],
        };

        assert!(key.matches(&JsonWebKey::rsa_public("k", &[0xc3, 0x01], &[1, 0, 1])));
        assert!(!key.matches(&JsonWebKey::rsa_public("k", &[0xc3, 0x02], &[1, 0, 1])));
    }

    #[test]
    fn ec_comparison_includes_curve() {
        let key = CertificateKey::Ec {
            curve: EcCurve::P256,
            x: vec![1; 32],
            y: vec![2; 32],
        };

        assert!(key.matches(&JsonWebKey::ec_public("k", EcCurve::P256, &[1; 32], &[2; 32])));
        assert!(!key.matches(&JsonWebKey::ec_public("k", EcCurve::P384, &[1; 32], &[2; 32])));
        assert!(!key.matches(&JsonWebKey::rsa_public("k", &[1; 32], &[1, 0, 1])));
    }

    #[test]
    fn unsupported_key_never_matches() {
        let jwk = JsonWebKey::rsa_public("k", &[1], &[1, 0, 1]);
        assert!(!CertificateKey::Unsupported.matches(&jwk));
    }

    #[test]
    fn only_uncompressed_points_split() {
        let mut point = vec![0x04];
        point.extend([7; 64]);
        assert!(split_uncompressed_point(&point, EcCurve::P256).is_some());

        point[0] = 0x02;
        assert!(split_uncompressed_point(&point, EcCurve::P256).is_none());
    }

    #[test]
    fn garbage_is_not_a_certificate() {
        assert!(parse_certificate(b"not a certificate").is_none());
    }
}
