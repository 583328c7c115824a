//! # op-crypto
//!
//! Cryptographic helpers for the OpenID provider core using aws-lc-rs.
//!
//! - [`hash`] - SHA-256 / SHA-512 digests used to store client secrets
//! - [`compare`] - constant-time byte comparison
//! - [`algorithm`] - hash and HMAC algorithm identifiers
//! - [`jwk`] - JSON Web Key and key set types (RFC 7517)

#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(missing_docs)]

pub mod algorithm;
pub mod compare;
pub mod hash;
pub mod jwk;

pub use algorithm::{AlgorithmError, HashAlgorithm, HmacAlgorithm};
pub use compare::bytes_equal;
pub use hash::{hash, sha256, sha512};
pub use jwk::{EcCurve, JsonWebKey, JsonWebKeySet, JwkError, KeyType};
