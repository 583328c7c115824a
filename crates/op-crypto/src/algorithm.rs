//! Cryptographic algorithm definitions.
//!
//! - Hash: SHA-256, SHA-512 (client secret storage)
//! - HMAC: HS256, HS384, HS512 (`client_secret_jwt` assertions)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for algorithm operations.
#[derive(Debug, Error)]
pub enum AlgorithmError {
    /// Unknown algorithm.
    #[error("unknown algorithm: {0}")]
    Unknown(String),
}

/// Hash algorithms used to store client secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    /// SHA-256.
    #[serde(rename = "SHA256")]
    Sha256,

    /// SHA-512.
    #[serde(rename = "SHA512")]
    Sha512,
}

impl HashAlgorithm {
    /// Returns the output length in bytes.
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha512 => 64,
        }
    }

    /// Returns the algorithm name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha256 => "SHA-256",
            Self::Sha512 => "SHA-512",
        }
    }
}

/// HMAC signature algorithms, one per supported key strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HmacAlgorithm {
    /// HMAC with SHA-256.
    #[serde(rename = "HS256")]
    Hs256,

    /// HMAC with SHA-384.
    #[serde(rename = "HS384")]
    Hs384,

    /// HMAC with SHA-512.
    #[serde(rename = "HS512")]
    Hs512,
}

impl HmacAlgorithm {
    /// All strengths, weakest first.
    pub const ALL: [Self; 3] = [Self::Hs256, Self::Hs384, Self::Hs512];

    /// Returns the JWA algorithm name.
    #[must_use]
    pub const fn jwa_name(self) -> &'static str {
        match self {
            Self::Hs256 => "HS256",
            Self::Hs384 => "HS384",
            Self::Hs512 => "HS512",
        }
    }

    /// Returns the key strength in bits.
    #[must_use]
    pub const fn key_size_bits(self) -> u32 {
        match self {
            Self::Hs256 => 256,
            Self::Hs384 => 384,
            Self::Hs512 => 512,
        }
    }

    /// Parses a JWA algorithm name.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is not an HMAC algorithm.
    pub fn from_jwa(name: &str) -> Result<Self, AlgorithmError> {
        match name {
            "HS256" => Ok(Self::Hs256),
            "HS384" => Ok(Self::Hs384),
            "HS512" => Ok(Self::Hs512),
            _ => Err(AlgorithmError::Unknown(name.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_output_lengths() {
        assert_eq!(HashAlgorithm::Sha256.output_len(), 32);
        assert_eq!(HashAlgorithm::Sha512.output_len(), 64);
    }

    #[test]
    fn hmac_names_round_trip() {
        for alg in HmacAlgorithm::ALL {
            assert_eq!(HmacAlgorithm::from_jwa(alg.jwa_name()).unwrap(), alg);
        }
    }

    #[test]
    fn asymmetric_name_is_not_hmac() {
        let result = HmacAlgorithm::from_jwa("RS256");
        assert!(matches!(result, Err(AlgorithmError::Unknown(_))));
    }

    #[test]
    fn hmac_strengths_ascend() {
        let bits: Vec<u32> = HmacAlgorithm::ALL
            .iter()
            .map(|alg| alg.key_size_bits())
            .collect();
        assert_eq!(bits, vec![256, 384, 512]);
    }
}
