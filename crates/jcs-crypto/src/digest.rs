//! # Content Digest — Algorithm-Tagged Hashes of Canonical Bytes
//!
//! Defines [`ContentDigest`] and [`DigestAlgorithm`] and computes digests
//! with the `sha2` family.
//!
//! ## Security Invariant
//!
//! [`digest()`] accepts only `&CanonicalBytes`, not raw `&[u8]`. The only
//! way to obtain `CanonicalBytes` is the RFC 8785 pipeline in `jcs-core`,
//! so every digest produced here was computed over the one canonical form
//! of its value.

use std::fmt;
use std::str::FromStr;

use jcs_core::CanonicalBytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

use crate::error::CryptoError;

/// The hash algorithm used to produce a content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DigestAlgorithm {
    /// SHA-224 (28-byte digest).
    Sha224,
    /// SHA-256 (32-byte digest). The default for content addressing.
    Sha256,
    /// SHA-384 (48-byte digest).
    Sha384,
    /// SHA-512 (64-byte digest).
    Sha512,
}

impl DigestAlgorithm {
    /// Returns the algorithm identifier string used in digest prefixes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Digest length in bytes.
    pub fn output_len(&self) -> usize {
        match self {
            Self::Sha224 => 28,
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }
}

impl fmt::Display for DigestAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DigestAlgorithm {
    type Err = CryptoError;

    /// Case-insensitive; `-` and `_` are ignored, so `SHA-256`, `sha256`
    /// and `Sha_256` all name the same algorithm.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "sha224" => Ok(Self::Sha224),
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            _ => Err(CryptoError::UnsupportedAlgorithm(s.to_owned())),
        }
    }
}

/// A content digest with its algorithm tag.
///
/// The digest bytes and algorithm together form a self-describing content
/// identifier, displayed as `<algorithm>:<hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The hash algorithm that produced this digest.
    pub algorithm: DigestAlgorithm,
    /// The raw digest value; its length is `algorithm.output_len()`.
    pub bytes: Vec<u8>,
}

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.algorithm, self.to_hex())
    }
}

/// Compute a content digest from canonical bytes.
pub fn digest(data: &CanonicalBytes, algorithm: DigestAlgorithm) -> ContentDigest {
    let input = data.as_bytes();
    let bytes = match algorithm {
        DigestAlgorithm::Sha224 => Sha224::digest(input).to_vec(),
        DigestAlgorithm::Sha256 => Sha256::digest(input).to_vec(),
        DigestAlgorithm::Sha384 => Sha384::digest(input).to_vec(),
        DigestAlgorithm::Sha512 => Sha512::digest(input).to_vec(),
    };
    ContentDigest { algorithm, bytes }
}

/// Compute a SHA-256 content digest from canonical bytes.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    digest(data, DigestAlgorithm::Sha256)
}
