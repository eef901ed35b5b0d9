//! # Canonical Hashing
//!
//! Canonicalize, then digest. Identical logical values always feed
//! identical bytes to the digest, whatever their original member order or
//! formatting. Algorithm *policy* (which digests a caller may accept) is
//! not decided here.

use jcs_core::{canonicalize, CanonicalBytes, JsonValue};
use serde::Serialize;

use crate::digest::{digest, ContentDigest, DigestAlgorithm};
use crate::error::CryptoError;

/// Hex characters kept by [`canonical_fingerprint`].
const FINGERPRINT_HEX_LEN: usize = 16;

/// Canonicalize `value` and return its digest under the named algorithm as
/// lower-case hex.
///
/// # Errors
///
/// Returns `CryptoError::UnsupportedAlgorithm` if `algorithm` names no
/// SHA-2 variant.
pub fn canonical_hash(value: &JsonValue, algorithm: &str) -> Result<String, CryptoError> {
    let algorithm = algorithm.parse::<DigestAlgorithm>().map_err(|e| {
        tracing::debug!(algorithm, "canonical hash requested with unsupported algorithm");
        e
    })?;
    Ok(canonical_digest(value, algorithm).to_hex())
}

/// Canonicalize `value` and return its algorithm-tagged digest.
pub fn canonical_digest(value: &JsonValue, algorithm: DigestAlgorithm) -> ContentDigest {
    digest(&canonicalize(value), algorithm)
}

/// Lower a serializable value, canonicalize it and digest it.
///
/// # Errors
///
/// Returns `CryptoError::Canonicalization` if the value cannot be lowered
/// (non-finite numbers, byte arrays, non-scalar map keys).
pub fn serializable_digest(
    obj: &impl Serialize,
    algorithm: DigestAlgorithm,
) -> Result<ContentDigest, CryptoError> {
    let canonical = CanonicalBytes::new(obj)?;
    Ok(digest(&canonical, algorithm))
}

/// Short SHA-256 fingerprint of the canonical form, for cache keys and logs.
///
/// Not collision resistant enough for integrity checks; use
/// [`canonical_digest`] there.
pub fn canonical_fingerprint(value: &JsonValue) -> String {
    let mut hex = canonical_digest(value, DigestAlgorithm::Sha256).to_hex();
    hex.truncate(FINGERPRINT_HEX_LEN);
    hex
}
