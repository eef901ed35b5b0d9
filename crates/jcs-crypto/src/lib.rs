//! # jcs-crypto — Digests over Canonical JSON
//!
//! Provides the hashing half of the canonical JSON engine:
//!
//! - **Content digests** ([`digest`]) from `CanonicalBytes` (the only valid
//!   input type, enforcing canonicalization correctness) with SHA-224,
//!   SHA-256, SHA-384 and SHA-512.
//! - **Canonical hashing** ([`hash`]): canonicalize then digest, keyed by an
//!   algorithm name such as `"SHA-256"`, plus a short fingerprint.
//!
//! ## Crate Policy
//!
//! - Depends only on `jcs-core` internally.
//! - No mocking of cryptographic operations in tests; all tests use real
//!   `CanonicalBytes` and real SHA-2.
//! - No `unsafe` code.

pub mod digest;
pub mod error;
pub mod hash;

pub use digest::{digest, sha256_digest, ContentDigest, DigestAlgorithm};
pub use error::CryptoError;
pub use hash::{canonical_digest, canonical_fingerprint, canonical_hash, serializable_digest};
