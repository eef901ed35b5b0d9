//! # Cryptographic Error Types
//!
//! Structured errors for digest operations in `jcs-crypto`.
//! Uses `thiserror` for ergonomic error definitions with diagnostic context.

use jcs_core::CanonicalizationError;
use thiserror::Error;

/// Errors from digest operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The digest name does not match any algorithm this crate provides.
    #[error("unsupported digest algorithm: {0:?} (supported: SHA-224, SHA-256, SHA-384, SHA-512)")]
    UnsupportedAlgorithm(String),

    /// The value could not be lowered into canonical JSON.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
