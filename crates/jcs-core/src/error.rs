//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types surfaced by the canonicalization engine. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Canonicalization errors are raised where a value enters the model
//!   (number construction, UTF-16 decoding, serde lowering). A `JsonValue`
//!   that exists can always be canonicalized.
//! - Parse errors come only from the external parser and are kept distinct
//!   from canonicalization errors.
//! - Nothing is retried and nothing is replaced with a default value.

use thiserror::Error;

/// Top-level error type for the canonicalization engine.
#[derive(Error, Debug)]
pub enum JcsError {
    /// A value could not be lowered into the canonical JSON model.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// Candidate text was rejected by the parser.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Error raised while building or lowering a value for canonicalization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CanonicalizationError {
    /// NaN, ±Infinity, or an integer that no IEEE-754 double represents exactly.
    #[error("invalid number: {0}")]
    InvalidNumber(String),

    /// Unpaired UTF-16 surrogate or malformed UTF-8.
    #[error("invalid unicode: {0}")]
    InvalidUnicode(String),

    /// A shape outside the JSON value kinds (e.g. a byte array).
    #[error("unsupported type: {0}")]
    UnsupportedType(String),

    /// A `Serialize` implementation reported its own failure.
    #[error("serialization failed: {0}")]
    Custom(String),
}

impl serde::ser::Error for CanonicalizationError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// The parser rejected the candidate JSON text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid JSON text: {message}")]
pub struct ParseError {
    /// 1-based line of the failure, 0 when unknown.
    pub line: usize,
    /// 1-based column of the failure, 0 when unknown.
    pub column: usize,
    /// Parser diagnostic.
    pub message: String,
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self {
            line: err.line(),
            column: err.column(),
            message: err.to_string(),
        }
    }
}
