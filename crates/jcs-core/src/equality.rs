//! # Semantic Equality
//!
//! Two JSON values are the same value exactly when their canonical forms
//! are byte-identical. Structural `PartialEq` on [`JsonValue`] is not that
//! relation: it compares doubles with IEEE `==` and knows nothing about
//! formatting. Use these functions wherever "same JSON regardless of
//! formatting" is meant.

use crate::canonical::{canonicalize, canonicalize_str};
use crate::error::ParseError;
use crate::value::JsonValue;

/// Byte-exact comparison of the canonical forms of `a` and `b`.
pub fn semantic_equals(a: &JsonValue, b: &JsonValue) -> bool {
    canonicalize(a) == canonicalize(b)
}

/// Parse two JSON texts and compare them canonically.
///
/// # Errors
///
/// Returns `ParseError` if either text is not valid JSON.
pub fn semantic_equals_str(a: &str, b: &str) -> Result<bool, ParseError> {
    Ok(canonicalize_str(a)? == canonicalize_str(b)?)
}
