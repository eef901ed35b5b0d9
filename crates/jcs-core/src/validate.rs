//! # Canonical-Form Validation
//!
//! Decides whether a candidate text is already in canonical form: parse it,
//! canonicalize the result, and compare byte-for-byte with the original.
//! Valid JSON that is formatted any other way (whitespace, key order,
//! number spelling, escapes, duplicate keys) yields `Ok(false)`; only text
//! the parser rejects is an error.

use crate::canonical::canonicalize;
use crate::error::ParseError;
use crate::value::JsonValue;

/// Returns `true` if `text` is exactly the canonical form of the value it
/// encodes.
///
/// # Errors
///
/// Returns `ParseError` if `text` is not valid JSON.
pub fn is_canonical(text: &str) -> Result<bool, ParseError> {
    let value: JsonValue = match text.parse() {
        Ok(value) => value,
        Err(err) => {
            tracing::debug!(error = %err, "canonical-form check: candidate is not valid JSON");
            return Err(err);
        }
    };
    let canonical = canonicalize(&value);
    if canonical.as_bytes() == text.as_bytes() {
        return Ok(true);
    }
    if let Some(offset) = first_divergence(text.as_bytes(), canonical.as_bytes()) {
        tracing::debug!(offset, "canonical-form check: candidate diverges from canonical form");
    }
    Ok(false)
}

/// Byte offset of the first difference between `text` and `canonical`, or
/// `None` when they are identical.
pub fn first_divergence(text: &[u8], canonical: &[u8]) -> Option<usize> {
    match text.iter().zip(canonical).position(|(a, b)| a != b) {
        Some(offset) => Some(offset),
        None if text.len() == canonical.len() => None,
        None => Some(text.len().min(canonical.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_text_accepted() {
        assert!(is_canonical(r#"{"a":1}"#).unwrap());
        assert!(is_canonical(r#"{"a":1,"b":[true,null,"x"]}"#).unwrap());
        assert!(is_canonical("1e+21").unwrap());
        assert!(is_canonical("\"é\"").unwrap());
    }

    #[test]
    fn test_whitespace_rejected() {
        assert!(!is_canonical("{ \"a\": 1 }").unwrap());
        assert!(!is_canonical("{\"a\":1}\n").unwrap());
        assert!(!is_canonical(" 1").unwrap());
    }

    #[test]
    fn test_key_order_rejected() {
        assert!(!is_canonical(r#"{"b":2,"a":1}"#).unwrap());
    }

    #[test]
    fn test_number_spelling_rejected() {
        assert!(!is_canonical("1.0").unwrap());
        assert!(!is_canonical("1e21").unwrap());
        assert!(!is_canonical("-0").unwrap());
        assert!(!is_canonical("1E+21").unwrap());
    }

    #[test]
    fn test_escape_spelling_rejected() {
        assert!(!is_canonical(r#""\/""#).unwrap());
        assert!(!is_canonical(r#""\u00e9""#).unwrap());
        assert!(!is_canonical(r#""\u000A""#).unwrap());
        assert!(is_canonical(r#""\n""#).unwrap());
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        assert!(!is_canonical(r#"{"a":1,"a":1}"#).unwrap());
    }

    #[test]
    fn test_invalid_text_is_parse_error() {
        assert!(is_canonical("{\"a\":").is_err());
        assert!(is_canonical("NaN").is_err());
        assert!(is_canonical("").is_err());
    }

    fn nested(depth: usize) -> JsonValue {
        let mut value = JsonValue::Null;
        for level in 0..depth {
            value = if level % 2 == 0 {
                JsonValue::Array(vec![value])
            } else {
                std::iter::once(("k", value)).collect()
            };
        }
        value
    }

    #[test]
    fn test_deep_tree_output_is_canonical() {
        let value = nested(300);
        let canonical = canonicalize(&value);
        assert!(is_canonical(canonical.as_str()).unwrap());

        let reparsed: JsonValue = canonical.as_str().parse().unwrap();
        assert_eq!(reparsed, value);
        assert_eq!(canonicalize(&reparsed), canonical);
    }

    #[test]
    fn test_first_divergence() {
        assert_eq!(first_divergence(b"abc", b"abc"), None);
        assert_eq!(first_divergence(b"abd", b"abc"), Some(2));
        assert_eq!(first_divergence(b"abc ", b"abc"), Some(3));
        assert_eq!(first_divergence(b"{ \"a\"", b"{\"a\""), Some(1));
    }
}
