//! # Canonical Serialization — RFC 8785 Byte Production
//!
//! This module defines [`CanonicalBytes`], the sole construction path for
//! canonical JSON bytes, and the serializer that walks a [`JsonValue`] tree.
//!
//! ## Security Invariant
//!
//! The inner buffer of `CanonicalBytes` is private. It can only be produced
//! by [`canonicalize`] (or the constructors that delegate to it), so any API
//! that takes `&CanonicalBytes` is guaranteed to receive the one canonical
//! byte form of some value. Digest computation in `jcs-crypto` accepts only
//! this type.
//!
//! ## Output Rules
//!
//! - No insignificant whitespace.
//! - `,` between array elements and object members, bare `:` between key
//!   and value.
//! - Object members in UTF-16 code-unit key order ([`crate::keys`]).
//! - Array elements in input order.
//! - Numbers via [`crate::number`], strings via [`crate::string`].
//!
//! The tree is owned and acyclic, so depth-first recursion terminates.
//! Each call allocates its own buffer; nothing is shared between calls.

use std::fmt;

use serde::Serialize;

use crate::error::{CanonicalizationError, ParseError};
use crate::keys::sorted_members;
use crate::number::write_number;
use crate::string::write_string;
use crate::value::JsonValue;

/// UTF-8 bytes produced exclusively by RFC 8785 canonicalization.
///
/// # Invariants
///
/// - The only producers are [`canonicalize`], [`canonicalize_str`],
///   [`CanonicalBytes::new`] and [`CanonicalBytes::from_value`].
/// - The content is valid UTF-8 and valid JSON text.
/// - Equal values (by canonical form) always yield equal bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalBytes(String);

impl CanonicalBytes {
    /// Lower any serializable value and canonicalize it.
    ///
    /// # Errors
    ///
    /// Returns the `CanonicalizationError` raised while lowering: non-finite
    /// or inexact numbers, byte arrays, non-scalar map keys.
    pub fn new(obj: &impl Serialize) -> Result<Self, CanonicalizationError> {
        let value = crate::ser::to_value(obj)?;
        Ok(canonicalize(&value))
    }

    /// Canonicalize an existing value tree.
    pub fn from_value(value: &JsonValue) -> Self {
        canonicalize(value)
    }

    /// Access the canonical bytes for digest computation.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner byte vector.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0.into_bytes()
    }

    /// Returns the length of the canonical byte sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: the shortest canonical text (`0`) is one byte long.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<[u8]> for CanonicalBytes {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for CanonicalBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Canonicalize a value tree.
///
/// Infallible: the value model rejects non-finite numbers and ill-formed
/// strings at construction, so every `JsonValue` has a canonical form.
pub fn canonicalize(value: &JsonValue) -> CanonicalBytes {
    let mut out = String::new();
    write_value(value, &mut out);
    CanonicalBytes(out)
}

/// Parse JSON text and canonicalize the result.
///
/// # Errors
///
/// Returns `ParseError` if the text is not valid JSON.
pub fn canonicalize_str(text: &str) -> Result<CanonicalBytes, ParseError> {
    let value: JsonValue = text.parse()?;
    Ok(canonicalize(&value))
}

fn write_value(value: &JsonValue, out: &mut String) {
    match value {
        JsonValue::Null => out.push_str("null"),
        JsonValue::Bool(true) => out.push_str("true"),
        JsonValue::Bool(false) => out.push_str("false"),
        JsonValue::Number(n) => write_number(*n, out),
        JsonValue::String(s) => write_string(s, out),
        JsonValue::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_value(item, out);
            }
            out.push(']');
        }
        JsonValue::Object(map) => {
            out.push('{');
            for (i, (key, member)) in sorted_members(map).into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_value(member, out);
            }
            out.push('}');
        }
    }
}
