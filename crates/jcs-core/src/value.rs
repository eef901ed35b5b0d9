//! # Value Model — Immutable JSON Trees
//!
//! [`JsonValue`] is the closed tagged union every component of the engine
//! consumes. Its invariants are enforced where values are built, so that a
//! tree which exists can always be canonicalized:
//!
//! - Numbers are finite IEEE-754 doubles. [`JsonNumber`] has a private field
//!   and rejects NaN and ±Infinity with `InvalidNumber`.
//! - Strings are Rust `String`s and therefore well-formed Unicode. The UTF-16
//!   and raw-byte entry points reject unpaired surrogates and malformed UTF-8
//!   with `InvalidUnicode` instead of substituting U+FFFD.
//! - Object keys are unique. Storage order carries no meaning; canonical
//!   order is recomputed by [`crate::keys`] on every serialization.
//!
//! ## Parser Handoff
//!
//! `JsonValue` implements `Deserialize`, so `serde_json` acts as the parser.
//! Numbers are read as doubles (the JSON.parse reading of a number literal)
//! and duplicate keys resolve last-value-wins before the tree is returned.
//! The parser's recursion limit is lifted and the stack grows on demand via
//! `serde_stacker`, so canonical text of a tree of any depth parses back.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, Serializer};
use serde::{Deserialize, Deserializer};

use crate::error::{CanonicalizationError, ParseError};

/// Object member storage. Iteration order is not canonical order.
pub type Map = BTreeMap<String, JsonValue>;

/// 2^127 and 2^128 as doubles. Saturating casts at these magnitudes would
/// otherwise make an out-of-range double compare equal to `MAX`.
const TWO_POW_127: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
const TWO_POW_128: f64 = 340_282_366_920_938_463_463_374_607_431_768_211_456.0;

/// A finite IEEE-754 double.
///
/// The only constructors validate finiteness, so every `JsonNumber` has a
/// JSON literal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct JsonNumber(f64);

impl JsonNumber {
    /// Wrap a finite double.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::InvalidNumber` for NaN and ±Infinity.
    pub fn new(value: f64) -> Result<Self, CanonicalizationError> {
        if value.is_finite() {
            Ok(Self(value))
        } else {
            Err(CanonicalizationError::InvalidNumber(format!(
                "{value} has no JSON representation"
            )))
        }
    }

    /// Convert a signed integer that some double represents exactly.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::InvalidNumber` when the conversion
    /// would round (e.g. `9007199254740993`).
    pub fn from_i128(value: i128) -> Result<Self, CanonicalizationError> {
        let f = value as f64;
        if f < TWO_POW_127 && f as i128 == value {
            Ok(Self(f))
        } else {
            Err(inexact_integer(value))
        }
    }

    /// Convert an unsigned integer that some double represents exactly.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::InvalidNumber` when the conversion
    /// would round.
    pub fn from_u128(value: u128) -> Result<Self, CanonicalizationError> {
        let f = value as f64;
        if f < TWO_POW_128 && f as u128 == value {
            Ok(Self(f))
        } else {
            Err(inexact_integer(value))
        }
    }

    /// The underlying double.
    pub fn get(self) -> f64 {
        self.0
    }
}

fn inexact_integer(value: impl fmt::Display) -> CanonicalizationError {
    CanonicalizationError::InvalidNumber(format!(
        "{value} is not exactly representable as an IEEE-754 double"
    ))
}

impl TryFrom<f64> for JsonNumber {
    type Error = CanonicalizationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<i64> for JsonNumber {
    type Error = CanonicalizationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::from_i128(i128::from(value))
    }
}

impl TryFrom<u64> for JsonNumber {
    type Error = CanonicalizationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::from_u128(u128::from(value))
    }
}

impl From<i32> for JsonNumber {
    fn from(value: i32) -> Self {
        Self(f64::from(value))
    }
}

impl From<u32> for JsonNumber {
    fn from(value: u32) -> Self {
        Self(f64::from(value))
    }
}

impl fmt::Display for JsonNumber {
    /// Canonical (ECMAScript) rendering.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::number::format_number(*self))
    }
}

/// A JSON value tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    /// `null`
    #[default]
    Null,
    /// `true` / `false`
    Bool(bool),
    /// A finite double.
    Number(JsonNumber),
    /// A string of Unicode scalar values.
    String(String),
    /// Ordered elements.
    Array(Vec<JsonValue>),
    /// Members with unique keys.
    Object(Map),
}

impl JsonValue {
    /// Build a string value from UTF-16 code units.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::InvalidUnicode` at the first unpaired
    /// surrogate half.
    pub fn string_from_utf16(units: &[u16]) -> Result<Self, CanonicalizationError> {
        let mut out = String::with_capacity(units.len());
        let mut offset = 0usize;
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => {
                    out.push(c);
                    offset += c.len_utf16();
                }
                Err(e) => {
                    return Err(CanonicalizationError::InvalidUnicode(format!(
                        "unpaired surrogate 0x{:04x} at code unit {offset}",
                        e.unpaired_surrogate()
                    )));
                }
            }
        }
        Ok(Self::String(out))
    }

    /// Build a string value from raw UTF-8 bytes.
    ///
    /// # Errors
    ///
    /// Returns `CanonicalizationError::InvalidUnicode` if the bytes are not
    /// well-formed UTF-8 (this includes encoded surrogate halves).
    pub fn string_from_utf8(bytes: &[u8]) -> Result<Self, CanonicalizationError> {
        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(Self::String(s.to_owned())),
            Err(e) => Err(CanonicalizationError::InvalidUnicode(format!(
                "malformed UTF-8 after byte {}",
                e.valid_up_to()
            ))),
        }
    }

    /// Parse JSON text from bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        parse(serde_json::Deserializer::from_slice(bytes))
    }

    /// Name of the variant, as used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// True for `null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The boolean, if this is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number as a double, if this is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(n.get()),
            _ => None,
        }
    }

    /// The string contents, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The elements, if this is an array.
    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// The members, if this is an object. Iteration order is not canonical.
    pub fn as_object(&self) -> Option<&Map> {
        match self {
            Self::Object(map) => Some(map),
            _ => None,
        }
    }

    /// Member lookup on objects; `None` for other kinds.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl FromStr for JsonValue {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(serde_json::Deserializer::from_str(s))
    }
}

/// Run the parser with no nesting limit, then reject trailing characters.
fn parse<'de, R>(mut de: serde_json::Deserializer<R>) -> Result<JsonValue, ParseError>
where
    R: serde_json::de::Read<'de>,
{
    de.disable_recursion_limit();
    let value = JsonValue::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(value)
}

impl From<bool> for JsonValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for JsonValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for JsonValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<JsonNumber> for JsonValue {
    fn from(value: JsonNumber) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for JsonValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for JsonValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<Vec<JsonValue>> for JsonValue {
    fn from(value: Vec<JsonValue>) -> Self {
        Self::Array(value)
    }
}

impl From<Map> for JsonValue {
    fn from(value: Map) -> Self {
        Self::Object(value)
    }
}

impl TryFrom<f64> for JsonValue {
    type Error = CanonicalizationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        JsonNumber::new(value).map(Self::Number)
    }
}

impl TryFrom<i64> for JsonValue {
    type Error = CanonicalizationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        JsonNumber::try_from(value).map(Self::Number)
    }
}

impl TryFrom<u64> for JsonValue {
    type Error = CanonicalizationError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        JsonNumber::try_from(value).map(Self::Number)
    }
}

impl<K: Into<String>> FromIterator<(K, JsonValue)> for JsonValue {
    /// Later entries replace earlier ones with the same key.
    fn from_iter<I: IntoIterator<Item = (K, JsonValue)>>(iter: I) -> Self {
        Self::Object(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl FromIterator<JsonValue> for JsonValue {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        Self::Array(iter.into_iter().collect())
    }
}

impl Serialize for JsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_f64(n.get()),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => serializer.collect_seq(items),
            Self::Object(map) => serializer.collect_map(map),
        }
    }
}

impl<'de> Deserialize<'de> for JsonValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(JsonValueVisitor)
    }
}

struct JsonValueVisitor;

impl JsonValueVisitor {
    fn number<E: de::Error>(value: f64) -> Result<JsonValue, E> {
        JsonNumber::new(value).map(JsonValue::Number).map_err(E::custom)
    }
}

impl<'de> Visitor<'de> for JsonValueVisitor {
    type Value = JsonValue;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<JsonValue, E> {
        Ok(JsonValue::Bool(v))
    }

    // Integer literals are read the way JSON.parse reads them: as the
    // nearest double.
    fn visit_i64<E: de::Error>(self, v: i64) -> Result<JsonValue, E> {
        Self::number(v as f64)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<JsonValue, E> {
        Self::number(v as f64)
    }

    fn visit_i128<E: de::Error>(self, v: i128) -> Result<JsonValue, E> {
        Self::number(v as f64)
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<JsonValue, E> {
        Self::number(v as f64)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<JsonValue, E> {
        Self::number(v)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<JsonValue, E> {
        Ok(JsonValue::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<JsonValue, E> {
        Ok(JsonValue::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<JsonValue, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<JsonValue, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(JsonValue::Array(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<JsonValue, A::Error> {
        let mut map = Map::new();
        // Last value wins for repeated keys.
        while let Some((key, value)) = access.next_entry::<String, JsonValue>()? {
            map.insert(key, value);
        }
        Ok(JsonValue::Object(map))
    }
}
