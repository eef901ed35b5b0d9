//! # Lowering — `Serialize` Types into the Value Model
//!
//! [`to_value`] runs any `Serialize` implementation through a dedicated
//! `serde::Serializer` that builds a [`JsonValue`]. Unlike
//! `serde_json::to_value`, nothing is coerced silently:
//!
//! - NaN and ±Infinity fail with `InvalidNumber` (serde_json emits `null`).
//! - Integers that no double represents exactly fail with `InvalidNumber`.
//! - Byte arrays fail with `UnsupportedType`; callers lower binary data to a
//!   string (hex, base64) or an array first.
//! - Map keys must be strings, chars, integers or unit variants. Integer keys
//!   are stringified. Anything else fails with `UnsupportedType`.
//!
//! Enum and option shapes follow the serde_json conventions: `None` and unit
//! become `null`, unit variants become strings, newtype / tuple / struct
//! variants become single-member objects keyed by the variant name.

use std::collections::btree_map::Entry;

use serde::ser::{self, Impossible, Serialize};

use crate::error::CanonicalizationError;
use crate::value::{JsonNumber, JsonValue, Map};

/// Lower a serializable value into a [`JsonValue`].
///
/// # Errors
///
/// See the module documentation for the rejected shapes.
pub fn to_value<T>(value: &T) -> Result<JsonValue, CanonicalizationError>
where
    T: ?Sized + Serialize,
{
    value.serialize(ValueSerializer)
}

/// Insert a member; a repeated key (e.g. `1` and `"1"` after stringification)
/// keeps the last value.
fn insert_member(map: &mut Map, key: String, value: JsonValue) {
    match map.entry(key) {
        Entry::Occupied(mut slot) => {
            tracing::warn!(key = %slot.key(), "duplicate object key while lowering; last value wins");
            slot.insert(value);
        }
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
    }
}

fn single_member(name: &str, value: JsonValue) -> JsonValue {
    let mut map = Map::new();
    map.insert(name.to_owned(), value);
    JsonValue::Object(map)
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeTupleVariant;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeStructVariant;

    fn serialize_bool(self, v: bool) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::from(i32::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::from(i32::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::from(v))
    }

    fn serialize_i64(self, v: i64) -> Result<JsonValue, Self::Error> {
        JsonValue::try_from(v)
    }

    fn serialize_i128(self, v: i128) -> Result<JsonValue, Self::Error> {
        JsonNumber::from_i128(v).map(JsonValue::Number)
    }

    fn serialize_u8(self, v: u8) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::from(u32::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::from(u32::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::from(v))
    }

    fn serialize_u64(self, v: u64) -> Result<JsonValue, Self::Error> {
        JsonValue::try_from(v)
    }

    fn serialize_u128(self, v: u128) -> Result<JsonValue, Self::Error> {
        JsonNumber::from_u128(v).map(JsonValue::Number)
    }

    fn serialize_f32(self, v: f32) -> Result<JsonValue, Self::Error> {
        JsonValue::try_from(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Result<JsonValue, Self::Error> {
        JsonValue::try_from(v)
    }

    fn serialize_char(self, v: char) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<JsonValue, Self::Error> {
        Err(CanonicalizationError::UnsupportedType(format!(
            "byte array of length {}; lower binary data to a string or array first",
            v.len()
        )))
    }

    fn serialize_none(self) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<JsonValue, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<JsonValue, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<JsonValue, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        Ok(single_member(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Ok(SerializeVec {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Ok(SerializeTupleVariant {
            name: variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Ok(SerializeMap {
            map: Map::new(),
            next_key: None,
        })
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        self.serialize_map(Some(len))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Ok(SerializeStructVariant {
            name: variant,
            map: Map::new(),
        })
    }
}

struct SerializeVec {
    items: Vec<JsonValue>,
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::Array(self.items))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    fn serialize_element<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsonValue, Self::Error> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<JsonValue, Self::Error> {
        ser::SerializeSeq::end(self)
    }
}

struct SerializeTupleVariant {
    name: &'static str,
    items: Vec<JsonValue>,
}

impl ser::SerializeTupleVariant for SerializeTupleVariant {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, Self::Error> {
        Ok(single_member(self.name, JsonValue::Array(self.items)))
    }
}

struct SerializeMap {
    map: Map,
    next_key: Option<String>,
}

impl ser::SerializeMap for SerializeMap {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    fn serialize_key<T>(&mut self, key: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        self.next_key = Some(key.serialize(MapKeySerializer)?);
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        let key = self.next_key.take().ok_or_else(|| {
            CanonicalizationError::Custom("map value serialized before its key".into())
        })?;
        insert_member(&mut self.map, key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        insert_member(&mut self.map, key.to_owned(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, Self::Error> {
        Ok(JsonValue::Object(self.map))
    }
}

struct SerializeStructVariant {
    name: &'static str,
    map: Map,
}

impl ser::SerializeStructVariant for SerializeStructVariant {
    type Ok = JsonValue;
    type Error = CanonicalizationError;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<(), Self::Error>
    where
        T: ?Sized + Serialize,
    {
        insert_member(&mut self.map, key.to_owned(), to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<JsonValue, Self::Error> {
        Ok(single_member(self.name, JsonValue::Object(self.map)))
    }
}

/// Serializes object keys to `String`.
struct MapKeySerializer;

fn key_must_be_a_string(kind: &str) -> CanonicalizationError {
    CanonicalizationError::UnsupportedType(format!("object key must be a string, got {kind}"))
}

impl ser::Serializer for MapKeySerializer {
    type Ok = String;
    type Error = CanonicalizationError;

    type SerializeSeq = Impossible<String, CanonicalizationError>;
    type SerializeTuple = Impossible<String, CanonicalizationError>;
    type SerializeTupleStruct = Impossible<String, CanonicalizationError>;
    type SerializeTupleVariant = Impossible<String, CanonicalizationError>;
    type SerializeMap = Impossible<String, CanonicalizationError>;
    type SerializeStruct = Impossible<String, CanonicalizationError>;
    type SerializeStructVariant = Impossible<String, CanonicalizationError>;

    fn serialize_str(self, v: &str) -> Result<String, Self::Error> {
        Ok(v.to_owned())
    }

    fn serialize_char(self, v: char) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_i8(self, v: i8) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_i16(self, v: i16) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_i32(self, v: i32) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_i64(self, v: i64) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_i128(self, v: i128) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_u8(self, v: u8) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_u16(self, v: u16) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_u32(self, v: u32) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_u64(self, v: u64) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_u128(self, v: u128) -> Result<String, Self::Error> {
        Ok(v.to_string())
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<String, Self::Error> {
        Ok(variant.to_owned())
    }

    fn serialize_newtype_struct<T>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<String, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_bool(self, _v: bool) -> Result<String, Self::Error> {
        Err(key_must_be_a_string("boolean"))
    }

    fn serialize_f32(self, _v: f32) -> Result<String, Self::Error> {
        Err(key_must_be_a_string("float"))
    }

    fn serialize_f64(self, _v: f64) -> Result<String, Self::Error> {
        Err(key_must_be_a_string("float"))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<String, Self::Error> {
        Err(key_must_be_a_string("byte array"))
    }

    fn serialize_none(self) -> Result<String, Self::Error> {
        Err(key_must_be_a_string("none"))
    }

    fn serialize_some<T>(self, _value: &T) -> Result<String, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string("option"))
    }

    fn serialize_unit(self) -> Result<String, Self::Error> {
        Err(key_must_be_a_string("unit"))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<String, Self::Error> {
        Err(key_must_be_a_string("unit struct"))
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<String, Self::Error>
    where
        T: ?Sized + Serialize,
    {
        Err(key_must_be_a_string("newtype variant"))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, Self::Error> {
        Err(key_must_be_a_string("sequence"))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, Self::Error> {
        Err(key_must_be_a_string("tuple"))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, Self::Error> {
        Err(key_must_be_a_string("tuple struct"))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, Self::Error> {
        Err(key_must_be_a_string("tuple variant"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, Self::Error> {
        Err(key_must_be_a_string("map"))
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, Self::Error> {
        Err(key_must_be_a_string("struct"))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, Self::Error> {
        Err(key_must_be_a_string("struct variant"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{canonicalize, CanonicalBytes};
    use serde::Serialize;
    use std::collections::{BTreeMap, HashMap};

    fn canon<T: Serialize>(value: &T) -> String {
        canonicalize(&to_value(value).expect("lowers")).as_str().to_owned()
    }

    #[derive(Serialize)]
    struct Receipt {
        zeta: u32,
        alpha: &'static str,
        nested: Option<Vec<i64>>,
        missing: Option<bool>,
    }

    #[derive(Serialize)]
    enum Event {
        Started,
        Moved(i32),
        Resized(u32, u32),
        Renamed { from: String, to: String },
    }

    #[derive(Serialize)]
    struct Wrapper(String);

    #[test]
    fn test_struct_fields_sorted() {
        let r = Receipt {
            zeta: 1,
            alpha: "a",
            nested: Some(vec![3, -2]),
            missing: None,
        };
        assert_eq!(canon(&r), r#"{"alpha":"a","missing":null,"nested":[3,-2],"zeta":1}"#);
    }

    #[test]
    fn test_enum_shapes() {
        assert_eq!(canon(&Event::Started), r#""Started""#);
        assert_eq!(canon(&Event::Moved(-4)), r#"{"Moved":-4}"#);
        assert_eq!(canon(&Event::Resized(2, 3)), r#"{"Resized":[2,3]}"#);
        assert_eq!(
            canon(&Event::Renamed { from: "x".into(), to: "y".into() }),
            r#"{"Renamed":{"from":"x","to":"y"}}"#
        );
    }

    #[test]
    fn test_newtype_struct_transparent() {
        assert_eq!(canon(&Wrapper("w".into())), r#""w""#);
    }

    #[test]
    fn test_tuples_and_unit() {
        assert_eq!(canon(&(1u8, "two", 3.5f32)), r#"[1,"two",3.5]"#);
        assert_eq!(canon(&()), "null");
        assert_eq!(canon(&'c'), r#""c""#);
    }

    #[test]
    fn test_integer_map_keys_stringified() {
        let mut m = BTreeMap::new();
        m.insert(10u32, "ten");
        m.insert(2u32, "two");
        assert_eq!(canon(&m), r#"{"10":"ten","2":"two"}"#);
    }

    #[test]
    fn test_stringified_key_collision_last_value_wins() {
        struct Collides;
        impl Serialize for Collides {
            fn serialize<S: ser::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                use serde::ser::SerializeMap as _;
                let mut map = s.serialize_map(Some(2))?;
                map.serialize_entry(&1u8, "int")?;
                map.serialize_entry("1", "str")?;
                map.end()
            }
        }
        assert_eq!(canon(&Collides), r#"{"1":"str"}"#);
        assert_eq!(
            CanonicalBytes::new(&Collides).unwrap().as_str(),
            r#"{"1":"str"}"#
        );
    }

    #[test]
    fn test_hashmap_order_irrelevant() {
        let mut m = HashMap::new();
        for (i, k) in ["q", "w", "e", "r", "t", "y"].iter().enumerate() {
            m.insert(*k, i as u8);
        }
        assert_eq!(canon(&m), r#"{"e":2,"q":0,"r":3,"t":4,"w":1,"y":5}"#);
    }

    #[test]
    fn test_nan_rejected() {
        let err = to_value(&vec![f64::NAN]).unwrap_err();
        assert!(matches!(err, CanonicalizationError::InvalidNumber(_)));
        let err = to_value(&f32::INFINITY).unwrap_err();
        assert!(matches!(err, CanonicalizationError::InvalidNumber(_)));
    }

    #[test]
    fn test_inexact_integer_rejected() {
        assert!(to_value(&9_007_199_254_740_993u64).is_err());
        assert!(to_value(&9_007_199_254_740_992u64).is_ok());
        assert!(to_value(&i128::MAX).is_err());
    }

    #[test]
    fn test_bytes_unsupported() {
        struct Blob;
        impl Serialize for Blob {
            fn serialize<S: ser::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_bytes(&[0xde, 0xad])
            }
        }
        let err = to_value(&Blob).unwrap_err();
        assert_eq!(
            err,
            CanonicalizationError::UnsupportedType(
                "byte array of length 2; lower binary data to a string or array first".into()
            )
        );
    }

    #[test]
    fn test_non_scalar_keys_unsupported() {
        let mut m = BTreeMap::new();
        m.insert(vec![1], 1);
        let err = to_value(&m).unwrap_err();
        assert_eq!(
            err,
            CanonicalizationError::UnsupportedType("object key must be a string, got sequence".into())
        );

        let mut b = BTreeMap::new();
        b.insert(true, 1);
        assert!(matches!(
            to_value(&b),
            Err(CanonicalizationError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_custom_error_propagates() {
        struct Failing;
        impl Serialize for Failing {
            fn serialize<S: ser::Serializer>(&self, _s: S) -> Result<S::Ok, S::Error> {
                Err(ser::Error::custom("lock poisoned"))
            }
        }
        assert_eq!(
            to_value(&vec![Failing]).unwrap_err(),
            CanonicalizationError::Custom("lock poisoned".into())
        );
    }

    #[test]
    fn test_serde_json_value_lowers() {
        let v = serde_json::json!({"b": [1, 2.5, null], "a": {"c": true}});
        assert_eq!(canon(&v), r#"{"a":{"c":true},"b":[1,2.5,null]}"#);
    }

    #[test]
    fn test_json_value_round_trips_through_lowering() {
        let v: JsonValue = r#"{"k":[1e21,"s",false,{}]}"#.parse().unwrap();
        assert_eq!(to_value(&v).unwrap(), v);
    }
}
