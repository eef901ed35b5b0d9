//! # jcs-core — Canonical JSON (RFC 8785)
//!
//! Renders any JSON value tree into the one byte sequence the JSON
//! Canonicalization Scheme allows for it. The output is the input to content
//! hashing, signature computation and semantic equality, so every rule here
//! is byte-exact.
//!
//! ## Components
//!
//! 1. **Value model** ([`value`]). `JsonValue` with a `JsonNumber` newtype
//!    that cannot hold NaN or ±Infinity. Strings are always well-formed.
//!
//! 2. **Number canonicalizer** ([`number`]). Shortest round-trip digits from
//!    `ryu`, laid out per ECMAScript `Number::toString`.
//!
//! 3. **String canonicalizer** ([`string`]). Escapes only `"`, `\` and
//!    U+0000–U+001F; everything else is raw UTF-8.
//!
//! 4. **Key sorter** ([`keys`]). UTF-16 code-unit order.
//!
//! 5. **Canonical serializer** ([`canonical`]). `CanonicalBytes` is the only
//!    type digest code accepts, and its only constructors run the full
//!    pipeline.
//!
//! 6. **Facade** ([`equality`], [`validate`]). Semantic equality and the
//!    canonical-form check. Hashing lives in `jcs-crypto`.
//!
//! The `serde` bridge ([`ser`]) lowers any `Serialize` type into the value
//! model and refuses shapes JSON has no literal for.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `jcs-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Every operation is a pure function of its input; no shared state.

pub mod canonical;
pub mod equality;
pub mod error;
pub mod keys;
pub mod number;
pub mod ser;
pub mod string;
pub mod validate;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use canonical::{canonicalize, canonicalize_str, CanonicalBytes};
pub use equality::{semantic_equals, semantic_equals_str};
pub use error::{CanonicalizationError, JcsError, ParseError};
pub use keys::compare_utf16;
pub use number::format_number;
pub use ser::to_value;
pub use string::quote_string;
pub use validate::is_canonical;
pub use value::{JsonNumber, JsonValue, Map};
