//! # Key Ordering — UTF-16 Code-Unit Comparison
//!
//! RFC 8785 orders object members by comparing keys as UTF-16 code-unit
//! sequences. For BMP-only keys this agrees with code-point order, but a
//! supplementary-plane character is encoded as a surrogate pair
//! (0xD800–0xDFFF) and therefore sorts *before* BMP characters in
//! 0xE000–0xFFFF even though its code point is larger. UTF-8 byte order
//! (and `str`'s `Ord`) gets this case wrong.
//!
//! Keys are re-encoded lazily with `encode_utf16` for the comparison only;
//! output stays UTF-8.

use std::cmp::Ordering;

use crate::value::{JsonValue, Map};

/// Compare two keys as UTF-16 code-unit sequences.
pub fn compare_utf16(a: &str, b: &str) -> Ordering {
    a.encode_utf16().cmp(b.encode_utf16())
}

/// Object members in canonical emission order.
///
/// Keys are unique, so the order is strict and needs no tie-breaking.
pub fn sorted_members(map: &Map) -> Vec<(&str, &JsonValue)> {
    let mut members: Vec<(&str, &JsonValue)> =
        map.iter().map(|(k, v)| (k.as_str(), v)).collect();
    members.sort_unstable_by(|(a, _), (b, _)| compare_utf16(a, b));
    members
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Agrees with comparing materialized UTF-16 buffers.
        #[test]
        fn matches_buffer_comparison(a in any::<String>(), b in any::<String>()) {
            let ua: Vec<u16> = a.encode_utf16().collect();
            let ub: Vec<u16> = b.encode_utf16().collect();
            prop_assert_eq!(compare_utf16(&a, &b), ua.cmp(&ub));
        }

        /// BMP-only keys order the same as code points.
        #[test]
        fn bmp_matches_code_point_order(a in "[\u{0}-\u{d7ff}]*", b in "[\u{0}-\u{d7ff}]*") {
            prop_assert_eq!(compare_utf16(&a, &b), a.cmp(&b));
        }
    }
}
