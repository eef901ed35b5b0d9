//! # String Canonicalization
//!
//! Produces the one JSON string literal RFC 8785 allows for a string:
//!
//! 1. `"` and `\` are escaped as `\"` and `\\`.
//! 2. U+0000–U+001F use `\b`, `\f`, `\n`, `\r`, `\t` where one exists and
//!    `\u00xx` (lower-case hex) otherwise.
//! 3. Everything else is written raw as UTF-8, including `/`, U+007F,
//!    U+2028/U+2029 and every non-ASCII character. Escaping any of these
//!    would give a second spelling of the same value.
//!
//! Unpaired surrogates cannot reach this module: `str` is well-formed by
//! construction and the UTF-16 entry point rejects them.

const HEX: &[u8; 16] = b"0123456789abcdef";

/// Canonical string literal, quotes included.
pub fn quote_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    write_string(s, &mut out);
    out
}

/// Append the canonical string literal for `s` to `out`.
pub(crate) fn write_string(s: &str, out: &mut String) {
    out.push('"');
    let mut start = 0;
    for (i, byte) in s.bytes().enumerate() {
        // Multi-byte UTF-8 sequences never contain bytes below 0x80, so a
        // byte-level scan only stops on ASCII.
        let escape: Option<&str> = match byte {
            b'"' => Some("\\\""),
            b'\\' => Some("\\\\"),
            0x08 => Some("\\b"),
            0x0C => Some("\\f"),
            b'\n' => Some("\\n"),
            b'\r' => Some("\\r"),
            b'\t' => Some("\\t"),
            0x00..=0x1F => None,
            _ => continue,
        };
        out.push_str(&s[start..i]);
        match escape {
            Some(seq) => out.push_str(seq),
            None => {
                out.push_str("\\u00");
                out.push(char::from(HEX[usize::from(byte >> 4)]));
                out.push(char::from(HEX[usize::from(byte & 0x0F)]));
            }
        }
        start = i + 1;
    }
    out.push_str(&s[start..]);
    out.push('"');
}
