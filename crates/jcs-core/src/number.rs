//! # Number Canonicalization — ECMAScript `Number::toString` Layout
//!
//! Renders a finite double as the shortest decimal string that parses back
//! to the same IEEE-754 bit pattern, laid out exactly as ECMA-262 §6.1.6.1.20
//! prescribes (the rule RFC 8785 adopts).
//!
//! Shortest digits come from `ryu`. Its own text layout is not the
//! ECMAScript one (it prints `1e16`, `1000.0`), so only the digit string and
//! decimal exponent are taken from it and the layout is applied here. `std`
//! float formatting is never used for canonical output.
//!
//! With `k` significant digits and decimal point position `n`
//! (value = 0.d1d2…dk × 10^n):
//!
//! | Condition        | Output                         |
//! |------------------|--------------------------------|
//! | k ≤ n ≤ 21       | digits, then n−k zeros         |
//! | 0 < n ≤ 21       | digits with a point after n    |
//! | −6 < n ≤ 0       | `0.`, −n zeros, digits         |
//! | otherwise        | `d[.ddd]e±(n−1)`               |

use crate::value::JsonNumber;

/// Largest decimal point position printed without an exponent.
const MAX_PLAIN_POINT: i32 = 21;
/// Smallest decimal point position printed without an exponent.
const MIN_PLAIN_POINT: i32 = -5;

/// Canonical text of a number.
pub fn format_number(number: JsonNumber) -> String {
    let mut out = String::new();
    write_number(number, &mut out);
    out
}

/// Append the canonical text of a number to `out`.
pub(crate) fn write_number(number: JsonNumber, out: &mut String) {
    let value = number.get();
    // Covers -0 as well.
    if value == 0.0 {
        out.push('0');
        return;
    }
    if value.is_sign_negative() {
        out.push('-');
    }

    let mut buf = ryu::Buffer::new();
    let (digits, point) = decompose(buf.format_finite(value.abs()));
    layout(&digits, point, out);
}

/// Split ryu output into significant digits and the decimal point position.
///
/// `"123.45"` → (`"12345"`, 3); `"1e-7"` → (`"1"`, −6); `"0.001"` → (`"1"`, −2).
fn decompose(shortest: &str) -> (String, i32) {
    let (mantissa, exponent) = match shortest.split_once('e') {
        Some((m, e)) => (m, parse_exponent(e)),
        None => (shortest, 0),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let mut point = int_part.len() as i32 + exponent;
    let all: String = int_part.chars().chain(frac_part.chars()).collect();
    let trimmed = all.trim_start_matches('0');
    point -= (all.len() - trimmed.len()) as i32;
    let digits = trimmed.trim_end_matches('0').to_owned();
    (digits, point)
}

/// ryu writes exponents as an optional `-` followed by ASCII digits.
fn parse_exponent(text: &str) -> i32 {
    let (negative, magnitude) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let value = magnitude
        .bytes()
        .filter(u8::is_ascii_digit)
        .fold(0i32, |acc, d| acc * 10 + i32::from(d - b'0'));
    if negative {
        -value
    } else {
        value
    }
}

fn layout(digits: &str, point: i32, out: &mut String) {
    let k = digits.len() as i32;

    if k <= point && point <= MAX_PLAIN_POINT {
        out.push_str(digits);
        out.extend(std::iter::repeat('0').take((point - k) as usize));
    } else if 0 < point && point <= MAX_PLAIN_POINT {
        let (int_part, frac_part) = digits.split_at(point as usize);
        out.push_str(int_part);
        out.push('.');
        out.push_str(frac_part);
    } else if MIN_PLAIN_POINT <= point && point <= 0 {
        out.push_str("0.");
        out.extend(std::iter::repeat('0').take((-point) as usize));
        out.push_str(digits);
    } else {
        let (first, rest) = digits.split_at(1);
        out.push_str(first);
        if !rest.is_empty() {
            out.push('.');
            out.push_str(rest);
        }
        let exponent = point - 1;
        out.push('e');
        out.push(if exponent >= 0 { '+' } else { '-' });
        out.push_str(&exponent.unsigned_abs().to_string());
    }
}
