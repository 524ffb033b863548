//! Canonical ticket text.
//!
//! Tickets are encrypted over a fixed textual form so that equal records
//! always produce equal plaintext and therefore equal ciphertext blocks.
//! The form is JSON with:
//!
//! - object keys sorted by code point,
//! - `", "` between items and `": "` between a key and its value,
//! - only 7-bit output: every character outside printable ASCII is written as
//!   a `\uXXXX` escape (lowercase hex, surrogate pairs above U+FFFF),
//! - floats in shortest round-trip form, positional for decimal exponents in
//!   `-4..16` and `1e+16` style otherwise,
//! - integers digit for digit, whatever their size.
//!
//! Existing tickets were issued in this exact byte format, so it must not
//! drift.

use serde_json::{Map, Number, Value};
use std::fmt::Write as _;

/// Renders `value` in canonical form.
///
/// ```
/// use frankenticket::ticket::canonical::to_canonical_string;
/// use serde_json::json;
///
/// let text = to_canonical_string(&json!({"b": [1, 2.5, true, null], "a": "\u{fc}"}));
/// assert_eq!(text, r#"{"a": "\u00fc", "b": [1, 2.5, true, null]}"#);
/// ```
#[must_use]
pub fn to_canonical_string(value: &Value) -> String {
    let mut out = String::with_capacity(128);
    write_value(&mut out, value);
    out
}

fn write_value(out: &mut String, value: &Value) {
    match value {
        Value::Null => out.push_str("null"),
        Value::Bool(true) => out.push_str("true"),
        Value::Bool(false) => out.push_str("false"),
        Value::Number(n) => write_number(out, n),
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(out, item);
            }
            out.push(']');
        }
        Value::Object(map) => write_object(out, map),
    }
}

fn write_object(out: &mut String, map: &Map<String, Value>) {
    let mut entries: Vec<(&String, &Value)> = map.iter().collect();
    entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

    out.push('{');
    for (i, (key, value)) in entries.into_iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_string(out, key);
        out.push_str(": ");
        write_value(out, value);
    }
    out.push('}');
}

fn write_string(out: &mut String, s: &str) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            ' '..='~' => out.push(ch),
            _ => {
                let mut units = [0u16; 2];
                for unit in ch.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{unit:04x}");
                }
            }
        }
    }
    out.push('"');
}

fn write_number(out: &mut String, n: &Number) {
    if let Some(f) = n.as_f64().filter(|_| n.is_f64()) {
        write_float(out, f);
        return;
    }
    // Integer tokens are kept verbatim; only the sign of zero is dropped.
    let token = n.to_string();
    if token == "-0" {
        out.push('0');
    } else {
        out.push_str(&token);
    }
}

/// Python `repr(float)` layout over Rust's shortest round-trip digits.
fn write_float(out: &mut String, f: f64) {
    // `{:e}` yields e.g. "-1.2345e-7": shortest digits, one before the point.
    let sci = format!("{f:e}");
    let (negative, sci) = sci
        .strip_prefix('-')
        .map_or((false, sci.as_str()), |rest| (true, rest));
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();

    if negative {
        out.push('-');
    }

    if (-4..16).contains(&exponent) {
        if exponent >= 0 {
            let int_len = exponent as usize + 1;
            if digits.len() <= int_len {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', int_len - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..int_len]);
                out.push('.');
                out.push_str(&digits[int_len..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-exponent - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exponent < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exponent.unsigned_abs());
    }
}
