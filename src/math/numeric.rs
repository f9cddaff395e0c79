//! Loose numeric coercion.
//!
//! Configuration files and proxy variables carry numbers in whatever shape the
//! operator typed them: JSON numbers, quoted strings, booleans, `null`, empty
//! strings. Every coercion here is total: it returns a finite number or the
//! caller's fallback, never NaN or infinity (unless the fallback itself is).

use serde_json::Value;

/// Coerce a configuration value to a finite number, or return `fallback`.
///
/// - numbers are used as-is
/// - strings are trimmed; the empty string is `0`; `0x`/`0o`/`0b` prefixes are honored
/// - `true`/`false` are `1`/`0`, `null` is `0`
/// - `[]` is `0`, a one-element array coerces its element
/// - objects and longer arrays fall back
pub fn to_number(value: &Value, fallback: f64) -> f64 {
    finite_or(coerce(value), fallback)
}

/// Like [`to_number`], treating a missing value as non-numeric.
pub fn to_number_opt(value: Option<&Value>, fallback: f64) -> f64 {
    value.map_or(fallback, |v| to_number(v, fallback))
}

/// Coerce a raw string field (e.g. an nginx variable) to a finite number.
pub fn parse_number(raw: &str, fallback: f64) -> f64 {
    finite_or(parse_loose(raw), fallback)
}

/// Return `value` if it is finite, else `fallback`.
pub fn finite_value(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

/// Finite interpretation of a configuration value, if it has one.
pub fn finite_number(value: &Value) -> Option<f64> {
    coerce(value).filter(|v| v.is_finite())
}

fn finite_or(value: Option<f64>, fallback: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => v,
        _ => fallback,
    }
}

fn coerce(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_loose(s),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [single] => coerce_element(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

// A single array element is stringified before parsing, so booleans and
// objects stop being numeric while `null` becomes the empty string.
fn coerce_element(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(_) | Value::Object(_) => None,
        other => coerce(other),
    }
}

fn parse_loose(raw: &str) -> Option<f64> {
    let s = raw.trim();
    if s.is_empty() {
        return Some(0.0);
    }
    if let Some(v) = parse_prefixed_integer(s) {
        return Some(v);
    }
    // `f64::from_str` also accepts "inf"/"nan"; the finiteness check rejects them.
    s.parse::<f64>().ok()
}

fn parse_prefixed_integer(s: &str) -> Option<f64> {
    let lower = s.get(..2)?.to_ascii_lowercase();
    let radix = match lower.as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0_f64, |acc, c| {
        c.to_digit(radix).map(|d| acc * f64::from(radix) + f64::from(d))
    })
}
