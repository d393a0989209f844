//! Coercion of descriptor tokens into values.
//!
//! Formula maps are plain text, so every key (and every value on the write
//! path) is converted to the most specific [`Value`] it can represent. The
//! priority is fixed: float, then boolean, then string. A token such as `"1"`
//! therefore always becomes a float, never a boolean.

use crate::value::Value;

/// Coerce a textual token into a [`Value`].
///
/// Coercion is total: a token that is neither a float nor a boolean is
/// returned as a string, unmodified. The token is not trimmed.
///
/// # Example
/// ```
/// use gatelink_core::{coerce, Value};
///
/// assert_eq!(coerce("2.75"), Value::Float(2.75));
/// assert_eq!(coerce("1"), Value::Float(1.0));
/// assert_eq!(coerce("true"), Value::Bool(true));
/// assert_eq!(coerce("OPEN"), Value::String("OPEN".to_string()));
/// ```
#[must_use]
pub fn coerce(token: &str) -> Value {
    if let Some(f) = parse_float(token) {
        return Value::Float(f);
    }

    if let Some(b) = parse_bool(token) {
        return Value::Bool(b);
    }

    Value::String(token.to_string())
}

/// Parse a boolean token.
///
/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`, the
/// spellings existing descriptor files rely on.
#[must_use]
pub fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a base-10 float, rejecting finite literals that overflow to infinity.
///
/// `inf`, `infinity` and `nan` spellings are still accepted.
fn parse_float(token: &str) -> Option<f64> {
    let f: f64 = token.parse().ok()?;
    if f.is_infinite() && !token.to_ascii_lowercase().contains("inf") {
        return None;
    }
    Some(f)
}
