//! Runtime values flowing through translation rules.
//!
//! Wire readings, lookup table keys and decoded application values are all
//! represented by the closed [`Value`] variant. Integers and floats are kept
//! apart so that the integer/float key rule of table lookups is an explicit
//! branch of [`Value::matches_key`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A scalar value read from or written to a device.
///
/// Serialized untagged as the natural JSON scalar. Variant order matters for
/// deserialization: a JSON integer that fits in `i64` becomes [`Value::Int`],
/// any other number becomes [`Value::Float`].
///
/// # Example
/// ```
/// use gatelink_core::Value;
///
/// let value: Value = serde_json::from_str("42").unwrap();
/// assert_eq!(value, Value::Int(42));
///
/// let value: Value = serde_json::from_str("21.5").unwrap();
/// assert_eq!(value, Value::Float(21.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean state.
    Bool(bool),

    /// 64-bit or native integer.
    Int(i64),

    /// 64-bit or 32-bit float.
    Float(f64),

    /// Text, kept verbatim.
    String(String),
}

impl Value {
    /// Compare this value against a lookup table key.
    ///
    /// Equality is exact-type equality, except that an integer value equals a
    /// float key with the same numeric value. The reverse does not hold: a
    /// float value never matches an integer key.
    ///
    /// # Example
    /// ```
    /// use gatelink_core::Value;
    ///
    /// assert!(Value::Int(1).matches_key(&Value::Float(1.0)));
    /// assert!(!Value::Float(1.0).matches_key(&Value::Int(1)));
    /// assert!(!Value::Bool(true).matches_key(&Value::Float(1.0)));
    /// ```
    #[must_use]
    pub fn matches_key(&self, key: &Value) -> bool {
        match (self, key) {
            (Value::Int(value), Value::Float(key)) => *value as f64 == *key,
            _ => self == key,
        }
    }

    /// Numeric value as `f64`, or `None` for booleans and strings.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(_) | Value::String(_) => None,
        }
    }

    /// String content, or `None` for non-string values.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value can be scaled by a coefficient.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Int(_) | Value::Float(_))
    }

    /// Short name of the variant, used in diagnostics.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<isize> for Value {
    fn from(value: isize) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}
