//! Translation rules: executable form of a formula.
//!
//! A [`TranslationRule`] converts one value in two steps:
//!
//! 1. **Lookup**: when the table is non-empty, the first entry whose key
//!    matches the value (see [`Value::matches_key`]) replaces it. A miss
//!    passes the value through unchanged.
//! 2. **Scaling**: when the coefficient is not 1, numeric values are
//!    multiplied by it. With a coefficient above 1 the product is truncated
//!    toward zero into an integer; otherwise it stays a float. Non-numeric
//!    values are left unscaled.
//!
//! Neither step fails. Fallbacks are reported as [`Diagnostic`]s.
//!
//! # Example
//!
//! ```
//! use gatelink_core::Value;
//! use gatelink_driver::{Formula, TranslationRule};
//!
//! let rule = TranslationRule::compile(Some(&Formula::scaling(10.0)), false);
//! assert_eq!(rule.translate(Value::Float(3.0)), Value::Int(30));
//!
//! let rule = TranslationRule::compile(Some(&Formula::scaling(0.5)), false);
//! assert_eq!(rule.translate(Value::Float(10.0)), Value::Float(5.0));
//! ```

use crate::descriptor::Formula;
use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::formula;
use gatelink_core::Value;
use gatelink_core::constants::DEFAULT_COEFFICIENT;

/// Lookup table of a rule.
///
/// Keys are unique: inserting an existing key replaces its value. Entries
/// keep insertion order, which decides the winner when several keys match a
/// value (an integer value matches both an integer key and an equal float key).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: Vec<(Value, Value)>,
}

impl LookupTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing the value of an identical key.
    pub fn insert(&mut self, key: Value, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value of the first entry whose key matches `value`.
    #[must_use]
    pub fn lookup(&self, value: &Value) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(key, _)| value.matches_key(key))
            .map(|(_, v)| v)
    }

    /// Value stored under exactly `key`.
    #[must_use]
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(key, value)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

impl FromIterator<(Value, Value)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (key, value) in iter {
            table.insert(key, value);
        }
        table
    }
}

/// Compiled, immutable value transform.
#[derive(Debug, Clone, PartialEq)]
pub struct TranslationRule {
    coefficient: f64,
    table: LookupTable,
}

impl Default for TranslationRule {
    fn default() -> Self {
        Self::identity()
    }
}

impl TranslationRule {
    /// Rule that returns every value unchanged.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            coefficient: DEFAULT_COEFFICIENT,
            table: LookupTable::new(),
        }
    }

    /// Rule from an already built table and coefficient.
    #[must_use]
    pub fn new(coefficient: f64, table: LookupTable) -> Self {
        Self { coefficient, table }
    }

    /// Compile a formula, logging skipped tuples through `tracing`.
    ///
    /// See [`formula::compile_with`].
    #[must_use]
    pub fn compile(formula: Option<&Formula>, force_value_to_string: bool) -> Self {
        formula::compile_with(formula, force_value_to_string, &TracingSink)
    }

    /// Compile a formula, reporting skipped tuples to `sink`.
    #[must_use]
    pub fn compile_with(
        formula: Option<&Formula>,
        force_value_to_string: bool,
        sink: &dyn DiagnosticSink,
    ) -> Self {
        formula::compile_with(formula, force_value_to_string, sink)
    }

    /// Multiplicative coefficient.
    #[must_use]
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }

    /// Lookup table.
    #[must_use]
    pub fn table(&self) -> &LookupTable {
        &self.table
    }

    /// Whether this rule returns every value unchanged.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.coefficient == DEFAULT_COEFFICIENT && self.table.is_empty()
    }

    /// Translate a value, logging fallbacks through `tracing`.
    #[must_use]
    pub fn translate(&self, value: Value) -> Value {
        self.translate_with(value, &TracingSink)
    }

    /// Translate a value, reporting fallbacks to `sink`.
    #[must_use]
    pub fn translate_with(&self, value: Value, sink: &dyn DiagnosticSink) -> Value {
        let value = self.lookup(value, sink);

        if self.coefficient != DEFAULT_COEFFICIENT {
            self.scale(value, sink)
        } else {
            value
        }
    }

    fn lookup(&self, value: Value, sink: &dyn DiagnosticSink) -> Value {
        if self.table.is_empty() {
            return value;
        }

        match self.table.lookup(&value) {
            Some(translated) => translated.clone(),
            None => {
                sink.record(Diagnostic::LookupMiss {
                    value: value.clone(),
                    table_len: self.table.len(),
                });
                value
            }
        }
    }

    fn scale(&self, value: Value, sink: &dyn DiagnosticSink) -> Value {
        let Some(number) = value.as_f64() else {
            sink.record(Diagnostic::UnsupportedScaling {
                value: value.clone(),
                coefficient: self.coefficient,
            });
            return value;
        };

        let product = number * self.coefficient;
        if self.coefficient > 1.0 {
            // Truncates toward zero, saturating at the i64 bounds.
            Value::Int(product as i64)
        } else {
            Value::Float(product)
        }
    }
}
