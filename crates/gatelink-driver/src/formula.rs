//! Formula compiler.
//!
//! Turns a declarative [`Formula`] into a [`TranslationRule`]. The map text
//! follows the descriptor grammar:
//!
//! ```text
//! map        := tuple (';' tuple)*
//! tuple      := '(' key ',' value ')'
//! ```
//!
//! Every `(` and `)` is stripped wherever it occurs before the tuple is split
//! on `,`. Tuples that do not split into exactly two parts are skipped and
//! reported; the rest of the map still compiles.

use crate::descriptor::Formula;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::translation::{LookupTable, TranslationRule};
use gatelink_core::constants::{
    DEFAULT_COEFFICIENT, PAIR_SEPARATOR, TUPLE_ARITY, TUPLE_CLOSE, TUPLE_OPEN, TUPLE_SEPARATOR,
};
use gatelink_core::{Value, coerce};
use tracing::debug;

/// Compile a formula into a rule.
///
/// - `None` (no formula declared for this direction) yields the identity rule.
/// - The coefficient is the formula's `a`, or 1.
/// - Keys are always coerced. Values are kept as raw strings when
///   `force_value_to_string` is set, coerced otherwise.
///
/// # Example
/// ```
/// use gatelink_core::Value;
/// use gatelink_driver::formula::compile_with;
/// use gatelink_driver::{DiagnosticLog, Formula};
///
/// let log = DiagnosticLog::new();
/// let formula = Formula::mapping("(1,OPEN);bad;(0,CLOSED)");
/// let rule = compile_with(Some(&formula), true, &log);
///
/// assert_eq!(rule.table().len(), 2);
/// assert_eq!(rule.translate(Value::Int(1)), Value::from("OPEN"));
/// assert_eq!(log.len(), 1);
/// ```
#[must_use]
pub fn compile_with(
    formula: Option<&Formula>,
    force_value_to_string: bool,
    sink: &dyn DiagnosticSink,
) -> TranslationRule {
    let Some(formula) = formula else {
        return TranslationRule::identity();
    };

    let coefficient = formula.a.unwrap_or(DEFAULT_COEFFICIENT);
    debug!(coefficient, map = %formula.map, "Compiling formula");

    let table = if formula.map.is_empty() {
        LookupTable::new()
    } else {
        parse_map(&formula.map, force_value_to_string, sink)
    };

    TranslationRule::new(coefficient, table)
}

/// Parse the textual map of a formula into a lookup table.
///
/// Duplicate keys keep the value of the last tuple.
#[must_use]
pub fn parse_map(map: &str, force_value_to_string: bool, sink: &dyn DiagnosticSink) -> LookupTable {
    let mut table = LookupTable::new();

    for raw in map.split(TUPLE_SEPARATOR) {
        let Some((key, value)) = parse_tuple(raw, force_value_to_string) else {
            sink.record(Diagnostic::MalformedTuple {
                tuple: raw.to_string(),
            });
            continue;
        };
        table.insert(key, value);
    }

    table
}

fn parse_tuple(raw: &str, force_value_to_string: bool) -> Option<(Value, Value)> {
    let stripped: String = raw
        .chars()
        .filter(|c| *c != TUPLE_OPEN && *c != TUPLE_CLOSE)
        .collect();

    let parts: Vec<&str> = stripped.split(PAIR_SEPARATOR).collect();
    if parts.len() != TUPLE_ARITY {
        return None;
    }

    let key = coerce(parts[0]);
    let value = if force_value_to_string {
        Value::String(parts[1].to_string())
    } else {
        coerce(parts[1])
    };
    Some((key, value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::{DiagnosticKind, DiagnosticLog};

    fn compile(map: &str, force: bool) -> (TranslationRule, DiagnosticLog) {
        let log = DiagnosticLog::new();
        let rule = compile_with(Some(&Formula::mapping(map)), force, &log);
        (rule, log)
    }

    #[test]
    fn test_absent_formula_is_identity() {
        let log = DiagnosticLog::new();
        let rule = compile_with(None, true, &log);
        assert!(rule.is_identity());
        assert!(log.is_empty());
    }

    #[test]
    fn test_coefficient_defaults_to_one() {
        let (rule, _) = compile("(1,ON)", true);
        assert_eq!(rule.coefficient(), 1.0);

        let log = DiagnosticLog::new();
        let rule = compile_with(Some(&Formula::scaling(0.1)), false, &log);
        assert_eq!(rule.coefficient(), 0.1);
    }

    #[test]
    fn test_empty_map_is_pure_scaling() {
        let log = DiagnosticLog::new();
        let rule = compile_with(Some(&Formula::scaling(2.0)), true, &log);
        assert!(rule.table().is_empty());
        assert!(!rule.is_identity());
        assert!(log.is_empty());
    }

    #[test]
    fn test_present_formula_without_coefficient_or_map_is_identity() {
        let log = DiagnosticLog::new();
        let rule = compile_with(Some(&Formula::default()), false, &log);
        assert!(rule.is_identity());
    }

    #[test]
    fn test_malformed_tuple_is_skipped() {
        let (rule, log) = compile("(1,OPEN);bad;(0,CLOSED)", true);

        let table = rule.table();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get(&Value::Float(1.0)), Some(&Value::from("OPEN")));
        assert_eq!(table.get(&Value::Float(0.0)), Some(&Value::from("CLOSED")));

        assert_eq!(
            log.events(),
            vec![Diagnostic::MalformedTuple {
                tuple: "bad".to_string()
            }]
        );
    }

    #[test]
    fn test_too_many_fields_is_skipped() {
        let (rule, log) = compile("(1,2,3);(4,5)", false);
        assert_eq!(rule.table().len(), 1);
        assert_eq!(log.events()[0].kind(), DiagnosticKind::MalformedTuple);
    }

    #[test]
    fn test_trailing_separator_is_skipped() {
        let (rule, log) = compile("(1,ON);", true);
        assert_eq!(rule.table().len(), 1);
        assert_eq!(
            log.events(),
            vec![Diagnostic::MalformedTuple {
                tuple: String::new()
            }]
        );
    }

    #[test]
    fn test_forced_values_stay_strings() {
        let (rule, _) = compile("(1,20);(2,true)", true);
        assert_eq!(rule.table().get(&Value::Float(1.0)), Some(&Value::from("20")));
        assert_eq!(rule.table().get(&Value::Float(2.0)), Some(&Value::from("true")));
    }

    #[test]
    fn test_unforced_values_are_coerced() {
        let (rule, _) = compile("(OPEN,1);(CLOSE,0);(AUTO,true);(MODE,eco)", false);
        let table = rule.table();
        assert_eq!(table.get(&Value::from("OPEN")), Some(&Value::Float(1.0)));
        assert_eq!(table.get(&Value::from("CLOSE")), Some(&Value::Float(0.0)));
        assert_eq!(table.get(&Value::from("AUTO")), Some(&Value::Bool(true)));
        assert_eq!(table.get(&Value::from("MODE")), Some(&Value::from("eco")));
    }

    #[test]
    fn test_parentheses_are_stripped_anywhere() {
        let (rule, log) = compile("1,ON;((0,OFF;(2),(MID)", true);
        let table = rule.table();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get(&Value::Float(1.0)), Some(&Value::from("ON")));
        assert_eq!(table.get(&Value::Float(0.0)), Some(&Value::from("OFF")));
        assert_eq!(table.get(&Value::Float(2.0)), Some(&Value::from("MID")));
        assert!(log.is_empty());
    }

    #[test]
    fn test_tokens_are_not_trimmed() {
        let (rule, _) = compile("(1, ON)", true);
        assert_eq!(rule.table().get(&Value::Float(1.0)), Some(&Value::from(" ON")));

        let (rule, _) = compile("( 1,ON)", true);
        assert_eq!(rule.table().get(&Value::from(" 1")), Some(&Value::from("ON")));
    }

    #[test]
    fn test_duplicate_key_last_wins() {
        let (rule, _) = compile("(1,A);(1.0,B)", true);
        assert_eq!(rule.table().len(), 1);
        assert_eq!(rule.table().get(&Value::Float(1.0)), Some(&Value::from("B")));
    }

    #[test]
    fn test_boolean_keys() {
        let (rule, _) = compile("(true,ON);(false,OFF)", true);
        assert_eq!(rule.translate(Value::Bool(false)), Value::from("OFF"));
    }

    #[test]
    fn test_empty_key_and_value() {
        let (rule, log) = compile("(,)", true);
        assert_eq!(rule.table().get(&Value::from("")), Some(&Value::from("")));
        assert!(log.is_empty());
    }
}
