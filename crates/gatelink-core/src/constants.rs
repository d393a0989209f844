//! Descriptor constants for the gatelink driver engine.
//!
//! Hardware descriptors are JSON documents whose formulas carry a compact
//! textual lookup table. These constants pin the formula names the engine
//! recognizes and the delimiters of the map grammar:
//!
//! ```text
//! map   := tuple (';' tuple)*
//! tuple := '(' key ',' value ')'
//! ```
//!
//! Parentheses are stripped wherever they occur, so `1,OPEN` and `(1,OPEN`
//! are both accepted as tuples. Changing any of these values breaks
//! compatibility with existing descriptor files.
//!
//! # Usage
//!
//! ```
//! use gatelink_core::constants::*;
//!
//! let map = "(1,OPEN);(0,CLOSED)";
//! let tuples: Vec<&str> = map.split(TUPLE_SEPARATOR).collect();
//! assert_eq!(tuples.len(), 2);
//! assert_eq!(FORMULA_STANDARD, "STANDARD");
//! ```

// ============================================================================
// Formula Names
// ============================================================================

/// Formula used for the value path of a descriptor.
///
/// Sensors decode readings with it; actuators encode commands with it.
pub const FORMULA_STANDARD: &str = "STANDARD";

/// Formula used by actuators to decode the acknowledged state.
pub const FORMULA_STATE: &str = "STATE";

// ============================================================================
// Map Grammar
// ============================================================================

/// Separator between tuples of a formula map.
pub const TUPLE_SEPARATOR: char = ';';

/// Separator between the key and the value of a tuple.
pub const PAIR_SEPARATOR: char = ',';

/// Tuple opening character, stripped before splitting.
pub const TUPLE_OPEN: char = '(';

/// Tuple closing character, stripped before splitting.
pub const TUPLE_CLOSE: char = ')';

/// Number of fields a well-formed tuple splits into.
pub const TUPLE_ARITY: usize = 2;

// ============================================================================
// Scaling
// ============================================================================

/// Coefficient of a formula that declares no `a`.
///
/// A rule with this coefficient never scales.
pub const DEFAULT_COEFFICIENT: f64 = 1.0;

// ============================================================================
// Descriptor Modes
// ============================================================================

/// Mode label used in diagnostics for sensor descriptors.
pub const MODE_SENSOR: &str = "sensor";

/// Mode label used in diagnostics for actuator descriptors.
pub const MODE_ACTUATOR: &str = "actuator";

/// JSON name of the sensor read field.
pub const FIELD_REQUEST_FRAME: &str = "requestFrame";

/// JSON name of the actuator acknowledge field.
pub const FIELD_ACK_FRAME: &str = "ackFrame";
