//! Driver and translation engine of the gatelink device bridge.
//!
//! Each device type known to the gateway is described by a
//! [`HardwareDescriptor`] document. This crate turns such a document into a
//! [`DriverItem`]: two [`TranslationRule`]s (read path and write path) plus
//! the wire fields they apply to and the polling metadata of the type.
//!
//! ```text
//! descriptor JSON ─► HardwareDescriptor ─► formula compiler ─► TranslationRule
//!                                                                 │
//!                          DriverItem { read, write, frequency } ◄┘
//! ```
//!
//! # Translating values
//!
//! ```
//! use gatelink_core::Value;
//! use gatelink_driver::DriverItem;
//!
//! let item = DriverItem::from_json_str(r#"{
//!     "sensor": false,
//!     "ackFrame": "ACK",
//!     "formulas": {
//!         "STANDARD": { "map": "(ON,1);(OFF,0)" },
//!         "STATE": { "map": "(1,ON);(0,OFF)" }
//!     }
//! }"#).unwrap();
//!
//! assert_eq!(item.decode(Value::Int(1)), Value::from("ON"));
//! assert_eq!(item.encode(Value::from("OFF")), Value::Float(0.0));
//! ```
//!
//! # Degraded translations
//!
//! Compiling and translating never fail. Skipped map tuples, lookup misses
//! and values that cannot be scaled fall back to well-defined behavior and
//! are reported as [`Diagnostic`]s through a [`DiagnosticSink`]. The plain
//! methods log them with `tracing`; the `_with` variants take a sink.
//!
//! # Thread Safety
//!
//! Rules and items are immutable after construction and `Send + Sync`.
//! Nothing in this crate blocks or performs I/O beyond parsing the bytes it
//! is handed.

pub mod descriptor;
pub mod diagnostics;
pub mod formula;
pub mod item;
pub mod payload;
pub mod translation;

pub use descriptor::{
    ActuatorDescriptor, CommunicationMode, Formula, HardwareDescriptor, SensorDescriptor,
};
pub use diagnostics::{
    Diagnostic, DiagnosticCounter, DiagnosticKind, DiagnosticLog, DiagnosticSink, TracingSink,
};
pub use item::{DriverItem, FieldTranslation};
pub use payload::ItemPayload;
pub use translation::{LookupTable, TranslationRule};
