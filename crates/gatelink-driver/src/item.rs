//! Driver item assembly.
//!
//! A [`DriverItem`] bundles everything the gateway needs at runtime for one
//! device type: the wire field and rule of the read path (decoding device
//! state), the wire field and rule of the write path (encoding commands) and
//! the polling metadata of the descriptor.
//!
//! Rules are wired per communication mode:
//!
//! | Mode     | Read rule                   | Write rule                 | Read field    | Write field                           |
//! |----------|-----------------------------|----------------------------|---------------|---------------------------------------|
//! | Sensor   | `STANDARD`, string values   | identity                   | `requestFrame`| `requestFrame`                        |
//! | Actuator | `STATE`, string values      | `STANDARD`, coerced values | `ackFrame`    | `stateRequestFrame`, else `ackFrame`  |
//!
//! Items are immutable once assembled and can be shared between threads.
//!
//! # Example
//!
//! ```
//! use gatelink_core::Value;
//! use gatelink_driver::{DriverItem, Formula, HardwareDescriptor};
//!
//! let descriptor = HardwareDescriptor::actuator("ACK")
//!     .with_extended_type("relay")
//!     .with_formula("STANDARD", Formula::mapping("(ON,1);(OFF,0)"))
//!     .with_formula("STATE", Formula::mapping("(1,ON);(0,OFF)"));
//!
//! let item = DriverItem::assemble(descriptor).unwrap();
//! assert_eq!(item.item_type(), "relay");
//! assert_eq!(item.encode(Value::from("ON")), Value::Float(1.0));
//! assert_eq!(item.decode(Value::Int(0)), Value::from("OFF"));
//! ```

use crate::descriptor::{CommunicationMode, HardwareDescriptor};
use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::translation::TranslationRule;
use gatelink_core::{Result, Value};
use std::sync::Arc;
use tracing::{debug, warn};

/// A wire field paired with the rule translating its values.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTranslation {
    field: String,
    rule: TranslationRule,
}

impl FieldTranslation {
    /// Pair a wire field with a rule.
    pub fn new(field: impl Into<String>, rule: TranslationRule) -> Self {
        Self {
            field: field.into(),
            rule,
        }
    }

    /// Name of the wire field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Rule applied to the field's values.
    #[must_use]
    pub fn rule(&self) -> &TranslationRule {
        &self.rule
    }

    /// Translate a value, logging fallbacks through `tracing`.
    #[must_use]
    pub fn translate(&self, value: Value) -> Value {
        self.rule.translate(value)
    }

    /// Translate a value, reporting fallbacks to `sink`.
    #[must_use]
    pub fn translate_with(&self, value: Value, sink: &dyn DiagnosticSink) -> Value {
        self.rule.translate_with(value, sink)
    }
}

/// Runtime driver of one device type.
#[derive(Debug, Clone)]
pub struct DriverItem {
    item_type: String,
    read: FieldTranslation,
    write: FieldTranslation,
    frequency: Option<i64>,
    is_sensor: bool,
    pairing_needed: bool,
    descriptor: Arc<HardwareDescriptor>,
}

impl DriverItem {
    /// Assemble an item, logging skipped map tuples through `tracing`.
    ///
    /// # Errors
    /// Returns `Error::MissingFrameField` if the descriptor lacks the frame
    /// field its mode requires. No partial item is produced.
    pub fn assemble(descriptor: HardwareDescriptor) -> Result<Self> {
        Self::assemble_with(descriptor, &TracingSink)
    }

    /// Assemble an item, reporting skipped map tuples to `sink`.
    ///
    /// # Errors
    /// Returns `Error::MissingFrameField` if the descriptor lacks the frame
    /// field its mode requires.
    pub fn assemble_with(
        descriptor: HardwareDescriptor,
        sink: &dyn DiagnosticSink,
    ) -> Result<Self> {
        let mode = descriptor.mode().inspect_err(|e| {
            warn!(
                extended_type = descriptor.extended_type.as_deref().unwrap_or_default(),
                error = %e,
                "Fail to generate a driver item from the hardware descriptor"
            );
        })?;

        let (read, write) = match &mode {
            CommunicationMode::Sensor(sensor) => (
                FieldTranslation::new(
                    &sensor.request_frame,
                    TranslationRule::compile_with(descriptor.standard_formula(), true, sink),
                ),
                FieldTranslation::new(&sensor.request_frame, TranslationRule::identity()),
            ),
            CommunicationMode::Actuator(actuator) => (
                FieldTranslation::new(
                    &actuator.ack_frame,
                    TranslationRule::compile_with(descriptor.state_formula(), true, sink),
                ),
                FieldTranslation::new(
                    actuator.write_frame(),
                    TranslationRule::compile_with(descriptor.standard_formula(), false, sink),
                ),
            ),
        };

        let item = Self {
            item_type: descriptor.extended_type.clone().unwrap_or_default(),
            read,
            write,
            frequency: descriptor.frequency,
            is_sensor: descriptor.is_sensor,
            pairing_needed: descriptor.pairing_needed,
            descriptor: Arc::new(descriptor),
        };

        debug!(
            item_type = %item.item_type,
            mode = mode.label(),
            read_field = %item.read.field,
            write_field = %item.write.field,
            "Driver item assembled"
        );

        Ok(item)
    }

    /// Parse a descriptor document and assemble it.
    ///
    /// # Errors
    /// Returns `Error::InvalidDescriptor` on malformed JSON and
    /// `Error::MissingFrameField` on an unusable descriptor.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Self::assemble(HardwareDescriptor::from_json_str(json)?)
    }

    /// Logical type name, empty when the descriptor declares none.
    #[must_use]
    pub fn item_type(&self) -> &str {
        &self.item_type
    }

    /// Read path: field and rule decoding inbound values.
    #[must_use]
    pub fn read(&self) -> &FieldTranslation {
        &self.read
    }

    /// Write path: field and rule encoding outbound commands.
    #[must_use]
    pub fn write(&self) -> &FieldTranslation {
        &self.write
    }

    /// Polling interval.
    #[must_use]
    pub fn frequency(&self) -> Option<i64> {
        self.frequency
    }

    /// Whether the device type is a sensor.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        self.is_sensor
    }

    /// Whether devices of this type must be paired before use.
    #[must_use]
    pub fn pairing_needed(&self) -> bool {
        self.pairing_needed
    }

    /// Descriptor the item was assembled from.
    #[must_use]
    pub fn descriptor(&self) -> &HardwareDescriptor {
        &self.descriptor
    }

    /// Decode a raw value read from the device.
    #[must_use]
    pub fn decode(&self, value: Value) -> Value {
        self.read.translate(value)
    }

    /// Decode a raw value, reporting fallbacks to `sink`.
    #[must_use]
    pub fn decode_with(&self, value: Value, sink: &dyn DiagnosticSink) -> Value {
        self.read.translate_with(value, sink)
    }

    /// Encode an application value for the device.
    #[must_use]
    pub fn encode(&self, value: Value) -> Value {
        self.write.translate(value)
    }

    /// Encode an application value, reporting fallbacks to `sink`.
    #[must_use]
    pub fn encode_with(&self, value: Value, sink: &dyn DiagnosticSink) -> Value {
        self.write.translate_with(value, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::Formula;
    use crate::diagnostics::{DiagnosticKind, DiagnosticLog};
    use gatelink_core::Error;
    use gatelink_core::constants::{FORMULA_STANDARD, FORMULA_STATE};

    #[test]
    fn test_sensor_assembly() {
        let descriptor = HardwareDescriptor::sensor("val")
            .with_formula(FORMULA_STANDARD, Formula::scaling(2.0))
            .with_frequency(30);

        let item = DriverItem::assemble(descriptor).unwrap();
        assert_eq!(item.read().field(), "val");
        assert_eq!(item.write().field(), "val");
        assert!(item.write().rule().is_identity());
        assert_eq!(item.read().rule().coefficient(), 2.0);
        assert!(item.is_sensor());
        assert_eq!(item.frequency(), Some(30));
        assert!(!item.pairing_needed());
        assert_eq!(item.item_type(), "");
    }

    #[test]
    fn test_sensor_read_values_stay_strings() {
        let descriptor = HardwareDescriptor::sensor("val")
            .with_formula(FORMULA_STANDARD, Formula::mapping("(0,20);(1,21)"));

        let item = DriverItem::assemble(descriptor).unwrap();
        assert_eq!(item.decode(Value::Int(1)), Value::from("21"));
    }

    #[test]
    fn test_sensor_ignores_state_formula() {
        let descriptor = HardwareDescriptor::sensor("val")
            .with_formula(FORMULA_STATE, Formula::mapping("(1,ON)"));

        let item = DriverItem::assemble(descriptor).unwrap();
        assert!(item.read().rule().is_identity());
        assert_eq!(item.decode(Value::Int(1)), Value::Int(1));
    }

    #[test]
    fn test_sensor_without_formula_is_identity_both_ways() {
        let item = DriverItem::assemble(HardwareDescriptor::sensor("val")).unwrap();
        assert!(item.read().rule().is_identity());
        assert!(item.write().rule().is_identity());
        assert_eq!(item.encode(Value::Float(4.5)), Value::Float(4.5));
    }

    #[test]
    fn test_actuator_fallback_write_field() {
        let item = DriverItem::assemble(HardwareDescriptor::actuator("ack")).unwrap();
        assert_eq!(item.read().field(), "ack");
        assert_eq!(item.write().field(), "ack");
        assert!(!item.is_sensor());
    }

    #[test]
    fn test_actuator_dedicated_write_field() {
        let item = DriverItem::assemble(
            HardwareDescriptor::actuator("ack").with_state_request_frame("cmd"),
        )
        .unwrap();
        assert_eq!(item.read().field(), "ack");
        assert_eq!(item.write().field(), "cmd");
    }

    #[test]
    fn test_actuator_rule_wiring() {
        let descriptor = HardwareDescriptor::actuator("ack")
            .with_extended_type("shutter")
            .with_pairing_needed(true)
            .with_formula(FORMULA_STANDARD, Formula::mapping("(OPEN,100);(CLOSE,0)"))
            .with_formula(FORMULA_STATE, Formula::mapping("(100,OPEN);(0,CLOSED)"));

        let item = DriverItem::assemble(descriptor).unwrap();
        assert_eq!(item.item_type(), "shutter");
        assert!(item.pairing_needed());

        // Write path values are coerced, read path values are kept as text.
        assert_eq!(item.encode(Value::from("OPEN")), Value::Float(100.0));
        assert_eq!(item.decode(Value::Int(100)), Value::from("OPEN"));
        assert_eq!(item.decode(Value::Float(0.0)), Value::from("CLOSED"));
    }

    #[test]
    fn test_missing_request_frame_fails() {
        let mut descriptor = HardwareDescriptor::sensor("val");
        descriptor.request_frame = None;

        let result = DriverItem::assemble(descriptor);
        assert!(matches!(result, Err(Error::MissingFrameField { .. })));
    }

    #[test]
    fn test_missing_ack_frame_fails() {
        let mut descriptor = HardwareDescriptor::actuator("ack").with_state_request_frame("cmd");
        descriptor.ack_frame = None;

        let result = DriverItem::assemble(descriptor);
        assert!(matches!(result, Err(Error::MissingFrameField { .. })));
    }

    #[test]
    fn test_assembly_reports_malformed_tuples() {
        let log = DiagnosticLog::new();
        let descriptor = HardwareDescriptor::actuator("ack")
            .with_formula(FORMULA_STANDARD, Formula::mapping("(ON,1);junk"))
            .with_formula(FORMULA_STATE, Formula::mapping("oops;(1,ON)"));

        let item = DriverItem::assemble_with(descriptor, &log).unwrap();
        assert_eq!(item.read().rule().table().len(), 1);
        assert_eq!(item.write().rule().table().len(), 1);
        assert_eq!(log.len(), 2);
        assert!(
            log.events()
                .iter()
                .all(|d| d.kind() == DiagnosticKind::MalformedTuple)
        );
    }

    #[test]
    fn test_decode_with_reports_miss() {
        let log = DiagnosticLog::new();
        let item = DriverItem::assemble(
            HardwareDescriptor::actuator("ack")
                .with_formula(FORMULA_STATE, Formula::mapping("(1,ON);(0,OFF)")),
        )
        .unwrap();

        assert_eq!(item.decode_with(Value::Int(5), &log), Value::Int(5));
        assert_eq!(item.encode_with(Value::from("ON"), &log), Value::from("ON"));
        assert_eq!(log.len(), 1);
        assert_eq!(log.events()[0].kind(), DiagnosticKind::LookupMiss);
    }

    #[test]
    fn test_descriptor_is_kept() {
        let descriptor = HardwareDescriptor::sensor("val").with_extended_type("lux");
        let item = DriverItem::assemble(descriptor.clone()).unwrap();
        assert_eq!(item.descriptor(), &descriptor);
    }

    #[test]
    fn test_from_json_str() {
        let item = DriverItem::from_json_str(
            r#"{"sensor": true, "requestFrame": "HUM", "formulas": {"STANDARD": {"map": "", "a": 0.5}}}"#,
        )
        .unwrap();
        assert_eq!(item.decode(Value::Int(90)), Value::Float(45.0));

        assert!(matches!(
            DriverItem::from_json_str(r#"{"sensor": true}"#),
            Err(Error::MissingFrameField { .. })
        ));
        assert!(matches!(
            DriverItem::from_json_str("[]"),
            Err(Error::InvalidDescriptor { .. })
        ));
    }

    #[test]
    fn test_item_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DriverItem>();
    }
}
