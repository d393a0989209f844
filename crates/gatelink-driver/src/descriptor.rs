//! Hardware descriptor documents.
//!
//! A [`HardwareDescriptor`] declares how one device type communicates: whether
//! it is a sensor or an actuator, which wire fields carry its state, and the
//! [`Formula`]s that convert raw values. Descriptors are JSON documents; the
//! field names below follow the persisted format and must not change.
//!
//! The persisted shape gates its frame fields behind the `sensor` flag. The
//! typed view of that choice is [`CommunicationMode`], obtained with
//! [`HardwareDescriptor::mode`], which rejects a descriptor missing the frame
//! field its mode requires.
//!
//! # Example
//!
//! ```
//! use gatelink_driver::{CommunicationMode, HardwareDescriptor};
//!
//! let json = r#"{
//!     "sensor": true,
//!     "extendedType": "temperature",
//!     "requestFrame": "TMP",
//!     "formulas": { "STANDARD": { "map": "", "a": 0.1 } }
//! }"#;
//!
//! let descriptor = HardwareDescriptor::from_json_str(json).unwrap();
//! let mode = descriptor.mode().unwrap();
//! assert!(matches!(mode, CommunicationMode::Sensor(_)));
//! assert_eq!(mode.read_frame(), "TMP");
//! ```

use gatelink_core::constants::{
    FIELD_ACK_FRAME, FIELD_REQUEST_FRAME, FORMULA_STANDARD, FORMULA_STATE, MODE_ACTUATOR,
    MODE_SENSOR,
};
use gatelink_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::io::Read;

/// One directional value transform: a lookup table and a coefficient.
///
/// `map` is the textual table, `(key,value)` tuples separated by `;`. An
/// empty map makes the formula a pure scaling. A missing `a` means no scaling.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Formula {
    /// Free-form label of the formula, kept for diagnostics.
    #[serde(
        rename = "translationType",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub translation_type: Option<String>,

    /// Textual lookup table.
    #[serde(default, deserialize_with = "null_as_default")]
    pub map: String,

    /// Multiplicative coefficient.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<f64>,
}

impl Formula {
    /// Formula with a lookup table and no coefficient.
    pub fn mapping(map: impl Into<String>) -> Self {
        Self {
            map: map.into(),
            ..Self::default()
        }
    }

    /// Formula with a coefficient and no lookup table.
    #[must_use]
    pub fn scaling(a: f64) -> Self {
        Self {
            a: Some(a),
            ..Self::default()
        }
    }

    /// Set the coefficient.
    #[must_use]
    pub fn with_coefficient(mut self, a: f64) -> Self {
        self.a = Some(a);
        self
    }
}

/// Persisted description of a device type.
///
/// Only `sensor`, `extendedType`, `formulas`, `frequency`, `pairingNeeded`
/// and the frame fields drive translation. The remaining fields are carried
/// verbatim so that a driver item can report where it came from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareDescriptor {
    /// Sensor (`true`) or actuator (`false`).
    #[serde(rename = "sensor", default, deserialize_with = "null_as_default")]
    pub is_sensor: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub communication_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_protocol: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_index: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eo_rorg: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eo_func: Option<i64>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote_learning: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_triggers: Option<bool>,

    /// Logical type name of the driver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extended_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset_value: Option<f64>,

    /// Formulas by name (`STANDARD`, `STATE`).
    #[serde(default, deserialize_with = "null_as_default")]
    pub formulas: HashMap<String, Formula>,

    /// Polling interval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<i64>,

    #[serde(default, deserialize_with = "null_as_default")]
    pub pairing_needed: bool,

    /// Sensor: wire field to read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_frame: Option<String>,

    /// Actuator: wire field acknowledging the state.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ack_frame: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_request_delay: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_state_response: Option<bool>,

    /// Actuator: dedicated wire field for commands.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_request_frame: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_to_propagate: Option<String>,
}

impl HardwareDescriptor {
    /// Sensor descriptor reading `request_frame`.
    pub fn sensor(request_frame: impl Into<String>) -> Self {
        Self {
            is_sensor: true,
            request_frame: Some(request_frame.into()),
            ..Self::default()
        }
    }

    /// Actuator descriptor acknowledged on `ack_frame`.
    pub fn actuator(ack_frame: impl Into<String>) -> Self {
        Self {
            is_sensor: false,
            ack_frame: Some(ack_frame.into()),
            ..Self::default()
        }
    }

    /// Add or replace a formula.
    #[must_use]
    pub fn with_formula(mut self, name: impl Into<String>, formula: Formula) -> Self {
        self.formulas.insert(name.into(), formula);
        self
    }

    /// Set the dedicated command field of an actuator.
    #[must_use]
    pub fn with_state_request_frame(mut self, frame: impl Into<String>) -> Self {
        self.state_request_frame = Some(frame.into());
        self
    }

    /// Set the logical type name.
    #[must_use]
    pub fn with_extended_type(mut self, extended_type: impl Into<String>) -> Self {
        self.extended_type = Some(extended_type.into());
        self
    }

    /// Set the polling interval.
    #[must_use]
    pub fn with_frequency(mut self, frequency: i64) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Set the pairing flag.
    #[must_use]
    pub fn with_pairing_needed(mut self, pairing_needed: bool) -> Self {
        self.pairing_needed = pairing_needed;
        self
    }

    /// Parse a descriptor document.
    ///
    /// # Errors
    /// Returns `Error::InvalidDescriptor` if the document is not valid JSON
    /// or does not match the descriptor shape.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document =
            serde_json::from_str(json).map_err(|e| Error::invalid_descriptor(e.to_string()))?;
        Self::from_document(document)
    }

    /// Parse a descriptor document from bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidDescriptor` on malformed input.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let document =
            serde_json::from_slice(bytes).map_err(|e| Error::invalid_descriptor(e.to_string()))?;
        Self::from_document(document)
    }

    /// Parse a descriptor document from a reader.
    ///
    /// # Errors
    /// Returns `Error::Io` if reading fails and `Error::InvalidDescriptor`
    /// on malformed input.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let document = serde_json::from_reader(reader).map_err(|e| {
            if e.is_io() {
                Error::Io(e.into())
            } else {
                Error::invalid_descriptor(e.to_string())
            }
        })?;
        Self::from_document(document)
    }

    // Derived struct visitors also accept JSON arrays, matching fields by
    // position. Descriptors and their formulas must be objects.
    fn from_document(document: serde_json::Value) -> Result<Self> {
        let Some(fields) = document.as_object() else {
            return Err(Error::invalid_descriptor(format!(
                "expected a JSON object, got {}",
                json_kind(&document)
            )));
        };

        if let Some(formulas) = fields.get("formulas").and_then(serde_json::Value::as_object) {
            for (name, formula) in formulas {
                if !formula.is_object() {
                    return Err(Error::invalid_descriptor(format!(
                        "formula {name}: expected a JSON object, got {}",
                        json_kind(formula)
                    )));
                }
            }
        }

        serde_json::from_value(document).map_err(|e| Error::invalid_descriptor(e.to_string()))
    }

    /// Formula declared under `name`, if any.
    #[must_use]
    pub fn formula(&self, name: &str) -> Option<&Formula> {
        self.formulas.get(name)
    }

    /// The `STANDARD` formula, if declared.
    #[must_use]
    pub fn standard_formula(&self) -> Option<&Formula> {
        self.formula(FORMULA_STANDARD)
    }

    /// The `STATE` formula, if declared.
    #[must_use]
    pub fn state_formula(&self) -> Option<&Formula> {
        self.formula(FORMULA_STATE)
    }

    /// Resolve the communication mode of this descriptor.
    ///
    /// Frame fields that belong to the other mode are ignored.
    ///
    /// # Errors
    /// Returns `Error::MissingFrameField` if a sensor has no `requestFrame`
    /// or an actuator has no `ackFrame`.
    pub fn mode(&self) -> Result<CommunicationMode> {
        if self.is_sensor {
            let request_frame = self
                .request_frame
                .clone()
                .ok_or_else(|| Error::missing_frame_field(MODE_SENSOR, FIELD_REQUEST_FRAME))?;
            Ok(CommunicationMode::Sensor(SensorDescriptor { request_frame }))
        } else {
            let ack_frame = self
                .ack_frame
                .clone()
                .ok_or_else(|| Error::missing_frame_field(MODE_ACTUATOR, FIELD_ACK_FRAME))?;
            Ok(CommunicationMode::Actuator(ActuatorDescriptor {
                ack_frame,
                state_request_frame: self.state_request_frame.clone(),
            }))
        }
    }
}

/// Frame fields of a sensor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDescriptor {
    /// Wire field to read; sensors are never written to.
    pub request_frame: String,
}

/// Frame fields of an actuator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActuatorDescriptor {
    /// Wire field acknowledging the state.
    pub ack_frame: String,

    /// Dedicated wire field for commands.
    pub state_request_frame: Option<String>,
}

impl ActuatorDescriptor {
    /// Field commands are written to: the dedicated command field when
    /// declared, the acknowledge field otherwise.
    #[must_use]
    pub fn write_frame(&self) -> &str {
        self.state_request_frame.as_deref().unwrap_or(&self.ack_frame)
    }
}

/// Communication mode of a descriptor, with the frame fields it requires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommunicationMode {
    Sensor(SensorDescriptor),
    Actuator(ActuatorDescriptor),
}

impl CommunicationMode {
    /// Whether this is the sensor mode.
    #[must_use]
    pub fn is_sensor(&self) -> bool {
        matches!(self, Self::Sensor(_))
    }

    /// Wire field decoded on the read path.
    #[must_use]
    pub fn read_frame(&self) -> &str {
        match self {
            Self::Sensor(sensor) => &sensor.request_frame,
            Self::Actuator(actuator) => &actuator.ack_frame,
        }
    }

    /// Wire field encoded on the write path.
    #[must_use]
    pub fn write_frame(&self) -> &str {
        match self {
            Self::Sensor(sensor) => &sensor.request_frame,
            Self::Actuator(actuator) => actuator.write_frame(),
        }
    }

    /// Mode label used in diagnostics.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sensor(_) => MODE_SENSOR,
            Self::Actuator(_) => MODE_ACTUATOR,
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// Older descriptor files write `null` where the field is empty.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
