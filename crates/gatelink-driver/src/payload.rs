//! JSON payloads of gateway items.
//!
//! Items publish their current value and accept their target as JSON bytes of
//! the form `{"value": <scalar>}`. [`DriverItem::decode_payload`] and
//! [`DriverItem::encode_payload`] run such payloads through the read and
//! write paths of a driver.
//!
//! # Example
//!
//! ```
//! use gatelink_driver::{DriverItem, Formula, HardwareDescriptor};
//!
//! let item = DriverItem::assemble(
//!     HardwareDescriptor::sensor("TMP").with_formula("STANDARD", Formula::scaling(0.1)),
//! )
//! .unwrap();
//!
//! let decoded = item.decode_payload(br#"{"value": 215}"#).unwrap();
//! assert_eq!(decoded, br#"{"value":21.5}"#);
//! ```

use crate::diagnostics::{DiagnosticSink, TracingSink};
use crate::item::DriverItem;
use gatelink_core::{Error, Result, Value};
use serde::{Deserialize, Serialize};

/// Value carried by an item payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemPayload {
    pub value: Value,
}

impl ItemPayload {
    /// Wrap a value.
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Parse payload bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidPayload` if the bytes are not a JSON object with
    /// a scalar `value`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| Error::invalid_payload(e.to_string()))
    }

    /// Serialize to payload bytes.
    ///
    /// # Errors
    /// Returns `Error::InvalidPayload` if the value is a non-finite float,
    /// which JSON cannot represent, or if serialization fails.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        if let Value::Float(f) = self.value
            && !f.is_finite()
        {
            return Err(Error::invalid_payload(format!("unsupported non-finite value {f}")));
        }
        serde_json::to_vec(self).map_err(|e| Error::invalid_payload(e.to_string()))
    }
}

impl DriverItem {
    /// Decode an inbound payload on the read path.
    ///
    /// # Errors
    /// Returns `Error::InvalidPayload` on malformed payload bytes.
    pub fn decode_payload(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        self.decode_payload_with(bytes, &TracingSink)
    }

    /// Decode an inbound payload, reporting fallbacks to `sink`.
    ///
    /// # Errors
    /// Returns `Error::InvalidPayload` on malformed payload bytes.
    pub fn decode_payload_with(&self, bytes: &[u8], sink: &dyn DiagnosticSink) -> Result<Vec<u8>> {
        let payload = ItemPayload::from_bytes(bytes)?;
        ItemPayload::new(self.decode_with(payload.value, sink)).to_bytes()
    }

    /// Encode an outbound target payload on the write path.
    ///
    /// # Errors
    /// Returns `Error::InvalidPayload` on malformed payload bytes.
    pub fn encode_payload(&self, bytes: &[u8]) -> Result<Vec<u8>> {
        self.encode_payload_with(bytes, &TracingSink)
    }

    /// Encode an outbound target payload, reporting fallbacks to `sink`.
    ///
    /// # Errors
    /// Returns `Error::InvalidPayload` on malformed payload bytes.
    pub fn encode_payload_with(&self, bytes: &[u8], sink: &dyn DiagnosticSink) -> Result<Vec<u8>> {
        let payload = ItemPayload::from_bytes(bytes)?;
        ItemPayload::new(self.encode_with(payload.value, sink)).to_bytes()
    }
}
