//! Phone sample - orientation and button state posted by the phone page
//!
//! Absent fields default to `0` / `false`. Present fields are forwarded as
//! the phone sent them, whatever their JSON type; only the body as a whole
//! must be a JSON object. Unknown fields are dropped.

use bytes::Bytes;
use serde::Serialize;
use serde_json::{Map, Value};

use kelp_core::{KelpError, KelpResult};

/// One orientation/button sample from the phone
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneSample {
    /// Pitch
    pub x: Value,
    /// Yaw
    pub y: Value,
    /// Roll
    pub z: Value,
    pub grab_button: Value,
    pub highlight_button: Value,
}

impl Default for PhoneSample {
    fn default() -> Self {
        PhoneSample {
            x: Value::from(0),
            y: Value::from(0),
            z: Value::from(0),
            grab_button: Value::Bool(false),
            highlight_button: Value::Bool(false),
        }
    }
}

impl PhoneSample {
    /// Parse a request body
    pub fn from_json(body: &[u8]) -> KelpResult<Self> {
        let value: Value =
            serde_json::from_slice(body).map_err(|e| KelpError::InvalidWireFormat(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self::from_fields(&fields)),
            other => Err(KelpError::InvalidWireFormat(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    fn from_fields(fields: &Map<String, Value>) -> Self {
        let defaults = PhoneSample::default();
        let take = |key: &str, default: Value| fields.get(key).cloned().unwrap_or(default);

        PhoneSample {
            x: take("x", defaults.x),
            y: take("y", defaults.y),
            z: take("z", defaults.z),
            grab_button: take("grabButton", defaults.grab_button),
            highlight_button: take("highlightButton", defaults.highlight_button),
        }
    }

    /// Serialize to datagram bytes
    pub fn encode(&self) -> KelpResult<Bytes> {
        let buf = serde_json::to_vec(self).map_err(|e| KelpError::Encoding(e.to_string()))?;
        Ok(Bytes::from(buf))
    }
}
