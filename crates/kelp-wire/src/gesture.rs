//! Gesture state message
//!
//! A flat JSON object with every signal name as a key:
//!
//! ```text
//! {"RightHandUp":false,"LeftHandUp":true,"PalmsTogetherPraying":false,
//!  "BothHandsUp":false,"Grab":false,"ThumbsUp":false}
//! ```

use bytes::Bytes;
use serde_json::{Map, Value};

use kelp_core::{KelpError, KelpResult, Signal, SignalSet};

use crate::MAX_DATAGRAM_SIZE;

/// Full set of active gesture states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureMessage {
    pub states: SignalSet,
}

impl GestureMessage {
    pub fn new(states: SignalSet) -> Self {
        Self { states }
    }

    /// Serialize to datagram bytes
    pub fn encode(&self) -> KelpResult<Bytes> {
        let buf = serde_json::to_vec(&self.states).map_err(|e| KelpError::Encoding(e.to_string()))?;
        Ok(Bytes::from(buf))
    }

    /// Parse datagram bytes
    ///
    /// Every signal must be present as a boolean; unknown keys are ignored.
    pub fn decode(buf: &[u8]) -> KelpResult<Self> {
        if buf.len() > MAX_DATAGRAM_SIZE {
            return Err(KelpError::InvalidWireFormat(format!(
                "message of {} bytes exceeds {}",
                buf.len(),
                MAX_DATAGRAM_SIZE
            )));
        }

        let map: Map<String, Value> =
            serde_json::from_slice(buf).map_err(|e| KelpError::InvalidWireFormat(e.to_string()))?;

        let mut states = SignalSet::new();
        for &signal in Signal::all() {
            let value = map
                .get(signal.as_str())
                .and_then(Value::as_bool)
                .ok_or_else(|| {
                    KelpError::InvalidWireFormat(format!("missing boolean for {}", signal))
                })?;
            states.set(signal, value);
        }

        Ok(Self { states })
    }
}

impl From<SignalSet> for GestureMessage {
    fn from(states: SignalSet) -> Self {
        Self::new(states)
    }
}
