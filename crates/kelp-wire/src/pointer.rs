//! Pointer message - index fingertip position of the first detected hand
//!
//! ```text
//! {"x":0.42,"y":0.61}
//! ```
//!
//! Coordinates are normalized image units, as produced by the extractor.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use kelp_core::{HandLandmark, HandSnapshot, KelpError, KelpResult};

use crate::MAX_DATAGRAM_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerMessage {
    pub x: f32,
    pub y: f32,
}

impl PointerMessage {
    /// Pointer at the index fingertip of `hand`
    pub fn from_hand(hand: &HandSnapshot) -> Self {
        let tip = hand.get(HandLandmark::IndexTip);
        PointerMessage { x: tip.x, y: tip.y }
    }

    pub fn encode(&self) -> KelpResult<Bytes> {
        let buf = serde_json::to_vec(self).map_err(|e| KelpError::Encoding(e.to_string()))?;
        Ok(Bytes::from(buf))
    }

    pub fn decode(buf: &[u8]) -> KelpResult<Self> {
        if buf.len() > MAX_DATAGRAM_SIZE {
            return Err(KelpError::InvalidWireFormat(format!(
                "message of {} bytes exceeds {}",
                buf.len(),
                MAX_DATAGRAM_SIZE
            )));
        }
        serde_json::from_slice(buf).map_err(|e| KelpError::InvalidWireFormat(e.to_string()))
    }
}
