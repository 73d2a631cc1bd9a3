//! Error types for Kelp

use thiserror::Error;

use crate::Signal;

/// Core Kelp errors
#[derive(Error, Debug)]
pub enum KelpError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Debounce threshold for {0} must be at least 1 frame")]
    ZeroThreshold(Signal),

    // Landmark errors
    #[error("Invalid landmark record: {0}")]
    InvalidLandmarks(String),

    #[error("Wrong landmark count: expected {expected}, got {actual}")]
    LandmarkCount { expected: usize, actual: usize },

    #[error("Too many hands: at most {max} per frame")]
    TooManyHands { max: usize },

    // Capture errors
    #[error("Capture device unavailable: {0}")]
    CaptureUnavailable(String),

    #[error("Frame read failed: {0}")]
    FrameReadFailed(String),

    // Wire errors
    #[error("Encoding failed: {0}")]
    Encoding(String),

    #[error("Invalid wire format: {0}")]
    InvalidWireFormat(String),

    // Transport errors
    #[error("Transport error: {0}")]
    TransportError(String),
}

/// Result type for Kelp operations
pub type KelpResult<T> = Result<T, KelpError>;
