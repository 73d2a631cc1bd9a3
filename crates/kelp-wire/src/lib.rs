//! Kelp Wire Formats - textual datagram payloads
//!
//! This crate implements the messages Kelp puts on the network:
//! - Gesture state messages (flat JSON object, one boolean per signal)
//! - Pointer messages (index fingertip position)
//! - Phone samples (orientation plus two buttons)
//!
//! Each fits in a single UDP datagram.

pub mod gesture;
pub mod phone;
pub mod pointer;

pub use gesture::*;
pub use phone::*;
pub use pointer::*;

/// Maximum datagram size (MTU-friendly)
pub const MAX_DATAGRAM_SIZE: usize = 1400;
