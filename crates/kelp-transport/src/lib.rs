//! Kelp Transport Layer - best-effort datagram delivery
//!
//! This crate provides:
//! - The `DatagramSink` capability used by the gesture emitter
//! - Blocking UDP sink for the capture loop
//! - Async UDP transport for the phone relay
//! - In-memory sink for tests and dry runs
//! - Local address discovery

pub mod addr;
pub mod sink;
pub mod udp;

pub use addr::*;
pub use sink::*;
pub use udp::*;
