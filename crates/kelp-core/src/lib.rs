//! Kelp Core - Fundamental types shared by every Kelp crate
//!
//! This crate defines:
//! - The closed set of gesture signals (`Signal`) and fixed-size signal maps (`SignalSet`)
//! - Landmark snapshots produced by the external landmark extractor
//! - Error types and the `KelpResult` alias

pub mod error;
pub mod landmark;
pub mod signal;

pub use error::*;
pub use landmark::*;
pub use signal::*;
