//! Kelp Relay - phone controller bridge
//!
//! Serves the phone controller pages over HTTP and forwards each posted
//! orientation/button sample to the game as one UDP datagram.

pub mod config;
pub mod server;

pub use config::*;
pub use server::*;
