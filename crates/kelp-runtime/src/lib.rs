//! Kelp Runtime - capture loop and orchestration
//!
//! This crate wires the gesture engine to the network:
//! 1. Read a frame from the `FrameSource`
//! 2. Skip or admit it (`FrameScheduler`)
//! 3. Extract landmarks (`LandmarkExtractor`)
//! 4. Evaluate predicates
//! 5. Debounce
//! 6. Emit on change (`ChangeGatedEmitter`)
//!
//! Everything runs on one thread; the only cross-thread handle is the
//! `StopSignal`.

pub mod capture;
pub mod config;
pub mod emitter;
pub mod logging;
pub mod pipeline;
pub mod scheduler;
pub mod source;

pub use capture::*;
pub use config::*;
pub use emitter::*;
pub use logging::*;
pub use pipeline::*;
pub use scheduler::*;
pub use source::*;
