//! Kelp Gesture Engine
//!
//! Turns noisy per-frame landmark detections into stable gesture states.
//!
//! # Pipeline
//!
//! ```text
//! FrameLandmarks → PredicateEvaluator::evaluate → candidates (SignalSet)
//!                   → DebounceEngine::update_all → active states (SignalSet)
//! ```
//!
//! Predicates are stateless and recomputed from scratch every frame.
//! All memory across frames lives in the `DebounceEngine` counters.

pub mod debounce;
pub mod geometry;
pub mod predicate;

pub use debounce::*;
pub use geometry::*;
pub use predicate::*;
