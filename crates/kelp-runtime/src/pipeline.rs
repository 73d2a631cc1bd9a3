//! Gesture pipeline - the per-frame processing context
//!
//! Owns everything that persists across frames: debounce counters and the
//! last emitted snapshot. One pipeline serves one capture session.
//!
//! An optional pointer sink receives the index fingertip of the first hand
//! on every frame that has one, without change gating.

use tracing::warn;

use kelp_core::{FrameLandmarks, KelpResult, SignalSet};
use kelp_gesture::{DebounceEngine, PredicateEvaluator};
use kelp_transport::DatagramSink;
use kelp_wire::PointerMessage;

use crate::config::RuntimeConfig;
use crate::emitter::{ChangeGatedEmitter, EmitOutcome};

/// Result of processing one admitted frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub candidates: SignalSet,
    pub active: SignalSet,
    pub outcome: EmitOutcome,
    /// `None` without a pointer sink or without a hand
    pub pointer: Option<EmitOutcome>,
}

/// Evaluate → debounce → emit
pub struct GesturePipeline<S> {
    evaluator: PredicateEvaluator,
    debounce: DebounceEngine,
    emitter: ChangeGatedEmitter<S>,
    pointer: Option<Box<dyn DatagramSink + Send>>,
}

impl<S: DatagramSink> GesturePipeline<S> {
    pub fn new(config: &RuntimeConfig, sink: S) -> KelpResult<Self> {
        config.predicates.validate()?;
        Ok(GesturePipeline {
            evaluator: PredicateEvaluator::new(config.predicates.clone()),
            debounce: DebounceEngine::new(&config.debounce)?,
            emitter: ChangeGatedEmitter::new(sink),
            pointer: None,
        })
    }

    /// Also stream the fingertip pointer to `sink`
    pub fn with_pointer_sink<P>(mut self, sink: P) -> Self
    where
        P: DatagramSink + Send + 'static,
    {
        self.pointer = Some(Box::new(sink));
        self
    }

    /// Run one admitted frame through every stage
    pub fn process(&mut self, landmarks: &FrameLandmarks) -> FrameReport {
        let candidates = self.evaluator.evaluate(landmarks);
        let active = self.debounce.update_all(&candidates);
        let outcome = self.emitter.maybe_emit(&active);
        let pointer = self.emit_pointer(landmarks);

        FrameReport {
            candidates,
            active,
            outcome,
            pointer,
        }
    }

    fn emit_pointer(&mut self, landmarks: &FrameLandmarks) -> Option<EmitOutcome> {
        let sink = self.pointer.as_mut()?;
        let hand = landmarks.hands().first()?;

        let result = PointerMessage::from_hand(hand)
            .encode()
            .and_then(|payload| sink.send(&payload));
        match result {
            Ok(()) => Some(EmitOutcome::Sent),
            Err(e) => {
                warn!("Failed to send pointer message: {}", e);
                Some(EmitOutcome::Failed)
            }
        }
    }

    pub fn debounce(&self) -> &DebounceEngine {
        &self.debounce
    }

    pub fn emitter(&self) -> &ChangeGatedEmitter<S> {
        &self.emitter
    }
}
