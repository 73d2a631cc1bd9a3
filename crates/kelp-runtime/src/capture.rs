//! Capture loop - drives the pipeline once per admitted frame
//!
//! Each iteration:
//! 1. Check the stop signal
//! 2. Read a frame (end of stream or read failure ends the loop)
//! 3. Admit or skip it (frame skip)
//! 4. Extract landmarks
//! 5. Evaluate, debounce, emit
//!
//! The loop owns the source and the sink; both are released when the loop
//! is dropped, whichever way it exited.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use kelp_core::KelpResult;
use kelp_transport::DatagramSink;

use crate::config::RuntimeConfig;
use crate::emitter::EmitOutcome;
use crate::pipeline::{FrameReport, GesturePipeline};
use crate::scheduler::FrameScheduler;
use crate::source::{FrameSource, LandmarkExtractor};

/// Shared flag asking the loop to stop
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Why the loop ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitReason {
    /// Stop signal observed
    Stopped,
    /// Source ran out of frames
    EndOfStream,
    /// A frame read failed
    ReadFailed(String),
}

#[derive(Clone, Debug, Default)]
pub struct RuntimeStats {
    pub frames_captured: u64,
    pub frames_admitted: u64,
    pub frames_skipped: u64,
    /// Admitted frames where neither pose nor hands were found
    pub frames_without_detection: u64,
    pub emissions_sent: u64,
    pub emissions_failed: u64,
    pub emissions_unchanged: u64,
    pub pointer_sent: u64,
    pub pointer_failed: u64,
    pub last_frame_duration: Duration,
}

impl RuntimeStats {
    fn record(&mut self, report: &FrameReport) {
        match report.outcome {
            EmitOutcome::Sent => self.emissions_sent += 1,
            EmitOutcome::Failed => self.emissions_failed += 1,
            EmitOutcome::Unchanged => self.emissions_unchanged += 1,
        }
        match report.pointer {
            Some(EmitOutcome::Sent) => self.pointer_sent += 1,
            Some(EmitOutcome::Failed) => self.pointer_failed += 1,
            _ => {}
        }
    }
}

/// What one `step` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Frame went through the pipeline
    Processed(FrameReport),
    /// Frame discarded by the scheduler
    Skipped,
    /// Loop should end
    Exit(ExitReason),
}

/// Single-threaded capture loop
pub struct CaptureLoop<Src, X, S> {
    source: Src,
    extractor: X,
    scheduler: FrameScheduler,
    pipeline: GesturePipeline<S>,
    stop: StopSignal,
    stats: RuntimeStats,
}

impl<Src, X, S> CaptureLoop<Src, X, S>
where
    Src: FrameSource,
    X: LandmarkExtractor<Src::Frame>,
    S: DatagramSink,
{
    pub fn new(config: &RuntimeConfig, source: Src, extractor: X, sink: S) -> KelpResult<Self> {
        config.validate()?;
        Ok(CaptureLoop {
            source,
            extractor,
            scheduler: FrameScheduler::new(&config.scheduler),
            pipeline: GesturePipeline::new(config, sink)?,
            stop: StopSignal::new(),
            stats: RuntimeStats::default(),
        })
    }

    /// Handle for stopping the loop from elsewhere
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Stream the fingertip pointer to `sink` as well
    pub fn with_pointer_sink<P>(mut self, sink: P) -> Self
    where
        P: DatagramSink + Send + 'static,
    {
        self.pipeline = self.pipeline.with_pointer_sink(sink);
        self
    }

    /// Use an existing stop signal
    pub fn with_stop_signal(mut self, stop: StopSignal) -> Self {
        self.stop = stop;
        self
    }

    /// Process at most one captured frame
    pub fn step(&mut self) -> Step {
        if self.stop.is_triggered() {
            return Step::Exit(ExitReason::Stopped);
        }

        let frame = match self.source.read_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => return Step::Exit(ExitReason::EndOfStream),
            Err(e) => return Step::Exit(ExitReason::ReadFailed(e.to_string())),
        };
        self.stats.frames_captured += 1;

        if !self.scheduler.admit() {
            self.stats.frames_skipped += 1;
            return Step::Skipped;
        }

        let start = Instant::now();
        self.stats.frames_admitted += 1;

        let landmarks = self.extractor.extract(&frame);
        if landmarks.is_empty() {
            self.stats.frames_without_detection += 1;
        }

        let report = self.pipeline.process(&landmarks);
        self.stats.record(&report);
        self.stats.last_frame_duration = start.elapsed();

        Step::Processed(report)
    }

    /// Run until stopped or out of frames
    pub fn run(&mut self) -> ExitReason {
        info!(
            "Capture loop started (frame skip factor {})",
            self.scheduler.factor()
        );

        let reason = loop {
            if let Step::Exit(reason) = self.step() {
                break reason;
            }
        };

        match &reason {
            ExitReason::ReadFailed(e) => warn!("Frame read failed, stopping: {}", e),
            ExitReason::EndOfStream => info!("End of frame stream"),
            ExitReason::Stopped => info!("Stop requested"),
        }
        info!(
            "Frames: {} captured, {} admitted, {} skipped, {} without detection",
            self.stats.frames_captured,
            self.stats.frames_admitted,
            self.stats.frames_skipped,
            self.stats.frames_without_detection
        );
        info!(
            "Emissions: {} sent, {} failed, {} unchanged",
            self.stats.emissions_sent, self.stats.emissions_failed, self.stats.emissions_unchanged
        );
        if self.stats.pointer_sent + self.stats.pointer_failed > 0 {
            info!(
                "Pointer: {} sent, {} failed",
                self.stats.pointer_sent, self.stats.pointer_failed
            );
        }

        reason
    }

    pub fn stats(&self) -> &RuntimeStats {
        &self.stats
    }

    pub fn pipeline(&self) -> &GesturePipeline<S> {
        &self.pipeline
    }
}
