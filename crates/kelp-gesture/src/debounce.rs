//! Debounce engine - per-signal saturating counters
//!
//! Each signal owns a counter in `[0, threshold]`. A true candidate moves the
//! counter up by one, a false candidate moves it down by one, and the signal
//! is active while the counter sits at its threshold. Signals never interact.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use kelp_core::{KelpError, KelpResult, Signal, SignalSet};

/// Required consecutive frames per signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebounceConfig {
    /// Threshold for signals without an explicit entry
    pub default_frames: u32,
    /// Per-signal thresholds
    pub frames: BTreeMap<Signal, u32>,
}

impl Default for DebounceConfig {
    fn default() -> Self {
        let mut frames = BTreeMap::new();
        // A sustained grip needs more evidence than a quick highlight
        frames.insert(Signal::Grab, 5);
        frames.insert(Signal::ThumbsUp, 2);

        DebounceConfig {
            default_frames: 3,
            frames,
        }
    }
}

impl DebounceConfig {
    /// Same threshold for every signal
    pub fn uniform(frames: u32) -> Self {
        DebounceConfig {
            default_frames: frames,
            frames: BTreeMap::new(),
        }
    }

    pub fn with_threshold(mut self, signal: Signal, frames: u32) -> Self {
        self.frames.insert(signal, frames);
        self
    }

    pub fn threshold(&self, signal: Signal) -> u32 {
        self.frames
            .get(&signal)
            .copied()
            .unwrap_or(self.default_frames)
    }

    /// A zero threshold would leave a signal permanently active
    pub fn validate(&self) -> KelpResult<()> {
        for &signal in Signal::all() {
            if self.threshold(signal) == 0 {
                return Err(KelpError::ZeroThreshold(signal));
            }
        }
        Ok(())
    }
}

/// Debounce state for every signal
#[derive(Debug, Clone)]
pub struct DebounceEngine {
    thresholds: [u32; Signal::COUNT],
    counters: [u32; Signal::COUNT],
}

impl DebounceEngine {
    /// Create an engine with all counters at zero
    pub fn new(config: &DebounceConfig) -> KelpResult<Self> {
        config.validate()?;

        let mut thresholds = [0; Signal::COUNT];
        for &signal in Signal::all() {
            thresholds[signal.index()] = config.threshold(signal);
        }

        Ok(DebounceEngine {
            thresholds,
            counters: [0; Signal::COUNT],
        })
    }

    /// Feed one instantaneous observation, returning the stable state
    pub fn update(&mut self, signal: Signal, instantaneous: bool) -> bool {
        let i = signal.index();
        let threshold = self.thresholds[i];
        let was_active = self.counters[i] >= threshold;

        self.counters[i] = if instantaneous {
            self.counters[i].saturating_add(1).min(threshold)
        } else {
            self.counters[i].saturating_sub(1)
        };

        let active = self.counters[i] >= threshold;
        if active != was_active {
            debug!(
                "{} {}",
                signal,
                if active { "activated" } else { "released" }
            );
        }
        active
    }

    /// Update every signal once from a candidate set
    pub fn update_all(&mut self, candidates: &SignalSet) -> SignalSet {
        let mut active = SignalSet::new();
        for (signal, value) in candidates.iter() {
            active.set(signal, self.update(signal, value));
        }
        active
    }

    pub fn counter(&self, signal: Signal) -> u32 {
        self.counters[signal.index()]
    }

    pub fn threshold(&self, signal: Signal) -> u32 {
        self.thresholds[signal.index()]
    }

    pub fn is_active(&self, signal: Signal) -> bool {
        self.counter(signal) >= self.threshold(signal)
    }

    /// Current stable states without feeding a frame
    pub fn active(&self) -> SignalSet {
        Signal::all()
            .iter()
            .copied()
            .filter(|&s| self.is_active(s))
            .collect()
    }

    /// Drop all accumulated evidence
    pub fn reset(&mut self) {
        self.counters = [0; Signal::COUNT];
    }
}
