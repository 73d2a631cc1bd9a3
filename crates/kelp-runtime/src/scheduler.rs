//! Frame scheduler - fixed-ratio frame subsampling
//!
//! With frame skip enabled at factor N, only captured frames whose 1-based
//! count is a multiple of N are admitted. Skipped frames never reach the
//! landmark extractor, and debounce counters hold still across them.

use serde::{Deserialize, Serialize};

use kelp_core::{KelpError, KelpResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub frame_skip_enabled: bool,
    /// Admit one frame out of this many
    pub frame_skip: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        SchedulerConfig {
            frame_skip_enabled: false,
            frame_skip: 2,
        }
    }
}

impl SchedulerConfig {
    /// Admit one frame in `factor`; 0 or 1 admits everything
    pub fn every(factor: u32) -> Self {
        SchedulerConfig {
            frame_skip_enabled: factor > 1,
            frame_skip: factor.max(1),
        }
    }

    /// Effective subsampling factor
    pub fn factor(&self) -> u32 {
        if self.frame_skip_enabled {
            self.frame_skip.max(1)
        } else {
            1
        }
    }

    pub fn validate(&self) -> KelpResult<()> {
        if self.frame_skip_enabled && self.frame_skip == 0 {
            return Err(KelpError::InvalidConfig(
                "frame_skip must be at least 1 when enabled".into(),
            ));
        }
        Ok(())
    }
}

/// Decides which captured frames go through the pipeline
#[derive(Clone, Debug)]
pub struct FrameScheduler {
    factor: u64,
    captured: u64,
}

impl FrameScheduler {
    pub fn new(config: &SchedulerConfig) -> Self {
        FrameScheduler {
            factor: u64::from(config.factor()),
            captured: 0,
        }
    }

    /// Count one captured frame and report whether to process it
    pub fn admit(&mut self) -> bool {
        self.captured += 1;
        self.captured % self.factor == 0
    }

    pub fn captured(&self) -> u64 {
        self.captured
    }

    pub fn factor(&self) -> u64 {
        self.factor
    }
}
