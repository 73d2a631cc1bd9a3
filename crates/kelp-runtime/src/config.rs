//! Runtime configuration
//!
//! Sources, later ones winning:
//! 1. Built-in defaults
//! 2. JSON file named by `KELP_CONFIG`
//! 3. `KELP_DEST`, `KELP_POINTER_DEST`, `KELP_FRAME_SKIP`, `KELP_LOG_FORMAT`

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

use kelp_core::{KelpError, KelpResult};
use kelp_gesture::{DebounceConfig, PredicateConfig};

use crate::logging::LogFormat;
use crate::scheduler::SchedulerConfig;

/// Default gesture receiver
pub const DEFAULT_GESTURE_DEST: &str = "127.0.0.1:5005";

/// Usual receiver port for pointer messages
pub const DEFAULT_POINTER_PORT: u16 = 5052;

/// Where gesture and pointer messages go
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmitterConfig {
    pub destination: SocketAddr,
    /// Fingertip pointer stream; off when unset
    pub pointer_destination: Option<SocketAddr>,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        EmitterConfig {
            destination: SocketAddr::from(([127, 0, 0, 1], 5005)),
            pointer_destination: None,
        }
    }
}

/// Complete runtime configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub predicates: PredicateConfig,
    pub debounce: DebounceConfig,
    pub scheduler: SchedulerConfig,
    pub emitter: EmitterConfig,
    pub log_format: LogFormat,
}

impl RuntimeConfig {
    /// Parse a JSON document; absent fields keep their defaults
    pub fn from_json(text: &str) -> KelpResult<Self> {
        serde_json::from_str(text).map_err(|e| KelpError::InvalidConfig(e.to_string()))
    }

    /// Read a JSON config file
    pub fn from_file(path: &Path) -> KelpResult<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            KelpError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Defaults, then `KELP_CONFIG`, then environment overrides, validated
    pub fn from_env() -> KelpResult<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// `from_env` with an injectable variable lookup
    pub fn resolve<F>(lookup: F) -> KelpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match lookup("KELP_CONFIG") {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(&lookup)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_overrides<F>(&mut self, lookup: &F) -> KelpResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dest) = lookup("KELP_DEST") {
            self.emitter.destination = dest
                .parse()
                .map_err(|_| KelpError::InvalidConfig(format!("KELP_DEST: bad address {:?}", dest)))?;
        }

        if let Some(dest) = lookup("KELP_POINTER_DEST") {
            let addr = dest.parse().map_err(|_| {
                KelpError::InvalidConfig(format!("KELP_POINTER_DEST: bad address {:?}", dest))
            })?;
            self.emitter.pointer_destination = Some(addr);
        }

        if let Some(skip) = lookup("KELP_FRAME_SKIP") {
            let factor: u32 = skip.parse().map_err(|_| {
                KelpError::InvalidConfig(format!("KELP_FRAME_SKIP: not a number: {:?}", skip))
            })?;
            self.scheduler = SchedulerConfig::every(factor);
        }

        if let Some(format) = lookup("KELP_LOG_FORMAT") {
            self.log_format = format.parse()?;
        }

        Ok(())
    }

    pub fn validate(&self) -> KelpResult<()> {
        self.predicates.validate()?;
        self.debounce.validate()?;
        self.scheduler.validate()?;
        Ok(())
    }
}
