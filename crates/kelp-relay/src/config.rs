//! Relay configuration
//!
//! Defaults, then `KELP_RELAY_PORT`, `KELP_RELAY_DEST`, `KELP_RELAY_STATIC`
//! and `KELP_LOG_FORMAT`.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use kelp_core::{KelpError, KelpResult};
use kelp_runtime::LogFormat;

pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default receiver for phone samples
pub const DEFAULT_GYRO_DEST: &str = "127.0.0.1:5006";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// HTTP port the phone connects to
    pub http_port: u16,
    /// Where relayed samples go
    pub destination: SocketAddr,
    /// Directory holding the controller pages
    pub static_dir: PathBuf,
    pub log_format: LogFormat,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            http_port: DEFAULT_HTTP_PORT,
            destination: SocketAddr::from(([127, 0, 0, 1], 5006)),
            static_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static")),
            log_format: LogFormat::default(),
        }
    }
}

impl RelayConfig {
    pub fn from_env() -> KelpResult<Self> {
        Self::resolve(|key| std::env::var(key).ok())
    }

    /// `from_env` with an injectable variable lookup
    pub fn resolve<F>(lookup: F) -> KelpResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(port) = lookup("KELP_RELAY_PORT") {
            config.http_port = port.parse().map_err(|_| {
                KelpError::InvalidConfig(format!("KELP_RELAY_PORT: bad port {:?}", port))
            })?;
        }

        if let Some(dest) = lookup("KELP_RELAY_DEST") {
            config.destination = dest.parse().map_err(|_| {
                KelpError::InvalidConfig(format!("KELP_RELAY_DEST: bad address {:?}", dest))
            })?;
        }

        if let Some(dir) = lookup("KELP_RELAY_STATIC") {
            config.static_dir = PathBuf::from(dir);
        }

        if let Some(format) = lookup("KELP_LOG_FORMAT") {
            config.log_format = format.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KelpResult<()> {
        if self.http_port == 0 {
            return Err(KelpError::InvalidConfig("http_port must be non-zero".into()));
        }
        if self.destination.port() == 0 {
            return Err(KelpError::InvalidConfig(
                "destination port must be non-zero".into(),
            ));
        }
        if self.static_dir.as_os_str().is_empty() {
            return Err(KelpError::InvalidConfig("static_dir must not be empty".into()));
        }
        Ok(())
    }
}
