//! Runtime Settings
//!
//! Defaults overridden by `PACRF_*` environment variables, e.g.
//! `PACRF_REMOTE_HOST=lab-board pacrf --remote --gps`.

use config::{Config, ConfigError, Environment, Source};
use nmea_decoder::DEFAULT_DEVICE;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "PACRF";

/// PAC-RF front end settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// ssh host or `~/.ssh/config` alias of the board
    pub remote_host: String,

    /// Remote login user
    pub remote_user: String,

    /// Path of the PAC-RF binary on the board
    pub remote_path: String,

    /// Explicit identity file; ssh config is used when unset
    pub ssh_key: Option<String>,

    /// GPS UART device
    pub gps_device: String,

    /// GPS read window (milliseconds)
    pub gps_read_ms: u64,

    /// Telemetry queue capacity
    pub queue_capacity: usize,

    /// Default log level
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote_host: "pacrf".to_string(),
            remote_user: "root".to_string(),
            remote_path: "/root/pac_rf_project/bin/pac_rf_exec".to_string(),
            ssh_key: None,
            gps_device: DEFAULT_DEVICE.to_string(),
            gps_read_ms: 2000,
            queue_capacity: bounded_queue::DEFAULT_CAPACITY,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_source(Self::environment())
    }

    /// Load settings from any `config` source layered over the defaults
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings: Settings = Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()?;
        Ok(settings.normalized())
    }

    /// `PACRF_*` environment source; empty variables count as unset
    pub fn environment() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .try_parsing(true)
            .ignore_empty(true)
    }

    /// GPS read window
    pub fn gps_window(&self) -> Duration {
        Duration::from_millis(self.gps_read_ms)
    }

    fn normalized(mut self) -> Self {
        if self.ssh_key.as_deref().is_some_and(str::is_empty) {
            self.ssh_key = None;
        }
        self
    }
}
