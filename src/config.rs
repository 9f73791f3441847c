// config.rs

use crate::cli::Args;
use config::{Config, Environment, File};
use log::debug;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_BAUD: u32 = 115_200;
pub const DEFAULT_MIDI_PORT: &str = crate::midi::output::AUTO;
pub const DEFAULT_RETRY_SECONDS: f64 = 2.0;
pub const DEFAULT_CONFIG_FILE: &str = "beca-link.toml";
pub const ENV_PREFIX: &str = "BECA_LINK";

/// Serial read timeout; keeps the loop responsive to shutdown.
pub const READ_TIMEOUT: Duration = Duration::from_millis(250);
pub const REPORT_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load settings: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid setting {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BridgeConfig {
    /// Empty means auto-detect
    pub serial_port: String,
    pub baud: u32,
    pub midi_port: String,
    pub retry_seconds: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            serial_port: String::new(),
            baud: DEFAULT_BAUD,
            midi_port: DEFAULT_MIDI_PORT.to_string(),
            retry_seconds: DEFAULT_RETRY_SECONDS,
        }
    }
}

impl BridgeConfig {
    /// Layers defaults, the settings file, `BECA_LINK_*` variables and CLI flags.
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => File::from(path.as_path()).required(true),
            None => File::from(Path::new(DEFAULT_CONFIG_FILE)).required(false),
        };

        let settings = Config::builder()
            .set_default("serial_port", "")?
            .set_default("baud", i64::from(DEFAULT_BAUD))?
            .set_default("midi_port", DEFAULT_MIDI_PORT)?
            .set_default("retry_seconds", DEFAULT_RETRY_SECONDS)?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .set_override_option("serial_port", args.port.clone())?
            .set_override_option("baud", args.baud.map(i64::from))?
            .set_override_option("midi_port", args.midi_port.clone())?
            .set_override_option("retry_seconds", args.retry_seconds)?
            .build()?;

        let loaded: BridgeConfig = settings.try_deserialize()?;
        debug!("Loaded settings: {:?}", loaded);
        loaded.validate()?;
        Ok(loaded)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.baud == 0 {
            return Err(ConfigError::Invalid {
                key: "baud",
                reason: "must be greater than zero".to_string(),
            });
        }
        if !self.retry_seconds.is_finite() || self.retry_seconds <= 0.0 {
            return Err(ConfigError::Invalid {
                key: "retry_seconds",
                reason: format!("must be a positive number of seconds, got {}", self.retry_seconds),
            });
        }
        Ok(())
    }

    /// Explicit serial device, if one was given
    pub fn serial_device(&self) -> Option<String> {
        let trimmed = self.serial_port.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_secs_f64(self.retry_seconds)
    }
}
