//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Serial port configuration
    #[serde(default)]
    pub serial: SerialConfig,

    /// Playback configuration
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Serial port configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Serial port path
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            device: default_device(),
        }
    }
}

/// Playback configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerConfig {
    /// Start the first track right after initialization
    #[serde(default)]
    pub autoplay: bool,
}

fn default_device() -> String {
    "/dev/ttyUSB0".to_string()
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Loads configuration, falling back to defaults if the file is absent.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
