// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host configuration.

use pancam_player::config::{load_ron, save_ron, ConfigError, Result};
use pancam_player::{ControllerConfig, PlayerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Log directives used when neither `RUST_LOG` nor the config sets any
pub const DEFAULT_LOG_FILTER: &str = "pancam_app=info,pancam_player=info,pancam_viewport=info";

/// Settings of the headless host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// `tracing` filter directives, overridden by `RUST_LOG`
    pub log_filter: Option<String>,
    /// Viewport width in pixels
    pub width: f64,
    /// Viewport height in pixels
    pub height: f64,
    /// Animation and timer tick rate
    pub tick_hz: u32,
    /// Playback tuning
    pub player: PlayerConfig,
    /// Gesture tuning
    pub controller: ControllerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            width: 1280.0,
            height: 720.0,
            tick_hz: 60,
            player: PlayerConfig::default(),
            controller: ControllerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate a config file; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = load_ron(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Save as pretty RON
    pub fn save(&self, path: &Path) -> Result<()> {
        save_ron(self, path)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        if self.tick_hz == 0 || self.tick_hz > 1000 {
            return Err(ConfigError::Invalid(format!(
                "tick_hz must be between 1 and 1000, got {}",
                self.tick_hz
            )));
        }
        self.player.validate()?;
        self.controller.validate()
    }

    /// Interval between ticks
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.tick_hz.max(1)))
    }

    /// Filter directives to use when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or(DEFAULT_LOG_FILTER)
    }
}
