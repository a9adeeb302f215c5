// SPDX-License-Identifier: MIT OR Apache-2.0
//! Tuning configuration for the player and the input controller.

use crate::history::DEFAULT_HISTORY_DEPTH;
use crate::input::Modifier;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Reading or writing the file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for the expected structure
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serializing the configuration failed
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Modifier keys that select drag and wheel behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierBindings {
    /// Drag zooms about the viewport centre
    pub zoom: Modifier,
    /// Drag and wheel rotate
    pub rotate: Modifier,
    /// Rotation snaps to the snap step
    pub snap: Modifier,
    /// Translation is locked to one axis
    pub constrain: Modifier,
}

impl Default for ModifierBindings {
    fn default() -> Self {
        Self {
            zoom: Modifier::Shift,
            rotate: Modifier::Ctrl,
            snap: Modifier::Shift,
            constrain: Modifier::Alt,
        }
    }
}

/// Gesture recognizer tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Pointer travel along one axis that turns a press into a drag
    pub drag_threshold: f64,
    /// Zoom factor of one wheel notch and of the `+`/`-` keys
    pub scale_factor: f64,
    /// Rotation of one wheel notch, in degrees
    pub wheel_rotation_step: f64,
    /// Rotation of the `r`/`R` keys, in degrees
    pub key_rotation_step: f64,
    /// Wheel inactivity before a user change is reported, in milliseconds
    pub wheel_debounce_ms: u64,
    /// Distance within which a clip edge can be grabbed
    pub clip_border: f64,
    /// Snapped rotation increment, in degrees
    pub snap_step: f64,
    /// Modifier bindings
    pub bindings: ModifierBindings,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            drag_threshold: 5.0,
            scale_factor: 1.05,
            wheel_rotation_step: 5.0,
            key_rotation_step: 90.0,
            wheel_debounce_ms: 200,
            clip_border: 8.0,
            snap_step: 10.0,
            bindings: ModifierBindings::default(),
        }
    }
}

impl ControllerConfig {
    /// Wheel debounce window
    pub fn wheel_debounce(&self) -> Duration {
        Duration::from_millis(self.wheel_debounce_ms)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !(self.scale_factor > 1.0 && self.scale_factor.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "scale_factor must be greater than 1, got {}",
                self.scale_factor
            )));
        }
        let positive = [
            ("drag_threshold", self.drag_threshold),
            ("wheel_rotation_step", self.wheel_rotation_step),
            ("key_rotation_step", self.key_rotation_step),
            ("clip_border", self.clip_border),
            ("snap_step", self.snap_step),
        ];
        for (name, value) in positive {
            if !(value > 0.0 && value.is_finite()) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        if self.wheel_debounce_ms == 0 {
            return Err(ConfigError::Invalid(
                "wheel_debounce_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Playback tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Number of remembered frame visits
    pub history_depth: usize,
    /// Honour per-frame auto-advance timeouts
    pub auto_advance: bool,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            history_depth: DEFAULT_HISTORY_DEPTH,
            auto_advance: true,
        }
    }
}

impl PlayerConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.history_depth == 0 {
            return Err(ConfigError::Invalid(
                "history_depth must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load a RON file, falling back to defaults when it does not exist
pub fn load_ron<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        tracing::debug!("{} not found, using defaults", path.display());
        return Ok(T::default());
    }
    let content = std::fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}

/// Save a value as pretty RON
pub fn save_ron<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let config = ron::ser::PrettyConfig::default()
        .struct_names(true)
        .enumerate_arrays(false);
    let content = ron::ser::to_string_pretty(value, config)?;
    std::fs::write(path, content)?;
    Ok(())
}
