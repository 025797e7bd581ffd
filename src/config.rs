//! Runtime configuration
//!
//! Every field has a default, so a config file only needs the values it
//! overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Size of the playable world in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub viewport: Viewport,
    /// Simulation ticks per second
    pub update_rate_hz: u32,
    /// Catch-up ticks allowed per rendered frame
    pub max_substeps: u32,
    /// RNG seed; entropy when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            update_rate_hz: DEFAULT_UPDATE_RATE_HZ,
            max_substeps: DEFAULT_MAX_SUBSTEPS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Load and validate a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: GameConfig = serde_json::from_str(&text)?;
        config.validate()?;
        log::info!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let Viewport { width, height } = self.viewport;
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "viewport must be positive and finite, got {}x{}",
                width, height
            )));
        }
        if self.update_rate_hz == 0 {
            return Err(ConfigError::Invalid("update_rate_hz must be > 0".into()));
        }
        if self.max_substeps == 0 {
            return Err(ConfigError::Invalid("max_substeps must be > 0".into()));
        }
        Ok(())
    }

    /// Fixed simulation step in seconds
    pub fn step(&self) -> f32 {
        1.0 / self.update_rate_hz as f32
    }
}
