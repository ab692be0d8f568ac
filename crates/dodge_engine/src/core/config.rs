//! # Engine Configuration
//!
//! Runtime settings for the main loop and logging. Loaded from TOML or RON
//! through the [`Config`] trait; every field has a default so partial files
//! are accepted.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::time::DEFAULT_MAX_DELTA;

/// # Engine Configuration
///
/// Core engine behavior: log filter, tick pacing and the delta clamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter, overridden by `RUST_LOG`
    pub log_level: String,
    /// Tick rate used by the fixed-rate tick source
    pub target_fps: u32,
    /// Upper clamp for the per-frame delta, in seconds
    pub max_delta_seconds: f32,
    /// Scene description loaded at startup
    pub launch_scene: Option<String>,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            target_fps: 60,
            max_delta_seconds: DEFAULT_MAX_DELTA,
            launch_scene: None,
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set target FPS
    pub fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the delta clamp
    pub fn with_max_delta(mut self, seconds: f32) -> Self {
        self.max_delta_seconds = seconds;
        self
    }

    /// Set the scene loaded at startup
    pub fn with_launch_scene(mut self, path: impl Into<String>) -> Self {
        self.launch_scene = Some(path.into());
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_fps == 0 {
            return Err(ConfigError::Invalid("Target FPS must be at least 1".to_string()));
        }

        if !(self.max_delta_seconds > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "Max delta must be positive, got {}",
                self.max_delta_seconds
            )));
        }

        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for EngineConfig {}
