//! Game configuration
//!
//! Engine settings plus the few knobs the headless session needs. Loaded
//! from `dodge.toml` (or a path given on the command line) and falls back
//! to defaults when the file is missing.

use dodge_engine::config::{Config, ConfigError};
use dodge_engine::EngineConfig;
use serde::{Deserialize, Serialize};

use crate::assets;

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Engine settings
    pub engine: EngineConfig,

    /// Session settings
    pub gameplay: GameplayConfig,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    /// Stop after this many frames
    pub max_frames: u64,

    /// Stop as soon as the player runs out of lives
    pub quit_on_game_over: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::new().with_launch_scene(assets::default_scene()),
            gameplay: GameplayConfig::default(),
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            max_frames: 60 * 30,
            quit_on_game_over: true,
        }
    }
}

impl GameConfig {
    /// Validate engine and session settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        if self.gameplay.max_frames == 0 {
            return Err(ConfigError::Invalid("max_frames must be at least 1".to_string()));
        }
        Ok(())
    }
}

impl Config for GameConfig {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_launches_bundled_scene() {
        let config = GameConfig::default();
        assert!(config.validate().is_ok());
        let scene = config.engine.launch_scene.unwrap();
        assert!(scene.ends_with("dodge.json"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dodge.toml");
        std::fs::write(&path, "[gameplay]\nmax_frames = 120\n").unwrap();

        let config = GameConfig::load_from_file(&path).unwrap();
        assert_eq!(config.gameplay.max_frames, 120);
        assert!(config.gameplay.quit_on_game_over);
        assert_eq!(config.engine.target_fps, 60);
    }

    #[test]
    fn test_zero_frames_rejected() {
        let mut config = GameConfig::default();
        config.gameplay.max_frames = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GameConfig::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, GameConfig::default());
    }
}
