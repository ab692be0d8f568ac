//! Chicken Dodge
//!
//! Headless run of the dodge scene. The player steers itself; the session
//! ends after the configured number of frames or at game over.
//!
//! Usage: `dodge_demo [config.toml]`

mod assets;
mod components;
mod config;
mod hud;

use std::path::Path;

use dodge_engine::config::{Config, ConfigError};
use dodge_engine::foundation::logging;
use dodge_engine::prelude::*;
use log::{error, info};

use crate::config::GameConfig;

fn main() {
    let path = std::env::args().nth(1).unwrap_or_else(|| "dodge.toml".to_string());
    if let Err(err) = run(&path) {
        // Logging may not be up yet if the config was the problem
        eprintln!("dodge_demo: {err}");
        error!("{err}");
        std::process::exit(1);
    }
}

fn run(config_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let (config, from_file) = load_config(Path::new(config_path))?;
    logging::init_with_level(&config.engine.log_level);
    if from_file {
        info!("Loaded config from {}", config_path);
    } else {
        info!("No config at {}, using defaults", config_path);
    }
    config.validate()?;
    info!("Starting Chicken Dodge");

    let mut registry = ComponentRegistry::with_builtins();
    components::register(&mut registry);

    let mut engine_config = config.engine.clone();
    if engine_config.launch_scene.is_none() {
        engine_config.launch_scene = Some(assets::default_scene());
    }
    let mut engine = Engine::new(engine_config, registry)?;

    let mut ticker = FixedRateTicker::new(config.engine.target_fps).with_frame_limit(config.gameplay.max_frames);
    engine.launch_with(&mut ticker, end_at_game_over(config.gameplay.quit_on_game_over))?;

    let spawned = components::spawner(engine.scene()).map_or(0, components::ChickenSpawner::spawned);
    match components::player(engine.scene()) {
        Some(player) => info!(
            "Session over after {} frames: {} lives, {} hearts, {} chickens spawned",
            engine.frame_count(),
            player.lives(),
            player.score(),
            spawned
        ),
        None => info!("Session over after {} frames, {} chickens", engine.frame_count(), spawned),
    }
    Ok(())
}

/// Read the config file if present; the flag tells whether it was
///
/// Runs before logging is up, so it reports nothing itself.
fn load_config(path: &Path) -> Result<(GameConfig, bool), ConfigError> {
    if path.exists() {
        Ok((GameConfig::load_from_file(path)?, true))
    } else {
        Ok((GameConfig::default(), false))
    }
}

/// Per-frame hook stopping the main loop once the player is out of lives
fn end_at_game_over(enabled: bool) -> impl FnMut(&mut Engine) {
    move |engine| {
        let game_over = components::player(engine.scene()).is_some_and(components::Player::is_game_over);
        if enabled && game_over && engine.is_running() {
            engine.quit();
        }
    }
}
