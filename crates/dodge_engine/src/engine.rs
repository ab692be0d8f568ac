//! Core engine implementation
//!
//! The engine owns the current scene and the system list. Each tick
//! advances the frame clock and runs the systems in order; a system error
//! aborts the tick.

use std::path::Path;
use std::rc::Rc;

use log::{error, info};
use thiserror::Error;

use crate::config::ConfigError;
use crate::core::EngineConfig;
use crate::ecs::registry::ComponentRegistry;
use crate::ecs::system::System;
use crate::ecs::systems::default_systems;
use crate::foundation::time::{FrameClock, TickSource, Timing};
use crate::scene::description::SceneDescription;
use crate::scene::error::SceneError;
use crate::scene::scene_graph::Scene;

/// Main engine struct
///
/// Coordinates the scene, the systems and frame timing.
pub struct Engine {
    config: EngineConfig,
    registry: Rc<ComponentRegistry>,
    scene: Scene,
    systems: Vec<Box<dyn System>>,
    clock: FrameClock,
    running: bool,
}

impl Engine {
    /// Create an engine with an empty scene
    pub fn new(config: EngineConfig, registry: ComponentRegistry) -> Result<Self, EngineError> {
        info!("Initializing engine...");
        config.validate()?;

        let registry = Rc::new(registry);
        info!("Registered component types: {:?}", registry.type_tags());

        Ok(Self {
            clock: FrameClock::with_max_delta(config.max_delta_seconds),
            scene: Scene::new(Rc::clone(&registry)),
            systems: default_systems(),
            registry,
            config,
            running: true,
        })
    }

    /// Replace the current scene, and its colliders, with a new one
    pub fn load_scene(&mut self, description: &SceneDescription) -> Result<(), EngineError> {
        self.scene = Scene::create(Rc::clone(&self.registry), description)?;
        info!("Scene loaded");
        Ok(())
    }

    /// Load a scene description file and make it current
    pub fn load_scene_file(&mut self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let path = path.as_ref();
        info!("Loading scene {}", path.display());
        let description = SceneDescription::load(path)?;
        self.load_scene(&description)
    }

    /// Run one frame at timestamp `now_ms`
    pub fn tick(&mut self, now_ms: f64) -> Result<Timing, EngineError> {
        let timing = self.clock.advance(now_ms);

        for system in &mut self.systems {
            if let Err(err) = system.run(&mut self.scene, &timing) {
                error!("{} system failed on frame {}: {}", system.name(), timing.frame, err);
                return Err(err.into());
            }
        }

        Ok(timing)
    }

    /// Tick until the source runs dry or [`quit`](Self::quit) is called
    ///
    /// Returns the number of frames run.
    pub fn run(&mut self, source: &mut dyn TickSource) -> Result<u64, EngineError> {
        self.run_with(source, |_| {})
    }

    /// Like [`run`](Self::run), calling `after_tick` once every frame has run
    ///
    /// The hook may call [`quit`](Self::quit) to end the loop.
    pub fn run_with(
        &mut self,
        source: &mut dyn TickSource,
        mut after_tick: impl FnMut(&mut Engine),
    ) -> Result<u64, EngineError> {
        info!("Starting main loop...");
        self.running = true;

        let mut frames = 0;
        while self.running {
            let Some(now_ms) = source.next_tick() else {
                break;
            };
            self.tick(now_ms)?;
            frames += 1;
            after_tick(self);
        }

        info!("Main loop stopped after {} frames", frames);
        Ok(frames)
    }

    /// Load the configured launch scene, if any, then run
    pub fn launch(&mut self, source: &mut dyn TickSource) -> Result<u64, EngineError> {
        self.launch_with(source, |_| {})
    }

    /// Load the configured launch scene, if any, then [`run_with`](Self::run_with)
    pub fn launch_with(
        &mut self,
        source: &mut dyn TickSource,
        after_tick: impl FnMut(&mut Engine),
    ) -> Result<u64, EngineError> {
        if let Some(path) = self.config.launch_scene.clone() {
            self.load_scene_file(path)?;
        }
        self.run_with(source, after_tick)
    }

    /// Stop the main loop after the current frame
    pub fn quit(&mut self) {
        info!("Engine shutdown requested");
        self.running = false;
    }

    /// Whether the main loop keeps going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current scene
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable current scene
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Frames run so far
    pub fn frame_count(&self) -> u64 {
        self.clock.frame_count()
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Component constructor table
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }
}

/// Engine-level errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Scene construction or a system failed
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration is invalid or unreadable
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
