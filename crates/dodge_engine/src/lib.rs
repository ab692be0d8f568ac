//! # Dodge Engine
//!
//! A small entity-component scene runtime for 2D arcade games.
//!
//! ## Features
//!
//! - **Scene Graph**: Named entity tree built from JSON scene descriptions
//! - **Two-Phase Components**: `create` on attach, `setup` once the wave is built
//! - **Capability Dispatch**: Display, render and logic passes over the active tree
//! - **Collisions**: Scene-owned collider registry with AABB overlap tests
//! - **Events**: Named fan-out call lists
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dodge_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::default();
//!     let mut engine = Engine::new(config, ComponentRegistry::with_builtins())?;
//!     engine.load_scene_file("scenes/play.json")?;
//!
//!     let mut ticker = FixedRateTicker::new(60).with_frame_limit(600);
//!     engine.run(&mut ticker)?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod config;
pub mod core;
pub mod foundation;

pub mod assets;
pub mod ecs;
pub mod events;
pub mod physics;
pub mod scene;

mod engine;

pub use crate::core::EngineConfig;
pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        ecs::{
            parse_desc, CameraComponent, Capability, CollisionHandler, Component, ComponentContext,
            ComponentDesc, ComponentId, ComponentRegistry, ComponentType, DisplayComponent, EventArg,
            EventListener, LifecycleState, LogicComponent, System,
        },
        ecs::components::{ColliderComponent, EnablerComponent, PositionComponent},
        events::{EventTarget, EventTrigger},
        foundation::{
            math::{clamp, in_range, Vec2, Vec3},
            time::{FixedRateTicker, FrameClock, ManualTicker, TickSource, Timing},
        },
        physics::{ColliderHit, CollisionLayers, Rectangle},
        scene::{EntityDescription, EntityId, Scene, SceneDescription, SceneError, SceneResult},
        Engine, EngineConfig, EngineError,
    };
}
