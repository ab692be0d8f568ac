//! Per-tick systems
//!
//! The engine runs them in a fixed order: scene manager, display, logic.

pub mod display;
pub mod logic;
pub mod scene_manager;

pub use display::DisplaySystem;
pub use logic::LogicSystem;
pub use scene_manager::SceneManagerSystem;

use crate::ecs::system::System;

/// The standard system list, in execution order
pub fn default_systems() -> Vec<Box<dyn System>> {
    vec![
        Box::new(SceneManagerSystem::new()),
        Box::new(DisplaySystem::new()),
        Box::new(LogicSystem::new()),
    ]
}
