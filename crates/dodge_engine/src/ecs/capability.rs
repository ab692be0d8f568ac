//! Opt-in component capabilities
//!
//! A component exposes a capability by returning `Some(self)` from the
//! matching accessor on [`Component`]. Systems only ever dispatch through
//! these accessors.

use std::fmt;

use serde_json::Value;

use crate::ecs::component::{Component, ComponentContext};
use crate::foundation::time::Timing;
use crate::physics::collider_registry::ColliderHit;
use crate::scene::error::SceneResult;

/// Argument passed through events
pub type EventArg = Value;

/// Per-tick game logic
pub trait LogicComponent {
    /// Advance the component by one frame
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> SceneResult<()>;
}

/// Per-tick display preparation, run before any render call
pub trait DisplayComponent {
    /// Prepare display state for this frame
    fn display(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) -> SceneResult<()>;
}

/// Per-tick rendering, run after every display call of the frame
pub trait CameraComponent {
    /// Render the frame
    fn render(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) -> SceneResult<()>;
}

/// Receiver of collider overlaps
pub trait CollisionHandler {
    /// Called once per overlapping collider per logic tick
    fn on_collision(&mut self, ctx: &mut ComponentContext<'_>, hit: &ColliderHit) -> SceneResult<()>;
}

/// Receiver of named events
pub trait EventListener {
    /// Handle `method` with the given arguments
    fn on_event(
        &mut self,
        ctx: &mut ComponentContext<'_>,
        method: &str,
        args: &[EventArg],
    ) -> SceneResult<()>;
}

/// Capabilities systems can query for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// [`LogicComponent`]
    Update,
    /// [`DisplayComponent`]
    Display,
    /// [`CameraComponent`]
    Render,
    /// [`CollisionHandler`]
    Collision,
    /// [`EventListener`]
    Event,
}

impl Capability {
    /// Operation name of the capability
    pub fn name(self) -> &'static str {
        match self {
            Self::Update => "update",
            Self::Display => "display",
            Self::Render => "render",
            Self::Collision => "onCollision",
            Self::Event => "onEvent",
        }
    }

    /// Whether `component` opts into this capability
    pub fn is_supported_by(self, component: &mut dyn Component) -> bool {
        match self {
            Self::Update => component.as_logic_mut().is_some(),
            Self::Display => component.as_display_mut().is_some(),
            Self::Render => component.as_camera_mut().is_some(),
            Self::Collision => component.as_collision_handler_mut().is_some(),
            Self::Event => component.as_event_listener_mut().is_some(),
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
