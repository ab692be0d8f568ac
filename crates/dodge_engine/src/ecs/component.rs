//! Component contract
//!
//! Components are created in two phases. `create` runs as soon as the
//! component is attached, before its siblings exist. `setup` runs later,
//! once every component of the same construction wave has been created, so
//! it may look up siblings and other entities.

use std::any::Any;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::ecs::capability::{
    CameraComponent, Capability, CollisionHandler, DisplayComponent, EventListener,
    LogicComponent,
};
use crate::scene::entity::EntityId;
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::scene_graph::Scene;

slotmap::new_key_type! {
    /// Handle to a component slot owned by a [`Scene`]
    pub struct ComponentId;
}

/// Opaque component descriptor as written in a scene description
pub type ComponentDesc = Value;

/// Upcast helper implemented for every `'static` type
pub trait AsAny {
    /// View as [`Any`]
    fn as_any(&self) -> &dyn Any;
    /// View as mutable [`Any`]
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A typed behavior or data unit attached to exactly one entity
pub trait Component: AsAny {
    /// Phase 1: runs right after construction
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, _desc: &ComponentDesc) -> SceneResult<()> {
        Ok(())
    }

    /// Phase 2: runs once every component of the wave has been created
    fn setup(&mut self, _ctx: &mut ComponentContext<'_>, _desc: &ComponentDesc) -> SceneResult<()> {
        Ok(())
    }

    /// Called when the enabled flag goes from false to true
    fn on_enabled(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Called when the enabled flag goes from true to false
    fn on_disabled(&mut self, _ctx: &mut ComponentContext<'_>) {}

    /// Logic capability
    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        None
    }

    /// Display capability
    fn as_display_mut(&mut self) -> Option<&mut dyn DisplayComponent> {
        None
    }

    /// Render capability
    fn as_camera_mut(&mut self) -> Option<&mut dyn CameraComponent> {
        None
    }

    /// Collision capability
    fn as_collision_handler_mut(&mut self) -> Option<&mut dyn CollisionHandler> {
        None
    }

    /// Event capability
    fn as_event_listener_mut(&mut self) -> Option<&mut dyn EventListener> {
        None
    }
}

/// A component type constructible from a scene description
pub trait ComponentType: Component + Sized + 'static {
    /// Key used in scene descriptions
    const TYPE_TAG: &'static str;

    /// Construct an unconfigured component for `owner`
    fn new(owner: EntityId) -> Self;
}

/// Where a component is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Constructed, phase 1 not run yet
    Constructed,
    /// Phase 1 completed
    Created,
    /// Waiting in the pending-setup queue
    PendingSetup,
    /// Phase 2 completed
    Active,
    /// A phase call returned an error
    Failed,
    /// Removed from the scene
    Disposed,
}

/// Handle given to every component callback
pub struct ComponentContext<'a> {
    scene: &'a mut Scene,
    owner: EntityId,
    id: ComponentId,
    type_tag: &'static str,
}

impl<'a> ComponentContext<'a> {
    pub(crate) fn new(
        scene: &'a mut Scene,
        owner: EntityId,
        id: ComponentId,
        type_tag: &'static str,
    ) -> Self {
        Self { scene, owner, id, type_tag }
    }

    /// The scene the component lives in
    pub fn scene(&mut self) -> &mut Scene {
        &mut *self.scene
    }

    /// Read-only view of the scene
    pub fn scene_ref(&self) -> &Scene {
        &*self.scene
    }

    /// Entity owning the component
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// The component's own id
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// The component's type tag
    pub fn type_tag(&self) -> &'static str {
        self.type_tag
    }

    /// Set this component's enabled flag
    ///
    /// The hook runs once the current callback returns.
    pub fn set_enabled(&mut self, enabled: bool) -> SceneResult<bool> {
        self.scene.set_enabled(self.id, enabled)
    }

    /// Resolve an `entity.Type` path from the scene root
    pub fn find_component(&self, path: &str) -> Option<ComponentId> {
        self.scene.find_component(path)
    }

    /// Component of `type_tag` on the owning entity
    pub fn sibling(&self, type_tag: &str) -> Option<ComponentId> {
        self.scene.get_component(self.owner, type_tag)
    }

    /// Build the error for a capability this component lacks
    pub fn missing(&self, capability: Capability) -> SceneError {
        SceneError::MissingCapability { type_tag: self.type_tag, capability }
    }
}

/// Decode a descriptor into a typed settings struct
pub fn parse_desc<T: DeserializeOwned>(type_tag: &str, desc: &ComponentDesc) -> SceneResult<T> {
    // Components without settings are often written as `null` or `{}`
    let desc = if desc.is_null() { Value::Object(serde_json::Map::new()) } else { desc.clone() };
    serde_json::from_value(desc).map_err(|source| SceneError::InvalidDescriptor {
        type_tag: type_tag.to_string(),
        source,
    })
}
