//! Entity-Component-System layer
//!
//! Component contract, capability traits, the type tag registry and the
//! per-tick systems that dispatch over a [`Scene`](crate::scene::Scene).

pub mod capability;
pub mod component;
pub mod components;
pub mod registry;
pub mod system;
pub mod systems;

pub use capability::{
    CameraComponent, Capability, CollisionHandler, DisplayComponent, EventArg, EventListener,
    LogicComponent,
};
pub use component::{
    parse_desc, AsAny, Component, ComponentContext, ComponentDesc, ComponentId, ComponentType,
    LifecycleState,
};
pub use registry::{ComponentCreator, ComponentRegistry};
pub use system::System;
pub use systems::{default_systems, DisplaySystem, LogicSystem, SceneManagerSystem};

#[cfg(test)]
mod tests;
