//! Collision geometry and the collider registry

pub mod collider_registry;
pub mod collision_layers;
pub mod rectangle;

pub use collider_registry::{ColliderEntry, ColliderHit, ColliderRegistry};
pub use collision_layers::CollisionLayers;
pub use rectangle::{Rectangle, RectangleDesc};
