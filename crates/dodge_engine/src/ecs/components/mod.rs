//! Built-in components

pub mod collider;
pub mod enabler;
pub mod position;

pub use collider::{ColliderComponent, ColliderDesc, ColliderSize};
pub use enabler::{EnablerComponent, EnablerDesc};
pub use position::{PositionComponent, PositionDesc};
