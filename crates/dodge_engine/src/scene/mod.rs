//! Scene graph
//!
//! Entity tree, component ownership and scene descriptions.

pub mod description;
pub mod entity;
pub mod error;
pub mod scene_graph;

pub use description::{EntityDescription, OrderedMap, SceneDescription};
pub use entity::{ChildEntry, Entity, EntityId};
pub use error::{SceneError, SceneResult};
pub use scene_graph::{Scene, ENABLE_METHOD};
