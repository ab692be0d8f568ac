//! Position component
//!
//! Local offset relative to the parent entity. World positions are the sum
//! of the entity's offset and the offsets of every ancestor that has one.

use serde::{Deserialize, Serialize};

use crate::ecs::component::{parse_desc, Component, ComponentContext, ComponentDesc, ComponentType};
use crate::foundation::math::Vec3;
use crate::scene::entity::EntityId;
use crate::scene::error::SceneResult;
use crate::scene::scene_graph::Scene;

/// Descriptor of a [`PositionComponent`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PositionDesc {
    /// Horizontal offset
    pub x: f32,
    /// Vertical offset
    pub y: f32,
    /// Depth, used for draw ordering
    pub z: f32,
}

/// Local position of an entity
#[derive(Debug, Clone)]
pub struct PositionComponent {
    owner: EntityId,
    /// Offset from the parent
    pub local: Vec3,
}

impl PositionComponent {
    /// Entity owning this position
    pub fn owner(&self) -> EntityId {
        self.owner
    }

    /// World position of this component's entity
    pub fn world_position(&self, scene: &Scene) -> Vec3 {
        self.local + ancestor_offset(scene, self.owner)
    }

    /// World position of `entity`; `None` if it has no Position
    pub fn world_position_of(scene: &Scene, entity: EntityId) -> Option<Vec3> {
        scene
            .component_of::<PositionComponent>(entity)
            .map(|position| position.world_position(scene))
    }

    /// Move by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        self.local += offset;
    }
}

fn ancestor_offset(scene: &Scene, entity: EntityId) -> Vec3 {
    let mut offset = Vec3::zeros();
    let mut current = scene.parent(entity);
    while let Some(ancestor) = current {
        if let Some(position) = scene.component_of::<PositionComponent>(ancestor) {
            offset += position.local;
        }
        current = scene.parent(ancestor);
    }
    offset
}

impl ComponentType for PositionComponent {
    const TYPE_TAG: &'static str = "Position";

    fn new(owner: EntityId) -> Self {
        Self { owner, local: Vec3::zeros() }
    }
}

impl Component for PositionComponent {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: PositionDesc = parse_desc(Self::TYPE_TAG, desc)?;
        self.local = Vec3::new(desc.x, desc.y, desc.z);
        Ok(())
    }
}
