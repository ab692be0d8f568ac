//! Scene-owned list of collision participants

use log::warn;

use crate::ecs::component::ComponentId;
use crate::ecs::components::PositionComponent;
use crate::foundation::math::Vec2;
use crate::physics::collision_layers::CollisionLayers;
use crate::physics::rectangle::Rectangle;
use crate::scene::entity::EntityId;
use crate::scene::scene_graph::Scene;

/// A registered collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderEntry {
    /// Collider component
    pub component: ComponentId,
    /// Entity owning the collider
    pub owner: EntityId,
    /// Box size, centred on the owner's world position
    pub size: Vec2,
    /// Layer bits
    pub flag: CollisionLayers,
    /// Mask bits, stored only
    pub mask: CollisionLayers,
}

impl ColliderEntry {
    /// World-space box of the collider
    ///
    /// `None` when the owner has no Position component.
    pub fn area(&self, scene: &Scene) -> Option<Rectangle> {
        match PositionComponent::world_position_of(scene, self.owner) {
            Some(position) => Some(Rectangle::from_center(position.x, position.y, self.size.x, self.size.y)),
            None => {
                warn!("Collider {:?} has no Position on its owner, skipping", self.component);
                None
            }
        }
    }
}

/// Description of the other collider in an overlap
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColliderHit {
    /// Other collider component
    pub component: ComponentId,
    /// Entity owning the other collider
    pub owner: EntityId,
    /// Other collider's layer bits
    pub flag: CollisionLayers,
    /// Other collider's mask bits
    pub mask: CollisionLayers,
    /// Other collider's world box at test time
    pub area: Rectangle,
}

/// Insertion-ordered collider list
///
/// Disabled colliders stay registered; the collision test skips them.
#[derive(Debug, Clone, Default)]
pub struct ColliderRegistry {
    entries: Vec<ColliderEntry>,
}

impl ColliderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider, replacing an earlier entry for the same component
    pub fn register(&mut self, entry: ColliderEntry) {
        match self.entries.iter_mut().find(|existing| existing.component == entry.component) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    /// Remove a collider; returns whether it was registered
    pub fn unregister(&mut self, component: ComponentId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.component != component);
        self.entries.len() != before
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[ColliderEntry] {
        &self.entries
    }

    /// Number of registered colliders
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no collider is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
