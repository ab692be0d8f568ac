//! Collider component
//!
//! Registers an axis-aligned box centred on the owner's world position.
//! Only colliders with a handler run the overlap test; the handler is a
//! sibling component exposing the collision capability.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::ecs::capability::{Capability, LogicComponent};
use crate::ecs::component::{parse_desc, Component, ComponentContext, ComponentDesc, ComponentId, ComponentType};
use crate::foundation::math::Vec2;
use crate::foundation::time::Timing;
use crate::physics::collider_registry::{ColliderEntry, ColliderHit};
use crate::physics::collision_layers::CollisionLayers;
use crate::scene::entity::EntityId;
use crate::scene::error::SceneResult;

/// Box size in world units
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ColliderSize {
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

/// Descriptor of a [`ColliderComponent`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColliderDesc {
    /// Layer bits
    pub flag: CollisionLayers,
    /// Mask bits
    pub mask: CollisionLayers,
    /// Box size
    pub size: ColliderSize,
    /// Type tag of the sibling receiving collisions
    pub handler: Option<String>,
}

/// Collision participant
#[derive(Debug, Clone)]
pub struct ColliderComponent {
    owner: EntityId,
    flag: CollisionLayers,
    mask: CollisionLayers,
    size: Vec2,
    handler: Option<ComponentId>,
}

impl ColliderComponent {
    /// Layer bits
    pub fn flag(&self) -> CollisionLayers {
        self.flag
    }

    /// Mask bits
    pub fn mask(&self) -> CollisionLayers {
        self.mask
    }

    /// Box size
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Resolved handler, if any
    pub fn handler(&self) -> Option<ComponentId> {
        self.handler
    }
}

impl ComponentType for ColliderComponent {
    const TYPE_TAG: &'static str = "Collider";

    fn new(owner: EntityId) -> Self {
        Self {
            owner,
            flag: CollisionLayers::empty(),
            mask: CollisionLayers::empty(),
            size: Vec2::zeros(),
            handler: None,
        }
    }
}

impl Component for ColliderComponent {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: ColliderDesc = parse_desc(Self::TYPE_TAG, desc)?;
        self.flag = desc.flag;
        self.mask = desc.mask;
        self.size = Vec2::new(desc.size.w, desc.size.h);
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: ColliderDesc = parse_desc(Self::TYPE_TAG, desc)?;

        if let Some(type_tag) = desc.handler.as_deref() {
            self.handler = resolve_handler(ctx, type_tag);
        }

        let entry = ColliderEntry {
            component: ctx.id(),
            owner: self.owner,
            size: self.size,
            flag: self.flag,
            mask: self.mask,
        };
        ctx.scene().colliders_mut().register(entry);
        Ok(())
    }

    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

// A sibling without the collision capability leaves the collider passive
fn resolve_handler(ctx: &mut ComponentContext<'_>, type_tag: &str) -> Option<ComponentId> {
    let Some(handler) = ctx.sibling(type_tag) else {
        warn!("Collider handler '{}' not found on its entity", type_tag);
        return None;
    };

    let capable = ctx
        .scene()
        .invoke(handler, |component, _| Ok(Capability::Collision.is_supported_by(component)))
        .unwrap_or(false);
    if !capable {
        warn!("Collider handler '{}' does not support {}", type_tag, Capability::Collision);
        return None;
    }
    Some(handler)
}

impl LogicComponent for ColliderComponent {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _timing: &Timing) -> SceneResult<()> {
        let Some(handler) = self.handler else {
            return Ok(());
        };

        let id = ctx.id();
        let own = ColliderEntry {
            component: id,
            owner: self.owner,
            size: self.size,
            flag: self.flag,
            mask: self.mask,
        };
        let Some(area) = own.area(ctx.scene_ref()) else {
            return Ok(());
        };

        let others = ctx.scene_ref().colliders().entries().to_vec();
        for other in others {
            let scene = ctx.scene_ref();
            if !scene.contains_component(handler) {
                debug!("Collision handler disposed, collider goes passive");
                self.handler = None;
                break;
            }
            if other.component == id
                || !scene.is_enabled(other.component)
                || !scene.entity(other.owner).is_some_and(|owner| owner.active)
            {
                continue;
            }

            let Some(other_area) = other.area(scene) else {
                continue;
            };
            if !area.intersects(&other_area) {
                continue;
            }

            let hit = ColliderHit {
                component: other.component,
                owner: other.owner,
                flag: other.flag,
                mask: other.mask,
                area: other_area,
            };
            ctx.scene().invoke(handler, |component, handler_ctx| {
                match component.as_collision_handler_mut() {
                    Some(receiver) => receiver.on_collision(handler_ctx, &hit),
                    None => {
                        warn!("Component '{}' lost its collision capability", handler_ctx.type_tag());
                        Ok(())
                    }
                }
            })?;
        }

        Ok(())
    }
}
