//! Type tag to constructor table

use std::collections::HashMap;

use log::{error, warn};

use crate::ecs::component::{Component, ComponentType};
use crate::ecs::components::{ColliderComponent, EnablerComponent, PositionComponent};
use crate::scene::entity::EntityId;
use crate::scene::error::{SceneError, SceneResult};

/// Constructor stored for a type tag
pub type ComponentCreator = fn(EntityId) -> Box<dyn Component>;

fn construct<T: ComponentType>(owner: EntityId) -> Box<dyn Component> {
    Box::new(T::new(owner))
}

/// Maps the type tags used in scene descriptions to constructors
#[derive(Debug, Clone, Default)]
pub struct ComponentRegistry {
    creators: HashMap<&'static str, ComponentCreator>,
}

impl ComponentRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in components
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register::<PositionComponent>()
            .register::<ColliderComponent>()
            .register::<EnablerComponent>();
        registry
    }

    /// Register `T` under its type tag
    pub fn register<T: ComponentType>(&mut self) -> &mut Self {
        self.register_with(T::TYPE_TAG, construct::<T>)
    }

    /// Register an explicit constructor under `type_tag`
    pub fn register_with(&mut self, type_tag: &'static str, creator: ComponentCreator) -> &mut Self {
        if self.creators.insert(type_tag, creator).is_some() {
            warn!("Component type '{}' registered twice, replacing constructor", type_tag);
        }
        self
    }

    /// Instantiate a component of `type_tag` for `owner`
    pub fn create(&self, type_tag: &str, owner: EntityId) -> SceneResult<Box<dyn Component>> {
        self.instantiate(type_tag, owner).map(|(_, component)| component)
    }

    pub(crate) fn instantiate(
        &self,
        type_tag: &str,
        owner: EntityId,
    ) -> SceneResult<(&'static str, Box<dyn Component>)> {
        match self.creators.get_key_value(type_tag) {
            Some((tag, creator)) => Ok((*tag, creator(owner))),
            None => {
                error!("Unknown component type '{}'", type_tag);
                Err(SceneError::UnknownComponentType(type_tag.to_string()))
            }
        }
    }

    /// Whether `type_tag` has a constructor
    pub fn contains(&self, type_tag: &str) -> bool {
        self.creators.contains_key(type_tag)
    }

    /// Registered tags, sorted
    pub fn type_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.creators.keys().copied().collect();
        tags.sort_unstable();
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn owner() -> EntityId {
        let mut entities: SlotMap<EntityId, ()> = SlotMap::with_key();
        entities.insert(())
    }

    #[test]
    fn test_builtins_registered() {
        let registry = ComponentRegistry::with_builtins();
        assert_eq!(registry.type_tags(), vec!["Collider", "Enabler", "Position"]);
    }

    #[test]
    fn test_create_known_type() {
        let registry = ComponentRegistry::with_builtins();
        let component = registry.create("Position", owner()).unwrap();
        assert!((*component).as_any().is::<PositionComponent>());
    }

    #[test]
    fn test_create_unknown_type() {
        let registry = ComponentRegistry::new();
        let result = registry.create("Sprite", owner());
        assert!(matches!(result, Err(SceneError::UnknownComponentType(tag)) if tag == "Sprite"));
    }

    #[test]
    fn test_contains() {
        let mut registry = ComponentRegistry::new();
        assert!(!registry.contains("Position"));
        registry.register::<PositionComponent>();
        assert!(registry.contains("Position"));
    }
}
