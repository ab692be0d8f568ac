//! Scene: entity arena, component slots and the two-phase lifecycle
//!
//! Entities and components live in two `slotmap` arenas owned by the
//! [`Scene`]. A component instance is moved out of its slot while one of
//! its callbacks runs, which lets the callback borrow the whole scene
//! mutably. Re-entering a busy component fails with
//! [`SceneError::ComponentBusy`].
//!
//! Construction happens in two phases. [`Scene::add_component`] runs
//! `create` immediately and queues the component for `setup`.
//! [`Scene::refresh`] drains that queue in waves until it stays empty.

use std::any::Any;
use std::rc::Rc;

use log::{debug, error, info, warn};
use slotmap::SlotMap;

use crate::ecs::capability::{Capability, EventArg};
use crate::ecs::component::{
    Component, ComponentContext, ComponentDesc, ComponentId, ComponentType, LifecycleState,
};
use crate::ecs::registry::ComponentRegistry;
use crate::events::EventTarget;
use crate::physics::collider_registry::ColliderRegistry;
use crate::scene::description::{EntityDescription, SceneDescription};
use crate::scene::entity::{Entity, EntityId};
use crate::scene::error::{SceneError, SceneResult};

/// Event method reserved for toggling a component's enabled flag
pub const ENABLE_METHOD: &str = "enable";

struct ComponentSlot {
    type_tag: &'static str,
    owner: EntityId,
    enabled: bool,
    state: LifecycleState,
    instance: Option<Box<dyn Component>>,
}

/// A tree of entities rooted at an unnamed root entity
pub struct Scene {
    registry: Rc<ComponentRegistry>,
    entities: SlotMap<EntityId, Entity>,
    components: SlotMap<ComponentId, ComponentSlot>,
    root: EntityId,
    pending_setup: Vec<(ComponentId, ComponentDesc)>,
    pending_hooks: Vec<(ComponentId, bool)>,
    colliders: ColliderRegistry,
}

impl Scene {
    /// Create an empty scene
    pub fn new(registry: Rc<ComponentRegistry>) -> Self {
        let mut entities = SlotMap::with_key();
        let root = entities.insert(Entity::new());
        Self {
            registry,
            entities,
            components: SlotMap::with_key(),
            root,
            pending_setup: Vec::new(),
            pending_hooks: Vec::new(),
            colliders: ColliderRegistry::new(),
        }
    }

    /// Build a scene from a description
    ///
    /// Every component has run `create`; `setup` runs on the next
    /// [`refresh`](Self::refresh).
    pub fn create(registry: Rc<ComponentRegistry>, description: &SceneDescription) -> SceneResult<Self> {
        let mut scene = Self::new(registry);
        let root = scene.root;
        scene.create_children(description, root)?;

        info!(
            "Scene created: {} entities, {} components pending setup",
            scene.entities.len() - 1,
            scene.pending_setup.len()
        );
        Ok(scene)
    }

    /// Build `description` as a child of `parent` named `name`
    ///
    /// The entity is attached first, then its children are built, then its
    /// components in declaration order.
    pub fn create_child(
        &mut self,
        description: &EntityDescription,
        name: &str,
        parent: EntityId,
    ) -> SceneResult<EntityId> {
        let entity = self.create_entity();
        if let Err(err) = self.add_child(parent, name, entity) {
            self.entities.remove(entity);
            return Err(err);
        }

        self.create_children(&description.children, entity)?;
        for (type_tag, desc) in description.components.iter() {
            self.add_component(entity, type_tag, desc.clone())?;
        }

        debug!("Created entity '{}'", name);
        Ok(entity)
    }

    fn create_children(&mut self, description: &SceneDescription, parent: EntityId) -> SceneResult<()> {
        for (name, child) in description.iter() {
            self.create_child(child, name, parent)?;
        }
        Ok(())
    }

    /// Run pending `setup` calls until none are left
    ///
    /// Entries queued while a wave runs form the next wave. All setups of
    /// a wave run even if one fails; the first failure is returned once
    /// the wave is over and the failed component is not retried. Returns
    /// the number of waves run.
    pub fn refresh(&mut self) -> SceneResult<usize> {
        let mut waves = 0;

        while !self.pending_setup.is_empty() {
            let wave = std::mem::take(&mut self.pending_setup);
            waves += 1;
            debug!("Setup wave {}: {} component(s)", waves, wave.len());

            let mut first_error = None;
            for (id, desc) in wave {
                if !self.components.contains_key(id) {
                    continue;
                }

                let result = self.invoke(id, |component, ctx| component.setup(ctx, &desc));
                let state = if result.is_ok() { LifecycleState::Active } else { LifecycleState::Failed };
                if let Some(slot) = self.components.get_mut(id) {
                    slot.state = state;
                }

                if let Err(err) = result {
                    error!("Setup failed: {}", err);
                    first_error.get_or_insert(err);
                }
            }

            if let Some(err) = first_error {
                return Err(err);
            }
        }

        Ok(waves)
    }

    /// Root entity
    pub fn root(&self) -> EntityId {
        self.root
    }

    /// Constructor table used by this scene
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Create a detached entity
    pub fn create_entity(&mut self) -> EntityId {
        self.entities.insert(Entity::new())
    }

    /// Entity node
    pub fn entity(&self, entity: EntityId) -> Option<&Entity> {
        self.entities.get(entity)
    }

    /// Whether `entity` is alive
    pub fn contains_entity(&self, entity: EntityId) -> bool {
        self.entities.contains_key(entity)
    }

    /// Number of live entities, root included
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Parent of `entity`
    pub fn parent(&self, entity: EntityId) -> Option<EntityId> {
        self.entities.get(entity).and_then(Entity::parent)
    }

    /// Set an entity's active flag
    pub fn set_active(&mut self, entity: EntityId, active: bool) -> SceneResult<()> {
        let node = self.entities.get_mut(entity).ok_or(SceneError::EntityNotFound(entity))?;
        node.active = active;
        Ok(())
    }

    /// Whether the entity is attached to the root with every ancestor active
    pub fn is_active_in_tree(&self, entity: EntityId) -> bool {
        let mut current = entity;
        loop {
            let Some(node) = self.entities.get(current) else {
                return false;
            };
            if !node.active {
                return false;
            }
            if current == self.root {
                return true;
            }
            match node.parent() {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    fn is_ancestor(&self, ancestor: EntityId, entity: EntityId) -> bool {
        let mut current = Some(entity);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.parent(node);
        }
        false
    }

    /// Attach `child` under `parent`
    ///
    /// The child goes to the end of the traversal order and `name` now
    /// resolves to it.
    pub fn add_child(&mut self, parent: EntityId, name: &str, child: EntityId) -> SceneResult<()> {
        if !self.entities.contains_key(parent) {
            return Err(SceneError::EntityNotFound(parent));
        }
        let child_node = self.entities.get(child).ok_or(SceneError::EntityNotFound(child))?;

        if child == self.root {
            return Err(SceneError::InvalidOperation("The root entity cannot be a child".to_string()));
        }
        if child_node.parent().is_some() {
            return Err(SceneError::InvalidOperation(format!(
                "Cannot add '{}': entity already has a parent",
                name
            )));
        }
        if self.is_ancestor(child, parent) {
            return Err(SceneError::InvalidOperation(format!(
                "Cannot add '{}': entity is an ancestor of the parent",
                name
            )));
        }

        if let Some(parent_node) = self.entities.get_mut(parent) {
            parent_node.attach_child(name, child);
        }
        if let Some(child_node) = self.entities.get_mut(child) {
            child_node.set_parent(Some(parent));
        }
        Ok(())
    }

    /// Detach `child` from `parent`; the child stays alive
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> SceneResult<()> {
        let child_node = self.entities.get_mut(child).ok_or(SceneError::EntityNotFound(child))?;
        if child_node.parent() != Some(parent) {
            return Err(SceneError::InvalidOperation("Entity is not a child of this parent".to_string()));
        }
        child_node.set_parent(None);

        if let Some(parent_node) = self.entities.get_mut(parent) {
            parent_node.detach_child(child);
        }
        Ok(())
    }

    /// Child of `parent` registered under `name`
    pub fn get_child(&self, parent: EntityId, name: &str) -> Option<EntityId> {
        self.entities.get(parent)?.child(name)
    }

    /// Snapshot of `entity`'s children in traversal order
    pub fn children(&self, entity: EntityId) -> Vec<(String, EntityId)> {
        self.entities
            .get(entity)
            .map(|node| node.children().map(|entry| (entry.name.clone(), entry.entity)).collect())
            .unwrap_or_default()
    }

    /// Visit `entity`'s children in traversal order
    pub fn walk_children(&self, entity: EntityId, mut f: impl FnMut(&str, EntityId)) {
        for (name, child) in self.children(entity) {
            f(&name, child);
        }
    }

    /// Detach an entity and dispose it with its whole subtree
    pub fn destroy_entity(&mut self, entity: EntityId) -> SceneResult<()> {
        if entity == self.root {
            return Err(SceneError::InvalidOperation("The root entity cannot be destroyed".to_string()));
        }
        let parent = self.entities.get(entity).ok_or(SceneError::EntityNotFound(entity))?.parent();
        if let Some(parent) = parent {
            self.remove_child(parent, entity)?;
        }

        let mut stack = vec![entity];
        let mut doomed = Vec::new();
        while let Some(current) = stack.pop() {
            if let Some(node) = self.entities.get(current) {
                stack.extend(node.children().map(|entry| entry.entity));
                doomed.push(current);
            }
        }

        for current in &doomed {
            if let Some(node) = self.entities.remove(*current) {
                for (_, id) in node.components() {
                    self.dispose_component(id);
                }
            }
        }

        debug!("Destroyed {} entities", doomed.len());
        Ok(())
    }

    /// Instantiate and attach a component, running its `create` phase
    ///
    /// A component already stored under the same tag is disposed. The new
    /// component is queued for `setup`.
    pub fn add_component(
        &mut self,
        entity: EntityId,
        type_tag: &str,
        desc: ComponentDesc,
    ) -> SceneResult<ComponentId> {
        if !self.entities.contains_key(entity) {
            return Err(SceneError::EntityNotFound(entity));
        }

        let (type_tag, instance) = self.registry.instantiate(type_tag, entity)?;
        let id = self.components.insert(ComponentSlot {
            type_tag,
            owner: entity,
            enabled: true,
            state: LifecycleState::Constructed,
            instance: Some(instance),
        });

        let previous = self
            .entities
            .get_mut(entity)
            .and_then(|node| node.insert_component(type_tag, id));
        if let Some(previous) = previous {
            warn!("Replacing component '{}'", type_tag);
            self.dispose_component(previous);
        }

        if let Err(err) = self.invoke(id, |component, ctx| component.create(ctx, &desc)) {
            error!("Create failed for '{}': {}", type_tag, err);
            if let Some(slot) = self.components.get_mut(id) {
                slot.state = LifecycleState::Failed;
            }
            return Err(err);
        }

        if let Some(slot) = self.components.get_mut(id) {
            slot.state = LifecycleState::Created;
            debug!("Component '{}' created, queued for setup", type_tag);
            slot.state = LifecycleState::PendingSetup;
            self.pending_setup.push((id, desc));
        }
        Ok(id)
    }

    /// Detach and dispose the component stored under `type_tag`
    pub fn remove_component(&mut self, entity: EntityId, type_tag: &str) -> SceneResult<()> {
        let id = self
            .get_component(entity, type_tag)
            .ok_or_else(|| SceneError::UnresolvedReference(type_tag.to_string()))?;
        if let Some(node) = self.entities.get_mut(entity) {
            node.remove_component(id);
        }
        self.dispose_component(id);
        Ok(())
    }

    fn dispose_component(&mut self, id: ComponentId) {
        if let Some(slot) = self.components.remove(id) {
            debug!("Disposed component '{}'", slot.type_tag);
        }
        self.pending_setup.retain(|(pending, _)| *pending != id);
        self.pending_hooks.retain(|(pending, _)| *pending != id);
        self.colliders.unregister(id);
    }

    /// Component stored under `type_tag` on `entity`
    pub fn get_component(&self, entity: EntityId, type_tag: &str) -> Option<ComponentId> {
        self.entities.get(entity)?.component(type_tag)
    }

    /// Visit `entity`'s components in insertion order
    pub fn walk_components(&self, entity: EntityId, mut f: impl FnMut(&'static str, ComponentId)) {
        if let Some(node) = self.entities.get(entity) {
            for (type_tag, id) in node.components() {
                f(type_tag, id);
            }
        }
    }

    /// Find an entity by name
    ///
    /// Looks at the root's own children first, then searches each child's
    /// subtree in traversal order.
    pub fn find_object(&self, name: &str) -> Option<EntityId> {
        self.find_object_from(self.root, name)
    }

    fn find_object_from(&self, parent: EntityId, name: &str) -> Option<EntityId> {
        let node = self.entities.get(parent)?;
        if let Some(found) = node.child(name) {
            return Some(found);
        }
        node.children().find_map(|entry| self.find_object_from(entry.entity, name))
    }

    /// Resolve an `entityName.TypeTag` path
    pub fn find_component(&self, path: &str) -> Option<ComponentId> {
        let (name, type_tag) = path.split_once('.')?;
        let entity = self.find_object(name)?;
        self.get_component(entity, type_tag)
    }

    /// Pre-order traversal below the root
    ///
    /// With `only_active`, an inactive entity and its subtree are skipped.
    pub fn walk(&self, only_active: bool, mut f: impl FnMut(EntityId, &str)) {
        if only_active && self.entities.get(self.root).map_or(true, |root| !root.active) {
            return;
        }
        self.walk_from(self.root, only_active, &mut f);
    }

    fn walk_from(&self, entity: EntityId, only_active: bool, f: &mut dyn FnMut(EntityId, &str)) {
        let Some(node) = self.entities.get(entity) else {
            return;
        };
        for entry in node.children() {
            let Some(child) = self.entities.get(entry.entity) else {
                continue;
            };
            if only_active && !child.active {
                continue;
            }
            f(entry.entity, &entry.name);
            self.walk_from(entry.entity, only_active, f);
        }
    }

    /// Enabled components of active entities exposing `capability`
    ///
    /// Only components whose setup completed are returned, in traversal
    /// order.
    pub fn collect_components(&mut self, capability: Capability) -> Vec<ComponentId> {
        let mut entities = Vec::new();
        self.walk(true, |entity, _| entities.push(entity));

        let mut collected = Vec::new();
        for entity in entities {
            let Some(node) = self.entities.get(entity) else {
                continue;
            };
            for (_, id) in node.components() {
                let Some(slot) = self.components.get_mut(id) else {
                    continue;
                };
                if !slot.enabled || slot.state != LifecycleState::Active {
                    continue;
                }
                if slot.instance.as_deref_mut().is_some_and(|c| capability.is_supported_by(c)) {
                    collected.push(id);
                }
            }
        }
        collected
    }

    /// Run `f` on a component with a context borrowing the whole scene
    ///
    /// Enable hooks queued while `f` runs fire before this returns.
    pub fn invoke<R>(
        &mut self,
        id: ComponentId,
        f: impl FnOnce(&mut dyn Component, &mut ComponentContext<'_>) -> SceneResult<R>,
    ) -> SceneResult<R> {
        let slot = self.components.get_mut(id).ok_or(SceneError::ComponentNotFound(id))?;
        let (owner, type_tag) = (slot.owner, slot.type_tag);
        let Some(mut instance) = slot.instance.take() else {
            warn!("Component '{}' re-entered while busy", type_tag);
            return Err(SceneError::ComponentBusy { type_tag });
        };

        let result = {
            let mut ctx = ComponentContext::new(self, owner, id, type_tag);
            f(&mut *instance, &mut ctx)
        };

        match self.components.get_mut(id) {
            Some(slot) => slot.instance = Some(instance),
            None => debug!("Component '{}' disposed during its own callback", type_tag),
        }
        self.flush_hooks();
        result
    }

    fn flush_hooks(&mut self) {
        if self.pending_hooks.is_empty() {
            return;
        }

        let hooks = std::mem::take(&mut self.pending_hooks);
        let mut deferred = Vec::new();
        for (id, enabled) in hooks {
            match self.components.get(id) {
                None => continue,
                Some(slot) if slot.instance.is_none() => {
                    deferred.push((id, enabled));
                    continue;
                }
                Some(_) => {}
            }

            let result = self.invoke(id, |component, ctx| {
                if enabled {
                    component.on_enabled(ctx);
                } else {
                    component.on_disabled(ctx);
                }
                Ok(())
            });
            if let Err(err) = result {
                warn!("Enable hook not delivered: {}", err);
            }
        }

        if !deferred.is_empty() {
            deferred.append(&mut self.pending_hooks);
            self.pending_hooks = deferred;
        }
    }

    /// Set a component's enabled flag
    ///
    /// Returns whether the flag changed. Hooks only fire on a change; for a
    /// busy component they fire once its callback returns.
    pub fn set_enabled(&mut self, id: ComponentId, enabled: bool) -> SceneResult<bool> {
        let slot = self.components.get_mut(id).ok_or(SceneError::ComponentNotFound(id))?;
        if slot.enabled == enabled {
            return Ok(false);
        }
        slot.enabled = enabled;
        debug!("Component '{}' {}", slot.type_tag, if enabled { "enabled" } else { "disabled" });

        self.pending_hooks.push((id, enabled));
        self.flush_hooks();
        Ok(true)
    }

    /// Enabled flag; `false` for unknown components
    pub fn is_enabled(&self, id: ComponentId) -> bool {
        self.components.get(id).is_some_and(|slot| slot.enabled)
    }

    /// Lifecycle state; disposed components report `Disposed`
    pub fn lifecycle(&self, id: ComponentId) -> LifecycleState {
        self.components.get(id).map_or(LifecycleState::Disposed, |slot| slot.state)
    }

    /// Whether `id` refers to a live component
    pub fn contains_component(&self, id: ComponentId) -> bool {
        self.components.contains_key(id)
    }

    /// Type tag of a live component
    pub fn component_type(&self, id: ComponentId) -> Option<&'static str> {
        self.components.get(id).map(|slot| slot.type_tag)
    }

    /// Owner of a live component
    pub fn component_owner(&self, id: ComponentId) -> Option<EntityId> {
        self.components.get(id).map(|slot| slot.owner)
    }

    /// Typed view of a component; `None` while it is busy
    pub fn component<T: Any>(&self, id: ComponentId) -> Option<&T> {
        self.components.get(id)?.instance.as_deref()?.as_any().downcast_ref::<T>()
    }

    /// Typed mutable view of a component; `None` while it is busy
    pub fn component_mut<T: Any>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.components.get_mut(id)?.instance.as_deref_mut()?.as_any_mut().downcast_mut::<T>()
    }

    /// Typed view of the component stored under `type_tag` on `entity`
    pub fn entity_component<T: Any>(&self, entity: EntityId, type_tag: &str) -> Option<&T> {
        self.component(self.get_component(entity, type_tag)?)
    }

    /// Typed view of `entity`'s component of type `T`
    pub fn component_of<T: ComponentType>(&self, entity: EntityId) -> Option<&T> {
        self.entity_component(entity, T::TYPE_TAG)
    }

    /// Number of components waiting for `setup`
    pub fn pending_setup_count(&self) -> usize {
        self.pending_setup.len()
    }

    /// Number of live components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Registered colliders
    pub fn colliders(&self) -> &ColliderRegistry {
        &self.colliders
    }

    /// Mutable collider registry
    pub fn colliders_mut(&mut self) -> &mut ColliderRegistry {
        &mut self.colliders
    }

    /// Deliver an event to a component
    ///
    /// `"enable"` sets the enabled flag from the first argument; any other
    /// method goes to the component's event listener.
    pub fn dispatch_event(&mut self, target: ComponentId, method: &str, args: &[EventArg]) -> SceneResult<()> {
        if method == ENABLE_METHOD {
            let enabled = args.first().and_then(EventArg::as_bool).ok_or_else(|| {
                SceneError::InvalidOperation(format!("'{}' expects a boolean argument", ENABLE_METHOD))
            })?;
            self.set_enabled(target, enabled)?;
            return Ok(());
        }

        self.invoke(target, |component, ctx| match component.as_event_listener_mut() {
            Some(listener) => listener.on_event(ctx, method, args),
            None => Err(ctx.missing(Capability::Event)),
        })
    }
}

impl EventTarget<Scene> for ComponentId {
    fn invoke(&self, scene: &mut Scene, method: &str, args: &[EventArg]) -> SceneResult<()> {
        scene.dispatch_event(*self, method, args)
    }
}
