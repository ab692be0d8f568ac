//! Scene graph node
//!
//! An [`Entity`] only stores ids. The [`Scene`](crate::scene::Scene) owns the
//! arena and performs every operation that touches more than one node.

use std::collections::{BTreeMap, HashMap};

use crate::ecs::component::ComponentId;

slotmap::new_key_type! {
    /// Handle to an entity owned by a scene
    pub struct EntityId;
}

/// One child slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    /// Name the child was added under
    pub name: String,
    /// Child entity
    pub entity: EntityId,
}

/// Node of the scene tree
#[derive(Debug, Clone)]
pub struct Entity {
    /// Inactive entities and their subtrees are skipped by systems
    pub active: bool,
    parent: Option<EntityId>,
    children: BTreeMap<u64, ChildEntry>,
    children_by_name: HashMap<String, u64>,
    children_by_entity: HashMap<EntityId, u64>,
    next_child_order: u64,
    components: Vec<(&'static str, ComponentId)>,
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl Entity {
    /// Create an active, detached entity with no children or components
    pub fn new() -> Self {
        Self {
            active: true,
            parent: None,
            children: BTreeMap::new(),
            children_by_name: HashMap::new(),
            children_by_entity: HashMap::new(),
            next_child_order: 0,
            components: Vec::new(),
        }
    }

    /// Current parent
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    /// Append a child entry; the name now resolves to it
    pub(crate) fn attach_child(&mut self, name: &str, child: EntityId) {
        let order = self.next_child_order;
        self.next_child_order += 1;

        self.children.insert(order, ChildEntry { name: name.to_string(), entity: child });
        self.children_by_name.insert(name.to_string(), order);
        self.children_by_entity.insert(child, order);
    }

    /// Drop a child entry from every index
    pub(crate) fn detach_child(&mut self, child: EntityId) -> Option<ChildEntry> {
        let order = self.children_by_entity.remove(&child)?;
        let entry = self.children.remove(&order)?;

        // A later child may have taken over the name
        if self.children_by_name.get(&entry.name) == Some(&order) {
            self.children_by_name.remove(&entry.name);
        }

        Some(entry)
    }

    /// Child registered under `name`, the most recent one on reuse
    pub fn child(&self, name: &str) -> Option<EntityId> {
        self.children_by_name
            .get(name)
            .and_then(|order| self.children.get(order))
            .map(|entry| entry.entity)
    }

    /// Whether `child` is a direct child
    pub fn has_child(&self, child: EntityId) -> bool {
        self.children_by_entity.contains_key(&child)
    }

    /// Children in insertion order
    pub fn children(&self) -> impl Iterator<Item = &ChildEntry> + '_ {
        self.children.values()
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Component stored under `type_tag`
    pub fn component(&self, type_tag: &str) -> Option<ComponentId> {
        self.components
            .iter()
            .find(|(tag, _)| *tag == type_tag)
            .map(|(_, id)| *id)
    }

    /// Components in insertion order
    pub fn components(&self) -> impl Iterator<Item = (&'static str, ComponentId)> + '_ {
        self.components.iter().copied()
    }

    /// Store `id` under `type_tag`, returning the component it replaced
    ///
    /// A replaced tag keeps its original position.
    pub(crate) fn insert_component(
        &mut self,
        type_tag: &'static str,
        id: ComponentId,
    ) -> Option<ComponentId> {
        match self.components.iter_mut().find(|(tag, _)| *tag == type_tag) {
            Some(slot) => Some(std::mem::replace(&mut slot.1, id)),
            None => {
                self.components.push((type_tag, id));
                None
            }
        }
    }

    pub(crate) fn remove_component(&mut self, id: ComponentId) {
        self.components.retain(|(_, existing)| *existing != id);
    }
}
