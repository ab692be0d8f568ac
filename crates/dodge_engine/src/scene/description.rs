//! Declarative scene descriptions
//!
//! A scene file is a JSON object mapping entity names to entity
//! descriptions. Object key order is meaningful: entities, children and
//! components are built in the order they are written.

use std::fmt;
use std::marker::PhantomData;
use std::path::Path;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::assets;
use crate::ecs::component::ComponentDesc;
use crate::scene::error::{SceneError, SceneResult};

/// String-keyed map that remembers insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self { entries: Vec::new() }
    }
}

impl<V> OrderedMap<V> {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; a replaced key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.iter().find(|(existing, _)| existing == key).map(|(_, value)| value)
    }

    /// Entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct OrderedMapVisitor<V>(PhantomData<V>);

impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
    type Value = OrderedMap<V>;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("an object")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut map = OrderedMap::new();
        while let Some((key, value)) = access.next_entry::<String, V>()? {
            map.insert(key, value);
        }
        Ok(map)
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
        Ok(OrderedMap::new())
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// One entity: its components and its children
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityDescription {
    /// Components keyed by type tag
    #[serde(default)]
    pub components: OrderedMap<ComponentDesc>,
    /// Child entities keyed by name
    #[serde(default)]
    pub children: SceneDescription,
}

impl EntityDescription {
    /// Create an empty entity description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component descriptor
    pub fn with_component(mut self, type_tag: impl Into<String>, desc: ComponentDesc) -> Self {
        self.components.insert(type_tag, desc);
        self
    }

    /// Add a child entity
    pub fn with_child(mut self, name: impl Into<String>, child: EntityDescription) -> Self {
        self.children.entities.insert(name, child);
        self
    }
}

/// Named entities, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneDescription {
    /// Entities keyed by name
    pub entities: OrderedMap<EntityDescription>,
}

impl SceneDescription {
    /// Create an empty description
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level entity
    pub fn with_entity(mut self, name: impl Into<String>, entity: EntityDescription) -> Self {
        self.entities.insert(name, entity);
        self
    }

    /// Entities in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EntityDescription)> + '_ {
        self.entities.iter()
    }

    /// Parse a description from JSON text
    pub fn from_json_str(json: &str) -> SceneResult<Self> {
        serde_json::from_str(json).map_err(|source| SceneError::Parse {
            path: "<inline>".to_string(),
            source,
        })
    }

    /// Load a description from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        assets::load_json(path)
    }
}
