//! Scene error types

use thiserror::Error;

use crate::ecs::capability::Capability;
use crate::ecs::component::ComponentId;
use crate::scene::entity::EntityId;

/// Errors raised while building, refreshing or ticking a scene
#[derive(Debug, Error)]
pub enum SceneError {
    /// A descriptor named a component type no constructor is registered for
    #[error("Unknown component type '{0}'")]
    UnknownComponentType(String),

    /// A structural operation was used incorrectly
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Entity id does not refer to a live entity
    #[error("Entity {0:?} not found")]
    EntityNotFound(EntityId),

    /// Component id does not refer to a live component
    #[error("Component {0:?} not found")]
    ComponentNotFound(ComponentId),

    /// Component is already executing a callback further up the stack
    #[error("Component '{type_tag}' is busy")]
    ComponentBusy {
        /// Type tag of the busy component
        type_tag: &'static str,
    },

    /// Dispatch targeted a capability the component does not expose
    #[error("Component '{type_tag}' does not support {capability}")]
    MissingCapability {
        /// Type tag of the target component
        type_tag: &'static str,
        /// Capability that was requested
        capability: Capability,
    },

    /// Descriptor could not be decoded into the component's settings
    #[error("Invalid descriptor for '{type_tag}': {source}")]
    InvalidDescriptor {
        /// Type tag of the component being configured
        type_tag: String,
        /// Decoding failure
        #[source]
        source: serde_json::Error,
    },

    /// A `entity.Type` path did not resolve to a component
    #[error("Unresolved component reference '{0}'")]
    UnresolvedReference(String),

    /// A resource could not be read
    #[error("Failed to load '{path}': {source}")]
    ResourceLoad {
        /// Requested path
        path: String,
        /// I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A resource was read but is not valid JSON for the requested type
    #[error("Failed to parse '{path}': {source}")]
    Parse {
        /// Requested path
        path: String,
        /// Parse failure
        #[source]
        source: serde_json::Error,
    },

    /// Failure reported by a component's own behavior
    #[error("{0}")]
    Behavior(String),
}

impl SceneError {
    /// Shorthand for a component-defined failure
    pub fn behavior(message: impl Into<String>) -> Self {
        Self::Behavior(message.into())
    }
}

/// Result alias used throughout the scene layer
pub type SceneResult<T> = Result<T, SceneError>;
