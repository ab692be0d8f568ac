//! Enabler component: toggles other components at start and on events

use serde::{Deserialize, Serialize};

use crate::ecs::capability::{EventArg, EventListener};
use crate::ecs::component::{parse_desc, Component, ComponentContext, ComponentDesc, ComponentId, ComponentType};
use crate::events::EventTrigger;
use crate::scene::description::OrderedMap;
use crate::scene::entity::EntityId;
use crate::scene::error::{SceneError, SceneResult};
use crate::scene::scene_graph::ENABLE_METHOD;

/// Descriptor of an [`EnablerComponent`]
///
/// Keys are `entity.Type` paths, values the enabled flag to apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnablerDesc {
    /// Applied during setup
    pub on_start: OrderedMap<bool>,
    /// Applied whenever the enabler receives an event
    pub on_event: OrderedMap<bool>,
}

/// Applies enabled flags to other components
#[derive(Debug, Clone, Default)]
pub struct EnablerComponent {
    event_targets: EventTrigger<ComponentId>,
}

impl EnablerComponent {
    /// Number of components toggled on events
    pub fn event_target_count(&self) -> usize {
        self.event_targets.len()
    }
}

impl ComponentType for EnablerComponent {
    const TYPE_TAG: &'static str = "Enabler";

    fn new(_owner: EntityId) -> Self {
        Self::default()
    }
}

fn resolve(ctx: &ComponentContext<'_>, path: &str) -> SceneResult<ComponentId> {
    ctx.find_component(path).ok_or_else(|| {
        log::error!("Enabler target '{}' not found", path);
        SceneError::UnresolvedReference(path.to_string())
    })
}

impl Component for EnablerComponent {
    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: EnablerDesc = parse_desc(Self::TYPE_TAG, desc)?;

        for (path, enabled) in desc.on_start.iter() {
            let target = resolve(ctx, path)?;
            ctx.scene().set_enabled(target, *enabled)?;
        }

        for (path, enabled) in desc.on_event.iter() {
            let target = resolve(ctx, path)?;
            self.event_targets.add(target, ENABLE_METHOD, None, Some(EventArg::Bool(*enabled)));
        }
        Ok(())
    }

    fn as_event_listener_mut(&mut self) -> Option<&mut dyn EventListener> {
        Some(self)
    }
}

impl EventListener for EnablerComponent {
    fn on_event(&mut self, ctx: &mut ComponentContext<'_>, _method: &str, _args: &[EventArg]) -> SceneResult<()> {
        self.event_targets.trigger(ctx.scene(), &[])
    }
}
