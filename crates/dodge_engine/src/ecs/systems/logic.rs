//! Logic system

use crate::ecs::capability::Capability;
use crate::ecs::system::System;
use crate::foundation::time::Timing;
use crate::scene::error::SceneResult;
use crate::scene::scene_graph::Scene;

/// Calls `update` on every enabled logic component of the active tree
#[derive(Debug, Default)]
pub struct LogicSystem;

impl LogicSystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }
}

impl System for LogicSystem {
    fn name(&self) -> &'static str {
        "Logic"
    }

    fn run(&mut self, scene: &mut Scene, timing: &Timing) -> SceneResult<()> {
        for id in scene.collect_components(Capability::Update) {
            // Destroyed by an earlier update this frame
            if !scene.contains_component(id) {
                continue;
            }
            scene.invoke(id, |component, ctx| match component.as_logic_mut() {
                Some(logic) => logic.update(ctx, timing),
                None => Err(ctx.missing(Capability::Update)),
            })?;
        }
        Ok(())
    }
}
