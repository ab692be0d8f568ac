//! Display system
//!
//! Every enabled display component prepares its state, then every enabled
//! camera renders. Both lists are collected before any call is made.

use crate::ecs::capability::Capability;
use crate::ecs::system::System;
use crate::foundation::time::Timing;
use crate::scene::error::SceneResult;
use crate::scene::scene_graph::Scene;

/// Runs `display` then `render` over the active tree
#[derive(Debug, Default)]
pub struct DisplaySystem;

impl DisplaySystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }
}

impl System for DisplaySystem {
    fn name(&self) -> &'static str {
        "Display"
    }

    fn run(&mut self, scene: &mut Scene, timing: &Timing) -> SceneResult<()> {
        let displays = scene.collect_components(Capability::Display);
        let cameras = scene.collect_components(Capability::Render);
        let delta_time = timing.delta_time;

        for id in displays {
            if !scene.contains_component(id) {
                continue;
            }
            scene.invoke(id, |component, ctx| match component.as_display_mut() {
                Some(display) => display.display(ctx, delta_time),
                None => Err(ctx.missing(Capability::Display)),
            })?;
        }

        for id in cameras {
            if !scene.contains_component(id) {
                continue;
            }
            scene.invoke(id, |component, ctx| match component.as_camera_mut() {
                Some(camera) => camera.render(ctx, delta_time),
                None => Err(ctx.missing(Capability::Render)),
            })?;
        }

        Ok(())
    }
}
