//! Scene manager system: finishes component construction each frame

use log::trace;

use crate::ecs::system::System;
use crate::foundation::time::Timing;
use crate::scene::error::SceneResult;
use crate::scene::scene_graph::Scene;

/// Drains the pending-setup queue before anything else runs
#[derive(Debug, Default)]
pub struct SceneManagerSystem;

impl SceneManagerSystem {
    /// Create the system
    pub fn new() -> Self {
        Self
    }
}

impl System for SceneManagerSystem {
    fn name(&self) -> &'static str {
        "SceneManager"
    }

    fn run(&mut self, scene: &mut Scene, _timing: &Timing) -> SceneResult<()> {
        let waves = scene.refresh()?;
        if waves > 0 {
            trace!("Scene refreshed in {} wave(s)", waves);
        }
        Ok(())
    }
}
