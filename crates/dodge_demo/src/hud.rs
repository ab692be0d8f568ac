//! Text heads-up display
//!
//! Stands in for a camera: the display pass gathers the numbers, the render
//! pass writes them to the log every few frames.

use dodge_engine::prelude::*;
use log::info;
use serde::Deserialize;

use crate::components;

/// Descriptor of a [`Hud`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HudDesc {
    /// Frames between two log lines
    pub every: u64,
}

impl Default for HudDesc {
    fn default() -> Self {
        Self { every: 60 }
    }
}

/// Status line shown by the [`Hud`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HudLine {
    /// Player lives
    pub lives: u32,
    /// Hearts collected
    pub score: u32,
    /// Hazards currently registered as colliders
    pub chickens: usize,
}

/// Logs a status line
#[derive(Debug, Clone, Default)]
pub struct Hud {
    every: u64,
    frames: u64,
    line: HudLine,
    printed: u64,
}

impl Hud {
    /// Last gathered status
    pub fn line(&self) -> HudLine {
        self.line
    }

    /// Lines written so far
    pub fn printed(&self) -> u64 {
        self.printed
    }
}

impl ComponentType for Hud {
    const TYPE_TAG: &'static str = "Hud";

    fn new(_owner: EntityId) -> Self {
        Self { every: HudDesc::default().every, ..Self::default() }
    }
}

impl Component for Hud {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: HudDesc = parse_desc(Self::TYPE_TAG, desc)?;
        self.every = desc.every.max(1);
        Ok(())
    }

    fn as_display_mut(&mut self) -> Option<&mut dyn DisplayComponent> {
        Some(self)
    }

    fn as_camera_mut(&mut self) -> Option<&mut dyn CameraComponent> {
        Some(self)
    }
}

impl DisplayComponent for Hud {
    fn display(&mut self, ctx: &mut ComponentContext<'_>, _delta_time: f32) -> SceneResult<()> {
        let scene = ctx.scene_ref();
        let (lives, score) = components::player(scene).map_or((0, 0), |player| (player.lives(), player.score()));
        let chickens = scene
            .colliders()
            .entries()
            .iter()
            .filter(|entry| entry.flag.overlaps(CollisionLayers::ENEMY))
            .count();
        self.line = HudLine { lives, score, chickens };
        Ok(())
    }
}

impl CameraComponent for Hud {
    fn render(&mut self, _ctx: &mut ComponentContext<'_>, _delta_time: f32) -> SceneResult<()> {
        if self.frames % self.every == 0 {
            let HudLine { lives, score, chickens } = self.line;
            info!("lives {lives} | hearts {score} | chickens {chickens}");
            self.printed += 1;
        }
        self.frames += 1;
        Ok(())
    }
}
