//! System trait

use crate::foundation::time::Timing;
use crate::scene::error::SceneResult;
use crate::scene::scene_graph::Scene;

/// A per-tick pass over the scene
pub trait System {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Run the system for one frame
    fn run(&mut self, scene: &mut Scene, timing: &Timing) -> SceneResult<()>;
}
