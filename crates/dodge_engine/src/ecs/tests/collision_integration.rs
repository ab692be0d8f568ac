//! Integration tests for collisions through the full tick pipeline

use crate::ecs::capability::{CollisionHandler, LogicComponent};
use crate::ecs::component::{parse_desc, Component, ComponentContext, ComponentDesc, ComponentType};
use crate::ecs::components::PositionComponent;
use crate::ecs::registry::ComponentRegistry;
use crate::foundation::math::Vec3;
use crate::foundation::time::{ManualTicker, Timing};
use crate::physics::{ColliderHit, CollisionLayers};
use crate::scene::{EntityId, SceneDescription, SceneResult};
use crate::{Engine, EngineConfig};

/// Counts collisions per frame
#[derive(Default)]
struct Bumper {
    hits_this_frame: usize,
    history: Vec<usize>,
    last_flag: CollisionLayers,
}

impl ComponentType for Bumper {
    const TYPE_TAG: &'static str = "Bumper";

    fn new(_owner: EntityId) -> Self {
        Self::default()
    }
}

impl Component for Bumper {
    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }

    fn as_collision_handler_mut(&mut self) -> Option<&mut dyn CollisionHandler> {
        Some(self)
    }
}

impl LogicComponent for Bumper {
    fn update(&mut self, _ctx: &mut ComponentContext<'_>, _timing: &Timing) -> SceneResult<()> {
        // Runs before the sibling collider, so this closes the previous frame
        self.history.push(self.hits_this_frame);
        self.hits_this_frame = 0;
        Ok(())
    }
}

impl CollisionHandler for Bumper {
    fn on_collision(&mut self, _ctx: &mut ComponentContext<'_>, hit: &ColliderHit) -> SceneResult<()> {
        self.hits_this_frame += 1;
        self.last_flag = hit.flag;
        Ok(())
    }
}

#[derive(serde::Deserialize)]
struct DriftDesc {
    dx: f32,
}

/// Moves its entity horizontally every frame
struct Drift {
    dx: f32,
}

impl ComponentType for Drift {
    const TYPE_TAG: &'static str = "Drift";

    fn new(_owner: EntityId) -> Self {
        Self { dx: 0.0 }
    }
}

impl Component for Drift {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: DriftDesc = parse_desc(Self::TYPE_TAG, desc)?;
        self.dx = desc.dx;
        Ok(())
    }

    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Drift {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, _timing: &Timing) -> SceneResult<()> {
        let owner = ctx.owner();
        let scene = ctx.scene();
        if let Some(id) = scene.get_component(owner, PositionComponent::TYPE_TAG) {
            if let Some(position) = scene.component_mut::<PositionComponent>(id) {
                position.translate(Vec3::new(self.dx, 0.0, 0.0));
            }
        }
        Ok(())
    }
}

const SCENE: &str = r#"{
    "player": {
        "components": {
            "Position": { "x": 0, "y": 0 },
            "Bumper": {},
            "Collider": { "flag": 1, "mask": 2, "size": { "w": 10, "h": 10 }, "handler": "Bumper" }
        }
    },
    "chicken": {
        "components": {
            "Position": { "x": 4, "y": 3 },
            "Collider": { "flag": 2, "mask": 1, "size": { "w": 10, "h": 10 } },
            "Drift": { "dx": 4 }
        }
    }
}"#;

fn engine() -> Engine {
    let mut registry = ComponentRegistry::with_builtins();
    registry.register::<Bumper>().register::<Drift>();
    let mut engine = Engine::new(EngineConfig::default(), registry).unwrap();
    engine.load_scene(&SceneDescription::from_json_str(SCENE).unwrap()).unwrap();
    engine
}

fn bumper(engine: &Engine) -> &Bumper {
    let scene = engine.scene();
    let id = scene.find_component("player.Bumper").unwrap();
    scene.component::<Bumper>(id).unwrap()
}

#[test]
fn test_one_collision_per_tick_while_overlapping() {
    let mut engine = engine();
    let mut ticker = ManualTicker::new((0..6).map(|frame| f64::from(frame) * 16.0));
    engine.run(&mut ticker).unwrap();

    // The chicken drifts after the player's collider has tested, so frame k
    // tests against x = 4 + 4k. Boxes overlap while it is under 10 away.
    let bumper = bumper(&engine);
    let mut history = bumper.history.clone();
    history.push(bumper.hits_this_frame);
    assert_eq!(history, vec![0, 1, 1, 0, 0, 0, 0]);
    assert_eq!(bumper.last_flag, CollisionLayers::ENEMY);
}

#[test]
fn test_disabled_collider_is_not_reported() {
    let mut engine = engine();
    engine.tick(0.0).unwrap();

    let scene = engine.scene_mut();
    let chicken = scene.find_component("chicken.Collider").unwrap();
    scene.set_enabled(chicken, false).unwrap();
    let drift = scene.find_component("chicken.Drift").unwrap();
    scene.set_enabled(drift, false).unwrap();

    engine.tick(16.0).unwrap();
    engine.tick(32.0).unwrap();

    let bumper = bumper(&engine);
    assert_eq!(bumper.hits_this_frame, 0);
    assert_eq!(bumper.history.last(), Some(&0));
}
