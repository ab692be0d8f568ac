//! Integration tests for scene loading and the two-phase lifecycle
//!
//! Drives full engine ticks rather than calling `refresh` directly.

use std::cell::RefCell;

use serde_json::json;

use crate::ecs::component::{Component, ComponentContext, ComponentDesc, ComponentType, LifecycleState};
use crate::ecs::components::PositionComponent;
use crate::ecs::registry::ComponentRegistry;
use crate::scene::{EntityDescription, EntityId, Scene, SceneDescription, SceneError, SceneResult};
use crate::{Engine, EngineConfig};

thread_local! {
    static EVENTS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

fn record(event: &str) {
    EVENTS.with(|events| events.borrow_mut().push(event.to_string()));
}

fn take_events() -> Vec<String> {
    EVENTS.with(|events| std::mem::take(&mut *events.borrow_mut()))
}

/// Spawns a child carrying a [`Leaf`] during setup
struct Builder;

impl ComponentType for Builder {
    const TYPE_TAG: &'static str = "Builder";

    fn new(_owner: EntityId) -> Self {
        Self
    }
}

impl Component for Builder {
    fn setup(&mut self, ctx: &mut ComponentContext<'_>, _desc: &ComponentDesc) -> SceneResult<()> {
        record("builder setup");
        let leaf = EntityDescription::new()
            .with_component("Position", json!({ "x": 1, "y": 1 }))
            .with_component("Leaf", json!({}));
        let owner = ctx.owner();
        ctx.scene().create_child(&leaf, "leaf", owner)?;
        record("builder setup done");
        Ok(())
    }
}

struct Leaf;

impl ComponentType for Leaf {
    const TYPE_TAG: &'static str = "Leaf";

    fn new(_owner: EntityId) -> Self {
        Self
    }
}

impl Component for Leaf {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, _desc: &ComponentDesc) -> SceneResult<()> {
        record("leaf create");
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, _desc: &ComponentDesc) -> SceneResult<()> {
        // Siblings created in the same wave are visible here
        if ctx.sibling("Position").is_none() {
            return Err(SceneError::behavior("leaf without position"));
        }
        record("leaf setup");
        Ok(())
    }
}

fn engine() -> Engine {
    let mut registry = ComponentRegistry::with_builtins();
    registry.register::<Builder>().register::<Leaf>();
    Engine::new(EngineConfig::default(), registry).unwrap()
}

#[test]
fn test_player_scene_end_to_end() {
    let mut engine = engine();
    let description =
        SceneDescription::from_json_str(r#"{"player":{"components":{"Position":{"x":0,"y":0}}}}"#).unwrap();
    engine.load_scene(&description).unwrap();
    engine.tick(0.0).unwrap();

    let scene = engine.scene();
    let children = scene.children(scene.root());
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].0, "player");

    let position = scene.get_component(children[0].1, "Position").unwrap();
    assert_eq!(scene.lifecycle(position), LifecycleState::Active);
    assert_eq!(scene.pending_setup_count(), 0);
}

#[test]
fn test_single_refresh_reaches_fixed_point() {
    let mut engine = engine();
    let description = SceneDescription::new()
        .with_entity("factory", EntityDescription::new().with_component("Builder", json!({})));
    engine.load_scene(&description).unwrap();
    take_events();

    engine.tick(0.0).unwrap();

    assert_eq!(
        take_events(),
        vec!["builder setup", "leaf create", "builder setup done", "leaf setup"]
    );

    let scene = engine.scene();
    assert_eq!(scene.pending_setup_count(), 0);
    let leaf = scene.find_component("leaf.Leaf").unwrap();
    assert_eq!(scene.lifecycle(leaf), LifecycleState::Active);

    let leaf_entity = scene.find_object("leaf").unwrap();
    let world = PositionComponent::world_position_of(scene, leaf_entity).unwrap();
    assert_eq!((world.x, world.y), (1.0, 1.0));
}

#[test]
fn test_scene_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("level.json");
    std::fs::write(
        &path,
        r#"{
            "world": {
                "components": { "Position": { "x": 100, "y": 50 } },
                "children": {
                    "player": { "components": { "Position": { "x": 5, "y": 5 } } }
                }
            }
        }"#,
    )
    .unwrap();

    let mut engine = engine();
    engine.load_scene_file(&path).unwrap();
    engine.tick(0.0).unwrap();

    let scene = engine.scene();
    let player = scene.find_object("player").unwrap();
    let world = PositionComponent::world_position_of(scene, player).unwrap();
    assert_eq!((world.x, world.y), (105.0, 55.0));
}

#[test]
fn test_child_structure_properties() {
    let mut scene = Scene::new(std::rc::Rc::new(ComponentRegistry::new()));
    let parent = scene.create_entity();
    let stranger = scene.create_entity();
    let children: Vec<_> = (0..4).map(|_| scene.create_entity()).collect();

    for (index, child) in children.iter().enumerate() {
        scene.add_child(parent, &format!("c{index}"), *child).unwrap();
        // A parented entity cannot be added again, under any name
        assert!(matches!(
            scene.add_child(parent, "again", *child),
            Err(SceneError::InvalidOperation(_))
        ));
        assert!(matches!(
            scene.add_child(stranger, "elsewhere", *child),
            Err(SceneError::InvalidOperation(_))
        ));
        assert!(matches!(
            scene.remove_child(stranger, *child),
            Err(SceneError::InvalidOperation(_))
        ));
    }

    let order = |scene: &Scene| -> Vec<EntityId> {
        scene.children(parent).into_iter().map(|(_, child)| child).collect()
    };
    assert_eq!(order(&scene), children);

    // Remove and re-add each child in turn; it always lands last
    for child in &children {
        scene.remove_child(parent, *child).unwrap();
        scene.add_child(parent, "back", *child).unwrap();
        assert_eq!(order(&scene).last(), Some(child));
    }
    assert_eq!(order(&scene), children);
}
