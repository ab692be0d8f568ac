//! Game-specific components
//!
//! The player dodges chickens dropped by a spawner and collects hearts.
//! Nothing reads input: the player steers itself with a random walk.

use dodge_engine::ecs::components::{ColliderComponent, PositionComponent};
use dodge_engine::physics::{ColliderHit, CollisionLayers, Rectangle, RectangleDesc};
use dodge_engine::prelude::*;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;
use serde_json::json;

/// Register every game component type
pub fn register(registry: &mut ComponentRegistry) {
    registry
        .register::<Player>()
        .register::<Chicken>()
        .register::<ChickenSpawner>()
        .register::<Countdown>()
        .register::<crate::hud::Hud>();
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

fn move_owner(ctx: &mut ComponentContext<'_>, offset: Vec3) -> Option<Vec3> {
    let owner = ctx.owner();
    let scene = ctx.scene();
    let id = scene.get_component(owner, PositionComponent::TYPE_TAG)?;
    let position = scene.component_mut::<PositionComponent>(id)?;
    position.translate(offset);
    Some(position.local)
}

/// Descriptor of a [`Player`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerDesc {
    /// Horizontal speed in units per second
    pub speed: f32,
    /// Starting lives
    pub lives: u32,
    /// Area the player may roam, in local coordinates
    pub bounds: RectangleDesc,
    /// Seconds without a collider after being hit
    pub invulnerability: f32,
    /// Per-frame chance of turning around
    pub turn_chance: f64,
    /// Fixed seed for the random walk
    pub seed: Option<u64>,
}

impl Default for PlayerDesc {
    fn default() -> Self {
        Self {
            speed: 30.0,
            lives: 3,
            bounds: RectangleDesc::default(),
            invulnerability: 1.0,
            turn_chance: 0.02,
            seed: None,
        }
    }
}

/// Player character
#[derive(Debug, Clone)]
pub struct Player {
    speed: f32,
    bounds: Rectangle,
    direction: f32,
    invulnerability: f32,
    invulnerable_for: f32,
    turn_chance: f64,
    lives: u32,
    score: u32,
    rng: StdRng,
}

impl Player {
    /// Lives left
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Hearts collected
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Whether the player ran out of lives
    pub fn is_game_over(&self) -> bool {
        self.lives == 0
    }

    /// Whether the player is recovering from a hit
    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_for > 0.0
    }

    fn take_hit(&mut self, ctx: &mut ComponentContext<'_>) -> SceneResult<()> {
        self.lives = self.lives.saturating_sub(1);
        let collider = ctx.sibling(ColliderComponent::TYPE_TAG);

        if self.is_game_over() {
            info!("Game over, final score {}", self.score);
            ctx.set_enabled(false)?;
        } else {
            info!("Player hit, {} lives left", self.lives);
            self.invulnerable_for = self.invulnerability;
        }

        // The collider is mid-update here; the flag flips now, its hook later
        if let Some(collider) = collider {
            ctx.scene().set_enabled(collider, false)?;
        }
        Ok(())
    }

    fn recover(&mut self, ctx: &mut ComponentContext<'_>, delta_time: f32) -> SceneResult<()> {
        if !self.is_invulnerable() {
            return Ok(());
        }
        self.invulnerable_for -= delta_time;
        if !self.is_invulnerable() {
            if let Some(collider) = ctx.sibling(ColliderComponent::TYPE_TAG) {
                ctx.scene().set_enabled(collider, true)?;
            }
        }
        Ok(())
    }
}

impl ComponentType for Player {
    const TYPE_TAG: &'static str = "Player";

    fn new(_owner: EntityId) -> Self {
        let desc = PlayerDesc::default();
        Self {
            speed: desc.speed,
            bounds: Rectangle::default(),
            direction: 1.0,
            invulnerability: desc.invulnerability,
            invulnerable_for: 0.0,
            turn_chance: desc.turn_chance,
            lives: desc.lives,
            score: 0,
            rng: seeded_rng(None),
        }
    }
}

impl Component for Player {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: PlayerDesc = parse_desc(Self::TYPE_TAG, desc)?;
        self.speed = desc.speed;
        self.lives = desc.lives;
        self.bounds = Rectangle::from_desc(&desc.bounds);
        self.invulnerability = desc.invulnerability;
        self.turn_chance = desc.turn_chance.clamp(0.0, 1.0);
        self.rng = seeded_rng(desc.seed);
        Ok(())
    }

    fn on_disabled(&mut self, _ctx: &mut ComponentContext<'_>) {
        debug!("Player stopped");
    }

    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }

    fn as_collision_handler_mut(&mut self) -> Option<&mut dyn CollisionHandler> {
        Some(self)
    }
}

impl LogicComponent for Player {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> SceneResult<()> {
        self.recover(ctx, timing.delta_time)?;

        if self.rng.gen_bool(self.turn_chance) {
            self.direction = -self.direction;
        }

        let step = Vec3::new(self.direction * self.speed * timing.delta_time, 0.0, 0.0);
        let Some(local) = move_owner(ctx, step) else {
            return Ok(());
        };

        // Bounce off the roaming area
        let clamped = clamp(local.x, self.bounds.x_min, self.bounds.x_max);
        if (clamped - local.x).abs() > f32::EPSILON {
            self.direction = if local.x < self.bounds.x_min { 1.0 } else { -1.0 };
            move_owner(ctx, Vec3::new(clamped - local.x, 0.0, 0.0));
        }
        Ok(())
    }
}

impl CollisionHandler for Player {
    fn on_collision(&mut self, ctx: &mut ComponentContext<'_>, hit: &ColliderHit) -> SceneResult<()> {
        if hit.flag.overlaps(CollisionLayers::PICKUP) {
            self.score += 1;
            self.lives += 1;
            info!("Heart collected, score {}", self.score);
            return ctx.scene().destroy_entity(hit.owner);
        }

        if hit.flag.overlaps(CollisionLayers::ENEMY) {
            if self.is_invulnerable() || self.is_game_over() {
                return Ok(());
            }
            self.take_hit(ctx)?;
            return ctx.scene().destroy_entity(hit.owner);
        }

        Ok(())
    }
}

/// Descriptor of a [`Chicken`]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ChickenDesc {
    /// Falling speed in units per second
    pub speed: f32,
    /// Horizontal drift in units per second
    pub drift: f32,
    /// World height below which the chicken is removed
    pub bottom: f32,
}

/// Falling hazard
#[derive(Debug, Clone)]
pub struct Chicken {
    owner: EntityId,
    velocity: Vec3,
    bottom: f32,
}

impl ComponentType for Chicken {
    const TYPE_TAG: &'static str = "Chicken";

    fn new(owner: EntityId) -> Self {
        Self { owner, velocity: Vec3::zeros(), bottom: 0.0 }
    }
}

impl Component for Chicken {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: ChickenDesc = parse_desc(Self::TYPE_TAG, desc)?;
        self.velocity = Vec3::new(desc.drift, -desc.speed, 0.0);
        self.bottom = desc.bottom;
        Ok(())
    }

    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Chicken {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> SceneResult<()> {
        move_owner(ctx, self.velocity * timing.delta_time);

        let Some(world) = PositionComponent::world_position_of(ctx.scene_ref(), self.owner) else {
            return Ok(());
        };
        if world.y < self.bottom {
            debug!("Chicken left the field");
            ctx.scene().destroy_entity(self.owner)?;
        }
        Ok(())
    }
}

/// Descriptor of a [`ChickenSpawner`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ChickenSpawnerDesc {
    /// Seconds between two spawns
    pub interval: f32,
    /// Spawn line: x range and the top edge
    pub area: RectangleDesc,
    /// Entity created for every spawn; its Position is overwritten
    pub template: EntityDescription,
    /// Fixed seed for spawn positions
    pub seed: Option<u64>,
}

impl Default for ChickenSpawnerDesc {
    fn default() -> Self {
        Self {
            interval: 1.0,
            area: RectangleDesc::default(),
            template: EntityDescription::default(),
            seed: None,
        }
    }
}

/// Periodically creates chickens as children of its entity
#[derive(Debug, Clone)]
pub struct ChickenSpawner {
    owner: EntityId,
    interval: f32,
    area: Rectangle,
    template: EntityDescription,
    elapsed: f32,
    spawned: u64,
    rng: StdRng,
}

impl ChickenSpawner {
    /// Chickens spawned so far
    pub fn spawned(&self) -> u64 {
        self.spawned
    }

    fn spawn(&mut self, ctx: &mut ComponentContext<'_>) -> SceneResult<EntityId> {
        let x = if self.area.x_min < self.area.x_max {
            self.rng.gen_range(self.area.x_min..self.area.x_max)
        } else {
            self.area.x_min
        };

        let mut description = self.template.clone();
        description
            .components
            .insert(PositionComponent::TYPE_TAG, json!({ "x": x, "y": self.area.y_max }));

        let name = format!("chicken{}", self.spawned);
        self.spawned += 1;
        let chicken = ctx.scene().create_child(&description, &name, self.owner)?;
        debug!("Spawned {} at x = {:.1}", name, x);
        Ok(chicken)
    }
}

impl ComponentType for ChickenSpawner {
    const TYPE_TAG: &'static str = "ChickenSpawner";

    fn new(owner: EntityId) -> Self {
        Self {
            owner,
            interval: 1.0,
            area: Rectangle::default(),
            template: EntityDescription::default(),
            elapsed: 0.0,
            spawned: 0,
            rng: seeded_rng(None),
        }
    }
}

impl Component for ChickenSpawner {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: ChickenSpawnerDesc = parse_desc(Self::TYPE_TAG, desc)?;
        if !(desc.interval > 0.0) {
            return Err(SceneError::behavior(format!(
                "Spawn interval must be positive, got {}",
                desc.interval
            )));
        }
        self.interval = desc.interval;
        self.area = Rectangle::from_desc(&desc.area);
        self.template = desc.template;
        self.rng = seeded_rng(desc.seed);
        Ok(())
    }

    fn on_enabled(&mut self, _ctx: &mut ComponentContext<'_>) {
        info!("Chickens incoming");
        self.elapsed = 0.0;
    }

    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for ChickenSpawner {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> SceneResult<()> {
        self.elapsed += timing.delta_time;
        while self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            self.spawn(ctx)?;
        }
        Ok(())
    }
}

/// Descriptor of a [`Countdown`]
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CountdownDesc {
    /// Seconds per step
    pub delay: f32,
    /// Number of steps before the handler fires
    pub steps: u32,
    /// Sibling listener as `Type.method`
    pub handler: Option<String>,
}

impl Default for CountdownDesc {
    fn default() -> Self {
        Self { delay: 1.0, steps: 3, handler: None }
    }
}

/// Counts down, fires its handler, then disables itself
#[derive(Debug, Clone)]
pub struct Countdown {
    delay: f32,
    steps: u32,
    index: u32,
    elapsed: f32,
    handler: EventTrigger<ComponentId>,
}

impl Countdown {
    /// Whether the countdown has fired
    pub fn is_done(&self) -> bool {
        self.index >= self.steps
    }
}

impl ComponentType for Countdown {
    const TYPE_TAG: &'static str = "Countdown";

    fn new(_owner: EntityId) -> Self {
        Self {
            delay: 1.0,
            steps: 3,
            index: 0,
            elapsed: 0.0,
            handler: EventTrigger::new(),
        }
    }
}

impl Component for Countdown {
    fn create(&mut self, _ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: CountdownDesc = parse_desc(Self::TYPE_TAG, desc)?;
        self.delay = desc.delay;
        self.steps = desc.steps;
        Ok(())
    }

    fn setup(&mut self, ctx: &mut ComponentContext<'_>, desc: &ComponentDesc) -> SceneResult<()> {
        let desc: CountdownDesc = parse_desc(Self::TYPE_TAG, desc)?;
        let Some(handler) = desc.handler else {
            return Ok(());
        };

        let (type_tag, method) = handler.split_once('.').unwrap_or((handler.as_str(), ""));
        let target = ctx
            .sibling(type_tag)
            .ok_or_else(|| SceneError::UnresolvedReference(handler.clone()))?;
        self.handler.add(target, method, None, None);
        Ok(())
    }

    fn as_logic_mut(&mut self) -> Option<&mut dyn LogicComponent> {
        Some(self)
    }
}

impl LogicComponent for Countdown {
    fn update(&mut self, ctx: &mut ComponentContext<'_>, timing: &Timing) -> SceneResult<()> {
        self.elapsed += timing.delta_time;
        if self.elapsed < self.delay {
            return Ok(());
        }
        self.elapsed = 0.0;
        self.index += 1;

        if self.is_done() {
            info!("Go!");
            self.handler.trigger(ctx.scene(), &[])?;
            ctx.set_enabled(false)?;
        } else {
            info!("{}...", self.steps - self.index);
        }
        Ok(())
    }
}

/// Convenience lookups used by the session loop
pub fn player(scene: &Scene) -> Option<&Player> {
    let id = scene.find_component("player.Player")?;
    scene.component::<Player>(id)
}

/// Spawner component of the default scene
pub fn spawner(scene: &Scene) -> Option<&ChickenSpawner> {
    let id = scene.find_component("spawner.ChickenSpawner")?;
    scene.component::<ChickenSpawner>(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dodge_engine::ecs::components::EnablerComponent;
    use dodge_engine::ecs::systems::LogicSystem;
    use std::rc::Rc;

    fn registry() -> Rc<ComponentRegistry> {
        let mut registry = ComponentRegistry::with_builtins();
        register(&mut registry);
        Rc::new(registry)
    }

    fn field(entities: SceneDescription) -> Scene {
        let mut scene = Scene::create(registry(), &entities).unwrap();
        scene.refresh().unwrap();
        scene
    }

    fn run_logic(scene: &mut Scene, frames: u64, delta_time: f32) {
        let mut logic = LogicSystem;
        for frame in 0..frames {
            scene.refresh().unwrap();
            logic.run(scene, &Timing::new(delta_time, frame)).unwrap();
        }
    }

    fn player_entity(lives: u32) -> EntityDescription {
        EntityDescription::new()
            .with_component("Position", json!({ "x": 0, "y": 0 }))
            .with_component(
                "Player",
                json!({ "speed": 0, "lives": lives, "turnChance": 0, "seed": 1, "invulnerability": 0.5,
                        "bounds": { "xMin": -10, "xMax": 10 } }),
            )
            .with_component("Collider", json!({ "flag": 1, "size": { "w": 4, "h": 4 }, "handler": "Player" }))
    }

    fn hazard(flag: u32, x: f32) -> EntityDescription {
        EntityDescription::new()
            .with_component("Position", json!({ "x": x, "y": 0 }))
            .with_component("Collider", json!({ "flag": flag, "size": { "w": 4, "h": 4 } }))
    }

    #[test]
    fn test_player_loses_life_and_recovers() {
        let mut scene = field(
            SceneDescription::new()
                .with_entity("player", player_entity(3))
                .with_entity("chicken", hazard(2, 1.0)),
        );

        run_logic(&mut scene, 1, 0.1);
        let player_collider = scene.find_component("player.Collider").unwrap();
        assert_eq!(player(&scene).unwrap().lives(), 2);
        assert!(player(&scene).unwrap().is_invulnerable());
        assert!(!scene.is_enabled(player_collider));
        assert!(scene.find_object("chicken").is_none());

        run_logic(&mut scene, 6, 0.1);
        assert!(!player(&scene).unwrap().is_invulnerable());
        assert!(scene.is_enabled(player_collider));
    }

    #[test]
    fn test_heart_adds_score_and_life() {
        let mut scene = field(
            SceneDescription::new()
                .with_entity("player", player_entity(1))
                .with_entity("heart", hazard(4, -1.0)),
        );

        run_logic(&mut scene, 1, 0.1);
        let player = player(&scene).unwrap();
        assert_eq!(player.score(), 1);
        assert_eq!(player.lives(), 2);
        assert!(scene.find_object("heart").is_none());
    }

    #[test]
    fn test_last_life_ends_game() {
        let mut scene = field(
            SceneDescription::new()
                .with_entity("player", player_entity(1))
                .with_entity("chicken", hazard(2, 0.0)),
        );

        run_logic(&mut scene, 1, 0.1);
        let id = scene.find_component("player.Player").unwrap();
        assert!(player(&scene).unwrap().is_game_over());
        assert!(!scene.is_enabled(id));
    }

    #[test]
    fn test_player_stays_in_bounds() {
        let walker = EntityDescription::new()
            .with_component("Position", json!({}))
            .with_component(
                "Player",
                json!({ "speed": 100, "turnChance": 0, "seed": 3, "bounds": { "xMin": -5, "xMax": 5 } }),
            );
        let mut scene = field(SceneDescription::new().with_entity("player", walker));

        for _ in 0..10 {
            run_logic(&mut scene, 1, 0.1);
            let entity = scene.find_object("player").unwrap();
            let x = PositionComponent::world_position_of(&scene, entity).unwrap().x;
            assert!((-5.0..=5.0).contains(&x), "player left its area at x = {x}");
        }
    }

    #[test]
    fn test_chicken_falls_and_leaves() {
        let chicken = EntityDescription::new()
            .with_component("Position", json!({ "x": 0, "y": 10 }))
            .with_component("Chicken", json!({ "speed": 10, "bottom": 0 }));
        let mut scene = field(SceneDescription::new().with_entity("chicken", chicken));

        run_logic(&mut scene, 1, 0.5);
        let entity = scene.find_object("chicken").unwrap();
        let y = PositionComponent::world_position_of(&scene, entity).unwrap().y;
        assert!((y - 5.0).abs() < 1e-5);

        run_logic(&mut scene, 2, 0.6);
        assert!(scene.find_object("chicken").is_none());
    }

    #[test]
    fn test_spawner_creates_chickens_from_template() {
        let description = EntityDescription::new().with_component(
            "ChickenSpawner",
            json!({
                "interval": 0.5,
                "seed": 42,
                "area": { "xMin": -20, "xMax": 20, "yMax": 30 },
                "template": { "components": { "Chicken": { "speed": 0 } } }
            }),
        );
        let mut scene = field(SceneDescription::new().with_entity("spawner", description));

        run_logic(&mut scene, 3, 0.5);
        assert_eq!(spawner(&scene).unwrap().spawned(), 3);

        let parent = scene.find_object("spawner").unwrap();
        let children = scene.children(parent);
        assert_eq!(children.len(), 3);
        for (name, child) in children {
            assert!(name.starts_with("chicken"));
            let world = PositionComponent::world_position_of(&scene, child).unwrap();
            assert!((-20.0..20.0).contains(&world.x));
            assert!((world.y - 30.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_spawner_rejects_zero_interval() {
        let description = EntityDescription::new().with_component("ChickenSpawner", json!({ "interval": 0 }));
        let result = Scene::create(registry(), &SceneDescription::new().with_entity("spawner", description));
        assert!(matches!(result, Err(SceneError::Behavior(_))));
    }

    #[test]
    fn test_countdown_fires_enabler_once() {
        let description = SceneDescription::new()
            .with_entity(
                "spawner",
                EntityDescription::new().with_component(
                    "ChickenSpawner",
                    json!({ "interval": 10, "template": {} }),
                ),
            )
            .with_entity(
                "countdown",
                EntityDescription::new()
                    .with_component("Countdown", json!({ "delay": 1, "steps": 2, "handler": "Enabler.start" }))
                    .with_component(
                        "Enabler",
                        json!({ "onStart": { "spawner.ChickenSpawner": false },
                                "onEvent": { "spawner.ChickenSpawner": true } }),
                    ),
            );
        let mut scene = field(description);
        let spawner_id = scene.find_component("spawner.ChickenSpawner").unwrap();
        let countdown_id = scene.find_component("countdown.Countdown").unwrap();
        assert!(!scene.is_enabled(spawner_id));
        let enabler = scene.find_component("countdown.Enabler").unwrap();
        assert_eq!(scene.component::<EnablerComponent>(enabler).unwrap().event_target_count(), 1);

        run_logic(&mut scene, 1, 1.0);
        assert!(!scene.is_enabled(spawner_id));

        run_logic(&mut scene, 1, 1.0);
        assert!(scene.is_enabled(spawner_id));
        assert!(!scene.is_enabled(countdown_id));
        assert!(scene.component::<Countdown>(countdown_id).unwrap().is_done());
    }

    #[test]
    fn test_countdown_unknown_handler_fails_setup() {
        let description = SceneDescription::new().with_entity(
            "countdown",
            EntityDescription::new().with_component("Countdown", json!({ "handler": "Missing.go" })),
        );
        let mut scene = Scene::create(registry(), &description).unwrap();
        assert!(matches!(scene.refresh(), Err(SceneError::UnresolvedReference(_))));
    }
}
