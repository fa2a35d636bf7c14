use crate::core::scene::Scene;
use crate::api::types::{EntityId, GameEvent};
use crate::input::queue::InputQueue;
use crate::renderer::camera::FollowCamera;
use crate::renderer::instance::RenderBuffer;
#[cfg(feature = "physics")]
use crate::core::physics::{
    PhysicsWorld, BodyDesc, ColliderMaterial, CollisionPair,
};
#[cfg(feature = "physics")]
use crate::components::entity::Entity;
#[cfg(feature = "physics")]
use glam::Vec2;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// Visible width in game units.
    pub view_width: f32,
    /// Visible height in game units.
    pub view_height: f32,
    /// Horizontal extent of the world; the camera never scrolls past it.
    pub world_width: f32,
    /// Camera follow lerp factor per step (1.0 = snap).
    pub follow_lerp: f32,
    /// Maximum number of render instances (default: 1024).
    pub max_instances: usize,
    /// Maximum number of game events per frame (default: 32).
    pub max_events: usize,
    /// Gravity vector. Y points down, so positive Y pulls toward the ground.
    #[cfg(feature = "physics")]
    pub gravity: glam::Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            view_width: 800.0,
            view_height: 600.0,
            world_width: 100_000.0,
            follow_lerp: 1.0,
            max_instances: 1024,
            max_events: 32,
            #[cfg(feature = "physics")]
            gravity: glam::Vec2::new(0.0, 500.0),
        }
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Setup initial state, spawn entities, configure the scene.
    fn init(&mut self, ctx: &mut EngineContext);

    /// One fixed step. Apply rules, spawn/despawn entities.
    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue);

    /// The entity the camera follows, if any.
    fn camera_target(&self, _ctx: &EngineContext) -> Option<EntityId> {
        None
    }

    /// Optional read-only pass to append custom render instances.
    fn render(&self, _ctx: &EngineContext, _buffer: &mut RenderBuffer) {}
}

/// Mutable access to engine state, passed to Game::init and Game::update.
pub struct EngineContext {
    pub scene: Scene,
    pub camera: FollowCamera,
    pub events: Vec<GameEvent>,
    /// Milliseconds simulated per fixed step.
    pub step_ms: f32,
    /// While set, `step_physics` does nothing.
    pub paused: bool,
    next_id: u32,
    #[cfg(feature = "physics")]
    pub physics: PhysicsWorld,
    #[cfg(feature = "physics")]
    collision_events: Vec<CollisionPair>,
}

impl EngineContext {
    pub fn new(config: &GameConfig) -> Self {
        #[cfg(feature = "physics")]
        let mut physics = PhysicsWorld::new(config.gravity);
        #[cfg(feature = "physics")]
        physics.set_dt(config.fixed_dt);

        let mut camera = FollowCamera::new(config.view_width, config.view_height);
        camera.set_bounds(0.0, config.world_width);
        camera.set_lerp(config.follow_lerp);

        Self {
            scene: Scene::new(),
            camera,
            events: Vec::with_capacity(config.max_events),
            step_ms: config.fixed_dt * 1000.0,
            paused: false,
            next_id: 1,
            #[cfg(feature = "physics")]
            physics,
            #[cfg(feature = "physics")]
            collision_events: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Emit a game event to be forwarded to the UI layer.
    pub fn emit_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data (events, collision events).
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
        #[cfg(feature = "physics")]
        self.collision_events.clear();
    }

    /// Despawn every entity and physics body. Entity IDs keep counting up
    /// so stale handles held by a game never alias new entities.
    pub fn clear_world(&mut self) {
        self.scene.clear();
        #[cfg(feature = "physics")]
        {
            self.physics.clear();
            self.collision_events.clear();
        }
    }

    // -- Physics convenience methods --

    /// Spawn an entity with a physics body centered on the entity's rectangle.
    #[cfg(feature = "physics")]
    pub fn spawn_with_body(
        &mut self,
        entity: Entity,
        desc: BodyDesc,
        material: ColliderMaterial,
    ) -> EntityId {
        let id = entity.id;
        let desc = desc.with_position(entity.center());
        let body = self.physics.create_body(id, &desc, material);
        self.scene.spawn(entity.with_body(body));
        id
    }

    /// Remove an entity's physics body but keep the entity itself.
    /// Returns false if the entity or its body was already gone.
    #[cfg(feature = "physics")]
    pub fn detach_body(&mut self, id: EntityId) -> bool {
        let Some(body) = self.scene.get_mut(id).and_then(|e| e.body.take()) else {
            return false;
        };
        self.physics.remove_body(&body)
    }

    /// Despawn an entity, cleaning up its physics body if present.
    /// Returns false if the entity was already gone.
    #[cfg(feature = "physics")]
    pub fn despawn(&mut self, id: EntityId) -> bool {
        match self.scene.despawn(id) {
            Some(entity) => {
                if let Some(body) = &entity.body {
                    self.physics.remove_body(body);
                }
                true
            }
            None => false,
        }
    }

    /// Set the linear velocity of an entity's body. False if there is none.
    #[cfg(feature = "physics")]
    pub fn set_velocity(&mut self, id: EntityId, vel: Vec2) -> bool {
        match self.scene.get(id).and_then(|e| e.body) {
            Some(body) => self.physics.set_velocity(&body, vel),
            None => false,
        }
    }

    /// Linear velocity of an entity's body, if it still has one.
    #[cfg(feature = "physics")]
    pub fn velocity(&self, id: EntityId) -> Option<Vec2> {
        let body = self.scene.get(id)?.body?;
        self.physics.velocity(&body)
    }

    /// Move an entity (and its body) so its top-left sits at `pos`.
    #[cfg(feature = "physics")]
    pub fn teleport(&mut self, id: EntityId, pos: Vec2) {
        if let Some(entity) = self.scene.get_mut(id) {
            entity.pos = pos;
            let center = entity.center();
            if let Some(body) = entity.body {
                self.physics.teleport(&body, center);
            }
        }
    }

    /// Turn collision and simulation of an entity's body on or off.
    #[cfg(feature = "physics")]
    pub fn set_body_enabled(&mut self, id: EntityId, enabled: bool) {
        if let Some(body) = self.scene.get(id).and_then(|e| e.body) {
            self.physics.set_enabled(&body, enabled);
        }
    }

    /// The entity `id` is standing on, if any.
    #[cfg(feature = "physics")]
    pub fn ground_contact(&self, id: EntityId) -> Option<EntityId> {
        let body = self.scene.get(id)?.body?;
        self.physics.ground_contact(&body)
    }

    /// Get collision events from the most recent physics step.
    #[cfg(feature = "physics")]
    pub fn collisions(&self) -> &[CollisionPair] {
        &self.collision_events
    }

    /// Step the physics simulation and sync positions back to entities.
    /// Called automatically by the game runner after `Game::update()`.
    #[cfg(feature = "physics")]
    pub fn step_physics(&mut self) {
        self.collision_events.clear();
        if self.paused {
            return;
        }
        self.physics.step_into(&mut self.collision_events);

        for entity in self.scene.iter_mut() {
            if let Some(center) = entity.body.and_then(|b| self.physics.body_position(&b)) {
                entity.pos = center - entity.size * 0.5;
            }
        }
    }
}

impl Default for EngineContext {
    fn default() -> Self {
        Self::new(&GameConfig::default())
    }
}
