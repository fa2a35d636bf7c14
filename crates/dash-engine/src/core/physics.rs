use glam::Vec2;
use rapier2d::prelude::*;
use std::sync::Mutex;

use crate::api::types::EntityId;

// ---------------------------------------------------------------------------
// Conversion helpers (private): glam ↔ nalgebra
// ---------------------------------------------------------------------------

fn vec2_to_na(v: Vec2) -> nalgebra::Vector2<f32> {
    nalgebra::Vector2::new(v.x, v.y)
}

fn na_to_vec2(v: &nalgebra::Vector2<f32>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// The kind of rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyType {
    /// Simulated: gravity, contacts, bounce.
    Dynamic,
    /// Static level geometry.
    Fixed,
    /// Moved only by the velocity the game sets (moving platforms).
    Kinematic,
}

impl BodyType {
    fn to_rapier(self) -> RigidBodyType {
        match self {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Fixed => RigidBodyType::Fixed,
            BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
        }
    }
}

/// Collision layer of a collider.
///
/// Every layer reports collision events against every other layer, but
/// contact forces are only resolved against `Terrain`: actors walk through
/// each other and pickups never shove the player around.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Terrain,
    Actor,
    Pickup,
    Trigger,
}

impl Layer {
    fn membership(self) -> Group {
        match self {
            Layer::Terrain => Group::GROUP_1,
            Layer::Actor => Group::GROUP_2,
            Layer::Pickup => Group::GROUP_3,
            Layer::Trigger => Group::GROUP_4,
        }
    }

    fn collision_groups(self) -> InteractionGroups {
        InteractionGroups::new(self.membership(), Group::ALL)
    }

    fn solver_groups(self) -> InteractionGroups {
        let filter = match self {
            Layer::Terrain => Group::ALL,
            Layer::Actor | Layer::Pickup => Group::GROUP_1,
            Layer::Trigger => Group::NONE,
        };
        InteractionGroups::new(self.membership(), filter)
    }
}

/// Shape description for a collider.
#[derive(Debug, Clone, Copy)]
pub enum ColliderDesc {
    Ball { radius: f32 },
    Cuboid { half_width: f32, half_height: f32 },
}

impl ColliderDesc {
    /// Box collider covering a `size`-sized rectangle.
    pub fn rect(size: Vec2) -> Self {
        ColliderDesc::Cuboid {
            half_width: size.x / 2.0,
            half_height: size.y / 2.0,
        }
    }

    fn build_collider(&self) -> ColliderBuilder {
        match *self {
            ColliderDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ColliderDesc::Cuboid { half_width, half_height } => {
                ColliderBuilder::cuboid(half_width, half_height)
            }
        }
    }
}

/// Physical material properties for a collider.
#[derive(Debug, Clone, Copy)]
pub struct ColliderMaterial {
    pub restitution: f32,
    pub friction: f32,
    pub density: f32,
}

impl ColliderMaterial {
    pub fn bouncy(restitution: f32) -> Self {
        Self {
            restitution,
            ..Self::default()
        }
    }
}

impl Default for ColliderMaterial {
    fn default() -> Self {
        Self {
            restitution: 0.0,
            friction: 0.0,
            density: 1.0,
        }
    }
}

/// Builder for describing a rigid body before creation.
#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub body_type: BodyType,
    /// Center of the body in world space.
    pub position: Vec2,
    pub velocity: Vec2,
    pub gravity_scale: f32,
    pub fixed_rotation: bool,
    pub collider: ColliderDesc,
    pub layer: Layer,
    pub sensor: bool,
}

impl BodyDesc {
    /// Create a dynamic body description with the given collider shape.
    /// Platformer actors never tumble, so rotation starts locked.
    pub fn dynamic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Dynamic,
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            gravity_scale: 1.0,
            fixed_rotation: true,
            collider,
            layer: Layer::Actor,
            sensor: false,
        }
    }

    /// Create a fixed (static) terrain body.
    pub fn fixed(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Fixed,
            gravity_scale: 0.0,
            layer: Layer::Terrain,
            ..Self::dynamic(collider)
        }
    }

    /// Create a velocity-driven kinematic terrain body.
    pub fn kinematic(collider: ColliderDesc) -> Self {
        Self {
            body_type: BodyType::Kinematic,
            ..Self::fixed(collider)
        }
    }

    pub fn with_position(mut self, pos: Vec2) -> Self {
        self.position = pos;
        self
    }

    pub fn with_velocity(mut self, vel: Vec2) -> Self {
        self.velocity = vel;
        self
    }

    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    /// Sensors report overlaps but never produce contact forces.
    pub fn as_sensor(mut self) -> Self {
        self.sensor = true;
        self
    }
}

/// Handle pair stored on an Entity, referencing Rapier internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsBody {
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

/// A collision event between two entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionPair {
    pub entity_a: EntityId,
    pub entity_b: EntityId,
    /// `true` when the collision just started, `false` when it ended.
    pub started: bool,
}

impl CollisionPair {
    /// If `id` takes part in this collision, return the other entity.
    pub fn other(&self, id: EntityId) -> Option<EntityId> {
        if self.entity_a == id {
            Some(self.entity_b)
        } else if self.entity_b == id {
            Some(self.entity_a)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// WASM-safe event collector (no crossbeam)
// ---------------------------------------------------------------------------

struct DirectEventCollector {
    collisions: Mutex<Vec<CollisionEvent>>,
}

impl DirectEventCollector {
    fn new() -> Self {
        Self {
            collisions: Mutex::new(Vec::new()),
        }
    }

    fn drain_collisions(&self) -> Vec<CollisionEvent> {
        match self.collisions.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl EventHandler for DirectEventCollector {
    fn handle_collision_event(
        &self,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        event: CollisionEvent,
        _contact_pair: Option<&ContactPair>,
    ) {
        if let Ok(mut events) = self.collisions.lock() {
            events.push(event);
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: f32,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: f32,
    ) {
    }
}

// ---------------------------------------------------------------------------
// PhysicsWorld
// ---------------------------------------------------------------------------

/// Minimum downward component of a contact normal for it to count as floor.
const GROUND_NORMAL_MIN_Y: f32 = 0.7;

/// Wraps all Rapier2D boilerplate into a single struct.
pub struct PhysicsWorld {
    gravity: nalgebra::Vector2<f32>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,
    event_collector: DirectEventCollector,
}

impl PhysicsWorld {
    /// Create a new physics world with the given gravity vector.
    /// Y points down, so positive Y gravity pulls things toward the ground.
    pub fn new(gravity: Vec2) -> Self {
        Self {
            gravity: vec2_to_na(gravity),
            integration_parameters: IntegrationParameters::default(),
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            event_collector: DirectEventCollector::new(),
        }
    }

    /// Set the integration timestep.
    pub fn set_dt(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
    }

    /// Create a rigid body + collider and return handles.
    /// The EntityId is stored in the body's `user_data` for collision lookups.
    pub fn create_body(
        &mut self,
        entity_id: EntityId,
        desc: &BodyDesc,
        material: ColliderMaterial,
    ) -> PhysicsBody {
        let rb = RigidBodyBuilder::new(desc.body_type.to_rapier())
            .translation(vec2_to_na(desc.position))
            .linvel(vec2_to_na(desc.velocity))
            .gravity_scale(desc.gravity_scale)
            .locked_axes(if desc.fixed_rotation {
                LockedAxes::ROTATION_LOCKED
            } else {
                LockedAxes::empty()
            })
            .user_data(entity_id.0 as u128)
            .build();

        let body_handle = self.bodies.insert(rb);

        let collider = desc
            .collider
            .build_collider()
            .restitution(material.restitution)
            .friction(material.friction)
            .density(material.density)
            .sensor(desc.sensor)
            .collision_groups(desc.layer.collision_groups())
            .solver_groups(desc.layer.solver_groups())
            .active_events(ActiveEvents::COLLISION_EVENTS)
            .build();

        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);

        PhysicsBody {
            body_handle,
            collider_handle,
        }
    }

    /// Remove a body and its collider. Returns false if it was already gone.
    pub fn remove_body(&mut self, body: &PhysicsBody) -> bool {
        self.bodies
            .remove(
                body.body_handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Remove every body from the simulation.
    pub fn clear(&mut self) {
        let handles: Vec<RigidBodyHandle> = self.bodies.iter().map(|(h, _)| h).collect();
        for handle in handles {
            self.bodies.remove(
                handle,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            );
        }
    }

    /// Step the simulation and collect collision events into the provided Vec.
    pub fn step_into(&mut self, collision_events: &mut Vec<CollisionPair>) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &self.event_collector,
        );

        for event in self.event_collector.drain_collisions() {
            let (h1, h2, started) = match event {
                CollisionEvent::Started(h1, h2, _) => (h1, h2, true),
                CollisionEvent::Stopped(h1, h2, _) => (h1, h2, false),
            };

            // Colliders removed mid-step resolve to nothing and are dropped.
            if let (Some(a), Some(b)) = (self.collider_to_entity(h1), self.collider_to_entity(h2)) {
                collision_events.push(CollisionPair {
                    entity_a: a,
                    entity_b: b,
                    started,
                });
            }
        }
    }

    /// Set the linear velocity of a body. Returns false if the body is gone.
    pub fn set_velocity(&mut self, body: &PhysicsBody, vel: Vec2) -> bool {
        match self.bodies.get_mut(body.body_handle) {
            Some(rb) => {
                rb.set_linvel(vec2_to_na(vel), true);
                true
            }
            None => false,
        }
    }

    /// Current linear velocity, or `None` if the body is gone.
    pub fn velocity(&self, body: &PhysicsBody) -> Option<Vec2> {
        self.bodies.get(body.body_handle).map(|rb| na_to_vec2(rb.linvel()))
    }

    /// Teleport a body so its center sits at `pos`, zeroing its velocity.
    pub fn teleport(&mut self, body: &PhysicsBody, pos: Vec2) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_translation(vec2_to_na(pos), true);
            rb.set_linvel(nalgebra::Vector2::zeros(), true);
        }
    }

    /// Enable or disable a body's participation in the simulation.
    pub fn set_enabled(&mut self, body: &PhysicsBody, enabled: bool) {
        if let Some(rb) = self.bodies.get_mut(body.body_handle) {
            rb.set_enabled(enabled);
        }
    }

    /// Center of a body, or `None` if the body is gone.
    pub fn body_position(&self, body: &PhysicsBody) -> Option<Vec2> {
        self.bodies.get(body.body_handle).map(|rb| na_to_vec2(rb.translation()))
    }

    pub fn contains(&self, body: &PhysicsBody) -> bool {
        self.bodies.contains(body.body_handle)
    }

    /// Number of rigid bodies in the simulation.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// The entity `body` is standing on, if any.
    ///
    /// Only contacts the solver resolves count, so an actor standing "on"
    /// another actor it merely overlaps is not grounded.
    pub fn ground_contact(&self, body: &PhysicsBody) -> Option<EntityId> {
        let own = self.colliders.get(body.collider_handle)?;
        for pair in self.narrow_phase.contact_pairs_with(body.collider_handle) {
            if !pair.has_any_active_contact {
                continue;
            }
            let (other_handle, sign) = if pair.collider1 == body.collider_handle {
                (pair.collider2, 1.0)
            } else {
                (pair.collider1, -1.0)
            };
            let Some(other) = self.colliders.get(other_handle) else {
                continue;
            };
            if !own.solver_groups().test(other.solver_groups()) {
                continue;
            }
            let on_top = pair
                .manifolds
                .iter()
                .any(|m| !m.points.is_empty() && m.data.normal.y * sign > GROUND_NORMAL_MIN_Y);
            if on_top {
                return self.collider_to_entity(other_handle);
            }
        }
        None
    }

    // -- private helpers --

    fn collider_to_entity(&self, collider_handle: ColliderHandle) -> Option<EntityId> {
        let collider = self.colliders.get(collider_handle)?;
        let body_handle = collider.parent()?;
        let body = self.bodies.get(body_handle)?;
        Some(EntityId(body.user_data as u32))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn ground(world: &mut PhysicsWorld, id: u32) -> PhysicsBody {
        world.create_body(
            EntityId(id),
            &BodyDesc::fixed(ColliderDesc::rect(Vec2::new(1000.0, 40.0)))
                .with_position(Vec2::new(500.0, 600.0)),
            ColliderMaterial::default(),
        )
    }

    fn settle(world: &mut PhysicsWorld, steps: usize) -> Vec<CollisionPair> {
        let mut events = Vec::new();
        for _ in 0..steps {
            world.step_into(&mut events);
        }
        events
    }

    #[test]
    fn create_and_remove_body() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        let body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::Ball { radius: 10.0 }),
            ColliderMaterial::default(),
        );
        assert_eq!(world.body_count(), 1);
        assert!(world.remove_body(&body));
        assert_eq!(world.body_count(), 0);
        assert!(!world.remove_body(&body), "second removal reports absence");
        assert!(world.body_position(&body).is_none());
        assert!(!world.set_velocity(&body, Vec2::X));
    }

    #[test]
    fn gravity_pulls_dynamic_bodies_down() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 500.0));
        world.set_dt(1.0 / 60.0);
        let body = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::rect(Vec2::splat(20.0))),
            ColliderMaterial::default(),
        );
        settle(&mut world, 10);
        let pos = world.body_position(&body).unwrap();
        assert!(pos.y > 0.0, "body should fall: y={}", pos.y);
    }

    #[test]
    fn kinematic_platform_ignores_gravity_and_keeps_velocity() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 500.0));
        world.set_dt(1.0 / 60.0);
        let platform = world.create_body(
            EntityId(1),
            &BodyDesc::kinematic(ColliderDesc::rect(Vec2::new(150.0, 20.0)))
                .with_position(Vec2::new(100.0, 500.0))
                .with_velocity(Vec2::new(60.0, 0.0)),
            ColliderMaterial::default(),
        );
        settle(&mut world, 60);
        let pos = world.body_position(&platform).unwrap();
        assert!((pos.y - 500.0).abs() < 0.001, "no vertical drift: y={}", pos.y);
        assert!((pos.x - 160.0).abs() < 1.0, "moved one second at 60/s: x={}", pos.x);
    }

    #[test]
    fn actor_lands_on_terrain_and_is_grounded() {
        let mut world = PhysicsWorld::new(Vec2::new(0.0, 500.0));
        world.set_dt(1.0 / 60.0);
        ground(&mut world, 1);
        let actor = world.create_body(
            EntityId(2),
            &BodyDesc::dynamic(ColliderDesc::rect(Vec2::new(30.0, 40.0)))
                .with_position(Vec2::new(200.0, 540.0)),
            ColliderMaterial::default(),
        );
        settle(&mut world, 120);
        assert_eq!(world.ground_contact(&actor), Some(EntityId(1)));
        let pos = world.body_position(&actor).unwrap();
        assert!(pos.y < 581.0, "actor rests on top of the ground: y={}", pos.y);
    }

    #[test]
    fn actors_overlap_without_pushing_but_report_events() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);
        let a = world.create_body(
            EntityId(1),
            &BodyDesc::dynamic(ColliderDesc::rect(Vec2::splat(20.0)))
                .with_position(Vec2::new(0.0, 0.0))
                .with_velocity(Vec2::new(120.0, 0.0)),
            ColliderMaterial::default(),
        );
        world.create_body(
            EntityId(2),
            &BodyDesc::dynamic(ColliderDesc::rect(Vec2::splat(20.0)))
                .with_position(Vec2::new(40.0, 0.0)),
            ColliderMaterial::default(),
        );
        let events = settle(&mut world, 60);
        assert!(events.iter().any(|e| e.started && e.other(EntityId(1)) == Some(EntityId(2))));
        let vel = world.velocity(&a).unwrap();
        assert!((vel.x - 120.0).abs() < 0.01, "no contact force between actors: {:?}", vel);
    }

    #[test]
    fn sensor_reports_overlap() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        world.set_dt(1.0 / 60.0);
        world.create_body(
            EntityId(1),
            &BodyDesc::fixed(ColliderDesc::rect(Vec2::new(70.0, 120.0)))
                .with_layer(Layer::Trigger)
                .as_sensor()
                .with_position(Vec2::new(100.0, 0.0)),
            ColliderMaterial::default(),
        );
        world.create_body(
            EntityId(2),
            &BodyDesc::dynamic(ColliderDesc::rect(Vec2::splat(20.0)))
                .with_velocity(Vec2::new(200.0, 0.0)),
            ColliderMaterial::default(),
        );
        let events = settle(&mut world, 60);
        assert!(events.iter().any(|e| e.started && e.other(EntityId(2)) == Some(EntityId(1))));
    }

    #[test]
    fn clear_removes_everything() {
        let mut world = PhysicsWorld::new(Vec2::ZERO);
        ground(&mut world, 1);
        ground(&mut world, 2);
        world.clear();
        assert_eq!(world.body_count(), 0);
    }

    #[test]
    fn collision_pair_other() {
        let pair = CollisionPair { entity_a: EntityId(1), entity_b: EntityId(2), started: true };
        assert_eq!(pair.other(EntityId(2)), Some(EntityId(1)));
        assert_eq!(pair.other(EntityId(3)), None);
    }
}
