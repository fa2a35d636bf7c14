use dash_engine::EntityId;
use glam::Vec2;

use crate::error::ConfigError;
use crate::world::placement::{Placement, Spawn};
use crate::world::platforms::{MovingPlatformDriver, MovingPlatformSpec};
use crate::world::registry::{SpatialObjectRegistry, WorldObjectRecord};
use crate::world::tuning::WorldTuning;

pub const PLATFORM_HEIGHT: f32 = 20.0;
pub const COIN_SIZE: f32 = 16.0;
/// 32px sprite drawn at 0.8 scale
pub const ENEMY_SIZE: f32 = 26.0;

/// Places objects and registers each one before handing back its handle.
pub struct Spawner<'w, P: Placement> {
    placement: &'w mut P,
    registry: &'w mut SpatialObjectRegistry,
    driver: &'w mut MovingPlatformDriver,
    ground_y: f32,
    ground_thickness: f32,
    records: Vec<WorldObjectRecord>,
    platforms: Vec<MovingPlatformSpec>,
}

impl<'w, P: Placement> Spawner<'w, P> {
    pub fn new(
        placement: &'w mut P,
        registry: &'w mut SpatialObjectRegistry,
        driver: &'w mut MovingPlatformDriver,
        tuning: &WorldTuning,
    ) -> Self {
        Self {
            placement,
            registry,
            driver,
            ground_y: tuning.ground_y,
            ground_thickness: tuning.ground_thickness,
            records: Vec::new(),
            platforms: Vec::new(),
        }
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    fn place(&mut self, spawn: Spawn) -> EntityId {
        let handle = self.placement.spawn(&spawn);
        let record = WorldObjectRecord {
            handle,
            category: spawn.category,
            x: spawn.pos.x,
            width: spawn.size.x,
        };
        self.registry.register(record);
        self.records.push(record);
        handle
    }

    /// Ground strip covering `[x, x + width)`.
    pub fn ground(&mut self, x: f32, width: f32) -> EntityId {
        let spawn = Spawn::platform(Vec2::new(x, self.ground_y), Vec2::new(width, self.ground_thickness));
        self.place(spawn)
    }

    /// Static platform with its top-left at `(x, y)`.
    pub fn ledge(&mut self, x: f32, y: f32, width: f32) -> EntityId {
        self.place(Spawn::platform(Vec2::new(x, y), Vec2::new(width, PLATFORM_HEIGHT)))
    }

    pub fn coin(&mut self, center: Vec2, bounce: f32) -> EntityId {
        self.place(Spawn::coin(center, COIN_SIZE, bounce))
    }

    pub fn enemy(&mut self, feet: Vec2) -> EntityId {
        self.place(Spawn::enemy(feet, ENEMY_SIZE))
    }

    /// Platform at `(x, y)` patrolling `[move_start, move_end]`, starting
    /// toward the right at `speed`.
    pub fn moving_platform(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        move_start: f32,
        move_end: f32,
        speed: f32,
    ) -> Result<EntityId, ConfigError> {
        // Validate before anything exists on the engine side
        let mut spec = MovingPlatformSpec::new(EntityId(0), move_start, move_end, speed)?;
        let spawn = Spawn::moving_platform(Vec2::new(x, y), Vec2::new(width, PLATFORM_HEIGHT), speed);
        spec.handle = self.place(spawn);
        self.driver.track(spec);
        self.platforms.push(spec);
        Ok(spec.handle)
    }

    /// Everything created through this spawner, in creation order.
    pub fn finish(self) -> (Vec<WorldObjectRecord>, Vec<MovingPlatformSpec>) {
        (self.records, self.platforms)
    }
}
