//! Endless world generation and cleanup.
//!
//! [`World`] owns everything that outlives a single step: the frontier,
//! the registry of live objects, moving-platform patrols and the random
//! source. Engine access goes through [`Placement`].

pub mod eviction;
pub mod placement;
pub mod platforms;
pub mod profile;
pub mod random;
pub mod registry;
pub mod scheduler;
pub mod segment;
pub mod spawner;
pub mod tuning;

use dash_engine::EntityId;
use glam::Vec2;

use crate::error::ConfigError;
use eviction::EvictionSweep;
use placement::{ObjectCategory, Placement};
use platforms::{MovingPlatformDriver, MovingPlatformSpec};
use profile::DifficultyProfile;
use random::{RandomSource, SeededRandom};
use registry::{SpatialObjectRegistry, WorldObjectRecord};
use scheduler::{ChunkScheduler, Frontier};
use spawner::Spawner;
use tuning::WorldTuning;

/// Wave enemies that don't land on the ground get a ledge at this height.
const WAVE_LEDGE_Y: f32 = 460.0;
const WAVE_LEDGE_WIDTH: f32 = 80.0;
/// Gap between consecutive enemies of one wave
const WAVE_SPACING: f32 = 100.0;
/// Waves appear this far past the right edge of the view.
const WAVE_OFFSET: f32 = 50.0;
const FALLING_COIN_BOUNCE: (f32, f32) = (0.4, 0.6);

/// What one call to [`World::generate_ground_segment`] produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentOutput {
    pub frontier: f32,
    pub records: Vec<WorldObjectRecord>,
    pub platforms: Vec<MovingPlatformSpec>,
}

pub struct World<R: RandomSource = SeededRandom> {
    tuning: WorldTuning,
    frontier: Frontier,
    registry: SpatialObjectRegistry,
    driver: MovingPlatformDriver,
    scheduler: ChunkScheduler,
    sweep: EvictionSweep,
    rng: R,
}

impl<R: RandomSource> World<R> {
    pub fn new(rng: R) -> Self {
        Self::build(WorldTuning::default(), rng)
    }

    pub fn with_tuning(tuning: WorldTuning, rng: R) -> Result<Self, ConfigError> {
        tuning.validate()?;
        Ok(Self::build(tuning, rng))
    }

    fn build(tuning: WorldTuning, rng: R) -> Self {
        Self {
            scheduler: ChunkScheduler::new(&tuning),
            sweep: EvictionSweep::new(tuning.cleanup_buffer),
            tuning,
            frontier: Frontier::default(),
            registry: SpatialObjectRegistry::new(),
            driver: MovingPlatformDriver::new(),
            rng,
        }
    }

    pub fn frontier(&self) -> f32 {
        self.frontier.x()
    }

    pub fn tuning(&self) -> &WorldTuning {
        &self.tuning
    }

    pub fn registry(&self) -> &SpatialObjectRegistry {
        &self.registry
    }

    pub fn moving_platforms(&self) -> &[MovingPlatformSpec] {
        self.driver.specs()
    }

    pub fn category_of(&self, handle: EntityId) -> Option<ObjectCategory> {
        self.registry.get(handle).map(|r| r.category)
    }

    /// Extend the world until it reaches `lookahead` past the right edge of
    /// the view. Returns how many chunks were built.
    pub fn ensure_generated<P: Placement>(
        &mut self,
        placement: &mut P,
        view_left: f32,
        view_width: f32,
        profile: &DifficultyProfile,
    ) -> Result<usize, ConfigError> {
        let mut spawner = Spawner::new(placement, &mut self.registry, &mut self.driver, &self.tuning);
        self.scheduler.ensure_generated(
            &mut self.frontier,
            &mut spawner,
            &mut self.rng,
            view_left,
            view_width,
            profile,
        )
    }

    /// Build one ground segment of `length` at the frontier.
    pub fn generate_ground_segment<P: Placement>(
        &mut self,
        placement: &mut P,
        length: f32,
        profile: &DifficultyProfile,
    ) -> Result<SegmentOutput, ConfigError> {
        let mut spawner = Spawner::new(placement, &mut self.registry, &mut self.driver, &self.tuning);
        let end = segment::generate_ground_segment(&mut spawner, &mut self.rng, self.frontier.x(), length, profile)?;
        let (records, platforms) = spawner.finish();
        self.frontier.advance_to(end);
        Ok(SegmentOutput { frontier: end, records, platforms })
    }

    /// Release everything that fell `cleanup_buffer` behind `viewpoint_x`.
    /// Returns how many objects went.
    pub fn sweep_stale_objects<P: Placement>(&mut self, placement: &mut P, viewpoint_x: f32) -> usize {
        let evicted = self.sweep.run(&mut self.registry, placement, viewpoint_x);
        self.forget_platforms(&evicted);
        evicted.len()
    }

    pub fn update_moving_platforms<P: Placement>(&mut self, placement: &mut P) -> usize {
        self.driver.update(placement)
    }

    /// Release a stomped enemy now. Returns false if it was not a live
    /// enemy of this world.
    pub fn on_enemy_killed<P: Placement>(&mut self, placement: &mut P, handle: EntityId) -> bool {
        self.remove_tracked(placement, handle, ObjectCategory::Enemy)
    }

    /// Release a picked-up coin now. Returns false if it was not a live
    /// coin of this world.
    pub fn on_coin_collected<P: Placement>(&mut self, placement: &mut P, handle: EntityId) -> bool {
        self.remove_tracked(placement, handle, ObjectCategory::Coin)
    }

    fn remove_tracked<P: Placement>(&mut self, placement: &mut P, handle: EntityId, expected: ObjectCategory) -> bool {
        match self.category_of(handle) {
            Some(category) if category == expected => self.registry.remove(placement, handle),
            Some(category) => {
                debug_assert!(false, "{:?} is a {:?}, not a {:?}", handle, category, expected);
                false
            }
            None => {
                debug_assert!(false, "{:?} released twice", handle);
                false
            }
        }
    }

    /// Release every object and start over from x = 0.
    pub fn reset_world<P: Placement>(&mut self, placement: &mut P) {
        let released = self.registry.release_all(placement);
        self.driver.clear();
        self.frontier.reset();
        log::debug!("World reset, released {} objects", released);
    }

    /// Drop a bouncing coin somewhere over the visible span.
    pub fn spawn_falling_coin<P: Placement>(
        &mut self,
        placement: &mut P,
        view_left: f32,
        view_width: f32,
        view_top: f32,
        profile: &DifficultyProfile,
    ) -> EntityId {
        let x = self.rng.between(view_left as i32, (view_left + view_width) as i32) as f32;
        let y = view_top + profile.falling_coin_drop.draw(&mut self.rng) as f32;
        let bounce = self.rng.float_between(FALLING_COIN_BOUNCE.0, FALLING_COIN_BOUNCE.1);
        let mut spawner = Spawner::new(placement, &mut self.registry, &mut self.driver, &self.tuning);
        spawner.coin(Vec2::new(x, y), bounce)
    }

    /// Send a wave of enemies in from just past the right edge of the view.
    /// Returns how many enemies were placed.
    pub fn spawn_enemy_wave<P: Placement>(
        &mut self,
        placement: &mut P,
        view_right: f32,
        profile: &DifficultyProfile,
    ) -> usize {
        let spawn_x = view_right + WAVE_OFFSET;
        let count = profile.wave.count.draw(&mut self.rng);
        let ground_y = self.tuning.ground_y;
        let mut spawner = Spawner::new(placement, &mut self.registry, &mut self.driver, &self.tuning);
        for i in 0..count {
            let x = spawn_x + i as f32 * WAVE_SPACING;
            if self.rng.chance(profile.wave.ground_chance) {
                spawner.enemy(Vec2::new(x, ground_y));
            } else {
                spawner.ledge(x - WAVE_LEDGE_WIDTH / 2.0, WAVE_LEDGE_Y, WAVE_LEDGE_WIDTH);
                spawner.enemy(Vec2::new(x, WAVE_LEDGE_Y));
            }
        }
        count.max(0) as usize
    }

    /// Place a single enemy standing at `feet`.
    pub fn spawn_enemy_at<P: Placement>(&mut self, placement: &mut P, feet: Vec2) -> EntityId {
        let mut spawner = Spawner::new(placement, &mut self.registry, &mut self.driver, &self.tuning);
        spawner.enemy(feet)
    }

    fn forget_platforms(&mut self, evicted: &[WorldObjectRecord]) {
        let gone: Vec<EntityId> = evicted
            .iter()
            .filter(|r| r.category == ObjectCategory::MovingPlatform)
            .map(|r| r.handle)
            .collect();
        self.driver.forget(&gone);
    }
}
