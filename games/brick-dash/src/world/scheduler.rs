//! Keeps the world built ahead of the view, one chunk at a time.

use glam::Vec2;

use crate::error::ConfigError;
use crate::world::placement::Placement;
use crate::world::profile::DifficultyProfile;
use crate::world::random::{RandomSource, WeightTable};
use crate::world::segment::generate_ground_segment;
use crate::world::spawner::Spawner;
use crate::world::tuning::WorldTuning;

/// Ground kept on the near side of every pit.
const LIP_WIDTH: f32 = 50.0;

const PIT_GAP: (i32, i32) = (120, 160);
const PIT_PLATFORM_Y: (i32, i32) = (490, 540);
const PIT_PLATFORM_WIDTH: f32 = 150.0;
const PIT_PLATFORM_SPEED: f32 = 80.0;

const EXTRA_SEGMENT: (i32, i32) = (400, 800);
const EXTRA_COUNT: (i32, i32) = (1, 3);
const EXTRA_BACKSET: (i32, i32) = (200, 600);
const EXTRA_Y: (i32, i32) = (350, 450);
const EXTRA_WIDTH: (i32, i32) = (120, 200);
const EXTRA_TRAVEL: (i32, i32) = (150, 300);
const EXTRA_SPEED: f32 = 60.0;

const PLAIN_SEGMENT: (i32, i32) = (500, 1200);
const JUMP_PIT: (i32, i32) = (150, 200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkArchetype {
    /// Gap with a moving platform ferrying across it
    Pit,
    /// Medium segment with moving platforms scattered above it
    GroundWithPlatforms,
    PlainGround,
}

/// Rightmost x the world has been built to. Only moves right.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Frontier(f32);

impl Frontier {
    pub fn x(self) -> f32 {
        self.0
    }

    pub fn is_cold(self) -> bool {
        self.0 == 0.0
    }

    pub(crate) fn advance_to(&mut self, x: f32) {
        debug_assert!(x > self.0, "frontier must advance: {} -> {}", self.0, x);
        self.0 = x;
    }

    fn advance_by(&mut self, by: f32) {
        self.advance_to(self.0 + by);
    }

    pub fn reset(&mut self) {
        self.0 = 0.0;
    }
}

pub struct ChunkScheduler {
    lookahead: f32,
    cold_start_length: f32,
    archetypes: WeightTable<ChunkArchetype>,
}

impl ChunkScheduler {
    pub fn new(tuning: &WorldTuning) -> Self {
        Self {
            lookahead: tuning.lookahead,
            cold_start_length: tuning.cold_start_length,
            archetypes: WeightTable::from_cumulative(vec![
                (0.12, ChunkArchetype::Pit),
                (0.35, ChunkArchetype::GroundWithPlatforms),
                (1.0, ChunkArchetype::PlainGround),
            ]),
        }
    }

    pub fn archetypes(&self) -> &WeightTable<ChunkArchetype> {
        &self.archetypes
    }

    /// The frontier is kept at or past this x.
    pub fn trigger(&self, view_left: f32, view_width: f32) -> f32 {
        view_left + view_width + self.lookahead
    }

    /// Build chunks until the frontier passes the trigger. Returns how many
    /// chunks were built; zero when the world is already far enough ahead.
    pub fn ensure_generated<P: Placement>(
        &self,
        frontier: &mut Frontier,
        spawner: &mut Spawner<'_, P>,
        rng: &mut dyn RandomSource,
        view_left: f32,
        view_width: f32,
        profile: &DifficultyProfile,
    ) -> Result<usize, ConfigError> {
        if !(view_left.is_finite() && view_width.is_finite() && view_width > 0.0) {
            return Err(ConfigError::InvalidViewport { left: view_left, width: view_width });
        }
        let trigger = self.trigger(view_left, view_width);
        let mut built = 0;
        while frontier.x() < trigger {
            if frontier.is_cold() {
                let end = generate_ground_segment(spawner, rng, 0.0, self.cold_start_length, profile)?;
                frontier.advance_to(end);
            } else {
                // Rolls past 1.0 cannot happen, but stay total anyway
                let archetype = self.archetypes.draw(rng).unwrap_or(ChunkArchetype::PlainGround);
                log::debug!("Chunk {:?} at x={:.0}", archetype, frontier.x());
                match archetype {
                    ChunkArchetype::Pit => self.pit(frontier, spawner, rng, profile)?,
                    ChunkArchetype::GroundWithPlatforms => {
                        self.ground_with_platforms(frontier, spawner, rng, profile)?
                    }
                    ChunkArchetype::PlainGround => self.plain_ground(frontier, spawner, rng, profile)?,
                }
            }
            built += 1;
        }
        Ok(built)
    }

    fn pit<P: Placement>(
        &self,
        frontier: &mut Frontier,
        spawner: &mut Spawner<'_, P>,
        rng: &mut dyn RandomSource,
        profile: &DifficultyProfile,
    ) -> Result<(), ConfigError> {
        let start = frontier.x();
        let gap = rng.between(PIT_GAP.0, PIT_GAP.1) as f32;
        let y = rng.between(PIT_PLATFORM_Y.0, PIT_PLATFORM_Y.1) as f32;

        spawner.ground(start, LIP_WIDTH);
        let x = start + gap / 2.0;
        spawner.moving_platform(x, y, PIT_PLATFORM_WIDTH, start + LIP_WIDTH, start + gap, PIT_PLATFORM_SPEED)?;
        if rng.chance(profile.pit_enemy_chance) {
            spawner.enemy(Vec2::new(x + PIT_PLATFORM_WIDTH / 2.0, y));
        }

        frontier.advance_by(gap);
        Ok(())
    }

    fn ground_with_platforms<P: Placement>(
        &self,
        frontier: &mut Frontier,
        spawner: &mut Spawner<'_, P>,
        rng: &mut dyn RandomSource,
        profile: &DifficultyProfile,
    ) -> Result<(), ConfigError> {
        let length = rng.between(EXTRA_SEGMENT.0, EXTRA_SEGMENT.1) as f32;
        let end = generate_ground_segment(spawner, rng, frontier.x(), length, profile)?;
        frontier.advance_to(end);

        for _ in 0..rng.between(EXTRA_COUNT.0, EXTRA_COUNT.1) {
            let x = end - rng.between(EXTRA_BACKSET.0, EXTRA_BACKSET.1) as f32;
            let y = rng.between(EXTRA_Y.0, EXTRA_Y.1) as f32;
            let width = rng.between(EXTRA_WIDTH.0, EXTRA_WIDTH.1) as f32;
            let travel = rng.between(EXTRA_TRAVEL.0, EXTRA_TRAVEL.1) as f32;
            spawner.moving_platform(x, y, width, x, x + travel, EXTRA_SPEED)?;
            if rng.chance(profile.extra_platform_enemy_chance) {
                spawner.enemy(Vec2::new(x + width / 2.0, y));
            }
        }
        Ok(())
    }

    fn plain_ground<P: Placement>(
        &self,
        frontier: &mut Frontier,
        spawner: &mut Spawner<'_, P>,
        rng: &mut dyn RandomSource,
        profile: &DifficultyProfile,
    ) -> Result<(), ConfigError> {
        if profile.jump_pit_chance > 0.0 && rng.chance(profile.jump_pit_chance) {
            // No platform: both lips sit inside the pit span
            let start = frontier.x();
            let span = rng.between(JUMP_PIT.0, JUMP_PIT.1) as f32;
            spawner.ground(start, LIP_WIDTH);
            spawner.ground(start + span - LIP_WIDTH, LIP_WIDTH);
            frontier.advance_by(span);
            return Ok(());
        }
        let length = rng.between(PLAIN_SEGMENT.0, PLAIN_SEGMENT.1) as f32;
        let end = generate_ground_segment(spawner, rng, frontier.x(), length, profile)?;
        frontier.advance_to(end);
        Ok(())
    }
}
