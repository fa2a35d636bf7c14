//! One stretch of ground and what sits on it.

use glam::Vec2;

use crate::error::ConfigError;
use crate::world::placement::Placement;
use crate::world::profile::DifficultyProfile;
use crate::world::random::{RandomSource, WeightTable};
use crate::world::spawner::{Spawner, PLATFORM_HEIGHT};

/// No feature is placed this close to either end of a segment.
const SCAN_MARGIN: f32 = 200.0;
const SCAN_STEP: (i32, i32) = (150, 250);

/// Coin rows float this high when the profile adds no lift.
const COIN_BASE_Y: f32 = 540.0;

const FLOATING_Y: (i32, i32) = (450, 520);
const FLOATING_WIDTH: (i32, i32) = (80, 150);

const MOVING_Y: (i32, i32) = (400, 480);
const MOVING_WIDTH: (i32, i32) = (100, 180);
const MOVING_TRAVEL: (i32, i32) = (100, 200);
const BASE_PLATFORM_SPEED: f32 = 50.0;

const GROUND_ENEMY_INSET: i32 = 300;
const CORRIDOR_ENEMY_INSET: i32 = 200;

/// What a scan point can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    CoinRow,
    FloatingPlatform,
    MovingPlatform,
}

impl Feature {
    /// Coins take half the rolls and floating platforms the next 0.3;
    /// moving platforms get whatever the profile threshold leaves them.
    pub fn table(profile: &DifficultyProfile) -> Result<WeightTable<Feature>, ConfigError> {
        WeightTable::new(vec![
            (0.5, Feature::CoinRow),
            (0.8, Feature::FloatingPlatform),
            (profile.moving_platform_threshold, Feature::MovingPlatform),
        ])
    }
}

/// Build ground over `[start_x, start_x + length)` and decorate it.
/// Returns the new frontier, `start_x + length`.
pub fn generate_ground_segment<P: Placement>(
    spawner: &mut Spawner<'_, P>,
    rng: &mut dyn RandomSource,
    start_x: f32,
    length: f32,
    profile: &DifficultyProfile,
) -> Result<f32, ConfigError> {
    if !(length.is_finite() && length > 0.0) {
        return Err(ConfigError::InvalidSegmentLength(length));
    }
    profile.validate()?;
    let features = Feature::table(profile)?;

    spawner.ground(start_x, length);

    let scan_end = start_x + length - SCAN_MARGIN;
    let mut x = start_x + SCAN_MARGIN;
    while x < scan_end {
        match features.draw(rng) {
            Some(Feature::CoinRow) => coin_row(spawner, rng, x, profile),
            Some(Feature::FloatingPlatform) => floating_platform(spawner, rng, x, profile),
            Some(Feature::MovingPlatform) => moving_platform(spawner, rng, x, profile)?,
            None => {}
        }
        x += rng.between(SCAN_STEP.0, SCAN_STEP.1) as f32;
    }

    let ground_y = spawner.ground_y();
    let span = length as i32;
    if rng.chance(profile.ground_enemy_chance) {
        let ex = start_x + inset_draw(rng, span, GROUND_ENEMY_INSET) as f32;
        spawner.enemy(Vec2::new(ex, ground_y));
    }
    for _ in 0..profile.corridor_enemies.draw(rng) {
        let ex = start_x + inset_draw(rng, span, CORRIDOR_ENEMY_INSET) as f32;
        spawner.enemy(Vec2::new(ex, ground_y));
    }

    Ok(start_x + length)
}

/// Offset in `[inset, span - inset]`. Short spans shrink the inset so the
/// offset never leaves `[0, span]`.
fn inset_draw(rng: &mut dyn RandomSource, span: i32, inset: i32) -> i32 {
    let inset = inset.min(span / 2);
    rng.between(inset, span - inset)
}

fn coin_row<P: Placement>(
    spawner: &mut Spawner<'_, P>,
    rng: &mut dyn RandomSource,
    x: f32,
    profile: &DifficultyProfile,
) {
    let layout = &profile.coins;
    let lift = layout.lift.draw(rng) as f32;
    let spacing = layout.spacing.draw(rng) as f32;
    let count = layout.count.draw(rng);
    for j in 0..count {
        spawner.coin(Vec2::new(x + j as f32 * spacing, COIN_BASE_Y - lift), 0.0);
    }
}

fn floating_platform<P: Placement>(
    spawner: &mut Spawner<'_, P>,
    rng: &mut dyn RandomSource,
    x: f32,
    profile: &DifficultyProfile,
) {
    let y = rng.between(FLOATING_Y.0, FLOATING_Y.1) as f32;
    let width = rng.between(FLOATING_WIDTH.0, FLOATING_WIDTH.1) as f32;
    spawner.ledge(x, y, width);
    if rng.chance(profile.floating_enemy_chance) {
        spawner.enemy(Vec2::new(x + width / 2.0, y));
    }
}

fn moving_platform<P: Placement>(
    spawner: &mut Spawner<'_, P>,
    rng: &mut dyn RandomSource,
    x: f32,
    profile: &DifficultyProfile,
) -> Result<(), ConfigError> {
    let y = rng.between(MOVING_Y.0, MOVING_Y.1) as f32;
    let width = rng.between(MOVING_WIDTH.0, MOVING_WIDTH.1) as f32;
    let travel = rng.between(MOVING_TRAVEL.0, MOVING_TRAVEL.1) as f32;
    let speed = BASE_PLATFORM_SPEED * profile.platform_speed_multiplier;
    spawner.moving_platform(x, y, width, x, x + travel, speed)?;
    if rng.chance(profile.moving_enemy_chance) {
        spawner.enemy(Vec2::new(x + width / 2.0, y));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::placement::testing::MockPlacement;
    use crate::world::placement::ObjectCategory;
    use crate::world::profile::Span;
    use crate::world::platforms::MovingPlatformDriver;
    use crate::world::random::testing::ScriptedRandom;
    use crate::world::random::SeededRandom;
    use crate::world::registry::SpatialObjectRegistry;
    use crate::world::spawner::ENEMY_SIZE;
    use crate::world::tuning::WorldTuning;

    struct Rig {
        placement: MockPlacement,
        registry: SpatialObjectRegistry,
        driver: MovingPlatformDriver,
        tuning: WorldTuning,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                placement: MockPlacement::new(),
                registry: SpatialObjectRegistry::new(),
                driver: MovingPlatformDriver::new(),
                tuning: WorldTuning::default(),
            }
        }

        fn generate(
            &mut self,
            rng: &mut dyn RandomSource,
            start: f32,
            length: f32,
            profile: &DifficultyProfile,
        ) -> Result<f32, ConfigError> {
            let mut spawner = Spawner::new(&mut self.placement, &mut self.registry, &mut self.driver, &self.tuning);
            generate_ground_segment(&mut spawner, rng, start, length, profile)
        }
    }

    #[test]
    fn feature_table_follows_profile_threshold() {
        let one = Feature::table(&DifficultyProfile::level_one()).unwrap();
        let two = Feature::table(&DifficultyProfile::level_two()).unwrap();
        assert_eq!(one.resolve(0.82), None);
        assert_eq!(two.resolve(0.82), Some(Feature::MovingPlatform));
        assert_eq!(two.resolve(0.9), None);
        assert_eq!(one.resolve(0.6), Some(Feature::FloatingPlatform));
    }

    #[test]
    fn bare_segment_is_just_ground() {
        // Every roll fails, every step is as short as possible
        let mut rig = Rig::new();
        let mut rng = ScriptedRandom::new();
        let frontier = rig.generate(&mut rng, 1200.0, 600.0, &DifficultyProfile::level_one()).unwrap();

        assert_eq!(frontier, 1800.0);
        assert_eq!(rig.registry.len(), 1);
        let ground = rig.registry.iter().next().unwrap();
        assert_eq!((ground.x, ground.width), (1200.0, 600.0));
    }

    #[test]
    fn level_one_coin_row() {
        let mut rig = Rig::new();
        // First scan point rolls coins, later ones roll nothing
        let mut rng = ScriptedRandom::new().units(&[0.1]);
        rig.generate(&mut rng, 0.0, 600.0, &DifficultyProfile::level_one()).unwrap();

        let coins = rig.placement.alive_of(ObjectCategory::Coin);
        assert_eq!(coins.len(), 5);
        let centers: Vec<f32> = coins.iter().map(|c| c.spawn.pos.x + c.spawn.size.x / 2.0).collect();
        assert_eq!(centers, vec![200.0, 225.0, 250.0, 275.0, 300.0]);
        assert!(coins.iter().all(|c| c.spawn.pos.y + c.spawn.size.y / 2.0 == 540.0));
    }

    #[test]
    fn level_two_coin_row_is_lifted_and_spread() {
        let mut rig = Rig::new();
        // lift, spacing, count
        let mut rng = ScriptedRandom::new().units(&[0.1]).ints(&[150, 40, 4]);
        rig.generate(&mut rng, 0.0, 600.0, &DifficultyProfile::level_two()).unwrap();

        let coins = rig.placement.alive_of(ObjectCategory::Coin);
        assert_eq!(coins.len(), 4);
        let first = coins[0].spawn;
        assert_eq!(first.pos.y + first.size.y / 2.0, 390.0);
        let second = coins[1].spawn;
        assert_eq!(second.pos.x - first.pos.x, 40.0);
    }

    #[test]
    fn floating_platform_with_rider() {
        let mut rig = Rig::new();
        // feature roll, then enemy roll succeeds
        let mut rng = ScriptedRandom::new().units(&[0.6, 0.1]).ints(&[480, 100]);
        rig.generate(&mut rng, 0.0, 600.0, &DifficultyProfile::level_one()).unwrap();

        let ledges: Vec<_> = rig
            .placement
            .alive_of(ObjectCategory::Platform)
            .into_iter()
            .filter(|p| p.spawn.pos.y < 580.0)
            .collect();
        assert_eq!(ledges.len(), 1);
        assert_eq!(ledges[0].spawn.pos, Vec2::new(200.0, 480.0));
        assert_eq!(ledges[0].spawn.size, Vec2::new(100.0, PLATFORM_HEIGHT));

        let enemies = rig.placement.alive_of(ObjectCategory::Enemy);
        assert_eq!(enemies.len(), 1);
        let e = enemies[0].spawn;
        assert_eq!(e.pos.x + ENEMY_SIZE / 2.0, 250.0);
        assert_eq!(e.pos.y + e.size.y, 480.0);
    }

    #[test]
    fn moving_platform_speed_scales_with_profile() {
        let mut rig = Rig::new();
        let mut rng = ScriptedRandom::new().units(&[0.82]).ints(&[420, 140, 150]);
        rig.generate(&mut rng, 0.0, 600.0, &DifficultyProfile::level_two()).unwrap();

        assert_eq!(rig.driver.specs().len(), 1);
        let spec = rig.driver.specs()[0];
        assert_eq!((spec.move_start, spec.move_end), (200.0, 350.0));
        assert_eq!(spec.speed, 80.0);
        assert_eq!(rig.placement.velocity_of(spec.handle), Some(80.0));
    }

    #[test]
    fn level_one_never_rolls_moving_platforms() {
        let mut rig = Rig::new();
        let mut rng = SeededRandom::new(11);
        let profile = DifficultyProfile::level_one();
        let mut start = 0.0;
        for _ in 0..50 {
            start = rig.generate(&mut rng, start, 1200.0, &profile).unwrap();
        }
        assert_eq!(rig.registry.count(ObjectCategory::MovingPlatform), 0);
        assert!(rig.registry.count(ObjectCategory::Coin) > 0);
    }

    #[test]
    fn ground_enemy_stays_inside_the_segment() {
        let mut rig = Rig::new();
        let mut rng = SeededRandom::new(5);
        let mut profile = DifficultyProfile::level_two();
        profile.ground_enemy_chance = 1.0;
        for i in 0..40 {
            let start = i as f32 * 1000.0;
            rig.generate(&mut rng, start, 1000.0, &profile).unwrap();
        }
        for enemy in rig.placement.alive_of(ObjectCategory::Enemy) {
            let feet = enemy.spawn.pos.y + enemy.spawn.size.y;
            if feet == 580.0 {
                let cx = enemy.spawn.pos.x + ENEMY_SIZE / 2.0;
                let offset = cx.rem_euclid(1000.0);
                assert!((200.0..=800.0).contains(&offset), "enemy at {}", cx);
            }
        }
    }

    #[test]
    fn short_segments_keep_their_enemies() {
        let mut rig = Rig::new();
        let mut rng = SeededRandom::new(8);
        let mut profile = DifficultyProfile::level_two();
        profile.ground_enemy_chance = 1.0;
        profile.corridor_enemies = Span::fixed(1);
        for i in 0..200 {
            rig.generate(&mut rng, i as f32 * 1000.0, 100.0, &profile).unwrap();
        }

        let enemies = rig.placement.alive_of(ObjectCategory::Enemy);
        assert_eq!(enemies.len(), 400);
        let strays = enemies
            .iter()
            .map(|e| e.spawn.pos.x + ENEMY_SIZE / 2.0)
            .filter(|cx| !(0.0..100.0).contains(&cx.rem_euclid(1000.0)))
            .count();
        assert_eq!(strays, 0);
    }

    #[test]
    fn inset_shrinks_to_half_the_span() {
        let mut rng = ScriptedRandom::new().ints(&[-500, 900]);
        assert_eq!(inset_draw(&mut rng, 100, 300), 50);
        assert_eq!(inset_draw(&mut rng, 1000, 300), 700);
    }

    #[test]
    fn bad_length_is_rejected_before_spawning() {
        let mut rig = Rig::new();
        let mut rng = ScriptedRandom::new();
        for length in [0.0, -100.0, f32::NAN, f32::INFINITY] {
            assert!(matches!(
                rig.generate(&mut rng, 0.0, length, &DifficultyProfile::level_one()),
                Err(ConfigError::InvalidSegmentLength(_))
            ));
        }
        assert_eq!(rig.placement.alive(), 0);
    }

    #[test]
    fn malformed_profile_is_rejected() {
        let mut rig = Rig::new();
        let mut rng = ScriptedRandom::new();
        let mut profile = DifficultyProfile::level_one();
        profile.moving_platform_threshold = 0.7;
        assert!(matches!(
            rig.generate(&mut rng, 0.0, 1000.0, &profile),
            Err(ConfigError::UnorderedWeights(_))
        ));
        assert_eq!(rig.placement.alive(), 0);
    }
}
