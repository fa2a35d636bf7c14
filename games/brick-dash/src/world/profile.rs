//! Per-level difficulty knobs.
//!
//! Levels 1 and 2 are built in. A JSON level table can replace them at
//! runtime; any field left out of a JSON profile takes the level 1 value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{check_positive, check_probability, ConfigError};
use crate::world::random::RandomSource;
use crate::world::segment::Feature;

/// Inclusive integer range drawn with [`RandomSource::between`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub min: i32,
    pub max: i32,
}

impl Span {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(value: i32) -> Self {
        Self { min: value, max: value }
    }

    pub fn draw(&self, rng: &mut dyn RandomSource) -> i32 {
        if self.min == self.max {
            self.min
        } else {
            rng.between(self.min, self.max)
        }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::InvertedRange { field, min: self.min, max: self.max });
        }
        if self.min < 0 {
            return Err(ConfigError::NegativeRange { field, min: self.min });
        }
        Ok(())
    }
}

/// Row of coins laid over the ground.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinLayout {
    /// Coins per row
    pub count: Span,
    /// Horizontal distance between coin centers
    pub spacing: Span,
    /// How far above the base coin height the row floats
    pub lift: Span,
}

impl Default for CoinLayout {
    fn default() -> Self {
        Self {
            count: Span::fixed(5),
            spacing: Span::fixed(25),
            lift: Span::fixed(0),
        }
    }
}

/// Timed enemy drops just beyond the right edge of the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyWave {
    pub interval_ms: f32,
    pub count: Span,
    /// Chance each enemy lands on the ground rather than on its own ledge
    pub ground_chance: f32,
}

impl Default for EnemyWave {
    fn default() -> Self {
        Self {
            interval_ms: 3000.0,
            count: Span::fixed(1),
            ground_chance: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyProfile {
    pub name: String,
    /// Cave palette instead of daylight; forwarded to the UI only
    pub dark: bool,
    pub coins: CoinLayout,
    pub floating_enemy_chance: f32,
    /// Cumulative weight closing the moving-platform slot of the feature
    /// roll. At 0.8 the slot is empty.
    pub moving_platform_threshold: f32,
    pub moving_enemy_chance: f32,
    pub platform_speed_multiplier: f32,
    pub ground_enemy_chance: f32,
    pub corridor_enemies: Span,
    /// Chance a plain ground chunk turns into a jump pit
    pub jump_pit_chance: f32,
    pub pit_enemy_chance: f32,
    pub extra_platform_enemy_chance: f32,
    /// Drop height of falling coins, measured down from the top of the view
    pub falling_coin_drop: Span,
    pub coin_interval_ms: f32,
    pub wave: EnemyWave,
    /// X of the finish flag
    pub finish_x: f32,
}

impl DifficultyProfile {
    pub fn level_one() -> Self {
        Self {
            name: "Overworld".to_string(),
            dark: false,
            coins: CoinLayout::default(),
            floating_enemy_chance: 0.25,
            moving_platform_threshold: 0.8,
            moving_enemy_chance: 0.2,
            platform_speed_multiplier: 1.0,
            ground_enemy_chance: 0.3,
            corridor_enemies: Span::fixed(0),
            jump_pit_chance: 0.0,
            pit_enemy_chance: 0.4,
            extra_platform_enemy_chance: 0.3,
            falling_coin_drop: Span::fixed(0),
            coin_interval_ms: 1500.0,
            wave: EnemyWave::default(),
            finish_x: 5000.0,
        }
    }

    pub fn level_two() -> Self {
        Self {
            name: "Caverns".to_string(),
            dark: true,
            coins: CoinLayout {
                count: Span::new(3, 6),
                spacing: Span::new(30, 50),
                lift: Span::new(100, 200),
            },
            moving_platform_threshold: 0.85,
            platform_speed_multiplier: 1.6,
            corridor_enemies: Span::new(0, 1),
            jump_pit_chance: 0.3,
            falling_coin_drop: Span::new(100, 200),
            wave: EnemyWave {
                interval_ms: 4000.0,
                count: Span::new(0, 1),
                ground_chance: 0.7,
            },
            finish_x: 8000.0,
            ..Self::level_one()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("floating_enemy_chance", self.floating_enemy_chance)?;
        check_probability("moving_platform_threshold", self.moving_platform_threshold)?;
        check_probability("moving_enemy_chance", self.moving_enemy_chance)?;
        check_probability("ground_enemy_chance", self.ground_enemy_chance)?;
        check_probability("jump_pit_chance", self.jump_pit_chance)?;
        check_probability("pit_enemy_chance", self.pit_enemy_chance)?;
        check_probability("extra_platform_enemy_chance", self.extra_platform_enemy_chance)?;
        check_probability("wave.ground_chance", self.wave.ground_chance)?;

        check_positive("platform_speed_multiplier", self.platform_speed_multiplier)?;
        check_positive("coin_interval_ms", self.coin_interval_ms)?;
        check_positive("wave.interval_ms", self.wave.interval_ms)?;
        check_positive("finish_x", self.finish_x)?;

        self.coins.count.validate("coins.count")?;
        self.coins.spacing.validate("coins.spacing")?;
        self.coins.lift.validate("coins.lift")?;
        self.corridor_enemies.validate("corridor_enemies")?;
        self.falling_coin_drop.validate("falling_coin_drop")?;
        self.wave.count.validate("wave.count")?;
        Feature::table(self).map(|_| ())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self::level_one()
    }
}

/// Profiles keyed by level number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: BTreeMap<u32, DifficultyProfile>,
}

impl LevelTable {
    pub fn builtin() -> Self {
        let mut levels = BTreeMap::new();
        levels.insert(1, DifficultyProfile::level_one());
        levels.insert(2, DifficultyProfile::level_two());
        Self { levels }
    }

    /// Parse and validate a table shaped like `{"levels": {"1": {...}}}`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.levels.is_empty() {
            return Err(ConfigError::EmptyLevelTable);
        }
        self.levels.values().try_for_each(DifficultyProfile::validate)
    }

    pub fn get(&self, level: u32) -> Result<&DifficultyProfile, ConfigError> {
        self.levels.get(&level).ok_or(ConfigError::UnknownLevel(level))
    }

    pub fn first_level(&self) -> Option<u32> {
        self.levels.keys().next().copied()
    }

    pub fn next_level(&self, level: u32) -> Option<u32> {
        let after = level.checked_add(1)?;
        self.levels.range(after..).next().map(|(k, _)| *k)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self::builtin()
    }
}
