//! Brick Dash - an endless side-scroller over a procedurally built world.
//! Levels differ only in their difficulty profile; the flag ends a level.

use dash_engine::{
    keys, BodyDesc, ColliderDesc, ColliderMaterial, Countdown, EngineContext, Entity, EntityId, Game, GameConfig,
    GameEvent, InputEvent, InputQueue, Layer,
};
use glam::Vec2;

use crate::enemy::EnemyBrains;
use crate::error::ConfigError;
use crate::player;
use crate::stage::{sprites, Stage, TAG_FLAG};
use crate::world::placement::ObjectCategory;
use crate::world::profile::{DifficultyProfile, LevelTable};
use crate::world::random::SeededRandom;
use crate::world::World;

// View
const VIEW_W: f32 = 1031.0;
const VIEW_H: f32 = 620.0;
const WORLD_W: f32 = 1_000_000.0;
const FOLLOW_LERP: f32 = 0.05;
const GRAVITY: f32 = 500.0;

// Player
const START_LIVES: u32 = 3;
const PLAYER_START: Vec2 = Vec2::new(100.0, 450.0);
const RESPAWN_OFFSET: f32 = 100.0;
const RESPAWN_Y: f32 = 450.0;
/// Below this the player has fallen into a pit
const FALL_LIMIT_Y: f32 = 650.0;

// Respawn: body off for a moment, then fade back in while untouchable
const RECOVERY_HIDDEN_MS: f32 = 100.0;
const RECOVERY_FADE_MS: f32 = 1000.0;
const RECOVERY_ALPHA: f32 = 0.2;

// Enemies
const STARTER_ENEMY: Vec2 = Vec2::new(600.0, 580.0);
/// How far into an enemy the player's feet may be and still count as landing on it
const STOMP_TOLERANCE: f32 = 10.0;
const STOMP_BOUNCE: f32 = 300.0;

const COIN_SCORE: u32 = 10;
const FLAG_SIZE: Vec2 = Vec2::new(70.0, 120.0);

/// Custom event kinds from the page
pub mod commands {
    /// a = level number
    pub const START_LEVEL: u32 = 1;
    pub const RESTART: u32 = 2;
    pub const MENU: u32 = 3;
}

/// Game event kinds to the page
pub mod game_events {
    /// a = total score
    pub const SCORE: f32 = 1.0;
    /// a = lives left
    pub const LIVES: f32 = 2.0;
    /// a = phase code, b = level
    pub const PHASE: f32 = 3.0;
    /// a = level, b = 1 for the cave palette
    pub const LEVEL_STARTED: f32 = 4.0;
    /// a = level, b = total score, c = next level or 0
    pub const LEVEL_COMPLETE: f32 = 5.0;
    /// a = total score
    pub const GAME_OVER: f32 = 6.0;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LevelSelect,
    Playing,
    LevelComplete,
    GameOver,
}

impl Phase {
    fn code(self) -> f32 {
        match self {
            Phase::LevelSelect => 0.0,
            Phase::Playing => 1.0,
            Phase::LevelComplete => 2.0,
            Phase::GameOver => 3.0,
        }
    }
}

/// Opacity during respawn recovery, `elapsed_ms` after the hit.
pub fn recovery_alpha(elapsed_ms: f32) -> f32 {
    let fading = (elapsed_ms - RECOVERY_HIDDEN_MS).max(0.0);
    let t = (fading / RECOVERY_FADE_MS).min(1.0);
    RECOVERY_ALPHA + (1.0 - RECOVERY_ALPHA) * t
}

/// Whether the player is coming down onto the enemy rather than running into it.
pub fn is_stomp(player_bottom: f32, player_vy: f32, enemy_top: f32) -> bool {
    player_vy > 0.0 && player_bottom <= enemy_top + STOMP_TOLERANCE
}

pub struct BrickDash {
    levels: LevelTable,
    profile: DifficultyProfile,
    world: World,
    brains: EnemyBrains,
    ai_rng: SeededRandom,
    phase: Phase,
    level: u32,
    lives: u32,
    score: u32,
    player: Option<EntityId>,
    flag: Option<EntityId>,
    coin_timer: Countdown,
    wave_timer: Countdown,
    /// Milliseconds since the last respawn, while recovering
    recovery: Option<f32>,
}

impl BrickDash {
    pub fn new(seed: u64) -> Self {
        let profile = DifficultyProfile::level_one();
        Self {
            levels: LevelTable::builtin(),
            coin_timer: Countdown::new(profile.coin_interval_ms),
            wave_timer: Countdown::new(profile.wave.interval_ms),
            profile,
            world: World::new(SeededRandom::new(seed)),
            brains: EnemyBrains::new(),
            ai_rng: SeededRandom::new(seed.wrapping_add(1)),
            phase: Phase::LevelSelect,
            level: 1,
            lives: START_LIVES,
            score: 0,
            player: None,
            flag: None,
            recovery: None,
        }
    }

    /// Replace the level table with one parsed from JSON.
    pub fn load_levels(&mut self, json: &str) -> Result<(), ConfigError> {
        let table = LevelTable::from_json(json)?;
        log::info!("Loaded level table with {} levels", table.len());
        self.levels = table;
        Ok(())
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    fn set_phase(&mut self, ctx: &mut EngineContext, phase: Phase) {
        self.phase = phase;
        ctx.emit_event(GameEvent {
            kind: game_events::PHASE,
            a: phase.code(),
            b: self.level as f32,
            c: 0.0,
        });
    }

    /// Tear down whatever is on stage, world objects first so each one is
    /// released through its own teardown.
    fn clear_stage(&mut self, ctx: &mut EngineContext) {
        let mut stage = Stage { ctx: &mut *ctx, brains: &mut self.brains, rng: &mut self.ai_rng };
        self.world.reset_world(&mut stage);
        self.brains.clear();
        ctx.clear_world();
        self.player = None;
        self.flag = None;
        self.recovery = None;
    }

    fn begin(&mut self, ctx: &mut EngineContext, level: u32, keep_score: bool) {
        if let Err(err) = self.start_level(ctx, level, keep_score) {
            log::error!("Cannot start level {}: {}", level, err);
        }
    }

    pub fn start_level(&mut self, ctx: &mut EngineContext, level: u32, keep_score: bool) -> Result<(), ConfigError> {
        self.profile = self.levels.get(level)?.clone();
        self.clear_stage(ctx);

        self.level = level;
        self.lives = START_LIVES;
        if !keep_score {
            self.score = 0;
        }
        ctx.paused = false;
        ctx.camera.scroll_x = 0.0;
        ctx.camera.start_follow();
        self.coin_timer = Countdown::new(self.profile.coin_interval_ms);
        self.wave_timer = Countdown::new(self.profile.wave.interval_ms);

        let ground_y = self.world.tuning().ground_y;
        self.player = Some(player::spawn(ctx, PLAYER_START));
        self.flag = Some(spawn_flag(ctx, Vec2::new(self.profile.finish_x, ground_y)));

        let (view_left, view_width) = (ctx.camera.scroll_x, ctx.camera.width);
        let mut stage = Stage { ctx: &mut *ctx, brains: &mut self.brains, rng: &mut self.ai_rng };
        self.world.spawn_enemy_at(&mut stage, STARTER_ENEMY);
        self.world.ensure_generated(&mut stage, view_left, view_width, &self.profile)?;

        log::info!("Level {} ({}) started", level, self.profile.name);
        ctx.emit_event(GameEvent {
            kind: game_events::LEVEL_STARTED,
            a: level as f32,
            b: if self.profile.dark { 1.0 } else { 0.0 },
            c: 0.0,
        });
        ctx.emit_event(GameEvent::single(game_events::SCORE, self.score as f32));
        ctx.emit_event(GameEvent::single(game_events::LIVES, self.lives as f32));
        self.set_phase(ctx, Phase::Playing);
        Ok(())
    }

    fn to_menu(&mut self, ctx: &mut EngineContext) {
        self.clear_stage(ctx);
        ctx.paused = false;
        self.score = 0;
        self.set_phase(ctx, Phase::LevelSelect);
    }

    fn play(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        let Some(player) = self.player else {
            return;
        };

        self.recover(ctx, player);

        let world = &self.world;
        player::drive(ctx, player, input, |ground| {
            world.category_of(ground) == Some(ObjectCategory::MovingPlatform)
        });
        self.brains.think(ctx, Some(player), &mut self.ai_rng);

        if self.resolve_contacts(ctx, player) {
            return;
        }

        let (view_left, view_width) = (ctx.camera.scroll_x, ctx.camera.width);
        let view_right = ctx.camera.view_right();
        let step_ms = ctx.step_ms;
        let player_x = ctx.scene.get(player).map_or(view_left, |e| e.center().x);

        let mut stage = Stage { ctx: &mut *ctx, brains: &mut self.brains, rng: &mut self.ai_rng };
        if self.coin_timer.tick(step_ms) {
            self.world
                .spawn_falling_coin(&mut stage, view_left, view_width, 0.0, &self.profile);
        }
        if self.wave_timer.tick(step_ms) {
            self.world.spawn_enemy_wave(&mut stage, view_right, &self.profile);
        }
        if let Err(err) = self
            .world
            .ensure_generated(&mut stage, view_left, view_width, &self.profile)
        {
            log::error!("World generation failed: {}", err);
        }
        self.world.sweep_stale_objects(&mut stage, player_x);
        self.world.update_moving_platforms(&mut stage);

        self.check_hazards(ctx, player);
    }

    /// Act on this step's contacts. Returns true when the level ended.
    fn resolve_contacts(&mut self, ctx: &mut EngineContext, player: EntityId) -> bool {
        let touched: Vec<EntityId> = ctx
            .collisions()
            .iter()
            .filter(|c| c.started)
            .filter_map(|c| c.other(player))
            .collect();

        for other in touched {
            if Some(other) == self.flag {
                self.complete_level(ctx, player);
                return true;
            }
            match self.world.category_of(other) {
                Some(ObjectCategory::Coin) => {
                    let mut stage = Stage { ctx: &mut *ctx, brains: &mut self.brains, rng: &mut self.ai_rng };
                    if self.world.on_coin_collected(&mut stage, other) {
                        self.score += COIN_SCORE;
                        ctx.emit_event(GameEvent::single(game_events::SCORE, self.score as f32));
                    }
                }
                Some(ObjectCategory::Enemy) => self.touch_enemy(ctx, player, other),
                _ => {}
            }
            if self.phase != Phase::Playing {
                return true;
            }
        }
        false
    }

    fn touch_enemy(&mut self, ctx: &mut EngineContext, player: EntityId, enemy: EntityId) {
        let Some(enemy_top) = ctx.scene.get(enemy).map(|e| e.pos.y) else {
            return;
        };
        let Some(player_bottom) = ctx.scene.get(player).map(|e| e.bottom()) else {
            return;
        };
        let velocity = ctx.velocity(player).unwrap_or(Vec2::ZERO);

        if is_stomp(player_bottom, velocity.y, enemy_top) {
            let mut stage = Stage { ctx: &mut *ctx, brains: &mut self.brains, rng: &mut self.ai_rng };
            if self.world.on_enemy_killed(&mut stage, enemy) {
                ctx.set_velocity(player, Vec2::new(velocity.x, -STOMP_BOUNCE));
                log::debug!("Stomped {:?}", enemy);
            }
        } else {
            self.damage(ctx, player, "touched an enemy");
        }
    }

    fn check_hazards(&mut self, ctx: &mut EngineContext, player: EntityId) {
        let Some(entity) = ctx.scene.get(player) else {
            return;
        };
        let (bottom, center_x, width) = (entity.bottom(), entity.center().x, entity.size.x);
        if bottom > FALL_LIMIT_Y {
            self.damage(ctx, player, "fell into a pit");
        } else if center_x < ctx.camera.scroll_x - width {
            self.damage(ctx, player, "drifted off the left edge");
        }
    }

    fn damage(&mut self, ctx: &mut EngineContext, player: EntityId, cause: &str) {
        if self.recovery.is_some() {
            return;
        }
        self.lives = self.lives.saturating_sub(1);
        log::warn!("Player {}, {} lives left", cause, self.lives);
        ctx.emit_event(GameEvent::single(game_events::LIVES, self.lives as f32));

        if self.lives == 0 {
            self.game_over(ctx, player);
            return;
        }

        let feet = Vec2::new(ctx.camera.scroll_x + RESPAWN_OFFSET, RESPAWN_Y);
        ctx.teleport(player, player::top_left(feet));
        ctx.set_velocity(player, Vec2::ZERO);
        ctx.set_body_enabled(player, false);
        if let Some(entity) = ctx.scene.get_mut(player) {
            entity.alpha = RECOVERY_ALPHA;
        }
        self.recovery = Some(0.0);
    }

    fn recover(&mut self, ctx: &mut EngineContext, player: EntityId) {
        let Some(elapsed) = self.recovery else {
            return;
        };
        let now = elapsed + ctx.step_ms;
        if elapsed < RECOVERY_HIDDEN_MS && now >= RECOVERY_HIDDEN_MS {
            ctx.set_body_enabled(player, true);
        }
        if let Some(entity) = ctx.scene.get_mut(player) {
            entity.alpha = recovery_alpha(now);
        }
        self.recovery = (now < RECOVERY_HIDDEN_MS + RECOVERY_FADE_MS).then_some(now);
    }

    fn game_over(&mut self, ctx: &mut EngineContext, player: EntityId) {
        ctx.set_body_enabled(player, false);
        ctx.paused = true;
        ctx.camera.stop_follow();
        log::info!("Game over on level {} with {} points", self.level, self.score);
        ctx.emit_event(GameEvent::single(game_events::GAME_OVER, self.score as f32));
        self.set_phase(ctx, Phase::GameOver);
    }

    fn complete_level(&mut self, ctx: &mut EngineContext, player: EntityId) {
        ctx.set_velocity(player, Vec2::ZERO);
        ctx.paused = true;
        ctx.camera.stop_follow();
        let next = self.levels.next_level(self.level);
        log::info!("Level {} complete with {} points", self.level, self.score);
        ctx.emit_event(GameEvent {
            kind: game_events::LEVEL_COMPLETE,
            a: self.level as f32,
            b: self.score as f32,
            c: next.map_or(0.0, |n| n as f32),
        });
        self.set_phase(ctx, Phase::LevelComplete);
    }
}

/// Finish flag planted with its pole on `foot`.
fn spawn_flag(ctx: &mut EngineContext, foot: Vec2) -> EntityId {
    let id = ctx.next_id();
    let entity = Entity::new(id)
        .with_tag(TAG_FLAG)
        .with_rect(Vec2::new(foot.x - FLAG_SIZE.x / 2.0, foot.y - FLAG_SIZE.y), FLAG_SIZE)
        .with_sprite(sprites::FLAG)
        .with_depth(2.0);
    ctx.spawn_with_body(
        entity,
        BodyDesc::fixed(ColliderDesc::rect(FLAG_SIZE)).with_layer(Layer::Trigger).as_sensor(),
        ColliderMaterial::default(),
    )
}

impl Game for BrickDash {
    fn config(&self) -> GameConfig {
        GameConfig {
            fixed_dt: 1.0 / 60.0,
            view_width: VIEW_W,
            view_height: VIEW_H,
            world_width: WORLD_W,
            follow_lerp: FOLLOW_LERP,
            max_instances: 2048,
            max_events: 32,
            gravity: Vec2::new(0.0, GRAVITY),
        }
    }

    fn init(&mut self, ctx: &mut EngineContext) {
        self.set_phase(ctx, Phase::LevelSelect);
    }

    fn update(&mut self, ctx: &mut EngineContext, input: &InputQueue) {
        for event in input.iter() {
            if let InputEvent::Custom { kind, a, .. } = *event {
                match kind {
                    commands::START_LEVEL => self.begin(ctx, a as u32, false),
                    commands::RESTART => self.begin(ctx, self.level, false),
                    commands::MENU => self.to_menu(ctx),
                    _ => log::debug!("Unknown command {}", kind),
                }
            }
        }

        match self.phase {
            Phase::Playing => self.play(ctx, input),
            Phase::LevelComplete => {
                if input.pressed(keys::SPACE) {
                    match self.levels.next_level(self.level) {
                        Some(next) => self.begin(ctx, next, true),
                        None => self.to_menu(ctx),
                    }
                } else if input.pressed(keys::R) {
                    self.to_menu(ctx);
                }
            }
            Phase::GameOver => {
                if input.pressed(keys::R) || input.pressed(keys::SPACE) {
                    self.begin(ctx, self.level, false);
                }
            }
            Phase::LevelSelect => {
                if input.pressed(keys::SPACE) {
                    if let Some(first) = self.levels.first_level() {
                        self.begin(ctx, first, false);
                    }
                }
            }
        }
    }

    fn camera_target(&self, _ctx: &EngineContext) -> Option<EntityId> {
        match self.phase {
            Phase::Playing => self.player,
            _ => None,
        }
    }
}
