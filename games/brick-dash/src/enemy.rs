//! Enemy behavior: a random re-decision timer per enemy.

use std::collections::BTreeMap;

use dash_engine::{Countdown, EngineContext, EntityId};
use glam::Vec2;

use crate::world::random::RandomSource;

const WANDER_SPEED: f32 = 50.0;
const CHASE_SPEED: f32 = 80.0;
const CHASE_RANGE: f32 = 350.0;
const JUMP_CHANCE: f32 = 0.4;
const JUMP_SPEED: f32 = 350.0;

const FIRST_DECISION_MS: (i32, i32) = (1000, 2500);
const NEXT_DECISION_MS: (i32, i32) = (800, 2000);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub vx: f32,
    pub jump: bool,
}

/// Wander when the player is far or missing, otherwise chase and
/// sometimes hop.
pub fn decide(enemy: Vec2, player: Option<Vec2>, grounded: bool, rng: &mut dyn RandomSource) -> Decision {
    match player {
        Some(target) if enemy.distance(target) <= CHASE_RANGE => {
            let dx = target.x - enemy.x;
            let direction = if dx > 0.0 {
                1.0
            } else if dx < 0.0 {
                -1.0
            } else {
                0.0
            };
            let jump = rng.chance(JUMP_CHANCE) && grounded;
            Decision { vx: direction * CHASE_SPEED, jump }
        }
        _ => Decision {
            vx: rng.pick_sign() * WANDER_SPEED,
            jump: false,
        },
    }
}

/// Decision timers for every live enemy, keyed by entity.
#[derive(Debug, Default)]
pub struct EnemyBrains {
    timers: BTreeMap<EntityId, Countdown>,
}

impl EnemyBrains {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enlist(&mut self, id: EntityId, rng: &mut dyn RandomSource) {
        let delay = rng.between(FIRST_DECISION_MS.0, FIRST_DECISION_MS.1) as f32;
        self.timers.insert(id, Countdown::new(delay));
    }

    /// Stop thinking for `id`. False if it had no brain.
    pub fn retire(&mut self, id: EntityId) -> bool {
        self.timers.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.timers.contains_key(&id)
    }

    /// Advance every timer by one step and act on the ones that fire.
    /// Sprites face the way they are moving.
    pub fn think(&mut self, ctx: &mut EngineContext, player: Option<EntityId>, rng: &mut dyn RandomSource) {
        let target = player.and_then(|p| ctx.scene.get(p)).map(|e| e.center());
        let step_ms = ctx.step_ms;

        for (&id, timer) in self.timers.iter_mut() {
            if !timer.tick(step_ms) {
                continue;
            }
            let Some(enemy) = ctx.scene.get(id).map(|e| e.center()) else {
                continue;
            };
            let grounded = ctx.ground_contact(id).is_some();
            let decision = decide(enemy, target, grounded, rng);
            if let Some(velocity) = ctx.velocity(id) {
                let vy = if decision.jump { -JUMP_SPEED } else { velocity.y };
                ctx.set_velocity(id, Vec2::new(decision.vx, vy));
            }
            timer.rearm(rng.between(NEXT_DECISION_MS.0, NEXT_DECISION_MS.1) as f32);
        }

        for &id in self.timers.keys() {
            let Some(vx) = ctx.velocity(id).map(|v| v.x) else {
                continue;
            };
            if let Some(entity) = ctx.scene.get_mut(id) {
                if vx > 0.0 {
                    entity.flip_x = false;
                } else if vx < 0.0 {
                    entity.flip_x = true;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::random::testing::ScriptedRandom;

    #[test]
    fn far_player_means_wandering() {
        let mut rng = ScriptedRandom::new().units(&[0.2]);
        let d = decide(Vec2::new(0.0, 0.0), Some(Vec2::new(351.0, 0.0)), true, &mut rng);
        assert_eq!(d, Decision { vx: -WANDER_SPEED, jump: false });
    }

    #[test]
    fn missing_player_means_wandering() {
        let mut rng = ScriptedRandom::new().units(&[0.7]);
        let d = decide(Vec2::ZERO, None, true, &mut rng);
        assert_eq!(d.vx, WANDER_SPEED);
    }

    #[test]
    fn near_player_is_chased() {
        let mut rng = ScriptedRandom::new().units(&[0.9]);
        let d = decide(Vec2::new(500.0, 500.0), Some(Vec2::new(300.0, 500.0)), true, &mut rng);
        assert_eq!(d, Decision { vx: -CHASE_SPEED, jump: false });
    }

    #[test]
    fn chasers_only_jump_from_the_ground() {
        let mut rng = ScriptedRandom::new().units(&[0.1, 0.1]);
        assert!(decide(Vec2::ZERO, Some(Vec2::new(100.0, 0.0)), true, &mut rng).jump);
        assert!(!decide(Vec2::ZERO, Some(Vec2::new(100.0, 0.0)), false, &mut rng).jump);
    }

    #[test]
    fn brains_come_and_go() {
        let mut brains = EnemyBrains::new();
        let mut rng = ScriptedRandom::new().ints(&[1800]);
        brains.enlist(EntityId(4), &mut rng);
        assert!(brains.contains(EntityId(4)));
        assert!(brains.retire(EntityId(4)));
        assert!(!brains.retire(EntityId(4)));
        assert!(brains.is_empty());
    }

    #[test]
    fn first_decision_waits_for_the_timer() {
        use dash_engine::{BodyDesc, ColliderDesc, ColliderMaterial, Entity};

        let mut ctx = EngineContext::default();
        ctx.physics = dash_engine::PhysicsWorld::new(Vec2::ZERO);
        let id = ctx.next_id();
        let size = Vec2::splat(26.0);
        ctx.spawn_with_body(
            Entity::new(id).with_rect(Vec2::new(1000.0, 100.0), size),
            BodyDesc::dynamic(ColliderDesc::rect(size)),
            ColliderMaterial::default(),
        );

        let mut brains = EnemyBrains::new();
        // First delay 1000 ms, then the wander roll goes right
        let mut rng = ScriptedRandom::new().ints(&[1000]).units(&[0.9]);
        brains.enlist(id, &mut rng);

        let steps_before = (1000.0 / ctx.step_ms) as usize - 1;
        for _ in 0..steps_before {
            brains.think(&mut ctx, None, &mut rng);
        }
        assert_eq!(ctx.velocity(id), Some(Vec2::ZERO));

        for _ in 0..3 {
            brains.think(&mut ctx, None, &mut rng);
        }
        assert_eq!(ctx.velocity(id).map(|v| v.x), Some(WANDER_SPEED));
        assert!(!ctx.scene.get(id).unwrap().flip_x);
    }
}
