//! World objects as engine entities.

use dash_engine::{BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, Layer};
use glam::Vec2;

use crate::enemy::EnemyBrains;
use crate::world::placement::{ObjectCategory, Placement, Spawn};
use crate::world::random::RandomSource;

/// Sprite kinds understood by the page renderer.
pub mod sprites {
    pub const BRICKS: u32 = 0;
    pub const MOVING_PLATFORM: u32 = 1;
    pub const COIN: u32 = 2;
    pub const ENEMY: u32 = 3;
    pub const PLAYER: u32 = 4;
    pub const FLAG: u32 = 5;
}

pub const TAG_PLATFORM: &str = "platform";
pub const TAG_MOVING_PLATFORM: &str = "moving_platform";
pub const TAG_COIN: &str = "coin";
pub const TAG_ENEMY: &str = "enemy";
pub const TAG_PLAYER: &str = "player";
pub const TAG_FLAG: &str = "flag";

const ENEMY_BOUNCE: f32 = 0.4;

/// Borrowed engine state for the duration of one world call.
pub struct Stage<'a> {
    pub ctx: &'a mut EngineContext,
    pub brains: &'a mut EnemyBrains,
    pub rng: &'a mut dyn RandomSource,
}

impl Placement for Stage<'_> {
    fn spawn(&mut self, spawn: &Spawn) -> EntityId {
        let id = self.ctx.next_id();
        let entity = Entity::new(id).with_rect(spawn.pos, spawn.size);
        let shape = ColliderDesc::rect(spawn.size);

        let (entity, desc, material) = match spawn.category {
            ObjectCategory::Platform => (
                entity.with_tag(TAG_PLATFORM).with_sprite(sprites::BRICKS).with_depth(1.0),
                BodyDesc::fixed(shape),
                ColliderMaterial::default(),
            ),
            ObjectCategory::MovingPlatform => (
                entity
                    .with_tag(TAG_MOVING_PLATFORM)
                    .with_sprite(sprites::MOVING_PLATFORM)
                    .with_depth(1.0),
                BodyDesc::kinematic(shape).with_velocity(Vec2::new(spawn.velocity_x, 0.0)),
                ColliderMaterial::default(),
            ),
            ObjectCategory::Coin => (
                entity.with_tag(TAG_COIN).with_sprite(sprites::COIN).with_depth(3.0),
                BodyDesc::dynamic(ColliderDesc::Ball { radius: spawn.size.x / 2.0 })
                    .with_layer(Layer::Pickup)
                    .with_velocity(Vec2::new(spawn.velocity_x, 0.0)),
                ColliderMaterial::bouncy(spawn.bounce),
            ),
            ObjectCategory::Enemy => {
                self.brains.enlist(id, &mut *self.rng);
                (
                    entity.with_tag(TAG_ENEMY).with_sprite(sprites::ENEMY).with_depth(5.0),
                    BodyDesc::dynamic(shape),
                    ColliderMaterial::bouncy(ENEMY_BOUNCE),
                )
            }
        };
        self.ctx.spawn_with_body(entity, desc, material)
    }

    fn detach(&mut self, id: EntityId, _category: ObjectCategory) {
        self.ctx.detach_body(id);
    }

    fn destroy(&mut self, id: EntityId, category: ObjectCategory) {
        if category == ObjectCategory::Enemy {
            self.brains.retire(id);
        }
        self.ctx.despawn(id);
    }

    fn position_x(&self, id: EntityId) -> Option<f32> {
        self.ctx
            .scene
            .get(id)
            .filter(|e| e.body.is_some())
            .map(|e| e.pos.x)
    }

    fn set_velocity_x(&mut self, id: EntityId, vx: f32) -> bool {
        match self.ctx.velocity(id) {
            Some(v) => self.ctx.set_velocity(id, Vec2::new(vx, v.y)),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::random::SeededRandom;

    fn stage_parts() -> (EngineContext, EnemyBrains, SeededRandom) {
        (EngineContext::default(), EnemyBrains::new(), SeededRandom::new(1))
    }

    #[test]
    fn enemies_get_a_brain_until_destroyed() {
        let (mut ctx, mut brains, mut rng) = stage_parts();
        let mut stage = Stage { ctx: &mut ctx, brains: &mut brains, rng: &mut rng };
        let id = stage.spawn(&Spawn::enemy(Vec2::new(600.0, 580.0), 26.0));
        assert!(stage.brains.contains(id));

        stage.destroy(id, ObjectCategory::Enemy);
        assert!(stage.brains.is_empty());
        assert!(!stage.ctx.scene.contains(id));
        assert!(stage.position_x(id).is_none());
    }

    #[test]
    fn detached_objects_report_no_position() {
        let (mut ctx, mut brains, mut rng) = stage_parts();
        let mut stage = Stage { ctx: &mut ctx, brains: &mut brains, rng: &mut rng };
        let id = stage.spawn(&Spawn::platform(Vec2::new(0.0, 580.0), Vec2::new(1200.0, 40.0)));
        assert_eq!(stage.position_x(id), Some(0.0));

        stage.detach(id, ObjectCategory::Platform);
        assert!(stage.position_x(id).is_none());
        assert!(stage.ctx.scene.contains(id));
        stage.destroy(id, ObjectCategory::Platform);
        assert!(stage.ctx.scene.is_empty());
    }

    #[test]
    fn moving_platform_velocity_can_be_flipped() {
        let (mut ctx, mut brains, mut rng) = stage_parts();
        let mut stage = Stage { ctx: &mut ctx, brains: &mut brains, rng: &mut rng };
        let id = stage.spawn(&Spawn::moving_platform(Vec2::new(100.0, 450.0), Vec2::new(150.0, 20.0), 50.0));
        assert_eq!(stage.ctx.velocity(id), Some(Vec2::new(50.0, 0.0)));

        assert!(stage.set_velocity_x(id, -50.0));
        assert_eq!(stage.ctx.velocity(id), Some(Vec2::new(-50.0, 0.0)));
        stage.destroy(id, ObjectCategory::MovingPlatform);
        assert!(!stage.set_velocity_x(id, 50.0));
    }

    #[test]
    fn world_runs_against_the_engine() {
        use crate::world::profile::DifficultyProfile;
        use crate::world::World;

        let (mut ctx, mut brains, mut rng) = stage_parts();
        let mut world = World::new(SeededRandom::new(9));
        let profile = DifficultyProfile::level_two();
        {
            let mut stage = Stage { ctx: &mut ctx, brains: &mut brains, rng: &mut rng };
            world.ensure_generated(&mut stage, 0.0, 800.0, &profile).unwrap();
        }
        assert_eq!(ctx.scene.len(), world.registry().len());
        assert_eq!(ctx.physics.body_count(), world.registry().len());
        assert_eq!(brains.len(), ctx.scene.count_tagged(TAG_ENEMY));

        let mut stage = Stage { ctx: &mut ctx, brains: &mut brains, rng: &mut rng };
        world.reset_world(&mut stage);
        assert!(ctx.scene.is_empty());
        assert_eq!(ctx.physics.body_count(), 0);
        assert!(brains.is_empty());
    }
}
