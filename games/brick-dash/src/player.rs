use dash_engine::{keys, BodyDesc, ColliderDesc, ColliderMaterial, EngineContext, Entity, EntityId, InputQueue};
use glam::Vec2;

use crate::stage::{sprites, TAG_PLAYER};

pub const PLAYER_SIZE: Vec2 = Vec2::new(32.0, 48.0);
const RUN_SPEED: f32 = 200.0;
const JUMP_SPEED: f32 = 400.0;
const BOUNCE: f32 = 0.2;

/// Horizontal intent from the arrow keys. Left wins when both are held.
pub fn run_intent(left: bool, right: bool) -> f32 {
    if left {
        -RUN_SPEED
    } else if right {
        RUN_SPEED
    } else {
        0.0
    }
}

/// Velocity after one step of control. `carry` is the horizontal velocity
/// of whatever the player stands on.
pub fn steer(current: Vec2, run: f32, carry: f32, jump_held: bool, grounded: bool) -> Vec2 {
    let vy = if jump_held && grounded { -JUMP_SPEED } else { current.y };
    Vec2::new(run + carry, vy)
}

/// Spawn the player standing with its feet centered on `feet`.
pub fn spawn(ctx: &mut EngineContext, feet: Vec2) -> EntityId {
    let id = ctx.next_id();
    let entity = Entity::new(id)
        .with_tag(TAG_PLAYER)
        .with_rect(top_left(feet), PLAYER_SIZE)
        .with_sprite(sprites::PLAYER)
        .with_depth(10.0);
    ctx.spawn_with_body(
        entity,
        BodyDesc::dynamic(ColliderDesc::rect(PLAYER_SIZE)),
        ColliderMaterial::bouncy(BOUNCE),
    )
}

pub fn top_left(feet: Vec2) -> Vec2 {
    Vec2::new(feet.x - PLAYER_SIZE.x / 2.0, feet.y - PLAYER_SIZE.y)
}

/// Apply arrow-key control. `carries` tells whether the entity underfoot
/// moves on its own, in which case its velocity is added to the player's.
pub fn drive(ctx: &mut EngineContext, id: EntityId, input: &InputQueue, carries: impl Fn(EntityId) -> bool) {
    let Some(current) = ctx.velocity(id) else {
        return;
    };
    let ground = ctx.ground_contact(id);
    let carry = ground
        .filter(|&g| carries(g))
        .and_then(|g| ctx.velocity(g))
        .map_or(0.0, |v| v.x);
    let run = run_intent(input.is_down(keys::LEFT), input.is_down(keys::RIGHT));
    let velocity = steer(current, run, carry, input.is_down(keys::UP), ground.is_some());
    ctx.set_velocity(id, velocity);
    if let Some(entity) = ctx.scene.get_mut(id) {
        if run < 0.0 {
            entity.flip_x = true;
        } else if run > 0.0 {
            entity.flip_x = false;
        }
    }
}
