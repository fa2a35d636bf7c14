//! The seam between world generation and whatever owns the bodies.

use dash_engine::EntityId;
use glam::Vec2;

/// Kind of world object, which decides how it is torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectCategory {
    Platform,
    Coin,
    Enemy,
    MovingPlatform,
}

impl ObjectCategory {
    /// Categories whose x changes after spawning.
    pub fn moves(self) -> bool {
        !matches!(self, ObjectCategory::Platform)
    }
}

/// Request to create one object. `pos` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawn {
    pub category: ObjectCategory,
    pub pos: Vec2,
    pub size: Vec2,
    pub velocity_x: f32,
    /// Restitution; only coins bounce
    pub bounce: f32,
}

impl Spawn {
    pub fn platform(pos: Vec2, size: Vec2) -> Self {
        Self {
            category: ObjectCategory::Platform,
            pos,
            size,
            velocity_x: 0.0,
            bounce: 0.0,
        }
    }

    pub fn moving_platform(pos: Vec2, size: Vec2, velocity_x: f32) -> Self {
        Self {
            category: ObjectCategory::MovingPlatform,
            velocity_x,
            ..Self::platform(pos, size)
        }
    }

    /// Coin centered on `center`.
    pub fn coin(center: Vec2, size: f32, bounce: f32) -> Self {
        Self {
            category: ObjectCategory::Coin,
            pos: center - Vec2::splat(size * 0.5),
            size: Vec2::splat(size),
            velocity_x: 0.0,
            bounce,
        }
    }

    /// Enemy standing with its feet centered on `feet`.
    pub fn enemy(feet: Vec2, size: f32) -> Self {
        Self {
            category: ObjectCategory::Enemy,
            pos: Vec2::new(feet.x - size * 0.5, feet.y - size),
            size: Vec2::splat(size),
            velocity_x: 0.0,
            bounce: 0.0,
        }
    }
}

/// Creates, moves and releases world objects on behalf of the generator.
///
/// Implementations must tolerate `detach`/`destroy` on handles that no
/// longer exist.
pub trait Placement {
    fn spawn(&mut self, spawn: &Spawn) -> EntityId;

    /// Stop simulating the object without freeing it.
    fn detach(&mut self, id: EntityId, category: ObjectCategory);

    /// Free the object. Destroying an enemy also stops its behavior.
    fn destroy(&mut self, id: EntityId, category: ObjectCategory);

    /// Current left edge, or `None` once the object is gone.
    fn position_x(&self, id: EntityId) -> Option<f32>;

    /// Returns false when the object is gone.
    fn set_velocity_x(&mut self, id: EntityId, vx: f32) -> bool;
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_spawn_stands_on_its_feet() {
        let s = Spawn::enemy(Vec2::new(600.0, 580.0), 26.0);
        assert_eq!(s.pos, Vec2::new(587.0, 554.0));
        assert_eq!(s.pos.y + s.size.y, 580.0);
    }

    #[test]
    fn coin_spawn_is_centered() {
        let s = Spawn::coin(Vec2::new(100.0, 540.0), 16.0, 0.5);
        assert_eq!(s.pos, Vec2::new(92.0, 532.0));
        assert_eq!(s.bounce, 0.5);
    }

    #[test]
    fn only_static_platforms_stay_put() {
        assert!(!ObjectCategory::Platform.moves());
        assert!(ObjectCategory::Coin.moves());
        assert!(ObjectCategory::MovingPlatform.moves());
    }
}
