use glam::Vec2;
use crate::api::types::EntityId;
#[cfg(feature = "physics")]
use crate::core::physics::PhysicsBody;

/// Fat Entity for side-scrollers: an axis-aligned rectangle with optional physics.
/// Positions are the rectangle's top-left corner in Y-down world space.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by role ("player", "coin", ...).
    pub tag: &'static str,
    /// Whether this entity is active (inactive entities are not rendered).
    pub active: bool,
    /// Top-left corner in world space.
    pub pos: Vec2,
    /// Width and height in world units.
    pub size: Vec2,
    /// Sprite kind forwarded to the renderer; meaning is game-defined.
    pub sprite: u32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// Mirror the sprite horizontally.
    pub flip_x: bool,
    /// Draw order, higher is in front.
    pub depth: f32,
    /// Physics body, present only with the "physics" feature.
    #[cfg(feature = "physics")]
    pub body: Option<PhysicsBody>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: "",
            active: true,
            pos: Vec2::ZERO,
            size: Vec2::ONE,
            sprite: 0,
            alpha: 1.0,
            flip_x: false,
            depth: 0.0,
            #[cfg(feature = "physics")]
            body: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    pub fn with_rect(mut self, pos: Vec2, size: Vec2) -> Self {
        self.pos = pos;
        self.size = size;
        self
    }

    pub fn with_sprite(mut self, sprite: u32) -> Self {
        self.sprite = sprite;
        self
    }

    pub fn with_depth(mut self, depth: f32) -> Self {
        self.depth = depth;
        self
    }

    #[cfg(feature = "physics")]
    pub fn with_body(mut self, body: PhysicsBody) -> Self {
        self.body = Some(body);
        self
    }

    /// Center of the rectangle.
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Right edge (x + width).
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    /// Bottom edge (y + height).
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}
