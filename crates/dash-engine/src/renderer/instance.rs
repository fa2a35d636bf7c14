use bytemuck::{Pod, Zeroable};

use crate::components::entity::Entity;

/// Per-instance render data read by the browser renderer.
/// Must match the TypeScript protocol: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct RenderInstance {
    /// Top-left x in world space.
    pub x: f32,
    /// Top-left y in world space.
    pub y: f32,
    /// Width in world units.
    pub w: f32,
    /// Height in world units.
    pub h: f32,
    /// Game-defined sprite kind.
    pub sprite: f32,
    /// Opacity (0.0 = invisible, 1.0 = opaque).
    pub alpha: f32,
    /// 1.0 when mirrored horizontally.
    pub flip: f32,
    /// Draw order, higher is in front.
    pub depth: f32,
}

impl RenderInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_entity(entity: &Entity) -> Self {
        Self {
            x: entity.pos.x,
            y: entity.pos.y,
            w: entity.size.x,
            h: entity.size.y,
            sprite: entity.sprite as f32,
            alpha: entity.alpha,
            flip: if entity.flip_x { 1.0 } else { 0.0 },
            depth: entity.depth,
        }
    }
}

/// Render buffer containing all visible instances for the frame.
pub struct RenderBuffer {
    pub instances: Vec<RenderInstance>,
    capacity: usize,
}

impl RenderBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            instances: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }

    /// Append an instance. Returns false once the buffer is full.
    pub fn push(&mut self, instance: RenderInstance) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    /// Raw pointer to instance data for reads from JS memory views.
    pub fn instances_ptr(&self) -> *const f32 {
        self.instances.as_ptr() as *const f32
    }
}
