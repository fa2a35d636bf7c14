use dash_engine::EntityId;

use crate::error::ConfigError;
use crate::world::placement::Placement;

/// Horizontal patrol of one moving platform. `move_start <= move_end`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingPlatformSpec {
    pub handle: EntityId,
    pub move_start: f32,
    pub move_end: f32,
    pub speed: f32,
}

impl MovingPlatformSpec {
    pub fn new(handle: EntityId, move_start: f32, move_end: f32, speed: f32) -> Result<Self, ConfigError> {
        if !(move_start.is_finite() && move_end.is_finite()) || move_start > move_end {
            return Err(ConfigError::InvertedTravel { start: move_start, end: move_end });
        }
        if !speed.is_finite() {
            return Err(ConfigError::NotPositive { field: "platform speed", value: speed });
        }
        Ok(Self { handle, move_start, move_end, speed })
    }

    /// New velocity when `x` has reached a bound, `None` while in between.
    pub fn steer(&self, x: f32) -> Option<f32> {
        if x <= self.move_start {
            Some(self.speed.abs())
        } else if x >= self.move_end {
            Some(-self.speed.abs())
        } else {
            None
        }
    }
}

/// Bounces every tracked platform between its bounds.
#[derive(Debug, Default)]
pub struct MovingPlatformDriver {
    specs: Vec<MovingPlatformSpec>,
}

impl MovingPlatformDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track(&mut self, spec: MovingPlatformSpec) {
        self.specs.push(spec);
    }

    pub fn specs(&self) -> &[MovingPlatformSpec] {
        &self.specs
    }

    pub fn get(&self, handle: EntityId) -> Option<&MovingPlatformSpec> {
        self.specs.iter().find(|s| s.handle == handle)
    }

    /// Stop tracking the given handles.
    pub fn forget(&mut self, handles: &[EntityId]) {
        if !handles.is_empty() {
            self.specs.retain(|s| !handles.contains(&s.handle));
        }
    }

    pub fn clear(&mut self) {
        self.specs.clear();
    }

    /// One drive step. Platforms placement has lost are skipped this step.
    /// Returns how many platforms turned around.
    pub fn update<P: Placement>(&self, placement: &mut P) -> usize {
        let mut turned = 0;
        for spec in &self.specs {
            let Some(x) = placement.position_x(spec.handle) else {
                continue;
            };
            if let Some(vx) = spec.steer(x) {
                if placement.set_velocity_x(spec.handle, vx) {
                    turned += 1;
                }
            }
        }
        turned
    }
}
