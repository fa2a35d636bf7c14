use crate::error::{check_positive, ConfigError};

/// Distances that shape generation and cleanup, independent of level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldTuning {
    /// How far past the right edge of the view the world is kept built
    pub lookahead: f32,
    /// How far behind the viewpoint an object must be before it is released
    pub cleanup_buffer: f32,
    /// Length of the first segment after a reset
    pub cold_start_length: f32,
    /// Top of the ground strip
    pub ground_y: f32,
    pub ground_thickness: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            lookahead: 400.0,
            cleanup_buffer: 400.0,
            cold_start_length: 1200.0,
            ground_y: 580.0,
            ground_thickness: 40.0,
        }
    }
}

impl WorldTuning {
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_positive("lookahead", self.lookahead)?;
        check_positive("cleanup_buffer", self.cleanup_buffer)?;
        check_positive("cold_start_length", self.cold_start_length)?;
        check_positive("ground_y", self.ground_y)?;
        check_positive("ground_thickness", self.ground_thickness)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WorldTuning::default().validate().is_ok());
    }

    #[test]
    fn zero_cold_start_is_rejected() {
        let tuning = WorldTuning {
            cold_start_length: 0.0,
            ..WorldTuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(ConfigError::NotPositive { field: "cold_start_length", .. })
        ));
    }
}
