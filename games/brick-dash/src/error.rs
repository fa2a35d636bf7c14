/// Configuration errors. Raised eagerly: bad input is rejected, never clamped.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Segment lengths must be positive and finite
    #[error("segment length must be positive and finite, got {0}")]
    InvalidSegmentLength(f32),

    /// Viewport coordinates must be finite
    #[error("viewport must be finite with positive width, got left={left} width={width}")]
    InvalidViewport { left: f32, width: f32 },

    /// Probability outside [0, 1]
    #[error("{field} must be a probability in [0, 1], got {value}")]
    InvalidProbability { field: &'static str, value: f32 },

    /// Range with min above max
    #[error("{field} range is inverted: {min} > {max}")]
    InvertedRange { field: &'static str, min: i32, max: i32 },

    /// Range that must not go below zero
    #[error("{field} range must not be negative, got min {min}")]
    NegativeRange { field: &'static str, min: i32 },

    /// Speeds, intervals and distances that must be strictly positive
    #[error("{field} must be positive and finite, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    /// Moving platform travel bounds out of order
    #[error("moving platform travel is inverted: start {start} > end {end}")]
    InvertedTravel { start: f32, end: f32 },

    /// Cumulative weights must not decrease and must stay within [0, 1]
    #[error("weight table is not cumulative within [0, 1]: {0:?}")]
    UnorderedWeights(Vec<f32>),

    /// Level lookup failed
    #[error("no difficulty profile for level {0}")]
    UnknownLevel(u32),

    /// Level table is empty
    #[error("level table has no levels")]
    EmptyLevelTable,

    /// JSON parse error
    #[error("malformed level table: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reject a probability outside [0, 1] (NaN included).
pub(crate) fn check_probability(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::InvalidProbability { field, value })
    }
}

/// Reject zero, negative, NaN or infinite values.
pub(crate) fn check_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probability_bounds() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", f32::NAN).is_err());
    }

    #[test]
    fn positive_rejects_zero_and_infinity() {
        assert!(check_positive("speed", 50.0).is_ok());
        assert!(check_positive("speed", 0.0).is_err());
        assert!(check_positive("speed", f32::INFINITY).is_err());
    }

    #[test]
    fn messages_name_the_field() {
        let err = check_probability("ground_enemy_chance", 2.0).unwrap_err();
        assert!(err.to_string().contains("ground_enemy_chance"));
    }
}
