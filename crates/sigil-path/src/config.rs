//! Sampler Configuration

use serde::{Deserialize, Serialize};

use crate::SamplerError;

/// Sampler configuration options
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Uniform scale applied on top of the canvas conversion
    pub scale: f32,

    /// Output units per canvas unit (canvas is 0-100)
    pub canvas_units: f32,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            canvas_units: 0.01,
        }
    }
}

impl SamplerConfig {
    /// Create config with the given scale
    pub fn with_scale(scale: f32) -> Self {
        Self {
            scale,
            ..Self::default()
        }
    }

    /// Multiplier applied to centered canvas coordinates
    pub fn factor(&self) -> f32 {
        self.canvas_units * self.scale
    }

    /// Reject non-finite factors
    pub fn validate(&self) -> Result<(), SamplerError> {
        if !self.scale.is_finite() {
            return Err(SamplerError::InvalidScale(self.scale));
        }
        if !self.canvas_units.is_finite() {
            return Err(SamplerError::InvalidCanvasUnits(self.canvas_units));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_factor() {
        let config = SamplerConfig::default();
        assert_eq!(config.factor(), 0.01);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_scale() {
        let config = SamplerConfig::with_scale(4.0);
        assert_eq!(config.factor(), 0.04);
    }

    #[test]
    fn test_validate_rejects_nan() {
        let config = SamplerConfig::with_scale(f32::NAN);
        assert!(matches!(config.validate(), Err(SamplerError::InvalidScale(_))));

        let config = SamplerConfig {
            canvas_units: f32::INFINITY,
            ..SamplerConfig::default()
        };
        assert!(matches!(config.validate(), Err(SamplerError::InvalidCanvasUnits(_))));
    }

    #[test]
    fn test_partial_deserialize() {
        let config: SamplerConfig = serde_json::from_str(r#"{"scale": 2.5}"#).unwrap();
        assert_eq!(config.scale, 2.5);
        assert_eq!(config.canvas_units, 0.01);
    }
}
