#![forbid(unsafe_code)]

//! Gesture tuning.

use crate::entity::DEFAULT_MIN_SCALE;
use crate::error::ConfigError;

/// Thresholds and factors for move resolution and gesture transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GestureConfig {
    /// Moves with `|dx|` and `|dy|` both below this are jitter (default: 3).
    pub jitter_threshold: i32,
    /// Scale change per pixel of finger-distance change (default: 0.005).
    pub scale_granularity: f64,
    /// Scale factors must stay strictly above this (default: 0.5).
    pub min_scale: f64,
    /// Rotation steps larger than this (degrees) are treated as inclination
    /// wraparound and dropped to zero (default: 100.0).
    pub max_rotation_step: f64,
    /// Toggle lock and marker when a Down fills an entity's contact set
    /// (default: true).
    pub lock_on_full_contact: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            jitter_threshold: 3,
            scale_granularity: 0.005,
            min_scale: DEFAULT_MIN_SCALE,
            max_rotation_step: 100.0,
            lock_on_full_contact: true,
        }
    }
}

impl GestureConfig {
    /// Check every field for a usable value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.min_scale.is_finite() && self.min_scale > 0.0) {
            return Err(ConfigError::InvalidMinScale {
                value: self.min_scale,
            });
        }
        if self.jitter_threshold < 0 {
            return Err(ConfigError::NegativeJitterThreshold {
                value: self.jitter_threshold,
            });
        }
        if !self.scale_granularity.is_finite() {
            return Err(ConfigError::InvalidScaleGranularity {
                value: self.scale_granularity,
            });
        }
        if !(self.max_rotation_step.is_finite() && self.max_rotation_step >= 0.0) {
            return Err(ConfigError::InvalidRotationGuard {
                value: self.max_rotation_step,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert_eq!(GestureConfig::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = GestureConfig {
            min_scale: 0.0,
            ..GestureConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidMinScale { .. })
        ));

        let cfg = GestureConfig {
            jitter_threshold: -1,
            ..GestureConfig::default()
        };
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::NegativeJitterThreshold { value: -1 })
        );

        let cfg = GestureConfig {
            scale_granularity: f64::NAN,
            ..GestureConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidScaleGranularity { .. })
        ));

        let cfg = GestureConfig {
            max_rotation_step: f64::INFINITY,
            ..GestureConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidRotationGuard { .. })
        ));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_json_fills_defaults() {
        let cfg: GestureConfig = serde_json::from_str(r#"{"jitter_threshold": 5}"#).unwrap();
        assert_eq!(cfg.jitter_threshold, 5);
        assert_eq!(cfg.min_scale, DEFAULT_MIN_SCALE);
        assert!(cfg.lock_on_full_contact);
    }
}
