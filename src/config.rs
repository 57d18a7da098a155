use std::f32::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::lighting::DEFAULT_AMBIENT_LIGHT;
use crate::math::{mat4, MathError, Vec2, Vec3};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("rotation_period_secs must be a positive number of seconds, got {0}")]
    RotationPeriod(f32),

    #[error("camera frustum: {0}")]
    Frustum(#[from] MathError),
}

/// Camera, animation and clear settings for a scene. Every field has a
/// default, so a config file only needs to mention what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// Seconds for the rotation angle to advance by a full turn.
    pub rotation_period_secs: f32,
    pub primary_axis: Vec3,
    pub secondary_axis: Vec3,
    pub clear_color: [f32; 4],
    pub ambient_light: Vec3,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            eye: [0.0, 0.0, 40.0],
            target: [0.0, 0.0, 0.0],
            up: [0.0, 1.0, 0.0],
            fov: PI / 4.0,
            near: 0.1,
            far: 1000.0,
            rotation_period_secs: 10.0,
            primary_axis: [0.2, 1.0, 0.2],
            secondary_axis: [0.8, 0.0, -0.8],
            clear_color: [47.0 / 255.0, 50.0 / 255.0, 66.0 / 255.0, 1.0],
            ambient_light: DEFAULT_AMBIENT_LIGHT,
        }
    }
}

impl SceneConfig {
    /// Parses and validates a config file.
    pub fn from_json_str(data: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would turn every frame's matrices into NaN.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let period = self.rotation_period_secs;
        if !(period.is_finite() && period > 0.0) {
            return Err(ConfigError::RotationPeriod(period));
        }
        mat4::try_perspective(self.fov, 1.0, self.depth_range())?;
        Ok(())
    }

    pub fn depth_range(&self) -> Vec2 {
        [self.near, self.far]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        assert_eq!(SceneConfig::from_json_str("{}").unwrap(), SceneConfig::default());
    }

    #[test]
    fn overrides_only_named_fields() {
        let config = SceneConfig::from_json_str(r#"{"eye": [0, 5, 20], "far": 50}"#).unwrap();
        assert_eq!(config.eye, [0.0, 5.0, 20.0]);
        assert_eq!(config.depth_range(), [0.1, 50.0]);
        assert_eq!(config.rotation_period_secs, 10.0);
    }

    #[test]
    fn rejects_short_vectors() {
        assert!(matches!(
            SceneConfig::from_json_str(r#"{"up": [0, 1]}"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn rejects_non_positive_rotation_period() {
        for json in [
            r#"{"rotation_period_secs": 0}"#,
            r#"{"rotation_period_secs": -2.5}"#,
        ] {
            assert!(matches!(
                SceneConfig::from_json_str(json),
                Err(ConfigError::RotationPeriod(_))
            ));
        }
    }

    #[test]
    fn rejects_collapsed_frustum() {
        let err = SceneConfig::from_json_str(r#"{"near": 5, "far": 5}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Frustum(MathError::DegenerateFrustum { .. })
        ));
        assert!(SceneConfig::from_json_str(r#"{"fov": 0}"#).is_err());
    }

    #[test]
    fn defaults_pass_validation() {
        assert!(SceneConfig::default().validate().is_ok());
    }
}
