//! Cutter Configuration
//!
//! Top-level settings for the cutting character. Every field has a default,
//! so a config file only needs the values it changes:
//!
//! ```json
//! { "cutting": { "impulse_magnitude": 8.0 }, "camera": { "transition_duration": 0.25 } }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::camera_config::CameraConfig;
use super::cutting_config::CuttingConfig;
use crate::player::MovementSettings;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config value `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Movement, camera and cutting settings.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CutterConfig {
    pub movement: MovementSettings,
    pub camera: CameraConfig,
    pub cutting: CuttingConfig,
}

impl CutterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: CutterConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("loaded cutter config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the controllers cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks: [(&'static str, bool, &'static str); 6] = [
            (
                "movement.max_walk_speed",
                self.movement.max_walk_speed > 0.0,
                "must be positive",
            ),
            (
                "camera.normal_arm_length",
                self.camera.normal_arm_length >= 0.0,
                "must not be negative",
            ),
            (
                "camera.cutting_arm_length",
                self.camera.cutting_arm_length >= 0.0,
                "must not be negative",
            ),
            (
                "camera.transition_duration",
                self.camera.transition_duration >= 0.0,
                "must not be negative",
            ),
            (
                "cutting.impulse_magnitude",
                self.cutting.impulse_magnitude >= 0.0,
                "must not be negative",
            ),
            (
                "cutting.time_dilation",
                self.cutting.time_dilation > 0.0,
                "must be positive",
            ),
        ];
        match checks.into_iter().find(|(_, ok, _)| !ok) {
            Some((field, _, reason)) => Err(ConfigError::Invalid { field, reason }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Easing;
    use crate::mesh::CapOption;
    use glam::Vec3;

    #[test]
    fn test_defaults_match_character_tuning() {
        let config = CutterConfig::default();
        assert_eq!(config.movement.max_walk_speed, 5.0);
        assert_eq!(config.movement.jump_velocity, 7.0);
        assert_eq!(config.camera.normal_arm_length, 4.0);
        assert_eq!(config.camera.cutting_arm_length, 1.0);
        assert_eq!(config.camera.cutting_pitch_deg, -10.0);
        assert_eq!(config.cutting.impulse_magnitude, 5.0);
        assert_eq!(config.cutting.time_dilation, 0.1);
        assert_eq!(config.cutting.plane_offset(), Vec3::new(0.0, 0.4, -2.7));
        assert_eq!(config.cutting.cap_option, CapOption::CreateNewSectionForCap);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = CutterConfig::from_json_str(
            r#"{
                "cutting": { "impulse_magnitude": 8.0 },
                "camera": { "transition_duration": 0.25, "transition_easing": { "kind": "linear" } }
            }"#,
        )
        .unwrap();
        assert_eq!(config.cutting.impulse_magnitude, 8.0);
        assert_eq!(config.cutting.plane_forward_offset, 2.7);
        assert_eq!(config.camera.transition_duration, 0.25);
        assert_eq!(config.camera.transition_easing, Easing::Linear);
        assert_eq!(config.movement, MovementSettings::default());
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = CutterConfig::default();
        config.camera.transition_duration = 0.4;
        let json = config.to_json_string().unwrap();
        assert_eq!(CutterConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = CutterConfig::from_json_str(r#"{ "cutting": { "time_dilation": 0.0 } }"#)
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "cutting.time_dilation",
                ..
            }
        ));
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let err = CutterConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = CutterConfig::load("/nonexistent/cutter.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
