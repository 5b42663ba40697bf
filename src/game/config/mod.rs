//! Config Module
//!
//! Serializable tuning for the cutting character: movement, camera boom and
//! cutting plane.

pub mod camera_config;
pub mod cutter_config;
pub mod cutting_config;

pub use camera_config::CameraConfig;
pub use cutter_config::{ConfigError, CutterConfig};
pub use cutting_config::CuttingConfig;
