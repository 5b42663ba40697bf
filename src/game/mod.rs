//! Game Module
//!
//! The cutting character and the gameplay systems behind it: config, cut
//! mode, the cutting plane, rigid-to-dynamic conversion, target dispatch and
//! post-slice physics.

pub mod character;
pub mod config;
pub mod conversion;
pub mod cut_mode;
pub mod cutting_plane;
pub mod post_slice;
pub mod targeting;

pub use character::CutterCharacter;
pub use config::{CameraConfig, ConfigError, CutterConfig, CuttingConfig};
pub use conversion::{ConversionError, convert_rigid};
pub use cut_mode::CutMode;
pub use cutting_plane::CuttingPlane;
pub use post_slice::finish_slice;
pub use targeting::{CutReport, CutRequest, SkipReason, SkippedTarget, SlicedPiece, cut_targets};
