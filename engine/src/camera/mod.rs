//! Camera Module
//!
//! Spring-arm camera rig, boom transitions and the easing curves that shape
//! them. Window-system agnostic: it only deals with camera state and math.

pub mod curve;
pub mod rig;
pub mod transition;

pub use curve::{CurveKey, EaseInOut, Easing, EasingCurve, KeyedCurve, Linear, SmoothStep};
pub use rig::{CameraRig, DEFAULT_ARM_LENGTH};
pub use transition::{BoomPose, CameraTransition};
