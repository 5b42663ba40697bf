//! Camera Configuration
//!
//! Boom poses for the two cut modes and how the boom moves between them.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{BoomPose, DEFAULT_ARM_LENGTH, Easing};

/// Spring-arm settings for walking and cutting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Arm length while walking (meters)
    pub normal_arm_length: f32,
    /// Arm length while aiming a cut (meters)
    pub cutting_arm_length: f32,
    /// Socket offset while aiming a cut, in character space (x right, y up)
    pub cutting_socket_offset: Vec3,
    /// Control pitch applied when entering cut mode (degrees, negative looks down)
    pub cutting_pitch_deg: f32,
    /// Radians of control rotation per look unit
    pub look_sensitivity: f32,
    /// Seconds for the boom to move between poses, 0 snaps
    pub transition_duration: f32,
    pub transition_easing: Easing,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            normal_arm_length: DEFAULT_ARM_LENGTH,
            cutting_arm_length: 1.0,
            cutting_socket_offset: Vec3::new(0.3, 0.8, 0.0),
            cutting_pitch_deg: -10.0,
            look_sensitivity: 0.01,
            transition_duration: 0.0,
            transition_easing: Easing::default(),
        }
    }
}

impl CameraConfig {
    pub fn normal_boom(&self) -> BoomPose {
        BoomPose::new(self.normal_arm_length, Vec3::ZERO)
    }

    pub fn cutting_boom(&self) -> BoomPose {
        BoomPose::new(self.cutting_arm_length, self.cutting_socket_offset)
    }
}
