//! Camera Rig Module
//!
//! Third-person spring-arm camera: a boom anchored on the character (with a
//! socket offset in character space) swings with the control rotation, and
//! the camera sits at the far end of the arm.
//!
//! Angles are in radians. Axis convention:
//! - yaw 0 looks toward -Z, positive yaw turns toward +X
//! - positive pitch looks up

use glam::{Quat, Vec3};

use super::curve::Easing;
use super::transition::{BoomPose, CameraTransition};

/// Pitch limit: -89 degrees in radians
const PITCH_LIMIT_MIN: f32 = -89.0 * std::f32::consts::PI / 180.0;
/// Pitch limit: +89 degrees in radians
const PITCH_LIMIT_MAX: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// Default arm length in meters.
pub const DEFAULT_ARM_LENGTH: f32 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    /// Arm length and socket offset currently applied
    pub boom: BoomPose,
    /// Control yaw (radians), unrestricted
    pub yaw: f32,
    /// Control pitch (radians), limited to `pitch_limits`
    pub pitch: f32,
    pub pitch_limits: (f32, f32),
    /// Radians of control rotation per look unit
    pub look_sensitivity: f32,
    pub transition: CameraTransition,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            boom: BoomPose::new(DEFAULT_ARM_LENGTH, Vec3::ZERO),
            yaw: 0.0,
            pitch: 0.0,
            pitch_limits: (PITCH_LIMIT_MIN, PITCH_LIMIT_MAX),
            look_sensitivity: 0.01,
            transition: CameraTransition::new(0.0, Easing::default()),
        }
    }
}

impl CameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_arm_length(&self) -> f32 {
        self.boom.arm_length
    }

    pub fn get_socket_offset(&self) -> Vec3 {
        self.boom.socket_offset
    }

    /// Move the boom to `target`, through the transition if it has a duration.
    pub fn set_boom(&mut self, target: BoomPose) {
        if self.transition.duration <= f32::EPSILON {
            self.transition.active = false;
            self.transition.to = target;
            self.boom = target;
        } else {
            self.transition.start(self.boom, target);
        }
    }

    /// Target the boom is heading to (the current pose when idle).
    pub fn target_boom(&self) -> BoomPose {
        if self.transition.is_active() {
            self.transition.to
        } else {
            self.boom
        }
    }

    pub fn set_control_rotation(&mut self, pitch: f32, yaw: f32) {
        self.yaw = yaw;
        self.pitch = pitch.clamp(self.pitch_limits.0, self.pitch_limits.1);
    }

    pub fn add_yaw_input(&mut self, value: f32) {
        self.yaw += value * self.look_sensitivity;
    }

    pub fn add_pitch_input(&mut self, value: f32) {
        // Screen-space look: positive y looks down
        self.pitch = (self.pitch - value * self.look_sensitivity)
            .clamp(self.pitch_limits.0, self.pitch_limits.1);
    }

    pub fn control_rotation(&self) -> Quat {
        Quat::from_rotation_y(-self.yaw) * Quat::from_rotation_x(self.pitch)
    }

    /// View direction from yaw and pitch.
    pub fn get_forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            -self.yaw.cos() * self.pitch.cos(),
        )
        .normalize()
    }

    /// Horizontal forward from yaw only, used for movement.
    pub fn get_yaw_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, -self.yaw.cos())
    }

    /// Horizontal right from yaw only.
    pub fn get_yaw_right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// Camera position for a character at `pivot` facing `actor_yaw`.
    pub fn camera_position(&self, pivot: Vec3, actor_yaw: f32) -> Vec3 {
        let socket = pivot + Quat::from_rotation_y(-actor_yaw) * self.boom.socket_offset;
        socket - self.get_forward() * self.boom.arm_length
    }

    /// Advance an active boom transition.
    pub fn tick(&mut self, delta_time: f32) {
        if self.transition.is_active() {
            self.boom = self.transition.advance(delta_time);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default_boom_is_four_meters() {
        let rig = CameraRig::new();
        assert_eq!(rig.get_arm_length(), 4.0);
        assert_eq!(rig.get_socket_offset(), Vec3::ZERO);
    }

    #[test]
    fn test_camera_sits_behind_pivot() {
        let rig = CameraRig::new();
        let pos = rig.camera_position(Vec3::ZERO, 0.0);
        assert!(pos.abs_diff_eq(Vec3::new(0.0, 0.0, 4.0), 1e-5));
    }

    #[test]
    fn test_yaw_forward_and_right() {
        let mut rig = CameraRig::new();
        rig.set_control_rotation(0.0, FRAC_PI_2);
        assert!(rig.get_yaw_forward().abs_diff_eq(Vec3::X, 1e-6));
        assert!(rig.get_yaw_right().abs_diff_eq(Vec3::Z, 1e-6));
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut rig = CameraRig::new();
        rig.add_pitch_input(-1.0e6);
        assert_relative_eq!(rig.pitch, PITCH_LIMIT_MAX);
    }

    #[test]
    fn test_control_rotation_matches_forward() {
        let mut rig = CameraRig::new();
        rig.set_control_rotation(-0.3, 1.1);
        let rotated = rig.control_rotation() * Vec3::NEG_Z;
        assert!(rotated.abs_diff_eq(rig.get_forward(), 1e-5));
    }

    #[test]
    fn test_set_boom_without_duration_is_immediate() {
        let mut rig = CameraRig::new();
        rig.set_boom(BoomPose::new(1.0, Vec3::new(0.3, 0.8, 0.0)));
        assert_eq!(rig.get_arm_length(), 1.0);
        assert!(!rig.transition.is_active());
    }

    #[test]
    fn test_set_boom_with_duration_transitions() {
        let mut rig = CameraRig::new();
        rig.transition = CameraTransition::new(0.5, Easing::Linear);
        rig.set_boom(BoomPose::new(1.0, Vec3::ZERO));
        assert_eq!(rig.get_arm_length(), 4.0);
        assert_eq!(rig.target_boom().arm_length, 1.0);
        rig.tick(0.25);
        assert_relative_eq!(rig.get_arm_length(), 2.5);
        rig.tick(0.25);
        assert_eq!(rig.get_arm_length(), 1.0);
    }
}
