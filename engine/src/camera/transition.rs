//! Boom transitions
//!
//! Moves the camera boom's arm length and socket offset from a start to a
//! target value over a fixed duration. Progress is advanced once per tick by
//! the caller and shaped by an [`Easing`] curve.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::curve::{Easing, EasingCurve};

/// Arm length and socket offset of a camera boom.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoomPose {
    pub arm_length: f32,
    pub socket_offset: Vec3,
}

impl BoomPose {
    pub fn new(arm_length: f32, socket_offset: Vec3) -> Self {
        Self {
            arm_length,
            socket_offset,
        }
    }

    pub fn lerp(&self, other: &BoomPose, t: f32) -> BoomPose {
        BoomPose {
            arm_length: self.arm_length + (other.arm_length - self.arm_length) * t,
            socket_offset: self.socket_offset.lerp(other.socket_offset, t),
        }
    }
}

/// Transition state for smooth boom changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraTransition {
    pub active: bool,
    /// Seconds since the transition started
    pub elapsed: f32,
    /// Duration of the transition in seconds
    pub duration: f32,
    pub from: BoomPose,
    pub to: BoomPose,
    pub curve: Easing,
}

impl Default for CameraTransition {
    fn default() -> Self {
        Self {
            active: false,
            elapsed: 0.0,
            duration: 0.3,
            from: BoomPose::default(),
            to: BoomPose::default(),
            curve: Easing::default(),
        }
    }
}

impl CameraTransition {
    pub fn new(duration: f32, curve: Easing) -> Self {
        Self {
            duration,
            curve,
            ..Self::default()
        }
    }

    pub fn start(&mut self, from: BoomPose, to: BoomPose) {
        self.from = from;
        self.to = to;
        self.elapsed = 0.0;
        self.active = true;
    }

    /// Normalized progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= f32::EPSILON {
            return 1.0;
        }
        (self.elapsed / self.duration).clamp(0.0, 1.0)
    }

    /// Pose at the current progress.
    pub fn current(&self) -> BoomPose {
        self.from.lerp(&self.to, self.curve.sample(self.progress()))
    }

    /// Advance by `delta_time` and return the new pose.
    ///
    /// The transition deactivates once it reaches the target.
    pub fn advance(&mut self, delta_time: f32) -> BoomPose {
        if !self.active {
            return self.to;
        }
        self.elapsed += delta_time.max(0.0);
        if self.progress() >= 1.0 {
            self.active = false;
            return self.to;
        }
        self.current()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}
