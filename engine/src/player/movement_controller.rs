//! Player Movement Controller
//!
//! Walking character movement for the third-person cutter. Movement input is
//! accumulated during the frame (camera-relative direction times axis value)
//! and consumed once per tick.
//!
//! # Physics Model
//!
//! - Max walk speed: 5.0 m/s, analog input never slower than 0.2 m/s
//! - Acceleration: 20.48 m/s^2, braking: 20.0 m/s^2
//! - Air control: 35% of ground acceleration
//! - Jump velocity: 7.0 m/s against 9.8 m/s^2 gravity
//! - The character turns toward its movement direction at 500 deg/s
//!
//! # Usage
//!
//! ```rust,ignore
//! let mut controller = MovementController::new();
//! controller.add_movement_input(rig.get_yaw_forward(), axis.y);
//! controller.add_movement_input(rig.get_yaw_right(), axis.x);
//! controller.tick(delta_time, 0.0);
//! ```

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Max walk speed in meters per second
pub const MAX_WALK_SPEED: f32 = 5.0;

/// Slowest walk speed reachable with analog input, in meters per second
pub const MIN_ANALOG_WALK_SPEED: f32 = 0.2;

/// Acceleration in meters per second squared
pub const ACCELERATION: f32 = 20.48;

/// Braking deceleration while walking, in meters per second squared
pub const BRAKING_DECELERATION: f32 = 20.0;

/// Fraction of acceleration available while airborne
pub const AIR_CONTROL: f32 = 0.35;

/// Jump velocity in meters per second
pub const JUMP_VELOCITY: f32 = 7.0;

/// Gravity acceleration in meters per second squared
pub const GRAVITY: f32 = 9.8;

/// Yaw rotation rate in degrees per second
pub const ROTATION_RATE_DEG: f32 = 500.0;

/// Collision capsule radius in meters
pub const CAPSULE_RADIUS: f32 = 0.42;

/// Collision capsule half height in meters
pub const CAPSULE_HALF_HEIGHT: f32 = 0.96;

/// Tunable movement parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementSettings {
    pub max_walk_speed: f32,
    pub min_analog_walk_speed: f32,
    pub acceleration: f32,
    pub braking_deceleration: f32,
    pub air_control: f32,
    pub jump_velocity: f32,
    pub gravity: f32,
    pub rotation_rate_deg: f32,
    pub orient_rotation_to_movement: bool,
    pub capsule_radius: f32,
    pub capsule_half_height: f32,
}

impl Default for MovementSettings {
    fn default() -> Self {
        Self {
            max_walk_speed: MAX_WALK_SPEED,
            min_analog_walk_speed: MIN_ANALOG_WALK_SPEED,
            acceleration: ACCELERATION,
            braking_deceleration: BRAKING_DECELERATION,
            air_control: AIR_CONTROL,
            jump_velocity: JUMP_VELOCITY,
            gravity: GRAVITY,
            rotation_rate_deg: ROTATION_RATE_DEG,
            orient_rotation_to_movement: true,
            capsule_radius: CAPSULE_RADIUS,
            capsule_half_height: CAPSULE_HALF_HEIGHT,
        }
    }
}

/// Character movement with acceleration, braking, jumping and gravity.
#[derive(Debug, Clone)]
pub struct MovementController {
    settings: MovementSettings,

    /// Capsule center in world space
    position: Vec3,

    /// Horizontal velocity in world space (m/s)
    velocity: Vec3,

    /// Vertical velocity in m/s (positive = upward)
    vertical_velocity: f32,

    /// Facing yaw in radians, 0 = looking toward -Z
    actor_yaw: f32,

    is_grounded: bool,

    /// Jump held since the last `jump()` call
    jump_pressed: bool,

    /// Movement input accumulated since the last tick
    pending_input: Vec3,
}

impl Default for MovementController {
    fn default() -> Self {
        Self::with_settings(MovementSettings::default())
    }
}

impl MovementController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: MovementSettings) -> Self {
        Self {
            settings,
            position: Vec3::new(0.0, settings.capsule_half_height, 0.0),
            velocity: Vec3::ZERO,
            vertical_velocity: 0.0,
            actor_yaw: 0.0,
            is_grounded: true,
            jump_pressed: false,
            pending_input: Vec3::ZERO,
        }
    }

    pub fn settings(&self) -> &MovementSettings {
        &self.settings
    }

    pub fn get_position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn get_velocity(&self) -> Vec3 {
        self.velocity + Vec3::Y * self.vertical_velocity
    }

    pub fn get_horizontal_speed(&self) -> f32 {
        self.velocity.length()
    }

    pub fn get_actor_yaw(&self) -> f32 {
        self.actor_yaw
    }

    pub fn set_actor_yaw(&mut self, yaw: f32) {
        self.actor_yaw = yaw;
    }

    /// Horizontal facing direction.
    pub fn get_actor_forward(&self) -> Vec3 {
        Vec3::new(self.actor_yaw.sin(), 0.0, -self.actor_yaw.cos())
    }

    pub fn is_grounded(&self) -> bool {
        self.is_grounded
    }

    pub fn is_jump_pressed(&self) -> bool {
        self.jump_pressed
    }

    /// Foot position (bottom of the capsule).
    pub fn get_feet_position(&self) -> Vec3 {
        self.position - Vec3::Y * self.settings.capsule_half_height
    }

    /// Queue movement along `direction` scaled by `scale` for the next tick.
    pub fn add_movement_input(&mut self, direction: Vec3, scale: f32) {
        self.pending_input += Vec3::new(direction.x, 0.0, direction.z) * scale;
    }

    pub fn get_pending_input(&self) -> Vec3 {
        self.pending_input
    }

    pub fn jump(&mut self) {
        self.jump_pressed = true;
    }

    pub fn stop_jumping(&mut self) {
        self.jump_pressed = false;
    }

    /// Stop all motion and drop queued input.
    pub fn reset(&mut self) {
        self.velocity = Vec3::ZERO;
        self.vertical_velocity = 0.0;
        self.pending_input = Vec3::ZERO;
        self.jump_pressed = false;
    }

    /// Advance movement by `dt` seconds over flat ground at `ground_height`.
    ///
    /// Returns the displacement applied to the capsule.
    pub fn tick(&mut self, dt: f32, ground_height: f32) -> Vec3 {
        // Clamp delta time to prevent physics explosions
        let dt = dt.clamp(0.0, 0.1);
        let input = std::mem::take(&mut self.pending_input).clamp_length_max(1.0);

        if self.jump_pressed && self.is_grounded {
            self.vertical_velocity = self.settings.jump_velocity;
            self.is_grounded = false;
        }

        self.update_horizontal(dt, input);
        self.update_facing(dt);

        let prev_vertical = self.vertical_velocity;
        if !self.is_grounded {
            self.vertical_velocity -= self.settings.gravity * dt;
        }
        // Midpoint integration for the vertical axis
        let delta_y = (prev_vertical + self.vertical_velocity) * 0.5 * dt;
        let displacement = self.velocity * dt + Vec3::Y * delta_y;
        self.position += displacement;

        let rest_height = ground_height + self.settings.capsule_half_height;
        if self.position.y <= rest_height && self.vertical_velocity <= 0.0 {
            self.position.y = rest_height;
            self.vertical_velocity = 0.0;
            self.is_grounded = true;
        }
        displacement
    }

    fn update_horizontal(&mut self, dt: f32, input: Vec3) {
        let input_strength = input.length();
        let has_input = input_strength > 0.001;

        if has_input {
            let target_speed = (self.settings.max_walk_speed * input_strength)
                .max(self.settings.min_analog_walk_speed);
            let target_velocity = input.normalize() * target_speed;
            let control = if self.is_grounded {
                1.0
            } else {
                self.settings.air_control
            };

            // Accelerate toward target velocity
            let velocity_diff = target_velocity - self.velocity;
            let accel_this_frame = self.settings.acceleration * control * dt;
            if velocity_diff.length() <= accel_this_frame {
                self.velocity = target_velocity;
            } else {
                self.velocity += velocity_diff.normalize() * accel_this_frame;
            }
        } else if self.is_grounded {
            // Brake to a stop, keeping direction
            let current_speed = self.velocity.length();
            let decel_this_frame = self.settings.braking_deceleration * dt;
            if current_speed <= decel_this_frame {
                self.velocity = Vec3::ZERO;
            } else {
                self.velocity = self.velocity.normalize() * (current_speed - decel_this_frame);
            }
        }
    }

    fn update_facing(&mut self, dt: f32) {
        if !self.settings.orient_rotation_to_movement || self.velocity.length_squared() < 1e-6 {
            return;
        }
        let target = self.velocity.x.atan2(-self.velocity.z);
        let mut diff = target - self.actor_yaw;
        // Wrap to [-PI, PI]
        while diff > std::f32::consts::PI {
            diff -= std::f32::consts::TAU;
        }
        while diff < -std::f32::consts::PI {
            diff += std::f32::consts::TAU;
        }
        let max_turn = self.settings.rotation_rate_deg.to_radians() * dt;
        self.actor_yaw += diff.clamp(-max_turn, max_turn);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn run(controller: &mut MovementController, seconds: f32) {
        let steps = (seconds / 0.01).round() as usize;
        for _ in 0..steps {
            controller.tick(0.01, 0.0);
        }
    }

    #[test]
    fn test_default_controller() {
        let controller = MovementController::new();
        assert_eq!(controller.get_velocity(), Vec3::ZERO);
        assert!(controller.is_grounded());
        assert_eq!(controller.settings().max_walk_speed, MAX_WALK_SPEED);
        assert_relative_eq!(controller.get_feet_position().y, 0.0);
    }

    #[test]
    fn test_forward_movement_reaches_max_walk_speed() {
        let mut controller = MovementController::new();
        for _ in 0..100 {
            controller.add_movement_input(Vec3::NEG_Z, 1.0);
            controller.tick(0.01, 0.0);
        }
        assert_relative_eq!(controller.get_horizontal_speed(), MAX_WALK_SPEED, epsilon = 1e-4);
        assert!(controller.get_position().z < 0.0);
    }

    #[test]
    fn test_analog_input_has_minimum_speed() {
        let mut controller = MovementController::new();
        for _ in 0..100 {
            controller.add_movement_input(Vec3::X, 0.01);
            controller.tick(0.01, 0.0);
        }
        assert_relative_eq!(controller.get_horizontal_speed(), MIN_ANALOG_WALK_SPEED, epsilon = 1e-4);
    }

    #[test]
    fn test_braking_stops_the_character() {
        let mut controller = MovementController::new();
        for _ in 0..100 {
            controller.add_movement_input(Vec3::X, 1.0);
            controller.tick(0.01, 0.0);
        }
        // 5 m/s at 20 m/s^2 stops in 0.25 s
        run(&mut controller, 0.3);
        assert_eq!(controller.get_horizontal_speed(), 0.0);
    }

    #[test]
    fn test_jump_and_land() {
        let mut controller = MovementController::new();
        controller.jump();
        controller.tick(0.01, 0.0);
        assert!(!controller.is_grounded());
        assert!(controller.get_velocity().y > 0.0);
        controller.stop_jumping();

        // Flight time is 2 * 7 / 9.8 ~= 1.43 s
        run(&mut controller, 1.6);
        assert!(controller.is_grounded());
        assert_relative_eq!(controller.get_feet_position().y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_turns_toward_movement_at_rotation_rate() {
        let mut controller = MovementController::new();
        controller.add_movement_input(Vec3::X, 1.0);
        controller.tick(0.1, 0.0);
        // 500 deg/s for 0.1 s = 50 deg
        assert_relative_eq!(controller.get_actor_yaw(), 50f32.to_radians(), epsilon = 1e-4);
        run(&mut controller, 0.5);
        assert_relative_eq!(controller.get_actor_yaw(), std::f32::consts::FRAC_PI_2, epsilon = 1e-4);
    }

    #[test]
    fn test_pending_input_is_consumed() {
        let mut controller = MovementController::new();
        controller.add_movement_input(Vec3::X, 1.0);
        assert_eq!(controller.get_pending_input(), Vec3::X);
        controller.tick(0.01, 0.0);
        assert_eq!(controller.get_pending_input(), Vec3::ZERO);
    }
}
