//! Player Module
//!
//! Provides player character movement.
//!
//! # Components
//!
//! - [`MovementController`] - Camera-relative walking, jumping and gravity,
//!   with the character turning toward its movement direction
//! - [`MovementSettings`] - Serializable tuning values

pub mod movement_controller;

pub use movement_controller::{
    ACCELERATION, AIR_CONTROL, BRAKING_DECELERATION, CAPSULE_HALF_HEIGHT, CAPSULE_RADIUS, GRAVITY,
    JUMP_VELOCITY, MAX_WALK_SPEED, MIN_ANALOG_WALK_SPEED, MovementController, MovementSettings,
    ROTATION_RATE_DEG,
};
