//! Rigid Body State
//!
//! Per-component physical properties handed to the physics backend:
//! mass, gravity, collision profile, per-channel responses, notify flags,
//! simulation flag and velocities. Rigid and dynamic mesh instances both
//! carry a [`BodyInstance`]; converting one into the other copies it with
//! [`copy_physics_state`].
//!
//! # Units
//!
//! - Mass in kg
//! - Linear velocity in m/s
//! - Angular velocity in rad/s

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Number of collision channels.
pub const CHANNEL_COUNT: usize = 8;

/// Default collision profile for newly created bodies.
pub const DEFAULT_COLLISION_PROFILE: &str = "BlockAllDynamic";

/// Whether a component may move at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mobility {
    /// Immovable; never converted or sliced.
    Static,
    /// Fixed position, dynamic lighting only.
    Stationary,
    /// Free to move and simulate.
    #[default]
    Movable,
}

/// Which parts of the collision pipeline a body takes part in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionEnabled {
    NoCollision,
    QueryOnly,
    PhysicsOnly,
    #[default]
    QueryAndPhysics,
}

impl CollisionEnabled {
    /// Whether spatial queries can see a body with this setting.
    pub fn has_query(self) -> bool {
        matches!(self, Self::QueryOnly | Self::QueryAndPhysics)
    }
}

/// Object channels a body can be typed as, and respond to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionChannel {
    WorldStatic,
    WorldDynamic,
    Pawn,
    Visibility,
    Camera,
    PhysicsBody,
    Vehicle,
    Destructible,
}

impl CollisionChannel {
    pub const ALL: [CollisionChannel; CHANNEL_COUNT] = [
        CollisionChannel::WorldStatic,
        CollisionChannel::WorldDynamic,
        CollisionChannel::Pawn,
        CollisionChannel::Visibility,
        CollisionChannel::Camera,
        CollisionChannel::PhysicsBody,
        CollisionChannel::Vehicle,
        CollisionChannel::Destructible,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Dynamic object types (everything except world static and the trace channels).
    pub fn is_dynamic_object(self) -> bool {
        matches!(
            self,
            Self::WorldDynamic | Self::Pawn | Self::PhysicsBody | Self::Vehicle | Self::Destructible
        )
    }
}

/// How a body reacts to another body typed on a given channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CollisionResponse {
    Ignore,
    Overlap,
    #[default]
    Block,
}

/// One response per collision channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionResponseContainer {
    responses: [CollisionResponse; CHANNEL_COUNT],
}

impl Default for CollisionResponseContainer {
    fn default() -> Self {
        Self::all(CollisionResponse::Block)
    }
}

impl CollisionResponseContainer {
    /// Same response on every channel.
    pub fn all(response: CollisionResponse) -> Self {
        Self {
            responses: [response; CHANNEL_COUNT],
        }
    }

    pub fn get(&self, channel: CollisionChannel) -> CollisionResponse {
        self.responses[channel.index()]
    }

    pub fn set(&mut self, channel: CollisionChannel, response: CollisionResponse) {
        self.responses[channel.index()] = response;
    }
}

/// Physical body properties of one scene component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyInstance {
    /// Explicit mass, takes precedence over the computed mass
    pub mass_override_kg: Option<f32>,
    /// Mass derived from the collision geometry
    pub computed_mass_kg: f32,
    pub enable_gravity: bool,
    pub collision_profile: String,
    pub collision_enabled: CollisionEnabled,
    /// Channel this body is typed as for object queries
    pub object_type: CollisionChannel,
    pub responses: CollisionResponseContainer,
    pub notify_rigid_body_collision: bool,
    pub generate_overlap_events: bool,
    pub simulate_physics: bool,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
}

impl Default for BodyInstance {
    fn default() -> Self {
        Self {
            mass_override_kg: None,
            computed_mass_kg: 1.0,
            enable_gravity: true,
            collision_profile: DEFAULT_COLLISION_PROFILE.to_string(),
            collision_enabled: CollisionEnabled::QueryAndPhysics,
            object_type: CollisionChannel::WorldDynamic,
            responses: CollisionResponseContainer::default(),
            notify_rigid_body_collision: false,
            generate_overlap_events: true,
            simulate_physics: false,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
        }
    }
}

impl BodyInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective mass in kg.
    pub fn mass(&self) -> f32 {
        self.mass_override_kg.unwrap_or(self.computed_mass_kg)
    }

    pub fn set_mass_override(&mut self, mass_kg: f32) {
        self.mass_override_kg = Some(mass_kg);
    }

    /// Apply an instantaneous impulse.
    ///
    /// With `velocity_change` the impulse is a velocity delta and mass is
    /// ignored; otherwise it is divided by the effective mass.
    pub fn add_impulse(&mut self, impulse: Vec3, velocity_change: bool) {
        if velocity_change {
            self.linear_velocity += impulse;
        } else {
            let mass = self.mass();
            if mass > f32::EPSILON {
                self.linear_velocity += impulse / mass;
            }
        }
    }
}

/// Copy the physical state of a rigid body onto its dynamic replacement.
///
/// Mass, gravity, collision profile/enabled/responses, object type, the
/// rigid-body notify flag, simulation flag and velocities are copied verbatim.
/// Overlap events are forced off on the target: pieces produced by slicing
/// overlap constantly and must not feed back into cut logic.
pub fn copy_physics_state(source: &BodyInstance, target: &mut BodyInstance) {
    target.set_mass_override(source.mass());
    target.enable_gravity = source.enable_gravity;
    target.collision_profile = source.collision_profile.clone();
    target.collision_enabled = source.collision_enabled;
    target.object_type = source.object_type;
    target.responses = source.responses;
    target.notify_rigid_body_collision = source.notify_rigid_body_collision;
    target.generate_overlap_events = false;
    target.simulate_physics = source.simulate_physics;
    target.linear_velocity = source.linear_velocity;
    target.angular_velocity = source.angular_velocity;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mass_override_wins() {
        let mut body = BodyInstance::new();
        body.computed_mass_kg = 12.0;
        assert_eq!(body.mass(), 12.0);
        body.set_mass_override(3.0);
        assert_eq!(body.mass(), 3.0);
    }

    #[test]
    fn test_velocity_change_impulse_ignores_mass() {
        let mut body = BodyInstance::new();
        body.set_mass_override(50.0);
        body.add_impulse(Vec3::new(0.0, 5.0, 0.0), true);
        assert_eq!(body.linear_velocity, Vec3::new(0.0, 5.0, 0.0));
    }

    #[test]
    fn test_force_impulse_divides_by_mass() {
        let mut body = BodyInstance::new();
        body.set_mass_override(2.0);
        body.add_impulse(Vec3::new(4.0, 0.0, 0.0), false);
        assert_eq!(body.linear_velocity, Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_copy_physics_state() {
        let mut source = BodyInstance::new();
        source.computed_mass_kg = 7.5;
        source.enable_gravity = false;
        source.collision_profile = "PhysicsActor".to_string();
        source.collision_enabled = CollisionEnabled::PhysicsOnly;
        source.object_type = CollisionChannel::PhysicsBody;
        source.responses.set(CollisionChannel::Pawn, CollisionResponse::Overlap);
        source.notify_rigid_body_collision = true;
        source.generate_overlap_events = true;
        source.simulate_physics = true;
        source.linear_velocity = Vec3::new(1.0, 2.0, 3.0);
        source.angular_velocity = Vec3::new(0.0, 0.5, 0.0);

        let mut target = BodyInstance::new();
        copy_physics_state(&source, &mut target);

        assert_eq!(target.mass_override_kg, Some(7.5));
        assert!(!target.enable_gravity);
        assert_eq!(target.collision_profile, "PhysicsActor");
        assert_eq!(target.collision_enabled, CollisionEnabled::PhysicsOnly);
        assert_eq!(target.object_type, CollisionChannel::PhysicsBody);
        assert_eq!(target.responses.get(CollisionChannel::Pawn), CollisionResponse::Overlap);
        assert!(target.notify_rigid_body_collision);
        assert!(!target.generate_overlap_events);
        assert!(target.simulate_physics);
        assert_eq!(target.linear_velocity, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(target.angular_velocity, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn test_dynamic_object_channels() {
        assert!(!CollisionChannel::WorldStatic.is_dynamic_object());
        assert!(CollisionChannel::WorldDynamic.is_dynamic_object());
        assert!(CollisionChannel::PhysicsBody.is_dynamic_object());
        assert!(!CollisionChannel::Camera.is_dynamic_object());
    }
}
