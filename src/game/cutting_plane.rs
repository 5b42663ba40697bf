//! Cutting Plane
//!
//! The aiming rig shown in front of the character while in cut mode. It is
//! a thin square attached to the character root; its up vector is the
//! normal of every cut it makes. Look input rolls it about its forward axis.
//!
//! The plane never collides with anything, it only defines the cut volume.

use glam::{Quat, Vec2, Vec3};

use super::config::CuttingConfig;
use crate::mesh::SlicePlane;
use crate::physics::{CollisionBox, CollisionEnabled};
use crate::world::Transform;

#[derive(Debug, Clone, PartialEq)]
pub struct CuttingPlane {
    /// Offset from the character root, in character space
    pub local_offset: Vec3,
    /// Roll about the plane's forward axis (radians)
    roll: f32,
    pub scale: Vec3,
    /// Half size of the plane visual (right, forward)
    pub mesh_half_extents: Vec2,
    /// Half thickness used for the overlap volume
    pub query_half_thickness: f32,
    active: bool,
    visible: bool,
    pub collision_enabled: CollisionEnabled,
}

impl Default for CuttingPlane {
    fn default() -> Self {
        Self::from_config(&CuttingConfig::default())
    }
}

impl CuttingPlane {
    /// Inactive, hidden plane placed per `config`.
    pub fn from_config(config: &CuttingConfig) -> Self {
        Self {
            local_offset: config.plane_offset(),
            roll: 0.0,
            scale: config.plane_scale,
            mesh_half_extents: config.plane_half_extents,
            query_half_thickness: config.query_half_thickness,
            active: false,
            visible: false,
            collision_enabled: CollisionEnabled::NoCollision,
        }
    }

    pub fn roll(&self) -> f32 {
        self.roll
    }

    pub fn roll_degrees(&self) -> f32 {
        self.roll.to_degrees()
    }

    pub fn add_roll_degrees(&mut self, degrees: f32) {
        self.roll += degrees.to_radians();
    }

    pub fn reset_roll(&mut self) {
        self.roll = 0.0;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Rotation relative to the character. Positive roll tips the normal
    /// toward the character's right.
    pub fn relative_rotation(&self) -> Quat {
        Quat::from_axis_angle(Vec3::NEG_Z, self.roll)
    }

    pub fn relative_transform(&self) -> Transform {
        Transform::new(self.local_offset, self.relative_rotation(), self.scale)
    }

    pub fn world_transform(&self, actor: &Transform) -> Transform {
        actor.mul_transform(&self.relative_transform())
    }

    /// Plane normal in world space.
    pub fn up(&self, actor: &Transform) -> Vec3 {
        self.world_transform(actor).up()
    }

    /// World-space plane the next cut uses.
    pub fn slice_plane(&self, actor: &Transform) -> SlicePlane {
        let world = self.world_transform(actor);
        SlicePlane::new(world.translation, world.up())
    }

    /// Overlap half extents: the visual's extents with a thin normal axis,
    /// times the relative scale.
    pub fn query_half_extents(&self) -> Vec3 {
        Vec3::new(
            self.mesh_half_extents.x,
            self.query_half_thickness,
            self.mesh_half_extents.y,
        ) * self.scale
    }

    /// World-space box swept by the plane.
    pub fn query_volume(&self, actor: &Transform) -> CollisionBox {
        let world = self.world_transform(actor);
        CollisionBox::new(world.translation, world.rotation, self.query_half_extents())
    }
}
