//! Scene Transforms
//!
//! Translation / rotation / scale triple used for component-relative and
//! world-space placement. Composition follows the usual parent * child rule
//! without shear (non-uniform scale under rotation is approximated).
//!
//! Axis convention (matches the camera and movement code):
//! - +Y is up
//! - -Z is forward
//! - +X is right

use glam::{Mat3, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Rigid transform with per-axis scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// Identity transform (no translation, no rotation, unit scale).
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn new(translation: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            translation,
            rotation,
            scale,
        }
    }

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// 4x4 matrix equivalent of this transform.
    pub fn compute_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Linear (rotation * scale) part of the transform.
    pub fn linear(&self) -> Mat3 {
        Mat3::from_quat(self.rotation) * Mat3::from_diagonal(self.scale)
    }

    /// Compose `self` (parent) with a child-relative transform.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            translation: self.transform_point(child.translation),
            rotation: (self.rotation * child.rotation).normalize(),
            scale: self.scale * child.scale,
        }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.rotation * (self.scale * point) + self.translation
    }

    pub fn transform_vector(&self, vector: Vec3) -> Vec3 {
        self.rotation * (self.scale * vector)
    }

    /// Map a world-space point back into this transform's local space.
    ///
    /// Zero scale components collapse the point onto that axis.
    pub fn inverse_transform_point(&self, point: Vec3) -> Vec3 {
        let unrotated = self.rotation.inverse() * (point - self.translation);
        Vec3::new(
            safe_div(unrotated.x, self.scale.x),
            safe_div(unrotated.y, self.scale.y),
            safe_div(unrotated.z, self.scale.z),
        )
    }

    /// Map a world-space plane normal into local space.
    ///
    /// Normals transform with the inverse transpose, so going from world to
    /// local uses the transpose of the linear part.
    pub fn inverse_transform_normal(&self, normal: Vec3) -> Vec3 {
        (self.linear().transpose() * normal).normalize_or_zero()
    }

    /// Local +Y axis in world space.
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }
}

fn safe_div(value: f32, divisor: f32) -> f32 {
    if divisor.abs() > f32::EPSILON { value / divisor } else { 0.0 }
}
