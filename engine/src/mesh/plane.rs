//! Slice plane

use glam::{Vec2, Vec3};

use crate::world::Transform;

/// A plane given by a point on it and a unit normal.
///
/// The positive side is the half-space the normal points into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlicePlane {
    pub origin: Vec3,
    pub normal: Vec3,
}

impl SlicePlane {
    /// Create a plane; `normal` is normalized.
    ///
    /// A zero normal falls back to +Y with a warning. Use
    /// [`try_new`](Self::try_new) where a degenerate normal is expected.
    pub fn new(origin: Vec3, normal: Vec3) -> Self {
        Self::try_new(origin, normal).unwrap_or_else(|| {
            log::warn!("slice plane at {origin} has no usable normal, using +Y");
            Self {
                origin,
                normal: Vec3::Y,
            }
        })
    }

    /// Create a plane, `None` when `normal` cannot be normalized.
    pub fn try_new(origin: Vec3, normal: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            normal: normal.try_normalize()?,
        })
    }

    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - self.origin).dot(self.normal)
    }

    /// Express a world-space plane in the local space of `world`.
    ///
    /// `None` when the transform collapses the normal, which happens when
    /// `world` has zero scale along it.
    pub fn to_local(&self, world: &Transform) -> Option<SlicePlane> {
        SlicePlane::try_new(
            world.inverse_transform_point(self.origin),
            world.inverse_transform_normal(self.normal),
        )
    }

    /// Orthonormal in-plane axes `(u, v)` with `u × v = normal`.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let u = self.normal.any_orthonormal_vector();
        let v = self.normal.cross(u);
        (u, v)
    }

    /// Coordinates of `point` projected onto the plane in the [`basis`](Self::basis).
    pub fn project(&self, point: Vec3) -> Vec2 {
        let (u, v) = self.basis();
        let rel = point - self.origin;
        Vec2::new(rel.dot(u), rel.dot(v))
    }
}
