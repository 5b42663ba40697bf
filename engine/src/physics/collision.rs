//! Collision detection module
//!
//! Bounding volumes and the overlap tests used by the scene query:
//! axis-aligned boxes for component bounds and oriented boxes for the
//! cutting volume.
//!
//! # Oriented Box vs AABB
//!
//! The separating axis theorem is used: two convex boxes are disjoint iff
//! some axis among the 3 + 3 face normals and the 9 edge cross products
//! separates their projections.
//!
//! # Example
//!
//! ```ignore
//! use cutter_engine::physics::collision::{Aabb, CollisionBox};
//! use glam::{Quat, Vec3};
//!
//! let bounds = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
//! let volume = CollisionBox::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(2.0, 0.01, 2.0));
//! assert!(volume.intersects_aabb(&bounds));
//! ```

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::world::Transform;

/// Tolerance for near-parallel edge axes in the SAT test.
const AXIS_EPSILON: f32 = 1e-6;

// =============================================================================
// Aabb
// =============================================================================

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Smallest box containing every point, `None` for an empty set.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Vec3>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut aabb = Aabb::new(first, first);
        for p in iter {
            aabb.min = aabb.min.min(p);
            aabb.max = aabb.max.max(p);
        }
        Some(aabb)
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    pub fn merge(&self, other: &Aabb) -> Aabb {
        Aabb::new(self.min.min(other.min), self.max.max(other.max))
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.cmple(other.max).all() && self.max.cmpge(other.min).all()
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let (a, b) = (self.min, self.max);
        [
            Vec3::new(a.x, a.y, a.z),
            Vec3::new(b.x, a.y, a.z),
            Vec3::new(a.x, b.y, a.z),
            Vec3::new(b.x, b.y, a.z),
            Vec3::new(a.x, a.y, b.z),
            Vec3::new(b.x, a.y, b.z),
            Vec3::new(a.x, b.y, b.z),
            Vec3::new(b.x, b.y, b.z),
        ]
    }

    /// World-space AABB of this local box under `transform`.
    pub fn transformed(&self, transform: &Transform) -> Aabb {
        let corners = self.corners().map(|c| transform.transform_point(c));
        // Eight corners always yield a box.
        Aabb::from_points(corners).unwrap_or(*self)
    }
}

// =============================================================================
// CollisionBox - oriented query volume
// =============================================================================

/// Oriented box used as an overlap query shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionBox {
    pub center: Vec3,
    pub rotation: Quat,
    pub half_extents: Vec3,
}

impl CollisionBox {
    pub fn new(center: Vec3, rotation: Quat, half_extents: Vec3) -> Self {
        Self {
            center,
            rotation,
            half_extents: half_extents.abs(),
        }
    }

    /// Local axes of the box in world space.
    pub fn axes(&self) -> [Vec3; 3] {
        [
            self.rotation * Vec3::X,
            self.rotation * Vec3::Y,
            self.rotation * Vec3::Z,
        ]
    }

    /// Radius of the box projected onto `axis`.
    fn projected_radius(&self, axis: Vec3) -> f32 {
        let [ax, ay, az] = self.axes();
        self.half_extents.x * ax.dot(axis).abs()
            + self.half_extents.y * ay.dot(axis).abs()
            + self.half_extents.z * az.dot(axis).abs()
    }

    /// Separating-axis test against an axis-aligned box.
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        let aabb_center = aabb.center();
        let aabb_half = aabb.half_extents();
        let delta = aabb_center - self.center;
        let box_axes = self.axes();
        let world_axes = [Vec3::X, Vec3::Y, Vec3::Z];

        let separated_on = |axis: Vec3| -> bool {
            let length_sq = axis.length_squared();
            if length_sq < AXIS_EPSILON {
                return false;
            }
            let axis = axis / length_sq.sqrt();
            let aabb_radius = aabb_half.x * axis.x.abs()
                + aabb_half.y * axis.y.abs()
                + aabb_half.z * axis.z.abs();
            delta.dot(axis).abs() > self.projected_radius(axis) + aabb_radius
        };

        if world_axes.iter().any(|&a| separated_on(a)) {
            return false;
        }
        if box_axes.iter().any(|&a| separated_on(a)) {
            return false;
        }
        for &a in &box_axes {
            for &w in &world_axes {
                if separated_on(a.cross(w)) {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_4;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.0),
            Vec3::new(-1.0, 3.0, 0.5),
            Vec3::new(0.0, 0.0, -4.0),
        ])
        .unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
    }

    #[test]
    fn test_aabb_from_no_points() {
        assert!(Aabb::from_points(Vec::<Vec3>::new()).is_none());
    }

    #[test]
    fn test_aabb_transformed_by_translation() {
        let aabb = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let moved = aabb.transformed(&Transform::from_translation(Vec3::new(5.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vec3::new(4.0, -1.0, -1.0));
        assert_eq!(moved.max, Vec3::new(6.0, 1.0, 1.0));
    }

    #[test]
    fn test_thin_box_hits_cube() {
        let cube = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let slab = CollisionBox::new(Vec3::ZERO, Quat::IDENTITY, Vec3::new(2.0, 0.01, 2.0));
        assert!(slab.intersects_aabb(&cube));
    }

    #[test]
    fn test_thin_box_above_cube_misses() {
        let cube = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let slab = CollisionBox::new(Vec3::new(0.0, 1.5, 0.0), Quat::IDENTITY, Vec3::new(2.0, 0.01, 2.0));
        assert!(!slab.intersects_aabb(&cube));
    }

    #[test]
    fn test_rotated_box_separated_by_own_axis() {
        // World axes overlap here; only the diagonal axis separates the boxes.
        let cube = Aabb::new(Vec3::splat(-1.0), Vec3::splat(1.0));
        let rotated = CollisionBox::new(
            Vec3::new(1.9, 1.9, 0.0),
            Quat::from_rotation_z(FRAC_PI_4),
            Vec3::new(1.0, 1.0, 1.0),
        );
        assert!(!rotated.intersects_aabb(&cube));
    }
}
