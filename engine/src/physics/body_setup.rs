//! Simple collision geometry owned by a dynamic mesh.
//!
//! Hulls are always rebuilt wholesale, never patched in place.

use glam::Vec3;

use super::collision::Aabb;

/// How traces resolve against simple vs. complex (per-triangle) collision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CollisionTraceFlag {
    /// Simple collision for physics, complex for traces.
    #[default]
    Default,
    /// Simple collision for everything.
    UseSimpleAsComplex,
    /// Triangle collision for everything.
    UseComplexAsSimple,
}

/// A convex collision element defined by a point cloud.
///
/// The points are not reduced to their hull; the physics backend treats the
/// cloud as the hull definition.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConvexHull {
    pub points: Vec<Vec3>,
    /// Cached bounds of `points`
    pub elem_box: Option<Aabb>,
}

impl ConvexHull {
    pub fn from_points(points: Vec<Vec3>) -> Self {
        let mut hull = Self {
            points,
            elem_box: None,
        };
        hull.update_elem_box();
        hull
    }

    pub fn update_elem_box(&mut self) {
        self.elem_box = Aabb::from_points(self.points.iter().copied());
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Collision setup of one dynamic body.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BodySetup {
    pub convex_elems: Vec<ConvexHull>,
    pub collision_trace_flag: CollisionTraceFlag,
    pub use_complex_as_simple: bool,
}

impl BodySetup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn remove_simple_collision(&mut self) {
        self.convex_elems.clear();
    }

    pub fn hull_count(&self) -> usize {
        self.convex_elems.len()
    }
}
