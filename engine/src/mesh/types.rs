//! Editable mesh primitives
//!
//! Vertex and section types for runtime-editable meshes. Sections are
//! independent vertex/index buffers drawn with one material slot each.

use std::fmt;
use std::sync::Arc;

use glam::{Vec2, Vec3, Vec4};

use crate::physics::Aabb;

/// Shared handle to a material asset, compared by name.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct MaterialRef(Arc<str>);

impl MaterialRef {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for MaterialRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MaterialRef({})", self.0)
    }
}

/// Vertex of an editable mesh section.
///
/// Tangent (xyz + handedness in w) and color are optional per vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
    pub tangent: Option<Vec4>,
    pub color: Option<[u8; 4]>,
}

impl ProcVertex {
    pub fn new(position: Vec3, normal: Vec3, uv: Vec2) -> Self {
        Self {
            position,
            normal,
            uv,
            tangent: None,
            color: None,
        }
    }

    /// Interpolate every attribute at `t` from `self` towards `other`.
    ///
    /// Normals are renormalized; optional attributes survive only when both
    /// ends carry them.
    pub fn lerp(&self, other: &ProcVertex, t: f32) -> ProcVertex {
        let tangent = match (self.tangent, other.tangent) {
            (Some(a), Some(b)) => {
                let xyz = a.truncate().lerp(b.truncate(), t).normalize_or_zero();
                Some(xyz.extend(if t < 0.5 { a.w } else { b.w }))
            }
            _ => None,
        };
        let color = match (self.color, other.color) {
            (Some(a), Some(b)) => {
                let mut c = [0u8; 4];
                for i in 0..4 {
                    let v = a[i] as f32 + (b[i] as f32 - a[i] as f32) * t;
                    c[i] = v.round().clamp(0.0, 255.0) as u8;
                }
                Some(c)
            }
            _ => None,
        };
        ProcVertex {
            position: self.position.lerp(other.position, t),
            normal: self.normal.lerp(other.normal, t).normalize_or_zero(),
            uv: self.uv.lerp(other.uv, t),
            tangent,
            color,
        }
    }
}

/// One section of a dynamic mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshSection {
    pub vertices: Vec<ProcVertex>,
    /// Triangle list, three indices per triangle
    pub triangles: Vec<u32>,
    pub generates_collision: bool,
    pub visible: bool,
}

impl Default for MeshSection {
    fn default() -> Self {
        Self {
            vertices: Vec::new(),
            triangles: Vec::new(),
            generates_collision: false,
            visible: true,
        }
    }
}

impl MeshSection {
    pub fn new(vertices: Vec<ProcVertex>, triangles: Vec<u32>, generates_collision: bool) -> Self {
        Self {
            vertices,
            triangles,
            generates_collision,
            visible: true,
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Bounds of the vertices actually referenced by triangles.
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(
            self.triangles
                .iter()
                .filter_map(|&i| self.vertices.get(i as usize))
                .map(|v| v.position),
        )
    }

    /// Iterate triangles as index triples.
    pub fn triangle_indices(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.triangles.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }
}
