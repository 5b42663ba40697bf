//! Rigid (baked) meshes
//!
//! A [`StaticMesh`] is shared, read-only geometry with per-LOD render buffers.
//! A [`RigidMeshInstance`] places one in the scene with materials, mobility
//! and body properties. Rigid instances are what the cutter converts into
//! editable [`DynamicMeshInstance`](super::DynamicMeshInstance)s.
//!
//! Render buffers mirror a GPU layout: a tightly packed position stream plus a
//! [`StaticMeshVertex`] stream carrying normal and UV. Asset collaborators can
//! hand those over as raw bytes via [`LodResources::from_raw`].

use std::sync::Arc;

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};

use super::types::MaterialRef;
use crate::physics::{Aabb, BodyInstance, Mobility};
use crate::world::Transform;

// ============================================================================
// RENDER BUFFERS
// ============================================================================

/// Non-position vertex attributes of a render LOD.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct StaticMeshVertex {
    /// Normal in xyz, tangent basis sign in w
    pub tangent_z: [f32; 4],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(StaticMeshVertex, [u8; 24]);

impl StaticMeshVertex {
    pub fn new(normal: Vec3, uv: Vec2) -> Self {
        Self {
            tangent_z: [normal.x, normal.y, normal.z, 1.0],
            uv: uv.to_array(),
        }
    }

    pub fn normal(&self) -> Vec3 {
        Vec3::new(self.tangent_z[0], self.tangent_z[1], self.tangent_z[2])
    }

    pub fn uv(&self) -> Vec2 {
        Vec2::from_array(self.uv)
    }
}

/// Range of the index buffer drawn with one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSection {
    pub material_index: u32,
    pub first_index: u32,
    pub num_triangles: u32,
}

/// Error decoding raw render buffers.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BufferError {
    #[error("{stream} buffer length {len} is not a multiple of {stride}")]
    Misaligned {
        stream: &'static str,
        len: usize,
        stride: usize,
    },
    #[error("position count {positions} does not match vertex count {vertices}")]
    CountMismatch { positions: usize, vertices: usize },
}

/// Render buffers of one level of detail.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LodResources {
    pub positions: Vec<[f32; 3]>,
    pub vertices: Vec<StaticMeshVertex>,
    pub indices: Vec<u32>,
    pub sections: Vec<RenderSection>,
}

impl LodResources {
    /// Build a single-section LOD from positions, normals, UVs and indices.
    pub fn from_attributes(
        positions: &[Vec3],
        normals: &[Vec3],
        uvs: &[Vec2],
        indices: Vec<u32>,
    ) -> Self {
        let vertices = positions
            .iter()
            .enumerate()
            .map(|(i, _)| {
                StaticMeshVertex::new(
                    normals.get(i).copied().unwrap_or(Vec3::Y),
                    uvs.get(i).copied().unwrap_or(Vec2::ZERO),
                )
            })
            .collect();
        let num_triangles = (indices.len() / 3) as u32;
        Self {
            positions: positions.iter().map(|p| p.to_array()).collect(),
            vertices,
            indices,
            sections: vec![RenderSection {
                material_index: 0,
                first_index: 0,
                num_triangles,
            }],
        }
    }

    /// Decode raw little-endian buffers as handed over by an asset loader.
    ///
    /// Byte slices need no particular alignment.
    pub fn from_raw(
        position_bytes: &[u8],
        vertex_bytes: &[u8],
        indices: Vec<u32>,
        sections: Vec<RenderSection>,
    ) -> Result<Self, BufferError> {
        let positions: Vec<[f32; 3]> = read_stream("position", position_bytes)?;
        let vertices: Vec<StaticMeshVertex> = read_stream("vertex", vertex_bytes)?;
        if positions.len() != vertices.len() {
            return Err(BufferError::CountMismatch {
                positions: positions.len(),
                vertices: vertices.len(),
            });
        }
        Ok(Self {
            positions,
            vertices,
            indices,
            sections,
        })
    }

    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    pub fn position(&self, index: usize) -> Vec3 {
        Vec3::from_array(self.positions[index])
    }
}

fn read_stream<T: Pod>(stream: &'static str, bytes: &[u8]) -> Result<Vec<T>, BufferError> {
    let stride = std::mem::size_of::<T>();
    if bytes.len() % stride != 0 {
        return Err(BufferError::Misaligned {
            stream,
            len: bytes.len(),
            stride,
        });
    }
    Ok(bytes
        .chunks_exact(stride)
        .map(bytemuck::pod_read_unaligned::<T>)
        .collect())
}

/// Baked render data: one entry per LOD, LOD 0 is the most detailed.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderData {
    pub lods: Vec<LodResources>,
}

/// Shared read-only mesh asset.
#[derive(Debug, Clone, PartialEq)]
pub struct StaticMesh {
    pub name: String,
    pub render_data: Option<RenderData>,
}

impl StaticMesh {
    pub fn new(name: &str, lods: Vec<LodResources>) -> Self {
        Self {
            name: name.to_string(),
            render_data: Some(RenderData { lods }),
        }
    }

    /// A mesh asset whose render data was never built.
    pub fn without_render_data(name: &str) -> Self {
        Self {
            name: name.to_string(),
            render_data: None,
        }
    }

    pub fn num_lods(&self) -> usize {
        self.render_data.as_ref().map_or(0, |r| r.lods.len())
    }

    /// Local bounds of LOD 0.
    pub fn bounding_box(&self) -> Option<Aabb> {
        let lod = self.render_data.as_ref()?.lods.first()?;
        Aabb::from_points(lod.positions.iter().map(|p| Vec3::from_array(*p)))
    }
}

// ============================================================================
// RIGID INSTANCE
// ============================================================================

/// A placed, non-editable mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct RigidMeshInstance {
    pub mesh: Option<Arc<StaticMesh>>,
    pub materials: Vec<Option<MaterialRef>>,
    pub relative_transform: Transform,
    pub mobility: Mobility,
    pub body: BodyInstance,
}

impl RigidMeshInstance {
    pub fn new(mesh: Arc<StaticMesh>) -> Self {
        Self {
            mesh: Some(mesh),
            materials: Vec::new(),
            relative_transform: Transform::IDENTITY,
            mobility: Mobility::Movable,
            body: BodyInstance::default(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.relative_transform = transform;
        self
    }

    pub fn with_mobility(mut self, mobility: Mobility) -> Self {
        self.mobility = mobility;
        self
    }

    pub fn with_materials(mut self, materials: Vec<Option<MaterialRef>>) -> Self {
        self.materials = materials;
        self
    }

    pub fn num_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn material(&self, index: usize) -> Option<&MaterialRef> {
        self.materials.get(index).and_then(|m| m.as_ref())
    }

    /// Local bounds of the referenced mesh.
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.mesh.as_ref().and_then(|m| m.bounding_box())
    }
}
