//! Mesh Buffer Extractor
//!
//! Flattens the render buffers of every LOD into vertex/index arrays an
//! editable mesh section can take directly.
//!
//! - Vertex order is preserved; nothing is welded or reordered.
//! - All render sections of a LOD share its vertex buffer, so their index
//!   ranges are concatenated into one triangle list.
//! - Triangles referencing vertices outside the buffer are dropped.
//! - A mesh without render data yields nothing.

use super::static_mesh::{LodResources, StaticMesh};
use super::types::ProcVertex;

/// Flattened buffers of one LOD.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExtractedLod {
    pub vertices: Vec<ProcVertex>,
    pub triangles: Vec<u32>,
}

impl ExtractedLod {
    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }
}

/// Extract every LOD of `mesh`. Empty output means there is nothing to convert.
pub fn extract_lods(mesh: &StaticMesh) -> Vec<ExtractedLod> {
    let Some(render_data) = mesh.render_data.as_ref() else {
        log::debug!("static mesh '{}' has no render data", mesh.name);
        return Vec::new();
    };

    render_data
        .lods
        .iter()
        .enumerate()
        .map(|(lod_index, lod)| extract_lod(&mesh.name, lod_index, lod))
        .collect()
}

fn extract_lod(mesh_name: &str, lod_index: usize, lod: &LodResources) -> ExtractedLod {
    let vertex_count = lod.num_vertices();

    let vertices = (0..vertex_count)
        .map(|i| {
            let attributes = lod.vertices.get(i).copied().unwrap_or_default();
            ProcVertex::new(lod.position(i), attributes.normal(), attributes.uv())
        })
        .collect();

    let mut triangles = Vec::with_capacity(lod.indices.len());
    let mut dropped = 0usize;
    for section in &lod.sections {
        let start = section.first_index as usize;
        let end = start + section.num_triangles as usize * 3;
        let Some(range) = lod.indices.get(start..end) else {
            log::warn!(
                "'{mesh_name}' LOD {lod_index}: section range {start}..{end} exceeds index buffer ({})",
                lod.indices.len()
            );
            continue;
        };
        for tri in range.chunks_exact(3) {
            if tri.iter().all(|&i| (i as usize) < vertex_count) {
                triangles.extend_from_slice(tri);
            } else {
                dropped += 1;
            }
        }
    }

    if dropped > 0 {
        log::warn!("'{mesh_name}' LOD {lod_index}: dropped {dropped} triangle(s) with out-of-range indices");
    }

    ExtractedLod {
        vertices,
        triangles,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::static_mesh::RenderSection;
    use glam::{Vec2, Vec3};

    fn quad_lod() -> LodResources {
        let positions = [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, -1.0),
        ];
        let normals = [Vec3::Y; 4];
        let uvs = [Vec2::ZERO, Vec2::X, Vec2::ONE, Vec2::Y];
        LodResources::from_attributes(&positions, &normals, &uvs, vec![0, 1, 2, 0, 2, 3])
    }

    #[test]
    fn test_extract_preserves_vertex_order() {
        let mesh = StaticMesh::new("quad", vec![quad_lod()]);
        let lods = extract_lods(&mesh);
        assert_eq!(lods.len(), 1);
        assert_eq!(lods[0].vertices.len(), 4);
        assert_eq!(lods[0].vertices[2].position, Vec3::new(1.0, 0.0, -1.0));
        assert_eq!(lods[0].vertices[2].uv, Vec2::ONE);
        assert_eq!(lods[0].triangles, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn test_extract_concatenates_sections_without_duplicating_vertices() {
        let mut lod = quad_lod();
        lod.sections = vec![
            RenderSection {
                material_index: 0,
                first_index: 0,
                num_triangles: 1,
            },
            RenderSection {
                material_index: 1,
                first_index: 3,
                num_triangles: 1,
            },
        ];
        let lods = extract_lods(&StaticMesh::new("two-section quad", vec![lod]));
        assert_eq!(lods[0].vertices.len(), 4);
        assert_eq!(lods[0].triangle_count(), 2);
    }

    #[test]
    fn test_extract_drops_out_of_range_triangles() {
        let mut lod = quad_lod();
        lod.indices = vec![0, 1, 2, 0, 2, 9];
        let lods = extract_lods(&StaticMesh::new("bad", vec![lod]));
        assert_eq!(lods[0].triangles, vec![0, 1, 2]);
    }

    #[test]
    fn test_extract_without_render_data_is_empty() {
        assert!(extract_lods(&StaticMesh::without_render_data("none")).is_empty());
    }

    #[test]
    fn test_extract_every_lod() {
        let mesh = StaticMesh::new("lods", vec![quad_lod(), quad_lod(), quad_lod()]);
        assert_eq!(extract_lods(&mesh).len(), 3);
    }
}
