//! Primitive Meshes
//!
//! Small procedural shapes used to populate scenes with cuttable props.

use glam::{Vec2, Vec3};

use super::static_mesh::{LodResources, StaticMesh};

/// Axis-aligned box centered on the origin, 24 vertices with flat normals.
///
/// Triangles wind counter-clockwise when seen from outside.
pub fn box_lod(half_extents: Vec3) -> LodResources {
    let (hx, hy, hz) = (half_extents.x, half_extents.y, half_extents.z);

    let corners = [
        Vec3::new(-hx, -hy, -hz),
        Vec3::new(hx, -hy, -hz),
        Vec3::new(hx, hy, -hz),
        Vec3::new(-hx, hy, -hz),
        Vec3::new(-hx, -hy, hz),
        Vec3::new(hx, -hy, hz),
        Vec3::new(hx, hy, hz),
        Vec3::new(-hx, hy, hz),
    ];

    let faces = [
        ([0, 1, 2, 3], Vec3::NEG_Z),
        ([5, 4, 7, 6], Vec3::Z),
        ([4, 0, 3, 7], Vec3::NEG_X),
        ([1, 5, 6, 2], Vec3::X),
        ([3, 2, 6, 7], Vec3::Y),
        ([4, 5, 1, 0], Vec3::NEG_Y),
    ];
    let face_uvs = [
        Vec2::new(0.0, 0.0),
        Vec2::new(1.0, 0.0),
        Vec2::new(1.0, 1.0),
        Vec2::new(0.0, 1.0),
    ];

    let mut positions = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(24);
    let mut uvs = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);

    for (face_indices, normal) in &faces {
        let base = positions.len() as u32;
        for (corner, uv) in face_indices.iter().zip(face_uvs) {
            positions.push(corners[*corner]);
            normals.push(*normal);
            uvs.push(uv);
        }
        indices.extend_from_slice(&[base, base + 2, base + 1, base, base + 3, base + 2]);
    }

    LodResources::from_attributes(&positions, &normals, &uvs, indices)
}

/// Single-LOD box mesh.
pub fn box_mesh(name: &str, half_extents: Vec3) -> StaticMesh {
    StaticMesh::new(name, vec![box_lod(half_extents)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_winding_faces_outward() {
        let lod = box_lod(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(lod.num_vertices(), 24);
        assert_eq!(lod.indices.len(), 36);

        for tri in lod.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| lod.position(tri[k] as usize));
            let geometric = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(geometric.dot(centroid) > 0.0);
            let shading = lod.vertices[tri[0] as usize].normal();
            assert!(geometric.normalize().dot(shading) > 0.99);
        }
    }

    #[test]
    fn test_box_mesh_bounds() {
        let mesh = box_mesh("crate", Vec3::splat(0.5));
        let bounds = mesh.bounding_box().unwrap();
        assert_eq!(bounds.min, Vec3::splat(-0.5));
        assert_eq!(bounds.max, Vec3::splat(0.5));
    }
}
