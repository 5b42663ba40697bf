//! Collision Hull Generator
//!
//! Replaces a dynamic mesh's simple collision with a single convex hull
//! built from every vertex position of section 0.

use super::dynamic::DynamicMeshInstance;
use crate::physics::{CollisionTraceFlag, ConvexHull};

/// Install simple collision on `mesh` from section 0.
///
/// Returns `false` (and leaves the setup untouched) when there is no
/// section 0. The caller pushes the new setup to the physics backend.
pub fn add_simple_collision(mesh: &mut DynamicMeshInstance) -> bool {
    let Some(points) = mesh.collision_positions() else {
        return false;
    };

    let setup = &mut mesh.body_setup;
    setup.use_complex_as_simple = false;
    setup.collision_trace_flag = CollisionTraceFlag::UseSimpleAsComplex;
    setup.remove_simple_collision();
    setup.convex_elems.push(ConvexHull::from_points(points));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::types::ProcVertex;
    use glam::{Vec2, Vec3};

    fn vertex(p: Vec3) -> ProcVertex {
        ProcVertex::new(p, Vec3::Y, Vec2::ZERO)
    }

    #[test]
    fn test_hull_mirrors_section_zero() {
        let mut mesh = DynamicMeshInstance::new();
        mesh.create_mesh_section(
            0,
            vec![vertex(Vec3::ZERO), vertex(Vec3::X), vertex(Vec3::Y), vertex(Vec3::ONE)],
            vec![0, 1, 2],
            true,
        );
        mesh.create_mesh_section(1, vec![vertex(Vec3::splat(50.0))], vec![], false);

        assert!(add_simple_collision(&mut mesh));
        assert_eq!(mesh.body_setup.hull_count(), 1);
        // Unreferenced vertices are kept: no hull reduction.
        assert_eq!(mesh.body_setup.convex_elems[0].points.len(), 4);
        assert_eq!(
            mesh.body_setup.collision_trace_flag,
            CollisionTraceFlag::UseSimpleAsComplex
        );
        assert_eq!(mesh.body_setup.convex_elems[0].elem_box.unwrap().max, Vec3::ONE);
    }

    #[test]
    fn test_replaces_previous_hulls() {
        let mut mesh = DynamicMeshInstance::new();
        mesh.create_mesh_section(0, vec![vertex(Vec3::ZERO)], vec![], true);
        mesh.body_setup
            .convex_elems
            .push(ConvexHull::from_points(vec![Vec3::splat(9.0)]));
        mesh.body_setup
            .convex_elems
            .push(ConvexHull::from_points(vec![Vec3::splat(8.0)]));

        add_simple_collision(&mut mesh);
        assert_eq!(mesh.body_setup.hull_count(), 1);
        assert_eq!(mesh.body_setup.convex_elems[0].points, vec![Vec3::ZERO]);
    }

    #[test]
    fn test_without_sections_is_noop() {
        let mut mesh = DynamicMeshInstance::new();
        assert!(!add_simple_collision(&mut mesh));
        assert_eq!(mesh.body_setup.hull_count(), 0);
    }
}
