//! Dynamic Mesh Builder
//!
//! Turns a rigid instance into an editable one: one section per LOD, with
//! only section 0 generating collision, plus the rigid instance's transform,
//! materials and mobility. Scene attachment is handled by the caller.

use super::dynamic::DynamicMeshInstance;
use super::extract::extract_lods;
use super::static_mesh::RigidMeshInstance;
use crate::physics::copy_physics_state;

/// Build the editable counterpart of `rigid`.
///
/// Returns `None` when the rigid instance has no mesh or the mesh has no
/// extractable LODs. On success the section count equals the LOD count.
pub fn build_dynamic_mesh(rigid: &RigidMeshInstance) -> Option<DynamicMeshInstance> {
    let mesh = rigid.mesh.as_ref()?;
    let lods = extract_lods(mesh);
    if lods.is_empty() {
        return None;
    }

    let mut dynamic = DynamicMeshInstance::new();
    dynamic.relative_transform = rigid.relative_transform;
    dynamic.mobility = rigid.mobility;
    for (index, material) in rigid.materials.iter().enumerate() {
        dynamic.set_material(index, material.clone());
    }

    for (lod_index, lod) in lods.into_iter().enumerate() {
        dynamic.create_mesh_section(lod_index, lod.vertices, lod.triangles, lod_index == 0);
    }

    log::debug!(
        "built dynamic mesh from '{}': {} section(s), {} triangle(s)",
        mesh.name,
        dynamic.num_sections(),
        dynamic.triangle_count()
    );
    Some(dynamic)
}

/// Copy body state from the rigid source and enable async cooking.
pub fn activate_physics(dynamic: &mut DynamicMeshInstance, rigid: &RigidMeshInstance) {
    copy_physics_state(&rigid.body, &mut dynamic.body);
    dynamic.use_async_cooking = true;
}
