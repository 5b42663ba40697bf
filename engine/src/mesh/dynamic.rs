//! Runtime-editable mesh instance.

use glam::Vec3;

use super::types::{MaterialRef, MeshSection, ProcVertex};
use crate::physics::{Aabb, BodyInstance, BodySetup, Mobility};
use crate::world::Transform;

/// An editable mesh made of sections, with its own collision and body state.
///
/// Invariant: when section 0 generates collision, `body_setup` holds exactly
/// one convex hull mirroring section 0's vertex positions (see
/// [`add_simple_collision`](super::add_simple_collision)).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DynamicMeshInstance {
    pub sections: Vec<MeshSection>,
    /// Material per section slot
    pub materials: Vec<Option<MaterialRef>>,
    pub relative_transform: Transform,
    pub body_setup: BodySetup,
    pub body: BodyInstance,
    pub mobility: Mobility,
    /// Allow the backend to cook collision off-thread
    pub use_async_cooking: bool,
}

impl DynamicMeshInstance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or replace the section at `index`, growing the list with
    /// empty sections as needed.
    pub fn create_mesh_section(
        &mut self,
        index: usize,
        vertices: Vec<ProcVertex>,
        triangles: Vec<u32>,
        generates_collision: bool,
    ) {
        if self.sections.len() <= index {
            self.sections.resize_with(index + 1, MeshSection::default);
        }
        self.sections[index] = MeshSection::new(vertices, triangles, generates_collision);
    }

    pub fn section(&self, index: usize) -> Option<&MeshSection> {
        self.sections.get(index)
    }

    pub fn num_sections(&self) -> usize {
        self.sections.len()
    }

    pub fn set_material(&mut self, index: usize, material: Option<MaterialRef>) {
        if self.materials.len() <= index {
            self.materials.resize(index + 1, None);
        }
        self.materials[index] = material;
    }

    pub fn material(&self, index: usize) -> Option<&MaterialRef> {
        self.materials.get(index).and_then(|m| m.as_ref())
    }

    pub fn triangle_count(&self) -> usize {
        self.sections.iter().map(MeshSection::triangle_count).sum()
    }

    pub fn vertex_count(&self) -> usize {
        self.sections.iter().map(|s| s.vertices.len()).sum()
    }

    pub fn has_geometry(&self) -> bool {
        self.sections.iter().any(|s| !s.is_empty())
    }

    /// Local-space bounds over every section, `None` when there is no geometry.
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.sections
            .iter()
            .filter_map(MeshSection::bounds)
            .reduce(|a, b| a.merge(&b))
    }

    /// Positions of section 0, the collision source.
    pub fn collision_positions(&self) -> Option<Vec<Vec3>> {
        self.sections.first().map(|s| s.positions().collect())
    }

    pub fn set_simulate_physics(&mut self, simulate: bool) {
        self.body.simulate_physics = simulate;
    }

    pub fn set_generate_overlap_events(&mut self, generate: bool) {
        self.body.generate_overlap_events = generate;
    }
}
