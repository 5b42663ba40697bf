//! Mesh module
//!
//! Rigid meshes, runtime-editable meshes and the operations that move
//! geometry between them.
//!
//! # Pipeline
//!
//! ```text
//! RigidMeshInstance ──extract_lods──▶ ExtractedLod[]
//!                   ──build_dynamic_mesh──▶ DynamicMeshInstance
//!                   ──add_simple_collision──▶ one convex hull from section 0
//! DynamicMeshInstance ──slice_dynamic_mesh──▶ (retained, new half)
//! ```
//!
//! # Submodules
//!
//! - [`types`] - Vertex, section and material handle types
//! - [`static_mesh`] - Baked mesh assets and rigid instances
//! - [`dynamic`] - Editable mesh instances
//! - [`extract`] - LOD buffer flattening
//! - [`builder`] - Rigid to dynamic conversion
//! - [`collision`] - Convex hull regeneration
//! - [`plane`] - Slice plane math
//! - [`primitives`] - Procedural box meshes
//! - [`slice`] - Plane split
//! - [`cap`] - Cut loop triangulation

pub mod builder;
pub mod cap;
pub mod collision;
pub mod dynamic;
pub mod extract;
pub mod plane;
pub mod primitives;
pub mod slice;
pub mod static_mesh;
pub mod types;

pub use builder::{activate_physics, build_dynamic_mesh};
pub use cap::{CapGeometry, build_cap};
pub use collision::add_simple_collision;
pub use dynamic::DynamicMeshInstance;
pub use extract::{ExtractedLod, extract_lods};
pub use plane::SlicePlane;
pub use primitives::{box_lod, box_mesh};
pub use slice::{CapOption, PLANE_THICKNESS, slice_dynamic_mesh};
pub use static_mesh::{
    BufferError, LodResources, RenderData, RenderSection, RigidMeshInstance, StaticMesh,
    StaticMeshVertex,
};
pub use types::{MaterialRef, MeshSection, ProcVertex};
