//! Slice Operator
//!
//! Splits a [`DynamicMeshInstance`] along a plane. The instance keeps the
//! geometry on the negative side of the plane and a new instance is returned
//! with the geometry on the positive side.
//!
//! # Classification
//!
//! Every vertex gets a signed distance to the (local-space) plane. Distances
//! within [`PLANE_THICKNESS`] count as on the plane. Per triangle:
//!
//! | Vertices                         | Goes to               |
//! |----------------------------------|-----------------------|
//! | no positive vertex               | retained instance     |
//! | no negative vertex, one positive | new instance          |
//! | negative and positive vertices   | clipped, both halves  |
//!
//! A triangle lying exactly on the plane therefore stays with the retained
//! instance.
//!
//! Straddling triangles are clipped into the polygon below and the polygon
//! above the plane. Intersection vertices are interpolated (position, normal,
//! UV, tangent, color) and cached per edge, so neighbouring triangles reuse
//! the same vertex and each half stays closed.
//!
//! # Example
//!
//! ```ignore
//! let plane = SlicePlane::new(cut_origin, cut_normal);
//! let other = slice_dynamic_mesh(
//!     &mut piece,
//!     &piece_world_transform,
//!     &plane,
//!     CapOption::CreateNewSectionForCap,
//!     piece.material(0).cloned(),
//! );
//! ```

use std::collections::HashMap;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::cap::{CapGeometry, build_cap};
use super::collision::add_simple_collision;
use super::dynamic::DynamicMeshInstance;
use super::plane::SlicePlane;
use super::types::{MaterialRef, MeshSection, ProcVertex};
use crate::physics::BodySetup;
use crate::world::Transform;

/// Distance from the plane within which a vertex counts as on it (meters).
pub const PLANE_THICKNESS: f32 = 1e-4;

/// Where cap triangles are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CapOption {
    /// Leave the cut open.
    NoCap,
    /// Append a dedicated cap section at the same index on both halves.
    #[default]
    CreateNewSectionForCap,
    /// Append cap triangles to the last existing section.
    UseLastSectionForCap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Negative,
    On,
    Positive,
}

fn classify(distance: f32) -> Side {
    if distance > PLANE_THICKNESS {
        Side::Positive
    } else if distance < -PLANE_THICKNESS {
        Side::Negative
    } else {
        Side::On
    }
}

/// Vertex of a clipped polygon: a source vertex or an edge crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PolyVert {
    Orig(u32),
    /// Crossing of the edge between two source vertices, smaller index first
    Edge(u32, u32),
}

impl PolyVert {
    fn edge(a: u32, b: u32) -> Self {
        PolyVert::Edge(a.min(b), a.max(b))
    }
}

/// Source section plus its per-vertex plane distances.
struct ClassifiedSection<'a> {
    vertices: &'a [ProcVertex],
    distances: Vec<f32>,
}

impl ClassifiedSection<'_> {
    fn side(&self, index: u32) -> Side {
        classify(self.distances[index as usize])
    }

    fn resolve(&self, vert: PolyVert) -> ProcVertex {
        match vert {
            PolyVert::Orig(i) => self.vertices[i as usize],
            PolyVert::Edge(a, b) => {
                // Interpolate from the lexicographically smaller end so split
                // vertices sharing an edge yield bit-identical crossings.
                let (pa, pb) = (
                    self.vertices[a as usize].position,
                    self.vertices[b as usize].position,
                );
                let (a, b) = if pb.to_array() < pa.to_array() {
                    (b, a)
                } else {
                    (a, b)
                };
                let (da, db) = (self.distances[a as usize], self.distances[b as usize]);
                let t = da / (da - db);
                self.vertices[a as usize].lerp(&self.vertices[b as usize], t)
            }
        }
    }
}

/// Output buffers of one half for one section.
#[derive(Default)]
struct HalfBuilder {
    vertices: Vec<ProcVertex>,
    triangles: Vec<u32>,
    remap: HashMap<PolyVert, u32>,
}

impl HalfBuilder {
    fn vertex(&mut self, source: &ClassifiedSection<'_>, vert: PolyVert) -> u32 {
        if let Some(&index) = self.remap.get(&vert) {
            return index;
        }
        let index = self.vertices.len() as u32;
        self.vertices.push(source.resolve(vert));
        self.remap.insert(vert, index);
        index
    }

    /// Fan-triangulate a convex polygon, preserving its winding.
    fn add_polygon(&mut self, source: &ClassifiedSection<'_>, polygon: &[PolyVert]) {
        if polygon.len() < 3 {
            return;
        }
        let first = self.vertex(source, polygon[0]);
        for pair in polygon[1..].windows(2) {
            let b = self.vertex(source, pair[0]);
            let c = self.vertex(source, pair[1]);
            self.triangles.extend_from_slice(&[first, b, c]);
        }
    }

    fn into_section(self, generates_collision: bool, visible: bool) -> MeshSection {
        let mut section = MeshSection::new(self.vertices, self.triangles, generates_collision);
        section.visible = visible;
        section
    }
}

/// Quantized unordered edge, used to match on-plane edges across halves.
type EdgeKey = ((i64, i64, i64), (i64, i64, i64));

fn edge_key(a: Vec3, b: Vec3) -> EdgeKey {
    let q = |p: Vec3| {
        let s = p / PLANE_THICKNESS;
        (s.x.round() as i64, s.y.round() as i64, s.z.round() as i64)
    };
    let (ka, kb) = (q(a), q(b));
    if ka <= kb { (ka, kb) } else { (kb, ka) }
}

/// Cut boundary collected while splitting.
#[derive(Default)]
struct CutBoundary {
    /// Segments through straddling triangles
    crossings: Vec<[Vec3; 2]>,
    /// Triangle edges lying on the plane, per side
    on_plane_negative: HashMap<EdgeKey, [Vec3; 2]>,
    on_plane_positive: HashMap<EdgeKey, [Vec3; 2]>,
}

impl CutBoundary {
    fn record_on_plane_edge(&mut self, source: &ClassifiedSection<'_>, tri: [u32; 3], side: Side) {
        let on: Vec<u32> = tri.iter().copied().filter(|&i| source.side(i) == Side::On).collect();
        if on.len() != 2 {
            return;
        }
        let a = source.vertices[on[0] as usize].position;
        let b = source.vertices[on[1] as usize].position;
        let map = match side {
            Side::Positive => &mut self.on_plane_positive,
            _ => &mut self.on_plane_negative,
        };
        map.insert(edge_key(a, b), [a, b]);
    }

    /// Crossing segments plus on-plane edges that separate the two halves.
    fn into_segments(mut self) -> Vec<[Vec3; 2]> {
        let mut shared: Vec<(EdgeKey, [Vec3; 2])> = self
            .on_plane_negative
            .into_iter()
            .filter(|(key, _)| self.on_plane_positive.contains_key(key))
            .collect();
        shared.sort_by(|a, b| a.0.cmp(&b.0));
        self.crossings.extend(shared.into_iter().map(|(_, seg)| seg));
        self.crossings
    }
}

/// Split one section, returning the negative and positive parts.
fn split_section(
    section: &MeshSection,
    plane: &SlicePlane,
    boundary: &mut CutBoundary,
) -> (MeshSection, MeshSection) {
    let source = ClassifiedSection {
        vertices: &section.vertices,
        distances: section
            .vertices
            .iter()
            .map(|v| plane.signed_distance(v.position))
            .collect(),
    };

    let mut negative = HalfBuilder::default();
    let mut positive = HalfBuilder::default();

    for tri in section.triangle_indices() {
        if tri.iter().any(|&i| i as usize >= section.vertices.len()) {
            continue;
        }
        let sides = tri.map(|i| source.side(i));
        let has_negative = sides.contains(&Side::Negative);
        let has_positive = sides.contains(&Side::Positive);

        if !has_positive {
            negative.add_polygon(&source, &tri.map(PolyVert::Orig));
            if has_negative {
                boundary.record_on_plane_edge(&source, tri, Side::Negative);
            }
            continue;
        }
        if !has_negative {
            positive.add_polygon(&source, &tri.map(PolyVert::Orig));
            boundary.record_on_plane_edge(&source, tri, Side::Positive);
            continue;
        }

        let mut below: Vec<PolyVert> = Vec::with_capacity(4);
        let mut above: Vec<PolyVert> = Vec::with_capacity(4);
        let mut cut_points: Vec<PolyVert> = Vec::with_capacity(2);
        for k in 0..3 {
            let (cur, next) = (tri[k], tri[(k + 1) % 3]);
            let (cur_side, next_side) = (sides[k], sides[(k + 1) % 3]);
            if cur_side != Side::Positive {
                below.push(PolyVert::Orig(cur));
            }
            if cur_side != Side::Negative {
                above.push(PolyVert::Orig(cur));
            }
            if cur_side == Side::On {
                cut_points.push(PolyVert::Orig(cur));
            }
            let crosses = matches!(
                (cur_side, next_side),
                (Side::Negative, Side::Positive) | (Side::Positive, Side::Negative)
            );
            if crosses {
                let crossing = PolyVert::edge(cur, next);
                below.push(crossing);
                above.push(crossing);
                cut_points.push(crossing);
            }
        }

        negative.add_polygon(&source, &below);
        positive.add_polygon(&source, &above);
        if let &[a, b] = cut_points.as_slice() {
            boundary
                .crossings
                .push([source.resolve(a).position, source.resolve(b).position]);
        }
    }

    (
        negative.into_section(section.generates_collision, section.visible),
        positive.into_section(section.generates_collision, section.visible),
    )
}

/// Turn cap geometry into a section facing `normal`.
fn cap_section(cap: &CapGeometry, plane: &SlicePlane, facing_positive: bool) -> MeshSection {
    let normal = if facing_positive {
        plane.normal
    } else {
        -plane.normal
    };
    let vertices = cap
        .positions
        .iter()
        .map(|&p| ProcVertex::new(p, normal, plane.project(p)))
        .collect();
    let triangles = if facing_positive {
        cap.triangles.clone()
    } else {
        cap.triangles
            .chunks_exact(3)
            .flat_map(|t| [t[0], t[2], t[1]])
            .collect()
    };
    MeshSection::new(vertices, triangles, false)
}

fn append_to_last_section(mesh: &mut DynamicMeshInstance, cap: MeshSection) {
    if mesh.sections.is_empty() {
        mesh.sections.push(MeshSection::default());
    }
    if let Some(last) = mesh.sections.last_mut() {
        let offset = last.vertices.len() as u32;
        last.vertices.extend(cap.vertices);
        last.triangles.extend(cap.triangles.iter().map(|i| i + offset));
    }
}

/// New instance carrying `sections` and everything else `mesh` owns except
/// its collision hulls.
fn counterpart(mesh: &DynamicMeshInstance, sections: Vec<MeshSection>) -> DynamicMeshInstance {
    DynamicMeshInstance {
        sections,
        materials: mesh.materials.clone(),
        relative_transform: mesh.relative_transform,
        body_setup: BodySetup {
            convex_elems: Vec::new(),
            collision_trace_flag: mesh.body_setup.collision_trace_flag,
            use_complex_as_simple: mesh.body_setup.use_complex_as_simple,
        },
        body: mesh.body.clone(),
        mobility: mesh.mobility,
        use_async_cooking: mesh.use_async_cooking,
    }
}

/// Slice `mesh` with a world-space `plane`.
///
/// `world` is the component's world transform, used to bring the plane into
/// local space. `mesh` keeps the negative side; the returned instance holds
/// the positive side, with the same section layout, materials, transform,
/// body and mobility. When the plane misses the mesh, or collapses under a
/// zero-scale `world`, the returned instance has no triangles. Both halves
/// get their collision hull rebuilt from section 0; pushing that to the
/// physics backend is up to the caller.
pub fn slice_dynamic_mesh(
    mesh: &mut DynamicMeshInstance,
    world: &Transform,
    plane: &SlicePlane,
    cap_option: CapOption,
    cap_material: Option<MaterialRef>,
) -> DynamicMeshInstance {
    let Some(local_plane) = plane.to_local(world) else {
        log::warn!("slice plane collapses in the component's local space, mesh left whole");
        let empty = mesh
            .sections
            .iter()
            .map(|s| MeshSection {
                generates_collision: s.generates_collision,
                visible: s.visible,
                ..MeshSection::default()
            })
            .collect();
        let mut other = counterpart(mesh, empty);
        add_simple_collision(&mut other);
        return other;
    };
    let mut boundary = CutBoundary::default();

    let (negative, positive): (Vec<MeshSection>, Vec<MeshSection>) = mesh
        .sections
        .iter()
        .map(|section| split_section(section, &local_plane, &mut boundary))
        .unzip();

    let mut other = counterpart(mesh, positive);
    mesh.sections = negative;

    let segments = boundary.into_segments();
    let cap = if cap_option == CapOption::NoCap || segments.is_empty() {
        CapGeometry::default()
    } else {
        build_cap(&segments, &local_plane)
    };

    if !cap.is_empty() {
        let retained_cap = cap_section(&cap, &local_plane, true);
        let other_cap = cap_section(&cap, &local_plane, false);
        match cap_option {
            CapOption::CreateNewSectionForCap => {
                let index = mesh.num_sections();
                mesh.create_mesh_section(index, retained_cap.vertices, retained_cap.triangles, false);
                other.create_mesh_section(index, other_cap.vertices, other_cap.triangles, false);
                mesh.set_material(index, cap_material.clone());
                other.set_material(index, cap_material);
            }
            CapOption::UseLastSectionForCap => {
                append_to_last_section(mesh, retained_cap);
                append_to_last_section(&mut other, other_cap);
            }
            CapOption::NoCap => {}
        }
    }

    add_simple_collision(mesh);
    add_simple_collision(&mut other);

    log::debug!(
        "slice: {} segment(s), {} cap loop(s); retained {} tri(s), new half {} tri(s)",
        segments.len(),
        cap.loop_count,
        mesh.triangle_count(),
        other.triangle_count()
    );
    if !other.has_geometry() || !mesh.has_geometry() {
        log::debug!("slice plane missed the mesh, one half is empty");
    }

    other
}
