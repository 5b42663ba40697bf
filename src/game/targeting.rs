//! Cut target detection and dispatch
//!
//! Finds everything the cutting plane's volume overlaps and cuts it. Rigid
//! meshes are converted first, dynamic meshes are sliced as they are.
//! Targets that cannot be cut are skipped and the remaining hits are still
//! processed.

use crate::mesh::{CapOption, SlicePlane, slice_dynamic_mesh};
use crate::physics::{CollisionBox, Mobility, PhysicsBackend};
use crate::world::{
    ComponentId, EntityId, ObjectQuery, OverlapQuery, QueryParams, SceneComponent, World,
};

use super::conversion::{ConversionError, convert_rigid};
use super::post_slice::finish_slice;

/// Everything one cut needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct CutRequest {
    pub volume: CollisionBox,
    pub plane: SlicePlane,
    /// Entity doing the cutting, never a target
    pub instigator: EntityId,
    pub impulse_magnitude: f32,
    pub cap_option: CapOption,
}

/// Why a hit was not cut.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    Immovable,
    NotAMesh,
    Conversion(ConversionError),
    /// Gone from the scene before it was reached
    Missing,
    /// The plane has no orientation in the target's local space
    DegeneratePlane,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedTarget {
    pub component: ComponentId,
    pub reason: SkipReason,
}

/// Two halves of one slice: `retained` kept the negative side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlicedPiece {
    pub entity: EntityId,
    pub retained: ComponentId,
    pub other: ComponentId,
}

/// Outcome of one cut.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CutReport {
    pub conversions: usize,
    pub slices: usize,
    pub skipped: Vec<SkippedTarget>,
    pub pieces: Vec<SlicedPiece>,
}

impl CutReport {
    pub fn is_empty(&self) -> bool {
        self.slices == 0
    }
}

/// Query the cut volume and slice every eligible hit, in query order.
pub fn cut_targets<Q: OverlapQuery, P: PhysicsBackend>(
    world: &mut World<Q, P>,
    request: &CutRequest,
) -> CutReport {
    let params = QueryParams::new().ignore_entity(request.instigator);
    let hits = world.overlap.overlap_multi_by_object_type(
        &world.scene,
        &request.volume,
        ObjectQuery::AllDynamicObjects,
        &params,
    );
    log::debug!("cut volume overlaps {} component(s)", hits.len());

    let mut report = CutReport::default();
    for hit in hits {
        let target = match resolve_target(world, hit.component, &mut report) {
            Ok(target) => target,
            Err(reason) => {
                log::debug!("skipping {}: {reason:?}", hit.component);
                report.skipped.push(SkippedTarget {
                    component: hit.component,
                    reason,
                });
                continue;
            }
        };

        match slice_target(world, target, request) {
            Ok(piece) => {
                report.slices += 1;
                report.pieces.push(piece);
            }
            Err(reason) => {
                log::debug!("skipping {target}: {reason:?}");
                report.skipped.push(SkippedTarget {
                    component: target,
                    reason,
                });
            }
        }
    }
    report
}

/// Dynamic mesh to slice for a hit, converting rigid meshes on the way.
fn resolve_target<Q, P: PhysicsBackend>(
    world: &mut World<Q, P>,
    component: ComponentId,
    report: &mut CutReport,
) -> Result<ComponentId, SkipReason> {
    let slot = world.scene.component(component).ok_or(SkipReason::Missing)?;
    let is_rigid = match &slot.component {
        SceneComponent::Node(_) => return Err(SkipReason::NotAMesh),
        SceneComponent::Rigid(_) => true,
        SceneComponent::Dynamic(_) => false,
    };
    if slot.component.mobility() == Mobility::Static {
        return Err(SkipReason::Immovable);
    }
    if !is_rigid {
        return Ok(component);
    }

    let converted = convert_rigid(world, component).map_err(SkipReason::Conversion)?;
    report.conversions += 1;
    Ok(converted)
}

fn slice_target<Q, P: PhysicsBackend>(
    world: &mut World<Q, P>,
    target: ComponentId,
    request: &CutRequest,
) -> Result<SlicedPiece, SkipReason> {
    let scene = &mut world.scene;
    let world_transform = scene.world_transform(target).ok_or(SkipReason::Missing)?;
    if request.plane.to_local(&world_transform).is_none() {
        return Err(SkipReason::DegeneratePlane);
    }
    let slot = scene.component(target).ok_or(SkipReason::Missing)?;
    let (owner, parent) = (slot.owner, slot.parent);
    let name = format!("{}_half", slot.name);

    let mesh = scene.dynamic_mesh_mut(target).ok_or(SkipReason::Missing)?;
    let cap_material = mesh.material(0).cloned();
    let other = slice_dynamic_mesh(
        mesh,
        &world_transform,
        &request.plane,
        request.cap_option,
        cap_material,
    );
    log::debug!(
        "sliced {target}: {} triangle(s) kept, {} moved",
        mesh.triangle_count(),
        other.triangle_count()
    );

    // The new half mirrors the sliced component's placement in the hierarchy.
    let inserted = match parent {
        Some(parent) => {
            scene.add_component(owner, &name, SceneComponent::Dynamic(other), Some(parent))
        }
        None => scene.add_detached_component(owner, &name, SceneComponent::Dynamic(other)),
    };
    let other_id = match inserted {
        Ok(id) => id,
        Err(err) => {
            log::warn!("could not insert the second half of {target}: {err}");
            return Err(SkipReason::Missing);
        }
    };

    if let Err(err) = finish_slice(
        scene,
        &mut world.physics,
        target,
        other_id,
        request.plane.normal,
        request.impulse_magnitude,
    ) {
        log::warn!("post-slice physics failed for {target}: {err}");
    }

    Ok(SlicedPiece {
        entity: owner,
        retained: target,
        other: other_id,
    })
}
