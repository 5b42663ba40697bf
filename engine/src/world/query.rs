//! Overlap Queries
//!
//! The spatial index is an injected collaborator: anything implementing
//! [`OverlapQuery`] can answer "which components overlap this box". The
//! default [`SceneOverlapQuery`] brute-forces the scene, testing the query box
//! against every component's world bounds.

use std::collections::HashSet;

use super::scene::{ComponentId, EntityId, Scene};
use crate::physics::{CollisionBox, CollisionChannel};

/// Object-type filter of an overlap query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ObjectQuery {
    AllObjects,
    /// Everything typed on a dynamic object channel.
    #[default]
    AllDynamicObjects,
    AllStaticObjects,
}

impl ObjectQuery {
    pub fn matches(self, channel: CollisionChannel) -> bool {
        match self {
            ObjectQuery::AllObjects => true,
            ObjectQuery::AllDynamicObjects => channel.is_dynamic_object(),
            ObjectQuery::AllStaticObjects => channel == CollisionChannel::WorldStatic,
        }
    }
}

/// Extra query parameters.
#[derive(Debug, Clone, Default)]
pub struct QueryParams {
    pub ignored_entities: HashSet<EntityId>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ignore_entity(mut self, entity: EntityId) -> Self {
        self.ignored_entities.insert(entity);
        self
    }

    pub fn is_ignored(&self, entity: EntityId) -> bool {
        self.ignored_entities.contains(&entity)
    }
}

/// One overlapping component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlapResult {
    pub entity: EntityId,
    pub component: ComponentId,
}

/// Spatial overlap capability.
pub trait OverlapQuery {
    /// Components overlapping `volume`, filtered by object type and `params`.
    fn overlap_multi_by_object_type(
        &self,
        scene: &Scene,
        volume: &CollisionBox,
        objects: ObjectQuery,
        params: &QueryParams,
    ) -> Vec<OverlapResult>;
}

/// Brute-force query over the scene's components, in component id order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SceneOverlapQuery;

impl OverlapQuery for SceneOverlapQuery {
    fn overlap_multi_by_object_type(
        &self,
        scene: &Scene,
        volume: &CollisionBox,
        objects: ObjectQuery,
        params: &QueryParams,
    ) -> Vec<OverlapResult> {
        scene
            .components()
            .filter(|(_, slot)| !params.is_ignored(slot.owner))
            .filter(|(_, slot)| {
                slot.component.body().is_some_and(|body| {
                    body.collision_enabled.has_query() && objects.matches(body.object_type)
                })
            })
            .filter(|(id, _)| {
                scene
                    .world_bounds(*id)
                    .is_some_and(|bounds| volume.intersects_aabb(&bounds))
            })
            .map(|(component, slot)| OverlapResult {
                entity: slot.owner,
                component,
            })
            .collect()
    }
}

/// Fixed answer, regardless of the scene. Used to drive dispatch in tests.
#[derive(Debug, Clone, Default)]
pub struct FixedOverlapQuery {
    pub results: Vec<OverlapResult>,
}

impl OverlapQuery for FixedOverlapQuery {
    fn overlap_multi_by_object_type(
        &self,
        _scene: &Scene,
        _volume: &CollisionBox,
        _objects: ObjectQuery,
        params: &QueryParams,
    ) -> Vec<OverlapResult> {
        self.results
            .iter()
            .copied()
            .filter(|r| !params.is_ignored(r.entity))
            .collect()
    }
}
