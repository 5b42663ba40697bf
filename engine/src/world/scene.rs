//! Scene Graph
//!
//! Entities own components; components form a parent/child tree per entity
//! with one root. Relative transforms compose down the tree into world
//! transforms.
//!
//! Storage is ordered by id so iteration (and therefore overlap query
//! results) is deterministic.

use std::collections::BTreeMap;
use std::fmt;

use crate::mesh::{DynamicMeshInstance, RigidMeshInstance};
use crate::physics::{Aabb, BodyInstance, Mobility};
use crate::world::Transform;

/// Identifier of a scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Identifier of a scene component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub u32);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("unknown {0}")]
    UnknownEntity(EntityId),
    #[error("unknown {0}")]
    UnknownComponent(ComponentId),
    #[error("{component} does not belong to {entity}")]
    ForeignComponent {
        component: ComponentId,
        entity: EntityId,
    },
}

/// What a component is.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneComponent {
    /// Plain transform node (capsules, arms, attachment points)
    Node(Transform),
    Rigid(RigidMeshInstance),
    Dynamic(DynamicMeshInstance),
}

impl SceneComponent {
    pub fn relative_transform(&self) -> Transform {
        match self {
            SceneComponent::Node(t) => *t,
            SceneComponent::Rigid(m) => m.relative_transform,
            SceneComponent::Dynamic(m) => m.relative_transform,
        }
    }

    pub fn set_relative_transform(&mut self, transform: Transform) {
        match self {
            SceneComponent::Node(t) => *t = transform,
            SceneComponent::Rigid(m) => m.relative_transform = transform,
            SceneComponent::Dynamic(m) => m.relative_transform = transform,
        }
    }

    pub fn body(&self) -> Option<&BodyInstance> {
        match self {
            SceneComponent::Node(_) => None,
            SceneComponent::Rigid(m) => Some(&m.body),
            SceneComponent::Dynamic(m) => Some(&m.body),
        }
    }

    pub fn mobility(&self) -> Mobility {
        match self {
            SceneComponent::Node(_) => Mobility::Movable,
            SceneComponent::Rigid(m) => m.mobility,
            SceneComponent::Dynamic(m) => m.mobility,
        }
    }

    /// Local-space bounds of the component's geometry.
    pub fn local_bounds(&self) -> Option<Aabb> {
        match self {
            SceneComponent::Node(_) => None,
            SceneComponent::Rigid(m) => m.local_bounds(),
            SceneComponent::Dynamic(m) => m.local_bounds(),
        }
    }
}

/// A component placed in the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentSlot {
    pub owner: EntityId,
    pub parent: Option<ComponentId>,
    pub name: String,
    pub component: SceneComponent,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub name: String,
    pub root: Option<ComponentId>,
}

/// All entities and components.
#[derive(Debug, Default)]
pub struct Scene {
    entities: BTreeMap<EntityId, Entity>,
    components: BTreeMap<ComponentId, ComponentSlot>,
    next_entity: u32,
    next_component: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn_entity(&mut self, name: &str) -> EntityId {
        let id = EntityId(self.next_entity);
        self.next_entity += 1;
        self.entities.insert(
            id,
            Entity {
                name: name.to_string(),
                root: None,
            },
        );
        id
    }

    /// Add a component to `entity`.
    ///
    /// With no `parent` the component becomes the root if the entity has
    /// none yet, otherwise it is attached to the root.
    pub fn add_component(
        &mut self,
        entity: EntityId,
        name: &str,
        component: SceneComponent,
        parent: Option<ComponentId>,
    ) -> Result<ComponentId, SceneError> {
        let root = self.entity(entity)?.root;
        if let Some(parent) = parent {
            self.check_owner(parent, entity)?;
        }

        let id = ComponentId(self.next_component);
        self.next_component += 1;
        let parent = parent.or(root);
        self.components.insert(
            id,
            ComponentSlot {
                owner: entity,
                parent,
                name: name.to_string(),
                component,
            },
        );
        if root.is_none() {
            self.entity_mut(entity)?.root = Some(id);
        }
        Ok(id)
    }

    /// Add a component to `entity` without a parent.
    ///
    /// Its relative transform is its world transform. It only becomes the
    /// root when the entity has none.
    pub fn add_detached_component(
        &mut self,
        entity: EntityId,
        name: &str,
        component: SceneComponent,
    ) -> Result<ComponentId, SceneError> {
        let root = self.entity(entity)?.root;
        let id = ComponentId(self.next_component);
        self.next_component += 1;
        self.components.insert(
            id,
            ComponentSlot {
                owner: entity,
                parent: None,
                name: name.to_string(),
                component,
            },
        );
        if root.is_none() {
            self.entity_mut(entity)?.root = Some(id);
        }
        Ok(id)
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, SceneError> {
        self.entities.get(&id).ok_or(SceneError::UnknownEntity(id))
    }

    fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, SceneError> {
        self.entities.get_mut(&id).ok_or(SceneError::UnknownEntity(id))
    }

    pub fn root_of(&self, entity: EntityId) -> Option<ComponentId> {
        self.entities.get(&entity).and_then(|e| e.root)
    }

    pub fn component(&self, id: ComponentId) -> Option<&ComponentSlot> {
        self.components.get(&id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut ComponentSlot> {
        self.components.get_mut(&id)
    }

    pub fn contains(&self, id: ComponentId) -> bool {
        self.components.contains_key(&id)
    }

    pub fn dynamic_mesh(&self, id: ComponentId) -> Option<&DynamicMeshInstance> {
        match &self.components.get(&id)?.component {
            SceneComponent::Dynamic(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn dynamic_mesh_mut(&mut self, id: ComponentId) -> Option<&mut DynamicMeshInstance> {
        match &mut self.components.get_mut(&id)?.component {
            SceneComponent::Dynamic(mesh) => Some(mesh),
            _ => None,
        }
    }

    pub fn rigid_mesh(&self, id: ComponentId) -> Option<&RigidMeshInstance> {
        match &self.components.get(&id)?.component {
            SceneComponent::Rigid(mesh) => Some(mesh),
            _ => None,
        }
    }

    /// Every component in id order.
    pub fn components(&self) -> impl Iterator<Item = (ComponentId, &ComponentSlot)> {
        self.components.iter().map(|(id, slot)| (*id, slot))
    }

    pub fn components_of(&self, entity: EntityId) -> impl Iterator<Item = ComponentId> + '_ {
        self.components
            .iter()
            .filter(move |(_, slot)| slot.owner == entity)
            .map(|(id, _)| *id)
    }

    pub fn children_of(&self, parent: ComponentId) -> Vec<ComponentId> {
        self.components
            .iter()
            .filter(|(_, slot)| slot.parent == Some(parent))
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn dynamic_mesh_count(&self) -> usize {
        self.components
            .values()
            .filter(|slot| matches!(slot.component, SceneComponent::Dynamic(_)))
            .count()
    }

    /// World transform of a component, composed up its parent chain.
    pub fn world_transform(&self, id: ComponentId) -> Option<Transform> {
        let slot = self.components.get(&id)?;
        let relative = slot.component.relative_transform();
        match slot.parent {
            Some(parent) => Some(self.world_transform(parent)?.mul_transform(&relative)),
            None => Some(relative),
        }
    }

    /// World-space bounds of a component's geometry.
    pub fn world_bounds(&self, id: ComponentId) -> Option<Aabb> {
        let local = self.components.get(&id)?.component.local_bounds()?;
        Some(local.transformed(&self.world_transform(id)?))
    }

    /// Make `component` the root of `entity`.
    ///
    /// The previous root and its children are attached under the new root.
    pub fn set_root(&mut self, entity: EntityId, component: ComponentId) -> Result<(), SceneError> {
        self.check_owner(component, entity)?;
        let old_root = self.entity(entity)?.root;
        if old_root == Some(component) {
            return Ok(());
        }

        if let Some(old_root) = old_root {
            for child in self.children_of(old_root) {
                if let Some(slot) = self.components.get_mut(&child) {
                    slot.parent = Some(component);
                }
            }
            if let Some(slot) = self.components.get_mut(&old_root) {
                slot.parent = Some(component);
            }
        }
        if let Some(slot) = self.components.get_mut(&component) {
            slot.parent = None;
        }
        self.entity_mut(entity)?.root = Some(component);
        Ok(())
    }

    /// Remove one component.
    ///
    /// Its children move up to its parent. Removing a root promotes the
    /// lowest-id child to root.
    pub fn destroy_component(&mut self, id: ComponentId) -> Result<ComponentSlot, SceneError> {
        let slot = self
            .components
            .remove(&id)
            .ok_or(SceneError::UnknownComponent(id))?;
        let children = self.children_of(id);

        let new_parent = match slot.parent {
            Some(parent) => Some(parent),
            None => children.first().copied(),
        };
        for child in &children {
            if let Some(child_slot) = self.components.get_mut(child) {
                child_slot.parent = new_parent.filter(|p| p != child);
            }
        }

        if let Some(entity) = self.entities.get_mut(&slot.owner) {
            if entity.root == Some(id) {
                entity.root = new_parent.filter(|_| slot.parent.is_none());
            }
        }
        log::trace!("destroyed {id} ({})", slot.name);
        Ok(slot)
    }

    /// Remove an entity and every component it owns.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<Vec<ComponentId>, SceneError> {
        self.entities
            .remove(&id)
            .ok_or(SceneError::UnknownEntity(id))?;
        let owned: Vec<ComponentId> = self.components_of(id).collect();
        for component in &owned {
            self.components.remove(component);
        }
        Ok(owned)
    }

    fn check_owner(&self, component: ComponentId, entity: EntityId) -> Result<(), SceneError> {
        let slot = self
            .components
            .get(&component)
            .ok_or(SceneError::UnknownComponent(component))?;
        if slot.owner != entity {
            return Err(SceneError::ForeignComponent { component, entity });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn node(x: f32) -> SceneComponent {
        SceneComponent::Node(Transform::from_translation(Vec3::new(x, 0.0, 0.0)))
    }

    #[test]
    fn test_first_component_becomes_root() {
        let mut scene = Scene::new();
        let e = scene.spawn_entity("crate");
        let root = scene.add_component(e, "root", node(1.0), None).unwrap();
        let child = scene.add_component(e, "child", node(2.0), None).unwrap();
        assert_eq!(scene.root_of(e), Some(root));
        assert_eq!(scene.component(child).unwrap().parent, Some(root));
    }

    #[test]
    fn test_world_transform_composes_chain() {
        let mut scene = Scene::new();
        let e = scene.spawn_entity("crate");
        let root = scene.add_component(e, "root", node(1.0), None).unwrap();
        let child = scene.add_component(e, "child", node(2.0), Some(root)).unwrap();
        let leaf = scene.add_component(e, "leaf", node(3.0), Some(child)).unwrap();
        assert_eq!(scene.world_transform(leaf).unwrap().translation.x, 6.0);
    }

    #[test]
    fn test_set_root_moves_children() {
        let mut scene = Scene::new();
        let e = scene.spawn_entity("crate");
        let old = scene.add_component(e, "old", node(0.0), None).unwrap();
        let child = scene.add_component(e, "child", node(0.0), None).unwrap();
        let replacement = scene.add_component(e, "new", node(0.0), None).unwrap();

        scene.set_root(e, replacement).unwrap();
        assert_eq!(scene.root_of(e), Some(replacement));
        assert_eq!(scene.component(child).unwrap().parent, Some(replacement));
        assert_eq!(scene.component(old).unwrap().parent, Some(replacement));
        assert_eq!(scene.component(replacement).unwrap().parent, None);
    }

    #[test]
    fn test_destroy_component_reparents_children() {
        let mut scene = Scene::new();
        let e = scene.spawn_entity("crate");
        let root = scene.add_component(e, "root", node(0.0), None).unwrap();
        let mid = scene.add_component(e, "mid", node(0.0), Some(root)).unwrap();
        let leaf = scene.add_component(e, "leaf", node(0.0), Some(mid)).unwrap();

        scene.destroy_component(mid).unwrap();
        assert_eq!(scene.component(leaf).unwrap().parent, Some(root));
        assert_eq!(
            scene.destroy_component(mid),
            Err(SceneError::UnknownComponent(mid))
        );
    }

    #[test]
    fn test_destroy_root_promotes_child() {
        let mut scene = Scene::new();
        let e = scene.spawn_entity("crate");
        let root = scene.add_component(e, "root", node(0.0), None).unwrap();
        let a = scene.add_component(e, "a", node(0.0), None).unwrap();
        let b = scene.add_component(e, "b", node(0.0), None).unwrap();

        scene.destroy_component(root).unwrap();
        assert_eq!(scene.root_of(e), Some(a));
        assert_eq!(scene.component(a).unwrap().parent, None);
        assert_eq!(scene.component(b).unwrap().parent, Some(a));
    }

    #[test]
    fn test_foreign_parent_is_rejected() {
        let mut scene = Scene::new();
        let a = scene.spawn_entity("a");
        let b = scene.spawn_entity("b");
        let a_root = scene.add_component(a, "root", node(0.0), None).unwrap();
        let err = scene
            .add_component(b, "child", node(0.0), Some(a_root))
            .unwrap_err();
        assert_eq!(
            err,
            SceneError::ForeignComponent {
                component: a_root,
                entity: b
            }
        );
    }

    #[test]
    fn test_detached_component_keeps_world_pose() {
        let mut scene = Scene::new();
        let e = scene.spawn_entity("crate");
        let root = scene.add_component(e, "root", node(5.0), None).unwrap();
        let loose = scene.add_detached_component(e, "loose", node(2.0)).unwrap();
        assert_eq!(scene.root_of(e), Some(root));
        assert_eq!(scene.component(loose).unwrap().parent, None);
        assert_eq!(scene.world_transform(loose).unwrap().translation.x, 2.0);
    }

    #[test]
    fn test_destroy_entity_removes_components() {
        let mut scene = Scene::new();
        let e = scene.spawn_entity("crate");
        scene.add_component(e, "root", node(0.0), None).unwrap();
        scene.add_component(e, "child", node(0.0), None).unwrap();
        assert_eq!(scene.destroy_entity(e).unwrap().len(), 2);
        assert_eq!(scene.components().count(), 0);
        assert!(scene.entity(e).is_err());
    }
}
