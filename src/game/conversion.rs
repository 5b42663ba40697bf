//! Rigid to dynamic conversion
//!
//! Replaces a rigid mesh component with an editable one in place. The new
//! component takes over the rigid one's place in the hierarchy, gets a
//! convex hull from its first section and inherits the rigid body's state.
//! The rigid component is destroyed afterwards.

use thiserror::Error;

use crate::mesh::{activate_physics, add_simple_collision, build_dynamic_mesh};
use crate::physics::{Mobility, PhysicsBackend};
use crate::world::{ComponentId, SceneComponent, SceneError, World};

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConversionError {
    #[error("{0} is not a rigid mesh")]
    NotRigid(ComponentId),
    #[error("{0} has static mobility")]
    Immovable(ComponentId),
    #[error("{0} has no extractable geometry")]
    MissingGeometry(ComponentId),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

/// Convert the rigid mesh `component` into a dynamic mesh component.
///
/// If the rigid mesh was its entity's root, the dynamic mesh becomes the
/// root; otherwise it is attached to the root with the same relative
/// transform. Returns the id of the new component.
pub fn convert_rigid<Q, P: PhysicsBackend>(
    world: &mut World<Q, P>,
    component: ComponentId,
) -> Result<ComponentId, ConversionError> {
    let scene = &mut world.scene;
    let slot = scene
        .component(component)
        .ok_or(SceneError::UnknownComponent(component))?;
    let SceneComponent::Rigid(rigid) = &slot.component else {
        return Err(ConversionError::NotRigid(component));
    };
    if rigid.mobility == Mobility::Static {
        return Err(ConversionError::Immovable(component));
    }

    let mut dynamic =
        build_dynamic_mesh(rigid).ok_or(ConversionError::MissingGeometry(component))?;
    add_simple_collision(&mut dynamic);
    activate_physics(&mut dynamic, rigid);

    let owner = slot.owner;
    let name = format!("{}_dynamic", slot.name);
    let was_root = scene.root_of(owner) == Some(component);

    let converted = scene.add_component(owner, &name, SceneComponent::Dynamic(dynamic), None)?;
    if was_root {
        scene.set_root(owner, converted)?;
    }
    scene.destroy_component(component)?;

    if let Some(mesh) = scene.dynamic_mesh(converted) {
        world.physics.recreate_physics_state(
            converted,
            &mesh.body_setup,
            &mesh.body,
            mesh.use_async_cooking,
        );
        log::debug!(
            "converted {component} into {converted} ({} section(s), {} hull point(s))",
            mesh.num_sections(),
            mesh.collision_positions().map_or(0, |p| p.len())
        );
    }
    world.physics.destroy_physics_state(component);
    Ok(converted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{RigidMeshInstance, StaticMesh, box_mesh};
    use crate::physics::{CollisionTraceFlag, PhysicsEvent};
    use crate::world::Transform;
    use glam::Vec3;
    use std::sync::Arc;

    fn crate_mesh() -> RigidMeshInstance {
        RigidMeshInstance::new(Arc::new(box_mesh("crate", Vec3::splat(0.5))))
    }

    #[test]
    fn test_root_rigid_mesh_is_replaced_as_root() {
        let mut world = World::new();
        let e = world.scene.spawn_entity("crate");
        let rigid = world
            .scene
            .add_component(
                e,
                "mesh",
                SceneComponent::Rigid(
                    crate_mesh().with_transform(Transform::from_translation(Vec3::new(0.0, 2.0, 0.0))),
                ),
                None,
            )
            .unwrap();
        let decal = world
            .scene
            .add_component(e, "decal", SceneComponent::Node(Transform::IDENTITY), None)
            .unwrap();

        let converted = convert_rigid(&mut world, rigid).unwrap();

        assert!(!world.scene.contains(rigid));
        assert_eq!(world.scene.root_of(e), Some(converted));
        assert_eq!(world.scene.component(decal).unwrap().parent, Some(converted));
        assert_eq!(
            world.scene.world_transform(converted).unwrap().translation,
            Vec3::new(0.0, 2.0, 0.0)
        );

        let mesh = world.scene.dynamic_mesh(converted).unwrap();
        assert_eq!(mesh.num_sections(), 1);
        assert_eq!(mesh.body_setup.hull_count(), 1);
        assert_eq!(mesh.body_setup.convex_elems[0].points.len(), 24);
        assert_eq!(
            mesh.body_setup.collision_trace_flag,
            CollisionTraceFlag::UseSimpleAsComplex
        );
        assert!(mesh.use_async_cooking);
        assert!(!mesh.body.generate_overlap_events);
    }

    #[test]
    fn test_child_rigid_mesh_attaches_to_root() {
        let mut world = World::new();
        let e = world.scene.spawn_entity("cart");
        let root = world
            .scene
            .add_component(e, "root", SceneComponent::Node(Transform::IDENTITY), None)
            .unwrap();
        let rigid = world
            .scene
            .add_component(e, "wheel", SceneComponent::Rigid(crate_mesh()), None)
            .unwrap();

        let converted = convert_rigid(&mut world, rigid).unwrap();
        assert_eq!(world.scene.root_of(e), Some(root));
        assert_eq!(world.scene.component(converted).unwrap().parent, Some(root));
        assert_eq!(world.scene.component(converted).unwrap().name, "wheel_dynamic");
    }

    #[test]
    fn test_backend_sees_recreate_and_destroy() {
        let mut world = World::new();
        let e = world.scene.spawn_entity("crate");
        let rigid = world
            .scene
            .add_component(e, "mesh", SceneComponent::Rigid(crate_mesh()), None)
            .unwrap();
        let converted = convert_rigid(&mut world, rigid).unwrap();

        assert_eq!(
            world.physics.events(),
            &[
                PhysicsEvent::Recreated {
                    component: converted,
                    hull_count: 1,
                    hull_points: 24,
                    simulate: false,
                    async_cook: true,
                },
                PhysicsEvent::Destroyed { component: rigid },
            ]
        );
    }

    #[test]
    fn test_static_mobility_is_refused() {
        let mut world = World::new();
        let e = world.scene.spawn_entity("wall");
        let rigid = world
            .scene
            .add_component(
                e,
                "mesh",
                SceneComponent::Rigid(crate_mesh().with_mobility(Mobility::Static)),
                None,
            )
            .unwrap();
        assert_eq!(
            convert_rigid(&mut world, rigid),
            Err(ConversionError::Immovable(rigid))
        );
        assert!(world.scene.contains(rigid));
        assert!(world.physics.events().is_empty());
    }

    #[test]
    fn test_mesh_without_render_data_is_refused() {
        let mut world = World::new();
        let e = world.scene.spawn_entity("ghost");
        let rigid = world
            .scene
            .add_component(
                e,
                "mesh",
                SceneComponent::Rigid(RigidMeshInstance::new(Arc::new(
                    StaticMesh::without_render_data("ghost"),
                ))),
                None,
            )
            .unwrap();
        assert_eq!(
            convert_rigid(&mut world, rigid),
            Err(ConversionError::MissingGeometry(rigid))
        );
    }

    #[test]
    fn test_non_rigid_component_is_refused() {
        let mut world = World::new();
        let e = world.scene.spawn_entity("empty");
        let node = world
            .scene
            .add_component(e, "root", SceneComponent::Node(Transform::IDENTITY), None)
            .unwrap();
        assert_eq!(
            convert_rigid(&mut world, node),
            Err(ConversionError::NotRigid(node))
        );
        assert_eq!(
            convert_rigid(&mut world, ComponentId(99)),
            Err(ConversionError::Scene(SceneError::UnknownComponent(
                ComponentId(99)
            )))
        );
    }
}
