//! Post-slice physics
//!
//! After a split both halves simulate, stop generating overlap events and
//! are pushed apart along the cut normal: the retained half along `+normal`,
//! the new half along `-normal`. Impulses are velocity changes, so the
//! separation speed does not depend on the mass of each piece.

use glam::Vec3;

use crate::physics::PhysicsBackend;
use crate::world::{ComponentId, Scene, SceneError};

/// Hand both halves of a cut over to the physics backend.
pub fn finish_slice<P: PhysicsBackend>(
    scene: &mut Scene,
    physics: &mut P,
    retained: ComponentId,
    other: ComponentId,
    normal: Vec3,
    impulse_magnitude: f32,
) -> Result<(), SceneError> {
    for (component, direction) in [(retained, normal), (other, -normal)] {
        let mesh = scene
            .dynamic_mesh_mut(component)
            .ok_or(SceneError::UnknownComponent(component))?;
        mesh.set_simulate_physics(true);
        mesh.set_generate_overlap_events(false);
        physics.recreate_physics_state(
            component,
            &mesh.body_setup,
            &mesh.body,
            mesh.use_async_cooking,
        );
        physics.add_impulse(component, direction * impulse_magnitude, true);
    }
    Ok(())
}
