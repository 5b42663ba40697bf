//! World Module
//!
//! The scene graph, transforms, and the [`World`] bundle that ties the scene
//! to its injected collaborators (overlap query and physics backend) plus the
//! global time dilation.
//!
//! # Example
//!
//! ```ignore
//! let mut world = World::new();
//! let crate_entity = world.scene.spawn_entity("crate");
//! let id = world
//!     .scene
//!     .add_component(crate_entity, "mesh", SceneComponent::Rigid(rigid), None)?;
//! ```

pub mod query;
pub mod scene;
pub mod transform;

pub use query::{
    FixedOverlapQuery, ObjectQuery, OverlapQuery, OverlapResult, QueryParams, SceneOverlapQuery,
};
pub use scene::{ComponentId, ComponentSlot, Entity, EntityId, Scene, SceneComponent, SceneError};
pub use transform::Transform;

use crate::physics::BodyStore;

/// Scene plus the services game code talks to.
///
/// Fields are public so callers can borrow the scene and a service at the
/// same time.
#[derive(Debug)]
pub struct World<Q = SceneOverlapQuery, P = BodyStore> {
    pub scene: Scene,
    pub overlap: Q,
    pub physics: P,
    /// Global time scale, 1.0 is real time
    pub global_time_dilation: f32,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self::with_services(SceneOverlapQuery, BodyStore::new())
    }
}

impl<Q, P> World<Q, P> {
    pub fn with_services(overlap: Q, physics: P) -> Self {
        Self {
            scene: Scene::new(),
            overlap,
            physics,
            global_time_dilation: 1.0,
        }
    }

    pub fn set_global_time_dilation(&mut self, dilation: f32) {
        self.global_time_dilation = dilation.max(0.0);
    }

    /// Scale a real frame delta by the global time dilation.
    pub fn dilated_delta(&self, real_dt: f32) -> f32 {
        real_dt * self.global_time_dilation
    }
}
