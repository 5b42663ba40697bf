//! Physics module
//!
//! Body state, collision geometry and the injected solver interface for
//! cut pieces. No solver lives here: simulation is handed to whatever
//! implements [`PhysicsBackend`].
//!
//! # Unit System
//!
//! **1 unit = 1 meter** (SI units throughout)
//!
//! - Distances in meters
//! - Velocities in m/s
//! - Mass in kg
//!
//! # Submodules
//!
//! - [`body`] - Per-component body properties and the physics state copier
//! - [`body_setup`] - Convex hulls and collision trace settings
//! - [`collision`] - AABB / oriented box overlap tests
//! - [`backend`] - Solver interface and the recording [`BodyStore`]

pub mod backend;
pub mod body;
pub mod body_setup;
pub mod collision;

// Re-export commonly used types at the physics module level
pub use backend::{BodyStore, PhysicsBackend, PhysicsEvent, StoredBody};
pub use body::{
    BodyInstance, CollisionChannel, CollisionEnabled, CollisionResponse,
    CollisionResponseContainer, Mobility, copy_physics_state,
};
pub use body_setup::{BodySetup, CollisionTraceFlag, ConvexHull};
pub use collision::{Aabb, CollisionBox};
