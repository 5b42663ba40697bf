//! Cutter Engine Library
//!
//! A third-person cutting controller: rigid props are converted on demand
//! into editable meshes and split along a plane into two simulated halves.
//! Rendering and the physics solver stay outside the crate; the scene talks
//! to them through the [`world::OverlapQuery`] and [`physics::PhysicsBackend`]
//! traits.
//!
//! # Modules
//!
//! - [`mesh`] - Rigid and dynamic meshes, conversion, slicing and capping
//! - [`physics`] - Body state, convex hulls, overlap math and the backend trait
//! - [`world`] - Scene graph, transforms, overlap queries and time dilation
//! - [`input`] - Key bindings and logical input events
//! - [`camera`] - Spring-arm rig and boom transitions
//! - [`player`] - Character movement
//! - [`game`] - Cut mode, the cutting plane, target dispatch and config
//!
//! # Example
//!
//! ```ignore
//! use cutter_engine::game::{CutterCharacter, CutterConfig};
//! use cutter_engine::input::{InputAction, InputEvent};
//! use cutter_engine::world::World;
//!
//! let mut world = World::new();
//! let mut character = CutterCharacter::spawn(&mut world, Vec3::ZERO, CutterConfig::default())?;
//!
//! character.handle_input(&mut world, InputEvent::triggered(InputAction::ToggleCut));
//! let report = character.handle_input(&mut world, InputEvent::triggered(InputAction::Cut));
//! character.tick(&mut world, 1.0 / 60.0);
//! ```

pub mod camera;
pub mod input;
pub mod mesh;
pub mod physics;
pub mod player;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

// Re-export the types most callers need at crate level
pub use game::{CutReport, CutterCharacter, CutterConfig};
pub use mesh::{DynamicMeshInstance, RigidMeshInstance, SlicePlane, slice_dynamic_mesh};
pub use player::MovementController;
pub use world::{Scene, World};
