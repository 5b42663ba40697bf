//! Input Module
//!
//! Platform-agnostic input for the character: physical keys are mapped to
//! logical actions and delivered as [`InputEvent`]s. Nothing here depends on
//! a windowing system; hosts feed key and mouse state into an
//! [`InputMapper`] once per frame.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut mapper = InputMapper::new();
//! mapper.handle_key(KeyCode::F, true);
//! mapper.handle_mouse_motion(Vec2::new(4.0, 0.0));
//! for event in mapper.drain_events() {
//!     character.handle_input(&mut world, event);
//! }
//! ```

pub mod action;
pub mod bindings;

pub use action::{ActionValue, InputAction, InputEvent, TriggerEvent};
pub use bindings::{InputMapper, KeyBindings, KeyCode};
