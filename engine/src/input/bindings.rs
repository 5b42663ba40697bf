//! Input Bindings Module
//!
//! Maps physical keys to logical actions and turns per-frame key and mouse
//! state into [`InputEvent`]s.

use std::collections::{HashMap, HashSet};

use glam::Vec2;

use super::action::{InputAction, InputEvent};

/// Generic key codes, independent of any windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    W,
    A,
    S,
    D,
    F,
    Space,
    MouseLeft,
}

/// Maps physical keys to logical actions.
///
/// Movement keys contribute a direction to the [`InputAction::Move`] axis
/// instead of owning an action of their own.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    key_to_action: HashMap<KeyCode, InputAction>,
    move_keys: HashMap<KeyCode, Vec2>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyBindings {
    /// Default bindings:
    /// - W/A/S/D = Move
    /// - Space = Jump
    /// - F = ToggleCut
    /// - Left mouse = Cut
    pub fn new() -> Self {
        let mut bindings = Self {
            key_to_action: HashMap::new(),
            move_keys: HashMap::new(),
        };
        bindings.bind(KeyCode::Space, InputAction::Jump);
        bindings.bind(KeyCode::F, InputAction::ToggleCut);
        bindings.bind(KeyCode::MouseLeft, InputAction::Cut);
        bindings.bind_move(KeyCode::W, Vec2::Y);
        bindings.bind_move(KeyCode::S, Vec2::NEG_Y);
        bindings.bind_move(KeyCode::A, Vec2::NEG_X);
        bindings.bind_move(KeyCode::D, Vec2::X);
        bindings
    }

    /// Bind a key to a button action, replacing any previous use of the key.
    pub fn bind(&mut self, key: KeyCode, action: InputAction) {
        self.move_keys.remove(&key);
        self.key_to_action.insert(key, action);
    }

    /// Bind a key to a direction of the move axis.
    pub fn bind_move(&mut self, key: KeyCode, direction: Vec2) {
        self.key_to_action.remove(&key);
        self.move_keys.insert(key, direction);
    }

    pub fn get_action(&self, key: KeyCode) -> Option<InputAction> {
        self.key_to_action.get(&key).copied()
    }

    /// Combined move axis for the held keys, clamped to unit length.
    pub fn move_axis(&self, held: &HashSet<KeyCode>) -> Vec2 {
        let axis: Vec2 = held.iter().filter_map(|k| self.move_keys.get(k)).sum();
        axis.clamp_length_max(1.0)
    }
}

/// Per-frame translation of raw key state into input events.
#[derive(Debug, Clone, Default)]
pub struct InputMapper {
    pub bindings: KeyBindings,
    held: HashSet<KeyCode>,
    just_pressed: Vec<KeyCode>,
    just_released: Vec<KeyCode>,
    mouse_delta: Vec2,
}

impl InputMapper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.held.insert(key) {
                self.just_pressed.push(key);
            }
        } else if self.held.remove(&key) {
            self.just_released.push(key);
        }
    }

    pub fn handle_mouse_motion(&mut self, delta: Vec2) {
        self.mouse_delta += delta;
    }

    pub fn is_held(&self, key: KeyCode) -> bool {
        self.held.contains(&key)
    }

    /// Drain this frame's events.
    ///
    /// Held button actions fire `Triggered` every frame and `Completed` on
    /// release, except cut and toggle which only fire on press.
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        let mut events = Vec::new();

        for key in self.just_pressed.drain(..) {
            if let Some(action @ (InputAction::Cut | InputAction::ToggleCut)) =
                self.bindings.get_action(key)
            {
                events.push(InputEvent::triggered(action));
            }
        }
        for &key in &self.held {
            if let Some(InputAction::Jump) = self.bindings.get_action(key) {
                events.push(InputEvent::triggered(InputAction::Jump));
            }
        }
        for key in self.just_released.drain(..) {
            if let Some(InputAction::Jump) = self.bindings.get_action(key) {
                events.push(InputEvent::completed(InputAction::Jump));
            }
        }

        let axis = self.bindings.move_axis(&self.held);
        if axis != Vec2::ZERO {
            events.push(InputEvent::axis(InputAction::Move, axis));
        }
        if self.mouse_delta != Vec2::ZERO {
            events.push(InputEvent::axis(InputAction::Look, self.mouse_delta));
            self.mouse_delta = Vec2::ZERO;
        }
        events
    }
}
