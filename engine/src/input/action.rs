//! Input actions and events
//!
//! Game code never sees keys: it receives [`InputEvent`]s carrying a logical
//! action, the trigger phase and the action value.

use glam::Vec2;

/// Logical actions the character responds to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    /// Jump (default: Space)
    Jump,
    /// 2D movement axis, x = right, y = forward (default: WASD)
    Move,
    /// 2D look axis, x = yaw, y = pitch (default: mouse)
    Look,
    /// Run a cut in cutting mode (default: left mouse button)
    Cut,
    /// Enter / leave cutting mode (default: F)
    ToggleCut,
}

/// Phase of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Fired every frame the action is active
    Triggered,
    /// Fired once when the action stops
    Completed,
}

/// Payload of an action.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ActionValue {
    #[default]
    None,
    Axis2D(Vec2),
}

impl ActionValue {
    /// Axis value, zero for valueless actions.
    pub fn axis2d(self) -> Vec2 {
        match self {
            ActionValue::Axis2D(v) => v,
            ActionValue::None => Vec2::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEvent {
    pub action: InputAction,
    pub trigger: TriggerEvent,
    pub value: ActionValue,
}

impl InputEvent {
    pub fn triggered(action: InputAction) -> Self {
        Self {
            action,
            trigger: TriggerEvent::Triggered,
            value: ActionValue::None,
        }
    }

    pub fn completed(action: InputAction) -> Self {
        Self {
            action,
            trigger: TriggerEvent::Completed,
            value: ActionValue::None,
        }
    }

    pub fn axis(action: InputAction, value: Vec2) -> Self {
        Self {
            action,
            trigger: TriggerEvent::Triggered,
            value: ActionValue::Axis2D(value),
        }
    }
}
