//! Cut mode
//!
//! The character is either walking around or aiming a cut.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CutMode {
    /// Walking, the camera follows the control rotation.
    #[default]
    Normal,
    /// Aiming, time is slowed and look input rolls the cutting plane.
    Cutting,
}

impl CutMode {
    pub fn toggled(self) -> Self {
        match self {
            CutMode::Normal => CutMode::Cutting,
            CutMode::Cutting => CutMode::Normal,
        }
    }

    pub fn is_cutting(self) -> bool {
        self == CutMode::Cutting
    }
}
