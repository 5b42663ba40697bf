//! Cutting Configuration
//!
//! Cutting-plane placement and size, slice capping and the separation
//! impulse given to the two halves of every cut.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::mesh::CapOption;

/// Cut-mode tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingConfig {
    /// Velocity change given to each half along the plane normal (m/s)
    pub impulse_magnitude: f32,
    /// Plane distance in front of the character root (meters)
    pub plane_forward_offset: f32,
    /// Plane height above the character root (meters)
    pub plane_up_offset: f32,
    /// Half size of the plane visual in its own plane (right, forward)
    pub plane_half_extents: Vec2,
    /// Half thickness of the overlap volume along the plane normal
    pub query_half_thickness: f32,
    /// Relative scale of the plane
    pub plane_scale: Vec3,
    /// Roll added per look unit while aiming (degrees)
    pub roll_degrees_per_look_unit: f32,
    /// Global time dilation while aiming a cut
    pub time_dilation: f32,
    pub cap_option: CapOption,
}

impl Default for CuttingConfig {
    fn default() -> Self {
        Self {
            impulse_magnitude: 5.0,
            plane_forward_offset: 2.7,
            plane_up_offset: 0.4,
            plane_half_extents: Vec2::splat(0.5),
            query_half_thickness: 0.01,
            plane_scale: Vec3::new(3.0, 1.0, 3.0),
            roll_degrees_per_look_unit: 1.0,
            time_dilation: 0.1,
            cap_option: CapOption::default(),
        }
    }
}

impl CuttingConfig {
    /// Plane offset in character space (forward is -Z).
    pub fn plane_offset(&self) -> Vec3 {
        Vec3::new(0.0, self.plane_up_offset, -self.plane_forward_offset)
    }
}
