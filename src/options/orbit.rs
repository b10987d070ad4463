use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Point the orbit controller rotates the camera around.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum OrbitPivot {
    /// The initial look target (center + forward * target distance).
    #[default]
    LookTarget,
    /// The world origin.
    WorldOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Orbit", inline)]
#[serde(default)]
/// Damped orbit interaction parameters.
pub struct OrbitOptions {
    /// Smooth input over several frames instead of applying it at once.
    #[schemars(title = "Damping")]
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per frame.
    #[schemars(title = "Damping Factor", range(min = 0.01, max = 1.0))]
    pub damping_factor: f32,
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 4.0))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 4.0))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 4.0))]
    pub zoom_speed: f32,
    /// Closest the camera may dolly to the pivot.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest the camera may dolly from the pivot.
    #[schemars(skip)]
    pub max_distance: f32,
    /// Lower polar angle bound in radians.
    #[schemars(skip)]
    pub min_polar_angle: f32,
    /// Upper polar angle bound in radians.
    #[schemars(skip)]
    pub max_polar_angle: f32,
    /// Orbit pivot.
    pub pivot: OrbitPivot,
    /// Pointer travel in pixels before a press becomes a drag.
    #[schemars(skip)]
    pub drag_threshold: f32,
}

impl Default for OrbitOptions {
    fn default() -> Self {
        Self {
            enable_damping: true,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            min_distance: 0.0,
            max_distance: 1.0e6,
            min_polar_angle: 0.0,
            max_polar_angle: std::f32::consts::PI,
            pivot: OrbitPivot::LookTarget,
            drag_threshold: 3.0,
        }
    }
}
