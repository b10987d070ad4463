use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Marker", inline)]
#[serde(default)]
/// Appearance of the picked-point marker.
pub struct MarkerOptions {
    /// Sphere radius in world units.
    #[schemars(title = "Radius", range(min = 0.001, max = 1.0))]
    pub radius: f32,
    /// Longitude and latitude segment count.
    #[schemars(skip)]
    pub segments: u32,
    /// Unlit marker color (sRGB).
    #[schemars(skip)]
    pub color: [f32; 3],
}

impl Default for MarkerOptions {
    fn default() -> Self {
        Self {
            radius: 0.01,
            segments: 32,
            color: [1.0, 0.0, 0.0],
        }
    }
}
