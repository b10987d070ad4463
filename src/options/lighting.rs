use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Lighting", inline)]
#[serde(default)]
/// Scene light used by lit surfaces. Unlit materials ignore it.
pub struct LightingOptions {
    /// Point light position in world space.
    pub position: [f32; 3],
    /// Ambient floor applied before the diffuse term.
    #[schemars(title = "Ambient", range(min = 0.0, max = 1.0))]
    pub ambient: f32,
}

impl Default for LightingOptions {
    fn default() -> Self {
        Self {
            position: [20.0, 20.0, 20.0],
            ambient: 0.3,
        }
    }
}
