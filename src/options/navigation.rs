use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Navigation", inline)]
#[serde(default)]
/// Orbit-to-image-index synchronization parameters.
pub struct NavigationOptions {
    /// Host command issued with the computed image index.
    pub command: String,
    /// Degrees of yaw per image index.
    #[schemars(title = "Step (degrees)", range(min = 0.5, max = 90.0))]
    pub step_degrees: f32,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            command: "jumpToImage".into(),
            step_degrees: 7.5,
        }
    }
}
