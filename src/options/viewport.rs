use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Viewport", inline)]
#[serde(default)]
/// Placement of the viewport inside the host's input surface.
pub struct ViewportOptions {
    /// Viewport width in pixels.
    pub width: u32,
    /// Viewport height in pixels.
    pub height: u32,
    /// Pixel offset of the viewport's top-left corner within the host's
    /// pointer coordinate space.
    pub origin: [f32; 2],
    /// Clear color (sRGB).
    #[schemars(skip)]
    pub background: [f32; 3],
}

impl ViewportOptions {
    /// Width over height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

impl Default for ViewportOptions {
    fn default() -> Self {
        Self {
            width: 248,
            height: 850,
            origin: [1920.0 - 248.0, 932.0 - 850.0],
            // #6F8FAF
            background: [0.435, 0.561, 0.686],
        }
    }
}
