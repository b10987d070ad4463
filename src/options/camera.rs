use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which frame the lateral/vertical camera standoff is expressed in.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum StandoffFrame {
    /// Along the calibration basis's first two axes.
    #[default]
    Basis,
    /// Along world X and Y.
    World,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Initial pose and projection parameters.
pub struct CameraOptions {
    /// Offset of the camera from the reconstruction center along the first
    /// two standoff axes.
    pub standoff: [f32; 2],
    /// Frame the standoff is applied in.
    pub standoff_frame: StandoffFrame,
    /// Distance along the forward axis to the initial look target.
    #[schemars(title = "Target Distance", range(min = 0.01, max = 100.0))]
    pub target_distance: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            standoff: [1.0, 0.8],
            standoff_frame: StandoffFrame::Basis,
            target_distance: 1.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}
