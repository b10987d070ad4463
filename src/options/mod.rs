//! Centralized viewport options with TOML file support.
//!
//! All tweakable settings (viewport placement, initial pose, orbit damping,
//! navigation step, marker style, asset sources, lighting) are consolidated
//! here. Options serialize to/from TOML.

mod assets;
mod camera;
mod lighting;
mod marker;
mod navigation;
mod orbit;
mod viewport;

use std::path::Path;

pub use assets::AssetOptions;
pub use camera::{CameraOptions, StandoffFrame};
pub use lighting::LightingOptions;
pub use marker::MarkerOptions;
pub use navigation::NavigationOptions;
pub use orbit::{OrbitOptions, OrbitPivot};
pub use viewport::ViewportOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewportError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[orbit]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Viewport size and placement.
    pub viewport: ViewportOptions,
    /// Initial camera pose and projection.
    pub camera: CameraOptions,
    /// Damped orbit interaction.
    pub orbit: OrbitOptions,
    /// Yaw-to-image-index navigation.
    pub navigation: NavigationOptions,
    /// Picked-point marker style.
    pub marker: MarkerOptions,
    /// Mesh and texture sources.
    pub assets: AssetOptions,
    /// Scene light.
    pub lighting: LightingOptions,
}

impl Options {
    /// Generate JSON Schema describing the options file.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewportError> {
        let content = std::fs::read_to_string(path).map_err(ViewportError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, ViewportError> {
        toml::from_str(content)
            .map_err(|e| ViewportError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), ViewportError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewportError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewportError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewportError::Io)
    }
}
