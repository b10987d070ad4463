use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::scene::material::Shading;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Assets", inline)]
#[serde(default)]
/// Where the surface mesh and its texture come from.
pub struct AssetOptions {
    /// Texture image URL (`http(s)://`, `file://`, or a plain path).
    pub texture_url: String,
    /// PLY mesh URL (`http(s)://`, `file://`, or a plain path).
    pub mesh_url: String,
    /// Translation applied to the loaded mesh.
    pub mesh_offset: [f32; 3],
    /// Surface shading model.
    pub shading: Shading,
    /// Largest response body accepted from a remote source.
    #[schemars(skip)]
    pub max_bytes: u64,
}

impl Default for AssetOptions {
    fn default() -> Self {
        Self {
            texture_url: "http://localhost:8000/texture.png".into(),
            mesh_url: "http://localhost:8000/mesh.ply".into(),
            mesh_offset: [0.0, 1.0, -1.0],
            shading: Shading::Unlit,
            max_bytes: 512 * 1024 * 1024,
        }
    }
}
