//! Surface materials and decoded textures.

use std::sync::Arc;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::ResourceId;

/// How a material responds to the scene light.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Shading {
    /// Base color (times texture) only; scene lighting is ignored.
    #[default]
    Unlit,
    /// Ambient plus Lambert diffuse from the scene light.
    Lit,
}

/// Which triangle faces are drawn and pickable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// Counter-clockwise faces only.
    #[default]
    Front,
    /// Both faces.
    Double,
}

/// Decoded RGBA8 image.
#[derive(Debug, Clone)]
pub struct Texture {
    id: ResourceId,
    width: u32,
    height: u32,
    pixels: Arc<[u8]>,
}

impl Texture {
    /// Wrap tightly packed RGBA8 rows. Returns `None` if the buffer length
    /// does not match the dimensions.
    #[must_use]
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        let expected = width as usize * height as usize * 4;
        (width > 0 && height > 0 && pixels.len() == expected).then(|| Self {
            id: ResourceId::next(),
            width,
            height,
            pixels: pixels.into(),
        })
    }

    /// GPU resource identity of this texture.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// RGBA8 pixel rows, top row first.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

/// Base color, optional texture map, shading model, and face side.
#[derive(Debug, Clone)]
pub struct Material {
    id: ResourceId,
    /// sRGB base color; multiplied with the texture when present.
    pub color: [f32; 3],
    map: Option<Texture>,
    /// Lighting response.
    pub shading: Shading,
    /// Face side used for drawing and picking.
    pub side: Side,
}

impl Material {
    /// A solid-color material unaffected by scene lighting.
    #[must_use]
    pub fn unlit(color: [f32; 3]) -> Self {
        Self {
            id: ResourceId::next(),
            color,
            map: None,
            shading: Shading::Unlit,
            side: Side::Front,
        }
    }

    /// A white material with the given shading, ready for a texture map.
    #[must_use]
    pub fn surface(shading: Shading) -> Self {
        Self {
            shading,
            ..Self::unlit([1.0, 1.0, 1.0])
        }
    }

    /// GPU resource identity of this material.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Bound texture map, if any.
    #[must_use]
    pub fn map(&self) -> Option<&Texture> {
        self.map.as_ref()
    }

    /// Bind a texture map. Returns the previously bound texture so the
    /// caller can release it.
    pub fn set_map(&mut self, texture: Texture) -> Option<Texture> {
        self.map.replace(texture)
    }

    /// Resource ids this material owns (itself plus its texture).
    pub(crate) fn resource_ids(&self) -> impl Iterator<Item = ResourceId> + '_ {
        std::iter::once(self.id).chain(self.map.iter().map(Texture::id))
    }
}
