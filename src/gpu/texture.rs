//! GPU textures: uploaded surface maps and the depth target.

use crate::scene::material::Texture;

/// Depth buffer format shared by the depth target and every pipeline.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// A sampled RGBA texture and its default view.
pub struct GpuTexture {
    /// The underlying GPU texture.
    pub texture: wgpu::Texture,
    /// A default full-texture view.
    pub view: wgpu::TextureView,
}

impl GpuTexture {
    /// Upload a decoded image as an sRGB texture.
    #[must_use]
    pub fn upload(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        image: &Texture,
    ) -> Self {
        Self::from_rgba8(
            device,
            queue,
            image.width(),
            image.height(),
            image.pixels(),
        )
    }

    /// Upload tightly packed RGBA8 rows.
    #[must_use]
    pub fn from_rgba8(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> Self {
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Surface Map"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            pixels,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// A 1×1 opaque white texture bound when a material has no map.
    #[must_use]
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::from_rgba8(device, queue, 1, 1, &[255; 4])
    }
}

/// Depth attachment sized to the surface.
pub struct DepthTarget {
    /// The depth texture.
    pub texture: wgpu::Texture,
    /// Attachment view.
    pub view: wgpu::TextureView,
}

impl DepthTarget {
    /// Create a depth target of `width`×`height` pixels.
    #[must_use]
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Target"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self { texture, view }
    }
}
