//! wgpu render output for the viewport scene.
//!
//! GPU copies are created lazily the first time a geometry or texture is
//! drawn and keyed by its [`ResourceId`], so the scene stays the only owner
//! of CPU data. Released ids drop their GPU copies; per-node uniforms are
//! pruned when a node stops being drawn.

use glam::{Mat4, Vec2, Vec3};
use rustc_hash::{FxHashMap, FxHashSet};
use wgpu::util::DeviceExt;

use super::pipeline_helpers::{self, create_mesh_pipeline};
use super::render_context::RenderContext;
use super::texture::{DepthTarget, GpuTexture};
use crate::camera::core::CameraUniform;
use crate::engine::{Frame, RenderOutput};
use crate::error::ViewportError;
use crate::scene::material::{Material, Shading, Side, Texture};
use crate::scene::mesh::Geometry;
use crate::scene::{NodeId, ResourceId};

/// Interleaved vertex: position, normal, texture coordinate.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SurfaceVertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate, V up.
    pub uv: [f32; 2],
}

impl SurfaceVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3, 2 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Interleave a geometry's attributes. Missing normals default to +Z and
/// missing texture coordinates to the origin.
#[must_use]
pub fn interleave(geometry: &Geometry) -> Vec<SurfaceVertex> {
    let normals = geometry.normals();
    let uvs = geometry.uvs();
    geometry
        .positions()
        .iter()
        .enumerate()
        .map(|(i, position)| SurfaceVertex {
            position: position.to_array(),
            normal: normals.get(i).copied().unwrap_or(Vec3::Z).to_array(),
            uv: uvs.get(i).copied().unwrap_or(Vec2::ZERO).to_array(),
        })
        .collect()
}

/// Per-node uniform.
///
/// WGSL layout:
///   model: mat4x4<f32>          (offset 0)
///   normal_matrix: mat4x4<f32>  (offset 64)
///   color: vec4<f32>            (offset 128, a = lit flag)
///   Total: 144 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    /// Local-to-world matrix.
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of `model`.
    pub normal_matrix: [[f32; 4]; 4],
    /// Linear base color; alpha carries the lit flag.
    pub color: [f32; 4],
}

impl ObjectUniform {
    /// Uniform for a mesh drawn at `world` with `material`.
    #[must_use]
    pub fn new(world: Mat4, material: &Material) -> Self {
        let [r, g, b] = material.color.map(srgb_to_linear);
        let lit = match material.shading {
            Shading::Unlit => 0.0,
            Shading::Lit => 1.0,
        };
        Self {
            model: world.to_cols_array_2d(),
            normal_matrix: world.inverse().transpose().to_cols_array_2d(),
            color: [r, g, b, lit],
        }
    }
}

/// sRGB-encoded channel to linear.
#[must_use]
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
}

struct GpuMap {
    _texture: GpuTexture,
    bind_group: wgpu::BindGroup,
}

struct ObjectSlot {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// One prepared draw call.
struct Draw {
    node: NodeId,
    geometry: ResourceId,
    map: Option<ResourceId>,
    side: Side,
}

/// Draws scene meshes into a window surface.
pub struct SurfaceRenderer {
    context: RenderContext,
    depth: DepthTarget,
    front_pipeline: wgpu::RenderPipeline,
    double_pipeline: wgpu::RenderPipeline,
    object_layout: wgpu::BindGroupLayout,
    map_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    white: GpuMap,
    meshes: FxHashMap<ResourceId, GpuMesh>,
    maps: FxHashMap<ResourceId, GpuMap>,
    objects: FxHashMap<NodeId, ObjectSlot>,
}

impl SurfaceRenderer {
    /// Create a renderer presenting to `window` at `size` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Gpu`] if the GPU context cannot be created.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
    ) -> Result<Self, ViewportError> {
        let context = RenderContext::new(window, size).await?;
        Ok(Self::with_context(context))
    }

    /// Create a renderer on an existing context.
    #[must_use]
    pub fn with_context(context: RenderContext) -> Self {
        let device = &context.device;
        let (width, height) = context.size();

        let camera_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Layout"),
                entries: &[pipeline_helpers::uniform_buffer(0)],
            });
        let object_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Layout"),
                entries: &[pipeline_helpers::uniform_buffer(0)],
            });
        let map_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Surface Map Layout"),
                entries: &[
                    pipeline_helpers::texture_2d(0),
                    pipeline_helpers::filtering_sampler(1),
                ],
            });

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Surface Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../../assets/shaders/surface.wgsl").into(),
                ),
            });
        let layouts = [&camera_layout, &object_layout, &map_layout];
        let front_pipeline = create_mesh_pipeline(
            device,
            "Surface Front",
            &shader,
            context.format(),
            Some(wgpu::Face::Back),
            SurfaceVertex::layout(),
            &layouts,
        );
        let double_pipeline = create_mesh_pipeline(
            device,
            "Surface Double",
            &shader,
            context.format(),
            None,
            SurfaceVertex::layout(),
            &layouts,
        );

        let sampler = pipeline_helpers::linear_sampler(device, "Surface Sampler");
        let white = Self::create_map(
            device,
            &map_layout,
            &sampler,
            GpuTexture::white(device, &context.queue),
        );
        let depth = DepthTarget::new(device, width, height);

        Self {
            context,
            depth,
            front_pipeline,
            double_pipeline,
            object_layout,
            map_layout,
            sampler,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            white,
            meshes: FxHashMap::default(),
            maps: FxHashMap::default(),
            objects: FxHashMap::default(),
        }
    }

    fn create_map(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        texture: GpuTexture,
    ) -> GpuMap {
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Surface Map Bind Group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
        });
        GpuMap {
            _texture: texture,
            bind_group,
        }
    }

    /// Number of geometries with a GPU copy.
    #[must_use]
    pub fn resident_meshes(&self) -> usize {
        self.meshes.len()
    }

    fn ensure_mesh(&mut self, geometry: &Geometry) {
        if self.meshes.contains_key(&geometry.id()) {
            return;
        }
        let device = &self.context.device;
        let vertices = interleave(geometry);
        let vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Surface Vertices"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Surface Indices"),
                contents: bytemuck::cast_slice(geometry.indices()),
                usage: wgpu::BufferUsages::INDEX,
            });
        let _ = self.meshes.insert(
            geometry.id(),
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: geometry.indices().len() as u32,
            },
        );
    }

    fn ensure_map(&mut self, texture: &Texture) {
        if self.maps.contains_key(&texture.id()) {
            return;
        }
        let gpu = GpuTexture::upload(
            &self.context.device,
            &self.context.queue,
            texture,
        );
        let map = Self::create_map(
            &self.context.device,
            &self.map_layout,
            &self.sampler,
            gpu,
        );
        let _ = self.maps.insert(texture.id(), map);
    }

    fn write_object(&mut self, node: NodeId, uniform: &ObjectUniform) {
        if let Some(slot) = self.objects.get(&node) {
            self.context.queue.write_buffer(
                &slot.buffer,
                0,
                bytemuck::cast_slice(std::slice::from_ref(uniform)),
            );
            return;
        }
        let device = &self.context.device;
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Object Buffer"),
            contents: bytemuck::cast_slice(std::slice::from_ref(uniform)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &self.object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        let _ = self.objects.insert(node, ObjectSlot { buffer, bind_group });
    }

    /// Upload whatever the frame needs and return its draw list.
    fn prepare(&mut self, frame: &Frame<'_>) -> Vec<Draw> {
        self.camera_uniform.update(
            frame.camera,
            frame.scene.light_position(),
            frame.ambient,
        );
        self.context.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );

        let renderables = frame.scene.renderables();
        let mut draws = Vec::with_capacity(renderables.len());
        for renderable in &renderables {
            let mesh = renderable.mesh;
            if mesh.geometry.indices().is_empty() {
                continue;
            }
            self.ensure_mesh(&mesh.geometry);
            if let Some(texture) = mesh.material.map() {
                self.ensure_map(texture);
            }
            self.write_object(
                renderable.node,
                &ObjectUniform::new(renderable.world, &mesh.material),
            );
            draws.push(Draw {
                node: renderable.node,
                geometry: mesh.geometry.id(),
                map: mesh.material.map().map(Texture::id),
                side: mesh.material.side,
            });
        }

        let drawn: FxHashSet<NodeId> = draws.iter().map(|d| d.node).collect();
        self.objects.retain(|node, _| drawn.contains(node));
        draws
    }
}

impl RenderOutput for SurfaceRenderer {
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), ViewportError> {
        let draws = self.prepare(frame);
        let Some(surface_texture) = self
            .context
            .acquire()
            .map_err(|e| ViewportError::Surface(e.to_string()))?
        else {
            return Ok(());
        };
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let [r, g, b] = frame.scene.background().map(srgb_to_linear);

        let mut encoder = self.context.create_encoder();
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Surface Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    depth_slice: None,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth.view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_bind_group(0, &self.camera_bind_group, &[]);

            for draw in &draws {
                let (Some(mesh), Some(object)) =
                    (self.meshes.get(&draw.geometry), self.objects.get(&draw.node))
                else {
                    continue;
                };
                let map = draw
                    .map
                    .and_then(|id| self.maps.get(&id))
                    .unwrap_or(&self.white);
                pass.set_pipeline(match draw.side {
                    Side::Front => &self.front_pipeline,
                    Side::Double => &self.double_pipeline,
                });
                pass.set_bind_group(1, &object.bind_group, &[]);
                pass.set_bind_group(2, &map.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(
                    mesh.index_buffer.slice(..),
                    wgpu::IndexFormat::Uint32,
                );
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
        self.context.submit(encoder);
        surface_texture.present();
        Ok(())
    }

    fn release(&mut self, resources: &[ResourceId]) {
        for id in resources {
            let _ = self.meshes.remove(id);
            let _ = self.maps.remove(id);
        }
        log::debug!(
            "released {} resources, {} meshes resident",
            resources.len(),
            self.meshes.len()
        );
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.context.resize(width, height);
        self.depth = DepthTarget::new(&self.context.device, width, height);
    }
}
