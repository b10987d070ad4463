//! Shared fixtures and test doubles.

use std::cell::RefCell;
use std::io::Cursor;
use std::rc::Rc;

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::assets::AssetSource;
use crate::camera::core::CameraState;
use crate::engine::{Frame, MountPoint, RenderOutput};
use crate::error::ViewportError;
use crate::navigation::CommandChannel;
use crate::scene::material::Material;
use crate::scene::mesh::Geometry;
use crate::scene::{Node, ResourceId};

/// One triangle in the XY plane, facing +Z.
pub(crate) const TRIANGLE_PLY: &str = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
";

/// A 2×2 square at depth `z`, facing +Z.
pub(crate) fn front_wall(z: f32) -> Node {
    let positions = vec![
        Vec3::new(-1.0, -1.0, z),
        Vec3::new(1.0, -1.0, z),
        Vec3::new(1.0, 1.0, z),
        Vec3::new(-1.0, 1.0, z),
    ];
    Node::mesh(
        "wall",
        Geometry::new(positions, vec![0, 1, 2, 0, 2, 3]),
        Material::unlit([1.0, 1.0, 1.0]),
    )
}

/// Square-aspect camera on +Z looking at the origin.
pub(crate) fn looking_down_minus_z(distance: f32) -> CameraState {
    let mut camera = CameraState::new(Vec3::new(0.0, 0.0, distance), 45.0, 1.0, 0.1, 100.0);
    camera.look_at(Vec3::ZERO);
    camera
}

/// PNG-encoded opaque white image.
pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let image = image::RgbaImage::from_pixel(width, height, image::Rgba([255; 4]));
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

/// Asset source backed by an in-memory map.
#[derive(Debug, Default)]
pub(crate) struct MemorySource {
    assets: FxHashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub(crate) fn with(mut self, url: &str, bytes: Vec<u8>) -> Self {
        let _ = self.assets.insert(url.to_owned(), bytes);
        self
    }
}

impl AssetSource for MemorySource {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, ViewportError> {
        self.assets
            .get(url)
            .cloned()
            .ok_or_else(|| ViewportError::AssetFetch {
                url: url.to_owned(),
                reason: "not found".to_owned(),
            })
    }
}

/// Every command sent, in order.
#[derive(Debug, Default)]
pub(crate) struct RecordingChannel {
    pub(crate) commands: Vec<(String, serde_json::Value)>,
}

impl CommandChannel for RecordingChannel {
    fn run_command(
        &mut self,
        name: &str,
        payload: &serde_json::Value,
    ) -> Result<(), ViewportError> {
        self.commands.push((name.to_owned(), payload.clone()));
        Ok(())
    }
}

/// What a [`RecordingMount`] and its outputs have seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct MountLog {
    pub(crate) attached: usize,
    pub(crate) detached: usize,
    pub(crate) renders: usize,
    pub(crate) released: Vec<ResourceId>,
    pub(crate) resized: Option<(u32, u32)>,
}

/// Mount point that counts attach/detach and records frames.
#[derive(Debug, Default)]
pub(crate) struct RecordingMount {
    log: Rc<RefCell<MountLog>>,
    container_gone: bool,
}

impl RecordingMount {
    /// A mount whose container was removed by the host before teardown, so
    /// `detach` finds nothing attached.
    pub(crate) fn container_gone() -> Self {
        Self {
            container_gone: true,
            ..Self::default()
        }
    }

    pub(crate) fn log(&self) -> MountLog {
        self.log.borrow().clone()
    }
}

pub(crate) struct RecordingOutput {
    log: Rc<RefCell<MountLog>>,
}

impl MountPoint for RecordingMount {
    type Output = RecordingOutput;

    fn attach(&mut self, _width: u32, _height: u32) -> Result<RecordingOutput, ViewportError> {
        self.log.borrow_mut().attached += 1;
        Ok(RecordingOutput {
            log: Rc::clone(&self.log),
        })
    }

    fn detach(&mut self, _output: RecordingOutput) -> bool {
        self.log.borrow_mut().detached += 1;
        !self.container_gone
    }
}

impl RenderOutput for RecordingOutput {
    fn render(&mut self, _frame: &Frame<'_>) -> Result<(), ViewportError> {
        self.log.borrow_mut().renders += 1;
        Ok(())
    }

    fn release(&mut self, resources: &[ResourceId]) {
        self.log.borrow_mut().released.extend_from_slice(resources);
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.log.borrow_mut().resized = Some((width, height));
    }
}
