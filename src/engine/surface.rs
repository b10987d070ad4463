//! Integration of loaded surface assets into the scene.

use glam::Vec3;

use crate::assets::AssetEvent;
use crate::scene::material::{Material, Shading, Texture};
use crate::scene::mesh::Geometry;
use crate::scene::{Node, NodeId, Scene};

/// The reconstructed surface: one mesh node plus a texture that may arrive
/// before or after it.
pub(crate) struct SurfaceAssets {
    node: Option<NodeId>,
    pending_texture: Option<Texture>,
    offset: Vec3,
    shading: Shading,
}

impl SurfaceAssets {
    pub(crate) fn new(offset: Vec3, shading: Shading) -> Self {
        Self {
            node: None,
            pending_texture: None,
            offset,
            shading,
        }
    }

    /// The surface mesh node, once its geometry has loaded.
    pub(crate) fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Apply one finished load. Failures are logged and leave the scene
    /// without the corresponding visual.
    pub(crate) fn apply(&mut self, scene: &mut Scene, event: AssetEvent) {
        match event {
            AssetEvent::Mesh { url, result } => match result {
                Ok(geometry) => {
                    log::info!(
                        "surface mesh loaded from {url} ({} triangles)",
                        geometry.triangle_count()
                    );
                    self.add_mesh(scene, geometry);
                }
                Err(e) => log::error!("surface mesh unavailable: {e}"),
            },
            AssetEvent::Texture { url, result } => match result {
                Ok(texture) => {
                    log::info!(
                        "surface texture loaded from {url} ({}x{})",
                        texture.width(),
                        texture.height()
                    );
                    self.bind_texture(scene, texture);
                }
                Err(e) => log::error!("surface texture unavailable: {e}"),
            },
        }
    }

    fn add_mesh(&mut self, scene: &mut Scene, geometry: Geometry) {
        if let Some(previous) = self.node.take() {
            let _ = scene.remove(previous);
        }
        let mut material = Material::surface(self.shading);
        if let Some(texture) = self.pending_texture.take() {
            let _ = material.set_map(texture);
        }
        self.node = Some(scene.add(
            Node::mesh("surface", geometry, material).with_translation(self.offset),
        ));
    }

    fn bind_texture(&mut self, scene: &mut Scene, texture: Texture) {
        let Some(mesh) = self.node.and_then(|node| scene.mesh_mut(node)) else {
            self.pending_texture = Some(texture);
            return;
        };
        if let Some(previous) = mesh.material.set_map(texture) {
            scene.release(previous.id());
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::error::ViewportError;

    fn triangle() -> Geometry {
        Geometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![0, 1, 2],
        )
    }

    fn texture() -> Texture {
        Texture::from_rgba8(1, 1, vec![255; 4]).unwrap()
    }

    fn mesh_event() -> AssetEvent {
        AssetEvent::Mesh {
            url: "mesh.ply".into(),
            result: Ok(triangle()),
        }
    }

    fn texture_event(texture: Texture) -> AssetEvent {
        AssetEvent::Texture {
            url: "texture.png".into(),
            result: Ok(texture),
        }
    }

    fn bound_texture(scene: &Scene, surface: &SurfaceAssets) -> Option<Texture> {
        let node = scene.node(surface.node()?)?;
        node.as_mesh()?.material.map().cloned()
    }

    #[test]
    fn texture_after_mesh_binds_immediately() {
        let mut scene = Scene::default();
        let mut surface = SurfaceAssets::new(Vec3::new(0.0, 1.0, -1.0), Shading::Unlit);
        surface.apply(&mut scene, mesh_event());
        let texture = texture();
        let id = texture.id();
        surface.apply(&mut scene, texture_event(texture));

        assert_eq!(bound_texture(&scene, &surface).map(|t| t.id()), Some(id));
        let world = scene.world_matrix(surface.node().unwrap()).unwrap();
        assert_eq!(world.w_axis.truncate(), Vec3::new(0.0, 1.0, -1.0));
    }

    #[test]
    fn texture_before_mesh_waits_for_it() {
        let mut scene = Scene::default();
        let mut surface = SurfaceAssets::new(Vec3::ZERO, Shading::Lit);
        let texture = texture();
        let id = texture.id();
        surface.apply(&mut scene, texture_event(texture));
        assert!(scene.is_empty());

        surface.apply(&mut scene, mesh_event());
        assert_eq!(bound_texture(&scene, &surface).map(|t| t.id()), Some(id));
        let mesh = scene.node(surface.node().unwrap()).unwrap().as_mesh().unwrap();
        assert_eq!(mesh.material.shading, Shading::Lit);
    }

    #[test]
    fn replaced_texture_is_released() {
        let mut scene = Scene::default();
        let mut surface = SurfaceAssets::new(Vec3::ZERO, Shading::Unlit);
        surface.apply(&mut scene, mesh_event());
        let first = texture();
        let first_id = first.id();
        surface.apply(&mut scene, texture_event(first));
        surface.apply(&mut scene, texture_event(texture()));
        assert_eq!(scene.take_released(), vec![first_id]);
    }

    #[test]
    fn failures_leave_scene_untouched() {
        let mut scene = Scene::default();
        let mut surface = SurfaceAssets::new(Vec3::ZERO, Shading::Unlit);
        surface.apply(
            &mut scene,
            AssetEvent::Mesh {
                url: "mesh.ply".into(),
                result: Err(ViewportError::AssetFetch {
                    url: "mesh.ply".into(),
                    reason: "connection refused".into(),
                }),
            },
        );
        assert!(scene.is_empty());
        assert!(surface.node().is_none());
    }
}
