//! Click-to-surface picking with a single owned marker.

use glam::{Vec2, Vec3};

use super::ray::ViewportGeometry;
use crate::camera::core::CameraState;
use crate::options::MarkerOptions;
use crate::scene::material::Material;
use crate::scene::mesh_gen::uv_sphere;
use crate::scene::{Node, NodeId, Scene};

/// The one picked point currently shown in the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    /// Scene node holding the marker sphere.
    pub node: NodeId,
    /// World-space position (the intersection point).
    pub position: Vec3,
}

/// Converts clicks into surface points and keeps at most one marker.
pub struct SurfacePicker {
    viewport: ViewportGeometry,
    style: MarkerOptions,
    marker: Option<Marker>,
}

impl SurfacePicker {
    /// Create a picker for a viewport placed at `viewport`.
    #[must_use]
    pub fn new(viewport: ViewportGeometry, style: MarkerOptions) -> Self {
        Self {
            viewport,
            style,
            marker: None,
        }
    }

    /// The current marker, if any.
    #[must_use]
    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Viewport placement used for NDC remapping.
    #[must_use]
    pub fn viewport(&self) -> &ViewportGeometry {
        &self.viewport
    }

    /// Track a viewport move or resize.
    pub fn set_viewport(&mut self, viewport: ViewportGeometry) {
        self.viewport = viewport;
    }

    /// Pick the nearest surface under an absolute pointer position and move
    /// the marker there.
    ///
    /// Returns the new marker position, or `None` (leaving any existing
    /// marker untouched) when the click is outside the viewport or the ray
    /// hits nothing, including when no surface has loaded yet.
    pub fn pick(
        &mut self,
        screen: Vec2,
        camera: &CameraState,
        scene: &mut Scene,
    ) -> Option<Vec3> {
        if !self.viewport.contains(screen) {
            return None;
        }
        let ndc = self.viewport.to_ndc(screen);
        let ray = camera.ray_through(ndc);
        let hit = scene.raycast(&ray).into_iter().next()?;
        log::debug!(
            "picked {:?} at {:.4} (distance {:.4})",
            hit.node,
            hit.point,
            hit.distance
        );
        Some(self.place_marker(scene, hit.point).position)
    }

    /// Replace the marker with a new one at `position`.
    ///
    /// The previous marker is detached and its resources released before the
    /// new one is created, so the scene never holds two.
    pub fn place_marker(&mut self, scene: &mut Scene, position: Vec3) -> Marker {
        let _ = self.clear(scene);

        let geometry = uv_sphere(
            self.style.radius,
            self.style.segments,
            self.style.segments,
        );
        let node = scene.add(
            Node::mesh("marker", geometry, Material::unlit(self.style.color))
                .with_translation(position)
                .with_pickable(false),
        );
        let marker = Marker { node, position };
        self.marker = Some(marker);
        marker
    }

    /// Remove the marker, if any. Returns whether one existed.
    pub fn clear(&mut self, scene: &mut Scene) -> bool {
        self.marker
            .take()
            .is_some_and(|previous| scene.remove(previous.node))
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::scene::material::Shading;
    use crate::testing::{front_wall, looking_down_minus_z};

    fn picker() -> SurfacePicker {
        SurfacePicker::new(
            ViewportGeometry::new(Vec2::ZERO, 200, 200),
            MarkerOptions::default(),
        )
    }

    fn scene_with_wall() -> (Scene, NodeId) {
        let mut scene = Scene::default();
        let wall = scene.add(front_wall(0.0));
        (scene, wall)
    }

    #[test]
    fn center_click_marks_surface_under_camera() {
        let (mut scene, _) = scene_with_wall();
        let camera = looking_down_minus_z(5.0);
        let mut picker = picker();

        let point = picker
            .pick(Vec2::new(100.0, 100.0), &camera, &mut scene)
            .unwrap();
        assert_relative_eq!(point.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(point.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(point.z, 0.0, epsilon = 1e-4);

        let marker = picker.marker().unwrap();
        let node = scene.node(marker.node).unwrap();
        assert_eq!(node.transform.translation, point);
        let material = &node.as_mesh().unwrap().material;
        assert_eq!(material.shading, Shading::Unlit);
        assert_eq!(material.color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn repeated_picks_keep_exactly_one_marker() {
        let (mut scene, wall) = scene_with_wall();
        let camera = looking_down_minus_z(5.0);
        let mut picker = picker();
        let mut previous: Option<Marker> = None;

        for (i, x) in [60.0, 80.0, 100.0, 120.0, 140.0].into_iter().enumerate() {
            let point = picker
                .pick(Vec2::new(x, 100.0), &camera, &mut scene)
                .unwrap();
            let marker = *picker.marker().unwrap();
            assert_eq!(marker.position, point);

            // wall + the single marker
            assert_eq!(scene.len(), 2, "after pick {i}");
            assert!(scene.contains(wall));
            assert!(scene.contains(marker.node));

            let released = scene.take_released();
            if let Some(old) = previous {
                assert!(!scene.contains(old.node));
                let old_node_resources = released.len();
                assert_eq!(old_node_resources, 2, "geometry + material");
            } else {
                assert!(released.is_empty());
            }
            previous = Some(marker);
        }
    }

    #[test]
    fn pick_without_geometry_leaves_marker_state() {
        let camera = looking_down_minus_z(5.0);
        let mut picker = picker();
        let mut empty = Scene::default();

        assert!(picker.pick(Vec2::new(100.0, 100.0), &camera, &mut empty).is_none());
        assert!(picker.marker().is_none());
        assert!(empty.is_empty());

        let (mut scene, _) = scene_with_wall();
        let placed = picker
            .pick(Vec2::new(100.0, 100.0), &camera, &mut scene)
            .unwrap();
        // Corner of the viewport looks past the wall's edge.
        assert!(picker.pick(Vec2::new(1.0, 1.0), &camera, &mut scene).is_none());
        assert_eq!(picker.marker().unwrap().position, placed);
        assert_eq!(scene.len(), 2);
    }

    #[test]
    fn clicks_outside_viewport_are_ignored() {
        let (mut scene, _) = scene_with_wall();
        let camera = looking_down_minus_z(5.0);
        let mut picker = picker();
        assert!(picker.pick(Vec2::new(500.0, 100.0), &camera, &mut scene).is_none());
        assert!(picker.marker().is_none());
    }

    #[test]
    fn marker_is_not_itself_pickable() {
        let camera = looking_down_minus_z(5.0);
        let mut picker = picker();
        let mut scene = Scene::default();
        let _ = picker.place_marker(&mut scene, Vec3::ZERO);
        assert!(picker.pick(Vec2::new(100.0, 100.0), &camera, &mut scene).is_none());
        assert_eq!(picker.marker().unwrap().position, Vec3::ZERO);
    }

    #[test]
    fn clear_releases_marker() {
        let mut picker = picker();
        let mut scene = Scene::default();
        let _ = picker.place_marker(&mut scene, Vec3::ONE);
        assert!(picker.clear(&mut scene));
        assert!(scene.is_empty());
        assert_eq!(scene.take_released().len(), 2);
        assert!(!picker.clear(&mut scene));
    }
}
