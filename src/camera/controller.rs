use std::f32::consts::TAU;

use glam::{Quat, Vec2, Vec3};

use super::core::CameraState;
use crate::options::OrbitOptions;

/// Motion below this (squared distance, or quaternion dot distance) counts as
/// no change.
const CHANGE_EPSILON: f32 = 1.0e-6;
/// Keeps the polar angle off the poles so the view never flips.
const POLAR_EPSILON: f32 = 1.0e-6;
/// Per-step dolly factor at zoom speed 1.
const DOLLY_BASE: f32 = 0.95;

/// Spherical coordinates about the y-up axis: `theta` is the azimuth from
/// +Z toward +X, `phi` the polar angle from +Y.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi * self.theta.cos(),
        )
    }
}

/// Damped orbit, pan, and dolly about a pivot point.
///
/// Input only accumulates deltas. [`Self::update`] applies them to a
/// [`CameraState`] once per frame; with damping enabled each frame applies a
/// `damping_factor` share of the pending rotation and pan and decays the rest,
/// so motion continues to ease out after the pointer is released.
pub struct OrbitController {
    options: OrbitOptions,
    target: Vec3,
    viewport_height: f32,
    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitController {
    /// Controller orbiting `target` inside a viewport `viewport_height`
    /// pixels tall.
    #[must_use]
    pub fn new(options: OrbitOptions, target: Vec3, viewport_height: u32) -> Self {
        Self {
            options,
            target,
            viewport_height: viewport_height.max(1) as f32,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Current pivot.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Active options.
    #[must_use]
    pub fn options(&self) -> &OrbitOptions {
        &self.options
    }

    /// Track a viewport resize.
    pub fn set_viewport_height(&mut self, height: u32) {
        self.viewport_height = height.max(1) as f32;
    }

    /// Queue a rotation for a pointer drag of `delta` pixels. A drag across
    /// the full viewport height turns the camera once around.
    pub fn rotate(&mut self, delta: Vec2) {
        let speed = self.options.rotate_speed;
        self.rotate_left(TAU * delta.x / self.viewport_height * speed);
        self.rotate_up(TAU * delta.y / self.viewport_height * speed);
    }

    fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Queue a pan for a pointer drag of `delta` pixels, scaled so the
    /// surface under the pivot tracks the pointer.
    pub fn pan(&mut self, delta: Vec2, camera: &CameraState) {
        let delta = delta * self.options.pan_speed;
        let half_fov = (camera.fovy.to_radians() / 2.0).tan();
        let target_distance = (camera.position - self.target).length() * half_fov;

        let left = 2.0 * delta.x * target_distance / self.viewport_height;
        let up = 2.0 * delta.y * target_distance / self.viewport_height;
        self.pan_offset += camera.orientation * Vec3::X * -left;
        self.pan_offset += camera.orientation * Vec3::Y * up;
    }

    /// Queue a dolly of `steps` wheel notches. Positive steps move toward
    /// the pivot.
    pub fn zoom(&mut self, steps: f32) {
        let factor = DOLLY_BASE.powf(self.options.zoom_speed);
        self.scale *= factor.powf(steps);
    }

    /// True when no queued motion remains.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.spherical_delta.theta.abs() < CHANGE_EPSILON
            && self.spherical_delta.phi.abs() < CHANGE_EPSILON
            && self.pan_offset.length_squared() < CHANGE_EPSILON
            && self.scale == 1.0
    }

    /// Advance one frame: apply queued motion to `camera` and aim it at the
    /// pivot. Returns whether the camera moved noticeably.
    pub fn update(&mut self, camera: &mut CameraState) -> bool {
        let previous_position = camera.position;
        let previous_orientation = camera.orientation;

        // Work in a frame where the camera's up hint is +Y.
        let to_y_up = Quat::from_rotation_arc(camera.up.normalize_or(Vec3::Y), Vec3::Y);
        let from_y_up = to_y_up.inverse();

        let offset = to_y_up * (camera.position - self.target);
        let mut spherical = Spherical::from_offset(offset);

        let damping = self.options.enable_damping;
        let factor = if damping {
            self.options.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        spherical.theta += self.spherical_delta.theta * factor;
        spherical.phi += self.spherical_delta.phi * factor;

        // max/min rather than clamp: configured bounds may be inverted.
        spherical.phi = spherical
            .phi
            .max(self.options.min_polar_angle)
            .min(self.options.max_polar_angle)
            .clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);
        spherical.radius = (spherical.radius * self.scale)
            .max(self.options.min_distance)
            .min(self.options.max_distance);

        self.target += self.pan_offset * factor;

        camera.position = self.target + from_y_up * spherical.to_offset();
        camera.look_at(self.target);

        if damping {
            let decay = 1.0 - factor;
            self.spherical_delta.theta *= decay;
            self.spherical_delta.phi *= decay;
            self.pan_offset *= decay;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        camera.position.distance_squared(previous_position) > CHANGE_EPSILON
            || 8.0 * (1.0 - previous_orientation.dot(camera.orientation)) > CHANGE_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    const HEIGHT: u32 = 400;

    fn camera() -> CameraState {
        let mut camera = CameraState::new(Vec3::new(0.0, 0.0, 5.0), 45.0, 1.0, 0.1, 100.0);
        camera.look_at(Vec3::ZERO);
        camera
    }

    fn controller(enable_damping: bool) -> OrbitController {
        OrbitController::new(
            OrbitOptions {
                enable_damping,
                ..OrbitOptions::default()
            },
            Vec3::ZERO,
            HEIGHT,
        )
    }

    fn settle(controller: &mut OrbitController, camera: &mut CameraState) {
        for _ in 0..600 {
            let _ = controller.update(camera);
        }
    }

    #[test]
    fn idle_update_leaves_camera_in_place() {
        let mut camera = camera();
        let before = camera;
        let mut controller = controller(true);
        assert!(!controller.update(&mut camera));
        assert_relative_eq!(camera.position.z, before.position.z, epsilon = 1e-5);
        assert!(controller.is_settled());
    }

    #[test]
    fn undamped_quarter_drag_turns_quarter_circle() {
        let mut camera = camera();
        let mut controller = controller(false);
        controller.rotate(Vec2::new(HEIGHT as f32 / 4.0, 0.0));
        assert!(controller.update(&mut camera));
        assert_relative_eq!(camera.position.x, -5.0, epsilon = 1e-4);
        assert_relative_eq!(camera.position.z, 0.0, epsilon = 1e-4);
        assert!(controller.is_settled());
    }

    #[test]
    fn damped_rotation_eases_toward_full_angle() {
        let mut camera = camera();
        let mut controller = controller(true);
        controller.rotate(Vec2::new(HEIGHT as f32 / 4.0, 0.0));

        assert!(controller.update(&mut camera));
        // First frame applies only the damping share (5% of 90 degrees).
        let first = camera.position.x.atan2(camera.position.z).to_degrees();
        assert_relative_eq!(first, -4.5, epsilon = 1e-3);
        assert!(!controller.is_settled());

        settle(&mut controller, &mut camera);
        assert_relative_eq!(camera.position.x, -5.0, epsilon = 1e-3);
        assert_relative_eq!(camera.position.length(), 5.0, epsilon = 1e-3);
        assert!(controller.is_settled());
    }

    #[test]
    fn camera_keeps_looking_at_pivot() {
        let mut camera = camera();
        let mut controller = controller(false);
        controller.rotate(Vec2::new(37.0, -52.0));
        let _ = controller.update(&mut camera);
        let to_pivot = (controller.target() - camera.position).normalize();
        assert_relative_eq!(camera.forward().dot(to_pivot), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn polar_angle_never_reaches_pole() {
        let mut camera = camera();
        let mut controller = controller(false);
        controller.rotate(Vec2::new(0.0, 10.0 * HEIGHT as f32));
        let _ = controller.update(&mut camera);
        // Clamped just short of straight overhead, still on the +Z side.
        assert!(camera.position.z > 0.0);
        assert_relative_eq!(camera.position.y, 5.0, epsilon = 1e-4);
        assert!(camera.orientation.is_finite());
    }

    #[test]
    fn zoom_scales_distance_and_respects_limits() {
        let mut camera = camera();
        let mut controller = controller(true);
        controller.zoom(1.0);
        let _ = controller.update(&mut camera);
        assert_relative_eq!(camera.position.length(), 4.75, epsilon = 1e-4);

        let mut clamped = OrbitController::new(
            OrbitOptions {
                min_distance: 4.0,
                ..OrbitOptions::default()
            },
            Vec3::ZERO,
            HEIGHT,
        );
        clamped.zoom(20.0);
        let _ = clamped.update(&mut camera);
        assert_relative_eq!(camera.position.length(), 4.0, epsilon = 1e-4);
    }

    #[test]
    fn pan_moves_pivot_and_camera_together() {
        let mut camera = camera();
        let mut controller = controller(false);
        controller.pan(Vec2::new(40.0, 0.0), &camera);
        let _ = controller.update(&mut camera);

        // Dragging right slides the view left: the pivot moves toward -X.
        let target = controller.target();
        assert!(target.x < 0.0);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-5);
        let offset = camera.position - target;
        assert_relative_eq!(offset.z, 5.0, epsilon = 1e-4);
        assert_relative_eq!(offset.x, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn orbit_respects_tilted_up_hint() {
        let mut camera = camera();
        camera.up = Vec3::X;
        camera.look_at(Vec3::ZERO);
        let mut controller = controller(false);
        controller.rotate(Vec2::new(HEIGHT as f32 / 2.0, 0.0));
        let _ = controller.update(&mut camera);
        // Half turn about the +X up axis lands behind the pivot.
        assert_relative_eq!(camera.position.z, -5.0, epsilon = 1e-3);
        assert_relative_eq!(camera.position.x, 0.0, epsilon = 1e-3);
    }
}
