use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use crate::picking::ray::Ray;

/// Perspective camera defined by position, orientation, and projection
/// parameters.
///
/// The camera looks down its local -Z axis with local +Y up. `up` is the
/// world-space up hint used by [`Self::look_at`] and by the orbit controller
/// to define the horizontal plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    /// Eye position in world space.
    pub position: Vec3,
    /// World-space up hint.
    pub up: Vec3,
    /// Camera-to-world rotation.
    pub orientation: Quat,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl CameraState {
    /// Camera at `position` with identity orientation.
    #[must_use]
    pub fn new(position: Vec3, fovy: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            position,
            up: Vec3::Y,
            orientation: Quat::IDENTITY,
            fovy,
            aspect,
            znear,
            zfar,
        }
    }

    /// Unit view direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Rotate so the camera faces `target` with its top toward `up`.
    ///
    /// Degenerate inputs are nudged rather than rejected: a target at the
    /// eye looks down -Z, and an up hint parallel to the view direction is
    /// perturbed slightly.
    pub fn look_at(&mut self, target: Vec3) {
        let mut z = self.position - target;
        if z.length_squared() == 0.0 {
            z.z = 1.0;
        }
        z = z.normalize();

        let mut x = self.up.cross(z);
        if x.length_squared() == 0.0 {
            if self.up.z.abs() == 1.0 {
                z.x += 0.0001;
            } else {
                z.z += 0.0001;
            }
            z = z.normalize();
            x = self.up.cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);

        self.orientation = Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize();
    }

    /// World-to-camera matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position).inverse()
    }

    /// Camera-to-clip matrix.
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the eye through a point in normalized device coordinates.
    #[must_use]
    pub fn ray_through(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection().inverse();
        let point = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 0.5));
        Ray::new(self.position, point - self.position)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform buffer holding the view-projection matrix and lighting inputs.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Camera world-space position.
    pub position: [f32; 3],
    /// Ambient light term for lit materials.
    pub ambient: f32,
    /// Point light world-space position.
    pub light_position: [f32; 3],
    /// Padding for GPU alignment.
    pub(crate) _pad: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Create a new camera uniform with identity view-projection.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            ambient: 0.3,
            light_position: [0.0; 3],
            _pad: 0.0,
        }
    }

    /// Update uniform fields from the given camera's current state.
    pub fn update(&mut self, camera: &CameraState, light_position: Vec3, ambient: f32) {
        self.view_proj = camera.view_projection().to_cols_array_2d();
        self.position = camera.position.to_array();
        self.light_position = light_position.to_array();
        self.ambient = ambient;
    }
}
