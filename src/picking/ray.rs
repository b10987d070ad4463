//! Ray primitives and screen-to-NDC remapping.

use glam::{Mat4, Vec2, Vec3};

use crate::options::ViewportOptions;
use crate::scene::mesh::Aabb;

/// Determinants smaller than this are treated as parallel.
const PARALLEL_EPSILON: f32 = 1e-9;

/// A half-line `origin + t * direction`, `t >= 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Direction; unit length unless produced by [`Self::transformed`].
    pub direction: Vec3,
}

impl Ray {
    /// Ray with a normalized direction.
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at parameter `t`.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray expressed in another space. The direction is not
    /// renormalized, so `t` values map 1:1 between spaces.
    #[must_use]
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            origin: matrix.transform_point3(self.origin),
            direction: matrix.transform_vector3(self.direction),
        }
    }

    /// Möller–Trumbore ray/triangle test. Returns the hit parameter.
    ///
    /// With `cull_back_faces`, triangles whose counter-clockwise normal faces
    /// away from the ray are ignored.
    #[must_use]
    pub fn intersect_triangle(
        &self,
        a: Vec3,
        b: Vec3,
        c: Vec3,
        cull_back_faces: bool,
    ) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let pvec = self.direction.cross(edge2);
        let det = edge1.dot(pvec);

        if cull_back_faces {
            if det < PARALLEL_EPSILON {
                return None;
            }
        } else if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let tvec = self.origin - a;
        let u = tvec.dot(pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(edge1);
        let v = self.direction.dot(qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = edge2.dot(qvec) * inv_det;
        (t >= 0.0).then_some(t)
    }

    /// Slab test against a box. Returns the entry parameter (0 when the
    /// origin is inside).
    #[must_use]
    pub fn intersect_aabb(&self, aabb: &Aabb) -> Option<f32> {
        if aabb.is_empty() {
            return None;
        }
        let inv = self.direction.recip();
        let t1 = (aabb.min - self.origin) * inv;
        let t2 = (aabb.max - self.origin) * inv;
        let t_near = t1.min(t2).max_element();
        let t_far = t1.max(t2).min_element();
        if t_far < 0.0 || t_near > t_far || t_near.is_nan() || t_far.is_nan() {
            return None;
        }
        Some(t_near.max(0.0))
    }
}

/// Where the viewport sits inside the host's pointer coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportGeometry {
    /// Top-left corner in host pixels.
    pub origin: Vec2,
    /// Width and height in pixels.
    pub size: Vec2,
}

impl ViewportGeometry {
    /// Viewport at `origin` with the given pixel size.
    #[must_use]
    pub fn new(origin: Vec2, width: u32, height: u32) -> Self {
        Self {
            origin,
            size: Vec2::new(width.max(1) as f32, height.max(1) as f32),
        }
    }

    /// Whether an absolute pointer position falls inside the viewport.
    #[must_use]
    pub fn contains(&self, screen: Vec2) -> bool {
        let local = screen - self.origin;
        local.x >= 0.0
            && local.y >= 0.0
            && local.x <= self.size.x
            && local.y <= self.size.y
    }

    /// Remap an absolute pointer position to normalized device coordinates
    /// (x right, y up, both in `[-1, 1]` inside the viewport).
    #[must_use]
    pub fn to_ndc(&self, screen: Vec2) -> Vec2 {
        let local = (screen - self.origin) / self.size;
        Vec2::new(local.x * 2.0 - 1.0, -(local.y * 2.0) + 1.0)
    }
}

impl From<&ViewportOptions> for ViewportGeometry {
    fn from(options: &ViewportOptions) -> Self {
        Self::new(
            Vec2::from_array(options.origin),
            options.width,
            options.height,
        )
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn viewport() -> ViewportGeometry {
        ViewportGeometry::new(Vec2::new(1672.0, 82.0), 248, 850)
    }

    #[test]
    fn ndc_maps_corners_and_center() {
        let vp = viewport();
        assert_eq!(vp.to_ndc(Vec2::new(1672.0, 82.0)), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(Vec2::new(1920.0, 932.0)), Vec2::new(1.0, -1.0));
        let center = vp.to_ndc(Vec2::new(1672.0 + 124.0, 82.0 + 425.0));
        assert_relative_eq!(center.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(center.y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn contains_respects_offset() {
        let vp = viewport();
        assert!(vp.contains(Vec2::new(1700.0, 500.0)));
        assert!(!vp.contains(Vec2::new(100.0, 500.0)));
        assert!(!vp.contains(Vec2::new(1700.0, 10.0)));
    }

    #[test]
    fn triangle_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, 1.0), Vec3::NEG_Z);
        let (a, b, c) = (Vec3::ZERO, Vec3::X, Vec3::Y);
        assert_relative_eq!(
            ray.intersect_triangle(a, b, c, true).unwrap(),
            1.0,
            epsilon = 1e-6
        );

        let outside = Ray::new(Vec3::new(0.8, 0.8, 1.0), Vec3::NEG_Z);
        assert!(outside.intersect_triangle(a, b, c, false).is_none());

        let behind = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::NEG_Z);
        assert!(behind.intersect_triangle(a, b, c, false).is_none());
    }

    #[test]
    fn back_face_only_hits_when_not_culled() {
        let ray = Ray::new(Vec3::new(0.2, 0.2, -1.0), Vec3::Z);
        let (a, b, c) = (Vec3::ZERO, Vec3::X, Vec3::Y);
        assert!(ray.intersect_triangle(a, b, c, true).is_none());
        assert!(ray.intersect_triangle(a, b, c, false).is_some());
    }

    #[test]
    fn aabb_slab_test() {
        let aabb = Aabb {
            min: Vec3::splat(-1.0),
            max: Vec3::splat(1.0),
        };
        let hit = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert_relative_eq!(hit.intersect_aabb(&aabb).unwrap(), 4.0);
        let inside = Ray::new(Vec3::ZERO, Vec3::X);
        assert_eq!(inside.intersect_aabb(&aabb), Some(0.0));
        let miss = Ray::new(Vec3::new(3.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!(miss.intersect_aabb(&aabb).is_none());
        assert!(hit.intersect_aabb(&Aabb::EMPTY).is_none());
    }

    #[test]
    fn transformed_ray_keeps_parameterization() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        let scale = Mat4::from_scale(Vec3::splat(2.0));
        let local = ray.transformed(&scale);
        assert_eq!(local.at(1.0), scale.transform_point3(ray.at(1.0)));
    }
}
