//! Procedural primitive meshes.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::mesh::Geometry;

/// UV sphere centered at the origin.
///
/// `width_segments` slices around the vertical axis, `height_segments`
/// stacks from pole to pole. Pole rows emit a single triangle per segment.
#[must_use]
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> Geometry {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);

    let row_len = width_segments + 1;
    let mut positions =
        Vec::with_capacity((row_len * (height_segments + 1)) as usize);
    let mut uvs = Vec::with_capacity(positions.capacity());

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let theta = v * PI;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * TAU;
            positions.push(Vec3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            ));
            uvs.push(Vec2::new(u, 1.0 - v));
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row_len + ix + 1;
            let b = iy * row_len + ix;
            let c = (iy + 1) * row_len + ix;
            let d = (iy + 1) * row_len + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    let mut geometry = Geometry::new(positions, indices).with_uvs(uvs);
    geometry.compute_vertex_normals();
    geometry
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let sphere = uv_sphere(0.01, 32, 32);
        for p in sphere.positions() {
            assert_relative_eq!(p.length(), 0.01, epsilon = 1e-6);
        }
    }

    #[test]
    fn sphere_triangle_count_skips_degenerate_poles() {
        let sphere = uv_sphere(1.0, 8, 4);
        // Two triangles per quad, minus one per segment at each pole row.
        assert_eq!(sphere.triangle_count(), 8 * 4 * 2 - 2 * 8);
    }

    #[test]
    fn sphere_normals_point_outward() {
        let sphere = uv_sphere(2.0, 16, 8);
        for (p, n) in sphere.positions().iter().zip(sphere.normals()) {
            if n.length_squared() > 0.0 {
                assert!(p.normalize().dot(*n) > 0.9);
            }
        }
    }
}
