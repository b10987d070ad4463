//! Indexed triangle geometry with per-vertex normals and UVs.

use glam::{Vec2, Vec3};

use super::ResourceId;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that contains nothing; grows with [`Self::extend`].
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Smallest box containing every point.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Self {
        points.iter().fold(Self::EMPTY, |mut aabb, &p| {
            aabb.extend(p);
            aabb
        })
    }

    /// Grow to include `point`.
    pub fn extend(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }

    /// True when no point has been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x
    }

    /// Box center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }
}

/// Triangle mesh data owned by a scene mesh node.
///
/// Indices are always present; non-indexed sources are expanded to
/// `0..n`. `uvs` is either empty or has one entry per position.
#[derive(Debug, Clone)]
pub struct Geometry {
    id: ResourceId,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    uvs: Vec<Vec2>,
    indices: Vec<u32>,
    bounds: Aabb,
}

impl Geometry {
    /// Build geometry from positions and triangle indices.
    ///
    /// Trailing indices that do not form a full triangle are dropped, as are
    /// triangles that reference a missing vertex.
    #[must_use]
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>) -> Self {
        let vertex_count = positions.len() as u32;
        let indices = indices
            .chunks_exact(3)
            .filter(|tri| tri.iter().all(|&i| i < vertex_count))
            .flatten()
            .copied()
            .collect();
        let bounds = Aabb::from_points(&positions);
        Self {
            id: ResourceId::next(),
            normals: Vec::new(),
            uvs: Vec::new(),
            positions,
            indices,
            bounds,
        }
    }

    /// Attach per-vertex texture coordinates. Ignored if the count does not
    /// match the vertex count.
    #[must_use]
    pub fn with_uvs(mut self, uvs: Vec<Vec2>) -> Self {
        if uvs.len() == self.positions.len() {
            self.uvs = uvs;
        } else {
            log::warn!(
                "ignoring {} uvs for {} vertices",
                uvs.len(),
                self.positions.len()
            );
        }
        self
    }

    /// GPU resource identity of this geometry.
    #[must_use]
    pub fn id(&self) -> ResourceId {
        self.id
    }

    /// Vertex positions in local space.
    #[must_use]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Per-vertex normals; empty until [`Self::compute_vertex_normals`].
    #[must_use]
    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Per-vertex texture coordinates; may be empty.
    #[must_use]
    pub fn uvs(&self) -> &[Vec2] {
        &self.uvs
    }

    /// Triangle index list.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Local-space bounds.
    #[must_use]
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Number of triangles.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterate triangle corner positions.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            [
                self.positions[tri[0] as usize],
                self.positions[tri[1] as usize],
                self.positions[tri[2] as usize],
            ]
        })
    }

    /// Recompute smooth per-vertex normals by accumulating area-weighted face
    /// normals of every triangle touching each vertex.
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let (pa, pb, pc) =
                (self.positions[a], self.positions[b], self.positions[c]);
            let face = (pc - pb).cross(pa - pb);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        for n in &mut normals {
            *n = n.normalize_or_zero();
        }
        self.normals = normals;
    }
}
