//! PLY mesh decoding (ascii and binary).
//!
//! Reads vertex positions, optional per-vertex texture coordinates, and
//! polygon faces. Polygons are fan-triangulated. When faces carry their own
//! `texcoord` lists the mesh is expanded to one vertex per face corner so
//! each corner keeps its UV. Normals in the file are ignored; the caller
//! recomputes them from the triangles.

use std::io::Cursor;

use glam::{Vec2, Vec3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Property};

use crate::scene::mesh::Geometry;

/// Per-vertex UV property pairs, in lookup order.
const UV_PROPERTIES: [(&str, &str); 3] =
    [("s", "t"), ("u", "v"), ("texture_u", "texture_v")];

/// Decode a PLY file into triangle geometry.
pub fn decode_ply(bytes: &[u8]) -> Result<Geometry, String> {
    let mut reader = Cursor::new(bytes);
    let parser = Parser::<DefaultElement>::new();
    let ply = parser
        .read_ply(&mut reader)
        .map_err(|e| format!("invalid PLY: {e}"))?;

    let vertices = ply
        .payload
        .get("vertex")
        .ok_or_else(|| "PLY has no vertex element".to_owned())?;

    let mut positions = Vec::with_capacity(vertices.len());
    for (i, vertex) in vertices.iter().enumerate() {
        let coord = |name: &str| {
            scalar(vertex, name).ok_or_else(|| format!("vertex {i} is missing '{name}'"))
        };
        positions.push(Vec3::new(coord("x")?, coord("y")?, coord("z")?));
    }
    let vertex_uvs = read_vertex_uvs(vertices);

    let faces = ply.payload.get("face").map_or(&[][..], Vec::as_slice);
    let vertex_count = positions.len();

    let mut indices = Vec::with_capacity(faces.len() * 3);
    let mut corner_uvs: Vec<Vec2> = Vec::new();
    let mut has_face_uvs = false;

    for face in faces {
        let Some(polygon) = face_indices(face) else {
            continue;
        };
        if polygon.len() < 3 || polygon.iter().any(|&i| i as usize >= vertex_count) {
            log::debug!("skipping malformed face {polygon:?}");
            continue;
        }
        let texcoord = face_texcoords(face, polygon.len());
        has_face_uvs |= texcoord.is_some();

        for k in 1..polygon.len() - 1 {
            for corner in [0, k, k + 1] {
                indices.push(polygon[corner]);
                corner_uvs.push(texcoord.as_ref().map_or(Vec2::ZERO, |uv| uv[corner]));
            }
        }
    }

    if faces.is_empty() {
        // Point-only files still parse; they just have no triangles.
        log::debug!("PLY has no faces ({vertex_count} vertices)");
    }

    let geometry = if has_face_uvs {
        let expanded = indices.iter().map(|&i| positions[i as usize]).collect::<Vec<_>>();
        let sequential = (0..expanded.len() as u32).collect();
        Geometry::new(expanded, sequential).with_uvs(corner_uvs)
    } else {
        let geometry = Geometry::new(positions, indices);
        match vertex_uvs {
            Some(uvs) => geometry.with_uvs(uvs),
            None => geometry,
        }
    };
    Ok(geometry)
}

/// Numeric scalar property as `f32`.
fn scalar(element: &DefaultElement, name: &str) -> Option<f32> {
    Some(match element.get(name)? {
        Property::Float(v) => *v,
        Property::Double(v) => *v as f32,
        Property::Int(v) => *v as f32,
        Property::UInt(v) => *v as f32,
        Property::Short(v) => f32::from(*v),
        Property::UShort(v) => f32::from(*v),
        Property::Char(v) => f32::from(*v),
        Property::UChar(v) => f32::from(*v),
        _ => return None,
    })
}

/// Per-vertex UVs from the first property pair every vertex carries.
fn read_vertex_uvs(vertices: &[DefaultElement]) -> Option<Vec<Vec2>> {
    let first = vertices.first()?;
    let (u_name, v_name) = UV_PROPERTIES
        .into_iter()
        .find(|(u, v)| first.contains_key(*u) && first.contains_key(*v))?;
    vertices
        .iter()
        .map(|vertex| Some(Vec2::new(scalar(vertex, u_name)?, scalar(vertex, v_name)?)))
        .collect()
}

/// Polygon corner indices from `vertex_indices` (or `vertex_index`).
fn face_indices(face: &DefaultElement) -> Option<Vec<u32>> {
    let list = face.get("vertex_indices").or_else(|| face.get("vertex_index"))?;
    match list {
        Property::ListInt(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        Property::ListUInt(v) => Some(v.clone()),
        Property::ListShort(v) => v.iter().map(|&i| u32::try_from(i).ok()).collect(),
        Property::ListUShort(v) => Some(v.iter().map(|&i| u32::from(i)).collect()),
        Property::ListUChar(v) => Some(v.iter().map(|&i| u32::from(i)).collect()),
        _ => None,
    }
}

/// Per-corner UVs from a face `texcoord` list of `2 * corners` floats.
fn face_texcoords(face: &DefaultElement, corners: usize) -> Option<Vec<Vec2>> {
    let flat: Vec<f32> = match face.get("texcoord")? {
        Property::ListFloat(v) => v.clone(),
        Property::ListDouble(v) => v.iter().map(|&x| x as f32).collect(),
        _ => return None,
    };
    (flat.len() == corners * 2).then(|| {
        flat.chunks_exact(2)
            .map(|uv| Vec2::new(uv[0], uv[1]))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUAD_WITH_VERTEX_UVS: &str = "ply
format ascii 1.0
element vertex 4
property float x
property float y
property float z
property float s
property float t
element face 1
property list uchar int vertex_indices
end_header
0 0 0 0 0
1 0 0 1 0
1 1 0 1 1
0 1 0 0 1
4 0 1 2 3
";

    #[test]
    fn quad_is_fan_triangulated_with_vertex_uvs() {
        let geometry = decode_ply(QUAD_WITH_VERTEX_UVS.as_bytes()).unwrap();
        assert_eq!(geometry.positions().len(), 4);
        assert_eq!(geometry.indices(), &[0, 1, 2, 0, 2, 3]);
        assert_eq!(geometry.uvs()[2], Vec2::new(1.0, 1.0));
    }

    #[test]
    fn face_texcoords_expand_to_corners() {
        let ply = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
property list uchar float texcoord
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2 6 0.1 0.2 0.3 0.4 0.5 0.6
";
        let geometry = decode_ply(ply.as_bytes()).unwrap();
        assert_eq!(geometry.positions().len(), 3);
        assert_eq!(geometry.indices(), &[0, 1, 2]);
        assert_eq!(geometry.uvs()[1], Vec2::new(0.3, 0.4));
        assert_eq!(geometry.positions()[1], Vec3::X);
    }

    #[test]
    fn out_of_range_faces_are_skipped() {
        let ply = "ply
format ascii 1.0
element vertex 3
property float x
property float y
property float z
element face 2
property list uchar int vertex_indices
end_header
0 0 0
1 0 0
0 1 0
3 0 1 2
3 0 1 7
";
        let geometry = decode_ply(ply.as_bytes()).unwrap();
        assert_eq!(geometry.triangle_count(), 1);
        assert!(geometry.uvs().is_empty());
    }

    #[test]
    fn binary_little_endian_is_supported() {
        let mut bytes = b"ply
format binary_little_endian 1.0
element vertex 3
property float x
property float y
property float z
element face 1
property list uchar int vertex_indices
end_header
"
        .to_vec();
        for v in [[0.0_f32, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]] {
            for c in v {
                bytes.extend_from_slice(&c.to_le_bytes());
            }
        }
        bytes.push(3);
        for i in [0_i32, 1, 2] {
            bytes.extend_from_slice(&i.to_le_bytes());
        }

        let geometry = decode_ply(&bytes).unwrap();
        assert_eq!(geometry.triangle_count(), 1);
        assert_eq!(geometry.positions()[2], Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(decode_ply(b"not a ply file").is_err());
        let no_vertices = "ply\nformat ascii 1.0\nend_header\n";
        assert!(decode_ply(no_vertices.as_bytes()).is_err());
    }
}
