//! Conversion of loaded [`MeshObject`]s into renderable buffers.
//!
//! Faces are fan-triangulated; faces with fewer than three corners are
//! skipped here rather than rejected by the loader. Absent texcoord
//! indices fall back to (0,0); absent normal indices fall back to the
//! face's geometric normal.

use asset::{MeshFace, MeshObject};

use crate::Vertex;
use crate::primitives::MeshBuffer;

/// Flatten a polygonal mesh into triangles.
///
/// Indices inside `mesh` are trusted to be in range: the loader
/// validates them before a `MeshObject` ever reaches the renderer.
pub fn mesh_buffer_from_object(mesh: &MeshObject) -> MeshBuffer {
    let mut buf = MeshBuffer::default();
    let mut skipped = 0usize;
    for face in &mesh.faces {
        if !face.is_renderable() {
            skipped += 1;
            continue;
        }
        let fallback_normal = face_normal(mesh, face);
        let base = buf.vertices.len() as u32;
        for point in &face.points {
            buf.vertices.push(Vertex {
                pos: mesh.vertices[point.vertex],
                normal: point
                    .normal
                    .map(|i| mesh.normals[i])
                    .unwrap_or(fallback_normal),
                uv: point
                    .texcoord
                    .map(|i| mesh.texcoords[i])
                    .unwrap_or([0.0, 0.0]),
            });
        }
        for i in 1..face.points.len() as u32 - 1 {
            buf.indices.extend_from_slice(&[base, base + i, base + i + 1]);
        }
    }
    if skipped > 0 {
        log::debug!("skipped {skipped} degenerate faces during mesh upload");
    }
    buf
}

/// Geometric normal of the polygon's first corner, used when a point
/// carries no normal index.
fn face_normal(mesh: &MeshObject, face: &MeshFace) -> [f32; 3] {
    let a = mesh.vertices[face.points[0].vertex];
    let b = mesh.vertices[face.points[1].vertex];
    let c = mesh.vertices[face.points[2].vertex];
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - b[0], c[1] - b[1], c[2] - b[2]];
    let n = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    let len = (n[0] * n[0] + n[1] * n[1] + n[2] * n[2]).sqrt();
    if len > 1e-12 {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0, 1.0, 0.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asset::obj::load_obj_from_str;

    #[test]
    fn quad_becomes_two_triangles() {
        let src = "\
v 0 0 0
v 1 0 0
v 1 1 0
v 0 1 0
vt 0 0
vt 1 0
vt 1 1
vt 0 1
vn 0 0 1
f 1/1/1 2/2/1 3/3/1 4/4/1
";
        let mesh = load_obj_from_str(src).expect("parse");
        let buf = mesh_buffer_from_object(&mesh);
        assert_eq!(buf.vertices.len(), 4);
        assert_eq!(buf.indices, vec![0, 1, 2, 0, 2, 3]);
        assert_eq!(buf.vertices[1].uv, [1.0, 0.0]);
        assert_eq!(buf.vertices[0].normal, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_faces_are_skipped() {
        // Second face record collapses to zero corners and must not
        // produce geometry.
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\nf 0/1 -1//2\n";
        let mesh = load_obj_from_str(src).expect("parse");
        assert_eq!(mesh.faces.len(), 2);
        let buf = mesh_buffer_from_object(&mesh);
        assert_eq!(buf.vertices.len(), 3);
        assert_eq!(buf.indices.len(), 3);
    }

    #[test]
    fn missing_normals_use_the_face_plane() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
        let mesh = load_obj_from_str(src).expect("parse");
        let buf = mesh_buffer_from_object(&mesh);
        for v in &buf.vertices {
            assert_eq!(v.normal, [0.0, 0.0, 1.0]);
            assert_eq!(v.uv, [0.0, 0.0]);
        }
    }

    #[test]
    fn pentagon_fans_into_three_triangles() {
        let src = "v 0 0 0\nv 1 0 0\nv 2 1 0\nv 1 2 0\nv 0 1 0\nf 1 2 3 4 5\n";
        let mesh = load_obj_from_str(src).expect("parse");
        let buf = mesh_buffer_from_object(&mesh);
        assert_eq!(buf.indices.len(), 9);
        assert_eq!(buf.indices[..3], [0, 1, 2]);
        assert_eq!(buf.indices[6..], [0, 3, 4]);
    }
}
