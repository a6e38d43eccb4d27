//! CPU-side polygonal mesh representation as loaded from OBJ text.

/// One corner of a polygonal face: indices into the owning
/// [`MeshObject`]'s arrays, already converted to zero-based.
///
/// `texcoord`/`normal` are `None` when the source record omitted them;
/// an omitted index is distinct from index 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshFacePoint {
    pub vertex: usize,
    pub texcoord: Option<usize>,
    pub normal: Option<usize>,
}

impl MeshFacePoint {
    pub fn new(vertex: usize, texcoord: Option<usize>, normal: Option<usize>) -> Self {
        Self {
            vertex,
            texcoord,
            normal,
        }
    }
}

/// Polygon corners in winding order.
///
/// The loader keeps faces with fewer than three points (a face record
/// may lose corners to malformed tokens); consumers must skip them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshFace {
    pub points: Vec<MeshFacePoint>,
}

impl MeshFace {
    pub fn new(points: Vec<MeshFacePoint>) -> Self {
        Self { points }
    }

    /// A polygon needs at least three corners to produce triangles.
    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.points.len() >= 3
    }
}

/// Parallel-array mesh: faces index into the other three arrays.
///
/// Arrays are append-only while the loader runs and read-only
/// afterwards. The loader guarantees every index held by a face is in
/// range for its array. Ownership is exclusive to whoever holds the
/// object; the backing storage is released on drop.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshObject {
    pub vertices: Vec<[f32; 3]>,
    pub texcoords: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<MeshFace>,
}

impl MeshObject {
    /// Faces with enough corners to draw.
    pub fn renderable_faces(&self) -> impl Iterator<Item = &MeshFace> {
        self.faces.iter().filter(|f| f.is_renderable())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_faces_are_kept_but_not_renderable() {
        let face = MeshFace::new(vec![
            MeshFacePoint::new(0, None, None),
            MeshFacePoint::new(1, None, None),
        ]);
        assert!(!face.is_renderable());

        let mesh = MeshObject {
            vertices: vec![[0.0; 3]; 2],
            faces: vec![face],
            ..Default::default()
        };
        assert_eq!(mesh.faces.len(), 1);
        assert_eq!(mesh.renderable_faces().count(), 0);
    }

    #[test]
    fn triangle_face_is_renderable() {
        let face = MeshFace::new(vec![
            MeshFacePoint::new(0, Some(0), Some(0)),
            MeshFacePoint::new(1, Some(1), Some(0)),
            MeshFacePoint::new(2, Some(2), Some(0)),
        ]);
        assert!(face.is_renderable());
    }
}
