//! Minimal OBJ parser keeping faces as polygons over parallel arrays.
//!
//! Two passes over the text: the first counts `v`/`vt`/`vn`/`f`
//! records so every array is sized exactly once, the second populates
//! them in file order. Face records are tokenized permissively (bad
//! corners are dropped, not errors); index range violations are load
//! errors.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::mesh::{MeshFace, MeshFacePoint, MeshObject};

/// Errors surfaced by the OBJ loader.
#[derive(Debug, Error)]
pub enum MeshError {
    #[error("failed to open mesh file {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read mesh source: {0}")]
    Read(#[from] io::Error),
    #[error("malformed {what} on line {line}")]
    Field { what: &'static str, line: usize },
    #[error("face on line {line} references {array} index {index}, but only {len} are declared")]
    IndexOutOfRange {
        line: usize,
        array: &'static str,
        index: usize,
        len: usize,
    },
}

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshObject, MeshError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| MeshError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    parse_obj(&text)
}

/// Load an OBJ mesh from any reader.
pub fn load_obj_from_reader<R: Read>(mut reader: R) -> Result<MeshObject, MeshError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    parse_obj(&text)
}

/// Parse an OBJ mesh from a string.
pub fn load_obj_from_str(text: &str) -> Result<MeshObject, MeshError> {
    parse_obj(text)
}

fn parse_obj(text: &str) -> Result<MeshObject, MeshError> {
    // Pass 1: count record types so the arrays never reallocate and
    // face indices can be range-checked against final lengths as they
    // are parsed.
    let mut v_count = 0usize;
    let mut vt_count = 0usize;
    let mut vn_count = 0usize;
    let mut f_count = 0usize;
    for line in text.lines() {
        match line.split_whitespace().next() {
            Some("v") => v_count += 1,
            Some("vt") => vt_count += 1,
            Some("vn") => vn_count += 1,
            Some("f") => f_count += 1,
            _ => {}
        }
    }

    let mut mesh = MeshObject {
        vertices: Vec::with_capacity(v_count),
        texcoords: Vec::with_capacity(vt_count),
        normals: Vec::with_capacity(vn_count),
        faces: Vec::with_capacity(f_count),
    };

    // Pass 2: populate in file order.
    for (line_no, line) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let x = parse_f32(parts.next(), line_no, "vertex x coordinate")?;
                let y = parse_f32(parts.next(), line_no, "vertex y coordinate")?;
                let z = parse_f32(parts.next(), line_no, "vertex z coordinate")?;
                mesh.vertices.push([x, y, z]);
            }
            Some("vt") => {
                let u = parse_f32(parts.next(), line_no, "texture u coordinate")?;
                let v = parse_f32(parts.next(), line_no, "texture v coordinate")?;
                mesh.texcoords.push([u, v]);
            }
            Some("vn") => {
                let nx = parse_f32(parts.next(), line_no, "normal x component")?;
                let ny = parse_f32(parts.next(), line_no, "normal y component")?;
                let nz = parse_f32(parts.next(), line_no, "normal z component")?;
                mesh.normals.push([nx, ny, nz]);
            }
            Some("f") => {
                let points = parse_face_points(line);
                check_face_indices(&points, line_no, v_count, vt_count, vn_count)?;
                mesh.faces.push(MeshFace::new(points));
            }
            // Unknown keywords, comments and blank lines are skipped.
            _ => {}
        }
    }

    log::debug!(
        "parsed OBJ: {} vertices, {} texcoords, {} normals, {} faces",
        mesh.vertices.len(),
        mesh.texcoords.len(),
        mesh.normals.len(),
        mesh.faces.len()
    );

    Ok(mesh)
}

/// Tokenize one raw `f` record into face points.
///
/// Accepted token shapes are `v`, `v/t`, `v/t/n` and `v//n` with
/// 1-based indices. A token matching none of these, or whose vertex
/// component is not positive, is dropped without error. Texcoord and
/// normal components that are missing, empty, or not positive become
/// `None` rather than an index. The result may legitimately be empty.
pub fn parse_face_points(line: &str) -> Vec<MeshFacePoint> {
    // Whitespace runs upper-bound the token count; splitting on runs
    // also means irregular spacing can never yield phantom points.
    let mut points = Vec::with_capacity(line.split_whitespace().count());
    for token in line.split_whitespace() {
        if token == "f" {
            continue;
        }
        if let Some(point) = parse_face_token(token) {
            points.push(point);
        }
    }
    points
}

fn parse_face_token(token: &str) -> Option<MeshFacePoint> {
    let mut fields = token.split('/');

    let vertex: i64 = fields.next()?.parse().ok()?;
    if vertex <= 0 {
        return None;
    }

    let texcoord = match fields.next() {
        None | Some("") => None,
        Some(raw) => optional_index(raw)?,
    };
    let normal = match fields.next() {
        None | Some("") => None,
        Some(raw) => optional_index(raw)?,
    };

    Some(MeshFacePoint::new(
        (vertex - 1) as usize,
        texcoord,
        normal,
    ))
}

/// A non-positive optional index means "absent", preserving the
/// difference between "not provided" and "index 1". A non-numeric
/// field invalidates the whole token (outer `None` via `?`).
fn optional_index(raw: &str) -> Option<Option<usize>> {
    let value: i64 = raw.parse().ok()?;
    Some((value > 0).then(|| (value - 1) as usize))
}

fn check_face_indices(
    points: &[MeshFacePoint],
    line: usize,
    v_count: usize,
    vt_count: usize,
    vn_count: usize,
) -> Result<(), MeshError> {
    for point in points {
        if point.vertex >= v_count {
            return Err(MeshError::IndexOutOfRange {
                line,
                array: "vertex",
                index: point.vertex,
                len: v_count,
            });
        }
        if let Some(t) = point.texcoord.filter(|&t| t >= vt_count) {
            return Err(MeshError::IndexOutOfRange {
                line,
                array: "texcoord",
                index: t,
                len: vt_count,
            });
        }
        if let Some(n) = point.normal.filter(|&n| n >= vn_count) {
            return Err(MeshError::IndexOutOfRange {
                line,
                array: "normal",
                index: n,
                len: vn_count,
            });
        }
    }
    Ok(())
}

fn parse_f32(value: Option<&str>, line: usize, what: &'static str) -> Result<f32, MeshError> {
    value
        .and_then(|token| token.parse::<f32>().ok())
        .ok_or(MeshError::Field { what, line })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trip() {
        let points = parse_face_points("f 3/4/5 6//7 8");
        assert_eq!(
            points,
            vec![
                MeshFacePoint::new(2, Some(3), Some(4)),
                MeshFacePoint::new(5, None, Some(6)),
                MeshFacePoint::new(7, None, None),
            ]
        );
    }

    #[test]
    fn face_parsing_is_idempotent() {
        let line = "f 1/2/3   4//5 6";
        assert_eq!(parse_face_points(line), parse_face_points(line));
    }

    #[test]
    fn irregular_whitespace_yields_no_phantom_points() {
        let points = parse_face_points("f   1/2/3   4/5/6  ");
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], MeshFacePoint::new(0, Some(1), Some(2)));
        assert_eq!(points[1], MeshFacePoint::new(3, Some(4), Some(5)));
    }

    #[test]
    fn non_positive_vertex_indices_are_dropped() {
        let points = parse_face_points("f 0/1/1 -2/2/2");
        assert!(points.is_empty());
    }

    #[test]
    fn unparseable_tokens_are_dropped() {
        let points = parse_face_points("f 1/x/2 huh 2 3");
        assert_eq!(
            points,
            vec![
                MeshFacePoint::new(1, None, None),
                MeshFacePoint::new(2, None, None),
            ]
        );
    }

    #[test]
    fn vertex_and_texcoord_token_is_accepted() {
        let points = parse_face_points("f 1/2 3/4");
        assert_eq!(
            points,
            vec![
                MeshFacePoint::new(0, Some(1), None),
                MeshFacePoint::new(2, Some(3), None),
            ]
        );
    }

    #[test]
    fn non_positive_optional_indices_become_absent() {
        // "index 0" must not decay into "index 1 minus one".
        let points = parse_face_points("f 1/0/0 2/-3/1");
        assert_eq!(
            points,
            vec![
                MeshFacePoint::new(0, None, None),
                MeshFacePoint::new(1, None, Some(0)),
            ]
        );
    }

    const CUBE_ISH: &str = "\
# comment
o thing
v 0.0 0.0 0.0
v 1.0 0.0 0.0
v 1.0 1.0 0.0
v 0.0 1.0 0.0
vt 0.0 0.0
vt 1.0 0.0
vn 0.0 0.0 1.0
s off
f 1/1/1 2/2/1 3/1/1 4/2/1
f 1 2 3
";

    #[test]
    fn array_sizes_match_record_counts() {
        let mesh = load_obj_from_str(CUBE_ISH).expect("parse");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.texcoords.len(), 2);
        assert_eq!(mesh.normals.len(), 1);
        assert_eq!(mesh.faces.len(), 2);
        assert_eq!(mesh.faces[0].points.len(), 4);
        assert_eq!(mesh.faces[1].points.len(), 3);
    }

    #[test]
    fn unknown_keywords_are_skipped() {
        let mesh = load_obj_from_str("mtllib a.mtl\nv 0 0 0\nusemtl x\n").expect("parse");
        assert_eq!(mesh.vertices.len(), 1);
        assert!(mesh.faces.is_empty());
    }

    #[test]
    fn degenerate_face_record_is_kept_as_empty_face() {
        let mesh = load_obj_from_str("v 0 0 0\nf 0/1/1 -2/2/2\n").expect("parse");
        assert_eq!(mesh.faces.len(), 1);
        assert!(mesh.faces[0].points.is_empty());
        assert_eq!(mesh.renderable_faces().count(), 0);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_obj_from_path("definitely/not/here.obj").unwrap_err();
        assert!(matches!(err, MeshError::Open { .. }));
    }

    #[test]
    fn vertex_index_out_of_range_fails() {
        let err = load_obj_from_str("v 0 0 0\nf 1 2 3\n").unwrap_err();
        match err {
            MeshError::IndexOutOfRange {
                line,
                array,
                index,
                len,
            } => {
                assert_eq!(line, 2);
                assert_eq!(array, "vertex");
                assert_eq!(index, 1);
                assert_eq!(len, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn normal_index_out_of_range_fails() {
        let src = "v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//2 3//1\n";
        let err = load_obj_from_str(src).unwrap_err();
        assert!(matches!(
            err,
            MeshError::IndexOutOfRange {
                array: "normal",
                index: 1,
                len: 1,
                ..
            }
        ));
    }

    #[test]
    fn malformed_vertex_field_names_the_line() {
        let err = load_obj_from_str("v 0 0 0\nv 1 nope 0\n").unwrap_err();
        assert!(matches!(err, MeshError::Field { line: 2, .. }));
    }

    #[test]
    fn reader_and_str_agree() {
        let mesh_a = load_obj_from_str(CUBE_ISH).expect("str");
        let mesh_b = load_obj_from_reader(io::Cursor::new(CUBE_ISH)).expect("reader");
        assert_eq!(mesh_a, mesh_b);
    }
}
