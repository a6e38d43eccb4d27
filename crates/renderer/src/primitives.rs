//! CPU-side mesh builders for the procedural scene pieces: ground
//! patches, the world border ring, and the unit solids the
//! hierarchical models are assembled from.

use std::f32::consts::{PI, TAU};

use crate::Vertex;

/// Vertices plus triangle indices, ready for upload.
#[derive(Clone, Debug, Default)]
pub struct MeshBuffer {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl MeshBuffer {
    fn push_quad(&mut self, corners: [[f32; 3]; 4], normal: [f32; 3], uvs: [[f32; 2]; 4]) {
        let base = self.vertices.len() as u32;
        for (pos, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(Vertex { pos, normal, uv });
        }
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
}

const UP: [f32; 3] = [0.0, 1.0, 0.0];

/// Flat ground rectangle in the XZ plane tiled into `square`-sized
/// quads, each carrying the full 0..1 texture range (the texture
/// repeats per square).
pub fn ground_patch(x0: f32, x1: f32, z0: f32, z1: f32, square: f32) -> MeshBuffer {
    let mut buf = MeshBuffer::default();
    let mut z = z0;
    while z < z1 - 1e-6 {
        let z2 = (z + square).min(z1);
        let mut x = x0;
        while x < x1 - 1e-6 {
            let x2 = (x + square).min(x1);
            buf.push_quad(
                [
                    [x, 0.0, z],
                    [x, 0.0, z2],
                    [x2, 0.0, z2],
                    [x2, 0.0, z],
                ],
                UP,
                [[0.0, 1.0], [0.0, 0.0], [1.0, 0.0], [1.0, 1.0]],
            );
            x = x2;
        }
        z = z2;
    }
    buf
}

/// Axis-aligned unit cube centred on the origin.
pub fn cube() -> MeshBuffer {
    let mut buf = MeshBuffer::default();
    let h = 0.5;
    let face_uvs = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
    // +Z
    buf.push_quad(
        [[-h, -h, h], [h, -h, h], [h, h, h], [-h, h, h]],
        [0.0, 0.0, 1.0],
        face_uvs,
    );
    // -Z
    buf.push_quad(
        [[h, -h, -h], [-h, -h, -h], [-h, h, -h], [h, h, -h]],
        [0.0, 0.0, -1.0],
        face_uvs,
    );
    // +X
    buf.push_quad(
        [[h, -h, h], [h, -h, -h], [h, h, -h], [h, h, h]],
        [1.0, 0.0, 0.0],
        face_uvs,
    );
    // -X
    buf.push_quad(
        [[-h, -h, -h], [-h, -h, h], [-h, h, h], [-h, h, -h]],
        [-1.0, 0.0, 0.0],
        face_uvs,
    );
    // +Y
    buf.push_quad(
        [[-h, h, h], [h, h, h], [h, h, -h], [-h, h, -h]],
        [0.0, 1.0, 0.0],
        face_uvs,
    );
    // -Y
    buf.push_quad(
        [[-h, -h, -h], [h, -h, -h], [h, -h, h], [-h, -h, h]],
        [0.0, -1.0, 0.0],
        face_uvs,
    );
    buf
}

/// Unit-radius UV sphere centred on the origin.
pub fn uv_sphere(stacks: u32, slices: u32) -> MeshBuffer {
    let mut buf = MeshBuffer::default();
    for stack in 0..=stacks {
        let phi = PI * stack as f32 / stacks as f32;
        let y = phi.cos();
        let ring = phi.sin();
        for slice in 0..=slices {
            let theta = TAU * slice as f32 / slices as f32;
            let x = ring * theta.sin();
            let z = ring * theta.cos();
            buf.vertices.push(Vertex {
                pos: [x, y, z],
                normal: [x, y, z],
                uv: [
                    slice as f32 / slices as f32,
                    stack as f32 / stacks as f32,
                ],
            });
        }
    }
    for stack in 0..stacks {
        for slice in 0..slices {
            let a = stack * (slices + 1) + slice;
            let b = a + slices + 1;
            buf.indices.extend_from_slice(&[a, b, a + 1]);
            buf.indices.extend_from_slice(&[a + 1, b, b + 1]);
        }
    }
    buf
}

/// Open-ended cylinder (or truncated cone) along +Z from the origin,
/// like the GLU quadric the original scene was built from. Ends are
/// left open; the models cap them with spheres where they show.
pub fn cylinder(radius_base: f32, radius_top: f32, length: f32, segments: u32) -> MeshBuffer {
    let mut buf = MeshBuffer::default();
    let slant = (radius_base - radius_top) / length;
    for (z, radius) in [(0.0, radius_base), (length, radius_top)] {
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            let normal_len = (1.0 + slant * slant).sqrt();
            buf.vertices.push(Vertex {
                pos: [radius * cos, radius * sin, z],
                normal: [cos / normal_len, sin / normal_len, slant / normal_len],
                uv: [seg as f32 / segments as f32, z / length],
            });
        }
    }
    let top = segments + 1;
    for seg in 0..segments {
        let a = seg;
        let b = seg + top;
        buf.indices.extend_from_slice(&[a, a + 1, b + 1]);
        buf.indices.extend_from_slice(&[a, b + 1, b]);
    }
    buf
}

/// Vertical wall ring around the origin with inward-facing surfaces;
/// the world boundary the craft is clamped inside.
pub fn ring_wall(radius: f32, height: f32, segments: u32) -> MeshBuffer {
    let mut buf = MeshBuffer::default();
    for y in [0.0, height] {
        for seg in 0..=segments {
            let theta = TAU * seg as f32 / segments as f32;
            let (sin, cos) = theta.sin_cos();
            buf.vertices.push(Vertex {
                pos: [radius * sin, y, radius * cos],
                normal: [-sin, 0.0, -cos],
                uv: [4.0 * seg as f32 / segments as f32, y / height],
            });
        }
    }
    let top = segments + 1;
    for seg in 0..segments {
        let a = seg;
        let b = seg + top;
        buf.indices.extend_from_slice(&[a + 1, a, b]);
        buf.indices.extend_from_slice(&[a + 1, b, b + 1]);
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normals_are_unit(buf: &MeshBuffer) -> bool {
        buf.vertices.iter().all(|v| {
            let [x, y, z] = v.normal;
            ((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-4
        })
    }

    #[test]
    fn cube_has_six_quads() {
        let buf = cube();
        assert_eq!(buf.vertices.len(), 24);
        assert_eq!(buf.indices.len(), 36);
        assert!(normals_are_unit(&buf));
    }

    #[test]
    fn ground_patch_tiles_exactly() {
        let buf = ground_patch(0.0, 4.0, 0.0, 2.0, 1.0);
        // 8 squares, 4 vertices / 6 indices each.
        assert_eq!(buf.vertices.len(), 32);
        assert_eq!(buf.indices.len(), 48);
        assert!(buf.vertices.iter().all(|v| v.pos[1] == 0.0));
    }

    #[test]
    fn sphere_is_unit_radius() {
        let buf = uv_sphere(8, 12);
        assert!(normals_are_unit(&buf));
        for v in &buf.vertices {
            let [x, y, z] = v.pos;
            assert!(((x * x + y * y + z * z).sqrt() - 1.0).abs() < 1e-4);
        }
        assert!(!buf.indices.is_empty());
    }

    #[test]
    fn cone_normals_lean_along_the_slant() {
        let buf = cylinder(1.0, 0.25, 6.5, 16);
        assert!(normals_are_unit(&buf));
        // Narrowing towards +Z tips normals forward.
        assert!(buf.vertices.iter().all(|v| v.normal[2] > 0.0));
    }

    #[test]
    fn ring_wall_faces_inward() {
        let buf = ring_wall(50.0, 30.0, 32);
        for v in &buf.vertices {
            let dot = v.pos[0] * v.normal[0] + v.pos[2] * v.normal[2];
            assert!(dot < 0.0);
        }
    }

    #[test]
    fn indices_stay_in_range() {
        for buf in [cube(), uv_sphere(6, 9), cylinder(1.0, 1.0, 1.0, 12), ring_wall(5.0, 2.0, 12)] {
            let count = buf.vertices.len() as u32;
            assert!(buf.indices.iter().all(|&i| i < count));
        }
    }
}
