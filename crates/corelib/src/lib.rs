//! Core types: math re-exports, Transform, Camera.

pub use glam::{EulerRot, Mat4, Quat, Vec3, vec3};

pub mod camera;
pub mod transform;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_transform_is_identity_matrix() {
        let t = transform::Transform::identity();
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn heading_zero_faces_positive_z() {
        // Forward for a simulated body is +Z at heading 0; placing the
        // body must not turn a forward-pointing vector.
        let t = transform::Transform::from_position_heading(vec3(1.0, 2.0, 3.0), 0.0);
        let forward = t.matrix().transform_vector3(Vec3::Z);
        assert!((forward - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn heading_rotates_anticlockwise_about_y() {
        // +90 degrees of heading turns +Z into +X, the left-turn
        // convention seen from above that the simulation's yaw uses.
        let t = transform::Transform::from_position_heading(Vec3::ZERO, 90.0);
        let forward = t.matrix().transform_vector3(Vec3::Z);
        assert!((forward - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn camera_pv_is_finite() {
        let cam = camera::Camera::new_perspective(
            vec3(0.0, 5.0, 12.0),
            vec3(0.0, 3.8, 0.0),
            Vec3::Y,
            60f32.to_radians(),
            1.0,
            500.0,
            16.0 / 9.0,
        );
        let pv = cam.proj_view();
        let a = pv.to_cols_array();
        assert!(a.iter().all(|f| f.is_finite()));
    }

    #[test]
    fn retarget_moves_eye_and_target_only() {
        let mut cam = camera::Camera::new_perspective(
            Vec3::ZERO,
            Vec3::Z,
            Vec3::Y,
            60f32.to_radians(),
            1.0,
            500.0,
            4.0 / 3.0,
        );
        cam.retarget(vec3(0.0, 10.0, -15.0), vec3(0.0, 3.8, 0.0));
        assert_eq!(cam.eye, vec3(0.0, 10.0, -15.0));
        assert_eq!(cam.target, vec3(0.0, 3.8, 0.0));
        assert!((cam.aspect - 4.0 / 3.0).abs() < 1e-6);
    }
}
