//! Scene assembly: turns one [`FrameState`] into draw items.
//!
//! The helicopter is a hierarchy of unit solids hung off the body
//! transform; the rotors additionally spin with the per-tick blade
//! angle. Everything else (ground halves, border ring, patrol boat,
//! tree) is placed directly in world space.

use asset::{MeshObject, TextureData};
use corelib::transform::Transform;
use glam::{Mat4, Vec3, vec3};
use sim::{BODY_RADIUS, FrameState, TAIL_LENGTH, WORLD_RADIUS};

use crate::mesh::mesh_buffer_from_object;
use crate::primitives;
use crate::{DrawItem, GpuState, MeshHandle, TextureHandle};

const SKID_CONNECTOR_RADIUS: f32 = BODY_RADIUS / 10.0;
const SKID_CONNECTOR_LENGTH: f32 = BODY_RADIUS * 0.8;
const SKID_RADIUS: f32 = BODY_RADIUS / 10.0;
const SKID_LENGTH: f32 = BODY_RADIUS * 3.0;
const SKID_ENDING_RADIUS: f32 = SKID_RADIUS;
const WINDSHIELD_RADIUS: f32 = 0.75;
const WINDSHIELD_LENGTH: f32 = 1.5;
const ROTOR_CUBE_SIZE: f32 = 0.8;
const ROTOR_BLADE_SIZE: f32 = 10.0;
const BLADE_COUNT: u32 = 4;
const TAIL_BASE_RADIUS: f32 = 1.0;
const TAIL_TIP_RADIUS: f32 = 0.25;
const TAIL_ROTOR_SCALE: f32 = 0.25;
const BORDER_HEIGHT: f32 = 30.0;
const GRID_SQUARE: f32 = 1.0;

const BODY_BLUE: [f32; 3] = [0.0, 0.0, 0.40];
const CANOPY_CYAN: [f32; 3] = [0.58, 1.0, 1.0];
const STRUT_BROWN: [f32; 3] = [0.545, 0.27, 0.0745];
const ROTOR_GREY: [f32; 3] = [0.3, 0.3, 0.3];
const FOLIAGE_GREEN: [f32; 3] = [0.596, 0.984, 0.596];
const HULL_BROWN: [f32; 3] = [0.42, 0.26, 0.13];
const CABIN_GREY: [f32; 3] = [0.75, 0.75, 0.78];
const BORDER_SLATE: [f32; 3] = [0.45, 0.5, 0.58];
const WHITE: [f32; 3] = [1.0, 1.0, 1.0];

const TREE_POSITION: Vec3 = vec3(-12.0, 0.0, -18.0);

/// Which side of the fuselage a part hangs on. Converted to a
/// coordinate offset at the point of use, never by numeric tricks.
#[derive(Clone, Copy, Debug)]
enum Side {
    Left,
    Right,
}

impl Side {
    const BOTH: [Side; 2] = [Side::Left, Side::Right];

    fn x_sign(self) -> f32 {
        match self {
            Side::Left => -1.0,
            Side::Right => 1.0,
        }
    }
}

/// Whether a skid ending caps the near or far end of its runner.
#[derive(Clone, Copy, Debug)]
enum SkidEnd {
    Back,
    Front,
}

impl SkidEnd {
    const BOTH: [SkidEnd; 2] = [SkidEnd::Back, SkidEnd::Front];

    fn z_offset(self) -> f32 {
        match self {
            SkidEnd::Back => 0.0,
            SkidEnd::Front => SKID_LENGTH,
        }
    }
}

/// GPU handles for everything the scene draws.
pub struct SceneAssets {
    grass_field: MeshHandle,
    water_field: MeshHandle,
    border_wall: MeshHandle,
    sphere: MeshHandle,
    cylinder: MeshHandle,
    tail_boom: MeshHandle,
    cube: MeshHandle,
    tree: Option<MeshHandle>,
    grass_texture: TextureHandle,
    water_texture: TextureHandle,
}

/// Decoded assets handed over by the platform layer.
pub struct SceneInputs {
    pub grass: TextureData,
    pub water: TextureData,
    pub tree: Option<MeshObject>,
}

impl SceneAssets {
    pub fn create(gpu: &mut GpuState, inputs: SceneInputs) -> Self {
        let half = WORLD_RADIUS;
        Self {
            grass_field: gpu.upload_mesh(&primitives::ground_patch(
                -half, half, -half, 0.0, GRID_SQUARE,
            )),
            water_field: gpu.upload_mesh(&primitives::ground_patch(
                -half, half, 0.0, half, GRID_SQUARE,
            )),
            border_wall: gpu.upload_mesh(&primitives::ring_wall(WORLD_RADIUS, BORDER_HEIGHT, 96)),
            sphere: gpu.upload_mesh(&primitives::uv_sphere(24, 32)),
            cylinder: gpu.upload_mesh(&primitives::cylinder(1.0, 1.0, 1.0, 32)),
            tail_boom: gpu.upload_mesh(&primitives::cylinder(
                TAIL_BASE_RADIUS,
                TAIL_TIP_RADIUS,
                TAIL_LENGTH,
                20,
            )),
            cube: gpu.upload_mesh(&primitives::cube()),
            tree: inputs
                .tree
                .as_ref()
                .map(|mesh| gpu.upload_mesh(&mesh_buffer_from_object(mesh))),
            grass_texture: gpu.upload_texture(inputs.grass),
            water_texture: gpu.upload_texture(inputs.water),
        }
    }
}

/// Assemble the draw list for one completed tick.
pub fn build_scene(frame: &FrameState, assets: &SceneAssets) -> Vec<DrawItem> {
    let mut items = Vec::with_capacity(40);

    items.push(DrawItem {
        mesh: assets.grass_field,
        model: Mat4::IDENTITY,
        tint: WHITE,
        texture: Some(assets.grass_texture),
    });
    items.push(DrawItem {
        mesh: assets.water_field,
        model: Mat4::IDENTITY,
        tint: WHITE,
        texture: Some(assets.water_texture),
    });
    items.push(DrawItem {
        mesh: assets.border_wall,
        model: Mat4::IDENTITY,
        tint: BORDER_SLATE,
        texture: None,
    });

    helicopter(frame, assets, &mut items);
    boat(frame, assets, &mut items);

    if let Some(tree) = assets.tree {
        items.push(DrawItem {
            mesh: tree,
            model: Mat4::from_translation(TREE_POSITION),
            tint: FOLIAGE_GREEN,
            texture: Some(assets.grass_texture),
        });
    }

    items
}

fn helicopter(frame: &FrameState, assets: &SceneAssets, items: &mut Vec<DrawItem>) {
    let body = Transform::from_position_heading(
        frame.helicopter.position,
        frame.helicopter.heading_deg,
    )
    .matrix();

    // Fuselage.
    items.push(DrawItem {
        mesh: assets.sphere,
        model: body * Mat4::from_scale(Vec3::splat(BODY_RADIUS)),
        tint: BODY_BLUE,
        texture: None,
    });

    windshield(body, assets, items);

    for side in Side::BOTH {
        skid_connector(body, side, assets, items);
        skid(body, side, assets, items);
    }

    // Top rotor sits just above the fuselage.
    let top_rotor = body * Mat4::from_translation(vec3(0.0, BODY_RADIUS + 0.2, 0.0));
    rotor(top_rotor, frame.rotor_angle_deg, assets, items);

    tail(body, frame.rotor_angle_deg, assets, items);
}

fn windshield(body: Mat4, assets: &SceneAssets, items: &mut Vec<DrawItem>) {
    // A stubby horizontal cylinder across the nose, capped with
    // spheres at both ends.
    let frame = body
        * Mat4::from_translation(vec3(
            -WINDSHIELD_LENGTH / 2.0,
            WINDSHIELD_LENGTH / 3.75,
            WINDSHIELD_LENGTH,
        ))
        * Mat4::from_rotation_y(90f32.to_radians());
    items.push(DrawItem {
        mesh: assets.cylinder,
        model: frame
            * Mat4::from_scale(vec3(WINDSHIELD_RADIUS, WINDSHIELD_RADIUS, WINDSHIELD_LENGTH)),
        tint: CANOPY_CYAN,
        texture: None,
    });
    for z in [0.0, WINDSHIELD_LENGTH] {
        items.push(DrawItem {
            mesh: assets.sphere,
            model: frame
                * Mat4::from_translation(vec3(0.0, 0.0, z))
                * Mat4::from_scale(Vec3::splat(WINDSHIELD_RADIUS)),
            tint: CANOPY_CYAN,
            texture: None,
        });
    }
}

fn skid_connector(body: Mat4, side: Side, assets: &SceneAssets, items: &mut Vec<DrawItem>) {
    let s = side.x_sign();
    let model = body
        * Mat4::from_translation(vec3(BODY_RADIUS / 2.0 * s, -BODY_RADIUS * 0.75, 0.0))
        * Mat4::from_rotation_x(90f32.to_radians())
        * Mat4::from_scale(vec3(
            SKID_CONNECTOR_RADIUS,
            SKID_CONNECTOR_RADIUS,
            SKID_CONNECTOR_LENGTH,
        ));
    items.push(DrawItem {
        mesh: assets.cylinder,
        model,
        tint: STRUT_BROWN,
        texture: None,
    });
}

fn skid(body: Mat4, side: Side, assets: &SceneAssets, items: &mut Vec<DrawItem>) {
    let s = side.x_sign();
    let runner = body
        * Mat4::from_translation(vec3(
            -BODY_RADIUS / 2.0 * s,
            -BODY_RADIUS * 1.5,
            -BODY_RADIUS * 1.5,
        ));
    items.push(DrawItem {
        mesh: assets.cylinder,
        model: runner * Mat4::from_scale(vec3(SKID_RADIUS, SKID_RADIUS, SKID_LENGTH)),
        tint: STRUT_BROWN,
        texture: None,
    });
    for end in SkidEnd::BOTH {
        items.push(DrawItem {
            mesh: assets.sphere,
            model: runner
                * Mat4::from_translation(vec3(0.0, 0.0, end.z_offset()))
                * Mat4::from_scale(Vec3::splat(SKID_ENDING_RADIUS)),
            tint: STRUT_BROWN,
            texture: None,
        });
    }
}

/// Four spinning blades around a flattened hub cube. Used unscaled on
/// top of the fuselage and pre-scaled at the tail tip.
fn rotor(base: Mat4, angle_deg: f32, assets: &SceneAssets, items: &mut Vec<DrawItem>) {
    for blade in 1..=BLADE_COUNT {
        let spin = (360.0 / BLADE_COUNT as f32) * blade as f32 + angle_deg;
        items.push(DrawItem {
            mesh: assets.cube,
            model: base
                * Mat4::from_translation(vec3(0.0, ROTOR_CUBE_SIZE / 2.0 - 0.2, 0.0))
                * Mat4::from_rotation_y(spin.to_radians())
                * Mat4::from_scale(vec3(
                    ROTOR_BLADE_SIZE,
                    ROTOR_BLADE_SIZE * 0.02,
                    ROTOR_BLADE_SIZE * 0.05,
                )),
            tint: ROTOR_GREY,
            texture: None,
        });
    }
    items.push(DrawItem {
        mesh: assets.cube,
        model: base
            * Mat4::from_scale(vec3(
                0.2 * ROTOR_CUBE_SIZE,
                ROTOR_CUBE_SIZE,
                0.2 * ROTOR_CUBE_SIZE,
            )),
        tint: ROTOR_GREY,
        texture: None,
    });
}

fn tail(body: Mat4, rotor_angle_deg: f32, assets: &SceneAssets, items: &mut Vec<DrawItem>) {
    // The boom runs backwards: flip the frame so +Z points aft.
    let boom = body * Mat4::from_rotation_x(180f32.to_radians());
    items.push(DrawItem {
        mesh: assets.tail_boom,
        model: boom,
        tint: BODY_BLUE,
        texture: None,
    });

    let tip = boom * Mat4::from_translation(vec3(0.0, 0.0, TAIL_LENGTH));
    items.push(DrawItem {
        mesh: assets.sphere,
        model: tip * Mat4::from_scale(Vec3::splat(TAIL_TIP_RADIUS)),
        tint: BODY_BLUE,
        texture: None,
    });

    // Small side-facing rotor at the tip, sharing the blade angle.
    let tail_rotor = tip
        * Mat4::from_rotation_z(90f32.to_radians())
        * Mat4::from_translation(vec3(0.0, TAIL_TIP_RADIUS * 1.35, 0.0))
        * Mat4::from_scale(Vec3::splat(TAIL_ROTOR_SCALE));
    rotor(tail_rotor, rotor_angle_deg, assets, items);
}

fn boat(frame: &FrameState, assets: &SceneAssets, items: &mut Vec<DrawItem>) {
    let base = Transform::from_position_heading(frame.boat.position, frame.boat.heading_deg)
        .matrix();
    items.push(DrawItem {
        mesh: assets.cube,
        model: base
            * Mat4::from_translation(vec3(0.0, 0.5, 0.0))
            * Mat4::from_scale(vec3(2.2, 1.0, 5.0)),
        tint: HULL_BROWN,
        texture: None,
    });
    items.push(DrawItem {
        mesh: assets.cube,
        model: base
            * Mat4::from_translation(vec3(0.0, 1.35, -0.8))
            * Mat4::from_scale(vec3(1.4, 0.7, 1.8)),
        tint: CABIN_GREY,
        texture: None,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;
    use sim::BodyPose;

    fn test_frame() -> FrameState {
        FrameState {
            helicopter: BodyPose {
                position: vec3(0.0, 3.8, 0.0),
                heading_deg: 0.0,
            },
            rotor_angle_deg: 45.0,
            boat: BodyPose {
                position: vec3(0.0, 0.0, 25.0),
                heading_deg: 90.0,
            },
            camera_eye: vec3(0.0, 11.3, -15.0),
            camera_target: vec3(0.0, 3.8, 0.0),
        }
    }

    #[test]
    fn side_lookup_is_symmetric() {
        assert_eq!(Side::Left.x_sign(), -Side::Right.x_sign());
        assert_eq!(SkidEnd::Back.z_offset(), 0.0);
        assert_eq!(SkidEnd::Front.z_offset(), SKID_LENGTH);
    }

    #[test]
    fn rotor_emits_blades_plus_hub() {
        let mut items = Vec::new();
        let assets = dummy_assets();
        rotor(Mat4::IDENTITY, 0.0, &assets, &mut items);
        assert_eq!(items.len(), (BLADE_COUNT + 1) as usize);
    }

    #[test]
    fn blade_spin_angle_rotates_the_blades() {
        let assets = dummy_assets();
        let mut at_zero = Vec::new();
        let mut at_quarter = Vec::new();
        rotor(Mat4::IDENTITY, 0.0, &assets, &mut at_zero);
        rotor(Mat4::IDENTITY, 45.0, &assets, &mut at_quarter);
        // The hub is angle-independent, the blades are not.
        assert_eq!(
            at_zero.last().unwrap().model,
            at_quarter.last().unwrap().model
        );
        assert_ne!(at_zero[0].model, at_quarter[0].model);
    }

    #[test]
    fn tail_boom_points_aft() {
        let mut items = Vec::new();
        let assets = dummy_assets();
        let frame = test_frame();
        let body = Transform::from_position_heading(
            frame.helicopter.position,
            frame.helicopter.heading_deg,
        )
        .matrix();
        tail(body, frame.rotor_angle_deg, &assets, &mut items);
        // The boom mesh extends along its local +Z; at heading 0 the
        // tip must land behind the body (world -Z).
        let tip_world = items[1].model * glam::vec4(0.0, 0.0, 0.0, 1.0);
        assert!(tip_world.z < frame.helicopter.position.z - TAIL_LENGTH + 0.1);
        assert!((tip_world.xyz().y - frame.helicopter.position.y).abs() < 1e-4);
    }

    #[test]
    fn scene_covers_every_body() {
        let assets = dummy_assets();
        let items = build_scene(&test_frame(), &assets);
        // Ground halves, border, helicopter parts, boat; no tree in
        // the dummy asset set.
        assert!(items.len() > 20);
        assert!(items.iter().any(|i| i.texture.is_some()));
        assert!(items.iter().any(|i| i.tint == BODY_BLUE));
    }

    fn dummy_assets() -> SceneAssets {
        SceneAssets {
            grass_field: MeshHandle(0),
            water_field: MeshHandle(1),
            border_wall: MeshHandle(2),
            sphere: MeshHandle(3),
            cylinder: MeshHandle(4),
            tail_boom: MeshHandle(5),
            cube: MeshHandle(6),
            tree: None,
            grass_texture: TextureHandle(0),
            water_texture: TextureHandle(1),
        }
    }
}
