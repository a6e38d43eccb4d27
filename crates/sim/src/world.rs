//! The fixed-timestep world update.
//!
//! One call to [`SimulationState::think`] advances every animated body
//! by one tick. The timestep is an explicit parameter so the update is
//! testable without a clock; the platform layer passes
//! [`TICK_SECONDS`] when running for real.

use glam::{Vec3, vec3};

use crate::motion::MotionIntent;

/// Target frame rate the demo paces itself to.
pub const TARGET_FPS: u32 = 60;

/// Ideal frame duration in whole milliseconds. Truncated first so the
/// simulated step matches the scheduler's actual sleep granularity.
pub const FRAME_TIME_MS: u64 = (1000 / TARGET_FPS) as u64;

/// [`FRAME_TIME_MS`] in fractional seconds.
pub const TICK_SECONDS: f32 = FRAME_TIME_MS as f32 / 1000.0;

const YAW_RATE_DEG: f32 = 90.0;
const MOVE_SPEED: f32 = 10.0;
const HEAVE_SPEED: f32 = MOVE_SPEED / 2.0;

/// Fuselage sphere radius; also used by the renderer for part sizing.
pub const BODY_RADIUS: f32 = 2.0;
const SKID_CONNECTOR_LENGTH: f32 = BODY_RADIUS * 0.8;
const SKID_RADIUS: f32 = BODY_RADIUS / 10.0;
/// Hover height with the skids just touching the ground.
pub const START_HEIGHT: f32 = BODY_RADIUS + SKID_CONNECTOR_LENGTH + SKID_RADIUS;
/// Hard altitude cap.
pub const CEILING_HEIGHT: f32 = 50.0;

/// Tail boom length from the fuselage centre.
pub const TAIL_LENGTH: f32 = 6.5;
/// Radius of the circular world.
pub const WORLD_RADIUS: f32 = 50.0;
/// Planar clamp radius: the whole craft, tail included, stays inside
/// the world circle.
pub const BORDER_RADIUS: f32 = WORLD_RADIUS - BODY_RADIUS - TAIL_LENGTH;

const ROTOR_MAX_SPEED: f32 = 750.0;
const ROTOR_ACCELERATION: f32 = 100.0;

const CAMERA_DISTANCE: f32 = 15.0;
const CAMERA_HEIGHT_OFFSET: f32 = 7.5;
const DEBUG_EYE_Z: f32 = 12.0;

const BOAT_SPEED: f32 = 2.5;
const BOAT_TURN_RATE_DEG: f32 = 10.0;

/// Position and heading of one animated body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyPose {
    pub position: Vec3,
    /// Heading in degrees about +Y; free-running, not normalized.
    pub heading_deg: f32,
}

impl BodyPose {
    /// Horizontal unit direction the body is facing.
    #[inline]
    pub fn forward(&self) -> (f32, f32) {
        heading_vector(self.heading_deg)
    }
}

/// Debug camera presets, selectable at runtime for inspecting the
/// model from fixed angles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CameraPreset {
    Default,
    Front,
    Top,
    Low,
    ZoomedOut,
}

impl CameraPreset {
    /// Vertical and depth offsets applied to the camera rig.
    fn offsets(self) -> (f32, f32) {
        match self {
            CameraPreset::Default => (5.0, 0.0),
            CameraPreset::Front => (0.0, 0.0),
            CameraPreset::Top => (20.0, -11.99),
            CameraPreset::Low => (-4.0, 0.0),
            CameraPreset::ZoomedOut => (5.0, 5.0),
        }
    }
}

/// Camera placement state. In chase mode the eye trails the craft
/// along its heading; in debug mode the eye sits at a fixed spot and
/// tracks the craft's vertical motion only.
#[derive(Clone, Copy, Debug)]
struct CameraRig {
    debug: bool,
    offset: Vec3,
}

impl Default for CameraRig {
    fn default() -> Self {
        Self {
            debug: false,
            offset: vec3(0.0, CAMERA_HEIGHT_OFFSET, 0.0),
        }
    }
}

impl CameraRig {
    fn eye(&self, craft: &BodyPose) -> Vec3 {
        if self.debug {
            vec3(
                self.offset.x,
                craft.position.y + self.offset.y,
                DEBUG_EYE_Z + self.offset.z,
            )
        } else {
            let (dx, dz) = craft.forward();
            vec3(
                craft.position.x - dx * CAMERA_DISTANCE,
                craft.position.y + self.offset.y,
                craft.position.z - dz * CAMERA_DISTANCE,
            )
        }
    }
}

/// Everything the renderer needs from one completed tick.
#[derive(Clone, Copy, Debug)]
pub struct FrameState {
    pub helicopter: BodyPose,
    pub rotor_angle_deg: f32,
    pub boat: BodyPose,
    pub camera_eye: Vec3,
    pub camera_target: Vec3,
}

/// All mutable simulation state, owned by the platform layer and
/// mutated only through [`think`](Self::think) and the camera toggles.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub helicopter: BodyPose,
    /// Current blade angle in degrees, wrapped at a full turn.
    pub rotor_angle_deg: f32,
    /// Current blade speed in degrees per second; ramps up from zero.
    pub rotor_speed: f32,
    pub boat: BodyPose,
    camera: CameraRig,
    camera_eye: Vec3,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationState {
    pub fn new() -> Self {
        let helicopter = BodyPose {
            position: vec3(0.0, START_HEIGHT, 0.0),
            heading_deg: 0.0,
        };
        let boat = BodyPose {
            position: vec3(0.0, 0.0, 25.0),
            heading_deg: 90.0,
        };
        let camera = CameraRig::default();
        let camera_eye = camera.eye(&helicopter);
        Self {
            helicopter,
            rotor_angle_deg: 0.0,
            rotor_speed: 0.0,
            boat,
            camera,
            camera_eye,
        }
    }

    /// Advance the world by one tick of `dt` seconds.
    pub fn think(&mut self, intent: MotionIntent, dt: f32) {
        if self.rotor_speed >= ROTOR_MAX_SPEED {
            self.apply_motion(intent, dt);
        } else {
            // Still spinning up: motion is not honored yet.
            self.rotor_speed += ROTOR_ACCELERATION * dt;
        }

        // Keep the angle bounded before integrating the spin.
        if self.rotor_angle_deg > 360.0 {
            self.rotor_angle_deg = 0.0;
        }
        self.rotor_angle_deg += self.rotor_speed * dt;

        self.advance_boat(dt);
        self.clamp_to_border();
        self.camera_eye = self.camera.eye(&self.helicopter);
    }

    fn apply_motion(&mut self, intent: MotionIntent, dt: f32) {
        if !intent.yaw.is_none() {
            self.helicopter.heading_deg += YAW_RATE_DEG * dt * intent.yaw.factor();
        }
        if !intent.surge.is_none() {
            let (dx, dz) = self.helicopter.forward();
            let step = MOVE_SPEED * dt * intent.surge.factor();
            self.helicopter.position.x += dx * step;
            self.helicopter.position.z += dz * step;
        }
        if !intent.sway.is_none() {
            // Strafe deltas are subtracted where surge adds them; the
            // strafe direction is the heading turned a quarter left.
            let (dx, dz) = heading_vector(self.helicopter.heading_deg + 90.0);
            let step = MOVE_SPEED * dt * intent.sway.factor();
            self.helicopter.position.x -= dx * step;
            self.helicopter.position.z -= dz * step;
        }
        if !intent.heave.is_none() {
            // Climb is blocked at the ceiling, descent at the ground
            // contact height; the opposite direction always works.
            let y = &mut self.helicopter.position.y;
            *y = (*y + HEAVE_SPEED * dt * intent.heave.factor())
                .clamp(START_HEIGHT, CEILING_HEIGHT);
        }
    }

    fn advance_boat(&mut self, dt: f32) {
        // Open-loop patrol: constant turn, constant speed, no input.
        self.boat.heading_deg += BOAT_TURN_RATE_DEG * dt;
        let (dx, dz) = self.boat.forward();
        self.boat.position.x += dx * BOAT_SPEED * dt;
        self.boat.position.z += dz * BOAT_SPEED * dt;
    }

    /// Pull the craft back onto the boundary circle if the last move
    /// crossed it, preserving the polar angle.
    fn clamp_to_border(&mut self) {
        let x = self.helicopter.position.x;
        let z = self.helicopter.position.z;
        let dist = (x * x + z * z).sqrt();
        if dist > BORDER_RADIUS {
            let scale = BORDER_RADIUS / dist;
            self.helicopter.position.x = x * scale;
            self.helicopter.position.z = z * scale;
        }
    }

    /// Immutable per-frame snapshot for the render handoff.
    pub fn frame(&self) -> FrameState {
        FrameState {
            helicopter: self.helicopter,
            rotor_angle_deg: self.rotor_angle_deg,
            boat: self.boat,
            camera_eye: self.camera_eye,
            camera_target: self.helicopter.position,
        }
    }

    /// Flip between the chase camera and the fixed debug camera.
    pub fn toggle_debug_camera(&mut self) {
        self.camera.debug = !self.camera.debug;
        if self.camera.debug {
            self.camera.offset = vec3(0.0, 5.0, 0.0);
        }
        self.camera_eye = self.camera.eye(&self.helicopter);
    }

    /// Apply one of the fixed inspection offsets to the camera rig.
    pub fn set_camera_preset(&mut self, preset: CameraPreset) {
        let (y, z) = preset.offsets();
        self.camera.offset.y = y;
        self.camera.offset.z = z;
        self.camera_eye = self.camera.eye(&self.helicopter);
    }

    #[cfg(test)]
    fn with_rotor_at_speed() -> Self {
        let mut state = Self::new();
        state.rotor_speed = ROTOR_MAX_SPEED;
        state
    }
}

/// Horizontal unit vector for a heading in degrees: +Z at heading 0,
/// rotating towards +X as the heading grows.
#[inline]
fn heading_vector(heading_deg: f32) -> (f32, f32) {
    let rad = heading_deg.to_radians();
    (rad.sin(), rad.cos())
}
