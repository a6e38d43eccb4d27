//! Simulation core: keyboard intent resolution and the fixed-timestep
//! animation state machine.
//!
//! Nothing here touches a clock or a window. The platform layer feeds
//! key transitions into [`MotionKeys`]/[`MotionIntent`], then calls
//! [`SimulationState::think`] once per tick with an explicit timestep,
//! and hands the resulting [`FrameState`] to the renderer.

pub mod input;
pub mod motion;
pub mod world;

pub use input::{MotionKey, MotionKeys};
pub use motion::{Drive, Lift, MotionIntent, Strafe, Turn};
pub use world::{
    BODY_RADIUS, BORDER_RADIUS, BodyPose, CameraPreset, CEILING_HEIGHT, FrameState,
    SimulationState, START_HEIGHT, TAIL_LENGTH, TICK_SECONDS, WORLD_RADIUS,
};
