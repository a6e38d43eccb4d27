//! Platform layer: windowing, fixed-frame pacing and input routing.
//!
//! One thread alternates between waiting for the tick boundary,
//! advancing the simulation exactly once, and handing the completed
//! state to the renderer. Key events mutate the intent immediately as
//! they arrive between ticks; the last transition before a tick wins.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use asset::TextureData;
use corelib::{Vec3, camera::Camera};
use renderer::scene::{SceneAssets, SceneInputs, build_scene};
use renderer::GpuState;
use sim::{
    CameraPreset, MotionIntent, MotionKey, MotionKeys, SimulationState, TICK_SECONDS,
    world::FRAME_TIME_MS,
};

/// Everything the binary decides before the loop starts.
pub struct RunConfig {
    pub backends: wgpu::Backends,
    pub width: u32,
    pub height: u32,
    pub assets_dir: PathBuf,
    pub show_fps: bool,
}

/// Load assets, open the window and run until the user exits.
pub fn run(config: RunConfig) -> Result<()> {
    let inputs = load_scene_inputs(&config.assets_dir);

    let event_loop = EventLoop::new().context("Failed to create event loop")?;
    let mut app = DemoApp::new(config, inputs);
    event_loop.run_app(&mut app).context("Event loop error")?;
    Ok(())
}

/// Decode the scene assets, recovering from anything that fails: a
/// missing texture becomes a checkerboard, a missing tree is omitted.
fn load_scene_inputs(dir: &Path) -> SceneInputs {
    let grass = asset::ppm::load_ppm_from_path(dir.join("grass.ppm")).unwrap_or_else(|err| {
        log::warn!("grass texture unavailable ({err}); using checkerboard");
        TextureData::checkerboard(32)
    });
    let water = asset::ppm::load_ppm_from_path(dir.join("water.ppm")).unwrap_or_else(|err| {
        log::warn!("water texture unavailable ({err}); using checkerboard");
        TextureData::checkerboard(32)
    });
    let tree = match asset::obj::load_obj_from_path(dir.join("tree.obj")) {
        Ok(mesh) => Some(mesh),
        Err(err) => {
            log::warn!("tree mesh unavailable ({err}); the scene will omit it");
            None
        }
    };
    SceneInputs { grass, water, tree }
}

struct DemoApp {
    config: RunConfig,
    // Taken on first resume, once the GPU exists to upload into.
    pending_inputs: Option<SceneInputs>,

    window: Option<Arc<Window>>,
    gpu: Option<GpuState>,
    scene: Option<SceneAssets>,

    sim: SimulationState,
    keys: MotionKeys,
    intent: MotionIntent,
    wireframe: bool,

    tick: Duration,
    next_tick: Instant,

    fps_frames: u32,
    fps_window: Instant,
}

impl DemoApp {
    fn new(config: RunConfig, inputs: SceneInputs) -> Self {
        Self {
            config,
            pending_inputs: Some(inputs),
            window: None,
            gpu: None,
            scene: None,
            sim: SimulationState::new(),
            keys: MotionKeys::default(),
            intent: MotionIntent::default(),
            wireframe: false,
            tick: Duration::from_millis(FRAME_TIME_MS),
            next_tick: Instant::now(),
            fps_frames: 0,
            fps_window: Instant::now(),
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, event: KeyEvent) {
        let PhysicalKey::Code(code) = event.physical_key else {
            return;
        };
        let pressed = event.state == ElementState::Pressed;

        if let Some(key) = motion_key(code) {
            if pressed {
                self.keys.press(key, &mut self.intent);
            } else {
                self.keys.release(key, &mut self.intent);
            }
            return;
        }

        if !pressed {
            return;
        }
        match code {
            KeyCode::KeyL => {
                self.wireframe = !self.wireframe;
            }
            KeyCode::Escape => {
                log::info!("Exit requested");
                event_loop.exit();
            }
            KeyCode::Equal => self.sim.toggle_debug_camera(),
            KeyCode::Digit1 => self.sim.set_camera_preset(CameraPreset::Default),
            KeyCode::Digit2 => self.sim.set_camera_preset(CameraPreset::Front),
            KeyCode::Digit3 => self.sim.set_camera_preset(CameraPreset::Top),
            KeyCode::Digit4 => self.sim.set_camera_preset(CameraPreset::Low),
            KeyCode::Digit5 => self.sim.set_camera_preset(CameraPreset::ZoomedOut),
            _ => {}
        }
    }

    /// Advance the world if the tick boundary passed, then draw the
    /// latest completed state.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();
        if now >= self.next_tick {
            self.sim.think(self.intent, TICK_SECONDS);
            self.next_tick = now + self.tick;
            self.count_frame();
        }

        let (Some(gpu), Some(scene)) = (self.gpu.as_mut(), self.scene.as_ref()) else {
            return;
        };

        let frame = self.sim.frame();
        let camera = Camera::new_perspective(
            frame.camera_eye,
            frame.camera_target,
            Vec3::Y,
            60f32.to_radians(),
            1.0,
            500.0,
            gpu.aspect(),
        );
        let items = build_scene(&frame, scene);

        match gpu.render(&camera, &items, self.wireframe) {
            Ok(()) => {}
            Err(err) if GpuState::is_surface_lost(&err) => {
                log::warn!("surface lost, recreating");
                gpu.recreate_surface();
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, exiting");
                event_loop.exit();
            }
            Err(err) => {
                log::warn!("frame skipped: {err:?}");
            }
        }
    }

    fn count_frame(&mut self) {
        if !self.config.show_fps {
            return;
        }
        self.fps_frames += 1;
        let elapsed = self.fps_window.elapsed();
        if elapsed >= Duration::from_secs(1) {
            log::info!("{:.1} fps", self.fps_frames as f32 / elapsed.as_secs_f32());
            self.fps_frames = 0;
            self.fps_window = Instant::now();
        }
    }
}

impl ApplicationHandler for DemoApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attributes = Window::default_attributes()
            .with_title("Skylift")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attributes) {
            Ok(window) => Arc::new(window),
            Err(err) => {
                log::error!("Failed to create window: {err}");
                event_loop.exit();
                return;
            }
        };
        log::info!(
            "Window created: {}x{}",
            window.inner_size().width,
            window.inner_size().height
        );

        let mut gpu = pollster::block_on(GpuState::new(window.clone(), self.config.backends));
        if let Some(inputs) = self.pending_inputs.take() {
            self.scene = Some(SceneAssets::create(&mut gpu, inputs));
        }
        self.gpu = Some(gpu);
        self.window = Some(window);
        self.next_tick = Instant::now();
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested. Exiting event loop.");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = self.gpu.as_mut() {
                    gpu.resize(new_size.width, new_size.height);
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                // Repeats are synthetic; the key state machine only
                // wants real transitions.
                if !event.repeat {
                    self.handle_key(event_loop, event);
                }
            }
            WindowEvent::RedrawRequested => {
                self.redraw(event_loop);
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Sleep until the tick boundary; wake-ups at or past it get a
        // redraw, which runs the tick.
        if Instant::now() >= self.next_tick {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(self.next_tick));
    }
}

fn motion_key(code: KeyCode) -> Option<MotionKey> {
    Some(match code {
        KeyCode::KeyW => MotionKey::MoveForward,
        KeyCode::KeyS => MotionKey::MoveBackward,
        KeyCode::KeyA => MotionKey::MoveLeft,
        KeyCode::KeyD => MotionKey::MoveRight,
        KeyCode::ArrowUp => MotionKey::MoveUp,
        KeyCode::ArrowDown => MotionKey::MoveDown,
        KeyCode::ArrowLeft => MotionKey::TurnLeft,
        KeyCode::ArrowRight => MotionKey::TurnRight,
        _ => return None,
    })
}
