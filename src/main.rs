//! Vibescape - generative music with audio-reactive visuals
//!
//! Press Enter (or click) to start the music; the six shapes on stage
//! follow the bass, hats, melody and pad as they play.

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Fullscreen, Window, WindowId},
};

use vibescape::audio::{AudioEngine, Channel, DeviceOutput, VoiceKind};
use vibescape::camera::CameraSystem;
use vibescape::cli::Args;
use vibescape::control::ControlSurface;
use vibescape::logging;
use vibescape::params::{RenderConfig, StageParams};
use vibescape::rendering::{RenderSystem, Uniforms};
use vibescape::scene::Stage;
use vibescape::visuals::VisualKind;

const TITLE: &str = "Vibescape";

/// Percent step for keyboard volume nudges
const VOLUME_STEP: i16 = 5;

/// Main application state
struct App {
    // Window and rendering
    window: Option<Arc<Window>>,
    render_system: Option<RenderSystem>,

    // Audio, controls and stage
    engine: AudioEngine<DeviceOutput>,
    controls: ControlSurface,
    stage: Stage,
    camera: CameraSystem,

    // Configuration
    render_config: RenderConfig,
    autostart: bool,

    // Status shown in the title bar
    start_error: Option<String>,
    title: String,

    // Bootstrap failure reported from main()
    fatal: Option<anyhow::Error>,

    // Time tracking
    start_time: Instant,
}

impl App {
    fn new(args: &Args) -> Self {
        let engine = AudioEngine::with_device(args.engine_config());
        let controls = ControlSurface::new(&engine);
        let stage = Stage::new(StageParams::default(), controls.visibility());

        Self {
            window: None,
            render_system: None,
            engine,
            controls,
            stage,
            camera: CameraSystem::new(args.parse_camera_preset()),
            render_config: args.render_config(),
            autostart: args.autostart,
            start_error: None,
            title: String::new(),
            fatal: None,
            start_time: Instant::now(),
        }
    }

    /// The user's start action: initialise audio and begin playback
    fn start_experience(&mut self) {
        if self.engine.is_initialized() {
            return;
        }

        match self.engine.initialize() {
            Ok(()) => {
                self.start_error = None;
                self.engine.play();
                self.controls.sync_playing(&self.engine);
            }
            Err(e) => {
                error!("Failed to initialize audio: {}", e);
                self.start_error = Some(format!("Failed to initialize audio ({}). Press Enter to retry", e));
            }
        }
        self.refresh_title();
    }

    fn refresh_title(&mut self) {
        let status = match (&self.start_error, self.engine.is_initialized()) {
            (Some(message), _) => message.clone(),
            (None, false) => "Press Enter or click to start".to_string(),
            (None, true) => self.controls.summary(),
        };
        let title = format!("{} - {}", TITLE, status);

        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn toggle_fullscreen(&mut self) {
        let Some(window) = &self.window else {
            return;
        };

        if self.controls.toggle_fullscreen() {
            if window.current_monitor().is_none() {
                warn!("Error attempting to enable fullscreen: no monitor available");
                self.controls.set_fullscreen(false);
                return;
            }
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        } else {
            window.set_fullscreen(None);
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, code: KeyCode, repeat: bool) {
        let volume = match code {
            KeyCode::ArrowUp => Some((Channel::Master, VOLUME_STEP)),
            KeyCode::ArrowDown => Some((Channel::Master, -VOLUME_STEP)),
            KeyCode::KeyQ => Some((Channel::Voice(VoiceKind::Bass), VOLUME_STEP)),
            KeyCode::KeyA => Some((Channel::Voice(VoiceKind::Bass), -VOLUME_STEP)),
            KeyCode::KeyW => Some((Channel::Voice(VoiceKind::Hats), VOLUME_STEP)),
            KeyCode::KeyS => Some((Channel::Voice(VoiceKind::Hats), -VOLUME_STEP)),
            KeyCode::KeyE => Some((Channel::Voice(VoiceKind::Melody), VOLUME_STEP)),
            KeyCode::KeyD => Some((Channel::Voice(VoiceKind::Melody), -VOLUME_STEP)),
            KeyCode::KeyR => Some((Channel::Voice(VoiceKind::Pad), VOLUME_STEP)),
            KeyCode::KeyF => Some((Channel::Voice(VoiceKind::Pad), -VOLUME_STEP)),
            _ => None,
        };
        if let Some((channel, delta)) = volume {
            self.controls.nudge_volume(&mut self.engine, channel, delta);
            self.refresh_title();
            return;
        }

        // Toggles ignore key repeat
        if repeat {
            return;
        }

        match code {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::Enter | KeyCode::NumpadEnter => self.start_experience(),
            KeyCode::Space => self.controls.toggle_play(&mut self.engine),
            KeyCode::KeyM => self.controls.toggle_mute(&mut self.engine),
            KeyCode::Tab => {
                self.controls.toggle_drawer();
            }
            KeyCode::F11 => self.toggle_fullscreen(),
            code => {
                if let Some(kind) = visual_for_key(code) {
                    let visible = self.controls.toggle_visibility(kind);
                    info!("{}: {}", kind, if visible { "shown" } else { "hidden" });
                    self.stage.sync(self.controls.visibility());
                }
            }
        }
        self.refresh_title();
    }
}

/// Number keys 1-6 toggle the shapes in stage order
fn visual_for_key(code: KeyCode) -> Option<VisualKind> {
    let index = match code {
        KeyCode::Digit1 => 0,
        KeyCode::Digit2 => 1,
        KeyCode::Digit3 => 2,
        KeyCode::Digit4 => 3,
        KeyCode::Digit5 => 4,
        KeyCode::Digit6 => 5,
        _ => return None,
    };
    Some(VisualKind::ALL[index])
}

impl ApplicationHandler for App {
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return; // Already initialized
        }

        // Create window
        let window_attributes = Window::default_attributes()
            .with_title(TITLE)
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.render_config.window_width,
                self.render_config.window_height,
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                self.fatal = Some(e.into());
                event_loop.exit();
                return;
            }
        };

        // Initialize rendering system
        let render_system =
            match pollster::block_on(RenderSystem::new(Arc::clone(&window), &self.render_config)) {
                Ok(render_system) => render_system,
                Err(e) => {
                    self.fatal = Some(e.into());
                    event_loop.exit();
                    return;
                }
            };

        info!("Vibescape is running");
        info!("Enter/click: start | Space: play/pause | M: mute | 1-6: shapes | Tab: mixer | F11: fullscreen | Esc: quit");

        self.window = Some(window);
        self.render_system = Some(render_system);

        if self.autostart {
            self.start_experience();
        }
        self.refresh_title();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(code),
                        repeat,
                        ..
                    },
                ..
            } => self.handle_key(event_loop, code, repeat),
            WindowEvent::MouseInput {
                state: ElementState::Pressed,
                button: MouseButton::Left,
                ..
            } => self.start_experience(),
            WindowEvent::Resized(size) => {
                if let Some(render_system) = &mut self.render_system {
                    render_system.resize(size.width, size.height);
                }
                if size.width > 0 && size.height > 0 {
                    self.render_config.window_width = size.width;
                    self.render_config.window_height = size.height;
                }
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.engine.cleanup();
    }
}

impl App {
    /// Render a single frame
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(render_system) = &mut self.render_system else {
            return;
        };

        // Get current time
        let time_s = self.start_time.elapsed().as_secs_f32();

        // One analysis step per displayed frame
        self.engine.tick();
        let levels = self.engine.levels();

        // Animate and collect geometry
        self.stage.update(&levels, time_s, self.engine.is_playing());
        render_system.update_geometry(self.stage.draw());

        // Update camera
        let (view_proj, _eye) = self
            .camera
            .create_view_proj_matrix(time_s, &self.render_config);
        render_system.update_uniforms(&Uniforms::new(view_proj, &self.render_config));

        // Render
        match render_system.render() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = render_system.size();
                render_system.resize(width, height);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => {
                error!("Render error: out of GPU memory");
                event_loop.exit();
            }
            Err(e) => warn!("Render error: {:?}", e),
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(&args.log_level);

    info!("Vibescape - generative music with audio-reactive visuals");

    let mut app = App::new(&args);
    let event_loop = EventLoop::new()?;
    event_loop.run_app(&mut app)?;

    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
