//! Command-line argument parsing.

use clap::Parser;

use crate::params::{CameraPreset, EngineConfig, FixedCamera, OrbitCamera, RenderConfig};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Vibescape")]
#[command(about = "Generative music with audio-reactive 3D visuals", long_about = None)]
pub struct Args {
    /// Camera preset: orbit (default), fixed
    #[arg(long, value_name = "PRESET", default_value = "orbit")]
    pub camera: String,

    /// Seed for the melody's skipped notes (random if omitted)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Window width (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "1280")]
    pub width: u32,

    /// Window height (pixels)
    #[arg(long, value_name = "PIXELS", default_value = "720")]
    pub height: u32,

    /// Default log filter; RUST_LOG takes precedence
    #[arg(long, value_name = "FILTER", default_value = "info")]
    pub log_level: String,

    /// Start the music as soon as the window opens
    #[arg(long)]
    pub autostart: bool,
}

impl Args {
    /// Parse camera preset from command-line arguments
    pub fn parse_camera_preset(&self) -> CameraPreset {
        match self.camera.to_lowercase().as_str() {
            "orbit" => {
                log::info!("Camera: Orbit (auto-rotate)");
                CameraPreset::Orbit(OrbitCamera::default())
            }
            "fixed" => {
                log::info!("Camera: Fixed (front view)");
                CameraPreset::Fixed(FixedCamera::default())
            }
            other => {
                log::warn!("Unknown camera preset '{}', using orbit", other);
                CameraPreset::Orbit(OrbitCamera::default())
            }
        }
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            rng_seed: self.seed,
            ..EngineConfig::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            window_width: self.width.max(1),
            window_height: self.height.max(1),
            ..RenderConfig::default()
        }
    }
}
