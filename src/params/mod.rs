//! Parameter definitions with physical units and documented semantics.
//!
//! All tunable numbers live here with:
//! - Units (seconds, beats, Hz, scene units)
//! - Documented ranges and meanings
//! - Defaults matching the shipped piece

mod audio;
mod camera;
mod render;
mod visuals;

// Re-export all types
pub use audio::{audio_constants, EngineConfig};
pub use camera::{CameraPreset, FixedCamera, OrbitCamera};
pub use render::RenderConfig;
pub use visuals::{
    BarParams, DiamondParams, MazeParams, ParticleParams, RadialLineParams, RingParams,
    StageParams,
};
