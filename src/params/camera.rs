//! Camera configuration and presets.

use std::f32::consts::TAU;

/// Orbiting camera that slowly circles the stage
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Distance from the stage centre (scene units)
    pub distance: f32,

    /// Height of the eye above the stage plane (scene units)
    pub elevation: f32,

    /// Auto-rotation speed (radians per second)
    /// One revolution every 120 s
    pub angular_speed_rad_per_s: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            distance: 10.0,
            elevation: 0.0,
            angular_speed_rad_per_s: TAU / 120.0,
        }
    }
}

/// Fixed camera position
#[derive(Debug, Clone)]
pub struct FixedCamera {
    /// Camera position (scene units)
    pub position: [f32; 3],

    /// Look-at target (scene units)
    pub target: [f32; 3],
}

impl Default for FixedCamera {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 10.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}

/// Camera preset selection
#[derive(Debug, Clone)]
pub enum CameraPreset {
    /// Orbit preset: auto-rotating view around the stage
    Orbit(OrbitCamera),

    /// Fixed preset: stationary front view
    Fixed(FixedCamera),
}

impl Default for CameraPreset {
    fn default() -> Self {
        Self::Orbit(OrbitCamera::default())
    }
}
