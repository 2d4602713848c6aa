//! Rendering configuration.

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane (scene units)
    pub near_plane: f32,

    /// Far clipping plane (scene units)
    pub far_plane: f32,

    /// Background colour (linear RGB)
    pub clear_color: [f64; 3],

    /// Direction towards the key light (world space, need not be normalised)
    pub light_direction: [f32; 3],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            clear_color: [0.0, 0.0, 0.0],
            light_direction: [10.0, 10.0, 10.0], // Point light position in the original layout
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}
