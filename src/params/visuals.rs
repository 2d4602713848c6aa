//! Visual binding geometry and audio-reactive mapping parameters.
//!
//! Rates are per rendered frame (radians per frame), matching how the
//! bindings are driven from the redraw loop.

/// Stage-wide group motion
#[derive(Debug, Clone)]
pub struct StageParams {
    /// Root group spin while playing (radians per frame)
    pub base_spin: f32,

    /// Extra root spin per unit bass level (radians per frame)
    pub bass_to_spin: f32,
}

impl Default for StageParams {
    fn default() -> Self {
        Self {
            base_spin: 0.001,
            bass_to_spin: 0.001,
        }
    }
}

/// Central polyhedron
#[derive(Debug, Clone)]
pub struct DiamondParams {
    /// Octahedron circumradius (scene units)
    pub radius: f32,

    /// Formula: scale = 1 + bass * this
    pub bass_to_scale: f32,

    /// Base spin on X and Y (radians per frame)
    pub base_spin: f32,

    /// Formula: spin = base_spin + melody * this
    pub melody_to_spin: f32,

    /// Surface colour (sRGB hex, 0xff00ff)
    pub color: u32,

    /// Self-illumination added on top of the lit colour (sRGB hex)
    pub emissive: u32,
}

impl Default for DiamondParams {
    fn default() -> Self {
        Self {
            radius: 1.5,
            bass_to_scale: 0.5,
            base_spin: 0.01,
            melody_to_spin: 0.02,
            color: 0xff00ff,
            emissive: 0x550055,
        }
    }
}

/// Concentric torus rings
#[derive(Debug, Clone)]
pub struct RingParams {
    /// (radius, tube thickness, colour) per ring, innermost first
    pub rings: Vec<(f32, f32, u32)>,

    /// Segments around the tube cross-section
    pub radial_segments: usize,

    /// Segments around the ring
    pub tubular_segments: usize,

    /// Base Z spin (radians per frame)
    pub base_spin: f32,

    /// Formula: spin = base_spin + pad * this
    pub pad_to_spin: f32,

    /// Formula: xy scale = 1 + hats * this
    pub hats_to_scale: f32,

    /// Material opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for RingParams {
    fn default() -> Self {
        Self {
            rings: vec![
                (2.5, 0.05, 0x3498db),
                (3.0, 0.04, 0x2980b9),
                (3.5, 0.03, 0x1abc9c),
                (4.0, 0.02, 0x16a085),
            ],
            radial_segments: 16,
            tubular_segments: 100,
            base_spin: 0.002,
            pad_to_spin: 0.01,
            hats_to_scale: 0.2,
            opacity: 0.7,
        }
    }
}

/// Radial line burst
#[derive(Debug, Clone)]
pub struct RadialLineParams {
    /// Number of lines
    pub count: usize,

    /// Line length from the centre (scene units)
    pub radius: f32,

    /// Base Z spin (radians per frame)
    pub base_spin: f32,

    /// Formula: spin = base_spin + melody * this
    pub melody_to_spin: f32,

    /// Length oscillation depth per unit bass
    /// Formula: y scale = 1 + bass * sin(t + i * phase_step) * this
    pub bass_to_stretch: f32,

    /// Phase offset between neighbouring lines (radians)
    pub phase_step: f32,
}

impl Default for RadialLineParams {
    fn default() -> Self {
        Self {
            count: 12,
            radius: 5.0,
            base_spin: 0.003,
            melody_to_spin: 0.01,
            bass_to_stretch: 0.5,
            phase_step: 0.5,
        }
    }
}

/// Line-grid mazes in the four corners
#[derive(Debug, Clone)]
pub struct MazeParams {
    /// Side length of one maze (scene units)
    pub size: f32,

    /// Cells per maze side
    pub grid_cells: usize,

    /// Distance of each maze centre from the stage centre along X and Y
    pub corner_offset: f32,

    /// Wobble amplitude of each maze (radians)
    pub wobble: f32,

    /// Formula: z rotation = sin(t + i) * wobble + hats * this
    pub hats_to_rotation: f32,

    /// Formula: group scale = 1 + pad * this
    pub pad_to_scale: f32,

    /// Material opacity (0.0 - 1.0)
    pub opacity: f32,
}

impl Default for MazeParams {
    fn default() -> Self {
        Self {
            size: 1.5,
            grid_cells: 5,
            corner_offset: 6.0,
            wobble: 0.2,
            hats_to_rotation: 0.5,
            pad_to_scale: 0.3,
            opacity: 0.7,
        }
    }
}

/// Ring of level bars
#[derive(Debug, Clone)]
pub struct BarParams {
    /// Number of bars (split into four voice quarters)
    pub count: usize,

    /// Bar footprint (scene units)
    pub width: f32,

    /// Height at full level (scene units)
    pub max_height: f32,

    /// Circle radius (scene units)
    pub radius: f32,

    /// Group Y spin (radians per frame)
    pub spin: f32,

    /// Fraction of the remaining distance to target covered per frame
    pub easing: f32,

    /// Variation oscillator speed (radians per second)
    pub variation_rate: f32,

    /// Phase offset between neighbouring bars (radians)
    pub variation_phase_step: f32,
}

impl Default for BarParams {
    fn default() -> Self {
        Self {
            count: 32,
            width: 0.15,
            max_height: 4.0,
            radius: 7.0,
            spin: 0.001,
            easing: 0.1,
            variation_rate: 2.0,
            variation_phase_step: 0.2,
        }
    }
}

/// Spiral point cloud
#[derive(Debug, Clone)]
pub struct ParticleParams {
    /// Number of points
    pub count: usize,

    /// Outer spiral radius (scene units)
    pub radius: f32,

    /// Total winding of the spiral (radians)
    pub winding: f32,

    /// Vertical spread (scene units, centred on 0)
    pub height: f32,

    /// Base Y spin (radians per frame)
    pub base_spin: f32,

    /// Formula: spin = base_spin + average * this
    pub average_to_spin: f32,

    /// Formula: scale = 1 + melody * this
    pub melody_to_scale: f32,

    /// Per-frame drift amplitude per unit average level (scene units)
    pub jitter: f32,
}

impl Default for ParticleParams {
    fn default() -> Self {
        Self {
            count: 2000,
            radius: 8.0,
            winding: std::f32::consts::PI * 20.0,
            height: 4.0,
            base_spin: 0.002,
            average_to_spin: 0.01,
            melody_to_scale: 0.3,
            jitter: 0.01,
        }
    }
}
