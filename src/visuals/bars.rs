//! Circle of level bars, one quarter per voice, eased towards their targets.

use glam::{Mat4, Vec3};

use super::geometry::{hsl_color, transform, DrawList, Material, Mesh};
use super::{VisualBinding, VisualKind};
use crate::audio::{LevelSnapshot, VoiceKind};
use crate::params::BarParams;

/// Emissive strength relative to each bar's colour
const BAR_GLOW: f32 = 0.3;

/// Bar quarters in circle order
const QUARTERS: [VoiceKind; 4] = [
    VoiceKind::Bass,
    VoiceKind::Melody,
    VoiceKind::Hats,
    VoiceKind::Pad,
];

struct Bar {
    angle: f32,
    material: Material,
    height: f32,
}

pub struct RadialBars {
    params: BarParams,
    mesh: Mesh,
    bars: Vec<Bar>,
    spin: f32,
}

impl RadialBars {
    pub fn new(params: BarParams) -> Self {
        let count = params.count.max(1);
        let bars = (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                Bar {
                    angle: t * std::f32::consts::TAU,
                    material: Material::glowing(hsl_color(t, 0.7, 0.5), BAR_GLOW, 1.0),
                    // Unit box at rest, matching its geometry
                    height: 1.0,
                }
            })
            .collect();

        Self {
            mesh: Mesh::cuboid(params.width, 1.0, params.width),
            params,
            bars,
            spin: 0.0,
        }
    }

    /// Voice that drives bar `index`
    pub fn voice_for(&self, index: usize) -> VoiceKind {
        let quarter = index * 4 / self.bars.len().max(1);
        QUARTERS[quarter.min(3)]
    }

    pub fn heights(&self) -> Vec<f32> {
        self.bars.iter().map(|b| b.height).collect()
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }
}

impl Default for RadialBars {
    fn default() -> Self {
        Self::new(BarParams::default())
    }
}

impl VisualBinding for RadialBars {
    fn kind(&self) -> VisualKind {
        VisualKind::Bars
    }

    fn update(&mut self, levels: &LevelSnapshot, time_s: f32) {
        self.spin += self.params.spin;

        for index in 0..self.bars.len() {
            let level = levels.level(self.voice_for(index));
            let p = &self.params;

            // Variation in [0.6, 1.0]
            let variation =
                (time_s * p.variation_rate + index as f32 * p.variation_phase_step).sin() * 0.2 + 0.8;
            let target = p.max_height * level * variation;

            let bar = &mut self.bars[index];
            bar.height += (target - bar.height) * p.easing;
        }
    }

    fn emit(&self, parent: Mat4, out: &mut DrawList) {
        let group = parent * Mat4::from_rotation_y(self.spin);
        let radius = self.params.radius;

        for bar in &self.bars {
            // Base stays on the ground plane as the bar grows
            let position = Vec3::new(bar.angle.cos() * radius, bar.height / 2.0, bar.angle.sin() * radius);
            let model = group
                * transform(
                    position,
                    Vec3::new(0.0, -bar.angle, 0.0),
                    Vec3::new(1.0, bar.height, 1.0),
                );
            self.mesh.emit(model, &bar.material, &mut out.triangles);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quarters_follow_voice_order() {
        let bars = RadialBars::default();
        assert_eq!(bars.voice_for(0), VoiceKind::Bass);
        assert_eq!(bars.voice_for(7), VoiceKind::Bass);
        assert_eq!(bars.voice_for(8), VoiceKind::Melody);
        assert_eq!(bars.voice_for(16), VoiceKind::Hats);
        assert_eq!(bars.voice_for(31), VoiceKind::Pad);
    }

    #[test]
    fn test_height_eases_instead_of_snapping() {
        let mut bars = RadialBars::default();
        let loud = LevelSnapshot::from_levels([1.0, 1.0, 1.0, 1.0]);

        bars.update(&loud, 0.0);
        let first = bars.heights()[0];
        // Target for bar 0 at t=0 is 4 * 0.8 = 3.2; one step covers 10%
        assert!((first - (1.0 + (3.2 - 1.0) * 0.1)).abs() < 1e-5);

        for _ in 0..200 {
            bars.update(&loud, 0.0);
        }
        assert!((bars.heights()[0] - 3.2).abs() < 1e-3);
    }

    #[test]
    fn test_silence_decays_towards_zero() {
        let mut bars = RadialBars::default();
        for _ in 0..50 {
            bars.update(&LevelSnapshot::default(), 1.0);
        }
        assert!(bars.heights().iter().all(|h| *h > 0.0 && *h < 0.01));
    }

    #[test]
    fn test_only_driving_voice_moves_its_quarter() {
        let mut bars = RadialBars::default();
        bars.update(&LevelSnapshot::from_levels([0.0, 0.0, 0.0, 1.0]), 0.0);
        let heights = bars.heights();
        assert!(heights[..24].iter().all(|h| (*h - 0.9).abs() < 1e-6));
        assert!(heights[24..].iter().all(|h| *h > 1.0));
    }

    #[test]
    fn test_bars_stand_on_the_ground() {
        let bars = RadialBars::default();
        let mut list = DrawList::new();
        bars.emit(Mat4::IDENTITY, &mut list);
        assert_eq!(list.triangles.len(), 32 * 36);

        let lowest = list
            .triangles
            .iter()
            .map(|v| v.position[1])
            .fold(f32::INFINITY, f32::min);
        assert!(lowest.abs() < 1e-5);
    }
}
