//! Twelve radial spokes that stretch with the bass.

use glam::{Mat4, Vec3};

use super::geometry::{hsl_color, transform, DrawList, Material};
use super::{VisualBinding, VisualKind};
use crate::audio::LevelSnapshot;
use crate::params::RadialLineParams;

struct Spoke {
    end: Vec3,
    material: Material,
    stretch: f32,
}

pub struct RadialLines {
    params: RadialLineParams,
    spokes: Vec<Spoke>,
    spin: f32,
}

impl RadialLines {
    pub fn new(params: RadialLineParams) -> Self {
        let count = params.count.max(1);
        let spokes = (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                let angle = t * std::f32::consts::TAU;
                Spoke {
                    end: Vec3::new(angle.cos(), angle.sin(), 0.0) * params.radius,
                    material: Material::flat(hsl_color(t, 0.8, 0.5), 1.0),
                    stretch: 1.0,
                }
            })
            .collect();

        Self {
            params,
            spokes,
            spin: 0.0,
        }
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    /// Current y-scale of every spoke
    pub fn stretches(&self) -> Vec<f32> {
        self.spokes.iter().map(|s| s.stretch).collect()
    }
}

impl Default for RadialLines {
    fn default() -> Self {
        Self::new(RadialLineParams::default())
    }
}

impl VisualBinding for RadialLines {
    fn kind(&self) -> VisualKind {
        VisualKind::Lines
    }

    fn update(&mut self, levels: &LevelSnapshot, time_s: f32) {
        let p = &self.params;
        self.spin += p.base_spin + levels.melody_level * p.melody_to_spin;

        for (i, spoke) in self.spokes.iter_mut().enumerate() {
            let phase = time_s + i as f32 * p.phase_step;
            spoke.stretch = 1.0 + levels.bass_level * phase.sin() * p.bass_to_stretch;
        }
    }

    fn emit(&self, parent: Mat4, out: &mut DrawList) {
        let group = parent * Mat4::from_rotation_z(self.spin);
        for spoke in &self.spokes {
            let model = group * transform(Vec3::ZERO, Vec3::ZERO, Vec3::new(1.0, spoke.stretch, 1.0));
            out.line(model, Vec3::ZERO, spoke.end, &spoke.material);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_keeps_spokes_unstretched() {
        let mut lines = RadialLines::default();
        lines.update(&LevelSnapshot::default(), 3.7);
        assert!(lines.stretches().iter().all(|s| *s == 1.0));
        assert!((lines.spin() - 0.003).abs() < 1e-7);
    }

    #[test]
    fn test_bass_stretch_is_phased_per_spoke() {
        let mut lines = RadialLines::default();
        lines.update(&LevelSnapshot::from_levels([1.0, 0.0, 0.0, 0.0]), 0.0);
        let stretches = lines.stretches();

        assert_eq!(stretches.len(), 12);
        // Spoke 0 sits at sin(0)
        assert!((stretches[0] - 1.0).abs() < 1e-6);
        // Spoke 3 at phase 1.5 rad
        assert!((stretches[3] - (1.0 + 1.5f32.sin() * 0.5)).abs() < 1e-6);
        assert!(stretches.iter().all(|s| (0.5..=1.5).contains(s)));
    }

    #[test]
    fn test_emits_one_segment_per_spoke() {
        let lines = RadialLines::default();
        let mut list = DrawList::new();
        lines.emit(Mat4::IDENTITY, &mut list);
        assert_eq!(list.lines.len(), 24);

        // First spoke ends at (radius, 0, 0)
        let end = Vec3::from_array(list.lines[1].position);
        assert!((end - Vec3::new(5.0, 0.0, 0.0)).length() < 1e-5);
    }
}
