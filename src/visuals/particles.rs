//! Rainbow spiral point cloud. Positions drift with the overall level and are
//! never pulled back.

use glam::{Mat4, Vec3};

use super::geometry::{hsl_color, transform, DrawList};
use super::{VisualBinding, VisualKind};
use crate::audio::LevelSnapshot;
use crate::params::ParticleParams;

const POINT_OPACITY: f32 = 0.8;

pub struct SpiralParticles {
    params: ParticleParams,
    positions: Vec<Vec3>,
    colors: Vec<[f32; 4]>,
    spin: f32,
    scale: f32,
}

impl SpiralParticles {
    pub fn new(params: ParticleParams) -> Self {
        let count = params.count.max(1);
        let (positions, colors) = (0..count)
            .map(|i| {
                let t = i as f32 / count as f32;
                let angle = t * params.winding;
                let r = t * params.radius;
                let position = Vec3::new(
                    angle.cos() * r,
                    t * params.height - params.height / 2.0,
                    angle.sin() * r,
                );
                let [red, green, blue] = hsl_color(t, 0.8, 0.5);
                (position, [red, green, blue, POINT_OPACITY])
            })
            .unzip();

        Self {
            params,
            positions,
            colors,
            spin: 0.0,
            scale: 1.0,
        }
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for SpiralParticles {
    fn default() -> Self {
        Self::new(ParticleParams::default())
    }
}

impl VisualBinding for SpiralParticles {
    fn kind(&self) -> VisualKind {
        VisualKind::Particles
    }

    fn update(&mut self, levels: &LevelSnapshot, time_s: f32) {
        let p = &self.params;
        let average = levels.average_level;

        self.spin += p.base_spin + average * p.average_to_spin;
        self.scale = 1.0 + levels.melody_level * p.melody_to_scale;

        if average == 0.0 {
            return;
        }
        let amount = p.jitter * average;
        for (i, position) in self.positions.iter_mut().enumerate() {
            let i = i as f32;
            *position += Vec3::new(
                (time_s + i * 0.01).sin(),
                (time_s + i * 0.01).cos(),
                (time_s + i * 0.02).sin(),
            ) * amount;
        }
    }

    fn emit(&self, parent: Mat4, out: &mut DrawList) {
        let model = parent
            * transform(
                Vec3::ZERO,
                Vec3::new(0.0, self.spin, 0.0),
                Vec3::splat(self.scale),
            );
        for (position, color) in self.positions.iter().zip(&self.colors) {
            out.point(model, *position, *color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spiral_layout() {
        let particles = SpiralParticles::default();
        let positions = particles.positions();
        assert_eq!(positions.len(), 2000);

        assert_eq!(positions[0], Vec3::new(0.0, -2.0, 0.0));
        for p in positions {
            assert!(Vec3::new(p.x, 0.0, p.z).length() <= 8.0 + 1e-4);
            assert!(p.y >= -2.0 && p.y < 2.0);
        }
    }

    #[test]
    fn test_silence_does_not_move_points() {
        let mut particles = SpiralParticles::default();
        let before = particles.positions().to_vec();
        particles.update(&LevelSnapshot::default(), 12.0);
        assert_eq!(particles.positions(), before.as_slice());
        assert!((particles.spin() - 0.002).abs() < 1e-7);
    }

    #[test]
    fn test_drift_accumulates_with_level() {
        let mut particles = SpiralParticles::default();
        let loud = LevelSnapshot::from_levels([1.0, 1.0, 1.0, 1.0]);

        particles.update(&loud, 0.0);
        let once = particles.positions()[0];
        // Particle 0 at t=0 moves by (0, 1, 0) * jitter
        assert!((once - Vec3::new(0.0, -2.0 + 0.01, 0.0)).length() < 1e-6);

        particles.update(&loud, 0.0);
        let twice = particles.positions()[0];
        assert!((twice.y - (-2.0 + 0.02)).abs() < 1e-6);
        assert!((particles.scale() - 1.3).abs() < 1e-6);
    }

    #[test]
    fn test_one_point_per_particle() {
        let particles = SpiralParticles::default();
        let mut list = DrawList::new();
        particles.emit(Mat4::IDENTITY, &mut list);
        assert_eq!(list.points.len(), 2000);
        assert!(list.triangles.is_empty() && list.lines.is_empty());
    }
}
