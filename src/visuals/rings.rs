//! Four nested tori: pad turns them, hats widen them.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Vec3};

use super::geometry::{hex_color, transform, DrawList, Material, Mesh};
use super::{VisualBinding, VisualKind};
use crate::audio::LevelSnapshot;
use crate::params::RingParams;

/// Emissive strength relative to each ring's colour
const RING_GLOW: f32 = 0.5;

pub struct ConcentricRings {
    params: RingParams,
    rings: Vec<(Mesh, Material)>,
    spin: f32,
    scale: f32,
}

impl ConcentricRings {
    pub fn new(params: RingParams) -> Self {
        let rings = params
            .rings
            .iter()
            .map(|&(radius, thickness, color)| {
                (
                    Mesh::torus(
                        radius,
                        thickness,
                        params.radial_segments,
                        params.tubular_segments,
                    ),
                    Material::glowing(hex_color(color), RING_GLOW, params.opacity),
                )
            })
            .collect();

        Self {
            params,
            rings,
            spin: 0.0,
            scale: 1.0,
        }
    }

    pub fn spin(&self) -> f32 {
        self.spin
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }
}

impl Default for ConcentricRings {
    fn default() -> Self {
        Self::new(RingParams::default())
    }
}

impl VisualBinding for ConcentricRings {
    fn kind(&self) -> VisualKind {
        VisualKind::Circles
    }

    fn update(&mut self, levels: &LevelSnapshot, _time_s: f32) {
        self.spin += self.params.base_spin + levels.pad_level * self.params.pad_to_spin;
        self.scale = 1.0 + levels.hats_level * self.params.hats_to_scale;
    }

    fn emit(&self, parent: Mat4, out: &mut DrawList) {
        let group = parent
            * transform(
                Vec3::ZERO,
                Vec3::new(0.0, 0.0, self.spin),
                Vec3::new(self.scale, self.scale, 1.0),
            );
        // Each torus lies flat: quarter turn about X
        let tilt = Mat4::from_rotation_x(FRAC_PI_2);
        for (mesh, material) in &self.rings {
            mesh.emit(group * tilt, material, &mut out.triangles);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_four_rings_by_default() {
        let rings = ConcentricRings::default();
        assert_eq!(rings.ring_count(), 4);

        let mut list = DrawList::new();
        rings.emit(Mat4::IDENTITY, &mut list);
        assert_eq!(list.triangles.len(), 4 * 16 * 100 * 6);
        assert!(list.triangles.iter().all(|v| v.color[3] == 0.7));
    }

    #[test]
    fn test_pad_and_hats_mapping() {
        let mut rings = ConcentricRings::default();
        rings.update(&LevelSnapshot::from_levels([0.0, 1.0, 0.0, 1.0]), 0.0);
        assert!((rings.spin() - 0.012).abs() < 1e-6);
        assert!((rings.scale() - 1.2).abs() < 1e-6);

        rings.update(&LevelSnapshot::default(), 0.0);
        assert!((rings.spin() - 0.014).abs() < 1e-6);
        assert_eq!(rings.scale(), 1.0);
    }
}
