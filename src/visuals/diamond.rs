//! Central octahedron: bass swells it, melody spins it.

use glam::{Mat4, Vec3};

use super::geometry::{hex_color, transform, DrawList, Material, Mesh};
use super::{VisualBinding, VisualKind};
use crate::audio::LevelSnapshot;
use crate::params::DiamondParams;

pub struct Diamond {
    params: DiamondParams,
    mesh: Mesh,
    material: Material,
    rotation: Vec3,
    scale: f32,
}

impl Diamond {
    pub fn new(params: DiamondParams) -> Self {
        let mesh = Mesh::octahedron(params.radius);
        let material = Material {
            color: {
                let [r, g, b] = hex_color(params.color);
                [r, g, b, 1.0]
            },
            emissive: hex_color(params.emissive),
        };
        Self {
            params,
            mesh,
            material,
            rotation: Vec3::ZERO,
            scale: 1.0,
        }
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }
}

impl Default for Diamond {
    fn default() -> Self {
        Self::new(DiamondParams::default())
    }
}

impl VisualBinding for Diamond {
    fn kind(&self) -> VisualKind {
        VisualKind::Diamond
    }

    fn update(&mut self, levels: &LevelSnapshot, _time_s: f32) {
        let p = &self.params;
        self.scale = 1.0 + levels.bass_level * p.bass_to_scale;

        let spin = p.base_spin + levels.melody_level * p.melody_to_spin;
        self.rotation.x += spin;
        self.rotation.y += spin;
    }

    fn emit(&self, parent: Mat4, out: &mut DrawList) {
        let model = parent * transform(Vec3::ZERO, self.rotation, Vec3::splat(self.scale));
        self.mesh.emit(model, &self.material, &mut out.triangles);
    }
}
