//! Checkerboard line mazes in the four corners.

use glam::{Mat4, Vec3};

use super::geometry::{hsl_color, transform, DrawList, Material};
use super::{VisualBinding, VisualKind};
use crate::audio::LevelSnapshot;
use crate::params::MazeParams;

/// Bottom-left, bottom-right, top-left, top-right
const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (-1.0, 1.0), (1.0, 1.0)];

pub struct CornerMazes {
    params: MazeParams,
    segments: Vec<(Vec3, Vec3)>,
    materials: [Material; 4],
    rotations: [f32; 4],
    scale: f32,
}

impl CornerMazes {
    pub fn new(params: MazeParams) -> Self {
        let segments = maze_segments(params.size, params.grid_cells);
        let materials =
            std::array::from_fn(|i| Material::flat(hsl_color(i as f32 * 0.25, 0.7, 0.5), params.opacity));

        Self {
            params,
            segments,
            materials,
            rotations: [0.0; 4],
            scale: 1.0,
        }
    }

    pub fn rotations(&self) -> [f32; 4] {
        self.rotations
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}

impl Default for CornerMazes {
    fn default() -> Self {
        Self::new(MazeParams::default())
    }
}

/// Outline every other cell of an `cells` x `cells` grid centred on the origin
fn maze_segments(size: f32, cells: usize) -> Vec<(Vec3, Vec3)> {
    let cells = cells.max(1);
    let coord = |k: usize| k as f32 / cells as f32 * size - size / 2.0;

    let mut segments = Vec::new();
    for i in 0..cells {
        for j in 0..cells {
            if (i + j) % 2 == 0 {
                continue;
            }
            let (x1, y1, x2, y2) = (coord(i), coord(j), coord(i + 1), coord(j + 1));
            segments.push((Vec3::new(x1, y1, 0.0), Vec3::new(x2, y1, 0.0)));
            segments.push((Vec3::new(x1, y2, 0.0), Vec3::new(x2, y2, 0.0)));
            segments.push((Vec3::new(x1, y1, 0.0), Vec3::new(x1, y2, 0.0)));
            segments.push((Vec3::new(x2, y1, 0.0), Vec3::new(x2, y2, 0.0)));
        }
    }
    segments
}

impl VisualBinding for CornerMazes {
    fn kind(&self) -> VisualKind {
        VisualKind::Mazes
    }

    fn update(&mut self, levels: &LevelSnapshot, time_s: f32) {
        let p = &self.params;
        for (i, rotation) in self.rotations.iter_mut().enumerate() {
            *rotation = (time_s + i as f32).sin() * p.wobble + levels.hats_level * p.hats_to_rotation;
        }
        self.scale = 1.0 + levels.pad_level * p.pad_to_scale;
    }

    fn emit(&self, parent: Mat4, out: &mut DrawList) {
        let group = parent * Mat4::from_scale(Vec3::splat(self.scale));
        let offset = self.params.corner_offset;

        for (i, (cx, cy)) in CORNERS.iter().enumerate() {
            let model = group
                * transform(
                    Vec3::new(cx * offset, cy * offset, 0.0),
                    Vec3::new(0.0, 0.0, self.rotations[i]),
                    Vec3::ONE,
                );
            for (a, b) in &self.segments {
                out.line(model, *a, *b, &self.materials[i]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_by_five_checker() {
        // 12 of 25 cells are outlined, 4 edges each
        let mazes = CornerMazes::default();
        assert_eq!(mazes.segment_count(), 48);

        let mut list = DrawList::new();
        mazes.emit(Mat4::IDENTITY, &mut list);
        assert_eq!(list.lines.len(), 4 * 48 * 2);
    }

    #[test]
    fn test_mazes_stay_near_their_corner() {
        let mazes = CornerMazes::default();
        let mut list = DrawList::new();
        mazes.emit(Mat4::IDENTITY, &mut list);

        for v in &list.lines {
            let [x, y, _] = v.position;
            assert!(x.abs() >= 6.0 - 0.75 - 1e-4 && x.abs() <= 6.0 + 0.75 + 1e-4);
            assert!(y.abs() >= 6.0 - 0.75 - 1e-4 && y.abs() <= 6.0 + 0.75 + 1e-4);
        }
    }

    #[test]
    fn test_hats_and_pad_mapping() {
        let mut mazes = CornerMazes::default();
        mazes.update(&LevelSnapshot::from_levels([0.0, 1.0, 0.0, 1.0]), 0.0);

        let rotations = mazes.rotations();
        assert!((rotations[0] - 0.5).abs() < 1e-6);
        assert!((rotations[1] - (1.0f32.sin() * 0.2 + 0.5)).abs() < 1e-6);
        assert!((mazes.scale() - 1.3).abs() < 1e-6);
    }
}
