//! Stage: the mounted visual bindings under one slowly turning root group.

use glam::Mat4;

use crate::audio::LevelSnapshot;
use crate::params::StageParams;
use crate::visuals::{DrawList, VisibilitySet, VisualBinding, VisualKind};

pub struct Stage {
    params: StageParams,
    slots: [Option<Box<dyn VisualBinding>>; 6],
    root_spin: f32,
    draw_list: DrawList,
}

impl Stage {
    /// Stage with every binding in `visibility` mounted
    pub fn new(params: StageParams, visibility: &VisibilitySet) -> Self {
        let mut stage = Self {
            params,
            slots: Default::default(),
            root_spin: 0.0,
            draw_list: DrawList::new(),
        };
        stage.sync(visibility);
        stage
    }

    /// Mount newly visible bindings (fresh state) and drop hidden ones
    pub fn sync(&mut self, visibility: &VisibilitySet) {
        for kind in VisualKind::ALL {
            let slot = &mut self.slots[kind.index()];
            match (visibility.is_visible(kind), slot.is_some()) {
                (true, false) => {
                    log::debug!("Mounting {}", kind);
                    *slot = Some(kind.create());
                }
                (false, true) => {
                    log::debug!("Unmounting {}", kind);
                    *slot = None;
                }
                _ => {}
            }
        }
    }

    pub fn is_mounted(&self, kind: VisualKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub fn mounted(&self) -> impl Iterator<Item = VisualKind> + '_ {
        self.slots.iter().flatten().map(|binding| binding.kind())
    }

    pub fn binding(&self, kind: VisualKind) -> Option<&dyn VisualBinding> {
        self.slots[kind.index()].as_deref()
    }

    pub fn root_spin(&self) -> f32 {
        self.root_spin
    }

    /// Advance every mounted binding by one frame
    pub fn update(&mut self, levels: &LevelSnapshot, time_s: f32, playing: bool) {
        if playing {
            self.root_spin += self.params.base_spin + levels.bass_level * self.params.bass_to_spin;
        }
        for binding in self.slots.iter_mut().flatten() {
            binding.update(levels, time_s);
        }
    }

    /// World-space geometry of all mounted bindings
    pub fn draw(&mut self) -> &DrawList {
        self.draw_list.clear();
        let root = Mat4::from_rotation_y(self.root_spin);
        for binding in self.slots.iter().flatten() {
            binding.emit(root, &mut self.draw_list);
        }
        &self.draw_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage() -> Stage {
        Stage::new(StageParams::default(), &VisibilitySet::default())
    }

    #[test]
    fn test_all_bindings_mounted_by_default() {
        let stage = stage();
        assert_eq!(stage.mounted().collect::<Vec<_>>(), VisualKind::ALL.to_vec());
    }

    #[test]
    fn test_diamond_toggle_off_then_on() {
        let mut stage = stage();
        let mut visibility = VisibilitySet::default();
        let loud = LevelSnapshot::from_levels([1.0; 4]);

        visibility.toggle(VisualKind::Diamond);
        stage.sync(&visibility);
        stage.update(&loud, 0.5, true);
        assert!(!stage.is_mounted(VisualKind::Diamond));
        for kind in VisualKind::ALL.into_iter().skip(1) {
            assert!(stage.is_mounted(kind), "{} lost", kind);
        }
        let without = stage.draw().triangles.len();

        visibility.toggle(VisualKind::Diamond);
        stage.sync(&visibility);
        stage.update(&loud, 1.0, true);
        assert!(stage.is_mounted(VisualKind::Diamond));
        assert_eq!(stage.mounted().count(), 6);

        // Octahedron adds 8 triangles
        assert_eq!(stage.draw().triangles.len(), without + 24);
    }

    #[test]
    fn test_hiding_one_binding_leaves_others_untouched() {
        let mut stage = stage();
        let mut visibility = VisibilitySet::default();
        stage.update(&LevelSnapshot::from_levels([0.5; 4]), 0.0, true);
        let spin_before = stage.root_spin();
        let mut reference = Stage::new(StageParams::default(), &VisibilitySet::default());
        reference.update(&LevelSnapshot::from_levels([0.5; 4]), 0.0, true);

        visibility.toggle(VisualKind::Lines);
        stage.sync(&visibility);
        assert_eq!(stage.root_spin(), spin_before);

        // Remaining bindings produce exactly what an untouched stage does for them
        let particles = stage.draw().points.clone();
        assert_eq!(particles, reference.draw().points);
        assert!(stage.draw().lines.len() < reference.draw().lines.len());
    }

    #[test]
    fn test_root_spins_only_while_playing() {
        let mut stage = stage();
        let levels = LevelSnapshot::from_levels([1.0, 0.0, 0.0, 0.0]);

        stage.update(&levels, 0.0, false);
        assert_eq!(stage.root_spin(), 0.0);

        stage.update(&levels, 0.0, true);
        assert!((stage.root_spin() - 0.002).abs() < 1e-7);
    }

    #[test]
    fn test_empty_stage_draws_nothing() {
        let mut visibility = VisibilitySet::default();
        for kind in VisualKind::ALL {
            visibility.set(kind, false);
        }
        let mut stage = Stage::new(StageParams::default(), &visibility);
        stage.update(&LevelSnapshot::default(), 0.0, true);
        assert!(stage.draw().is_empty());
    }
}
