//! Audio-reactive visual bindings.
//!
//! Each binding owns its geometry and animation state, reads the latest
//! [`LevelSnapshot`] once per frame and touches nothing but itself.

mod bars;
mod diamond;
mod geometry;
mod lines;
mod mazes;
mod particles;
mod rings;

use std::fmt;
use std::str::FromStr;

use glam::Mat4;

use crate::audio::LevelSnapshot;

pub use bars::RadialBars;
pub use diamond::Diamond;
pub use geometry::{
    hex_color, hsl_color, srgb_to_linear, transform, DrawList, Material, Mesh, Vertex,
};
pub use lines::RadialLines;
pub use mazes::CornerMazes;
pub use particles::SpiralParticles;
pub use rings::ConcentricRings;

/// A self-contained visual motif driven by audio levels
pub trait VisualBinding {
    fn kind(&self) -> VisualKind;

    /// Advance one frame. `time_s` is wall-clock seconds since start.
    fn update(&mut self, levels: &LevelSnapshot, time_s: f32);

    /// Append world-space geometry under the `parent` transform
    fn emit(&self, parent: Mat4, out: &mut DrawList);
}

/// The six visual bindings, in stage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisualKind {
    Diamond,
    Circles,
    Lines,
    Mazes,
    Bars,
    Particles,
}

impl VisualKind {
    pub const ALL: [VisualKind; 6] = [
        VisualKind::Diamond,
        VisualKind::Circles,
        VisualKind::Lines,
        VisualKind::Mazes,
        VisualKind::Bars,
        VisualKind::Particles,
    ];

    pub fn index(self) -> usize {
        match self {
            VisualKind::Diamond => 0,
            VisualKind::Circles => 1,
            VisualKind::Lines => 2,
            VisualKind::Mazes => 3,
            VisualKind::Bars => 4,
            VisualKind::Particles => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            VisualKind::Diamond => "diamond",
            VisualKind::Circles => "circles",
            VisualKind::Lines => "lines",
            VisualKind::Mazes => "mazes",
            VisualKind::Bars => "bars",
            VisualKind::Particles => "particles",
        }
    }

    /// Fresh binding with default parameters
    pub fn create(self) -> Box<dyn VisualBinding> {
        match self {
            VisualKind::Diamond => Box::new(Diamond::default()),
            VisualKind::Circles => Box::new(ConcentricRings::default()),
            VisualKind::Lines => Box::new(RadialLines::default()),
            VisualKind::Mazes => Box::new(CornerMazes::default()),
            VisualKind::Bars => Box::new(RadialBars::default()),
            VisualKind::Particles => Box::new(SpiralParticles::default()),
        }
    }
}

impl fmt::Display for VisualKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisualKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VisualKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown visual element '{}'", s))
    }
}

/// One on/off flag per binding, all on by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilitySet {
    flags: [bool; 6],
}

impl Default for VisibilitySet {
    fn default() -> Self {
        Self { flags: [true; 6] }
    }
}

impl VisibilitySet {
    pub fn is_visible(&self, kind: VisualKind) -> bool {
        self.flags[kind.index()]
    }

    pub fn set(&mut self, kind: VisualKind, visible: bool) {
        self.flags[kind.index()] = visible;
    }

    /// Flip one flag and return its new value
    pub fn toggle(&mut self, kind: VisualKind) -> bool {
        let flag = &mut self.flags[kind.index()];
        *flag = !*flag;
        *flag
    }

    pub fn visible(&self) -> impl Iterator<Item = VisualKind> + '_ {
        VisualKind::ALL
            .into_iter()
            .filter(|kind| self.is_visible(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in VisualKind::ALL {
            assert_eq!(kind.to_string().parse::<VisualKind>(), Ok(kind));
        }
        assert_eq!("Circles".parse::<VisualKind>(), Ok(VisualKind::Circles));
        assert!("rings!".parse::<VisualKind>().is_err());
    }

    #[test]
    fn test_toggle_touches_one_flag() {
        let mut set = VisibilitySet::default();
        assert_eq!(set.visible().count(), 6);

        assert!(!set.toggle(VisualKind::Bars));
        for kind in VisualKind::ALL {
            assert_eq!(set.is_visible(kind), kind != VisualKind::Bars);
        }

        assert!(set.toggle(VisualKind::Bars));
        assert_eq!(set, VisibilitySet::default());
    }

    #[test]
    fn test_every_binding_renders_rest_state() {
        let rest = LevelSnapshot::default();
        for kind in VisualKind::ALL {
            let mut binding = kind.create();
            assert_eq!(binding.kind(), kind);

            binding.update(&rest, 0.0);
            let mut list = DrawList::new();
            binding.emit(Mat4::IDENTITY, &mut list);

            assert!(!list.is_empty(), "{} drew nothing", kind);
            let all = list
                .triangles
                .iter()
                .chain(&list.lines)
                .chain(&list.points);
            for v in all {
                assert!(v.position.iter().all(|c| c.is_finite()), "{}", kind);
            }
        }
    }
}
