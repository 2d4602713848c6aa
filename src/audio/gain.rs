//! Volume configuration and linear/decibel gain conversion.

use super::voice::VoiceKind;

/// Convert linear gain to decibels. Zero (or less) maps to negative infinity.
pub fn gain_to_db(gain: f32) -> f32 {
    if gain <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * gain.log10()
    }
}

/// Convert decibels to linear gain. Negative infinity maps to silence.
pub fn db_to_gain(db: f32) -> f32 {
    if db == f32::NEG_INFINITY {
        0.0
    } else {
        10f32.powf(db / 20.0)
    }
}

/// A volume control target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Master,
    Voice(VoiceKind),
}

impl Channel {
    /// Master first, then the voices in mixer order
    pub const ALL: [Channel; 5] = [
        Channel::Master,
        Channel::Voice(VoiceKind::Bass),
        Channel::Voice(VoiceKind::Hats),
        Channel::Voice(VoiceKind::Melody),
        Channel::Voice(VoiceKind::Pad),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Channel::Master => "master",
            Channel::Voice(kind) => kind.label(),
        }
    }
}

/// Per-voice volumes (0.0 - 1.0 linear) plus the global mute
#[derive(Debug, Clone, PartialEq)]
pub struct VoiceConfig {
    pub master: f32,
    pub bass: f32,
    pub hats: f32,
    pub melody: f32,
    pub pad: f32,
    pub muted: bool,
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            master: 0.7,
            bass: 0.8,
            hats: 0.6,
            melody: 0.7,
            pad: 0.5,
            muted: false,
        }
    }
}

impl VoiceConfig {
    pub fn volume(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Master => self.master,
            Channel::Voice(VoiceKind::Bass) => self.bass,
            Channel::Voice(VoiceKind::Hats) => self.hats,
            Channel::Voice(VoiceKind::Melody) => self.melody,
            Channel::Voice(VoiceKind::Pad) => self.pad,
        }
    }

    /// Store a volume, clamped to [0, 1]. NaN leaves the current value.
    ///
    /// Returns whether the stored value changed.
    pub fn set_volume(&mut self, channel: Channel, value: f32) -> bool {
        if value.is_nan() {
            return false;
        }
        let value = value.clamp(0.0, 1.0);
        let slot = match channel {
            Channel::Master => &mut self.master,
            Channel::Voice(VoiceKind::Bass) => &mut self.bass,
            Channel::Voice(VoiceKind::Hats) => &mut self.hats,
            Channel::Voice(VoiceKind::Melody) => &mut self.melody,
            Channel::Voice(VoiceKind::Pad) => &mut self.pad,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }

    /// Decibel levels derived from the current volumes
    pub fn mix_levels(&self) -> MixLevels {
        MixLevels {
            master_db: if self.muted {
                f32::NEG_INFINITY
            } else {
                gain_to_db(self.master)
            },
            voice_db: VoiceKind::ALL.map(|kind| gain_to_db(self.volume(Channel::Voice(kind)))),
        }
    }
}

/// Decibel gains as applied to the mixer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixLevels {
    /// Final output stage (negative infinity when muted)
    pub master_db: f32,

    /// Per-voice stage, indexed by [`VoiceKind::index`]
    pub voice_db: [f32; 4],
}

impl MixLevels {
    pub fn voice(&self, kind: VoiceKind) -> f32 {
        self.voice_db[kind.index()]
    }

    pub fn master_gain(&self) -> f32 {
        db_to_gain(self.master_db)
    }

    pub fn voice_gain(&self, kind: VoiceKind) -> f32 {
        db_to_gain(self.voice(kind))
    }
}

impl Default for MixLevels {
    fn default() -> Self {
        VoiceConfig::default().mix_levels()
    }
}
