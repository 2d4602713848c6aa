//! Synthesizer voices backed by Glicol engines.
//!
//! A voice owns one Glicol engine. Its patch (oscillator, envelope and
//! effect) is fixed per kind; the note sequence driving it comes from a
//! [`Pattern`](super::Pattern) loaded at playback time. Until a pattern is
//! loaded the voice is silent and its engine is not advanced.

use std::fmt;
use std::str::FromStr;

use glicol::Engine;

use crate::error::AudioError;
use crate::params::audio_constants::BLOCK_SIZE;

/// The four generative sound sources
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VoiceKind {
    Bass,
    Hats,
    Melody,
    Pad,
}

impl VoiceKind {
    /// Mixer order
    pub const ALL: [VoiceKind; 4] = [
        VoiceKind::Bass,
        VoiceKind::Hats,
        VoiceKind::Melody,
        VoiceKind::Pad,
    ];

    pub fn index(self) -> usize {
        match self {
            VoiceKind::Bass => 0,
            VoiceKind::Hats => 1,
            VoiceKind::Melody => 2,
            VoiceKind::Pad => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VoiceKind::Bass => "bass",
            VoiceKind::Hats => "hats",
            VoiceKind::Melody => "melody",
            VoiceKind::Pad => "pad",
        }
    }

    /// Glicol chains for oscillator, envelope and effect.
    ///
    /// Expects the pattern to define `~trig` (unit impulses starting each
    /// note) and, for pitched voices, `~gate` (pitch ratios; pad: `~g1`..`~g4`).
    /// Oscillators hold the last non-zero ratio between impulses, so only
    /// `saw`/`tri` can follow a `seq` pitch.
    pub fn patch(self) -> &'static str {
        match self {
            // Saw bass through a low-pass
            VoiceKind::Bass => {
                r#"
~amp: ~trig >> envperc 0.05 0.45
~pit: ~gate >> mul 261.63
o: saw ~pit >> mul ~amp >> lpf 200.0 1.0
"#
            }
            // Short white-noise bursts through a high-pass
            VoiceKind::Hats => {
                r#"
~amp: ~trig >> envperc 0.005 0.1
o: noise 42 >> mul ~amp >> hpf 8000.0 1.0
"#
            }
            // Triangle lead with a plate tail
            VoiceKind::Melody => {
                r#"
~amp: ~trig >> envperc 0.01 0.5
~pit: ~gate >> mul 261.63
o: tri ~pit >> mul ~amp >> mul 0.9 >> plate 0.3
"#
            }
            // Four triangle partials, slow envelope, long reverb
            VoiceKind::Pad => {
                r#"
~amp: ~trig >> envperc 0.5 4.0
~p1: ~g1 >> mul 261.63
~p2: ~g2 >> mul 261.63
~p3: ~g3 >> mul 261.63
~p4: ~g4 >> mul 261.63
~v1: tri ~p1 >> mul ~amp
~v2: tri ~p2 >> mul ~amp
~v3: tri ~p3 >> mul ~amp
~v4: tri ~p4 >> mul ~amp
o: mix ~v1 ~v2 ~v3 ~v4 >> mul 0.25 >> lpf 1200.0 1.0 >> plate 0.5
"#
            }
        }
    }
}

impl fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for VoiceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bass" => Ok(VoiceKind::Bass),
            "hats" | "hihats" | "hi-hats" => Ok(VoiceKind::Hats),
            "melody" => Ok(VoiceKind::Melody),
            "pad" | "ambient" => Ok(VoiceKind::Pad),
            other => Err(format!("unknown voice '{}'", other)),
        }
    }
}

/// One synthesizer voice with its effect chain
pub struct Voice {
    kind: VoiceKind,
    engine: Engine<BLOCK_SIZE>,
    block: [f32; BLOCK_SIZE],
    cursor: usize,
    loaded: bool,
}

impl Voice {
    /// Create an idle voice at the given sample rate
    pub fn new(kind: VoiceKind, sample_rate_hz: u32) -> Self {
        let mut engine = Engine::<BLOCK_SIZE>::new();
        engine.set_sr(sample_rate_hz as usize);

        Self {
            kind,
            engine,
            block: [0.0; BLOCK_SIZE],
            cursor: BLOCK_SIZE,
            loaded: false,
        }
    }

    pub fn kind(&self) -> VoiceKind {
        self.kind
    }

    /// Whether a sequence is loaded and the voice produces sound
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Compile `sequence` together with this voice's patch
    pub fn load(&mut self, sequence: &str) -> Result<(), AudioError> {
        let code = format!("{}\n{}", sequence.trim(), self.kind.patch().trim());
        self.engine.update_with_code(&code);
        self.engine.update().map_err(|e| AudioError::Synth {
            voice: self.kind,
            message: format!("{:?}", e),
        })?;

        self.cursor = BLOCK_SIZE;
        self.loaded = true;
        Ok(())
    }

    /// Detach the sequence; the voice falls silent
    pub fn unload(&mut self) {
        self.loaded = false;
        self.cursor = BLOCK_SIZE;
    }

    /// Next mono sample (left channel of the engine output)
    pub fn next_sample(&mut self) -> f32 {
        if !self.loaded {
            return 0.0;
        }

        if self.cursor >= BLOCK_SIZE {
            let (buffers, _) = self.engine.next_block(vec![]);
            for i in 0..BLOCK_SIZE {
                self.block[i] = buffers[0][i];
            }
            self.cursor = 0;
        }

        let sample = self.block[self.cursor];
        self.cursor += 1;
        sample
    }
}
