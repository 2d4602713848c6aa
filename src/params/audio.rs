//! Audio engine configuration and constants.

use crate::audio::VoiceConfig;

/// Audio constants (compile-time, match Glicol engine setup)
pub mod audio_constants {
    /// Audio block size (samples per buffer)
    /// 128 samples = 2.9ms @ 44.1kHz
    pub const BLOCK_SIZE: usize = 128;

    /// Number of waveform samples each analyser keeps
    pub const ANALYSER_WINDOW: usize = 32;

    /// Output hard limit applied after the master stage
    pub const OUTPUT_LIMIT: f32 = 0.95;
}

/// Audio engine configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Transport tempo (beats per minute). Fixed for the piece.
    pub tempo_bpm: f32,

    /// Waveform window per analyser (samples)
    pub analyser_window: usize,

    /// Probability that a melody step is skipped (0.0 - 1.0)
    pub melody_skip_probability: f32,

    /// Seed for the melody skip decisions. `None` draws from OS entropy.
    pub rng_seed: Option<u64>,

    /// Volumes and mute applied at initialisation
    pub voices: VoiceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tempo_bpm: 90.0,
            analyser_window: audio_constants::ANALYSER_WINDOW,
            melody_skip_probability: 0.1,
            rng_seed: None,
            voices: VoiceConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Length of one beat (seconds)
    pub fn seconds_per_beat(&self) -> f32 {
        60.0 / self.tempo_bpm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tempo_beat_length() {
        let config = EngineConfig::default();
        assert!((config.seconds_per_beat() - 0.6667).abs() < 0.001);
        assert_eq!(config.analyser_window, 32);
    }
}
