//! Audio-thread mix graph: voices, analysers, gains and the transport.

use std::sync::Arc;

use parking_lot::Mutex;

use super::analyser::{Analyser, LevelTap};
use super::gain::MixLevels;
use super::pattern::{Pattern, PatternSet};
use super::transport::Transport;
use super::voice::{Voice, VoiceKind};
use crate::error::AudioError;
use crate::params::audio_constants::OUTPUT_LIMIT;
use crate::params::EngineConfig;

/// Rack shared between the engine (main thread) and the output callback
pub type SharedRack = Arc<Mutex<VoiceRack>>;

/// Voice -> voice gain -> analyser tap -> mix bus
struct Strip {
    voice: Voice,
    gain: f32,
    analyser: Analyser,
    pattern: Option<Pattern>,
}

/// All four voices and the master stage
pub struct VoiceRack {
    strips: [Strip; 4],
    master_gain: f32,
    transport: Transport,
    sample_rate_hz: u32,
    level_tap: Arc<LevelTap>,
}

impl VoiceRack {
    /// Build idle voices and analysers at the device sample rate
    pub fn new(config: &EngineConfig, sample_rate_hz: u32) -> Self {
        let levels = config.voices.mix_levels();
        let strips = VoiceKind::ALL.map(|kind| Strip {
            voice: Voice::new(kind, sample_rate_hz),
            gain: levels.voice_gain(kind),
            analyser: Analyser::new(config.analyser_window),
            pattern: None,
        });

        Self {
            strips,
            master_gain: levels.master_gain(),
            transport: Transport::new(config.tempo_bpm, sample_rate_hz),
            sample_rate_hz,
            level_tap: Arc::new(LevelTap::new()),
        }
    }

    pub fn shared(self) -> SharedRack {
        Arc::new(Mutex::new(self))
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    /// Apply decibel levels computed on the main thread
    pub fn apply_mix(&mut self, levels: &MixLevels) {
        self.master_gain = levels.master_gain();
        for strip in &mut self.strips {
            strip.gain = levels.voice_gain(strip.voice.kind());
        }
    }

    /// Compile every pattern into a fresh voice.
    ///
    /// Needs no rack, so callers can build voices without holding the lock
    /// the audio thread renders under.
    pub fn prepare_voices(
        patterns: &PatternSet,
        sample_rate_hz: u32,
    ) -> Result<[Voice; 4], AudioError> {
        let mut voices = VoiceKind::ALL.map(|kind| Voice::new(kind, sample_rate_hz));
        for voice in &mut voices {
            voice.load(&patterns.get(voice.kind()).code)?;
        }
        Ok(voices)
    }

    /// Swap in voices built by [`VoiceRack::prepare_voices`]
    pub fn install_patterns(&mut self, patterns: &PatternSet, voices: [Voice; 4]) {
        for voice in voices {
            let strip = &mut self.strips[voice.kind().index()];
            strip.pattern = Some(patterns.get(voice.kind()).clone());
            strip.voice = voice;
        }
    }

    /// Compile and attach a pattern to every voice
    pub fn load_patterns(&mut self, patterns: &PatternSet) -> Result<(), AudioError> {
        let voices = Self::prepare_voices(patterns, self.sample_rate_hz)?;
        self.install_patterns(patterns, voices);
        Ok(())
    }

    /// Detach all patterns; voices fall silent
    pub fn unload_patterns(&mut self) {
        for strip in &mut self.strips {
            strip.voice.unload();
            strip.pattern = None;
        }
    }

    pub fn has_patterns(&self) -> bool {
        self.strips.iter().any(|strip| strip.pattern.is_some())
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    pub fn analyser(&self, kind: VoiceKind) -> &Analyser {
        &self.strips[kind.index()].analyser
    }

    pub fn analyser_mut(&mut self, kind: VoiceKind) -> &mut Analyser {
        &mut self.strips[kind.index()].analyser
    }

    /// Copies of all four analyser windows, in mixer order
    pub fn waveforms(&self) -> [Vec<f32>; 4] {
        VoiceKind::ALL.map(|kind| self.analyser(kind).waveform())
    }

    /// Current level of every analyser, in mixer order
    pub fn levels(&self) -> [f32; 4] {
        VoiceKind::ALL.map(|kind| self.analyser(kind).level())
    }

    /// Handle the frame loop reads published levels from
    pub fn level_tap(&self) -> Arc<LevelTap> {
        Arc::clone(&self.level_tap)
    }

    /// Push current analyser levels to the tap
    pub fn publish_levels(&self) {
        self.level_tap.store(self.levels());
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn voice_gain(&self, kind: VoiceKind) -> f32 {
        self.strips[kind.index()].gain
    }

    /// Render one mono output sample
    pub fn next_sample(&mut self) -> f32 {
        if !self.transport.is_running() {
            return 0.0;
        }

        let beats = self.transport.position_beats();
        let mut mix = 0.0;

        for strip in self.strips.iter_mut() {
            let Some(pattern) = &strip.pattern else {
                continue;
            };

            // Voices wait for their start offset
            let sample = if pattern.step_at(beats).is_some() {
                strip.voice.next_sample() * strip.gain
            } else {
                0.0
            };

            strip.analyser.push(sample);
            mix += sample;
        }

        self.transport.advance(1);

        // Limiting and NaN protection
        let out = mix * self.master_gain;
        if out.is_finite() {
            out.clamp(-OUTPUT_LIMIT, OUTPUT_LIMIT)
        } else {
            0.0
        }
    }

    /// Fill a mono buffer and publish the resulting levels
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.next_sample();
        }
        self.publish_levels();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::gain::VoiceConfig;

    #[test]
    fn test_rack_is_silent_until_transport_starts() {
        let mut rack = VoiceRack::new(&EngineConfig::default(), 44100);
        let mut buffer = vec![1.0; 256];
        rack.render(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));
        assert_eq!(rack.transport().position_samples(), 0);
    }

    #[test]
    fn test_running_transport_without_patterns_advances_silently() {
        let mut rack = VoiceRack::new(&EngineConfig::default(), 44100);
        rack.transport_mut().start();
        let mut buffer = vec![1.0; 300];
        rack.render(&mut buffer);
        assert!(buffer.iter().all(|s| *s == 0.0));
        assert_eq!(rack.transport().position_samples(), 300);
        assert!(!rack.has_patterns());
    }

    #[test]
    fn test_apply_mix_pushes_linear_gains() {
        let mut rack = VoiceRack::new(&EngineConfig::default(), 44100);
        let mut config = VoiceConfig::default();
        config.bass = 0.25;
        config.muted = true;
        rack.apply_mix(&config.mix_levels());

        assert!((rack.voice_gain(VoiceKind::Bass) - 0.25).abs() < 1e-5);
        assert_eq!(rack.master_gain(), 0.0);
    }

    #[test]
    fn test_levels_read_from_analysers() {
        let mut rack = VoiceRack::new(&EngineConfig::default(), 44100);
        rack.analyser_mut(VoiceKind::Pad).extend(&[0.25; 32]);
        let levels = rack.levels();
        assert_eq!(levels[VoiceKind::Bass.index()], 0.0);
        assert!((levels[VoiceKind::Pad.index()] - 0.5).abs() < 1e-6);
        assert_eq!(rack.waveforms()[3], vec![0.25; 32]);
    }

    #[test]
    fn test_render_publishes_levels_to_tap() {
        let mut rack = VoiceRack::new(&EngineConfig::default(), 44100);
        let tap = rack.level_tap();
        rack.analyser_mut(VoiceKind::Bass).extend(&[0.25; 32]);
        assert_eq!(tap.load(), [0.0; 4]);

        rack.render(&mut [0.0; 16]);
        assert!((tap.load()[VoiceKind::Bass.index()] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_hats_wait_for_their_first_beat() {
        let config = EngineConfig {
            rng_seed: Some(5),
            ..EngineConfig::default()
        };
        let mut rack = VoiceRack::new(&config, 44100);
        rack.load_patterns(&PatternSet::compose(&config, 1)).unwrap();
        assert!(rack.has_patterns());
        rack.transport_mut().start();

        // One beat at 90 BPM is 29400 samples
        let mut buffer = vec![0.0; 29000];
        rack.render(&mut buffer);
        assert_eq!(rack.analyser(VoiceKind::Hats).level(), 0.0);
        assert!(rack.analyser(VoiceKind::Bass).level() > 0.0);

        let mut buffer = vec![0.0; 2000];
        rack.render(&mut buffer);
        assert!(rack.analyser(VoiceKind::Hats).level() > 0.0);
    }
}
