//! Audio engine lifecycle: initialise, play, pause, clean up.
//!
//! The engine is an ordinary owned value. The binary keeps one for the
//! process lifetime and passes it to whoever needs it; tests build their
//! own around an [`OfflineOutput`](super::OfflineOutput).
//!
//! Level analysis is driven from the redraw loop: call [`AudioEngine::tick`]
//! once per rendered frame. The analysis loop is "scheduled" by `play()` and
//! unschedules itself the first time a tick finds playback stopped.

use std::sync::Arc;

use log::{error, info, trace, warn};

use super::analyser::{LevelSnapshot, LevelTap};
use super::gain::{Channel, MixLevels, VoiceConfig};
use super::output::{AudioOutput, DeviceOutput};
use super::pattern::PatternSet;
use super::rack::{SharedRack, VoiceRack};
use super::transport::TransportState;
use super::voice::VoiceKind;
use crate::error::AudioError;
use crate::params::EngineConfig;

/// Receives the latest levels once per analysed frame
pub type LevelCallback = Box<dyn FnMut(&LevelSnapshot)>;

/// Generative music engine producing a per-frame [`LevelSnapshot`]
pub struct AudioEngine<O: AudioOutput = DeviceOutput> {
    config: EngineConfig,
    output: O,

    // Volume state
    voices: VoiceConfig,
    mix: MixLevels,

    // Owned audio graph; `None` when not initialised
    rack: Option<SharedRack>,
    level_tap: Option<Arc<LevelTap>>,
    patterns: Option<PatternSet>,
    pattern_generation: u64,

    // Lifecycle
    initialized: bool,
    playing: bool,
    analysis_scheduled: bool,

    // Analysis
    levels: LevelSnapshot,
    on_levels: Option<LevelCallback>,
}

impl AudioEngine<DeviceOutput> {
    /// Engine that plays through the default system output device
    pub fn with_device(config: EngineConfig) -> Self {
        Self::new(DeviceOutput::new(), config)
    }
}

impl<O: AudioOutput> AudioEngine<O> {
    pub fn new(output: O, config: EngineConfig) -> Self {
        let voices = config.voices.clone();
        let mix = voices.mix_levels();
        Self {
            config,
            output,
            voices,
            mix,
            rack: None,
            level_tap: None,
            patterns: None,
            pattern_generation: 0,
            initialized: false,
            playing: false,
            analysis_scheduled: false,
            levels: LevelSnapshot::default(),
            on_levels: None,
        }
    }

    /// Acquire the output, build the voices and apply the current volumes.
    ///
    /// Idempotent once successful. On failure the engine is cleaned up and
    /// left uninitialised, so calling again is safe.
    pub fn initialize(&mut self) -> Result<(), AudioError> {
        if self.initialized {
            return Ok(());
        }

        info!("Initializing audio engine...");
        match self.build() {
            Ok(()) => {
                self.initialized = true;
                info!("Audio engine initialized successfully");
                Ok(())
            }
            Err(e) => {
                error!("Failed to initialize audio engine: {}", e);
                self.cleanup();
                Err(e)
            }
        }
    }

    fn build(&mut self) -> Result<(), AudioError> {
        let sample_rate = self.output.acquire()?;

        let rack = VoiceRack::new(&self.config, sample_rate);
        self.level_tap = Some(rack.level_tap());
        let rack = rack.shared();
        self.rack = Some(rack.clone());
        self.update_volumes();

        self.output.start(rack)
    }

    /// Start (or resume) playback. Builds the patterns on first use.
    pub fn play(&mut self) {
        if !self.initialized {
            warn!("Cannot play: audio engine not initialized");
            return;
        }
        if self.playing {
            return;
        }
        let Some(rack) = self.rack.clone() else {
            return;
        };

        info!("Starting audio playback");

        if self.patterns.is_none() {
            if let Err(e) = self.create_patterns(&rack) {
                error!("Error starting playback: {}", e);
                return;
            }
        }

        rack.lock().transport_mut().start();
        self.playing = true;

        self.start_analysis();
    }

    /// Pause the transport. Patterns are kept for the next `play()`.
    pub fn pause(&mut self) {
        if !self.playing {
            return;
        }

        info!("Pausing audio playback");
        if let Some(rack) = &self.rack {
            rack.lock().transport_mut().pause();
        }
        self.playing = false;
    }

    /// Tear everything down. Safe before `initialize()` and when repeated.
    pub fn cleanup(&mut self) {
        info!("Cleaning up audio engine");

        self.pause();
        self.dispose_patterns();
        self.output.release();

        // Dropping the rack disposes voices, effects and analysers
        if let Some(rack) = self.rack.take() {
            rack.lock().transport_mut().cancel();
        }
        self.level_tap = None;

        self.initialized = false;
        self.playing = false;
    }

    fn create_patterns(&mut self, rack: &SharedRack) -> Result<(), AudioError> {
        info!("Creating audio patterns");
        self.dispose_patterns();

        self.pattern_generation += 1;
        let patterns = PatternSet::compose(&self.config, self.pattern_generation);

        // Compile outside the lock the audio callback renders under
        let sample_rate_hz = rack.lock().sample_rate_hz();
        let voices = VoiceRack::prepare_voices(&patterns, sample_rate_hz)?;
        rack.lock().install_patterns(&patterns, voices);

        self.patterns = Some(patterns);
        Ok(())
    }

    fn dispose_patterns(&mut self) {
        if self.patterns.take().is_some() {
            if let Some(rack) = &self.rack {
                rack.lock().unload_patterns();
            }
        }
    }

    fn start_analysis(&mut self) {
        if !self.playing {
            return;
        }
        self.analysis_scheduled = true;
    }

    /// One analysis step, called once per rendered frame.
    ///
    /// Returns the fresh snapshot, or `None` when the analysis loop is not
    /// running. A tick that finds playback stopped ends the loop.
    pub fn tick(&mut self) -> Option<LevelSnapshot> {
        if !self.analysis_scheduled {
            return None;
        }
        if !self.playing {
            self.analysis_scheduled = false;
            return None;
        }

        let levels = match &self.level_tap {
            Some(tap) => tap.load(),
            None => [0.0; 4],
        };
        self.levels = LevelSnapshot::from_levels(levels);
        trace!("levels: {:?}", self.levels);

        if let Some(callback) = self.on_levels.as_mut() {
            callback(&self.levels);
        }

        Some(self.levels)
    }

    /// Register the single level listener, replacing any previous one
    pub fn set_audio_level_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&LevelSnapshot) + 'static,
    {
        self.on_levels = Some(Box::new(callback));
    }

    /// Store a volume (clamped to [0, 1]) and reapply all gains
    pub fn set_volume(&mut self, channel: Channel, value: f32) {
        self.voices.set_volume(channel, value);
        self.update_volumes();
    }

    pub fn set_master_volume(&mut self, value: f32) {
        self.set_volume(Channel::Master, value);
    }

    pub fn set_bass_volume(&mut self, value: f32) {
        self.set_volume(Channel::Voice(VoiceKind::Bass), value);
    }

    pub fn set_hats_volume(&mut self, value: f32) {
        self.set_volume(Channel::Voice(VoiceKind::Hats), value);
    }

    pub fn set_melody_volume(&mut self, value: f32) {
        self.set_volume(Channel::Voice(VoiceKind::Melody), value);
    }

    pub fn set_pad_volume(&mut self, value: f32) {
        self.set_volume(Channel::Voice(VoiceKind::Pad), value);
    }

    /// Mute the output stage without touching the stored volumes
    pub fn set_muted(&mut self, muted: bool) {
        self.voices.muted = muted;
        self.update_volumes();
    }

    fn update_volumes(&mut self) {
        self.mix = self.voices.mix_levels();
        if let Some(rack) = &self.rack {
            rack.lock().apply_mix(&self.mix);
        }
    }

    pub fn volume(&self, channel: Channel) -> f32 {
        self.voices.volume(channel)
    }

    pub fn is_muted(&self) -> bool {
        self.voices.muted
    }

    pub fn voice_config(&self) -> &VoiceConfig {
        &self.voices
    }

    /// Decibel gains currently applied
    pub fn mix_levels(&self) -> MixLevels {
        self.mix
    }

    /// Linear gain of the final output stage (zero when muted)
    pub fn effective_master_gain(&self) -> f32 {
        self.mix.master_gain()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the per-frame analysis loop is still scheduled
    pub fn is_analysing(&self) -> bool {
        self.analysis_scheduled
    }

    /// Most recent snapshot; keeps its last value while paused
    pub fn levels(&self) -> LevelSnapshot {
        self.levels
    }

    pub fn patterns(&self) -> Option<&PatternSet> {
        self.patterns.as_ref()
    }

    /// Number of pattern sets built over the engine's lifetime
    pub fn pattern_generation(&self) -> u64 {
        self.pattern_generation
    }

    pub fn transport_state(&self) -> TransportState {
        match &self.rack {
            Some(rack) => rack.lock().transport().state(),
            None => TransportState::Stopped,
        }
    }

    /// Copies of the raw analyser windows, in [`VoiceKind::ALL`] order
    pub fn analyser_waveforms(&self) -> Option<[Vec<f32>; 4]> {
        self.rack.as_ref().map(|rack| rack.lock().waveforms())
    }

    pub fn rack(&self) -> Option<&SharedRack> {
        self.rack.as_ref()
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

impl<O: AudioOutput> Drop for AudioEngine<O> {
    fn drop(&mut self) {
        if self.initialized {
            self.cleanup();
        }
    }
}
