//! Control surface: UI-local state that forwards to the engine and the stage.

use crate::audio::{AudioEngine, AudioOutput, Channel, VoiceKind};
use crate::visuals::{VisibilitySet, VisualKind};

/// Slider and toggle state, as the user sees it
#[derive(Debug, Clone)]
pub struct ControlSurface {
    drawer_expanded: bool,
    fullscreen: bool,
    playing: bool,
    /// Integer percent per channel, in `Channel::ALL` order
    volumes: [u8; 5],
    muted: bool,
    visibility: VisibilitySet,
}

fn channel_index(channel: Channel) -> usize {
    match channel {
        Channel::Master => 0,
        Channel::Voice(kind) => 1 + kind.index(),
    }
}

impl ControlSurface {
    /// Mirror the engine's current volumes
    pub fn new<O: AudioOutput>(engine: &AudioEngine<O>) -> Self {
        let volumes = Channel::ALL.map(|ch| (engine.volume(ch) * 100.0).round() as u8);
        Self {
            drawer_expanded: false,
            fullscreen: false,
            playing: engine.is_playing(),
            volumes,
            muted: engine.is_muted(),
            visibility: VisibilitySet::default(),
        }
    }

    /// Flip play/pause. Ignored until the engine is initialised.
    pub fn toggle_play<O: AudioOutput>(&mut self, engine: &mut AudioEngine<O>) {
        if !engine.is_initialized() {
            log::warn!("Play/pause ignored: audio engine not initialized");
            return;
        }
        if engine.is_playing() {
            engine.pause();
        } else {
            engine.play();
        }
        self.playing = engine.is_playing();
    }

    /// Resynchronise the play flag after the engine was driven directly
    pub fn sync_playing<O: AudioOutput>(&mut self, engine: &AudioEngine<O>) {
        self.playing = engine.is_playing();
    }

    /// Slider change: 0-100 percent mapped linearly onto 0.0-1.0
    pub fn set_volume_percent<O: AudioOutput>(
        &mut self,
        engine: &mut AudioEngine<O>,
        channel: Channel,
        percent: u8,
    ) {
        let percent = percent.min(100);
        self.volumes[channel_index(channel)] = percent;
        engine.set_volume(channel, f32::from(percent) / 100.0);
    }

    /// Move a slider by `delta` percent, saturating at the ends
    pub fn nudge_volume<O: AudioOutput>(
        &mut self,
        engine: &mut AudioEngine<O>,
        channel: Channel,
        delta: i16,
    ) {
        let current = i16::from(self.volume_percent(channel));
        let next = (current + delta).clamp(0, 100) as u8;
        self.set_volume_percent(engine, channel, next);
    }

    pub fn toggle_mute<O: AudioOutput>(&mut self, engine: &mut AudioEngine<O>) {
        self.muted = !self.muted;
        engine.set_muted(self.muted);
    }

    /// Flip one visibility switch; returns the new state
    pub fn toggle_visibility(&mut self, kind: VisualKind) -> bool {
        self.visibility.toggle(kind)
    }

    pub fn toggle_fullscreen(&mut self) -> bool {
        self.fullscreen = !self.fullscreen;
        self.fullscreen
    }

    /// Record the real fullscreen state (e.g. after a failed request)
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn toggle_drawer(&mut self) -> bool {
        self.drawer_expanded = !self.drawer_expanded;
        self.drawer_expanded
    }

    pub fn volume_percent(&self, channel: Channel) -> u8 {
        self.volumes[channel_index(channel)]
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    pub fn is_drawer_expanded(&self) -> bool {
        self.drawer_expanded
    }

    pub fn visibility(&self) -> &VisibilitySet {
        &self.visibility
    }

    /// One-line status: the minimised bar, or every control when expanded
    pub fn summary(&self) -> String {
        let state = if self.playing { "playing" } else { "paused" };
        let mute = if self.muted { " [muted]" } else { "" };
        let master = format!("master {}%{}", self.volume_percent(Channel::Master), mute);

        if !self.drawer_expanded {
            return format!("{} | {}", state, master);
        }

        let voices = VoiceKind::ALL
            .iter()
            .map(|&kind| format!("{} {}%", kind.label(), self.volume_percent(Channel::Voice(kind))))
            .collect::<Vec<_>>()
            .join(" ");
        let shown = self
            .visibility
            .visible()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(",");
        format!("{} | {} | {} | show: {}", state, master, voices, shown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::OfflineOutput;
    use crate::params::EngineConfig;

    fn engine() -> AudioEngine<OfflineOutput> {
        AudioEngine::new(
            OfflineOutput::new(44100),
            EngineConfig {
                rng_seed: Some(7),
                ..EngineConfig::default()
            },
        )
    }

    #[test]
    fn test_sliders_mirror_engine_defaults() {
        let engine = engine();
        let controls = ControlSurface::new(&engine);
        assert_eq!(controls.volume_percent(Channel::Master), 70);
        assert_eq!(controls.volume_percent(Channel::Voice(VoiceKind::Bass)), 80);
        assert_eq!(controls.volume_percent(Channel::Voice(VoiceKind::Pad)), 50);
        assert!(!controls.is_muted());
    }

    #[test]
    fn test_play_toggle_requires_initialized_engine() {
        let mut engine = engine();
        let mut controls = ControlSurface::new(&engine);

        controls.toggle_play(&mut engine);
        assert!(!controls.is_playing());
        assert!(!engine.is_playing());

        engine.initialize().unwrap();
        controls.toggle_play(&mut engine);
        assert!(controls.is_playing() && engine.is_playing());
        controls.toggle_play(&mut engine);
        assert!(!controls.is_playing() && !engine.is_playing());
    }

    #[test]
    fn test_percent_maps_linearly() {
        let mut engine = engine();
        let mut controls = ControlSurface::new(&engine);
        let hats = Channel::Voice(VoiceKind::Hats);

        controls.set_volume_percent(&mut engine, hats, 25);
        assert_eq!(engine.volume(hats), 0.25);

        controls.set_volume_percent(&mut engine, hats, 250);
        assert_eq!(controls.volume_percent(hats), 100);
        assert_eq!(engine.volume(hats), 1.0);
    }

    #[test]
    fn test_nudge_saturates() {
        let mut engine = engine();
        let mut controls = ControlSurface::new(&engine);

        for _ in 0..10 {
            controls.nudge_volume(&mut engine, Channel::Master, 5);
        }
        assert_eq!(controls.volume_percent(Channel::Master), 100);

        for _ in 0..30 {
            controls.nudge_volume(&mut engine, Channel::Master, -5);
        }
        assert_eq!(controls.volume_percent(Channel::Master), 0);
        assert_eq!(engine.volume(Channel::Master), 0.0);
    }

    #[test]
    fn test_mute_leaves_sliders_alone() {
        let mut engine = engine();
        let mut controls = ControlSurface::new(&engine);

        controls.toggle_mute(&mut engine);
        assert!(engine.is_muted());
        assert_eq!(engine.effective_master_gain(), 0.0);
        assert_eq!(controls.volume_percent(Channel::Master), 70);

        controls.toggle_mute(&mut engine);
        assert!(!engine.is_muted());
        assert!(engine.effective_master_gain() > 0.0);
    }

    #[test]
    fn test_drawer_summary() {
        let engine = engine();
        let mut controls = ControlSurface::new(&engine);
        assert_eq!(controls.summary(), "paused | master 70%");

        controls.toggle_drawer();
        controls.toggle_visibility(VisualKind::Mazes);
        let summary = controls.summary();
        assert!(summary.contains("bass 80%"));
        assert!(summary.contains("show: diamond,circles,lines,bars,particles"));
    }
}
