//! Generative patterns bound to the transport.
//!
//! The note material is fixed: a rising/falling bassline, steady hats,
//! a six-note melody that randomly rests, and a four-chord pad. Glicol
//! `seq` spans one bar at its native 120 BPM, so every sequence gets a
//! `speed` factor that stretches it to the engine tempo.
//!
//! Each pattern emits two aligned sequences: `~gate` carries pitch ratios
//! and `~trig` carries unit impulses that fire the envelope, so loudness
//! does not depend on the note.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::voice::VoiceKind;
use crate::params::EngineConfig;

/// Tempo at which a Glicol `seq` covers exactly one 4-beat bar
const GLICOL_NATIVE_BPM: f64 = 120.0;
const BEATS_PER_BAR: f64 = 4.0;

/// `seq` emits 2^((n - 60) / 12), so note 60 is an impulse of exactly 1.0
const UNIT_TRIGGER: u8 = 60;

/// C2 C2 G1 C2, eighth notes
const BASS_NOTES: [u8; 4] = [36, 36, 31, 36];

/// C4 E4 G4 B4 A4 G4, quarter notes
const MELODY_NOTES: [u8; 6] = [60, 64, 67, 71, 69, 67];

/// Melody steps drawn per composition before the phrase repeats
const MELODY_PHRASE_STEPS: u64 = 96;

/// Cmaj7, Am7, Fmaj7, G7; two bars each
const PAD_CHORDS: [[u8; 4]; 4] = [
    [48, 52, 55, 59],
    [45, 48, 52, 55],
    [41, 45, 48, 52],
    [43, 47, 50, 53],
];

/// One repeating sequence for one voice
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub voice: VoiceKind,

    /// Glicol chains defining the voice's trigger and pitch signal(s)
    pub code: String,

    /// Transport position at which the voice starts sounding (beats)
    pub start_beat: f64,

    /// Length of one step (beats)
    pub step_beats: f64,

    /// Chance that a step rests (0.0 - 1.0)
    pub skip_probability: f32,
}

impl Pattern {
    fn bass(tempo_bpm: f64) -> Self {
        let step_beats = 0.5;
        Self {
            voice: VoiceKind::Bass,
            code: pitched_chains("gate", tempo_bpm, step_beats, &notes(&BASS_NOTES)),
            start_beat: 0.0,
            step_beats,
            skip_probability: 0.0,
        }
    }

    fn hats(tempo_bpm: f64) -> Self {
        let step_beats = 0.5;
        Self {
            voice: VoiceKind::Hats,
            code: seq_chain("trig", tempo_bpm, step_beats, &[Some(UNIT_TRIGGER); 8]),
            start_beat: 1.0,
            step_beats,
            skip_probability: 0.0,
        }
    }

    /// A phrase of the melody with rests drawn from `gate`.
    ///
    /// A rest only withholds the next note; the one before keeps ringing
    /// and the note order picks up where it left off.
    fn melody(tempo_bpm: f64, gate: &mut StepGate) -> Self {
        let step_beats = 1.0;
        let mut next_note = 0;
        let steps: Vec<Option<u8>> = (0..MELODY_PHRASE_STEPS)
            .map(|step| {
                if !gate.is_open(step) {
                    return None;
                }
                let note = MELODY_NOTES[next_note % MELODY_NOTES.len()];
                next_note += 1;
                Some(note)
            })
            .collect();

        Self {
            voice: VoiceKind::Melody,
            code: pitched_chains("gate", tempo_bpm, step_beats, &steps),
            start_beat: 0.0,
            step_beats,
            skip_probability: gate.skip_probability(),
        }
    }

    fn pad(tempo_bpm: f64) -> Self {
        let step_beats = 2.0 * BEATS_PER_BAR;
        let mut chains: Vec<String> = (0..4)
            .map(|tone| {
                let tones: Vec<u8> = PAD_CHORDS.iter().map(|chord| chord[tone]).collect();
                seq_chain(&format!("g{}", tone + 1), tempo_bpm, step_beats, &notes(&tones))
            })
            .collect();
        chains.push(seq_chain(
            "trig",
            tempo_bpm,
            step_beats,
            &[Some(UNIT_TRIGGER); PAD_CHORDS.len()],
        ));

        Self {
            voice: VoiceKind::Pad,
            code: chains.join("\n"),
            start_beat: 0.0,
            step_beats,
            skip_probability: 0.0,
        }
    }

    /// Step index at a transport position, `None` before the pattern starts
    pub fn step_at(&self, position_beats: f64) -> Option<u64> {
        if position_beats < self.start_beat {
            return None;
        }
        Some(((position_beats - self.start_beat) / self.step_beats).floor() as u64)
    }
}

fn notes(notes: &[u8]) -> Vec<Option<u8>> {
    notes.iter().copied().map(Some).collect()
}

/// `~name` pitch ratios plus the matching `~trig` impulses
fn pitched_chains(name: &str, tempo_bpm: f64, step_beats: f64, steps: &[Option<u8>]) -> String {
    let triggers: Vec<Option<u8>> = steps.iter().map(|step| step.map(|_| UNIT_TRIGGER)).collect();
    format!(
        "{}\n{}",
        seq_chain(name, tempo_bpm, step_beats, steps),
        seq_chain("trig", tempo_bpm, step_beats, &triggers)
    )
}

/// `~name: speed S >> seq n1 _ n3 ...` for steps of `step_beats` each
fn seq_chain(name: &str, tempo_bpm: f64, step_beats: f64, steps: &[Option<u8>]) -> String {
    let cycle_beats = step_beats * steps.len() as f64;
    let speed = (tempo_bpm / GLICOL_NATIVE_BPM) * (BEATS_PER_BAR / cycle_beats);
    let steps: Vec<String> = steps
        .iter()
        .map(|step| match step {
            Some(note) => note.to_string(),
            None => "_".to_string(),
        })
        .collect();
    format!("~{}: speed {:.5} >> seq {}", name, speed, steps.join(" "))
}

/// The four patterns of one playback session
#[derive(Debug, Clone)]
pub struct PatternSet {
    patterns: [Pattern; 4],
    generation: u64,
}

impl PatternSet {
    /// Build all four patterns for the configured tempo
    pub fn compose(config: &EngineConfig, generation: u64) -> Self {
        let tempo = config.tempo_bpm as f64;
        let mut gate = StepGate::from_seed(config.melody_skip_probability, config.rng_seed);
        Self {
            patterns: [
                Pattern::bass(tempo),
                Pattern::hats(tempo),
                Pattern::melody(tempo, &mut gate),
                Pattern::pad(tempo),
            ],
            generation,
        }
    }

    pub fn get(&self, kind: VoiceKind) -> &Pattern {
        &self.patterns[kind.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }

    /// How many pattern sets the engine had built when this one was made
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Per-step open/closed decisions for a pattern that randomly rests
#[derive(Debug, Clone)]
pub struct StepGate {
    rng: StdRng,
    skip_probability: f32,
    current_step: Option<u64>,
    open: bool,
}

impl StepGate {
    pub fn new(skip_probability: f32, rng: StdRng) -> Self {
        Self {
            rng,
            skip_probability: skip_probability.clamp(0.0, 1.0),
            current_step: None,
            open: true,
        }
    }

    /// Seeded gate, or entropy-seeded when `seed` is `None`
    pub fn from_seed(skip_probability: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(skip_probability, rng)
    }

    pub fn skip_probability(&self) -> f32 {
        self.skip_probability
    }

    /// Whether `step` sounds. A fresh decision is drawn once per step.
    pub fn is_open(&mut self, step: u64) -> bool {
        if self.current_step != Some(step) {
            self.current_step = Some(step);
            self.open = self.rng.gen::<f32>() >= self.skip_probability;
        }
        self.open
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_chain_speed_matches_tempo() {
        // 4 eighths at 90 BPM = 2 beats per cycle -> 0.75 * 2
        let chain = seq_chain("gate", 90.0, 0.5, &notes(&BASS_NOTES));
        assert_eq!(chain, "~gate: speed 1.50000 >> seq 36 36 31 36");
    }

    #[test]
    fn test_seq_chain_writes_rests() {
        let chain = seq_chain("trig", 120.0, 1.0, &[Some(60), None, Some(60), None]);
        assert_eq!(chain, "~trig: speed 1.00000 >> seq 60 _ 60 _");
    }

    /// Tokens after `seq` in the `~name` chain of `code`
    fn seq_tokens<'a>(code: &'a str, name: &str) -> Vec<&'a str> {
        let prefix = format!("~{}:", name);
        let line = code
            .lines()
            .find(|line| line.starts_with(&prefix))
            .unwrap_or_else(|| panic!("no {} chain in {}", name, code));
        line.split(" >> seq ").nth(1).unwrap().split(' ').collect()
    }

    #[test]
    fn test_every_pattern_triggers_at_unit_level() {
        let set = PatternSet::compose(&EngineConfig::default(), 1);
        for pattern in set.iter() {
            let triggers = seq_tokens(&pattern.code, "trig");
            assert!(!triggers.is_empty());
            assert!(
                triggers.iter().all(|t| *t == "60" || *t == "_"),
                "{} triggers: {:?}",
                pattern.voice,
                triggers
            );
        }

        // Bass pitches stay on their own chain, aligned step for step
        let bass = set.get(VoiceKind::Bass);
        assert_eq!(seq_tokens(&bass.code, "gate"), vec!["36", "36", "31", "36"]);
        assert_eq!(seq_tokens(&bass.code, "trig").len(), 4);
    }

    #[test]
    fn test_melody_without_rests_cycles_its_notes() {
        let config = EngineConfig {
            melody_skip_probability: 0.0,
            rng_seed: Some(9),
            ..EngineConfig::default()
        };
        let melody = PatternSet::compose(&config, 1).get(VoiceKind::Melody).clone();
        let gate = seq_tokens(&melody.code, "gate");
        assert_eq!(gate.len(), MELODY_PHRASE_STEPS as usize);
        assert_eq!(&gate[..7], &["60", "64", "67", "71", "69", "67", "60"]);
        assert!(!melody.code.contains('_'));
    }

    #[test]
    fn test_melody_rest_withholds_note_without_advancing() {
        let config = EngineConfig {
            melody_skip_probability: 0.5,
            rng_seed: Some(11),
            ..EngineConfig::default()
        };
        let melody = PatternSet::compose(&config, 1).get(VoiceKind::Melody).clone();
        let gate = seq_tokens(&melody.code, "gate");
        let trig = seq_tokens(&melody.code, "trig");

        // Rests sit at the same steps on both chains
        assert_eq!(gate.len(), trig.len());
        for (pitch, trigger) in gate.iter().zip(&trig) {
            assert_eq!(*pitch == "_", *trigger == "_");
        }
        assert!(gate.contains(&"_"));

        // Sounding steps still walk the scale in order
        let sounding: Vec<&str> = gate.iter().copied().filter(|t| *t != "_").collect();
        for (i, note) in sounding.iter().enumerate() {
            assert_eq!(*note, MELODY_NOTES[i % MELODY_NOTES.len()].to_string());
        }
    }

    #[test]
    fn test_compose_builds_one_pattern_per_voice() {
        let set = PatternSet::compose(&EngineConfig::default(), 1);
        for kind in VoiceKind::ALL {
            assert_eq!(set.get(kind).voice, kind);
        }
        assert_eq!(set.generation(), 1);
        assert_eq!(set.iter().count(), 4);

        // Hats come in after one beat, the melody is the only one that rests
        assert_eq!(set.get(VoiceKind::Hats).start_beat, 1.0);
        assert!((set.get(VoiceKind::Melody).skip_probability - 0.1).abs() < 1e-6);
        assert_eq!(set.get(VoiceKind::Bass).skip_probability, 0.0);
    }

    #[test]
    fn test_pad_defines_four_chord_tones() {
        let pad = PatternSet::compose(&EngineConfig::default(), 1)
            .get(VoiceKind::Pad)
            .clone();
        for name in ["~g1:", "~g2:", "~g3:", "~g4:"] {
            assert!(pad.code.contains(name), "missing {}", name);
        }
        assert!(pad.code.contains("seq 48 45 41 43"));
        assert_eq!(seq_tokens(&pad.code, "trig"), vec!["60"; 4]);
    }

    #[test]
    fn test_step_at_respects_start_offset() {
        let hats = Pattern::hats(90.0);
        assert_eq!(hats.step_at(0.5), None);
        assert_eq!(hats.step_at(1.0), Some(0));
        assert_eq!(hats.step_at(2.25), Some(2));
    }

    #[test]
    fn test_gate_extremes() {
        let mut always = StepGate::from_seed(0.0, Some(7));
        let mut never = StepGate::from_seed(1.0, Some(7));
        for step in 0..200 {
            assert!(always.is_open(step));
            assert!(!never.is_open(step));
        }
    }

    #[test]
    fn test_gate_is_reproducible_with_seed() {
        let mut a = StepGate::from_seed(0.1, Some(42));
        let mut b = StepGate::from_seed(0.1, Some(42));
        let run_a: Vec<bool> = (0..500).map(|s| a.is_open(s)).collect();
        let run_b: Vec<bool> = (0..500).map(|s| b.is_open(s)).collect();
        assert_eq!(run_a, run_b);

        // Roughly one step in ten rests
        let rests = run_a.iter().filter(|open| !**open).count();
        assert!(rests > 10 && rests < 120, "rests = {}", rests);
    }

    #[test]
    fn test_gate_decides_once_per_step() {
        let mut gate = StepGate::from_seed(0.5, Some(3));
        let first = gate.is_open(5);
        for _ in 0..50 {
            assert_eq!(gate.is_open(5), first);
        }
    }
}
