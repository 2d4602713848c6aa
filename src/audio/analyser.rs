//! Waveform analysers and the per-frame level snapshot.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};

use super::voice::VoiceKind;

/// Rolling window of the most recent waveform samples of one voice
#[derive(Debug, Clone)]
pub struct Analyser {
    window: VecDeque<f32>,
    size: usize,
}

impl Analyser {
    /// Create an analyser holding `size` samples, initially silent
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            window: std::iter::repeat(0.0).take(size).collect(),
            size,
        }
    }

    /// Push one sample, dropping the oldest
    pub fn push(&mut self, sample: f32) {
        if self.window.len() == self.size {
            self.window.pop_front();
        }
        self.window.push_back(sample);
    }

    /// Push a run of samples
    pub fn extend(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// Copy of the current window, oldest first
    pub fn waveform(&self) -> Vec<f32> {
        self.window.iter().copied().collect()
    }

    /// Level of the current window
    pub fn level(&self) -> f32 {
        let (head, tail) = self.window.as_slices();
        if head.is_empty() && tail.is_empty() {
            return 0.0;
        }
        let sum: f32 = head.iter().chain(tail).map(|s| s.abs()).sum();
        scale_mean(sum, self.window.len())
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Forget all history
    pub fn clear(&mut self) {
        self.window.iter_mut().for_each(|s| *s = 0.0);
    }
}

/// Envelope proxy of a waveform window: mean absolute value, doubled, capped at 1.
///
/// Empty windows read as silence.
pub fn calculate_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s.abs()).sum();
    scale_mean(sum, samples.len())
}

fn scale_mean(sum: f32, len: usize) -> f32 {
    let level = (sum / len as f32) * 2.0;
    if level.is_nan() {
        0.0
    } else {
        level.min(1.0)
    }
}

/// Latest analyser levels handed from the audio thread to the frame loop.
///
/// Stored as f32 bit patterns so neither side takes the rack lock.
#[derive(Debug, Default)]
pub struct LevelTap {
    levels: [AtomicU32; 4],
}

impl LevelTap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish levels in [`VoiceKind::ALL`] order
    pub fn store(&self, levels: [f32; 4]) {
        for (slot, level) in self.levels.iter().zip(levels) {
            slot.store(level.to_bits(), Ordering::Relaxed);
        }
    }

    pub fn load(&self) -> [f32; 4] {
        std::array::from_fn(|i| f32::from_bits(self.levels[i].load(Ordering::Relaxed)))
    }
}

/// Per-voice levels as of the most recent analysis tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LevelSnapshot {
    pub bass_level: f32,
    pub hats_level: f32,
    pub melody_level: f32,
    pub pad_level: f32,
    /// Unweighted mean of the four voice levels
    pub average_level: f32,
}

impl LevelSnapshot {
    /// Build a snapshot from levels in [`VoiceKind::ALL`] order.
    ///
    /// Inputs are clamped to [0, 1]; non-finite inputs read as zero.
    pub fn from_levels(levels: [f32; 4]) -> Self {
        let [bass, hats, melody, pad] = levels.map(|level| {
            if level.is_finite() {
                level.clamp(0.0, 1.0)
            } else {
                0.0
            }
        });
        Self {
            bass_level: bass,
            hats_level: hats,
            melody_level: melody,
            pad_level: pad,
            average_level: (bass + hats + melody + pad) / 4.0,
        }
    }

    pub fn level(&self, kind: VoiceKind) -> f32 {
        match kind {
            VoiceKind::Bass => self.bass_level,
            VoiceKind::Hats => self.hats_level,
            VoiceKind::Melody => self.melody_level,
            VoiceKind::Pad => self.pad_level,
        }
    }
}
