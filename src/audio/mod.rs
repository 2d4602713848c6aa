//! Generative music engine and per-voice level analysis.
//!
//! Four Glicol voices (bass, hats, melody, pad) are mixed on the audio
//! thread. Each voice feeds a small waveform analyser; once per rendered
//! frame the engine turns those windows into a [`LevelSnapshot`] for the
//! visual bindings.

mod analyser;
mod engine;
mod gain;
mod output;
mod pattern;
mod rack;
mod transport;
mod voice;

// Re-export public types
pub use analyser::{calculate_level, Analyser, LevelSnapshot, LevelTap};
pub use engine::{AudioEngine, LevelCallback};
pub use gain::{db_to_gain, gain_to_db, Channel, MixLevels, VoiceConfig};
pub use output::{AudioOutput, DeviceOutput, OfflineOutput};
pub use pattern::{Pattern, PatternSet, StepGate};
pub use rack::{SharedRack, VoiceRack};
pub use transport::{Transport, TransportState};
pub use voice::{Voice, VoiceKind};
