//! Error types for the audio engine and renderer.

use thiserror::Error;

use crate::audio::VoiceKind;

/// Audio engine errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// No default output device (missing, or access denied)
    #[error("no audio output device found")]
    NoOutputDevice,

    #[error("failed to get audio config: {0}")]
    DefaultConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("failed to build audio stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("failed to start audio stream: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    #[error("unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    /// A voice's Glicol code failed to compile
    #[error("{voice} synth error: {message}")]
    Synth { voice: VoiceKind, message: String },

    /// Operation needs an initialised engine
    #[error("audio engine not initialized")]
    NotInitialized,
}

/// Renderer bootstrap errors
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("failed to find suitable GPU adapter")]
    NoAdapter,

    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
}
