//! Platform audio output.
//!
//! [`DeviceOutput`] plays the rack through the default cpal device.
//! [`OfflineOutput`] never touches hardware; the rack is rendered on demand,
//! which is what headless runs and the tests use.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, Sample, SizedSample};
use log::{error, info};

use super::rack::SharedRack;
use crate::error::AudioError;

/// Where the engine sends its mix
pub trait AudioOutput {
    /// Acquire the output and report its sample rate (Hz)
    fn acquire(&mut self) -> Result<u32, AudioError>;

    /// Begin pulling audio from `rack`
    fn start(&mut self, rack: SharedRack) -> Result<(), AudioError>;

    /// Stop pulling audio and release the output. Safe to call repeatedly.
    fn release(&mut self);
}

/// Default system output device via cpal
#[derive(Default)]
pub struct DeviceOutput {
    device: Option<cpal::Device>,
    config: Option<cpal::SupportedStreamConfig>,
    /// Audio output stream (kept alive)
    stream: Option<cpal::Stream>,
}

impl DeviceOutput {
    pub fn new() -> Self {
        Self::default()
    }

    fn run<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        rack: SharedRack,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: Sample + SizedSample + FromSample<f32>,
    {
        let channels = config.channels as usize;

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                // Never block the audio thread on the main thread. The main
                // thread only locks briefly on control changes; levels leave
                // through the lock-free tap.
                let mut rack = rack.try_lock();
                for frame in data.chunks_mut(channels) {
                    let sample = match rack.as_mut() {
                        Some(rack) => rack.next_sample(),
                        None => 0.0,
                    };
                    for out in frame.iter_mut() {
                        *out = T::from_sample(sample);
                    }
                }
                if let Some(rack) = rack.as_ref() {
                    rack.publish_levels();
                }
            },
            |err| error!("Audio stream error: {}", err),
            None,
        )
    }
}

impl AudioOutput for DeviceOutput {
    fn acquire(&mut self) -> Result<u32, AudioError> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::NoOutputDevice)?;
        let config = device.default_output_config()?;

        info!(
            "Audio: {} @ {}Hz ({} channels, {:?})",
            device.name().unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate().0,
            config.channels(),
            config.sample_format()
        );

        let sample_rate = config.sample_rate().0;
        self.device = Some(device);
        self.config = Some(config);
        Ok(sample_rate)
    }

    fn start(&mut self, rack: SharedRack) -> Result<(), AudioError> {
        let (Some(device), Some(config)) = (&self.device, &self.config) else {
            return Err(AudioError::NotInitialized);
        };

        let stream_config: cpal::StreamConfig = config.config();
        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::run::<f32>(device, &stream_config, rack)?,
            cpal::SampleFormat::I16 => Self::run::<i16>(device, &stream_config, rack)?,
            cpal::SampleFormat::U16 => Self::run::<u16>(device, &stream_config, rack)?,
            other => return Err(AudioError::UnsupportedSampleFormat(format!("{:?}", other))),
        };

        stream.play()?;
        self.stream = Some(stream);
        Ok(())
    }

    fn release(&mut self) {
        if let Some(stream) = self.stream.take() {
            if let Err(e) = stream.pause() {
                log::debug!("Pausing stream during release failed: {}", e);
            }
        }
        self.config = None;
        self.device = None;
    }
}

/// Hardware-free output that renders when asked
pub struct OfflineOutput {
    sample_rate_hz: u32,
    unavailable: bool,
    rack: Option<SharedRack>,
}

impl OfflineOutput {
    pub fn new(sample_rate_hz: u32) -> Self {
        Self {
            sample_rate_hz,
            unavailable: false,
            rack: None,
        }
    }

    /// An output whose acquisition always fails, like a denied device
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::new(44100)
        }
    }

    /// Make acquisition fail (or succeed again) from now on
    pub fn set_unavailable(&mut self, unavailable: bool) {
        self.unavailable = unavailable;
    }

    pub fn is_started(&self) -> bool {
        self.rack.is_some()
    }

    /// Render `frames` mono samples. Silence when not started.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut buffer = vec![0.0; frames];
        if let Some(rack) = &self.rack {
            rack.lock().render(&mut buffer);
        }
        buffer
    }
}

impl AudioOutput for OfflineOutput {
    fn acquire(&mut self) -> Result<u32, AudioError> {
        if self.unavailable {
            return Err(AudioError::NoOutputDevice);
        }
        Ok(self.sample_rate_hz)
    }

    fn start(&mut self, rack: SharedRack) -> Result<(), AudioError> {
        if self.unavailable {
            return Err(AudioError::NoOutputDevice);
        }
        self.rack = Some(rack);
        Ok(())
    }

    fn release(&mut self) {
        self.rack = None;
    }
}
