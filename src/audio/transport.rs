//! Shared sample clock that governs when patterns sound.

/// Transport run state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Started,
    Paused,
}

/// Fixed-tempo sample clock
#[derive(Debug, Clone)]
pub struct Transport {
    tempo_bpm: f32,
    sample_rate_hz: u32,
    state: TransportState,
    position_samples: u64,
}

impl Transport {
    pub fn new(tempo_bpm: f32, sample_rate_hz: u32) -> Self {
        Self {
            tempo_bpm,
            sample_rate_hz: sample_rate_hz.max(1),
            state: TransportState::Stopped,
            position_samples: 0,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == TransportState::Started
    }

    /// Start or resume. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.state == TransportState::Started {
            return false;
        }
        self.state = TransportState::Started;
        true
    }

    /// Hold the current position
    pub fn pause(&mut self) {
        if self.state == TransportState::Started {
            self.state = TransportState::Paused;
        }
    }

    /// Stop and rewind to the top
    pub fn cancel(&mut self) {
        self.state = TransportState::Stopped;
        self.position_samples = 0;
    }

    /// Move the clock forward while running
    pub fn advance(&mut self, frames: u64) {
        if self.is_running() {
            self.position_samples += frames;
        }
    }

    pub fn position_samples(&self) -> u64 {
        self.position_samples
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_samples as f64 / self.sample_rate_hz as f64
    }

    pub fn position_beats(&self) -> f64 {
        self.position_seconds() * self.tempo_bpm as f64 / 60.0
    }

    pub fn tempo_bpm(&self) -> f32 {
        self.tempo_bpm
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_only_advances_when_started() {
        let mut transport = Transport::new(90.0, 48000);
        transport.advance(48000);
        assert_eq!(transport.position_samples(), 0);

        assert!(transport.start());
        assert!(!transport.start());
        transport.advance(48000);
        assert!((transport.position_beats() - 1.5).abs() < 1e-9);

        transport.pause();
        assert_eq!(transport.state(), TransportState::Paused);
        transport.advance(48000);
        assert_eq!(transport.position_samples(), 48000);

        assert!(transport.start());
        transport.advance(24000);
        assert_eq!(transport.position_samples(), 72000);
    }

    #[test]
    fn test_cancel_rewinds() {
        let mut transport = Transport::new(120.0, 44100);
        transport.start();
        transport.advance(1000);
        transport.cancel();
        assert_eq!(transport.state(), TransportState::Stopped);
        assert_eq!(transport.position_samples(), 0);
    }
}
