//! Audio capture and FFT analysis configuration.

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Smallest FFT size the analyzer accepts
pub const MIN_FFT_SIZE: usize = 64;

/// Capture stream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Capture sample rate (Hz)
    pub sample_rate_hz: u32,

    /// Interleaved channels delivered by the capture callback
    /// Only channel 0 is published to the scope.
    pub channels: u16,

    /// Capacity of the short (most recent block) buffer, in frames
    pub max_block_frames: usize,

    /// Length of the rolling long buffer (seconds)
    pub max_plot_seconds: f32,

    /// Input gain applied before publishing (linear)
    pub gain: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: audio_constants::SAMPLE_RATE_HZ,
            channels: audio_constants::CHANNELS,
            max_block_frames: 4096,
            max_plot_seconds: audio_constants::MAX_PLOT_SECONDS,
            gain: 1.0,
        }
    }
}

impl AudioConfig {
    /// Capacity of the rolling long buffer in samples
    pub fn long_capacity(&self) -> usize {
        (self.sample_rate_hz as f32 * self.max_plot_seconds).round() as usize
    }

    /// Validate configuration (non-zero rates and capacities)
    pub fn validate(&self) -> ScopeResult<()> {
        if self.sample_rate_hz == 0 {
            return Err(ScopeError::InvalidConfiguration(
                "Sample rate must be > 0".to_string(),
            ));
        }
        if self.channels == 0 {
            return Err(ScopeError::InvalidConfiguration(
                "Channel count must be > 0".to_string(),
            ));
        }
        if self.max_block_frames == 0 || self.long_capacity() == 0 {
            return Err(ScopeError::InvalidConfiguration(format!(
                "Buffer capacities must be > 0 (block {} frames, long {} s)",
                self.max_block_frames, self.max_plot_seconds
            )));
        }
        Ok(())
    }
}

/// FFT analysis configuration
///
/// Bin frequencies come from [`AudioConfig::sample_rate_hz`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FFTConfig {
    /// FFT window size (must be power of 2, at least 64)
    pub fft_size: usize,
}

impl Default for FFTConfig {
    fn default() -> Self {
        Self { fft_size: 1024 }
    }
}

impl FFTConfig {
    pub fn validate(&self) -> ScopeResult<()> {
        validate_fft_size(self.fft_size)
    }
}

/// Check that an FFT size is a power of two no smaller than [`MIN_FFT_SIZE`]
pub fn validate_fft_size(fft_size: usize) -> ScopeResult<()> {
    if !fft_size.is_power_of_two() {
        return Err(ScopeError::InvalidConfiguration(format!(
            "FFT size must be power of 2, got {}",
            fft_size
        )));
    }
    if fft_size < MIN_FFT_SIZE {
        return Err(ScopeError::InvalidConfiguration(format!(
            "FFT size must be at least {}, got {}",
            MIN_FFT_SIZE, fft_size
        )));
    }
    Ok(())
}

/// Audio stream constants
pub mod audio_constants {
    /// Default capture rate (Hz)
    pub const SAMPLE_RATE_HZ: u32 = 44100;

    /// Stereo interleaved capture
    pub const CHANNELS: u16 = 2;

    /// Rolling buffer length (seconds)
    pub const MAX_PLOT_SECONDS: f32 = 3.0;
}
