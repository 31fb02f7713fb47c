//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::params::{DisplayMode, ScopeConfig};

/// Display mode as spelled on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    /// Waveform (seconds / amplitude)
    Time,
    /// Magnitude spectrum (Hz / magnitude)
    Freq,
}

impl From<ModeArg> for DisplayMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Time => DisplayMode::TimeDomain,
            ModeArg::Freq => DisplayMode::FrequencyDomain,
        }
    }
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "audioscope")]
#[command(about = "Real-time oscilloscope and spectrum view of an audio input", long_about = None)]
pub struct Args {
    /// YAML configuration file (defaults used if missing)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Play a WAV file instead of capturing from the default input
    #[arg(long, value_name = "FILE")]
    pub wav: Option<PathBuf>,

    /// Display mode
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// FFT size (power of 2, >= 64)
    #[arg(long, value_name = "N")]
    pub fft_size: Option<usize>,

    /// Linear input gain
    #[arg(long, value_name = "GAIN")]
    pub gain: Option<f32>,

    /// Stop after this many seconds (runs until interrupted otherwise)
    #[arg(long, value_name = "SECONDS")]
    pub duration: Option<f32>,

    /// Play the input back through the default output device
    #[arg(long)]
    pub monitor: bool,
}

impl Args {
    /// Override configuration fields given on the command line
    pub fn apply(&self, config: &mut ScopeConfig) {
        if let Some(mode) = self.mode {
            config.display.mode = mode.into();
        }
        if let Some(fft_size) = self.fft_size {
            config.fft.fft_size = fft_size;
        }
        if let Some(gain) = self.gain {
            config.audio.gain = gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_to_config() {
        let args = Args::parse_from([
            "audioscope",
            "--mode",
            "freq",
            "--fft-size",
            "2048",
            "--gain",
            "0.5",
            "--monitor",
        ]);
        let mut config = ScopeConfig::default();
        args.apply(&mut config);

        assert_eq!(config.display.mode, DisplayMode::FrequencyDomain);
        assert_eq!(config.fft.fft_size, 2048);
        assert_eq!(config.audio.gain, 0.5);
        assert!(args.monitor);
        assert!(args.wav.is_none());
    }

    #[test]
    fn test_no_flags_leave_config_untouched() {
        let args = Args::parse_from(["audioscope"]);
        let mut config = ScopeConfig::default();
        args.apply(&mut config);

        assert_eq!(config.display.mode, DisplayMode::TimeDomain);
        assert_eq!(config.fft.fft_size, 1024);
        assert!(args.duration.is_none());
    }
}
