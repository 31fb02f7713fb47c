//! Parameter definitions with physical units and documented semantics.
//!
//! All magic numbers are extracted here with:
//! - Physical units (seconds, Hz, pixels, etc.)
//! - Documented ranges and meanings
//! - Type safety where possible

mod audio;
mod display;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

// Re-export all types
pub use audio::{audio_constants, validate_fft_size, AudioConfig, FFTConfig, MIN_FFT_SIZE};
pub use display::{
    AutoGridBounds, AxisStyle, DisplayConfig, DisplayMode, LabelFormat, ModeDefaults,
};

/// Complete scope configuration, loadable from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeConfig {
    pub audio: AudioConfig,
    pub fft: FFTConfig,
    pub display: DisplayConfig,
}

impl ScopeConfig {
    pub fn validate(&self) -> ScopeResult<()> {
        self.audio.validate()?;
        self.fft.validate()?;
        self.display.validate()
    }
}

/// Load configuration from a YAML file
///
/// Missing or unparseable files fall back to defaults.
pub fn load_config(path: &Path) -> ScopeConfig {
    log::info!("load_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_config: Config file doesn't exist, using defaults");
        return ScopeConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<ScopeConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_config: Loaded config - {} Hz, FFT {}, mode {:?}",
                    config.audio.sample_rate_hz,
                    config.fft.fft_size,
                    config.display.mode
                );
                config
            }
            Err(e) => {
                log::warn!("load_config: Failed to parse config: {}, using defaults", e);
                ScopeConfig::default()
            }
        },
        Err(e) => {
            log::warn!(
                "load_config: Failed to read config file: {}, using defaults",
                e
            );
            ScopeConfig::default()
        }
    }
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &ScopeConfig, path: &Path) -> ScopeResult<()> {
    log::info!("save_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ScopeError::InvalidConfiguration(format!("Failed to create {:?}: {}", parent, e))
        })?;
    }

    let yaml = serde_yaml::to_string(config)
        .map_err(|e| ScopeError::InvalidConfiguration(format!("Failed to serialize: {}", e)))?;
    std::fs::write(path, yaml).map_err(|e| {
        ScopeError::InvalidConfiguration(format!("Failed to write {:?}: {}", path, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("missing.yaml"));
        assert_eq!(config.fft.fft_size, FFTConfig::default().fft_size);
    }

    #[test]
    fn test_config_round_trip_through_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("scope.yaml");

        let mut config = ScopeConfig::default();
        config.fft.fft_size = 4096;
        config.display.mode = DisplayMode::FrequencyDomain;
        save_config(&config, &path).unwrap();

        let loaded = load_config(&path);
        assert_eq!(loaded.fft.fft_size, 4096);
        assert_eq!(loaded.display.mode, DisplayMode::FrequencyDomain);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.yaml");
        std::fs::write(&path, "fft:\n  fft_size: 2048\n").unwrap();

        let loaded = load_config(&path);
        assert_eq!(loaded.fft.fft_size, 2048);
        assert_eq!(loaded.audio.sample_rate_hz, 44100);
        assert_eq!(loaded.display.plot_resolution, 512);
    }

    #[test]
    fn test_stream_rate_read_from_audio_section() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rate.yaml");
        std::fs::write(&path, "audio:\n  sample_rate_hz: 48000\nfft:\n  fft_size: 512\n").unwrap();

        let loaded = load_config(&path);
        assert_eq!(loaded.audio.sample_rate_hz, 48000);
        assert_eq!(loaded.audio.long_capacity(), 144_000);
        assert_eq!(loaded.fft.fft_size, 512);
        assert!(loaded.validate().is_ok());
    }

    #[test]
    fn test_garbage_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.yaml");
        std::fs::write(&path, "fft: [not, a, map").unwrap();

        let loaded = load_config(&path);
        assert_eq!(loaded.fft.fft_size, 1024);
    }
}
