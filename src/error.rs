//! Error types for the scope core and its capture front-ends.

use thiserror::Error;

/// Errors surfaced by configuration setters and audio front-ends.
///
/// Out-of-range limits are never reported here: visible/hard limit requests
/// are clamped to the nearest valid configuration instead.
#[derive(Error, Debug)]
pub enum ScopeError {
    /// Rejected configuration (FFT size, resolution, sample rate, ...)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Operation on a plot series that was never added
    #[error("No plot series at index {0}")]
    InvalidIndex(usize),

    /// Lock or buffer allocation failure
    #[error("Resource exhaustion: {0}")]
    ResourceExhaustion(String),

    /// Audio device or stream failure
    #[error("Audio error: {0}")]
    Audio(String),

    /// WAV file could not be opened or decoded
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

/// Result type for scope operations
pub type ScopeResult<T> = Result<T, ScopeError>;
