//! Audio capture, sample exchange and spectrum analysis.
//!
//! The capture side (cpal callback or WAV playback thread) publishes blocks
//! into a [`SampleBufferExchange`]; the display thread copies snapshots out
//! and optionally runs them through a [`SpectrumAnalyzer`].

mod controls;
mod exchange;
mod fft;
mod system;
mod wav;

// Re-export public types
pub use controls::{AudioControls, InputProcessor};
pub use exchange::SampleBufferExchange;
pub use fft::{hann, hann_window, SpectrumAnalyzer};
pub use system::AudioSystem;
pub use wav::{load_wav, WavClip, WavSource};
