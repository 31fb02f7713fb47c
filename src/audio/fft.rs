//! Windowed magnitude spectrum for the frequency-domain display.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::collections::HashMap;
use std::f32::consts::PI;
use std::sync::Arc;

use crate::error::ScopeResult;
use crate::params::validate_fft_size;

/// Magnitude spectrum analyzer with a cached plan, window and work buffers
///
/// Output magnitudes are scaled by `4 / N`: the Hann window's coherent gain
/// is ~0.5 and a real sinusoid splits its energy across two mirrored bins, so
/// a unit sinusoid sitting exactly on a bin peaks at `(W - 1) / N`, just below
/// full scale.
pub struct SpectrumAnalyzer {
    fft_size: usize,
    scale: f32,
    planner: FftPlanner<f32>,
    fft: Arc<dyn Fft<f32>>,
    /// Hann windows keyed by input length (each <= fft_size)
    windows: HashMap<usize, Vec<f32>>,
    buffer: Vec<Complex<f32>>,
    scratch: Vec<Complex<f32>>,
    magnitudes: Vec<f32>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for FFT size `fft_size` (power of 2, >= 64)
    pub fn new(fft_size: usize) -> ScopeResult<Self> {
        validate_fft_size(fft_size)?;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(fft_size);
        let mut analyzer = Self {
            fft_size,
            scale: 0.0,
            planner,
            fft,
            windows: HashMap::new(),
            buffer: Vec::new(),
            scratch: Vec::new(),
            magnitudes: Vec::new(),
        };
        analyzer.allocate();
        Ok(analyzer)
    }

    /// Reconfigure for a new FFT size
    ///
    /// No-op when the size is unchanged; an invalid size keeps the current plan.
    pub fn set_fft_size(&mut self, fft_size: usize) -> ScopeResult<()> {
        if fft_size == self.fft_size {
            return Ok(());
        }
        validate_fft_size(fft_size)?;

        log::info!("FFT size {} -> {}", self.fft_size, fft_size);
        self.fft_size = fft_size;
        self.fft = self.planner.plan_fft_forward(fft_size);
        self.allocate();
        Ok(())
    }

    fn allocate(&mut self) {
        let n = self.fft_size;
        self.scale = 4.0 / n as f32;
        self.windows.clear();
        self.windows.insert(n, hann_window(n));
        self.buffer = vec![Complex::new(0.0, 0.0); n];
        self.scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];
        self.magnitudes = vec![0.0; n / 2];
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of output bins (N / 2)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2
    }

    /// Normalization constant applied to every magnitude
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Compute the magnitude spectrum of `input`
    ///
    /// Input is truncated or zero-padded to the FFT size. Only the first
    /// `min(len, N)` samples are windowed, with a Hann window of that length.
    /// Returns `N / 2` magnitudes; bin `k` is `k * sample_rate / N` Hz.
    pub fn compute_spectrum(&mut self, input: &[f32]) -> &[f32] {
        let n = self.fft_size;
        let window_len = input.len().min(n);

        // One window per distinct input length
        let window = self
            .windows
            .entry(window_len)
            .or_insert_with(|| hann_window(window_len));

        for (slot, (&sample, &w)) in self.buffer.iter_mut().zip(input.iter().zip(window.iter())) {
            *slot = Complex::new(sample * w, 0.0);
        }
        for slot in &mut self.buffer[window_len..] {
            *slot = Complex::new(0.0, 0.0);
        }

        self.fft
            .process_with_scratch(&mut self.buffer, &mut self.scratch);

        for (mag, bin) in self.magnitudes.iter_mut().zip(&self.buffer) {
            *mag = bin.norm() * self.scale;
        }

        &self.magnitudes
    }

    /// Compute the spectrum into a caller-owned vector
    pub fn compute_spectrum_into(&mut self, input: &[f32], out: &mut Vec<f32>) {
        let magnitudes = self.compute_spectrum(input);
        out.clear();
        out.extend_from_slice(magnitudes);
    }

    /// Center frequency of bin `k` (Hz)
    pub fn bin_frequency(&self, bin: usize, sample_rate_hz: f32) -> f32 {
        bin as f32 * sample_rate_hz / self.fft_size as f32
    }

    /// Frequencies of all output bins (Hz)
    pub fn frequency_axis(&self, sample_rate_hz: f32) -> Vec<f32> {
        (0..self.num_bins())
            .map(|k| self.bin_frequency(k, sample_rate_hz))
            .collect()
    }
}

/// Hann window coefficient at `index` for a window of `size` samples
pub fn hann(index: usize, size: usize) -> f32 {
    if size < 2 {
        return 1.0;
    }
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}

/// Full Hann window of `size` samples
pub fn hann_window(size: usize) -> Vec<f32> {
    (0..size).map(|i| hann(i, size)).collect()
}
