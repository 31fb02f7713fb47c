//! Producer-side state shared with the display thread: gain and
//! input/output enable flags, plus the per-callback input processing.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use super::exchange::SampleBufferExchange;

/// Scalar controls written by the display thread and read by the callback
///
/// Single-word atomics; a stale gain for one callback is acceptable.
#[derive(Debug)]
pub struct AudioControls {
    gain_bits: AtomicU32,
    input_enabled: AtomicBool,
    output_enabled: AtomicBool,
}

impl AudioControls {
    pub fn new(gain: f32) -> Self {
        Self {
            gain_bits: AtomicU32::new(gain.to_bits()),
            input_enabled: AtomicBool::new(true),
            output_enabled: AtomicBool::new(false),
        }
    }

    pub fn gain(&self) -> f32 {
        f32::from_bits(self.gain_bits.load(Ordering::Relaxed))
    }

    pub fn set_gain(&self, gain: f32) {
        self.gain_bits.store(gain.to_bits(), Ordering::Relaxed);
    }

    pub fn input_enabled(&self) -> bool {
        self.input_enabled.load(Ordering::Relaxed)
    }

    pub fn set_input_enabled(&self, enabled: bool) {
        self.input_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn output_enabled(&self) -> bool {
        self.output_enabled.load(Ordering::Relaxed)
    }

    pub fn set_output_enabled(&self, enabled: bool) {
        self.output_enabled.store(enabled, Ordering::Relaxed);
    }
}

impl Default for AudioControls {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Runs inside the capture callback: de-interleaves channel 0, applies gain
/// and publishes the block
pub struct InputProcessor {
    exchange: Arc<SampleBufferExchange>,
    controls: Arc<AudioControls>,
    channels: usize,
    scratch: Vec<f32>,
    monitor: Option<rtrb::Producer<f32>>,
}

impl InputProcessor {
    pub fn new(
        exchange: Arc<SampleBufferExchange>,
        controls: Arc<AudioControls>,
        channels: usize,
    ) -> Self {
        // Sized for the largest block we expect so the callback doesn't allocate
        let capacity = exchange.capacity().max(8192);
        Self {
            exchange,
            controls,
            channels: channels.max(1),
            scratch: Vec::with_capacity(capacity),
            monitor: None,
        }
    }

    /// Forward processed samples to an output monitor ring while output is enabled
    pub fn with_monitor(mut self, monitor: rtrb::Producer<f32>) -> Self {
        self.monitor = Some(monitor);
        self
    }

    /// Handle one interleaved callback buffer
    ///
    /// Buffers longer than the preallocated scratch are published as
    /// consecutive blocks, so the short buffer ends up holding the last one.
    /// Returns the number of frames published (0 when input is disabled).
    pub fn process(&mut self, interleaved: &[f32]) -> usize {
        if !self.controls.input_enabled() {
            return 0;
        }

        let gain = self.controls.gain();
        let output_enabled = self.controls.output_enabled();
        let chunk_len = self.scratch.capacity() * self.channels;
        let mut frames = 0;

        for chunk in interleaved.chunks(chunk_len) {
            self.scratch.clear();
            self.scratch.extend(
                chunk
                    .chunks_exact(self.channels)
                    .map(|frame| frame[0] * gain),
            );
            self.exchange.publish(&self.scratch);
            frames += self.scratch.len();

            if let Some(monitor) = self.monitor.as_mut() {
                if output_enabled {
                    // Drop samples the output side hasn't caught up with
                    let n = monitor.slots().min(self.scratch.len());
                    for &sample in &self.scratch[..n] {
                        let _ = monitor.push(sample);
                    }
                }
            }
        }

        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_round_trips_through_atomic() {
        let controls = AudioControls::new(0.5);
        assert_eq!(controls.gain(), 0.5);
        controls.set_gain(2.25);
        assert_eq!(controls.gain(), 2.25);
    }

    #[test]
    fn test_process_extracts_first_channel_with_gain() {
        let exchange = Arc::new(SampleBufferExchange::new(16, 64));
        let controls = Arc::new(AudioControls::new(2.0));
        let mut processor = InputProcessor::new(Arc::clone(&exchange), controls, 2);

        let frames = processor.process(&[0.1, 9.0, 0.2, 9.0, 0.3, 9.0]);

        assert_eq!(frames, 3);
        let snapshot = exchange.current_snapshot();
        assert_eq!(snapshot.len(), 3);
        for (got, want) in snapshot.iter().zip([0.2f32, 0.4, 0.6]) {
            assert!((got - want).abs() < 1e-6);
        }
    }

    #[test]
    fn test_oversized_buffer_processed_without_growing_scratch() {
        let exchange = Arc::new(SampleBufferExchange::new(16, 32768));
        let controls = Arc::new(AudioControls::new(0.5));
        let mut processor = InputProcessor::new(Arc::clone(&exchange), controls, 2);
        let capacity = processor.scratch.capacity();

        // More frames than the scratch holds
        let frames = capacity * 2 + 100;
        let interleaved: Vec<f32> = (0..frames)
            .flat_map(|i| [i as f32, -1.0])
            .collect();

        assert_eq!(processor.process(&interleaved), frames);
        assert_eq!(processor.scratch.capacity(), capacity);

        let long = exchange.long_snapshot();
        assert_eq!(long.len(), frames);
        assert!(long.iter().enumerate().all(|(i, &s)| s == i as f32 * 0.5));

        // Short buffer holds the start of the final chunk
        let current = exchange.current_snapshot();
        assert_eq!(current.len(), 16);
        assert_eq!(current[0], (capacity * 2) as f32 * 0.5);
    }

    #[test]
    fn test_disabled_input_publishes_nothing() {
        let exchange = Arc::new(SampleBufferExchange::new(16, 64));
        let controls = Arc::new(AudioControls::default());
        controls.set_input_enabled(false);
        let mut processor = InputProcessor::new(Arc::clone(&exchange), controls, 1);

        assert_eq!(processor.process(&[1.0, 1.0]), 0);
        assert!(exchange.is_empty());
    }

    #[test]
    fn test_monitor_only_fed_when_output_enabled() {
        let exchange = Arc::new(SampleBufferExchange::new(16, 64));
        let controls = Arc::new(AudioControls::default());
        let (producer, mut consumer) = rtrb::RingBuffer::new(8);
        let mut processor =
            InputProcessor::new(exchange, Arc::clone(&controls), 1).with_monitor(producer);

        processor.process(&[0.5, 0.5]);
        assert_eq!(consumer.slots(), 0);

        controls.set_output_enabled(true);
        processor.process(&[0.25; 12]);
        // Ring capacity bounds what gets forwarded
        assert_eq!(consumer.slots(), 8);
        assert_eq!(consumer.pop().unwrap(), 0.25);
    }
}
