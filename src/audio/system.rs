//! Live capture through cpal: input callback publishing into the exchange
//! and an optional monitor output stream.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::Arc;

use super::controls::{AudioControls, InputProcessor};
use super::exchange::SampleBufferExchange;
use crate::error::{ScopeError, ScopeResult};
use crate::params::AudioConfig;

/// Monitor ring length (samples); ~0.2 s at 44.1kHz
const MONITOR_RING_SAMPLES: usize = 8192;

/// Audio system owning the capture (and monitor) streams
pub struct AudioSystem {
    controls: Arc<AudioControls>,
    sample_rate_hz: u32,

    /// Input stream (kept alive)
    input_stream: cpal::Stream,

    /// Monitor output stream, if an output device exists
    output_stream: Option<cpal::Stream>,

    running: bool,
}

impl AudioSystem {
    /// Open the default input (and output) device
    ///
    /// Streams are created paused; call [`AudioSystem::start`].
    pub fn new(
        config: &AudioConfig,
        exchange: Arc<SampleBufferExchange>,
        controls: Arc<AudioControls>,
    ) -> ScopeResult<Self> {
        config.validate()?;

        let host = cpal::default_host();
        let input_device = host
            .default_input_device()
            .ok_or_else(|| ScopeError::Audio("No audio input device found".to_string()))?;

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate: cpal::SampleRate(config.sample_rate_hz),
            buffer_size: cpal::BufferSize::Default,
        };

        log::info!(
            "Audio input: {} @ {}Hz, {} channels",
            input_device
                .name()
                .unwrap_or_else(|_| "Unknown".to_string()),
            config.sample_rate_hz,
            config.channels
        );

        let (monitor_tx, monitor_rx) = rtrb::RingBuffer::<f32>::new(MONITOR_RING_SAMPLES);
        let mut processor = InputProcessor::new(
            exchange,
            Arc::clone(&controls),
            config.channels as usize,
        )
        .with_monitor(monitor_tx);

        let input_stream = input_device
            .build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    processor.process(data);
                },
                |err| log::error!("Audio input stream error: {}", err),
                None,
            )
            .map_err(|e| ScopeError::Audio(format!("Failed to build input stream: {}", e)))?;

        let output_stream = match host.default_output_device() {
            Some(device) => {
                match build_monitor_stream(&device, &stream_config, monitor_rx, Arc::clone(&controls)) {
                    Ok(stream) => Some(stream),
                    Err(e) => {
                        log::warn!("Monitor output unavailable: {}", e);
                        None
                    }
                }
            }
            None => {
                log::warn!("No audio output device found, monitoring disabled");
                None
            }
        };

        Ok(Self {
            controls,
            sample_rate_hz: config.sample_rate_hz,
            input_stream,
            output_stream,
            running: false,
        })
    }

    /// Start capture (and monitor output)
    pub fn start(&mut self) -> ScopeResult<()> {
        self.input_stream
            .play()
            .map_err(|e| ScopeError::Audio(format!("Failed to start input stream: {}", e)))?;
        if let Some(stream) = &self.output_stream {
            stream
                .play()
                .map_err(|e| ScopeError::Audio(format!("Failed to start output stream: {}", e)))?;
        }
        self.running = true;
        log::info!("Audio streams started");
        Ok(())
    }

    /// Pause all streams
    pub fn stop(&mut self) -> ScopeResult<()> {
        self.input_stream
            .pause()
            .map_err(|e| ScopeError::Audio(format!("Failed to pause input stream: {}", e)))?;
        if let Some(stream) = &self.output_stream {
            stream
                .pause()
                .map_err(|e| ScopeError::Audio(format!("Failed to pause output stream: {}", e)))?;
        }
        self.running = false;
        log::info!("Audio streams stopped");
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn controls(&self) -> &Arc<AudioControls> {
        &self.controls
    }

    pub fn set_gain(&self, gain: f32) {
        self.controls.set_gain(gain);
    }

    pub fn set_input_enabled(&self, enabled: bool) {
        self.controls.set_input_enabled(enabled);
    }

    /// Output only plays when a monitor stream could be opened
    pub fn set_output_enabled(&self, enabled: bool) {
        if enabled && self.output_stream.is_none() {
            log::warn!("Output enabled but no monitor stream is open");
        }
        self.controls.set_output_enabled(enabled);
    }
}

/// Output stream playing the gained input back on every channel
fn build_monitor_stream(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut monitor: rtrb::Consumer<f32>,
    controls: Arc<AudioControls>,
) -> ScopeResult<cpal::Stream> {
    let channels = config.channels.max(1) as usize;
    device
        .build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let enabled = controls.output_enabled();
                for frame in data.chunks_mut(channels) {
                    let sample = match monitor.pop() {
                        Ok(sample) if enabled => sample,
                        _ => 0.0,
                    };
                    frame.fill(sample);
                }
            },
            |err| log::error!("Audio output stream error: {}", err),
            None,
        )
        .map_err(|e| ScopeError::Audio(format!("Failed to build output stream: {}", e)))
}
