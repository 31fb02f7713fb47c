//! WAV file playback standing in for the live capture callback.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use super::controls::InputProcessor;
use crate::error::{ScopeError, ScopeResult};

/// Decoded WAV contents as interleaved f32 in [-1, 1]
#[derive(Debug, Clone)]
pub struct WavClip {
    pub samples: Vec<f32>,
    pub channels: u16,
    pub sample_rate_hz: u32,
}

impl WavClip {
    pub fn frames(&self) -> usize {
        self.samples.len() / self.channels.max(1) as usize
    }

    pub fn duration_s(&self) -> f32 {
        self.frames() as f32 / self.sample_rate_hz as f32
    }
}

/// Read a WAV file, converting integer PCM to float
pub fn load_wav(path: &Path) -> ScopeResult<WavClip> {
    let reader = hound::WavReader::open(path)?;
    let spec = reader.spec();

    let samples = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<Vec<_>, _>>()?,
        hound::SampleFormat::Int => {
            let full_scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / full_scale))
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    if samples.is_empty() {
        return Err(ScopeError::InvalidConfiguration(format!(
            "WAV file {:?} contains no samples",
            path
        )));
    }

    log::info!(
        "Loaded {:?}: {} Hz, {} channels, {} frames",
        path,
        spec.sample_rate,
        spec.channels,
        samples.len() / spec.channels as usize
    );

    Ok(WavClip {
        samples,
        channels: spec.channels,
        sample_rate_hz: spec.sample_rate,
    })
}

/// Thread feeding a clip to an [`InputProcessor`] in real-time sized blocks,
/// looping at the end
pub struct WavSource {
    stop: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl WavSource {
    /// Start playback; `block_frames` frames are published per simulated callback
    pub fn spawn(clip: WavClip, mut processor: InputProcessor, block_frames: usize) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);
        let block_frames = block_frames.max(1);

        let handle = thread::spawn(move || {
            let channels = clip.channels.max(1) as usize;
            let block_len = block_frames * channels;
            let block_duration =
                Duration::from_secs_f64(block_frames as f64 / clip.sample_rate_hz as f64);
            let mut deadline = Instant::now();

            'playback: loop {
                for block in clip.samples.chunks(block_len) {
                    if stop_flag.load(Ordering::Relaxed) {
                        break 'playback;
                    }
                    processor.process(block);

                    deadline += block_duration;
                    let wait = deadline.saturating_duration_since(Instant::now());
                    if !wait.is_zero() {
                        thread::sleep(wait);
                    }
                }
                log::debug!("WAV source looping");
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }

    /// Stop playback and join the thread
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("WAV source thread panicked");
            }
        }
    }
}

impl Drop for WavSource {
    fn drop(&mut self) {
        self.stop();
    }
}
