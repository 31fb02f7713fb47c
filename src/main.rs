//! audioscope - headless driver for the oscilloscope / spectrum core
//!
//! Captures from the default input (or plays a WAV file), runs the throttled
//! display pipeline and logs a status line once per second.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;

use audioscope::audio::{
    load_wav, AudioControls, AudioSystem, InputProcessor, SampleBufferExchange, WavSource,
};
use audioscope::cli::Args;
use audioscope::params::{load_config, ScopeConfig};
use audioscope::pipeline::ScopePipeline;
use audioscope::Scope;

/// Frames per simulated callback when playing a file
const WAV_BLOCK_FRAMES: usize = 1024;

/// Interval between status lines
const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Whichever producer is feeding the exchange
enum FrontEnd {
    Live(AudioSystem),
    File(WavSource),
}

impl FrontEnd {
    fn stop(&mut self) -> anyhow::Result<()> {
        match self {
            FrontEnd::Live(audio) => audio.stop().context("Failed to stop audio streams")?,
            FrontEnd::File(source) => source.stop(),
        }
        Ok(())
    }
}

fn main() -> anyhow::Result<()> {
    // Set RUST_LOG=debug for clamping and gesture details
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => load_config(path),
        None => ScopeConfig::default(),
    };
    args.apply(&mut config);

    let clip = match &args.wav {
        Some(path) => {
            let clip = load_wav(path).with_context(|| format!("Failed to load {:?}", path))?;
            // The file dictates the rate the scope sees
            config.audio.sample_rate_hz = clip.sample_rate_hz;
            Some(clip)
        }
        None => None,
    };
    config.validate().context("Invalid configuration")?;

    log::info!("audioscope starting up ({:?})", config.display.mode);

    let controls = Arc::new(AudioControls::new(config.audio.gain));
    controls.set_output_enabled(args.monitor);
    let exchange = Arc::new(
        SampleBufferExchange::try_new(config.audio.max_block_frames, config.audio.long_capacity())
            .context("Failed to allocate sample buffers")?,
    );

    let mut front_end = match clip {
        Some(clip) => {
            if args.monitor {
                log::warn!("--monitor is ignored during WAV playback");
            }
            let processor = InputProcessor::new(
                Arc::clone(&exchange),
                Arc::clone(&controls),
                clip.channels as usize,
            );
            let block_frames = WAV_BLOCK_FRAMES.min(config.audio.max_block_frames);
            FrontEnd::File(WavSource::spawn(clip, processor, block_frames))
        }
        None => {
            let mut audio =
                AudioSystem::new(&config.audio, Arc::clone(&exchange), Arc::clone(&controls))
                    .context("Failed to open audio input")?;
            audio.start().context("Failed to start audio input")?;
            FrontEnd::Live(audio)
        }
    };

    let scope = Scope::new(&config)
        .context("Failed to build scope")?
        .with_zoom_observer(|| log::debug!("Zoom gesture finished"));
    let mut pipeline = ScopePipeline::new(exchange, scope, config.display.refresh_interval_s);

    let poll = Duration::try_from_secs_f32(config.display.refresh_interval_s / 2.0)
        .unwrap_or(Duration::ZERO)
        .max(Duration::from_millis(1));
    let started = Instant::now();
    let mut last_report = started;

    loop {
        let now = Instant::now();
        pipeline.tick(now).context("Failed to update scope")?;

        if now.duration_since(last_report) >= REPORT_INTERVAL {
            log::info!("{}", pipeline.summary());
            last_report = now;
        }

        if let Some(duration) = args.duration {
            if now.duration_since(started).as_secs_f32() >= duration {
                break;
            }
        }
        thread::sleep(poll);
    }

    front_end.stop()?;
    let (updates, skipped) = pipeline.counts();
    log::info!("Stopped after {} updates ({} ticks throttled)", updates, skipped);
    Ok(())
}
