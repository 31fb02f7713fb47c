//! Consumer side of the exchange: a throttled tick pulling the latest
//! snapshot into the [`Scope`].

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glam::Vec2;

use crate::audio::SampleBufferExchange;
use crate::error::ScopeResult;
use crate::params::DisplayMode;
use crate::scope::Scope;

/// Which exchange buffer the last update read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotSource {
    /// Most recent callback block
    Current,
    /// Rolling multi-second history
    Long,
}

/// One-line description of the current view for status logging
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewSummary {
    pub mode: DisplayMode,
    pub source: SnapshotSource,
    pub samples: usize,
    pub rms: f32,
    /// Strongest bin (Hz, magnitude) in frequency mode
    pub peak: Option<(f32, f32)>,
    pub visible_min: Vec2,
    pub visible_max: Vec2,
}

impl fmt::Display for ViewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mode, self.peak) {
            (DisplayMode::FrequencyDomain, Some((hz, magnitude))) => {
                write!(f, "peak {:.1} Hz @ {:.3}", hz, magnitude)?
            }
            _ => write!(f, "rms {:.4}", self.rms)?,
        }
        write!(
            f,
            " | {:?} {} samples | x [{:.4}, {:.4}] y [{:.3}, {:.3}]",
            self.source,
            self.samples,
            self.visible_min.x,
            self.visible_max.x,
            self.visible_min.y,
            self.visible_max.y
        )
    }
}

pub struct ScopePipeline {
    exchange: Arc<SampleBufferExchange>,
    scope: Scope,
    refresh_interval: Duration,
    last_update: Option<Instant>,
    snapshot: Vec<f32>,
    source: SnapshotSource,
    updates: u64,
    skipped: u64,
}

impl ScopePipeline {
    pub fn new(exchange: Arc<SampleBufferExchange>, scope: Scope, refresh_interval_s: f32) -> Self {
        let snapshot = Vec::with_capacity(exchange.long_capacity());
        Self {
            exchange,
            scope,
            refresh_interval: Duration::try_from_secs_f32(refresh_interval_s)
                .unwrap_or(Duration::ZERO),
            last_update: None,
            snapshot,
            source: SnapshotSource::Current,
            updates: 0,
            skipped: 0,
        }
    }

    /// Pull a snapshot into the scope unless the last update was too recent
    ///
    /// Returns whether the scope received new data.
    pub fn tick(&mut self, now: Instant) -> ScopeResult<bool> {
        if let Some(last) = self.last_update {
            if now.saturating_duration_since(last) < self.refresh_interval {
                self.skipped += 1;
                return Ok(false);
            }
        }
        self.last_update = Some(now);

        self.source = self.choose_source();
        let len = match self.source {
            SnapshotSource::Current => self.exchange.read_current(&mut self.snapshot),
            SnapshotSource::Long => self.exchange.read_long(&mut self.snapshot),
        };
        if len == 0 {
            return Ok(false);
        }

        self.scope.set_samples(&self.snapshot)?;
        self.updates += 1;
        Ok(true)
    }

    /// Time mode switches to the rolling history once the visible window is
    /// wider than one callback block
    fn choose_source(&self) -> SnapshotSource {
        if self.scope.mode() != DisplayMode::TimeDomain {
            return SnapshotSource::Current;
        }
        let block_s = self.exchange.len() as f32 / self.scope.sample_rate_hz();
        if self.scope.transform().visible_max().x > block_s {
            SnapshotSource::Long
        } else {
            SnapshotSource::Current
        }
    }

    pub fn summary(&self) -> ViewSummary {
        let rms = if self.snapshot.is_empty() {
            0.0
        } else {
            (self.snapshot.iter().map(|s| s * s).sum::<f32>() / self.snapshot.len() as f32).sqrt()
        };
        let transform = self.scope.transform();
        ViewSummary {
            mode: self.scope.mode(),
            source: self.source,
            samples: self.snapshot.len(),
            rms,
            peak: match self.scope.mode() {
                DisplayMode::FrequencyDomain => self.scope.spectrum_peak(),
                DisplayMode::TimeDomain => None,
            },
            visible_min: transform.visible_min(),
            visible_max: transform.visible_max(),
        }
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// (updates applied, ticks dropped by throttling)
    pub fn counts(&self) -> (u64, u64) {
        (self.updates, self.skipped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ScopeConfig;
    use std::f32::consts::PI;

    fn pipeline(block: usize) -> (Arc<SampleBufferExchange>, ScopePipeline) {
        let config = ScopeConfig::default();
        let exchange = Arc::new(SampleBufferExchange::new(block, config.audio.long_capacity()));
        let scope = Scope::new(&config).unwrap();
        let pipeline = ScopePipeline::new(
            Arc::clone(&exchange),
            scope,
            config.display.refresh_interval_s,
        );
        (exchange, pipeline)
    }

    #[test]
    fn test_tick_is_throttled() {
        let (exchange, mut pipeline) = pipeline(1024);
        exchange.publish(&[0.5; 1024]);
        let t0 = Instant::now();

        assert!(pipeline.tick(t0).unwrap());
        assert!(!pipeline.tick(t0 + Duration::from_millis(5)).unwrap());
        assert!(pipeline.tick(t0 + Duration::from_millis(25)).unwrap());
        assert_eq!(pipeline.counts(), (2, 1));
    }

    #[test]
    fn test_empty_exchange_does_not_update() {
        let (_exchange, mut pipeline) = pipeline(1024);
        assert!(!pipeline.tick(Instant::now()).unwrap());
        assert_eq!(pipeline.counts(), (0, 0));
        assert_eq!(pipeline.summary().rms, 0.0);
    }

    #[test]
    fn test_wide_time_window_reads_long_buffer() {
        let (exchange, mut pipeline) = pipeline(64);
        for _ in 0..4 {
            exchange.publish(&[0.25; 64]);
        }

        // Default 23 ms window is wider than one 64-sample block
        let t0 = Instant::now();
        assert!(pipeline.tick(t0).unwrap());
        let summary = pipeline.summary();
        assert_eq!(summary.source, SnapshotSource::Long);
        assert_eq!(summary.samples, 256);
        assert!((summary.rms - 0.25).abs() < 1e-6);

        let trace = pipeline.scope().series(pipeline.scope().trace_id()).unwrap();
        assert!((trace.x[511] - 255.0 / 44100.0).abs() < 1e-6);

        // 1 ms window fits inside the block
        pipeline
            .scope_mut()
            .transform_mut()
            .set_visible_limits_x(0.0, 0.001);
        assert!(pipeline.tick(t0 + Duration::from_millis(40)).unwrap());
        assert_eq!(pipeline.summary().source, SnapshotSource::Current);
        assert_eq!(pipeline.summary().samples, 64);
    }

    #[test]
    fn test_frequency_mode_reports_peak() {
        let (exchange, mut pipeline) = pipeline(1024);
        pipeline
            .scope_mut()
            .set_display_mode(DisplayMode::FrequencyDomain);

        let f0 = 100.0 * 44100.0 / 1024.0;
        let tone: Vec<f32> = (0..1024)
            .map(|i| 0.5 * (2.0 * PI * f0 * i as f32 / 44100.0).sin())
            .collect();
        exchange.publish(&tone);

        assert!(pipeline.tick(Instant::now()).unwrap());
        let summary = pipeline.summary();
        assert_eq!(summary.source, SnapshotSource::Current);
        let (hz, magnitude) = summary.peak.unwrap();
        assert!((hz - f0).abs() < 1e-2);
        assert!((magnitude - 0.5).abs() < 0.03);
        assert!(summary.to_string().starts_with("peak"));
    }
}
