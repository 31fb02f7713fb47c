//! Display configuration: per-mode axis defaults, auto-grid bounds and
//! refresh throttling.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Whether the scope plots raw samples or a magnitude spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// Seconds on x, amplitude on y
    #[default]
    TimeDomain,
    /// Hz on x, normalized magnitude on y
    FrequencyDomain,
}

/// Fixed-point numeric label format (`{:>width$.precision$}`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelFormat {
    pub width: usize,
    pub precision: usize,
}

impl LabelFormat {
    pub const fn new(width: usize, precision: usize) -> Self {
        Self { width, precision }
    }

    /// Render a tick value
    pub fn format(&self, value: f32) -> String {
        // Avoid "-0.000" labels at the origin
        let value = if value == 0.0 { 0.0 } else { value };
        format!(
            "{:>width$.precision$}",
            value,
            width = self.width,
            precision = self.precision
        )
    }
}

/// Axis defaults applied when switching display mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModeDefaults {
    /// Initial visible window (plot units)
    pub visible_min: Vec2,
    pub visible_max: Vec2,

    /// Pan/zoom limits (plot units)
    pub hard_min: Vec2,
    pub hard_max: Vec2,

    /// Grid spacing (plot units per tick)
    pub tick_units: Vec2,

    /// Smallest and largest visible span pinch zoom may produce
    pub min_range: Vec2,
    pub max_range: Vec2,

    pub x_label: LabelFormat,
    pub y_label: LabelFormat,
}

impl ModeDefaults {
    /// Seconds / amplitude defaults (x range fits one 1024-sample block at 44.1kHz)
    pub fn time_domain() -> Self {
        Self {
            visible_min: Vec2::new(-0.0001, -1.25),
            visible_max: Vec2::new(0.023, 1.25),
            hard_min: Vec2::new(-0.0001, -1.25),
            hard_max: Vec2::new(super::audio_constants::MAX_PLOT_SECONDS, 1.25),
            tick_units: Vec2::new(0.005, 0.5),
            min_range: Vec2::new(0.0005, 0.05),
            max_range: Vec2::new(super::audio_constants::MAX_PLOT_SECONDS, 2.5),
            x_label: LabelFormat::new(5, 3),
            y_label: LabelFormat::new(3, 2),
        }
    }

    /// Hz / magnitude defaults for a 44.1kHz stream
    pub fn frequency_domain() -> Self {
        Self {
            visible_min: Vec2::new(-20.0, -0.04),
            visible_max: Vec2::new(20000.0, 1.0),
            hard_min: Vec2::new(-20.0, -0.04),
            hard_max: Vec2::new(22050.0, 1.0),
            tick_units: Vec2::new(4000.0, 0.25),
            min_range: Vec2::new(50.0, 0.02),
            max_range: Vec2::new(22070.0, 1.04),
            x_label: LabelFormat::new(5, 0),
            y_label: LabelFormat::new(3, 2),
        }
    }

    /// Copy with the x axis fitted to `[hard_min.x, nyquist_hz]`
    pub fn with_nyquist(&self, nyquist_hz: f32) -> Self {
        let mut defaults = self.clone();
        defaults.hard_max.x = nyquist_hz;
        defaults.visible_max.x = self.visible_max.x.min(nyquist_hz);
        defaults.max_range.x = nyquist_hz - self.hard_min.x;
        defaults.min_range.x = self.min_range.x.min(defaults.max_range.x);
        defaults
    }

    /// Check ordering of every range (min < max, min_range <= max_range)
    pub fn validate(&self) -> ScopeResult<()> {
        let ordered = self.visible_min.cmplt(self.visible_max).all()
            && self.hard_min.cmplt(self.hard_max).all()
            && self.min_range.cmpgt(Vec2::ZERO).all()
            && self.min_range.cmple(self.max_range).all()
            && self.tick_units.cmpgt(Vec2::ZERO).all();
        if !ordered {
            return Err(ScopeError::InvalidConfiguration(format!(
                "Inconsistent axis defaults: {:?}",
                self
            )));
        }
        Ok(())
    }
}

/// Bounds on the number of ticks the auto-grid keeps in frame
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AutoGridBounds {
    /// Time/frequency axis
    pub min_x_ticks: f32,
    pub max_x_ticks: f32,

    /// Amplitude/magnitude axis
    pub min_y_ticks: f32,
    pub max_y_ticks: f32,
}

impl Default for AutoGridBounds {
    fn default() -> Self {
        Self {
            min_x_ticks: 4.0,
            max_x_ticks: 6.0,
            min_y_ticks: 3.0,
            max_y_ticks: 6.0,
        }
    }
}

/// Colors and label settings for the axes, grid and tick labels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisStyle {
    /// RGBA, 0..1
    pub axis_color: [f32; 4],
    pub grid_color: [f32; 4],
    pub label_color: [f32; 4],

    /// Tick label font size (points)
    pub label_size: f32,

    pub show_x_labels: bool,
    pub show_y_labels: bool,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            axis_color: [0.0, 0.0, 0.0, 1.0],
            grid_color: [0.75, 0.75, 0.75, 1.0],
            label_color: [0.0, 0.0, 0.0, 1.0],
            label_size: 12.0,
            show_x_labels: true,
            show_y_labels: true,
        }
    }
}

/// Display and rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial display mode
    pub mode: DisplayMode,

    /// Minimum interval between redraws (seconds)
    pub refresh_interval_s: f32,

    /// Default number of points sampled from incoming waveforms
    pub plot_resolution: usize,

    /// View size in pixels
    pub view_size: Vec2,

    /// Trace color (RGBA, 0..1) and line width (pixels)
    pub trace_color: [f32; 4],
    pub trace_width: f32,

    pub axis_style: AxisStyle,
    pub auto_grid: AutoGridBounds,
    pub time_domain: ModeDefaults,
    pub frequency_domain: ModeDefaults,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::TimeDomain,
            refresh_interval_s: 0.02,
            plot_resolution: 512,
            view_size: Vec2::new(800.0, 400.0),
            trace_color: [0.0, 0.0, 1.0, 1.0],
            trace_width: 2.0,
            axis_style: AxisStyle::default(),
            auto_grid: AutoGridBounds::default(),
            time_domain: ModeDefaults::time_domain(),
            frequency_domain: ModeDefaults::frequency_domain(),
        }
    }
}

impl DisplayConfig {
    /// Defaults for a display mode
    pub fn mode_defaults(&self, mode: DisplayMode) -> &ModeDefaults {
        match mode {
            DisplayMode::TimeDomain => &self.time_domain,
            DisplayMode::FrequencyDomain => &self.frequency_domain,
        }
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if self.plot_resolution == 0 {
            return Err(ScopeError::InvalidConfiguration(
                "Plot resolution must be > 0".to_string(),
            ));
        }
        if !self.view_size.cmpgt(Vec2::ZERO).all() {
            return Err(ScopeError::InvalidConfiguration(format!(
                "View size must be positive, got {}",
                self.view_size
            )));
        }
        if !(self.refresh_interval_s >= 0.0) {
            return Err(ScopeError::InvalidConfiguration(format!(
                "Refresh interval must be >= 0, got {}",
                self.refresh_interval_s
            )));
        }
        if !(self.axis_style.label_size > 0.0) {
            return Err(ScopeError::InvalidConfiguration(format!(
                "Label size must be > 0, got {}",
                self.axis_style.label_size
            )));
        }
        let grid = &self.auto_grid;
        if !(grid.min_x_ticks > 0.0
            && grid.min_x_ticks <= grid.max_x_ticks
            && grid.min_y_ticks > 0.0
            && grid.min_y_ticks <= grid.max_y_ticks)
        {
            return Err(ScopeError::InvalidConfiguration(format!(
                "Invalid auto-grid bounds: {:?}",
                grid
            )));
        }
        self.time_domain.validate()?;
        self.frequency_domain.validate()
    }
}
