//! The scope view: plot series, axis transform, zoom controller and spectrum
//! analyzer wired together, producing one [`ScopeFrame`] per redraw.

use glam::Vec2;

use crate::audio::SpectrumAnalyzer;
use crate::axis::{Axis, CoordinateTransform, Tick};
use crate::error::{ScopeError, ScopeResult};
use crate::params::{AxisStyle, DisplayMode, ScopeConfig};
use crate::plot::{PlotSeries, PlotSeriesStore, SeriesId, SeriesStyle};
use crate::zoom::{GestureEvent, ZoomController, ZoomObserver};

/// One visible series mapped into pixel space
#[derive(Debug, Clone, PartialEq)]
pub struct TracePolyline {
    pub id: SeriesId,
    pub points: Vec<Vec2>,
    pub color: [f32; 4],
    pub line_width: f32,
    /// Fill down to the plot's y = 0 line (`ScopeFrame::origin.y`)
    pub filled: bool,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeFrame {
    pub mode: DisplayMode,
    pub view_size: Vec2,
    /// Pixel position of plot (0, 0); may lie outside the view
    pub origin: Vec2,
    pub traces: Vec<TracePolyline>,
    pub x_ticks: Vec<Tick>,
    pub y_ticks: Vec<Tick>,
    pub show_axes: bool,
    pub show_grid: bool,
    /// Colors and label size; the label flags are already combined with
    /// the master label toggle
    pub style: AxisStyle,
}

/// Oscilloscope / spectrum view state
pub struct Scope {
    transform: CoordinateTransform,
    store: PlotSeriesStore,
    zoom: ZoomController,
    analyzer: SpectrumAnalyzer,
    sample_rate_hz: f32,

    /// Series fed by [`Scope::set_samples`]
    trace: SeriesId,

    show_axes: bool,
    show_grid: bool,
    show_labels: bool,
    style: AxisStyle,

    time_axis: Vec<f32>,
    frequency_axis: Vec<f32>,
    spectrum: Vec<f32>,
}

impl Scope {
    pub fn new(config: &ScopeConfig) -> ScopeResult<Self> {
        config.validate()?;
        let display = &config.display;

        let sample_rate_hz = config.audio.sample_rate_hz as f32;
        let mut transform = CoordinateTransform::new(display);
        transform.set_nyquist(0.5 * sample_rate_hz);
        let defaults = transform.mode_defaults(display.mode);
        let zoom = ZoomController::new(defaults.min_range, defaults.max_range);

        let mut store = PlotSeriesStore::new(display.plot_resolution);
        let trace = store.add_series_default(SeriesStyle {
            color: display.trace_color,
            line_width: display.trace_width,
            ..Default::default()
        });

        let analyzer = SpectrumAnalyzer::new(config.fft.fft_size)?;

        let mut scope = Self {
            transform,
            store,
            zoom,
            analyzer,
            sample_rate_hz,
            trace,
            show_axes: true,
            show_grid: true,
            show_labels: true,
            style: display.axis_style,
            time_axis: Vec::new(),
            frequency_axis: Vec::new(),
            spectrum: Vec::new(),
        };
        scope.refresh_frequency_axis();

        log::info!(
            "Scope: {:?}, {} Hz, FFT {}, {} points",
            scope.mode(),
            scope.sample_rate_hz,
            scope.analyzer.fft_size(),
            display.plot_resolution
        );
        Ok(scope)
    }

    /// Install the observer called when a pan or pinch gesture finishes
    pub fn with_zoom_observer(mut self, observer: impl ZoomObserver + 'static) -> Self {
        self.zoom = self.zoom.with_observer(observer);
        self
    }

    pub fn mode(&self) -> DisplayMode {
        self.transform.mode()
    }

    /// Switch between time and frequency display, resetting axes and zoom bounds
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        self.zoom.cancel();
        self.transform.set_display_mode(mode);
        self.reset_zoom_range();
    }

    fn reset_zoom_range(&mut self) {
        let defaults = self.transform.mode_defaults(self.mode());
        let (min_range, max_range) = (defaults.min_range, defaults.max_range);
        self.zoom.set_zoom_range(min_range, max_range);
    }

    pub fn sample_rate_hz(&self) -> f32 {
        self.sample_rate_hz
    }

    /// Change the stream rate; the frequency axis is refitted to its Nyquist
    /// limit and, in frequency mode, the zoom bounds are reset
    pub fn set_sample_rate(&mut self, sample_rate_hz: f32) -> ScopeResult<()> {
        if !(sample_rate_hz > 0.0) || !sample_rate_hz.is_finite() {
            return Err(ScopeError::InvalidConfiguration(format!(
                "Sample rate must be > 0, got {}",
                sample_rate_hz
            )));
        }
        self.sample_rate_hz = sample_rate_hz;
        self.refresh_frequency_axis();
        self.transform.set_nyquist(0.5 * sample_rate_hz);
        if self.mode() == DisplayMode::FrequencyDomain {
            self.reset_zoom_range();
        }
        Ok(())
    }

    pub fn fft_size(&self) -> usize {
        self.analyzer.fft_size()
    }

    /// Change the FFT size; an invalid size leaves the current one active
    pub fn set_fft_size(&mut self, fft_size: usize) -> ScopeResult<()> {
        self.analyzer.set_fft_size(fft_size)?;
        self.refresh_frequency_axis();
        Ok(())
    }

    fn refresh_frequency_axis(&mut self) {
        self.frequency_axis = self.analyzer.frequency_axis(self.sample_rate_hz);
    }

    /// Series driven by [`Scope::set_samples`]
    pub fn trace_id(&self) -> SeriesId {
        self.trace
    }

    pub fn add_series(&mut self, resolution: usize, style: SeriesStyle) -> ScopeResult<SeriesId> {
        self.store.add_series(resolution, style)
    }

    /// Replace one series' data
    ///
    /// In frequency mode `y` is taken as time-domain samples: it is replaced by
    /// its magnitude spectrum and `x` by the bin frequencies.
    pub fn set_plot_data(&mut self, id: SeriesId, x: &[f32], y: &[f32]) -> ScopeResult<()> {
        match self.mode() {
            DisplayMode::TimeDomain => self.store.set_data(id, x, y),
            DisplayMode::FrequencyDomain => {
                self.analyzer.compute_spectrum_into(y, &mut self.spectrum);
                self.store
                    .set_data(id, &self.frequency_axis, &self.spectrum)
            }
        }
    }

    /// Feed the latest captured block to the main trace
    ///
    /// Time mode plots samples against seconds since the start of the block.
    pub fn set_samples(&mut self, samples: &[f32]) -> ScopeResult<()> {
        match self.mode() {
            DisplayMode::TimeDomain => {
                let step = 1.0 / self.sample_rate_hz;
                self.time_axis.clear();
                self.time_axis
                    .extend((0..samples.len()).map(|i| i as f32 * step));
                self.store.set_data(self.trace, &self.time_axis, samples)
            }
            DisplayMode::FrequencyDomain => self.set_plot_data(self.trace, &[], samples),
        }
    }

    /// Frequency and magnitude of the strongest bin of the last spectrum
    pub fn spectrum_peak(&self) -> Option<(f32, f32)> {
        self.spectrum
            .iter()
            .enumerate()
            .skip(1)
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(bin, &magnitude)| {
                (self.analyzer.bin_frequency(bin, self.sample_rate_hz), magnitude)
            })
    }

    pub fn series(&self, id: SeriesId) -> ScopeResult<PlotSeries> {
        self.store.series(id)
    }

    pub fn store(&self) -> &PlotSeriesStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut PlotSeriesStore {
        &mut self.store
    }

    pub fn transform(&self) -> &CoordinateTransform {
        &self.transform
    }

    /// Direct access for limit, tick and auto-scale configuration
    pub fn transform_mut(&mut self) -> &mut CoordinateTransform {
        &mut self.transform
    }

    pub fn zoom(&self) -> &ZoomController {
        &self.zoom
    }

    pub fn set_view_size(&mut self, size: Vec2) {
        self.transform.set_view_size(size);
    }

    pub fn set_zoom_enabled(&mut self, axis: Axis, enabled: bool) {
        self.zoom.set_enabled(axis, enabled);
    }

    pub fn set_zoom_range(&mut self, min: Vec2, max: Vec2) {
        self.zoom.set_zoom_range(min, max);
    }

    pub fn handle_gesture(&mut self, event: &GestureEvent) {
        self.zoom.handle(&mut self.transform, event);
    }

    pub fn set_axes_visible(&mut self, visible: bool) {
        self.show_axes = visible;
    }

    pub fn set_grid_visible(&mut self, visible: bool) {
        self.show_grid = visible;
    }

    /// Master label toggle; per-axis flags apply while it is on
    pub fn set_labels_visible(&mut self, visible: bool) {
        self.show_labels = visible;
    }

    pub fn set_x_labels_visible(&mut self, visible: bool) {
        self.style.show_x_labels = visible;
    }

    pub fn set_y_labels_visible(&mut self, visible: bool) {
        self.style.show_y_labels = visible;
    }

    pub fn set_axis_color(&mut self, color: [f32; 4]) {
        self.style.axis_color = color;
    }

    pub fn set_grid_color(&mut self, color: [f32; 4]) {
        self.style.grid_color = color;
    }

    pub fn set_label_color(&mut self, color: [f32; 4]) {
        self.style.label_color = color;
    }

    /// Tick label font size in points; non-positive sizes are ignored
    pub fn set_label_size(&mut self, size: f32) {
        if !(size > 0.0) || !size.is_finite() {
            log::debug!("Ignoring label size {}", size);
            return;
        }
        self.style.label_size = size;
    }

    pub fn axis_style(&self) -> &AxisStyle {
        &self.style
    }

    /// Snapshot of the current view in pixel space
    pub fn frame(&self) -> ScopeFrame {
        let traces = self
            .store
            .ids()
            .filter_map(|id| {
                let (x, y, style) = self.store.points(id).ok()?;
                style.visible.then(|| TracePolyline {
                    id,
                    points: x
                        .iter()
                        .zip(y)
                        .map(|(&x, &y)| self.transform.plot_to_pixel(Vec2::new(x, y)))
                        .collect(),
                    color: style.color,
                    line_width: style.line_width,
                    filled: style.filled,
                })
            })
            .collect();

        ScopeFrame {
            mode: self.mode(),
            view_size: self.transform.view_size(),
            origin: self.transform.origin_pixel(),
            traces,
            x_ticks: self.transform.x_ticks(),
            y_ticks: self.transform.y_ticks(),
            show_axes: self.show_axes,
            show_grid: self.show_grid,
            style: AxisStyle {
                show_x_labels: self.show_labels && self.style.show_x_labels,
                show_y_labels: self.show_labels && self.style.show_y_labels,
                ..self.style
            },
        }
    }
}
