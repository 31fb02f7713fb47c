//! Plot-unit <-> pixel mapping, visible/hard limit bookkeeping and the
//! auto-scaling tick grid.
//!
//! Pixel space has its origin at the top-left of the view with y growing
//! downward; plot space has y growing upward. Limits are kept so that
//! `hard_min <= visible_min < visible_max <= hard_max` on both axes after
//! every mutation. Requests that would break this are corrected silently.

use glam::Vec2;

use crate::params::{AutoGridBounds, DisplayConfig, DisplayMode, LabelFormat, ModeDefaults};

/// Multipliers of the 1-2-5 tick progression
const TICK_STEPS: [f64; 3] = [1.0, 2.0, 5.0];

/// Upper bound on ticks generated for one axis
const MAX_TICKS: usize = 1000;

/// Plot axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    pub(crate) fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
        }
    }
}

/// One grid line / tick mark
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    /// Position in plot units
    pub value: f32,
    /// Position along the axis in pixels
    pub pixel: f32,
    pub label: String,
}

/// Bidirectional plot-unit/pixel mapping for one scope view
#[derive(Debug, Clone)]
pub struct CoordinateTransform {
    mode: DisplayMode,
    view_size: Vec2,

    visible_min: Vec2,
    visible_max: Vec2,
    hard_min: Vec2,
    hard_max: Vec2,

    tick_units: Vec2,
    tick_pixels: Vec2,
    origin_pixel: Vec2,
    units_per_pixel: Vec2,

    auto_scale: [bool; 2],
    grid_bounds: AutoGridBounds,
    x_label: LabelFormat,
    y_label: LabelFormat,

    time_defaults: ModeDefaults,
    frequency_defaults: ModeDefaults,
    /// Frequency defaults as configured, before fitting to a Nyquist limit
    frequency_config: ModeDefaults,
}

impl CoordinateTransform {
    /// Build a transform in the configured display mode
    pub fn new(config: &DisplayConfig) -> Self {
        let view_size = if config.view_size.cmpgt(Vec2::ZERO).all() {
            config.view_size
        } else {
            Vec2::ONE
        };
        let defaults = config.mode_defaults(config.mode).clone();

        let mut transform = Self {
            mode: config.mode,
            view_size,
            visible_min: defaults.visible_min,
            visible_max: defaults.visible_max,
            hard_min: defaults.hard_min,
            hard_max: defaults.hard_max,
            tick_units: defaults.tick_units,
            tick_pixels: Vec2::ONE,
            origin_pixel: Vec2::ZERO,
            units_per_pixel: Vec2::ONE,
            auto_scale: [false, false],
            grid_bounds: config.auto_grid,
            x_label: defaults.x_label,
            y_label: defaults.y_label,
            time_defaults: config.time_domain.clone(),
            frequency_defaults: config.frequency_domain.clone(),
            frequency_config: config.frequency_domain.clone(),
        };
        transform.apply_defaults(&defaults);
        transform
    }

    /// Switch display mode, resetting limits, ticks and label formats
    pub fn set_display_mode(&mut self, mode: DisplayMode) {
        log::info!("Display mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        let defaults = match mode {
            DisplayMode::TimeDomain => self.time_defaults.clone(),
            DisplayMode::FrequencyDomain => self.frequency_defaults.clone(),
        };
        self.apply_defaults(&defaults);
    }

    fn apply_defaults(&mut self, defaults: &ModeDefaults) {
        self.x_label = defaults.x_label;
        self.y_label = defaults.y_label;
        self.tick_units = defaults.tick_units;
        for axis in Axis::BOTH {
            let i = axis.index();
            self.hard_min[i] = f32::NEG_INFINITY;
            self.hard_max[i] = f32::INFINITY;
            self.set_hard_limits(axis, defaults.hard_min[i], defaults.hard_max[i]);
            self.set_visible_limits(axis, defaults.visible_min[i], defaults.visible_max[i]);
        }
    }

    /// Fit the frequency-mode x limits and zoom bounds to `nyquist_hz`
    ///
    /// In frequency mode the current view is pulled inside the new hard range.
    pub fn set_nyquist(&mut self, nyquist_hz: f32) {
        if !nyquist_hz.is_finite() || nyquist_hz <= self.frequency_config.hard_min.x {
            log::debug!("Ignoring Nyquist frequency {}", nyquist_hz);
            return;
        }
        self.frequency_defaults = self.frequency_config.with_nyquist(nyquist_hz);
        if self.mode == DisplayMode::FrequencyDomain {
            let hard_min = self.frequency_defaults.hard_min.x;
            self.set_hard_limits(Axis::X, hard_min, nyquist_hz);
        }
    }

    /// Mode constants for `mode`
    pub fn mode_defaults(&self, mode: DisplayMode) -> &ModeDefaults {
        match mode {
            DisplayMode::TimeDomain => &self.time_defaults,
            DisplayMode::FrequencyDomain => &self.frequency_defaults,
        }
    }

    /// Resize the view; non-positive sizes are ignored
    pub fn set_view_size(&mut self, size: Vec2) {
        if !size.cmpgt(Vec2::ZERO).all() || !size.is_finite() {
            log::debug!("Ignoring view size {}", size);
            return;
        }
        self.view_size = size;
        self.update();
    }

    /// Set the absolute pan/zoom limits of one axis
    ///
    /// The visible range is pulled inside the new limits.
    pub fn set_hard_limits(&mut self, axis: Axis, min: f32, max: f32) {
        let Some((min, max)) = sanitize_range(min, max) else {
            log::debug!("Ignoring non-finite hard limits {:?}: {} {}", axis, min, max);
            return;
        };
        let i = axis.index();
        self.hard_min[i] = min;
        self.hard_max[i] = max;

        let (vmin, vmax) = intersect_or_fit(self.visible_min[i], self.visible_max[i], min, max);
        self.visible_min[i] = vmin;
        self.visible_max[i] = vmax;
        self.update();
    }

    /// Set the visible range of one axis, clamped to the hard limits
    pub fn set_visible_limits(&mut self, axis: Axis, min: f32, max: f32) {
        let Some((min, max)) = sanitize_range(min, max) else {
            log::debug!("Ignoring non-finite visible limits {:?}: {} {}", axis, min, max);
            return;
        };
        let i = axis.index();
        let (vmin, vmax) = intersect_or_fit(min, max, self.hard_min[i], self.hard_max[i]);
        if (vmin, vmax) != (min, max) {
            log::debug!(
                "Clamped visible {:?} [{}, {}] -> [{}, {}]",
                axis,
                min,
                max,
                vmin,
                vmax
            );
        }
        self.visible_min[i] = vmin;
        self.visible_max[i] = vmax;
        self.update();
    }

    pub fn set_hard_limits_x(&mut self, min: f32, max: f32) {
        self.set_hard_limits(Axis::X, min, max);
    }

    pub fn set_hard_limits_y(&mut self, min: f32, max: f32) {
        self.set_hard_limits(Axis::Y, min, max);
    }

    pub fn set_visible_limits_x(&mut self, min: f32, max: f32) {
        self.set_visible_limits(Axis::X, min, max);
    }

    pub fn set_visible_limits_y(&mut self, min: f32, max: f32) {
        self.set_visible_limits(Axis::Y, min, max);
    }

    /// Move the visible range by `delta` plot units, keeping its span and
    /// stopping at the hard limits
    pub fn shift_visible(&mut self, axis: Axis, delta: f32) {
        let i = axis.index();
        let span = self.visible_max[i] - self.visible_min[i];
        self.set_visible_span(axis, self.visible_min[i] + delta, span);
    }

    /// Place a window of `span` plot units starting at `min`
    ///
    /// The span is capped at the hard span and the window is shifted back
    /// inside the hard limits if needed.
    pub fn set_visible_span(&mut self, axis: Axis, min: f32, span: f32) {
        if !min.is_finite() || !(span > 0.0) || !span.is_finite() {
            return;
        }
        let i = axis.index();
        let span = span.max(min_span(min + 0.5 * span));
        let (vmin, vmax) = fit_span(min, span, self.hard_min[i], self.hard_max[i]);
        self.visible_min[i] = vmin;
        self.visible_max[i] = vmax;
        self.update();
    }

    /// Fixed tick spacing in plot units (retained while auto-scale is off)
    pub fn set_tick_units(&mut self, axis: Axis, units: f32) {
        if !(units > 0.0) || !units.is_finite() {
            log::debug!("Ignoring tick units {:?}: {}", axis, units);
            return;
        }
        self.tick_units[axis.index()] = units;
        self.update();
    }

    /// Enable/disable automatic tick spacing for one axis
    pub fn set_auto_scale(&mut self, axis: Axis, enabled: bool) {
        self.auto_scale[axis.index()] = enabled;
        self.update();
    }

    pub fn set_auto_grid_bounds(&mut self, bounds: AutoGridBounds) {
        self.grid_bounds = bounds;
        self.update();
    }

    pub fn set_label_formats(&mut self, x: LabelFormat, y: LabelFormat) {
        self.x_label = x;
        self.y_label = y;
    }

    /// Recompute the derived mapping after any limit or size change
    fn update(&mut self) {
        let span = self.visible_max - self.visible_min;
        self.units_per_pixel = span / self.view_size;
        self.origin_pixel = Vec2::new(
            -self.visible_min.x / self.units_per_pixel.x,
            self.view_size.y + self.visible_min.y / self.units_per_pixel.y,
        );

        let bounds = [
            (self.grid_bounds.min_x_ticks, self.grid_bounds.max_x_ticks),
            (self.grid_bounds.min_y_ticks, self.grid_bounds.max_y_ticks),
        ];
        for axis in Axis::BOTH {
            let i = axis.index();
            if self.auto_scale[i] {
                let (min_ticks, max_ticks) = bounds[i];
                self.tick_units[i] = compute_ticks(span[i], min_ticks, max_ticks);
            }
        }
        self.tick_pixels = self.tick_units / self.units_per_pixel;
    }

    /// Plot units -> pixels
    pub fn plot_to_pixel(&self, plot: Vec2) -> Vec2 {
        Vec2::new(
            self.origin_pixel.x + plot.x / self.units_per_pixel.x,
            self.origin_pixel.y - plot.y / self.units_per_pixel.y,
        )
    }

    /// Pixels -> plot units
    pub fn pixel_to_plot(&self, pixel: Vec2) -> Vec2 {
        Vec2::new(
            (pixel.x - self.origin_pixel.x) * self.units_per_pixel.x,
            (self.origin_pixel.y - pixel.y) * self.units_per_pixel.y,
        )
    }

    /// Pixels -> plot units for a point given relative to `offset`
    pub fn pixel_to_plot_with_offset(&self, pixel: Vec2, offset: Vec2) -> Vec2 {
        self.pixel_to_plot(pixel + offset)
    }

    /// Tick marks inside the visible range of `axis`
    ///
    /// A fixed spacing that would produce more than `MAX_TICKS` marks is
    /// widened by an integer factor for this call.
    pub fn ticks(&self, axis: Axis) -> Vec<Tick> {
        let i = axis.index();
        let mut unit = self.tick_units[i];
        let format = match axis {
            Axis::X => self.x_label,
            Axis::Y => self.y_label,
        };

        let count = (self.visible_max[i] - self.visible_min[i]) / unit;
        if count >= (MAX_TICKS - 1) as f32 {
            let factor = (count / (MAX_TICKS - 1) as f32).floor() + 1.0;
            log::debug!(
                "{:?} tick unit {} gives {} ticks, using {}",
                axis,
                unit,
                count,
                unit * factor
            );
            unit *= factor;
        }

        let first = (self.visible_min[i] / unit).ceil() as i64;
        let last = (self.visible_max[i] / unit).floor() as i64;
        (first..=last)
            .take(MAX_TICKS)
            .map(|k| {
                let value = k as f32 * unit;
                let pixel = match axis {
                    Axis::X => self.plot_to_pixel(Vec2::new(value, 0.0)).x,
                    Axis::Y => self.plot_to_pixel(Vec2::new(0.0, value)).y,
                };
                Tick {
                    value,
                    pixel,
                    label: format.format(value),
                }
            })
            .collect()
    }

    pub fn x_ticks(&self) -> Vec<Tick> {
        self.ticks(Axis::X)
    }

    pub fn y_ticks(&self) -> Vec<Tick> {
        self.ticks(Axis::Y)
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    pub fn view_size(&self) -> Vec2 {
        self.view_size
    }

    pub fn visible_min(&self) -> Vec2 {
        self.visible_min
    }

    pub fn visible_max(&self) -> Vec2 {
        self.visible_max
    }

    pub fn visible_span(&self) -> Vec2 {
        self.visible_max - self.visible_min
    }

    pub fn hard_min(&self) -> Vec2 {
        self.hard_min
    }

    pub fn hard_max(&self) -> Vec2 {
        self.hard_max
    }

    pub fn tick_units(&self) -> Vec2 {
        self.tick_units
    }

    pub fn tick_pixels(&self) -> Vec2 {
        self.tick_pixels
    }

    pub fn origin_pixel(&self) -> Vec2 {
        self.origin_pixel
    }

    pub fn units_per_pixel(&self) -> Vec2 {
        self.units_per_pixel
    }

    pub fn auto_scale(&self, axis: Axis) -> bool {
        self.auto_scale[axis.index()]
    }

    pub fn label_formats(&self) -> (LabelFormat, LabelFormat) {
        (self.x_label, self.y_label)
    }
}

/// Order a requested range and widen a degenerate one; `None` for non-finite input
fn sanitize_range(min: f32, max: f32) -> Option<(f32, f32)> {
    if !min.is_finite() || !max.is_finite() {
        return None;
    }
    let (min, max) = if min <= max { (min, max) } else { (max, min) };
    let center = 0.5 * (min + max);
    let min_span = min_span(center);
    if max - min < min_span {
        return Some((center - 0.5 * min_span, center + 0.5 * min_span));
    }
    Some((min, max))
}

/// Narrowest span kept around `center`, well above f32 resolution there
fn min_span(center: f32) -> f32 {
    (center.abs() * 1e-5).max(1e-6)
}

/// Intersect `[min, max]` with the hard range; if nothing is left, keep the
/// requested span and slide it inside instead
fn intersect_or_fit(min: f32, max: f32, hard_min: f32, hard_max: f32) -> (f32, f32) {
    let lo = min.max(hard_min);
    let hi = max.min(hard_max);
    if lo < hi {
        (lo, hi)
    } else {
        fit_span(min, max - min, hard_min, hard_max)
    }
}

/// Window of `span` starting near `min`, shifted to lie inside the hard range
fn fit_span(min: f32, span: f32, hard_min: f32, hard_max: f32) -> (f32, f32) {
    let span = span.min(hard_max - hard_min);
    if min <= hard_min {
        (hard_min, (hard_min + span).min(hard_max))
    } else if min >= hard_max - span {
        ((hard_max - span).max(hard_min), hard_max)
    } else {
        (min, (min + span).min(hard_max))
    }
}

/// Pick a tick spacing from the 1-2-5 progression so that `span / tick`
/// lands within `[min_ticks, max_ticks]`
///
/// Among fitting candidates the one closest to the middle of the bounds wins
/// (smaller spacing on ties). If none fits, the candidate nearest the bounds
/// is used.
pub fn compute_ticks(span: f32, min_ticks: f32, max_ticks: f32) -> f32 {
    if !(span > 0.0) || !span.is_finite() || !(min_ticks > 0.0) {
        return 1.0;
    }
    let span = span as f64;
    let (min_ticks, max_ticks) = (min_ticks as f64, (max_ticks as f64).max(min_ticks as f64));
    let target = 0.5 * (min_ticks + max_ticks);

    let lo_exp = (span / max_ticks).log10().floor() as i32 - 1;
    let hi_exp = (span / min_ticks).log10().ceil() as i32 + 1;

    let mut best: Option<(f64, f64)> = None;
    for exp in lo_exp..=hi_exp {
        let decade = 10f64.powi(exp);
        for step in TICK_STEPS {
            let unit = step * decade;
            let count = span / unit;
            let distance = if count < min_ticks {
                (min_ticks - count) + max_ticks
            } else if count > max_ticks {
                (count - max_ticks) + max_ticks
            } else {
                (count - target).abs()
            };
            if best.map_or(true, |(_, d)| distance < d) {
                best = Some((unit, distance));
            }
        }
    }

    best.map_or(1.0, |(unit, _)| unit as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> CoordinateTransform {
        CoordinateTransform::new(&DisplayConfig::default())
    }

    fn assert_invariant(t: &CoordinateTransform) {
        for axis in Axis::BOTH {
            let i = axis.index();
            assert!(t.hard_min()[i] <= t.visible_min()[i], "{:?} below hard min", axis);
            assert!(t.visible_min()[i] < t.visible_max()[i], "{:?} empty range", axis);
            assert!(t.visible_max()[i] <= t.hard_max()[i], "{:?} above hard max", axis);
        }
    }

    #[test]
    fn test_time_domain_defaults() {
        let t = transform();
        assert_eq!(t.mode(), DisplayMode::TimeDomain);
        assert_eq!(t.visible_min(), Vec2::new(-0.0001, -1.25));
        assert_eq!(t.visible_max(), Vec2::new(0.023, 1.25));
        assert_eq!(t.tick_units(), Vec2::new(0.005, 0.5));
        assert_invariant(&t);
    }

    #[test]
    fn test_visible_corners_map_to_view_corners() {
        let t = transform();
        let top_left = t.plot_to_pixel(Vec2::new(t.visible_min().x, t.visible_max().y));
        let bottom_right = t.plot_to_pixel(Vec2::new(t.visible_max().x, t.visible_min().y));

        assert!(top_left.abs_diff_eq(Vec2::ZERO, 1e-2));
        assert!(bottom_right.abs_diff_eq(t.view_size(), 1e-2));
    }

    #[test]
    fn test_pixel_round_trip() {
        let mut t = transform();
        t.set_display_mode(DisplayMode::FrequencyDomain);
        t.set_visible_limits(Axis::X, 100.0, 5000.0);

        for &(x, y) in &[(150.0f32, 0.5f32), (4999.0, 0.99), (2500.0, -0.03), (101.0, 0.0)] {
            let p = Vec2::new(x, y);
            let back = t.pixel_to_plot(t.plot_to_pixel(p));
            assert!((back.x - x).abs() <= 1e-3 * x.abs().max(1.0), "{} vs {}", back, p);
            assert!((back.y - y).abs() <= 1e-4, "{} vs {}", back, p);
        }
    }

    #[test]
    fn test_pixel_to_plot_with_offset() {
        let t = transform();
        let offset = Vec2::new(10.0, -5.0);
        let base = Vec2::new(200.0, 100.0);
        assert_eq!(
            t.pixel_to_plot_with_offset(base, offset),
            t.pixel_to_plot(base + offset)
        );
    }

    #[test]
    fn test_visible_request_clamped_to_hard_limits() {
        let mut t = transform();
        t.set_visible_limits(Axis::Y, -5.0, 0.5);
        assert_eq!(t.visible_min().y, -1.25);
        assert_eq!(t.visible_max().y, 0.5);

        // Entirely outside: span kept, slid inside
        t.set_visible_limits(Axis::X, 10.0, 10.5);
        assert!((t.visible_span().x - 0.5).abs() < 1e-5);
        assert_eq!(t.visible_max().x, t.hard_max().x);
        assert_invariant(&t);
    }

    #[test]
    fn test_inverted_and_degenerate_requests_are_corrected() {
        let mut t = transform();
        t.set_visible_limits(Axis::Y, 1.0, -1.0);
        assert_eq!((t.visible_min().y, t.visible_max().y), (-1.0, 1.0));

        t.set_visible_limits(Axis::Y, 0.3, 0.3);
        assert!(t.visible_min().y < t.visible_max().y);

        let before = (t.visible_min(), t.visible_max());
        t.set_visible_limits(Axis::X, f32::NAN, 1.0);
        assert_eq!(before, (t.visible_min(), t.visible_max()));
        assert_invariant(&t);
    }

    #[test]
    fn test_hard_limits_pull_visible_inside() {
        let mut t = transform();
        t.set_hard_limits(Axis::Y, -1.0, 1.0);
        assert_eq!(t.visible_min().y, -1.0);
        assert_eq!(t.visible_max().y, 1.0);

        t.set_hard_limits(Axis::X, 1.0, 2.0);
        assert!(t.visible_min().x >= 1.0 && t.visible_max().x <= 2.0);
        assert_invariant(&t);
    }

    #[test]
    fn test_shift_stops_at_hard_limit() {
        let mut t = transform();
        let span = t.visible_span().x;

        t.shift_visible(Axis::X, -1.0);
        assert_eq!(t.visible_min().x, t.hard_min().x);
        assert!((t.visible_span().x - span).abs() < 1e-6);

        t.shift_visible(Axis::X, 100.0);
        assert_eq!(t.visible_max().x, t.hard_max().x);
        assert_invariant(&t);
    }

    #[test]
    fn test_tiny_span_widened_to_resolvable_width() {
        let mut t = transform();
        t.set_display_mode(DisplayMode::FrequencyDomain);
        t.set_visible_span(Axis::X, 20000.0, 1e-6);

        // At 20 kHz one f32 step is ~0.002 Hz
        assert!(t.visible_span().x >= 0.19, "{}", t.visible_span());
        assert!(t.units_per_pixel().x > 0.0);
        assert!(t.origin_pixel().is_finite());
        assert!(t.plot_to_pixel(Vec2::new(20000.1, 0.5)).is_finite());
        assert_invariant(&t);
    }

    #[test]
    fn test_nyquist_sets_frequency_hard_limit() {
        let mut t = transform();
        t.set_display_mode(DisplayMode::FrequencyDomain);

        // 48 kHz: the view can pan past 22050 Hz
        t.set_nyquist(24000.0);
        assert_eq!(t.hard_max().x, 24000.0);
        assert_eq!(t.visible_max().x, 20000.0);
        t.shift_visible(Axis::X, 10000.0);
        assert_eq!(t.visible_max().x, 24000.0);

        // 8 kHz: nothing above 4 kHz stays in view
        t.set_nyquist(4000.0);
        assert_eq!(t.hard_max().x, 4000.0);
        assert!(t.visible_max().x <= 4000.0);
        assert_eq!(t.mode_defaults(DisplayMode::FrequencyDomain).max_range.x, 4020.0);
        assert_invariant(&t);

        // Time mode is unaffected; frequency defaults persist across switches
        t.set_display_mode(DisplayMode::TimeDomain);
        assert_eq!(t.hard_max().x, 3.0);
        t.set_display_mode(DisplayMode::FrequencyDomain);
        assert_eq!(t.visible_max().x, 4000.0);

        t.set_nyquist(f32::NAN);
        t.set_nyquist(-100.0);
        assert_eq!(t.hard_max().x, 4000.0);
    }

    #[test]
    fn test_compute_ticks_keeps_count_in_bounds() {
        assert!((compute_ticks(2.5, 3.0, 6.0) - 0.5).abs() < 1e-6);
        assert!((compute_ticks(0.0231, 4.0, 6.0) - 0.005).abs() < 1e-7);
        assert!((compute_ticks(20020.0, 4.0, 6.0) - 5000.0).abs() < 1e-3);

        for &span in &[1e-4f32, 0.0231, 0.9, 2.5, 9.0, 25.0, 2.0e6] {
            let unit = compute_ticks(span, 4.0, 6.0);
            let count = span / unit;
            assert!(
                (4.0..=6.0 + 1e-3).contains(&count),
                "span {} -> unit {} ({} ticks)",
                span,
                unit,
                count
            );
        }
    }

    #[test]
    fn test_compute_ticks_falls_back_to_closest() {
        // 1 -> 7 ticks, 2 -> 3.5 ticks: neither fits 4..6, 2 is closer
        assert_eq!(compute_ticks(7.0, 4.0, 6.0), 2.0);
    }

    #[test]
    fn test_compute_ticks_degenerate_span() {
        assert_eq!(compute_ticks(0.0, 4.0, 6.0), 1.0);
        assert_eq!(compute_ticks(f32::NAN, 4.0, 6.0), 1.0);
    }

    #[test]
    fn test_auto_scale_follows_visible_range() {
        let mut t = transform();
        t.set_auto_scale(Axis::X, true);
        t.set_visible_limits(Axis::X, 0.0, 1.0);
        assert!((t.tick_units().x - 0.2).abs() < 1e-6);

        t.set_visible_limits(Axis::X, 0.0, 0.01);
        assert!((t.tick_units().x - 0.002).abs() < 1e-7);

        // Fixed units retained while auto-scale is off
        t.set_tick_units(Axis::Y, 0.1);
        t.set_visible_limits(Axis::Y, -0.2, 0.2);
        assert_eq!(t.tick_units().y, 0.1);
    }

    #[test]
    fn test_tick_pixels_follow_view_size() {
        let mut t = transform();
        let before = t.tick_pixels();
        t.set_view_size(Vec2::new(1600.0, 800.0));
        assert!(t.tick_pixels().abs_diff_eq(before * 2.0, 1e-2));

        t.set_view_size(Vec2::new(0.0, 100.0));
        assert_eq!(t.view_size(), Vec2::new(1600.0, 800.0));
    }

    #[test]
    fn test_ticks_and_labels() {
        let t = transform();
        let x_ticks = t.x_ticks();
        let values: Vec<f32> = x_ticks.iter().map(|tick| tick.value).collect();
        assert_eq!(values.len(), 5);
        assert_eq!(values[0], 0.0);
        assert_eq!(x_ticks[1].label, "0.005");

        let y_ticks = t.y_ticks();
        assert_eq!(y_ticks.len(), 5);
        assert_eq!(y_ticks[0].label, "-1.00");
        // y grows upward: higher values sit at smaller pixel rows
        assert!(y_ticks[0].pixel > y_ticks[4].pixel);
    }

    #[test]
    fn test_fine_fixed_ticks_widened_to_cover_range() {
        let mut t = transform();
        t.set_tick_units(Axis::X, 1e-6);
        let ticks = t.x_ticks();

        assert!(ticks.len() <= MAX_TICKS, "{} ticks", ticks.len());
        assert!(ticks.len() > MAX_TICKS / 2, "{} ticks", ticks.len());
        let step = ticks[1].value - ticks[0].value;
        assert!(step > 1e-6);
        let (first, last) = (ticks[0].value, ticks[ticks.len() - 1].value);
        assert!(first - t.visible_min().x <= step * 1.01);
        assert!(t.visible_max().x - last <= step * 1.01);
        // The configured unit itself is kept
        assert_eq!(t.tick_units().x, 1e-6);
    }

    #[test]
    fn test_mode_switch_resets_limits() {
        let mut t = transform();
        t.set_visible_limits(Axis::X, 0.0, 0.5);

        t.set_display_mode(DisplayMode::FrequencyDomain);
        assert_eq!(t.visible_min(), Vec2::new(-20.0, -0.04));
        assert_eq!(t.visible_max(), Vec2::new(20000.0, 1.0));
        assert_eq!(t.tick_units(), Vec2::new(4000.0, 0.25));
        assert_eq!(t.label_formats().0, LabelFormat::new(5, 0));

        t.set_display_mode(DisplayMode::TimeDomain);
        assert_eq!(t.visible_max().x, 0.023);
        assert_invariant(&t);
    }
}
