//! Plot series storage with fixed per-series resolution.
//!
//! Every series holds exactly `resolution` points regardless of how many
//! samples the producer hands in, so a render pass always sees deterministic
//! lengths. Incoming data is linearly resampled over sample index.

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Index of a series within its store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeriesId(pub usize);

/// Drawing attributes; changing them never touches the data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesStyle {
    /// RGBA, 0..1
    pub color: [f32; 4],
    /// Pixels
    pub line_width: f32,
    pub visible: bool,
    /// Fill between the trace and the x axis
    pub filled: bool,
}

impl Default for SeriesStyle {
    fn default() -> Self {
        Self {
            color: [0.0, 0.0, 1.0, 1.0],
            line_width: 2.0,
            visible: true,
            filled: false,
        }
    }
}

/// Copy of one series as handed to readers
#[derive(Debug, Clone, PartialEq)]
pub struct PlotSeries {
    pub id: SeriesId,
    pub resolution: usize,
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub style: SeriesStyle,
}

#[derive(Debug)]
struct SeriesSlot {
    resolution: usize,
    x: Vec<f32>,
    y: Vec<f32>,
    /// Last data as supplied, kept for re-sampling at a new resolution
    raw_x: Vec<f32>,
    raw_y: Vec<f32>,
    style: SeriesStyle,
}

/// Store of independently addressable plot series
#[derive(Debug)]
pub struct PlotSeriesStore {
    series: Vec<SeriesSlot>,
    default_resolution: usize,
}

impl PlotSeriesStore {
    pub fn new(default_resolution: usize) -> Self {
        Self {
            series: Vec::new(),
            default_resolution: default_resolution.max(1),
        }
    }

    /// Add a series of `resolution` points, initially all zero
    pub fn add_series(&mut self, resolution: usize, style: SeriesStyle) -> ScopeResult<SeriesId> {
        check_resolution(resolution)?;
        Ok(self.push_series(resolution, style))
    }

    /// Add a series at the store's default resolution
    pub fn add_series_default(&mut self, style: SeriesStyle) -> SeriesId {
        self.push_series(self.default_resolution, style)
    }

    fn push_series(&mut self, resolution: usize, style: SeriesStyle) -> SeriesId {
        let id = SeriesId(self.series.len());
        self.series.push(SeriesSlot {
            resolution,
            x: vec![0.0; resolution],
            y: vec![0.0; resolution],
            raw_x: Vec::new(),
            raw_y: Vec::new(),
            style,
        });
        log::debug!("Added plot series {} ({} points)", id.0, resolution);
        id
    }

    pub fn default_resolution(&self) -> usize {
        self.default_resolution
    }

    /// Resolution used by later [`PlotSeriesStore::add_series_default`] calls
    pub fn set_default_resolution(&mut self, resolution: usize) -> ScopeResult<()> {
        check_resolution(resolution)?;
        self.default_resolution = resolution;
        Ok(())
    }

    /// Replace a series' data
    ///
    /// Uses the first `min(x.len(), y.len())` points. When that count differs
    /// from the series resolution the data are linearly resampled; otherwise
    /// they are copied unchanged.
    pub fn set_data(&mut self, id: SeriesId, x: &[f32], y: &[f32]) -> ScopeResult<()> {
        let slot = self.slot_mut(id)?;
        let len = x.len().min(y.len());

        slot.raw_x.clear();
        slot.raw_x.extend_from_slice(&x[..len]);
        slot.raw_y.clear();
        slot.raw_y.extend_from_slice(&y[..len]);

        resample_into(&slot.raw_x, &mut slot.x);
        resample_into(&slot.raw_y, &mut slot.y);
        Ok(())
    }

    /// Change a series' resolution, resampling from the last data set
    pub fn set_resolution(&mut self, id: SeriesId, resolution: usize) -> ScopeResult<()> {
        check_resolution(resolution)?;
        let slot = self.slot_mut(id)?;

        slot.resolution = resolution;
        slot.x = vec![0.0; resolution];
        slot.y = vec![0.0; resolution];
        resample_into(&slot.raw_x, &mut slot.x);
        resample_into(&slot.raw_y, &mut slot.y);
        Ok(())
    }

    pub fn set_color(&mut self, id: SeriesId, color: [f32; 4]) -> ScopeResult<()> {
        self.slot_mut(id)?.style.color = color;
        Ok(())
    }

    pub fn set_line_width(&mut self, id: SeriesId, width: f32) -> ScopeResult<()> {
        self.slot_mut(id)?.style.line_width = width;
        Ok(())
    }

    pub fn set_visible(&mut self, id: SeriesId, visible: bool) -> ScopeResult<()> {
        self.slot_mut(id)?.style.visible = visible;
        Ok(())
    }

    pub fn set_filled(&mut self, id: SeriesId, filled: bool) -> ScopeResult<()> {
        self.slot_mut(id)?.style.filled = filled;
        Ok(())
    }

    /// Copy of a series
    pub fn series(&self, id: SeriesId) -> ScopeResult<PlotSeries> {
        let slot = self.slot(id)?;
        Ok(PlotSeries {
            id,
            resolution: slot.resolution,
            x: slot.x.clone(),
            y: slot.y.clone(),
            style: slot.style,
        })
    }

    /// Borrowed `(x, y, style)` for the frame builder
    pub(crate) fn points(&self, id: SeriesId) -> ScopeResult<(&[f32], &[f32], &SeriesStyle)> {
        let slot = self.slot(id)?;
        Ok((&slot.x, &slot.y, &slot.style))
    }

    pub fn style(&self, id: SeriesId) -> ScopeResult<SeriesStyle> {
        Ok(self.slot(id)?.style)
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = SeriesId> {
        (0..self.series.len()).map(SeriesId)
    }

    fn slot(&self, id: SeriesId) -> ScopeResult<&SeriesSlot> {
        self.series.get(id.0).ok_or(ScopeError::InvalidIndex(id.0))
    }

    fn slot_mut(&mut self, id: SeriesId) -> ScopeResult<&mut SeriesSlot> {
        self.series.get_mut(id.0).ok_or(ScopeError::InvalidIndex(id.0))
    }
}

fn check_resolution(resolution: usize) -> ScopeResult<()> {
    if resolution == 0 {
        return Err(ScopeError::InvalidConfiguration(
            "Plot resolution must be > 0".to_string(),
        ));
    }
    Ok(())
}

/// Linearly resample `src` (over sample index) to fill `dst`
///
/// Equal lengths copy through; empty input zeroes the output.
pub fn resample_into(src: &[f32], dst: &mut [f32]) {
    let n = dst.len();
    match src.len() {
        0 => dst.fill(0.0),
        len if len == n => dst.copy_from_slice(src),
        1 => dst.fill(src[0]),
        len => {
            if n == 1 {
                dst[0] = src[0];
                return;
            }
            let step = (len - 1) as f32 / (n - 1) as f32;
            for (i, out) in dst.iter_mut().enumerate() {
                let pos = i as f32 * step;
                let lo = (pos.floor() as usize).min(len - 1);
                let hi = (lo + 1).min(len - 1);
                let frac = pos - lo as f32;
                *out = src[lo] + (src[hi] - src[lo]) * frac;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_matching_length_is_unchanged() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(5, SeriesStyle::default()).unwrap();
        let x = [0.0, 0.1, 0.2, 0.3, 0.4];
        let y = [0.3, -0.7, 0.11, 0.9, -0.2];

        store.set_data(id, &x, &y).unwrap();

        let series = store.series(id).unwrap();
        assert_eq!(series.x, x.to_vec());
        assert_eq!(series.y, y.to_vec());
    }

    #[test]
    fn test_upsample_interpolates_linearly() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(4, SeriesStyle::default()).unwrap();

        store.set_data(id, &[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();

        let series = store.series(id).unwrap();
        assert_eq!(series.x.len(), 4);
        assert_eq!(series.y.len(), 4);

        // Third point lies on the segment (1,1) -> (2,0)
        let (x, y) = (series.x[2], series.y[2]);
        assert!(x > 1.0 && x < 2.0);
        assert!(approx(y, 1.0 - (x - 1.0)));
        assert!(approx(x, 4.0 / 3.0));

        assert!(approx(series.x[0], 0.0) && approx(series.x[3], 2.0));
    }

    #[test]
    fn test_downsample_keeps_endpoints() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(3, SeriesStyle::default()).unwrap();
        let x: Vec<f32> = (0..101).map(|i| i as f32).collect();

        store.set_data(id, &x, &x).unwrap();

        let series = store.series(id).unwrap();
        assert_eq!(series.x, vec![0.0, 50.0, 100.0]);
    }

    #[test]
    fn test_mismatched_lengths_use_shorter() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(2, SeriesStyle::default()).unwrap();

        store.set_data(id, &[0.0, 1.0, 2.0, 3.0], &[5.0, 6.0]).unwrap();

        assert_eq!(store.series(id).unwrap().x, vec![0.0, 1.0]);
    }

    #[test]
    fn test_set_resolution_resamples_last_data() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(2, SeriesStyle::default()).unwrap();
        store.set_data(id, &[0.0, 1.0, 2.0], &[0.0, 1.0, 0.0]).unwrap();

        // Resolution 2 lost the peak; going back to 3 recovers it
        assert_eq!(store.series(id).unwrap().y, vec![0.0, 0.0]);
        store.set_resolution(id, 3).unwrap();

        let series = store.series(id).unwrap();
        assert_eq!(series.resolution, 3);
        assert_eq!(series.y, vec![0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_unknown_id_is_rejected_without_effect() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(4, SeriesStyle::default()).unwrap();

        assert!(matches!(
            store.set_data(SeriesId(7), &[1.0], &[1.0]),
            Err(ScopeError::InvalidIndex(7))
        ));
        assert!(matches!(
            store.set_visible(SeriesId(1), false),
            Err(ScopeError::InvalidIndex(1))
        ));
        assert!(store.series(SeriesId(3)).is_err());
        assert_eq!(store.len(), 1);
        assert!(store.style(id).unwrap().visible);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let mut store = PlotSeriesStore::new(512);
        assert!(matches!(
            store.add_series(0, SeriesStyle::default()),
            Err(ScopeError::InvalidConfiguration(_))
        ));

        let id = store.add_series_default(SeriesStyle::default());
        assert!(store.set_resolution(id, 0).is_err());
        assert_eq!(store.series(id).unwrap().resolution, 512);
    }

    #[test]
    fn test_style_setters_leave_data_alone() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(3, SeriesStyle::default()).unwrap();
        store.set_data(id, &[0.0, 1.0, 2.0], &[3.0, 4.0, 5.0]).unwrap();

        store.set_color(id, [1.0, 0.0, 0.0, 0.5]).unwrap();
        store.set_line_width(id, 4.0).unwrap();
        store.set_filled(id, true).unwrap();
        store.set_visible(id, false).unwrap();

        let series = store.series(id).unwrap();
        assert_eq!(series.y, vec![3.0, 4.0, 5.0]);
        assert_eq!(
            series.style,
            SeriesStyle {
                color: [1.0, 0.0, 0.0, 0.5],
                line_width: 4.0,
                visible: false,
                filled: true,
            }
        );
    }

    #[test]
    fn test_empty_data_zeroes_series() {
        let mut store = PlotSeriesStore::new(512);
        let id = store.add_series(4, SeriesStyle::default()).unwrap();
        store.set_data(id, &[1.0; 4], &[1.0; 4]).unwrap();
        store.set_data(id, &[], &[]).unwrap();
        assert_eq!(store.series(id).unwrap().y, vec![0.0; 4]);
    }
}
