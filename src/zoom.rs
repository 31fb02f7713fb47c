//! Pan / pinch-zoom state machine driving a [`CoordinateTransform`].

use glam::Vec2;

use crate::axis::{Axis, CoordinateTransform};

/// Floor for the zoom span lower bound (plot units)
const MIN_ZOOM_RANGE: f32 = 1e-6;

/// Lifecycle phase reported by the gesture source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Began,
    Changed,
    Ended,
    Cancelled,
}

/// One gesture update: current touch positions in view pixels
#[derive(Debug, Clone, PartialEq)]
pub struct GestureEvent {
    pub touches: Vec<Vec2>,
    pub phase: GesturePhase,
}

impl GestureEvent {
    pub fn new(phase: GesturePhase, touches: Vec<Vec2>) -> Self {
        Self { touches, phase }
    }

    pub fn began(touches: Vec<Vec2>) -> Self {
        Self::new(GesturePhase::Began, touches)
    }

    pub fn changed(touches: Vec<Vec2>) -> Self {
        Self::new(GesturePhase::Changed, touches)
    }

    pub fn ended() -> Self {
        Self::new(GesturePhase::Ended, Vec::new())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZoomState {
    #[default]
    Idle,
    /// One touch dragging the visible range
    Panning,
    /// Two touches scaling the visible range
    Zooming,
}

/// Notified once each time a pan or pinch gesture finishes
pub trait ZoomObserver {
    fn finished_pinch_zoom(&mut self);
}

impl<F: FnMut()> ZoomObserver for F {
    fn finished_pinch_zoom(&mut self) {
        self()
    }
}

pub struct ZoomController {
    state: ZoomState,
    /// Touches of the last applied event
    previous: Option<[Vec2; 2]>,
    enabled: [bool; 2],
    min_range: Vec2,
    max_range: Vec2,
    observer: Option<Box<dyn ZoomObserver>>,
}

impl ZoomController {
    /// Controller with both axes enabled and the given span bounds
    pub fn new(min_range: Vec2, max_range: Vec2) -> Self {
        let mut controller = Self {
            state: ZoomState::Idle,
            previous: None,
            enabled: [true, true],
            min_range: Vec2::ZERO,
            max_range: Vec2::INFINITY,
            observer: None,
        };
        controller.set_zoom_range(min_range, max_range);
        controller
    }

    /// Install the completion observer
    pub fn with_observer(mut self, observer: impl ZoomObserver + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn state(&self) -> ZoomState {
        self.state
    }

    pub fn is_enabled(&self, axis: Axis) -> bool {
        self.enabled[axis.index()]
    }

    pub fn set_enabled(&mut self, axis: Axis, enabled: bool) {
        self.enabled[axis.index()] = enabled;
    }

    pub fn min_range(&self) -> Vec2 {
        self.min_range
    }

    pub fn max_range(&self) -> Vec2 {
        self.max_range
    }

    /// Bounds on the visible span a pinch may produce (ordered per axis,
    /// lower bound kept positive)
    pub fn set_zoom_range(&mut self, min: Vec2, max: Vec2) {
        let lo = min.min(max).max(Vec2::splat(MIN_ZOOM_RANGE));
        let hi = min.max(max).max(lo);
        if lo != min || hi != max {
            log::debug!("Zoom range [{}, {}] corrected to [{}, {}]", min, max, lo, hi);
        }
        self.min_range = lo;
        self.max_range = hi;
    }

    /// Feed one gesture update, mutating `transform`'s visible range
    pub fn handle(&mut self, transform: &mut CoordinateTransform, event: &GestureEvent) {
        let target = match (event.phase, event.touches.len()) {
            (GesturePhase::Ended | GesturePhase::Cancelled, _) => None,
            (_, 1) => Some(ZoomState::Panning),
            (_, 2) => Some(ZoomState::Zooming),
            _ => None,
        };

        let Some(target) = target else {
            self.finish();
            return;
        };

        if self.state != ZoomState::Idle && self.state != target {
            // Touch count changed mid-gesture; a fresh baseline is needed
            self.finish();
            return;
        }
        if event.phase == GesturePhase::Began {
            // A new gesture ends whatever was in progress
            self.finish();
        }

        let current = [event.touches[0], event.touches[event.touches.len() - 1]];
        let previous = match self.previous {
            Some(previous) if self.state == target => previous,
            _ => {
                self.state = target;
                self.previous = Some(current);
                return;
            }
        };

        match target {
            ZoomState::Panning => self.pan(transform, previous[0], current[0]),
            ZoomState::Zooming => self.zoom(transform, previous, current),
            ZoomState::Idle => {}
        }
        self.previous = Some(current);
    }

    /// Abandon any gesture in progress
    pub fn cancel(&mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        self.previous = None;
        if self.state == ZoomState::Idle {
            return;
        }
        log::debug!("{:?} finished", self.state);
        self.state = ZoomState::Idle;
        if let Some(observer) = self.observer.as_mut() {
            observer.finished_pinch_zoom();
        }
    }

    fn pan(&self, transform: &mut CoordinateTransform, from: Vec2, to: Vec2) {
        let upp = transform.units_per_pixel();
        let moved = to - from;
        // Content follows the finger; pixel y grows downward
        let delta = Vec2::new(-moved.x * upp.x, moved.y * upp.y);

        for axis in Axis::BOTH {
            let i = axis.index();
            if self.enabled[i] && delta[i] != 0.0 {
                transform.shift_visible(axis, delta[i]);
            }
        }
    }

    fn zoom(&self, transform: &mut CoordinateTransform, previous: [Vec2; 2], current: [Vec2; 2]) {
        let before = (previous[0] - previous[1]).abs();
        let after = (current[0] - current[1]).abs();
        let midpoint = (current[0] + current[1]) * 0.5;
        let anchor = transform.pixel_to_plot(midpoint);

        for axis in Axis::BOTH {
            let i = axis.index();
            if !self.enabled[i] {
                continue;
            }
            let scale = if before[i] > 0.0 && after[i] > 0.0 {
                after[i] / before[i]
            } else {
                1.0
            };

            let min = transform.visible_min()[i];
            let span = transform.visible_span()[i];
            let new_span = (span / scale).max(self.min_range[i]).min(self.max_range[i]);
            if new_span == span {
                continue;
            }
            let fraction = (anchor[i] - min) / span;
            transform.set_visible_span(axis, anchor[i] - fraction * new_span, new_span);
        }
    }
}
