use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::axis::{Axis, AxisEvent, AxisId, RescaleCause};
use crate::core::observer::SubscriptionId;
use crate::core::scale::ScaleMap;
use crate::core::types::{CanvasSize, DataRect, Interval, Orientation};
use crate::error::{NavError, NavResult};
use crate::render::Repainter;

/// Canvas plus the axes that live on it.
///
/// The surface exclusively owns its axes. Navigation components, handles and
/// cursors refer to them by [`AxisId`]. Axes can be hidden but never removed.
pub struct PlotSurface {
    canvas: CanvasSize,
    axes: IndexMap<AxisId, Axis>,
    repainter: Box<dyn Repainter>,
    repaint_requests: u64,
}

impl fmt::Debug for PlotSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotSurface")
            .field("canvas", &self.canvas)
            .field("axes", &self.axes)
            .field("repaint_requests", &self.repaint_requests)
            .finish_non_exhaustive()
    }
}

impl PlotSurface {
    pub fn new(canvas: CanvasSize, repainter: Box<dyn Repainter>) -> NavResult<Self> {
        if !canvas.is_valid() {
            return Err(NavError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }
        Ok(Self {
            canvas,
            axes: IndexMap::new(),
            repainter,
            repaint_requests: 0,
        })
    }

    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    /// Registers a new coordinate axis.
    pub fn add_axis(&mut self, id: AxisId, interval: Interval) -> NavResult<AxisId> {
        if self.axes.contains_key(&id) {
            return Err(NavError::InvalidData(format!("axis {id} is already registered")));
        }
        let axis = Axis::new(id, interval).ok_or(NavError::DegenerateRange {
            min: interval.start,
            max: interval.end,
        })?;
        debug!(axis = %id, start = interval.start, end = interval.end, "add axis");
        self.axes.insert(id, axis);
        Ok(id)
    }

    #[must_use]
    pub fn has_axis(&self, id: AxisId) -> bool {
        self.axes.contains_key(&id)
    }

    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&Axis> {
        self.axes.get(&id)
    }

    pub fn axis_mut(&mut self, id: AxisId) -> Option<&mut Axis> {
        self.axes.get_mut(&id)
    }

    pub fn axis_ids(&self) -> impl Iterator<Item = AxisId> + '_ {
        self.axes.keys().copied()
    }

    #[must_use]
    pub fn interval(&self, id: AxisId) -> Option<Interval> {
        self.axes.get(&id).map(Axis::interval)
    }

    pub fn scale_map(&self, id: AxisId) -> NavResult<ScaleMap> {
        let axis = self.axes.get(&id).ok_or(NavError::UnknownAxis(id))?;
        ScaleMap::new(axis.interval(), self.canvas, id.orientation())
    }

    pub fn pixel_to_value(&self, id: AxisId, pixel: f64) -> NavResult<f64> {
        Ok(self.scale_map(id)?.pixel_to_value(pixel))
    }

    pub fn value_to_pixel(&self, id: AxisId, value: f64) -> NavResult<f64> {
        Ok(self.scale_map(id)?.value_to_pixel(value))
    }

    /// Applies a new range to one axis.
    ///
    /// Unknown axes and degenerate ranges are no-ops. Returns `true` when a
    /// bound actually moved, in which case subscribers receive `Rescaled` and
    /// a repaint is requested.
    pub fn set_interval(&mut self, id: AxisId, interval: Interval) -> bool {
        let canvas = self.canvas;
        let Some(axis) = self.axes.get_mut(&id) else {
            debug!(axis = %id, "set_interval on unknown axis ignored");
            return false;
        };
        if !axis.set_interval(interval.start, interval.end).any() {
            return false;
        }
        if let Ok(map) = ScaleMap::new(axis.interval(), canvas, id.orientation()) {
            axis.emit(&AxisEvent::Rescaled {
                map,
                cause: RescaleCause::Range,
            });
        }
        trace!(axis = %id, start = interval.start, end = interval.end, "axis rescaled");
        self.request_repaint();
        true
    }

    /// Writes every present dimension of `rect` to the given axes.
    ///
    /// Returns `true` when at least one axis changed.
    pub fn apply_rect(&mut self, x_axis: Option<AxisId>, y_axis: Option<AxisId>, rect: DataRect) -> bool {
        let mut changed = false;
        for (axis, interval) in [(x_axis, rect.x), (y_axis, rect.y)] {
            if let (Some(axis), Some(interval)) = (axis, interval) {
                changed |= self.set_interval(axis, interval);
            }
        }
        changed
    }

    /// Reads the current ranges of the given axes into a rectangle.
    #[must_use]
    pub fn current_rect(&self, x_axis: Option<AxisId>, y_axis: Option<AxisId>) -> DataRect {
        DataRect::new(
            x_axis.and_then(|id| self.interval(id)),
            y_axis.and_then(|id| self.interval(id)),
        )
    }

    /// Updates an axis from outside the navigation layer (e.g. new samples).
    ///
    /// Listeners receive `ScaleUpdated` after the range is applied.
    pub fn update_axis_scale(&mut self, id: AxisId, interval: Interval) -> bool {
        if interval.is_degenerate() || !self.axes.contains_key(&id) {
            debug!(axis = %id, "external scale update ignored");
            return false;
        }
        self.set_interval(id, interval);
        if let Some(axis) = self.axes.get_mut(&id) {
            axis.emit(&AxisEvent::ScaleUpdated(interval));
        }
        true
    }

    pub fn set_axis_visible(&mut self, id: AxisId, visible: bool) -> bool {
        match self.axes.get_mut(&id) {
            Some(axis) => {
                axis.set_visible(visible);
                self.request_repaint();
                true
            }
            None => false,
        }
    }

    pub fn set_axis_divisions(&mut self, id: AxisId, divisions: u32) -> bool {
        let changed = self
            .axes
            .get_mut(&id)
            .is_some_and(|axis| axis.set_divisions(divisions));
        if changed {
            self.request_repaint();
        }
        changed
    }

    /// Resizes the canvas and reprojects every axis.
    pub fn resize(&mut self, canvas: CanvasSize) -> NavResult<()> {
        if !canvas.is_valid() {
            return Err(NavError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }
        if canvas == self.canvas {
            return Ok(());
        }
        self.canvas = canvas;
        for (id, axis) in &mut self.axes {
            if let Ok(map) = ScaleMap::new(axis.interval(), canvas, id.orientation()) {
                axis.emit(&AxisEvent::Rescaled {
                    map,
                    cause: RescaleCause::Resize,
                });
            }
        }
        self.request_repaint();
        Ok(())
    }

    #[must_use]
    pub fn extent(&self, orientation: Orientation) -> f64 {
        self.canvas.extent(orientation)
    }

    pub fn subscribe_axis(
        &mut self,
        id: AxisId,
        callback: impl FnMut(&AxisEvent) + 'static,
    ) -> Option<SubscriptionId> {
        self.axes.get_mut(&id).map(|axis| axis.subscribe(callback))
    }

    pub fn unsubscribe_axis(&mut self, id: AxisId, subscription: SubscriptionId) -> bool {
        self.axes
            .get_mut(&id)
            .is_some_and(|axis| axis.unsubscribe(subscription))
    }

    pub fn request_repaint(&mut self) {
        self.repaint_requests += 1;
        self.repainter.request_repaint();
    }

    #[must_use]
    pub fn repaint_requests(&self) -> u64 {
        self.repaint_requests
    }
}

#[cfg(test)]
mod tests {
    use super::PlotSurface;
    use crate::core::{AxisId, CanvasSize, Interval};
    use crate::render::NullRepainter;

    fn surface() -> PlotSurface {
        let mut surface =
            PlotSurface::new(CanvasSize::new(800, 400), Box::new(NullRepainter::default()))
                .expect("surface");
        surface
            .add_axis(AxisId::x_bottom(), Interval::new(0.0, 10.0))
            .expect("x axis");
        surface
    }

    #[test]
    fn duplicate_axis_is_rejected() {
        let mut surface = surface();
        assert!(
            surface
                .add_axis(AxisId::x_bottom(), Interval::new(0.0, 1.0))
                .is_err()
        );
    }

    #[test]
    fn changed_interval_requests_repaint_once() {
        let mut surface = surface();
        assert!(surface.set_interval(AxisId::x_bottom(), Interval::new(1.0, 2.0)));
        assert!(!surface.set_interval(AxisId::x_bottom(), Interval::new(1.0, 2.0)));
        assert_eq!(surface.repaint_requests(), 1);
    }

    #[test]
    fn unknown_axis_is_a_noop() {
        let mut surface = surface();
        assert!(!surface.set_interval(AxisId::y_left(), Interval::new(1.0, 2.0)));
        assert!(surface.scale_map(AxisId::y_left()).is_err());
    }
}
