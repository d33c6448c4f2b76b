use tracing::trace;

use crate::core::{AxisId, PixelPoint, PlotSurface};
use crate::error::NavResult;

use super::axis_handle::AxisHandle;

/// Measurement line bound to one axis, dragged through its [`AxisHandle`].
#[derive(Debug)]
pub struct Cursor {
    handle: AxisHandle,
    visible: bool,
    can_leave_axis: bool,
}

impl Cursor {
    pub fn new(axis: AxisId, value: f64, surface: &mut PlotSurface) -> NavResult<Self> {
        Ok(Self {
            handle: AxisHandle::new(axis, value, surface)?,
            visible: true,
            can_leave_axis: false,
        })
    }

    #[must_use]
    pub fn handle(&self) -> &AxisHandle {
        &self.handle
    }

    pub fn handle_mut(&mut self) -> &mut AxisHandle {
        &mut self.handle
    }

    #[must_use]
    pub fn axis(&self) -> AxisId {
        self.handle.axis()
    }

    #[must_use]
    pub fn position(&self) -> f64 {
        self.handle.value()
    }

    #[must_use]
    pub fn pixel(&self) -> f64 {
        self.handle.pixel()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn can_leave_axis(&self) -> bool {
        self.can_leave_axis
    }

    /// When `false`, user moves are clamped to the axis' current range.
    pub fn set_can_leave_axis(&mut self, can_leave: bool) {
        self.can_leave_axis = can_leave;
    }

    fn constrain(&self, value: f64) -> f64 {
        if self.can_leave_axis {
            return value;
        }
        let interval = self.handle.scale_map().interval();
        value.clamp(interval.lower(), interval.upper())
    }

    /// Moves the cursor and notifies handle subscribers. Returns the
    /// position actually taken.
    pub fn set_position(&mut self, value: f64) -> f64 {
        let value = self.constrain(value);
        self.handle.set_position(value);
        value
    }

    /// Moves the cursor without notifying anyone and without clamping.
    pub fn set_position_silent(&mut self, value: f64) {
        self.handle.set_position_silent(value);
    }

    pub fn set_axis(&mut self, axis: AxisId, surface: &mut PlotSurface) -> NavResult<()> {
        self.handle.set_axis(axis, surface)
    }

    pub fn detach(&mut self, surface: &mut PlotSurface) {
        self.handle.detach(surface);
    }

    #[must_use]
    pub fn hit_test(&self, point: PixelPoint) -> bool {
        self.visible && self.handle.hit_test(point)
    }

    pub fn begin_drag(&mut self, point: PixelPoint) -> bool {
        self.visible && self.handle.begin_drag(point)
    }

    /// Follows the pointer while grabbed; returns the new position.
    pub fn drag_to(&mut self, point: PixelPoint) -> Option<f64> {
        if !self.handle.is_pressed() {
            return None;
        }
        let pixel = self.handle.orientation().coordinate(point);
        let value = self.set_position(self.handle.value_for_pixel(pixel));
        trace!(axis = %self.axis(), value, "cursor dragged");
        Some(value)
    }

    pub fn end_drag(&mut self) {
        self.handle.end_drag();
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.handle.is_pressed()
    }
}

#[cfg(test)]
mod tests {
    use super::Cursor;
    use crate::core::{AxisId, CanvasSize, Interval, PixelPoint, PlotSurface};
    use crate::render::NullRepainter;

    fn surface() -> PlotSurface {
        let mut surface =
            PlotSurface::new(CanvasSize::new(200, 100), Box::new(NullRepainter::default()))
                .expect("surface");
        surface
            .add_axis(AxisId::y_left(), Interval::new(-5.0, 5.0))
            .expect("y");
        surface
    }

    #[test]
    fn clamps_to_axis_unless_allowed_to_leave() {
        let mut surface = surface();
        let mut cursor = Cursor::new(AxisId::y_left(), 0.0, &mut surface).expect("cursor");
        assert_eq!(cursor.set_position(8.0), 5.0);
        cursor.set_can_leave_axis(true);
        assert_eq!(cursor.set_position(8.0), 8.0);
    }

    #[test]
    fn vertical_drag_maps_from_top() {
        let mut surface = surface();
        let mut cursor = Cursor::new(AxisId::y_left(), 0.0, &mut surface).expect("cursor");
        assert!(cursor.begin_drag(PixelPoint::new(10.0, 50.0)));
        let value = cursor.drag_to(PixelPoint::new(10.0, 25.0)).expect("dragging");
        assert!((value - 2.5).abs() < 1e-12);
    }

    #[test]
    fn hidden_cursor_cannot_be_grabbed() {
        let mut surface = surface();
        let mut cursor = Cursor::new(AxisId::y_left(), 0.0, &mut surface).expect("cursor");
        cursor.set_visible(false);
        assert!(!cursor.begin_drag(PixelPoint::new(10.0, 50.0)));
    }
}
