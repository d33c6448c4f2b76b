use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{AxisId, Orientation, PixelPoint, PlotSurface};
use crate::error::NavResult;

use super::cursor::Cursor;
use super::trace::TraceSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CursorSlot {
    First,
    Second,
}

impl CursorSlot {
    #[must_use]
    pub const fn partner(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Point marker drawn on the selected trace in tracking mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingPoint {
    pub x: f64,
    pub y: f64,
}

/// Two cursors on the same axis with optional gap locking and trace
/// tracking.
#[derive(Debug)]
pub struct CursorPairController {
    first: Cursor,
    second: Cursor,
    enabled: bool,
    locked: bool,
    lock_gap: f64,
    tracking: bool,
    grabbed: Option<CursorSlot>,
}

impl CursorPairController {
    pub fn new(
        axis: AxisId,
        first: f64,
        second: f64,
        surface: &mut PlotSurface,
    ) -> NavResult<Self> {
        Ok(Self {
            first: Cursor::new(axis, first, surface)?,
            second: Cursor::new(axis, second, surface)?,
            enabled: true,
            locked: false,
            lock_gap: 0.0,
            tracking: false,
            grabbed: None,
        })
    }

    #[must_use]
    pub fn axis(&self) -> AxisId {
        self.first.axis()
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.axis().orientation()
    }

    #[must_use]
    pub fn cursor(&self, slot: CursorSlot) -> &Cursor {
        match slot {
            CursorSlot::First => &self.first,
            CursorSlot::Second => &self.second,
        }
    }

    pub fn cursor_mut(&mut self, slot: CursorSlot) -> &mut Cursor {
        match slot {
            CursorSlot::First => &mut self.first,
            CursorSlot::Second => &mut self.second,
        }
    }

    #[must_use]
    pub fn positions(&self) -> (f64, f64) {
        (self.first.position(), self.second.position())
    }

    /// `p2 - p1`.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.second.position() - self.first.position()
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.release();
        }
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    #[must_use]
    pub fn lock_gap(&self) -> f64 {
        self.lock_gap
    }

    /// Locking captures `p1 - p2` at this instant; later moves of either
    /// cursor drag the other along to keep it.
    pub fn set_lock(&mut self, locked: bool) {
        self.locked = locked;
        if locked {
            self.lock_gap = self.first.position() - self.second.position();
            debug!(axis = %self.axis(), gap = self.lock_gap, "cursor pair locked");
        }
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.tracking
    }

    pub fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
    }

    /// Lets both cursors move past the axis range.
    pub fn set_can_leave_axis(&mut self, can_leave: bool) {
        self.first.set_can_leave_axis(can_leave);
        self.second.set_can_leave_axis(can_leave);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.first.set_visible(visible);
        self.second.set_visible(visible);
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.enabled && (self.first.is_visible() || self.second.is_visible())
    }

    /// Moves one cursor and, when locked, silently moves its partner.
    ///
    /// Returns the resulting `(p1, p2)`.
    pub fn set_handle_pos(&mut self, slot: CursorSlot, value: f64) -> (f64, f64) {
        let applied = self.cursor_mut(slot).set_position(value);
        self.follow(slot, applied);
        self.positions()
    }

    fn follow(&mut self, moved: CursorSlot, position: f64) {
        if !self.locked {
            return;
        }
        let partner_position = match moved {
            CursorSlot::First => position - self.lock_gap,
            CursorSlot::Second => position + self.lock_gap,
        };
        self.cursor_mut(moved.partner())
            .set_position_silent(partner_position);
        trace!(moved = ?moved, position, partner_position, "locked partner followed");
    }

    /// Rebinds both cursors to `axis`.
    pub fn set_axis(&mut self, axis: AxisId, surface: &mut PlotSurface) -> NavResult<()> {
        self.first.set_axis(axis, surface)?;
        self.second.set_axis(axis, surface)
    }

    pub fn detach(&mut self, surface: &mut PlotSurface) {
        self.first.detach(surface);
        self.second.detach(surface);
    }

    /// Grabs the first cursor under `point`, preferring cursor 1.
    pub fn try_grab(&mut self, point: PixelPoint) -> Option<CursorSlot> {
        if !self.enabled {
            return None;
        }
        self.grabbed = [CursorSlot::First, CursorSlot::Second]
            .into_iter()
            .find(|slot| self.cursor_mut(*slot).begin_drag(point));
        self.grabbed
    }

    #[must_use]
    pub fn grabbed(&self) -> Option<CursorSlot> {
        self.grabbed
    }

    /// Moves the grabbed cursor; returns `(p1, p2)` when something moved.
    pub fn drag_to(&mut self, point: PixelPoint) -> Option<(f64, f64)> {
        let slot = self.grabbed?;
        let position = self.cursor_mut(slot).drag_to(point)?;
        self.follow(slot, position);
        Some(self.positions())
    }

    pub fn release(&mut self) -> bool {
        let Some(slot) = self.grabbed.take() else {
            return false;
        };
        self.cursor_mut(slot).end_drag();
        true
    }

    /// Recenters the cursor whose grip is under `point`.
    pub fn double_click(&mut self, point: PixelPoint) -> bool {
        if !self.enabled {
            return false;
        }
        for slot in [CursorSlot::First, CursorSlot::Second] {
            let cursor = self.cursor_mut(slot);
            if !cursor.is_visible() {
                continue;
            }
            if let Some(value) = cursor.handle_mut().double_click(point) {
                self.set_handle_pos(slot, value);
                return true;
            }
        }
        false
    }

    /// Refreshes hover state of both grips; `true` when either changed.
    pub fn hover(&mut self, point: PixelPoint) -> bool {
        let first = self.first.handle_mut().hover(point);
        let second = self.second.handle_mut().hover(point);
        first || second
    }

    /// Markers at `(x, trace(x))` for both cursor positions. Empty outside
    /// tracking mode; a cursor beyond the trace yields no marker.
    #[must_use]
    pub fn tracking_points(&self, trace: &dyn TraceSource) -> [Option<TrackingPoint>; 2] {
        if !self.tracking {
            return [None, None];
        }
        [self.first.position(), self.second.position()]
            .map(|x| trace.value_at(x).map(|y| TrackingPoint { x, y }))
    }
}

#[cfg(test)]
mod tests {
    use super::{CursorPairController, CursorSlot};
    use crate::core::{AxisId, CanvasSize, Interval, PixelPoint, PlotSurface};
    use crate::extensions::SampleSeries;
    use crate::render::NullRepainter;

    fn surface() -> PlotSurface {
        let mut surface =
            PlotSurface::new(CanvasSize::new(1000, 400), Box::new(NullRepainter::default()))
                .expect("surface");
        surface
            .add_axis(AxisId::x_bottom(), Interval::new(0.0, 10.0))
            .expect("x");
        surface
    }

    #[test]
    fn locked_partner_keeps_gap() {
        let mut surface = surface();
        let mut pair =
            CursorPairController::new(AxisId::x_bottom(), 3.0, 1.0, &mut surface).expect("pair");
        pair.set_lock(true);
        assert_eq!(pair.set_handle_pos(CursorSlot::First, 6.0), (6.0, 4.0));
        assert_eq!(pair.set_handle_pos(CursorSlot::Second, 2.0), (4.0, 2.0));
        pair.set_lock(false);
        assert_eq!(pair.set_handle_pos(CursorSlot::First, 9.0), (9.0, 2.0));
    }

    #[test]
    fn drag_moves_grabbed_cursor_and_partner() {
        let mut surface = surface();
        let mut pair =
            CursorPairController::new(AxisId::x_bottom(), 2.0, 5.0, &mut surface).expect("pair");
        pair.set_lock(true);
        assert_eq!(pair.try_grab(PixelPoint::new(500.0, 0.0)), Some(CursorSlot::Second));
        let (p1, p2) = pair.drag_to(PixelPoint::new(700.0, 0.0)).expect("moved");
        assert!((p2 - 7.0).abs() < 1e-12);
        assert!((p1 - 4.0).abs() < 1e-12);
        assert!(pair.release());
    }

    #[test]
    fn tracking_samples_trace_at_cursor_positions() {
        let mut surface = surface();
        let mut pair =
            CursorPairController::new(AxisId::x_bottom(), 1.0, 20.0, &mut surface).expect("pair");
        pair.set_can_leave_axis(true);
        pair.set_handle_pos(CursorSlot::Second, 20.0);
        let trace = SampleSeries::uniform(0.0, 1.0, vec![0.0, 2.0, 4.0]).expect("trace");
        assert_eq!(pair.tracking_points(&trace), [None, None]);

        pair.set_tracking(true);
        let [first, second] = pair.tracking_points(&trace);
        assert_eq!(first.map(|point| point.y), Some(2.0));
        assert!(second.is_none());
    }
}
