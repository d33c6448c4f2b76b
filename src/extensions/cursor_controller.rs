use tracing::debug;

use crate::api::{CursorConfig, PlotChannel};
use crate::core::{AxisId, PixelPoint, PlotSurface};
use crate::error::{NavError, NavResult};

use super::cursor_pair::{CursorPairController, CursorSlot, TrackingPoint};
use super::readouts::{CursorReadouts, PairReadout};
use super::trace::TraceSource;

/// The horizontal pair measures along the x axis, the vertical pair along y.
#[derive(Debug)]
pub struct CursorController {
    visible: bool,
    horizontal: CursorPairController,
    vertical: CursorPairController,
    readouts: CursorReadouts,
}

impl CursorController {
    /// Places each pair at a quarter and three quarters of its axis range.
    pub fn new(
        x_axis: AxisId,
        y_axis: AxisId,
        config: CursorConfig,
        surface: &mut PlotSurface,
    ) -> NavResult<Self> {
        let config = config.validate()?;
        let mut horizontal = Self::pair(x_axis, &config, surface)?;
        let mut vertical = Self::pair(y_axis, &config, surface)?;
        horizontal.set_enabled(config.horizontal_enabled);
        horizontal.set_lock(config.horizontal_locked);
        horizontal.set_tracking(config.tracking);
        vertical.set_enabled(config.vertical_enabled);
        vertical.set_lock(config.vertical_locked);
        Ok(Self {
            visible: config.visible,
            horizontal,
            vertical,
            readouts: CursorReadouts::new(config.readout_precision, config.readouts_draggable),
        })
    }

    fn pair(
        axis: AxisId,
        config: &CursorConfig,
        surface: &mut PlotSurface,
    ) -> NavResult<CursorPairController> {
        let interval = surface.interval(axis).ok_or(NavError::UnknownAxis(axis))?;
        let quarter = interval.span() / 4.0;
        let mut pair = CursorPairController::new(
            axis,
            interval.start + quarter,
            interval.end - quarter,
            surface,
        )?;
        pair.set_can_leave_axis(config.can_leave_axis);
        for slot in [CursorSlot::First, CursorSlot::Second] {
            let handle = pair.cursor_mut(slot).handle_mut();
            handle.set_grab_tolerance_px(config.grab_tolerance_px);
            handle.set_bar_visibility(config.bar_visibility);
        }
        Ok(pair)
    }

    #[must_use]
    pub fn horizontal(&self) -> &CursorPairController {
        &self.horizontal
    }

    pub fn horizontal_mut(&mut self) -> &mut CursorPairController {
        &mut self.horizontal
    }

    #[must_use]
    pub fn vertical(&self) -> &CursorPairController {
        &self.vertical
    }

    pub fn vertical_mut(&mut self) -> &mut CursorPairController {
        &mut self.vertical
    }

    #[must_use]
    pub fn readouts(&self) -> &CursorReadouts {
        &self.readouts
    }

    pub fn set_readouts_draggable(&mut self, draggable: bool) {
        self.readouts.set_draggable(draggable);
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        if !visible {
            self.release();
        }
    }

    pub fn set_horizontal_enabled(&mut self, enabled: bool) {
        self.horizontal.set_enabled(enabled);
    }

    pub fn set_vertical_enabled(&mut self, enabled: bool) {
        self.vertical.set_enabled(enabled);
    }

    pub fn set_horizontal_lock(&mut self, locked: bool) {
        self.horizontal.set_lock(locked);
    }

    pub fn set_vertical_lock(&mut self, locked: bool) {
        self.vertical.set_lock(locked);
    }

    /// Tracking replaces the vertical pair with markers on the selected
    /// trace at the horizontal cursor positions.
    pub fn set_tracking(&mut self, tracking: bool) {
        self.horizontal.set_tracking(tracking);
        if tracking {
            self.vertical.release();
        }
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.horizontal.is_tracking()
    }

    #[must_use]
    pub fn is_horizontal_visible(&self) -> bool {
        self.visible && self.horizontal.is_enabled()
    }

    #[must_use]
    pub fn is_vertical_visible(&self) -> bool {
        self.visible && self.vertical.is_enabled() && !self.is_tracking()
    }

    #[must_use]
    pub fn are_readouts_visible(&self) -> bool {
        self.is_horizontal_visible() || self.is_vertical_visible()
    }

    /// Rebinds both pairs and the readouts to a newly selected channel.
    pub fn retarget(&mut self, channel: &PlotChannel, surface: &mut PlotSurface) -> NavResult<()> {
        self.horizontal.set_axis(channel.x_axis(), surface)?;
        self.vertical.set_axis(channel.y_axis(), surface)?;
        let (default_x, default_y) = channel.kind().default_units();
        let units = |axis: AxisId, fallback: &'static str| {
            surface
                .axis(axis)
                .map(|axis| axis.units())
                .filter(|units| !units.is_empty())
                .unwrap_or(fallback)
                .to_owned()
        };
        let x_units = units(channel.x_axis(), default_x);
        let y_units = units(channel.y_axis(), default_y);
        self.readouts
            .retarget(&x_units, &y_units, channel.kind().has_reciprocal_readout());
        debug!(channel = %channel.id(), x_units = %x_units, y_units = %y_units, "cursors retargeted");
        Ok(())
    }

    pub fn detach(&mut self, surface: &mut PlotSurface) {
        self.horizontal.detach(surface);
        self.vertical.detach(surface);
    }

    /// Tries to grab a cursor under `point`; the horizontal pair wins ties.
    pub fn press(&mut self, point: PixelPoint) -> bool {
        if self.is_horizontal_visible() && self.horizontal.try_grab(point).is_some() {
            return true;
        }
        self.is_vertical_visible() && self.vertical.try_grab(point).is_some()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.horizontal.grabbed().is_some() || self.vertical.grabbed().is_some()
    }

    pub fn drag_to(&mut self, point: PixelPoint) -> bool {
        let horizontal = self.horizontal.drag_to(point).is_some();
        let vertical = self.vertical.drag_to(point).is_some();
        horizontal || vertical
    }

    pub fn release(&mut self) -> bool {
        let horizontal = self.horizontal.release();
        let vertical = self.vertical.release();
        horizontal || vertical
    }

    pub fn double_click(&mut self, point: PixelPoint) -> bool {
        if self.is_horizontal_visible() && self.horizontal.double_click(point) {
            return true;
        }
        self.is_vertical_visible() && self.vertical.double_click(point)
    }

    pub fn hover(&mut self, point: PixelPoint) -> bool {
        if !self.visible {
            return false;
        }
        let horizontal = self.horizontal.hover(point);
        let vertical = self.vertical.hover(point);
        horizontal || vertical
    }

    /// Tracking markers on `trace`; empty while hidden or not tracking.
    #[must_use]
    pub fn tracking_points(&self, trace: &dyn TraceSource) -> [Option<TrackingPoint>; 2] {
        if !self.is_horizontal_visible() {
            return [None, None];
        }
        self.horizontal.tracking_points(trace)
    }

    #[must_use]
    pub fn horizontal_readout(&self) -> Option<PairReadout> {
        self.is_horizontal_visible().then(|| {
            let (first, second) = self.horizontal.positions();
            self.readouts.horizontal(first, second)
        })
    }

    #[must_use]
    pub fn vertical_readout(&self) -> Option<PairReadout> {
        self.is_vertical_visible().then(|| {
            let (first, second) = self.vertical.positions();
            self.readouts.vertical(first, second)
        })
    }
}
