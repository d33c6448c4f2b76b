use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{AxisId, CanvasSize, DataRect, Interval, PixelPoint, PixelRect, PlotSurface};

use super::PointerButton;

/// Rectangles narrower or shorter than this many pixels are discarded.
pub const DEFAULT_MIN_ZOOM_PX: u32 = 10;

/// Selection rectangle of an in-progress drag, in canvas pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RubberBand {
    pub origin: PixelPoint,
    pub rect: PixelRect,
    /// `false` while the rectangle is below the minimum zoom size; such a
    /// selection is drawn in the invalid style and dropped on release.
    pub valid: bool,
}

/// Drag-rectangle zoom over one or two axes of a plot.
///
/// A zoomer bound to a single axis leaves the other dimension alone, which
/// lets one rectangle gesture drive several per-axis zoomers at once.
#[derive(Debug, Clone, PartialEq)]
pub struct Zoomer {
    x_axis: Option<AxisId>,
    y_axis: Option<AxisId>,
    x_enabled: bool,
    y_enabled: bool,
    enabled: bool,
    bounded: bool,
    base_rect: Option<DataRect>,
    is_zoomed: bool,
    min_zoom_px: u32,
    block_zoom: bool,
    block_zoom_reset: bool,
    drag_origin: Option<PixelPoint>,
    rubber_band: Option<RubberBand>,
}

impl Zoomer {
    /// Creates an enabled, bounded zoomer. Each dimension is enabled when an
    /// axis is supplied for it.
    #[must_use]
    pub fn new(x_axis: Option<AxisId>, y_axis: Option<AxisId>) -> Self {
        Self {
            x_axis,
            y_axis,
            x_enabled: x_axis.is_some(),
            y_enabled: y_axis.is_some(),
            enabled: true,
            bounded: true,
            base_rect: None,
            is_zoomed: false,
            min_zoom_px: DEFAULT_MIN_ZOOM_PX,
            block_zoom: false,
            block_zoom_reset: false,
            drag_origin: None,
            rubber_band: None,
        }
    }

    #[must_use]
    pub fn x_axis(&self) -> Option<AxisId> {
        self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> Option<AxisId> {
        self.y_axis
    }

    #[must_use]
    pub fn is_x_axis_en(&self) -> bool {
        self.x_enabled && self.x_axis.is_some()
    }

    #[must_use]
    pub fn is_y_axis_en(&self) -> bool {
        self.y_enabled && self.y_axis.is_some()
    }

    pub fn set_x_axis_en(&mut self, enabled: bool) {
        self.x_enabled = enabled;
    }

    pub fn set_y_axis_en(&mut self, enabled: bool) {
        self.y_enabled = enabled;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Disabling also drops any drag in progress.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.cancel_drag();
        }
    }

    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    pub fn set_bounded(&mut self, bounded: bool) {
        self.bounded = bounded;
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.is_zoomed
    }

    #[must_use]
    pub fn min_zoom_px(&self) -> u32 {
        self.min_zoom_px
    }

    pub fn set_min_zoom_px(&mut self, pixels: u32) {
        self.min_zoom_px = pixels;
    }

    #[must_use]
    pub fn is_block_zoom_en(&self) -> bool {
        self.block_zoom
    }

    /// A zoom-blocked zoomer still tracks the rubber band but never rescales.
    pub fn set_block_zoom_en(&mut self, blocked: bool) {
        self.block_zoom = blocked;
    }

    #[must_use]
    pub fn is_block_zoom_reset_en(&self) -> bool {
        self.block_zoom_reset
    }

    pub fn set_block_zoom_reset_en(&mut self, blocked: bool) {
        self.block_zoom_reset = blocked;
    }

    #[must_use]
    pub fn base_rect(&self) -> Option<DataRect> {
        self.base_rect
    }

    pub fn set_base_rect_to(&mut self, rect: DataRect) {
        self.base_rect = (!rect.is_empty()).then_some(rect);
    }

    /// Captures the current axis ranges as the zoom base.
    pub fn capture_base_rect(&mut self, surface: &PlotSurface) {
        let rect = self.current_rect(surface);
        self.set_base_rect_to(rect);
    }

    /// Current ranges of the enabled dimensions.
    #[must_use]
    pub fn current_rect(&self, surface: &PlotSurface) -> DataRect {
        surface.current_rect(self.active_x(), self.active_y())
    }

    /// Axes this zoomer currently drives.
    #[must_use]
    pub fn enabled_axes(&self) -> SmallVec<[AxisId; 2]> {
        [self.active_x(), self.active_y()].into_iter().flatten().collect()
    }

    #[must_use]
    pub fn rubber_band(&self) -> Option<RubberBand> {
        self.rubber_band
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag_origin.is_some()
    }

    /// Starts a selection at `origin`. Returns `false` when the zoomer cannot
    /// act on any dimension.
    pub fn begin_drag(&mut self, origin: PixelPoint) -> bool {
        if !self.enabled || self.enabled_axes().is_empty() {
            return false;
        }
        self.drag_origin = Some(origin);
        self.rubber_band = Some(RubberBand {
            origin,
            rect: PixelRect::from_corners(origin, origin),
            valid: self.min_zoom_px == 0,
        });
        true
    }

    /// Updates the selection rectangle, clamped to the canvas.
    ///
    /// A disabled dimension spans the whole canvas.
    pub fn drag_to(&mut self, point: PixelPoint, canvas: CanvasSize) -> Option<RubberBand> {
        let origin = self.drag_origin?;
        let width = f64::from(canvas.width);
        let height = f64::from(canvas.height);

        let x_en = self.is_x_axis_en();
        let y_en = self.is_y_axis_en();
        let corner = PixelPoint::new(
            if x_en { point.x } else { width }.clamp(0.0, width),
            if y_en { point.y } else { height }.clamp(0.0, height),
        );
        let anchor = PixelPoint::new(
            if x_en { origin.x.clamp(0.0, width) } else { 0.0 },
            if y_en { origin.y.clamp(0.0, height) } else { 0.0 },
        );

        let rect = PixelRect::from_corners(anchor, corner);
        let min = f64::from(self.min_zoom_px);
        let band = RubberBand {
            origin,
            rect,
            valid: rect.width() >= min && rect.height() >= min,
        };
        self.rubber_band = Some(band);
        Some(band)
    }

    /// Finishes the selection and zooms to it when valid.
    ///
    /// Returns the applied data rectangle, or `None` when the selection was
    /// invalid or nothing changed.
    pub fn end_drag(&mut self, surface: &mut PlotSurface) -> Option<DataRect> {
        self.drag_origin.take()?;
        let band = self.rubber_band.take()?;
        if !band.valid {
            debug!(
                width = band.rect.width(),
                height = band.rect.height(),
                min = self.min_zoom_px,
                "discarding undersized zoom selection"
            );
            return None;
        }

        let target = self.pixel_rect_to_data(band.rect, surface)?;
        self.zoom(target, surface)
    }

    pub fn cancel_drag(&mut self) {
        self.drag_origin = None;
        self.rubber_band = None;
    }

    /// Inverse-transforms a pixel rectangle for every enabled dimension,
    /// clamping to the base rectangle when bounded.
    #[must_use]
    pub fn pixel_rect_to_data(&self, rect: PixelRect, surface: &PlotSurface) -> Option<DataRect> {
        let mut target = DataRect::default();
        for axis in self.enabled_axes() {
            let map = surface.scale_map(axis).ok()?;
            let (low, high) = rect.span(axis.orientation());
            let interval = Interval::new(map.pixel_to_value(low), map.pixel_to_value(high))
                .oriented_like(map.interval());
            target.set_interval(axis.orientation(), Some(interval));
        }
        Some(self.bound(target))
    }

    /// Rescales the enabled axes to `rect` and reports it as a zoom.
    pub fn zoom(&mut self, rect: DataRect, surface: &mut PlotSurface) -> Option<DataRect> {
        if !self.enabled {
            debug!("zoom ignored on disabled zoomer");
            return None;
        }
        self.rescale(rect, surface)
    }

    /// Rescales like [`Zoomer::zoom`] without the caller forwarding a zoom
    /// notification. Used for undo and for mirroring a linked plot.
    pub fn silent_zoom(&mut self, rect: DataRect, surface: &mut PlotSurface) -> bool {
        self.rescale(rect, surface).is_some()
    }

    /// Restores the base rectangle. Returns `false` when no base is set.
    pub fn zoom_to_base(&mut self, surface: &mut PlotSurface) -> bool {
        let Some(base) = self.base_rect else {
            return false;
        };
        surface.apply_rect(self.active_x(), self.active_y(), base);
        self.is_zoomed = false;
        true
    }

    /// Handles a button release; a right click on a zoomed, non-blocked
    /// zoomer resets it to base. Returns `true` when a reset happened.
    pub fn handle_release(&mut self, button: PointerButton, surface: &mut PlotSurface) -> bool {
        if !self.enabled || button != PointerButton::Right {
            return false;
        }
        if self.block_zoom_reset || !self.is_zoomed {
            return false;
        }
        self.zoom_to_base(surface)
    }

    fn rescale(&mut self, rect: DataRect, surface: &mut PlotSurface) -> Option<DataRect> {
        if self.block_zoom {
            return None;
        }
        let mut applied = DataRect::default();
        for axis in self.enabled_axes() {
            let Some(interval) = rect.interval(axis.orientation()) else {
                continue;
            };
            if interval.is_degenerate() {
                debug!(axis = %axis, "skipping degenerate zoom interval");
                continue;
            }
            if surface.set_interval(axis, interval) {
                applied.set_interval(axis.orientation(), Some(interval));
            }
        }
        if applied.is_empty() {
            trace!("zoom left every axis unchanged");
            return None;
        }
        trace!(?applied, "zoomed");
        self.is_zoomed = true;
        Some(applied)
    }

    fn bound(&self, mut rect: DataRect) -> DataRect {
        if !self.bounded {
            return rect;
        }
        let Some(base) = self.base_rect else {
            return rect;
        };
        let clamp = |inner: Option<Interval>, bound: Option<Interval>| match (inner, bound) {
            (Some(inner), Some(bound)) => Some(inner.clamp_to(bound).oriented_like(bound)),
            (inner, _) => inner,
        };
        rect.x = clamp(rect.x, base.x);
        rect.y = clamp(rect.y, base.y);
        rect
    }

    /// Clamps an arbitrary target rectangle the way a gesture would be.
    #[must_use]
    pub fn bounded_rect(&self, rect: DataRect) -> DataRect {
        self.bound(rect)
    }

    fn active_x(&self) -> Option<AxisId> {
        self.x_axis.filter(|_| self.x_enabled)
    }

    fn active_y(&self) -> Option<AxisId> {
        self.y_axis.filter(|_| self.y_enabled)
    }
}
