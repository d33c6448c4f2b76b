use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::core::{AxisId, DataRect, Interval, Orientation, PixelPoint, PlotSurface, fuzzy_eq};

use super::{
    Modifier, PointerButton, WHEEL_UNITS_PER_NOTCH, WheelInput, resolve_wheel_factor,
};

pub const DEFAULT_MAGNIFIER_FACTOR: f64 = 0.95;

/// Passing this factor to [`Magnifier::zoom`] or [`Magnifier::pan`] resets
/// the view to the base rectangle.
pub const RESET_FACTOR: f64 = -1.0;

/// What a magnifier call changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MagnifierOutput {
    Zoomed {
        factor: f64,
        cursor: PixelPoint,
        rect: DataRect,
    },
    Panned {
        factor: f64,
        rect: DataRect,
    },
    Reset,
}

impl MagnifierOutput {
    /// Rectangle the axes were moved to, if any.
    #[must_use]
    pub fn rect(&self) -> Option<DataRect> {
        match self {
            Self::Zoomed { rect, .. } | Self::Panned { rect, .. } => Some(*rect),
            Self::Reset => None,
        }
    }
}

/// Wheel-driven zoom toward the cursor and modifier-gated pan.
///
/// `factor < 1` zooms in and `factor > 1` zooms out.
#[derive(Debug, Clone, PartialEq)]
pub struct Magnifier {
    x_axis: Option<AxisId>,
    y_axis: Option<AxisId>,
    x_enabled: bool,
    y_enabled: bool,
    enabled: bool,
    bounded: bool,
    base_rect: Option<DataRect>,
    is_zoomed: bool,
    factor: f64,
    wheel_units_per_notch: f64,
    zoom_modifier: Option<Modifier>,
    pan_modifier: Option<Modifier>,
    block_zoom_reset: bool,
}

impl Magnifier {
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
            factor: DEFAULT_MAGNIFIER_FACTOR,
            wheel_units_per_notch: WHEEL_UNITS_PER_NOTCH,
            zoom_modifier: Some(Modifier::NoModifier),
            pan_modifier: Some(Modifier::Shift),
            block_zoom_reset: false,
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

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
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

    /// Per-notch wheel factor. Zero disables the wheel.
    #[must_use]
    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn set_factor(&mut self, factor: f64) {
        self.factor = factor;
    }

    pub fn set_wheel_units_per_notch(&mut self, units: f64) {
        self.wheel_units_per_notch = units;
    }

    #[must_use]
    pub fn zoom_modifier(&self) -> Option<Modifier> {
        self.zoom_modifier
    }

    /// `None` unbinds wheel zoom.
    pub fn set_zoom_modifier(&mut self, modifier: Option<Modifier>) {
        self.zoom_modifier = modifier;
    }

    #[must_use]
    pub fn pan_modifier(&self) -> Option<Modifier> {
        self.pan_modifier
    }

    /// `None` unbinds wheel pan.
    pub fn set_pan_modifier(&mut self, modifier: Option<Modifier>) {
        self.pan_modifier = modifier;
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

    pub fn capture_base_rect(&mut self, surface: &PlotSurface) {
        let rect = self.current_rect(surface);
        self.set_base_rect_to(rect);
    }

    #[must_use]
    pub fn current_rect(&self, surface: &PlotSurface) -> DataRect {
        surface.current_rect(self.active_x(), self.active_y())
    }

    #[must_use]
    pub fn enabled_axes(&self) -> SmallVec<[AxisId; 2]> {
        [self.active_x(), self.active_y()].into_iter().flatten().collect()
    }

    /// Zooms every enabled axis around `cursor`, keeping the value under the
    /// cursor fixed. [`RESET_FACTOR`] restores the base rectangle.
    pub fn zoom(
        &mut self,
        factor: f64,
        cursor: PixelPoint,
        surface: &mut PlotSurface,
    ) -> Option<MagnifierOutput> {
        if !self.enabled {
            debug!("zoom ignored on disabled magnifier");
            return None;
        }
        self.zoom_inner(factor, cursor, surface)
    }

    /// Shifts the horizontal axis by `(span - span * factor) / 2`. Vertical
    /// axes never pan.
    pub fn pan(&mut self, factor: f64, surface: &mut PlotSurface) -> Option<MagnifierOutput> {
        if !self.enabled {
            debug!("pan ignored on disabled magnifier");
            return None;
        }
        self.pan_inner(factor, surface)
    }

    /// Zoom that bypasses the enable flag; the caller does not forward it.
    pub fn silent_zoom(&mut self, factor: f64, cursor: PixelPoint, surface: &mut PlotSurface) -> bool {
        self.zoom_inner(factor, cursor, surface).is_some()
    }

    pub fn silent_pan(&mut self, factor: f64, surface: &mut PlotSurface) -> bool {
        self.pan_inner(factor, surface).is_some()
    }

    /// Dispatches a wheel rotation to zoom or pan depending on the held
    /// modifiers. Unbound or unmatched modifiers leave the view alone.
    pub fn handle_wheel(
        &mut self,
        input: WheelInput,
        surface: &mut PlotSurface,
    ) -> Option<MagnifierOutput> {
        if !self.enabled {
            return None;
        }
        let factor =
            resolve_wheel_factor(input.dominant_delta(), self.factor, self.wheel_units_per_notch)?;

        if self
            .zoom_modifier
            .is_some_and(|modifier| input.modifiers.matches(modifier))
        {
            return self.zoom_inner(factor, input.position, surface);
        }
        if self
            .pan_modifier
            .is_some_and(|modifier| input.modifiers.matches(modifier))
        {
            return self.pan_inner(factor, surface);
        }
        trace!(modifiers = ?input.modifiers, "wheel ignored: no matching modifier");
        None
    }

    /// Right-click release on a zoomed, non-blocked magnifier resets to base.
    pub fn handle_release(&mut self, button: PointerButton, surface: &mut PlotSurface) -> bool {
        if !self.enabled || button != PointerButton::Right {
            return false;
        }
        if self.block_zoom_reset || !self.is_zoomed {
            return false;
        }
        self.zoom_to_base(surface)
    }

    pub fn zoom_to_base(&mut self, surface: &mut PlotSurface) -> bool {
        let Some(base) = self.base_rect else {
            return false;
        };
        surface.apply_rect(self.active_x(), self.active_y(), base);
        self.is_zoomed = false;
        true
    }

    fn zoom_inner(
        &mut self,
        factor: f64,
        cursor: PixelPoint,
        surface: &mut PlotSurface,
    ) -> Option<MagnifierOutput> {
        if factor == RESET_FACTOR {
            return self.zoom_to_base(surface).then_some(MagnifierOutput::Reset);
        }
        if !usable_factor(factor) {
            return None;
        }

        let mut rect = DataRect::default();
        for axis in self.enabled_axes() {
            let Ok(map) = surface.scale_map(axis) else {
                continue;
            };
            let orientation = axis.orientation();
            let extent = map.extent_px();
            // Pixel span in the direction the axis values grow.
            let (v1, v2) = match orientation {
                Orientation::Horizontal => (0.0, extent),
                Orientation::Vertical => (extent, 0.0),
            };
            let cursor_px = orientation.coordinate(cursor);
            let center = 0.5 * (v1 + v2);
            let half = 0.5 * (v2 - v1) * factor;
            let new_center = cursor_px - factor * (cursor_px - center);
            let target = Interval::new(
                map.pixel_to_value(new_center - half),
                map.pixel_to_value(new_center + half),
            );
            let target = self.bound_zoom(orientation, target);
            if surface.set_interval(axis, target) {
                rect.set_interval(orientation, Some(target));
            }
        }

        if rect.is_empty() {
            return None;
        }
        self.is_zoomed = true;
        trace!(factor, ?rect, "magnified");
        Some(MagnifierOutput::Zoomed {
            factor,
            cursor,
            rect,
        })
    }

    fn pan_inner(&mut self, factor: f64, surface: &mut PlotSurface) -> Option<MagnifierOutput> {
        if factor == RESET_FACTOR {
            return self.zoom_to_base(surface).then_some(MagnifierOutput::Reset);
        }
        if !usable_factor(factor) {
            return None;
        }

        let mut rect = DataRect::default();
        if let Some(axis) = self.active_x() {
            let Some(current) = surface.interval(axis) else {
                return None;
            };
            // Same value-space direction on inverted axes.
            let span = current.span().abs();
            let amount = (span - span * factor) * 0.5;
            let target = Interval::new(current.start + amount, current.end + amount);
            let target = self.bound_pan(axis.orientation(), target);
            if surface.set_interval(axis, target) {
                rect.set_interval(axis.orientation(), Some(target));
            }
        }

        if rect.is_empty() {
            return None;
        }
        self.is_zoomed = true;
        trace!(factor, ?rect, "panned");
        Some(MagnifierOutput::Panned { factor, rect })
    }

    fn base_interval(&self, orientation: Orientation) -> Option<Interval> {
        if !self.bounded {
            return None;
        }
        self.base_rect.and_then(|base| base.interval(orientation))
    }

    fn bound_zoom(&self, orientation: Orientation, target: Interval) -> Interval {
        match self.base_interval(orientation) {
            Some(base) => target.clamp_to(base),
            None => target,
        }
    }

    /// Slides the window back inside the base without changing its width.
    fn bound_pan(&self, orientation: Orientation, target: Interval) -> Interval {
        let Some(base) = self.base_interval(orientation) else {
            return target;
        };
        let width = target.upper() - target.lower();
        if width >= base.upper() - base.lower() {
            return base.oriented_like(target);
        }
        let shift = if target.lower() < base.lower() {
            base.lower() - target.lower()
        } else if target.upper() > base.upper() {
            base.upper() - target.upper()
        } else {
            0.0
        };
        Interval::new(target.start + shift, target.end + shift)
    }

    fn active_x(&self) -> Option<AxisId> {
        self.x_axis.filter(|_| self.x_enabled)
    }

    fn active_y(&self) -> Option<AxisId> {
        self.y_axis.filter(|_| self.y_enabled)
    }
}

fn usable_factor(factor: f64) -> bool {
    factor.is_finite() && factor > 0.0 && !fuzzy_eq(factor, 1.0)
}

#[cfg(test)]
mod tests {
    use super::{Magnifier, MagnifierOutput, RESET_FACTOR};
    use crate::core::{AxisId, CanvasSize, DataRect, Interval, PixelPoint, PlotSurface};
    use crate::interaction::{KeyModifiers, Modifier, WheelInput};
    use crate::render::NullRepainter;

    fn surface(x: Interval) -> PlotSurface {
        let mut surface =
            PlotSurface::new(CanvasSize::new(1000, 500), Box::new(NullRepainter::default()))
                .expect("surface");
        surface.add_axis(AxisId::x_bottom(), x).expect("x");
        surface
    }

    #[test]
    fn unit_factor_is_a_noop() {
        let mut surface = surface(Interval::new(0.0, 100.0));
        let mut magnifier = Magnifier::new(Some(AxisId::x_bottom()), None);
        assert!(magnifier.zoom(1.0, PixelPoint::new(500.0, 0.0), &mut surface).is_none());
        assert!(!magnifier.is_zoomed());
    }

    #[test]
    fn zoom_keeps_value_under_cursor() {
        let mut surface = surface(Interval::new(0.0, 100.0));
        let mut magnifier = Magnifier::new(Some(AxisId::x_bottom()), None);
        magnifier
            .zoom(0.5, PixelPoint::new(250.0, 0.0), &mut surface)
            .expect("zoom");
        let interval = surface.interval(AxisId::x_bottom()).expect("interval");
        assert!((interval.start - 12.5).abs() < 1e-9);
        assert!((interval.end - 62.5).abs() < 1e-9);
    }

    #[test]
    fn bounded_pan_slides_back_inside_base() {
        let mut surface = surface(Interval::new(80.0, 100.0));
        let mut magnifier = Magnifier::new(Some(AxisId::x_bottom()), None);
        magnifier.set_base_rect_to(DataRect::from_x(Interval::new(0.0, 100.0)));
        assert!(magnifier.pan(0.5, &mut surface).is_none());
        assert_eq!(surface.interval(AxisId::x_bottom()), Some(Interval::new(80.0, 100.0)));

        magnifier.pan(1.5, &mut surface).expect("pan left");
        assert_eq!(surface.interval(AxisId::x_bottom()), Some(Interval::new(75.0, 95.0)));
    }

    #[test]
    fn inverted_axis_pans_in_value_space() {
        let mut surface = surface(Interval::new(100.0, 0.0));
        let mut magnifier = Magnifier::new(Some(AxisId::x_bottom()), None);
        magnifier.set_bounded(false);
        magnifier.pan(0.9, &mut surface).expect("pan");
        assert_eq!(surface.interval(AxisId::x_bottom()), Some(Interval::new(105.0, 5.0)));
    }

    #[test]
    fn wheel_without_matching_modifier_is_ignored() {
        let mut surface = surface(Interval::new(0.0, 100.0));
        let mut magnifier = Magnifier::new(Some(AxisId::x_bottom()), None);
        magnifier.set_zoom_modifier(None);
        magnifier.set_pan_modifier(Some(Modifier::Alt));
        let input = WheelInput::vertical(120.0, PixelPoint::new(10.0, 10.0), KeyModifiers::none());
        assert!(magnifier.handle_wheel(input, &mut surface).is_none());
    }

    #[test]
    fn reset_factor_restores_base() {
        let mut surface = surface(Interval::new(0.0, 100.0));
        let mut magnifier = Magnifier::new(Some(AxisId::x_bottom()), None);
        magnifier.capture_base_rect(&surface);
        magnifier
            .zoom(0.5, PixelPoint::new(100.0, 0.0), &mut surface)
            .expect("zoom");
        assert_eq!(
            magnifier.zoom(RESET_FACTOR, PixelPoint::default(), &mut surface),
            Some(MagnifierOutput::Reset)
        );
        assert_eq!(surface.interval(AxisId::x_bottom()), Some(Interval::new(0.0, 100.0)));
    }
}
