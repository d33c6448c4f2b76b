use tracing::trace;

use crate::core::{AxisId, DataRect, PlotSurface};
use crate::interaction::{Magnifier, Zoomer};

use super::{History, NavigationKind, NavigatorConfig};

/// Per-axis bundle of one zoomer, one magnifier and their undo history.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationDomain {
    axis: AxisId,
    zoomer: Zoomer,
    magnifier: Magnifier,
    history: History,
}

impl NavigationDomain {
    /// Builds the domain's tools for `axis`. Their own right-click reset is
    /// blocked since the navigator handles that button.
    #[must_use]
    pub fn new(axis: AxisId, config: &NavigatorConfig) -> Self {
        let (x, y) = if axis.is_x_axis() {
            (Some(axis), None)
        } else {
            (None, Some(axis))
        };

        let mut zoomer = Zoomer::new(x, y);
        zoomer.set_block_zoom_reset_en(true);
        zoomer.set_bounded(config.bounded);
        zoomer.set_min_zoom_px(config.min_zoom_px);

        let mut magnifier = Magnifier::new(x, y);
        magnifier.set_block_zoom_reset_en(true);
        magnifier.set_bounded(config.bounded);
        magnifier.set_factor(config.magnifier_factor);
        magnifier.set_wheel_units_per_notch(config.wheel_units_per_notch);
        magnifier.set_pan_modifier(config.pan_modifier);
        magnifier.set_zoom_modifier(config.zoom_modifier);

        Self {
            axis,
            zoomer,
            magnifier,
            history: History::with_limit(config.history_limit),
        }
    }

    #[must_use]
    pub fn axis(&self) -> AxisId {
        self.axis
    }

    #[must_use]
    pub fn zoomer(&self) -> &Zoomer {
        &self.zoomer
    }

    pub fn zoomer_mut(&mut self) -> &mut Zoomer {
        &mut self.zoomer
    }

    #[must_use]
    pub fn magnifier(&self) -> &Magnifier {
        &self.magnifier
    }

    pub fn magnifier_mut(&mut self) -> &mut Magnifier {
        &mut self.magnifier
    }

    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    #[must_use]
    pub fn last_operation(&self) -> NavigationKind {
        self.history.last_kind()
    }

    #[must_use]
    pub fn base_rect(&self) -> Option<DataRect> {
        self.zoomer.base_rect()
    }

    pub fn set_base_rect_to(&mut self, rect: DataRect) {
        self.zoomer.set_base_rect_to(rect);
        self.magnifier.set_base_rect_to(rect);
    }

    /// Uses the axis' current range as the new base.
    pub fn capture_base_rect(&mut self, surface: &PlotSurface) {
        self.zoomer.capture_base_rect(surface);
        self.magnifier.capture_base_rect(surface);
    }

    #[must_use]
    pub fn current_rect(&self, surface: &PlotSurface) -> DataRect {
        self.zoomer.current_rect(surface)
    }

    pub fn set_bounded(&mut self, bounded: bool) {
        self.zoomer.set_bounded(bounded);
        self.magnifier.set_bounded(bounded);
    }

    /// `true` when an enabled tool reports a zoom and the view is away from
    /// the base rectangle.
    #[must_use]
    pub fn is_zoomed(&self, surface: &PlotSurface) -> bool {
        let reported = (self.zoomer.is_enabled() && self.zoomer.is_zoomed())
            || (self.magnifier.is_enabled() && self.magnifier.is_zoomed());
        if !reported {
            return false;
        }
        match self.base_rect() {
            Some(base) => !self.current_rect(surface).approx_eq(base),
            None => true,
        }
    }

    pub fn record(&mut self, rect: DataRect, kind: NavigationKind) {
        self.history.push(rect, kind);
    }

    /// Re-applies the previous history entry. Returns it, or `None` when
    /// fewer than two entries exist.
    pub fn undo(&mut self, surface: &mut PlotSurface) -> Option<DataRect> {
        let rect = self.history.step_back()?;
        self.zoomer.silent_zoom(rect, surface);
        trace!(axis = %self.axis, ?rect, "domain undo");
        Some(rect)
    }

    /// Clears history and restores the base rectangle.
    pub fn reset(&mut self, surface: &mut PlotSurface) -> Option<DataRect> {
        self.history.clear();
        let restored = self.zoomer.zoom_to_base(surface);
        self.magnifier.zoom_to_base(surface);
        restored.then(|| self.base_rect()).flatten()
    }

    /// Applies a rectangle coming from a linked plot and records it under
    /// `kind` so both plots share the same undo steps.
    pub fn apply_silent(
        &mut self,
        rect: DataRect,
        kind: NavigationKind,
        record_history: bool,
        surface: &mut PlotSurface,
    ) -> bool {
        if !self.zoomer.silent_zoom(rect, surface) {
            return false;
        }
        if record_history {
            self.history.push(rect, kind);
        }
        true
    }
}
