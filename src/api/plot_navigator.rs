use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{AxisId, DataRect, Observers, PixelPoint, PlotSurface, SubscriptionId};
use crate::error::{NavError, NavResult};
use crate::interaction::{
    KeyModifiers, MagnifierOutput, Modifier, PointerButton, RubberBand, WheelInput, Zoomer,
};
use crate::render::Color;

use super::{ChannelId, NavigationDomain, NavigationKind, NavigatorConfig, PlotChannel};

/// Whether a change started on this plot or was mirrored from a linked one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventOrigin {
    Local,
    Synced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NavigatorEvent {
    RectChanged {
        axis: AxisId,
        rect: DataRect,
        kind: NavigationKind,
        origin: EventOrigin,
    },
    Undo {
        origin: EventOrigin,
    },
    Reset {
        origin: EventOrigin,
    },
    AxisAdded {
        axis: AxisId,
    },
    AxisRemoved {
        axis: AxisId,
    },
}

/// Aggregates one [`NavigationDomain`] per axis referenced by the plot's
/// channels and routes gestures, undo and reset to them.
#[derive(Debug)]
pub struct PlotNavigator {
    config: NavigatorConfig,
    domains: IndexMap<AxisId, NavigationDomain>,
    channel_axes: IndexMap<ChannelId, [AxisId; 2]>,
    /// Drawing-only zoomer that tracks the rubber band shown to the user.
    visible_zoomer: Zoomer,
    zoomer_x_active: bool,
    zoomer_y_active: bool,
    observers: Observers<NavigatorEvent>,
}

impl PlotNavigator {
    pub fn new(config: NavigatorConfig) -> NavResult<Self> {
        let config = config.validate()?;

        let mut visible_zoomer = Zoomer::new(Some(AxisId::x_bottom()), Some(AxisId::y_left()));
        visible_zoomer.set_block_zoom_en(true);
        visible_zoomer.set_block_zoom_reset_en(true);
        visible_zoomer.set_min_zoom_px(config.min_zoom_px);
        visible_zoomer.set_bounded(config.bounded);

        let mut navigator = Self {
            config,
            domains: IndexMap::new(),
            channel_axes: IndexMap::new(),
            visible_zoomer,
            zoomer_x_active: true,
            zoomer_y_active: true,
            observers: Observers::default(),
        };
        navigator.refresh_enables();
        Ok(navigator)
    }

    #[must_use]
    pub fn config(&self) -> NavigatorConfig {
        self.config
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&NavigatorEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Registers a channel, creating domains for axes seen for the first
    /// time. New domains capture the axis' current range as their base.
    pub fn add_channel(&mut self, channel: &PlotChannel, surface: &PlotSurface) -> NavResult<()> {
        for axis in channel.axes() {
            if !surface.has_axis(axis) {
                return Err(NavError::UnknownAxis(axis));
            }
        }
        self.channel_axes.insert(channel.id(), channel.axes());

        let mut added = Vec::new();
        for axis in channel.axes() {
            if self.domains.contains_key(&axis) {
                continue;
            }
            let mut domain = NavigationDomain::new(axis, &self.config);
            domain.capture_base_rect(surface);
            self.domains.insert(axis, domain);
            added.push(axis);
        }
        self.refresh_enables();

        for axis in added {
            debug!(axis = %axis, channel = %channel.id(), "navigation domain added");
            self.observers.emit(&NavigatorEvent::AxisAdded { axis });
        }
        Ok(())
    }

    /// Unregisters a channel. Domains survive while another channel still
    /// references their axis.
    pub fn remove_channel(&mut self, id: ChannelId) -> bool {
        let Some(axes) = self.channel_axes.shift_remove(&id) else {
            return false;
        };

        let mut removed = Vec::new();
        for axis in axes {
            let still_used = self
                .channel_axes
                .values()
                .any(|channel_axes| channel_axes.contains(&axis));
            if !still_used && self.domains.shift_remove(&axis).is_some() {
                removed.push(axis);
            }
        }
        self.refresh_enables();

        for axis in removed {
            debug!(axis = %axis, "navigation domain removed");
            self.observers.emit(&NavigatorEvent::AxisRemoved { axis });
        }
        true
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channel_axes.len()
    }

    #[must_use]
    pub fn has_domain(&self, axis: AxisId) -> bool {
        self.domains.contains_key(&axis)
    }

    #[must_use]
    pub fn domain(&self, axis: AxisId) -> Option<&NavigationDomain> {
        self.domains.get(&axis)
    }

    pub fn domains(&self) -> impl Iterator<Item = &NavigationDomain> {
        self.domains.values()
    }

    pub fn axes(&self) -> impl Iterator<Item = AxisId> + '_ {
        self.domains.keys().copied()
    }

    /// Captures the current range of every axis as its base.
    pub fn set_base_rect(&mut self, surface: &PlotSurface) {
        for domain in self.domains.values_mut() {
            domain.capture_base_rect(surface);
        }
    }

    pub fn set_base_rect_for(&mut self, axis: AxisId, surface: &PlotSurface) -> bool {
        match self.domains.get_mut(&axis) {
            Some(domain) => {
                domain.capture_base_rect(surface);
                true
            }
            None => false,
        }
    }

    /// Forces an explicit base. Each domain takes the dimension matching its
    /// orientation; domains whose dimension is absent keep their base.
    pub fn set_base_rect_to(&mut self, rect: DataRect) {
        for domain in self.domains.values_mut() {
            let orientation = domain.axis().orientation();
            if let Some(interval) = rect.interval(orientation) {
                let mut own = DataRect::default();
                own.set_interval(orientation, Some(interval));
                domain.set_base_rect_to(own);
            }
        }
    }

    /// Reacts to a fresh range pushed from outside (new acquisition data).
    pub fn on_axis_scale_updated(&mut self, axis: AxisId, surface: &mut PlotSurface) {
        if !self.config.auto_base_enabled {
            return;
        }
        if !self.set_base_rect_for(axis, surface) {
            return;
        }
        trace!(axis = %axis, "base rect recaptured");
        if self.config.reset_on_new_base {
            self.reset(surface);
        }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// A disabled navigator ignores every gesture.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
        self.refresh_enables();
    }

    #[must_use]
    pub fn is_history_en(&self) -> bool {
        self.config.history_enabled
    }

    pub fn set_history_en(&mut self, enabled: bool) {
        self.config.history_enabled = enabled;
    }

    #[must_use]
    pub fn is_auto_base_en(&self) -> bool {
        self.config.auto_base_enabled
    }

    pub fn set_auto_base_en(&mut self, enabled: bool) {
        self.config.auto_base_enabled = enabled;
    }

    #[must_use]
    pub fn reset_on_new_base(&self) -> bool {
        self.config.reset_on_new_base
    }

    pub fn set_reset_on_new_base(&mut self, enabled: bool) {
        self.config.reset_on_new_base = enabled;
    }

    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.config.bounded
    }

    pub fn set_bounded(&mut self, bounded: bool) {
        self.config.bounded = bounded;
        self.visible_zoomer.set_bounded(bounded);
        for domain in self.domains.values_mut() {
            domain.set_bounded(bounded);
        }
    }

    #[must_use]
    pub fn is_zoomer_en(&self) -> bool {
        self.config.zoomer_enabled
    }

    pub fn set_zoomer_en(&mut self, enabled: bool) {
        self.config.zoomer_enabled = enabled;
        self.refresh_enables();
    }

    #[must_use]
    pub fn is_magnifier_en(&self) -> bool {
        self.config.magnifier_enabled
    }

    pub fn set_magnifier_en(&mut self, enabled: bool) {
        self.config.magnifier_enabled = enabled;
        self.refresh_enables();
    }

    #[must_use]
    pub fn is_x_axes_en(&self) -> bool {
        self.config.x_axes_enabled
    }

    pub fn set_x_axes_en(&mut self, enabled: bool) {
        self.config.x_axes_enabled = enabled;
        self.refresh_enables();
    }

    #[must_use]
    pub fn is_y_axes_en(&self) -> bool {
        self.config.y_axes_enabled
    }

    pub fn set_y_axes_en(&mut self, enabled: bool) {
        self.config.y_axes_enabled = enabled;
        self.refresh_enables();
    }

    pub fn set_reset_affordance_en(&mut self, enabled: bool) {
        self.config.reset_affordance_enabled = enabled;
    }

    pub fn set_zoomer_x_modifier(&mut self, modifier: Modifier) {
        self.config.zoomer_x_modifier = modifier;
    }

    pub fn set_zoomer_y_modifier(&mut self, modifier: Modifier) {
        self.config.zoomer_y_modifier = modifier;
    }

    pub fn set_zoomer_xy_modifier(&mut self, modifier: Modifier) {
        self.config.zoomer_xy_modifier = modifier;
    }

    pub fn set_magnifier_pan_modifier(&mut self, modifier: Option<Modifier>) {
        self.config.pan_modifier = modifier;
        for domain in self.domains.values_mut() {
            domain.magnifier_mut().set_pan_modifier(modifier);
        }
    }

    pub fn set_magnifier_zoom_modifier(&mut self, modifier: Option<Modifier>) {
        self.config.zoom_modifier = modifier;
        for domain in self.domains.values_mut() {
            domain.magnifier_mut().set_zoom_modifier(modifier);
        }
    }

    fn refresh_enables(&mut self) {
        let config = self.config;
        for domain in self.domains.values_mut() {
            let is_x = domain.axis().is_x_axis();
            let axis_on = if is_x {
                config.x_axes_enabled
            } else {
                config.y_axes_enabled
            };
            let zoom_dim_on = if is_x {
                self.zoomer_x_active
            } else {
                self.zoomer_y_active
            };
            domain
                .zoomer_mut()
                .set_enabled(config.enabled && config.zoomer_enabled && axis_on && zoom_dim_on);
            domain
                .magnifier_mut()
                .set_enabled(config.enabled && config.magnifier_enabled && axis_on);
        }
        self.visible_zoomer
            .set_x_axis_en(config.x_axes_enabled && self.zoomer_x_active);
        self.visible_zoomer
            .set_y_axis_en(config.y_axes_enabled && self.zoomer_y_active);
        self.visible_zoomer.set_enabled(
            config.enabled && config.zoomer_enabled && !self.channel_axes.is_empty(),
        );
    }

    /// `true` when any domain is zoomed away from its base.
    #[must_use]
    pub fn is_zoomed(&self, surface: &PlotSurface) -> bool {
        self.domains.values().any(|domain| domain.is_zoomed(surface))
    }

    /// Whether the host should show its "reset zoom" button.
    #[must_use]
    pub fn is_reset_affordance_visible(&self, surface: &PlotSurface) -> bool {
        self.config.reset_affordance_enabled && self.is_zoomed(surface)
    }

    #[must_use]
    pub fn rubber_band(&self) -> Option<RubberBand> {
        self.visible_zoomer.rubber_band()
    }

    #[must_use]
    pub fn rubber_band_color(&self) -> Option<Color> {
        self.rubber_band()
            .map(|band| self.config.style.rubber_band_color(band.valid))
    }

    /// Returns `true` when the press started a rectangle selection.
    pub fn handle_press(&mut self, point: PixelPoint, button: PointerButton) -> bool {
        if !self.config.enabled || button != PointerButton::Left {
            return false;
        }
        let mut started = self.visible_zoomer.begin_drag(point);
        for domain in self.domains.values_mut() {
            started |= domain.zoomer_mut().begin_drag(point);
        }
        started
    }

    pub fn handle_move(&mut self, point: PixelPoint, surface: &PlotSurface) -> Option<RubberBand> {
        let canvas = surface.canvas();
        for domain in self.domains.values_mut() {
            domain.zoomer_mut().drag_to(point, canvas);
        }
        self.visible_zoomer.drag_to(point, canvas)
    }

    /// Left release finishes a selection; right release undoes (history on)
    /// or resets. Returns `true` when the view changed or was reset.
    pub fn handle_release(
        &mut self,
        point: PixelPoint,
        button: PointerButton,
        surface: &mut PlotSurface,
    ) -> bool {
        if !self.config.enabled {
            return false;
        }
        match button {
            PointerButton::Left => self.finish_selection(point, surface),
            PointerButton::Right => {
                if self.config.history_enabled {
                    self.undo(surface)
                } else {
                    self.reset(surface);
                    true
                }
            }
            PointerButton::Middle => false,
        }
    }

    fn finish_selection(&mut self, point: PixelPoint, surface: &mut PlotSurface) -> bool {
        let canvas = surface.canvas();
        // The shared band decides validity; per-axis bands span the whole
        // canvas in the dimension they do not drive.
        let band = self.visible_zoomer.drag_to(point, canvas);
        self.visible_zoomer.cancel_drag();
        if band.is_some_and(|band| !band.valid) {
            for domain in self.domains.values_mut() {
                domain.zoomer_mut().cancel_drag();
            }
            debug!(x = point.x, y = point.y, "undersized selection discarded");
            return false;
        }

        let mut changes = Vec::new();
        for domain in self.domains.values_mut() {
            if !domain.zoomer().is_dragging() {
                continue;
            }
            domain.zoomer_mut().drag_to(point, canvas);
            if let Some(rect) = domain.zoomer_mut().end_drag(surface) {
                changes.push((domain.axis(), rect));
            }
        }
        self.commit_local(changes, NavigationKind::Zoom)
    }

    pub fn handle_wheel(&mut self, input: WheelInput, surface: &mut PlotSurface) -> bool {
        if !self.config.enabled {
            return false;
        }
        let mut changes = Vec::new();
        for domain in self.domains.values_mut() {
            if let Some(output) = domain.magnifier_mut().handle_wheel(input, surface) {
                changes.push((domain.axis(), output));
            }
        }
        self.commit_magnifier_outputs(changes)
    }

    /// Selects which dimensions the rectangle zoom acts on while a modifier
    /// is held.
    pub fn handle_key_press(&mut self, modifiers: KeyModifiers) {
        let config = self.config;
        if modifiers.matches(config.zoomer_x_modifier) {
            self.set_zoomer_dims(true, false);
        } else if modifiers.matches(config.zoomer_y_modifier) {
            self.set_zoomer_dims(false, true);
        } else if modifiers.matches(config.zoomer_xy_modifier) {
            self.set_zoomer_dims(true, true);
        }
    }

    /// With a bare XY binding both dimensions come back on release; any other
    /// binding disables rectangle zoom until its modifier is pressed again.
    pub fn handle_key_release(&mut self, modifiers: KeyModifiers) {
        let config = self.config;
        if config.zoomer_xy_modifier == Modifier::NoModifier {
            self.set_zoomer_dims(true, true);
        } else if modifiers.matches(config.zoomer_x_modifier)
            || modifiers.matches(config.zoomer_y_modifier)
            || modifiers.matches(config.zoomer_xy_modifier)
        {
            self.set_zoomer_dims(false, false);
        }
    }

    fn set_zoomer_dims(&mut self, x: bool, y: bool) {
        self.zoomer_x_active = x;
        self.zoomer_y_active = y;
        self.refresh_enables();
    }

    /// Zooms one axis to the matching dimension of `rect`, clamped to the
    /// base when bounded.
    pub fn force_zoom(&mut self, axis: AxisId, rect: DataRect, surface: &mut PlotSurface) -> Option<DataRect> {
        let domain = self.domains.get_mut(&axis)?;
        let target = domain.zoomer().bounded_rect(rect);
        let applied = domain.zoomer_mut().zoom(target, surface)?;
        self.commit_local(vec![(axis, applied)], NavigationKind::Zoom);
        Some(applied)
    }

    pub fn force_magnify(
        &mut self,
        axis: AxisId,
        factor: f64,
        point: PixelPoint,
        surface: &mut PlotSurface,
    ) -> Option<DataRect> {
        let domain = self.domains.get_mut(&axis)?;
        let output = domain.magnifier_mut().zoom(factor, point, surface)?;
        let rect = output.rect();
        self.commit_magnifier_outputs(vec![(axis, output)]);
        rect
    }

    pub fn force_pan(&mut self, axis: AxisId, factor: f64, surface: &mut PlotSurface) -> Option<DataRect> {
        let domain = self.domains.get_mut(&axis)?;
        let output = domain.magnifier_mut().pan(factor, surface)?;
        let rect = output.rect();
        self.commit_magnifier_outputs(vec![(axis, output)]);
        rect
    }

    /// Steps every domain back one history entry. Degrades to
    /// [`PlotNavigator::reset`] when no domain has anything to undo.
    pub fn undo(&mut self, surface: &mut PlotSurface) -> bool {
        self.undo_scoped(surface, EventOrigin::Local, None)
    }

    /// Clears history and restores every domain's base rectangle.
    pub fn reset(&mut self, surface: &mut PlotSurface) {
        self.reset_scoped(surface, EventOrigin::Local, None);
    }

    pub(crate) fn undo_scoped(
        &mut self,
        surface: &mut PlotSurface,
        origin: EventOrigin,
        scope: Option<&IndexSet<AxisId>>,
    ) -> bool {
        let mut events = Vec::new();
        for domain in self.domains.values_mut() {
            if scope.is_some_and(|axes| !axes.contains(&domain.axis())) {
                continue;
            }
            if let Some(rect) = domain.undo(surface) {
                events.push(NavigatorEvent::RectChanged {
                    axis: domain.axis(),
                    rect,
                    kind: NavigationKind::None,
                    origin,
                });
            }
        }

        if events.is_empty() {
            debug!(?origin, "nothing to undo, resetting");
            self.reset_scoped(surface, origin, scope);
            return true;
        }
        for event in &events {
            self.observers.emit(event);
        }
        self.observers.emit(&NavigatorEvent::Undo { origin });
        true
    }

    pub(crate) fn reset_scoped(
        &mut self,
        surface: &mut PlotSurface,
        origin: EventOrigin,
        scope: Option<&IndexSet<AxisId>>,
    ) {
        let mut events = Vec::new();
        for domain in self.domains.values_mut() {
            if scope.is_some_and(|axes| !axes.contains(&domain.axis())) {
                continue;
            }
            if let Some(rect) = domain.reset(surface) {
                events.push(NavigatorEvent::RectChanged {
                    axis: domain.axis(),
                    rect,
                    kind: NavigationKind::None,
                    origin,
                });
            }
        }
        for event in &events {
            self.observers.emit(event);
        }
        self.observers.emit(&NavigatorEvent::Reset { origin });
    }

    /// Mirrors a rectangle from a linked plot. Never produces a
    /// [`EventOrigin::Local`] event, so it is not forwarded again.
    pub(crate) fn apply_synced(
        &mut self,
        axis: AxisId,
        rect: DataRect,
        kind: NavigationKind,
        surface: &mut PlotSurface,
    ) -> bool {
        let record = self.config.history_enabled;
        let Some(domain) = self.domains.get_mut(&axis) else {
            debug!(axis = %axis, "synced rect for unknown axis ignored");
            return false;
        };
        if !domain.apply_silent(rect, kind, record, surface) {
            return false;
        }
        self.observers.emit(&NavigatorEvent::RectChanged {
            axis,
            rect,
            kind,
            origin: EventOrigin::Synced,
        });
        true
    }

    fn commit_magnifier_outputs(&mut self, outputs: Vec<(AxisId, MagnifierOutput)>) -> bool {
        let mut magnified = Vec::new();
        let mut panned = Vec::new();
        for (axis, output) in outputs {
            match output {
                MagnifierOutput::Zoomed { rect, .. } => magnified.push((axis, rect)),
                MagnifierOutput::Panned { rect, .. } => panned.push((axis, rect)),
                MagnifierOutput::Reset => {}
            }
        }
        let a = self.commit_local(magnified, NavigationKind::Magnify);
        let b = self.commit_local(panned, NavigationKind::Pan);
        a || b
    }

    fn commit_local(&mut self, changes: Vec<(AxisId, DataRect)>, kind: NavigationKind) -> bool {
        if changes.is_empty() {
            return false;
        }
        for (axis, rect) in changes {
            if self.config.history_enabled {
                if let Some(domain) = self.domains.get_mut(&axis) {
                    domain.record(rect, kind);
                }
            }
            trace!(axis = %axis, ?kind, ?rect, "navigation rect changed");
            self.observers.emit(&NavigatorEvent::RectChanged {
                axis,
                rect,
                kind,
                origin: EventOrigin::Local,
            });
        }
        true
    }
}
