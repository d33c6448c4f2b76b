use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use crate::core::{AxisId, CanvasSize, DataRect, Interval, PixelPoint, PlotSurface};
use crate::error::{NavError, NavResult};
use crate::extensions::{CursorController, TrackingPoint};
use crate::interaction::{KeyModifiers, PointerButton, WheelInput};
use crate::render::Repainter;

use super::{
    ChannelId, CursorConfig, EventOrigin, NavigationKind, NavigatorConfig, PlotChannel,
    PlotNavigator, SharedPlot,
};

/// Host-facing plot: owns the axes, the channels drawn against them, the
/// navigator and the measurement cursors, and routes raw input to them.
///
/// Cursors get the first look at pointer input; anything they do not grab
/// goes to the navigator.
#[derive(Debug)]
pub struct PlotWidget {
    surface: PlotSurface,
    channels: IndexMap<ChannelId, PlotChannel>,
    selected: Option<ChannelId>,
    navigator: PlotNavigator,
    cursors: CursorController,
}

impl PlotWidget {
    /// Creates a plot with a bottom x axis and a left y axis.
    pub fn new(
        canvas: CanvasSize,
        x_interval: Interval,
        y_interval: Interval,
        repainter: Box<dyn Repainter>,
        navigator_config: NavigatorConfig,
        cursor_config: CursorConfig,
    ) -> NavResult<Self> {
        let mut surface = PlotSurface::new(canvas, repainter)?;
        let x_axis = surface.add_axis(AxisId::x_bottom(), x_interval)?;
        let y_axis = surface.add_axis(AxisId::y_left(), y_interval)?;
        let navigator = PlotNavigator::new(navigator_config)?;
        let cursors = CursorController::new(x_axis, y_axis, cursor_config, &mut surface)?;
        Ok(Self {
            surface,
            channels: IndexMap::new(),
            selected: None,
            navigator,
            cursors,
        })
    }

    #[must_use]
    pub fn into_shared(self) -> SharedPlot {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn surface(&self) -> &PlotSurface {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut PlotSurface {
        &mut self.surface
    }

    #[must_use]
    pub fn navigator(&self) -> &PlotNavigator {
        &self.navigator
    }

    pub fn navigator_mut(&mut self) -> &mut PlotNavigator {
        &mut self.navigator
    }

    #[must_use]
    pub fn cursors(&self) -> &CursorController {
        &self.cursors
    }

    pub fn cursors_mut(&mut self) -> &mut CursorController {
        &mut self.cursors
    }

    pub fn add_axis(&mut self, id: AxisId, interval: Interval) -> NavResult<AxisId> {
        self.surface.add_axis(id, interval)
    }

    pub fn set_axis_units(&mut self, id: AxisId, units: impl Into<String>) -> NavResult<()> {
        let axis = self.surface.axis_mut(id).ok_or(NavError::UnknownAxis(id))?;
        axis.set_units(units);
        Ok(())
    }

    /// Registers a channel. The first channel added becomes the selected one.
    pub fn add_channel(&mut self, channel: PlotChannel) -> NavResult<()> {
        let id = channel.id();
        if self.channels.contains_key(&id) {
            return Err(NavError::InvalidData(format!("channel {id} already exists")));
        }
        self.navigator.add_channel(&channel, &self.surface)?;
        self.channels.insert(id, channel);
        if self.selected.is_none() {
            self.select_channel(id)?;
        }
        Ok(())
    }

    /// Drops a channel; its axes' domains go away with their last referent.
    pub fn remove_channel(&mut self, id: ChannelId) -> NavResult<PlotChannel> {
        let channel = self
            .channels
            .shift_remove(&id)
            .ok_or(NavError::UnknownChannel(id))?;
        self.navigator.remove_channel(id);
        if self.selected == Some(id) {
            self.selected = None;
            if let Some(next) = self.channels.keys().next().copied() {
                self.select_channel(next)?;
            }
        }
        Ok(channel)
    }

    /// Selecting a channel retargets cursors and readouts to its axes.
    pub fn select_channel(&mut self, id: ChannelId) -> NavResult<()> {
        let channel = self.channels.get(&id).ok_or(NavError::UnknownChannel(id))?;
        self.cursors.retarget(channel, &mut self.surface)?;
        self.selected = Some(id);
        debug!(channel = %id, "channel selected");
        self.surface.request_repaint();
        Ok(())
    }

    #[must_use]
    pub fn channel(&self, id: ChannelId) -> Option<&PlotChannel> {
        self.channels.get(&id)
    }

    pub fn channel_mut(&mut self, id: ChannelId) -> Option<&mut PlotChannel> {
        self.channels.get_mut(&id)
    }

    #[must_use]
    pub fn channels(&self) -> impl Iterator<Item = &PlotChannel> {
        self.channels.values()
    }

    #[must_use]
    pub fn selected_channel(&self) -> Option<&PlotChannel> {
        self.selected.and_then(|id| self.channels.get(&id))
    }

    pub fn mouse_press(&mut self, point: PixelPoint, button: PointerButton) -> bool {
        if button == PointerButton::Left && self.cursors.press(point) {
            trace!(x = point.x, y = point.y, "cursor grabbed");
            return true;
        }
        self.navigator.handle_press(point, button)
    }

    pub fn mouse_move(&mut self, point: PixelPoint) -> bool {
        if self.cursors.is_dragging() {
            let moved = self.cursors.drag_to(point);
            if moved {
                self.surface.request_repaint();
            }
            return moved;
        }
        let hover_changed = self.cursors.hover(point);
        let band = self.navigator.handle_move(point, &self.surface);
        if hover_changed || band.is_some() {
            self.surface.request_repaint();
        }
        hover_changed || band.is_some()
    }

    pub fn mouse_release(&mut self, point: PixelPoint, button: PointerButton) -> bool {
        if self.cursors.release() {
            return true;
        }
        let changed = self
            .navigator
            .handle_release(point, button, &mut self.surface);
        // The rubber band disappears on release even when nothing zoomed.
        self.surface.request_repaint();
        changed
    }

    pub fn double_click(&mut self, point: PixelPoint) -> bool {
        let moved = self.cursors.double_click(point);
        if moved {
            self.surface.request_repaint();
        }
        moved
    }

    pub fn wheel(&mut self, input: WheelInput) -> bool {
        self.navigator.handle_wheel(input, &mut self.surface)
    }

    pub fn key_press(&mut self, modifiers: KeyModifiers) {
        self.navigator.handle_key_press(modifiers);
    }

    pub fn key_release(&mut self, modifiers: KeyModifiers) {
        self.navigator.handle_key_release(modifiers);
    }

    /// Resizing reprojects every axis; handles and cursors follow silently.
    pub fn resize(&mut self, canvas: CanvasSize) -> NavResult<()> {
        self.surface.resize(canvas)
    }

    /// Fresh range from new data. With auto-base on, the navigator
    /// re-captures the base of that axis.
    pub fn update_axis_scale(&mut self, axis: AxisId, min: f64, max: f64) -> bool {
        if !self.surface.update_axis_scale(axis, Interval::new(min, max)) {
            return false;
        }
        self.navigator.on_axis_scale_updated(axis, &mut self.surface);
        true
    }

    pub fn undo(&mut self) -> bool {
        self.navigator.undo(&mut self.surface)
    }

    pub fn reset(&mut self) {
        self.navigator.reset(&mut self.surface);
    }

    pub fn force_zoom(&mut self, axis: AxisId, rect: DataRect) -> Option<DataRect> {
        self.navigator.force_zoom(axis, rect, &mut self.surface)
    }

    pub fn force_magnify(&mut self, axis: AxisId, factor: f64, point: PixelPoint) -> Option<DataRect> {
        self.navigator
            .force_magnify(axis, factor, point, &mut self.surface)
    }

    pub fn force_pan(&mut self, axis: AxisId, factor: f64) -> Option<DataRect> {
        self.navigator.force_pan(axis, factor, &mut self.surface)
    }

    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.navigator.is_zoomed(&self.surface)
    }

    #[must_use]
    pub fn is_reset_affordance_visible(&self) -> bool {
        self.navigator.is_reset_affordance_visible(&self.surface)
    }

    /// Tracking markers on the selected channel's trace.
    #[must_use]
    pub fn tracking_points(&self) -> [Option<TrackingPoint>; 2] {
        match self.selected_channel() {
            Some(channel) => self.cursors.tracking_points(channel),
            None => [None, None],
        }
    }

    #[must_use]
    pub fn interval(&self, axis: AxisId) -> Option<Interval> {
        self.surface.interval(axis)
    }

    pub(crate) fn apply_synced(&mut self, axis: AxisId, rect: DataRect, kind: NavigationKind) -> bool {
        self.navigator
            .apply_synced(axis, rect, kind, &mut self.surface)
    }

    pub(crate) fn undo_synced(&mut self, scope: &IndexSet<AxisId>) -> bool {
        self.navigator
            .undo_scoped(&mut self.surface, EventOrigin::Synced, Some(scope))
    }

    pub(crate) fn reset_synced(&mut self, scope: &IndexSet<AxisId>) {
        self.navigator
            .reset_scoped(&mut self.surface, EventOrigin::Synced, Some(scope));
    }
}
