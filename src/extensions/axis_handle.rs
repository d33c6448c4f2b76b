use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::core::{
    AxisEvent, AxisId, Observers, Orientation, PixelPoint, PlotSurface, ScaleMap, SubscriptionId,
};
use crate::error::{NavError, NavResult};

pub const DEFAULT_GRAB_TOLERANCE_PX: f64 = 6.0;

/// When the handle's full-length bar is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarVisibility {
    #[default]
    Always,
    OnHover,
    Never,
}

/// Canvas edge the grip sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HandlePos {
    NorthOrWest,
    #[default]
    SouthOrEast,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HandleEvent {
    /// Value-space position after a user move or [`AxisHandle::set_position`].
    PositionChanged(f64),
}

#[derive(Debug)]
struct HandleState {
    axis: AxisId,
    value: f64,
    pixel: f64,
    map: ScaleMap,
}

impl HandleState {
    /// Follows an axis rescale. The value stays put; only the rendered pixel
    /// moves, and only when it actually changed.
    fn reproject(&mut self, map: ScaleMap) {
        self.map = map;
        let pixel = map.value_to_pixel(self.value);
        if pixel != self.pixel {
            trace!(axis = %self.axis, from = self.pixel, to = pixel, "handle reprojected");
            self.pixel = pixel;
        }
    }
}

/// Draggable marker bound to one axis.
///
/// The handle caches its value-space position. It subscribes to its axis so
/// range changes and canvas resizes reproject it silently; only direct moves
/// notify subscribers. Call [`AxisHandle::detach`] before dropping a handle
/// whose surface outlives it, otherwise a dead callback stays registered on
/// the axis until the surface goes away.
#[derive(Debug)]
pub struct AxisHandle {
    state: Rc<RefCell<HandleState>>,
    subscription: Option<SubscriptionId>,
    observers: Observers<HandleEvent>,
    bounded: bool,
    pressed: bool,
    hovering: bool,
    grab_tolerance_px: f64,
    bar_visibility: BarVisibility,
    handle_pos: HandlePos,
}

impl AxisHandle {
    pub fn new(axis: AxisId, value: f64, surface: &mut PlotSurface) -> NavResult<Self> {
        let map = surface.scale_map(axis)?;
        let state = Rc::new(RefCell::new(HandleState {
            axis,
            value,
            pixel: map.value_to_pixel(value),
            map,
        }));
        let subscription = Self::connect(&state, axis, surface)?;
        Ok(Self {
            state,
            subscription: Some(subscription),
            observers: Observers::default(),
            bounded: true,
            pressed: false,
            hovering: false,
            grab_tolerance_px: DEFAULT_GRAB_TOLERANCE_PX,
            bar_visibility: BarVisibility::Always,
            handle_pos: HandlePos::SouthOrEast,
        })
    }

    fn connect(
        state: &Rc<RefCell<HandleState>>,
        axis: AxisId,
        surface: &mut PlotSurface,
    ) -> NavResult<SubscriptionId> {
        let weak: Weak<RefCell<HandleState>> = Rc::downgrade(state);
        surface
            .subscribe_axis(axis, move |event| {
                if let AxisEvent::Rescaled { map, .. } = event {
                    if let Some(state) = weak.upgrade() {
                        if let Ok(mut state) = state.try_borrow_mut() {
                            state.reproject(*map);
                        }
                    }
                }
            })
            .ok_or(NavError::UnknownAxis(axis))
    }

    #[must_use]
    pub fn axis(&self) -> AxisId {
        self.state.borrow().axis
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.axis().orientation()
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.state.borrow().value
    }

    #[must_use]
    pub fn pixel(&self) -> f64 {
        self.state.borrow().pixel
    }

    /// Mapping the handle currently projects through.
    #[must_use]
    pub fn scale_map(&self) -> ScaleMap {
        self.state.borrow().map
    }

    /// Rebinds the handle to another axis and refreshes its pixel position.
    pub fn set_axis(&mut self, axis: AxisId, surface: &mut PlotSurface) -> NavResult<()> {
        let map = surface.scale_map(axis)?;
        self.detach(surface);
        self.subscription = Some(Self::connect(&self.state, axis, surface)?);
        let mut state = self.state.borrow_mut();
        state.axis = axis;
        state.reproject(map);
        debug!(axis = %axis, "handle rebound");
        Ok(())
    }

    /// Drops the axis subscription.
    pub fn detach(&mut self, surface: &mut PlotSurface) {
        if let Some(subscription) = self.subscription.take() {
            let axis = self.axis();
            surface.unsubscribe_axis(axis, subscription);
        }
    }

    /// Moves the handle and notifies subscribers.
    pub fn set_position(&mut self, value: f64) {
        self.set_position_silent(value);
        self.observers.emit(&HandleEvent::PositionChanged(value));
    }

    /// Moves the handle without notifying anyone.
    pub fn set_position_silent(&mut self, value: f64) {
        let mut state = self.state.borrow_mut();
        state.value = value;
        state.pixel = state.map.value_to_pixel(value);
    }

    /// Value a pixel coordinate along the handle's axis maps to, honouring
    /// the bounded-drag policy.
    #[must_use]
    pub fn value_for_pixel(&self, pixel: f64) -> f64 {
        let map = self.scale_map();
        let pixel = if self.bounded {
            pixel.clamp(0.0, (map.extent_px() - 1.0).max(0.0))
        } else {
            pixel
        };
        map.pixel_to_value(pixel)
    }

    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.bounded
    }

    /// A bounded handle cannot be dragged off the canvas.
    pub fn set_bounded(&mut self, bounded: bool) {
        self.bounded = bounded;
    }

    #[must_use]
    pub fn grab_tolerance_px(&self) -> f64 {
        self.grab_tolerance_px
    }

    pub fn set_grab_tolerance_px(&mut self, tolerance: f64) {
        self.grab_tolerance_px = tolerance.max(0.0);
    }

    /// Whether `point` is close enough to grab the handle.
    #[must_use]
    pub fn hit_test(&self, point: PixelPoint) -> bool {
        let coordinate = self.orientation().coordinate(point);
        (coordinate - self.pixel()).abs() <= self.grab_tolerance_px
    }

    pub fn begin_drag(&mut self, point: PixelPoint) -> bool {
        self.pressed = self.hit_test(point);
        self.pressed
    }

    /// Follows the pointer while pressed and returns the new value.
    pub fn drag_to(&mut self, point: PixelPoint) -> Option<f64> {
        if !self.pressed {
            return None;
        }
        let value = self.value_for_pixel(self.orientation().coordinate(point));
        self.set_position(value);
        Some(value)
    }

    pub fn end_drag(&mut self) {
        self.pressed = false;
    }

    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.pressed
    }

    /// Double-clicking the grip recenters the handle on the canvas.
    pub fn double_click(&mut self, point: PixelPoint) -> Option<f64> {
        if !self.hit_test(point) {
            return None;
        }
        let map = self.scale_map();
        let value = map.pixel_to_value(map.extent_px() / 2.0);
        self.set_position(value);
        Some(value)
    }

    /// Updates hover state; returns `true` when it changed.
    pub fn hover(&mut self, point: PixelPoint) -> bool {
        let hovering = self.hit_test(point);
        let changed = hovering != self.hovering;
        self.hovering = hovering;
        changed
    }

    #[must_use]
    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    #[must_use]
    pub fn bar_visibility(&self) -> BarVisibility {
        self.bar_visibility
    }

    pub fn set_bar_visibility(&mut self, visibility: BarVisibility) {
        self.bar_visibility = visibility;
    }

    #[must_use]
    pub fn is_bar_visible(&self) -> bool {
        match self.bar_visibility {
            BarVisibility::Always => true,
            BarVisibility::OnHover => self.hovering || self.pressed,
            BarVisibility::Never => false,
        }
    }

    #[must_use]
    pub fn handle_pos(&self) -> HandlePos {
        self.handle_pos
    }

    pub fn set_handle_pos(&mut self, pos: HandlePos) {
        self.handle_pos = pos;
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&HandleEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }
}
