use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::observer::{Observers, SubscriptionId};
use crate::core::primitives::fuzzy_eq;
use crate::core::scale::ScaleMap;
use crate::core::types::{Interval, Orientation};

/// Physical plot edge an axis is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AxisPosition {
    Bottom,
    Top,
    Left,
    Right,
}

impl AxisPosition {
    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Bottom | Self::Top => Orientation::Horizontal,
            Self::Left | Self::Right => Orientation::Vertical,
        }
    }
}

/// Identity of one coordinate axis: an edge plus an index, since several
/// axes may share the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId {
    pub position: AxisPosition,
    pub index: u8,
}

impl AxisId {
    #[must_use]
    pub const fn new(position: AxisPosition, index: u8) -> Self {
        Self { position, index }
    }

    #[must_use]
    pub const fn x_bottom() -> Self {
        Self::new(AxisPosition::Bottom, 0)
    }

    #[must_use]
    pub const fn y_left() -> Self {
        Self::new(AxisPosition::Left, 0)
    }

    #[must_use]
    pub const fn orientation(self) -> Orientation {
        self.position.orientation()
    }

    #[must_use]
    pub const fn is_x_axis(self) -> bool {
        matches!(self.orientation(), Orientation::Horizontal)
    }

    #[must_use]
    pub const fn is_y_axis(self) -> bool {
        matches!(self.orientation(), Orientation::Vertical)
    }
}

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.position, self.index)
    }
}

/// Why an axis' pixel mapping changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RescaleCause {
    Range,
    Resize,
}

/// Notifications delivered to axis subscribers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisEvent {
    MinChanged(f64),
    MaxChanged(f64),
    DivisionsChanged { divisions: u32, step: f64 },
    /// The value range or the canvas extent changed; carries the new mapping
    /// so listeners can reproject without reading the axis back.
    Rescaled { map: ScaleMap, cause: RescaleCause },
    /// Fresh range coming from outside the navigation layer (new data).
    ScaleUpdated(Interval),
}

/// Bookkeeping returned by [`Axis::set_interval`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IntervalChange {
    pub min_changed: bool,
    pub max_changed: bool,
}

impl IntervalChange {
    #[must_use]
    pub fn any(self) -> bool {
        self.min_changed || self.max_changed
    }
}

/// One coordinate of a plot.
///
/// `min` maps to the left (horizontal) or bottom (vertical) edge. `min > max`
/// describes an inverted axis. `min == max` is never stored.
#[derive(Debug)]
pub struct Axis {
    id: AxisId,
    min: f64,
    max: f64,
    divisions: u32,
    visible: bool,
    units: String,
    observers: Observers<AxisEvent>,
}

pub const DEFAULT_DIVISIONS: u32 = 10;

impl Axis {
    /// Creates an axis. Returns `None` for a degenerate initial range.
    #[must_use]
    pub fn new(id: AxisId, interval: Interval) -> Option<Self> {
        if interval.is_degenerate() {
            return None;
        }
        Some(Self {
            id,
            min: interval.start,
            max: interval.end,
            divisions: DEFAULT_DIVISIONS,
            visible: true,
            units: String::new(),
            observers: Observers::default(),
        })
    }

    #[must_use]
    pub fn id(&self) -> AxisId {
        self.id
    }

    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[must_use]
    pub fn interval(&self) -> Interval {
        Interval::new(self.min, self.max)
    }

    #[must_use]
    pub fn is_inverted(&self) -> bool {
        self.min > self.max
    }

    #[must_use]
    pub fn divisions(&self) -> u32 {
        self.divisions
    }

    /// Value-space width of one grid division.
    #[must_use]
    pub fn step(&self) -> f64 {
        (self.max - self.min) / f64::from(self.divisions)
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    /// Sets both bounds.
    ///
    /// Degenerate or non-finite ranges are ignored. `MinChanged`/`MaxChanged`
    /// fire only for bounds that differ beyond floating-point noise.
    pub fn set_interval(&mut self, min: f64, max: f64) -> IntervalChange {
        if Interval::new(min, max).is_degenerate() {
            debug!(axis = %self.id, min, max, "ignoring degenerate axis interval");
            return IntervalChange::default();
        }

        let change = IntervalChange {
            min_changed: !fuzzy_eq(self.min, min),
            max_changed: !fuzzy_eq(self.max, max),
        };
        self.min = min;
        self.max = max;

        if change.min_changed {
            self.observers.emit(&AxisEvent::MinChanged(min));
        }
        if change.max_changed {
            self.observers.emit(&AxisEvent::MaxChanged(max));
        }
        change
    }

    /// Changes grid density. Zero divisions are ignored.
    pub fn set_divisions(&mut self, divisions: u32) -> bool {
        if divisions == 0 {
            debug!(axis = %self.id, "ignoring zero division count");
            return false;
        }
        self.divisions = divisions;
        let step = self.step();
        self.observers
            .emit(&AxisEvent::DivisionsChanged { divisions, step });
        true
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&AxisEvent) + 'static) -> SubscriptionId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    pub(crate) fn emit(&mut self, event: &AxisEvent) {
        self.observers.emit(event);
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::{Axis, AxisEvent, AxisId};
    use crate::core::Interval;

    #[test]
    fn degenerate_interval_is_a_noop() {
        let mut axis = Axis::new(AxisId::x_bottom(), Interval::new(0.0, 10.0)).expect("axis");
        let change = axis.set_interval(5.0, 5.0);
        assert!(!change.any());
        assert_eq!(axis.interval(), Interval::new(0.0, 10.0));
    }

    #[test]
    fn only_changed_bounds_notify() {
        let mut axis = Axis::new(AxisId::x_bottom(), Interval::new(1.0, 10.0)).expect("axis");
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        axis.subscribe(move |event| sink.borrow_mut().push(*event));

        axis.set_interval(1.0 + 1e-15, 20.0);
        assert_eq!(*events.borrow(), vec![AxisEvent::MaxChanged(20.0)]);
    }

    #[test]
    fn divisions_recompute_step() {
        let mut axis = Axis::new(AxisId::y_left(), Interval::new(-5.0, 5.0)).expect("axis");
        assert!(axis.set_divisions(4));
        assert_eq!(axis.step(), 2.5);
        assert!(!axis.set_divisions(0));
        assert_eq!(axis.divisions(), 4);
    }
}
