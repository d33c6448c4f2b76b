use serde::{Deserialize, Serialize};

use crate::core::primitives::fuzzy_eq;

/// Pixel size of the plotting canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// Pixel extent along one orientation.
    #[must_use]
    pub fn extent(self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::Horizontal => f64::from(self.width),
            Orientation::Vertical => f64::from(self.height),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Picks the coordinate of `point` that runs along this orientation.
    #[must_use]
    pub fn coordinate(self, point: PixelPoint) -> f64 {
        match self {
            Self::Horizontal => point.x,
            Self::Vertical => point.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Normalized pixel rectangle (`left <= right`, `top <= bottom`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PixelRect {
    #[must_use]
    pub fn from_corners(a: PixelPoint, b: PixelPoint) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Pixel span along one orientation as `(low, high)`.
    #[must_use]
    pub fn span(self, orientation: Orientation) -> (f64, f64) {
        match orientation {
            Orientation::Horizontal => (self.left, self.right),
            Orientation::Vertical => (self.top, self.bottom),
        }
    }
}

/// One-dimensional value range.
///
/// `start` maps to the axis minimum side and `end` to the maximum side, so an
/// inverted axis is represented by `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    #[must_use]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn span(self) -> f64 {
        self.end - self.start
    }

    #[must_use]
    pub fn is_inverted(self) -> bool {
        self.start > self.end
    }

    #[must_use]
    pub fn lower(self) -> f64 {
        self.start.min(self.end)
    }

    #[must_use]
    pub fn upper(self) -> f64 {
        self.start.max(self.end)
    }

    #[must_use]
    pub fn center(self) -> f64 {
        0.5 * (self.start + self.end)
    }

    #[must_use]
    pub fn is_degenerate(self) -> bool {
        !self.start.is_finite() || !self.end.is_finite() || fuzzy_eq(self.start, self.end)
    }

    /// Returns `true` when `self` lies inside `outer` within `tolerance`.
    #[must_use]
    pub fn is_within(self, outer: Self, tolerance: f64) -> bool {
        self.lower() >= outer.lower() - tolerance && self.upper() <= outer.upper() + tolerance
    }

    /// Clamps both edges into `bound`, preserving this interval's direction.
    #[must_use]
    pub fn clamp_to(self, bound: Self) -> Self {
        let (lo, hi) = (bound.lower(), bound.upper());
        Self {
            start: self.start.clamp(lo, hi),
            end: self.end.clamp(lo, hi),
        }
    }

    /// Re-orders the bounds so the result has the same direction as `reference`.
    #[must_use]
    pub fn oriented_like(self, reference: Self) -> Self {
        if reference.is_inverted() {
            Self::new(self.upper(), self.lower())
        } else {
            Self::new(self.lower(), self.upper())
        }
    }

    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        fuzzy_eq(self.start, other.start) && fuzzy_eq(self.end, other.end)
    }
}

/// Data-space rectangle used for zoom targets, history entries and base rects.
///
/// Only the dimensions a navigation component actually drives are present.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DataRect {
    pub x: Option<Interval>,
    pub y: Option<Interval>,
}

impl DataRect {
    #[must_use]
    pub const fn new(x: Option<Interval>, y: Option<Interval>) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub const fn from_x(x: Interval) -> Self {
        Self { x: Some(x), y: None }
    }

    #[must_use]
    pub const fn from_y(y: Interval) -> Self {
        Self { x: None, y: Some(y) }
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.x.is_none() && self.y.is_none()
    }

    #[must_use]
    pub fn interval(self, orientation: Orientation) -> Option<Interval> {
        match orientation {
            Orientation::Horizontal => self.x,
            Orientation::Vertical => self.y,
        }
    }

    pub fn set_interval(&mut self, orientation: Orientation, interval: Option<Interval>) {
        match orientation {
            Orientation::Horizontal => self.x = interval,
            Orientation::Vertical => self.y = interval,
        }
    }

    /// Returns `true` when every present dimension lies inside the matching
    /// dimension of `outer`. Dimensions missing from `outer` do not constrain.
    #[must_use]
    pub fn is_within(self, outer: Self, tolerance: f64) -> bool {
        let check = |inner: Option<Interval>, bound: Option<Interval>| match (inner, bound) {
            (Some(inner), Some(bound)) => inner.is_within(bound, tolerance),
            _ => true,
        };
        check(self.x, outer.x) && check(self.y, outer.y)
    }

    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        let same = |a: Option<Interval>, b: Option<Interval>| match (a, b) {
            (Some(a), Some(b)) => a.approx_eq(b),
            (None, None) => true,
            _ => false,
        };
        same(self.x, other.x) && same(self.y, other.y)
    }
}

#[cfg(test)]
mod tests {
    use super::{DataRect, Interval, PixelPoint, PixelRect};

    #[test]
    fn clamp_keeps_inverted_direction() {
        let clamped = Interval::new(120.0, -5.0).clamp_to(Interval::new(0.0, 100.0));
        assert_eq!(clamped, Interval::new(100.0, 0.0));
        assert!(clamped.is_inverted());
    }

    #[test]
    fn pixel_rect_is_normalized() {
        let rect = PixelRect::from_corners(PixelPoint::new(300.0, 50.0), PixelPoint::new(100.0, 10.0));
        assert_eq!(rect.left, 100.0);
        assert_eq!(rect.top, 10.0);
        assert_eq!(rect.width(), 200.0);
        assert_eq!(rect.height(), 40.0);
    }

    #[test]
    fn rect_containment_ignores_dimensions_missing_from_outer() {
        let inner = DataRect::new(Some(Interval::new(1.0, 2.0)), Some(Interval::new(-9.0, 9.0)));
        let outer = DataRect::from_x(Interval::new(0.0, 10.0));
        assert!(inner.is_within(outer, 0.0));
        assert!(!DataRect::from_x(Interval::new(-1.0, 2.0)).is_within(outer, 0.0));
    }
}
