use serde::{Deserialize, Serialize};

use crate::core::types::{CanvasSize, Interval, Orientation};
use crate::error::{NavError, NavResult};

/// Affine value domain with non-zero span.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> NavResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(NavError::DegenerateRange {
                min: domain_start,
                max: domain_end,
            });
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Position of `value` along the domain: `0` at the start, `1` at the end.
    #[must_use]
    pub fn normalize(self, value: f64) -> f64 {
        (value - self.domain_start) / (self.domain_end - self.domain_start)
    }

    #[must_use]
    pub fn denormalize(self, normalized: f64) -> f64 {
        self.domain_start + normalized * (self.domain_end - self.domain_start)
    }
}

/// Snapshot of one axis' pixel↔value transform.
///
/// Horizontal axes grow left to right; vertical axes grow bottom to top, so
/// pixel `0` on a vertical axis maps to `interval.end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaleMap {
    scale: LinearScale,
    extent_px: f64,
    orientation: Orientation,
}

impl ScaleMap {
    pub fn new(interval: Interval, canvas: CanvasSize, orientation: Orientation) -> NavResult<Self> {
        if !canvas.is_valid() {
            return Err(NavError::InvalidCanvas {
                width: canvas.width,
                height: canvas.height,
            });
        }
        Ok(Self {
            scale: LinearScale::new(interval.start, interval.end)?,
            extent_px: canvas.extent(orientation),
            orientation,
        })
    }

    #[must_use]
    pub fn interval(self) -> Interval {
        let (start, end) = self.scale.domain();
        Interval::new(start, end)
    }

    #[must_use]
    pub fn extent_px(self) -> f64 {
        self.extent_px
    }

    #[must_use]
    pub fn orientation(self) -> Orientation {
        self.orientation
    }

    #[must_use]
    pub fn value_to_pixel(self, value: f64) -> f64 {
        let normalized = self.scale.normalize(value);
        match self.orientation {
            Orientation::Horizontal => normalized * self.extent_px,
            Orientation::Vertical => (1.0 - normalized) * self.extent_px,
        }
    }

    #[must_use]
    pub fn pixel_to_value(self, pixel: f64) -> f64 {
        let normalized = match self.orientation {
            Orientation::Horizontal => pixel / self.extent_px,
            Orientation::Vertical => 1.0 - pixel / self.extent_px,
        };
        self.scale.denormalize(normalized)
    }
}
