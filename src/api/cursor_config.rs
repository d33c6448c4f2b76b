use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};
use crate::extensions::{BarVisibility, DEFAULT_GRAB_TOLERANCE_PX, DEFAULT_READOUT_PRECISION};

/// Bootstrap configuration of a plot's measurement cursors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CursorConfig {
    /// Global show/hide switch; cursors start hidden.
    #[serde(default)]
    pub visible: bool,
    #[serde(default = "default_true")]
    pub horizontal_enabled: bool,
    #[serde(default = "default_true")]
    pub vertical_enabled: bool,
    #[serde(default)]
    pub horizontal_locked: bool,
    #[serde(default)]
    pub vertical_locked: bool,
    #[serde(default)]
    pub tracking: bool,
    #[serde(default)]
    pub can_leave_axis: bool,
    #[serde(default)]
    pub readouts_draggable: bool,
    #[serde(default = "default_grab_tolerance_px")]
    pub grab_tolerance_px: f64,
    #[serde(default)]
    pub bar_visibility: BarVisibility,
    #[serde(default = "default_readout_precision")]
    pub readout_precision: usize,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            visible: false,
            horizontal_enabled: true,
            vertical_enabled: true,
            horizontal_locked: false,
            vertical_locked: false,
            tracking: false,
            can_leave_axis: false,
            readouts_draggable: false,
            grab_tolerance_px: default_grab_tolerance_px(),
            bar_visibility: BarVisibility::default(),
            readout_precision: default_readout_precision(),
        }
    }
}

impl CursorConfig {
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    #[must_use]
    pub fn with_tracking(mut self, tracking: bool) -> Self {
        self.tracking = tracking;
        self
    }

    pub fn validate(self) -> NavResult<Self> {
        if !self.grab_tolerance_px.is_finite() || self.grab_tolerance_px < 0.0 {
            return Err(NavError::InvalidData(
                "cursor grab tolerance must be finite and >= 0".to_owned(),
            ));
        }
        if self.readout_precision > 12 {
            return Err(NavError::InvalidData(
                "cursor readout precision must be <= 12".to_owned(),
            ));
        }
        Ok(self)
    }
}

fn default_true() -> bool {
    true
}

fn default_grab_tolerance_px() -> f64 {
    DEFAULT_GRAB_TOLERANCE_PX
}

fn default_readout_precision() -> usize {
    DEFAULT_READOUT_PRECISION
}
