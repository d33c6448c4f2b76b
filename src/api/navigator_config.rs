use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};
use crate::interaction::{
    DEFAULT_MAGNIFIER_FACTOR, DEFAULT_MIN_ZOOM_PX, Modifier, WHEEL_UNITS_PER_NOTCH,
};
use crate::render::Color;

use super::DEFAULT_HISTORY_LIMIT;

/// Colors used by the host when painting navigation overlays.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigationStyle {
    #[serde(default = "default_rubber_band_valid")]
    pub rubber_band_valid: Color,
    #[serde(default = "default_rubber_band_invalid")]
    pub rubber_band_invalid: Color,
}

impl Default for NavigationStyle {
    fn default() -> Self {
        Self {
            rubber_band_valid: default_rubber_band_valid(),
            rubber_band_invalid: default_rubber_band_invalid(),
        }
    }
}

impl NavigationStyle {
    #[must_use]
    pub fn rubber_band_color(self, valid: bool) -> Color {
        if valid {
            self.rubber_band_valid
        } else {
            self.rubber_band_invalid
        }
    }
}

/// Bootstrap configuration of a [`super::PlotNavigator`].
///
/// Serializable so hosts can persist navigation preferences next to their
/// own plot setup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavigatorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub history_enabled: bool,
    #[serde(default = "default_true")]
    pub auto_base_enabled: bool,
    #[serde(default = "default_true")]
    pub reset_on_new_base: bool,
    #[serde(default = "default_true")]
    pub bounded: bool,
    #[serde(default = "default_true")]
    pub zoomer_enabled: bool,
    #[serde(default = "default_true")]
    pub magnifier_enabled: bool,
    #[serde(default = "default_true")]
    pub x_axes_enabled: bool,
    #[serde(default = "default_true")]
    pub y_axes_enabled: bool,
    #[serde(default = "default_true")]
    pub reset_affordance_enabled: bool,
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "default_min_zoom_px")]
    pub min_zoom_px: u32,
    #[serde(default = "default_magnifier_factor")]
    pub magnifier_factor: f64,
    #[serde(default = "default_wheel_units_per_notch")]
    pub wheel_units_per_notch: f64,
    #[serde(default = "default_zoomer_x_modifier")]
    pub zoomer_x_modifier: Modifier,
    #[serde(default = "default_zoomer_y_modifier")]
    pub zoomer_y_modifier: Modifier,
    #[serde(default = "default_zoomer_xy_modifier")]
    pub zoomer_xy_modifier: Modifier,
    #[serde(default = "default_pan_modifier")]
    pub pan_modifier: Option<Modifier>,
    #[serde(default = "default_zoom_modifier")]
    pub zoom_modifier: Option<Modifier>,
    #[serde(default)]
    pub style: NavigationStyle,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            history_enabled: true,
            auto_base_enabled: true,
            reset_on_new_base: true,
            bounded: true,
            zoomer_enabled: true,
            magnifier_enabled: true,
            x_axes_enabled: true,
            y_axes_enabled: true,
            reset_affordance_enabled: true,
            history_limit: default_history_limit(),
            min_zoom_px: default_min_zoom_px(),
            magnifier_factor: default_magnifier_factor(),
            wheel_units_per_notch: default_wheel_units_per_notch(),
            zoomer_x_modifier: default_zoomer_x_modifier(),
            zoomer_y_modifier: default_zoomer_y_modifier(),
            zoomer_xy_modifier: default_zoomer_xy_modifier(),
            pan_modifier: default_pan_modifier(),
            zoom_modifier: default_zoom_modifier(),
            style: NavigationStyle::default(),
        }
    }
}

impl NavigatorConfig {
    #[must_use]
    pub fn with_history(mut self, enabled: bool) -> Self {
        self.history_enabled = enabled;
        self
    }

    #[must_use]
    pub fn with_bounded(mut self, bounded: bool) -> Self {
        self.bounded = bounded;
        self
    }

    #[must_use]
    pub fn with_auto_base(mut self, enabled: bool, reset_on_new_base: bool) -> Self {
        self.auto_base_enabled = enabled;
        self.reset_on_new_base = reset_on_new_base;
        self
    }

    #[must_use]
    pub fn with_min_zoom_px(mut self, pixels: u32) -> Self {
        self.min_zoom_px = pixels;
        self
    }

    #[must_use]
    pub fn with_magnifier_factor(mut self, factor: f64) -> Self {
        self.magnifier_factor = factor;
        self
    }

    /// Checks numeric fields and returns the config unchanged when valid.
    pub fn validate(self) -> NavResult<Self> {
        if self.history_limit == 0 {
            return Err(NavError::InvalidData(
                "navigator history limit must be > 0".to_owned(),
            ));
        }
        if !self.magnifier_factor.is_finite() || self.magnifier_factor < 0.0 {
            return Err(NavError::InvalidData(
                "magnifier factor must be finite and >= 0".to_owned(),
            ));
        }
        if !self.wheel_units_per_notch.is_finite() || self.wheel_units_per_notch <= 0.0 {
            return Err(NavError::InvalidData(
                "wheel units per notch must be finite and > 0".to_owned(),
            ));
        }
        self.style.rubber_band_valid.validate()?;
        self.style.rubber_band_invalid.validate()?;
        Ok(self)
    }
}

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_min_zoom_px() -> u32 {
    DEFAULT_MIN_ZOOM_PX
}

fn default_magnifier_factor() -> f64 {
    DEFAULT_MAGNIFIER_FACTOR
}

fn default_wheel_units_per_notch() -> f64 {
    WHEEL_UNITS_PER_NOTCH
}

fn default_zoomer_x_modifier() -> Modifier {
    Modifier::Shift
}

fn default_zoomer_y_modifier() -> Modifier {
    Modifier::Control
}

fn default_zoomer_xy_modifier() -> Modifier {
    Modifier::NoModifier
}

fn default_pan_modifier() -> Option<Modifier> {
    Some(Modifier::Shift)
}

fn default_zoom_modifier() -> Option<Modifier> {
    Some(Modifier::NoModifier)
}

fn default_rubber_band_valid() -> Color {
    Color::rgba(0.28, 0.6, 0.95, 0.35)
}

fn default_rubber_band_invalid() -> Color {
    Color::rgba(0.9, 0.25, 0.2, 0.35)
}
