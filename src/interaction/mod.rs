//! Input vocabulary and the two gesture interpreters (rectangle zoom and
//! wheel magnify/pan).

mod magnifier;
mod wheel;
mod zoomer;

use serde::{Deserialize, Serialize};

use crate::core::PixelPoint;

pub use magnifier::{DEFAULT_MAGNIFIER_FACTOR, Magnifier, MagnifierOutput, RESET_FACTOR};
pub use wheel::{WHEEL_UNITS_PER_NOTCH, resolve_wheel_factor};
pub use zoomer::{DEFAULT_MIN_ZOOM_PX, RubberBand, Zoomer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerButton {
    Left,
    Right,
    Middle,
}

/// A single keyboard modifier a gesture can be bound to.
///
/// `NoModifier` matches only when no modifier key is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    NoModifier,
    Shift,
    Control,
    Alt,
}

/// Modifier keys held while an input event was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyModifiers {
    pub shift: bool,
    pub control: bool,
    pub alt: bool,
}

impl KeyModifiers {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            shift: false,
            control: false,
            alt: false,
        }
    }

    #[must_use]
    pub const fn shift() -> Self {
        Self {
            shift: true,
            control: false,
            alt: false,
        }
    }

    #[must_use]
    pub const fn control() -> Self {
        Self {
            shift: false,
            control: true,
            alt: false,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        !self.shift && !self.control && !self.alt
    }

    #[must_use]
    pub const fn matches(self, modifier: Modifier) -> bool {
        match modifier {
            Modifier::NoModifier => self.is_empty(),
            Modifier::Shift => self.shift,
            Modifier::Control => self.control,
            Modifier::Alt => self.alt,
        }
    }
}

/// Raw wheel rotation in device units (usually multiples of 120 per notch).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    pub delta_x: f64,
    pub delta_y: f64,
    pub position: PixelPoint,
    pub modifiers: KeyModifiers,
}

impl WheelInput {
    #[must_use]
    pub fn vertical(delta_y: f64, position: PixelPoint, modifiers: KeyModifiers) -> Self {
        Self {
            delta_x: 0.0,
            delta_y,
            position,
            modifiers,
        }
    }

    /// The dominant rotation component.
    #[must_use]
    pub fn dominant_delta(self) -> f64 {
        if self.delta_x.abs() > self.delta_y.abs() {
            self.delta_x
        } else {
            self.delta_y
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyModifiers, Modifier, WheelInput};
    use crate::core::PixelPoint;

    #[test]
    fn no_modifier_binding_requires_bare_input() {
        assert!(KeyModifiers::none().matches(Modifier::NoModifier));
        assert!(!KeyModifiers::shift().matches(Modifier::NoModifier));
        assert!(KeyModifiers::shift().matches(Modifier::Shift));
        assert!(!KeyModifiers::control().matches(Modifier::Shift));
    }

    #[test]
    fn horizontal_rotation_wins_when_larger() {
        let input = WheelInput {
            delta_x: -240.0,
            delta_y: 120.0,
            position: PixelPoint::default(),
            modifiers: KeyModifiers::none(),
        };
        assert_eq!(input.dominant_delta(), -240.0);
    }
}
