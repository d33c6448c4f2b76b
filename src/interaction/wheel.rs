/// Device units reported for one wheel notch (15 degrees).
pub const WHEEL_UNITS_PER_NOTCH: f64 = 120.0;

/// Converts a wheel rotation into a magnifier factor.
///
/// `factor = base^(|delta| / units_per_notch)`; rotating away from the user
/// (`delta > 0`) yields the base power (zoom in for `base < 1`), rotating
/// towards the user yields its reciprocal. Returns `None` when the rotation
/// or the base make the gesture meaningless.
#[must_use]
pub fn resolve_wheel_factor(wheel_delta: f64, base: f64, units_per_notch: f64) -> Option<f64> {
    if wheel_delta == 0.0 || !wheel_delta.is_finite() {
        return None;
    }
    if base == 0.0 || !base.is_finite() || !units_per_notch.is_finite() || units_per_notch <= 0.0 {
        return None;
    }

    let factor = base.powf(wheel_delta.abs() / units_per_notch);
    let factor = if wheel_delta > 0.0 { factor } else { 1.0 / factor };
    (factor.is_finite() && factor > 0.0).then_some(factor)
}

#[cfg(test)]
mod tests {
    use super::{WHEEL_UNITS_PER_NOTCH, resolve_wheel_factor};

    #[test]
    fn zero_delta_returns_none() {
        assert!(resolve_wheel_factor(0.0, 0.95, WHEEL_UNITS_PER_NOTCH).is_none());
    }

    #[test]
    fn forward_notch_uses_base() {
        let factor = resolve_wheel_factor(120.0, 0.95, WHEEL_UNITS_PER_NOTCH).expect("factor");
        assert!((factor - 0.95).abs() <= 1e-12);
    }

    #[test]
    fn backward_two_notches_inverts() {
        let factor = resolve_wheel_factor(-240.0, 0.9, WHEEL_UNITS_PER_NOTCH).expect("factor");
        assert!((factor - 1.0 / 0.81).abs() <= 1e-12);
    }

    #[test]
    fn zero_base_disables_wheel() {
        assert!(resolve_wheel_factor(120.0, 0.0, WHEEL_UNITS_PER_NOTCH).is_none());
    }
}
