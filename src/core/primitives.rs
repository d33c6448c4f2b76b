/// Relative float comparison used to suppress notifications caused by
/// floating-point noise. Values within `1e-12` relative distance compare equal;
/// exact zeros need an exact match on the other side.
#[must_use]
pub fn fuzzy_eq(a: f64, b: f64) -> bool {
    if a == b {
        return true;
    }
    if a == 0.0 || b == 0.0 {
        return (a - b).abs() <= f64::EPSILON * 1e-3;
    }
    (a - b).abs() * 1e12 <= a.abs().min(b.abs())
}
