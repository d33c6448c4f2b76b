use serde::{Deserialize, Serialize};

pub const DEFAULT_READOUT_PRECISION: usize = 3;

const SI_PREFIXES: [(f64, &str); 9] = [
    (1e12, "T"),
    (1e9, "G"),
    (1e6, "M"),
    (1e3, "k"),
    (1.0, ""),
    (1e-3, "m"),
    (1e-6, "µ"),
    (1e-9, "n"),
    (1e-12, "p"),
];

/// Formats values with an SI prefix and unit, e.g. `1.250 ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFormatter {
    units: String,
    precision: usize,
}

impl Default for ValueFormatter {
    fn default() -> Self {
        Self::new("", DEFAULT_READOUT_PRECISION)
    }
}

impl ValueFormatter {
    #[must_use]
    pub fn new(units: impl Into<String>, precision: usize) -> Self {
        Self {
            units: units.into(),
            precision,
        }
    }

    #[must_use]
    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn set_units(&mut self, units: impl Into<String>) {
        self.units = units.into();
    }

    #[must_use]
    pub fn precision(&self) -> usize {
        self.precision
    }

    /// Formatter for `1/x` quantities of this one. Seconds become hertz.
    #[must_use]
    pub fn reciprocal(&self) -> Self {
        let units = match self.units.as_str() {
            "s" => "Hz".to_owned(),
            "" => String::new(),
            other => format!("1/{other}"),
        };
        Self::new(units, self.precision)
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        if !value.is_finite() {
            return "--".to_owned();
        }
        let magnitude = value.abs();
        let (scale, prefix) = if magnitude == 0.0 {
            (1.0, "")
        } else {
            SI_PREFIXES
                .iter()
                .copied()
                .find(|(scale, _)| magnitude >= *scale * (1.0 - 1e-9))
                .unwrap_or(SI_PREFIXES[SI_PREFIXES.len() - 1])
        };
        let number = format!("{:.*}", self.precision, value / scale);
        let unit = format!("{prefix}{}", self.units);
        if unit.is_empty() {
            number
        } else {
            format!("{number} {unit}")
        }
    }
}

/// Text of one cursor pair's readout block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairReadout {
    pub first: String,
    pub second: String,
    pub delta: String,
    /// `1/|Δ|`, present for horizontal pairs over time.
    pub reciprocal: Option<String>,
}

/// Readout panel state for both cursor pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorReadouts {
    horizontal: ValueFormatter,
    vertical: ValueFormatter,
    show_reciprocal: bool,
    draggable: bool,
}

impl Default for CursorReadouts {
    fn default() -> Self {
        Self {
            horizontal: ValueFormatter::default(),
            vertical: ValueFormatter::default(),
            show_reciprocal: true,
            draggable: false,
        }
    }
}

impl CursorReadouts {
    #[must_use]
    pub fn new(precision: usize, draggable: bool) -> Self {
        Self {
            horizontal: ValueFormatter::new("", precision),
            vertical: ValueFormatter::new("", precision),
            show_reciprocal: true,
            draggable,
        }
    }

    /// Points the readouts at a newly selected channel.
    pub fn retarget(&mut self, x_units: &str, y_units: &str, show_reciprocal: bool) {
        self.horizontal.set_units(x_units);
        self.vertical.set_units(y_units);
        self.show_reciprocal = show_reciprocal;
    }

    #[must_use]
    pub fn horizontal_formatter(&self) -> &ValueFormatter {
        &self.horizontal
    }

    #[must_use]
    pub fn vertical_formatter(&self) -> &ValueFormatter {
        &self.vertical
    }

    #[must_use]
    pub fn shows_reciprocal(&self) -> bool {
        self.show_reciprocal
    }

    #[must_use]
    pub fn is_draggable(&self) -> bool {
        self.draggable
    }

    pub fn set_draggable(&mut self, draggable: bool) {
        self.draggable = draggable;
    }

    #[must_use]
    pub fn horizontal(&self, first: f64, second: f64) -> PairReadout {
        let delta = second - first;
        let reciprocal = self.show_reciprocal.then(|| {
            let formatter = self.horizontal.reciprocal();
            if delta == 0.0 {
                formatter.format(f64::INFINITY)
            } else {
                formatter.format(1.0 / delta.abs())
            }
        });
        PairReadout {
            first: self.horizontal.format(first),
            second: self.horizontal.format(second),
            delta: self.horizontal.format(delta),
            reciprocal,
        }
    }

    #[must_use]
    pub fn vertical(&self, first: f64, second: f64) -> PairReadout {
        PairReadout {
            first: self.vertical.format(first),
            second: self.vertical.format(second),
            delta: self.vertical.format(second - first),
            reciprocal: None,
        }
    }
}
