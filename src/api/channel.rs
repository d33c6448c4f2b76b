use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::AxisId;
use crate::extensions::{SampleSeries, TraceSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelId(pub u32);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

/// What a channel's samples represent. Resolved once when the channel is
/// created; navigation and readouts branch on it instead of inspecting the
/// channel at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    /// Amplitude over time.
    Time,
    /// Magnitude spectrum over frequency.
    Fft,
    /// One signal plotted against another.
    Xy,
}

impl ChannelKind {
    /// Default `(x, y)` units for a freshly created channel.
    #[must_use]
    pub const fn default_units(self) -> (&'static str, &'static str) {
        match self {
            Self::Time => ("s", "V"),
            Self::Fft => ("Hz", "dB"),
            Self::Xy => ("V", "V"),
        }
    }

    /// Horizontal cursor readouts show `1/|Δx|` only where x is time.
    #[must_use]
    pub const fn has_reciprocal_readout(self) -> bool {
        matches!(self, Self::Time)
    }
}

/// One plotted trace and the pair of axes it is drawn against.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotChannel {
    id: ChannelId,
    name: String,
    kind: ChannelKind,
    x_axis: AxisId,
    y_axis: AxisId,
    samples: SampleSeries,
}

impl PlotChannel {
    #[must_use]
    pub fn new(
        id: ChannelId,
        name: impl Into<String>,
        kind: ChannelKind,
        x_axis: AxisId,
        y_axis: AxisId,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            x_axis,
            y_axis,
            samples: SampleSeries::default(),
        }
    }

    #[must_use]
    pub fn with_samples(mut self, samples: SampleSeries) -> Self {
        self.samples = samples;
        self
    }

    #[must_use]
    pub fn id(&self) -> ChannelId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> ChannelKind {
        self.kind
    }

    #[must_use]
    pub fn x_axis(&self) -> AxisId {
        self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> AxisId {
        self.y_axis
    }

    #[must_use]
    pub fn axes(&self) -> [AxisId; 2] {
        [self.x_axis, self.y_axis]
    }

    #[must_use]
    pub fn samples(&self) -> &SampleSeries {
        &self.samples
    }

    pub fn set_samples(&mut self, samples: SampleSeries) {
        self.samples = samples;
    }

    #[must_use]
    pub fn references_axis(&self, axis: AxisId) -> bool {
        self.x_axis == axis || self.y_axis == axis
    }
}

impl TraceSource for PlotChannel {
    fn value_at(&self, x: f64) -> Option<f64> {
        self.samples.value_at(x)
    }
}
