use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};

/// Anything that can answer "what is the trace's value at `x`?".
pub trait TraceSource {
    /// Interpolated value at `x`, or `None` outside the sampled range.
    fn value_at(&self, x: f64) -> Option<f64>;
}

/// Sample series with strictly increasing `x` values.
///
/// Deserialization runs the same checks as [`SampleSeries::new`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RawSampleSeries")]
pub struct SampleSeries {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

#[derive(Deserialize)]
struct RawSampleSeries {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl TryFrom<RawSampleSeries> for SampleSeries {
    type Error = NavError;

    fn try_from(raw: RawSampleSeries) -> NavResult<Self> {
        Self::new(raw.xs, raw.ys)
    }
}

impl SampleSeries {
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> NavResult<Self> {
        if xs.len() != ys.len() {
            return Err(NavError::InvalidData(format!(
                "sample series length mismatch: {} x values, {} y values",
                xs.len(),
                ys.len()
            )));
        }
        if xs.iter().chain(&ys).any(|value| !value.is_finite()) {
            return Err(NavError::InvalidData(
                "sample values must be finite".to_owned(),
            ));
        }
        if xs.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(NavError::InvalidData(
                "sample x values must be strictly increasing".to_owned(),
            ));
        }
        Ok(Self { xs, ys })
    }

    /// Builds a uniformly sampled series starting at `x0`.
    pub fn uniform(x0: f64, step: f64, ys: Vec<f64>) -> NavResult<Self> {
        if !step.is_finite() || step <= 0.0 {
            return Err(NavError::InvalidData(
                "sample step must be finite and > 0".to_owned(),
            ));
        }
        let xs = (0..ys.len()).map(|i| x0 + step * i as f64).collect();
        Self::new(xs, ys)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.xs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    #[must_use]
    pub fn x_range(&self) -> Option<(f64, f64)> {
        Some((*self.xs.first()?, *self.xs.last()?))
    }
}

impl TraceSource for SampleSeries {
    fn value_at(&self, x: f64) -> Option<f64> {
        let (first, last) = self.x_range()?;
        if !x.is_finite() || x < first || x > last {
            return None;
        }
        let upper = self.xs.partition_point(|sample| *sample < x);
        if upper == 0 {
            return self.ys.first().copied();
        }
        let (x0, x1) = (self.xs[upper - 1], self.xs[upper]);
        let (y0, y1) = (self.ys[upper - 1], self.ys[upper]);
        let t = (x - x0) / (x1 - x0);
        Some(y0 + t * (y1 - y0))
    }
}

#[cfg(test)]
mod tests {
    use super::{SampleSeries, TraceSource};

    #[test]
    fn interpolates_between_samples() {
        let series = SampleSeries::new(vec![0.0, 1.0, 3.0], vec![0.0, 10.0, 30.0]).expect("series");
        assert_eq!(series.value_at(0.5), Some(5.0));
        assert_eq!(series.value_at(2.0), Some(20.0));
        assert_eq!(series.value_at(3.0), Some(30.0));
        assert_eq!(series.value_at(0.0), Some(0.0));
    }

    #[test]
    fn outside_range_and_empty_are_none() {
        let series = SampleSeries::uniform(0.0, 1.0, vec![1.0, 2.0]).expect("series");
        assert!(series.value_at(-0.1).is_none());
        assert!(series.value_at(1.5).is_none());
        assert!(SampleSeries::default().value_at(0.0).is_none());
    }

    #[test]
    fn unsorted_samples_are_rejected() {
        assert!(SampleSeries::new(vec![0.0, 0.0], vec![1.0, 2.0]).is_err());
        assert!(SampleSeries::new(vec![0.0], vec![]).is_err());
    }

    #[test]
    fn deserialization_rejects_what_new_rejects() {
        let mismatched = serde_json::from_str::<SampleSeries>(r#"{"xs":[0.0,1.0],"ys":[5.0]}"#);
        assert!(mismatched.is_err());
        let unsorted = serde_json::from_str::<SampleSeries>(r#"{"xs":[1.0,0.0],"ys":[5.0,6.0]}"#);
        assert!(unsorted.is_err());

        let series: SampleSeries =
            serde_json::from_str(r#"{"xs":[0.0,1.0],"ys":[5.0,7.0]}"#).expect("valid series");
        assert_eq!(series.value_at(0.5), Some(6.0));
    }
}
