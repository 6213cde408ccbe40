use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{analysis::EnsembleRecord, error::Error};

/// Midpoint percentile rank of `actual` within `values`, in `[0, 100]`:
/// `(below + equal / 2) / n * 100`. An empty ensemble ranks at 50.
pub fn percentile(values: &[f64], actual: f64) -> f64 {
    if values.is_empty() { return 50.0 }

    let below = values.iter().filter(|&&v| v < actual).count();
    let equal = values.iter().filter(|&&v| v == actual).count();
    (below as f64 + 0.5 * equal as f64) / values.len() as f64 * 100.0
}

/// Percentile cut-offs for calling a plan an outlier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub lower: f64,
    pub upper: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { lower: 5.0, upper: 95.0 }
    }
}

impl Thresholds {
    pub fn validate(&self) -> Result<(), Error> {
        if !(0.0..=100.0).contains(&self.lower) || !(0.0..=100.0).contains(&self.upper) {
            return Err(Error::config(format!("thresholds must lie in [0, 100], got {} and {}", self.lower, self.upper)));
        }
        if self.lower >= self.upper {
            return Err(Error::config(format!("lower threshold {} must be below upper threshold {}", self.lower, self.upper)));
        }
        Ok(())
    }

    pub fn classify(&self, percentile: f64) -> Classification {
        if percentile < self.lower { Classification::Low }
        else if percentile > self.upper { Classification::High }
        else { Classification::Normal }
    }
}

/// Where the actual plan falls relative to the ensemble.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Low,
    Normal,
    High,
}

impl Classification {
    #[inline] pub fn is_outlier(&self) -> bool { *self != Classification::Normal }
}

/// Count of ensemble plans sharing one outcome value.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HistogramBin {
    pub value: f64,
    pub count: usize,
}

/// Distribution summary of an ensemble.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Summary {
    pub n: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    /// Distinct values in increasing order.
    pub histogram: Vec<HistogramBin>,
    /// Standard score of the actual value; 0 when the ensemble has no spread.
    pub z_score: f64,
}

impl Summary {
    pub fn of(values: &[f64], actual: f64) -> Self {
        let n = values.len();
        if n == 0 {
            return Self { n, mean: 0.0, std_dev: 0.0, min: 0.0, max: 0.0, histogram: Vec::new(), z_score: 0.0 };
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let std_dev = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n as f64).sqrt();

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);
        let mut histogram = Vec::<HistogramBin>::new();
        for value in sorted.iter().copied() {
            match histogram.last_mut() {
                Some(bin) if bin.value == value => bin.count += 1,
                _ => histogram.push(HistogramBin { value, count: 1 }),
            }
        }

        Self {
            n,
            mean,
            std_dev,
            min: sorted[0],
            max: sorted[n - 1],
            histogram,
            z_score: if std_dev > 0.0 { (actual - mean) / std_dev } else { 0.0 },
        }
    }
}

/// Percentile, verdict and summary for one ensemble.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OutcomeAnalysis {
    pub statistic: String,
    pub actual: f64,
    pub percentile: f64,
    pub classification: Classification,
    pub summary: Summary,
}

impl OutcomeAnalysis {
    pub fn of(record: &EnsembleRecord, thresholds: &Thresholds) -> Self {
        let percentile = percentile(record.values(), record.actual());
        let classification = thresholds.classify(percentile);
        let summary = Summary::of(record.values(), record.actual());

        info!(
            statistic = record.statistic(),
            actual = record.actual(),
            percentile,
            ?classification,
            mean = summary.mean,
            "analyzed ensemble"
        );

        Self { statistic: record.statistic().to_string(), actual: record.actual(), percentile, classification, summary }
    }
}
