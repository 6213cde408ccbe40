use serde::Serialize;

/// Outcome values of the sampled plans, in chain order, plus the actual plan's value.
/// Appended to while the chain runs; read-only afterwards.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EnsembleRecord {
    statistic: String,
    actual: f64,
    values: Vec<f64>,
}

impl EnsembleRecord {
    pub(crate) fn new(statistic: impl Into<String>, actual: f64, capacity: usize) -> Self {
        Self { statistic: statistic.into(), actual, values: Vec::with_capacity(capacity) }
    }

    /// Build a finished record from existing values.
    pub fn from_values(statistic: impl Into<String>, actual: f64, values: Vec<f64>) -> Self {
        Self { statistic: statistic.into(), actual, values }
    }

    #[inline] pub(crate) fn push(&mut self, value: f64) { self.values.push(value) }

    /// Display name of the recorded statistic.
    #[inline] pub fn statistic(&self) -> &str { &self.statistic }

    /// Value of the actual plan.
    #[inline] pub fn actual(&self) -> f64 { self.actual }

    /// One value per chain step.
    #[inline] pub fn values(&self) -> &[f64] { &self.values }

    #[inline] pub fn len(&self) -> usize { self.values.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.values.is_empty() }
}
