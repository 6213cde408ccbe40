mod diagnostics;
mod ensemble;
mod outcome;
mod statistic;

pub use diagnostics::{DiagnosticThresholds, Diagnostics, DistrictStats};
pub use ensemble::EnsembleRecord;
pub use outcome::{Classification, HistogramBin, OutcomeAnalysis, Summary, Thresholds, percentile};
pub use statistic::OutcomeStatistic;
pub(crate) use diagnostics::DistrictAccumulator;
pub(crate) use statistic::BoundStatistic;
