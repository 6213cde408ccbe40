#![doc = "Gerrymandering detection by ensemble sampling of districting plans"]
mod analysis;
mod audit;
mod chain;
mod config;
mod error;
mod graph;
mod partition;
mod plan;

#[doc(inline)]
pub use analysis::{
    Classification, DiagnosticThresholds, Diagnostics, DistrictStats, EnsembleRecord, HistogramBin,
    OutcomeAnalysis, OutcomeStatistic, Summary, Thresholds, percentile,
};

#[doc(inline)]
pub use audit::{AuditReport, audit, outcome_of};

#[doc(inline)]
pub use chain::{ChainParams, ChainState, ChainStats, MarkovChain, ProposalKind, Rejection, RejectionCounts, StepOutcome};

#[doc(inline)]
pub use config::{Config, SeedFrom};

#[doc(inline)]
pub use error::{Error, GraphError, PlanError};

#[doc(inline)]
pub use graph::{AttributeRoles, Graph, GraphBuilder, RawUnit, UnitRecord};

#[doc(inline)]
pub use partition::Partition;

#[doc(inline)]
pub use plan::Plan;
