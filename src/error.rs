use thiserror::Error;

/// Failures surfaced to the caller. Rejected proposals and missing proposals
/// are ordinary chain outcomes and never appear here.
#[derive(Debug, Error)]
pub enum Error {
    /// The input adjacency structure cannot be analyzed.
    #[error("invalid graph: {0}")]
    GraphInvalid(#[from] GraphError),

    /// No population-balanced spanning-tree cut was found within the retry budget.
    /// Recoverable: retry with a larger tolerance or another seed.
    #[error("no balanced cut into {districts} districts within tolerance {tolerance} after {attempts} attempts")]
    PartitionInfeasible { districts: u32, tolerance: f64, attempts: usize },

    /// An externally supplied plan does not describe a usable partition.
    #[error("invalid plan: {0}")]
    PlanInvalid(#[from] PlanError),

    /// Configuration values out of range.
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),
}

impl Error {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Error::ConfigInvalid(message.into())
    }

    /// Returns true if the caller may retry with different parameters.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::PartitionInfeasible { .. })
    }
}

/// Specific condition that made a graph unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("graph has no units")]
    Empty,

    #[error("unit '{0}' is listed more than once")]
    DuplicateUnit(String),

    #[error("unit '{unit}' lists unknown neighbor '{neighbor}'")]
    UnknownNeighbor { unit: String, neighbor: String },

    #[error("unit '{0}' lists itself as a neighbor")]
    SelfLoop(String),

    #[error("adjacency is asymmetric: '{a}' lists '{b}' but not the reverse")]
    Asymmetric { a: String, b: String },

    #[error("unit '{unit}' has no attribute '{key}'")]
    MissingAttribute { unit: String, key: String },

    #[error("unit '{unit}' has a negative or non-integral value for '{key}'")]
    InvalidAttribute { unit: String, key: String },

    #[error("unit '{unit}' reports votes for untracked party '{party}'")]
    UnknownParty { unit: String, party: String },

    #[error("graph is disconnected: {components} components, largest has {largest} units")]
    Disconnected { components: usize, largest: usize },
}

/// Specific condition that made a supplied plan unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("a plan needs at least one district")]
    NoDistricts,

    #[error("unit '{0}' has no district")]
    Unassigned(String),

    #[error("plan assigns unknown unit '{0}'")]
    UnknownUnit(String),

    #[error("unit '{unit}' is assigned district {district}, outside 1..={num_districts}")]
    DistrictOutOfRange { unit: String, district: u32, num_districts: u32 },

    #[error("district {0} has no units")]
    EmptyDistrict(u32),

    #[error("district {district} is split into {components} pieces")]
    NonContiguous { district: u32, components: usize },

    #[error("district {district} has population {population}, outside [{min:.1}, {max:.1}]")]
    Unbalanced { district: u32, population: u64, min: f64, max: f64 },
}
