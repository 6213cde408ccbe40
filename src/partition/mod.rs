mod algorithm;
mod contiguity;
mod metrics;
mod ops;
mod partition;
mod structures;
pub(crate) mod tree;
mod validation;

pub use partition::Partition;
pub(crate) use structures::{CutEdgeSet, PartitionSet};

#[cfg(test)]
pub(crate) use partition::tests;
