mod cut_edges;
mod partition_set;

pub(crate) use cut_edges::CutEdgeSet;
pub(crate) use partition_set::PartitionSet;
