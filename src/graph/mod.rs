mod builder;
mod graph;
mod weights;

pub use builder::{AttributeRoles, GraphBuilder, RawUnit, UnitRecord};
pub use graph::Graph;
pub(crate) use weights::WeightMatrix;
