mod chain;
mod constraints;
mod proposal;

pub use chain::{ChainParams, ChainState, ChainStats, MarkovChain, RejectionCounts, StepOutcome};
pub use constraints::Rejection;
pub use proposal::ProposalKind;
pub(crate) use constraints::ConstraintChecker;
pub(crate) use proposal::{Proposal, ProposalGenerator};
