use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::partition::{Partition, tree::{Balance, CutChoice, bipartition_tree}};

/// Move set driving the chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalKind {
    /// Reassign one boundary unit to the district across a cut edge.
    #[default]
    Flip,
    /// Merge two adjacent districts and redraw them from a balanced spanning-tree cut.
    Recom,
}

/// A candidate edit to the current partition. Proposals are never validated here.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Proposal {
    /// Move `unit` from district `from` to district `to`.
    Flip { unit: usize, from: u32, to: u32 },
    /// Replace districts `districts.0` and `districts.1` with `first` and `second`.
    Recombine { districts: (u32, u32), first: Vec<usize>, second: Vec<usize> },
    /// The merged districts had no balanced cut within the retry budget.
    Unsplittable { districts: (u32, u32) },
}

impl Proposal {
    /// Apply an accepted proposal in place.
    pub(crate) fn apply(&self, partition: &mut Partition) {
        match self {
            Proposal::Flip { unit, to, .. } => partition.move_unit(*unit, *to),
            Proposal::Recombine { districts, first, second } => partition.recombine_districts(*districts, first, second),
            Proposal::Unsplittable { .. } => {}
        }
    }
}

/// Draws proposals of one kind from a partition.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ProposalGenerator {
    kind: ProposalKind,
    balance: Balance,
    max_attempts: usize,
}

impl ProposalGenerator {
    /// `ideal` and `tolerance` bound the pieces of a recombination; flips ignore them.
    pub(crate) fn new(kind: ProposalKind, ideal: f64, tolerance: f64, max_attempts: usize) -> Self {
        Self { kind, balance: Balance { ideal, tolerance }, max_attempts }
    }

    #[inline] pub(crate) fn kind(&self) -> ProposalKind { self.kind }

    /// Draw a proposal, or None when no edge crosses a district boundary.
    pub(crate) fn propose(&self, partition: &Partition, rng: &mut impl Rng) -> Option<Proposal> {
        match self.kind {
            ProposalKind::Flip => propose_flip(partition, rng),
            ProposalKind::Recom => self.propose_recom(partition, rng),
        }
    }

    /// Pick a random cut edge and redraw the two districts it joins.
    fn propose_recom(&self, partition: &Partition, rng: &mut impl Rng) -> Option<Proposal> {
        let (u, v) = partition.graph().edge_endpoints(partition.random_cut_edge(rng)?);
        let districts = (partition.assignment(u), partition.assignment(v));
        let units = partition.merged_units(districts.0, districts.1);

        Some(match bipartition_tree(partition.graph(), &units, (1, 1), self.balance, self.max_attempts, CutChoice::Random, rng) {
            Some((first, second)) => Proposal::Recombine { districts, first, second },
            None => Proposal::Unsplittable { districts },
        })
    }
}

/// Pick a uniformly random cut edge, then one of its endpoints to move across it.
pub(crate) fn propose_flip(partition: &Partition, rng: &mut impl Rng) -> Option<Proposal> {
    let (u, v) = partition.graph().edge_endpoints(partition.random_cut_edge(rng)?);
    let (unit, other) = if rng.random_bool(0.5) { (u, v) } else { (v, u) };
    Some(Proposal::Flip { unit, from: partition.assignment(unit), to: partition.assignment(other) })
}
