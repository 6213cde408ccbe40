use serde::Serialize;

use crate::{chain::Proposal, partition::{Partition, tree::Balance}};

/// Why a proposal was turned down. Rejections are ordinary chain outcomes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    /// The unit already lies in the target district.
    SameDistrict,
    /// The move would leave a district with no units.
    EmptiesDistrict,
    /// A district would leave the population bounds.
    Population,
    /// The losing district would split into several pieces.
    Contiguity,
    /// The merged districts had no balanced spanning-tree cut.
    NoBalancedCut,
}

/// Decides whether a proposal keeps a partition valid. Never mutates.
#[derive(Clone, Copy, Debug)]
pub(crate) struct ConstraintChecker {
    balance: Balance,
}

impl ConstraintChecker {
    pub(crate) fn new(ideal: f64, tolerance: f64) -> Self {
        Self { balance: Balance { ideal, tolerance } }
    }

    /// Check the cheap rules first: degenerate move, then population, then contiguity.
    pub(crate) fn check(&self, partition: &Partition, proposal: &Proposal) -> Result<(), Rejection> {
        match proposal {
            &Proposal::Flip { unit, from, to } => self.check_flip(partition, unit, from, to),
            Proposal::Recombine { first, second, .. } => self.check_pieces(partition, first, second),
            Proposal::Unsplittable { .. } => Err(Rejection::NoBalancedCut),
        }
    }

    fn check_flip(&self, partition: &Partition, unit: usize, from: u32, to: u32) -> Result<(), Rejection> {
        if from == to { return Err(Rejection::SameDistrict) }
        if partition.district_size(from) <= 1 { return Err(Rejection::EmptiesDistrict) }

        let population = partition.graph().population(unit);
        let losing = partition.district_population(from) - population;
        let gaining = partition.district_population(to) + population;
        if !self.balance.accepts(losing, 1) || !self.balance.accepts(gaining, 1) {
            return Err(Rejection::Population);
        }

        if !partition.remains_contiguous_without(unit) { return Err(Rejection::Contiguity) }
        Ok(())
    }

    fn check_pieces(&self, partition: &Partition, first: &[usize], second: &[usize]) -> Result<(), Rejection> {
        if first.is_empty() || second.is_empty() { return Err(Rejection::EmptiesDistrict) }

        let graph = partition.graph();
        let population = |piece: &[usize]| piece.iter().map(|&u| graph.population(u)).sum::<u64>();
        if !self.balance.accepts(population(first), 1) || !self.balance.accepts(population(second), 1) {
            return Err(Rejection::Population);
        }

        if !graph.is_connected_within(first) || !graph.is_connected_within(second) {
            return Err(Rejection::Contiguity);
        }
        Ok(())
    }
}
