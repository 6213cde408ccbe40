use std::sync::{Arc, atomic::{AtomicBool, Ordering}};

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::{
    chain::{ConstraintChecker, ProposalGenerator, ProposalKind, Rejection},
    partition::Partition,
};

/// Parameters of one chain run.
#[derive(Clone, Copy, Debug)]
pub struct ChainParams {
    pub total_steps: usize,
    pub tolerance: f64,
    pub proposal: ProposalKind,
    pub max_tree_attempts: usize,
    /// Progress is logged every this many steps; 0 disables progress logging.
    pub log_every: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainState {
    Running,
    Completed,
}

/// Result of a single step. Every variant counts as one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Accepted,
    Rejected(Rejection),
    /// No edge crossed a district boundary; the step is a self-loop.
    NoProposal,
}

/// Rejections tallied by reason.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RejectionCounts {
    pub same_district: usize,
    pub empties_district: usize,
    pub population: usize,
    pub contiguity: usize,
    pub no_balanced_cut: usize,
}

impl RejectionCounts {
    fn record(&mut self, rejection: Rejection) {
        match rejection {
            Rejection::SameDistrict => self.same_district += 1,
            Rejection::EmptiesDistrict => self.empties_district += 1,
            Rejection::Population => self.population += 1,
            Rejection::Contiguity => self.contiguity += 1,
            Rejection::NoBalancedCut => self.no_balanced_cut += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.same_district + self.empties_district + self.population + self.contiguity + self.no_balanced_cut
    }
}

/// Counters for a chain run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ChainStats {
    pub steps: usize,
    pub accepted: usize,
    pub rejected: RejectionCounts,
    pub no_proposal: usize,
}

impl ChainStats {
    /// Fraction of steps that changed the partition.
    pub fn acceptance_rate(&self) -> f64 {
        if self.steps == 0 { 0.0 } else { self.accepted as f64 / self.steps as f64 }
    }
}

/// Markov chain over valid plans: propose, check, accept every valid proposal.
///
/// Accepting every valid proposal without a Metropolis-Hastings ratio samples the plans
/// reachable under the move set, weighted by its local structure, rather than the uniform
/// distribution over all valid plans.
pub struct MarkovChain<R: Rng> {
    partition: Partition,
    generator: ProposalGenerator,
    checker: ConstraintChecker,
    params: ChainParams,
    stats: ChainStats,
    cancel: Option<Arc<AtomicBool>>,
    rng: R,
}

impl<R: Rng> MarkovChain<R> {
    /// Start a chain from a valid partition.
    pub fn new(partition: Partition, params: ChainParams, rng: R) -> Self {
        let ideal = partition.ideal_population();
        Self {
            generator: ProposalGenerator::new(params.proposal, ideal, params.tolerance, params.max_tree_attempts),
            checker: ConstraintChecker::new(ideal, params.tolerance),
            partition,
            params,
            stats: ChainStats::default(),
            cancel: None,
            rng,
        }
    }

    /// Stop between steps once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    #[inline] pub fn partition(&self) -> &Partition { &self.partition }

    #[inline] pub fn stats(&self) -> &ChainStats { &self.stats }

    #[inline] pub fn params(&self) -> &ChainParams { &self.params }

    #[inline]
    pub fn state(&self) -> ChainState {
        if self.stats.steps >= self.params.total_steps { ChainState::Completed } else { ChainState::Running }
    }

    #[inline]
    fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Take one step. A missing or rejected proposal leaves the partition untouched.
    pub fn step(&mut self) -> StepOutcome {
        self.stats.steps += 1;

        let Some(proposal) = self.generator.propose(&self.partition, &mut self.rng) else {
            self.stats.no_proposal += 1;
            return StepOutcome::NoProposal;
        };

        match self.checker.check(&self.partition, &proposal) {
            Ok(()) => {
                proposal.apply(&mut self.partition);
                self.stats.accepted += 1;
                StepOutcome::Accepted
            }
            Err(rejection) => {
                self.stats.rejected.record(rejection);
                StepOutcome::Rejected(rejection)
            }
        }
    }

    /// Run the remaining steps, recording `statistic` of the post-step partition each step.
    pub fn run<F>(&mut self, mut statistic: F) -> Vec<f64>
    where F: FnMut(&Partition) -> f64 {
        let mut values = Vec::with_capacity(self.params.total_steps.saturating_sub(self.stats.steps));
        self.run_with(|_, partition, _| values.push(statistic(partition)));
        values
    }

    /// Run the remaining steps, handing (step index, post-step partition, outcome) to `observer`.
    /// Returns early, between steps, if cancelled.
    pub fn run_with<F>(&mut self, mut observer: F) -> &ChainStats
    where F: FnMut(usize, &Partition, StepOutcome) {
        info!(
            steps = self.params.total_steps,
            proposal = ?self.generator.kind(),
            tolerance = self.params.tolerance,
            "starting chain"
        );

        while self.state() == ChainState::Running {
            if self.cancelled() {
                info!(step = self.stats.steps, "chain cancelled");
                break;
            }

            let outcome = self.step();
            let step = self.stats.steps - 1;
            debug!(step, ?outcome, "chain step");
            observer(step, &self.partition, outcome);

            if self.params.log_every > 0 && self.stats.steps % self.params.log_every == 0 {
                info!(
                    step = self.stats.steps,
                    accepted = self.stats.accepted,
                    rate = self.stats.acceptance_rate(),
                    cut_edges = self.partition.num_cut_edges(),
                    "chain progress"
                );
            }
        }

        info!(
            steps = self.stats.steps,
            accepted = self.stats.accepted,
            rejected = self.stats.rejected.total(),
            no_proposal = self.stats.no_proposal,
            "chain finished"
        );
        &self.stats
    }

    /// Consume the chain, returning its final partition and counters.
    pub fn into_parts(self) -> (Partition, ChainStats) {
        (self.partition, self.stats)
    }
}
