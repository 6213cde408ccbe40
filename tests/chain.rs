mod common;

use gerrysample::{ChainParams, ChainState, MarkovChain, Partition, Plan, ProposalKind, Rejection, StepOutcome};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use common::{grid, strips};

fn start(width: usize, height: usize, districts: u32) -> Partition {
    Plan::from_assignments(grid(width, height, 10), districts, strips(width, height, districts as usize))
        .unwrap()
        .into_partition()
}

fn params(total_steps: usize, tolerance: f64, proposal: ProposalKind) -> ChainParams {
    ChainParams { total_steps, tolerance, proposal, max_tree_attempts: 200, log_every: 0 }
}

#[test]
fn flip_chain_keeps_every_plan_valid() {
    let mut chain = MarkovChain::new(start(6, 6, 3), params(1000, 0.2, ProposalKind::Flip), ChaCha8Rng::seed_from_u64(42));
    chain.run_with(|step, partition, _| {
        assert!(partition.check_contiguity(), "split district at step {step}");
        assert!(partition.is_valid(0.2), "invalid plan at step {step}: {:?}", partition.validate(0.2));
        assert!(partition.verify_aggregates(), "stale tallies at step {step}");
    });
    assert!(chain.stats().accepted > 0);
}

#[test]
fn recom_chain_keeps_every_plan_valid() {
    let mut chain = MarkovChain::new(start(6, 6, 3), params(100, 0.2, ProposalKind::Recom), ChaCha8Rng::seed_from_u64(42));
    chain.run_with(|step, partition, _| {
        assert!(partition.is_valid(0.2), "invalid plan at step {step}: {:?}", partition.validate(0.2));
        assert!(partition.verify_aggregates(), "stale tallies at step {step}");
    });
    assert!(chain.stats().accepted > 0);
}

/// Path of `assignment.len()` units with the given districts, not checked for contiguity.
fn path_plan(assignment: &[u32]) -> Partition {
    let districts = *assignment.iter().max().unwrap();
    let units = assignment.iter().enumerate().map(|(c, &d)| (format!("r0c{c}"), d));
    Plan::from_assignments(grid(assignment.len(), 1, 10), districts, units).unwrap().into_partition()
}

#[test]
fn recom_from_split_districts_rejects_instead_of_failing() {
    // Every pair of adjacent districts merges into a disconnected set.
    let start = path_plan(&[1, 2, 1, 3, 3, 2]);
    let before = start.assignments().to_vec();
    let mut chain = MarkovChain::new(start, params(50, 0.5, ProposalKind::Recom), ChaCha8Rng::seed_from_u64(0));
    chain.run_with(|step, _, outcome| {
        assert_eq!(outcome, StepOutcome::Rejected(Rejection::NoBalancedCut), "step {step}");
    });
    assert_eq!(chain.state(), ChainState::Completed);
    assert_eq!(chain.stats().rejected.no_balanced_cut, 50);
    assert_eq!(chain.partition().assignments(), &before[..]);
}

#[test]
fn recom_from_split_district_with_two_unit_pieces_terminates() {
    // District 1 is {0, 1} and {5, 6}; merged with district 2 it stays in two pieces.
    let start = path_plan(&[1, 1, 2, 3, 3, 1, 1]);
    let mut chain = MarkovChain::new(start, params(60, 0.9, ProposalKind::Recom), ChaCha8Rng::seed_from_u64(3));
    chain.run(|p| p.num_cut_edges() as f64);
    assert_eq!(chain.state(), ChainState::Completed);
    assert_eq!(chain.stats().steps, 60);
    assert!(chain.partition().verify_aggregates());
}

#[test]
fn self_loops_leave_the_plan_identical() {
    let mut chain = MarkovChain::new(start(4, 4, 2), params(300, 0.1, ProposalKind::Flip), ChaCha8Rng::seed_from_u64(5));
    for _ in 0..300 {
        let before = chain.partition().clone();
        let outcome = chain.step();
        if outcome != StepOutcome::Accepted {
            let after = chain.partition();
            assert_eq!(before.assignments(), after.assignments());
            assert_eq!(before.cut_edges(), after.cut_edges());
            for d in 1..=2 {
                assert_eq!(before.district_population(d), after.district_population(d));
                assert_eq!(before.district_votes(d, 0), after.district_votes(d, 0));
            }
        }
    }
}

#[test]
fn same_seed_reproduces_the_run() {
    let run = |seed: u64| {
        let mut chain = MarkovChain::new(start(6, 6, 3), params(500, 0.2, ProposalKind::Flip), ChaCha8Rng::seed_from_u64(seed));
        let values = chain.run(|p| p.wins(0) as f64);
        (values, chain.partition().assignments().to_vec())
    };
    assert_eq!(run(9), run(9));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn incremental_tallies_match_recomputation(seed in any::<u64>(), steps in 1usize..200) {
        let mut chain = MarkovChain::new(start(5, 4, 2), params(steps, 0.3, ProposalKind::Flip), ChaCha8Rng::seed_from_u64(seed));
        chain.run_with(|_, _, _| {});
        prop_assert!(chain.partition().verify_aggregates());
        prop_assert!(chain.partition().is_valid(0.3));
    }
}
