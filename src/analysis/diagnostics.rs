use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{analysis::Classification, graph::Graph, partition::Partition};

/// Cut-offs for the supplementary gerrymandering criteria.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticThresholds {
    /// Seat percentage minus vote percentage (absolute, in points) counted as a large gap.
    pub seats_votes_gap: f64,
    /// Winner's vote share above which a district counts as packed.
    pub packing_share: f64,
    /// Distance in seats between the actual plan and the ensemble mean counted as large.
    pub seat_difference: f64,
}

impl Default for DiagnosticThresholds {
    fn default() -> Self {
        Self { seats_votes_gap: 15.0, packing_share: 0.65, seat_difference: 2.0 }
    }
}

/// Per-district tallies, for the actual plan or averaged over the ensemble.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DistrictStats {
    pub district: u32,
    pub population: f64,
    /// Votes per tracked party, in graph party order.
    pub votes: Vec<f64>,
    /// Vote shares per tracked party.
    pub shares: Vec<f64>,
    /// Party with strictly more votes than every other party.
    pub winner: Option<String>,
    /// Winner's share minus runner-up's share.
    pub margin: f64,
}

impl DistrictStats {
    fn new(graph: &Graph, district: u32, population: f64, votes: Vec<f64>) -> Self {
        let total = votes.iter().sum::<f64>();
        let shares = votes.iter().map(|&v| if total > 0.0 { v / total } else { 0.0 }).collect::<Vec<_>>();

        let mut ranked = (0..votes.len()).collect::<Vec<_>>();
        ranked.sort_by(|&a, &b| votes[b].total_cmp(&votes[a]));
        let (winner, margin) = match ranked.as_slice() {
            [] => (None, 0.0),
            [only] => (Some(*only), shares[*only]),
            [first, second, ..] => {
                let winner = (votes[*first] > votes[*second]).then_some(*first);
                (winner, shares[*first] - shares[*second])
            }
        };

        Self { district, population, votes, shares, winner: winner.map(|p| graph.parties()[p].clone()), margin }
    }

    /// Tallies of every district of a partition.
    pub fn of_partition(partition: &Partition) -> Vec<Self> {
        let graph = partition.graph();
        (1..=partition.num_districts())
            .map(|d| {
                let votes = (0..graph.parties().len()).map(|p| partition.district_votes(d, p) as f64).collect();
                Self::new(graph, d, partition.district_population(d) as f64, votes)
            })
            .collect()
    }
}

/// Running per-district sums over the ensemble: column 0 population, then one column per party.
#[derive(Clone, Debug)]
pub(crate) struct DistrictAccumulator {
    sums: Array2<f64>,
    samples: usize,
}

impl DistrictAccumulator {
    pub(crate) fn new(num_districts: u32, num_parties: usize) -> Self {
        Self { sums: Array2::zeros((num_districts as usize, num_parties + 1)), samples: 0 }
    }

    /// Add one sampled plan.
    pub(crate) fn observe(&mut self, partition: &Partition) {
        for (row, d) in (1..=partition.num_districts()).enumerate() {
            self.sums[[row, 0]] += partition.district_population(d) as f64;
            for party in 0..self.sums.ncols() - 1 {
                self.sums[[row, party + 1]] += partition.district_votes(d, party) as f64;
            }
        }
        self.samples += 1;
    }

    /// Mean tallies per district id over all observed plans.
    pub(crate) fn averages(&self, graph: &Graph) -> Vec<DistrictStats> {
        let scale = if self.samples == 0 { 0.0 } else { 1.0 / self.samples as f64 };
        self.sums.rows().into_iter().enumerate()
            .map(|(row, sums)| {
                let votes = sums.iter().skip(1).map(|v| v * scale).collect();
                DistrictStats::new(graph, row as u32 + 1, sums[0] * scale, votes)
            })
            .collect()
    }
}

/// Supplementary criteria for the tracked party, combined with the percentile verdict.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnostics {
    /// Seat percentage minus vote percentage, per tracked party (points).
    pub seats_votes_gaps: Vec<(String, f64)>,
    pub large_seats_votes_gap: bool,
    /// Districts won with more than the packing share.
    pub packed_districts: Vec<u32>,
    /// Seats won by the tracked party in the actual plan.
    pub actual_seats: f64,
    /// Mean seats won by the tracked party over the ensemble.
    pub expected_seats: f64,
    pub seat_difference: f64,
    pub large_seat_difference: bool,
    pub percentile_outlier: bool,
    /// `outlier || (large gap && packing) || (large seat difference && large gap)`.
    pub flagged: bool,
}

impl Diagnostics {
    /// `expected_seats` is the ensemble mean of the tracked party's wins.
    pub(crate) fn assess(
        actual: &Partition,
        party: usize,
        expected_seats: f64,
        classification: Classification,
        thresholds: &DiagnosticThresholds,
    ) -> Self {
        let graph = actual.graph();
        let districts = actual.num_districts() as f64;

        let seats_votes_gaps = graph.parties().iter().enumerate()
            .map(|(p, label)| (label.clone(), actual.wins(p) as f64 / districts * 100.0 - actual.overall_vote_share(p) * 100.0))
            .collect::<Vec<_>>();
        let large_seats_votes_gap = seats_votes_gaps.iter().any(|(_, gap)| gap.abs() > thresholds.seats_votes_gap);

        let packed_districts = (1..=actual.num_districts())
            .filter(|&d| actual.district_winner(d).is_some_and(|w| actual.vote_share(d, w) > thresholds.packing_share))
            .collect::<Vec<_>>();

        let actual_seats = actual.wins(party) as f64;
        let seat_difference = (actual_seats - expected_seats).abs();
        let large_seat_difference = seat_difference >= thresholds.seat_difference;
        let percentile_outlier = classification.is_outlier();

        let flagged = percentile_outlier
            || (large_seats_votes_gap && !packed_districts.is_empty())
            || (large_seat_difference && large_seats_votes_gap);

        Self {
            seats_votes_gaps,
            large_seats_votes_gap,
            packed_districts,
            actual_seats,
            expected_seats,
            seat_difference,
            large_seat_difference,
            percentile_outlier,
            flagged,
        }
    }
}
