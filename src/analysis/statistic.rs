use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{error::Error, graph::Graph, partition::Partition};

/// Scalar partisan outcome tracked for every plan in the ensemble.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutcomeStatistic {
    /// Districts where `party` has strictly more votes than every other tracked party.
    Wins { party: String },
    /// Mean of `party`'s district vote shares.
    VoteShareMean { party: String },
    /// Median minus mean of `party`'s district vote shares.
    MeanMedian { party: String },
    /// Wasted-vote difference of `party` against all other parties, over total votes.
    EfficiencyGap { party: String },
}

impl OutcomeStatistic {
    pub fn wins(party: impl Into<String>) -> Self { Self::Wins { party: party.into() } }

    pub fn vote_share_mean(party: impl Into<String>) -> Self { Self::VoteShareMean { party: party.into() } }

    pub fn mean_median(party: impl Into<String>) -> Self { Self::MeanMedian { party: party.into() } }

    pub fn efficiency_gap(party: impl Into<String>) -> Self { Self::EfficiencyGap { party: party.into() } }

    /// Party label the statistic is computed for.
    pub fn party(&self) -> &str {
        match self {
            Self::Wins { party }
            | Self::VoteShareMean { party }
            | Self::MeanMedian { party }
            | Self::EfficiencyGap { party } => party,
        }
    }

    /// Short name for display.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Wins { .. } => "Wins",
            Self::VoteShareMean { .. } => "VoteShareMean",
            Self::MeanMedian { .. } => "MeanMedian",
            Self::EfficiencyGap { .. } => "EfficiencyGap",
        }
    }

    /// Resolve the party label against a graph's tracked parties.
    pub(crate) fn bind(&self, graph: &Graph) -> Result<BoundStatistic, Error> {
        let party = graph.party_index(self.party()).ok_or_else(|| {
            Error::config(format!("outcome statistic names unknown party '{}' (tracked: {:?})", self.party(), graph.parties()))
        })?;

        let kind = match self {
            Self::Wins { .. } => StatisticKind::Wins,
            Self::VoteShareMean { .. } => StatisticKind::VoteShareMean,
            Self::MeanMedian { .. } => StatisticKind::MeanMedian,
            Self::EfficiencyGap { .. } => StatisticKind::EfficiencyGap,
        };
        Ok(BoundStatistic { kind, party })
    }
}

impl fmt::Display for OutcomeStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(party='{}')", self.short_name(), self.party())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StatisticKind {
    Wins,
    VoteShareMean,
    MeanMedian,
    EfficiencyGap,
}

/// An outcome statistic with its party resolved to a column index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BoundStatistic {
    kind: StatisticKind,
    party: usize,
}

impl BoundStatistic {
    #[inline] pub(crate) fn party(&self) -> usize { self.party }

    /// Evaluate for a partition.
    pub(crate) fn compute(&self, partition: &Partition) -> f64 {
        match self.kind {
            StatisticKind::Wins => partition.wins(self.party) as f64,
            StatisticKind::VoteShareMean => {
                let districts = partition.num_districts();
                (1..=districts).map(|d| partition.vote_share(d, self.party)).sum::<f64>() / districts as f64
            }
            StatisticKind::MeanMedian => partition.mean_median(self.party),
            StatisticKind::EfficiencyGap => partition.efficiency_gap(self.party),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::tests::{grid, halves};

    #[test]
    fn deserializes_tagged() {
        let statistic: OutcomeStatistic = serde_json::from_str(r#"{"kind": "wins", "party": "A"}"#).unwrap();
        assert_eq!(statistic, OutcomeStatistic::wins("A"));
        let statistic: OutcomeStatistic = serde_json::from_str(r#"{"kind": "efficiency_gap", "party": "B"}"#).unwrap();
        assert_eq!(statistic.to_string(), "EfficiencyGap(party='B')");
    }

    #[test]
    fn unknown_party_is_a_config_error() {
        let graph = grid(2, 2, 10);
        assert!(matches!(OutcomeStatistic::wins("C").bind(&graph), Err(Error::ConfigInvalid(_))));
    }

    #[test]
    fn computes_on_partition() {
        // Left half votes A 6/10, right half 4/10.
        let graph = grid(4, 2, 10);
        let assignments = halves(&graph, 4);
        let partition = Partition::from_assignments(graph.clone(), 2, &assignments);

        let wins = OutcomeStatistic::wins("A").bind(&graph).unwrap();
        assert_eq!(wins.compute(&partition), 1.0);

        let share = OutcomeStatistic::vote_share_mean("A").bind(&graph).unwrap();
        assert!((share.compute(&partition) - 0.5).abs() < 1e-12);
        assert_eq!(share.party(), 0);
    }
}
