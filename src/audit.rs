use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    analysis::{DistrictAccumulator, DistrictStats, Diagnostics, EnsembleRecord, OutcomeAnalysis, OutcomeStatistic},
    chain::{ChainStats, MarkovChain},
    config::{Config, SeedFrom},
    error::Error,
    graph::Graph,
    partition::Partition,
    plan::Plan,
};

/// Everything an audit produces, ready for an external writer.
#[derive(Clone, Debug, Serialize)]
pub struct AuditReport {
    pub config: Config,
    pub units: usize,
    pub ensemble: EnsembleRecord,
    pub analysis: OutcomeAnalysis,
    pub diagnostics: Diagnostics,
    pub actual_districts: Vec<DistrictStats>,
    /// Per-district tallies averaged over every recorded step.
    pub ensemble_districts: Vec<DistrictStats>,
    pub chain: ChainStats,
}

impl AuditReport {
    /// Percentile of the actual plan within the ensemble.
    #[inline] pub fn percentile(&self) -> f64 { self.analysis.percentile }

    /// Combined verdict of the percentile test and the supplementary criteria.
    #[inline] pub fn flagged(&self) -> bool { self.diagnostics.flagged }
}

/// Compare an actual plan against an ensemble of alternative plans sampled by the chain.
///
/// The configuration is validated and the party of the outcome statistic resolved before any
/// sampling. With `seed_from = actual` the chain starts from the actual plan, which must then be
/// contiguous and balanced; otherwise it starts from a freshly generated plan.
pub fn audit<I, S>(graph: impl Into<Arc<Graph>>, actual_assignment: I, config: &Config) -> Result<AuditReport, Error>
where I: IntoIterator<Item = (S, u32)>, S: AsRef<str> {
    config.validate()?;
    let graph: Arc<Graph> = graph.into();
    let statistic = config.outcome_statistic.bind(&graph)?;
    let party = statistic.party();

    let actual = Plan::from_assignments(graph.clone(), config.num_districts, actual_assignment)?;
    let actual_value = statistic.compute(actual.partition());

    let mut rng = ChaCha8Rng::seed_from_u64(config.random_seed);
    let start = match config.seed_from {
        SeedFrom::Actual => {
            actual.validate(config.population_tolerance)?;
            actual.partition().clone()
        }
        SeedFrom::Generated => Partition::recursive_tree_part(
            graph.clone(),
            config.num_districts,
            config.population_tolerance,
            config.max_tree_attempts,
            &mut rng,
        )?,
    };

    let mut record = EnsembleRecord::new(config.outcome_statistic.to_string(), actual_value, config.total_steps);
    let mut seats = 0.0;
    let mut districts = DistrictAccumulator::new(config.num_districts, graph.parties().len());

    let mut chain = MarkovChain::new(start, config.chain_params(), rng);
    chain.run_with(|_, partition, _| {
        record.push(statistic.compute(partition));
        seats += partition.wins(party) as f64;
        districts.observe(partition);
    });
    let (_, stats) = chain.into_parts();

    if stats.accepted == 0 {
        warn!(steps = stats.steps, "chain never left its starting plan");
    }

    let analysis = OutcomeAnalysis::of(&record, &config.thresholds);
    let expected_seats = if record.is_empty() { 0.0 } else { seats / record.len() as f64 };
    let diagnostics = Diagnostics::assess(actual.partition(), party, expected_seats, analysis.classification, &config.diagnostics);

    info!(
        statistic = %config.outcome_statistic,
        percentile = analysis.percentile,
        classification = ?analysis.classification,
        flagged = diagnostics.flagged,
        "audit complete"
    );

    Ok(AuditReport {
        config: config.clone(),
        units: graph.node_count(),
        ensemble: record,
        analysis,
        diagnostics,
        actual_districts: actual.district_stats(),
        ensemble_districts: districts.averages(&graph),
        chain: stats,
    })
}

/// Evaluate a statistic on a plan given as an id -> district map, without running a chain.
pub fn outcome_of<I, S>(graph: impl Into<Arc<Graph>>, num_districts: u32, assignment: I, statistic: &OutcomeStatistic) -> Result<f64, Error>
where I: IntoIterator<Item = (S, u32)>, S: AsRef<str> {
    Plan::from_assignments(graph, num_districts, assignment)?.compute(statistic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::PlanError, partition::tests::grid};

    fn columns(width: usize, height: usize) -> Vec<(String, u32)> {
        (0..height).flat_map(|r| (0..width).map(move |c| (format!("r{r}c{c}"), if c < width / 2 { 1 } else { 2 })))
            .collect()
    }

    #[test]
    fn audit_records_one_value_per_step() {
        let config = Config { log_every: 0, ..Config::new(2, 0.25, 200, OutcomeStatistic::wins("A")) };
        let report = audit(grid(4, 4, 10), columns(4, 4), &config).unwrap();

        assert_eq!(report.ensemble.len(), 200);
        assert_eq!(report.ensemble.actual(), 1.0);
        assert_eq!(report.chain.steps, 200);
        assert!((0.0..=100.0).contains(&report.percentile()));
        assert_eq!(report.actual_districts.len(), 2);
        assert_eq!(report.ensemble_districts.len(), 2);
        let mean_population = report.ensemble_districts.iter().map(|d| d.population).sum::<f64>();
        assert!((mean_population - 160.0).abs() < 1e-9);
    }

    #[test]
    fn generated_seed_does_not_need_a_balanced_actual_plan() {
        // Actual plan: one column against three; too unbalanced for tolerance 0.25.
        let lopsided = (0..4).flat_map(|r| (0..4).map(move |c| (format!("r{r}c{c}"), if c == 0 { 1 } else { 2 }))).collect::<Vec<_>>();

        let config = Config::new(2, 0.25, 50, OutcomeStatistic::wins("A"));
        let err = audit(grid(4, 4, 10), lopsided.clone(), &config).unwrap_err();
        assert!(matches!(err, Error::PlanInvalid(PlanError::Unbalanced { .. })));

        let config = Config { seed_from: SeedFrom::Generated, random_seed: 3, ..config };
        let report = audit(grid(4, 4, 10), lopsided, &config).unwrap();
        assert_eq!(report.ensemble.len(), 50);
    }

    #[test]
    fn unknown_party_fails_before_sampling() {
        let config = Config::new(2, 0.25, 50, OutcomeStatistic::wins("Z"));
        assert!(matches!(audit(grid(4, 4, 10), columns(4, 4), &config), Err(Error::ConfigInvalid(_))));
    }

    #[test]
    fn outcome_of_actual_plan() {
        let value = outcome_of(grid(4, 2, 10), 2, columns(4, 2), &OutcomeStatistic::wins("A")).unwrap();
        assert_eq!(value, 1.0);
    }
}
