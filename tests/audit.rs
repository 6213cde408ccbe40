mod common;

use std::collections::BTreeMap;

use gerrysample::{
    AttributeRoles, Classification, Config, Error, GraphBuilder, GraphError, OutcomeStatistic, ProposalKind, RawUnit,
    SeedFrom, UnitRecord, audit,
};

use common::{grid, strips};

/// 6x6 grid in which party "DEM" is concentrated in the leftmost column.
fn raw_units() -> Vec<(String, RawUnit)> {
    let mut units = Vec::new();
    for r in 0..6 {
        for c in 0..6 {
            let mut neighbors = Vec::new();
            if r > 0 { neighbors.push(format!("r{}c{}", r - 1, c)) }
            if r < 5 { neighbors.push(format!("r{}c{}", r + 1, c)) }
            if c > 0 { neighbors.push(format!("r{}c{}", r, c - 1)) }
            if c < 5 { neighbors.push(format!("r{}c{}", r, c + 1)) }
            let dem = if c == 0 { 90.0 } else { 38.0 };
            let attributes = BTreeMap::from([
                ("TOTPOP".to_string(), 100.0),
                ("G20PREDEM".to_string(), dem),
                ("G20PREREP".to_string(), 100.0 - dem),
            ]);
            units.push((format!("r{r}c{c}"), RawUnit { attributes, neighbors: neighbors.into_iter().collect() }));
        }
    }
    units
}

fn roles() -> AttributeRoles {
    AttributeRoles {
        population: "TOTPOP".into(),
        parties: vec![("DEM".into(), "G20PREDEM".into()), ("REP".into(), "G20PREREP".into())],
    }
}

#[test]
fn audit_from_raw_attributes_and_json_config() {
    let graph = GraphBuilder::from_attributes(raw_units(), &roles()).unwrap().build().unwrap();
    let config = Config::from_json_str(r#"{
        "num_districts": 3,
        "population_tolerance": 0.2,
        "total_steps": 400,
        "outcome_statistic": { "kind": "wins", "party": "DEM" },
        "random_seed": 7,
        "log_every": 100
    }"#).unwrap();

    let report = audit(graph, strips(6, 6, 3), &config).unwrap();
    assert_eq!(report.units, 36);
    assert_eq!(report.ensemble.len(), 400);
    assert_eq!(report.chain.steps, 400);
    assert!((0.0..=100.0).contains(&report.percentile()));
    assert_eq!(report.actual_districts.len(), 3);

    // Strips: DEM wins only the leftmost strip, (0.9 + 0.38) / 2 = 0.64.
    assert_eq!(report.ensemble.actual(), 1.0);
    assert_eq!(report.diagnostics.actual_seats, 1.0);
    assert!(report.diagnostics.packed_districts.is_empty());

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["ensemble"]["values"].as_array().unwrap().len(), 400);
    assert_eq!(json["config"]["outcome_statistic"]["kind"], "wins");
}

#[test]
fn constant_statistic_is_never_an_outlier() {
    // Uniform votes: party A wins nothing anywhere, in every plan.
    let mut builder = GraphBuilder::new(["A", "B"]);
    for (id, record) in (0..16).map(|i| {
        let (r, c) = (i / 4, i % 4);
        let mut neighbors = Vec::new();
        if r > 0 { neighbors.push(format!("r{}c{}", r - 1, c)) }
        if r < 3 { neighbors.push(format!("r{}c{}", r + 1, c)) }
        if c > 0 { neighbors.push(format!("r{}c{}", r, c - 1)) }
        if c < 3 { neighbors.push(format!("r{}c{}", r, c + 1)) }
        (format!("r{r}c{c}"), UnitRecord::new(10).with_votes("A", 4).with_votes("B", 6).with_neighbors(neighbors))
    }) {
        builder.add_unit(id, record);
    }
    let graph = builder.build().unwrap();

    let config = Config { log_every: 0, ..Config::new(2, 0.25, 100, OutcomeStatistic::wins("A")) };
    let report = audit(graph, strips(4, 4, 2), &config).unwrap();
    assert_eq!(report.percentile(), 50.0);
    assert_eq!(report.analysis.classification, Classification::Normal);
    assert_eq!(report.analysis.summary.std_dev, 0.0);
    assert_eq!(report.analysis.summary.z_score, 0.0);
}

#[test]
fn recom_from_generated_seed() {
    let config = Config {
        proposal: ProposalKind::Recom,
        seed_from: SeedFrom::Generated,
        random_seed: 11,
        log_every: 0,
        ..Config::new(3, 0.2, 60, OutcomeStatistic::efficiency_gap("A"))
    };
    let report = audit(grid(6, 6, 10), strips(6, 6, 3), &config).unwrap();
    assert_eq!(report.ensemble.len(), 60);
    assert!(report.chain.accepted > 0);
    assert!(report.ensemble.values().iter().all(|v| v.abs() <= 1.0));
}

#[test]
fn same_seed_same_report() {
    let config = Config { random_seed: 5, log_every: 0, ..Config::new(3, 0.2, 200, OutcomeStatistic::mean_median("A")) };
    let first = audit(grid(6, 6, 10), strips(6, 6, 3), &config).unwrap();
    let second = audit(grid(6, 6, 10), strips(6, 6, 3), &config).unwrap();
    assert_eq!(first.ensemble, second.ensemble);
    assert_eq!(first.analysis, second.analysis);
}

#[test]
fn disconnected_graph_is_reported_or_reduced() {
    let mut units = raw_units();
    let attributes = BTreeMap::from([
        ("TOTPOP".to_string(), 5.0),
        ("G20PREDEM".to_string(), 1.0),
        ("G20PREREP".to_string(), 4.0),
    ]);
    units.push(("island".to_string(), RawUnit { attributes, neighbors: Default::default() }));

    let builder = GraphBuilder::from_attributes(units, &roles()).unwrap();
    let err = builder.build().unwrap_err();
    assert!(matches!(err, Error::GraphInvalid(GraphError::Disconnected { components: 2, largest: 36 })));

    let graph = builder.build_largest_component().unwrap();
    assert_eq!(graph.node_count(), 36);
    assert!(graph.index_of("island").is_none());
}

#[test]
fn invalid_config_is_rejected_before_sampling() {
    let config = Config::new(1, 0.2, 10, OutcomeStatistic::wins("A"));
    let err = audit(grid(4, 4, 10), strips(4, 4, 2), &config).unwrap_err();
    assert!(matches!(err, Error::ConfigInvalid(_)));
}
