use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::{
    analysis::{DiagnosticThresholds, OutcomeStatistic, Thresholds},
    chain::{ChainParams, ProposalKind},
    error::Error,
};

/// Which plan the chain starts from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeedFrom {
    /// Start from the actual plan; it must be contiguous and balanced.
    #[default]
    Actual,
    /// Start from a plan built by the recursive tree partitioner.
    Generated,
}

/// Options for one audit run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub num_districts: u32,
    pub population_tolerance: f64,
    pub total_steps: usize,
    pub outcome_statistic: OutcomeStatistic,
    #[serde(default)]
    pub random_seed: u64,
    #[serde(default)]
    pub proposal: ProposalKind,
    #[serde(default = "default_max_tree_attempts")]
    pub max_tree_attempts: usize,
    #[serde(default)]
    pub seed_from: SeedFrom,
    #[serde(default)]
    pub thresholds: Thresholds,
    #[serde(default)]
    pub diagnostics: DiagnosticThresholds,
    #[serde(default = "default_log_every")]
    pub log_every: usize,
}

fn default_max_tree_attempts() -> usize { 1000 }

fn default_log_every() -> usize { 1000 }

impl Config {
    /// Configuration with the required options set and every other option at its default.
    pub fn new(num_districts: u32, population_tolerance: f64, total_steps: usize, outcome_statistic: OutcomeStatistic) -> Self {
        Self {
            num_districts,
            population_tolerance,
            total_steps,
            outcome_statistic,
            random_seed: 0,
            proposal: ProposalKind::default(),
            max_tree_attempts: default_max_tree_attempts(),
            seed_from: SeedFrom::default(),
            thresholds: Thresholds::default(),
            diagnostics: DiagnosticThresholds::default(),
            log_every: default_log_every(),
        }
    }

    /// Parse and validate a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).context("[Config.from_json_str] malformed configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("[Config.from_json_file] failed to read {}", path.display()))?;
        Self::from_json_str(&json)
            .with_context(|| format!("[Config.from_json_file] invalid configuration in {}", path.display()))
    }

    /// Check every option is in range. Party labels are checked against the graph later.
    pub fn validate(&self) -> Result<(), Error> {
        if self.num_districts < 2 {
            return Err(Error::config(format!("num_districts must be at least 2, got {}", self.num_districts)));
        }
        if !(self.population_tolerance > 0.0 && self.population_tolerance < 1.0) {
            return Err(Error::config(format!("population_tolerance must lie in (0, 1), got {}", self.population_tolerance)));
        }
        if self.total_steps == 0 {
            return Err(Error::config("total_steps must be at least 1"));
        }
        if self.max_tree_attempts == 0 {
            return Err(Error::config("max_tree_attempts must be at least 1"));
        }
        if !(self.diagnostics.packing_share > 0.0 && self.diagnostics.packing_share <= 1.0) {
            return Err(Error::config(format!("packing_share must lie in (0, 1], got {}", self.diagnostics.packing_share)));
        }
        self.thresholds.validate()
    }

    /// Chain parameters derived from this configuration.
    pub fn chain_params(&self) -> ChainParams {
        ChainParams {
            total_steps: self.total_steps,
            tolerance: self.population_tolerance,
            proposal: self.proposal,
            max_tree_attempts: self.max_tree_attempts,
            log_every: self.log_every,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MINIMAL: &str = r#"{
        "num_districts": 4,
        "population_tolerance": 0.1,
        "total_steps": 500,
        "outcome_statistic": { "kind": "wins", "party": "DEM" }
    }"#;

    #[test]
    fn defaults_fill_optional_fields() {
        let config = Config::from_json_str(MINIMAL).unwrap();
        assert_eq!(config, Config::new(4, 0.1, 500, OutcomeStatistic::wins("DEM")));
        assert_eq!(config.max_tree_attempts, 1000);
        assert_eq!(config.thresholds, Thresholds { lower: 5.0, upper: 95.0 });
        assert_eq!(config.diagnostics.packing_share, 0.65);
        assert_eq!(config.seed_from, SeedFrom::Actual);
        assert_eq!(config.proposal, ProposalKind::Flip);
    }

    #[test]
    fn optional_fields_parse() {
        let config = Config::from_json_str(r#"{
            "num_districts": 3, "population_tolerance": 0.2, "total_steps": 10,
            "outcome_statistic": { "kind": "mean_median", "party": "REP" },
            "random_seed": 42, "proposal": "recom", "seed_from": "generated",
            "thresholds": { "lower": 2.5 }, "log_every": 0
        }"#).unwrap();
        assert_eq!(config.proposal, ProposalKind::Recom);
        assert_eq!(config.seed_from, SeedFrom::Generated);
        assert_eq!(config.thresholds, Thresholds { lower: 2.5, upper: 95.0 });
        assert_eq!(config.chain_params().log_every, 0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let base = Config::new(4, 0.1, 500, OutcomeStatistic::wins("DEM"));
        for broken in [
            Config { num_districts: 1, ..base.clone() },
            Config { population_tolerance: 0.0, ..base.clone() },
            Config { total_steps: 0, ..base.clone() },
            Config { max_tree_attempts: 0, ..base.clone() },
            Config { thresholds: Thresholds { lower: 96.0, upper: 95.0 }, ..base.clone() },
        ] {
            assert!(matches!(broken.validate(), Err(Error::ConfigInvalid(_))), "{broken:?}");
        }
        assert!(base.validate().is_ok());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = Config::from_json_file(file.path()).unwrap();
        assert_eq!(config.num_districts, 4);

        let missing = Config::from_json_file("/nonexistent/config.json").unwrap_err();
        assert!(missing.to_string().contains("failed to read"));
    }
}
