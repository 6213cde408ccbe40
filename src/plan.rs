use std::{collections::BTreeMap, sync::Arc};

use anyhow::{Result, ensure};
use rand::Rng;

use crate::{
    analysis::{DistrictStats, OutcomeStatistic},
    error::{Error, PlanError},
    graph::Graph,
    partition::Partition,
};

/// A districting plan, assigning every unit of a graph to one of districts `1..=K`.
#[derive(Clone, Debug)]
pub struct Plan {
    graph: Arc<Graph>,
    pub(crate) partition: Partition,
}

impl Plan {
    /// Build a plan from a unit id -> district map. Every unit must be assigned a district in
    /// `1..=num_districts` and no district may be empty; contiguity and balance are not checked.
    pub fn from_assignments<I, S>(graph: impl Into<Arc<Graph>>, num_districts: u32, assignments: I) -> Result<Self, Error>
    where I: IntoIterator<Item = (S, u32)>, S: AsRef<str> {
        let graph: Arc<Graph> = graph.into();
        if num_districts == 0 { return Err(PlanError::NoDistricts.into()) }

        let mut districts = vec![0u32; graph.node_count()];
        for (id, district) in assignments {
            let id = id.as_ref();
            let node = graph.index_of(id).ok_or_else(|| PlanError::UnknownUnit(id.to_string()))?;
            if district == 0 || district > num_districts {
                return Err(PlanError::DistrictOutOfRange { unit: id.to_string(), district, num_districts }.into());
            }
            districts[node] = district;
        }

        if let Some(node) = districts.iter().position(|&d| d == 0) {
            return Err(PlanError::Unassigned(graph.unit_id(node).to_string()).into());
        }

        let partition = Partition::from_assignments(graph.clone(), num_districts, &districts);
        if let Some(district) = (1..=num_districts).find(|&d| partition.part_is_empty(d)) {
            return Err(PlanError::EmptyDistrict(district).into());
        }

        Ok(Self { graph, partition })
    }

    /// Generate a contiguous plan with every district within `tolerance` of the ideal population.
    pub fn generate(
        graph: impl Into<Arc<Graph>>,
        num_districts: u32,
        tolerance: f64,
        max_attempts: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, Error> {
        let graph: Arc<Graph> = graph.into();
        if num_districts == 0 { return Err(PlanError::NoDistricts.into()) }
        let partition = Partition::recursive_tree_part(graph.clone(), num_districts, tolerance, max_attempts, rng)?;
        Ok(Self { graph, partition })
    }

    #[inline] pub fn graph(&self) -> &Graph { &self.graph }

    #[inline] pub fn partition(&self) -> &Partition { &self.partition }

    /// Give up the plan, keeping its partition (e.g. to seed a chain).
    #[inline] pub fn into_partition(self) -> Partition { self.partition }

    /// Number of districts (excluding unassigned 0).
    #[inline] pub fn num_districts(&self) -> u32 { self.partition.num_districts() }

    /// District of a unit by id.
    #[inline]
    pub fn district_of(&self, id: &str) -> Option<u32> {
        self.graph.index_of(id).map(|node| self.partition.assignment(node))
    }

    /// Unit id -> district map.
    pub fn assignments(&self) -> BTreeMap<String, u32> {
        (0..self.graph.node_count())
            .map(|node| (self.graph.unit_id(node).to_string(), self.partition.assignment(node)))
            .collect()
    }

    #[inline]
    pub fn district_population(&self, district: u32) -> u64 { self.partition.district_population(district) }

    /// Votes for a party (by label) in a district.
    pub fn district_votes(&self, district: u32, party: &str) -> Result<u64> {
        let index = self.graph.party_index(party);
        ensure!(index.is_some(), "[Plan.district_votes] party '{party}' is not tracked");
        ensure!(
            (1..=self.num_districts()).contains(&district),
            "[Plan.district_votes] district {district} outside 1..={}", self.num_districts()
        );
        Ok(index.map_or(0, |p| self.partition.district_votes(district, p)))
    }

    /// Every violation of contiguity, balance and completeness.
    #[inline] pub fn problems(&self, tolerance: f64) -> Vec<PlanError> { self.partition.validate(tolerance) }

    /// Fails with the first violation, if any.
    pub fn validate(&self, tolerance: f64) -> Result<(), Error> {
        match self.problems(tolerance).into_iter().next() {
            Some(problem) => Err(problem.into()),
            None => Ok(()),
        }
    }

    /// Per-district tallies.
    #[inline] pub fn district_stats(&self) -> Vec<DistrictStats> { DistrictStats::of_partition(&self.partition) }

    /// Evaluate an outcome statistic on this plan.
    pub fn compute(&self, statistic: &OutcomeStatistic) -> Result<f64, Error> {
        Ok(statistic.bind(&self.graph)?.compute(&self.partition))
    }
}
