use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, GraphError},
    graph::{Graph, WeightMatrix, weights::POPULATION},
};

/// A geographic base unit as handed to the core: population, votes per party, neighbors.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub population: u64,
    #[serde(default)]
    pub votes: BTreeMap<String, u64>,
    #[serde(default)]
    pub neighbors: BTreeSet<String>,
}

impl UnitRecord {
    pub fn new(population: u64) -> Self {
        Self { population, ..Default::default() }
    }

    pub fn with_votes(mut self, party: impl Into<String>, votes: u64) -> Self {
        self.votes.insert(party.into(), votes);
        self
    }

    pub fn with_neighbors<I, S>(mut self, neighbors: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<String> {
        self.neighbors.extend(neighbors.into_iter().map(Into::into));
        self
    }
}

/// A unit with raw, source-named attributes (e.g. loaded from a shapefile table).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawUnit {
    pub attributes: BTreeMap<String, f64>,
    #[serde(default)]
    pub neighbors: BTreeSet<String>,
}

/// Explicit mapping from semantic role to raw attribute key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AttributeRoles {
    /// Attribute key holding population.
    pub population: String,
    /// (party label, attribute key) pairs, in the order parties should be tracked.
    pub parties: Vec<(String, String)>,
}

/// Collects unit records and validates them into a [`Graph`].
#[derive(Clone, Debug, Default)]
pub struct GraphBuilder {
    parties: Vec<String>,
    units: BTreeMap<String, UnitRecord>,
    duplicate: Option<String>,
}

impl GraphBuilder {
    /// Start a builder tracking the given party labels.
    pub fn new<I, S>(parties: I) -> Self
    where I: IntoIterator<Item = S>, S: Into<String> {
        Self { parties: parties.into_iter().map(Into::into).collect(), ..Default::default() }
    }

    /// Add a unit. Adding the same identifier twice makes `build` fail.
    pub fn add_unit(&mut self, id: impl Into<String>, record: UnitRecord) -> &mut Self {
        let id = id.into();
        if self.units.contains_key(&id) && self.duplicate.is_none() {
            self.duplicate = Some(id.clone());
        }
        self.units.insert(id, record);
        self
    }

    /// Add many units at once.
    pub fn with_units<I, S>(mut self, units: I) -> Self
    where I: IntoIterator<Item = (S, UnitRecord)>, S: Into<String> {
        for (id, record) in units { self.add_unit(id, record); }
        self
    }

    /// Resolve raw attributes through `roles` into unit records.
    pub fn from_attributes<I, S>(units: I, roles: &AttributeRoles) -> Result<Self, Error>
    where I: IntoIterator<Item = (S, RawUnit)>, S: Into<String> {
        let mut builder = Self::new(roles.parties.iter().map(|(label, _)| label.clone()));
        for (id, raw) in units {
            let id = id.into();
            let mut record = UnitRecord::new(integral(&id, &raw, &roles.population)?);
            for (label, key) in &roles.parties {
                record.votes.insert(label.clone(), integral(&id, &raw, key)?);
            }
            record.neighbors = raw.neighbors;
            builder.add_unit(id, record);
        }
        Ok(builder)
    }

    /// Number of units collected so far.
    #[inline] pub fn len(&self) -> usize { self.units.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.units.is_empty() }

    /// Validate and build a connected graph.
    pub fn build(&self) -> Result<Graph, Error> {
        let graph = self.assemble()?;
        let components = graph.connected_components();
        if components.len() > 1 {
            return Err(GraphError::Disconnected { components: components.len(), largest: components[0].len() }.into());
        }

        info!(units = graph.node_count(), edges = graph.edge_count(), parties = graph.parties().len(), "built graph");
        Ok(graph)
    }

    /// Validate and build, keeping only the largest connected component.
    pub fn build_largest_component(&self) -> Result<Graph, Error> {
        let graph = self.assemble()?;
        let components = graph.connected_components();
        if components.len() <= 1 {
            info!(units = graph.node_count(), edges = graph.edge_count(), "built graph");
            return Ok(graph);
        }

        let dropped = graph.node_count() - components[0].len();
        warn!(components = components.len(), dropped, "reducing graph to its largest connected component");
        let graph = graph.subgraph(&components[0]);
        info!(units = graph.node_count(), edges = graph.edge_count(), "built graph");
        Ok(graph)
    }

    /// Validate records and assemble the CSR graph, without a connectivity check.
    fn assemble(&self) -> Result<Graph, Error> {
        if let Some(id) = &self.duplicate { return Err(GraphError::DuplicateUnit(id.clone()).into()) }
        if self.units.is_empty() { return Err(GraphError::Empty.into()) }

        // BTreeMap iteration gives a deterministic, id-sorted node order.
        let ids = self.units.keys().cloned().collect::<Vec<_>>();
        let index = ids.iter().enumerate()
            .map(|(i, id)| (id.as_str(), i as u32))
            .collect::<ahash::AHashMap<_, _>>();

        let mut adjacency = Vec::with_capacity(ids.len());
        let mut rows = Vec::with_capacity(ids.len());
        for (id, record) in &self.units {
            let mut neighbors = Vec::with_capacity(record.neighbors.len());
            for neighbor in &record.neighbors {
                if neighbor == id { return Err(GraphError::SelfLoop(id.clone()).into()) }
                let Some(&v) = index.get(neighbor.as_str()) else {
                    return Err(GraphError::UnknownNeighbor { unit: id.clone(), neighbor: neighbor.clone() }.into())
                };
                if !self.units[neighbor].neighbors.contains(id) {
                    return Err(GraphError::Asymmetric { a: id.clone(), b: neighbor.clone() }.into());
                }
                neighbors.push(v);
            }
            adjacency.push(neighbors);

            if let Some(party) = record.votes.keys().find(|p| !self.parties.contains(p)) {
                return Err(GraphError::UnknownParty { unit: id.clone(), party: party.clone() }.into());
            }
            let mut row = Vec::with_capacity(self.parties.len() + 1);
            row.push(weight(id, POPULATION, record.population)?);
            for party in &self.parties {
                row.push(weight(id, party, record.votes.get(party).copied().unwrap_or(0))?);
            }
            rows.push(row);
        }

        let series = std::iter::once(POPULATION.to_string()).chain(self.parties.iter().cloned()).collect();
        debug!(units = ids.len(), "assembled adjacency");
        Ok(Graph::new(ids, self.parties.clone(), &adjacency, WeightMatrix::new(series, &rows)))
    }
}

/// Convert a count into matrix storage, rejecting values that do not fit.
fn weight(unit: &str, key: &str, value: u64) -> Result<i64, Error> {
    i64::try_from(value).map_err(|_| GraphError::InvalidAttribute { unit: unit.into(), key: key.into() }.into())
}

/// Read a non-negative integral attribute.
fn integral(unit: &str, raw: &RawUnit, key: &str) -> Result<u64, Error> {
    let value = *raw.attributes.get(key)
        .ok_or_else(|| GraphError::MissingAttribute { unit: unit.into(), key: key.into() })?;
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > i64::MAX as f64 {
        return Err(GraphError::InvalidAttribute { unit: unit.into(), key: key.into() }.into());
    }
    Ok(value as u64)
}
