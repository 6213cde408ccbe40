use std::sync::Arc;

use rand::Rng;
use tracing::{debug, info};

use crate::{
    error::{Error, GraphError},
    graph::Graph,
    partition::{Partition, tree::{Balance, CutChoice, bipartition_tree}},
};

/// A pending piece of the recursive split: units that must become `count` districts,
/// numbered from `first`.
struct Task {
    nodes: Vec<usize>,
    first: u32,
    count: u32,
}

impl Partition {
    /// Build a contiguous plan with `num_districts` districts, each within `tolerance` of the
    /// ideal population, by recursively cutting random spanning trees.
    ///
    /// Pieces are processed from an explicit work-list. Each split resamples its spanning tree
    /// up to `max_attempts` times before reporting the plan as infeasible.
    pub(crate) fn recursive_tree_part(
        graph: impl Into<Arc<Graph>>,
        num_districts: u32,
        tolerance: f64,
        max_attempts: usize,
        rng: &mut impl Rng,
    ) -> Result<Self, Error> {
        let graph: Arc<Graph> = graph.into();
        assert!(num_districts > 0, "num_districts must be at least 1");

        let components = graph.connected_components();
        if components.len() > 1 {
            return Err(GraphError::Disconnected { components: components.len(), largest: components[0].len() }.into());
        }

        let infeasible = |districts| Error::PartitionInfeasible { districts, tolerance, attempts: max_attempts };
        if (num_districts as usize) > graph.node_count() { return Err(infeasible(num_districts)) }

        let balance = Balance { ideal: graph.total_population() as f64 / num_districts as f64, tolerance };
        let mut assignments = vec![0u32; graph.node_count()];
        let mut tasks = vec![Task { nodes: (0..graph.node_count()).collect(), first: 1, count: num_districts }];

        while let Some(Task { nodes, first, count }) = tasks.pop() {
            if count == 1 {
                nodes.iter().for_each(|&u| assignments[u] = first);
                continue;
            }

            let left = count / 2;
            let right = count - left;
            let (a, b) = bipartition_tree(&graph, &nodes, (left, right), balance, max_attempts, CutChoice::Best, rng)
                .ok_or_else(|| infeasible(count))?;

            debug!(districts = count, units = nodes.len(), left = a.len(), right = b.len(), "split piece");
            tasks.push(Task { nodes: b, first: first + left, count: right });
            tasks.push(Task { nodes: a, first, count: left });
        }

        info!(districts = num_districts, tolerance, "generated initial plan");
        Ok(Partition::from_assignments(graph, num_districts, &assignments))
    }
}
