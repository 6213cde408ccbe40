use std::sync::Arc;

use crate::{
    graph::{Graph, WeightMatrix},
    partition::{CutEdgeSet, PartitionSet},
};

/// An assignment of graph units to districts `1..=K`, with cached per-district tallies
/// and the set of cut edges. District 0 is reserved for unassigned units.
#[derive(Clone, Debug)]
pub struct Partition {
    pub(super) parts: PartitionSet,        // Units in each district (including unassigned 0)
    pub(super) cut_edges: CutEdgeSet,      // Edges whose endpoints lie in different districts
    pub(super) part_weights: WeightMatrix, // Population and votes per district
    graph: Arc<Graph>,
}

impl Partition {
    /// Construct a partition with `num_districts` districts and every unit unassigned.
    pub(crate) fn new(graph: impl Into<Arc<Graph>>, num_districts: u32) -> Self {
        let graph: Arc<Graph> = graph.into();
        let mut part_weights = graph.node_weights().copy_of_size(num_districts as usize + 1);
        part_weights.set_row_to_sum_of(0, graph.node_weights());

        Self {
            parts: PartitionSet::new(num_districts as usize + 1, graph.node_count()),
            cut_edges: CutEdgeSet::new(graph.edge_count()),
            part_weights,
            graph,
        }
    }

    /// Construct a partition from a complete assignment vector (values in `0..=num_districts`).
    pub(crate) fn from_assignments(graph: impl Into<Arc<Graph>>, num_districts: u32, assignments: &[u32]) -> Self {
        let mut partition = Self::new(graph, num_districts);
        partition.set_assignments(assignments);
        partition
    }

    /// Number of real districts (excluding unassigned 0).
    #[inline] pub fn num_districts(&self) -> u32 { self.parts.num_sets() as u32 - 1 }

    /// Number of units in the underlying graph.
    #[inline] pub fn num_nodes(&self) -> usize { self.graph.node_count() }

    /// Shared, read-only graph.
    #[inline] pub fn graph(&self) -> &Graph { &self.graph }

    /// District of a unit (0 if unassigned).
    #[inline] pub fn assignment(&self, node: usize) -> u32 { self.parts.find(node) }

    /// District of every unit, indexed by unit.
    #[inline] pub fn assignments(&self) -> &[u32] { self.parts.assignments() }

    /// Units in a district.
    #[inline] pub fn district_units(&self, district: u32) -> &[usize] { self.parts.get(district) }

    /// Number of units in a district.
    #[inline] pub fn district_size(&self, district: u32) -> usize { self.parts.size(district) }

    /// Current cut edges (undirected edge ids), in no particular order.
    #[inline] pub fn cut_edges(&self) -> &[usize] { self.cut_edges.as_slice() }

    #[inline] pub fn num_cut_edges(&self) -> usize { self.cut_edges.len() }

    #[inline] pub fn is_cut(&self, edge: usize) -> bool { self.cut_edges.contains(edge) }

    /// Total population of a district.
    #[inline]
    pub fn district_population(&self, district: u32) -> u64 {
        self.part_weights.get(district as usize, 0) as u64
    }

    /// Total votes for party (by index) in a district.
    #[inline]
    pub fn district_votes(&self, district: u32, party: usize) -> u64 {
        self.part_weights.get(district as usize, party + 1) as u64
    }

    /// Overwrite all assignments and recompute every cache from scratch.
    pub(crate) fn set_assignments(&mut self, assignments: &[u32]) {
        assert!(assignments.len() == self.num_nodes(), "assignments.len() must equal number of nodes");
        assert!(assignments.iter().all(|&d| d <= self.num_districts()),
            "all assignments must be in range [0, {}]", self.num_districts());

        self.parts.rebuild(assignments);
        self.recompute();
    }

    /// Discard the incremental caches and rebuild them from the assignment.
    pub(crate) fn recompute(&mut self) {
        let (cut, weights) = self.aggregate_from_scratch();
        self.cut_edges.rebuild_from(cut);
        self.part_weights = weights;
    }

    /// Recompute cut edges (sorted) and district tallies from the assignment alone.
    fn aggregate_from_scratch(&self) -> (Vec<usize>, WeightMatrix) {
        let cut = (0..self.graph.edge_count())
            .filter(|&e| {
                let (u, v) = self.graph.edge_endpoints(e);
                self.assignment(u) != self.assignment(v)
            })
            .collect::<Vec<_>>();

        let mut weights = self.graph.node_weights().copy_of_size(self.num_districts() as usize + 1);
        for (node, &part) in self.assignments().iter().enumerate() {
            weights.add_row_from(part as usize, self.graph.node_weights(), node);
        }

        (cut, weights)
    }

    /// Returns true if incrementally maintained caches match a full recomputation.
    pub fn verify_aggregates(&self) -> bool {
        let (cut, weights) = self.aggregate_from_scratch();
        cut == self.cut_edges.sorted() && weights == self.part_weights
    }

    /// Update cut-edge membership and tallies after `node` moved from `prev` to its current district.
    pub(super) fn update_on_node_move(&mut self, node: usize, prev: u32) {
        let part = self.assignment(node);
        for (v, edge) in self.graph.edges_with_ids(node) {
            self.cut_edges.set(edge, self.parts.find(v) != part);
        }

        self.part_weights.subtract_row_from(prev as usize, self.graph.node_weights(), node);
        self.part_weights.add_row_from(part as usize, self.graph.node_weights(), node);
    }
}
