use std::collections::VecDeque;

use ahash::AHashMap;

use crate::graph::{WeightMatrix, weights::POPULATION};

/// An undirected adjacency graph of geographic units in compressed sparse row format.
///
/// Every undirected edge `{u, v}` is stored twice in the CSR arrays (once per endpoint),
/// and both half-edges carry the same undirected edge id.
#[derive(Debug, Clone)]
pub struct Graph {
    ids: Vec<String>,
    index: AHashMap<String, usize>,
    parties: Vec<String>,
    offsets: Vec<u32>,
    edges: Vec<u32>,
    edge_ids: Vec<u32>,
    endpoints: Vec<(u32, u32)>,
    node_weights: WeightMatrix,
    total_population: u64,
}

impl Graph {
    /// Construct a graph from symmetric adjacency lists and node weights.
    /// `node_weights` column 0 must be population, followed by one column per party.
    pub(crate) fn new(ids: Vec<String>, parties: Vec<String>, adjacency: &[Vec<u32>], node_weights: WeightMatrix) -> Self {
        let num_nodes = ids.len();
        assert!(adjacency.len() == num_nodes, "adjacency.len() must equal ids.len()");
        assert!(node_weights.num_rows() == num_nodes, "node_weights rows must equal ids.len()");
        assert!(node_weights.series().len() == parties.len() + 1, "node_weights must hold population plus one column per party");
        assert!(node_weights.index_of(POPULATION) == Some(0), "node_weights column 0 must be population");

        let offsets = std::iter::once(0u32).chain(
            adjacency.iter()
                .map(|v| v.len() as u32)
                .scan(0u32, |acc, len| {*acc += len; Some(*acc)})
        ).collect::<Vec<u32>>();

        // Assign undirected ids in (min, max) order of first appearance.
        let mut endpoints = Vec::new();
        let mut pending: AHashMap<(u32, u32), u32> = AHashMap::new();
        let mut edge_ids = Vec::with_capacity(*offsets.last().unwrap_or(&0) as usize);
        for (u, neighbors) in adjacency.iter().enumerate() {
            for &v in neighbors {
                let key = ((u as u32).min(v), (u as u32).max(v));
                let id = *pending.entry(key).or_insert_with(|| {
                    endpoints.push(key);
                    endpoints.len() as u32 - 1
                });
                edge_ids.push(id);
            }
        }

        let total_population = node_weights.totals()[0].max(0) as u64;
        let index = ids.iter().enumerate().map(|(i, id)| (id.clone(), i)).collect();

        Self {
            ids,
            index,
            parties,
            offsets,
            edges: adjacency.iter().flatten().copied().collect(),
            edge_ids,
            endpoints,
            node_weights,
            total_population,
        }
    }

    /// Get the number of units in the graph.
    #[inline] pub fn node_count(&self) -> usize { self.ids.len() }

    /// Get the number of undirected edges in the graph.
    #[inline] pub fn edge_count(&self) -> usize { self.endpoints.len() }

    /// Tracked party labels, in column order.
    #[inline] pub fn parties(&self) -> &[String] { &self.parties }

    /// Position of a party label in [`Graph::parties`].
    pub fn party_index(&self, party: &str) -> Option<usize> {
        self.parties.iter().position(|p| p == party)
    }

    /// External identifier of a unit.
    #[inline] pub fn unit_id(&self, node: usize) -> &str { &self.ids[node] }

    /// Internal index of a unit identifier.
    #[inline] pub fn index_of(&self, id: &str) -> Option<usize> { self.index.get(id).copied() }

    /// Population of a unit.
    #[inline] pub fn population(&self, node: usize) -> u64 { self.node_weights.get(node, 0) as u64 }

    /// Votes cast for party (by index) in a unit.
    #[inline] pub fn votes(&self, node: usize, party: usize) -> u64 { self.node_weights.get(node, party + 1) as u64 }

    /// Total population over all units.
    #[inline] pub fn total_population(&self) -> u64 { self.total_population }

    /// Get a reference to the node weights matrix.
    #[inline] pub(crate) fn node_weights(&self) -> &WeightMatrix { &self.node_weights }

    /// Get the range of half-edges for a given node.
    #[inline]
    fn range(&self, node: usize) -> std::ops::Range<usize> {
        self.offsets[node] as usize .. self.offsets[node + 1] as usize
    }

    /// Get the degree (number of neighbors) of a given node.
    #[inline] pub fn degree(&self, node: usize) -> usize { self.range(node).len() }

    /// Get the ith neighbor of a given node.
    #[inline]
    pub fn edge(&self, node: usize, i: usize) -> Option<usize> {
        self.range(node).nth(i).map(|v| self.edges[v] as usize)
    }

    /// Get an iterator over the neighbors of a given node.
    #[inline]
    pub fn edges(&self, node: usize) -> impl Iterator<Item = usize> + '_ {
        self.range(node).map(move |v| self.edges[v] as usize)
    }

    /// Get an iterator over (neighbor, undirected edge id) pairs of a given node.
    #[inline]
    pub fn edges_with_ids(&self, node: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.range(node).map(move |v| (self.edges[v] as usize, self.edge_ids[v] as usize))
    }

    /// Endpoints `(u, v)` with `u < v` of an undirected edge.
    #[inline]
    pub fn edge_endpoints(&self, edge: usize) -> (usize, usize) {
        let (u, v) = self.endpoints[edge];
        (u as usize, v as usize)
    }

    /// Connected components of the subgraph induced by `nodes`, largest first.
    pub fn components_within(&self, nodes: &[usize]) -> Vec<Vec<usize>> {
        let mut in_subset = vec![false; self.node_count()];
        nodes.iter().for_each(|&u| in_subset[u] = true);

        let mut visited = vec![false; self.node_count()];
        let mut components = Vec::new();
        for &start in nodes {
            if visited[start] { continue }
            visited[start] = true;
            let mut component = Vec::new();
            let mut queue = VecDeque::from([start]);
            while let Some(u) = queue.pop_front() {
                component.push(u);
                for v in self.edges(u) {
                    if in_subset[v] && !visited[v] {
                        visited[v] = true;
                        queue.push_back(v);
                    }
                }
            }
            components.push(component);
        }

        components.sort_by(|a, b| b.len().cmp(&a.len()));
        components
    }

    /// Connected components of the whole graph, largest first.
    pub fn connected_components(&self) -> Vec<Vec<usize>> {
        self.components_within(&(0..self.node_count()).collect::<Vec<_>>())
    }

    /// Returns true if the induced subgraph on `nodes` is connected (and non-empty).
    pub fn is_connected_within(&self, nodes: &[usize]) -> bool {
        !nodes.is_empty() && self.components_within(nodes).len() == 1
    }

    /// Induced subgraph on `nodes` (sorted), relabelled to `0..nodes.len()`.
    pub(crate) fn subgraph(&self, nodes: &[usize]) -> Graph {
        let mut keep = nodes.to_vec();
        keep.sort_unstable();
        keep.dedup();

        let mut relabel = vec![None; self.node_count()];
        keep.iter().enumerate().for_each(|(i, &u)| relabel[u] = Some(i as u32));

        let adjacency = keep.iter()
            .map(|&u| self.edges(u).filter_map(|v| relabel[v]).collect::<Vec<_>>())
            .collect::<Vec<_>>();

        Graph::new(
            keep.iter().map(|&u| self.ids[u].clone()).collect(),
            self.parties.clone(),
            &adjacency,
            self.node_weights.select_rows(&keep),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 0 - 1
    /// | / |
    /// 2 - 3    4 (isolated)
    fn make_test_graph() -> Graph {
        Graph::new(
            ["a", "b", "c", "d", "e"].map(String::from).to_vec(),
            vec!["A".into()],
            &[
                vec![1, 2],       // 0
                vec![0, 2, 3],    // 1
                vec![0, 1, 3],    // 2
                vec![1, 2],       // 3
                vec![],           // 4
            ],
            WeightMatrix::new(
                vec![POPULATION.into(), "A".into()],
                &[vec![10, 1], vec![20, 2], vec![30, 3], vec![40, 4], vec![50, 5]],
            ),
        )
    }

    #[test]
    fn csr_graph_construction() {
        let graph = make_test_graph();

        assert_eq!(graph.node_count(), 5);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.offsets, vec![0, 2, 5, 8, 10, 10]);
        assert_eq!(graph.edges.len(), graph.edge_ids.len());
        for window in graph.offsets.windows(2) { assert!(window[0] <= window[1]) }
    }

    #[test]
    fn half_edges_share_undirected_ids() {
        let graph = make_test_graph();
        for u in 0..graph.node_count() {
            for (v, e) in graph.edges_with_ids(u) {
                let (a, b) = graph.edge_endpoints(e);
                assert_eq!((a, b), (u.min(v), u.max(v)));
                assert!(graph.edges_with_ids(v).any(|(w, f)| w == u && f == e));
            }
        }
    }

    #[test]
    fn degree_and_edge_access() {
        let graph = make_test_graph();
        assert_eq!(graph.degree(1), 3);
        assert_eq!(graph.degree(4), 0);
        assert_eq!(graph.edge(1, 2), Some(3));
        assert_eq!(graph.edge(1, 3), None);
        assert_eq!(graph.edges(2).collect::<Vec<_>>(), vec![0, 1, 3]);
    }

    #[test]
    fn weights_and_ids() {
        let graph = make_test_graph();
        assert_eq!(graph.total_population(), 150);
        assert_eq!(graph.population(3), 40);
        assert_eq!(graph.votes(3, 0), 4);
        assert_eq!(graph.index_of("c"), Some(2));
        assert_eq!(graph.unit_id(2), "c");
        assert_eq!(graph.party_index("A"), Some(0));
        assert_eq!(graph.party_index("B"), None);
    }

    #[test]
    fn components_largest_first() {
        let graph = make_test_graph();
        let components = graph.connected_components();
        assert_eq!(components.len(), 2);
        assert_eq!(components[0].len(), 4);
        assert_eq!(components[1], vec![4]);

        assert!(graph.is_connected_within(&[0, 1, 3]));
        assert!(!graph.is_connected_within(&[0, 3]));
        assert!(!graph.is_connected_within(&[]));
    }

    #[test]
    fn subgraph_relabels_and_keeps_weights() {
        let graph = make_test_graph();
        let sub = graph.subgraph(&[3, 1, 2]);
        assert_eq!(sub.node_count(), 3);
        assert_eq!(sub.unit_id(0), "b");
        assert_eq!(sub.population(2), 40);
        assert_eq!(sub.edge_count(), 3);
        assert_eq!(sub.total_population(), 90);
        assert!(sub.connected_components().len() == 1);
    }

    #[test]
    #[should_panic(expected = "adjacency.len() must equal ids.len()")]
    fn new_panics_when_adjacency_len_mismatch() {
        Graph::new(
            vec!["a".into()],
            vec![],
            &[],
            WeightMatrix::new(vec![POPULATION.into()], &[vec![1]]),
        );
    }
}
