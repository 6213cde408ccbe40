use rand::{Rng, seq::{IndexedRandom, SliceRandom}};

use crate::graph::Graph;

/// Cut-friendly rooted spanning tree over a subset of graph units.
#[derive(Debug)]
pub(crate) struct SpanningTree {
    order: Vec<usize>,          // preorder over nodes in the tree, order[0] is the root
    index: Vec<Option<usize>>,  // preorder entry index, or None if node not in tree.
    size: Vec<Option<usize>>,   // subtree sizes, or None if node not in tree.
}

impl SpanningTree {
    /// Uniformly random spanning tree of the subgraph induced by `nodes` (Wilson's algorithm).
    /// The induced subgraph must be connected and non-empty; a walk that finds no neighbor
    /// inside the subset yields None. Callers check connectivity first, since a subset split
    /// into several pieces of two or more units would walk forever.
    pub(crate) fn random(graph: &Graph, nodes: &[usize], rng: &mut impl Rng) -> Option<Self> {
        assert!(!nodes.is_empty(), "cannot build spanning tree for an empty unit set");

        let mut in_subset = vec![false; graph.node_count()];
        nodes.iter().for_each(|&u| in_subset[u] = true);

        let mut nodes = nodes.to_vec();
        nodes.shuffle(rng);
        let root = nodes[0];

        let mut parent = vec![None; graph.node_count()];
        parent[root] = Some(root);

        // Loop-erased random walks
        let mut walk_start = vec![usize::MAX; graph.node_count()];
        let mut walk_position = vec![0; graph.node_count()];

        for &start in &nodes[1..] {
            if parent[start].is_some() { continue }

            let mut walk = vec![start];
            walk_start[start] = start;
            walk_position[start] = 0;

            let mut current = start;
            while parent[current].is_none() {
                current = random_neighbor_within(graph, current, &in_subset, rng)?;

                if walk_start[current] == start && walk.get(walk_position[current]) == Some(&current) {
                    walk.truncate(walk_position[current] + 1);
                } else {
                    walk_start[current] = start;
                    walk_position[current] = walk.len();
                    walk.push(current);
                }
            }

            // Stitch the loop-erased path into the tree, walking back from the hit point.
            while let Some(node) = walk.pop() {
                if parent[node].is_some() { continue }
                parent[node] = Some(current);
                current = node;
            }
        }

        let mut children = vec![Vec::new(); graph.node_count()];
        for &u in &nodes {
            if let Some(p) = parent[u] {
                if p != u { children[p].push(u) }
            }
        }

        let mut order = Vec::with_capacity(nodes.len());
        let mut index = vec![None; graph.node_count()];
        let mut size = vec![None; graph.node_count()];

        // Iterative DFS preorder from the root, sizes filled on exit.
        let mut stack = vec![(root, false)];
        while let Some((i, entered)) = stack.pop() {
            if !entered {
                index[i] = Some(order.len());
                order.push(i);
                stack.push((i, true));
                for &u in children[i].iter().rev() {
                    stack.push((u, false));
                }
            } else {
                size[i] = Some(1 + children[i].iter().filter_map(|&u| size[u]).sum::<usize>());
            }
        }

        Some(Self { order, index, size })
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.order.len() }

    #[inline] pub(crate) fn root(&self) -> usize { self.order[0] }

    /// Subtree slice for `node` (contiguous in preorder), or None if `node` not in tree.
    #[inline]
    pub(crate) fn subtree_slice(&self, node: usize) -> Option<&[usize]> {
        let index = self.index[node]?;
        let size = self.size[node]?;
        Some(&self.order[index .. index + size])
    }

    /// Population below every non-root node, as (node, subtree population) in preorder.
    fn subtree_populations(&self, graph: &Graph) -> (u64, Vec<(usize, u64)>) {
        let mut prefix = Vec::with_capacity(self.order.len() + 1);
        prefix.push(0u64);
        for &u in &self.order { prefix.push(prefix.last().copied().unwrap_or(0) + graph.population(u)) }

        let total = prefix[self.len()];
        let subtrees = self.order.iter()
            .filter(|&&u| u != self.root())
            .filter_map(|&u| {
                let (index, size) = (self.index[u]?, self.size[u]?);
                Some((u, prefix[index + size] - prefix[index]))
            })
            .collect();
        (total, subtrees)
    }
}

/// Random neighbor of `node` that lies inside the subset.
fn random_neighbor_within(graph: &Graph, node: usize, in_subset: &[bool], rng: &mut impl Rng) -> Option<usize> {
    let count = graph.edges(node).filter(|&v| in_subset[v]).count();
    if count == 0 { return None }
    graph.edges(node).filter(|&v| in_subset[v]).nth(rng.random_range(0..count))
}

/// How to pick among several balanced cuts of one tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CutChoice {
    /// Closest to the ideal population; earliest in preorder on ties.
    Best,
    /// Uniformly at random.
    Random,
}

/// Relative slack absorbing floating point error at exact population bounds.
const BOUNDARY_EPSILON: f64 = 1e-12;

/// Inclusive population bounds for a piece that will hold `districts` districts.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Balance {
    pub(crate) ideal: f64,
    pub(crate) tolerance: f64,
}

impl Balance {
    #[inline]
    pub(crate) fn bounds(&self, districts: u32) -> (f64, f64) {
        let target = districts as f64 * self.ideal;
        let slack = target * self.tolerance;
        (target - slack, target + slack)
    }

    /// Inclusive check; values within rounding error of a bound count as on it.
    #[inline]
    pub(crate) fn accepts(&self, population: u64, districts: u32) -> bool {
        let (min, max) = self.bounds(districts);
        let population = population as f64;
        min - BOUNDARY_EPSILON * max.max(1.0) <= population && population <= max + BOUNDARY_EPSILON * max.max(1.0)
    }
}

/// Split `nodes` into two connected pieces sized for `districts.0` and `districts.1` districts,
/// by cutting one edge of a random spanning tree. Resamples the tree up to `max_attempts` times.
///
/// Returns the two pieces in the order of `districts`, or `None` if no attempt produced a cut
/// with both pieces inside their population bounds.
pub(crate) fn bipartition_tree(
    graph: &Graph,
    nodes: &[usize],
    districts: (u32, u32),
    balance: Balance,
    max_attempts: usize,
    choice: CutChoice,
    rng: &mut impl Rng,
) -> Option<(Vec<usize>, Vec<usize>)> {
    if nodes.len() < 2 || !graph.is_connected_within(nodes) { return None }

    for attempt in 0..max_attempts {
        let tree = SpanningTree::random(graph, nodes, rng)?;
        debug_assert!(tree.len() == nodes.len(), "spanning tree must cover every unit");
        let (total, subtrees) = tree.subtree_populations(graph);

        // (node, subtree goes to first piece, distance from ideal)
        let mut cuts = Vec::new();
        for (node, population) in subtrees {
            let rest = total - population;
            for (first, (sub_districts, rest_districts)) in [(true, districts), (false, (districts.1, districts.0))] {
                if balance.accepts(population, sub_districts) && balance.accepts(rest, rest_districts) {
                    let error = (population as f64 - sub_districts as f64 * balance.ideal).abs();
                    cuts.push((node, first, error));
                    break;
                }
            }
        }

        let picked = match choice {
            CutChoice::Best => cuts.iter()
                .fold(None::<&(usize, bool, f64)>, |best, cut| match best {
                    Some(b) if b.2 <= cut.2 => Some(b),
                    _ => Some(cut),
                }),
            CutChoice::Random => cuts.choose(rng),
        };

        if let Some(&(node, first, _)) = picked {
            let subtree = tree.subtree_slice(node)?.to_vec();
            let mut in_subtree = vec![false; graph.node_count()];
            subtree.iter().for_each(|&u| in_subtree[u] = true);
            let rest = nodes.iter().copied().filter(|&u| !in_subtree[u]).collect::<Vec<_>>();

            tracing::trace!(attempt, candidates = cuts.len(), "found balanced tree cut");
            return Some(if first { (subtree, rest) } else { (rest, subtree) });
        }
    }

    None
}
