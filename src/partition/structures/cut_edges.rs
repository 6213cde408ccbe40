use rand::Rng;

/// Set of undirected edge ids crossing a district boundary, with O(1) insert/remove/contains
/// and uniform random selection.
///
/// Removal is swap-remove, so iteration order is not insertion order.
#[derive(Debug, Clone)]
pub(crate) struct CutEdgeSet {
    edges: Vec<usize>,
    loc: Vec<Option<usize>>, // loc[e] = Some(i) iff edges[i] == e
}

impl CutEdgeSet {
    /// Empty set over a universe of `num_edges` edge ids.
    pub(crate) fn new(num_edges: usize) -> Self {
        Self { edges: Vec::new(), loc: vec![None; num_edges] }
    }

    #[inline] pub(crate) fn len(&self) -> usize { self.edges.len() }

    #[inline] pub(crate) fn is_empty(&self) -> bool { self.edges.is_empty() }

    #[inline]
    pub(crate) fn contains(&self, edge: usize) -> bool {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        self.loc[edge].is_some()
    }

    #[inline] pub(crate) fn as_slice(&self) -> &[usize] { &self.edges }

    /// Uniformly random member, or `None` if the set is empty.
    pub(crate) fn choose(&self, rng: &mut impl Rng) -> Option<usize> {
        if self.is_empty() { return None }
        Some(self.edges[rng.random_range(0..self.edges.len())])
    }

    /// Rebuild from an iterator of edge ids. Ids not mentioned end up absent.
    pub(crate) fn rebuild_from<I>(&mut self, iter: I) where I: IntoIterator<Item = usize> {
        self.edges.clear();
        self.loc.fill(None);
        for edge in iter { self.insert(edge) }
    }

    /// Insert `edge` (no-op if present).
    pub(crate) fn insert(&mut self, edge: usize) {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        if self.loc[edge].is_some() { return }
        self.loc[edge] = Some(self.edges.len());
        self.edges.push(edge);
    }

    /// Remove `edge` (no-op if absent).
    pub(crate) fn remove(&mut self, edge: usize) {
        debug_assert!(edge < self.loc.len(), "edge id out of range");
        if let Some(pos) = self.loc[edge].take() {
            self.edges.swap_remove(pos);
            if let Some(&moved) = self.edges.get(pos) { self.loc[moved] = Some(pos) }
        }
    }

    /// Set membership of `edge` to `cut`.
    #[inline]
    pub(crate) fn set(&mut self, edge: usize, cut: bool) {
        if cut { self.insert(edge) } else { self.remove(edge) }
    }

    /// Members in ascending order.
    pub(crate) fn sorted(&self) -> Vec<usize> {
        let mut edges = self.edges.clone();
        edges.sort_unstable();
        edges
    }
}
