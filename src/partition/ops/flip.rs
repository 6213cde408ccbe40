use rand::Rng;

use crate::partition::Partition;

impl Partition {
    /// Uniformly random cut edge, or None if no edge crosses a district boundary.
    #[inline]
    pub(crate) fn random_cut_edge(&self, rng: &mut impl Rng) -> Option<usize> {
        self.cut_edges.choose(rng)
    }

    /// Move a single unit to another district, updating tallies and cut edges incrementally.
    /// Performs no validity checks; callers validate moves beforehand.
    pub(crate) fn move_unit(&mut self, node: usize, district: u32) {
        assert!(node < self.num_nodes(), "node {} out of range", node);
        assert!(district <= self.num_districts(), "district {} out of range [0, {}]", district, self.num_districts());

        let prev = self.assignment(node);
        if prev == district { return }

        self.parts.move_to(node, district);
        self.update_on_node_move(node, prev);
    }

    /// Move a set of units to a district, one unit at a time.
    pub(crate) fn move_units(&mut self, nodes: &[usize], district: u32) {
        for &node in nodes { self.move_unit(node, district) }
    }
}
