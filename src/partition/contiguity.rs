use std::collections::VecDeque;

use crate::partition::Partition;

impl Partition {
    /// Check if a district has no units.
    pub fn part_is_empty(&self, part: u32) -> bool {
        assert!(part <= self.num_districts(), "part must be in range [0, {}]", self.num_districts());
        self.district_size(part) == 0
    }

    /// Check if a unit borders a given district.
    pub fn node_borders_part(&self, node: usize, part: u32) -> bool {
        assert!(node < self.num_nodes(), "node {} out of range", node);
        self.graph().edges(node).any(|v| self.assignment(v) == part)
    }

    /// Check if district `a` borders district `b`.
    pub fn part_borders_part(&self, a: u32, b: u32) -> bool {
        self.district_units(a).iter().any(|&u| self.node_borders_part(u, b))
    }

    /// Check whether the district `node` currently belongs to stays connected once `node` leaves it.
    ///
    /// Traverses the remaining units of the district from an arbitrary start and confirms every
    /// one of them is reached. A district left empty counts as disconnected.
    pub fn remains_contiguous_without(&self, node: usize) -> bool {
        let part = self.assignment(node);
        let remaining = self.district_size(part) - 1;
        if remaining == 0 { return false }

        let Some(&start) = self.district_units(part).iter().find(|&&u| u != node) else { return false };

        let mut visited = vec![false; self.num_nodes()];
        visited[node] = true;
        visited[start] = true;

        let mut reached = 1;
        let mut queue = VecDeque::from([start]);
        while let Some(u) = queue.pop_front() {
            for v in self.graph().edges(u) {
                if !visited[v] && self.assignment(v) == part {
                    visited[v] = true;
                    reached += 1;
                    if reached == remaining { return true }
                    queue.push_back(v);
                }
            }
        }

        reached == remaining
    }

    /// Find all connected components (as unit lists) inside district `part`, largest first.
    pub fn find_components(&self, part: u32) -> Vec<Vec<usize>> {
        self.graph().components_within(self.district_units(part))
    }

    /// Check if a district is non-empty and connected.
    pub fn is_district_contiguous(&self, part: u32) -> bool {
        self.graph().is_connected_within(self.district_units(part))
    }

    /// Check if every real district `1..=K` is non-empty and connected.
    pub fn check_contiguity(&self) -> bool {
        (1..=self.num_districts()).all(|part| self.is_district_contiguous(part))
    }
}

#[cfg(test)]
mod tests {
    use crate::partition::{Partition, tests::{grid, halves}};

    #[test]
    fn borders() {
        let graph = grid(4, 2, 10);
        let assignments = halves(&graph, 4);
        let partition = Partition::from_assignments(graph, 2, &assignments);
        let r0c1 = partition.graph().index_of("r0c1").unwrap();
        let r0c0 = partition.graph().index_of("r0c0").unwrap();

        assert!(partition.node_borders_part(r0c1, 2));
        assert!(!partition.node_borders_part(r0c0, 2));
        assert!(partition.part_borders_part(1, 2));
        assert!(!partition.part_is_empty(1));
        assert!(partition.part_is_empty(0));
    }

    #[test]
    fn removing_a_bridge_unit_disconnects() {
        // Row of 4: district 1 = {c0, c1, c2}, district 2 = {c3}.
        let graph = grid(4, 1, 10);
        let partition = Partition::from_assignments(graph, 2, &[1, 1, 1, 2]);

        assert!(!partition.remains_contiguous_without(1)); // middle of the path
        assert!(partition.remains_contiguous_without(2));  // end of the path
        assert!(!partition.remains_contiguous_without(3)); // last unit of district 2
    }

    #[test]
    fn components_and_contiguity() {
        let graph = grid(4, 1, 10);
        let partition = Partition::from_assignments(graph, 2, &[1, 2, 1, 2]);
        assert_eq!(partition.find_components(1).len(), 2);
        assert!(!partition.is_district_contiguous(1));
        assert!(!partition.check_contiguity());

        let graph = grid(4, 2, 10);
        let assignments = halves(&graph, 4);
        let partition = Partition::from_assignments(graph, 2, &assignments);
        assert!(partition.check_contiguity());
    }
}
