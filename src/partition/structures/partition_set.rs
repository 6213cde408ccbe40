/// Total assignment of units to districts with O(1) move and O(1) membership lookups.
/// District 0 holds unassigned units.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PartitionSet {
    sets: Vec<Vec<usize>>,  // sets[d] = units currently in district d
    index: Vec<u32>,        // index[u] = d when u is in sets[d]
    position: Vec<usize>,   // position[u] = i when sets[d][i] is u
}

impl PartitionSet {
    /// Create a set of `num_sets` districts over `num_elems` units, all starting in district 0.
    pub(crate) fn new(num_sets: usize, num_elems: usize) -> Self {
        assert!(num_sets > 0, "must have at least one set");
        let mut sets = vec![Vec::new(); num_sets];
        sets[0] = (0..num_elems).collect();
        Self { sets, index: vec![0; num_elems], position: (0..num_elems).collect() }
    }

    #[inline] pub(crate) fn num_sets(&self) -> usize { self.sets.len() }

    #[inline] pub(crate) fn num_elems(&self) -> usize { self.index.len() }

    /// District currently holding `elem`.
    #[inline]
    pub(crate) fn find(&self, elem: usize) -> u32 {
        debug_assert!(elem < self.index.len(), "element out of range");
        self.index[elem]
    }

    /// Units in district `set`, in no particular order.
    #[inline]
    pub(crate) fn get(&self, set: u32) -> &[usize] {
        debug_assert!((set as usize) < self.sets.len(), "set out of range");
        &self.sets[set as usize]
    }

    /// Number of units in district `set`.
    #[inline] pub(crate) fn size(&self, set: u32) -> usize { self.get(set).len() }

    /// District of every unit, indexed by unit.
    #[inline] pub(crate) fn assignments(&self) -> &[u32] { &self.index }

    /// Rebuild from a complete slice of assignments.
    pub(crate) fn rebuild(&mut self, assignments: &[u32]) {
        assert!(assignments.len() == self.num_elems(), "assignments length mismatch");

        self.sets.iter_mut().for_each(|v| v.clear());
        for (elem, &set) in assignments.iter().enumerate() {
            assert!((set as usize) < self.num_sets(), "set out of range");
            self.index[elem] = set;
            self.position[elem] = self.sets[set as usize].len();
            self.sets[set as usize].push(elem);
        }
    }

    /// Move `elem` into `set`, swap-removing it from its previous district.
    pub(crate) fn move_to(&mut self, elem: usize, set: u32) {
        debug_assert!(elem < self.index.len(), "element out of range");
        debug_assert!((set as usize) < self.sets.len(), "set out of range");

        let (prev, pos) = (self.index[elem] as usize, self.position[elem]);
        if prev == set as usize { return }

        let bucket = &mut self.sets[prev];
        bucket.swap_remove(pos);
        if let Some(&moved) = bucket.get(pos) { self.position[moved] = pos }

        self.index[elem] = set;
        self.position[elem] = self.sets[set as usize].len();
        self.sets[set as usize].push(elem);
    }
}

#[cfg(test)]
mod tests {
    use super::PartitionSet;

    fn consistent(ps: &PartitionSet) -> bool {
        (0..ps.num_elems()).all(|u| ps.get(ps.find(u)).contains(&u))
            && (0..ps.num_sets() as u32).map(|d| ps.size(d)).sum::<usize>() == ps.num_elems()
    }

    #[test]
    fn starts_unassigned() {
        let ps = PartitionSet::new(3, 4);
        assert_eq!(ps.get(0), &[0, 1, 2, 3]);
        assert_eq!(ps.size(1), 0);
        assert!(ps.assignments().iter().all(|&d| d == 0));
    }

    #[test]
    fn rebuild_groups_by_district() {
        let mut ps = PartitionSet::new(3, 6);
        ps.rebuild(&[1, 2, 2, 1, 0, 2]);
        assert_eq!(ps.get(0), &[4]);
        assert_eq!(ps.get(1), &[0, 3]);
        assert_eq!(ps.get(2), &[1, 2, 5]);
        assert!(consistent(&ps));
    }

    #[test]
    #[should_panic(expected = "set out of range")]
    fn rebuild_rejects_unknown_district() {
        PartitionSet::new(2, 2).rebuild(&[0, 2]);
    }

    #[test]
    fn move_to_updates_swapped_position() {
        let mut ps = PartitionSet::new(3, 5);
        ps.rebuild(&[1, 1, 1, 2, 2]);
        ps.move_to(0, 2); // unit 2 takes unit 0's slot
        assert_eq!(ps.find(0), 2);
        assert_eq!(ps.get(1), &[2, 1]);
        ps.move_to(2, 2);
        assert_eq!(ps.get(1), &[1]);
        assert!(consistent(&ps));
    }

    #[test]
    fn move_to_same_district_is_noop() {
        let mut ps = PartitionSet::new(2, 3);
        ps.rebuild(&[1, 1, 0]);
        let before = ps.clone();
        ps.move_to(1, 1);
        assert_eq!(ps, before);
    }
}
