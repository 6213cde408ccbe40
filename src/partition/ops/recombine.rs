use crate::partition::Partition;

impl Partition {
    /// Units of districts `a` and `b` together, `a`'s first.
    pub(crate) fn merged_units(&self, a: u32, b: u32) -> Vec<usize> {
        self.district_units(a).iter()
            .chain(self.district_units(b))
            .copied()
            .collect()
    }

    /// Redraw two districts so that `a` holds exactly `first` and `b` exactly `second`.
    /// The two pieces must together cover the current units of both districts.
    pub(crate) fn recombine_districts(&mut self, (a, b): (u32, u32), first: &[usize], second: &[usize]) {
        debug_assert!(first.len() + second.len() == self.district_size(a) + self.district_size(b),
            "pieces must cover districts {a} and {b}");

        self.move_units(first, a);
        self.move_units(second, b);
    }
}
