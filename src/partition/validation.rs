use crate::{error::PlanError, partition::{Partition, tree::Balance}};

impl Partition {
    /// Every way in which this partition fails to be a valid plan: empty districts,
    /// unassigned units, split districts, and districts outside the population bounds.
    pub fn validate(&self, tolerance: f64) -> Vec<PlanError> {
        let mut problems = self.district_units(0).iter()
            .map(|&u| PlanError::Unassigned(self.graph().unit_id(u).to_string()))
            .collect::<Vec<_>>();

        let balance = Balance { ideal: self.ideal_population(), tolerance };
        let (min, max) = balance.bounds(1);
        for district in 1..=self.num_districts() {
            if self.part_is_empty(district) {
                problems.push(PlanError::EmptyDistrict(district));
                continue;
            }

            let components = self.find_components(district).len();
            if components > 1 {
                problems.push(PlanError::NonContiguous { district, components });
            }

            let population = self.district_population(district);
            if !balance.accepts(population, 1) {
                problems.push(PlanError::Unbalanced { district, population, min, max });
            }
        }

        problems
    }

    /// True if every unit is assigned and each district is non-empty, contiguous and balanced.
    #[inline] pub fn is_valid(&self, tolerance: f64) -> bool { self.validate(tolerance).is_empty() }
}
