use crate::partition::Partition;

impl Partition {
    /// Ideal district population: total population / number of districts.
    pub fn ideal_population(&self) -> f64 {
        self.graph().total_population() as f64 / self.num_districts() as f64
    }

    /// Inclusive district population bounds for a relative tolerance.
    pub fn population_bounds(&self, tolerance: f64) -> (f64, f64) {
        let ideal = self.ideal_population();
        (ideal - ideal * tolerance, ideal + ideal * tolerance)
    }

    /// Relative deviation of a district's population from the ideal.
    pub fn population_deviation(&self, part: u32) -> f64 {
        self.district_population(part) as f64 / self.ideal_population() - 1.0
    }

    /// Largest absolute relative deviation over all districts.
    pub fn max_population_deviation(&self) -> f64 {
        (1..=self.num_districts())
            .map(|part| self.population_deviation(part).abs())
            .fold(0.0, f64::max)
    }
}
