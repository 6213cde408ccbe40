use crate::partition::Partition;

impl Partition {
    /// Total votes over all tracked parties in a district.
    pub fn district_total_votes(&self, part: u32) -> u64 {
        (0..self.graph().parties().len()).map(|party| self.district_votes(part, party)).sum()
    }

    /// Party (by index) with strictly more votes than every other tracked party, if any.
    pub fn district_winner(&self, part: u32) -> Option<usize> {
        let num_parties = self.graph().parties().len();
        let (best, votes) = (0..num_parties)
            .map(|party| (party, self.district_votes(part, party)))
            .max_by_key(|&(_, votes)| votes)?;
        let tied = (0..num_parties).any(|party| party != best && self.district_votes(part, party) == votes);
        (!tied).then_some(best)
    }

    /// Number of districts won outright by a party.
    pub fn wins(&self, party: usize) -> usize {
        (1..=self.num_districts())
            .filter(|&part| self.district_winner(part) == Some(party))
            .count()
    }

    /// Share of the tracked vote won by a party in one district (0 if no votes).
    pub fn vote_share(&self, part: u32, party: usize) -> f64 {
        let total = self.district_total_votes(part);
        if total == 0 { 0.0 } else { self.district_votes(part, party) as f64 / total as f64 }
    }

    /// Share of the tracked vote won by a party over all districts.
    pub fn overall_vote_share(&self, party: usize) -> f64 {
        let (votes, total) = (1..=self.num_districts())
            .fold((0u64, 0u64), |(v, t), part| (v + self.district_votes(part, party), t + self.district_total_votes(part)));
        if total == 0 { 0.0 } else { votes as f64 / total as f64 }
    }

    /// Median minus mean of a party's district vote shares.
    pub fn mean_median(&self, party: usize) -> f64 {
        let mut shares = (1..=self.num_districts())
            .map(|part| self.vote_share(part, party))
            .collect::<Vec<_>>();
        if shares.is_empty() { return 0.0 }
        shares.sort_by(f64::total_cmp);

        let n = shares.len();
        let median = if n % 2 == 1 { shares[n / 2] } else { (shares[n / 2 - 1] + shares[n / 2]) / 2.0 };
        let mean = shares.iter().sum::<f64>() / n as f64;
        median - mean
    }

    /// Efficiency gap of a party against all other tracked parties combined:
    /// (party wasted votes - opposition wasted votes) / total votes.
    /// Positive values mean the party wastes more votes.
    pub fn efficiency_gap(&self, party: usize) -> f64 {
        let mut wasted = 0.0;
        let mut total = 0.0;
        for part in 1..=self.num_districts() {
            let votes = self.district_votes(part, party) as f64;
            let others = self.district_total_votes(part) as f64 - votes;
            let half = (votes + others) / 2.0;
            wasted += match votes.partial_cmp(&others) {
                Some(std::cmp::Ordering::Greater) => (votes - half) - others,
                Some(std::cmp::Ordering::Less) => votes - (others - half),
                _ => 0.0,
            };
            total += votes + others;
        }
        if total == 0.0 { 0.0 } else { wasted / total }
    }
}
