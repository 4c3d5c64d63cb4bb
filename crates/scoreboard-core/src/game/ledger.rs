//! Per-quarter, per-team score counts.

use serde::{Deserialize, Serialize};

use super::{Team, QUARTER_COUNT};

/// Score for one quarter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterScore {
    pub home: u32,
    pub away: u32,
}

impl QuarterScore {
    pub fn get(&self, team: Team) -> u32 {
        match team {
            Team::Home => self.home,
            Team::Away => self.away,
        }
    }

    fn slot(&mut self, team: Team) -> &mut u32 {
        match team {
            Team::Home => &mut self.home,
            Team::Away => &mut self.away,
        }
    }
}

/// Always holds exactly `QUARTER_COUNT` records. Quarters are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreLedger {
    quarters: [QuarterScore; QUARTER_COUNT as usize],
}

impl ScoreLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quarters(&self) -> &[QuarterScore] {
        &self.quarters
    }

    /// Record for `quarter`, or `None` outside 1..=QUARTER_COUNT.
    pub fn quarter(&self, quarter: u8) -> Option<&QuarterScore> {
        self.quarters.get(index(quarter)?)
    }

    /// Add one point. Returns the new count for that quarter.
    pub fn add(&mut self, quarter: u8, team: Team) -> u32 {
        let Some(record) = index(quarter).and_then(|i| self.quarters.get_mut(i)) else {
            return 0;
        };
        let slot = record.slot(team);
        *slot = slot.saturating_add(1);
        *slot
    }

    /// Remove one point if the count is above zero.
    /// Returns false, changing nothing, when it is already zero.
    pub fn remove(&mut self, quarter: u8, team: Team) -> bool {
        let Some(record) = index(quarter).and_then(|i| self.quarters.get_mut(i)) else {
            return false;
        };
        let slot = record.slot(team);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    pub fn total_for(&self, team: Team) -> u32 {
        self.quarters
            .iter()
            .fold(0u32, |acc, q| acc.saturating_add(q.get(team)))
    }
}

fn index(quarter: u8) -> Option<usize> {
    (1..=QUARTER_COUNT)
        .contains(&quarter)
        .then(|| usize::from(quarter - 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn add_targets_only_the_given_quarter() {
        let mut ledger = ScoreLedger::new();
        assert_eq!(ledger.add(2, Team::Home), 1);
        assert_eq!(ledger.add(2, Team::Home), 2);
        assert_eq!(ledger.quarter(2), Some(&QuarterScore { home: 2, away: 0 }));
        assert_eq!(ledger.quarter(1), Some(&QuarterScore::default()));
    }

    #[test]
    fn remove_at_zero_changes_nothing() {
        let mut ledger = ScoreLedger::new();
        ledger.add(1, Team::Away);
        let before = ledger.clone();
        assert!(!ledger.remove(1, Team::Home));
        assert_eq!(ledger, before);
    }

    #[test]
    fn out_of_range_quarters_are_ignored() {
        let mut ledger = ScoreLedger::new();
        assert_eq!(ledger.add(0, Team::Home), 0);
        assert_eq!(ledger.add(5, Team::Home), 0);
        assert!(ledger.quarter(5).is_none());
        assert_eq!(ledger.total_for(Team::Home), 0);
    }

    #[test]
    fn totals_span_quarters() {
        let mut ledger = ScoreLedger::new();
        ledger.add(1, Team::Home);
        ledger.add(3, Team::Home);
        ledger.add(4, Team::Away);
        assert_eq!(ledger.total_for(Team::Home), 2);
        assert_eq!(ledger.total_for(Team::Away), 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Add(u8, Team),
        Remove(u8, Team),
    }

    fn op() -> impl Strategy<Value = Op> {
        let team = prop_oneof![Just(Team::Home), Just(Team::Away)];
        (any::<bool>(), 1u8..=QUARTER_COUNT, team).prop_map(|(add, q, t)| {
            if add {
                Op::Add(q, t)
            } else {
                Op::Remove(q, t)
            }
        })
    }

    proptest! {
        #[test]
        fn totals_match_quarter_sums(ops in prop::collection::vec(op(), 0..200)) {
            let mut ledger = ScoreLedger::new();
            let mut model = [[0i64; 2]; QUARTER_COUNT as usize];
            for op in ops {
                match op {
                    Op::Add(q, t) => {
                        ledger.add(q, t);
                        model[usize::from(q - 1)][t as usize] += 1;
                    }
                    Op::Remove(q, t) => {
                        ledger.remove(q, t);
                        let cell = &mut model[usize::from(q - 1)][t as usize];
                        if *cell > 0 {
                            *cell -= 1;
                        }
                    }
                }
            }
            for team in [Team::Home, Team::Away] {
                let sum: u32 = ledger.quarters().iter().map(|q| q.get(team)).sum();
                prop_assert_eq!(ledger.total_for(team), sum);
                let expected: i64 = model.iter().map(|q| q[team as usize]).sum();
                prop_assert_eq!(i64::from(sum), expected);
            }
            prop_assert_eq!(ledger.quarters().len(), QUARTER_COUNT as usize);
        }
    }
}
