//! Separation constraints: distance between mutual games (SE1) and paired
//! slots (SE2).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::ops::Bound;

use super::{Tally, TeamFilter};
use crate::instance::Instance;
use crate::models::{HomeMode, SlotId, TeamId};

/// SE1: consecutive mutual games of each pair are separated by at least
/// `min` slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Se1 {
    pub teams: TeamFilter,
    pub min: i64,
}

/// SE2: each pair of teams meets equally often in both slots of every
/// listed slot pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Se2 {
    pub teams: TeamFilter,
    pub slot_pairs: Vec<(SlotId, SlotId)>,
}

fn team_pairs(teams: &BTreeSet<TeamId>) -> impl Iterator<Item = (TeamId, TeamId)> + '_ {
    teams
        .iter()
        .flat_map(move |&t1| {
            teams
                .range((Bound::Excluded(t1), Bound::Unbounded))
                .map(move |&t2| (t1, t2))
        })
}

impl Se1 {
    pub fn new(teams: TeamFilter, min: i64) -> Self {
        Self { teams, min }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams = self.teams.resolve(inst);
        for (t1, t2) in team_pairs(&teams) {
            let slots: Vec<i64> = inst
                .meetings_team_team(&BTreeSet::from([t1]), &BTreeSet::from([t2]), HomeMode::Either)
                .iter()
                .filter_map(|m| m.slot.map(i64::from))
                .collect();
            for pair in slots.windows(2) {
                let gap = pair[1] - pair[0] - 1;
                let dev = (self.min - gap).max(0);
                if dev > 0 {
                    tally.charge(
                        dev,
                        format!(
                            "Teams {t1} and {t2} meet in slots {} and {}, {gap} slots apart. Required: {}.",
                            pair[0], pair[1], self.min
                        ),
                    );
                }
            }
        }
    }
}

impl Se2 {
    pub fn new(teams: TeamFilter, slot_pairs: impl IntoIterator<Item = (SlotId, SlotId)>) -> Self {
        Self {
            teams,
            slot_pairs: slot_pairs.into_iter().collect(),
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams = self.teams.resolve(inst);
        for &(a, b) in &self.slot_pairs {
            for (t1, t2) in team_pairs(&teams) {
                let count = |s: SlotId| {
                    inst.meetings_team_team_slot(
                        &BTreeSet::from([t1]),
                        &BTreeSet::from([t2]),
                        &BTreeSet::from([s]),
                        HomeMode::Either,
                    )
                    .len()
                };
                let (in_a, in_b) = (count(a), count(b));
                if in_a != in_b {
                    tally.charge(
                        1,
                        format!("Teams {t1} and {t2} meet {in_a} times in slot {a} but {in_b} times in slot {b}."),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{fixtures, Constraint};
    use super::*;
    use crate::instance::Instance;
    use crate::models::{Cost, League, Meeting, Slot, Team};

    #[test]
    fn test_se1_min_separation() {
        let inst = fixtures::with_games(2, 6, &[(0, 1, 0), (1, 0, 2)]);
        // one slot between the games
        let ok = Constraint::hard(1, Se1::new(TeamFilter::teams([0, 1]), 1));
        assert_eq!(ok.check(&inst).cost, Cost::ZERO);
        let tight = Constraint::soft(3, Se1::new(TeamFilter::teams([0, 1]), 4));
        assert_eq!(tight.check(&inst).cost, Cost::new(0, 9));
    }

    #[test]
    fn test_se1_back_to_back() {
        let inst = fixtures::with_games(2, 2, &[(0, 1, 0), (1, 0, 1)]);
        let c = Constraint::hard(1, Se1::new(TeamFilter::teams([0, 1]), 1));
        let outcome = c.check(&inst);
        assert_eq!(outcome.cost, Cost::new(1, 0));
        assert!(outcome.violations[0].message.contains("0 slots apart"));
    }

    #[test]
    fn test_se2_paired_slots() {
        let inst = fixtures::with_games(4, 4, &[(0, 1, 0), (2, 3, 0), (1, 0, 1), (3, 2, 3)]);
        let c = Constraint::hard(1, Se2::new(TeamFilter::teams(0..4), [(0, 1), (0, 3)]));
        // (0,1) is paired in 0/1 but not 0/3; (2,3) in 0/3 but not 0/1
        assert_eq!(c.check(&inst).cost, Cost::new(2, 0));
    }

    #[test]
    fn test_se2_ignores_unselected_teams() {
        let inst = fixtures::with_games(4, 2, &[(2, 3, 0)]);
        let c = Constraint::hard(1, Se2::new(TeamFilter::teams([0, 1]), [(0, 1)]));
        assert_eq!(c.check(&inst).cost, Cost::ZERO);
    }

    /// Teams 0 and `u32::MAX`, meeting in slots 0 and 1.
    fn extreme_ids() -> Instance {
        let mut inst = Instance::new();
        inst.add_league(League::new(0, "L").with_rounds(2)).unwrap();
        inst.add_team(Team::new(0, "Low", 0)).unwrap();
        inst.add_team(Team::new(u32::MAX, "High", 0)).unwrap();
        for s in 0..3 {
            inst.add_slot(Slot::new(s, format!("S{s}"))).unwrap();
        }
        inst.add_meeting(Meeting::new(0, u32::MAX).with_slot(0)).unwrap();
        inst.add_meeting(Meeting::new(u32::MAX, 0).with_slot(1)).unwrap();
        inst
    }

    #[test]
    fn test_se1_highest_team_id() {
        let inst = extreme_ids();
        let c = Constraint::hard(1, Se1::new(TeamFilter::teams([0, u32::MAX]), 1));
        let outcome = c.check(&inst);
        assert_eq!(outcome.cost, Cost::new(1, 0));
        assert_eq!(outcome.violations.len(), 1);
    }

    #[test]
    fn test_se2_highest_team_id() {
        let inst = extreme_ids();
        let c = Constraint::hard(1, Se2::new(TeamFilter::teams([0, u32::MAX]), [(0, 2)]));
        let outcome = c.check(&inst);
        assert_eq!(outcome.cost, Cost::new(1, 0));
        assert_eq!(outcome.violations.len(), 1);
    }
}
