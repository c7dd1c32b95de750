//! Break constraints (BR1–BR4).
//!
//! A break is a pair of consecutive games of a team with the same role; it
//! is located at the slot of the second game. BR1 bounds the breaks of each
//! team, BR2 the total over a team group. BR3 and BR4 are modelled and
//! serialized but charge nothing.

use serde::{Deserialize, Serialize};

use super::{SlotFilter, Tally, TeamFilter};
use crate::instance::Instance;
use crate::models::{BreakMode, CompareMode, HomeMode};

/// BR1: each team has exactly (`Eq`) or at most (`Leq`) `intp` breaks of
/// role `mode2` in the slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Br1 {
    pub teams: TeamFilter,
    pub intp: i64,
    pub mode1: CompareMode,
    pub mode2: HomeMode,
    pub slots: SlotFilter,
}

/// BR2: the teams together have exactly (`Eq`) or at most (`Leq`) `intp`
/// breaks in the slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Br2 {
    pub teams: TeamFilter,
    pub mode2: CompareMode,
    pub intp: i64,
    pub slots: SlotFilter,
}

/// BR3: bounded `mode1` breaks of role `mode2` per team. Not evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Br3 {
    pub teams: TeamFilter,
    pub mode1: BreakMode,
    pub mode2: HomeMode,
    pub intp: i64,
}

/// BR4: bounded breaks in the slots. Not evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Br4 {
    pub mode: CompareMode,
    pub teams: TeamFilter,
    pub min: i64,
    pub slots: SlotFilter,
}

fn compare(rule: &str, mode: CompareMode, breaks: i64, intp: i64) -> i64 {
    match mode {
        CompareMode::Eq => (breaks - intp).abs(),
        CompareMode::Leq => (breaks - intp).max(0),
        other => panic!("{rule} supports only EQ and LEQ comparisons, got {other}"),
    }
}

impl Br1 {
    pub fn new(
        teams: TeamFilter,
        intp: i64,
        mode1: CompareMode,
        mode2: HomeMode,
        slots: SlotFilter,
    ) -> Self {
        Self {
            teams,
            intp,
            mode1,
            mode2,
            slots,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let slots = self.slots.resolve(inst);
        for t in self.teams.resolve(inst) {
            let n = inst
                .break_slots(t)
                .into_iter()
                .filter(|&(s, role)| {
                    (self.mode2 == HomeMode::Either || self.mode2 == role) && slots.contains(&s)
                })
                .count() as i64;
            let dev = compare("BR1", self.mode1, n, self.intp);
            if dev > 0 {
                tally.charge(
                    dev,
                    format!(
                        "Team {t:>3} has {n} {}-breaks. Required: {} {}.",
                        self.mode2, self.mode1, self.intp
                    ),
                );
            }
        }
    }
}

impl Br2 {
    pub fn new(teams: TeamFilter, mode2: CompareMode, intp: i64, slots: SlotFilter) -> Self {
        Self {
            teams,
            mode2,
            intp,
            slots,
        }
    }

    /// Role of the counted breaks; BR2 always counts both.
    pub fn home_mode(&self) -> HomeMode {
        HomeMode::Either
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let slots = self.slots.resolve(inst);
        let n: i64 = self
            .teams
            .resolve(inst)
            .into_iter()
            .map(|t| {
                inst.break_slots(t)
                    .into_iter()
                    .filter(|(s, _)| slots.contains(s))
                    .count() as i64
            })
            .sum();
        let dev = compare("BR2", self.mode2, n, self.intp);
        if dev > 0 {
            tally.charge(
                dev,
                format!("Teams have {n} breaks in total. Required: {} {}.", self.mode2, self.intp),
            );
        }
    }
}

impl Br3 {
    pub fn new(teams: TeamFilter, mode1: BreakMode, mode2: HomeMode, intp: i64) -> Self {
        Self {
            teams,
            mode1,
            mode2,
            intp,
        }
    }
}

impl Br4 {
    pub fn new(mode: CompareMode, teams: TeamFilter, min: i64, slots: SlotFilter) -> Self {
        Self {
            mode,
            teams,
            min,
            slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{fixtures, Constraint};
    use super::*;
    use crate::models::Cost;

    /// Team 0: H H A A H over slots 0..5 (home breaks at 1, away break at 3).
    fn instance() -> Instance {
        fixtures::with_games(
            4,
            5,
            &[(0, 1, 0), (0, 2, 1), (3, 0, 2), (1, 0, 3), (0, 3, 4)],
        )
    }

    #[test]
    fn test_br1_leq() {
        let c = Constraint::hard(
            1,
            Br1::new(
                TeamFilter::teams([0]),
                0,
                CompareMode::Leq,
                HomeMode::Home,
                SlotFilter::slots(0..5),
            ),
        );
        assert_eq!(c.check(&instance()).cost, Cost::new(1, 0));
    }

    #[test]
    fn test_br1_eq_counts_both_roles() {
        let c = Constraint::soft(
            2,
            Br1::new(
                TeamFilter::teams([0]),
                4,
                CompareMode::Eq,
                HomeMode::Either,
                SlotFilter::slots(0..5),
            ),
        );
        // two breaks, exactly four required
        assert_eq!(c.check(&instance()).cost, Cost::new(0, 4));
    }

    #[test]
    fn test_br1_slot_filter() {
        let c = Constraint::hard(
            1,
            Br1::new(
                TeamFilter::teams([0]),
                0,
                CompareMode::Leq,
                HomeMode::Either,
                SlotFilter::slots([2, 4]),
            ),
        );
        assert_eq!(c.check(&instance()).cost, Cost::ZERO);
    }

    #[test]
    #[should_panic(expected = "BR1 supports only EQ and LEQ")]
    fn test_br1_unsupported_comparison() {
        let c = Constraint::hard(
            1,
            Br1::new(
                TeamFilter::teams([0]),
                0,
                CompareMode::Geq,
                HomeMode::Home,
                SlotFilter::slots([0]),
            ),
        );
        c.check(&instance());
    }

    #[test]
    fn test_br2_total() {
        let c = Constraint::hard(
            1,
            Br2::new(TeamFilter::teams(0..4), CompareMode::Leq, 1, SlotFilter::slots(0..5)),
        );
        let inst = instance();
        let total: i64 = (0..4).map(|t| inst.breaks(t)).sum();
        assert_eq!(c.check(&inst).cost, Cost::new(total - 1, 0));
        assert_eq!(Br2::new(TeamFilter::default(), CompareMode::Eq, 0, SlotFilter::default()).home_mode(), HomeMode::Either);
    }

    #[test]
    fn test_br3_br4_charge_nothing() {
        let inst = instance();
        let br3 = Constraint::hard(
            5,
            Br3::new(TeamFilter::teams([0]), BreakMode::Regular, HomeMode::Home, 0),
        );
        let br4 = Constraint::hard(
            5,
            Br4::new(CompareMode::Leq, TeamFilter::teams([0]), 0, SlotFilter::slots(0..5)),
        );
        assert_eq!(br3.check(&inst).cost, Cost::ZERO);
        assert_eq!(br4.check(&inst).cost, Cost::ZERO);
    }
}
