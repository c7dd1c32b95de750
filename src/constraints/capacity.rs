//! Capacity constraints (CA1–CA5): bounded numbers of games.
//!
//! Each rule counts games of a team (or a team group) in a set of slots,
//! a sliding window, or a run of away games, and charges the amount by
//! which the count leaves `[min, max]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{bound_deviation, format_ids, range_deviation, SlotFilter, Tally, TeamFilter};
use crate::instance::Instance;
use crate::models::{CountMode, GlobalMode, HomeMode, SlotId};

/// CA1: each team plays between `min` and `max` games of role `mode` in
/// the slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ca1 {
    pub teams: TeamFilter,
    pub min: i64,
    pub max: i64,
    pub mode: HomeMode,
    pub slots: SlotFilter,
}

/// CA2: each team of `teams1` plays between `min` and `max` games of role
/// `mode1` against `teams2` in the slots, in total (`Global`) or against
/// each other team (`Every`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ca2 {
    pub teams1: TeamFilter,
    pub teams2: TeamFilter,
    pub min: i64,
    pub max: i64,
    pub mode1: HomeMode,
    pub mode2: GlobalMode,
    pub slots: SlotFilter,
}

/// CA3: each team of `teams1` plays between `min` and `max` games of role
/// `mode1` against `teams2` in every window of `intp` consecutive slots or
/// games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ca3 {
    pub teams1: TeamFilter,
    pub teams2: TeamFilter,
    pub min: i64,
    pub max: i64,
    pub mode1: HomeMode,
    pub intp: i64,
    pub mode2: CountMode,
}

/// CA4: `teams1` together play between `min` and `max` games of role
/// `mode1` against `teams2`, over all slots (`Global`) or in each slot
/// (`Every`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ca4 {
    pub teams1: TeamFilter,
    pub teams2: TeamFilter,
    pub min: i64,
    pub max: i64,
    pub mode1: HomeMode,
    pub mode2: GlobalMode,
    pub slots: SlotFilter,
}

/// CA5: in each run of consecutive away games within the slots, each team
/// of `teams1` plays between `min` and `max` of them against `teams2`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ca5 {
    pub teams1: TeamFilter,
    pub teams2: TeamFilter,
    pub min: i64,
    pub max: i64,
    pub slots: SlotFilter,
}

impl Ca1 {
    pub fn new(teams: TeamFilter, min: i64, max: i64, mode: HomeMode, slots: SlotFilter) -> Self {
        Self {
            teams,
            min,
            max,
            mode,
            slots,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let slots = self.slots.resolve(inst);
        for t in self.teams.resolve(inst) {
            let n = inst
                .meetings_team_slot(&BTreeSet::from([t]), &slots, self.mode)
                .len() as i64;
            let dev = range_deviation(n, self.min, self.max);
            if dev > 0 {
                tally
                    .charge(
                        dev,
                        format!(
                            "Team {t:>3} has {n:>3} {:>2}-games in S. Allowed range is [{},{}].",
                            self.mode, self.min, self.max
                        ),
                    )
                    .details
                    .push(format!("Slots: {}", format_ids(&slots)));
            }
        }
    }
}

impl Ca2 {
    pub fn new(
        teams1: TeamFilter,
        teams2: TeamFilter,
        min: i64,
        max: i64,
        mode1: HomeMode,
        mode2: GlobalMode,
        slots: SlotFilter,
    ) -> Self {
        Self {
            teams1,
            teams2,
            min,
            max,
            mode1,
            mode2,
            slots,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams2 = self.teams2.resolve(inst);
        let slots = self.slots.resolve(inst);
        for t1 in self.teams1.resolve(inst) {
            let one = BTreeSet::from([t1]);
            match self.mode2 {
                GlobalMode::Global => {
                    let n = inst
                        .meetings_team_team_slot(&one, &teams2, &slots, self.mode1)
                        .len() as i64;
                    let dev = range_deviation(n, self.min, self.max);
                    if dev > 0 {
                        tally
                            .charge(
                                dev,
                                format!(
                                    "Team {t1:>3} has {n:>3} {:>2}-games against teams in T2. Allowed range is [{},{}].",
                                    self.mode1, self.min, self.max
                                ),
                            )
                            .details
                            .push(format!("T2: {}", format_ids(&teams2)));
                    }
                }
                GlobalMode::Every => {
                    for &t2 in teams2.iter().filter(|&&t2| t2 != t1) {
                        let n = inst
                            .meetings_team_team_slot(&one, &BTreeSet::from([t2]), &slots, self.mode1)
                            .len() as i64;
                        let dev = range_deviation(n, self.min, self.max);
                        if dev > 0 {
                            tally.charge(
                                dev,
                                format!(
                                    "Team {t1:>3} has {n:>3} {:>2}-games against team {t2}. Allowed range is [{},{}].",
                                    self.mode1, self.min, self.max
                                ),
                            );
                        }
                    }
                }
            }
        }
    }
}

impl Ca3 {
    pub fn new(
        teams1: TeamFilter,
        teams2: TeamFilter,
        min: i64,
        max: i64,
        mode1: HomeMode,
        intp: i64,
        mode2: CountMode,
    ) -> Self {
        Self {
            teams1,
            teams2,
            min,
            max,
            mode1,
            intp,
            mode2,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let Ok(width) = usize::try_from(self.intp) else {
            return;
        };
        if width == 0 {
            return;
        }
        let teams2 = self.teams2.resolve(inst);
        match self.mode2 {
            CountMode::Slots => self.check_slot_windows(inst, tally, &teams2, width),
            CountMode::Games => self.check_game_windows(inst, tally, &teams2, width),
        }
    }

    fn check_slot_windows(
        &self,
        inst: &Instance,
        tally: &mut Tally,
        teams2: &BTreeSet<u32>,
        width: usize,
    ) {
        let horizon: Vec<SlotId> = inst.slots().keys().copied().collect();
        for t in self.teams1.resolve(inst) {
            let one = BTreeSet::from([t]);
            for window in horizon.windows(width) {
                let period: BTreeSet<SlotId> = window.iter().copied().collect();
                let n = inst
                    .meetings_team_team_slot(&one, teams2, &period, self.mode1)
                    .len() as i64;
                let dev = range_deviation(n, self.min, self.max);
                if dev > 0 {
                    tally
                        .charge(
                            dev,
                            format!(
                                "Team {t:>3} has {n:>3} {:>2}-games in {:>2} slots. Allowed range is [{},{}].",
                                self.mode1, self.intp, self.min, self.max
                            ),
                        )
                        .details
                        .push(format!("Slots: {}", format_ids(&period)));
                }
            }
        }
    }

    fn check_game_windows(
        &self,
        inst: &Instance,
        tally: &mut Tally,
        teams2: &BTreeSet<u32>,
        width: usize,
    ) {
        for t in self.teams1.resolve(inst) {
            let schedule = inst.team_schedule(t);
            for window in schedule.windows(width) {
                let n = window
                    .iter()
                    .map(|m| {
                        let home = self.mode1.includes_home()
                            && m.away() != t
                            && teams2.contains(&m.away());
                        let away = self.mode1.includes_away()
                            && m.home() != t
                            && teams2.contains(&m.home());
                        i64::from(home) + i64::from(away)
                    })
                    .sum::<i64>();
                let dev = range_deviation(n, self.min, self.max);
                if dev > 0 {
                    let start = window[0].slot.map_or(-1, i64::from);
                    tally.charge(
                        dev,
                        format!(
                            "Team {t:>3} has {n:>3} consecutive {:>2}-games. Series starts in slot {start}. Allowed range is [{},{}].",
                            self.mode1, self.min, self.max
                        ),
                    );
                }
            }
        }
    }
}

impl Ca4 {
    pub fn new(
        teams1: TeamFilter,
        teams2: TeamFilter,
        min: i64,
        max: i64,
        mode1: HomeMode,
        mode2: GlobalMode,
        slots: SlotFilter,
    ) -> Self {
        Self {
            teams1,
            teams2,
            min,
            max,
            mode1,
            mode2,
            slots,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams1 = self.teams1.resolve(inst);
        let teams2 = self.teams2.resolve(inst);
        let slots = self.slots.resolve(inst);
        let periods: Vec<BTreeSet<SlotId>> = match self.mode2 {
            GlobalMode::Global => vec![slots],
            GlobalMode::Every => slots.iter().map(|&s| BTreeSet::from([s])).collect(),
        };
        for period in periods {
            let n = inst
                .meetings_team_team_slot(&teams1, &teams2, &period, self.mode1)
                .len() as i64;
            let dev = bound_deviation(n, self.min, self.max);
            if dev > 0 {
                tally
                    .charge(
                        dev,
                        format!(
                            "There are {n} teams playing {} in slots {}. Allowed range is [{},{}].",
                            self.mode1,
                            format_ids(&period),
                            self.min,
                            self.max
                        ),
                    )
                    .details
                    .extend([
                        format!("Teams1: {}", format_ids(&teams1)),
                        format!("Teams2: {}", format_ids(&teams2)),
                    ]);
            }
        }
    }
}

impl Ca5 {
    pub fn new(
        teams1: TeamFilter,
        teams2: TeamFilter,
        min: i64,
        max: i64,
        slots: SlotFilter,
    ) -> Self {
        Self {
            teams1,
            teams2,
            min,
            max,
            slots,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams2 = self.teams2.resolve(inst);
        let slots = self.slots.resolve(inst);
        for t in self.teams1.resolve(inst) {
            let games = inst.meetings_team_slot(&BTreeSet::from([t]), &slots, HomeMode::Either);
            // Maximal runs of away games.
            let runs = games
                .split(|m| m.is_home(t))
                .filter(|run| run.len() > 1);
            for run in runs {
                let n = run.iter().filter(|m| teams2.contains(&m.home())).count() as i64;
                let dev = range_deviation(n, self.min, self.max);
                if dev > 0 {
                    let start = run[0].slot.map_or(-1, i64::from);
                    tally.charge(
                        dev,
                        format!(
                            "Team {t:>3} plays {n:>3} consecutive away-games against teams in T2. Series starts in slot {start}. Allowed range is [{},{}].",
                            self.min, self.max
                        ),
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
    use crate::models::Cost;

    #[test]
    fn test_ca1_too_many_home_games() {
        let inst = fixtures::with_games(4, 4, &[(0, 1, 0), (0, 2, 1), (0, 3, 2), (1, 0, 3)]);
        let c = Constraint::hard(
            3,
            Ca1::new(
                TeamFilter::teams([0]),
                0,
                1,
                HomeMode::Home,
                SlotFilter::slots([0, 1, 2, 3]),
            ),
        );
        let outcome = c.check(&inst);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.violations[0].deviation, 2);
        assert_eq!(outcome.cost, Cost::new(6, 0));
    }

    #[test]
    fn test_ca1_minimum_and_groups() {
        // team group 0 = even teams {0, 2}
        let inst = fixtures::with_games(4, 2, &[(0, 1, 0), (3, 2, 0)]);
        let c = Constraint::soft(
            1,
            Ca1::new(TeamFilter::groups([0]), 1, 2, HomeMode::Home, SlotFilter::slots([0, 1])),
        );
        // team 2 plays no home game
        let outcome = c.check(&inst);
        assert_eq!(outcome.cost, Cost::new(0, 1));
        assert!(outcome.violations[0].message.contains("Team   2"));
    }

    #[test]
    fn test_ca2_global_and_every() {
        let inst = fixtures::with_games(4, 3, &[(0, 1, 0), (0, 2, 1), (0, 1, 2)]);
        let slots = SlotFilter::slots([0, 1, 2]);
        let global = Constraint::hard(
            1,
            Ca2::new(
                TeamFilter::teams([0]),
                TeamFilter::teams([1, 2]),
                0,
                2,
                HomeMode::Home,
                GlobalMode::Global,
                slots.clone(),
            ),
        );
        assert_eq!(global.check(&inst).cost, Cost::new(1, 0));

        let every = Constraint::hard(
            1,
            Ca2::new(
                TeamFilter::teams([0]),
                TeamFilter::teams([0, 1, 2]),
                0,
                1,
                HomeMode::Home,
                GlobalMode::Every,
                slots,
            ),
        );
        // two home games against team 1; team 0 itself is skipped
        let outcome = every.check(&inst);
        assert_eq!(outcome.cost, Cost::new(1, 0));
        assert_eq!(outcome.violations.len(), 1);
    }

    #[test]
    fn test_ca3_slot_windows() {
        // team 0 at home in slots 0, 1, 2; windows of 2 slots over 4 slots
        let inst = fixtures::with_games(4, 4, &[(0, 1, 0), (0, 2, 1), (0, 3, 2), (1, 0, 3)]);
        let c = Constraint::hard(
            1,
            Ca3::new(
                TeamFilter::teams([0]),
                TeamFilter::teams([1, 2, 3]),
                0,
                1,
                HomeMode::Home,
                2,
                CountMode::Slots,
            ),
        );
        // windows {0,1} and {1,2} hold 2 home games each, {2,3} holds 1
        let outcome = c.check(&inst);
        assert_eq!(outcome.violations.len(), 2);
        assert_eq!(outcome.cost, Cost::new(2, 0));
    }

    #[test]
    fn test_ca3_window_longer_than_horizon() {
        let inst = fixtures::with_games(2, 2, &[(0, 1, 0), (0, 1, 1)]);
        let c = Constraint::hard(
            1,
            Ca3::new(
                TeamFilter::teams([0]),
                TeamFilter::teams([1]),
                0,
                0,
                HomeMode::Home,
                3,
                CountMode::Slots,
            ),
        );
        assert_eq!(c.check(&inst).cost, Cost::ZERO);
    }

    #[test]
    fn test_ca3_game_windows() {
        // team 0: H vs 1, A at 2, H vs 3, H vs 1 (slots 0, 2, 5, 7)
        let inst = fixtures::with_games(4, 8, &[(0, 1, 0), (2, 0, 2), (0, 3, 5), (0, 1, 7)]);
        let c = Constraint::soft(
            2,
            Ca3::new(
                TeamFilter::teams([0]),
                TeamFilter::teams([1, 3]),
                0,
                1,
                HomeMode::Home,
                2,
                CountMode::Games,
            ),
        );
        // game windows: (H1, A2) = 1, (A2, H3) = 1, (H3, H1) = 2
        let outcome = c.check(&inst);
        assert_eq!(outcome.violations.len(), 1);
        assert_eq!(outcome.cost, Cost::new(0, 2));
        assert!(outcome.violations[0].message.contains("starts in slot 5"));
    }

    #[test]
    fn test_ca4_global_and_every() {
        let inst = fixtures::with_games(4, 2, &[(0, 1, 0), (2, 3, 0), (0, 3, 1)]);
        let teams1 = TeamFilter::teams([0, 2]);
        let teams2 = TeamFilter::teams([1, 3]);
        let global = Constraint::hard(
            1,
            Ca4::new(
                teams1.clone(),
                teams2.clone(),
                0,
                1,
                HomeMode::Home,
                GlobalMode::Global,
                SlotFilter::slots([0, 1]),
            ),
        );
        assert_eq!(global.check(&inst).cost, Cost::new(2, 0));

        let every = Constraint::hard(
            1,
            Ca4::new(
                teams1,
                teams2,
                0,
                1,
                HomeMode::Home,
                GlobalMode::Every,
                SlotFilter::slots([0, 1]),
            ),
        );
        // slot 0 hosts 2, slot 1 hosts 1
        assert_eq!(every.check(&inst).cost, Cost::new(1, 0));
    }

    #[test]
    fn test_ca5_away_runs() {
        // team 0: A@1, A@3, A@2, H, A@1 over slots 0..5
        let inst = fixtures::with_games(
            4,
            5,
            &[(1, 0, 0), (3, 0, 1), (2, 0, 2), (0, 3, 3), (1, 0, 4)],
        );
        let c = Constraint::hard(
            1,
            Ca5::new(
                TeamFilter::teams([0]),
                TeamFilter::teams([1, 3]),
                0,
                1,
                SlotFilter::slots(0..5),
            ),
        );
        // run of three away games holds two against {1, 3}; the lone
        // away game in slot 4 is not a run
        let outcome = c.check(&inst);
        assert_eq!(outcome.cost, Cost::new(1, 0));
        assert!(outcome.violations[0].message.contains("starts in slot 0"));
    }
}
