//! Fairness constraints (FA1–FA6): home/away balance, alternation between
//! pairs, travel and cost budgets.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{format_ids, SlotFilter, Tally, TeamFilter};
use crate::instance::Instance;
use crate::models::{HomeMode, SlotId};

/// FA1: the running home/away imbalance of each team stays within `intp`
/// at the slots of the filter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fa1 {
    pub teams: TeamFilter,
    pub intp: i64,
    pub slots: SlotFilter,
}

/// FA2: any two teams differ by at most `intp` in `mode` games played at
/// each slot of the filter. Only defined for filters covering every team
/// and every slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fa2 {
    pub teams: TeamFilter,
    pub mode: HomeMode,
    pub intp: i64,
    pub slots: SlotFilter,
}

/// FA3: each pair of teams alternates home advantage over its mutual games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fa3 {
    pub teams: TeamFilter,
}

/// FA4: modelled and serialized, not evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fa4 {
    pub teams: TeamFilter,
    pub intp: i64,
}

/// FA5: the teams together travel at most `intp` in the slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fa5 {
    pub teams: TeamFilter,
    pub slots: SlotFilter,
    pub intp: i64,
}

/// FA6: the games in the slots cost at most `intp` in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fa6 {
    pub slots: SlotFilter,
    pub intp: i64,
}

impl Fa1 {
    pub fn new(teams: TeamFilter, intp: i64, slots: SlotFilter) -> Self {
        Self { teams, intp, slots }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let slots = self.slots.resolve(inst);
        for t in self.teams.resolve(inst) {
            let schedule = inst.team_schedule(t);
            // After the first game the imbalance is one.
            let mut difference = 1;
            let mut max_difference = -1;
            let mut max_slot = None;
            for pair in schedule.windows(2) {
                if pair[0].is_home(t) != pair[1].is_home(t) {
                    difference = 0;
                    continue;
                }
                difference += 1;
                if difference > max_difference && pair[1].slot.is_some_and(|s| slots.contains(&s)) {
                    max_difference = difference;
                    max_slot = pair[1].slot;
                }
            }
            if max_difference > self.intp {
                let slot = max_slot.map_or(-1, i64::from);
                tally.charge(
                    max_difference,
                    format!(
                        "Team {t:>3} has a home-away difference of {max_difference} in slot {slot}. Allowed: {}.",
                        self.intp
                    ),
                );
            }
        }
    }
}

impl Fa2 {
    pub fn new(teams: TeamFilter, mode: HomeMode, intp: i64, slots: SlotFilter) -> Self {
        Self {
            teams,
            mode,
            intp,
            slots,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams = self.teams.resolve(inst);
        let slots = self.slots.resolve(inst);
        assert!(
            teams.len() == inst.teams().len() && slots.len() == inst.slots().len(),
            "FA2 is only defined for filters covering every team and every slot"
        );

        // played[i][j]: games of team i played up to and including slot j.
        let horizon: Vec<SlotId> = inst.slots().keys().copied().collect();
        let played: Vec<(u32, Vec<i64>)> = teams
            .iter()
            .map(|&t| {
                let games: Vec<SlotId> = inst
                    .meetings_team(&BTreeSet::from([t]), self.mode)
                    .iter()
                    .filter_map(|m| m.slot)
                    .collect();
                let mut count = 0;
                let mut next = games.iter().peekable();
                let row = horizon
                    .iter()
                    .map(|&s| {
                        while next.next_if(|&&g| g <= s).is_some() {
                            count += 1;
                        }
                        count
                    })
                    .collect();
                (t, row)
            })
            .collect();

        for (i, (t1, row1)) in played.iter().enumerate() {
            for (t2, row2) in &played[i + 1..] {
                let (max_difference, slot) = row1
                    .iter()
                    .zip(row2)
                    .zip(&horizon)
                    .map(|((a, b), &s)| ((a - b).abs(), s))
                    .fold((0, None), |best, (d, s)| if d > best.0 { (d, Some(s)) } else { best });
                if max_difference > self.intp {
                    let slot = slot.map_or(-1, i64::from);
                    tally.charge(
                        max_difference - self.intp,
                        format!(
                            "Teams {t1} and {t2} differ by {max_difference} {}-games in slot {slot}. Allowed: {}.",
                            self.mode, self.intp
                        ),
                    );
                }
            }
        }
    }
}

impl Fa3 {
    pub fn new(teams: TeamFilter) -> Self {
        Self { teams }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams: Vec<u32> = self.teams.resolve(inst).into_iter().collect();
        for (i, &t1) in teams.iter().enumerate() {
            for &t2 in &teams[i + 1..] {
                let mutual = inst.meetings_team_team(
                    &BTreeSet::from([t1]),
                    &BTreeSet::from([t2]),
                    HomeMode::Either,
                );
                let repeats = mutual
                    .windows(2)
                    .filter(|pair| pair[0].home() == pair[1].home())
                    .count() as i64;
                if repeats > 0 {
                    tally.charge(
                        repeats,
                        format!("Teams {t1} and {t2} repeat home advantage {repeats} times in consecutive mutual games."),
                    );
                }
            }
        }
    }
}

impl Fa4 {
    pub fn new(teams: TeamFilter, intp: i64) -> Self {
        Self { teams, intp }
    }
}

impl Fa5 {
    pub fn new(teams: TeamFilter, slots: SlotFilter, intp: i64) -> Self {
        Self { teams, slots, intp }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let teams = self.teams.resolve(inst);
        let slots = self.slots.resolve(inst);
        let total: i64 = teams.iter().map(|&t| inst.distance(t, &slots)).sum();
        if total > self.intp {
            tally
                .charge(
                    total - self.intp,
                    format!("Teams travel {total} in total. Allowed: {}.", self.intp),
                )
                .details
                .push(format!("Teams: {}", format_ids(&teams)));
        }
    }
}

impl Fa6 {
    pub fn new(slots: SlotFilter, intp: i64) -> Self {
        Self { slots, intp }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let slots = self.slots.resolve(inst);
        let total: i64 = inst
            .meetings_slot(&slots)
            .iter()
            .filter_map(|m| m.slot.map(|s| inst.cost_of(m.first, m.second, s)))
            .sum();
        if total > self.intp {
            tally.charge(
                total - self.intp,
                format!("Games in S cost {total} in total. Allowed: {}.", self.intp),
            );
        }
    }
}
