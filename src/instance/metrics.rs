//! Derived metrics over a team's chronological schedule.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Distance | Venue-to-venue legs along the schedule, from and back to home |
//! | Breaks | Consecutive games with the same home/away role |
//! | Cost | Sum of the cost data over the team's home games |
//! | Carry-over | Σ w(i,j)·COM(i,j)² over a league's carry-over matrix |
//!
//! The metrics assume a fully and consistently scheduled timetable; on a
//! partial one they return a value over whatever is scheduled.
//!
//! # Reference
//! Russell (1980), "Balancing carry-over effects in round robin tournaments",
//! Biometrika 67(1)

use std::collections::{BTreeMap, BTreeSet};

use super::Instance;
use crate::models::{HomeMode, LeagueId, SlotId, TeamId};

impl Instance {
    /// Distance travelled by `team`.
    ///
    /// The trip starts and ends at the team's own venue; a game is played at
    /// the home team's venue. With a non-empty `slots`, only legs arriving at
    /// a game in `slots` are charged (the final leg home is charged if the
    /// last game is in `slots`).
    pub fn distance(&self, team: TeamId, slots: &BTreeSet<SlotId>) -> i64 {
        let schedule = self.team_schedule(team);
        let (Some(first), Some(last)) = (schedule.first(), schedule.last()) else {
            return 0;
        };
        let charged = |slot: Option<SlotId>| {
            slots.is_empty() || slot.is_some_and(|s| slots.contains(&s))
        };

        let mut total = 0;
        if charged(first.slot) {
            total += self.distance_between(team, first.home());
        }
        for pair in schedule.windows(2) {
            if charged(pair[1].slot) {
                total += self.distance_between(pair[0].home(), pair[1].home());
            }
        }
        if charged(last.slot) {
            total += self.distance_between(last.home(), team);
        }
        total
    }

    /// Breaks of `team`: the slot of the second game of each pair of
    /// consecutive games with the same role, with that role.
    pub fn break_slots(&self, team: TeamId) -> Vec<(SlotId, HomeMode)> {
        let schedule = self.team_schedule(team);
        schedule
            .windows(2)
            .filter_map(|pair| {
                let prev_home = pair[0].is_home(team);
                let home = pair[1].is_home(team);
                if prev_home != home {
                    return None;
                }
                let role = if home { HomeMode::Home } else { HomeMode::Away };
                pair[1].slot.map(|s| (s, role))
            })
            .collect()
    }

    /// Number of breaks of `team`.
    pub fn breaks(&self, team: TeamId) -> i64 {
        self.break_slots(team).len() as i64
    }

    /// Total cost of the home games of `team`.
    pub fn team_cost(&self, team: TeamId) -> i64 {
        self.team_schedule(team)
            .iter()
            .filter(|m| m.is_home(team))
            .filter_map(|m| m.slot.map(|s| self.cost_of(m.first, m.second, s)))
            .sum()
    }

    /// Carry-over effect value of a league.
    ///
    /// For each member, every pair of consecutive opponents `(o1, o2)`
    /// (closing the season circularly) increments `COM(o1, o2)`. Opponents
    /// outside the league are skipped. Unset weights count as 1; an unknown
    /// league has value 0.
    pub fn carry_over(&self, league: LeagueId) -> i64 {
        let Ok(league) = self.league(league) else {
            return 0;
        };
        let mut com: BTreeMap<(TeamId, TeamId), i64> = BTreeMap::new();
        for &t in &league.members {
            let opponents: Vec<TeamId> = self
                .team_schedule(t)
                .iter()
                .filter_map(|m| m.opponent(t))
                .filter(|o| league.members.contains(o))
                .collect();
            let (Some(&first), Some(&last)) = (opponents.first(), opponents.last()) else {
                continue;
            };
            for pair in opponents.windows(2) {
                *com.entry((pair[0], pair[1])).or_default() += 1;
            }
            *com.entry((last, first)).or_default() += 1;
        }
        com.into_iter()
            .map(|((o1, o2), n)| self.coe_weight(o1, o2).unwrap_or(1) * n * n)
            .sum()
    }
}
