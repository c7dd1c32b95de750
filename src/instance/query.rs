//! Meeting query layer.
//!
//! Set-based queries over **scheduled** meetings: by team(s), slot(s) and
//! home/away role. Unscheduled meetings never match. Results are slices of
//! the chronological index, so they come back sorted by slot unless stated
//! otherwise.
//!
//! # Multiplicity
//!
//! Single-team-set queries ([`Instance::meetings_team`],
//! [`Instance::meetings_team_slot`]) yield a meeting once per filtered team
//! that plays it in a matching role: with `HomeMode::Either` and both teams
//! in the filter, the meeting is returned twice. Two-team-set queries
//! yield each meeting at most once.

use std::collections::BTreeSet;

use super::Instance;
use crate::models::{HomeMode, Meeting, MeetingId, SlotGroupId, SlotId, TeamGroupId, TeamId};

impl Instance {
    /// Union of `teams` and the members of `groups`.
    pub fn collect_teams(
        &self,
        teams: &BTreeSet<TeamId>,
        groups: &BTreeSet<TeamGroupId>,
    ) -> BTreeSet<TeamId> {
        let mut all = teams.clone();
        for g in groups {
            if let Ok(group) = self.team_group(*g) {
                all.extend(group.members.iter().copied());
            }
        }
        all
    }

    /// Union of `slots` and the members of `groups`.
    pub fn collect_slots(
        &self,
        slots: &BTreeSet<SlotId>,
        groups: &BTreeSet<SlotGroupId>,
    ) -> BTreeSet<SlotId> {
        let mut all = slots.clone();
        for g in groups {
            if let Ok(group) = self.slot_group(*g) {
                all.extend(group.members.iter().copied());
            }
        }
        all
    }

    /// Scheduled meetings of `team`, in chronological order.
    pub fn team_schedule(&self, team: TeamId) -> Vec<&Meeting> {
        self.team_schedule_ids(team)
            .iter()
            .map(|&id| &self.meetings()[id])
            .collect()
    }

    pub(crate) fn team_schedule_ids(&self, team: TeamId) -> &[MeetingId] {
        self.index()
            .by_team
            .get(&team)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Meetings in which a team of `teams` plays in role `mode`.
    ///
    /// Sorted per team, not globally.
    pub fn meetings_team(&self, teams: &BTreeSet<TeamId>, mode: HomeMode) -> Vec<&Meeting> {
        self.collect_by_team(teams, mode, |_| true)
    }

    /// Meetings in `slots` in which a team of `teams` plays in role `mode`.
    pub fn meetings_team_slot(
        &self,
        teams: &BTreeSet<TeamId>,
        slots: &BTreeSet<SlotId>,
        mode: HomeMode,
    ) -> Vec<&Meeting> {
        self.collect_by_team(teams, mode, |m| {
            m.slot.is_some_and(|s| slots.contains(&s))
        })
    }

    /// Meetings between `teams1` and `teams2` in `slots`.
    ///
    /// With `Home` a team of `teams1` hosts a team of `teams2`; with `Away`
    /// the roles are reversed; `Either` accepts both.
    pub fn meetings_team_team_slot(
        &self,
        teams1: &BTreeSet<TeamId>,
        teams2: &BTreeSet<TeamId>,
        slots: &BTreeSet<SlotId>,
        mode: HomeMode,
    ) -> Vec<&Meeting> {
        let index = self.index();
        slots
            .iter()
            .filter_map(|s| index.by_slot.get(s))
            .flatten()
            .map(|&id| &self.meetings()[id])
            .filter(|m| pair_matches(m, teams1, teams2, mode))
            .collect()
    }

    /// Meetings between `teams1` and `teams2` in any slot.
    pub fn meetings_team_team(
        &self,
        teams1: &BTreeSet<TeamId>,
        teams2: &BTreeSet<TeamId>,
        mode: HomeMode,
    ) -> Vec<&Meeting> {
        self.index()
            .scheduled
            .iter()
            .map(|&id| &self.meetings()[id])
            .filter(|m| pair_matches(m, teams1, teams2, mode))
            .collect()
    }

    /// All meetings scheduled in `slots`.
    pub fn meetings_slot(&self, slots: &BTreeSet<SlotId>) -> Vec<&Meeting> {
        let index = self.index();
        slots
            .iter()
            .filter_map(|s| index.by_slot.get(s))
            .flatten()
            .map(|&id| &self.meetings()[id])
            .collect()
    }

    /// All unscheduled meetings.
    pub fn unscheduled_meetings(&self) -> impl Iterator<Item = &Meeting> {
        self.meetings().iter().filter(|m| !m.is_scheduled())
    }

    fn collect_by_team<F>(&self, teams: &BTreeSet<TeamId>, mode: HomeMode, keep: F) -> Vec<&Meeting>
    where
        F: Fn(&Meeting) -> bool,
    {
        let mut found = Vec::new();
        for &t in teams {
            for &id in self.team_schedule_ids(t) {
                let m = &self.meetings()[id];
                let role_ok = (m.first == t && mode.includes_home())
                    || (m.second == t && mode.includes_away());
                if role_ok && keep(m) {
                    found.push(m);
                }
            }
        }
        found
    }
}

fn pair_matches(
    m: &Meeting,
    teams1: &BTreeSet<TeamId>,
    teams2: &BTreeSet<TeamId>,
    mode: HomeMode,
) -> bool {
    (mode != HomeMode::Away && teams1.contains(&m.first) && teams2.contains(&m.second))
        || (mode != HomeMode::Home && teams1.contains(&m.second) && teams2.contains(&m.first))
}
