//! Entity store: teams, leagues, slots, groups, meetings and data matrices.
//!
//! Every `add_*` operation inserts the entity only if its id is free and
//! every id it references resolves; otherwise the entity is dropped and a
//! [`ValidationError`] is returned. Adding a team or slot also registers it
//! in its league and in each group it declares.

use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::constraints::{Constraint, Rule};
use crate::models::{
    attr_map, AttrMap, Cost, DataType, League, LeagueGroup, LeagueGroupId, LeagueId, Meeting,
    MeetingId, ObjectiveMode, Slot, SlotGroup, SlotGroupId, SlotId, SolutionMethod, Team,
    TeamGroup, TeamGroupId, TeamId,
};
use crate::validation::{ValidationError, ValidationErrorKind, ValidationResult};

/// Descriptive metadata of an instance and its solution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceMetadata {
    /// Instance name.
    pub instance_name: String,
    /// Solution name.
    pub solution_name: String,
    /// Artificial or real-life data.
    pub data_type: DataType,
    /// Who contributed the instance.
    pub contributor: String,
    /// Publication date.
    pub date: String,
    /// Country of origin.
    pub country: String,
    /// Free-form description.
    pub description: String,
    /// Free-form remarks.
    pub remarks: String,
    /// How the solution was obtained.
    pub solution_method: SolutionMethod,
}

/// Chronological view of the scheduled meetings, built on first query.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScheduleIndex {
    /// Scheduled meetings of each team, sorted by slot.
    pub(crate) by_team: BTreeMap<TeamId, Vec<MeetingId>>,
    /// Scheduled meetings in each slot.
    pub(crate) by_slot: BTreeMap<SlotId, Vec<MeetingId>>,
    /// All scheduled meetings, sorted by slot.
    pub(crate) scheduled: Vec<MeetingId>,
}

impl ScheduleIndex {
    fn build(meetings: &[Meeting]) -> Self {
        let mut index = ScheduleIndex::default();
        let mut scheduled: Vec<(SlotId, MeetingId)> = meetings
            .iter()
            .enumerate()
            .filter_map(|(id, m)| m.slot.map(|s| (s, id)))
            .collect();
        // Stable: ties keep insertion order.
        scheduled.sort_by_key(|&(slot, _)| slot);

        for &(slot, id) in &scheduled {
            let m = &meetings[id];
            index.by_team.entry(m.first).or_default().push(id);
            index.by_team.entry(m.second).or_default().push(id);
            index.by_slot.entry(slot).or_default().push(id);
        }
        index.scheduled = scheduled.into_iter().map(|(_, id)| id).collect();
        index
    }
}

/// A complete timetabling instance with its (possibly partial) solution.
///
/// Owns every entity, the meetings, the registered constraints and the
/// distance, cost and carry-over weight data. One `Instance` per
/// validation run; pass it by reference to queries and checks.
#[derive(Debug, Clone)]
pub struct Instance {
    teams: BTreeMap<TeamId, Team>,
    team_groups: BTreeMap<TeamGroupId, TeamGroup>,
    leagues: BTreeMap<LeagueId, League>,
    league_groups: BTreeMap<LeagueGroupId, LeagueGroup>,
    slots: BTreeMap<SlotId, Slot>,
    slot_groups: BTreeMap<SlotGroupId, SlotGroup>,
    meetings: Vec<Meeting>,
    constraints: Vec<Constraint>,
    distances: BTreeMap<(TeamId, TeamId), i64>,
    coe_weights: BTreeMap<(TeamId, TeamId), i64>,
    costs: BTreeMap<(TeamId, TeamId, SlotId), i64>,
    objective: ObjectiveMode,
    objective_value: Cost,
    lower_bound: Cost,
    metadata: InstanceMetadata,
    index: OnceCell<ScheduleIndex>,
}

impl Default for Instance {
    fn default() -> Self {
        Self::new()
    }
}

impl Instance {
    /// Creates an empty instance.
    ///
    /// The declared objective value defaults to `(-1, -1)` (not declared)
    /// and the declared lower bound to `(0, 0)`.
    pub fn new() -> Self {
        Self {
            teams: BTreeMap::new(),
            team_groups: BTreeMap::new(),
            leagues: BTreeMap::new(),
            league_groups: BTreeMap::new(),
            slots: BTreeMap::new(),
            slot_groups: BTreeMap::new(),
            meetings: Vec::new(),
            constraints: Vec::new(),
            distances: BTreeMap::new(),
            coe_weights: BTreeMap::new(),
            costs: BTreeMap::new(),
            objective: ObjectiveMode::None,
            objective_value: Cost::new(-1, -1),
            lower_bound: Cost::ZERO,
            metadata: InstanceMetadata::default(),
            index: OnceCell::new(),
        }
    }

    /// Drops all entities, meetings, constraints and data.
    pub fn reset(&mut self) {
        *self = Instance::new();
    }

    // ---- Groups and leagues --------------------------------------------

    /// Adds a team group. Listed members must already exist.
    pub fn add_team_group(&mut self, group: TeamGroup) -> ValidationResult {
        if self.team_groups.contains_key(&group.id) {
            return Err(report(ValidationError::duplicate_id("team group", group.id)));
        }
        if let Some(&t) = group.members.iter().find(|t| !self.teams.contains_key(*t)) {
            return Err(report(ValidationError::unknown("team", t)));
        }
        for t in &group.members {
            if let Some(team) = self.teams.get_mut(t) {
                team.groups.insert(group.id);
            }
        }
        self.team_groups.insert(group.id, group);
        Ok(())
    }

    /// Adds a slot group. Listed members must already exist.
    pub fn add_slot_group(&mut self, group: SlotGroup) -> ValidationResult {
        if self.slot_groups.contains_key(&group.id) {
            return Err(report(ValidationError::duplicate_id("slot group", group.id)));
        }
        if let Some(&s) = group.members.iter().find(|s| !self.slots.contains_key(*s)) {
            return Err(report(ValidationError::unknown("slot", s)));
        }
        for s in &group.members {
            if let Some(slot) = self.slots.get_mut(s) {
                slot.groups.insert(group.id);
            }
        }
        self.slot_groups.insert(group.id, group);
        Ok(())
    }

    /// Adds a league group. Listed members must already exist.
    pub fn add_league_group(&mut self, group: LeagueGroup) -> ValidationResult {
        if self.league_groups.contains_key(&group.id) {
            return Err(report(ValidationError::duplicate_id("league group", group.id)));
        }
        if let Some(&l) = group.members.iter().find(|l| !self.leagues.contains_key(*l)) {
            return Err(report(ValidationError::unknown("league", l)));
        }
        for l in &group.members {
            if let Some(league) = self.leagues.get_mut(l) {
                league.groups.insert(group.id);
            }
        }
        self.league_groups.insert(group.id, group);
        Ok(())
    }

    /// Adds a league and registers it in its declared league groups.
    ///
    /// Members are registered by [`Instance::add_team`]; a league offered
    /// with members is rejected.
    pub fn add_league(&mut self, league: League) -> ValidationResult {
        if self.leagues.contains_key(&league.id) {
            return Err(report(ValidationError::duplicate_id("league", league.id)));
        }
        if let Some(&t) = league.members.iter().next() {
            return Err(report(ValidationError::new(
                ValidationErrorKind::UnknownReference,
                format!("team {t} cannot join league {} before the league exists", league.id),
            )));
        }
        if let Some(&g) = league.groups.iter().find(|g| !self.league_groups.contains_key(*g)) {
            return Err(report(ValidationError::unknown("league group", g)));
        }
        for g in &league.groups {
            if let Some(group) = self.league_groups.get_mut(g) {
                group.members.insert(league.id);
            }
        }
        self.leagues.insert(league.id, league);
        Ok(())
    }

    /// Adds a team and registers it in its league and team groups.
    pub fn add_team(&mut self, team: Team) -> ValidationResult {
        if self.teams.contains_key(&team.id) {
            return Err(report(ValidationError::duplicate_id("team", team.id)));
        }
        if !self.leagues.contains_key(&team.league) {
            return Err(report(ValidationError::unknown("league", team.league)));
        }
        if let Some(&g) = team.groups.iter().find(|g| !self.team_groups.contains_key(*g)) {
            return Err(report(ValidationError::unknown("team group", g)));
        }
        if let Some(league) = self.leagues.get_mut(&team.league) {
            league.members.insert(team.id);
        }
        for g in &team.groups {
            if let Some(group) = self.team_groups.get_mut(g) {
                group.members.insert(team.id);
            }
        }
        self.teams.insert(team.id, team);
        Ok(())
    }

    /// Adds a slot and registers it in its slot groups.
    pub fn add_slot(&mut self, slot: Slot) -> ValidationResult {
        if self.slots.contains_key(&slot.id) {
            return Err(report(ValidationError::duplicate_id("slot", slot.id)));
        }
        if let Some(&g) = slot.groups.iter().find(|g| !self.slot_groups.contains_key(*g)) {
            return Err(report(ValidationError::unknown("slot group", g)));
        }
        for g in &slot.groups {
            if let Some(group) = self.slot_groups.get_mut(g) {
                group.members.insert(slot.id);
            }
        }
        self.slots.insert(slot.id, slot);
        Ok(())
    }

    /// Adds an existing team to an existing team group.
    ///
    /// Fails with `DuplicateMembership` if the team is already a member.
    pub fn add_team_to_group(&mut self, team: TeamId, group: TeamGroupId) -> ValidationResult {
        let Some(t) = self.teams.get_mut(&team) else {
            return Err(report(ValidationError::unknown("team", team)));
        };
        let Some(g) = self.team_groups.get_mut(&group) else {
            return Err(report(ValidationError::unknown("team group", group)));
        };
        if !g.members.insert(team) {
            return Err(report(ValidationError::new(
                ValidationErrorKind::DuplicateMembership,
                format!("team {team} is already in team group {group}"),
            )));
        }
        t.groups.insert(group);
        Ok(())
    }

    /// Adds an existing slot to an existing slot group.
    pub fn add_slot_to_group(&mut self, slot: SlotId, group: SlotGroupId) -> ValidationResult {
        let Some(s) = self.slots.get_mut(&slot) else {
            return Err(report(ValidationError::unknown("slot", slot)));
        };
        let Some(g) = self.slot_groups.get_mut(&group) else {
            return Err(report(ValidationError::unknown("slot group", group)));
        };
        if !g.members.insert(slot) {
            return Err(report(ValidationError::new(
                ValidationErrorKind::DuplicateMembership,
                format!("slot {slot} is already in slot group {group}"),
            )));
        }
        s.groups.insert(group);
        Ok(())
    }

    /// Adds an existing league to an existing league group.
    pub fn add_league_to_group(
        &mut self,
        league: LeagueId,
        group: LeagueGroupId,
    ) -> ValidationResult {
        let Some(l) = self.leagues.get_mut(&league) else {
            return Err(report(ValidationError::unknown("league", league)));
        };
        let Some(g) = self.league_groups.get_mut(&group) else {
            return Err(report(ValidationError::unknown("league group", group)));
        };
        if !g.members.insert(league) {
            return Err(report(ValidationError::new(
                ValidationErrorKind::DuplicateMembership,
                format!("league {league} is already in league group {group}"),
            )));
        }
        l.groups.insert(group);
        Ok(())
    }

    // ---- Lookups ---------------------------------------------------------

    /// Team by id.
    pub fn team(&self, id: TeamId) -> ValidationResult<&Team> {
        self.teams
            .get(&id)
            .ok_or_else(|| ValidationError::unknown("team", id))
    }

    /// Team group by id.
    pub fn team_group(&self, id: TeamGroupId) -> ValidationResult<&TeamGroup> {
        self.team_groups
            .get(&id)
            .ok_or_else(|| ValidationError::unknown("team group", id))
    }

    /// League by id.
    pub fn league(&self, id: LeagueId) -> ValidationResult<&League> {
        self.leagues
            .get(&id)
            .ok_or_else(|| ValidationError::unknown("league", id))
    }

    /// League group by id.
    pub fn league_group(&self, id: LeagueGroupId) -> ValidationResult<&LeagueGroup> {
        self.league_groups
            .get(&id)
            .ok_or_else(|| ValidationError::unknown("league group", id))
    }

    /// Slot by id.
    pub fn slot(&self, id: SlotId) -> ValidationResult<&Slot> {
        self.slots
            .get(&id)
            .ok_or_else(|| ValidationError::unknown("slot", id))
    }

    /// Slot group by id.
    pub fn slot_group(&self, id: SlotGroupId) -> ValidationResult<&SlotGroup> {
        self.slot_groups
            .get(&id)
            .ok_or_else(|| ValidationError::unknown("slot group", id))
    }

    /// All teams, keyed by id.
    pub fn teams(&self) -> &BTreeMap<TeamId, Team> {
        &self.teams
    }

    /// All team groups, keyed by id.
    pub fn team_groups(&self) -> &BTreeMap<TeamGroupId, TeamGroup> {
        &self.team_groups
    }

    /// All leagues, keyed by id.
    pub fn leagues(&self) -> &BTreeMap<LeagueId, League> {
        &self.leagues
    }

    /// All league groups, keyed by id.
    pub fn league_groups(&self) -> &BTreeMap<LeagueGroupId, LeagueGroup> {
        &self.league_groups
    }

    /// All slots, keyed by id (chronological).
    pub fn slots(&self) -> &BTreeMap<SlotId, Slot> {
        &self.slots
    }

    /// All slot groups, keyed by id.
    pub fn slot_groups(&self) -> &BTreeMap<SlotGroupId, SlotGroup> {
        &self.slot_groups
    }

    /// All meetings, scheduled or not. A meeting's id is its position.
    pub fn meetings(&self) -> &[Meeting] {
        &self.meetings
    }

    /// Meeting by id.
    pub fn meeting(&self, id: MeetingId) -> Option<&Meeting> {
        self.meetings.get(id)
    }

    // ---- Meetings --------------------------------------------------------

    /// Adds a meeting (an "additional game" when it crosses leagues).
    pub fn add_meeting(&mut self, meeting: Meeting) -> ValidationResult<MeetingId> {
        if meeting.first == meeting.second {
            return Err(report(ValidationError::malformed(format!(
                "team {} cannot meet itself",
                meeting.first
            ))));
        }
        for t in [meeting.first, meeting.second] {
            if !self.teams.contains_key(&t) {
                return Err(report(ValidationError::unknown("team", t)));
            }
        }
        if let Some(s) = meeting.slot {
            if !self.slots.contains_key(&s) {
                return Err(report(ValidationError::unknown("slot", s)));
            }
        }
        self.meetings.push(meeting);
        self.index = OnceCell::new();
        Ok(self.meetings.len() - 1)
    }

    /// Generates the round-robin meetings of one league.
    ///
    /// Every pair of members `i < j` gets `k / 2` meetings with `i` at home
    /// and `k / 2` with `j` at home, plus one meeting without a determined
    /// home team when `k` is odd. Returns the number of meetings added.
    pub fn generate_league_meetings(&mut self, league: LeagueId) -> ValidationResult<usize> {
        let (members, rounds) = {
            let l = self.league(league).map_err(report)?;
            (l.members.iter().copied().collect::<Vec<_>>(), l.rounds)
        };
        let before = self.meetings.len();
        for (i, &t1) in members.iter().enumerate() {
            for &t2 in &members[i + 1..] {
                for _ in 0..rounds / 2 {
                    self.meetings.push(Meeting::new(t1, t2));
                    self.meetings.push(Meeting::new(t2, t1));
                }
                if rounds % 2 == 1 {
                    self.meetings.push(Meeting::undetermined(t1, t2));
                }
            }
        }
        self.index = OnceCell::new();
        let added = self.meetings.len() - before;
        debug!(league, rounds, added, "generated league meetings");
        Ok(added)
    }

    /// Generates the round-robin meetings of every league.
    pub fn generate_meetings(&mut self) -> usize {
        let ids: Vec<LeagueId> = self.leagues.keys().copied().collect();
        ids.into_iter()
            .filter_map(|l| self.generate_league_meetings(l).ok())
            .sum()
    }

    /// Schedules a `home` vs `away` game in `slot`.
    ///
    /// Among unscheduled meetings, the first one with exactly this home and
    /// away team wins. Otherwise the last undetermined meeting between the
    /// two teams is taken, its ends swapped if needed.
    pub fn schedule_meeting(
        &mut self,
        home: TeamId,
        away: TeamId,
        slot: SlotId,
    ) -> ValidationResult<MeetingId> {
        if !self.slots.contains_key(&slot) {
            return Err(report(ValidationError::unknown("slot", slot)));
        }
        let mut chosen: Option<(MeetingId, bool)> = None;
        for (id, m) in self.meetings.iter().enumerate() {
            if m.is_scheduled() {
                continue;
            }
            if m.first == home && m.second == away {
                if !m.no_home {
                    chosen = Some((id, false));
                    break;
                }
                chosen = Some((id, false));
            } else if m.no_home && m.first == away && m.second == home {
                chosen = Some((id, true));
            }
        }
        let Some((id, swap)) = chosen else {
            return Err(report(ValidationError::new(
                ValidationErrorKind::UnscheduledMeeting,
                format!("no unscheduled meeting {home} - {away} left for slot {slot}"),
            )));
        };
        let meeting = &mut self.meetings[id];
        if swap {
            meeting.swap_ends();
        }
        meeting.slot = Some(slot);
        self.index = OnceCell::new();
        Ok(id)
    }

    /// Unschedules every meeting.
    pub fn clear_schedule(&mut self) {
        for m in &mut self.meetings {
            m.slot = None;
        }
        self.index = OnceCell::new();
    }

    pub(crate) fn index(&self) -> &ScheduleIndex {
        self.index.get_or_init(|| ScheduleIndex::build(&self.meetings))
    }

    // ---- Constraints -----------------------------------------------------

    /// Registers a constraint after checking every id it references.
    ///
    /// BA2 is internal and cannot be registered.
    pub fn add_constraint(&mut self, constraint: Constraint) -> ValidationResult {
        if matches!(constraint.rule, Rule::Ba2(_)) {
            return Err(report(ValidationError::new(
                ValidationErrorKind::InternalConstraint,
                "BA2 is evaluated internally and cannot be registered",
            )));
        }
        constraint.validate_references(self).map_err(report)?;
        self.constraints.push(constraint);
        Ok(())
    }

    /// Registered constraints, in registration order.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    // ---- Data matrices ---------------------------------------------------

    /// Sets the travel distance from `from` to `to`.
    pub fn set_distance(&mut self, from: TeamId, to: TeamId, distance: i64) -> ValidationResult {
        self.require_team(from)?;
        self.require_team(to)?;
        insert_once(&mut self.distances, (from, to), distance, "distance")
    }

    /// Travel distance from `from` to `to`; `0` when not set.
    pub fn distance_between(&self, from: TeamId, to: TeamId) -> i64 {
        self.distances.get(&(from, to)).copied().unwrap_or(0)
    }

    /// Sets the carry-over effect weight of `(first, second)`.
    pub fn set_coe_weight(&mut self, first: TeamId, second: TeamId, weight: i64) -> ValidationResult {
        self.require_team(first)?;
        self.require_team(second)?;
        insert_once(&mut self.coe_weights, (first, second), weight, "carry-over weight")
    }

    /// Carry-over effect weight of `(first, second)`, if set.
    pub fn coe_weight(&self, first: TeamId, second: TeamId) -> Option<i64> {
        self.coe_weights.get(&(first, second)).copied()
    }

    /// Sets the cost of `home` hosting `away` in `slot`.
    pub fn set_cost(&mut self, home: TeamId, away: TeamId, slot: SlotId, cost: i64) -> ValidationResult {
        self.require_team(home)?;
        self.require_team(away)?;
        if !self.slots.contains_key(&slot) {
            return Err(report(ValidationError::unknown("slot", slot)));
        }
        insert_once(&mut self.costs, (home, away, slot), cost, "cost")
    }

    /// Cost of `home` hosting `away` in `slot`; `0` when not set.
    pub fn cost_of(&self, home: TeamId, away: TeamId, slot: SlotId) -> i64 {
        self.costs.get(&(home, away, slot)).copied().unwrap_or(0)
    }

    /// Distance entries as attribute maps.
    pub fn distance_attributes(&self) -> Vec<AttrMap> {
        self.distances
            .iter()
            .map(|(&(t1, t2), d)| {
                attr_map([
                    ("ClassType", "Distances".into()),
                    ("Type", "distance".into()),
                    ("team1", t1.to_string()),
                    ("team2", t2.to_string()),
                    ("dist", d.to_string()),
                ])
            })
            .collect()
    }

    /// Carry-over weight entries as attribute maps.
    pub fn coe_weight_attributes(&self) -> Vec<AttrMap> {
        self.coe_weights
            .iter()
            .map(|(&(t1, t2), w)| {
                attr_map([
                    ("ClassType", "COEWeights".into()),
                    ("Type", "COEWeight".into()),
                    ("team1", t1.to_string()),
                    ("team2", t2.to_string()),
                    ("weight", w.to_string()),
                ])
            })
            .collect()
    }

    /// Cost entries as attribute maps.
    pub fn cost_attributes(&self) -> Vec<AttrMap> {
        self.costs
            .iter()
            .map(|(&(t1, t2, s), c)| {
                attr_map([
                    ("ClassType", "Costs".into()),
                    ("Type", "cost".into()),
                    ("team1", t1.to_string()),
                    ("team2", t2.to_string()),
                    ("slot", s.to_string()),
                    ("cost", c.to_string()),
                ])
            })
            .collect()
    }

    // ---- Objective and metadata -----------------------------------------

    /// Global objective mode.
    pub fn objective(&self) -> ObjectiveMode {
        self.objective
    }

    /// Sets the global objective mode.
    pub fn set_objective(&mut self, mode: ObjectiveMode) {
        self.objective = mode;
    }

    /// Declared objective value; `-1` components are not declared.
    pub fn objective_value(&self) -> Cost {
        self.objective_value
    }

    /// Declares the expected objective value.
    pub fn set_objective_value(&mut self, value: Cost) {
        self.objective_value = value;
    }

    /// Declared lower bound; `-1` components are not declared.
    pub fn lower_bound(&self) -> Cost {
        self.lower_bound
    }

    /// Declares a lower bound on the objective.
    pub fn set_lower_bound(&mut self, bound: Cost) {
        self.lower_bound = bound;
    }

    /// Instance and solution metadata.
    pub fn metadata(&self) -> &InstanceMetadata {
        &self.metadata
    }

    /// Mutable instance and solution metadata.
    pub fn metadata_mut(&mut self) -> &mut InstanceMetadata {
        &mut self.metadata
    }

    fn require_team(&self, id: TeamId) -> ValidationResult {
        if self.teams.contains_key(&id) {
            Ok(())
        } else {
            Err(report(ValidationError::unknown("team", id)))
        }
    }
}

fn insert_once<K: Ord + Copy + std::fmt::Debug>(
    map: &mut BTreeMap<K, i64>,
    key: K,
    value: i64,
    what: &str,
) -> ValidationResult {
    if map.contains_key(&key) {
        return Err(report(ValidationError::new(
            ValidationErrorKind::DuplicateData,
            format!("{what} for {key:?} is already set"),
        )));
    }
    map.insert(key, value);
    Ok(())
}

/// Logs a recoverable error at the point it is raised.
pub(crate) fn report(err: ValidationError) -> ValidationError {
    warn!(kind = ?err.kind, "{}", err.message);
    err
}
