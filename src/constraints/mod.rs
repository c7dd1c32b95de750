//! Constraint catalogue.
//!
//! A [`Constraint`] is a hard/soft type, an integer penalty and a [`Rule`]:
//! one closed variant per constraint kind, each with its own parameters.
//! Checking a constraint is a pure read of an [`Instance`]; the cost of a
//! violation is `penalty × deviation`, charged to infeasibility for hard
//! constraints and to feasibility for soft ones.
//!
//! # Families
//!
//! | Family | Rules | Module |
//! |--------|-------|--------|
//! | Basic | BA1 all games scheduled, BA2 one game per team and slot | `basic` |
//! | Capacity | CA1–CA5 bounded games per team, window or slot | `capacity` |
//! | Game | GA1 fixed/forbidden games, GA2 conditional games | `game` |
//! | Break | BR1–BR4 bounded breaks | `breaks` |
//! | Fairness | FA1–FA6 balance, alternation, travel and cost | `fairness` |
//! | Separation | SE1 minimum gap, SE2 paired slots | `separation` |
//!
//! # Reference
//! Van Bulck et al. (2020), "RobinX: A three-field classification and
//! unified data format for round-robin sports timetabling", EJOR 280(2)

mod attributes;
mod basic;
mod breaks;
mod capacity;
mod fairness;
mod game;
mod separation;

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::instance::Instance;
use crate::models::{
    ConstraintType, Cost, SlotGroupId, SlotId, TeamGroupId, TeamId, Violation,
};
use crate::validation::{ValidationError, ValidationResult};

pub use basic::{Ba1, Ba2};
pub use breaks::{Br1, Br2, Br3, Br4};
pub use capacity::{Ca1, Ca2, Ca3, Ca4, Ca5};
pub use fairness::{Fa1, Fa2, Fa3, Fa4, Fa5, Fa6};
pub use game::{Ga1, Ga2};
pub use separation::{Se1, Se2};

/// A constraint: type, penalty weight and rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
    /// Hard or soft.
    pub kind: ConstraintType,
    /// Cost per unit of deviation.
    pub penalty: i64,
    /// Rule and its parameters.
    pub rule: Rule,
}

/// The rule a constraint enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum Rule {
    /// All meetings are scheduled.
    #[serde(rename = "BA1")]
    Ba1(Ba1),
    /// Each team plays at most one game per slot. Internal only.
    #[serde(skip)]
    Ba2(Ba2),
    #[serde(rename = "CA1")]
    Ca1(Ca1),
    #[serde(rename = "CA2")]
    Ca2(Ca2),
    #[serde(rename = "CA3")]
    Ca3(Ca3),
    #[serde(rename = "CA4")]
    Ca4(Ca4),
    #[serde(rename = "CA5")]
    Ca5(Ca5),
    #[serde(rename = "GA1")]
    Ga1(Ga1),
    #[serde(rename = "GA2")]
    Ga2(Ga2),
    #[serde(rename = "BR1")]
    Br1(Br1),
    #[serde(rename = "BR2")]
    Br2(Br2),
    #[serde(rename = "BR3")]
    Br3(Br3),
    #[serde(rename = "BR4")]
    Br4(Br4),
    #[serde(rename = "FA1")]
    Fa1(Fa1),
    #[serde(rename = "FA2")]
    Fa2(Fa2),
    #[serde(rename = "FA3")]
    Fa3(Fa3),
    #[serde(rename = "FA4")]
    Fa4(Fa4),
    #[serde(rename = "FA5")]
    Fa5(Fa5),
    #[serde(rename = "FA6")]
    Fa6(Fa6),
    #[serde(rename = "SE1")]
    Se1(Se1),
    #[serde(rename = "SE2")]
    Se2(Se2),
}

/// Explicit teams plus team groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFilter {
    /// Explicit teams.
    pub teams: BTreeSet<TeamId>,
    /// Team groups whose members are included.
    pub groups: BTreeSet<TeamGroupId>,
}

/// Explicit slots plus slot groups.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotFilter {
    /// Explicit slots.
    pub slots: BTreeSet<SlotId>,
    /// Slot groups whose members are included.
    pub groups: BTreeSet<SlotGroupId>,
}

/// Cost and violations of one check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Total cost.
    pub cost: Cost,
    /// Violations found, in evaluation order.
    pub violations: Vec<Violation>,
}

impl TeamFilter {
    /// Filter on explicit teams.
    pub fn teams(teams: impl IntoIterator<Item = TeamId>) -> Self {
        Self {
            teams: teams.into_iter().collect(),
            groups: BTreeSet::new(),
        }
    }

    /// Filter on team groups.
    pub fn groups(groups: impl IntoIterator<Item = TeamGroupId>) -> Self {
        Self {
            teams: BTreeSet::new(),
            groups: groups.into_iter().collect(),
        }
    }

    /// Adds a team group.
    pub fn with_group(mut self, group: TeamGroupId) -> Self {
        self.groups.insert(group);
        self
    }

    /// Teams selected in `inst`.
    pub fn resolve(&self, inst: &Instance) -> BTreeSet<TeamId> {
        inst.collect_teams(&self.teams, &self.groups)
    }

    fn validate(&self, inst: &Instance) -> ValidationResult {
        for &t in &self.teams {
            inst.team(t)?;
        }
        for &g in &self.groups {
            inst.team_group(g)?;
        }
        Ok(())
    }
}

impl SlotFilter {
    /// Filter on explicit slots.
    pub fn slots(slots: impl IntoIterator<Item = SlotId>) -> Self {
        Self {
            slots: slots.into_iter().collect(),
            groups: BTreeSet::new(),
        }
    }

    /// Filter on slot groups.
    pub fn groups(groups: impl IntoIterator<Item = SlotGroupId>) -> Self {
        Self {
            slots: BTreeSet::new(),
            groups: groups.into_iter().collect(),
        }
    }

    /// Adds a slot group.
    pub fn with_group(mut self, group: SlotGroupId) -> Self {
        self.groups.insert(group);
        self
    }

    /// Slots selected in `inst`.
    pub fn resolve(&self, inst: &Instance) -> BTreeSet<SlotId> {
        inst.collect_slots(&self.slots, &self.groups)
    }

    fn validate(&self, inst: &Instance) -> ValidationResult {
        for &s in &self.slots {
            inst.slot(s)?;
        }
        for &g in &self.groups {
            inst.slot_group(g)?;
        }
        Ok(())
    }
}

impl Constraint {
    /// Creates a constraint.
    pub fn new(kind: ConstraintType, penalty: i64, rule: impl Into<Rule>) -> Self {
        Self {
            kind,
            penalty,
            rule: rule.into(),
        }
    }

    /// Hard constraint.
    pub fn hard(penalty: i64, rule: impl Into<Rule>) -> Self {
        Self::new(ConstraintType::Hard, penalty, rule)
    }

    /// Soft constraint.
    pub fn soft(penalty: i64, rule: impl Into<Rule>) -> Self {
        Self::new(ConstraintType::Soft, penalty, rule)
    }

    /// The internal one-game-per-slot check.
    pub(crate) fn one_game_per_slot() -> Self {
        Self::hard(2, Ba2::new())
    }

    /// Short name (`"CA1"`, ...).
    pub fn name(&self) -> &'static str {
        self.rule.name()
    }

    /// Evaluates the constraint.
    ///
    /// # Panics
    /// On parameter combinations no rule supports: BR1/BR2 with a comparison
    /// other than EQ or LEQ, GA2 with a comparison other than EQ or NEQ, and
    /// FA2 with filters not covering every team and slot.
    pub fn check(&self, inst: &Instance) -> CheckOutcome {
        let mut tally = Tally::new(self);
        match &self.rule {
            Rule::Ba1(r) => r.check(inst, &mut tally),
            Rule::Ba2(r) => r.check(inst, &mut tally),
            Rule::Ca1(r) => r.check(inst, &mut tally),
            Rule::Ca2(r) => r.check(inst, &mut tally),
            Rule::Ca3(r) => r.check(inst, &mut tally),
            Rule::Ca4(r) => r.check(inst, &mut tally),
            Rule::Ca5(r) => r.check(inst, &mut tally),
            Rule::Ga1(r) => r.check(inst, &mut tally),
            Rule::Ga2(r) => r.check(inst, &mut tally),
            Rule::Br1(r) => r.check(inst, &mut tally),
            Rule::Br2(r) => r.check(inst, &mut tally),
            Rule::Br3(_) | Rule::Br4(_) | Rule::Fa4(_) => {}
            Rule::Fa1(r) => r.check(inst, &mut tally),
            Rule::Fa2(r) => r.check(inst, &mut tally),
            Rule::Fa3(r) => r.check(inst, &mut tally),
            Rule::Fa5(r) => r.check(inst, &mut tally),
            Rule::Fa6(r) => r.check(inst, &mut tally),
            Rule::Se1(r) => r.check(inst, &mut tally),
            Rule::Se2(r) => r.check(inst, &mut tally),
        }
        tally.finish()
    }

    /// Checks that every id the constraint references exists in `inst`
    /// and that its parameters are usable.
    pub fn validate_references(&self, inst: &Instance) -> ValidationResult {
        if self.penalty < 0 {
            return Err(ValidationError::malformed(format!(
                "{}: negative penalty {}",
                self.name(),
                self.penalty
            )));
        }
        match &self.rule {
            Rule::Ba1(_) | Rule::Ba2(_) => Ok(()),
            Rule::Ca1(r) => {
                r.teams.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Ca2(r) => {
                r.teams1.validate(inst)?;
                r.teams2.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Ca3(r) => {
                if r.intp < 1 {
                    return Err(ValidationError::malformed(format!(
                        "CA3: window length {} must be positive",
                        r.intp
                    )));
                }
                r.teams1.validate(inst)?;
                r.teams2.validate(inst)
            }
            Rule::Ca4(r) => {
                r.teams1.validate(inst)?;
                r.teams2.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Ca5(r) => {
                r.teams1.validate(inst)?;
                r.teams2.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Ga1(r) => {
                r.slots.validate(inst)?;
                for &(home, away) in &r.meetings {
                    inst.team(home)?;
                    inst.team(away)?;
                }
                Ok(())
            }
            Rule::Ga2(r) => {
                for teams in [&r.teams1, &r.teams2, &r.teams3, &r.teams4] {
                    teams.validate(inst)?;
                }
                r.slots1.validate(inst)?;
                r.slots2.validate(inst)
            }
            Rule::Br1(r) => {
                r.teams.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Br2(r) => {
                r.teams.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Br3(r) => r.teams.validate(inst),
            Rule::Br4(r) => {
                r.teams.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Fa1(r) => {
                r.teams.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Fa2(r) => {
                r.teams.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Fa3(r) => r.teams.validate(inst),
            Rule::Fa4(r) => r.teams.validate(inst),
            Rule::Fa5(r) => {
                r.teams.validate(inst)?;
                r.slots.validate(inst)
            }
            Rule::Fa6(r) => r.slots.validate(inst),
            Rule::Se1(r) => r.teams.validate(inst),
            Rule::Se2(r) => {
                r.teams.validate(inst)?;
                for &(s1, s2) in &r.slot_pairs {
                    inst.slot(s1)?;
                    inst.slot(s2)?;
                }
                Ok(())
            }
        }
    }
}

impl Rule {
    /// Short name (`"CA1"`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Ba1(_) => "BA1",
            Rule::Ba2(_) => "BA2",
            Rule::Ca1(_) => "CA1",
            Rule::Ca2(_) => "CA2",
            Rule::Ca3(_) => "CA3",
            Rule::Ca4(_) => "CA4",
            Rule::Ca5(_) => "CA5",
            Rule::Ga1(_) => "GA1",
            Rule::Ga2(_) => "GA2",
            Rule::Br1(_) => "BR1",
            Rule::Br2(_) => "BR2",
            Rule::Br3(_) => "BR3",
            Rule::Br4(_) => "BR4",
            Rule::Fa1(_) => "FA1",
            Rule::Fa2(_) => "FA2",
            Rule::Fa3(_) => "FA3",
            Rule::Fa4(_) => "FA4",
            Rule::Fa5(_) => "FA5",
            Rule::Fa6(_) => "FA6",
            Rule::Se1(_) => "SE1",
            Rule::Se2(_) => "SE2",
        }
    }

    /// Attribute-map class of the rule's family.
    pub fn family(&self) -> &'static str {
        match self {
            Rule::Ba1(_) | Rule::Ba2(_) => "BasicConstraints",
            Rule::Ca1(_) | Rule::Ca2(_) | Rule::Ca3(_) | Rule::Ca4(_) | Rule::Ca5(_) => {
                "CapacityConstraints"
            }
            Rule::Ga1(_) | Rule::Ga2(_) => "GameConstraints",
            Rule::Br1(_) | Rule::Br2(_) | Rule::Br3(_) | Rule::Br4(_) => "BreakConstraints",
            Rule::Fa1(_)
            | Rule::Fa2(_)
            | Rule::Fa3(_)
            | Rule::Fa4(_)
            | Rule::Fa5(_)
            | Rule::Fa6(_) => "FairnessConstraints",
            Rule::Se1(_) | Rule::Se2(_) => "SeparationConstraints",
        }
    }
}

macro_rules! rule_from {
    ($($payload:ident => $variant:ident),+ $(,)?) => {
        $(
            impl From<$payload> for Rule {
                fn from(rule: $payload) -> Self {
                    Rule::$variant(rule)
                }
            }
        )+
    };
}

rule_from! {
    Ba1 => Ba1, Ba2 => Ba2,
    Ca1 => Ca1, Ca2 => Ca2, Ca3 => Ca3, Ca4 => Ca4, Ca5 => Ca5,
    Ga1 => Ga1, Ga2 => Ga2,
    Br1 => Br1, Br2 => Br2, Br3 => Br3, Br4 => Br4,
    Fa1 => Fa1, Fa2 => Fa2, Fa3 => Fa3, Fa4 => Fa4, Fa5 => Fa5, Fa6 => Fa6,
    Se1 => Se1, Se2 => Se2,
}

/// Running cost and violations of one check.
pub(crate) struct Tally {
    name: &'static str,
    kind: ConstraintType,
    penalty: i64,
    cost: Cost,
    violations: Vec<Violation>,
}

impl Tally {
    fn new(constraint: &Constraint) -> Self {
        Self {
            name: constraint.name(),
            kind: constraint.kind,
            penalty: constraint.penalty,
            cost: Cost::ZERO,
            violations: Vec::new(),
        }
    }

    /// Charges `penalty × deviation` and records a violation.
    pub(crate) fn charge(&mut self, deviation: i64, message: impl Into<String>) -> &mut Violation {
        let charged = Cost::charged(self.kind, self.penalty * deviation);
        self.cost += charged;
        self.violations.push(
            Violation::new(self.name, message)
                .with_deviation(deviation)
                .with_cost(charged, self.cost),
        );
        let last = self.violations.len() - 1;
        &mut self.violations[last]
    }

    fn finish(self) -> CheckOutcome {
        CheckOutcome {
            cost: self.cost,
            violations: self.violations,
        }
    }
}

/// `max(0, n - max) + max(0, min - n)`.
pub(crate) fn range_deviation(n: i64, min: i64, max: i64) -> i64 {
    (n - max).max(0) + (min - n).max(0)
}

/// `max(n - max, min - n)`, clamped at zero.
pub(crate) fn bound_deviation(n: i64, min: i64, max: i64) -> i64 {
    (n - max).max(min - n).max(0)
}

pub(crate) fn team_name(inst: &Instance, team: TeamId) -> &str {
    inst.team(team).map(|t| t.name.as_str()).unwrap_or("?")
}

pub(crate) fn format_ids<'a>(ids: impl IntoIterator<Item = &'a u32>) -> String {
    let parts: Vec<String> = ids.into_iter().map(u32::to_string).collect();
    format!("{{{}}}", parts.join(", "))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::instance::Instance;
    use crate::models::{League, Meeting, Slot, Team, TeamGroup};

    /// `n` teams in one league, `slots` slots, no meetings. Team group 0
    /// holds the even teams.
    pub fn empty(n: u32, slots: u32) -> Instance {
        let mut inst = Instance::new();
        inst.add_league(League::new(0, "L").with_rounds(2)).unwrap();
        inst.add_team_group(TeamGroup::new(0, "Even")).unwrap();
        for t in 0..n {
            let team = Team::new(t, format!("T{t}"), 0);
            inst.add_team(if t % 2 == 0 { team.with_group(0) } else { team })
                .unwrap();
        }
        for s in 0..slots {
            inst.add_slot(Slot::new(s, format!("S{s}"))).unwrap();
        }
        inst
    }

    /// `empty(n, slots)` plus the given `(home, away, slot)` games.
    pub fn with_games(n: u32, slots: u32, games: &[(u32, u32, u32)]) -> Instance {
        let mut inst = empty(n, slots);
        for &(h, a, s) in games {
            inst.add_meeting(Meeting::new(h, a).with_slot(s)).unwrap();
        }
        inst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HomeMode, Meeting};
    use crate::validation::ValidationErrorKind;

    #[test]
    fn test_deviation_helpers() {
        assert_eq!(range_deviation(3, 0, 1), 2);
        assert_eq!(range_deviation(0, 2, 4), 2);
        assert_eq!(range_deviation(3, 2, 4), 0);
        assert_eq!(bound_deviation(5, 1, 2), 3);
        assert_eq!(bound_deviation(1, 1, 2), 0);
    }

    #[test]
    fn test_hard_and_soft_charging() {
        let mut inst = fixtures::empty(2, 2);
        inst.add_meeting(Meeting::new(0, 1)).unwrap();
        let hard = Constraint::hard(3, Ba1).check(&inst);
        assert_eq!(hard.cost, Cost::new(3, 0));
        let soft = Constraint::soft(3, Ba1).check(&inst);
        assert_eq!(soft.cost, Cost::new(0, 3));
        assert_eq!(soft.violations[0].running, Cost::new(0, 3));
    }

    #[test]
    fn test_validate_unknown_team() {
        let inst = fixtures::empty(2, 2);
        let c = Constraint::hard(
            1,
            Ca1::new(TeamFilter::teams([5]), 0, 1, HomeMode::Home, SlotFilter::slots([0])),
        );
        let err = c.validate_references(&inst).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::UnknownReference);
    }

    #[test]
    fn test_validate_unknown_slot_group() {
        let inst = fixtures::empty(2, 2);
        let c = Constraint::soft(1, Fa6::new(SlotFilter::groups([3]), 0));
        assert!(c.validate_references(&inst).is_err());
    }

    #[test]
    fn test_add_constraint_rejects_internal() {
        let mut inst = fixtures::empty(2, 2);
        let err = inst
            .add_constraint(Constraint::one_game_per_slot())
            .unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::InternalConstraint);
        assert!(inst.constraints().is_empty());
    }

    #[test]
    fn test_add_constraint_rejects_zero_window() {
        let mut inst = fixtures::empty(2, 2);
        let rule = Ca3::new(
            TeamFilter::teams([0]),
            TeamFilter::teams([1]),
            0,
            1,
            HomeMode::Home,
            0,
            crate::models::CountMode::Slots,
        );
        let err = inst.add_constraint(Constraint::hard(1, rule)).unwrap_err();
        assert_eq!(err.kind, ValidationErrorKind::MalformedConstraint);
    }

    #[test]
    fn test_names_and_families() {
        assert_eq!(Constraint::hard(1, Ba1).name(), "BA1");
        assert_eq!(Rule::from(Fa3::new(TeamFilter::default())).family(), "FairnessConstraints");
        assert_eq!(Constraint::one_game_per_slot().name(), "BA2");
    }

    #[test]
    fn test_serde_round_trip() {
        let c = Constraint::soft(
            5,
            Ca2::new(
                TeamFilter::teams([0]),
                TeamFilter::groups([0]),
                0,
                1,
                HomeMode::Either,
                crate::models::GlobalMode::Every,
                SlotFilter::slots([0, 1]),
            ),
        );
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains("\"name\":\"CA2\""));
        let back: Constraint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }

    #[test]
    fn test_check_is_repeatable() {
        let inst = fixtures::with_games(4, 4, &[(0, 1, 0), (0, 2, 0), (3, 0, 1)]);
        let c = Constraint::hard(1, Ba2::new());
        let first = c.check(&inst);
        assert_eq!(first.cost, Cost::new(1, 0));
        assert_eq!(c.check(&inst), first);
    }
}
