//! Timetable evaluation.
//!
//! Runs every check over an [`Instance`] and aggregates one cost pair.
//!
//! # Sequence
//!
//! 1. BA1 (all meetings scheduled, hard, penalty 1) unless a BA1 is registered
//! 2. BA2 (one game per team and slot, hard, penalty 2)
//! 3. Structural symmetry of each league that declares a [`GameMode`](crate::models::GameMode)
//! 4. Every registered constraint
//! 5. The global objective, added to feasibility
//! 6. Declared objective value and lower bound, cross-checked
//!
//! Data problems found along the way (a symmetric 1RR league, a declared
//! value that does not match) are collected in
//! [`EvaluationReport::issues`] and never stop the evaluation.
//!
//! # Reference
//! Van Bulck et al. (2020), "RobinX: A three-field classification and
//! unified data format for round-robin sports timetabling", EJOR 280(2)

mod classify;
mod objective;
mod symmetry;

use tracing::{debug, info};

use crate::constraints::{Ba1, CheckOutcome, Constraint, Rule};
use crate::instance::Instance;
use crate::models::{Cost, Violation};
use crate::validation::ValidationError;

/// Evaluation switches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Suppresses the per-violation diagnostic lines. Costs are unaffected.
    pub silent: bool,
    /// Runs the league symmetry checks.
    pub check_symmetry: bool,
    /// Cross-checks the declared objective value and lower bound.
    pub check_declared: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            silent: false,
            check_symmetry: true,
            check_declared: true,
        }
    }
}

impl CheckOptions {
    /// Sets `silent`.
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Sets `check_symmetry`.
    pub fn with_symmetry(mut self, check: bool) -> Self {
        self.check_symmetry = check;
        self
    }

    /// Sets `check_declared`.
    pub fn with_declared(mut self, check: bool) -> Self {
        self.check_declared = check;
        self
    }
}

/// Result of a full evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EvaluationReport {
    /// Aggregated (infeasibility, feasibility) cost, objective included.
    pub cost: Cost,
    /// Every violation, with running totals over the whole evaluation.
    pub violations: Vec<Violation>,
    /// Data problems reported during evaluation.
    pub issues: Vec<ValidationError>,
    /// Objective value included in `cost.feasibility`.
    pub objective: i64,
}

impl EvaluationReport {
    /// Returns `true` if no hard cost was charged.
    pub fn is_feasible(&self) -> bool {
        self.cost.is_feasible()
    }

    /// Violations raised by the named check.
    pub fn violations_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Violation> {
        self.violations.iter().filter(move |v| v.constraint == name)
    }

    /// Folds one check's outcome in, rebasing its running totals.
    fn absorb(&mut self, outcome: CheckOutcome, silent: bool) {
        let base = self.cost;
        for mut v in outcome.violations {
            v.running = base + v.running;
            self.record(v, silent);
        }
        self.cost = base + outcome.cost;
    }

    /// Adds a violation whose cost is not yet in `cost`.
    fn charge(&mut self, mut v: Violation, silent: bool) {
        self.cost += v.cost;
        v.running = self.cost;
        self.record(v, silent);
    }

    fn record(&mut self, v: Violation, silent: bool) {
        if !silent {
            info!("{}", v.diagnostic_line());
            for detail in &v.details {
                info!("{:20}{}", "", detail);
            }
        }
        self.violations.push(v);
    }
}

impl Instance {
    /// Evaluates the timetable and returns the cost pair.
    pub fn check_constraints(&self, silent: bool) -> Cost {
        self.evaluate(&CheckOptions::default().with_silent(silent)).cost
    }

    /// Evaluates the timetable.
    ///
    /// Pure with respect to the instance: repeated calls on an unmodified
    /// instance return identical reports.
    ///
    /// # Panics
    /// If a registered constraint does, see [`Constraint::check`].
    pub fn evaluate(&self, options: &CheckOptions) -> EvaluationReport {
        let mut report = EvaluationReport::default();
        let silent = options.silent;

        if !self.constraints().iter().any(|c| matches!(c.rule, Rule::Ba1(_))) {
            report.absorb(Constraint::hard(1, Ba1).check(self), silent);
        }
        report.absorb(Constraint::one_game_per_slot().check(self), silent);
        debug!(cost = %report.cost, "base checks done");

        if options.check_symmetry {
            for league in self.leagues().keys() {
                match self.check_symmetry(*league) {
                    Ok(violations) => {
                        for v in violations {
                            report.charge(v, silent);
                        }
                    }
                    Err(err) => report.issues.push(err),
                }
            }
            debug!(cost = %report.cost, "symmetry checks done");
        }

        for constraint in self.constraints() {
            report.absorb(constraint.check(self), silent);
        }
        debug!(
            cost = %report.cost,
            constraints = self.constraints().len(),
            "registered constraints done"
        );

        report.objective = self.objective_cost();
        report.cost.feasibility += report.objective;
        debug!(objective = report.objective, mode = %self.objective(), "objective added");

        if options.check_declared {
            report.issues.extend(self.declared_issues(report.cost));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraints::{Ca1, SlotFilter, TeamFilter};
    use crate::models::{
        GameMode, HomeMode, League, Meeting, ObjectiveMode, Slot, Team,
    };
    use crate::validation::ValidationErrorKind;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::SeedableRng;

    /// Double round robin of 4 teams over 6 slots, fully scheduled.
    const DRR4: [(u32, u32, u32); 12] = [
        (0, 1, 0),
        (2, 3, 0),
        (2, 0, 1),
        (3, 1, 1),
        (0, 3, 2),
        (1, 2, 2),
        (1, 0, 3),
        (3, 2, 3),
        (0, 2, 4),
        (1, 3, 4),
        (3, 0, 5),
        (2, 1, 5),
    ];

    fn drr4() -> Instance {
        let mut inst = Instance::new();
        inst.add_league(League::new(0, "L").with_rounds(2)).unwrap();
        for t in 0..4 {
            inst.add_team(Team::new(t, format!("T{t}"), 0)).unwrap();
        }
        for s in 0..6 {
            inst.add_slot(Slot::new(s, format!("S{s}"))).unwrap();
        }
        inst.generate_meetings();
        for (h, a, s) in DRR4 {
            inst.schedule_meeting(h, a, s).unwrap();
        }
        inst
    }

    #[test]
    fn test_valid_timetable_costs_nothing() {
        let report = drr4().evaluate(&CheckOptions::default().with_silent(true));
        assert_eq!(report.cost, Cost::ZERO);
        assert!(report.violations.is_empty());
        assert!(report.issues.is_empty());
        assert!(report.is_feasible());
    }

    #[test]
    fn test_unscheduled_and_double_booked() {
        let mut inst = drr4();
        inst.add_meeting(Meeting::new(0, 3)).unwrap();
        inst.add_meeting(Meeting::new(0, 2).with_slot(0)).unwrap();
        let report = inst.evaluate(&CheckOptions::default().with_silent(true));
        // BA1: one unscheduled; BA2: teams 0 and 2 twice in slot 0, penalty 2
        assert_eq!(report.violations_of("BA1").count(), 1);
        assert_eq!(report.violations_of("BA2").count(), 2);
        assert_eq!(report.cost, Cost::new(1 + 4, 0));
        assert_eq!(report.violations.last().unwrap().running, report.cost);
    }

    #[test]
    fn test_registered_ba1_replaces_default() {
        let mut inst = drr4();
        inst.add_meeting(Meeting::new(0, 3)).unwrap();
        inst.add_constraint(Constraint::soft(7, Ba1)).unwrap();
        assert_eq!(inst.check_constraints(true), Cost::new(0, 7));
    }

    #[test]
    fn test_mirror_violation() {
        let mut inst = Instance::new();
        inst.add_league(League::new(0, "L").with_rounds(2).with_symmetry(GameMode::Mirrored))
            .unwrap();
        inst.add_team(Team::new(0, "A", 0)).unwrap();
        inst.add_team(Team::new(1, "B", 0)).unwrap();
        for s in 0..3 {
            inst.add_slot(Slot::new(s, format!("S{s}"))).unwrap();
        }
        inst.generate_meetings();
        inst.schedule_meeting(0, 1, 0).unwrap();
        inst.schedule_meeting(1, 0, 2).unwrap();

        let report = inst.evaluate(&CheckOptions::default().with_silent(true));
        assert_eq!(report.violations_of("Mirror").count(), 1);
        assert_eq!(report.cost, Cost::new(1, 0));

        let unchecked = inst.evaluate(&CheckOptions::default().with_silent(true).with_symmetry(false));
        assert_eq!(unchecked.cost, Cost::ZERO);
    }

    #[test]
    fn test_registered_constraints_and_objective() {
        let mut inst = drr4();
        inst.add_constraint(Constraint::soft(
            3,
            Ca1::new(TeamFilter::teams([0]), 0, 1, HomeMode::Home, SlotFilter::slots(0..6)),
        ))
        .unwrap();
        inst.set_objective(ObjectiveMode::Breaks);
        let report = inst.evaluate(&CheckOptions::default().with_silent(true));
        let breaks: i64 = (0..4).map(|t| inst.breaks(t)).sum();
        // team 0 hosts three times
        assert_eq!(report.objective, breaks);
        assert_eq!(report.cost, Cost::new(0, 2 * 3 + breaks));
    }

    #[test]
    fn test_declared_mismatch_is_reported() {
        let mut inst = drr4();
        inst.set_objective_value(Cost::new(0, 5));
        inst.set_lower_bound(Cost::new(-1, 3));
        let report = inst.evaluate(&CheckOptions::default().with_silent(true));
        assert_eq!(report.cost, Cost::ZERO);
        let kinds: Vec<_> = report.issues.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            [ValidationErrorKind::ObjectiveMismatch, ValidationErrorKind::LowerBoundViolation]
        );

        let unchecked = inst.evaluate(&CheckOptions::default().with_silent(true).with_declared(false));
        assert!(unchecked.issues.is_empty());
    }

    #[test]
    fn test_silent_does_not_change_costs() {
        let mut inst = drr4();
        inst.add_meeting(Meeting::new(1, 2)).unwrap();
        assert_eq!(inst.check_constraints(true), inst.check_constraints(false));
    }

    #[test]
    fn test_evaluation_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5 {
            let mut inst = drr4();
            let mut slots: Vec<u32> = (0..6).collect();
            slots.shuffle(&mut rng);
            inst.clear_schedule();
            for (h, a, s) in DRR4 {
                inst.schedule_meeting(h, a, slots[s as usize]).unwrap();
            }
            inst.set_objective(ObjectiveMode::Breaks);
            inst.add_constraint(Constraint::hard(
                1,
                Ca1::new(TeamFilter::teams(0..4), 0, 1, HomeMode::Home, SlotFilter::slots([0, 1])),
            ))
            .unwrap();

            let options = CheckOptions::default().with_silent(true);
            let first = inst.evaluate(&options);
            let second = inst.evaluate(&options);
            assert_eq!(first, second);
        }
    }
}
