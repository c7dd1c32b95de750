//! Global objective and declared-value cross-checks.

use crate::instance::{report, Instance};
use crate::models::{Cost, ObjectiveMode};
use crate::validation::{ValidationError, ValidationErrorKind};

/// Marks an undeclared component of a declared cost pair.
const UNDECLARED: i64 = -1;

impl Instance {
    /// Value of the global objective, added to the feasibility cost.
    ///
    /// `SC` and `NONE` have no objective of their own and give 0.
    pub fn objective_cost(&self) -> i64 {
        let teams = self.teams().keys();
        match self.objective() {
            ObjectiveMode::Breaks => teams.map(|&t| self.breaks(t)).sum(),
            ObjectiveMode::CarryOver => self.leagues().keys().map(|&l| self.carry_over(l)).sum(),
            ObjectiveMode::Cost => teams.map(|&t| self.team_cost(t)).sum(),
            ObjectiveMode::Travel => teams.map(|&t| self.distance(t, &Default::default())).sum(),
            ObjectiveMode::Constraints | ObjectiveMode::None => 0,
        }
    }

    /// Compares `cost` with the declared objective value and lower bound.
    ///
    /// A declared component of `-1` is not checked.
    pub fn declared_issues(&self, cost: Cost) -> Vec<ValidationError> {
        let declared = self.objective_value();
        let bound = self.lower_bound();
        let components = [
            ("Infeasibility", cost.infeasibility, declared.infeasibility, bound.infeasibility),
            ("Objective", cost.feasibility, declared.feasibility, bound.feasibility),
        ];

        let mut issues = Vec::new();
        for (what, value, expected, _) in components {
            if expected != UNDECLARED && expected != value {
                issues.push(report(ValidationError::new(
                    ValidationErrorKind::ObjectiveMismatch,
                    format!("{what} value of {value} does not match the declared value {expected}"),
                )));
            }
        }
        for (what, value, _, lower) in components {
            if lower != UNDECLARED && lower > value {
                issues.push(report(ValidationError::new(
                    ValidationErrorKind::LowerBoundViolation,
                    format!("{what} value of {value} is below the declared lower bound {lower}"),
                )));
            }
        }
        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{League, Meeting, Slot, Team};

    /// Two teams, double round robin over two slots.
    fn pair() -> Instance {
        let mut inst = Instance::new();
        inst.add_league(League::new(0, "L").with_rounds(2)).unwrap();
        inst.add_team(Team::new(0, "A", 0)).unwrap();
        inst.add_team(Team::new(1, "B", 0)).unwrap();
        inst.add_slot(Slot::new(0, "S0")).unwrap();
        inst.add_slot(Slot::new(1, "S1")).unwrap();
        inst.add_meeting(Meeting::new(0, 1).with_slot(0)).unwrap();
        inst.add_meeting(Meeting::new(1, 0).with_slot(1)).unwrap();
        inst
    }

    #[test]
    fn test_objective_modes() {
        let mut inst = pair();
        inst.set_distance(0, 1, 4).unwrap();
        inst.set_distance(1, 0, 6).unwrap();
        inst.set_cost(0, 1, 0, 2).unwrap();
        inst.set_cost(1, 0, 1, 3).unwrap();

        assert_eq!(inst.objective_cost(), 0);
        inst.set_objective(ObjectiveMode::Breaks);
        assert_eq!(inst.objective_cost(), 0);
        inst.set_objective(ObjectiveMode::Cost);
        assert_eq!(inst.objective_cost(), 5);
        inst.set_objective(ObjectiveMode::Travel);
        // team 0: 0 -> 1 -> 0; team 1: 1 -> 0 -> 1
        assert_eq!(inst.objective_cost(), 10 + 10);
        inst.set_objective(ObjectiveMode::CarryOver);
        // each team meets the same opponent twice: COM(1,1) = COM(0,0) = 2
        assert_eq!(inst.objective_cost(), 4 + 4);
        inst.set_objective(ObjectiveMode::Constraints);
        assert_eq!(inst.objective_cost(), 0);
    }

    #[test]
    fn test_undeclared_values_are_skipped() {
        let mut inst = pair();
        inst.set_objective_value(Cost::new(-1, -1));
        inst.set_lower_bound(Cost::new(-1, -1));
        assert!(inst.declared_issues(Cost::new(3, 9)).is_empty());
    }

    #[test]
    fn test_declared_checks() {
        let mut inst = pair();
        inst.set_objective_value(Cost::new(3, -1));
        inst.set_lower_bound(Cost::new(0, 10));
        let issues = inst.declared_issues(Cost::new(2, 9));
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].kind, ValidationErrorKind::ObjectiveMismatch);
        assert!(issues[0].message.starts_with("Infeasibility value of 2"));
        assert_eq!(issues[1].kind, ValidationErrorKind::LowerBoundViolation);
        assert!(issues[1].message.contains("lower bound 10"));

        assert!(inst.declared_issues(Cost::new(3, 10)).is_empty());
    }
}
