//! Cost pair and violation diagnostics.
//!
//! Every check produces a [`Cost`]: an infeasibility component (hard
//! constraint violations) and a feasibility component (soft violations
//! plus the objective). A timetable is feasible iff its infeasibility
//! is zero; among feasible timetables, lower feasibility is better.
//!
//! # Reference
//! Van Bulck et al. (2020), "RobinX: A three-field classification and
//! unified data format for round-robin sports timetabling", EJOR 280(2)

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};

use super::ConstraintType;

/// An (infeasibility, feasibility) cost pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cost {
    /// Accumulated hard-constraint cost.
    pub infeasibility: i64,
    /// Accumulated soft-constraint and objective cost.
    pub feasibility: i64,
}

impl Cost {
    /// No cost.
    pub const ZERO: Cost = Cost::new(0, 0);

    /// Creates a cost pair.
    pub const fn new(infeasibility: i64, feasibility: i64) -> Self {
        Self {
            infeasibility,
            feasibility,
        }
    }

    /// Cost of `amount` charged to the component selected by `kind`.
    pub fn charged(kind: ConstraintType, amount: i64) -> Self {
        match kind {
            ConstraintType::Hard => Cost::new(amount, 0),
            ConstraintType::Soft => Cost::new(0, amount),
        }
    }

    /// Charges `amount` to the component selected by `kind`.
    pub fn charge(&mut self, kind: ConstraintType, amount: i64) {
        *self += Cost::charged(kind, amount);
    }

    /// Returns `true` if no hard cost was charged.
    pub fn is_feasible(&self) -> bool {
        self.infeasibility == 0
    }
}

impl Add for Cost {
    type Output = Cost;

    fn add(self, rhs: Cost) -> Cost {
        Cost::new(
            self.infeasibility + rhs.infeasibility,
            self.feasibility + rhs.feasibility,
        )
    }
}

impl AddAssign for Cost {
    fn add_assign(&mut self, rhs: Cost) {
        self.infeasibility += rhs.infeasibility;
        self.feasibility += rhs.feasibility;
    }
}

impl Sum for Cost {
    fn sum<I: Iterator<Item = Cost>>(iter: I) -> Cost {
        iter.fold(Cost::ZERO, Add::add)
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.infeasibility, self.feasibility)
    }
}

/// A single violation found by a check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Name of the check that raised it (`"CA1"`, `"Mirror"`, ...).
    pub constraint: String,
    /// Human-readable description.
    pub message: String,
    /// Amount by which the bound is missed.
    pub deviation: i64,
    /// Cost charged for this violation.
    pub cost: Cost,
    /// Running cost of the raising check after this violation.
    pub running: Cost,
    /// Supplementary lines (filters involved, slots, ...).
    pub details: Vec<String>,
}

impl Violation {
    /// Creates a violation with zero deviation and cost.
    pub fn new(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            constraint: constraint.into(),
            message: message.into(),
            deviation: 0,
            cost: Cost::ZERO,
            running: Cost::ZERO,
            details: Vec::new(),
        }
    }

    /// Sets the deviation.
    pub fn with_deviation(mut self, deviation: i64) -> Self {
        self.deviation = deviation;
        self
    }

    /// Sets the charged cost and running total.
    pub fn with_cost(mut self, cost: Cost, running: Cost) -> Self {
        self.cost = cost;
        self.running = running;
        self
    }

    /// Appends a supplementary line.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    /// Fixed-width diagnostic line: name, blank, message, running
    /// infeasibility, running feasibility.
    pub fn diagnostic_line(&self) -> String {
        format!(
            "{:>10}{:>10}{:>50}{:>10}{:>10}",
            self.constraint, "", self.message, self.running.infeasibility, self.running.feasibility
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_by_type() {
        let mut cost = Cost::ZERO;
        cost.charge(ConstraintType::Hard, 3);
        cost.charge(ConstraintType::Soft, 5);
        cost.charge(ConstraintType::Hard, 1);
        assert_eq!(cost, Cost::new(4, 5));
        assert!(!cost.is_feasible());
    }

    #[test]
    fn test_sum() {
        let total: Cost = [Cost::new(1, 2), Cost::new(0, 3), Cost::ZERO]
            .into_iter()
            .sum();
        assert_eq!(total, Cost::new(1, 5));
        assert_eq!(total.to_string(), "(1, 5)");
    }

    #[test]
    fn test_violation_builder() {
        let v = Violation::new("CA1", "Team 1 has 3 H-games")
            .with_deviation(2)
            .with_cost(Cost::new(2, 0), Cost::new(2, 0))
            .with_detail("Slots: 0;1;2");
        assert_eq!(v.deviation, 2);
        assert_eq!(v.details.len(), 1);
    }

    #[test]
    fn test_diagnostic_line_columns() {
        let v = Violation::new("BA1", "Unscheduled").with_cost(Cost::new(1, 0), Cost::new(7, 3));
        let line = v.diagnostic_line();
        assert_eq!(line.len(), 90);
        assert!(line.starts_with("       BA1"));
        assert!(line.ends_with("         7         3"));
    }
}
