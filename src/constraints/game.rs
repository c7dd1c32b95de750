//! Game constraints: fixed or forbidden games (GA1), conditional games (GA2).

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{bound_deviation, format_ids, SlotFilter, Tally, TeamFilter};
use crate::instance::Instance;
use crate::models::{CompareMode, HomeMode, TeamId};

/// GA1: the slots host between `min` and `max` of the listed
/// `(home, away)` games.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ga1 {
    pub slots: SlotFilter,
    pub min: i64,
    pub max: i64,
    pub meetings: BTreeSet<(TeamId, TeamId)>,
}

/// GA2: if a team of `teams1` plays a `mode1` game against `teams2` in
/// `slots1`, then a team of `teams3` plays (`Eq`) or does not play (`Neq`)
/// a `mode3` game against `teams4` in `slots2`.
///
/// `mode2` is the comparison; any other than `Eq` or `Neq` panics when
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ga2 {
    pub teams1: TeamFilter,
    pub mode1: HomeMode,
    pub teams2: TeamFilter,
    pub slots1: SlotFilter,
    pub teams3: TeamFilter,
    pub mode2: CompareMode,
    pub mode3: HomeMode,
    pub teams4: TeamFilter,
    pub slots2: SlotFilter,
}

impl Ga1 {
    pub fn new(
        slots: SlotFilter,
        min: i64,
        max: i64,
        meetings: impl IntoIterator<Item = (TeamId, TeamId)>,
    ) -> Self {
        Self {
            slots,
            min,
            max,
            meetings: meetings.into_iter().collect(),
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        let slots = self.slots.resolve(inst);
        let n = inst
            .meetings_slot(&slots)
            .iter()
            .filter(|m| self.meetings.contains(&(m.first, m.second)))
            .count() as i64;
        let dev = bound_deviation(n, self.min, self.max);
        if dev > 0 {
            let games: Vec<String> = self
                .meetings
                .iter()
                .map(|(h, a)| format!("({h},{a})"))
                .collect();
            tally
                .charge(
                    dev,
                    format!(
                        "Total of {n} scheduled games from {{{}}}. Allowed range [{},{}].",
                        games.join(", "),
                        self.min,
                        self.max
                    ),
                )
                .details
                .push(format!("Time slots: {}", format_ids(&slots)));
        }
    }
}

impl Ga2 {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        teams1: TeamFilter,
        mode1: HomeMode,
        teams2: TeamFilter,
        slots1: SlotFilter,
        teams3: TeamFilter,
        mode2: CompareMode,
        mode3: HomeMode,
        teams4: TeamFilter,
        slots2: SlotFilter,
    ) -> Self {
        Self {
            teams1,
            mode1,
            teams2,
            slots1,
            teams3,
            mode2,
            mode3,
            teams4,
            slots2,
        }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        assert!(
            matches!(self.mode2, CompareMode::Eq | CompareMode::Neq),
            "GA2 supports only EQ and NEQ comparisons, got {}",
            self.mode2
        );
        let trigger = inst.meetings_team_team_slot(
            &self.teams1.resolve(inst),
            &self.teams2.resolve(inst),
            &self.slots1.resolve(inst),
            self.mode1,
        );
        if trigger.is_empty() {
            return;
        }
        let n = inst
            .meetings_team_team_slot(
                &self.teams3.resolve(inst),
                &self.teams4.resolve(inst),
                &self.slots2.resolve(inst),
                self.mode3,
            )
            .len();
        match self.mode2 {
            CompareMode::Eq if n == 0 => {
                tally.charge(1, "Triggering game found, but no required game in S2.");
            }
            CompareMode::Neq if n > 0 => {
                tally.charge(1, format!("Triggering game found, and {n} forbidden games in S2."));
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::{fixtures, Constraint};
    use super::*;
    use crate::models::Cost;

    #[test]
    fn test_ga1_fixed_game_missing() {
        let inst = fixtures::with_games(4, 2, &[(0, 1, 0), (2, 3, 1)]);
        // (2,3) should be played in slot 0
        let c = Constraint::hard(1, Ga1::new(SlotFilter::slots([0]), 1, 1, [(2, 3)]));
        let outcome = c.check(&inst);
        assert_eq!(outcome.cost, Cost::new(1, 0));
        assert!(outcome.violations[0].message.contains("(2,3)"));
    }

    #[test]
    fn test_ga1_orientation_matters() {
        let inst = fixtures::with_games(4, 2, &[(0, 1, 0)]);
        let forbid = Constraint::soft(4, Ga1::new(SlotFilter::slots([0, 1]), 0, 0, [(1, 0)]));
        assert_eq!(forbid.check(&inst).cost, Cost::ZERO);
        let forbid = Constraint::soft(4, Ga1::new(SlotFilter::slots([0, 1]), 0, 0, [(0, 1)]));
        assert_eq!(forbid.check(&inst).cost, Cost::new(0, 4));
    }

    fn ga2(mode2: CompareMode) -> Constraint {
        Constraint::hard(
            1,
            Ga2::new(
                TeamFilter::teams([0]),
                HomeMode::Home,
                TeamFilter::teams([1]),
                SlotFilter::slots([0]),
                TeamFilter::teams([2]),
                mode2,
                HomeMode::Home,
                TeamFilter::teams([3]),
                SlotFilter::slots([1]),
            ),
        )
    }

    #[test]
    fn test_ga2_eq_and_neq() {
        let without = fixtures::with_games(4, 2, &[(0, 1, 0), (3, 2, 1)]);
        assert_eq!(ga2(CompareMode::Eq).check(&without).cost, Cost::new(1, 0));
        assert_eq!(ga2(CompareMode::Neq).check(&without).cost, Cost::ZERO);

        let with = fixtures::with_games(4, 2, &[(0, 1, 0), (2, 3, 1)]);
        assert_eq!(ga2(CompareMode::Eq).check(&with).cost, Cost::ZERO);
        assert_eq!(ga2(CompareMode::Neq).check(&with).cost, Cost::new(1, 0));
    }

    #[test]
    fn test_ga2_not_triggered() {
        let inst = fixtures::with_games(4, 2, &[(1, 0, 0)]);
        assert_eq!(ga2(CompareMode::Eq).check(&inst).cost, Cost::ZERO);
    }

    #[test]
    #[should_panic(expected = "GA2 supports only EQ and NEQ")]
    fn test_ga2_unsupported_comparison() {
        let inst = fixtures::with_games(4, 2, &[(0, 1, 0)]);
        ga2(CompareMode::Leq).check(&inst);
    }
}
