//! Structural symmetry between consecutive round-robin phases.
//!
//! A league of `n` members plays phases of `P = n - 1 + n % 2` slots; phase
//! `r` covers slots `rP .. (r+1)P`. Slot `s` of phase `r` is compared with
//! its counterpart in phase `r + 1`:
//!
//! | Mode | Counterpart of `s` |
//! |------|--------------------|
//! | Mirrored | `s` |
//! | English | `s + 1`, the last slot wrapping to the first |
//! | French | `s - 1`, the first slot wrapping to the last |
//! | Inverted | `P - 1 - s` |
//!
//! A home game of `t1` against `t2` must be matched by an away game of `t1`
//! against `t2` in the counterpart slot. Phased leagues instead require
//! every pair to meet exactly once per phase.

use std::collections::BTreeSet;

use tracing::debug;

use crate::instance::{report, Instance};
use crate::models::{Cost, GameMode, HomeMode, LeagueId, SlotId, TeamId, Violation};
use crate::validation::{ValidationError, ValidationErrorKind, ValidationResult};

impl Instance {
    /// Symmetry violations of one league, one per mismatch, each charged
    /// one unit of infeasibility.
    ///
    /// # Errors
    /// `UnknownReference` for an unknown league; `SymmetryDeclaration` if
    /// the league declares a symmetry with at most one round robin.
    pub fn check_symmetry(&self, league: LeagueId) -> ValidationResult<Vec<Violation>> {
        let l = self.league(league).map_err(report)?;
        let mode = l.symmetry;
        if mode == GameMode::None {
            return Ok(Vec::new());
        }
        if l.rounds <= 1 {
            return Err(report(ValidationError::new(
                ValidationErrorKind::SymmetryDeclaration,
                format!(
                    "league {league} organizes a symmetric {}RR; symmetry needs k > 1",
                    l.rounds
                ),
            )));
        }

        let phase: SlotId = l.slots_per_phase();
        let members: Vec<TeamId> = l.members.iter().copied().collect();
        let mut violations = Vec::new();
        for r in 0..l.rounds - 1 {
            let start = r * phase;
            let next = start + phase;
            for &t1 in &members {
                for &t2 in &members {
                    if t1 == t2 {
                        continue;
                    }
                    if mode == GameMode::Phased {
                        let slots: BTreeSet<SlotId> = (start..next).collect();
                        let n = self
                            .meetings_team_team_slot(&[t1].into(), &[t2].into(), &slots, HomeMode::Either)
                            .len();
                        if n != 1 {
                            violations.push(symmetry_violation(
                                mode,
                                format!("Team {t1} and team {t2} meet {n} times in phase {r}. Should be 1."),
                            ));
                        }
                        continue;
                    }
                    for s in 0..phase {
                        let here = start + s;
                        let there = match mode {
                            GameMode::English if s == phase - 1 => next,
                            GameMode::English => next + s + 1,
                            GameMode::French if s == 0 => next + phase - 1,
                            GameMode::French => next + s - 1,
                            GameMode::Inverted => next + phase - 1 - s,
                            _ => next + s,
                        };
                        let home = self.pair_games(t1, t2, here, HomeMode::Home);
                        let away = self.pair_games(t1, t2, there, HomeMode::Away);
                        if home != away {
                            violations.push(symmetry_violation(
                                mode,
                                format!("Game ({t1},{t2}) on slot {here} and game ({t2},{t1}) on slot {there}"),
                            ));
                        }
                    }
                }
            }
        }
        debug!(league, %mode, found = violations.len(), "symmetry checked");
        Ok(violations)
    }

    fn pair_games(&self, t1: TeamId, t2: TeamId, slot: SlotId, mode: HomeMode) -> usize {
        self.meetings_team_team_slot(&[t1].into(), &[t2].into(), &[slot].into(), mode)
            .len()
    }
}

fn symmetry_violation(mode: GameMode, detail: String) -> Violation {
    let name = match mode {
        GameMode::Mirrored => "Mirror",
        GameMode::Inverted => "Inverted",
        GameMode::English => "English",
        GameMode::French => "French",
        GameMode::Phased => "Phased",
        GameMode::None => "Symmetry",
    };
    Violation::new(name, format!("{name} violation."))
        .with_deviation(1)
        .with_cost(Cost::new(1, 0), Cost::ZERO)
        .with_detail(detail)
}
