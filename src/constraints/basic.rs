//! Basic constraints: every meeting scheduled, one game per team and slot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{team_name, Tally};
use crate::instance::Instance;
use crate::models::HomeMode;

/// BA1: every meeting is scheduled. Deviation 1 per unscheduled meeting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ba1;

/// BA2: each team plays at most one game per slot.
///
/// Deviation per (team, slot) is the number of games above one. Always
/// evaluated by the orchestrator; cannot be built or registered outside the
/// crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ba2 {
    _internal: (),
}

impl Ba1 {
    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        for m in inst.unscheduled_meetings() {
            tally.charge(
                1,
                format!(
                    "Unscheduled meeting between team {} ({}) and {} ({}).",
                    m.first,
                    team_name(inst, m.first),
                    m.second,
                    team_name(inst, m.second)
                ),
            );
        }
    }
}

impl Ba2 {
    pub(crate) fn new() -> Self {
        Self { _internal: () }
    }

    pub(crate) fn check(&self, inst: &Instance, tally: &mut Tally) {
        for &t in inst.teams().keys() {
            let team = BTreeSet::from([t]);
            for &s in inst.slots().keys() {
                let games = inst
                    .meetings_team_slot(&team, &BTreeSet::from([s]), HomeMode::Either)
                    .len() as i64;
                if games > 1 {
                    tally.charge(games - 1, format!("Team {t} plays {games} games in slot {s}"));
                }
            }
        }
    }
}
