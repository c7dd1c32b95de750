//! Tournament domain models.
//!
//! Plain data types for a round-robin sports timetable: the entities an
//! instance is made of, the meetings between teams, the enumerated modes
//! used by constraints, and the cost pair every check produces.
//!
//! # Domain Mappings
//!
//! | u-timetable | Football | Basketball | Esports |
//! |-------------|----------|------------|---------|
//! | Team | Club | Franchise | Roster |
//! | League | Division | Conference | Split |
//! | Slot | Matchday | Game night | Week |
//! | Meeting | Fixture | Game | Series |
//!
//! All entities are addressed by integer id; relationships (league and
//! group membership) are stored as id sets, never as references.

mod cost;
mod league;
mod meeting;
mod modes;
mod slot;
mod team;

use std::collections::BTreeMap;

pub use cost::{Cost, Violation};
pub use league::{League, LeagueGroup};
pub use meeting::Meeting;
pub use modes::{
    BreakMode, Compactness, CompareMode, ConstraintType, CountMode, DataType, GameMode,
    GlobalMode, HomeMode, ObjectiveMode, SolutionMethod,
};
pub use slot::{Slot, SlotGroup};
pub use team::{Team, TeamGroup};

/// Team identifier.
pub type TeamId = u32;
/// Team group identifier.
pub type TeamGroupId = u32;
/// League identifier.
pub type LeagueId = u32;
/// League group identifier.
pub type LeagueGroupId = u32;
/// Slot identifier. Slot id order is chronological order.
pub type SlotId = u32;
/// Slot group identifier.
pub type SlotGroupId = u32;
/// Position of a meeting in the instance's meeting list.
pub type MeetingId = usize;

/// Flat string attributes, as exchanged with instance files.
pub type AttrMap = BTreeMap<String, String>;

/// Joins ids with `;` (`"1;2;3"`).
pub fn join_ids<I>(ids: I) -> String
where
    I: IntoIterator,
    I::Item: ToString,
{
    ids.into_iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(";")
}

pub(crate) fn attr_map<const N: usize>(pairs: [(&str, String); N]) -> AttrMap {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_join_ids() {
        let ids: BTreeSet<u32> = [3, 1, 2].into_iter().collect();
        assert_eq!(join_ids(&ids), "1;2;3");
        assert_eq!(join_ids(Vec::<u32>::new()), "");
    }
}
