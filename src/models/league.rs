//! League and league group models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{attr_map, join_ids, AttrMap, Compactness, GameMode, LeagueGroupId, LeagueId, TeamId};

/// A round-robin league.
///
/// Every pair of member teams meets `rounds` times. The symmetry mode fixes
/// how later phases relate to the first one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    /// Unique identifier.
    pub id: LeagueId,
    /// Display name.
    pub name: String,
    /// Round-robin count `k`.
    pub rounds: u32,
    /// Structure between consecutive phases.
    pub symmetry: GameMode,
    /// Compact or relaxed season.
    pub compactness: Compactness,
    /// Member teams, filled as teams are added to the instance.
    pub members: BTreeSet<TeamId>,
    /// League groups this league belongs to.
    pub groups: BTreeSet<LeagueGroupId>,
}

/// A named set of leagues.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueGroup {
    /// Unique identifier.
    pub id: LeagueGroupId,
    /// Display name.
    pub name: String,
    /// Member leagues.
    pub members: BTreeSet<LeagueId>,
}

impl League {
    /// Creates a single round-robin league without symmetry.
    pub fn new(id: LeagueId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            rounds: 1,
            symmetry: GameMode::None,
            compactness: Compactness::None,
            members: BTreeSet::new(),
            groups: BTreeSet::new(),
        }
    }

    /// Sets the round-robin count.
    pub fn with_rounds(mut self, rounds: u32) -> Self {
        self.rounds = rounds;
        self
    }

    /// Sets the symmetry mode.
    pub fn with_symmetry(mut self, symmetry: GameMode) -> Self {
        self.symmetry = symmetry;
        self
    }

    /// Sets the compactness.
    pub fn with_compactness(mut self, compactness: Compactness) -> Self {
        self.compactness = compactness;
        self
    }

    /// Declares membership of a league group.
    pub fn with_group(mut self, group: LeagueGroupId) -> Self {
        self.groups.insert(group);
        self
    }

    /// Number of slots in one compact phase: `n - 1` for even `n`, `n` for odd.
    pub fn slots_per_phase(&self) -> u32 {
        let n = self.members.len() as u32;
        (n + n % 2).saturating_sub(1)
    }

    /// Attribute-map form.
    pub fn to_attributes(&self) -> AttrMap {
        attr_map([
            ("ClassType", "Leagues".into()),
            ("Type", "league".into()),
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("leagueGroups", join_ids(&self.groups)),
        ])
    }
}

impl LeagueGroup {
    /// Creates an empty league group.
    pub fn new(id: LeagueGroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    /// Attribute-map form.
    pub fn to_attributes(&self) -> AttrMap {
        attr_map([
            ("ClassType", "LeagueGroups".into()),
            ("Type", "LeagueGroup".into()),
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_league_defaults() {
        let league = League::new(0, "Premier");
        assert_eq!(league.rounds, 1);
        assert_eq!(league.symmetry, GameMode::None);
        assert_eq!(league.compactness, Compactness::None);
    }

    #[test]
    fn test_slots_per_phase() {
        let mut league = League::new(0, "L").with_rounds(2);
        league.members = (0..4).collect();
        assert_eq!(league.slots_per_phase(), 3);
        league.members = (0..5).collect();
        assert_eq!(league.slots_per_phase(), 5);
        league.members.clear();
        assert_eq!(league.slots_per_phase(), 0);
    }

    #[test]
    fn test_league_attributes() {
        let attrs = League::new(2, "Cup").with_group(1).to_attributes();
        assert_eq!(attrs["ClassType"], "Leagues");
        assert_eq!(attrs["leagueGroups"], "1");
        assert_eq!(LeagueGroup::new(1, "All").to_attributes()["Type"], "LeagueGroup");
    }
}
