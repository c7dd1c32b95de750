//! Team and team group models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{attr_map, join_ids, AttrMap, LeagueId, TeamGroupId, TeamId};

/// A team taking part in exactly one league.
///
/// Group memberships are declared on the team; the instance registers the
/// team into each declared group when it is added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Unique identifier.
    pub id: TeamId,
    /// Display name.
    pub name: String,
    /// Owning league.
    pub league: LeagueId,
    /// Team groups this team belongs to.
    pub groups: BTreeSet<TeamGroupId>,
}

/// A named set of teams (e.g. "strong teams", "teams sharing a venue").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamGroup {
    /// Unique identifier.
    pub id: TeamGroupId,
    /// Display name.
    pub name: String,
    /// Member teams.
    pub members: BTreeSet<TeamId>,
}

impl Team {
    /// Creates a team in the given league.
    pub fn new(id: TeamId, name: impl Into<String>, league: LeagueId) -> Self {
        Self {
            id,
            name: name.into(),
            league,
            groups: BTreeSet::new(),
        }
    }

    /// Declares membership of a team group.
    pub fn with_group(mut self, group: TeamGroupId) -> Self {
        self.groups.insert(group);
        self
    }

    /// Declares membership of several team groups.
    pub fn with_groups(mut self, groups: impl IntoIterator<Item = TeamGroupId>) -> Self {
        self.groups.extend(groups);
        self
    }

    /// Attribute-map form.
    pub fn to_attributes(&self) -> AttrMap {
        attr_map([
            ("ClassType", "Teams".into()),
            ("Type", "team".into()),
            ("id", self.id.to_string()),
            ("league", self.league.to_string()),
            ("name", self.name.clone()),
            ("teamGroups", join_ids(&self.groups)),
        ])
    }
}

impl TeamGroup {
    /// Creates an empty team group.
    pub fn new(id: TeamGroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    /// Attribute-map form.
    pub fn to_attributes(&self) -> AttrMap {
        attr_map([
            ("ClassType", "TeamGroups".into()),
            ("Type", "teamGroup".into()),
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
        ])
    }
}
