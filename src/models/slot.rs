//! Slot and slot group models.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::{attr_map, join_ids, AttrMap, SlotGroupId, SlotId};

/// A discrete time period. At most one meeting per team is allowed in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    /// Unique identifier; ids are chronological.
    pub id: SlotId,
    /// Display name.
    pub name: String,
    /// Slot groups this slot belongs to.
    pub groups: BTreeSet<SlotGroupId>,
}

/// A named set of slots (a "time group").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotGroup {
    /// Unique identifier.
    pub id: SlotGroupId,
    /// Display name.
    pub name: String,
    /// Member slots.
    pub members: BTreeSet<SlotId>,
}

impl Slot {
    /// Creates a slot.
    pub fn new(id: SlotId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            groups: BTreeSet::new(),
        }
    }

    /// Declares membership of a slot group.
    pub fn with_group(mut self, group: SlotGroupId) -> Self {
        self.groups.insert(group);
        self
    }

    /// Attribute-map form.
    pub fn to_attributes(&self) -> AttrMap {
        attr_map([
            ("ClassType", "Slots".into()),
            ("Type", "slot".into()),
            ("id", self.id.to_string()),
            ("slotGroup", join_ids(&self.groups)),
            ("name", self.name.clone()),
        ])
    }
}

impl SlotGroup {
    /// Creates an empty slot group.
    pub fn new(id: SlotGroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: BTreeSet::new(),
        }
    }

    /// Attribute-map form.
    pub fn to_attributes(&self) -> AttrMap {
        attr_map([
            ("ClassType", "SlotGroups".into()),
            ("Type", "slotGroup".into()),
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
        ])
    }
}
