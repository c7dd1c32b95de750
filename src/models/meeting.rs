//! Meeting model.

use serde::{Deserialize, Serialize};

use super::{SlotId, TeamId};

/// A single game between two teams, scheduled or not.
///
/// `first` is the home team and `second` the away team. When `no_home` is
/// set the orientation is undetermined and scheduling may swap the ends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Meeting {
    /// Home team (or first team when `no_home`).
    pub first: TeamId,
    /// Away team (or second team when `no_home`).
    pub second: TeamId,
    /// Home advantage undetermined at creation.
    pub no_home: bool,
    /// Assigned slot; `None` while unscheduled.
    pub slot: Option<SlotId>,
}

impl Meeting {
    /// Creates an unscheduled meeting with `first` at home.
    pub fn new(first: TeamId, second: TeamId) -> Self {
        Self {
            first,
            second,
            no_home: false,
            slot: None,
        }
    }

    /// Creates an unscheduled meeting without a determined home team.
    pub fn undetermined(first: TeamId, second: TeamId) -> Self {
        Self {
            no_home: true,
            ..Self::new(first, second)
        }
    }

    /// Assigns a slot.
    pub fn with_slot(mut self, slot: SlotId) -> Self {
        self.slot = Some(slot);
        self
    }

    /// Home team.
    pub fn home(&self) -> TeamId {
        self.first
    }

    /// Away team.
    pub fn away(&self) -> TeamId {
        self.second
    }

    /// Returns `true` once a slot is assigned.
    pub fn is_scheduled(&self) -> bool {
        self.slot.is_some()
    }

    /// Returns `true` if `team` plays in this meeting.
    pub fn involves(&self, team: TeamId) -> bool {
        self.first == team || self.second == team
    }

    /// The other team, if `team` plays in this meeting.
    pub fn opponent(&self, team: TeamId) -> Option<TeamId> {
        if self.first == team {
            Some(self.second)
        } else if self.second == team {
            Some(self.first)
        } else {
            None
        }
    }

    /// Returns `true` if `team` is the home side.
    pub fn is_home(&self, team: TeamId) -> bool {
        self.first == team
    }

    pub(crate) fn swap_ends(&mut self) {
        std::mem::swap(&mut self.first, &mut self.second);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roles() {
        let m = Meeting::new(1, 2).with_slot(3);
        assert_eq!(m.home(), 1);
        assert_eq!(m.away(), 2);
        assert!(m.is_scheduled());
        assert!(m.is_home(1));
        assert!(!m.is_home(2));
    }

    #[test]
    fn test_opponent() {
        let m = Meeting::undetermined(4, 7);
        assert!(m.no_home);
        assert!(!m.is_scheduled());
        assert_eq!(m.opponent(4), Some(7));
        assert_eq!(m.opponent(7), Some(4));
        assert_eq!(m.opponent(5), None);
        assert!(m.involves(7));
    }

    #[test]
    fn test_swap_ends() {
        let mut m = Meeting::undetermined(4, 7);
        m.swap_ends();
        assert_eq!((m.first, m.second), (7, 4));
    }
}
