//! Per-frame input records produced by the upstream detection and tracking
//! collaborators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::BoundingBox;

/// Stable integer identifier assigned by the external tracker to a player.
///
/// Ids may appear, disappear, and reappear across frames; this core does no
/// identity reconciliation.
pub type TrackId = i32;

/// Players visible in one frame, keyed by track-id.
///
/// Ordered by id so that iteration, and therefore candidate tie-breaking,
/// is deterministic.
pub type PlayerBoxes = BTreeMap<TrackId, BoundingBox>;

/// Team labels for the players of one frame, keyed by track-id.
///
/// A player absent from the map is team-unknown for that frame (the external
/// appearance classifier has not labeled them yet).
pub type TeamAssignments = BTreeMap<TrackId, Team>;

/// One of the two teams on the court.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    One,
    Two,
}

impl Team {
    /// The opposing team.
    pub fn opponent(&self) -> Team {
        match self {
            Team::One => Team::Two,
            Team::Two => Team::One,
        }
    }

    /// Conventional numeric label (1 or 2) used by reporting collaborators.
    pub fn label(&self) -> u8 {
        match self {
            Team::One => 1,
            Team::Two => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_team_opponent() {
        assert_eq!(Team::One.opponent(), Team::Two);
        assert_eq!(Team::Two.opponent(), Team::One);
    }

    #[test]
    fn test_team_label() {
        assert_eq!(Team::One.label(), 1);
        assert_eq!(Team::Two.label(), 2);
    }
}
