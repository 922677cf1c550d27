//! Pass and interception classification over the possession stream.
//!
//! A holder change between the last known possessor and the current one is a
//! pass when both players belong to the same known team, and an interception
//! when they belong to different known teams. Both classifications come out
//! of a single scan so they can never disagree about which frames are
//! holder-change frames.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frame::{Team, TeamAssignments, TrackId};

/// Team label streams produced by the classifier, one entry per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventStreams {
    /// Team credited with a completed pass at each frame, or `None`.
    pub passes: Vec<Option<Team>>,

    /// Team credited with an interception at each frame, or `None`.
    pub interceptions: Vec<Option<Team>>,
}

impl EventStreams {
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

/// Classify possession transfers into pass and interception streams.
///
/// The classifier carries the most recent frame that had a holder, so a run
/// of possession-less frames between two holders does not break attribution:
/// the transfer is charged against the last known holder whenever a new one
/// appears. Frame 0 always emits `None` on both streams. A transfer
/// involving a player with no team assignment on the relevant frame emits no
/// event at all; teams are never fabricated.
pub fn classify_events(
    possession: &[Option<TrackId>],
    assignments: &[TeamAssignments],
) -> EventStreams {
    let num_frames = possession.len();
    let mut passes: Vec<Option<Team>> = vec![None; num_frames];
    let mut interceptions: Vec<Option<Team>> = vec![None; num_frames];

    let mut last_holder: Option<(TrackId, usize)> = None;

    for frame in 1..num_frames {
        if let Some(holder) = possession[frame - 1] {
            last_holder = Some((holder, frame - 1));
        }

        let Some(current) = possession[frame] else {
            continue;
        };
        let Some((previous, previous_frame)) = last_holder else {
            continue;
        };
        if previous == current {
            continue;
        }

        let previous_team = team_of(assignments, previous_frame, previous);
        let current_team = team_of(assignments, frame, current);

        match (previous_team, current_team) {
            (Some(from), Some(to)) if from == to => {
                debug!(team = from.label(), frame, "pass");
                passes[frame] = Some(from);
            }
            (Some(from), Some(to)) => {
                debug!(from = from.label(), to = to.label(), frame, "interception");
                interceptions[frame] = Some(to);
            }
            // Either side team-unknown: no event.
            _ => {}
        }
    }

    EventStreams {
        passes,
        interceptions,
    }
}

/// Per-frame team of the current possession holder.
///
/// `None` when the frame has no holder, or the holder has no team assignment
/// on that frame.
pub fn team_in_control(
    possession: &[Option<TrackId>],
    assignments: &[TeamAssignments],
) -> Vec<Option<Team>> {
    possession
        .iter()
        .enumerate()
        .map(|(frame, holder)| holder.and_then(|player| team_of(assignments, frame, player)))
        .collect()
}

fn team_of(assignments: &[TeamAssignments], frame: usize, player: TrackId) -> Option<Team> {
    assignments
        .get(frame)
        .and_then(|teams| teams.get(&player).copied())
}
