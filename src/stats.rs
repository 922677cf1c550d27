//! Aggregate statistics over event and control streams.
//!
//! Everything here is a pure fold over streams produced elsewhere in the
//! crate; reporting collaborators decide how (and whether) to present it.

use serde::Serialize;

use crate::events::EventStreams;
use crate::frame::Team;

/// Pass and interception counts for one team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TeamTotals {
    pub passes: u32,
    pub interceptions: u32,
}

/// Per-team event totals over a full sequence (or any prefix of one).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EventTotals {
    pub team_one: TeamTotals,
    pub team_two: TeamTotals,
}

impl EventTotals {
    /// Count the non-empty entries of both event streams per team.
    pub fn from_streams(streams: &EventStreams) -> Self {
        let mut totals = EventTotals::default();

        for team in streams.passes.iter().flatten() {
            totals.team_mut(*team).passes += 1;
        }
        for team in streams.interceptions.iter().flatten() {
            totals.team_mut(*team).interceptions += 1;
        }

        totals
    }

    pub fn team(&self, team: Team) -> &TeamTotals {
        match team {
            Team::One => &self.team_one,
            Team::Two => &self.team_two,
        }
    }

    fn team_mut(&mut self, team: Team) -> &mut TeamTotals {
        match team {
            Team::One => &mut self.team_one,
            Team::Two => &mut self.team_two,
        }
    }

    pub fn total_passes(&self) -> u32 {
        self.team_one.passes + self.team_two.passes
    }

    pub fn total_interceptions(&self) -> u32 {
        self.team_one.interceptions + self.team_two.interceptions
    }

    /// Completed passes as a fraction of a team's attempts, counting throws
    /// picked off by the opponent as failed attempts. `None` when the team
    /// attempted nothing.
    pub fn pass_accuracy(&self, team: Team) -> Option<f64> {
        let completed = self.team(team).passes;
        let picked_off = self.team(team.opponent()).interceptions;
        let attempts = completed + picked_off;
        if attempts == 0 {
            return None;
        }
        Some(f64::from(completed) / f64::from(attempts))
    }
}

/// Fraction of frames each team controlled the ball.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ControlShare {
    pub team_one: f64,
    pub team_two: f64,
}

impl ControlShare {
    /// Control shares over a control stream; slice the stream to get the
    /// share up to a given frame. An empty stream yields zero shares.
    pub fn over(control: &[Option<Team>]) -> Self {
        if control.is_empty() {
            return ControlShare::default();
        }

        let mut team_one = 0usize;
        let mut team_two = 0usize;
        for team in control.iter().flatten() {
            match team {
                Team::One => team_one += 1,
                Team::Two => team_two += 1,
            }
        }

        let total = control.len() as f64;
        ControlShare {
            team_one: team_one as f64 / total,
            team_two: team_two as f64 / total,
        }
    }

    /// Fraction of frames with no controlling team.
    pub fn uncontrolled(&self) -> f64 {
        1.0 - self.team_one - self.team_two
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn streams(
        passes: Vec<Option<Team>>,
        interceptions: Vec<Option<Team>>,
    ) -> EventStreams {
        EventStreams {
            passes,
            interceptions,
        }
    }

    #[test]
    fn test_totals_count_per_team() {
        let streams = streams(
            vec![None, Some(Team::One), None, Some(Team::One), Some(Team::Two)],
            vec![None, None, Some(Team::Two), None, None],
        );

        let totals = EventTotals::from_streams(&streams);

        assert_eq!(totals.team_one.passes, 2);
        assert_eq!(totals.team_two.passes, 1);
        assert_eq!(totals.team_one.interceptions, 0);
        assert_eq!(totals.team_two.interceptions, 1);
        assert_eq!(totals.total_passes(), 3);
        assert_eq!(totals.total_interceptions(), 1);
    }

    #[test]
    fn test_pass_accuracy() {
        let streams = streams(
            vec![Some(Team::One), Some(Team::One), Some(Team::One)],
            vec![Some(Team::Two)],
        );

        let totals = EventTotals::from_streams(&streams);

        // Team one: 3 completed, 1 picked off by team two.
        assert_relative_eq!(
            totals.pass_accuracy(Team::One).unwrap(),
            0.75,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_pass_accuracy_no_attempts() {
        let totals = EventTotals::default();

        assert_eq!(totals.pass_accuracy(Team::One), None);
        assert_eq!(totals.pass_accuracy(Team::Two), None);
    }

    #[test]
    fn test_control_share() {
        let control = vec![
            Some(Team::One),
            Some(Team::One),
            Some(Team::Two),
            None,
        ];

        let share = ControlShare::over(&control);

        assert_relative_eq!(share.team_one, 0.5, epsilon = 1e-10);
        assert_relative_eq!(share.team_two, 0.25, epsilon = 1e-10);
        assert_relative_eq!(share.uncontrolled(), 0.25, epsilon = 1e-10);
    }

    #[test]
    fn test_control_share_empty_stream() {
        let share = ControlShare::over(&[]);

        assert_relative_eq!(share.team_one, 0.0, epsilon = 1e-10);
        assert_relative_eq!(share.team_two, 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_control_share_prefix_via_slice() {
        let control = vec![Some(Team::One), Some(Team::Two), Some(Team::Two)];

        let share = ControlShare::over(&control[..2]);

        assert_relative_eq!(share.team_one, 0.5, epsilon = 1e-10);
        assert_relative_eq!(share.team_two, 0.5, epsilon = 1e-10);
    }
}
