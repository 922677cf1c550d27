//! Frame-by-frame ball possession resolution.
//!
//! For each frame with a detected ball, every visible player is scored
//! against the ball on two criteria (how much of the ball's box their box
//! contains, and how close their box is to the ball center) and a best
//! candidate is selected under a strict two-tier policy. A candidate only
//! becomes the confirmed possessor after holding prima-facie possession for
//! a minimum run of consecutive frames, at which point the whole run is
//! backfilled.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::distances::min_distance_to_ball;
use crate::frame::{PlayerBoxes, TrackId};
use crate::{BoundingBox, Error, Result};

/// Configuration for the possession resolver.
///
/// The defaults are empirically tuned for broadcast-resolution footage;
/// callers working in other coordinate spaces should scale
/// `max_assignment_distance` accordingly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PossessionConfig {
    /// Containment ratio above which a player is scored by overlap alone.
    pub containment_threshold: f64,

    /// Maximum anchor distance (in pixels) at which a player can be a
    /// distance-scored possession candidate.
    pub max_assignment_distance: f64,

    /// Consecutive candidate frames required before possession is confirmed.
    pub min_consecutive_frames: u32,
}

impl Default for PossessionConfig {
    fn default() -> Self {
        Self {
            containment_threshold: 0.8,
            max_assignment_distance: 50.0,
            min_consecutive_frames: 9,
        }
    }
}

/// Resolves the per-frame possession stream from player and ball tracks.
///
/// The resolver is stateless across invocations: each call to
/// [`resolve`](PossessionResolver::resolve) owns its run counters, so the
/// same resolver can be reused across sequences.
pub struct PossessionResolver {
    config: PossessionConfig,
}

impl PossessionResolver {
    /// Create a resolver, validating the configuration.
    pub fn new(config: PossessionConfig) -> Result<Self> {
        if !(0.0..=1.0).contains(&config.containment_threshold) {
            return Err(Error::InvalidConfig(format!(
                "containment_threshold must be within [0, 1], got {}",
                config.containment_threshold
            )));
        }
        if config.max_assignment_distance <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_assignment_distance must be positive, got {}",
                config.max_assignment_distance
            )));
        }
        if config.min_consecutive_frames == 0 {
            return Err(Error::InvalidConfig(
                "min_consecutive_frames must be at least 1".to_string(),
            ));
        }
        Ok(Self { config })
    }

    /// Create a resolver with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: PossessionConfig::default(),
        }
    }

    pub fn config(&self) -> &PossessionConfig {
        &self.config
    }

    /// Resolve possession over a full frame sequence.
    ///
    /// `ball_tracks` defines the frame range; a frame index beyond the end of
    /// `player_tracks` is treated as an empty player set. Returns one entry
    /// per frame: the confirmed possessor's track-id, or `None`.
    ///
    /// Frames without a ball detection stay `None` and clear the accumulated
    /// run counters, as does any frame without a candidate: an interrupted
    /// run restarts from scratch, never resumes at its prior length. Once a
    /// candidate has been the frame candidate for `min_consecutive_frames`
    /// consecutive frames, the run's frames are assigned retroactively,
    /// without overwriting frames already assigned by an earlier run.
    pub fn resolve(
        &self,
        player_tracks: &[PlayerBoxes],
        ball_tracks: &[Option<BoundingBox>],
    ) -> Vec<Option<TrackId>> {
        let num_frames = ball_tracks.len();
        let mut possession: Vec<Option<TrackId>> = vec![None; num_frames];
        let mut run = RunState::default();

        for frame in 0..num_frames {
            let Some(ball_box) = ball_tracks[frame] else {
                run.reset();
                continue;
            };

            let candidate = player_tracks
                .get(frame)
                .and_then(|players| self.best_candidate(players, &ball_box));

            let Some(player) = candidate else {
                run.reset();
                continue;
            };

            let count = run.advance(player);
            if count < self.config.min_consecutive_frames {
                continue;
            }

            if count == self.config.min_consecutive_frames {
                debug!(player, frame, run = count, "possession confirmed");
            }

            possession[frame] = Some(player);

            // Backfill the unconfirmed prefix of this run. Frames already
            // assigned by an earlier run are left untouched.
            let start = (frame + 1).saturating_sub(count as usize);
            for slot in possession[start..frame].iter_mut() {
                if slot.is_none() {
                    *slot = Some(player);
                }
            }
        }

        possession
    }

    /// Pick the frame's best possession candidate, if any.
    ///
    /// Players whose containment ratio exceeds the threshold form a
    /// high-containment group scored by containment (higher wins); everyone
    /// else is scored by minimum anchor distance (lower wins). The
    /// high-containment group takes strict priority, and a distance-scored
    /// winner is only accepted under `max_assignment_distance`. Ties break
    /// toward the lowest track-id on both tiers.
    fn best_candidate(&self, players: &PlayerBoxes, ball_box: &BoundingBox) -> Option<TrackId> {
        let ball_center = ball_box.center();

        let mut best_contained: Option<(TrackId, f64)> = None;
        let mut best_near: Option<(TrackId, f64)> = None;

        for (&player, player_box) in players {
            let containment = player_box.containment_ratio(ball_box);

            if containment > self.config.containment_threshold {
                if best_contained.map_or(true, |(_, best)| containment > best) {
                    best_contained = Some((player, containment));
                }
            } else {
                let dist = min_distance_to_ball(&ball_center, player_box);
                if best_near.map_or(true, |(_, best)| dist < best) {
                    best_near = Some((player, dist));
                }
            }
        }

        if let Some((player, _)) = best_contained {
            return Some(player);
        }

        match best_near {
            Some((player, dist)) if dist < self.config.max_assignment_distance => Some(player),
            _ => None,
        }
    }
}

/// Consecutive-candidate counters for a single resolver run.
#[derive(Debug, Default)]
struct RunState {
    counts: BTreeMap<TrackId, u32>,
}

impl RunState {
    /// Record `candidate` as this frame's winner and return its run length.
    ///
    /// Every other player's count drops to zero: only an unbroken run of
    /// frames can reach the confirmation threshold.
    fn advance(&mut self, candidate: TrackId) -> u32 {
        for (&player, count) in self.counts.iter_mut() {
            if player != candidate {
                *count = 0;
            }
        }
        let count = self.counts.entry(candidate).or_insert(0);
        *count += 1;
        *count
    }

    fn reset(&mut self) {
        self.counts.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_frame(entries: &[(TrackId, BoundingBox)]) -> PlayerBoxes {
        entries.iter().copied().collect()
    }

    /// A player box whose center-right edge sits `gap` pixels left of `x`.
    fn player_left_of(x: f64, gap: f64) -> BoundingBox {
        BoundingBox::new(x - gap - 40.0, 0.0, x - gap, 100.0)
    }

    fn small_ball(cx: f64, cy: f64) -> BoundingBox {
        BoundingBox::new(cx - 5.0, cy - 5.0, cx + 5.0, cy + 5.0)
    }

    #[test]
    fn test_config_validation() {
        let mut config = PossessionConfig::default();
        config.containment_threshold = 1.5;
        assert!(PossessionResolver::new(config).is_err());

        let mut config = PossessionConfig::default();
        config.max_assignment_distance = 0.0;
        assert!(PossessionResolver::new(config).is_err());

        let mut config = PossessionConfig::default();
        config.min_consecutive_frames = 0;
        assert!(PossessionResolver::new(config).is_err());

        assert!(PossessionResolver::new(PossessionConfig::default()).is_ok());
    }

    #[test]
    fn test_best_candidate_prefers_containment_over_distance() {
        let resolver = PossessionResolver::with_defaults();
        let ball = small_ball(50.0, 50.0);

        // Player 3 fully contains the ball; player 1 is nearer to the ball
        // center than player 3's box anchors but only distance-scored.
        let players = player_frame(&[
            (1, BoundingBox::new(48.0, 56.0, 80.0, 120.0)),
            (3, BoundingBox::new(20.0, 20.0, 90.0, 130.0)),
        ]);

        assert_eq!(resolver.best_candidate(&players, &ball), Some(3));
    }

    #[test]
    fn test_best_candidate_distance_tier_respects_threshold() {
        let resolver = PossessionResolver::with_defaults();
        let ball = small_ball(500.0, 50.0);

        // 30 px away: accepted.
        let players = player_frame(&[(7, player_left_of(500.0, 30.0))]);
        assert_eq!(resolver.best_candidate(&players, &ball), Some(7));

        // 80 px away: too far for the distance tier.
        let players = player_frame(&[(7, player_left_of(500.0, 80.0))]);
        assert_eq!(resolver.best_candidate(&players, &ball), None);
    }

    #[test]
    fn test_best_candidate_distance_ties_break_low_id() {
        let resolver = PossessionResolver::with_defaults();
        let ball = small_ball(500.0, 50.0);

        // Two players at the identical distance from the ball.
        let players = player_frame(&[
            (9, player_left_of(500.0, 20.0)),
            (4, player_left_of(500.0, 20.0)),
        ]);

        assert_eq!(resolver.best_candidate(&players, &ball), Some(4));
    }

    #[test]
    fn test_best_candidate_containment_ties_break_low_id() {
        let resolver = PossessionResolver::with_defaults();
        let ball = small_ball(50.0, 50.0);

        // Both players fully contain the ball (ratio 1.0 each).
        let players = player_frame(&[
            (8, BoundingBox::new(10.0, 10.0, 90.0, 130.0)),
            (2, BoundingBox::new(0.0, 0.0, 100.0, 140.0)),
        ]);

        assert_eq!(resolver.best_candidate(&players, &ball), Some(2));
    }

    #[test]
    fn test_best_candidate_empty_frame() {
        let resolver = PossessionResolver::with_defaults();
        let ball = small_ball(50.0, 50.0);

        assert_eq!(resolver.best_candidate(&PlayerBoxes::new(), &ball), None);
    }

    #[test]
    fn test_resolve_confirms_and_backfills_run() {
        let resolver = PossessionResolver::with_defaults();

        // 11 frames; the ball sits inside player 7's box on frames 1..=9.
        let holder = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let ball = small_ball(50.0, 100.0);

        let player_tracks: Vec<PlayerBoxes> =
            (0..11).map(|_| player_frame(&[(7, holder)])).collect();
        let ball_tracks: Vec<Option<BoundingBox>> = (0..11)
            .map(|frame| (1..=9).contains(&frame).then_some(ball))
            .collect();

        let possession = resolver.resolve(&player_tracks, &ball_tracks);

        let expected: Vec<Option<TrackId>> = (0..11)
            .map(|frame| (1..=9).contains(&frame).then_some(7))
            .collect();
        assert_eq!(possession, expected);
    }

    #[test]
    fn test_resolve_below_threshold_never_confirms() {
        let resolver = PossessionResolver::with_defaults();

        let holder = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let ball = small_ball(50.0, 100.0);

        // Only 8 candidate frames: one short of the confirmation window.
        let player_tracks: Vec<PlayerBoxes> =
            (0..8).map(|_| player_frame(&[(7, holder)])).collect();
        let ball_tracks = vec![Some(ball); 8];

        let possession = resolver.resolve(&player_tracks, &ball_tracks);
        assert!(possession.iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn test_resolve_no_ball_resets_run() {
        let resolver = PossessionResolver::with_defaults();

        let holder = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let ball = small_ball(50.0, 100.0);

        // 8 candidate frames, a ball dropout, 8 more: neither run confirms.
        let player_tracks: Vec<PlayerBoxes> =
            (0..17).map(|_| player_frame(&[(7, holder)])).collect();
        let mut ball_tracks = vec![Some(ball); 17];
        ball_tracks[8] = None;

        let possession = resolver.resolve(&player_tracks, &ball_tracks);
        assert!(possession.iter().all(|slot| slot.is_none()));
    }

    #[test]
    fn test_resolve_candidate_change_restarts_count() {
        let resolver = PossessionResolver::with_defaults();

        let left = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let right = BoundingBox::new(300.0, 0.0, 400.0, 200.0);
        let ball_left = small_ball(50.0, 100.0);
        let ball_right = small_ball(350.0, 100.0);

        // Ball with player 1 for 5 frames, then with player 2 for 9.
        let player_tracks: Vec<PlayerBoxes> = (0..14)
            .map(|_| player_frame(&[(1, left), (2, right)]))
            .collect();
        let ball_tracks: Vec<Option<BoundingBox>> = (0..14)
            .map(|frame| Some(if frame < 5 { ball_left } else { ball_right }))
            .collect();

        let possession = resolver.resolve(&player_tracks, &ball_tracks);

        // Player 1 never reaches the window; player 2 confirms at frame 13
        // and backfills exactly its own run.
        let expected: Vec<Option<TrackId>> =
            (0..14).map(|frame| (frame >= 5).then_some(2)).collect();
        assert_eq!(possession, expected);
    }

    #[test]
    fn test_resolve_backfill_preserves_prior_run() {
        let mut config = PossessionConfig::default();
        config.min_consecutive_frames = 2;
        let resolver = PossessionResolver::new(config).unwrap();

        let left = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let right = BoundingBox::new(300.0, 0.0, 400.0, 200.0);
        let ball_left = small_ball(50.0, 100.0);
        let ball_right = small_ball(350.0, 100.0);

        let player_tracks: Vec<PlayerBoxes> = (0..6)
            .map(|_| player_frame(&[(1, left), (2, right)]))
            .collect();
        let ball_tracks = vec![
            Some(ball_left),
            Some(ball_left),
            Some(ball_left),
            Some(ball_right),
            Some(ball_right),
            Some(ball_right),
        ];

        let possession = resolver.resolve(&player_tracks, &ball_tracks);

        // Frames 0..=2 belong to player 1's confirmed run and must not be
        // overwritten when player 2's run confirms.
        assert_eq!(
            possession,
            vec![Some(1), Some(1), Some(1), Some(2), Some(2), Some(2)]
        );
    }

    #[test]
    fn test_resolve_empty_inputs() {
        let resolver = PossessionResolver::with_defaults();
        assert!(resolver.resolve(&[], &[]).is_empty());
    }

    #[test]
    fn test_resolve_missing_player_frames() {
        let resolver = PossessionResolver::with_defaults();

        // Ball stream longer than the player stream: the tail frames are
        // treated as having no players on court.
        let ball_tracks = vec![Some(small_ball(50.0, 50.0)); 4];
        let possession = resolver.resolve(&[], &ball_tracks);

        assert_eq!(possession, vec![None; 4]);
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let resolver = PossessionResolver::with_defaults();

        let holder = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
        let ball = small_ball(50.0, 100.0);
        let player_tracks: Vec<PlayerBoxes> = (0..20)
            .map(|_| player_frame(&[(7, holder), (9, holder)]))
            .collect();
        let ball_tracks = vec![Some(ball); 20];

        let first = resolver.resolve(&player_tracks, &ball_tracks);
        let second = resolver.resolve(&player_tracks, &ball_tracks);
        assert_eq!(first, second);
    }
}
