//! Ball track cleanup between the upstream tracker and possession
//! resolution.
//!
//! Single-ball detectors misfire in two characteristic ways: a spurious
//! detection far from the real ball, and short runs of missed frames. The
//! cleaner drops detections that jump farther than a per-frame budget allows,
//! then fills the resulting gaps by linear interpolation between the
//! surrounding detections.

use nalgebra::distance;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{BoundingBox, Error, Result};

/// Configuration for ball track cleanup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallTrackConfig {
    /// Maximum plausible ball movement per frame, in pixels. A detection
    /// farther than `max_jump_per_frame * frame_gap` from the last accepted
    /// detection is rejected.
    pub max_jump_per_frame: f64,
}

impl Default for BallTrackConfig {
    fn default() -> Self {
        Self {
            max_jump_per_frame: 15.0,
        }
    }
}

/// Rejects implausible ball detections and interpolates the gaps they leave.
pub struct BallTrackCleaner {
    config: BallTrackConfig,
}

impl BallTrackCleaner {
    /// Create a cleaner, validating the configuration.
    pub fn new(config: BallTrackConfig) -> Result<Self> {
        if config.max_jump_per_frame <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "max_jump_per_frame must be positive, got {}",
                config.max_jump_per_frame
            )));
        }
        Ok(Self { config })
    }

    /// Create a cleaner with the default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: BallTrackConfig::default(),
        }
    }

    /// Reject outliers, then interpolate the gaps.
    pub fn clean(&self, track: &[Option<BoundingBox>]) -> Vec<Option<BoundingBox>> {
        self.interpolate_gaps(&self.reject_outliers(track))
    }

    /// Drop detections that jump implausibly far from the last accepted one.
    ///
    /// The movement budget scales with the gap since the last accepted
    /// detection, so a ball reappearing after missed frames is allowed a
    /// proportionally longer jump. Distances are measured between top-left
    /// corners. The first detection in the track is always accepted.
    pub fn reject_outliers(&self, track: &[Option<BoundingBox>]) -> Vec<Option<BoundingBox>> {
        let mut out = track.to_vec();
        let mut last_accepted: Option<usize> = None;
        let mut rejected = 0usize;

        for frame in 0..out.len() {
            let Some(current) = out[frame] else {
                continue;
            };

            let Some(anchor_frame) = last_accepted else {
                last_accepted = Some(frame);
                continue;
            };

            // `anchor_frame` always holds a detection; it is only ever set
            // from an accepted frame.
            let Some(anchor) = out[anchor_frame] else {
                continue;
            };

            let frame_gap = (frame - anchor_frame) as f64;
            let allowed = self.config.max_jump_per_frame * frame_gap;

            if distance(&anchor.top_left(), &current.top_left()) > allowed {
                out[frame] = None;
                rejected += 1;
            } else {
                last_accepted = Some(frame);
            }
        }

        if rejected > 0 {
            debug!(rejected, "dropped implausible ball detections");
        }
        out
    }

    /// Fill undetected frames from their detected neighbors.
    ///
    /// Frames between two detections get the coordinate-wise linear
    /// interpolation of the surrounding boxes. Frames before the first
    /// detection copy the first detection; frames after the last detection
    /// hold the last one. A track with no detections is returned unchanged.
    pub fn interpolate_gaps(&self, track: &[Option<BoundingBox>]) -> Vec<Option<BoundingBox>> {
        let mut out = track.to_vec();

        let Some(first) = out.iter().position(|slot| slot.is_some()) else {
            return out;
        };

        for frame in 0..first {
            out[frame] = out[first];
        }

        let mut prev = first;
        for frame in first + 1..out.len() {
            if out[frame].is_none() {
                continue;
            }
            if frame > prev + 1 {
                if let (Some(from), Some(to)) = (out[prev], out[frame]) {
                    let span = (frame - prev) as f64;
                    for gap_frame in prev + 1..frame {
                        let t = (gap_frame - prev) as f64 / span;
                        out[gap_frame] = Some(lerp_box(&from, &to, t));
                    }
                }
            }
            prev = frame;
        }

        for frame in prev + 1..out.len() {
            out[frame] = out[prev];
        }

        out
    }
}

fn lerp_box(from: &BoundingBox, to: &BoundingBox, t: f64) -> BoundingBox {
    BoundingBox::new(
        lerp(from.x1, to.x1, t),
        lerp(from.y1, to.y1, t),
        lerp(from.x2, to.x2, t),
        lerp(from.y2, to.y2, t),
    )
}

fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}
