//! # Courtside - possession and pass detection for tracked ball sports
//!
//! Courtside turns the per-frame output of an object-detection and tracking
//! pipeline (player bounding boxes keyed by stable track-ids, a single ball
//! bounding box, and per-player team labels) into higher-level event
//! streams: who possesses the ball on each frame, and the passes and
//! interceptions between teams.
//!
//! The crate is a pure in-process library: it performs no I/O, owns no
//! threads, and every output stream is a deterministic function of its
//! inputs. Detection, tracking, team classification, and rendering are the
//! caller's collaborators; this crate only consumes their output contracts.
//!
//! ## Pipeline
//!
//! - [`BallTrackCleaner`] (optional) rejects implausible ball detections and
//!   interpolates gaps.
//! - [`PossessionResolver`] scores every player against the ball each frame
//!   and confirms a possessor after a debounce window, backfilling the run.
//! - [`classify_events`] turns possession transfers into pass and
//!   interception streams; [`team_in_control`] derives the per-frame
//!   controlling team.
//! - [`EventTotals`] and [`ControlShare`] aggregate the streams for
//!   reporting.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use courtside::{classify_events, BoundingBox, PossessionResolver, Team};
//!
//! // Ten frames of player 7 holding the ball inside their box.
//! let player_box = BoundingBox::new(0.0, 0.0, 100.0, 200.0);
//! let ball_box = BoundingBox::new(45.0, 95.0, 55.0, 105.0);
//!
//! let player_tracks: Vec<_> = (0..10)
//!     .map(|_| BTreeMap::from([(7, player_box)]))
//!     .collect();
//! let ball_tracks: Vec<_> = (0..10).map(|_| Some(ball_box)).collect();
//!
//! let resolver = PossessionResolver::with_defaults();
//! let possession = resolver.resolve(&player_tracks, &ball_tracks);
//! assert_eq!(possession[0], Some(7));
//!
//! let assignments: Vec<_> = (0..10)
//!     .map(|_| BTreeMap::from([(7, Team::One)]))
//!     .collect();
//! let streams = classify_events(&possession, &assignments);
//! assert!(streams.passes.iter().all(|slot| slot.is_none()));
//! ```

pub mod ball_track;
pub mod bbox;
pub mod distances;
pub mod events;
pub mod frame;
pub mod possession;
pub mod stats;

// Re-exports for convenience
pub use ball_track::{BallTrackCleaner, BallTrackConfig};
pub use bbox::BoundingBox;
pub use events::{classify_events, team_in_control, EventStreams};
pub use frame::{PlayerBoxes, Team, TeamAssignments, TrackId};
pub use possession::{PossessionConfig, PossessionResolver};
pub use stats::{ControlShare, EventTotals, TeamTotals};

// Error types
pub use crate::error::{Error, Result};

mod error {
    use thiserror::Error;

    /// Errors that can occur in the courtside library.
    ///
    /// Malformed frame data never errors (it degrades to safe defaults),
    /// so the only fallible surface is configuration validation.
    #[derive(Error, Debug)]
    pub enum Error {
        #[error("Invalid configuration: {0}")]
        InvalidConfig(String),
    }

    /// Result type for courtside operations.
    pub type Result<T> = std::result::Result<T, Error>;
}
