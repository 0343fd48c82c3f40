//! All data types for the discourse-score library.

pub mod effect;
pub mod error;
pub mod location;
pub mod post;
pub mod tally;
pub mod vote;

pub use effect::Effect;
pub use error::{ScoreError, ScoreResult};
pub use location::{Location, LocationStats, LocationType};
pub use post::{Post, PostId};
pub use tally::Tally;
pub use vote::{Direction, Placement, VoteEvent, VoterId};

/// Default mean of the global approval prior.
pub const DEFAULT_PRIOR_AVERAGE: f64 = 0.875;

/// Default pseudo-count of the global approval prior.
pub const DEFAULT_PRIOR_WEIGHT: f64 = 2.3;

/// Default EWMA smoothing constant for attention calibration (~10,000-vote window).
pub const DEFAULT_ALPHA: f64 = 0.9999;

/// Returns the current time as Unix epoch microseconds.
pub fn now_micros() -> u64 {
    chrono::Utc::now().timestamp_micros() as u64
}
