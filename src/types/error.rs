//! Error types for the discourse-score library.

use thiserror::Error;

/// All errors that can occur in the discourse-score library.
#[derive(Error, Debug)]
pub enum ScoreError {
    /// Post not found by ID.
    #[error("Post ID {0} not found")]
    PostNotFound(u64),

    /// A post with this ID already exists.
    #[error("Post ID {0} already exists")]
    DuplicatePost(u64),

    /// A reply references a parent that does not exist.
    #[error("Parent post {parent_id} of post {post_id} not found")]
    ParentNotFound { post_id: u64, parent_id: u64 },

    /// A top-level post was used where a reply is required.
    #[error("Post {0} is not a reply")]
    NotAReply(u64),

    /// Tally with more successes than trials.
    #[error("Invalid tally: count {count} exceeds total {total}")]
    InvalidTally { count: u64, total: u64 },

    /// Probability value outside [0.0, 1.0].
    #[error("Probability out of range [0.0, 1.0]: {0}")]
    InvalidProbability(f64),

    /// An effect record does not belong to the (target, reply) pair it was fetched for.
    #[error(
        "Inconsistent effect: expected target {expected_target} / reply {expected_source}, \
         found target {found_target} / reply {found_source}"
    )]
    InconsistentEffect {
        expected_target: u64,
        expected_source: u64,
        found_target: u64,
        found_source: u64,
    },

    /// A vote names a note that is not a reply inside the target's subtree.
    #[error("Note {note_id} is not in the reply tree of post {target_id}")]
    NoteNotInSubtree { target_id: u64, note_id: u64 },

    /// A vote arrived with a timestamp older than the latest applied vote on that post.
    #[error("Vote on post {post_id} at {timestamp} is older than latest applied vote at {latest}")]
    OutOfOrderVote {
        post_id: u64,
        timestamp: u64,
        latest: u64,
    },

    /// Location ranks are one-based.
    #[error("Location rank must be >= 1, got {0}")]
    InvalidRank(u32),

    /// Configuration value rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot could not be parsed or written.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration file could not be parsed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Convenience result type for discourse-score operations.
pub type ScoreResult<T> = Result<T, ScoreError>;
