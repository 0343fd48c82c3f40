//! Posts and replies ("notes") as seen by the scoring engine.

use serde::{Deserialize, Serialize};

use super::now_micros;

/// Opaque post identifier.
pub type PostId = u64;

/// A post or a reply. The engine reads identity and tree shape only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Unique identifier.
    pub id: PostId,
    /// Parent post, `None` for a top-level post.
    #[serde(default)]
    pub parent_id: Option<PostId>,
    /// Creation time (Unix epoch microseconds).
    #[serde(default)]
    pub created_at: u64,
    /// Soft-delete flag.
    #[serde(default)]
    pub deleted: bool,
    /// Independently maintained quality score, used as the ranking tie-break.
    #[serde(default)]
    pub score: f64,
}

impl Post {
    /// A top-level post created now.
    pub fn new(id: PostId) -> Self {
        Self {
            id,
            parent_id: None,
            created_at: now_micros(),
            deleted: false,
            score: 0.0,
        }
    }

    /// A reply to `parent_id` created now.
    pub fn reply(id: PostId, parent_id: PostId) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::new(id)
        }
    }

    /// Set the quality score.
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    /// Set the creation timestamp.
    pub fn created_at(mut self, ts: u64) -> Self {
        self.created_at = ts;
        self
    }

    /// Mark the post as soft-deleted.
    pub fn deleted(mut self) -> Self {
        self.deleted = true;
        self
    }

    /// Whether this post has no parent.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}
