//! Fluent API for building DiscussionTree instances.

use crate::types::{Post, PostId, ScoreResult};

use super::DiscussionTree;

/// Fluent builder for constructing a DiscussionTree.
pub struct TreeBuilder {
    posts: Vec<Post>,
    next_timestamp: u64,
}

impl TreeBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            posts: Vec::new(),
            next_timestamp: 1,
        }
    }

    fn push(&mut self, post: Post) -> &mut Self {
        let ts = self.next_timestamp;
        self.next_timestamp += 1;
        self.posts.push(post.created_at(ts));
        self
    }

    /// Add a top-level post.
    pub fn post(&mut self, id: PostId) -> &mut Self {
        self.push(Post::new(id))
    }

    /// Add a reply to `parent_id`.
    pub fn reply(&mut self, id: PostId, parent_id: PostId) -> &mut Self {
        self.push(Post::reply(id, parent_id))
    }

    /// Add a reply to `parent_id` with a quality score.
    pub fn scored_reply(&mut self, id: PostId, parent_id: PostId, score: f64) -> &mut Self {
        self.push(Post::reply(id, parent_id).with_score(score))
    }

    /// Add a linear chain of replies under `parent_id`, each replying to the previous one.
    pub fn chain(&mut self, parent_id: PostId, ids: &[PostId]) -> &mut Self {
        let mut parent = parent_id;
        for &id in ids {
            self.reply(id, parent);
            parent = id;
        }
        self
    }

    /// Set the score of an already-added post.
    pub fn score(&mut self, id: PostId, score: f64) -> &mut Self {
        if let Some(post) = self.posts.iter_mut().find(|p| p.id == id) {
            post.score = score;
        }
        self
    }

    /// Build the final DiscussionTree.
    pub fn build(&mut self) -> ScoreResult<DiscussionTree> {
        DiscussionTree::from_parts(std::mem::take(&mut self.posts))
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}
