//! Core tree structure: posts with parent/child adjacency.

use std::collections::HashMap;

use crate::store::TreeShape;
use crate::types::{Post, PostId, ScoreError, ScoreResult};

/// In-memory reply forest. Each root is a top-level post.
#[derive(Debug, Clone, Default)]
pub struct DiscussionTree {
    /// All posts, in insertion order.
    posts: Vec<Post>,
    /// post_id -> index into `posts`.
    index: HashMap<PostId, usize>,
    /// parent_id -> direct reply IDs in insertion order.
    children: HashMap<PostId, Vec<PostId>>,
    /// Top-level post IDs in insertion order.
    roots: Vec<PostId>,
}

impl DiscussionTree {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from pre-existing posts (used by the snapshot reader).
    ///
    /// Posts may arrive in any order; each is inserted once its parent is present.
    pub fn from_parts(posts: Vec<Post>) -> ScoreResult<Self> {
        let mut tree = Self::new();
        let mut pending = posts;

        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for post in pending {
                match post.parent_id {
                    Some(parent) if !tree.contains(parent) => deferred.push(post),
                    _ => {
                        tree.add_post(post)?;
                    }
                }
            }
            if deferred.len() == before {
                // No progress: some parent is missing entirely.
                let orphan = &deferred[0];
                return Err(ScoreError::ParentNotFound {
                    post_id: orphan.id,
                    parent_id: orphan.parent_id.unwrap_or_default(),
                });
            }
            pending = deferred;
        }

        Ok(tree)
    }

    /// Number of posts.
    pub fn post_count(&self) -> usize {
        self.posts.len()
    }

    /// Whether a post exists.
    pub fn contains(&self, id: PostId) -> bool {
        self.index.contains_key(&id)
    }

    /// Get a post by ID (immutable).
    pub fn get_post(&self, id: PostId) -> Option<&Post> {
        self.index.get(&id).map(|&idx| &self.posts[idx])
    }

    /// Get a post by ID (mutable).
    pub fn get_post_mut(&mut self, id: PostId) -> Option<&mut Post> {
        match self.index.get(&id) {
            Some(&idx) => Some(&mut self.posts[idx]),
            None => None,
        }
    }

    /// All posts in insertion order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Top-level post IDs in insertion order.
    pub fn roots(&self) -> &[PostId] {
        &self.roots
    }

    /// Add a post. Its parent, if any, must already exist.
    pub fn add_post(&mut self, post: Post) -> ScoreResult<PostId> {
        if self.contains(post.id) {
            return Err(ScoreError::DuplicatePost(post.id));
        }
        let id = post.id;
        match post.parent_id {
            Some(parent_id) => {
                if parent_id == id || !self.contains(parent_id) {
                    return Err(ScoreError::ParentNotFound {
                        post_id: id,
                        parent_id,
                    });
                }
                self.children.entry(parent_id).or_default().push(id);
            }
            None => self.roots.push(id),
        }
        self.index.insert(id, self.posts.len());
        self.posts.push(post);
        Ok(id)
    }

    /// Update the externally maintained quality score of a post.
    pub fn set_score(&mut self, id: PostId, score: f64) -> ScoreResult<()> {
        let post = self.get_post_mut(id).ok_or(ScoreError::PostNotFound(id))?;
        post.score = score;
        Ok(())
    }

    /// Soft-delete a post. It keeps its place in the tree.
    pub fn mark_deleted(&mut self, id: PostId) -> ScoreResult<()> {
        let post = self.get_post_mut(id).ok_or(ScoreError::PostNotFound(id))?;
        post.deleted = true;
        Ok(())
    }

    /// The top-level post a post belongs to.
    pub fn root_of(&self, id: PostId) -> ScoreResult<PostId> {
        let mut current = self.get_post(id).ok_or(ScoreError::PostNotFound(id))?;
        while let Some(parent) = current.parent_id {
            current = self
                .get_post(parent)
                .ok_or(ScoreError::PostNotFound(parent))?;
        }
        Ok(current.id)
    }
}

impl TreeShape for DiscussionTree {
    fn post(&self, post_id: PostId) -> Option<&Post> {
        self.get_post(post_id)
    }

    fn direct_reply_ids(&self, post_id: PostId) -> &[PostId] {
        self.children
            .get(&post_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
