//! Collaborator contracts: tree shape and effect persistence.

pub mod memory;

pub use memory::MemoryStore;

use std::collections::{HashSet, VecDeque};

use crate::types::{Effect, Post, PostId};

/// Read-only view of the reply tree owned by the persistence store.
pub trait TreeShape {
    /// Look up a post by ID.
    fn post(&self, post_id: PostId) -> Option<&Post>;

    /// Direct replies of a post, in insertion order.
    fn direct_reply_ids(&self, post_id: PostId) -> &[PostId];

    /// Parent of a post, `None` for top-level posts and unknown IDs.
    fn parent_id(&self, post_id: PostId) -> Option<PostId> {
        self.post(post_id).and_then(|p| p.parent_id)
    }

    /// All replies below a post, breadth-first, excluding the post itself.
    fn transitive_descendant_ids(&self, post_id: PostId) -> Vec<PostId> {
        let mut result = Vec::new();
        let mut seen: HashSet<PostId> = HashSet::new();
        let mut queue: VecDeque<PostId> = VecDeque::new();
        seen.insert(post_id);
        queue.push_back(post_id);
        while let Some(current) = queue.pop_front() {
            for &child in self.direct_reply_ids(current) {
                if seen.insert(child) {
                    result.push(child);
                    queue.push_back(child);
                }
            }
        }
        result
    }
}

/// Durable storage of computed effect records, keyed by (target, reply).
pub trait EffectStore {
    /// The stored effect of `source_id` on `target_id`, if one has been computed.
    fn effect(&self, target_id: PostId, source_id: PostId) -> Option<&Effect>;

    /// Save (or replace) an effect record under its own (target, source) key.
    fn save_effect(&mut self, effect: Effect);

    /// All effects recorded against a target.
    fn effects_on(&self, target_id: PostId) -> Vec<&Effect>;
}
