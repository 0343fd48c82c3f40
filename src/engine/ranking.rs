//! Reply-tree ranking and critical-thread detection.
//!
//! Each reply at any depth is ranked by its effect on the root of the ranking call.
//! The tree is built in a single bottom-up fold over a post-order traversal.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::post_order;
use crate::store::{EffectStore, TreeShape};
use crate::types::{Post, PostId, ScoreError, ScoreResult};

use super::entropy::effect_size_on_target;

/// One post in a ranked reply tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedNode {
    pub post_id: PostId,
    pub score: f64,
    pub deleted: bool,
    /// Effect of this reply on the root of the ranking call (0 for the root itself).
    pub effect_size: f64,
    /// First child, when that child's effect size is non-zero.
    pub critical_thread_id: Option<PostId>,
    pub children: Vec<RankedNode>,
}

impl RankedNode {
    fn leaf(post: &Post, effect_size: f64) -> Self {
        Self {
            post_id: post.id,
            score: post.score,
            deleted: post.deleted,
            effect_size,
            critical_thread_id: None,
            children: Vec::new(),
        }
    }

    /// IDs of direct children, in ranked order.
    pub fn child_ids(&self) -> Vec<PostId> {
        self.children.iter().map(|c| c.post_id).collect()
    }

    /// Number of nodes in this subtree, including itself.
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Always false: a ranked tree contains at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Find a node by post ID.
    pub fn find(&self, post_id: PostId) -> Option<&RankedNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.post_id == post_id {
                return Some(node);
            }
            stack.extend(node.children.iter());
        }
        None
    }

    /// Find a node by post ID (mutable).
    pub fn find_mut(&mut self, post_id: PostId) -> Option<&mut RankedNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.post_id == post_id {
                return Some(node);
            }
            stack.extend(node.children.iter_mut());
        }
        None
    }

    /// Insert a freshly submitted reply at the front of its parent's children.
    ///
    /// Siblings are not re-sorted; the next full ranking puts it in place.
    pub fn insert_reply(&mut self, post: &Post) -> ScoreResult<()> {
        let parent_id = post.parent_id.ok_or(ScoreError::NotAReply(post.id))?;
        if self.find(post.id).is_some() {
            return Err(ScoreError::DuplicatePost(post.id));
        }
        let parent = self
            .find_mut(parent_id)
            .ok_or(ScoreError::PostNotFound(parent_id))?;
        parent.children.insert(0, RankedNode::leaf(post, 0.0));
        Ok(())
    }

    /// The chain of critical replies starting below this node.
    pub fn critical_thread(&self) -> Vec<PostId> {
        let mut chain = Vec::new();
        let mut current = self;
        while let Some(next_id) = current.critical_thread_id {
            match current.children.iter().find(|c| c.post_id == next_id) {
                Some(next) => {
                    chain.push(next_id);
                    current = next;
                }
                None => break,
            }
        }
        chain
    }
}

/// Effect size of `reply_id` on `target_id`, checking that the stored record
/// belongs to that pair.
pub fn checked_effect_size<E: EffectStore + ?Sized>(
    effects: &E,
    target_id: PostId,
    reply_id: PostId,
) -> ScoreResult<f64> {
    let effect = effects.effect(target_id, reply_id);
    if let Some(e) = effect {
        if e.target_id != target_id || e.source_id != reply_id {
            return Err(ScoreError::InconsistentEffect {
                expected_target: target_id,
                expected_source: reply_id,
                found_target: e.target_id,
                found_source: e.source_id,
            });
        }
    }
    Ok(effect_size_on_target(effect))
}

/// Rank the reply tree under `root_id`.
///
/// Siblings are ordered by descending effect size on `root_id`, then descending
/// score, then insertion order. Fails on the first inconsistent effect record.
pub fn rank_reply_tree<T, E>(tree: &T, effects: &E, root_id: PostId) -> ScoreResult<RankedNode>
where
    T: TreeShape + ?Sized,
    E: EffectStore + ?Sized,
{
    fold_tree(tree, root_id, true, |reply_id| {
        checked_effect_size(effects, root_id, reply_id)
    })
}

/// The reply tree under `root_id` in insertion order, with no effects and no
/// critical threads. Served when no ranking is available.
pub fn unranked_reply_tree<T: TreeShape + ?Sized>(
    tree: &T,
    root_id: PostId,
) -> ScoreResult<RankedNode> {
    fold_tree(tree, root_id, false, |_| Ok(0.0))
}

fn fold_tree<T, F>(tree: &T, root_id: PostId, rank: bool, mut effect_size: F) -> ScoreResult<RankedNode>
where
    T: TreeShape + ?Sized,
    F: FnMut(PostId) -> ScoreResult<f64>,
{
    let mut built: HashMap<PostId, RankedNode> = HashMap::new();

    for id in post_order(tree, root_id)? {
        let post = tree.post(id).ok_or(ScoreError::PostNotFound(id))?;
        let size = if id == root_id { 0.0 } else { effect_size(id)? };

        let mut children: Vec<RankedNode> = tree
            .direct_reply_ids(id)
            .iter()
            .filter_map(|child| built.remove(child))
            .collect();

        let mut critical_thread_id = None;
        if rank {
            // Stable sort: equal (effect, score) keeps insertion order.
            children.sort_by(|a, b| {
                b.effect_size
                    .total_cmp(&a.effect_size)
                    .then_with(|| b.score.total_cmp(&a.score))
            });
            critical_thread_id = children
                .first()
                .filter(|c| c.effect_size > 0.0)
                .map(|c| c.post_id);
        }

        let mut node = RankedNode::leaf(post, size);
        node.children = children;
        node.critical_thread_id = critical_thread_id;
        built.insert(id, node);
    }

    built
        .remove(&root_id)
        .ok_or(ScoreError::PostNotFound(root_id))
}
