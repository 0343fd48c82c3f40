//! Iterative tree traversals. No recursion, so deep threads cannot overflow the stack.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::store::TreeShape;
use crate::types::{PostId, ScoreError, ScoreResult};

/// Post-order over the subtree rooted at `root`: every reply precedes its parent,
/// and siblings keep their insertion order.
pub fn post_order<T: TreeShape + ?Sized>(tree: &T, root: PostId) -> ScoreResult<Vec<PostId>> {
    if tree.post(root).is_none() {
        return Err(ScoreError::PostNotFound(root));
    }

    let mut order = Vec::new();
    // (post, children already expanded)
    let mut stack: Vec<(PostId, bool)> = vec![(root, false)];
    while let Some((id, expanded)) = stack.pop() {
        if expanded {
            order.push(id);
            continue;
        }
        stack.push((id, true));
        for &child in tree.direct_reply_ids(id).iter().rev() {
            stack.push((child, false));
        }
    }
    Ok(order)
}

/// BFS below `start_id`, up to `max_depth` levels. Returns visited reply IDs in
/// BFS order and the depth of each (direct replies have depth 1).
pub fn bfs_descendants<T: TreeShape + ?Sized>(
    tree: &T,
    start_id: PostId,
    max_depth: u32,
) -> ScoreResult<(Vec<PostId>, HashMap<PostId, u32>)> {
    if tree.post(start_id).is_none() {
        return Err(ScoreError::PostNotFound(start_id));
    }

    let mut visited_order = Vec::new();
    let mut depths: HashMap<PostId, u32> = HashMap::new();
    let mut queue: VecDeque<(PostId, u32)> = VecDeque::new();
    queue.push_back((start_id, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        for &child in tree.direct_reply_ids(current) {
            if depths.contains_key(&child) {
                continue;
            }
            depths.insert(child, depth + 1);
            visited_order.push(child);
            queue.push_back((child, depth + 1));
        }
    }

    Ok((visited_order, depths))
}

/// Ancestors of a post, nearest first, ending at its top-level post.
pub fn ancestors<T: TreeShape + ?Sized>(tree: &T, id: PostId) -> Vec<PostId> {
    let mut chain = Vec::new();
    let mut seen: HashSet<PostId> = HashSet::new();
    seen.insert(id);
    let mut current = tree.parent_id(id);
    while let Some(parent) = current {
        if !seen.insert(parent) {
            break;
        }
        chain.push(parent);
        current = tree.parent_id(parent);
    }
    chain
}

/// Whether `id` lies strictly below `ancestor_id`.
pub fn is_descendant<T: TreeShape + ?Sized>(tree: &T, ancestor_id: PostId, id: PostId) -> bool {
    ancestors(tree, id).contains(&ancestor_id)
}
