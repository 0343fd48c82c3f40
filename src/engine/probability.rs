//! Informed/uninformed approval probabilities and the transitive top-note search.

use std::collections::HashMap;

use crate::graph::post_order;
use crate::index::TallyIndex;
use crate::store::TreeShape;
use crate::types::{Effect, PostId, ScoreResult, Tally};

use super::bayes::BayesianEstimate;

/// The reply that most shifts approval of a post, with the resulting probabilities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TopNote {
    pub post_id: PostId,
    /// `None` when no reply has informed votes on this post.
    pub note_id: Option<PostId>,
    /// Informed approval probability (support-adjusted).
    pub p: f64,
    /// Uninformed approval probability.
    pub q: f64,
}

impl TopNote {
    /// `p / q`, the factor by which the top note scales approval. 1.0 without a note.
    pub fn support(&self) -> f64 {
        if self.note_id.is_none() || self.q <= 0.0 {
            1.0
        } else {
            self.p / self.q
        }
    }

    /// `p - q`.
    pub fn delta(&self) -> f64 {
        self.p - self.q
    }
}

/// Posteriors for votes by voters who were (p) and were not (q) shown a note.
///
/// The informed posterior is built on top of the uninformed one rather than from
/// merged tallies: update order determines pseudo-count accounting.
pub fn informed_estimates(
    prior: BayesianEstimate,
    shown: Tally,
    not_shown: Tally,
) -> (BayesianEstimate, BayesianEstimate) {
    let q_estimate = prior.update(not_shown);
    let p_estimate = q_estimate.update(shown);
    (p_estimate, q_estimate)
}

/// A post's probability when it has no candidate notes: `(q, q)` from all its votes.
pub fn unconditional(prior: BayesianEstimate, tallies: &TallyIndex, post_id: PostId) -> TopNote {
    let q = prior.update(tallies.overall(post_id)).average;
    TopNote {
        post_id,
        note_id: None,
        p: q,
        q,
    }
}

/// Effect of `note_id` on `target_id`, given the note's own top-note result.
pub fn note_effect(
    prior: BayesianEstimate,
    tallies: &TallyIndex,
    target_id: PostId,
    note_id: PostId,
    note_top: &TopNote,
) -> Effect {
    let (shown, not_shown) = tallies.exposure_split(target_id, note_id);
    let (p_estimate, q_estimate) = informed_estimates(prior, shown, not_shown);
    let q = q_estimate.average;
    let r = note_top.support();
    let p = (q + (p_estimate.average - q) * r).clamp(0.0, 1.0);

    Effect {
        target_id,
        source_id: note_id,
        p,
        p_count: shown.count,
        p_size: shown.total,
        q,
        q_count: not_shown.count,
        q_size: not_shown.total,
        r,
        weight: p_estimate.weight,
    }
}

/// Pick the top note of `post_id` among its direct replies.
///
/// `known` must already hold the results of those replies (post-order); missing
/// entries fall back to the reply's unconditional result. Ties keep the earlier reply.
pub fn top_note_for<T: TreeShape + ?Sized>(
    prior: BayesianEstimate,
    tree: &T,
    tallies: &TallyIndex,
    post_id: PostId,
    known: &HashMap<PostId, TopNote>,
) -> TopNote {
    let mut best: Option<Effect> = None;

    for &note_id in tree.direct_reply_ids(post_id) {
        if tallies.informed(post_id, note_id).is_empty() {
            continue;
        }
        let note_top = known
            .get(&note_id)
            .copied()
            .unwrap_or_else(|| unconditional(prior, tallies, note_id));
        let effect = note_effect(prior, tallies, post_id, note_id, &note_top);
        let magnitude = (effect.p - effect.q).abs();
        let better = match &best {
            Some(b) => magnitude > (b.p - b.q).abs(),
            None => true,
        };
        if better {
            best = Some(effect);
        }
    }

    match best {
        Some(effect) => TopNote {
            post_id,
            note_id: Some(effect.source_id),
            p: effect.p,
            q: effect.q,
        },
        None => unconditional(prior, tallies, post_id),
    }
}

/// Top notes for every post in the subtree at `root`, computed bottom-up.
pub fn top_notes<T: TreeShape + ?Sized>(
    prior: BayesianEstimate,
    tree: &T,
    tallies: &TallyIndex,
    root: PostId,
) -> ScoreResult<HashMap<PostId, TopNote>> {
    let mut results: HashMap<PostId, TopNote> = HashMap::new();
    for id in post_order(tree, root)? {
        let top = top_note_for(prior, tree, tallies, id, &results);
        results.insert(id, top);
    }
    Ok(results)
}
