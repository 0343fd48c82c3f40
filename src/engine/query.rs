//! Read-side scoring queries.

use log::error;

use crate::config::EngineConfig;
use crate::store::{EffectStore, TreeShape};
use crate::types::{Effect, Location, PostId, ScoreError, ScoreResult};

use super::attention::vote_rate;
use super::bayes::BayesianEstimate;
use super::probability::{top_notes, TopNote};
use super::ranking::{checked_effect_size, rank_reply_tree, unranked_reply_tree, RankedNode};
use super::state::ScoreState;

/// The score engine answers ranking, probability and attention queries.
///
/// Every query is a pure read of committed state; calling it twice with no
/// intervening writes gives identical results.
pub struct ScoreEngine {
    config: EngineConfig,
}

impl ScoreEngine {
    /// Create a new score engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Reply tree under `post_id`, ranked by effect on `post_id`.
    ///
    /// Fails with [`ScoreError::InconsistentEffect`] if any stored effect is keyed
    /// to the wrong (target, reply) pair.
    pub fn ranked_reply_tree<T, E>(
        &self,
        tree: &T,
        state: &ScoreState<E>,
        post_id: PostId,
    ) -> ScoreResult<RankedNode>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        rank_reply_tree(tree, &state.effects, post_id)
    }

    /// Like [`ranked_reply_tree`](Self::ranked_reply_tree), but an inconsistent
    /// effect degrades to the unranked tree instead of failing the request.
    pub fn ranked_reply_tree_or_unranked<T, E>(
        &self,
        tree: &T,
        state: &ScoreState<E>,
        post_id: PostId,
    ) -> ScoreResult<RankedNode>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        match rank_reply_tree(tree, &state.effects, post_id) {
            Err(e @ ScoreError::InconsistentEffect { .. }) => {
                error!("ranking of post {} unavailable: {}", post_id, e);
                unranked_reply_tree(tree, post_id)
            }
            other => other,
        }
    }

    /// The top note of a post and its informed/uninformed probabilities.
    pub fn top_note<T, E>(
        &self,
        tree: &T,
        state: &ScoreState<E>,
        post_id: PostId,
    ) -> ScoreResult<TopNote>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        if tree.post(post_id).is_none() {
            return Err(ScoreError::PostNotFound(post_id));
        }
        if let Some(top) = state.cached_top_note(post_id) {
            return Ok(*top);
        }
        let results = top_notes(self.config.global_prior(), tree, &state.tallies, post_id)?;
        results
            .get(&post_id)
            .copied()
            .ok_or(ScoreError::PostNotFound(post_id))
    }

    /// Approval probability of a post among voters shown its top note.
    pub fn informed_probability<T, E>(
        &self,
        tree: &T,
        state: &ScoreState<E>,
        post_id: PostId,
    ) -> ScoreResult<f64>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        Ok(self.top_note(tree, state, post_id)?.p)
    }

    /// Approval probability of a post among voters not shown its top note.
    pub fn uninformed_probability<T, E>(
        &self,
        tree: &T,
        state: &ScoreState<E>,
        post_id: PostId,
    ) -> ScoreResult<f64>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        Ok(self.top_note(tree, state, post_id)?.q)
    }

    /// Stored effect of `reply_id` on `target_id`.
    pub fn effect<E: EffectStore>(
        &self,
        state: &ScoreState<E>,
        target_id: PostId,
        reply_id: PostId,
    ) -> Option<Effect> {
        state.effects.effect(target_id, reply_id).copied()
    }

    /// Effect size of `reply_id` on `target_id`; 0 when no effect is recorded.
    pub fn effect_size<E: EffectStore>(
        &self,
        state: &ScoreState<E>,
        target_id: PostId,
        reply_id: PostId,
    ) -> ScoreResult<f64> {
        checked_effect_size(&state.effects, target_id, reply_id)
    }

    /// Chain of critical replies below `post_id`, for deep-linking.
    pub fn critical_thread<T, E>(
        &self,
        tree: &T,
        state: &ScoreState<E>,
        post_id: PostId,
    ) -> ScoreResult<Vec<PostId>>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        Ok(self.ranked_reply_tree(tree, state, post_id)?.critical_thread())
    }

    /// Current calibrated vote share of a location.
    pub fn vote_share<E: EffectStore>(&self, state: &ScoreState<E>, location: &Location) -> f64 {
        state.attention.vote_share(location)
    }

    /// Upvotes per expected vote for a post that received `attention` expected votes
    /// out of `sitewide_attention` in total.
    pub fn vote_rate<E: EffectStore>(
        &self,
        state: &ScoreState<E>,
        post_id: PostId,
        attention: f64,
        sitewide_attention: f64,
    ) -> BayesianEstimate {
        vote_rate(
            self.config.rate_prior(),
            state.tallies.overall(post_id).count,
            attention,
            state.tallies.sitewide().count,
            sitewide_attention,
        )
    }
}
