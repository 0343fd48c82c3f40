//! Vote processing pipeline: the write engine.

use log::{debug, trace};

use crate::config::EngineConfig;
use crate::graph::{ancestors, is_descendant, post_order};
use crate::store::{EffectStore, TreeShape};
use crate::types::{Location, PostId, ScoreError, ScoreResult, VoteEvent};

use super::probability::{note_effect, top_note_for, unconditional};
use super::state::ScoreState;

/// Result of ingesting one vote.
#[derive(Debug)]
pub struct IngestResult {
    pub target_id: PostId,
    /// Posts whose top note and effects were recomputed, nearest first.
    pub recomputed_posts: Vec<PostId>,
    /// Number of effect records written.
    pub effects_written: usize,
    /// Updated share of the vote's location, for exploration votes.
    pub vote_share: Option<f64>,
}

/// Report from replaying a batch of votes.
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub votes_applied: usize,
    pub exploration_votes: usize,
    pub effects_written: usize,
}

/// The write engine applies votes and keeps derived scores current.
///
/// Callers serialize writes per discussion: updates are order-sensitive, which
/// `&mut ScoreState` enforces within one process.
pub struct VoteEngine {
    config: EngineConfig,
}

impl VoteEngine {
    /// Create a new write engine.
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// The configuration this engine scores with.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply one vote: update tallies, the attention row for exploration votes,
    /// and the scores of the target and every ancestor.
    pub fn ingest<T, E>(
        &self,
        tree: &T,
        state: &mut ScoreState<E>,
        event: VoteEvent,
    ) -> ScoreResult<IngestResult>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        // Validate everything before touching state.
        if tree.post(event.target_id).is_none() {
            return Err(ScoreError::PostNotFound(event.target_id));
        }
        if let Some(note_id) = event.note_id {
            if !is_descendant(tree, event.target_id, note_id) {
                return Err(ScoreError::NoteNotInSubtree {
                    target_id: event.target_id,
                    note_id,
                });
            }
        }
        if let Some(placement) = &event.placement {
            placement.location.validate()?;
        }

        state.tallies.apply(&event)?;
        debug!(
            "vote by {} on {} ({}), note={:?}",
            event.voter_id, event.target_id, event.direction, event.note_id
        );

        let vote_share = match event.placement {
            Some(placement) if event.is_exploration() => {
                Some(state.attention.record_exploration_vote(placement.location)?)
            }
            _ => None,
        };

        let target_id = event.target_id;
        state.ledger.append(event);

        let (recomputed_posts, effects_written) = self.recompute_chain(tree, state, target_id)?;

        Ok(IngestResult {
            target_id,
            recomputed_posts,
            effects_written,
            vote_share,
        })
    }

    /// Record an exploration vote that arrives without a full vote event.
    pub fn record_exploration_vote<E: EffectStore>(
        &self,
        state: &mut ScoreState<E>,
        location: Location,
    ) -> ScoreResult<f64> {
        state.attention.record_exploration_vote(location)
    }

    /// Apply votes in order. Stops at the first rejected vote.
    pub fn replay<T, E, I>(
        &self,
        tree: &T,
        state: &mut ScoreState<E>,
        events: I,
    ) -> ScoreResult<ReplayReport>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
        I: IntoIterator<Item = VoteEvent>,
    {
        let mut report = ReplayReport::default();
        for event in events {
            let result = self.ingest(tree, state, event)?;
            report.votes_applied += 1;
            report.effects_written += result.effects_written;
            if result.vote_share.is_some() {
                report.exploration_votes += 1;
            }
        }
        debug!(
            "replayed {} votes ({} exploration), {} effects written",
            report.votes_applied, report.exploration_votes, report.effects_written
        );
        Ok(report)
    }

    /// Recompute the top note and outgoing effects of `post_id` and each ancestor.
    ///
    /// A vote on a post changes only tallies with that post as target, so no
    /// other stored value can move.
    pub fn recompute_chain<T, E>(
        &self,
        tree: &T,
        state: &mut ScoreState<E>,
        post_id: PostId,
    ) -> ScoreResult<(Vec<PostId>, usize)>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        if tree.post(post_id).is_none() {
            return Err(ScoreError::PostNotFound(post_id));
        }
        let mut chain = vec![post_id];
        chain.extend(ancestors(tree, post_id));

        let mut written = 0;
        for &id in &chain {
            written += self.recompute_post(tree, state, id);
        }
        Ok((chain, written))
    }

    /// Recompute every post under `root_id` from scratch, bottom-up.
    pub fn recompute_subtree<T, E>(
        &self,
        tree: &T,
        state: &mut ScoreState<E>,
        root_id: PostId,
    ) -> ScoreResult<usize>
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        let mut written = 0;
        for id in post_order(tree, root_id)? {
            written += self.recompute_post(tree, state, id);
        }
        Ok(written)
    }

    /// Refresh one post's top note and the effect of every reply below it.
    /// Returns the number of effects written.
    fn recompute_post<T, E>(&self, tree: &T, state: &mut ScoreState<E>, target_id: PostId) -> usize
    where
        T: TreeShape + ?Sized,
        E: EffectStore,
    {
        let prior = self.config.global_prior();
        let top = top_note_for(prior, tree, &state.tallies, target_id, &state.top_notes);
        state.top_notes.insert(target_id, top);

        let mut written = 0;
        for reply_id in tree.transitive_descendant_ids(target_id) {
            let has_record = state.effects.effect(target_id, reply_id).is_some();
            if !has_record && state.tallies.informed(target_id, reply_id).is_empty() {
                continue;
            }
            let reply_top = state
                .top_notes
                .get(&reply_id)
                .copied()
                .unwrap_or_else(|| unconditional(prior, &state.tallies, reply_id));
            let effect = note_effect(prior, &state.tallies, target_id, reply_id, &reply_top);
            trace!(
                "effect {} -> {}: p={:.4} q={:.4} r={:.4}",
                reply_id, target_id, effect.p, effect.q, effect.r
            );
            state.effects.save_effect(effect);
            written += 1;
        }
        written
    }
}
