//! Mutable scoring state: tallies, cached top notes, effects and attention rows.

use std::collections::HashMap;

use crate::config::EngineConfig;
use crate::index::{TallyIndex, VoteLedger};
use crate::store::{EffectStore, MemoryStore};
use crate::types::{PostId, ScoreResult};

use super::attention::AttentionCalibrator;
use super::probability::TopNote;

/// Everything the write engine maintains and the score engine reads.
pub struct ScoreState<E: EffectStore = MemoryStore> {
    pub(crate) ledger: VoteLedger,
    pub(crate) tallies: TallyIndex,
    pub(crate) top_notes: HashMap<PostId, TopNote>,
    pub(crate) effects: E,
    pub(crate) attention: AttentionCalibrator,
}

impl ScoreState<MemoryStore> {
    /// Empty state backed by an in-memory effect store.
    pub fn new(config: &EngineConfig) -> ScoreResult<Self> {
        Self::with_store(config, MemoryStore::new())
    }
}

impl<E: EffectStore> ScoreState<E> {
    /// Empty state backed by a caller-supplied effect store.
    pub fn with_store(config: &EngineConfig, effects: E) -> ScoreResult<Self> {
        config.validate()?;
        Ok(Self {
            ledger: VoteLedger::new(),
            tallies: TallyIndex::new(),
            top_notes: HashMap::new(),
            effects,
            attention: AttentionCalibrator::new(config.attention.alpha)?,
        })
    }

    /// Every vote applied so far.
    pub fn ledger(&self) -> &VoteLedger {
        &self.ledger
    }

    /// Tallies derived from the ledger.
    pub fn tallies(&self) -> &TallyIndex {
        &self.tallies
    }

    /// Stored effect records.
    pub fn effects(&self) -> &E {
        &self.effects
    }

    /// Attention calibration rows.
    pub fn attention(&self) -> &AttentionCalibrator {
        &self.attention
    }

    /// Cached top-note result for a post, if it has been computed.
    pub fn cached_top_note(&self, post_id: PostId) -> Option<&TopNote> {
        self.top_notes.get(&post_id)
    }
}
