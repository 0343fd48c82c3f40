//! In-memory effect store.

use std::collections::HashMap;

use crate::types::{Effect, PostId};

use super::EffectStore;

/// Effect records held in a hash map keyed by (target, source).
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    effects: HashMap<(PostId, PostId), Effect>,
    by_target: HashMap<PostId, Vec<PostId>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored effect records.
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Whether no effects are stored.
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

impl EffectStore for MemoryStore {
    fn effect(&self, target_id: PostId, source_id: PostId) -> Option<&Effect> {
        self.effects.get(&(target_id, source_id))
    }

    fn save_effect(&mut self, effect: Effect) {
        let key = (effect.target_id, effect.source_id);
        if self.effects.insert(key, effect).is_none() {
            self.by_target
                .entry(effect.target_id)
                .or_default()
                .push(effect.source_id);
        }
    }

    fn effects_on(&self, target_id: PostId) -> Vec<&Effect> {
        self.by_target
            .get(&target_id)
            .map(|sources| {
                sources
                    .iter()
                    .filter_map(|&s| self.effects.get(&(target_id, s)))
                    .collect()
            })
            .unwrap_or_default()
    }
}
