//! Vote ledger: the durable, ordered stream of vote events.

use crate::types::VoteEvent;

/// Vote events in arrival order. Replaying them in this order reproduces live state.
#[derive(Debug, Clone, Default)]
pub struct VoteLedger {
    events: Vec<VoteEvent>,
}

impl VoteLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from events already in arrival order.
    pub fn from_events(events: Vec<VoteEvent>) -> Self {
        Self { events }
    }

    /// Append an event.
    pub fn append(&mut self, event: VoteEvent) {
        self.events.push(event);
    }

    /// All events in ledger order.
    pub fn events(&self) -> &[VoteEvent] {
        &self.events
    }

    /// Events eligible for attention calibration, in ledger order.
    pub fn exploration_events(&self) -> impl Iterator<Item = &VoteEvent> {
        self.events.iter().filter(|e| e.is_exploration())
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the ledger is empty.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
