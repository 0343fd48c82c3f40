//! Tally index: per-target vote state, split by which notes each voter has seen.

use std::collections::{HashMap, HashSet};

use crate::types::{Direction, PostId, ScoreError, ScoreResult, Tally, VoteEvent, VoterId};

/// A voter's latest vote on one target and every note they were shown with it.
#[derive(Debug, Clone)]
struct VoterRecord {
    direction: Direction,
    exposures: HashSet<PostId>,
}

#[derive(Debug, Clone, Default)]
struct TargetVotes {
    voters: HashMap<VoterId, VoterRecord>,
    latest_timestamp: u64,
}

/// Maps each target post to its voters' latest votes and exposures.
///
/// Only the latest vote per (target, voter) counts. Exposure accumulates, so a
/// voter who has ever been shown a note on this target counts as informed about it.
#[derive(Debug, Clone, Default)]
pub struct TallyIndex {
    targets: HashMap<PostId, TargetVotes>,
}

impl TallyIndex {
    /// Create a new, empty tally index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one vote. Votes on a target must arrive in non-decreasing timestamp order.
    pub fn apply(&mut self, event: &VoteEvent) -> ScoreResult<()> {
        let target = self.targets.entry(event.target_id).or_default();
        if event.timestamp < target.latest_timestamp {
            return Err(ScoreError::OutOfOrderVote {
                post_id: event.target_id,
                timestamp: event.timestamp,
                latest: target.latest_timestamp,
            });
        }
        target.latest_timestamp = event.timestamp;

        let record = target
            .voters
            .entry(event.voter_id)
            .or_insert_with(|| VoterRecord {
                direction: Direction::Neutral,
                exposures: HashSet::new(),
            });
        record.direction = event.direction;
        if let Some(note) = event.note_id {
            record.exposures.insert(note);
        }
        Ok(())
    }

    /// Latest votes of every voter on a target.
    pub fn overall(&self, target_id: PostId) -> Tally {
        let mut tally = Tally::EMPTY;
        if let Some(target) = self.targets.get(&target_id) {
            for record in target.voters.values() {
                count_vote(&mut tally, record.direction);
            }
        }
        tally
    }

    /// Split a target's votes into (informed, uninformed) with respect to `note_id`.
    pub fn exposure_split(&self, target_id: PostId, note_id: PostId) -> (Tally, Tally) {
        let mut informed = Tally::EMPTY;
        let mut uninformed = Tally::EMPTY;
        if let Some(target) = self.targets.get(&target_id) {
            for record in target.voters.values() {
                if record.exposures.contains(&note_id) {
                    count_vote(&mut informed, record.direction);
                } else {
                    count_vote(&mut uninformed, record.direction);
                }
            }
        }
        (informed, uninformed)
    }

    /// Votes on a target from voters who were shown `note_id`.
    pub fn informed(&self, target_id: PostId, note_id: PostId) -> Tally {
        self.exposure_split(target_id, note_id).0
    }

    /// Votes on a target from voters who were not shown `note_id`.
    pub fn uninformed(&self, target_id: PostId, note_id: PostId) -> Tally {
        self.exposure_split(target_id, note_id).1
    }

    /// Latest votes summed over every target.
    pub fn sitewide(&self) -> Tally {
        let mut tally = Tally::EMPTY;
        for target in self.targets.values() {
            for record in target.voters.values() {
                count_vote(&mut tally, record.direction);
            }
        }
        tally
    }

    /// Number of voters with any recorded event on a target (neutral included).
    pub fn voter_count(&self, target_id: PostId) -> usize {
        self.targets
            .get(&target_id)
            .map(|t| t.voters.len())
            .unwrap_or(0)
    }

    /// Timestamp of the latest applied vote on a target.
    pub fn latest_timestamp(&self, target_id: PostId) -> Option<u64> {
        self.targets.get(&target_id).map(|t| t.latest_timestamp)
    }

    /// Number of targets with at least one vote event.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Clear the index.
    pub fn clear(&mut self) {
        self.targets.clear();
    }
}

fn count_vote(tally: &mut Tally, direction: Direction) {
    match direction {
        Direction::Up => tally.record(true),
        Direction::Down => tally.record(false),
        Direction::Neutral => {}
    }
}
