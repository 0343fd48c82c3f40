//! Vote events delivered by the vote ledger.

use serde::{Deserialize, Serialize};

use super::location::Location;
use super::post::PostId;

/// Voter identifier.
pub type VoterId = u64;

/// Direction of a vote. `Neutral` retracts an earlier vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl Direction {
    /// Return a human-readable name for this direction.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Neutral => "neutral",
        }
    }

    /// Parse a direction from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "up" | "+1" => Some(Self::Up),
            "down" | "-1" => Some(Self::Down),
            "neutral" | "0" => Some(Self::Neutral),
            _ => None,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where the voted-on post was displayed when the vote was cast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub location: Location,
    /// The post was placed at a randomly chosen slot rather than by rank.
    #[serde(default)]
    pub is_exploration: bool,
}

impl Placement {
    /// A quality-ranked placement.
    pub fn ranked(location: Location) -> Self {
        Self {
            location,
            is_exploration: false,
        }
    }

    /// A randomly chosen placement.
    pub fn exploration(location: Location) -> Self {
        Self {
            location,
            is_exploration: true,
        }
    }
}

/// A single vote as delivered by the vote ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteEvent {
    pub voter_id: VoterId,
    pub target_id: PostId,
    /// The note the voter was shown alongside the target, if any.
    #[serde(default)]
    pub note_id: Option<PostId>,
    pub direction: Direction,
    /// Unix epoch microseconds.
    pub timestamp: u64,
    #[serde(default)]
    pub placement: Option<Placement>,
}

impl VoteEvent {
    /// Create a vote with no note shown and no placement.
    pub fn new(voter_id: VoterId, target_id: PostId, direction: Direction, timestamp: u64) -> Self {
        Self {
            voter_id,
            target_id,
            note_id: None,
            direction,
            timestamp,
            placement: None,
        }
    }

    /// Record that `note_id` was shown to the voter.
    pub fn shown(mut self, note_id: PostId) -> Self {
        self.note_id = Some(note_id);
        self
    }

    /// Record where the target was displayed.
    pub fn placed(mut self, placement: Placement) -> Self {
        self.placement = Some(placement);
        self
    }

    /// Whether this vote counts toward attention calibration.
    pub fn is_exploration(&self) -> bool {
        self.direction != Direction::Neutral
            && self.placement.map(|p| p.is_exploration).unwrap_or(false)
    }
}
