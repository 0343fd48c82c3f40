//! Tallies of binary outcomes (approvals out of votes) or events over an exposure.

use std::ops::Add;

use serde::{Deserialize, Serialize};

use super::error::{ScoreError, ScoreResult};

/// Aggregate outcome of repeated trials: `count` successes out of `total`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    /// Number of successes (upvotes).
    pub count: u64,
    /// Number of trials (non-neutral votes).
    pub total: u64,
}

impl Tally {
    /// The empty tally.
    pub const EMPTY: Tally = Tally { count: 0, total: 0 };

    /// Create a tally, rejecting `count > total`.
    pub fn new(count: u64, total: u64) -> ScoreResult<Self> {
        if count > total {
            return Err(ScoreError::InvalidTally { count, total });
        }
        Ok(Self { count, total })
    }

    /// Observed success ratio, or `None` for an empty tally.
    pub fn average(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.count as f64 / self.total as f64)
        }
    }

    /// Whether no trials have been observed.
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Record a single trial.
    pub fn record(&mut self, success: bool) {
        self.total += 1;
        if success {
            self.count += 1;
        }
    }
}

impl Add for Tally {
    type Output = Tally;

    fn add(self, other: Tally) -> Tally {
        Tally {
            count: self.count + other.count,
            total: self.total + other.total,
        }
    }
}
