//! Per-(target, reply) effect records.

use serde::{Deserialize, Serialize};

use super::post::PostId;
use super::tally::Tally;

/// How much showing `source_id` shifts approval of `target_id`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub target_id: PostId,
    pub source_id: PostId,
    /// Informed approval probability of the target, adjusted by the reply's own support.
    pub p: f64,
    pub p_count: u64,
    pub p_size: u64,
    /// Uninformed approval probability of the target.
    pub q: f64,
    pub q_count: u64,
    pub q_size: u64,
    /// Support ratio of the reply's own top note (1.0 when it has none).
    pub r: f64,
    /// Effective sample size behind `p`.
    pub weight: f64,
}

impl Effect {
    /// Zero-size effect used where no record exists yet.
    pub fn neutral(target_id: PostId, source_id: PostId) -> Self {
        Self {
            target_id,
            source_id,
            p: 0.0,
            p_count: 0,
            p_size: 0,
            q: 0.0,
            q_count: 0,
            q_size: 0,
            r: 1.0,
            weight: 0.0,
        }
    }

    /// Votes cast by voters who had been shown the reply.
    pub fn informed_tally(&self) -> Tally {
        Tally {
            count: self.p_count,
            total: self.p_size,
        }
    }

    /// Votes cast by voters who had not been shown the reply.
    pub fn uninformed_tally(&self) -> Tally {
        Tally {
            count: self.q_count,
            total: self.q_size,
        }
    }
}
