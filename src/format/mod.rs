//! JSON snapshot format: a discussion's posts and its vote stream.

pub mod reader;
pub mod writer;

pub use reader::SnapshotReader;
pub use writer::SnapshotWriter;

use serde::{Deserialize, Serialize};

use crate::graph::DiscussionTree;
use crate::index::VoteLedger;
use crate::types::{Post, ScoreResult, VoteEvent};

/// Everything needed to rebuild scores: the tree and the votes, in ledger order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub posts: Vec<Post>,
    #[serde(default)]
    pub votes: Vec<VoteEvent>,
}

impl Snapshot {
    /// Capture a tree and ledger.
    pub fn capture(tree: &DiscussionTree, ledger: &VoteLedger) -> Self {
        Self {
            posts: tree.posts().to_vec(),
            votes: ledger.events().to_vec(),
        }
    }

    /// Rebuild the tree and the ledger, keeping vote arrival order.
    pub fn into_parts(self) -> ScoreResult<(DiscussionTree, VoteLedger)> {
        let tree = DiscussionTree::from_parts(self.posts)?;
        Ok((tree, VoteLedger::from_events(self.votes)))
    }
}
