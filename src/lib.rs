//! discourse-score: scoring, ranking and attention calibration for discussions.
//!
//! Votes on posts are split by whether the voter had been shown a given reply.
//! Comparing informed and uninformed approval measures how much each reply shifts
//! opinion. Reply trees are ranked by that effect, and the chain of most
//! opinion-shifting replies is surfaced as the critical thread. Separately, votes
//! on randomly placed posts calibrate how much attention each display slot gets.

pub mod cli;
pub mod config;
pub mod engine;
pub mod format;
pub mod graph;
pub mod index;
pub mod store;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::{load_config, EngineConfig};
pub use engine::{
    effect_size_on_target, relative_entropy, vote_rate, AttentionCalibrator, BayesianEstimate,
    ExplorationPolicy, Flavor, IngestResult, RankedNode, ReplayReport, ScoreEngine, ScoreState,
    TopNote, VoteEngine,
};
pub use format::{Snapshot, SnapshotReader, SnapshotWriter};
pub use graph::{DiscussionTree, TreeBuilder};
pub use index::{TallyIndex, VoteLedger};
pub use store::{EffectStore, MemoryStore, TreeShape};
pub use types::{
    now_micros, Direction, Effect, Location, LocationStats, LocationType, Placement, Post, PostId,
    ScoreError, ScoreResult, Tally, VoteEvent, VoterId,
};
