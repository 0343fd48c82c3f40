//! High-level operations: the scoring engine.

pub mod attention;
pub mod bayes;
pub mod entropy;
pub mod probability;
pub mod query;
pub mod ranking;
pub mod state;
pub mod write;

pub use attention::{vote_rate, AttentionCalibrator, ExplorationPolicy};
pub use bayes::{BayesianEstimate, Flavor};
pub use entropy::{effect_size_on_target, relative_entropy};
pub use probability::{informed_estimates, top_notes, TopNote};
pub use query::ScoreEngine;
pub use ranking::{rank_reply_tree, unranked_reply_tree, RankedNode};
pub use state::ScoreState;
pub use write::{IngestResult, ReplayReport, VoteEngine};
