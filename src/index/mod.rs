//! Vote ledger and the tallies derived from it.

pub mod tally_index;
pub mod vote_ledger;

pub use tally_index::TallyIndex;
pub use vote_ledger::VoteLedger;
