//! Display locations and their calibrated attention statistics.

use serde::{Deserialize, Serialize};

use super::error::{ScoreError, ScoreResult};

/// The kind of page or slot a post is displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// Quality-ranked front page.
    Frontpage,
    /// Chronological "new" page.
    NewPage,
    /// Top-note slot under a post on its own page.
    TopNote,
    /// Reply list on a post page.
    ReplyList,
}

impl LocationType {
    /// Return a human-readable name for this location type.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Frontpage => "frontpage",
            Self::NewPage => "new_page",
            Self::TopNote => "top_note",
            Self::ReplyList => "reply_list",
        }
    }

    /// Parse a location type from a string name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "frontpage" => Some(Self::Frontpage),
            "new_page" | "newpage" | "new" => Some(Self::NewPage),
            "top_note" | "topnote" => Some(Self::TopNote),
            "reply_list" | "replylist" | "replies" => Some(Self::ReplyList),
            _ => None,
        }
    }
}

impl std::fmt::Display for LocationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A display slot: page type and one-based rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    pub location_type: LocationType,
    pub one_based_rank: u32,
}

impl Location {
    /// Create a location, rejecting rank 0.
    pub fn new(location_type: LocationType, one_based_rank: u32) -> ScoreResult<Self> {
        if one_based_rank == 0 {
            return Err(ScoreError::InvalidRank(one_based_rank));
        }
        Ok(Self {
            location_type,
            one_based_rank,
        })
    }

    /// Check the rank of a location that bypassed [`Location::new`] (e.g. deserialized).
    pub fn validate(&self) -> ScoreResult<()> {
        if self.one_based_rank == 0 {
            return Err(ScoreError::InvalidRank(self.one_based_rank));
        }
        Ok(())
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.location_type, self.one_based_rank)
    }
}

/// Calibrated share of sitewide exploration votes landing on a location.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocationStats {
    pub location: Location,
    /// Fraction of sitewide exploration votes expected at this location.
    pub vote_share: f64,
    /// Sitewide exploration-vote count at the last update of this row.
    pub latest_sitewide_vote_count: u64,
}

impl LocationStats {
    /// A fresh row with no votes observed.
    pub fn new(location: Location) -> Self {
        Self {
            location,
            vote_share: 0.0,
            latest_sitewide_vote_count: 0,
        }
    }
}
