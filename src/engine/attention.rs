//! Attention calibration: how many votes a display slot earns regardless of content.
//!
//! Only exploration votes (posts placed at a randomly chosen slot) feed the
//! calibration, so the quality ranking cannot leak into a slot's estimated value.

use std::collections::HashMap;

use log::debug;
use rand::Rng;

use crate::types::{Location, LocationStats, LocationType, Placement, PostId, ScoreError, ScoreResult};

use super::bayes::BayesianEstimate;

/// Per-location share of sitewide exploration votes.
///
/// Below `window_size` sitewide votes a location's share is a plain running
/// average. From `window_size` on it is an exponentially-weighted moving average
/// with smoothing `alpha`. With `window_size = 1 / (1 - alpha)`, both formulas
/// agree for consecutive votes at the boundary.
#[derive(Debug, Clone)]
pub struct AttentionCalibrator {
    alpha: f64,
    window_size: u64,
    sitewide_votes: u64,
    stats: HashMap<Location, LocationStats>,
}

impl AttentionCalibrator {
    /// Create a calibrator. `alpha` must lie strictly between 0 and 1.
    pub fn new(alpha: f64) -> ScoreResult<Self> {
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(ScoreError::InvalidConfig(format!(
                "attention.alpha must be in (0, 1), got {}",
                alpha
            )));
        }
        // 1 / (1 - 0.9999) evaluates to 9_999.99999997; round to the intended 10_000.
        let window_size = ((1.0 / (1.0 - alpha)).round() as u64).max(1);
        Ok(Self {
            alpha,
            window_size,
            sitewide_votes: 0,
            stats: HashMap::new(),
        })
    }

    /// Restore a calibrator from persisted rows.
    pub fn from_parts(
        alpha: f64,
        sitewide_votes: u64,
        rows: impl IntoIterator<Item = LocationStats>,
    ) -> ScoreResult<Self> {
        let mut calibrator = Self::new(alpha)?;
        calibrator.sitewide_votes = sitewide_votes;
        for row in rows {
            row.location.validate()?;
            calibrator.stats.insert(row.location, row);
        }
        Ok(calibrator)
    }

    /// The smoothing constant.
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Sitewide vote count at which the EWMA regime takes over.
    pub fn window_size(&self) -> u64 {
        self.window_size
    }

    /// Total exploration votes seen sitewide.
    pub fn sitewide_vote_count(&self) -> u64 {
        self.sitewide_votes
    }

    /// Whether the sitewide count `n` is still in the running-average regime.
    pub fn is_running_average(&self, n: u64) -> bool {
        n < self.window_size
    }

    /// Record an exploration vote at `location` and return its updated share.
    pub fn record_exploration_vote(&mut self, location: Location) -> ScoreResult<f64> {
        location.validate()?;
        self.sitewide_votes += 1;
        let n = self.sitewide_votes;

        let row = self
            .stats
            .entry(location)
            .or_insert_with(|| LocationStats::new(location));
        let latest = row.latest_sitewide_vote_count;
        row.vote_share = if n < self.window_size {
            (row.vote_share * latest as f64 + 1.0) / n as f64
        } else {
            row.vote_share * self.alpha.powf((n - latest) as f64) + (1.0 - self.alpha)
        };
        row.latest_sitewide_vote_count = n;

        debug!(
            "exploration vote at {} (n={}): share={:.6}",
            location, n, row.vote_share
        );
        Ok(row.vote_share)
    }

    /// Share of `location` brought forward to the current sitewide count.
    ///
    /// Votes elsewhere since the row was last updated count as zero observations.
    /// Locations never voted on report 0.
    pub fn vote_share(&self, location: &Location) -> f64 {
        let Some(row) = self.stats.get(location) else {
            return 0.0;
        };
        let n = self.sitewide_votes;
        let latest = row.latest_sitewide_vote_count;
        if n == 0 || n == latest {
            return row.vote_share;
        }
        if n < self.window_size {
            row.vote_share * latest as f64 / n as f64
        } else {
            row.vote_share * self.alpha.powf((n - latest) as f64)
        }
    }

    /// Expected votes a post earns at `location` over `sitewide_votes` sitewide votes.
    pub fn expected_votes(&self, location: &Location, sitewide_votes: u64) -> f64 {
        self.vote_share(location) * sitewide_votes as f64
    }

    /// Stored row for a location.
    pub fn stats(&self, location: &Location) -> Option<&LocationStats> {
        self.stats.get(location)
    }

    /// All rows, ordered by location.
    pub fn all_stats(&self) -> Vec<LocationStats> {
        let mut rows: Vec<LocationStats> = self.stats.values().copied().collect();
        rows.sort_by_key(|r| r.location);
        rows
    }
}

/// Fills display slots from a quality ranking, occasionally with a random post.
#[derive(Debug, Clone, Copy)]
pub struct ExplorationPolicy {
    exploration_probability: f64,
    location_type: LocationType,
}

impl ExplorationPolicy {
    /// Create a policy. `exploration_probability` must lie in [0, 1].
    pub fn new(location_type: LocationType, exploration_probability: f64) -> ScoreResult<Self> {
        if !(0.0..=1.0).contains(&exploration_probability) {
            return Err(ScoreError::InvalidConfig(format!(
                "attention.exploration_probability must be in [0, 1], got {}",
                exploration_probability
            )));
        }
        Ok(Self {
            exploration_probability,
            location_type,
        })
    }

    /// Assign every post in `ranked` to a slot, rank 1 first.
    ///
    /// Each slot takes the best remaining post, except with probability
    /// `exploration_probability` it takes a uniformly random remaining post and is
    /// tagged as exploration.
    pub fn arrange<R: Rng + ?Sized>(
        &self,
        ranked: &[PostId],
        rng: &mut R,
    ) -> Vec<(PostId, Placement)> {
        let mut remaining: Vec<PostId> = ranked.to_vec();
        let mut slots = Vec::with_capacity(remaining.len());
        let mut rank: u32 = 1;

        while !remaining.is_empty() {
            let location = Location {
                location_type: self.location_type,
                one_based_rank: rank,
            };
            let explore = rng.gen_bool(self.exploration_probability);
            let (index, placement) = if explore {
                (
                    rng.gen_range(0..remaining.len()),
                    Placement::exploration(location),
                )
            } else {
                (0, Placement::ranked(location))
            };
            slots.push((remaining.remove(index), placement));
            rank += 1;
        }
        slots
    }
}

/// Upvotes per expected vote for a post, shrunk toward the sitewide rate.
///
/// The sitewide posterior is re-weighted to the prior's confidence and then
/// becomes the prior for the post.
pub fn vote_rate(
    rate_prior: BayesianEstimate,
    upvotes: u64,
    attention: f64,
    sitewide_upvotes: u64,
    sitewide_attention: f64,
) -> BayesianEstimate {
    let sitewide = rate_prior
        .update_raw(sitewide_upvotes as f64, sitewide_attention)
        .reset_weight(rate_prior.weight);
    sitewide.update_raw(upvotes as f64, attention)
}
