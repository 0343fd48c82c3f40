//! Engine configuration with TOML loading.
//!
//! Every entry point takes its priors from an [`EngineConfig`] passed in by the
//! caller; nothing reads a global.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::engine::bayes::BayesianEstimate;
use crate::types::{
    ScoreError, ScoreResult, DEFAULT_ALPHA, DEFAULT_PRIOR_AVERAGE, DEFAULT_PRIOR_WEIGHT,
};

/// Mean and pseudo-count of the approval prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriorConfig {
    #[serde(default = "default_prior_average")]
    pub average: f64,
    #[serde(default = "default_prior_weight")]
    pub weight: f64,
}

/// Mean and pseudo-count of the vote-rate prior.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatePriorConfig {
    #[serde(default = "default_rate_average")]
    pub average: f64,
    #[serde(default = "default_prior_weight")]
    pub weight: f64,
}

/// Attention calibration settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttentionConfig {
    /// EWMA smoothing constant, strictly between 0 and 1.
    #[serde(default = "default_alpha")]
    pub alpha: f64,
    /// Chance that a display slot is filled by a random post.
    #[serde(default = "default_exploration_probability")]
    pub exploration_probability: f64,
}

/// Complete engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Global approval prior (probability flavor).
    #[serde(default)]
    pub prior: PriorConfig,
    /// Vote-rate prior (rate flavor).
    #[serde(default)]
    pub rate_prior: RatePriorConfig,
    #[serde(default)]
    pub attention: AttentionConfig,
}

fn default_alpha() -> f64 {
    DEFAULT_ALPHA
}

fn default_exploration_probability() -> f64 {
    0.1
}

fn default_prior_average() -> f64 {
    DEFAULT_PRIOR_AVERAGE
}

fn default_rate_average() -> f64 {
    1.0
}

fn default_prior_weight() -> f64 {
    DEFAULT_PRIOR_WEIGHT
}

impl Default for PriorConfig {
    fn default() -> Self {
        Self {
            average: default_prior_average(),
            weight: default_prior_weight(),
        }
    }
}

impl Default for RatePriorConfig {
    fn default() -> Self {
        Self {
            average: default_rate_average(),
            weight: default_prior_weight(),
        }
    }
}

impl Default for AttentionConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            exploration_probability: default_exploration_probability(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prior: PriorConfig::default(),
            rate_prior: RatePriorConfig::default(),
            attention: AttentionConfig::default(),
        }
    }
}

impl EngineConfig {
    /// The global approval prior.
    pub fn global_prior(&self) -> BayesianEstimate {
        BayesianEstimate::probability(self.prior.average, self.prior.weight)
    }

    /// The vote-rate prior.
    pub fn rate_prior(&self) -> BayesianEstimate {
        BayesianEstimate::rate(self.rate_prior.average, self.rate_prior.weight)
    }

    /// Reject values the engine cannot work with.
    pub fn validate(&self) -> ScoreResult<()> {
        if !(0.0..=1.0).contains(&self.prior.average) {
            return Err(ScoreError::InvalidProbability(self.prior.average));
        }
        if !(self.prior.weight > 0.0) {
            return Err(ScoreError::InvalidConfig(format!(
                "prior.weight must be > 0, got {}",
                self.prior.weight
            )));
        }
        if !(self.rate_prior.average >= 0.0) || !(self.rate_prior.weight > 0.0) {
            return Err(ScoreError::InvalidConfig(format!(
                "rate_prior must have average >= 0 and weight > 0, got {:?}",
                self.rate_prior
            )));
        }
        if !(self.attention.alpha > 0.0 && self.attention.alpha < 1.0) {
            return Err(ScoreError::InvalidConfig(format!(
                "attention.alpha must be in (0, 1), got {}",
                self.attention.alpha
            )));
        }
        if !(0.0..=1.0).contains(&self.attention.exploration_probability) {
            return Err(ScoreError::InvalidConfig(format!(
                "attention.exploration_probability must be in [0, 1], got {}",
                self.attention.exploration_probability
            )));
        }
        Ok(())
    }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> ScoreResult<EngineConfig> {
    let config: EngineConfig = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> ScoreResult<EngineConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}
