//! Bayesian tally distributions: weighted-average posteriors updated from tallies.
//!
//! Both flavors share the same update:
//!
//! ```text
//! average' = (average * weight + count) / (weight + total)
//! weight'  = weight + total
//! ```
//!
//! The probability flavor (Beta-like) keeps `average` in [0, 1]; the rate flavor
//! (Gamma-like) only keeps it non-negative.

use serde::{Deserialize, Serialize};

use crate::types::Tally;

/// Which family an estimate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Flavor {
    /// Approval probability, bounded in [0, 1].
    Probability,
    /// Event rate, unbounded above.
    Rate,
}

/// A posterior mean and its effective sample size (pseudo-count).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BayesianEstimate {
    pub average: f64,
    pub weight: f64,
    pub flavor: Flavor,
}

impl BayesianEstimate {
    /// A probability-flavored estimate. `average` is clamped to [0, 1].
    pub fn probability(average: f64, weight: f64) -> Self {
        Self {
            average: average.clamp(0.0, 1.0),
            weight: weight.max(0.0),
            flavor: Flavor::Probability,
        }
    }

    /// A rate-flavored estimate. `average` is clamped to >= 0.
    pub fn rate(average: f64, weight: f64) -> Self {
        Self {
            average: average.max(0.0),
            weight: weight.max(0.0),
            flavor: Flavor::Rate,
        }
    }

    /// Posterior after observing `tally`.
    pub fn update(&self, tally: Tally) -> Self {
        self.update_raw(tally.count as f64, tally.total as f64)
    }

    /// Posterior after observing `count` events over a (possibly fractional) `total`.
    ///
    /// Returns `self` unchanged when both the prior weight and `total` are zero.
    pub fn update_raw(&self, count: f64, total: f64) -> Self {
        let total = total.max(0.0);
        let weight = self.weight + total;
        if weight <= 0.0 {
            return *self;
        }
        let average = (self.average * self.weight + count.max(0.0)) / weight;
        let average = match self.flavor {
            Flavor::Probability => average.clamp(0.0, 1.0),
            Flavor::Rate => average.max(0.0),
        };
        Self {
            average,
            weight,
            flavor: self.flavor,
        }
    }

    /// Same average, new confidence. Used to turn a posterior into the prior of a
    /// narrower estimate.
    pub fn reset_weight(&self, new_weight: f64) -> Self {
        Self {
            weight: new_weight.max(0.0),
            ..*self
        }
    }
}
