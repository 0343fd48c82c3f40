//! Relative entropy and effect size.

use log::warn;

use crate::types::Effect;

/// Floor/ceiling applied to `q` so boundary inputs stay finite.
const Q_EPSILON: f64 = 1e-9;

/// KL divergence (in bits) of Bernoulli(p) from Bernoulli(q).
///
/// Uses `0 * log(0) = 0`. Inputs outside [0, 1] are clamped, NaN inputs yield 0.
/// `q` is kept inside `[Q_EPSILON, 1 - Q_EPSILON]`, so `relative_entropy(0, 1)` and
/// `relative_entropy(1, 0)` are large but finite.
pub fn relative_entropy(p: f64, q: f64) -> f64 {
    if p.is_nan() || q.is_nan() {
        warn!("relative_entropy called with NaN (p={}, q={})", p, q);
        return 0.0;
    }
    if !(0.0..=1.0).contains(&p) || !(0.0..=1.0).contains(&q) {
        warn!("relative_entropy inputs out of range (p={}, q={}), clamping", p, q);
    }
    let p = p.clamp(0.0, 1.0);
    let q = q.clamp(0.0, 1.0);
    if p == q {
        return 0.0;
    }
    let q = q.clamp(Q_EPSILON, 1.0 - Q_EPSILON);

    let hit = if p == 0.0 { 0.0 } else { p * (p / q).log2() };
    let miss = if p == 1.0 {
        0.0
    } else {
        (1.0 - p) * ((1.0 - p) / (1.0 - q)).log2()
    };
    (hit + miss).max(0.0)
}

/// Divergence between informed and uninformed approval, scaled by informed sample size.
///
/// A missing effect has size exactly 0.
pub fn effect_size_on_target(effect: Option<&Effect>) -> f64 {
    match effect {
        Some(e) => relative_entropy(e.p, e.q) * e.p_size as f64,
        None => 0.0,
    }
}
