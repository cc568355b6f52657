//! Band scoring - deterministic rate/depth quality score
//!
//! Each quantity is scored against a perfect band (100) and a wider ok band
//! (75), falling off linearly outside the ok band. The two band scores are
//! combined as a weighted mean.

use crate::config::{Band, ScoringConfig};
use super::grade::QualityResult;

/// Score awarded inside the perfect band
pub const PERFECT_SCORE: f32 = 100.0;
/// Score awarded inside the ok band
pub const OK_SCORE: f32 = 75.0;

/// Score one value against one band.
///
/// Total over its domain: non-positive or non-finite values score 0.
pub fn band_score(value: f32, band: &Band) -> f32 {
    if !(value > 0.0) || !value.is_finite() {
        return 0.0;
    }

    if value >= band.perfect_min && value <= band.perfect_max {
        return PERFECT_SCORE;
    }

    if value >= band.ok_min && value <= band.ok_max {
        return OK_SCORE;
    }

    let dist = if value < band.ok_min {
        band.ok_min - value
    } else {
        value - band.ok_max
    };
    (OK_SCORE - dist * band.falloff_per_unit).clamp(0.0, OK_SCORE)
}

/// Pure scorer over (average rate, average depth)
#[derive(Clone, Debug)]
pub struct QualityScorer {
    config: ScoringConfig,
}

impl QualityScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn rate_score(&self, avg_rate: f32) -> f32 {
        band_score(avg_rate, &self.config.rate)
    }

    pub fn depth_score(&self, avg_depth: f32) -> f32 {
        band_score(avg_depth, &self.config.depth)
    }

    /// Weighted quality score with its grade.
    ///
    /// The weighted sum is divided by the total weight, so weights that do
    /// not add up to 1 still yield a 0-100 score.
    pub fn score(&self, avg_rate: f32, avg_depth: f32) -> QualityResult {
        let rate_weight = self.config.rate_weight;
        let depth_weight = self.config.depth_weight;
        let total_weight = rate_weight + depth_weight;

        let weighted = self.rate_score(avg_rate) * rate_weight + self.depth_score(avg_depth) * depth_weight;
        let score = if total_weight > 0.0 {
            (weighted / total_weight).clamp(0.0, PERFECT_SCORE)
        } else {
            0.0
        };

        QualityResult::from_score(score)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}
