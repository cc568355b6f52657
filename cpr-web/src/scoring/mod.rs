//! Scoring module - banded quality score, grades and coaching verdicts

mod grade;
mod scorer;

pub use grade::{DepthVerdict, QualityGrade, QualityResult, RateTier, RateVerdict};
pub use scorer::{band_score, QualityScorer, OK_SCORE, PERFECT_SCORE};
