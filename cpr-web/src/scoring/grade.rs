//! Grades, tiers and coaching verdicts
//!
//! Fixed label strings and display colors for every discrete outcome the UI
//! shows. Colors are RGBA in 0-1.

use serde::Serialize;

use crate::config::Band;

/// Overall quality grade, best first
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum QualityGrade {
    Excellent,
    Good,
    Fair,
    Poor,
    Critical,
}

impl QualityGrade {
    /// Grade thresholds, evaluated high to low
    pub const THRESHOLDS: [(f32, QualityGrade); 4] = [
        (90.0, QualityGrade::Excellent),
        (75.0, QualityGrade::Good),
        (60.0, QualityGrade::Fair),
        (40.0, QualityGrade::Poor),
    ];

    pub fn from_score(score: f32) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, grade)| *grade)
            .unwrap_or(QualityGrade::Critical)
    }

    pub fn label(&self) -> &'static str {
        match self {
            QualityGrade::Excellent => "EXCELLENT",
            QualityGrade::Good => "GOOD",
            QualityGrade::Fair => "FAIR",
            QualityGrade::Poor => "POOR",
            QualityGrade::Critical => "CRITICAL",
        }
    }

    pub fn color(&self) -> [f32; 4] {
        match self {
            QualityGrade::Excellent => [0.2, 1.0, 0.2, 1.0],
            QualityGrade::Good => [0.0, 1.0, 0.0, 1.0],
            QualityGrade::Fair => [1.0, 0.92, 0.016, 1.0],
            QualityGrade::Poor => [1.0, 0.5, 0.0, 1.0],
            QualityGrade::Critical => [1.0, 0.0, 0.0, 1.0],
        }
    }
}

/// Scored session quality
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct QualityResult {
    /// 0-100
    pub score: f32,
    pub grade: QualityGrade,
    pub label: &'static str,
    /// RGBA of the grade
    pub color: [f32; 4],
}

impl QualityResult {
    pub fn from_score(score: f32) -> Self {
        let grade = QualityGrade::from_score(score);
        Self {
            score,
            grade,
            label: grade.label(),
            color: grade.color(),
        }
    }

    /// "GOOD (82%)"
    pub fn display_text(&self) -> String {
        format!("{} ({:.0}%)", self.label, self.score)
    }
}

// ============================================================================
// RATE TIER (live rate readout color)
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RateTier {
    /// Inside the perfect band
    InTarget,
    /// Inside the ok band
    Acceptable,
    OutOfRange,
    NoData,
}

impl RateTier {
    pub fn classify(rate: f32, band: &Band) -> Self {
        if !(rate > 0.0) || !rate.is_finite() {
            RateTier::NoData
        } else if (band.perfect_min..=band.perfect_max).contains(&rate) {
            RateTier::InTarget
        } else if (band.ok_min..=band.ok_max).contains(&rate) {
            RateTier::Acceptable
        } else {
            RateTier::OutOfRange
        }
    }

    pub fn color(&self) -> [f32; 4] {
        match self {
            RateTier::InTarget => [0.2, 1.0, 0.2, 1.0],
            RateTier::Acceptable => [1.0, 1.0, 0.3, 1.0],
            RateTier::OutOfRange => [1.0, 0.3, 0.3, 1.0],
            RateTier::NoData => [0.5, 0.8, 1.0, 1.0],
        }
    }
}

// ============================================================================
// PER-COMPRESSION VERDICTS
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum DepthVerdict {
    Shallow,
    Good,
    TooDeep,
}

impl DepthVerdict {
    /// Shallow below the midpoint of the band's lower ok and perfect edges
    /// (4 cm by default), too deep past the perfect band.
    pub fn classify(depth: f32, band: &Band) -> Self {
        let shallow_below = (band.ok_min + band.perfect_min) * 0.5;
        if depth < shallow_below {
            DepthVerdict::Shallow
        } else if depth > band.perfect_max {
            DepthVerdict::TooDeep
        } else {
            DepthVerdict::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DepthVerdict::Shallow => "SHALLOW",
            DepthVerdict::Good => "GOOD",
            DepthVerdict::TooDeep => "TOO DEEP",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RateVerdict {
    TooSlow,
    Good,
    TooFast,
    /// No rate measured yet (warm-up or implausible interval)
    Unknown,
}

impl RateVerdict {
    /// Outside the ok band is too slow or too fast
    pub fn classify(rate: f32, band: &Band) -> Self {
        if !(rate > 0.0) || !rate.is_finite() {
            RateVerdict::Unknown
        } else if rate < band.ok_min {
            RateVerdict::TooSlow
        } else if rate > band.ok_max {
            RateVerdict::TooFast
        } else {
            RateVerdict::Good
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateVerdict::TooSlow => "TOO SLOW",
            RateVerdict::Good => "GOOD",
            RateVerdict::TooFast => "TOO FAST",
            RateVerdict::Unknown => "--",
        }
    }
}
