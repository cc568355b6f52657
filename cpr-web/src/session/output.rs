//! Output value types handed to renderers, the UI and the results screen
//!
//! Everything here is a plain value: built by the engine, never mutated
//! afterwards, and serializable so the bridge can pass it straight to JS.

use serde::Serialize;

use crate::physics::CompressionEvent;
use crate::scoring::{DepthVerdict, QualityGrade, QualityResult, RateTier, RateVerdict};

/// Bounds of the cosmetic pacing ratio
pub const MIN_PULSE_SPEED: f32 = 0.5;
pub const MAX_PULSE_SPEED: f32 = 2.0;

// ============================================================================
// HEARTBEAT PULSE
// ============================================================================

/// Waveform pulse for one completed compression
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct HeartbeatPulse {
    /// Peak depth (meters)
    pub depth: f32,
    /// Pacing ratio against the ideal rate, 0.5-2.0
    pub speed: f32,
}

impl HeartbeatPulse {
    /// Build a pulse from the best available rate.
    ///
    /// Prefers the rate of this compression, then the smoothed rate, then
    /// the ideal rate (which yields speed 1).
    pub fn new(depth: f32, current_rate: f32, smoothed_rate: f32, ideal_rate: f32) -> Self {
        let rate = if current_rate > 0.0 {
            current_rate
        } else if smoothed_rate > 0.0 {
            smoothed_rate
        } else {
            ideal_rate
        };

        let speed = rate / ideal_rate.max(1.0);
        let speed = if speed.is_finite() {
            speed.clamp(MIN_PULSE_SPEED, MAX_PULSE_SPEED)
        } else {
            1.0
        };

        Self { depth, speed }
    }
}

// ============================================================================
// PER-FRAME OUTCOME
// ============================================================================

/// A compression the engine counted on this frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompletedCompression {
    pub event: CompressionEvent,
    /// BPM fed to the statistics (0 during warm-up or after an implausible interval)
    pub rate: f32,
    /// Compressions recorded so far, this one included
    pub count: u32,
    pub pulse: HeartbeatPulse,
    pub depth_verdict: DepthVerdict,
    pub rate_verdict: RateVerdict,
}

// ============================================================================
// LIVE FEEDBACK
// ============================================================================

/// What the live panel shows in its headline
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum FeedbackPhase {
    /// Still counting towards the warm-up target
    #[serde(rename_all = "camelCase")]
    WarmUp { count: u32, target: u32 },
    /// Averages once rates are being measured
    #[serde(rename_all = "camelCase")]
    Stats { avg_rate: f32, avg_depth: f32 },
}

/// Throttled live readout
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackSnapshot {
    pub compressions: u32,
    pub warmup_target: u32,
    pub phase: FeedbackPhase,
    /// Only present after warm-up
    pub quality: Option<QualityResult>,
    /// Compressions per minute since the first compression
    pub actual_rate: f32,
    pub smoothed_rate: f32,
    pub session_minutes: f32,
    pub rate_tier: RateTier,
    /// RGBA for the live rate readout
    pub rate_tier_color: [f32; 4],
}

impl FeedbackSnapshot {
    /// Readout before anything has happened
    pub fn empty(warmup_target: u32) -> Self {
        Self {
            compressions: 0,
            warmup_target,
            phase: FeedbackPhase::WarmUp {
                count: 0,
                target: warmup_target,
            },
            quality: None,
            actual_rate: 0.0,
            smoothed_rate: 0.0,
            session_minutes: 0.0,
            rate_tier: RateTier::NoData,
            rate_tier_color: RateTier::NoData.color(),
        }
    }

    pub fn is_warmed_up(&self) -> bool {
        matches!(self.phase, FeedbackPhase::Stats { .. })
    }

    /// Headline text for the panel
    pub fn headline(&self) -> String {
        match self.phase {
            FeedbackPhase::WarmUp { count, target } => format!("Compressions: {}/{}", count, target),
            FeedbackPhase::Stats { avg_rate, avg_depth } => {
                format!("Rate: {:.0} BPM | Depth: {:.1} cm", avg_rate, avg_depth * 100.0)
            }
        }
    }
}

// ============================================================================
// RESULTS SNAPSHOT
// ============================================================================

/// End-of-session summary, produced once
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsSnapshot {
    pub compressions: u32,
    pub average_rate: f32,
    pub average_depth: f32,
    pub score: f32,
    pub grade: QualityGrade,
    pub grade_label: &'static str,
}

impl ResultsSnapshot {
    pub fn new(compressions: u32, average_rate: f32, average_depth: f32, quality: QualityResult) -> Self {
        Self {
            compressions,
            average_rate,
            average_depth,
            score: quality.score,
            grade: quality.grade,
            grade_label: quality.label,
        }
    }

    pub fn avg_depth_cm(&self) -> f32 {
        self.average_depth * 100.0
    }

    /// "12 comps, 104 BPM, 5.1 cm, GOOD 82%"
    pub fn summary(&self) -> String {
        format!(
            "{} comps, {:.0} BPM, {:.1} cm, {} {:.0}%",
            self.compressions,
            self.average_rate,
            self.avg_depth_cm(),
            self.grade_label,
            self.score
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_prefers_current_rate() {
        let pulse = HeartbeatPulse::new(0.05, 120.0, 90.0, 100.0);
        assert!((pulse.speed - 1.2).abs() < 1e-6);
        assert_eq!(pulse.depth, 0.05);
    }

    #[test]
    fn test_pulse_falls_back() {
        let smoothed = HeartbeatPulse::new(0.05, 0.0, 90.0, 100.0);
        assert!((smoothed.speed - 0.9).abs() < 1e-6);

        let ideal = HeartbeatPulse::new(0.05, 0.0, 0.0, 100.0);
        assert_eq!(ideal.speed, 1.0);
    }

    #[test]
    fn test_pulse_speed_clamped() {
        assert_eq!(HeartbeatPulse::new(0.05, 400.0, 0.0, 100.0).speed, MAX_PULSE_SPEED);
        assert_eq!(HeartbeatPulse::new(0.05, 10.0, 0.0, 100.0).speed, MIN_PULSE_SPEED);
        // Ideal below 1 BPM is treated as 1
        assert_eq!(HeartbeatPulse::new(0.05, 1.5, 0.0, 0.2).speed, 1.5);
    }

    #[test]
    fn test_summary_text() {
        let snapshot = ResultsSnapshot::new(12, 104.2, 0.051, QualityResult::from_score(82.0));
        assert!((snapshot.avg_depth_cm() - 5.1).abs() < 1e-4);
        assert_eq!(snapshot.summary(), "12 comps, 104 BPM, 5.1 cm, GOOD 82%");
    }

    #[test]
    fn test_feedback_headline() {
        let empty = FeedbackSnapshot::empty(20);
        assert!(!empty.is_warmed_up());
        assert_eq!(empty.headline(), "Compressions: 0/20");

        let stats = FeedbackSnapshot {
            phase: FeedbackPhase::Stats {
                avg_rate: 101.0,
                avg_depth: 0.052,
            },
            ..empty
        };
        assert!(stats.is_warmed_up());
        assert_eq!(stats.headline(), "Rate: 101 BPM | Depth: 5.2 cm");
    }
}
