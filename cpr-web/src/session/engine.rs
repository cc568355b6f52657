//! Session engine - one training session from first frame to results
//!
//! Owns every component and drives them in a fixed order:
//! 1. `frame()` per rendered frame: zone gate, press detection, rate
//!    derivation, statistics, throttled feedback.
//! 2. `fixed_tick()` / `advance_physics()` on the physics clock: chest spring.
//!
//! Both run on the caller's thread, one after the other. Identical input
//! sequences reproduce identical events and spring trajectories.

use log::{debug, info};
use nalgebra::{Point3, Vector3};

use crate::config::{ConfigError, EngineConfig};
use crate::physics::{
    ChestSpring, CompressionDetector, CompressionEvent, CompressionZone, CompressionZoneTracker,
    HandSample, PressPhase, ZoneReading,
};
use crate::scoring::{DepthVerdict, QualityResult, QualityScorer, RateTier, RateVerdict};
use crate::stats::CompressionStatistics;

use super::clock::FixedStepClock;
use super::output::{
    CompletedCompression, FeedbackPhase, FeedbackSnapshot, HeartbeatPulse, ResultsSnapshot,
};

/// Result of one detection frame
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameOutcome {
    pub reading: ZoneReading,
    pub completed: Option<CompletedCompression>,
}

/// Orchestrates one CPR training session
pub struct SessionEngine {
    config: EngineConfig,

    tracker: CompressionZoneTracker,
    spring: ChestSpring,
    detector: CompressionDetector,
    statistics: CompressionStatistics,
    scorer: QualityScorer,
    physics_clock: FixedStepClock,

    /// Session clock: sum of valid frame dts (seconds)
    now: f64,
    last_compression_time: Option<f64>,
    compression_just_completed: bool,
    last_pulse: Option<HeartbeatPulse>,
    last_reading: Option<ZoneReading>,

    feedback: FeedbackSnapshot,
    next_feedback_at: f64,

    finished: bool,
}

impl SessionEngine {
    /// Validate the config and build a session around `zone`.
    ///
    /// `chest_rest` is the chest plate's world position at rest.
    pub fn new(
        config: EngineConfig,
        zone: Box<dyn CompressionZone>,
        chest_rest: Point3<f32>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let spring = ChestSpring::new(chest_rest, &config.spring);
        let detector = CompressionDetector::new(&config.detector, spring.up_axis());

        Ok(Self {
            tracker: CompressionZoneTracker::new(zone, &config.zone),
            spring,
            detector,
            statistics: CompressionStatistics::new(&config.statistics),
            scorer: QualityScorer::new(config.scoring.clone()),
            physics_clock: FixedStepClock::new(
                config.session.fixed_step,
                config.session.max_fixed_steps_per_frame,
            ),
            now: 0.0,
            last_compression_time: None,
            compression_just_completed: false,
            last_pulse: None,
            last_reading: None,
            feedback: FeedbackSnapshot::empty(config.session.warmup_compressions),
            next_feedback_at: 0.0,
            finished: false,
            config,
        })
    }

    // ========================================================================
    // TICKS
    // ========================================================================

    /// Run one detection frame.
    ///
    /// Invalid `dt` (<= 0 or non-finite) does not advance the session clock
    /// but the gate is still evaluated, so a release is never lost. Ignored
    /// entirely once the session has ended.
    pub fn frame(&mut self, hands: &HandSample, dt: f32) -> FrameOutcome {
        self.compression_just_completed = false;

        let dt = if dt > 0.0 && dt.is_finite() { dt } else { 0.0 };
        if self.finished {
            return FrameOutcome {
                reading: self.idle_reading(hands),
                completed: None,
            };
        }

        self.now += dt as f64;

        let reading = self.tracker.update(hands);
        let event = self.detector.update(&reading, &mut self.spring, dt, self.now);
        self.last_reading = Some(reading);

        let completed = match event {
            Some(event) => {
                let rate = self.derive_rate(event.timestamp);
                self.last_compression_time = Some(event.timestamp);
                self.record(event, rate)
            }
            None => None,
        };
        self.compression_just_completed = completed.is_some();

        if self.now >= self.next_feedback_at {
            self.next_feedback_at = self.now + self.config.session.feedback_interval;
            self.refresh_feedback();
        }

        FrameOutcome { reading, completed }
    }

    /// Integrate the chest spring by one fixed step
    pub fn fixed_tick(&mut self) {
        if self.finished {
            return;
        }
        self.spring.advance(self.config.session.fixed_step);
    }

    /// Pay wall time into the physics clock and run the steps it owes.
    ///
    /// Returns the number of fixed ticks run.
    pub fn advance_physics(&mut self, frame_dt: f32) -> u32 {
        if self.finished {
            return 0;
        }
        let steps = self.physics_clock.accumulate(frame_dt);
        for _ in 0..steps {
            self.fixed_tick();
        }
        steps
    }

    // ========================================================================
    // COMPRESSION BOOKKEEPING
    // ========================================================================

    /// BPM from the interval since the previous compression.
    ///
    /// 0 during warm-up, for the first compression and for intervals too
    /// short to be real presses.
    fn derive_rate(&self, timestamp: f64) -> f32 {
        let session = &self.config.session;
        if self.statistics.compression_count() < session.warmup_compressions {
            return 0.0;
        }

        match self.last_compression_time {
            Some(last) => {
                let interval = timestamp - last;
                if interval > session.min_compression_interval && interval > 0.0 {
                    (60.0 / interval) as f32
                } else {
                    0.0
                }
            }
            None => 0.0,
        }
    }

    fn record(
        &mut self,
        event: CompressionEvent,
        rate: f32,
    ) -> Option<CompletedCompression> {
        let before = self.statistics.compression_count();
        self.statistics.record_compression(event.depth, rate, event.timestamp);
        let count = self.statistics.compression_count();
        if count == before {
            return None;
        }

        if count == 1 {
            info!("session started at t={:.2}s", event.timestamp);
        }

        let pulse = HeartbeatPulse::new(
            event.depth,
            rate,
            self.statistics.smoothed_rate(),
            self.config.session.ideal_rate,
        );
        self.last_pulse = Some(pulse);

        let scoring = &self.config.scoring;
        let depth_verdict = DepthVerdict::classify(event.depth, &scoring.depth);
        let rate_verdict = RateVerdict::classify(rate, &scoring.rate);
        debug!(
            "compression #{}: {:.1} cm {} | {:.0} BPM {}",
            count,
            event.depth * 100.0,
            depth_verdict.label(),
            rate,
            rate_verdict.label()
        );

        if count == self.config.session.warmup_compressions {
            info!("warm-up complete after {} compressions", count);
        }

        Some(CompletedCompression {
            event,
            rate,
            count,
            pulse,
            depth_verdict,
            rate_verdict,
        })
    }

    fn refresh_feedback(&mut self) {
        let stats = &self.statistics;
        let count = stats.compression_count();
        let target = self.config.session.warmup_compressions;
        let warmed_up = count >= target && count > 0;

        let (phase, quality) = if warmed_up {
            let avg_rate = stats.average_rate();
            let avg_depth = stats.average_depth();
            (
                FeedbackPhase::Stats { avg_rate, avg_depth },
                Some(self.scorer.score(avg_rate, avg_depth)),
            )
        } else {
            (FeedbackPhase::WarmUp { count, target }, None)
        };

        let actual_rate = stats.actual_rate_over_time(self.now);
        let rate_tier = RateTier::classify(actual_rate, &self.config.scoring.rate);
        self.feedback = FeedbackSnapshot {
            compressions: count,
            warmup_target: target,
            phase,
            quality,
            actual_rate,
            smoothed_rate: stats.smoothed_rate(),
            session_minutes: stats.session_duration_minutes(self.now),
            rate_tier,
            rate_tier_color: rate_tier.color(),
        };
    }

    fn idle_reading(&self, hands: &HandSample) -> ZoneReading {
        ZoneReading {
            centroid: hands.centroid(),
            overlapping: false,
            in_region: false,
            in_zone: false,
            edge: None,
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Close the session and produce its results.
    ///
    /// Returns `Some` exactly once; later calls return `None`.
    pub fn end_session(&mut self) -> Option<ResultsSnapshot> {
        if self.finished {
            return None;
        }
        self.finished = true;
        self.compression_just_completed = false;
        self.refresh_feedback();

        let snapshot = ResultsSnapshot::new(
            self.statistics.compression_count(),
            self.statistics.average_rate(),
            self.statistics.average_depth(),
            self.current_quality(),
        );
        info!("session ended: {}", snapshot.summary());
        Some(snapshot)
    }

    /// Start a fresh session with the same configuration and zone
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.spring.reset();
        self.detector.reset();
        self.statistics = CompressionStatistics::new(&self.config.statistics);
        self.physics_clock.reset();
        self.now = 0.0;
        self.last_compression_time = None;
        self.compression_just_completed = false;
        self.last_pulse = None;
        self.last_reading = None;
        self.feedback = FeedbackSnapshot::empty(self.config.session.warmup_compressions);
        self.next_feedback_at = 0.0;
        self.finished = false;
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// Latest throttled readout
    pub fn feedback(&self) -> &FeedbackSnapshot {
        &self.feedback
    }

    /// Score of the current statistics, computed now (ignores the throttle)
    pub fn current_quality(&self) -> QualityResult {
        self.scorer
            .score(self.statistics.average_rate(), self.statistics.average_depth())
    }

    pub fn compression_just_completed(&self) -> bool {
        self.compression_just_completed
    }

    pub fn has_recorded_any_compression(&self) -> bool {
        self.statistics.has_recorded_any_compression()
    }

    pub fn last_pulse(&self) -> Option<HeartbeatPulse> {
        self.last_pulse
    }

    pub fn last_reading(&self) -> Option<ZoneReading> {
        self.last_reading
    }

    /// Offset to apply to anything riding the chest
    pub fn chest_world_offset(&self) -> Vector3<f32> {
        self.spring.world_offset()
    }

    /// Chest plate position at rest (world)
    pub fn chest_rest_position(&self) -> Point3<f32> {
        self.spring.rest_position()
    }

    pub fn chest_displacement(&self) -> f32 {
        self.spring.displacement()
    }

    pub fn phase(&self) -> PressPhase {
        self.detector.phase()
    }

    pub fn current_depth(&self) -> f32 {
        self.detector.current_depth()
    }

    /// Fraction of a physics step left over, for render interpolation
    pub fn physics_alpha(&self) -> f32 {
        self.physics_clock.alpha()
    }

    pub fn statistics(&self) -> &CompressionStatistics {
        &self.statistics
    }

    pub fn spring(&self) -> &ChestSpring {
        &self.spring
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Session clock (seconds of valid frame time)
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::{BoxZone, PoseEdge, SphereZone};

    const DT: f32 = 1.0 / 60.0;

    fn engine(config: EngineConfig) -> SessionEngine {
        let zone = BoxZone::new(Point3::new(0.0, 1.0, 0.0), Vector3::new(0.3, 0.3, 0.3));
        SessionEngine::new(config, Box::new(zone), Point3::new(0.0, 1.0, 0.0)).unwrap()
    }

    fn stacked(y: f32) -> HandSample {
        HandSample::from_arrays([0.0, y, 0.0], [0.01, y, 0.0])
    }

    fn apart() -> HandSample {
        HandSample::from_arrays([-0.4, 1.1, 0.0], [0.4, 1.1, 0.0])
    }

    /// Press from 1.10 down by `depth` over 10 frames, then release
    fn press(engine: &mut SessionEngine, depth: f32) -> Option<CompletedCompression> {
        for i in 0..=10 {
            engine.frame(&stacked(1.1 - depth * i as f32 / 10.0), DT);
            engine.fixed_tick();
        }
        engine.frame(&apart(), DT).completed
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.spring.stiffness = 0.0;
        let zone = SphereZone::new(Point3::origin(), 0.2);
        assert!(SessionEngine::new(config, Box::new(zone), Point3::origin()).is_err());
    }

    #[test]
    fn test_single_press_counts() {
        let mut e = engine(EngineConfig::default());
        let done = press(&mut e, 0.05).expect("press should count");

        assert!((done.event.depth - 0.05).abs() < 1e-4);
        assert_eq!(done.count, 1);
        assert_eq!(done.rate, 0.0);
        assert_eq!(done.rate_verdict, RateVerdict::Unknown);
        assert_eq!(done.depth_verdict, DepthVerdict::Good);
        assert!(e.compression_just_completed());
        assert!(e.has_recorded_any_compression());

        // Flag is per frame
        e.frame(&apart(), DT);
        assert!(!e.compression_just_completed());
    }

    #[test]
    fn test_pose_edges_reported() {
        let mut e = engine(EngineConfig::default());
        assert_eq!(e.frame(&stacked(1.1), DT).reading.edge, Some(PoseEdge::Entered));
        assert_eq!(e.frame(&stacked(1.09), DT).reading.edge, None);
        assert_eq!(e.frame(&apart(), DT).reading.edge, Some(PoseEdge::Exited));
    }

    #[test]
    fn test_rate_after_warmup() {
        let mut config = EngineConfig::default();
        config.session.warmup_compressions = 2;
        let mut e = engine(config);

        // Each press takes 12 frames at 60 Hz = 0.2 s
        assert_eq!(press(&mut e, 0.05).map(|c| c.rate), Some(0.0));
        assert_eq!(press(&mut e, 0.05).map(|c| c.rate), Some(0.0));
        let third = press(&mut e, 0.05).expect("third press");
        assert!((third.rate - 300.0).abs() < 0.5, "rate {}", third.rate);
        assert_eq!(third.rate_verdict, RateVerdict::TooFast);
    }

    #[test]
    fn test_verdicts_follow_configured_bands() {
        let mut config = EngineConfig::default();
        config.session.warmup_compressions = 2;
        config.scoring.rate.perfect_min = 290.0;
        config.scoring.rate.perfect_max = 310.0;
        config.scoring.rate.ok_min = 280.0;
        config.scoring.rate.ok_max = 320.0;
        config.scoring.depth.perfect_max = 0.045;
        config.scoring.depth.ok_max = 0.05;
        let mut e = engine(config);

        press(&mut e, 0.05);
        press(&mut e, 0.05);
        let third = press(&mut e, 0.05).expect("third press");
        // 300 BPM is too fast by default, in target here
        assert_eq!(third.rate_verdict, RateVerdict::Good);
        assert_eq!(third.depth_verdict, DepthVerdict::TooDeep);
    }

    #[test]
    fn test_short_interval_yields_no_rate() {
        let mut config = EngineConfig::default();
        config.session.warmup_compressions = 0;
        config.session.min_compression_interval = 1.0;
        let mut e = engine(config);

        press(&mut e, 0.05);
        let second = press(&mut e, 0.05).expect("second press");
        assert_eq!(second.rate, 0.0);
        assert_eq!(e.statistics().average_rate(), 0.0);
    }

    #[test]
    fn test_spring_moves_and_offset_follows() {
        let mut e = engine(EngineConfig::default());
        for i in 0..=10 {
            e.frame(&stacked(1.1 - 0.005 * i as f32), DT);
            e.fixed_tick();
        }
        let d = e.chest_displacement();
        assert!(d > 0.0 && d <= e.config().spring.max_compression);
        assert!((e.chest_world_offset().y + d).abs() < 1e-6);
        assert_eq!(e.chest_rest_position(), Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_advance_physics_runs_fixed_steps() {
        let mut e = engine(EngineConfig::default());
        // 1/50 s steps: 0.05 s pays two
        assert_eq!(e.advance_physics(0.05), 2);
        assert!((e.physics_alpha() - 0.5).abs() < 1e-3);
        assert_eq!(e.advance_physics(10.0), e.config().session.max_fixed_steps_per_frame);
        assert_eq!(e.physics_alpha(), 0.0);
    }

    #[test]
    fn test_feedback_is_throttled() {
        let mut config = EngineConfig::default();
        config.session.warmup_compressions = 1;
        let mut e = engine(config);

        press(&mut e, 0.05);
        // Only the first frame refreshed so far; the press took 0.2 s < 0.25 s
        assert_eq!(e.feedback().compressions, 0);

        for _ in 0..15 {
            e.frame(&apart(), DT);
        }
        let fb = e.feedback();
        assert_eq!(fb.compressions, 1);
        assert!(fb.is_warmed_up());
        let quality = fb.quality.expect("quality after warm-up");
        assert_eq!(quality.color, quality.grade.color());
        assert_eq!(fb.rate_tier_color, fb.rate_tier.color());
    }

    #[test]
    fn test_end_session_once() {
        let mut e = engine(EngineConfig::default());
        press(&mut e, 0.05);

        let results = e.end_session().expect("first end yields results");
        assert_eq!(results.compressions, 1);
        assert!(e.end_session().is_none());

        // Frames after the end change nothing
        assert!(press(&mut e, 0.05).is_none());
        assert_eq!(e.statistics().compression_count(), 1);
        e.fixed_tick();
        assert_eq!(e.advance_physics(1.0), 0);
    }

    #[test]
    fn test_reset_starts_fresh() {
        let mut e = engine(EngineConfig::default());
        press(&mut e, 0.05);
        e.end_session();
        e.reset();

        assert!(!e.is_finished());
        assert!(!e.has_recorded_any_compression());
        assert_eq!(e.now(), 0.0);
        assert_eq!(e.chest_displacement(), 0.0);
        assert!(press(&mut e, 0.05).is_some());
    }

    #[test]
    fn test_invalid_dt_keeps_clock() {
        let mut e = engine(EngineConfig::default());
        e.frame(&apart(), f32::NAN);
        e.frame(&apart(), -1.0);
        assert_eq!(e.now(), 0.0);
        e.frame(&apart(), DT);
        assert!((e.now() - DT as f64).abs() < 1e-9);
    }
}
