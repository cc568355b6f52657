//! Performance metrics and session state for the debug overlay
//!
//! Frame timing is reported by JS each frame and smoothed here; the session
//! half of the overlay is read straight from the engine.

use wasm_bindgen::prelude::*;
use std::cell::RefCell;

use crate::session::SessionEngine;

/// Performance metrics storage
#[derive(Default)]
struct Metrics {
    fps: f32,
    frame_time_ms: f32,
    /// Hand tracking pipeline latency (XR input to frame())
    tracking_latency_ms: f32,
}

thread_local! {
    static METRICS: RefCell<Metrics> = RefCell::new(Metrics::default());
}

/// Exponential moving average for smooth display
fn ema(previous: f32, sample: f32) -> f32 {
    previous * 0.9 + sample * 0.1
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Set frame timing (called from JS each frame)
#[wasm_bindgen(js_name = setFrameMetrics)]
pub fn set_frame_metrics(fps: f32, frame_time_ms: f32) {
    // Ignore invalid times (tab backgrounded or first frame)
    if !(1.0..=200.0).contains(&frame_time_ms) {
        return;
    }

    METRICS.with(|m| {
        let mut metrics = m.borrow_mut();
        metrics.fps = ema(metrics.fps, fps);
        metrics.frame_time_ms = ema(metrics.frame_time_ms, frame_time_ms);
    });
}

/// Set hand tracking latency
#[wasm_bindgen(js_name = setTrackingLatency)]
pub fn set_tracking_latency(ms: f32) {
    if !ms.is_finite() || ms < 0.0 {
        return;
    }
    METRICS.with(|m| {
        let mut metrics = m.borrow_mut();
        metrics.tracking_latency_ms = ema(metrics.tracking_latency_ms, ms);
    });
}

/// Timing lines only, for pages without a live session
#[wasm_bindgen(js_name = getDebugOverlayText)]
pub fn get_debug_overlay_text() -> String {
    METRICS.with(|m| timing_text(&m.borrow()))
}

// ============================================================================
// FORMATTING
// ============================================================================

fn timing_text(metrics: &Metrics) -> String {
    format!(
        "FPS: {:.0} | Frame: {:.1}ms | Tracking: {:.0}ms",
        metrics.fps, metrics.frame_time_ms, metrics.tracking_latency_ms
    )
}

/// Timing plus the engine's live state
pub fn overlay_text(engine: &SessionEngine) -> String {
    let timing = METRICS.with(|m| timing_text(&m.borrow()));
    let gate = match engine.last_reading() {
        Some(r) => format!(
            "Stacked: {} | In zone: {}",
            if r.overlapping { "✓" } else { "✗" },
            if r.in_region { "✓" } else { "✗" }
        ),
        None => "Stacked: - | In zone: -".to_string(),
    };
    let stats = engine.statistics();
    let quality = engine.current_quality();
    let recent: Vec<String> = stats
        .rate_window()
        .iter_chronological()
        .map(|rate| format!("{:.0}", rate))
        .collect();
    let recent = if recent.is_empty() {
        "-".to_string()
    } else {
        recent.join(" ")
    };

    format!(
        "{}\n\
         {} | {} {:.1}cm\n\
         Chest: {:.1}cm | Physics α {:.2}\n\
         {}\n\
         #{} | {:.0} BPM (avg {:.0}) | {:.1}cm avg\n\
         Recent: {}\n\
         {}",
        timing,
        gate,
        engine.phase().name(),
        engine.current_depth() * 100.0,
        engine.chest_displacement() * 100.0,
        engine.physics_alpha(),
        engine.feedback().headline(),
        stats.compression_count(),
        stats.smoothed_rate(),
        stats.average_rate(),
        stats.average_depth() * 100.0,
        recent,
        quality.display_text(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::physics::{HandSample, SphereZone};
    use nalgebra::Point3;

    #[test]
    fn test_ema_converges() {
        let mut v = 0.0;
        for _ in 0..200 {
            v = ema(v, 60.0);
        }
        assert!((v - 60.0).abs() < 0.01);
    }

    #[test]
    fn test_invalid_frame_time_ignored() {
        set_frame_metrics(60.0, 500.0);
        METRICS.with(|m| assert_eq!(m.borrow().frame_time_ms, 0.0));
        set_frame_metrics(60.0, 16.0);
        METRICS.with(|m| assert!((m.borrow().frame_time_ms - 1.6).abs() < 1e-4));
    }

    #[test]
    fn test_overlay_shows_headline_and_recent_rates() {
        let mut config = EngineConfig::default();
        config.session.warmup_compressions = 0;
        let zone = SphereZone::new(Point3::new(0.0, 1.0, 0.0), 0.2);
        let mut engine = SessionEngine::new(config, Box::new(zone), Point3::new(0.0, 1.0, 0.0)).unwrap();

        let text = overlay_text(&engine);
        assert!(text.contains("Compressions: 0/0"), "{}", text);
        assert!(text.contains("Recent: -"), "{}", text);

        // Two presses 0.6 s apart: one 100 BPM rate sample
        for _ in 0..2 {
            for i in 0..=10 {
                let y = 1.1 - 0.005 * i as f32;
                engine.frame(&HandSample::from_arrays([0.0, y, 0.0], [0.01, y, 0.0]), 1.0 / 60.0);
            }
            for _ in 0..25 {
                engine.frame(&HandSample::from_arrays([-0.5, 1.1, 0.0], [0.5, 1.1, 0.0]), 1.0 / 60.0);
            }
        }
        let text = overlay_text(&engine);
        assert!(text.contains("Recent: 100"), "{}", text);
        assert!(text.contains("Rate: "), "{}", text);
    }
}
