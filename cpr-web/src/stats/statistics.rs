//! Compression statistics - running and windowed averages
//!
//! Rates are not computed here. The caller derives them from the time
//! between completed compressions and passes 0 when no rate is available;
//! non-positive rates are ignored by every rate aggregate.
//!
//! Every getter is a pure read and returns 0 before any data exists.

use crate::config::StatisticsConfig;
use super::window::RateWindow;

/// Accumulates per-compression depth and rate samples
#[derive(Clone, Debug)]
pub struct CompressionStatistics {
    compression_count: u32,

    depth_sum: f64,
    depth_count: u32,

    rate_sum: f64,
    rate_count: u32,
    /// Last positive rate recorded
    current_rate: f32,
    window: RateWindow,

    /// Session clock at the first recorded compression (latched once)
    session_start: Option<f64>,
}

impl CompressionStatistics {
    pub fn new(config: &StatisticsConfig) -> Self {
        Self {
            compression_count: 0,
            depth_sum: 0.0,
            depth_count: 0,
            rate_sum: 0.0,
            rate_count: 0,
            current_rate: 0.0,
            window: RateWindow::new(config.rate_window),
            session_start: None,
        }
    }

    /// Fold one completed compression in.
    ///
    /// - `depth`: peak depth in meters
    /// - `rate`: BPM derived by the caller, 0 when not measurable
    /// - `now`: session clock in seconds
    pub fn record_compression(&mut self, depth: f32, rate: f32, now: f64) {
        // Detector peaks are always finite. A non-finite depth from another
        // caller drops the whole sample, count included, so the depth
        // average stays sum / count over real samples.
        if !depth.is_finite() {
            log::warn!("ignoring compression with non-finite depth");
            return;
        }

        if self.session_start.is_none() {
            self.session_start = Some(now);
        }

        self.compression_count += 1;
        self.depth_sum += depth as f64;
        self.depth_count += 1;

        if rate.is_finite() && rate > 0.0 {
            self.current_rate = rate;
            self.rate_sum += rate as f64;
            self.rate_count += 1;
            self.window.push(rate);
        }
    }

    pub fn compression_count(&self) -> u32 {
        self.compression_count
    }

    pub fn has_recorded_any_compression(&self) -> bool {
        self.compression_count > 0
    }

    /// Mean of every positive rate recorded
    pub fn average_rate(&self) -> f32 {
        if self.rate_count == 0 {
            0.0
        } else {
            (self.rate_sum / self.rate_count as f64) as f32
        }
    }

    /// Mean peak depth over all compressions (meters)
    pub fn average_depth(&self) -> f32 {
        if self.depth_count == 0 {
            0.0
        } else {
            (self.depth_sum / self.depth_count as f64) as f32
        }
    }

    /// Mean of the last `rate_window` positive rates
    pub fn smoothed_rate(&self) -> f32 {
        self.window.average()
    }

    pub fn current_rate(&self) -> f32 {
        self.current_rate
    }

    /// Compressions per minute over the whole session so far.
    ///
    /// 0 before the first compression or when no time has elapsed.
    pub fn actual_rate_over_time(&self, now: f64) -> f32 {
        let minutes = self.session_duration_minutes(now);
        if self.compression_count == 0 || minutes <= 0.0 {
            return 0.0;
        }
        (self.compression_count as f64 / minutes as f64) as f32
    }

    /// Minutes since the first compression (0 before it)
    pub fn session_duration_minutes(&self, now: f64) -> f32 {
        match self.session_start {
            Some(start) if now > start => ((now - start) / 60.0) as f32,
            _ => 0.0,
        }
    }

    pub fn session_start(&self) -> Option<f64> {
        self.session_start
    }

    pub fn rate_window(&self) -> &RateWindow {
        &self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> CompressionStatistics {
        CompressionStatistics::new(&StatisticsConfig::default())
    }

    #[test]
    fn test_empty_getters_are_zero() {
        let s = stats();
        assert_eq!(s.compression_count(), 0);
        assert_eq!(s.average_rate(), 0.0);
        assert_eq!(s.average_depth(), 0.0);
        assert_eq!(s.smoothed_rate(), 0.0);
        assert_eq!(s.actual_rate_over_time(100.0), 0.0);
        assert_eq!(s.session_duration_minutes(100.0), 0.0);
        assert!(!s.has_recorded_any_compression());
    }

    #[test]
    fn test_zero_rate_counts_depth_only() {
        let mut s = stats();
        s.record_compression(0.05, 0.0, 1.0);
        s.record_compression(0.03, -5.0, 2.0);
        assert_eq!(s.compression_count(), 2);
        assert!((s.average_depth() - 0.04).abs() < 1e-6);
        assert_eq!(s.average_rate(), 0.0);
        assert!(s.rate_window().is_empty());
    }

    #[test]
    fn test_session_start_latches_once() {
        let mut s = stats();
        s.record_compression(0.05, 0.0, 3.0);
        s.record_compression(0.05, 0.0, 9.0);
        assert_eq!(s.session_start(), Some(3.0));
    }

    #[test]
    fn test_rate_over_time() {
        let mut s = stats();
        for i in 0..10 {
            s.record_compression(0.05, 100.0, i as f64 * 0.6);
        }
        // 10 compressions over 0.1 minutes measured at t = 6 s
        assert!((s.actual_rate_over_time(6.0) - 100.0).abs() < 1e-3);
        // No elapsed time yet
        assert_eq!(s.actual_rate_over_time(0.0), 0.0);
    }

    #[test]
    fn test_windowed_vs_cumulative() {
        let mut s = stats();
        for rate in [60.0, 60.0, 60.0, 120.0, 120.0, 120.0, 120.0, 120.0] {
            s.record_compression(0.05, rate, 0.0);
        }
        assert!((s.smoothed_rate() - 120.0).abs() < 1e-4);
        assert!((s.average_rate() - 97.5).abs() < 1e-4);
        assert_eq!(s.current_rate(), 120.0);
    }

    #[test]
    fn test_getters_are_pure() {
        let mut s = stats();
        s.record_compression(0.05, 100.0, 0.0);
        s.record_compression(0.055, 104.0, 0.6);
        assert_eq!(s.average_rate(), s.average_rate());
        assert_eq!(s.average_depth(), s.average_depth());
        assert_eq!(s.actual_rate_over_time(5.0), s.actual_rate_over_time(5.0));
        assert_eq!(s.compression_count(), 2);
    }

    #[test]
    fn test_non_finite_input_ignored() {
        let mut s = stats();
        s.record_compression(f32::NAN, 100.0, 0.0);
        assert_eq!(s.compression_count(), 0);
        assert!(s.session_start().is_none());
        assert!(s.rate_window().is_empty());
        s.record_compression(0.05, f32::INFINITY, 0.0);
        assert_eq!(s.compression_count(), 1);
        assert_eq!(s.average_rate(), 0.0);
    }
}
