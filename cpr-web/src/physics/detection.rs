//! Compression detection - press/release state machine with hysteresis
//!
//! Entry needs stacked hands inside the zone; exit needs the gate to drop,
//! not the depth to return to zero. Hands bouncing slightly above the start
//! height mid-compression therefore keep the press alive.

use nalgebra::{Point3, Unit, Vector3};

use crate::config::DetectorConfig;
use super::spring::ChestSpring;
use super::zone::ZoneReading;

/// Detector phase
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PressPhase {
    Idle,
    Pressing,
}

impl PressPhase {
    pub fn name(&self) -> &'static str {
        match self {
            PressPhase::Idle => "IDLE",
            PressPhase::Pressing => "PRESSING",
        }
    }
}

/// One completed press-and-release
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CompressionEvent {
    /// Peak hand depth reached during the press (meters)
    pub depth: f32,
    /// Session clock when the hands left the zone (seconds)
    pub timestamp: f64,
}

/// Tracks a full press cycle and drives the chest spring while pressing
pub struct CompressionDetector {
    /// Presses shallower than this are noise
    min_depth_to_count: f32,
    /// Depth is measured along this axis
    up: Unit<Vector3<f32>>,

    tracking: bool,
    /// Hand height when the press started
    start_reference: f32,
    /// Deepest point of the current press (never decreases within a press)
    peak_depth: f32,
    /// Depth on the last pressing frame
    current_depth: f32,
}

impl CompressionDetector {
    pub fn new(config: &DetectorConfig, up: Unit<Vector3<f32>>) -> Self {
        Self {
            min_depth_to_count: config.min_depth_to_count,
            up,
            tracking: false,
            start_reference: 0.0,
            peak_depth: 0.0,
            current_depth: 0.0,
        }
    }

    fn height(&self, point: &Point3<f32>) -> f32 {
        self.up.dot(&point.coords)
    }

    /// Feed one detection frame.
    ///
    /// While pressing, pulls the spring towards the hands. Returns an event
    /// on the frame the gate drops, if the press was deep enough.
    pub fn update(
        &mut self,
        reading: &ZoneReading,
        spring: &mut ChestSpring,
        dt: f32,
        now: f64,
    ) -> Option<CompressionEvent> {
        if reading.in_zone {
            let height = self.height(&reading.centroid);

            if !self.tracking {
                self.tracking = true;
                self.start_reference = height;
                self.peak_depth = 0.0;
            }

            // Positive = pushing down
            let depth = self.start_reference - height;
            self.current_depth = depth;
            if depth > self.peak_depth {
                self.peak_depth = depth;
            }

            if depth > 0.0 {
                spring.inject_force(depth.clamp(0.0, spring.max_compression()), dt);
            }

            return None;
        }

        if !self.tracking {
            return None;
        }

        let peak = self.peak_depth;
        self.clear();

        if peak >= self.min_depth_to_count {
            Some(CompressionEvent {
                depth: peak,
                timestamp: now,
            })
        } else {
            log::trace!("press discarded: peak {:.4} m below noise floor", peak);
            None
        }
    }

    fn clear(&mut self) {
        self.tracking = false;
        self.start_reference = 0.0;
        self.peak_depth = 0.0;
        self.current_depth = 0.0;
    }

    pub fn phase(&self) -> PressPhase {
        if self.tracking {
            PressPhase::Pressing
        } else {
            PressPhase::Idle
        }
    }

    pub fn is_pressing(&self) -> bool {
        self.tracking
    }

    /// Deepest point of the press in progress (0 when idle)
    pub fn peak_depth(&self) -> f32 {
        self.peak_depth
    }

    /// Depth on the latest pressing frame (0 when idle)
    pub fn current_depth(&self) -> f32 {
        self.current_depth
    }

    /// Drop any press in progress without emitting
    pub fn reset(&mut self) {
        self.clear();
    }
}
