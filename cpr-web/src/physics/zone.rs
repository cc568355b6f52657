//! Compression zone - where a press counts as a compression attempt
//!
//! Containment is a closest-point query, not bounding-box containment, so
//! rotated and non-box zones behave correctly.

use nalgebra::{Point3, UnitQuaternion, Vector3};

use crate::config::ZoneConfig;
use super::state::HandSample;

/// A queryable 3D region
pub trait CompressionZone {
    /// Closest point of the region to `point` (the point itself when inside)
    fn closest_point(&self, point: &Point3<f32>) -> Point3<f32>;

    /// Distance from `point` to the region (0 inside)
    fn distance_to(&self, point: &Point3<f32>) -> f32 {
        nalgebra::distance(&self.closest_point(point), point)
    }
}

/// Oriented box (the chest plate)
#[derive(Clone, Debug, PartialEq)]
pub struct BoxZone {
    pub center: Point3<f32>,
    pub half_extents: Vector3<f32>,
    pub rotation: UnitQuaternion<f32>,
}

impl BoxZone {
    /// Axis-aligned box from center and full size
    pub fn new(center: Point3<f32>, size: Vector3<f32>) -> Self {
        Self {
            center,
            half_extents: size.abs() * 0.5,
            rotation: UnitQuaternion::identity(),
        }
    }

    pub fn with_rotation(mut self, rotation: UnitQuaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }
}

impl CompressionZone for BoxZone {
    fn closest_point(&self, point: &Point3<f32>) -> Point3<f32> {
        // Work in box space, clamp per axis, map back
        let local = self.rotation.inverse_transform_vector(&(point - self.center));
        let clamped = Vector3::new(
            local.x.clamp(-self.half_extents.x, self.half_extents.x),
            local.y.clamp(-self.half_extents.y, self.half_extents.y),
            local.z.clamp(-self.half_extents.z, self.half_extents.z),
        );
        self.center + self.rotation.transform_vector(&clamped)
    }
}

/// Sphere (the chest trigger)
#[derive(Clone, Debug, PartialEq)]
pub struct SphereZone {
    pub center: Point3<f32>,
    pub radius: f32,
}

impl SphereZone {
    pub fn new(center: Point3<f32>, radius: f32) -> Self {
        Self {
            center,
            radius: radius.abs(),
        }
    }
}

impl CompressionZone for SphereZone {
    fn closest_point(&self, point: &Point3<f32>) -> Point3<f32> {
        let offset = point - self.center;
        let dist = offset.norm();
        if dist <= self.radius {
            *point
        } else {
            self.center + offset * (self.radius / dist)
        }
    }
}

// ============================================================================
// TRACKER
// ============================================================================

/// Entry/exit of the composite gate, for the hands-pose visual swap
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoseEdge {
    Entered,
    Exited,
}

/// Result of one zone update
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoneReading {
    pub centroid: Point3<f32>,
    pub overlapping: bool,
    pub in_region: bool,
    /// Hands stacked AND inside the region: the "may compress" gate
    pub in_zone: bool,
    pub edge: Option<PoseEdge>,
}

/// Decides whether the stacked hands are on the chest
pub struct CompressionZoneTracker {
    zone: Box<dyn CompressionZone>,
    overlap_distance: f32,
    epsilon: f32,
    /// Gate value on the previous update (edge detection only)
    was_active: bool,
}

impl CompressionZoneTracker {
    pub fn new(zone: Box<dyn CompressionZone>, config: &ZoneConfig) -> Self {
        Self {
            zone,
            overlap_distance: config.overlap_distance,
            epsilon: config.containment_epsilon,
            was_active: false,
        }
    }

    /// Evaluate the gate for this frame's hands
    pub fn update(&mut self, hands: &HandSample) -> ZoneReading {
        let centroid = hands.centroid();
        let overlapping = hands.overlaps(self.overlap_distance);
        let in_region = self.contains(&centroid);
        let in_zone = overlapping && in_region;

        let edge = match (self.was_active, in_zone) {
            (false, true) => Some(PoseEdge::Entered),
            (true, false) => Some(PoseEdge::Exited),
            _ => None,
        };
        self.was_active = in_zone;

        ZoneReading {
            centroid,
            overlapping,
            in_region,
            in_zone,
            edge,
        }
    }

    /// Closest-point containment test; NaN input is never contained
    pub fn contains(&self, point: &Point3<f32>) -> bool {
        self.zone.distance_to(point) <= self.epsilon
    }

    /// Gate value from the last update
    pub fn is_active(&self) -> bool {
        self.was_active
    }

    pub fn reset(&mut self) {
        self.was_active = false;
    }
}
