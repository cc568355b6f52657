//! Hand sample - the per-frame input shared by zone tracking and detection

use nalgebra::Point3;

/// Both tracked hand positions for the current frame (world space, meters)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HandSample {
    pub left: Point3<f32>,
    pub right: Point3<f32>,
}

impl HandSample {
    pub fn new(left: Point3<f32>, right: Point3<f32>) -> Self {
        Self { left, right }
    }

    /// Build from raw `[x, y, z]` triples (bridge input)
    pub fn from_arrays(left: [f32; 3], right: [f32; 3]) -> Self {
        Self::new(Point3::from(left), Point3::from(right))
    }

    /// Midpoint between the hands
    pub fn centroid(&self) -> Point3<f32> {
        nalgebra::center(&self.left, &self.right)
    }

    /// Squared hand separation (avoids the square root)
    pub fn separation_squared(&self) -> f32 {
        nalgebra::distance_squared(&self.left, &self.right)
    }

    /// True when the hands are stacked closer than `threshold`.
    ///
    /// Non-finite positions (lost tracking) and exactly coincident positions
    /// (a tracker feeding the same placeholder for both hands) never overlap.
    pub fn overlaps(&self, threshold: f32) -> bool {
        let d2 = self.separation_squared();
        d2.is_finite() && d2 > 0.0 && d2 < threshold * threshold
    }

    /// Whether every coordinate is a real number
    pub fn is_finite(&self) -> bool {
        self.left.coords.iter().chain(self.right.coords.iter()).all(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_is_midpoint() {
        let sample = HandSample::from_arrays([0.0, 1.0, 0.0], [0.1, 0.9, 0.2]);
        let c = sample.centroid();
        assert!((c.x - 0.05).abs() < 1e-6);
        assert!((c.y - 0.95).abs() < 1e-6);
        assert!((c.z - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_overlap_threshold() {
        let close = HandSample::from_arrays([0.0, 0.0, 0.0], [0.1, 0.0, 0.0]);
        let apart = HandSample::from_arrays([0.0, 0.0, 0.0], [0.2, 0.0, 0.0]);
        assert!(close.overlaps(0.15));
        assert!(!apart.overlaps(0.15));
    }

    #[test]
    fn test_identical_positions_are_no_input() {
        let placeholder = HandSample::from_arrays([0.0, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert!(!placeholder.overlaps(0.15));
    }

    #[test]
    fn test_lost_tracking_never_overlaps() {
        let lost = HandSample::from_arrays([f32::NAN, 0.0, 0.0], [0.0, 0.0, 0.0]);
        assert!(!lost.overlaps(0.15));
        assert!(!lost.is_finite());
    }
}
