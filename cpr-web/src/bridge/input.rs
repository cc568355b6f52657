//! Input decoding - hand positions and zone descriptions from JavaScript
//!
//! Hand positions arrive as plain `Float32Array`s of 3 values (x, y, z in
//! meters, world space). Zone descriptions arrive as JS objects:
//!
//! ```js
//! { kind: "box", center: [0, 0.9, 0.4], size: [0.3, 0.1, 0.3], rotation: [0, 0, 0, 1] }
//! { kind: "sphere", center: [0, 0.9, 0.4], radius: 0.15 }
//! ```

use nalgebra::{Point3, Quaternion, UnitQuaternion, Vector3};
use serde::Deserialize;

use crate::physics::{BoxZone, CompressionZone, HandSample, SphereZone};

// ============================================================================
// HAND POSITIONS
// ============================================================================

/// Build a hand sample from two xyz arrays, or warn and skip the frame
pub fn read_hands(left: &[f32], right: &[f32]) -> Option<HandSample> {
    match (to_xyz(left), to_xyz(right)) {
        (Some(l), Some(r)) => Some(HandSample::from_arrays(l, r)),
        _ => {
            web_sys::console::warn_1(
                &format!(
                    "Invalid hand data length: left {} / right {} (expected 3)",
                    left.len(),
                    right.len()
                )
                .into(),
            );
            None
        }
    }
}

fn to_xyz(data: &[f32]) -> Option<[f32; 3]> {
    match data {
        [x, y, z] => Some([*x, *y, *z]),
        _ => None,
    }
}

// ============================================================================
// ZONE DESCRIPTIONS
// ============================================================================

/// Compression zone shape as described by JS
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ZoneDesc {
    Box {
        center: [f32; 3],
        size: [f32; 3],
        /// Quaternion as [x, y, z, w]
        #[serde(default)]
        rotation: Option<[f32; 4]>,
    },
    Sphere {
        center: [f32; 3],
        radius: f32,
    },
}

impl ZoneDesc {
    /// Build the zone, rejecting shapes that could never contain anything
    pub fn build(&self) -> Result<Box<dyn CompressionZone>, String> {
        match self {
            ZoneDesc::Box {
                center,
                size,
                rotation,
            } => {
                if !size.iter().all(|s| s.is_finite() && *s >= 0.0) || !all_finite(center) {
                    return Err(format!("invalid box zone: center {:?}, size {:?}", center, size));
                }
                let mut zone = BoxZone::new(Point3::from(*center), Vector3::from(*size));
                if let Some([x, y, z, w]) = rotation {
                    let q = Quaternion::new(*w, *x, *y, *z);
                    if !all_finite(&[*x, *y, *z, *w]) || q.norm() < 1e-6 {
                        return Err(format!("invalid box rotation: {:?}", rotation));
                    }
                    zone = zone.with_rotation(UnitQuaternion::from_quaternion(q));
                }
                Ok(Box::new(zone))
            }
            ZoneDesc::Sphere { center, radius } => {
                if !radius.is_finite() || *radius < 0.0 || !all_finite(center) {
                    return Err(format!("invalid sphere zone: center {:?}, radius {}", center, radius));
                }
                Ok(Box::new(SphereZone::new(Point3::from(*center), *radius)))
            }
        }
    }

    /// Where the chest plate rests: the zone center
    pub fn center(&self) -> Point3<f32> {
        match self {
            ZoneDesc::Box { center, .. } | ZoneDesc::Sphere { center, .. } => Point3::from(*center),
        }
    }
}

fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}
