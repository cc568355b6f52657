//! Physics module - hand zone gating, chest spring and compression detection
//!
//! Re-exports only. All logic in submodules.

mod state;
mod zone;
mod spring;
mod detection;

pub use state::HandSample;
pub use zone::{BoxZone, CompressionZone, CompressionZoneTracker, PoseEdge, SphereZone, ZoneReading};
pub use spring::ChestSpring;
pub use detection::{CompressionDetector, CompressionEvent, PressPhase};
