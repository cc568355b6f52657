//! Session module - orchestration, physics clock and output values

mod clock;
mod engine;
mod output;

pub use clock::FixedStepClock;
pub use engine::{FrameOutcome, SessionEngine};
pub use output::{
    CompletedCompression, FeedbackPhase, FeedbackSnapshot, HeartbeatPulse, ResultsSnapshot,
    MAX_PULSE_SPEED, MIN_PULSE_SPEED,
};
