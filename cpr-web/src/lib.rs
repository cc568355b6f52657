//! CPR Web - chest compression detection for a VR CPR trainer
//!
//! Entry point for the WASM module. Only contains:
//! - Module declarations and re-exports of the core API
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The core (`physics`, `stats`, `scoring`, `session`) is plain Rust and runs
//! natively in tests; only `bridge` touches JS.

pub mod config;
pub mod physics;
pub mod scoring;
pub mod session;
pub mod stats;

mod bridge;

use wasm_bindgen::prelude::*;

pub use bridge::{get_debug_overlay_text, set_frame_metrics, set_tracking_latency, CprSession};
pub use config::{ConfigError, EngineConfig};
pub use physics::{BoxZone, CompressionZone, HandSample, SphereZone};
pub use scoring::{QualityGrade, QualityResult};
pub use session::{FeedbackSnapshot, HeartbeatPulse, ResultsSnapshot, SessionEngine};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Route `log` output to the browser console.
///
/// @param {string} level - "trace", "debug", "info", "warn" or "error"
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging(level: &str) {
    let log_level = match level.to_lowercase().as_str() {
        "trace" => log::Level::Trace,
        "debug" => log::Level::Debug,
        "info" => log::Level::Info,
        "warn" => log::Level::Warn,
        "error" => log::Level::Error,
        _ => log::Level::Info,
    };

    // A second call keeps the first logger
    let _ = wasm_logger::init(wasm_logger::Config::new(log_level));
    log::info!("cpr-web {} logging at {}", env!("CARGO_PKG_VERSION"), log_level);
}

/// Library version
#[wasm_bindgen(js_name = getVersion)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
