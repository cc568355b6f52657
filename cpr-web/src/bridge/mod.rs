//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod debug_overlay;
mod input;
mod session;

pub use debug_overlay::{get_debug_overlay_text, set_frame_metrics, set_tracking_latency};
pub use session::CprSession;
