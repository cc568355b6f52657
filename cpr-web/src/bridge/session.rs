//! `CprSession` - the JS handle on one training session
//!
//! ```js
//! import init, { CprSession, initLogging } from './cpr_web.js';
//!
//! await init();
//! initLogging('info');
//! const session = new CprSession({ kind: 'box', center: [0, 0.9, 0.4], size: [0.3, 0.1, 0.3] });
//!
//! function onXrFrame(dt, left, right) {
//!     if (session.frame(left, right, dt)) heartbeat.pulse(session.lastPulse());
//!     session.advancePhysics(dt);
//!     chestHands.position.y = rest.y + session.chestOffset()[1];
//! }
//! ```

use wasm_bindgen::prelude::*;

use crate::config::{ConfigError, EngineConfig};
use crate::session::SessionEngine;
use super::debug_overlay::overlay_text;
use super::input::{read_hands, ZoneDesc};

/// One CPR training session
#[wasm_bindgen]
pub struct CprSession {
    engine: SessionEngine,
}

#[wasm_bindgen]
impl CprSession {
    /// Create a session.
    ///
    /// @param zone - `{ kind: "box" | "sphere", ... }`; the chest rests at its center
    /// @param config - optional partial EngineConfig; omitted fields keep defaults
    #[wasm_bindgen(constructor)]
    pub fn new(zone: JsValue, config: JsValue) -> Result<CprSession, JsValue> {
        let desc: ZoneDesc = serde_wasm_bindgen::from_value(zone)
            .map_err(|e| ConfigError::Parse(format!("zone: {}", e)))?;
        let config: EngineConfig = if config.is_undefined() || config.is_null() {
            EngineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| ConfigError::Parse(e.to_string()))?
        };

        let shape = desc.build().map_err(ConfigError::Parse)?;
        let engine = SessionEngine::new(config, shape, desc.center())?;
        Ok(CprSession { engine })
    }

    // ========================================================================
    // TICKS
    // ========================================================================

    /// Run one detection frame; returns true when a compression completed.
    ///
    /// @param left - Float32Array [x, y, z] (meters, world)
    /// @param right - Float32Array [x, y, z]
    /// @param dt - seconds since the previous frame
    pub fn frame(&mut self, left: &[f32], right: &[f32], dt: f32) -> bool {
        match read_hands(left, right) {
            Some(hands) => self.engine.frame(&hands, dt).completed.is_some(),
            None => false,
        }
    }

    /// Run the fixed physics steps owed for `dt` seconds of wall time
    #[wasm_bindgen(js_name = advancePhysics)]
    pub fn advance_physics(&mut self, dt: f32) -> u32 {
        self.engine.advance_physics(dt)
    }

    /// One fixed physics step, for hosts with their own fixed loop
    #[wasm_bindgen(js_name = fixedTick)]
    pub fn fixed_tick(&mut self) {
        self.engine.fixed_tick();
    }

    // ========================================================================
    // QUERIES
    // ========================================================================

    /// [x, y, z] offset for objects riding the chest
    #[wasm_bindgen(js_name = chestOffset)]
    pub fn chest_offset(&self) -> Vec<f32> {
        let offset = self.engine.chest_world_offset();
        vec![offset.x, offset.y, offset.z]
    }

    /// [x, y, z] of the chest plate at rest
    #[wasm_bindgen(js_name = chestRestPosition)]
    pub fn chest_rest_position(&self) -> Vec<f32> {
        let rest = self.engine.chest_rest_position();
        vec![rest.x, rest.y, rest.z]
    }

    /// Leftover fraction of a physics step, for interpolating the chest
    #[wasm_bindgen(js_name = physicsAlpha)]
    pub fn physics_alpha(&self) -> f32 {
        self.engine.physics_alpha()
    }

    #[wasm_bindgen(js_name = chestDisplacement)]
    pub fn chest_displacement(&self) -> f32 {
        self.engine.chest_displacement()
    }

    /// Latest throttled readout as a plain object
    pub fn feedback(&self) -> JsValue {
        serde_wasm_bindgen::to_value(self.engine.feedback()).unwrap_or(JsValue::NULL)
    }

    /// `{ depth, speed }` of the last counted compression, or null
    #[wasm_bindgen(js_name = lastPulse)]
    pub fn last_pulse(&self) -> JsValue {
        match self.engine.last_pulse() {
            Some(pulse) => serde_wasm_bindgen::to_value(&pulse).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = compressionJustCompleted)]
    pub fn compression_just_completed(&self) -> bool {
        self.engine.compression_just_completed()
    }

    #[wasm_bindgen(js_name = hasRecordedAnyCompression)]
    pub fn has_recorded_any_compression(&self) -> bool {
        self.engine.has_recorded_any_compression()
    }

    #[wasm_bindgen(js_name = compressionCount)]
    pub fn compression_count(&self) -> u32 {
        self.engine.statistics().compression_count()
    }

    /// Press phase: "IDLE" or "PRESSING"
    pub fn phase(&self) -> String {
        self.engine.phase().name().to_string()
    }

    /// "GOOD (82%)" for the current statistics
    #[wasm_bindgen(js_name = qualityText)]
    pub fn quality_text(&self) -> String {
        self.engine.current_quality().display_text()
    }

    #[wasm_bindgen(js_name = debugOverlayText)]
    pub fn debug_overlay_text(&self) -> String {
        overlay_text(&self.engine)
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Results object the first time, null afterwards
    #[wasm_bindgen(js_name = endSession)]
    pub fn end_session(&mut self) -> JsValue {
        match self.engine.end_session() {
            Some(results) => serde_wasm_bindgen::to_value(&results).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    #[wasm_bindgen(js_name = isFinished)]
    pub fn is_finished(&self) -> bool {
        self.engine.is_finished()
    }

    /// Start over with the same zone and configuration
    pub fn reset(&mut self) {
        self.engine.reset();
    }
}
