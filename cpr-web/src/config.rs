//! Engine configuration - product tuning constants
//!
//! Every numeric constant the engine uses lives here, grouped per component.
//! All sections deserialize with `#[serde(default)]`, so a partial JS object
//! only overrides the fields it names.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Largest accepted rate smoothing window
pub const MAX_RATE_WINDOW: usize = 50;

/// Errors raised while validating an [`EngineConfig`]
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite and positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be finite and non-negative (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("{band} band is malformed: expected ok_min <= perfect_min <= perfect_max <= ok_max")]
    MalformedBand { band: &'static str },

    #[error("spring up axis must be a non-zero vector")]
    ZeroUpAxis,

    #[error("rate window must be between 1 and 50 (got {0})")]
    RateWindow(usize),

    #[error("invalid configuration object: {0}")]
    Parse(String),
}

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

// ============================================================================
// SECTIONS
// ============================================================================

/// Hand overlap and zone containment
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneConfig {
    /// Hands closer than this (meters) count as stacked for compressions
    pub overlap_distance: f32,
    /// Centroid within this distance of the zone counts as inside
    pub containment_epsilon: f32,
}

impl Default for ZoneConfig {
    fn default() -> Self {
        Self {
            overlap_distance: 0.15,
            containment_epsilon: 0.001,
        }
    }
}

/// Chest spring-damper
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub stiffness: f32,
    /// Exponential damping rate (1/s)
    pub damping: f32,
    /// Deepest the chest can be pushed (meters)
    pub max_compression: f32,
    /// World direction the chest rebounds towards
    pub up_axis: [f32; 3],
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 200.0,
            damping: 10.0,
            max_compression: 0.06,
            up_axis: [0.0, 1.0, 0.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Presses shallower than this are discarded as noise (meters)
    pub min_depth_to_count: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_depth_to_count: 0.01,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticsConfig {
    /// Number of recent rates in the smoothed average
    pub rate_window: usize,
}

impl Default for StatisticsConfig {
    fn default() -> Self {
        Self { rate_window: 5 }
    }
}

/// Perfect/acceptable range for one measured quantity
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub perfect_min: f32,
    pub perfect_max: f32,
    pub ok_min: f32,
    pub ok_max: f32,
    /// Points lost per unit of distance past the ok band
    pub falloff_per_unit: f32,
}

impl Band {
    /// Compression rate in BPM: 10 BPM past the ok band costs 25 points
    pub const RATE: Band = Band {
        perfect_min: 90.0,
        perfect_max: 110.0,
        ok_min: 80.0,
        ok_max: 120.0,
        falloff_per_unit: 2.5,
    };

    /// Compression depth in meters: 1 cm past the ok band costs 25 points
    pub const DEPTH: Band = Band {
        perfect_min: 0.045,
        perfect_max: 0.060,
        ok_min: 0.035,
        ok_max: 0.065,
        falloff_per_unit: 2500.0,
    };

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let ordered = self.ok_min <= self.perfect_min
            && self.perfect_min <= self.perfect_max
            && self.perfect_max <= self.ok_max;
        let finite = [self.perfect_min, self.perfect_max, self.ok_min, self.ok_max]
            .iter()
            .all(|v| v.is_finite());
        if !ordered || !finite {
            return Err(ConfigError::MalformedBand { band: name });
        }
        non_negative("falloff_per_unit", self.falloff_per_unit)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub rate: Band,
    pub depth: Band,
    pub rate_weight: f32,
    /// Depth counts slightly more: it is harder to self-correct than rate
    pub depth_weight: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            rate: Band::RATE,
            depth: Band::DEPTH,
            rate_weight: 0.45,
            depth_weight: 0.55,
        }
    }
}

/// Orchestration timing and training targets
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Compressions before rates are measured
    pub warmup_compressions: u32,
    pub ideal_depth: f32,
    pub ideal_rate: f32,
    /// Intervals shorter than this (seconds) produce no rate sample
    pub min_compression_interval: f64,
    /// Wall time between live feedback refreshes (seconds)
    pub feedback_interval: f64,
    /// Physics step (seconds)
    pub fixed_step: f32,
    /// Upper bound on physics steps run by one `advance_physics` call
    pub max_fixed_steps_per_frame: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            warmup_compressions: 20,
            ideal_depth: 0.05,
            ideal_rate: 100.0,
            min_compression_interval: 0.10,
            feedback_interval: 0.25,
            fixed_step: 1.0 / 50.0,
            max_fixed_steps_per_frame: 8,
        }
    }
}

// ============================================================================
// ENGINE CONFIG
// ============================================================================

/// Full engine configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub zone: ZoneConfig,
    pub spring: SpringConfig,
    pub detector: DetectorConfig,
    pub statistics: StatisticsConfig,
    pub scoring: ScoringConfig,
    pub session: SessionConfig,
}

impl EngineConfig {
    /// Check every constant the engine relies on.
    ///
    /// This is the only fallible step: once a config validates, the
    /// per-frame path never fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("zone.overlap_distance", self.zone.overlap_distance)?;
        non_negative("zone.containment_epsilon", self.zone.containment_epsilon)?;

        positive("spring.stiffness", self.spring.stiffness)?;
        non_negative("spring.damping", self.spring.damping)?;
        positive("spring.max_compression", self.spring.max_compression)?;
        let [x, y, z] = self.spring.up_axis;
        let len_sq = x * x + y * y + z * z;
        if !len_sq.is_finite() || len_sq < 1e-12 {
            return Err(ConfigError::ZeroUpAxis);
        }

        non_negative("detector.min_depth_to_count", self.detector.min_depth_to_count)?;

        let window = self.statistics.rate_window;
        if window == 0 || window > MAX_RATE_WINDOW {
            return Err(ConfigError::RateWindow(window));
        }

        self.scoring.rate.validate("rate")?;
        self.scoring.depth.validate("depth")?;
        positive("scoring.rate_weight", self.scoring.rate_weight)?;
        positive("scoring.depth_weight", self.scoring.depth_weight)?;

        positive("session.ideal_depth", self.session.ideal_depth)?;
        positive("session.ideal_rate", self.session.ideal_rate)?;
        non_negative(
            "session.min_compression_interval",
            self.session.min_compression_interval as f32,
        )?;
        non_negative("session.feedback_interval", self.session.feedback_interval as f32)?;
        positive("session.fixed_step", self.session.fixed_step)?;
        if self.session.max_fixed_steps_per_frame == 0 {
            return Err(ConfigError::NotPositive {
                field: "session.max_fixed_steps_per_frame",
                value: 0.0,
            });
        }

        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NotPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
