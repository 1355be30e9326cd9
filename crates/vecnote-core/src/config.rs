//! Tuning constants for the interaction engine.

use serde::{Deserialize, Serialize};

/// Engine configuration.
///
/// Hosts may load overrides from JSON; missing fields keep their
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Multiplier applied to finger movement while panning.
    pub pan_friction: f64,
    /// Weight kept from the previous velocity sample.
    pub velocity_smoothing: f64,
    /// Per-frame velocity multiplier during inertial scroll.
    pub inertia_decay: f64,
    /// Velocity (px/ms) at or below which inertia stops.
    pub min_velocity: f64,
    /// Nominal frame duration used to turn velocity into a pan amount.
    pub frame_duration_ms: f64,
    /// Padding around the selection box, for hit testing and rendering.
    pub selection_padding: f64,
    /// Fewest points a pen gesture needs to become a stroke.
    pub min_stroke_points: usize,
    /// Fewest points a lasso gesture needs to change the selection.
    pub min_lasso_points: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pan_friction: 1.2,
            velocity_smoothing: 0.8,
            inertia_decay: 0.95,
            min_velocity: 0.1,
            frame_duration_ms: 16.0,
            selection_padding: 5.0,
            min_stroke_points: 2,
            min_lasso_points: 3,
        }
    }
}

impl EngineConfig {
    /// Parse a configuration, filling unspecified fields with defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
