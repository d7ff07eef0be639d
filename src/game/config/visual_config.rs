//! Visual Configuration
//!
//! Single source of truth for the board's visual tuning: hex metrics,
//! camera feel, choreography timings, and the particle presets for each
//! effect the scene triggers. Ships with tuned defaults and can be
//! overridden from a JSON file so the feel can be tweaked without touching
//! scene code.

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::particles::{DustBurstConfig, EmitterConfig, PortalConfig, TracerConfig};

/// Camera feel parameters, applied to the controller at scene creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CameraTuning {
    /// Fraction of remaining distance covered per 60fps frame.
    pub lerp_factor: f32,
    /// Keyboard pan speed, world units per second at zoom 1.
    pub key_pan_speed: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Margin added around the tile union when growing pan bounds.
    pub bounds_margin: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            lerp_factor: 0.12,
            key_pan_speed: 600.0,
            min_zoom: 0.35,
            max_zoom: 3.0,
            bounds_margin: 120.0,
        }
    }
}

/// Visual tuning for the board scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VisualConfig {
    /// Hex circumradius in world units.
    pub hex_size: f32,
    pub camera: CameraTuning,

    // Choreography
    /// Delay between consecutive tile reveals in a wave.
    pub reveal_stagger_ms: f64,
    /// Hold after a reveal wave before the camera pans back.
    pub reveal_settle_ms: f64,
    /// Duration of a token's hop along one path segment.
    pub token_hop_ms: f32,

    // Overlay styling
    pub boundary_width: f32,
    /// Outline color for safely reachable hexes.
    pub boundary_color: [f32; 3],
    /// Outline color for terminal hexes (ending the move sequence).
    pub boundary_terminal_color: [f32; 3],
    pub path_width: f32,
    pub path_color: [f32; 3],

    // Effect presets
    pub reveal_dust: DustBurstConfig,
    pub entrance_portal: PortalConfig,
    pub boundary_tracer: TracerConfig,
    pub hover_sparkle: EmitterConfig,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            hex_size: 36.0,
            camera: CameraTuning::default(),
            reveal_stagger_ms: 120.0,
            reveal_settle_ms: 450.0,
            token_hop_ms: 220.0,
            boundary_width: 2.5,
            boundary_color: [0.45, 0.85, 0.5],
            boundary_terminal_color: [0.9, 0.45, 0.3],
            path_width: 3.0,
            path_color: [0.95, 0.9, 0.55],
            reveal_dust: DustBurstConfig::default(),
            entrance_portal: PortalConfig::default(),
            boundary_tracer: TracerConfig::default(),
            hover_sparkle: EmitterConfig {
                count: 6,
                lifetime_ms: 400.0,
                speed: 25.0,
                gravity: -10.0,
                ..EmitterConfig::default()
            },
        }
    }
}

impl VisualConfig {
    /// Parse overrides from JSON; absent fields keep their defaults.
    pub fn from_json_str(payload: &str) -> anyhow::Result<Self> {
        serde_json::from_str(payload).context("malformed visual config")
    }
}
