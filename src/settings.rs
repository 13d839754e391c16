//! Star field tuning
//!
//! Every knob is plain data, handed to each component when it is built. Read
//! from LocalStorage on the web; natively it can be read from a JSON file.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::viewport::ResponsiveTiers;

/// Attribute ranges for newly created stars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnSettings {
    /// Smallest star size before the multiplier
    pub size_min: f32,
    /// Upper bound (exclusive) of star size before the multiplier
    pub size_base: f32,
    pub size_multiplier: f32,
    pub twinkle_speed_min: f32,
    pub twinkle_speed_max: f32,
    /// Full velocity span per axis; each axis samples in ±velocity_max/2
    pub velocity_max: f32,
    /// CSS animation delay upper bound (seconds)
    pub twinkle_delay_max: f32,
    /// CSS animation duration lower bound (seconds)
    pub twinkle_duration_min: f32,
    /// CSS animation duration span (seconds)
    pub twinkle_duration_span: f32,
}

impl Default for SpawnSettings {
    fn default() -> Self {
        Self {
            size_min: STAR_SIZE_MIN,
            size_base: STAR_SIZE_BASE,
            size_multiplier: STAR_SIZE_MULTIPLIER,
            twinkle_speed_min: TWINKLE_SPEED_MIN,
            twinkle_speed_max: TWINKLE_SPEED_MAX,
            velocity_max: VELOCITY_MAX,
            twinkle_delay_max: TWINKLE_DELAY_MAX,
            twinkle_duration_min: TWINKLE_DURATION_MIN,
            twinkle_duration_span: TWINKLE_DURATION_SPAN,
        }
    }
}

/// Per-tick motion and respawn policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionSettings {
    pub phase_step: f32,
    /// Percent past either edge before a star respawns
    pub margin: f32,
    /// Percent outside the chosen edge where a respawned star re-enters
    pub respawn_offset: f32,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            phase_step: PHASE_INCREMENT,
            margin: MARGIN_BUFFER,
            respawn_offset: RESPAWN_MARGIN,
        }
    }
}

/// Line graph limits and stroke style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSettings {
    pub max_connections: usize,
    pub connection_distance: f32,
    pub mouse_distance: f32,
    pub mouse_max: usize,
    pub line_width: f32,
    pub line_color: [u8; 3],
}

impl Default for GraphSettings {
    fn default() -> Self {
        Self {
            max_connections: MAX_CONNECTIONS,
            connection_distance: CONNECTION_DISTANCE_MAX,
            mouse_distance: MOUSE_CONNECTION_DISTANCE,
            mouse_max: MOUSE_CONNECTIONS_MAX,
            line_width: LINE_WIDTH,
            line_color: LINE_COLOR,
        }
    }
}

/// Complete star field settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub spawn: SpawnSettings,
    pub motion: MotionSettings,
    pub graph: GraphSettings,
    pub tiers: ResponsiveTiers,
    /// Fixed RNG seed; `None` seeds from the clock at startup
    pub seed: Option<u64>,
}

impl Settings {
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "star_field_settings";

    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Nothing is stored natively
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
