//! Data-driven gameplay constants
//!
//! Every number the simulation uses lives here so a level can be retuned from
//! a JSON file without a rebuild. Defaults mirror [`crate::consts`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Easing;

/// Rules for the reference platform path generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnRules {
    /// Minimum center-to-center distance between platforms
    pub min_distance: f32,
    /// Maximum center-to-center distance between platforms
    pub max_distance: f32,
    /// Smallest footprint half-width
    pub min_half_width: f32,
    /// Largest footprint half-width
    pub max_half_width: f32,
    /// Height of every platform top
    pub prop_height: f32,
}

impl Default for SpawnRules {
    fn default() -> Self {
        Self {
            min_distance: 300.0,
            max_distance: 900.0,
            min_half_width: 50.0,
            max_half_width: 80.0,
            prop_height: 40.0,
        }
    }
}

/// Gameplay tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Charge ===
    pub charge_step: f32,
    pub charge_ratio_min: f32,
    pub max_strength: f32,
    pub hold_ms_per_strength: f64,

    // === Flight ===
    pub launch_angle: f32,
    pub gravity: f32,
    pub drag: f32,
    pub min_vertical_speed: f32,
    pub flight_step: f32,
    /// Aim with the unsigned angle-between formula instead of the signed one
    pub legacy_unsigned_heading: bool,

    // === Animation (ms) ===
    pub fall_duration_ms: f32,
    pub tip_duration_ms: f32,
    pub camera_pan_ms: f32,
    /// Easing of the camera pan after a safe landing
    pub camera_easing: Easing,

    // === Camera ===
    /// Viewport size used to place the camera rig
    pub view_width: f32,
    pub view_height: f32,

    // === Character ===
    pub body_radius: f32,
    pub body_height: f32,
    pub head_height: f32,

    // === Path ===
    pub spawn: SpawnRules,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            charge_step: CHARGE_STEP,
            charge_ratio_min: CHARGE_RATIO_MIN,
            max_strength: MAX_LAUNCH_STRENGTH,
            hold_ms_per_strength: HOLD_MS_PER_STRENGTH,

            launch_angle: LAUNCH_ANGLE,
            gravity: GRAVITY,
            drag: DRAG,
            min_vertical_speed: MIN_VERTICAL_SPEED,
            flight_step: FLIGHT_STEP,
            legacy_unsigned_heading: false,

            fall_duration_ms: FALL_DURATION_MS,
            tip_duration_ms: TIP_DURATION_MS,
            camera_pan_ms: CAMERA_PAN_MS,
            camera_easing: Easing::Linear,

            view_width: VIEW_WIDTH,
            view_height: VIEW_HEIGHT,

            body_radius: BODY_RADIUS,
            body_height: BODY_HEIGHT,
            head_height: HEAD_HEIGHT,

            spawn: SpawnRules::default(),
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        log::info!(
            "Loaded tuning (gravity {}, flight step {}, max strength {})",
            tuning.gravity,
            tuning.flight_step,
            tuning.max_strength
        );
        Ok(tuning)
    }

    /// Serialize tuning to pretty JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
