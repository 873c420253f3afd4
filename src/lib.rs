//! Platform Hop - a charge-and-leap arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (charge, flight, landing, camera framing)
//! - `platform`: Browser bindings (wasm32 only)
//! - `tuning`: Data-driven gameplay constants

pub mod platform;
pub mod sim;
pub mod tuning;

pub use tuning::Tuning;

use glam::{Vec2, Vec3};

/// Game configuration constants
pub mod consts {
    use std::f32::consts::FRAC_PI_4;

    /// Charge ratio lost per charge tick
    pub const CHARGE_STEP: f32 = 0.008;
    /// Fully compressed charge ratio
    pub const CHARGE_RATIO_MIN: f32 = 0.5;
    /// Neutral (uncompressed) charge ratio
    pub const CHARGE_RATIO_MAX: f32 = 1.0;

    /// Launch strength cap
    pub const MAX_LAUNCH_STRENGTH: f32 = 140.0;
    /// Milliseconds of hold per unit of launch strength
    pub const HOLD_MS_PER_STRENGTH: f64 = 10.0;

    /// Fixed launch angle (radians above the horizon)
    pub const LAUNCH_ANGLE: f32 = FRAC_PI_4;
    /// Gravitational constant
    pub const GRAVITY: f32 = 9.8;
    /// Horizontal drag constant
    pub const DRAG: f32 = 2.0;
    /// Vertical launch speed floor so weak charges still arc
    pub const MIN_VERTICAL_SPEED: f32 = 60.0;
    /// Simulation time advanced per flight tick
    pub const FLIGHT_STEP: f32 = 0.3;

    /// Straight drop after a clean miss (ms)
    pub const FALL_DURATION_MS: f32 = 200.0;
    /// Tip-over after clipping an edge (ms)
    pub const TIP_DURATION_MS: f32 = 500.0;
    /// Camera pan after a safe landing (ms)
    pub const CAMERA_PAN_MS: f32 = 500.0;

    /// Prop rebound keyframe times after release (seconds)
    pub const PROP_REBOUND_TIMES: [f32; 5] = [0.0, 0.5, 1.0, 1.5, 2.0];
    /// Prop rebound scales following the release ratio
    pub const PROP_REBOUND_VALUES: [f32; 4] = [1.07, 0.95, 1.01, 1.0];

    /// Viewport size for the camera rig
    pub const VIEW_WIDTH: f32 = 400.0;
    pub const VIEW_HEIGHT: f32 = 300.0;

    /// Character dimensions
    pub const BODY_RADIUS: f32 = 20.0;
    pub const BODY_HEIGHT: f32 = 60.0;
    pub const HEAD_HEIGHT: f32 = 80.0;

    /// Nominal display refresh interval (ms)
    pub const FRAME_MS: f32 = 1000.0 / 60.0;
}

/// Drop the height component of a world position
#[inline]
pub fn planar(v: Vec3) -> Vec2 {
    v.truncate()
}

/// Component-wise floored midpoint of two planar points
#[inline]
pub fn floored_midpoint(a: Vec2, b: Vec2) -> Vec2 {
    ((a + b) / 2.0).floor()
}
