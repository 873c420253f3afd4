//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed simulation step for charge and flight
//! - Seeded RNG only
//! - No rendering or platform dependencies; drawing goes through [`Scene`]

pub mod camera;
pub mod charge;
pub mod direction;
pub mod easing;
pub mod landing;
pub mod props;
pub mod scene;
pub mod scheduler;
pub mod session;
pub mod state;
pub mod trajectory;

pub use camera::CameraFramer;
pub use charge::{ChargeController, strength_from_hold};
pub use direction::{direction_for, heading_to, unsigned_heading_to};
pub use easing::{Easing, Keyframes, Lerp, Tween, TweenStep, ease};
pub use landing::{DeathAnimation, Edge, LandingJudge, LandingOutcome, classify};
pub use props::{PlatformPath, PlatformProvider, PropRelease};
pub use scene::{FrameRecorder, RenderFrame, Scene, SceneObject};
pub use scheduler::{FrameHandle, FrameScheduler};
pub use session::GameSession;
pub use state::{
    BodyPose, CameraView, Character, CharacterPhase, GameEvent, Orientation, Platform, Scenery,
    TravelAxis,
};
pub use trajectory::{
    FlightState, FlightStep, LaunchVelocity, flight_ticks, hold_ms_for_distance, landing_distance,
    strength_for_distance,
};
