//! Game state and core simulation types

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use super::easing::Lerp;
use super::landing::LandingOutcome;
use crate::consts::CHARGE_RATIO_MAX;

/// World direction along which the platform path advances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelAxis {
    /// Travel is visually to the right (+x)
    #[default]
    #[serde(rename = "along-x")]
    AlongX,
    /// Travel is visually forward (+y)
    #[serde(rename = "along-y")]
    AlongY,
}

impl TravelAxis {
    /// Unit reference vector in the ground plane
    pub fn reference(self) -> Vec2 {
        match self {
            TravelAxis::AlongX => Vec2::X,
            TravelAxis::AlongY => Vec2::Y,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TravelAxis::AlongX => "along-x",
            TravelAxis::AlongY => "along-y",
        }
    }
}

/// Body rotation used for the jump flip and the death tip (radians)
///
/// `yaw` turns about the world y axis, `pitch` about the world x axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Orientation {
    pub yaw: f32,
    pub pitch: f32,
}

/// Squash visuals fed to the renderer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyPose {
    /// Non-uniform body scale
    pub scale: Vec3,
    /// Head height above the character origin
    pub head_z: f32,
}

impl BodyPose {
    pub fn neutral(head_height: f32) -> Self {
        Self {
            scale: Vec3::ONE,
            head_z: head_height,
        }
    }

    /// Pose for a given charge ratio; the head rides the compressed body top
    pub fn squashed(ratio: f32, body_height: f32, head_height: f32) -> Self {
        Self {
            scale: Vec3::new(2.0 - ratio, 2.0 - ratio, ratio),
            head_z: head_height - body_height * (1.0 - ratio),
        }
    }
}

/// What the character is doing right now
///
/// Charging and flight are distinct variants, so they can never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CharacterPhase {
    /// Standing on a platform, ready for input
    #[default]
    Idle,
    /// Input held, compressing
    Charging,
    /// Following a ballistic arc
    InFlight,
    /// Death animation playing (already dead)
    Dying,
    /// Terminal; only an external reset leaves this state
    Dead,
}

/// The player's character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub position: Vec3,
    pub orientation: Orientation,
    /// 1.0 = neutral, 0.5 = fully compressed
    pub charge_ratio: f32,
    /// Frozen at release for the current jump
    pub launch_strength: f32,
    pub pose: BodyPose,
    pub phase: CharacterPhase,
}

impl Character {
    pub fn new(position: Vec3, head_height: f32) -> Self {
        Self {
            position,
            orientation: Orientation::default(),
            charge_ratio: CHARGE_RATIO_MAX,
            launch_strength: 0.0,
            pose: BodyPose::neutral(head_height),
            phase: CharacterPhase::Idle,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.phase == CharacterPhase::InFlight
    }

    pub fn is_charging(&self) -> bool {
        self.phase == CharacterPhase::Charging
    }

    pub fn is_dead(&self) -> bool {
        matches!(self.phase, CharacterPhase::Dying | CharacterPhase::Dead)
    }

    /// Return the body to its uncompressed pose
    pub fn relax(&mut self, head_height: f32) {
        self.charge_ratio = CHARGE_RATIO_MAX;
        self.pose = BodyPose::neutral(head_height);
    }
}

/// A platform on the path
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub id: u32,
    /// x, y fixed at spawn; z is the top height
    pub position: Vec3,
    pub half_width: f32,
}

impl Platform {
    pub fn new(id: u32, position: Vec3, half_width: f32) -> Self {
        Self {
            id,
            position,
            half_width,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.position.truncate()
    }

    /// Whether `point` lies inside the footprint grown by `margin` (inclusive)
    pub fn contains(&self, point: Vec2, margin: f32) -> bool {
        let reach = self.half_width + margin;
        let d = (point - self.center()).abs();
        d.x <= reach && d.y <= reach
    }
}

/// Camera placement
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraView {
    pub position: Vec3,
    pub look_at: Vec3,
}

impl Lerp for CameraView {
    fn lerp(self, end: Self, p: f32) -> Self {
        Self {
            position: self.position.lerp(end.position, p),
            look_at: self.look_at.lerp(end.look_at, p),
        }
    }
}

/// Scenery that co-moves with the camera so the world appears stationary
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scenery {
    pub ground: Vec3,
    pub light: Vec3,
    pub light_target: Vec3,
}

impl Scenery {
    /// Shift every element in the ground plane
    pub fn translate(&mut self, delta: Vec2) {
        let d = delta.extend(0.0);
        self.ground += d;
        self.light += d;
        self.light_target += d;
    }
}

/// Game events for the host (sound, HUD, analytics)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    ChargeStarted,
    Launched {
        strength: f32,
        heading: f32,
        axis: TravelAxis,
    },
    Landed(LandingOutcome),
    PlatformSpawned(Platform),
    CameraSettled,
    PropSettled,
    GameOver {
        jumps: u32,
    },
}
