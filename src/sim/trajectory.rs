//! Ballistic flight on a fixed simulation clock
//!
//! Every scheduled tick advances simulation time by a fixed step regardless of
//! wall-clock frame time, so the same strength always produces the same arc on
//! every device. The flight ends on the first tick whose height is negative;
//! that tick's planar position is the landing point, unclamped.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;

use super::direction::direction_for;
use super::scheduler::{FrameHandle, FrameScheduler};
use super::state::{Character, CharacterPhase, TravelAxis};
use crate::Tuning;

/// Hard stop for degenerate tunings (zero gravity)
const MAX_FLIGHT_TICKS: u32 = 10_000;

/// Initial speeds for a launch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaunchVelocity {
    pub horizontal: f32,
    pub vertical: f32,
}

impl LaunchVelocity {
    /// Velocity for `strength` at the tuned launch angle; vertical speed is floored
    pub fn from_strength(strength: f32, tuning: &Tuning) -> Self {
        let (sin, cos) = tuning.launch_angle.sin_cos();
        Self {
            horizontal: strength * cos,
            vertical: (strength * sin).max(tuning.min_vertical_speed),
        }
    }

    /// Height above the launch platform at simulation time `t`
    #[inline]
    pub fn height_at(&self, t: f32, gravity: f32) -> f32 {
        self.vertical * t - 0.5 * gravity * t * t
    }

    /// Horizontal travel at simulation time `t`
    #[inline]
    pub fn distance_at(&self, t: f32, drag: f32) -> f32 {
        self.horizontal * t - 0.5 * drag * t * t
    }
}

/// Planar displacement for `distance` travelled at `heading` from `axis`
pub fn displacement(axis: TravelAxis, heading: f32, distance: f32) -> Vec2 {
    direction_for(axis, heading) * distance
}

/// Number of ticks until the arc returns below the launch height
pub fn flight_ticks(strength: f32, tuning: &Tuning) -> u32 {
    let v = LaunchVelocity::from_strength(strength, tuning);
    let mut n = 0;
    while n < MAX_FLIGHT_TICKS {
        n += 1;
        if v.height_at(n as f32 * tuning.flight_step, tuning.gravity) < 0.0 {
            break;
        }
    }
    n
}

/// Simulation time of the terminal tick
pub fn flight_duration(strength: f32, tuning: &Tuning) -> f32 {
    flight_ticks(strength, tuning) as f32 * tuning.flight_step
}

/// Horizontal distance covered by the terminal tick
pub fn landing_distance(strength: f32, tuning: &Tuning) -> f32 {
    let v = LaunchVelocity::from_strength(strength, tuning);
    v.distance_at(flight_duration(strength, tuning), tuning.drag)
}

/// Whole-unit strength whose landing distance is closest to `distance`
pub fn strength_for_distance(distance: f32, tuning: &Tuning) -> f32 {
    let max = tuning.max_strength.max(0.0) as u32;
    (0..=max)
        .map(|s| s as f32)
        .min_by(|a, b| {
            let da = (landing_distance(*a, tuning) - distance).abs();
            let db = (landing_distance(*b, tuning) - distance).abs();
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or(0.0)
}

/// Hold duration (ms) that yields [`strength_for_distance`]
pub fn hold_ms_for_distance(distance: f32, tuning: &Tuning) -> f64 {
    // Middle of the strength bucket so flooring lands on it
    (strength_for_distance(distance, tuning) as f64 + 0.5) * tuning.hold_ms_per_strength
}

/// Result of one flight tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlightStep {
    /// Still above the launch height
    Airborne,
    /// Height went negative; planar landing point
    Landed(Vec2),
    /// Flight already over
    Idle,
}

/// Per-jump integrator state
#[derive(Debug, Clone)]
pub struct FlightState {
    ticks: u32,
    origin: Vec3,
    base_height: f32,
    heading: f32,
    strength: f32,
    axis: TravelAxis,
    velocity: LaunchVelocity,
    step: f32,
    gravity: f32,
    drag: f32,
    handle: Option<FrameHandle>,
}

impl FlightState {
    /// Put the character in flight from `origin`. None if it cannot jump now.
    pub fn launch(
        character: &mut Character,
        origin: Vec3,
        base_height: f32,
        heading: f32,
        axis: TravelAxis,
        tuning: &Tuning,
        sched: &mut FrameScheduler,
    ) -> Option<Self> {
        if character.is_dead() || character.is_in_flight() {
            log::debug!("Launch ignored in phase {:?}", character.phase);
            return None;
        }

        let strength = character.launch_strength;
        let velocity = LaunchVelocity::from_strength(strength, tuning);
        character.phase = CharacterPhase::InFlight;
        character.relax(tuning.head_height);
        character.position.z = base_height;

        log::info!(
            "Launch: strength {} heading {:.3} {} (vx {:.1}, vy {:.1})",
            strength,
            heading,
            axis.as_str(),
            velocity.horizontal,
            velocity.vertical
        );

        Some(Self {
            ticks: 0,
            origin,
            base_height,
            heading,
            strength,
            axis,
            velocity,
            step: tuning.flight_step,
            gravity: tuning.gravity,
            drag: tuning.drag,
            handle: Some(sched.request()),
        })
    }

    /// Simulation time of the last computed tick
    pub fn elapsed(&self) -> f32 {
        self.ticks as f32 * self.step
    }

    pub fn strength(&self) -> f32 {
        self.strength
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn axis(&self) -> TravelAxis {
        self.axis
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Advance one fixed step and move the character along the arc
    pub fn step(&mut self, character: &mut Character, sched: &mut FrameScheduler) -> FlightStep {
        if self.handle.is_none() {
            return FlightStep::Idle;
        }

        self.ticks += 1;
        let t = self.elapsed();
        let h = self.velocity.height_at(t, self.gravity);
        let d = self.velocity.distance_at(t, self.drag);

        let planar = self.origin.truncate() + displacement(self.axis, self.heading, d);
        character.position = planar.extend(self.base_height + h);

        // One flip over the first 2π of simulated time, then hold
        if t - self.step <= TAU {
            match self.axis {
                TravelAxis::AlongX => character.orientation.yaw = t,
                TravelAxis::AlongY => character.orientation.pitch = -t,
            }
        }

        if h < 0.0 || self.ticks >= MAX_FLIGHT_TICKS {
            if h >= 0.0 {
                log::warn!("Flight hit tick limit at height {}", h);
            }
            sched.cancel_slot(&mut self.handle);
            character.phase = CharacterPhase::Idle;
            log::debug!("Touchdown after {} ticks at {:?}", self.ticks, planar);
            return FlightStep::Landed(planar);
        }
        FlightStep::Airborne
    }

    /// Abort mid-air (reset)
    pub fn cancel(&mut self, sched: &mut FrameScheduler) {
        sched.cancel_slot(&mut self.handle);
    }
}
