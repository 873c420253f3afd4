//! Landing classification and death animations
//!
//! The terminal point of a flight is judged against the target platform:
//! 1. inside the footprint (inclusive) is a safe landing;
//! 2. outside the footprint grown by the body radius is a clean miss;
//! 3. anything in between clips an edge and tips the character over.
//!
//! Both failure cases start a death animation and make the character dead.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::f32::consts::FRAC_PI_2;

use super::easing::{Lerp, Tween, TweenStep};
use super::scheduler::{FrameHandle, FrameScheduler};
use super::state::{Character, CharacterPhase, Platform};
use crate::Tuning;

/// Footprint edge the character went over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Edge {
    /// +y
    Top,
    /// +x
    Right,
    /// -y
    Bottom,
    /// -x
    Left,
}

/// How a flight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LandingOutcome {
    Safe,
    FatalMiss,
    Overbalance(Edge),
}

impl LandingOutcome {
    pub fn is_safe(&self) -> bool {
        matches!(self, LandingOutcome::Safe)
    }
}

/// Edge overshot by `point`, checked in the order top, right, bottom, left
///
/// The four comparisons are independent; a point past a corner matches two of
/// them and the first in that order wins. Falls back to `Left` when the point
/// is inside the footprint.
pub fn overshot_edge(point: Vec2, target: &Platform) -> Edge {
    let c = target.center();
    let w = target.half_width;
    if point.y > c.y + w {
        Edge::Top
    } else if point.x > c.x + w {
        Edge::Right
    } else if point.y < c.y - w {
        Edge::Bottom
    } else {
        Edge::Left
    }
}

/// Classify a terminal point; exactly one outcome holds for any point
pub fn classify(point: Vec2, target: &Platform, body_radius: f32) -> LandingOutcome {
    if target.contains(point, 0.0) {
        LandingOutcome::Safe
    } else if !target.contains(point, body_radius) {
        LandingOutcome::FatalMiss
    } else {
        LandingOutcome::Overbalance(overshot_edge(point, target))
    }
}

/// Animated part of the character during a death
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathPose {
    pub z: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Lerp for DeathPose {
    fn lerp(self, end: Self, p: f32) -> Self {
        Self {
            z: Lerp::lerp(self.z, end.z, p),
            yaw: Lerp::lerp(self.yaw, end.yaw, p),
            pitch: Lerp::lerp(self.pitch, end.pitch, p),
        }
    }
}

/// Straight drop or edge tip-over, ending with the character on the ground
#[derive(Debug, Clone)]
pub struct DeathAnimation {
    tween: Tween<DeathPose>,
    handle: Option<FrameHandle>,
}

impl DeathAnimation {
    fn start(
        character: &mut Character,
        end: DeathPose,
        duration_ms: f32,
        sched: &mut FrameScheduler,
    ) -> Self {
        let start = DeathPose {
            z: character.position.z,
            yaw: character.orientation.yaw,
            pitch: character.orientation.pitch,
        };
        character.phase = CharacterPhase::Dying;
        Self {
            tween: Tween::linear(start, end, duration_ms),
            handle: Some(sched.request()),
        }
    }

    /// Vertical-only drop to the ground
    pub fn fall(character: &mut Character, tuning: &Tuning, sched: &mut FrameScheduler) -> Self {
        let end = DeathPose {
            z: 0.0,
            yaw: character.orientation.yaw,
            pitch: character.orientation.pitch,
        };
        Self::start(character, end, tuning.fall_duration_ms, sched)
    }

    /// Drop to the ground while rotating 90° over `edge`
    ///
    /// Positive pitch tips toward +y, positive yaw toward +x.
    pub fn tip(
        character: &mut Character,
        edge: Edge,
        tuning: &Tuning,
        sched: &mut FrameScheduler,
    ) -> Self {
        let (yaw, pitch) = match edge {
            Edge::Top => (0.0, FRAC_PI_2),
            Edge::Bottom => (0.0, -FRAC_PI_2),
            Edge::Right => (FRAC_PI_2, 0.0),
            Edge::Left => (-FRAC_PI_2, 0.0),
        };
        let end = DeathPose {
            z: 0.0,
            yaw: character.orientation.yaw + yaw,
            pitch: character.orientation.pitch + pitch,
        };
        Self::start(character, end, tuning.tip_duration_ms, sched)
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Advance by `dt_ms`; returns true on the frame the character comes to rest
    pub fn advance(
        &mut self,
        character: &mut Character,
        dt_ms: f32,
        sched: &mut FrameScheduler,
    ) -> bool {
        if self.handle.is_none() {
            return false;
        }
        let (pose, done) = match self.tween.advance(dt_ms) {
            TweenStep::Running(pose) => (pose, false),
            TweenStep::Finished(pose) => (pose, true),
            TweenStep::Idle => return false,
        };
        character.position.z = pose.z;
        character.orientation.yaw = pose.yaw;
        character.orientation.pitch = pose.pitch;
        if done {
            sched.cancel_slot(&mut self.handle);
            character.phase = CharacterPhase::Dead;
        }
        done
    }

    pub fn cancel(&mut self, sched: &mut FrameScheduler) {
        self.tween.cancel();
        sched.cancel_slot(&mut self.handle);
    }
}

/// Applies a landing classification to the character
#[derive(Debug, Clone)]
pub struct LandingJudge {
    body_radius: f32,
}

impl LandingJudge {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            body_radius: tuning.body_radius,
        }
    }

    /// Judge the landing; failure outcomes kill the character and return its
    /// death animation. A missing target (end of path) counts as a clean miss.
    pub fn judge(
        &self,
        character: &mut Character,
        point: Vec2,
        target: Option<&Platform>,
        tuning: &Tuning,
        sched: &mut FrameScheduler,
    ) -> (LandingOutcome, Option<DeathAnimation>) {
        let outcome = match target {
            Some(target) => classify(point, target, self.body_radius),
            None => {
                log::warn!("Landing with no target platform");
                LandingOutcome::FatalMiss
            }
        };
        log::info!("Landing at {:?}: {:?}", point, outcome);

        let animation = match outcome {
            LandingOutcome::Safe => None,
            LandingOutcome::FatalMiss => Some(DeathAnimation::fall(character, tuning, sched)),
            LandingOutcome::Overbalance(edge) => {
                Some(DeathAnimation::tip(character, edge, tuning, sched))
            }
        };
        (outcome, animation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use proptest::prelude::*;

    fn target() -> Platform {
        Platform::new(2, Vec3::new(500.0, 0.0, 40.0), 50.0)
    }

    #[test]
    fn test_inside_is_safe() {
        assert_eq!(classify(Vec2::new(500.0, 0.0), &target(), 20.0), LandingOutcome::Safe);
        assert_eq!(classify(Vec2::new(460.0, -45.0), &target(), 20.0), LandingOutcome::Safe);
    }

    #[test]
    fn test_boundary_is_safe() {
        assert_eq!(classify(Vec2::new(550.0, 0.0), &target(), 20.0), LandingOutcome::Safe);
        assert_eq!(classify(Vec2::new(450.0, 50.0), &target(), 20.0), LandingOutcome::Safe);
    }

    #[test]
    fn test_far_is_fatal() {
        assert_eq!(classify(Vec2::new(100.0, 0.0), &target(), 20.0), LandingOutcome::FatalMiss);
        assert_eq!(classify(Vec2::new(500.0, 71.0), &target(), 20.0), LandingOutcome::FatalMiss);
    }

    #[test]
    fn test_annulus_overbalances() {
        let t = target();
        let tips = |x: f32, y: f32| classify(Vec2::new(x, y), &t, 20.0);
        assert_eq!(tips(560.0, 0.0), LandingOutcome::Overbalance(Edge::Right));
        assert_eq!(tips(440.0, 0.0), LandingOutcome::Overbalance(Edge::Left));
        assert_eq!(tips(500.0, 60.0), LandingOutcome::Overbalance(Edge::Top));
        assert_eq!(tips(500.0, -60.0), LandingOutcome::Overbalance(Edge::Bottom));
        // Expanded boundary itself still touches
        assert_eq!(tips(570.0, 0.0), LandingOutcome::Overbalance(Edge::Right));
    }

    #[test]
    fn test_corner_priority() {
        let t = target();
        // Past both top and right: top wins
        assert_eq!(overshot_edge(Vec2::new(560.0, 60.0), &t), Edge::Top);
        // Past right and bottom: right wins
        assert_eq!(overshot_edge(Vec2::new(560.0, -60.0), &t), Edge::Right);
        // Past bottom and left: bottom wins
        assert_eq!(overshot_edge(Vec2::new(440.0, -60.0), &t), Edge::Bottom);
        // Past top and left: top wins
        assert_eq!(overshot_edge(Vec2::new(440.0, 60.0), &t), Edge::Top);
    }

    #[test]
    fn test_fall_animation() {
        let tuning = Tuning::default();
        let mut sched = FrameScheduler::new();
        let mut c = Character::new(Vec3::new(100.0, 0.0, 35.0), tuning.head_height);
        let judge = LandingJudge::new(&tuning);
        let (outcome, anim) =
            judge.judge(&mut c, Vec2::new(100.0, 0.0), Some(&target()), &tuning, &mut sched);
        assert_eq!(outcome, LandingOutcome::FatalMiss);
        assert!(c.is_dead());
        let mut anim = anim.expect("fall animation");

        assert!(!anim.advance(&mut c, 100.0, &mut sched));
        assert!((c.position.z - 17.5).abs() < 1e-4);
        assert_eq!(c.position.x, 100.0);
        assert!(anim.advance(&mut c, 100.0, &mut sched));
        assert_eq!(c.position.z, 0.0);
        assert_eq!(c.phase, CharacterPhase::Dead);
        assert_eq!(sched.live_count(), 0);
        assert!(!anim.advance(&mut c, 100.0, &mut sched));
    }

    #[test]
    fn test_tip_animation_rotates() {
        let tuning = Tuning::default();
        let mut sched = FrameScheduler::new();
        let mut c = Character::new(Vec3::new(560.0, 0.0, 30.0), tuning.head_height);
        let judge = LandingJudge::new(&tuning);
        let (outcome, anim) =
            judge.judge(&mut c, Vec2::new(560.0, 0.0), Some(&target()), &tuning, &mut sched);
        assert_eq!(outcome, LandingOutcome::Overbalance(Edge::Right));
        let mut anim = anim.expect("tip animation");
        let mut frames = 0;
        while !anim.advance(&mut c, 50.0, &mut sched) {
            frames += 1;
        }
        assert_eq!(frames, 9);
        assert!((c.orientation.yaw - FRAC_PI_2).abs() < 1e-5);
        assert_eq!(c.orientation.pitch, 0.0);
        assert_eq!(c.position.z, 0.0);
        assert_eq!(c.phase, CharacterPhase::Dead);
    }

    #[test]
    fn test_safe_has_no_animation() {
        let tuning = Tuning::default();
        let mut sched = FrameScheduler::new();
        let mut c = Character::new(Vec3::new(500.0, 0.0, 38.0), tuning.head_height);
        let judge = LandingJudge::new(&tuning);
        let (outcome, anim) =
            judge.judge(&mut c, Vec2::new(500.0, 0.0), Some(&target()), &tuning, &mut sched);
        assert!(outcome.is_safe());
        assert!(anim.is_none());
        assert!(!c.is_dead());
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_missing_target_is_fatal() {
        let tuning = Tuning::default();
        let mut sched = FrameScheduler::new();
        let mut c = Character::new(Vec3::ZERO, tuning.head_height);
        let (outcome, anim) =
            LandingJudge::new(&tuning).judge(&mut c, Vec2::ZERO, None, &tuning, &mut sched);
        assert_eq!(outcome, LandingOutcome::FatalMiss);
        assert!(anim.is_some());
        assert!(c.is_dead());
    }

    proptest! {
        #[test]
        fn prop_partition(x in 300.0f32..700.0, y in -200.0f32..200.0, r in 0.0f32..40.0) {
            let t = target();
            let p = Vec2::new(x, y);
            let inside = t.contains(p, 0.0);
            let touching = t.contains(p, r);
            match classify(p, &t, r) {
                LandingOutcome::Safe => prop_assert!(inside),
                LandingOutcome::FatalMiss => prop_assert!(!touching),
                LandingOutcome::Overbalance(_) => prop_assert!(!inside && touching),
            }
        }
    }
}
