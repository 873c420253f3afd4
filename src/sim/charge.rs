//! Charge-up while the pointer is held
//!
//! Each tick compresses the character by a fixed step until the ratio floor is
//! reached, at which point the loop cancels itself even if input is still
//! held. Release freezes the launch strength from the hold duration.

use glam::Vec3;

use super::scheduler::{FrameHandle, FrameScheduler};
use super::state::{BodyPose, Character, CharacterPhase};
use crate::Tuning;

/// Launch strength for a hold of `hold_ms`: one unit per 10 ms, capped
pub fn strength_from_hold(hold_ms: f64, tuning: &Tuning) -> f32 {
    let units = (hold_ms.max(0.0) / tuning.hold_ms_per_strength).floor() as f32;
    units.min(tuning.max_strength)
}

/// Drives the compression loop for one charge cycle
#[derive(Debug, Clone, Default)]
pub struct ChargeController {
    handle: Option<FrameHandle>,
    /// Character position when the charge began
    origin: Option<Vec3>,
}

impl ChargeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the compression loop is still ticking
    pub fn is_compressing(&self) -> bool {
        self.handle.is_some()
    }

    /// Position snapshot taken at the start of the current charge
    pub fn origin(&self) -> Option<Vec3> {
        self.origin
    }

    /// Start charging. No-op (returns false) if dead, in flight or already charging.
    pub fn begin(&mut self, character: &mut Character, sched: &mut FrameScheduler) -> bool {
        if character.is_dead() {
            log::debug!("Charge ignored: character is dead");
            return false;
        }
        match character.phase {
            CharacterPhase::InFlight => {
                log::debug!("Charge ignored: character is in flight");
                return false;
            }
            CharacterPhase::Charging => {
                log::debug!("Charge ignored: already charging");
                return false;
            }
            _ => {}
        }

        self.origin = Some(character.position);
        character.phase = CharacterPhase::Charging;
        // A dangling loop from an interrupted cycle must not keep ticking
        sched.cancel_slot(&mut self.handle);
        self.handle = Some(sched.request());
        log::debug!("Charge started at {:?}", character.position);
        true
    }

    /// One compression step. Returns the new ratio, or None if the loop is not running.
    pub fn tick(
        &mut self,
        character: &mut Character,
        base_height: f32,
        tuning: &Tuning,
        sched: &mut FrameScheduler,
    ) -> Option<f32> {
        self.handle?;

        let floor = tuning.charge_ratio_min;
        let ratio = (character.charge_ratio - tuning.charge_step).max(floor);
        character.charge_ratio = ratio;
        character.position.z = base_height * ratio;
        character.pose = BodyPose::squashed(ratio, tuning.body_height, tuning.head_height);

        if ratio <= floor {
            log::trace!("Charge reached floor ratio {}", floor);
            sched.cancel_slot(&mut self.handle);
        }
        Some(ratio)
    }

    /// Release. Cancels the loop and returns the frozen launch strength, or
    /// None when there is nothing to release (in flight, dead, not charging).
    pub fn end(
        &mut self,
        character: &mut Character,
        hold_ms: f64,
        tuning: &Tuning,
        sched: &mut FrameScheduler,
    ) -> Option<f32> {
        sched.cancel_slot(&mut self.handle);

        if character.is_in_flight() {
            log::debug!("Release ignored: already in flight");
            return None;
        }
        if !character.is_charging() {
            log::debug!("Release ignored: no charge in progress");
            return None;
        }

        let strength = strength_from_hold(hold_ms, tuning);
        character.launch_strength = strength;
        log::debug!("Released after {:.0} ms, strength {}", hold_ms, strength);
        Some(strength)
    }

    /// Forget the current cycle (reset)
    pub fn clear(&mut self, sched: &mut FrameScheduler) {
        sched.cancel_slot(&mut self.handle);
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn setup() -> (Character, ChargeController, FrameScheduler, Tuning) {
        let tuning = Tuning::default();
        let character = Character::new(Vec3::new(0.0, 0.0, 40.0), tuning.head_height);
        (character, ChargeController::new(), FrameScheduler::new(), tuning)
    }

    #[test]
    fn test_strength_from_hold() {
        let tuning = Tuning::default();
        assert_eq!(strength_from_hold(0.0, &tuning), 0.0);
        assert_eq!(strength_from_hold(9.9, &tuning), 0.0);
        assert_eq!(strength_from_hold(555.0, &tuning), 55.0);
        assert_eq!(strength_from_hold(1400.0, &tuning), 140.0);
        assert_eq!(strength_from_hold(2000.0, &tuning), 140.0);
        assert_eq!(strength_from_hold(-50.0, &tuning), 0.0);
    }

    #[test]
    fn test_charge_compresses_to_floor_and_stops() {
        let (mut c, mut charge, mut sched, tuning) = setup();
        assert!(charge.begin(&mut c, &mut sched));
        assert_eq!(sched.live_count(), 1);

        let mut ticks = 0;
        while charge.tick(&mut c, 40.0, &tuning, &mut sched).is_some() {
            ticks += 1;
            assert!(ticks < 1000, "charge loop never terminated");
        }
        // 0.5 / 0.008 = 62.5 steps
        assert_eq!(ticks, 63);
        assert_eq!(c.charge_ratio, 0.5);
        assert_eq!(c.position.z, 20.0);
        assert_eq!(c.pose.scale, Vec3::new(1.5, 1.5, 0.5));
        assert_eq!(sched.live_count(), 0);
        // Still held: phase stays Charging
        assert!(c.is_charging());
    }

    #[test]
    fn test_begin_refused_when_dead_or_flying() {
        let (mut c, mut charge, mut sched, _) = setup();
        c.phase = CharacterPhase::InFlight;
        assert!(!charge.begin(&mut c, &mut sched));
        c.phase = CharacterPhase::Dead;
        assert!(!charge.begin(&mut c, &mut sched));
        c.phase = CharacterPhase::Dying;
        assert!(!charge.begin(&mut c, &mut sched));
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_release_cancels_loop() {
        let (mut c, mut charge, mut sched, tuning) = setup();
        charge.begin(&mut c, &mut sched);
        charge.tick(&mut c, 40.0, &tuning, &mut sched);
        let strength = charge.end(&mut c, 730.0, &tuning, &mut sched);
        assert_eq!(strength, Some(73.0));
        assert_eq!(c.launch_strength, 73.0);
        assert_eq!(sched.live_count(), 0);
        assert_eq!(charge.tick(&mut c, 40.0, &tuning, &mut sched), None);
    }

    #[test]
    fn test_release_in_flight_is_noop() {
        let (mut c, mut charge, mut sched, tuning) = setup();
        charge.begin(&mut c, &mut sched);
        c.phase = CharacterPhase::InFlight;
        c.launch_strength = 12.0;
        assert_eq!(charge.end(&mut c, 1000.0, &tuning, &mut sched), None);
        assert_eq!(c.launch_strength, 12.0);
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_origin_snapshot() {
        let (mut c, mut charge, mut sched, _) = setup();
        c.position = Vec3::new(12.0, 34.0, 40.0);
        charge.begin(&mut c, &mut sched);
        assert_eq!(charge.origin(), Some(Vec3::new(12.0, 34.0, 40.0)));
    }

    proptest! {
        #[test]
        fn prop_ratio_monotonic_and_bounded(ticks in 0usize..200) {
            let (mut c, mut charge, mut sched, tuning) = setup();
            charge.begin(&mut c, &mut sched);
            let mut prev = c.charge_ratio;
            for _ in 0..ticks {
                charge.tick(&mut c, 40.0, &tuning, &mut sched);
                prop_assert!(c.charge_ratio <= prev);
                prop_assert!((0.5..=1.0).contains(&c.charge_ratio));
                prev = c.charge_ratio;
            }
        }

        #[test]
        fn prop_strength_capped(hold in 0.0f64..100_000.0) {
            let s = strength_from_hold(hold, &Tuning::default());
            prop_assert!((0.0..=140.0).contains(&s));
        }
    }
}
