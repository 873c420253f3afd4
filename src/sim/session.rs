//! Game session: the gameplay state machine
//!
//! Idle → Charging (pointer held) → InFlight (released) → Idle on a safe
//! landing, or Dying → Dead on a miss. Each call to [`GameSession::frame`] is
//! one display refresh: charge and flight advance one fixed step, tweens
//! advance by the frame's wall-clock delta.

use glam::{Vec2, Vec3};

use super::camera::CameraFramer;
use super::charge::ChargeController;
use super::direction::{heading_to, unsigned_heading_to};
use super::easing::{Keyframes, TweenStep};
use super::landing::{DeathAnimation, LandingJudge, LandingOutcome};
use super::props::{PlatformProvider, PropRelease};
use super::scene::{RenderFrame, Scene, SceneObject};
use super::scheduler::{FrameHandle, FrameScheduler};
use super::state::{Character, GameEvent, Platform};
use super::trajectory::{FlightState, FlightStep};
use crate::consts::{PROP_REBOUND_TIMES, PROP_REBOUND_VALUES};
use crate::{Tuning, planar};

/// Squash-and-rebound of the prop the character jumped from
#[derive(Debug, Clone)]
struct PropRebound {
    prop: u32,
    track: Keyframes,
    handle: Option<FrameHandle>,
}

impl PropRebound {
    fn start(release: PropRelease, sched: &mut FrameScheduler) -> Self {
        let mut values = Vec::with_capacity(PROP_REBOUND_TIMES.len());
        values.push(release.ratio);
        values.extend_from_slice(&PROP_REBOUND_VALUES);
        Self {
            prop: release.prop,
            track: Keyframes::new(&PROP_REBOUND_TIMES, &values),
            handle: Some(sched.request()),
        }
    }
}

fn camera_rig(tuning: &Tuning) -> CameraFramer {
    CameraFramer::standard(tuning.view_width, tuning.view_height, tuning.camera_pan_ms)
        .with_easing(tuning.camera_easing)
}

/// One run of the game
pub struct GameSession<P: PlatformProvider, S: Scene> {
    tuning: Tuning,
    character: Character,
    provider: P,
    scene: S,
    sched: FrameScheduler,
    charge: ChargeController,
    flight: Option<FlightState>,
    judge: LandingJudge,
    death: Option<DeathAnimation>,
    camera: CameraFramer,
    /// One rebound per released prop, running independently
    rebounds: Vec<PropRebound>,
    /// Platforms currently on stage, oldest first
    stage: Vec<Platform>,
    press_started_ms: Option<f64>,
    jumps: u32,
    events: Vec<GameEvent>,
}

impl<P: PlatformProvider, S: Scene> GameSession<P, S> {
    pub fn new(tuning: Tuning, provider: P, scene: S) -> Self {
        let camera = camera_rig(&tuning);
        let mut session = Self {
            character: Character::new(Vec3::ZERO, tuning.head_height),
            judge: LandingJudge::new(&tuning),
            camera,
            tuning,
            provider,
            scene,
            sched: FrameScheduler::new(),
            charge: ChargeController::new(),
            flight: None,
            death: None,
            rebounds: Vec::new(),
            stage: Vec::new(),
            press_started_ms: None,
            jumps: 0,
            events: Vec::new(),
        };
        session.enter_stage();
        session
    }

    /// Place the character on the first platform and frame it
    fn enter_stage(&mut self) {
        let height = self.provider.prop_height();
        let start = self.provider.current_prop().copied();
        let position = match start {
            Some(p) => p.center().extend(height),
            None => {
                log::warn!("No starting platform, placing character at origin");
                Vec3::new(0.0, 0.0, height)
            }
        };
        self.character = Character::new(position, self.tuning.head_height);

        if let Some(start) = start {
            self.camera.frame(&start, &start, true, &mut self.sched);
            self.show_platform(start);
        }
        if let Some(next) = self.provider.next_prop().copied() {
            self.show_platform(next);
        }
        self.provider.enter_stage(&self.character);
        self.scene.add(SceneObject::Character);
        log::info!("Character entered stage at {:?}", position);
        self.render();
    }

    fn show_platform(&mut self, platform: Platform) {
        self.stage.push(platform);
        self.scene.add(SceneObject::Platform(platform));
    }

    /// Drop platforms that are behind both the current and the next one
    fn prune_stage(&mut self) {
        let keep = [
            self.provider.current_prop().map(|p| p.id),
            self.provider.next_prop().map(|p| p.id),
        ];
        while self.stage.len() > 3 {
            let oldest = self.stage[0];
            if keep.contains(&Some(oldest.id)) {
                break;
            }
            self.stage.remove(0);
            self.scene.remove(SceneObject::Platform(oldest));
        }
    }

    pub fn character(&self) -> &Character {
        &self.character
    }

    pub fn camera(&self) -> &CameraFramer {
        &self.camera
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.sched
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Completed safe jumps
    pub fn jumps(&self) -> u32 {
        self.jumps
    }

    /// No loop is running and no charge is held
    pub fn is_settled(&self) -> bool {
        self.sched.live_count() == 0 && !self.character.is_charging()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Pointer pressed at `timestamp_ms`
    pub fn pointer_down(&mut self, timestamp_ms: f64) -> bool {
        if self.begin_charge() {
            self.press_started_ms = Some(timestamp_ms);
            true
        } else {
            false
        }
    }

    /// Pointer released at `timestamp_ms`
    pub fn pointer_up(&mut self, timestamp_ms: f64) -> bool {
        let Some(started) = self.press_started_ms.take() else {
            log::debug!("Pointer up without a matching press");
            return false;
        };
        self.end_charge(timestamp_ms - started)
    }

    /// Start charging; refused when dead, in flight, or at the end of the path
    pub fn begin_charge(&mut self) -> bool {
        if self.provider.next_prop().is_none() {
            log::debug!("Charge ignored: no platform left to jump to");
            return false;
        }
        if !self.charge.begin(&mut self.character, &mut self.sched) {
            return false;
        }
        self.events.push(GameEvent::ChargeStarted);
        true
    }

    /// Release after `hold_ms` and launch
    pub fn end_charge(&mut self, hold_ms: f64) -> bool {
        let released = self
            .charge
            .end(&mut self.character, hold_ms, &self.tuning, &mut self.sched);
        let Some(strength) = released else {
            return false;
        };

        if let Some(release) = self.provider.loosen_prop() {
            // Only a re-release of the same prop restarts its rebound
            if let Some(i) = self.rebounds.iter().position(|r| r.prop == release.prop) {
                let mut old = self.rebounds.remove(i);
                old.track.cancel();
                self.sched.cancel_slot(&mut old.handle);
            }
            self.rebounds.push(PropRebound::start(release, &mut self.sched));
        }

        let origin = self.charge.origin().unwrap_or(self.character.position);
        let axis = self.provider.new_create_direction();
        let target = self.provider.next_prop().map(|p| p.position);
        let heading = if self.tuning.legacy_unsigned_heading {
            unsigned_heading_to(origin, target, axis)
        } else {
            heading_to(origin, target, axis)
        }
        .unwrap_or(0.0);

        let base_height = self.provider.prop_height();
        match FlightState::launch(
            &mut self.character,
            origin,
            base_height,
            heading,
            axis,
            &self.tuning,
            &mut self.sched,
        ) {
            Some(flight) => {
                self.flight = Some(flight);
                self.events.push(GameEvent::Launched {
                    strength,
                    heading,
                    axis,
                });
                self.render();
                true
            }
            None => false,
        }
    }

    /// Advance one display refresh
    pub fn frame(&mut self, dt_ms: f32) {
        let mut dirty = false;

        let height = self.provider.prop_height();
        if let Some(ratio) = self
            .charge
            .tick(&mut self.character, height, &self.tuning, &mut self.sched)
        {
            self.provider.press_prop(ratio);
            dirty = true;
        }

        let step = self
            .flight
            .as_mut()
            .map(|f| f.step(&mut self.character, &mut self.sched));
        match step {
            Some(FlightStep::Airborne) => dirty = true,
            Some(FlightStep::Landed(point)) => {
                self.flight = None;
                self.land(point);
                dirty = true;
            }
            Some(FlightStep::Idle) => self.flight = None,
            None => {}
        }

        if let Some(death) = self.death.as_mut() {
            if death.is_active() {
                dirty = true;
            }
            if death.advance(&mut self.character, dt_ms, &mut self.sched) {
                self.death = None;
                log::info!("Game over after {} jumps", self.jumps);
                self.events.push(GameEvent::GameOver { jumps: self.jumps });
            }
        }

        if self.camera.is_panning() {
            dirty = true;
            if self.camera.advance(dt_ms, &mut self.sched) {
                self.events.push(GameEvent::CameraSettled);
            }
        }

        for rebound in self.rebounds.iter_mut() {
            match rebound.track.advance(dt_ms) {
                TweenStep::Running(scale) => {
                    self.provider.set_prop_scale(rebound.prop, scale);
                    dirty = true;
                }
                TweenStep::Finished(scale) => {
                    self.provider.set_prop_scale(rebound.prop, scale);
                    self.sched.cancel_slot(&mut rebound.handle);
                    self.events.push(GameEvent::PropSettled);
                    dirty = true;
                }
                TweenStep::Idle => {}
            }
        }
        self.rebounds.retain(|r| r.handle.is_some());

        if dirty {
            self.render();
        }
    }

    fn land(&mut self, point: Vec2) {
        let target = self.provider.next_prop().copied();
        let (outcome, death) = self.judge.judge(
            &mut self.character,
            point,
            target.as_ref(),
            &self.tuning,
            &mut self.sched,
        );
        self.events.push(GameEvent::Landed(outcome));

        match outcome {
            LandingOutcome::Safe => {
                self.jumps += 1;
                self.character.position.z = self.provider.prop_height();
                let current = self.provider.current_prop().copied();
                if let (Some(current), Some(target)) = (current, target) {
                    self.camera.frame(&current, &target, false, &mut self.sched);
                }
                if let Some(spawned) = self.provider.create_prop() {
                    self.show_platform(spawned);
                    self.events.push(GameEvent::PlatformSpawned(spawned));
                }
                self.prune_stage();
            }
            LandingOutcome::FatalMiss | LandingOutcome::Overbalance(_) => {
                self.death = death;
            }
        }
    }

    /// Start over on a fresh path. The only way out of the dead state.
    pub fn reset(&mut self, provider: P) {
        log::info!("Session reset after {} jumps", self.jumps);
        self.charge.clear(&mut self.sched);
        if let Some(mut flight) = self.flight.take() {
            flight.cancel(&mut self.sched);
        }
        if let Some(mut death) = self.death.take() {
            death.cancel(&mut self.sched);
        }
        for mut rebound in self.rebounds.drain(..) {
            rebound.track.cancel();
            self.sched.cancel_slot(&mut rebound.handle);
        }
        self.camera.cancel(&mut self.sched);
        self.sched.cancel_all();

        for platform in self.stage.drain(..) {
            self.scene.remove(SceneObject::Platform(platform));
        }
        self.scene.remove(SceneObject::Character);

        self.provider = provider;
        self.camera = camera_rig(&self.tuning);
        self.press_started_ms = None;
        self.jumps = 0;
        self.events.clear();
        self.enter_stage();
    }

    /// Current render state
    pub fn snapshot(&self) -> RenderFrame {
        let prop_scales = self
            .stage
            .iter()
            .map(|p| (p.id, self.provider.prop_scale(p.id)))
            .filter(|(_, s)| *s != 1.0)
            .collect();
        RenderFrame {
            character_position: self.character.position,
            character_orientation: self.character.orientation,
            character_pose: self.character.pose,
            camera: self.camera.view(),
            scenery: self.camera.scenery(),
            prop_scales,
        }
    }

    fn render(&mut self) {
        let frame = self.snapshot();
        self.scene.render(&frame);
    }

    /// Planar distance from the character to the next platform's center
    pub fn distance_to_next(&self) -> Option<f32> {
        self.provider
            .next_prop()
            .map(|p| (p.center() - planar(self.character.position)).length())
    }
}
