//! Camera re-framing after a safe landing
//!
//! The logical look-at jumps to the floored midpoint of the two platforms at
//! once; the displayed camera follows over a short linear pan. Ground and light
//! are shifted by the same delta immediately, never through the pan, so the
//! world does not visibly slide.

use glam::{Vec2, Vec3};

use super::easing::{Easing, Tween, TweenStep};
use super::scheduler::{FrameHandle, FrameScheduler};
use super::state::{CameraView, Platform, Scenery};
use crate::floored_midpoint;

#[derive(Debug, Clone)]
pub struct CameraFramer {
    /// Displayed camera
    view: CameraView,
    /// Where the current framing ends up
    target: CameraView,
    scenery: Scenery,
    pan: Option<Tween<CameraView>>,
    handle: Option<FrameHandle>,
    pan_ms: f32,
    easing: Easing,
}

impl CameraFramer {
    pub fn new(view: CameraView, scenery: Scenery, pan_ms: f32) -> Self {
        Self {
            view,
            target: view,
            scenery,
            pan: None,
            handle: None,
            pan_ms,
            easing: Easing::Linear,
        }
    }

    /// Use `easing` for subsequent pans
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    /// Default rig: camera high behind the origin looking at it, light above
    pub fn standard(width: f32, height: f32, pan_ms: f32) -> Self {
        let view = CameraView {
            position: Vec3::new(-width * 4.0, -height * 2.0, height * 2.0),
            look_at: Vec3::ZERO,
        };
        let scenery = Scenery {
            ground: Vec3::ZERO,
            light: Vec3::new(300.0, -300.0, 400.0),
            light_target: Vec3::ZERO,
        };
        Self::new(view, scenery, pan_ms)
    }

    /// Camera as currently displayed
    pub fn view(&self) -> CameraView {
        self.view
    }

    /// Logical look-at (already at the latest framing target)
    pub fn look_at(&self) -> Vec3 {
        self.target.look_at
    }

    pub fn scenery(&self) -> Scenery {
        self.scenery
    }

    pub fn is_panning(&self) -> bool {
        self.handle.is_some()
    }

    /// Re-frame on the midpoint of `current` and `next`; returns the planar delta applied.
    ///
    /// `instant` snaps with no animation. Otherwise any running pan is cancelled
    /// without completion and a new one starts from the displayed view.
    pub fn frame(
        &mut self,
        current: &Platform,
        next: &Platform,
        instant: bool,
        sched: &mut FrameScheduler,
    ) -> Vec2 {
        let mid = floored_midpoint(current.center(), next.center());
        let delta = (mid - self.target.look_at.truncate()).floor();
        let camera_xy = (self.target.position.truncate() + delta).floor();

        self.target = CameraView {
            position: camera_xy.extend(self.target.position.z),
            look_at: mid.extend(self.target.look_at.z),
        };
        self.scenery.translate(delta);

        if let Some(pan) = self.pan.as_mut() {
            pan.cancel();
        }
        sched.cancel_slot(&mut self.handle);

        if instant {
            self.pan = None;
            self.view = self.target;
            log::debug!("Camera snapped to {:?}", mid);
        } else {
            self.pan = Some(Tween::new(self.view, self.target, self.pan_ms, self.easing));
            self.handle = Some(sched.request());
            log::debug!("Camera panning by {:?} to {:?}", delta, mid);
        }
        delta
    }

    /// Advance the pan; returns true on the frame it completes
    pub fn advance(&mut self, dt_ms: f32, sched: &mut FrameScheduler) -> bool {
        if self.handle.is_none() {
            return false;
        }
        let Some(pan) = self.pan.as_mut() else {
            sched.cancel_slot(&mut self.handle);
            return false;
        };
        match pan.advance(dt_ms) {
            TweenStep::Running(view) => {
                self.view = view;
                false
            }
            TweenStep::Finished(view) => {
                self.view = view;
                self.pan = None;
                sched.cancel_slot(&mut self.handle);
                true
            }
            TweenStep::Idle => false,
        }
    }

    /// Stop any pan where it is
    pub fn cancel(&mut self, sched: &mut FrameScheduler) {
        if let Some(pan) = self.pan.as_mut() {
            pan.cancel();
        }
        self.pan = None;
        sched.cancel_slot(&mut self.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platforms() -> (Platform, Platform) {
        (
            Platform::new(1, Vec3::new(0.0, 0.0, 40.0), 50.0),
            Platform::new(2, Vec3::new(401.0, 0.0, 40.0), 60.0),
        )
    }

    #[test]
    fn test_instant_frame() {
        let mut sched = FrameScheduler::new();
        let mut cam = CameraFramer::standard(100.0, 100.0, 500.0);
        let (a, b) = platforms();
        let delta = cam.frame(&a, &b, true, &mut sched);
        assert_eq!(delta, Vec2::new(200.0, 0.0));
        assert_eq!(cam.look_at(), Vec3::new(200.0, 0.0, 0.0));
        assert_eq!(cam.view().look_at, Vec3::new(200.0, 0.0, 0.0));
        assert_eq!(cam.view().position, Vec3::new(-200.0, -200.0, 200.0));
        assert!(!cam.is_panning());
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_scenery_moves_synchronously() {
        let mut sched = FrameScheduler::new();
        let mut cam = CameraFramer::standard(100.0, 100.0, 500.0);
        let (a, b) = platforms();
        cam.frame(&a, &b, false, &mut sched);
        // Scenery already moved before any pan frame
        assert_eq!(cam.scenery().ground, Vec3::new(200.0, 0.0, 0.0));
        assert_eq!(cam.scenery().light, Vec3::new(500.0, -300.0, 400.0));
        assert_eq!(cam.scenery().light_target, Vec3::new(200.0, 0.0, 0.0));
        // Displayed camera has not moved yet
        assert_eq!(cam.view().look_at, Vec3::ZERO);
    }

    #[test]
    fn test_pan_completes_once() {
        let mut sched = FrameScheduler::new();
        let mut cam = CameraFramer::standard(100.0, 100.0, 500.0);
        let (a, b) = platforms();
        cam.frame(&a, &b, false, &mut sched);
        assert!(cam.is_panning());
        assert!(!cam.advance(250.0, &mut sched));
        assert_eq!(cam.view().look_at, Vec3::new(100.0, 0.0, 0.0));
        assert!(cam.advance(250.0, &mut sched));
        assert_eq!(cam.view().look_at, Vec3::new(200.0, 0.0, 0.0));
        assert!(!cam.advance(250.0, &mut sched));
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_eased_pan() {
        let mut sched = FrameScheduler::new();
        let mut cam = CameraFramer::standard(100.0, 100.0, 500.0).with_easing(Easing::EaseIn);
        let (a, b) = platforms();
        cam.frame(&a, &b, false, &mut sched);
        assert!(!cam.advance(250.0, &mut sched));
        // Quadratic ease-in covers a quarter of the way at half time
        assert_eq!(cam.view().look_at, Vec3::new(50.0, 0.0, 0.0));
        assert!(cam.advance(250.0, &mut sched));
        assert_eq!(cam.view().look_at, Vec3::new(200.0, 0.0, 0.0));
    }

    #[test]
    fn test_reframe_mid_pan_cancels_previous() {
        let mut sched = FrameScheduler::new();
        let mut cam = CameraFramer::standard(100.0, 100.0, 500.0);
        let (a, b) = platforms();
        let c = Platform::new(3, Vec3::new(401.0, 300.0, 40.0), 50.0);
        cam.frame(&a, &b, false, &mut sched);
        cam.advance(100.0, &mut sched);
        cam.frame(&b, &c, false, &mut sched);
        assert_eq!(sched.live_count(), 1);
        assert_eq!(cam.look_at(), Vec3::new(401.0, 150.0, 0.0));
        while !cam.advance(100.0, &mut sched) {}
        assert_eq!(cam.view().look_at, Vec3::new(401.0, 150.0, 0.0));
        assert_eq!(sched.live_count(), 0);
    }

    #[test]
    fn test_floored_midpoint_negative() {
        let mut sched = FrameScheduler::new();
        let mut cam = CameraFramer::standard(100.0, 100.0, 500.0);
        let a = Platform::new(1, Vec3::new(0.0, 0.0, 40.0), 50.0);
        let b = Platform::new(2, Vec3::new(0.0, -301.0, 40.0), 50.0);
        cam.frame(&a, &b, true, &mut sched);
        assert_eq!(cam.look_at(), Vec3::new(0.0, -151.0, 0.0));
    }
}
