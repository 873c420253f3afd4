//! Time-driven interpolation
//!
//! A [`Tween`] sweeps a progress value `p` from 0 to 1 over a fixed duration and
//! yields `start * (1 - p) + end * p` once per frame. [`Keyframes`] does the
//! same for a piecewise-linear scalar track. Both can be cancelled, after which
//! they never report completion.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

/// Easing function types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Constant velocity
    #[default]
    Linear,
    /// Slow start, accelerate
    EaseIn,
    /// Fast start, decelerate
    EaseOut,
    /// Slow start and end
    EaseInOut,
}

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseIn => t * t,
        Easing::EaseOut => 1.0 - (1.0 - t).powi(2),
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
    }
}

/// Values that can be blended component-wise
pub trait Lerp: Copy {
    fn lerp(self, end: Self, p: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, end: Self, p: f32) -> Self {
        self * (1.0 - p) + end * p
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp(self, end: Self, p: f32) -> Self {
        self * (1.0 - p) + end * p
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp(self, end: Self, p: f32) -> Self {
        self * (1.0 - p) + end * p
    }
}

/// Result of advancing an animation by one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenStep<T> {
    /// Intermediate value, animation continues
    Running(T),
    /// Final value; reported exactly once
    Finished(T),
    /// Animation already finished or was cancelled
    Idle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    Running,
    Finished,
    Cancelled,
}

/// A start→end interpolation over a duration in milliseconds
#[derive(Debug, Clone)]
pub struct Tween<T: Lerp> {
    start: T,
    end: T,
    duration_ms: f32,
    elapsed_ms: f32,
    easing: Easing,
    playback: Playback,
}

impl<T: Lerp> Tween<T> {
    pub fn new(start: T, end: T, duration_ms: f32, easing: Easing) -> Self {
        Self {
            start,
            end,
            duration_ms: duration_ms.max(0.0),
            elapsed_ms: 0.0,
            easing,
            playback: Playback::Running,
        }
    }

    pub fn linear(start: T, end: T, duration_ms: f32) -> Self {
        Self::new(start, end, duration_ms, Easing::Linear)
    }

    /// Raw time progress in [0, 1]
    pub fn progress(&self) -> f32 {
        if self.duration_ms <= 0.0 {
            1.0
        } else {
            (self.elapsed_ms / self.duration_ms).clamp(0.0, 1.0)
        }
    }

    /// Interpolated value at the current progress
    pub fn value(&self) -> T {
        self.start.lerp(self.end, ease(self.progress(), self.easing))
    }

    pub fn is_running(&self) -> bool {
        self.playback == Playback::Running
    }

    pub fn is_cancelled(&self) -> bool {
        self.playback == Playback::Cancelled
    }

    /// Abort without completion
    pub fn cancel(&mut self) {
        if self.playback == Playback::Running {
            self.playback = Playback::Cancelled;
        }
    }

    /// Advance by `dt_ms` and return the value for this frame
    pub fn advance(&mut self, dt_ms: f32) -> TweenStep<T> {
        if self.playback != Playback::Running {
            return TweenStep::Idle;
        }
        self.elapsed_ms += dt_ms.max(0.0);
        if self.progress() >= 1.0 {
            self.playback = Playback::Finished;
            // p == 1 exactly: land on the end value with no easing residue
            TweenStep::Finished(self.end)
        } else {
            TweenStep::Running(self.value())
        }
    }
}

/// Piecewise-linear scalar track (`times` in seconds)
#[derive(Debug, Clone)]
pub struct Keyframes {
    times: Vec<f32>,
    values: Vec<f32>,
    elapsed_s: f32,
    playback: Playback,
}

impl Keyframes {
    /// `times` and `values` are paired; extra entries on either side are ignored
    pub fn new(times: &[f32], values: &[f32]) -> Self {
        let len = times.len().min(values.len());
        Self {
            times: times[..len].to_vec(),
            values: values[..len].to_vec(),
            elapsed_s: 0.0,
            playback: Playback::Running,
        }
    }

    pub fn duration_s(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    /// Value of the track at `time_s`
    pub fn sample(&self, time_s: f32) -> f32 {
        let (Some(&first_t), Some(&last_v)) = (self.times.first(), self.values.last()) else {
            return 1.0;
        };
        if time_s <= first_t {
            return self.values[0];
        }
        for i in 1..self.times.len() {
            let (t0, t1) = (self.times[i - 1], self.times[i]);
            if time_s <= t1 {
                let span = t1 - t0;
                let p = if span > 0.0 { (time_s - t0) / span } else { 1.0 };
                return Lerp::lerp(self.values[i - 1], self.values[i], p);
            }
        }
        last_v
    }

    pub fn is_running(&self) -> bool {
        self.playback == Playback::Running
    }

    pub fn cancel(&mut self) {
        if self.playback == Playback::Running {
            self.playback = Playback::Cancelled;
        }
    }

    pub fn advance(&mut self, dt_ms: f32) -> TweenStep<f32> {
        if self.playback != Playback::Running {
            return TweenStep::Idle;
        }
        self.elapsed_s += dt_ms.max(0.0) / 1000.0;
        let value = self.sample(self.elapsed_s);
        if self.elapsed_s >= self.duration_s() {
            self.playback = Playback::Finished;
            TweenStep::Finished(value)
        } else {
            TweenStep::Running(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ease_bounds() {
        for easing in [Easing::Linear, Easing::EaseIn, Easing::EaseOut, Easing::EaseInOut] {
            assert!(ease(0.0, easing).abs() < 1e-6, "{:?} should start at 0", easing);
            assert!((ease(1.0, easing) - 1.0).abs() < 1e-6, "{:?} should end at 1", easing);
        }
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease(-0.5, Easing::Linear), 0.0);
        assert_eq!(ease(1.5, Easing::EaseIn), 1.0);
    }

    #[test]
    fn test_tween_linear_midpoint() {
        let mut tween = Tween::linear(10.0_f32, 20.0, 100.0);
        assert_eq!(tween.advance(50.0), TweenStep::Running(15.0));
        assert_eq!(tween.advance(50.0), TweenStep::Finished(20.0));
        assert_eq!(tween.advance(50.0), TweenStep::Idle);
    }

    #[test]
    fn test_tween_vec3() {
        let mut tween = Tween::linear(Vec3::ZERO, Vec3::new(4.0, -8.0, 0.0), 400.0);
        match tween.advance(100.0) {
            TweenStep::Running(v) => assert!((v - Vec3::new(1.0, -2.0, 0.0)).length() < 1e-5),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_cancel_never_completes() {
        let mut tween = Tween::linear(0.0_f32, 1.0, 100.0);
        tween.advance(30.0);
        tween.cancel();
        assert!(tween.is_cancelled());
        assert_eq!(tween.advance(1000.0), TweenStep::Idle);
    }

    #[test]
    fn test_zero_duration_finishes_immediately() {
        let mut tween = Tween::linear(3.0_f32, 7.0, 0.0);
        assert_eq!(tween.advance(0.0), TweenStep::Finished(7.0));
    }

    #[test]
    fn test_independent_instances() {
        let mut a = Tween::linear(0.0_f32, 1.0, 100.0);
        let mut b = Tween::linear(0.0_f32, 1.0, 200.0);
        a.advance(100.0);
        assert!(!a.is_running());
        assert_eq!(b.advance(100.0), TweenStep::Running(0.5));
    }

    #[test]
    fn test_keyframes_sample() {
        let track = Keyframes::new(&[0.0, 0.5, 1.0], &[0.6, 1.1, 1.0]);
        assert!((track.sample(0.0) - 0.6).abs() < 1e-6);
        assert!((track.sample(0.25) - 0.85).abs() < 1e-6);
        assert!((track.sample(0.75) - 1.05).abs() < 1e-6);
        assert!((track.sample(5.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_keyframes_finish_once() {
        let mut track = Keyframes::new(&[0.0, 1.0], &[0.5, 1.0]);
        assert!(matches!(track.advance(500.0), TweenStep::Running(_)));
        assert_eq!(track.advance(500.0), TweenStep::Finished(1.0));
        assert_eq!(track.advance(500.0), TweenStep::Idle);
    }
}
