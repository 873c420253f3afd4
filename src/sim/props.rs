//! Platform provider
//!
//! The simulation only reads the current and next platform, asks for the next
//! one to be spawned, and pushes squash feedback onto the platform the
//! character stands on. [`PlatformPath`] is the reference provider: a seeded
//! random path, or a fixed script that ends when it runs out.

use std::collections::VecDeque;

use glam::{Vec2, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::state::{Character, Platform, TravelAxis};
use crate::tuning::SpawnRules;

/// Handle for animating a released prop back to rest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropRelease {
    pub prop: u32,
    /// Scale the prop was released at
    pub ratio: f32,
}

/// Source of platforms for the session
pub trait PlatformProvider {
    /// Platform the character stands on
    fn current_prop(&self) -> Option<&Platform>;
    /// Jump target; None at the end of the path
    fn next_prop(&self) -> Option<&Platform>;
    /// Height of platform tops
    fn prop_height(&self) -> f32;
    /// Axis along which the next platform was placed
    fn new_create_direction(&self) -> TravelAxis;
    /// Compress the current platform to `ratio`
    fn press_prop(&mut self, ratio: f32);
    /// Release the current platform; the caller animates it back to rest
    fn loosen_prop(&mut self) -> Option<PropRelease>;
    /// Vertical scale of a prop
    fn prop_scale(&self, prop: u32) -> f32;
    fn set_prop_scale(&mut self, prop: u32, scale: f32);
    /// Promote next to current and spawn a new next
    fn create_prop(&mut self) -> Option<Platform>;
    /// Character placed on the stage
    fn enter_stage(&mut self, _character: &Character) {}
}

enum Source {
    Seeded { rng: Pcg32, rules: SpawnRules },
    Scripted(VecDeque<Platform>),
}

/// Reference platform path
pub struct PlatformPath {
    source: Source,
    current: Platform,
    next: Option<Platform>,
    next_axis: TravelAxis,
    prop_height: f32,
    /// (prop id, vertical scale) for props not at rest
    scales: Vec<(u32, f32)>,
    next_id: u32,
}

impl PlatformPath {
    /// Random path from `seed`; the first platform sits at the origin
    pub fn seeded(seed: u64, rules: SpawnRules) -> Self {
        let half_width = (rules.min_half_width + rules.max_half_width) / 2.0;
        let prop_height = rules.prop_height;
        let current = Platform::new(1, Vec3::new(0.0, 0.0, prop_height), half_width);
        let mut path = Self {
            source: Source::Seeded {
                rng: Pcg32::seed_from_u64(seed),
                rules,
            },
            current,
            next: None,
            next_axis: TravelAxis::AlongX,
            prop_height,
            scales: Vec::new(),
            next_id: 2,
        };
        path.next = path.spawn();
        log::info!("Platform path seeded with {}", seed);
        path
    }

    /// Fixed path; the first two platforms are current and next
    pub fn scripted(platforms: Vec<Platform>, prop_height: f32) -> Option<Self> {
        let mut queue: VecDeque<Platform> = platforms.into();
        let current = queue.pop_front()?;
        let next_id = queue.iter().map(|p| p.id).max().unwrap_or(current.id).max(current.id) + 1;
        let mut path = Self {
            source: Source::Scripted(queue),
            current,
            next: None,
            next_axis: TravelAxis::AlongX,
            prop_height,
            scales: Vec::new(),
            next_id,
        };
        path.next = path.spawn();
        Some(path)
    }

    fn spawn(&mut self) -> Option<Platform> {
        let from = self.current.center();
        match &mut self.source {
            Source::Seeded { rng, rules } => {
                let axis = if rng.random_bool(0.5) {
                    TravelAxis::AlongX
                } else {
                    TravelAxis::AlongY
                };
                let distance = sample(rng, rules.min_distance, rules.max_distance);
                let half_width = sample(rng, rules.min_half_width, rules.max_half_width).floor();
                let center = (from + axis.reference() * distance).floor();
                let id = self.next_id;
                self.next_id += 1;
                self.next_axis = axis;
                Some(Platform::new(id, center.extend(self.prop_height), half_width))
            }
            Source::Scripted(queue) => {
                let platform = queue.pop_front()?;
                self.next_axis = axis_between(from, platform.center());
                Some(platform)
            }
        }
    }
}

fn sample(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    if max > min { rng.random_range(min..max) } else { min }
}

/// Dominant axis of the step from `from` to `to`
fn axis_between(from: Vec2, to: Vec2) -> TravelAxis {
    let d = (to - from).abs();
    if d.y > d.x {
        TravelAxis::AlongY
    } else {
        TravelAxis::AlongX
    }
}

impl PlatformProvider for PlatformPath {
    fn current_prop(&self) -> Option<&Platform> {
        Some(&self.current)
    }

    fn next_prop(&self) -> Option<&Platform> {
        self.next.as_ref()
    }

    fn prop_height(&self) -> f32 {
        self.prop_height
    }

    fn new_create_direction(&self) -> TravelAxis {
        self.next_axis
    }

    fn press_prop(&mut self, ratio: f32) {
        let id = self.current.id;
        self.set_prop_scale(id, ratio);
    }

    fn loosen_prop(&mut self) -> Option<PropRelease> {
        let prop = self.current.id;
        Some(PropRelease {
            prop,
            ratio: self.prop_scale(prop),
        })
    }

    fn prop_scale(&self, prop: u32) -> f32 {
        self.scales
            .iter()
            .find(|(id, _)| *id == prop)
            .map(|(_, s)| *s)
            .unwrap_or(1.0)
    }

    fn set_prop_scale(&mut self, prop: u32, scale: f32) {
        match self.scales.iter_mut().find(|(id, _)| *id == prop) {
            Some(entry) => entry.1 = scale,
            None => self.scales.push((prop, scale)),
        }
        self.scales.retain(|(_, s)| *s != 1.0);
    }

    fn create_prop(&mut self) -> Option<Platform> {
        let landed = self.next.take()?;
        self.current = landed;
        self.next = self.spawn();
        match &self.next {
            Some(p) => log::debug!(
                "Spawned platform {} at {:?} ({})",
                p.id,
                p.position,
                self.next_axis.as_str()
            ),
            None => log::info!("Platform path exhausted"),
        }
        self.next
    }

    fn enter_stage(&mut self, character: &Character) {
        log::debug!("Character entered stage at {:?}", character.position);
    }
}
