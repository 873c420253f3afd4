//! Scene collaborator boundary
//!
//! The simulation never draws. After every visible mutation it hands the
//! scene a [`RenderFrame`], the full numeric state a renderer needs.

use serde::{Deserialize, Serialize};

use super::state::{BodyPose, CameraView, Orientation, Platform, Scenery};

/// Objects the simulation adds to or removes from the scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SceneObject {
    Character,
    Platform(Platform),
}

/// Everything a renderer must be fed for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub character_position: glam::Vec3,
    pub character_orientation: Orientation,
    pub character_pose: BodyPose,
    pub camera: CameraView,
    pub scenery: Scenery,
    /// Vertical scale of every prop not at rest, by id
    pub prop_scales: Vec<(u32, f32)>,
}

/// Rendering collaborator
pub trait Scene {
    /// Redraw with the latest state
    fn render(&mut self, frame: &RenderFrame);
    fn add(&mut self, object: SceneObject);
    fn remove(&mut self, object: SceneObject);
}

/// Scene that keeps the last frame and counts redraws
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    pub renders: u64,
    pub last: Option<RenderFrame>,
    pub objects: Vec<SceneObject>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform_count(&self) -> usize {
        self.objects
            .iter()
            .filter(|o| matches!(o, SceneObject::Platform(_)))
            .count()
    }
}

impl Scene for FrameRecorder {
    fn render(&mut self, frame: &RenderFrame) {
        self.renders += 1;
        log::trace!("Render #{} character at {:?}", self.renders, frame.character_position);
        self.last = Some(frame.clone());
    }

    fn add(&mut self, object: SceneObject) {
        self.objects.push(object);
    }

    fn remove(&mut self, object: SceneObject) {
        self.objects.retain(|o| *o != object);
    }
}
