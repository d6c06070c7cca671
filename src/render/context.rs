use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::render::queue::FrameRange;
use crate::scene::NodeHandle;

/// The scene-level render state a sequence reads and temporarily overrides.
///
/// While a sequence is running the scheduler owns these fields; changing them
/// from outside during that window is a precondition violation and the values
/// are overwritten when the sequence ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneContext {
    pub active_camera: Option<NodeHandle>,
    pub output_path: PathBuf,
    pub frame_start: i32,
    pub frame_end: i32,
    pub frame_step: i32,
}

impl SceneContext {
    #[must_use]
    pub fn new(output_path: impl Into<PathBuf>, frame_start: i32, frame_end: i32) -> Self {
        Self {
            active_camera: None,
            output_path: output_path.into(),
            frame_start,
            frame_end,
            frame_step: 1,
        }
    }

    #[must_use]
    pub fn with_active_camera(mut self, camera: NodeHandle) -> Self {
        self.active_camera = Some(camera);
        self
    }

    #[must_use]
    pub fn frame_range(&self) -> FrameRange {
        FrameRange::new(self.frame_start, self.frame_end).with_step(self.frame_step)
    }

    pub fn set_frame_range(&mut self, start: i32, end: i32) {
        self.frame_start = start;
        self.frame_end = end;
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new("//render/", 1, 250)
    }
}
