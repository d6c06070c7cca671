use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::render::context::SceneContext;
use crate::render::queue::RenderQueue;
use crate::scene::NodeHandle;

/// Lifecycle state of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SchedulerState {
    #[default]
    Idle,
    Running,
    /// Cancelled; scene state is already restored and the next tick tears
    /// the session down.
    Draining,
}

/// Per-sequence bookkeeping plus the scene state captured at start.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// The engine reported the current job as started.
    pub rendering: bool,
    /// A job was handed to the engine and has not reported back yet.
    pub submitted: bool,
    pub cancel_requested: bool,

    pub base_output_path: PathBuf,
    pub base_frame_start: i32,
    pub base_frame_end: i32,
    pub base_camera: Option<NodeHandle>,
    /// Base camera of the rig being rendered.
    pub rig_base: Option<NodeHandle>,

    pub total_jobs: usize,
    pub completed_jobs: usize,
    /// Jobs dropped because their output directory could not be created.
    pub skipped_jobs: usize,
}

impl SessionState {
    /// Captures the scene state that the sequence will override.
    #[must_use]
    pub fn snapshot(ctx: &SceneContext, rig_base: NodeHandle) -> Self {
        Self {
            base_output_path: ctx.output_path.clone(),
            base_frame_start: ctx.frame_start,
            base_frame_end: ctx.frame_end,
            base_camera: ctx.active_camera,
            rig_base: Some(rig_base),
            ..Self::default()
        }
    }

    /// At most one job may be with the engine at any time.
    #[inline]
    #[must_use]
    pub fn job_in_flight(&self) -> bool {
        self.rendering || self.submitted
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.completed_jobs,
            total: self.total_jobs,
        }
    }
}

/// Completed vs. total jobs of the running sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.completed, self.total)
    }
}

/// Everything needed to resume a scheduler, for hosts that persist state
/// between re-entrant calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulerSnapshot {
    pub state: SchedulerState,
    pub queue: RenderQueue,
    pub session: SessionState,
}

impl SchedulerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
