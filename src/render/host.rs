//! Render engine and host event-loop interface.
//!
//! The scheduler never blocks. It hands one job to the engine through
//! [`RenderHost::render_animation`] and returns; the host later calls back
//! into the scheduler with lifecycle events (`on_job_start`,
//! `on_job_complete`, `on_job_cancelled`) and periodic ticks. Which of those
//! the host should deliver is controlled by the registration calls below,
//! which the scheduler makes exactly once per session.

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::Result;
use crate::scene::NodeHandle;

/// A job as handed to the render engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub camera: NodeHandle,
    pub camera_name: String,
    pub frame_start: i32,
    pub frame_end: i32,
    /// Directory the engine writes this job's frames into.
    pub output_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// User-facing message reported through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.level, self.message)
    }
}

pub trait RenderHost {
    /// Starts rendering `request` asynchronously and returns immediately.
    fn render_animation(&mut self, request: &RenderRequest) -> Result<()>;

    /// Begin delivering job start / complete / cancel events.
    fn register_lifecycle_listeners(&mut self);

    /// Stop delivering lifecycle events.
    fn unregister_lifecycle_listeners(&mut self);

    /// Begin delivering ticks every `interval`.
    fn start_timer(&mut self, interval: Duration);

    fn stop_timer(&mut self);

    /// Keep the host's event loop routing events to the scheduler.
    fn enter_modal(&mut self) {}

    fn exit_modal(&mut self) {}

    fn notify(&mut self, notice: Notice);

    /// Creates `dir` and any missing parents.
    fn create_output_dir(&mut self, dir: &Path) -> std::io::Result<()> {
        std::fs::create_dir_all(dir)
    }
}
