//! A [`RenderHost`] without a render engine behind it.
//!
//! Every call is recorded so that a driver (a dry-run tool or a test) can
//! inspect what the scheduler asked for and feed lifecycle events back by
//! hand. Output directories are only recorded unless disk output is enabled.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{MulticamError, Result};
use crate::render::host::{Notice, NoticeLevel, RenderHost, RenderRequest};

#[derive(Debug, Default)]
pub struct HeadlessHost {
    pub requests: Vec<RenderRequest>,
    pub notices: Vec<Notice>,
    pub created_dirs: Vec<PathBuf>,

    listeners_registered: bool,
    listener_registrations: usize,
    timer: Option<Duration>,
    modal: bool,

    write_to_disk: bool,
    failing_dirs: Vec<PathBuf>,
    reject_renders: bool,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Actually create output directories on disk.
    #[must_use]
    pub fn with_disk_output(mut self) -> Self {
        self.write_to_disk = true;
        self
    }

    /// Make directory creation fail for `dir`.
    #[must_use]
    pub fn failing_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.failing_dirs.push(dir.into());
        self
    }

    /// Make every `render_animation` call fail.
    #[must_use]
    pub fn rejecting_renders(mut self) -> Self {
        self.reject_renders = true;
        self
    }

    #[must_use]
    pub fn listeners_registered(&self) -> bool {
        self.listeners_registered
    }

    /// How many times listeners were registered over the host's lifetime.
    #[must_use]
    pub fn listener_registrations(&self) -> usize {
        self.listener_registrations
    }

    #[must_use]
    pub fn timer_interval(&self) -> Option<Duration> {
        self.timer
    }

    #[must_use]
    pub fn is_modal(&self) -> bool {
        self.modal
    }

    #[must_use]
    pub fn last_request(&self) -> Option<&RenderRequest> {
        self.requests.last()
    }

    #[must_use]
    pub fn notice_count(&self, level: NoticeLevel) -> usize {
        self.notices.iter().filter(|n| n.level == level).count()
    }
}

impl RenderHost for HeadlessHost {
    fn render_animation(&mut self, request: &RenderRequest) -> Result<()> {
        if self.reject_renders {
            return Err(MulticamError::Engine(format!(
                "render rejected for {}",
                request.camera_name
            )));
        }
        log::debug!(
            "headless render: {} frames {}..={} -> {}",
            request.camera_name,
            request.frame_start,
            request.frame_end,
            request.output_path.display()
        );
        self.requests.push(request.clone());
        Ok(())
    }

    fn register_lifecycle_listeners(&mut self) {
        self.listeners_registered = true;
        self.listener_registrations += 1;
    }

    fn unregister_lifecycle_listeners(&mut self) {
        self.listeners_registered = false;
    }

    fn start_timer(&mut self, interval: Duration) {
        self.timer = Some(interval);
    }

    fn stop_timer(&mut self) {
        self.timer = None;
    }

    fn enter_modal(&mut self) {
        self.modal = true;
    }

    fn exit_modal(&mut self) {
        self.modal = false;
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    fn create_output_dir(&mut self, dir: &Path) -> std::io::Result<()> {
        if self.failing_dirs.iter().any(|d| d == dir) {
            return Err(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                format!("cannot create {}", dir.display()),
            ));
        }
        if self.write_to_disk {
            std::fs::create_dir_all(dir)?;
        }
        self.created_dirs.push(dir.to_path_buf());
        Ok(())
    }
}
