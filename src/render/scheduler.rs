//! Render Queue Scheduler
//!
//! Serializes an asynchronous render engine into an ordered, cancellable
//! sequence of render jobs.
//!
//! # State machine
//!
//! ```text
//!          start()                 queue empty / cancel seen by tick()
//!   Idle ───────────► Running ───────────────────────────────────────► Idle
//!                        │                                              ▲
//!                        │ cancel() / on_job_cancelled()                │
//!                        ▼                                              │
//!                     Draining ───────────── next tick() ───────────────┘
//! ```
//!
//! The scheduler never blocks. [`RenderScheduler::tick`] hands at most one job
//! to the engine and returns; the host calls back with lifecycle events. Only
//! the tick handler advances the queue head towards the engine, and every
//! terminal path runs through one idempotent [`RenderScheduler::teardown`].
//!
//! While a sequence is active the scheduler owns the active camera, output
//! path and frame range of the [`SceneContext`]; changing them from outside
//! in that window is a precondition violation.

use std::path::PathBuf;

use crate::errors::{MulticamError, Result};
use crate::render::context::SceneContext;
use crate::render::host::{Notice, RenderHost, RenderRequest};
use crate::render::queue::{RenderJob, RenderQueue};
use crate::render::session::{Progress, SchedulerSnapshot, SchedulerState, SessionState};
use crate::render::settings::MulticamSettings;
use crate::scene::{NodeHandle, SceneGraph};

/// What a single [`RenderScheduler::tick`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No sequence is active.
    Idle,
    /// The job was handed to the engine.
    Dispatched(RenderJob),
    /// A job is still with the engine.
    Waiting,
    /// The sequence ended and scene state was restored.
    Finished,
    /// The job was dropped without rendering; the sequence goes on.
    JobAborted(RenderJob),
}

#[derive(Debug, Default)]
pub struct RenderScheduler {
    state: SchedulerState,
    queue: RenderQueue,
    session: SessionState,
    settings: MulticamSettings,

    listeners_registered: bool,
    timer_running: bool,
    modal: bool,
}

impl RenderScheduler {
    #[must_use]
    pub fn new(settings: MulticamSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Resumes a scheduler from persisted state.
    ///
    /// A non-idle snapshot is assumed to still hold its host registrations,
    /// so the next terminal transition releases them.
    #[must_use]
    pub fn from_snapshot(settings: MulticamSettings, snapshot: SchedulerSnapshot) -> Self {
        let active = snapshot.state != SchedulerState::Idle;
        Self {
            state: snapshot.state,
            queue: snapshot.queue,
            session: snapshot.session,
            settings,
            listeners_registered: active,
            timer_running: active,
            modal: active,
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            state: self.state,
            queue: self.queue.clone(),
            session: self.session.clone(),
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle
    }

    #[must_use]
    pub fn queue(&self) -> &RenderQueue {
        &self.queue
    }

    #[must_use]
    pub fn session(&self) -> &SessionState {
        &self.session
    }

    #[must_use]
    pub fn settings(&self) -> &MulticamSettings {
        &self.settings
    }

    /// Settings only take effect for the next sequence.
    pub fn set_settings(&mut self, settings: MulticamSettings) {
        self.settings = settings;
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.session.progress()
    }

    // ========================================================================
    // Start
    // ========================================================================

    /// Starts rendering the rig that `camera` belongs to.
    ///
    /// Every rig child of the base camera gets a job (or one job per frame in
    /// frame-by-frame mode); a base without a rig renders itself. Returns the
    /// number of queued jobs.
    pub fn start<S, H>(
        &mut self,
        scene: &S,
        ctx: &SceneContext,
        host: &mut H,
        camera: NodeHandle,
    ) -> Result<usize>
    where
        S: SceneGraph + ?Sized,
        H: RenderHost + ?Sized,
    {
        if !self.is_idle() {
            return Err(MulticamError::SessionAlreadyRunning);
        }
        if !scene.contains(camera) {
            return Err(MulticamError::StaleHandle);
        }

        let base = scene.resolve_base(camera);
        let base_name = scene.name(base).ok_or(MulticamError::StaleHandle)?.to_owned();
        if scene.camera(base).is_none() {
            return Err(MulticamError::NotACamera(base_name));
        }

        let mut cameras: Vec<String> = scene
            .rig_children(base)
            .into_iter()
            .filter_map(|child| scene.name(child).map(str::to_owned))
            .collect();
        if cameras.is_empty() {
            cameras.push(base_name.clone());
        }

        // Everything fallible happens before the host is touched.
        let queue = RenderQueue::build(cameras, ctx.frame_range(), self.settings.frame_by_frame)?;

        self.session = SessionState::snapshot(ctx, base);
        self.session.total_jobs = queue.len();
        self.queue = queue;

        host.register_lifecycle_listeners();
        self.listeners_registered = true;
        host.start_timer(self.settings.tick_interval);
        self.timer_running = true;
        host.enter_modal();
        self.modal = true;

        self.state = SchedulerState::Running;
        log::info!(
            "Render sequence started for '{}': {} job(s), frames {}..={}",
            base_name,
            self.queue.len(),
            ctx.frame_start,
            ctx.frame_end
        );
        Ok(self.queue.len())
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Timer handler. Terminates, dispatches the next job, or waits.
    pub fn tick<S, H>(&mut self, scene: &mut S, ctx: &mut SceneContext, host: &mut H) -> Result<TickOutcome>
    where
        S: SceneGraph + ?Sized,
        H: RenderHost + ?Sized,
    {
        if self.is_idle() {
            return Ok(TickOutcome::Idle);
        }

        if self.queue.is_empty() || self.session.cancel_requested {
            self.finish(&*scene, ctx, host);
            return Ok(TickOutcome::Finished);
        }

        if self.session.job_in_flight() {
            return Ok(TickOutcome::Waiting);
        }

        self.dispatch(scene, ctx, host)
    }

    fn dispatch<S, H>(&mut self, scene: &mut S, ctx: &mut SceneContext, host: &mut H) -> Result<TickOutcome>
    where
        S: SceneGraph + ?Sized,
        H: RenderHost + ?Sized,
    {
        let Some(job) = self.queue.peek().cloned() else {
            return Ok(TickOutcome::Waiting);
        };

        // A queued name that no longer resolves means the rig and the queue
        // went out of sync; rendering anything else would mislabel output.
        let camera = match scene.find_by_name(&job.camera_name) {
            Ok(camera) if scene.camera(camera).is_some() => camera,
            _ => {
                let err = MulticamError::CameraNotFound(job.camera_name.clone());
                return Err(self.abort(&*scene, ctx, host, err));
            }
        };

        ctx.active_camera = Some(camera);

        if self.settings.copy_base_properties
            && let Some(base) = self.session.rig_base
            && base != camera
            && let Err(err) = scene.copy_camera_data(base, camera)
        {
            return Err(self.abort(&*scene, ctx, host, err));
        }

        let output_dir: PathBuf = self.session.base_output_path.join(&job.camera_name);
        if self.settings.create_output_dirs
            && let Err(err) = host.create_output_dir(&output_dir)
        {
            log::warn!("Dropping job {job}: cannot create {}: {err}", output_dir.display());
            self.queue.pop();
            self.session.skipped_jobs += 1;
            ctx.active_camera = Some(scene.resolve_base(camera));
            host.notify(Notice::error(format!(
                "Skipped {job}: cannot create output directory {}: {err}",
                output_dir.display()
            )));
            return Ok(TickOutcome::JobAborted(job));
        }

        ctx.output_path.clone_from(&output_dir);
        ctx.set_frame_range(job.frame_start, job.frame_end);

        let request = RenderRequest {
            camera,
            camera_name: job.camera_name.clone(),
            frame_start: job.frame_start,
            frame_end: job.frame_end,
            output_path: output_dir,
        };

        if let Err(err) = host.render_animation(&request) {
            log::error!("Render engine refused {job}: {err}");
            host.notify(Notice::error(format!("Render of {job} failed: {err}")));
            self.cancel(&*scene, ctx);
            return Err(err);
        }

        self.session.submitted = true;
        log::debug!("Dispatched {job} ({})", self.progress());
        Ok(TickOutcome::Dispatched(job))
    }

    // ========================================================================
    // Lifecycle events
    // ========================================================================

    pub fn on_job_start(&mut self) {
        if self.state != SchedulerState::Running {
            log::debug!("Ignoring job start while {:?}", self.state);
            return;
        }
        self.session.submitted = false;
        self.session.rendering = true;
    }

    /// The engine finished the job at the queue head.
    pub fn on_job_complete<S>(&mut self, scene: &S, ctx: &mut SceneContext)
    where
        S: SceneGraph + ?Sized,
    {
        if self.state != SchedulerState::Running {
            log::debug!("Ignoring job completion while {:?}", self.state);
            return;
        }
        if !self.session.job_in_flight() {
            log::warn!("Job completion reported with no job in flight");
            return;
        }

        if let Some(job) = self.queue.pop() {
            self.session.completed_jobs += 1;
            log::info!("Finished {job} ({})", self.progress());
        }

        if let Some(current) = ctx.active_camera
            && scene.contains(current)
        {
            ctx.active_camera = Some(scene.resolve_base(current));
        }

        self.session.submitted = false;
        self.session.rendering = false;
    }

    pub fn on_job_cancelled<S>(&mut self, scene: &S, ctx: &mut SceneContext)
    where
        S: SceneGraph + ?Sized,
    {
        log::warn!("Render engine cancelled the current job");
        self.cancel(scene, ctx);
    }

    /// Requests cancellation.
    ///
    /// Scene state is restored right away since the engine may stop sending
    /// ticks after a cancel; the next tick releases the host registrations.
    /// Returns `false` when no sequence is active.
    pub fn cancel<S>(&mut self, scene: &S, ctx: &mut SceneContext) -> bool
    where
        S: SceneGraph + ?Sized,
    {
        if self.is_idle() {
            return false;
        }
        if !self.session.cancel_requested {
            log::warn!("Render sequence cancelled after {}", self.progress());
        }

        self.session.cancel_requested = true;
        self.session.rendering = false;
        self.session.submitted = false;
        self.state = SchedulerState::Draining;
        self.restore(scene, ctx);
        true
    }

    // ========================================================================
    // Termination
    // ========================================================================

    /// Releases everything the session holds on the host and clears the
    /// queue. Safe to call any number of times.
    pub fn teardown<H>(&mut self, host: &mut H)
    where
        H: RenderHost + ?Sized,
    {
        if self.listeners_registered {
            host.unregister_lifecycle_listeners();
            self.listeners_registered = false;
        }
        if self.timer_running {
            host.stop_timer();
            self.timer_running = false;
        }
        if self.modal {
            host.exit_modal();
            self.modal = false;
        }
        self.queue.clear();
        self.session.rendering = false;
        self.session.submitted = false;
        self.state = SchedulerState::Idle;
    }

    /// Puts output path, frame range and active camera back to their values
    /// from before the sequence.
    ///
    /// The active camera returns to the one captured at start if it still
    /// exists, else to the base of whatever is active now.
    fn restore<S>(&self, scene: &S, ctx: &mut SceneContext)
    where
        S: SceneGraph + ?Sized,
    {
        ctx.output_path.clone_from(&self.session.base_output_path);
        ctx.set_frame_range(self.session.base_frame_start, self.session.base_frame_end);

        ctx.active_camera = match (self.session.base_camera, ctx.active_camera) {
            (Some(saved), _) if scene.contains(saved) => Some(saved),
            (_, Some(current)) if scene.contains(current) => Some(scene.resolve_base(current)),
            _ => self.session.rig_base.filter(|&base| scene.contains(base)),
        };
    }

    fn finish<S, H>(&mut self, scene: &S, ctx: &mut SceneContext, host: &mut H)
    where
        S: SceneGraph + ?Sized,
        H: RenderHost + ?Sized,
    {
        let cancelled = self.session.cancel_requested;
        let progress = self.progress();

        self.teardown(host);
        self.restore(scene, ctx);

        let mut message = self.settings.completion_message.clone();
        if cancelled {
            message.push_str(&format!(" (cancelled after {progress} jobs)"));
        } else if self.session.skipped_jobs > 0 {
            message.push_str(&format!(" ({} job(s) skipped)", self.session.skipped_jobs));
        }
        log::info!("{message}");
        host.notify(Notice::info(message));
    }

    /// Fatal path: full teardown and restoration, then report `err`.
    fn abort<S, H>(&mut self, scene: &S, ctx: &mut SceneContext, host: &mut H, err: MulticamError) -> MulticamError
    where
        S: SceneGraph + ?Sized,
        H: RenderHost + ?Sized,
    {
        log::error!("Render sequence aborted: {err}");
        self.teardown(host);
        self.restore(scene, ctx);
        host.notify(Notice::error(format!("Render sequence aborted: {err}")));
        err
    }
}
