//! Engine Facade
//!
//! [`MultiCam`] is the surface a host integration talks to: four rig-setting
//! entry points, one entry point to start rendering the rig, one to cancel,
//! and the event handlers the host forwards its timer and render lifecycle
//! events to. It owns no scene; the scene graph, the scene context and the
//! render host are passed into every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use multicam::{MultiCam, MulticamSettings, Scene, SceneContext, HeadlessHost};
//! use multicam::rig::StereoParams;
//!
//! let mut multicam = MultiCam::new(MulticamSettings::default());
//! multicam.set_stereo(&mut scene, &mut ctx, camera, StereoParams::default())?;
//!
//! multicam.start_render_sequence(&scene, &ctx, &mut host, Some(camera))?;
//! // Host event loop
//! multicam.tick(&mut scene, &mut ctx, &mut host)?;
//! multicam.on_job_start();
//! multicam.on_job_complete(&scene, &mut ctx);
//! ```

use crate::errors::{MulticamError, Result};
use crate::render::{
    MulticamSettings, Progress, RenderHost, RenderScheduler, SceneContext, SchedulerSnapshot, TickOutcome,
};
use crate::rig::{MatrixParams, MeshParams, RigGenerator, RigSettings, StereoParams};
use crate::scene::{NodeHandle, SceneGraph};

/// Host-facing coordinator of rig generation and render sequencing.
///
/// # Lifecycle
///
/// 1. Configure a rig with one of the `set_*` methods
/// 2. Start a sequence with [`MultiCam::start_render_sequence`]
/// 3. Forward timer ticks to [`MultiCam::tick`] and engine events to the
///    `on_job_*` handlers until a tick returns [`TickOutcome::Finished`]
#[derive(Debug, Default)]
pub struct MultiCam {
    scheduler: RenderScheduler,
}

impl MultiCam {
    #[must_use]
    pub fn new(settings: MulticamSettings) -> Self {
        Self {
            scheduler: RenderScheduler::new(settings),
        }
    }

    /// Resumes from a persisted scheduler snapshot.
    #[must_use]
    pub fn from_snapshot(settings: MulticamSettings, snapshot: SchedulerSnapshot) -> Self {
        Self {
            scheduler: RenderScheduler::from_snapshot(settings, snapshot),
        }
    }

    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler {
        &self.scheduler
    }

    #[must_use]
    pub fn settings(&self) -> &MulticamSettings {
        self.scheduler.settings()
    }

    pub fn set_settings(&mut self, settings: MulticamSettings) -> Result<()> {
        self.ensure_idle()?;
        self.scheduler.set_settings(settings);
        Ok(())
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.scheduler.progress()
    }

    #[must_use]
    pub fn snapshot(&self) -> SchedulerSnapshot {
        self.scheduler.snapshot()
    }

    // ========================================================================
    // Rig settings
    // ========================================================================

    /// Removes the rig of `camera`'s base, leaving a plain camera.
    pub fn set_single<S>(&mut self, scene: &mut S, ctx: &mut SceneContext, camera: NodeHandle) -> Result<()>
    where
        S: SceneGraph + ?Sized,
    {
        self.apply_rig(scene, ctx, camera, RigSettings::with_single)
    }

    pub fn set_stereo<S>(
        &mut self,
        scene: &mut S,
        ctx: &mut SceneContext,
        camera: NodeHandle,
        params: StereoParams,
    ) -> Result<()>
    where
        S: SceneGraph + ?Sized,
    {
        self.apply_rig(scene, ctx, camera, |settings| settings.with_stereo(params))
    }

    pub fn set_matrix<S>(
        &mut self,
        scene: &mut S,
        ctx: &mut SceneContext,
        camera: NodeHandle,
        params: MatrixParams,
    ) -> Result<()>
    where
        S: SceneGraph + ?Sized,
    {
        self.apply_rig(scene, ctx, camera, |settings| settings.with_matrix(params))
    }

    pub fn set_mesh<S>(
        &mut self,
        scene: &mut S,
        ctx: &mut SceneContext,
        camera: NodeHandle,
        params: MeshParams,
    ) -> Result<()>
    where
        S: SceneGraph + ?Sized,
    {
        self.apply_rig(scene, ctx, camera, |settings| settings.with_mesh(params))
    }

    /// Rebuilds the rig from the settings stored on the base camera, e.g.
    /// after the base moved or its lens changed.
    pub fn regenerate<S>(&mut self, scene: &mut S, ctx: &mut SceneContext, camera: NodeHandle) -> Result<()>
    where
        S: SceneGraph + ?Sized,
    {
        self.ensure_idle()?;
        let base = scene.resolve_base(camera);
        RigGenerator::new(&mut *scene).regenerate(camera)?;
        Self::repair_active_camera(scene, ctx, base);
        Ok(())
    }

    fn apply_rig<S, F>(&mut self, scene: &mut S, ctx: &mut SceneContext, camera: NodeHandle, update: F) -> Result<()>
    where
        S: SceneGraph + ?Sized,
        F: FnOnce(RigSettings) -> RigSettings,
    {
        self.ensure_idle()?;
        if !scene.contains(camera) {
            return Err(MulticamError::StaleHandle);
        }
        let base = scene.resolve_base(camera);
        let settings = update(scene.rig_settings(base).copied().unwrap_or_default());

        RigGenerator::new(&mut *scene).on_parameter_changed(base, settings)?;
        Self::repair_active_camera(scene, ctx, base);
        Ok(())
    }

    /// A regeneration may destroy the camera the user was looking through;
    /// fall back to the base.
    fn repair_active_camera<S>(scene: &S, ctx: &mut SceneContext, base: NodeHandle)
    where
        S: SceneGraph + ?Sized,
    {
        if let Some(active) = ctx.active_camera
            && !scene.contains(active)
        {
            log::debug!("Active camera was removed with the old rig, falling back to the base");
            ctx.active_camera = Some(base);
        }
    }

    fn ensure_idle(&self) -> Result<()> {
        if self.scheduler.is_idle() {
            Ok(())
        } else {
            Err(MulticamError::SessionAlreadyRunning)
        }
    }

    // ========================================================================
    // Render sequence
    // ========================================================================

    /// Starts rendering the rig of `camera`, or of the active camera when
    /// `camera` is `None`. Returns the number of queued jobs.
    pub fn start_render_sequence<S, H>(
        &mut self,
        scene: &S,
        ctx: &SceneContext,
        host: &mut H,
        camera: Option<NodeHandle>,
    ) -> Result<usize>
    where
        S: SceneGraph + ?Sized,
        H: RenderHost + ?Sized,
    {
        let camera = camera
            .or(ctx.active_camera)
            .ok_or_else(|| MulticamError::NodeNotFound("active camera".to_owned()))?;
        self.scheduler.start(scene, ctx, host, camera)
    }

    /// Returns `false` when no sequence is running.
    pub fn cancel<S>(&mut self, scene: &S, ctx: &mut SceneContext) -> bool
    where
        S: SceneGraph + ?Sized,
    {
        self.scheduler.cancel(scene, ctx)
    }

    // ========================================================================
    // Host events
    // ========================================================================

    pub fn tick<S, H>(&mut self, scene: &mut S, ctx: &mut SceneContext, host: &mut H) -> Result<TickOutcome>
    where
        S: SceneGraph + ?Sized,
        H: RenderHost + ?Sized,
    {
        self.scheduler.tick(scene, ctx, host)
    }

    pub fn on_job_start(&mut self) {
        self.scheduler.on_job_start();
    }

    pub fn on_job_complete<S>(&mut self, scene: &S, ctx: &mut SceneContext)
    where
        S: SceneGraph + ?Sized,
    {
        self.scheduler.on_job_complete(scene, ctx);
    }

    pub fn on_job_cancelled<S>(&mut self, scene: &S, ctx: &mut SceneContext)
    where
        S: SceneGraph + ?Sized,
    {
        self.scheduler.on_job_cancelled(scene, ctx);
    }
}
