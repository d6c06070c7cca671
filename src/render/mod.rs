//! Render sequencing.
//!
//! Builds a [`RenderQueue`] from a rig and drives it through a
//! [`RenderHost`] one job at a time with the [`RenderScheduler`].

pub mod context;
pub mod headless;
pub mod host;
pub mod queue;
pub mod scheduler;
pub mod session;
pub mod settings;

pub use context::SceneContext;
pub use headless::HeadlessHost;
pub use host::{Notice, NoticeLevel, RenderHost, RenderRequest};
pub use queue::{FrameRange, RenderJob, RenderQueue};
pub use scheduler::{RenderScheduler, TickOutcome};
pub use session::{Progress, SchedulerSnapshot, SchedulerState, SessionState};
pub use settings::MulticamSettings;
