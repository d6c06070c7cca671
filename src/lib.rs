#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod engine;
pub mod errors;
pub mod math;
pub mod render;
pub mod rig;
pub mod scene;

pub use engine::MultiCam;
pub use errors::{MulticamError, Result};
pub use render::{
    HeadlessHost, MulticamSettings, Notice, NoticeLevel, RenderHost, RenderJob, RenderQueue, RenderRequest,
    RenderScheduler, SceneContext, SchedulerState, TickOutcome,
};
pub use rig::{MatrixParams, MeshLayout, MeshParams, RigGenerator, RigSettings, RigType, StereoParams};
pub use scene::{BoundingBox, Camera, LookAtConstraint, Node, NodeHandle, Scene, SceneGraph, Transform};
