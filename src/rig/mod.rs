//! Camera rigs
//!
//! A rig is a base camera plus a generated, disposable set of child cameras.
//!
//! - [`params`]: rig settings stored on the base camera, with validation
//! - [`stereo`], [`matrix`], [`orbit`], [`sphere`], [`optimal`]: pure layout
//!   functions turning parameters into [`ChildSpec`]s
//! - [`generator`]: applies the layouts to a scene graph, tearing down and
//!   recreating the children on every change
//!
//! Layout functions assume validated parameters; see
//! [`RigSettings::validate`].

pub mod generator;
pub mod matrix;
pub mod optimal;
pub mod orbit;
pub mod params;
pub mod sphere;
pub mod stereo;

pub use generator::RigGenerator;
pub use params::{MatrixParams, MeshLayout, MeshParams, RigSettings, RigType, StereoParams};

use glam::{Quat, Vec3};

use crate::errors::{MulticamError, Result};
use crate::scene::{Camera, NodeHandle};

/// Where a child camera goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Relative to the base camera.
    Local { position: Vec3, rotation: Quat },
    /// In world space (mesh rigs around a target).
    World { position: Vec3, rotation: Quat },
    /// World rotation only; the scene graph positions the camera so that
    /// `target` exactly fills the view.
    Framed { rotation: Quat, target: NodeHandle },
}

/// One child camera of a rig, as produced by a layout function.
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSpec {
    /// Appended to the base camera name.
    pub suffix: String,
    pub placement: Placement,
    /// Node the child keeps looking at through a look-at constraint.
    pub look_at: Option<NodeHandle>,
    /// Extra horizontal lens shift, in frame widths.
    pub lens_shift_x: f32,
}

impl ChildSpec {
    #[must_use]
    pub fn local(suffix: impl Into<String>, position: Vec3, rotation: Quat) -> Self {
        Self::new(suffix, Placement::Local { position, rotation })
    }

    #[must_use]
    pub fn world(suffix: impl Into<String>, position: Vec3, rotation: Quat) -> Self {
        Self::new(suffix, Placement::World { position, rotation })
    }

    #[must_use]
    pub fn framed(suffix: impl Into<String>, rotation: Quat, target: NodeHandle) -> Self {
        Self::new(suffix, Placement::Framed { rotation, target })
    }

    fn new(suffix: impl Into<String>, placement: Placement) -> Self {
        Self {
            suffix: suffix.into(),
            placement,
            look_at: None,
            lens_shift_x: 0.0,
        }
    }

    #[must_use]
    pub fn looking_at(mut self, target: NodeHandle) -> Self {
        self.look_at = Some(target);
        self
    }

    #[must_use]
    pub fn with_lens_shift(mut self, shift_x: f32) -> Self {
        self.lens_shift_x = shift_x;
        self
    }

    /// Full child name for a base camera called `base_name`.
    #[must_use]
    pub fn name_for(&self, base_name: &str) -> String {
        format!("{base_name}{}", self.suffix)
    }
}

/// A resolved mesh-rig target: its handle and world position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RigTarget {
    pub handle: NodeHandle,
    pub position: Vec3,
}

/// Computes the child layout for `settings`.
///
/// `lens` is the base camera's data block (stereo lens shift depends on its
/// field of view). Mesh rigs need a resolved `target`; without one the rig of
/// `base_name` is rejected with [`MulticamError::MissingTarget`].
pub fn generate(
    base_name: &str,
    settings: &RigSettings,
    lens: &Camera,
    target: Option<RigTarget>,
) -> Result<Vec<ChildSpec>> {
    let specs = match settings.rig_type {
        RigType::Single => Vec::new(),
        RigType::Stereo => stereo::layout(&settings.stereo, lens),
        RigType::Matrix => matrix::layout(&settings.matrix),
        RigType::Mesh => {
            let target = target.ok_or_else(|| MulticamError::MissingTarget(base_name.to_owned()))?;
            let radius = settings.mesh.radius;
            match settings.mesh.layout {
                MeshLayout::Orbit {
                    count,
                    rotation_offset_deg,
                    tilt_x_deg,
                    tilt_y_deg,
                } => orbit::layout(
                    &orbit::OrbitRing {
                        count,
                        radius,
                        rotation_offset_deg,
                        tilt_x_deg,
                        tilt_y_deg,
                    },
                    target,
                ),
                MeshLayout::Sphere { count } => sphere::layout(count, radius, target),
                MeshLayout::Optimal {
                    z_rotation_offset_deg,
                } => optimal::layout(z_rotation_offset_deg, target.handle),
            }
        }
    };
    Ok(specs)
}
