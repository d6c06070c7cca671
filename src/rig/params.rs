//! Rig parameters and their validation.
//!
//! A base camera stores one [`RigSettings`] holding the parameters of every
//! topology; only the block selected by [`RigType`] is validated and used.
//! Switching type keeps the other blocks, so flipping back restores the
//! previous layout.

use serde::{Deserialize, Serialize};

use crate::errors::{MulticamError, Result};
use crate::scene::NodeHandle;

/// Rig topology selected on a base camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RigType {
    /// The base camera alone, no children.
    #[default]
    Single,
    /// Left/right pair.
    Stereo,
    /// Rectangular grid (light-field).
    Matrix,
    /// Cameras around a target object.
    Mesh,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StereoParams {
    /// Toe-in both cameras so their axes meet at `focal_distance`.
    pub is_convergent: bool,
    /// Distance to the zero-parallax plane, in scene units.
    pub focal_distance: f32,
    /// Distance between the left and right camera, in scene units.
    pub spacing: f32,
}

impl Default for StereoParams {
    fn default() -> Self {
        Self {
            is_convergent: false,
            focal_distance: 20.0,
            spacing: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixParams {
    pub h_amount: u32,
    pub v_amount: u32,
    /// Column spacing in grid units (millimetres).
    pub h_distance: u32,
    /// Row spacing in grid units (millimetres).
    pub v_distance: u32,
}

impl Default for MatrixParams {
    fn default() -> Self {
        Self {
            h_amount: 2,
            v_amount: 2,
            h_distance: 100,
            v_distance: 100,
        }
    }
}

/// Arrangement of a mesh rig around its target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MeshLayout {
    /// Ring of cameras in a (tilted) plane through the target.
    Orbit {
        count: u32,
        rotation_offset_deg: f32,
        tilt_x_deg: f32,
        tilt_y_deg: f32,
    },
    /// Fibonacci-lattice cover of a sphere around the target.
    Sphere { count: u32 },
    /// Six cameras facing the target's bounding cube faces.
    Optimal { z_rotation_offset_deg: f32 },
}

impl Default for MeshLayout {
    fn default() -> Self {
        Self::Orbit {
            count: 8,
            rotation_offset_deg: 0.0,
            tilt_x_deg: 0.0,
            tilt_y_deg: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeshParams {
    pub target: Option<NodeHandle>,
    /// Distance from the target; unused by [`MeshLayout::Optimal`].
    pub radius: f32,
    pub layout: MeshLayout,
}

impl Default for MeshParams {
    fn default() -> Self {
        Self {
            target: None,
            radius: 10.0,
            layout: MeshLayout::default(),
        }
    }
}

/// Everything that determines a base camera's rig.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RigSettings {
    pub rig_type: RigType,
    pub stereo: StereoParams,
    pub matrix: MatrixParams,
    pub mesh: MeshParams,
}

impl RigSettings {
    #[must_use]
    pub fn single() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn stereo(params: StereoParams) -> Self {
        Self::default().with_stereo(params)
    }

    #[must_use]
    pub fn matrix(params: MatrixParams) -> Self {
        Self::default().with_matrix(params)
    }

    #[must_use]
    pub fn mesh(params: MeshParams) -> Self {
        Self::default().with_mesh(params)
    }

    /// Selects the stereo topology, keeping the other parameter blocks.
    #[must_use]
    pub fn with_stereo(mut self, params: StereoParams) -> Self {
        self.rig_type = RigType::Stereo;
        self.stereo = params;
        self
    }

    #[must_use]
    pub fn with_matrix(mut self, params: MatrixParams) -> Self {
        self.rig_type = RigType::Matrix;
        self.matrix = params;
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, params: MeshParams) -> Self {
        self.rig_type = RigType::Mesh;
        self.mesh = params;
        self
    }

    #[must_use]
    pub fn with_single(mut self) -> Self {
        self.rig_type = RigType::Single;
        self
    }

    /// Checks the parameters of the active topology.
    ///
    /// Mesh targets are only checked for presence here; the generator
    /// resolves them against the scene.
    pub fn validate(&self) -> Result<()> {
        match self.rig_type {
            RigType::Single => Ok(()),
            RigType::Stereo => self.stereo.validate(),
            RigType::Matrix => self.matrix.validate(),
            RigType::Mesh => self.mesh.validate(),
        }
    }
}

impl StereoParams {
    pub fn validate(&self) -> Result<()> {
        positive("spacing", self.spacing)?;
        positive("focal_distance", self.focal_distance)
    }
}

impl MatrixParams {
    pub fn validate(&self) -> Result<()> {
        at_least_two("h_amount", self.h_amount)?;
        at_least_two("v_amount", self.v_amount)
    }

    #[must_use]
    pub fn camera_count(&self) -> usize {
        self.h_amount as usize * self.v_amount as usize
    }
}

impl MeshParams {
    pub fn validate(&self) -> Result<()> {
        match self.layout {
            MeshLayout::Orbit {
                count,
                rotation_offset_deg,
                tilt_x_deg,
                tilt_y_deg,
            } => {
                non_negative("radius", self.radius)?;
                at_least_two("orbit_count", count)?;
                finite("rotation_offset_deg", rotation_offset_deg)?;
                finite("tilt_x_deg", tilt_x_deg)?;
                finite("tilt_y_deg", tilt_y_deg)
            }
            MeshLayout::Sphere { count } => {
                non_negative("radius", self.radius)?;
                at_least_two("sphere_count", count)
            }
            MeshLayout::Optimal {
                z_rotation_offset_deg,
            } => finite("z_rotation_offset_deg", z_rotation_offset_deg),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> MulticamError {
    MulticamError::InvalidParameter {
        field,
        reason: reason.into(),
    }
}

fn finite(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("must be finite, got {value}")))
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be > 0, got {value}")))
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be >= 0, got {value}")))
    }
}

fn at_least_two(field: &'static str, value: u32) -> Result<()> {
    if value >= 2 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be >= 2, got {value}")))
    }
}
