use glam::Vec3;

use crate::scene::NodeHandle;

/// Local axis a constraint points toward its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackAxis {
    X,
    Y,
    Z,
    NegX,
    NegY,
    NegZ,
}

impl TrackAxis {
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
            Self::NegX => Vec3::NEG_X,
            Self::NegY => Vec3::NEG_Y,
            Self::NegZ => Vec3::NEG_Z,
        }
    }
}

/// Local axis kept aligned with the world up direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpAxis {
    X,
    Y,
    Z,
}

impl UpAxis {
    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Y => Vec3::Y,
            Self::Z => Vec3::Z,
        }
    }
}

/// Keeps a node's `forward_axis` pointed at `target`, overriding the node's
/// own rotation when world matrices are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookAtConstraint {
    pub target: NodeHandle,
    pub forward_axis: TrackAxis,
    pub up_axis: UpAxis,
}

impl LookAtConstraint {
    /// Camera convention: -Z toward the target, +Y up.
    #[must_use]
    pub fn track_to(target: NodeHandle) -> Self {
        Self {
            target,
            forward_axis: TrackAxis::NegZ,
            up_axis: UpAxis::Y,
        }
    }

    /// Whether the axis pair is usable (the two axes must be perpendicular).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.forward_axis.to_vec3().dot(self.up_axis.to_vec3()).abs() < f32::EPSILON
    }
}
