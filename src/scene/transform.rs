use glam::{Affine3A, Quat, Vec3};

use crate::math;

/// Local TRS transform of a scene node, relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }

    #[must_use]
    pub fn from_position_rotation(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Decomposes an affine matrix. Shear is lost.
    #[must_use]
    pub fn from_matrix(mat: Affine3A) -> Self {
        let (scale, rotation, position) = mat.to_scale_rotation_translation();
        Self {
            position,
            rotation,
            scale,
        }
    }

    // ========================================================================
    // Getters & Helpers
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn local_matrix(&self) -> Affine3A {
        Affine3A::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Overwrites position, rotation and scale from a matrix.
    pub fn apply_local_matrix(&mut self, mat: Affine3A) {
        *self = Self::from_matrix(mat);
    }

    /// Direction the camera forward axis (-Z) points to, in parent space.
    #[inline]
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.rotation * math::CAMERA_FORWARD
    }

    /// Orients -Z toward `target`, keeping +Y close to `up`.
    ///
    /// `target` and `up` are expressed in the parent space of this transform.
    /// Degenerate directions leave the rotation untouched.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        if let Some(rotation) =
            math::align_axes(math::CAMERA_FORWARD, math::CAMERA_UP, target - self.position, up)
        {
            self.rotation = rotation;
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}
